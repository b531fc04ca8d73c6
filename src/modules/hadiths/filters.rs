use hadith_db::{Field, Order, Predicate, Query, Resource};
use hadith_http::{AppError, QueryParams};

/// Optional equality filters of the hadith listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HadithFilters {
    pub collection: Option<String>,
    pub book_number: Option<String>,
    pub chapter_id: Option<f64>,
    pub hadith_number: Option<String>,
}

impl HadithFilters {
    pub fn from_query(params: &QueryParams) -> Result<Self, AppError> {
        let chapter_id = match params.parse::<f64>("chapterId")? {
            Some(id) if !id.is_finite() => {
                return Err(AppError::bad_request(format!(
                    "Query parameter 'chapterId' must be a finite number, got {id}"
                )));
            }
            other => other,
        };

        Ok(Self {
            collection: params.non_empty("collection").map(str::to_owned),
            book_number: params.non_empty("bookNumber").map(str::to_owned),
            chapter_id,
            hadith_number: params.non_empty("hadithNumber").map(str::to_owned),
        })
    }

    pub fn predicates(&self) -> Vec<Predicate> {
        let text = |field, value: &Option<String>| {
            value
                .as_deref()
                .map(|value| Predicate::eq(field, value))
        };

        [
            text(Field::Collection, &self.collection),
            text(Field::BookNumber, &self.book_number),
            self.chapter_id.map(|id| Predicate::eq(Field::ChapterId, id)),
            text(Field::HadithNumber, &self.hadith_number),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Hadiths matching every present filter, in English URN order.
    pub fn query(&self) -> Query {
        self.predicates()
            .into_iter()
            .fold(Query::select(Resource::Hadith), Query::filter)
            .order_by(Order::Asc(Field::EnglishUrn))
    }
}
