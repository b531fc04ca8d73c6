//! MySQL backend.
//!
//! Descriptors are rendered with [`sqlx::QueryBuilder`]; every value is a
//! bound parameter and identifiers come from the fixed column table in
//! [`Resource::column`].

use async_trait::async_trait;
use sqlx::mysql::{MySql, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{FromRow, QueryBuilder};

use crate::error::{QueryError, StoreError};
use crate::models::{Book, Chapter, Collection, Hadith, Record};
use crate::query::{Field, Order, Predicate, Query, Resource, Value};
use crate::store::{Store, Window};

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Create a pool that opens connections on first use.
    pub fn connect_lazy(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(url)?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for MySqlStore {
    async fn fetch(&self, query: &Query, window: Option<Window>) -> Result<Vec<Record>, StoreError> {
        let mut builder = select_sql(query, window)?;
        tracing::debug!(sql = builder.sql(), "fetch");

        let records = match query.resource() {
            Resource::Collection => fetch_as::<Collection>(&mut builder, &self.pool).await?,
            Resource::Book => fetch_as::<Book>(&mut builder, &self.pool).await?,
            Resource::Chapter => fetch_as::<Chapter>(&mut builder, &self.pool).await?,
            Resource::Hadith => fetch_as::<Hadith>(&mut builder, &self.pool).await?,
        };
        Ok(records)
    }

    async fn count(&self, query: &Query) -> Result<u64, StoreError> {
        let mut builder = count_sql(query)?;
        tracing::debug!(sql = builder.sql(), "count");

        let total: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(total).unwrap_or_default())
    }
}

async fn fetch_as<T>(
    builder: &mut QueryBuilder<'static, MySql>,
    pool: &MySqlPool,
) -> Result<Vec<Record>, sqlx::Error>
where
    T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin + Into<Record>,
{
    let rows = builder.build_query_as::<T>().fetch_all(pool).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub(crate) fn select_sql(
    query: &Query,
    window: Option<Window>,
) -> Result<QueryBuilder<'static, MySql>, QueryError> {
    let resource = query.resource();
    let mut builder = QueryBuilder::new("SELECT * FROM ");
    builder.push(resource.table());
    push_where(&mut builder, query)?;

    match query.order() {
        Some(Order::Asc(field)) => {
            builder.push(" ORDER BY ").push(column(resource, field)?);
        }
        Some(Order::AbsAsc(field)) => {
            builder
                .push(" ORDER BY ABS(")
                .push(column(resource, field)?)
                .push(")");
        }
        Some(Order::Random) => {
            builder.push(" ORDER BY RAND()");
        }
        None => {}
    }

    if let Some(window) = window {
        builder
            .push(" LIMIT ")
            .push_bind(window.limit)
            .push(" OFFSET ")
            .push_bind(window.offset);
    }

    Ok(builder)
}

pub(crate) fn count_sql(query: &Query) -> Result<QueryBuilder<'static, MySql>, QueryError> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM ");
    builder.push(query.resource().table());
    push_where(&mut builder, query)?;
    Ok(builder)
}

fn push_where(builder: &mut QueryBuilder<'static, MySql>, query: &Query) -> Result<(), QueryError> {
    for (i, predicate) in query.predicates().iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        push_predicate(builder, query.resource(), predicate)?;
    }
    Ok(())
}

fn push_predicate(
    builder: &mut QueryBuilder<'static, MySql>,
    resource: Resource,
    predicate: &Predicate,
) -> Result<(), QueryError> {
    match predicate {
        Predicate::Eq(field, value) => {
            builder.push(column(resource, *field)?).push(" = ");
            push_value(builder, value);
        }
        Predicate::In(field, values) => {
            let name = column(resource, *field)?;
            if values.is_empty() {
                builder.push("1 = 0");
                return Ok(());
            }
            builder.push(name).push(" IN (");
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    builder.push(", ");
                }
                push_value(builder, value);
            }
            builder.push(")");
        }
        Predicate::Any(inner) => {
            if inner.is_empty() {
                builder.push("1 = 0");
                return Ok(());
            }
            builder.push("(");
            for (i, predicate) in inner.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                push_predicate(builder, resource, predicate)?;
            }
            builder.push(")");
        }
    }
    Ok(())
}

fn push_value(builder: &mut QueryBuilder<'static, MySql>, value: &Value) {
    match value {
        Value::Text(text) => builder.push_bind(text.clone()),
        Value::Int(n) => builder.push_bind(*n),
        Value::Float(n) => builder.push_bind(*n),
    };
}

fn column(resource: Resource, field: Field) -> Result<String, QueryError> {
    resource
        .column(field)
        .map(|name| format!("`{name}`"))
        .ok_or(QueryError::UnknownField { resource, field })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Book;

    #[test]
    fn renders_filtered_ordered_page() {
        let query = Query::select(Resource::Book)
            .filter(Predicate::eq(Field::Collection, "bukhari"))
            .filter(Predicate::eq(Field::Status, Book::PUBLISHED))
            .order_by(Order::AbsAsc(Field::BookId));

        let builder = select_sql(&query, Some(Window::page(2, 50))).unwrap();
        assert_eq!(
            builder.sql(),
            "SELECT * FROM BookData WHERE `collection` = ? AND `status` = ? \
             ORDER BY ABS(`ourBookID`) LIMIT ? OFFSET ?"
        );
    }

    #[test]
    fn renders_urn_disjunction() {
        let urns = [305_i64, 306];
        let query = Query::select(Resource::Hadith).filter(Predicate::any([
            Predicate::is_in(Field::EnglishUrn, urns),
            Predicate::is_in(Field::ArabicUrn, urns),
        ]));

        let builder = select_sql(&query, None).unwrap();
        assert_eq!(
            builder.sql(),
            "SELECT * FROM HadithTable WHERE (`englishURN` IN (?, ?) OR `arabicURN` IN (?, ?))"
        );
    }

    #[test]
    fn renders_random_single() {
        let query = Query::select(Resource::Hadith)
            .filter(Predicate::eq(Field::Collection, "riyadussalihin"))
            .order_by(Order::Random);

        let builder = select_sql(&query, Some(Window::first())).unwrap();
        assert_eq!(
            builder.sql(),
            "SELECT * FROM HadithTable WHERE `collection` = ? ORDER BY RAND() LIMIT ? OFFSET ?"
        );
    }

    #[test]
    fn count_ignores_order() {
        let query = Query::select(Resource::Collection).order_by(Order::Asc(Field::CollectionId));
        assert_eq!(
            count_sql(&query).unwrap().sql(),
            "SELECT COUNT(*) FROM Collections"
        );
    }

    #[test]
    fn empty_sets_match_nothing() {
        let query = Query::select(Resource::Hadith)
            .filter(Predicate::is_in(Field::EnglishUrn, Vec::<i64>::new()));
        assert_eq!(
            select_sql(&query, None).unwrap().sql(),
            "SELECT * FROM HadithTable WHERE 1 = 0"
        );
    }

    #[test]
    fn rejects_foreign_fields() {
        let query = Query::select(Resource::Collection).filter(Predicate::eq(Field::Status, 4));
        assert!(matches!(
            select_sql(&query, None),
            Err(QueryError::UnknownField { .. })
        ));
    }
}
