//! Query descriptors.
//!
//! A [`Query`] names a resource, a list of predicates combined with AND and an
//! optional ordering. Building one never touches a store, so route logic can
//! be tested on the descriptor alone.
//!
//! ```
//! use hadith_db::{Field, Order, Predicate, Query, Resource};
//!
//! let query = Query::select(Resource::Hadith)
//!     .filter(Predicate::eq(Field::Collection, "bukhari"))
//!     .order_by(Order::Asc(Field::EnglishUrn));
//!
//! assert!(query.validate().is_ok());
//! assert_eq!(query.predicates().len(), 1);
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::error::QueryError;

/// Kind of record a query selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Collection,
    Book,
    Chapter,
    Hadith,
}

impl Resource {
    /// Table holding the resource in the relational store.
    pub const fn table(self) -> &'static str {
        match self {
            Resource::Collection => "Collections",
            Resource::Book => "BookData",
            Resource::Chapter => "ChapterData",
            Resource::Hadith => "HadithTable",
        }
    }

    /// Column backing `field`, or `None` if the resource has no such field.
    pub const fn column(self, field: Field) -> Option<&'static str> {
        use Field::*;

        let column = match (self, field) {
            (Resource::Collection, CollectionId) => "collectionID",
            (Resource::Collection, Collection) => "name",

            (Resource::Book, Collection) => "collection",
            (Resource::Book, Status) => "status",
            (Resource::Book, BookId) => "ourBookID",

            (Resource::Chapter, Collection) => "collection",
            (Resource::Chapter, BookId) => "arabicBookID",
            (Resource::Chapter, ChapterId) => "babID",

            (Resource::Hadith, Collection) => "collection",
            (Resource::Hadith, BookNumber) => "bookNumber",
            (Resource::Hadith, ChapterId) => "babID",
            (Resource::Hadith, HadithNumber) => "hadithNumber",
            (Resource::Hadith, EnglishUrn) => "englishURN",
            (Resource::Hadith, ArabicUrn) => "arabicURN",

            _ => return None,
        };
        Some(column)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Collection => "collection",
            Resource::Book => "book",
            Resource::Chapter => "chapter",
            Resource::Hadith => "hadith",
        };
        f.write_str(name)
    }
}

/// Semantic field a predicate or ordering refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Ordering key of a collection.
    CollectionId,
    /// Collection name; the `name` of a collection, the owner of anything else.
    Collection,
    /// Publication status of a book.
    Status,
    /// Internal book ID (see [`crate::book_number`]).
    BookId,
    /// Display book number stored on hadiths.
    BookNumber,
    /// Possibly fractional chapter number.
    ChapterId,
    HadithNumber,
    EnglishUrn,
    ArabicUrn,
}

/// Scalar compared against a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
}

impl Value {
    /// Ordering between values of the same kind; mixed kinds do not compare.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => Some(a.total_cmp(b)),
            _ => None,
        }
    }

    /// Absolute value of numeric values; text is returned unchanged.
    pub fn magnitude(&self) -> Value {
        match self {
            Value::Int(n) => Value::Int(n.saturating_abs()),
            Value::Float(n) => Value::Float(n.abs()),
            text => text.clone(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

/// Filter condition. A query's top-level predicates are AND-ed.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(Field, Value),
    In(Field, Vec<Value>),
    /// Matches when at least one inner predicate matches.
    Any(Vec<Predicate>),
}

impl Predicate {
    pub fn eq(field: Field, value: impl Into<Value>) -> Self {
        Predicate::Eq(field, value.into())
    }

    pub fn is_in<V: Into<Value>>(field: Field, values: impl IntoIterator<Item = V>) -> Self {
        Predicate::In(field, values.into_iter().map(Into::into).collect())
    }

    pub fn any(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::Any(predicates.into_iter().collect())
    }

    fn check(&self, resource: Resource) -> Result<(), QueryError> {
        match self {
            Predicate::Eq(field, _) | Predicate::In(field, _) => check_field(resource, *field),
            Predicate::Any(inner) => inner.iter().try_for_each(|p| p.check(resource)),
        }
    }
}

/// Result ordering. Without one, records come back in store order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc(Field),
    /// Ascending by the absolute value of the field.
    AbsAsc(Field),
    Random,
}

/// Descriptor of a filtered, optionally ordered selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    resource: Resource,
    predicates: Vec<Predicate>,
    order: Option<Order>,
}

impl Query {
    pub fn select(resource: Resource) -> Self {
        Self {
            resource,
            predicates: Vec::new(),
            order: None,
        }
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn order_by(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn order(&self) -> Option<Order> {
        self.order
    }

    /// Check every referenced field exists on the selected resource.
    pub fn validate(&self) -> Result<(), QueryError> {
        for predicate in &self.predicates {
            predicate.check(self.resource)?;
        }
        match self.order {
            Some(Order::Asc(field)) | Some(Order::AbsAsc(field)) => {
                check_field(self.resource, field)
            }
            Some(Order::Random) | None => Ok(()),
        }
    }
}

fn check_field(resource: Resource, field: Field) -> Result<(), QueryError> {
    match resource.column(field) {
        Some(_) => Ok(()),
        None => Err(QueryError::UnknownField { resource, field }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_predicates_in_order() {
        let query = Query::select(Resource::Book)
            .filter(Predicate::eq(Field::Collection, "bukhari"))
            .filter(Predicate::eq(Field::Status, 4))
            .order_by(Order::AbsAsc(Field::BookId));

        assert_eq!(query.resource(), Resource::Book);
        assert_eq!(
            query.predicates(),
            &[
                Predicate::Eq(Field::Collection, Value::Text("bukhari".into())),
                Predicate::Eq(Field::Status, Value::Int(4)),
            ]
        );
        assert_eq!(query.order(), Some(Order::AbsAsc(Field::BookId)));
        assert!(query.validate().is_ok());
    }

    #[test]
    fn query_without_order_stays_unordered() {
        let query = Query::select(Resource::Collection)
            .filter(Predicate::eq(Field::Collection, "muslim"));
        assert_eq!(query.order(), None);
    }

    #[test]
    fn validate_rejects_fields_foreign_to_resource() {
        let query = Query::select(Resource::Book).filter(Predicate::eq(Field::EnglishUrn, 1));
        assert_eq!(
            query.validate(),
            Err(QueryError::UnknownField {
                resource: Resource::Book,
                field: Field::EnglishUrn,
            })
        );

        let query = Query::select(Resource::Collection).order_by(Order::Asc(Field::ChapterId));
        assert!(query.validate().is_err());
    }

    #[test]
    fn validate_descends_into_disjunctions() {
        let ok = Query::select(Resource::Hadith).filter(Predicate::any([
            Predicate::is_in(Field::EnglishUrn, [1_i64, 2]),
            Predicate::is_in(Field::ArabicUrn, [1_i64, 2]),
        ]));
        assert!(ok.validate().is_ok());

        let bad = Query::select(Resource::Chapter).filter(Predicate::any([
            Predicate::eq(Field::ChapterId, 1.0),
            Predicate::eq(Field::HadithNumber, "7"),
        ]));
        assert!(bad.validate().is_err());
    }

    #[test]
    fn values_compare_within_kind_only() {
        assert_eq!(Value::Int(1).compare(&Value::Int(2)), Some(Ordering::Less));
        assert_eq!(
            Value::Float(2.5).compare(&Value::Float(2.5)),
            Some(Ordering::Equal)
        );
        assert_eq!(Value::Int(1).compare(&Value::Float(1.0)), None);
        assert_eq!(Value::Int(-35).magnitude(), Value::Int(35));
    }
}
