//! Read-only projections of the corpus tables.
//!
//! Rows deserialize with their stored column names (from MySQL via `FromRow`,
//! from fixture JSON via serde). Serialization goes through a separate public
//! representation so that status flags and internal IDs never leak.

use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;

use crate::book_number;
use crate::query::{Field, Resource, Value};

/// Access to the queryable fields of a record.
pub trait Entity {
    const RESOURCE: Resource;

    /// Current value of `field`, or `None` if the entity has no such field.
    fn field(&self, field: Field) -> Option<Value>;
}

const EN: &str = "en";
const AR: &str = "ar";

#[derive(Debug, Clone, PartialEq, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Collection {
    #[serde(rename = "collectionID")]
    #[sqlx(rename = "collectionID")]
    pub collection_id: i64,
    pub name: String,
    pub has_books: bool,
    pub has_chapters: bool,
    pub english_title: String,
    pub arabic_title: String,
    #[serde(default)]
    pub english_short_intro: Option<String>,
    #[serde(default)]
    pub arabic_short_intro: Option<String>,
    pub total_hadith: i64,
    pub total_available_hadith: i64,
}

impl Entity for Collection {
    const RESOURCE: Resource = Resource::Collection;

    fn field(&self, field: Field) -> Option<Value> {
        match field {
            Field::CollectionId => Some(Value::Int(self.collection_id)),
            Field::Collection => Some(Value::Text(self.name.clone())),
            _ => None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectionView<'a> {
    name: &'a str,
    has_books: bool,
    has_chapters: bool,
    collection: [CollectionText<'a>; 2],
    total_hadith: i64,
    total_available_hadith: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectionText<'a> {
    lang: &'static str,
    title: &'a str,
    short_intro: Option<&'a str>,
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CollectionView {
            name: &self.name,
            has_books: self.has_books,
            has_chapters: self.has_chapters,
            collection: [
                CollectionText {
                    lang: EN,
                    title: &self.english_title,
                    short_intro: self.english_short_intro.as_deref(),
                },
                CollectionText {
                    lang: AR,
                    title: &self.arabic_title,
                    short_intro: self.arabic_short_intro.as_deref(),
                },
            ],
            total_hadith: self.total_hadith,
            total_available_hadith: self.total_available_hadith,
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Book {
    pub collection: String,
    #[serde(rename = "ourBookID")]
    #[sqlx(rename = "ourBookID")]
    pub our_book_id: i64,
    pub status: i32,
    pub english_book_name: String,
    pub arabic_book_name: String,
    pub first_number: i64,
    pub last_number: i64,
    pub total_number: i64,
}

impl Book {
    /// Status value of books visible through the API.
    pub const PUBLISHED: i32 = 4;

    pub fn book_number(&self) -> String {
        book_number::from_id(self.our_book_id)
    }
}

impl Entity for Book {
    const RESOURCE: Resource = Resource::Book;

    fn field(&self, field: Field) -> Option<Value> {
        match field {
            Field::Collection => Some(Value::Text(self.collection.clone())),
            Field::Status => Some(Value::Int(i64::from(self.status))),
            Field::BookId => Some(Value::Int(self.our_book_id)),
            _ => None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BookView<'a> {
    book_number: String,
    book: [BookText<'a>; 2],
    hadith_start_number: i64,
    hadith_end_number: i64,
    number_of_hadith: i64,
}

#[derive(Serialize)]
struct BookText<'a> {
    lang: &'static str,
    name: &'a str,
}

impl Serialize for Book {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BookView {
            book_number: self.book_number(),
            book: [
                BookText {
                    lang: EN,
                    name: &self.english_book_name,
                },
                BookText {
                    lang: AR,
                    name: &self.arabic_book_name,
                },
            ],
            hadith_start_number: self.first_number,
            hadith_end_number: self.last_number,
            number_of_hadith: self.total_number,
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Chapter {
    pub collection: String,
    #[serde(rename = "arabicBookID")]
    #[sqlx(rename = "arabicBookID")]
    pub arabic_book_id: i64,
    #[serde(rename = "babID")]
    #[sqlx(rename = "babID")]
    pub bab_id: f64,
    #[serde(default)]
    pub english_bab_number: Option<String>,
    #[serde(default)]
    pub arabic_bab_number: Option<String>,
    #[serde(default)]
    pub english_bab_name: Option<String>,
    #[serde(default)]
    pub arabic_bab_name: Option<String>,
    #[serde(default)]
    pub english_intro: Option<String>,
    #[serde(default)]
    pub arabic_intro: Option<String>,
    #[serde(default)]
    pub english_ending: Option<String>,
    #[serde(default)]
    pub arabic_ending: Option<String>,
}

impl Entity for Chapter {
    const RESOURCE: Resource = Resource::Chapter;

    fn field(&self, field: Field) -> Option<Value> {
        match field {
            Field::Collection => Some(Value::Text(self.collection.clone())),
            Field::BookId => Some(Value::Int(self.arabic_book_id)),
            Field::ChapterId => Some(Value::Float(self.bab_id)),
            _ => None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChapterView<'a> {
    book_number: String,
    chapter_id: f64,
    chapter: [ChapterText<'a>; 2],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChapterText<'a> {
    lang: &'static str,
    chapter_number: Option<&'a str>,
    chapter_title: Option<&'a str>,
    intro: Option<&'a str>,
    ending: Option<&'a str>,
}

impl Serialize for Chapter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ChapterView {
            book_number: book_number::from_id(self.arabic_book_id),
            chapter_id: self.bab_id,
            chapter: [
                ChapterText {
                    lang: EN,
                    chapter_number: self.english_bab_number.as_deref(),
                    chapter_title: self.english_bab_name.as_deref(),
                    intro: self.english_intro.as_deref(),
                    ending: self.english_ending.as_deref(),
                },
                ChapterText {
                    lang: AR,
                    chapter_number: self.arabic_bab_number.as_deref(),
                    chapter_title: self.arabic_bab_name.as_deref(),
                    intro: self.arabic_intro.as_deref(),
                    ending: self.arabic_ending.as_deref(),
                },
            ],
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Hadith {
    pub collection: String,
    pub book_number: String,
    #[serde(rename = "babID")]
    #[sqlx(rename = "babID")]
    pub bab_id: f64,
    pub hadith_number: String,
    #[serde(rename = "englishURN")]
    #[sqlx(rename = "englishURN")]
    pub english_urn: i64,
    #[serde(rename = "arabicURN")]
    #[sqlx(rename = "arabicURN")]
    pub arabic_urn: i64,
    #[serde(default)]
    pub english_bab_number: Option<String>,
    #[serde(default)]
    pub english_bab_name: Option<String>,
    pub english_text: String,
    #[serde(default)]
    pub english_grade: Option<String>,
    #[serde(default)]
    pub arabic_bab_number: Option<String>,
    #[serde(default)]
    pub arabic_bab_name: Option<String>,
    pub arabic_text: String,
    #[serde(default)]
    pub arabic_grade: Option<String>,
}

impl Entity for Hadith {
    const RESOURCE: Resource = Resource::Hadith;

    fn field(&self, field: Field) -> Option<Value> {
        match field {
            Field::Collection => Some(Value::Text(self.collection.clone())),
            Field::BookNumber => Some(Value::Text(self.book_number.clone())),
            Field::ChapterId => Some(Value::Float(self.bab_id)),
            Field::HadithNumber => Some(Value::Text(self.hadith_number.clone())),
            Field::EnglishUrn => Some(Value::Int(self.english_urn)),
            Field::ArabicUrn => Some(Value::Int(self.arabic_urn)),
            _ => None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HadithView<'a> {
    collection: &'a str,
    book_number: &'a str,
    chapter_id: f64,
    hadith_number: &'a str,
    hadith: [HadithText<'a>; 2],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HadithText<'a> {
    lang: &'static str,
    chapter_number: Option<&'a str>,
    chapter_title: Option<&'a str>,
    urn: i64,
    body: &'a str,
    grades: Vec<Grade<'a>>,
}

#[derive(Serialize)]
struct Grade<'a> {
    grade: &'a str,
}

fn grades(grade: Option<&str>) -> Vec<Grade<'_>> {
    grade.map(|grade| Grade { grade }).into_iter().collect()
}

impl Serialize for Hadith {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        HadithView {
            collection: &self.collection,
            book_number: &self.book_number,
            chapter_id: self.bab_id,
            hadith_number: &self.hadith_number,
            hadith: [
                HadithText {
                    lang: EN,
                    chapter_number: self.english_bab_number.as_deref(),
                    chapter_title: self.english_bab_name.as_deref(),
                    urn: self.english_urn,
                    body: &self.english_text,
                    grades: grades(self.english_grade.as_deref()),
                },
                HadithText {
                    lang: AR,
                    chapter_number: self.arabic_bab_number.as_deref(),
                    chapter_title: self.arabic_bab_name.as_deref(),
                    urn: self.arabic_urn,
                    body: &self.arabic_text,
                    grades: grades(self.arabic_grade.as_deref()),
                },
            ],
        }
        .serialize(serializer)
    }
}

/// Any record a store can return. Serializes as the wrapped entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Collection(Collection),
    Book(Book),
    Chapter(Chapter),
    Hadith(Hadith),
}

impl Record {
    pub fn resource(&self) -> Resource {
        match self {
            Record::Collection(_) => Collection::RESOURCE,
            Record::Book(_) => Book::RESOURCE,
            Record::Chapter(_) => Chapter::RESOURCE,
            Record::Hadith(_) => Hadith::RESOURCE,
        }
    }

    pub fn field(&self, field: Field) -> Option<Value> {
        match self {
            Record::Collection(c) => c.field(field),
            Record::Book(b) => b.field(field),
            Record::Chapter(c) => c.field(field),
            Record::Hadith(h) => h.field(field),
        }
    }

    pub fn as_hadith(&self) -> Option<&Hadith> {
        match self {
            Record::Hadith(h) => Some(h),
            _ => None,
        }
    }
}

impl From<Collection> for Record {
    fn from(c: Collection) -> Self {
        Record::Collection(c)
    }
}

impl From<Book> for Record {
    fn from(b: Book) -> Self {
        Record::Book(b)
    }
}

impl From<Chapter> for Record {
    fn from(c: Chapter) -> Self {
        Record::Chapter(c)
    }
}

impl From<Hadith> for Record {
    fn from(h: Hadith) -> Self {
        Record::Hadith(h)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn collection(id: i64, name: &str) -> Collection {
        Collection {
            collection_id: id,
            name: name.to_string(),
            has_books: true,
            has_chapters: true,
            english_title: format!("{name} (en)"),
            arabic_title: format!("{name} (ar)"),
            english_short_intro: None,
            arabic_short_intro: None,
            total_hadith: 10,
            total_available_hadith: 8,
        }
    }

    pub fn book(collection: &str, our_book_id: i64, status: i32) -> Book {
        Book {
            collection: collection.to_string(),
            our_book_id,
            status,
            english_book_name: format!("Book {our_book_id}"),
            arabic_book_name: format!("كتاب {our_book_id}"),
            first_number: 1,
            last_number: 7,
            total_number: 7,
        }
    }

    pub fn chapter(collection: &str, arabic_book_id: i64, bab_id: f64) -> Chapter {
        Chapter {
            collection: collection.to_string(),
            arabic_book_id,
            bab_id,
            english_bab_number: Some(bab_id.to_string()),
            arabic_bab_number: None,
            english_bab_name: Some(format!("Chapter {bab_id}")),
            arabic_bab_name: None,
            english_intro: None,
            arabic_intro: None,
            english_ending: None,
            arabic_ending: None,
        }
    }

    pub fn hadith(collection: &str, number: &str, english_urn: i64, arabic_urn: i64) -> Hadith {
        Hadith {
            collection: collection.to_string(),
            book_number: "1".to_string(),
            bab_id: 1.0,
            hadith_number: number.to_string(),
            english_urn,
            arabic_urn,
            english_bab_number: Some("1".to_string()),
            english_bab_name: Some("Revelation".to_string()),
            english_text: format!("english text {number}"),
            english_grade: Some("Sahih".to_string()),
            arabic_bab_number: Some("1".to_string()),
            arabic_bab_name: None,
            arabic_text: format!("arabic text {number}"),
            arabic_grade: None,
        }
    }
}
