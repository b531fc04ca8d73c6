use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use hadith_db::{Book, Field, Order, Predicate, Query, Record, Resource, SharedStore};
use hadith_http::{paginate, single, AppError, Page, QueryParams};

use crate::utils::{book_id, chapter_segment};

type PageResult = Result<Json<Page<Record>>, AppError>;
type SingleResult = Result<Json<Record>, AppError>;

pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(list_collections))
        .route("/{name}", get(get_collection))
        .route("/{name}/books", get(list_books))
        .route("/{name}/books/{book_number}", get(get_book))
        .route("/{name}/books/{book_number}/hadiths", get(list_book_hadiths))
        .route("/{name}/books/{book_number}/chapters", get(list_chapters))
        .route(
            "/{name}/books/{book_number}/chapters/{chapter_id}",
            get(get_chapter),
        )
        .route("/{name}/hadiths/{hadith_number}", get(get_hadith))
        .with_state(store)
}

fn published_books(collection: &str) -> Query {
    Query::select(Resource::Book)
        .filter(Predicate::eq(Field::Collection, collection))
        .filter(Predicate::eq(Field::Status, Book::PUBLISHED))
}

fn book_chapters(collection: &str, book_number: &str) -> Result<Query, AppError> {
    Ok(Query::select(Resource::Chapter)
        .filter(Predicate::eq(Field::Collection, collection))
        .filter(Predicate::eq(Field::BookId, book_id(book_number)?)))
}

async fn list_collections(State(store): State<SharedStore>, params: QueryParams) -> PageResult {
    paginate(store.as_ref(), &params, || {
        Ok(Query::select(Resource::Collection).order_by(Order::Asc(Field::CollectionId)))
    })
    .await
}

async fn get_collection(State(store): State<SharedStore>, Path(name): Path<String>) -> SingleResult {
    single(store.as_ref(), || {
        Ok(Query::select(Resource::Collection).filter(Predicate::eq(Field::Collection, name.as_str())))
    })
    .await
}

async fn list_books(
    State(store): State<SharedStore>,
    Path(name): Path<String>,
    params: QueryParams,
) -> PageResult {
    paginate(store.as_ref(), &params, || {
        Ok(published_books(&name).order_by(Order::AbsAsc(Field::BookId)))
    })
    .await
}

async fn get_book(
    State(store): State<SharedStore>,
    Path((name, book_number)): Path<(String, String)>,
) -> SingleResult {
    single(store.as_ref(), || {
        Ok(published_books(&name).filter(Predicate::eq(Field::BookId, book_id(&book_number)?)))
    })
    .await
}

/// Hadith rows carry the display book number, so it is matched as given.
async fn list_book_hadiths(
    State(store): State<SharedStore>,
    Path((name, book_number)): Path<(String, String)>,
    params: QueryParams,
) -> PageResult {
    paginate(store.as_ref(), &params, || {
        Ok(Query::select(Resource::Hadith)
            .filter(Predicate::eq(Field::Collection, name.as_str()))
            .filter(Predicate::eq(Field::BookNumber, book_number.as_str()))
            .order_by(Order::Asc(Field::EnglishUrn)))
    })
    .await
}

async fn list_chapters(
    State(store): State<SharedStore>,
    Path((name, book_number)): Path<(String, String)>,
    params: QueryParams,
) -> PageResult {
    paginate(store.as_ref(), &params, || {
        Ok(book_chapters(&name, &book_number)?.order_by(Order::Asc(Field::ChapterId)))
    })
    .await
}

async fn get_chapter(
    State(store): State<SharedStore>,
    Path((name, book_number, chapter_id)): Path<(String, String, String)>,
) -> SingleResult {
    let chapter_id = chapter_segment(&chapter_id)?;
    single(store.as_ref(), || {
        Ok(book_chapters(&name, &book_number)?.filter(Predicate::eq(Field::ChapterId, chapter_id)))
    })
    .await
}

async fn get_hadith(
    State(store): State<SharedStore>,
    Path((name, hadith_number)): Path<(String, String)>,
) -> SingleResult {
    single(store.as_ref(), || {
        Ok(Query::select(Resource::Hadith)
            .filter(Predicate::eq(Field::Collection, name.as_str()))
            .filter(Predicate::eq(Field::HadithNumber, hadith_number.as_str())))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapter_queries_use_internal_book_id() {
        let query = book_chapters("bukhari", "introduction").unwrap();
        assert_eq!(
            query.predicates()[1],
            Predicate::eq(Field::BookId, -1_i64)
        );
        assert!(query.validate().is_ok());
    }

    #[test]
    fn malformed_book_numbers_are_rejected() {
        assert!(matches!(
            book_chapters("bukhari", "1b"),
            Err(AppError::BadRequest { .. })
        ));
    }

    #[test]
    fn book_listing_only_sees_published() {
        let query = published_books("muslim");
        assert!(query
            .predicates()
            .contains(&Predicate::eq(Field::Status, Book::PUBLISHED)));
    }
}
