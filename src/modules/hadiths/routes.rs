use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use hadith_db::{Field, Order, Predicate, Query, Record, Resource, SharedStore};
use hadith_http::{paginate, single, AppError, Page, QueryParams};

use super::filters::HadithFilters;
use super::resolver::{self, UrnLookup};
use crate::utils::path_segment;

#[derive(Clone)]
pub struct HadithsState {
    pub store: SharedStore,
    /// Collection the random route samples from.
    pub random_collection: Arc<str>,
}

pub fn router(state: HadithsState) -> Router {
    Router::new()
        .route("/", get(list_hadiths))
        .route("/urns", get(hadiths_by_urns))
        .route("/random", get(random_hadith))
        .route("/{urn}", get(get_hadith))
        .with_state(state)
}

async fn list_hadiths(
    State(state): State<HadithsState>,
    params: QueryParams,
) -> Result<Json<Page<Record>>, AppError> {
    paginate(state.store.as_ref(), &params, || {
        Ok(HadithFilters::from_query(&params)?.query())
    })
    .await
}

/// A URN may be either the English or the Arabic one.
async fn get_hadith(
    State(state): State<HadithsState>,
    Path(urn): Path<String>,
) -> Result<Json<Record>, AppError> {
    let urn: i64 = path_segment(&urn)?;
    single(state.store.as_ref(), || {
        Ok(Query::select(Resource::Hadith).filter(Predicate::any([
            Predicate::eq(Field::ArabicUrn, urn),
            Predicate::eq(Field::EnglishUrn, urn),
        ])))
    })
    .await
}

async fn hadiths_by_urns(
    State(state): State<HadithsState>,
    params: QueryParams,
) -> Result<Json<UrnLookup>, AppError> {
    resolver::lookup(state.store.as_ref(), &params).await.map(Json)
}

async fn random_hadith(State(state): State<HadithsState>) -> Result<Json<Record>, AppError> {
    single(state.store.as_ref(), || {
        Ok(Query::select(Resource::Hadith)
            .filter(Predicate::eq(Field::Collection, &*state.random_collection))
            .order_by(Order::Random))
    })
    .await
}
