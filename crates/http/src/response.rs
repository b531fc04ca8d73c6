//! Response shaping: turn a query descriptor into either a page of records
//! with navigation metadata or exactly one record.

use axum::Json;
use hadith_db::{Query, Record, Store, Window};
use serde::Serialize;

use crate::error::AppError;
use crate::params::QueryParams;

pub const DEFAULT_LIMIT: u64 = 50;
pub const MAX_LIMIT: u64 = 100;

/// Validated `page`/`limit` pair of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u64,
    pub limit: u64,
}

impl PageParams {
    /// Read `page` (default 1) and `limit` (default 50, clamped to 100).
    pub fn from_query(params: &QueryParams) -> Result<Self, AppError> {
        let page = positive(params, "page")?.unwrap_or(1);
        let limit = positive(params, "limit")?
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);
        Ok(Self { page, limit })
    }

    pub fn window(&self) -> Window {
        Window::page(self.page, self.limit)
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn positive(params: &QueryParams, name: &str) -> Result<Option<u64>, AppError> {
    match params.parse::<i64>(name)? {
        Some(value) if value >= 1 => Ok(Some(value.unsigned_abs())),
        Some(value) => Err(AppError::bad_request(format!(
            "Query parameter '{name}' must be a positive integer, got {value}"
        ))),
        None => Ok(None),
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub limit: u64,
    pub previous: Option<u64>,
    pub next: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: u64, params: PageParams) -> Self {
        let PageParams { page, limit } = params;
        let pages = total.div_ceil(limit);
        Self {
            data,
            total,
            limit,
            previous: (page > 1).then(|| page - 1),
            next: (page < pages).then(|| page + 1),
        }
    }
}

/// Run the descriptor produced by `build` as a paginated listing.
///
/// Issues one count query and one windowed query. A page past the first with
/// no records is `NotFound`.
pub async fn paginate<F>(
    store: &dyn Store,
    params: &QueryParams,
    build: F,
) -> Result<Json<Page<Record>>, AppError>
where
    F: FnOnce() -> Result<Query, AppError> + Send,
{
    let page = PageParams::from_query(params)?;
    let query = build()?;

    let total = store.count(&query).await?;
    let data = store.fetch(&query, Some(page.window())).await?;
    if data.is_empty() && page.page > 1 {
        return Err(AppError::not_found());
    }

    tracing::debug!(
        resource = %query.resource(),
        total,
        page = page.page,
        returned = data.len(),
        "paginated"
    );
    Ok(Json(Page::new(data, total, page)))
}

/// Run the descriptor produced by `build` and return its first record.
pub async fn single<F>(store: &dyn Store, build: F) -> Result<Json<Record>, AppError>
where
    F: FnOnce() -> Result<Query, AppError> + Send,
{
    let query = build()?;
    store
        .fetch(&query, Some(Window::first()))
        .await?
        .into_iter()
        .next()
        .map(Json)
        .ok_or_else(AppError::not_found)
}
