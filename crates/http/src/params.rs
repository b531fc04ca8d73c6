//! Raw query-string access.
//!
//! Handlers need to see repeated parameters (`?urns=1&urns=2`) and to decide
//! per parameter how a malformed value is reported, so the query string is
//! kept as ordered pairs instead of being deserialized into a struct.

use std::fmt::Display;
use std::str::FromStr;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use crate::error::AppError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// First value supplied for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Every value supplied for `name`, in request order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First value for `name`, trimmed; `None` when absent or blank.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|value| !value.is_empty())
    }

    /// Parse the first non-blank value for `name`.
    pub fn parse<T>(&self, name: &str) -> Result<Option<T>, AppError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.non_empty(name)
            .map(|raw| {
                raw.parse::<T>().map_err(|err| {
                    AppError::bad_request(format!(
                        "Invalid value for query parameter '{name}': {raw} ({err})"
                    ))
                })
            })
            .transpose()
    }
}

impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        Ok(Self(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(uri: &str) -> Result<QueryParams, AppError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        QueryParams::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn keeps_repeated_parameters() {
        let params = extract("/v1/hadiths/urns?urns=1&urns=2&page=3").await.unwrap();
        assert_eq!(params.get("urns"), Some("1"));
        assert_eq!(params.get_all("urns").collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(params.get("missing"), None);
    }

    #[tokio::test]
    async fn decodes_percent_encoding() {
        let params = extract("/v1/hadiths/urns?urns=305%2C%20306").await.unwrap();
        assert_eq!(params.get("urns"), Some("305, 306"));
    }

    #[test]
    fn blank_values_are_absent() {
        let params = QueryParams::new([("collection", "  "), ("bookNumber", " 2 ")]);
        assert_eq!(params.non_empty("collection"), None);
        assert_eq!(params.non_empty("bookNumber"), Some("2"));
    }

    #[test]
    fn parse_reports_bad_values() {
        let params = QueryParams::new([("page", "two"), ("limit", "20")]);
        assert_eq!(params.parse::<i64>("limit").unwrap(), Some(20));
        assert_eq!(params.parse::<i64>("other").unwrap(), None);

        let err = params.parse::<i64>("page").unwrap_err();
        assert!(matches!(err, AppError::BadRequest { ref message } if message.contains("'page'")));
    }
}
