//! Bulk lookup of hadiths by URN.
//!
//! A URN may belong to either numbering namespace, so one query matches the
//! English and Arabic URN columns together and the answer is re-assembled in
//! request order. Malformed identifiers fail the whole request; unmatched ones
//! are only reported.

use std::collections::{HashMap, HashSet};

use hadith_db::{Field, Hadith, Predicate, Query, Record, Resource, Store};
use hadith_http::{AppError, QueryParams};
use serde::Serialize;

pub const MAX_URNS: usize = 100;

const PARAM: &str = "urns";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrnLookup {
    /// Number of URNs that resolved.
    pub count: usize,
    pub missing: Vec<i64>,
    pub data: Vec<Hadith>,
}

/// Distinct URNs of the `urns` parameter in first-seen order.
pub fn parse_urns(params: &QueryParams) -> Result<Vec<i64>, AppError> {
    if params.get_all(PARAM).count() > 1 {
        return Err(AppError::bad_request(
            "Query parameter 'urns' must be provided exactly once. Example: ?urns=305,306",
        ));
    }

    let tokens: Vec<&str> = params
        .get(PARAM)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect();
    if tokens.is_empty() {
        return Err(AppError::bad_request(
            "Query parameter 'urns' is required. Example: ?urns=305,306",
        ));
    }

    let mut urns = Vec::with_capacity(tokens.len());
    let mut seen = HashSet::with_capacity(tokens.len());
    let mut invalid = Vec::new();
    for token in tokens {
        match token.parse::<i64>() {
            Ok(urn) => {
                if seen.insert(urn) {
                    urns.push(urn);
                }
            }
            Err(_) => invalid.push(token),
        }
    }

    if !invalid.is_empty() {
        return Err(AppError::bad_request(format!(
            "Invalid URN(s): {}",
            invalid.join(", ")
        )));
    }
    if urns.len() > MAX_URNS {
        return Err(AppError::bad_request(format!(
            "Too many URNs (max {MAX_URNS})."
        )));
    }

    Ok(urns)
}

/// Hadiths whose English or Arabic URN is among `urns`.
pub fn query(urns: &[i64]) -> Query {
    Query::select(Resource::Hadith).filter(Predicate::any([
        Predicate::is_in(Field::EnglishUrn, urns.iter().copied()),
        Predicate::is_in(Field::ArabicUrn, urns.iter().copied()),
    ]))
}

/// Match each requested URN against the fetched hadiths, English namespace
/// first.
pub fn resolve(urns: &[i64], hadiths: &[Hadith]) -> UrnLookup {
    let mut by_english = HashMap::with_capacity(hadiths.len());
    let mut by_arabic = HashMap::with_capacity(hadiths.len());
    for hadith in hadiths {
        by_english.insert(hadith.english_urn, hadith);
        by_arabic.insert(hadith.arabic_urn, hadith);
    }

    let mut data = Vec::new();
    let mut missing = Vec::new();
    for urn in urns {
        match by_english.get(urn).or_else(|| by_arabic.get(urn)) {
            Some(hadith) => data.push((*hadith).clone()),
            None => missing.push(*urn),
        }
    }

    UrnLookup {
        count: data.len(),
        missing,
        data,
    }
}

pub async fn lookup(store: &dyn Store, params: &QueryParams) -> Result<UrnLookup, AppError> {
    let urns = parse_urns(params)?;
    let hadiths: Vec<Hadith> = store
        .fetch(&query(&urns), None)
        .await?
        .into_iter()
        .filter_map(|record| match record {
            Record::Hadith(hadith) => Some(hadith),
            _ => None,
        })
        .collect();

    let lookup = resolve(&urns, &hadiths);
    tracing::debug!(
        requested = urns.len(),
        found = lookup.count,
        missing = lookup.missing.len(),
        "resolved urns"
    );
    Ok(lookup)
}
