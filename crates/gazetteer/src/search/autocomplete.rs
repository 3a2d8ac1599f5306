//! Typeahead suggestions.
//!
//! Autocomplete splits one small budget across the four entity types with a
//! fixed bias toward cities, runs the sub-searches concurrently, and absorbs
//! individual failures: a slow or broken type costs its quota, never the
//! whole response. Only when every sub-search fails is the operation itself
//! reported as unavailable.

use std::{future::Future, time::Duration};

use tracing::{instrument, warn};

use crate::{
    error::{GazetteerError, Result, ValidationError},
    model::{City, Country, District, Language, LocationKind, Poi},
    results::Suggestion,
    search::type_search::{
        self, TypeQuery, city_views, country_views, district_views, poi_views,
    },
    store::LocationStore,
};

/// Minimum post-trim term length for typeahead.
pub const MIN_TERM_LEN: usize = 2;

/// Per-type result quotas for one autocomplete budget.
///
/// Cities get the largest share because they dominate what people type into
/// a destination box; countries come second, districts and POIs share the
/// remainder. Quotas are ceilings of fractions, so every type keeps at least
/// one slot for any positive budget and the quota sum may exceed the budget;
/// the concatenated list is truncated back down at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quotas {
    pub country: usize,
    pub city: usize,
    pub district: usize,
    pub poi: usize,
}

/// Split a suggestion budget into per-type quotas.
#[must_use]
pub fn split_quotas(limit: usize) -> Quotas {
    Quotas {
        country: limit.div_ceil(4),
        city: limit.div_ceil(2),
        district: limit.div_ceil(6),
        poi: limit.div_ceil(6),
    }
}

/// Normalized autocomplete inputs (limit already defaulted and capped).
#[derive(Debug, Clone)]
pub(crate) struct AutocompleteQuery {
    pub term: String,
    pub country_iso2: Option<String>,
    pub language: Language,
    pub limit: usize,
    pub sub_search_timeout: Duration,
}

impl AutocompleteQuery {
    fn type_query(&self, quota: usize, scoped: bool) -> TypeQuery {
        TypeQuery {
            term: self.term.clone(),
            language: self.language,
            country_iso2: if scoped { self.country_iso2.clone() } else { None },
            proximity: None,
            limit: quota,
        }
    }
}

/// One absorbed sub-search, view assembly included: a failure or timeout
/// anywhere in it (the store query or a parent-context lookup) degrades to
/// an empty contribution for this type only.
async fn absorbed(
    kind: LocationKind,
    timeout: Duration,
    fut: impl Future<Output = Result<Vec<Suggestion>>>,
) -> Option<Vec<Suggestion>> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(suggestions)) => Some(suggestions),
        Ok(Err(error)) => {
            warn!(kind = %kind, %error, "autocomplete sub-search failed");
            None
        }
        Err(_) => {
            warn!(kind = %kind, "autocomplete sub-search timed out");
            None
        }
    }
}

/// Run autocomplete against `store`.
///
/// Suggestions come back grouped in fixed type order (countries, cities,
/// districts, POIs), each group ranked by the standard policy, truncated to
/// the overall budget.
#[instrument(name = "Autocomplete", level = "debug", skip(store, query), fields(term = %query.term))]
pub(crate) async fn autocomplete_inner<S: LocationStore>(
    store: &S,
    query: &AutocompleteQuery,
) -> Result<Vec<Suggestion>> {
    let term = query.term.trim();
    if term.is_empty() {
        return Err(ValidationError::EmptyTerm.into());
    }
    if term.chars().count() < MIN_TERM_LEN {
        return Err(ValidationError::TermTooShort { min: MIN_TERM_LEN }.into());
    }

    let quotas = split_quotas(query.limit);
    let timeout = query.sub_search_timeout;
    let language = query.language;

    let countries = absorbed(LocationKind::Country, timeout, async {
        let hits = type_search::search_kind::<Country, S>(
            store,
            &query.type_query(quotas.country, false),
        )
        .await?;
        let views = country_views(&hits, language)?;
        Ok(views
            .into_iter()
            .map(|view| Suggestion {
                kind: LocationKind::Country,
                id: view.id,
                display_name: view.display_name,
                slug: view.iso2.to_ascii_lowercase(),
                country_name: None,
                city_name: None,
            })
            .collect())
    });

    let cities = absorbed(LocationKind::City, timeout, async {
        let hits = type_search::search_kind::<City, S>(
            store,
            &query.type_query(quotas.city, true),
        )
        .await?;
        let views = city_views(store, &hits, language).await?;
        Ok(views
            .into_iter()
            .map(|view| {
                let country_name = view.country.map(|c| c.display_name);
                let display_name = match &country_name {
                    Some(country) => format!("{}, {country}", view.display_name),
                    None => view.display_name,
                };
                Suggestion {
                    kind: LocationKind::City,
                    id: view.id,
                    display_name,
                    slug: view.slug,
                    country_name,
                    city_name: None,
                }
            })
            .collect())
    });

    let districts = absorbed(LocationKind::District, timeout, async {
        let hits = type_search::search_kind::<District, S>(
            store,
            &query.type_query(quotas.district, true),
        )
        .await?;
        let views = district_views(store, &hits, language).await?;
        Ok(views
            .into_iter()
            .map(|view| {
                let city_name = view.city.map(|c| c.display_name);
                let display_name = match &city_name {
                    Some(city) => format!("{}, {city}", view.display_name),
                    None => view.display_name,
                };
                Suggestion {
                    kind: LocationKind::District,
                    id: view.id,
                    display_name,
                    slug: view.slug,
                    country_name: None,
                    city_name,
                }
            })
            .collect())
    });

    let pois = absorbed(LocationKind::Poi, timeout, async {
        let hits = type_search::search_kind::<Poi, S>(
            store,
            &query.type_query(quotas.poi, true),
        )
        .await?;
        let views = poi_views(store, &hits, language).await?;
        Ok(views
            .into_iter()
            .map(|view| Suggestion {
                kind: LocationKind::Poi,
                id: view.id,
                display_name: format!("{} ({})", view.display_name, view.poi_type.as_str()),
                slug: view.slug,
                country_name: None,
                city_name: view.city.map(|c| c.display_name),
            })
            .collect())
    });

    let (countries, cities, districts, pois) =
        tokio::join!(countries, cities, districts, pois);

    if countries.is_none() && cities.is_none() && districts.is_none() && pois.is_none() {
        return Err(GazetteerError::AutocompleteUnavailable);
    }

    let mut suggestions = Vec::with_capacity(query.limit);
    suggestions.extend(countries.unwrap_or_default());
    suggestions.extend(cities.unwrap_or_default());
    suggestions.extend(districts.unwrap_or_default());
    suggestions.extend(pois.unwrap_or_default());
    suggestions.truncate(query.limit);
    Ok(suggestions)
}
