//! Multi-type federated search.
//!
//! Fans the request out to each entity type not excluded by the type
//! filter. Every sub-search gets the full requested limit: results are not
//! merged into one globally ranked list, each type returns its own ranked,
//! capped list. Sub-searches run concurrently; a failure or timeout on any
//! requested type aborts the whole call, because a caller who explicitly
//! asked for a type must not receive a silently empty list for it.

use std::{future::Future, time::Duration};

use tracing::instrument;

use crate::{
    error::{GazetteerError, Result},
    model::{City, Country, District, Language, LocationKind, Poi},
    results::SearchResults,
    search::type_search::{
        self, TypeQuery, city_views, country_views, district_views, poi_views,
    },
    store::{LocationStore, Proximity},
};

/// Normalized federated-search inputs (validation already applied).
#[derive(Debug, Clone)]
pub(crate) struct FederatedQuery {
    pub term: String,
    pub kind: Option<LocationKind>,
    pub country_iso2: Option<String>,
    pub proximity: Option<Proximity>,
    pub language: Language,
    pub limit: usize,
    pub sub_search_timeout: Duration,
}

impl FederatedQuery {
    fn wants(&self, kind: LocationKind) -> bool {
        self.kind.is_none_or(|filter| filter == kind)
    }

    fn type_query(&self, proximity: bool, scoped: bool) -> TypeQuery {
        TypeQuery {
            term: self.term.clone(),
            language: self.language,
            // The country filter scopes city/district/poi sub-searches but
            // is a no-op on the country sub-search itself.
            country_iso2: if scoped { self.country_iso2.clone() } else { None },
            proximity: if proximity { self.proximity } else { None },
            limit: self.limit,
        }
    }
}

async fn timed<T>(
    kind: LocationKind,
    timeout: Duration,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| GazetteerError::SubSearchTimeout { kind, timeout })?
}

/// Run the federated search against `store`.
#[instrument(name = "Federated Search", level = "debug", skip(store, query), fields(term = %query.term))]
pub(crate) async fn federated_search_inner<S: LocationStore>(
    store: &S,
    query: &FederatedQuery,
) -> Result<SearchResults> {
    let timeout = query.sub_search_timeout;

    let countries = async {
        if !query.wants(LocationKind::Country) {
            return Ok(Vec::new());
        }
        timed(LocationKind::Country, timeout, async {
            let hits = type_search::search_kind::<Country, _>(
                store,
                &query.type_query(false, false),
            )
            .await?;
            country_views(&hits, query.language)
        })
        .await
    };

    let cities = async {
        if !query.wants(LocationKind::City) {
            return Ok(Vec::new());
        }
        timed(LocationKind::City, timeout, async {
            let hits =
                type_search::search_kind::<City, _>(store, &query.type_query(true, true)).await?;
            city_views(store, &hits, query.language).await
        })
        .await
    };

    let districts = async {
        if !query.wants(LocationKind::District) {
            return Ok(Vec::new());
        }
        timed(LocationKind::District, timeout, async {
            let hits = type_search::search_kind::<District, _>(
                store,
                &query.type_query(false, true),
            )
            .await?;
            district_views(store, &hits, query.language).await
        })
        .await
    };

    let pois = async {
        if !query.wants(LocationKind::Poi) {
            return Ok(Vec::new());
        }
        timed(LocationKind::Poi, timeout, async {
            let hits =
                type_search::search_kind::<Poi, _>(store, &query.type_query(true, true)).await?;
            poi_views(store, &hits, query.language).await
        })
        .await
    };

    let (countries, cities, districts, pois) =
        tokio::try_join!(countries, cities, districts, pois)?;

    Ok(SearchResults {
        countries,
        cities,
        districts,
        pois,
        total_results: 0,
    }
    .finish())
}
