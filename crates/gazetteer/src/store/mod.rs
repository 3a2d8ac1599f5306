//! The storage collaborator seam.
//!
//! The engine consumes, but does not own, an indexed store that can answer
//! case-insensitive substring queries over localized name columns (plus
//! joined alias rows), exact-code lookups, point-in-radius predicates with a
//! distance projection, and parent-scoped paginated listings.
//!
//! The near-identical per-type query logic is unified behind one generic
//! capability: [`EntitySearch<K>`], parameterized by the [`EntityKind`]
//! strategy trait (which fields are searchable names, which codes are
//! exact-match eligible, how the entity is scoped to a country). A store
//! implements the capability once, generically, and the umbrella
//! [`LocationStore`] trait instantiates it for the four searchable types.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{
    AliasTarget, City, Coordinates, Country, District, LocationKind, Poi, PoiType, Region,
};
use crate::rank::{RankSignals, Rankable};

pub use memory::{MemoryStore, MemoryStoreBuilder};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),
    #[error("storage query failed: {0}")]
    Query(#[source] anyhow::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A proximity constraint: entities within `radius_km` of `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    pub center: Coordinates,
    pub radius_km: f64,
}

/// One type-scoped text query. The term is pre-validated by the caller:
/// trimmed and non-empty (searchers fail fast before reaching the store).
#[derive(Debug, Clone)]
pub struct EntityQuery {
    pub term: String,
    /// ISO2 country scope. Ignored for country queries themselves.
    pub country_iso2: Option<String>,
    pub proximity: Option<Proximity>,
    pub limit: usize,
}

/// Importance signals projected by the store. For districts and POIs these
/// come from the owning city, mirroring how the backing indexes join.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Importance {
    pub is_major: bool,
    pub population: Option<u64>,
}

/// One matched record with its query-scoped projections.
#[derive(Debug, Clone)]
pub struct Hit<T> {
    pub record: T,
    /// Projected distance from the proximity center, when one was given.
    pub distance_km: Option<f64>,
    /// Term equalled a canonical/localized name or structured code.
    pub exact: bool,
    pub importance: Importance,
}

impl<T: EntityKind> Rankable for Hit<T> {
    fn rank_signals(&self) -> RankSignals<'_> {
        RankSignals {
            exact_match: self.exact,
            is_major: self.importance.is_major,
            population: self.importance.population,
            canonical_name: self.record.canonical_name(),
            distance_km: self.distance_km,
        }
    }
}

/// How an entity resolves to a country for scoping and importance joins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CountryLink<'a> {
    /// Country rows themselves; a country filter is a no-op.
    None,
    /// Directly owned by a country.
    Direct(&'a str),
    /// Owned via a city (districts, POIs).
    ViaCity(&'a str),
}

/// Type-specific search configuration: the strategy object instantiated once
/// per entity type instead of four hand-written query paths.
pub trait EntityKind: Clone + Send + Sync + 'static {
    const KIND: LocationKind;
    const ALIAS_TARGET: AliasTarget;

    fn id(&self) -> &str;
    /// Name used for deterministic ordering and exact-name matching.
    fn canonical_name(&self) -> &str;
    /// Every field that participates in substring matching.
    fn search_names(&self) -> Vec<&str>;
    /// Structured codes eligible for exact matching only.
    fn exact_codes(&self) -> Vec<&str> {
        Vec::new()
    }
    fn location(&self) -> Option<Coordinates>;
    fn country_link(&self) -> CountryLink<'_>;
    /// Own importance signals; the store substitutes the owning city's for
    /// [`CountryLink::ViaCity`] kinds.
    fn own_importance(&self) -> Importance {
        Importance::default()
    }
}

impl EntityKind for Country {
    const KIND: LocationKind = LocationKind::Country;
    const ALIAS_TARGET: AliasTarget = AliasTarget::Country;

    fn id(&self) -> &str {
        &self.id
    }

    fn canonical_name(&self) -> &str {
        self.names.canonical_or_en().unwrap_or_default()
    }

    fn search_names(&self) -> Vec<&str> {
        self.names.iter().collect()
    }

    fn exact_codes(&self) -> Vec<&str> {
        vec![&self.iso2, &self.iso3]
    }

    fn location(&self) -> Option<Coordinates> {
        None
    }

    fn country_link(&self) -> CountryLink<'_> {
        CountryLink::None
    }

    fn own_importance(&self) -> Importance {
        Importance {
            is_major: false,
            population: self.population,
        }
    }
}

impl EntityKind for City {
    const KIND: LocationKind = LocationKind::City;
    const ALIAS_TARGET: AliasTarget = AliasTarget::City;

    fn id(&self) -> &str {
        &self.id
    }

    fn canonical_name(&self) -> &str {
        self.names.canonical_or_en().unwrap_or_default()
    }

    fn search_names(&self) -> Vec<&str> {
        self.names.iter().chain([self.slug.as_str()]).collect()
    }

    fn location(&self) -> Option<Coordinates> {
        Some(self.location)
    }

    fn country_link(&self) -> CountryLink<'_> {
        CountryLink::Direct(&self.country_id)
    }

    fn own_importance(&self) -> Importance {
        Importance {
            is_major: self.is_major_city,
            population: self.population,
        }
    }
}

impl EntityKind for District {
    const KIND: LocationKind = LocationKind::District;
    const ALIAS_TARGET: AliasTarget = AliasTarget::District;

    fn id(&self) -> &str {
        &self.id
    }

    fn canonical_name(&self) -> &str {
        self.names.canonical_or_en().unwrap_or_default()
    }

    fn search_names(&self) -> Vec<&str> {
        self.names.iter().chain([self.slug.as_str()]).collect()
    }

    fn location(&self) -> Option<Coordinates> {
        self.location
    }

    fn country_link(&self) -> CountryLink<'_> {
        CountryLink::ViaCity(&self.city_id)
    }
}

impl EntityKind for Poi {
    const KIND: LocationKind = LocationKind::Poi;
    const ALIAS_TARGET: AliasTarget = AliasTarget::Poi;

    fn id(&self) -> &str {
        &self.id
    }

    fn canonical_name(&self) -> &str {
        &self.name
    }

    fn search_names(&self) -> Vec<&str> {
        vec![&self.name, &self.slug]
    }

    fn exact_codes(&self) -> Vec<&str> {
        self.iata_code
            .as_deref()
            .into_iter()
            .chain(self.icao_code.as_deref())
            .collect()
    }

    fn location(&self) -> Option<Coordinates> {
        Some(self.location)
    }

    fn country_link(&self) -> CountryLink<'_> {
        CountryLink::ViaCity(&self.city_id)
    }
}

/// The generic per-type search capability.
#[async_trait]
pub trait EntitySearch<K: EntityKind>: Send + Sync {
    /// Match `query.term` (case-insensitive substring) against the kind's
    /// searchable names and enabled aliases, plus exact structured codes;
    /// apply country scope and proximity; return candidates ordered by the
    /// backend's native ranking, truncated to `query.limit`.
    async fn search_entities(&self, query: &EntityQuery) -> StoreResult<Vec<Hit<K>>>;
}

/// Offset/limit window for listings.
#[derive(Debug, Clone, Copy)]
pub struct PageWindow {
    pub offset: usize,
    pub limit: usize,
}

/// A listing page plus the total match count before windowing.
#[derive(Debug, Clone)]
pub struct Listed<T> {
    pub items: Vec<T>,
    pub total: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CountryListFilter {
    pub continent_code: Option<String>,
    /// Substring over localized names, or exact ISO2/ISO3.
    pub term: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CityListFilter {
    pub country_iso2: Option<String>,
    pub region_id: Option<String>,
    pub is_major_city: Option<bool>,
    pub term: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PoiListFilter {
    pub city_id: Option<String>,
    pub poi_type: Option<PoiType>,
    pub term: Option<String>,
    pub proximity: Option<Proximity>,
}

/// Read-only snapshot interface over the backing directory store.
#[async_trait]
pub trait LocationStore:
    EntitySearch<Country>
    + EntitySearch<City>
    + EntitySearch<District>
    + EntitySearch<Poi>
    + Send
    + Sync
    + 'static
{
    async fn country_by_id(&self, id: &str) -> StoreResult<Option<Country>>;
    async fn city_by_id(&self, id: &str) -> StoreResult<Option<City>>;
    async fn region_by_id(&self, id: &str) -> StoreResult<Option<Region>>;

    /// Regions of a country, ordered by region code.
    async fn regions_of_country(&self, country_id: &str) -> StoreResult<Vec<Region>>;
    /// Major cities of a country, population descending.
    async fn major_cities_of_country(
        &self,
        country_id: &str,
        limit: usize,
    ) -> StoreResult<Vec<City>>;
    async fn districts_of_city(&self, city_id: &str, limit: usize) -> StoreResult<Vec<District>>;
    /// POIs of a city ordered by type.
    async fn pois_of_city(&self, city_id: &str, limit: usize) -> StoreResult<Vec<Poi>>;

    async fn list_countries(
        &self,
        filter: &CountryListFilter,
        window: PageWindow,
    ) -> StoreResult<Listed<Country>>;
    async fn list_cities(
        &self,
        filter: &CityListFilter,
        window: PageWindow,
    ) -> StoreResult<Listed<City>>;
    /// POI listing; rows carry a projected distance when the filter has a
    /// proximity constraint.
    async fn list_pois(
        &self,
        filter: &PoiListFilter,
        window: PageWindow,
    ) -> StoreResult<Listed<Hit<Poi>>>;
}
