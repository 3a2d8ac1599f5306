//! Gazetteer - Hierarchical Location Directory and Search Library
//!
//! Gazetteer is the read side of a multilingual location directory for
//! travel products: continents, countries, regions, cities, districts and
//! points of interest, searchable by localized names, aliases and structured
//! codes, with proximity filtering and typeahead suggestions.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use gazetteer::{LocationService, SearchRequest, store::MemoryStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), gazetteer::error::GazetteerError> {
//! let store = Arc::new(MemoryStore::builder().build());
//! let service = LocationService::new(store);
//!
//! // Federated search across countries, cities, districts and POIs
//! let results = service.search(&SearchRequest::new("berlin")).await?;
//! println!("{} total matches", results.total_results);
//! # Ok(())
//! # }
//! ```
//!
//! # Operations
//!
//! - **Search**: one term fanned out across all four entity types, each
//!   returning its own ranked list
//! - **Autocomplete**: a small suggestion budget split across the types with
//!   a fixed bias toward cities
//! - **Listings**: paginated country/city/POI browsing with filters
//! - **Details**: a country with its regions and major cities, a city with
//!   its districts and POIs
//!
//! Ranking is deterministic: exact matches first, then major-city status,
//! then population, then name; distance replaces all of that when a
//! proximity filter is active.

use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

pub mod error;
mod geo;
mod model;
mod paginate;
mod rank;
mod refdata;
mod results;
mod search;
mod service;
pub mod store;

pub use error::{GazetteerError, ValidationError};
pub use geo::{EARTH_RADIUS_KM, distance_km, within_radius};
pub use model::{
    Alias, AliasTarget, City, Continent, Coordinates, Country, District, Language, LocationKind,
    NameMap, Poi, PoiCategory, PoiType, Region,
};
pub use paginate::{MAX_PAGE_LIMIT, PageRequest, Paginated};
pub use refdata::{continent_by_code, continents};
pub use results::{
    CityDetail, CityRef, CityView, ContinentView, CountryDetail, CountryRef, CountryView,
    DistrictView, PoiView, RegionRef, RegionView, SearchResults, Suggestion,
};
pub use search::{MIN_TERM_LEN, Quotas, split_quotas};
pub use service::{
    AutocompleteRequest, CityListRequest, CountryListRequest, LocationService, PoiListRequest,
    SearchRequest, ServiceConfig, ServiceConfigBuilder,
};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the gazetteer library.
///
/// Call this once at the start of your application to enable structured
/// logging output from search and store operations. `RUST_LOG` overrides the
/// given level.
///
/// # Examples
///
/// ```rust
/// use gazetteer::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), gazetteer::error::GazetteerError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), GazetteerError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?;

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .init();
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::MemoryStore;

    fn setup_test_env() {
        let _ = init_logging(tracing::Level::WARN);
    }

    #[test]
    fn logging_initializes_once() {
        setup_test_env();
        assert!(init_logging(tracing::Level::INFO).is_ok());
    }

    #[tokio::test]
    async fn service_works_against_an_empty_store() {
        setup_test_env();

        let service = LocationService::new(Arc::new(MemoryStore::builder().build()));
        let results = service
            .search(&SearchRequest::new("anywhere"))
            .await
            .expect("search on an empty store should succeed");
        assert_eq!(results.total_results, 0);
        assert!(results.countries.is_empty(), "no seeded countries");
    }
}
