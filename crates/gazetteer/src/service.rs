//! The main service facade.
//!
//! [`LocationService`] wires request validation, the federated search engine,
//! autocomplete, paginated listings and detail reads on top of any
//! [`LocationStore`] implementation. It is generic over the store so the
//! engine compiles down to static dispatch; share it by cloning, the store
//! lives behind an [`Arc`].

use std::{sync::Arc, time::Duration};

use tracing::{info, instrument};

use crate::{
    error::{GazetteerError, Result, ValidationError},
    model::{Coordinates, Language, LocationKind, PoiType},
    paginate::{MAX_PAGE_LIMIT, PageRequest, Paginated},
    refdata,
    results::{
        CityDetail, CityView, ContinentView, CountryDetail, CountryView, PoiView, RegionView,
        SearchResults, Suggestion,
    },
    search::{
        aggregate::{self, FederatedQuery},
        autocomplete::{self, AutocompleteQuery},
        type_search::{self, ParentContext},
    },
    store::{CityListFilter, CountryListFilter, LocationStore, PageWindow, PoiListFilter, Proximity},
};

/// Major cities embedded in a country detail.
const DETAIL_MAJOR_CITIES: usize = 20;
/// Districts embedded in a city detail.
const DETAIL_DISTRICTS: usize = 50;
/// POIs embedded in a city detail.
const DETAIL_POIS: usize = 20;

/// Tunable limits and timeouts for a [`LocationService`].
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Per-type result cap for federated search when the request names none.
    pub default_limit: usize,
    /// Upper bound for explicit search limits.
    pub max_limit: usize,
    /// Radius applied when a proximity center arrives without one.
    pub default_radius_km: f64,
    pub min_radius_km: f64,
    pub max_radius_km: f64,
    /// Budget for each federated sub-search; exceeding it fails the search.
    pub sub_search_timeout: Duration,
    /// Budget for each autocomplete sub-search; exceeding it only costs that
    /// type's quota.
    pub autocomplete_timeout: Duration,
    /// Suggestion budget when the request names none (or names zero).
    pub autocomplete_default_limit: usize,
    /// Hard cap on the suggestion budget.
    pub autocomplete_max_limit: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: MAX_PAGE_LIMIT,
            default_radius_km: 50.0,
            min_radius_km: 1.0,
            max_radius_km: 1000.0,
            sub_search_timeout: Duration::from_secs(2),
            autocomplete_timeout: Duration::from_millis(800),
            autocomplete_default_limit: 10,
            autocomplete_max_limit: 20,
        }
    }
}

impl ServiceConfig {
    #[must_use]
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::new()
    }
}

/// Builder for creating service configurations with ergonomic defaults.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    /// Create a new builder with sensible defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ServiceConfig::default(),
        }
    }

    /// Create a builder tuned for interactive latency (smaller result sets,
    /// tight timeouts).
    #[must_use]
    pub fn fast() -> Self {
        let mut builder = Self::new();
        builder.config.default_limit = 10;
        builder.config.sub_search_timeout = Duration::from_millis(500);
        builder.config.autocomplete_timeout = Duration::from_millis(250);
        builder
    }

    /// Create a builder tuned for completeness (larger result sets, generous
    /// timeouts).
    #[must_use]
    pub fn comprehensive() -> Self {
        let mut builder = Self::new();
        builder.config.default_limit = 50;
        builder.config.sub_search_timeout = Duration::from_secs(5);
        builder.config.autocomplete_timeout = Duration::from_secs(2);
        builder
    }

    /// Set the default per-type result cap for federated search.
    #[must_use]
    pub fn default_limit(mut self, limit: usize) -> Self {
        self.config.default_limit = limit;
        self
    }

    /// Set the default proximity radius in kilometers.
    #[must_use]
    pub fn default_radius_km(mut self, radius_km: f64) -> Self {
        self.config.default_radius_km = radius_km;
        self
    }

    /// Set the per-sub-search timeout for federated search.
    #[must_use]
    pub fn sub_search_timeout(mut self, timeout: Duration) -> Self {
        self.config.sub_search_timeout = timeout;
        self
    }

    /// Set the per-sub-search timeout for autocomplete.
    #[must_use]
    pub fn autocomplete_timeout(mut self, timeout: Duration) -> Self {
        self.config.autocomplete_timeout = timeout;
        self
    }

    /// Build the final configuration.
    #[must_use]
    pub fn build(self) -> ServiceConfig {
        self.config
    }
}

/// One federated search request.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub term: String,
    /// Restrict the search to one entity type.
    pub kind: Option<LocationKind>,
    /// Scope city/district/POI sub-searches to one country.
    pub country_iso2: Option<String>,
    pub language: Language,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: Option<f64>,
    /// Per-type result cap; the configured default when absent.
    pub limit: Option<usize>,
}

impl SearchRequest {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            kind: None,
            country_iso2: None,
            language: Language::default(),
            lat: None,
            lng: None,
            radius_km: None,
            limit: None,
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: LocationKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn country(mut self, iso2: impl Into<String>) -> Self {
        self.country_iso2 = Some(iso2.into());
        self
    }

    #[must_use]
    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    #[must_use]
    pub fn near(mut self, lat: f64, lng: f64) -> Self {
        self.lat = Some(lat);
        self.lng = Some(lng);
        self
    }

    #[must_use]
    pub fn radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = Some(radius_km);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One typeahead request.
#[derive(Debug, Clone)]
pub struct AutocompleteRequest {
    pub term: String,
    pub country_iso2: Option<String>,
    pub language: Language,
    /// Suggestion budget; defaulted and capped by the service config. Zero
    /// means "use the default".
    pub limit: Option<usize>,
}

impl AutocompleteRequest {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            country_iso2: None,
            language: Language::default(),
            limit: None,
        }
    }

    #[must_use]
    pub fn country(mut self, iso2: impl Into<String>) -> Self {
        self.country_iso2 = Some(iso2.into());
        self
    }

    #[must_use]
    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Paginated country listing request.
#[derive(Debug, Clone, Default)]
pub struct CountryListRequest {
    pub continent_code: Option<String>,
    pub term: Option<String>,
    pub language: Language,
    pub page: PageRequest,
}

/// Paginated city listing request.
#[derive(Debug, Clone, Default)]
pub struct CityListRequest {
    pub country_iso2: Option<String>,
    pub region_id: Option<String>,
    pub is_major_city: Option<bool>,
    pub term: Option<String>,
    pub language: Language,
    pub page: PageRequest,
}

/// Paginated POI listing request.
#[derive(Debug, Clone, Default)]
pub struct PoiListRequest {
    pub city_id: Option<String>,
    pub poi_type: Option<PoiType>,
    pub term: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: Option<f64>,
    pub language: Language,
    pub page: PageRequest,
}

fn autocomplete_limit(config: &ServiceConfig, requested: Option<usize>) -> usize {
    match requested {
        None | Some(0) => config.autocomplete_default_limit,
        Some(limit) => limit.min(config.autocomplete_max_limit),
    }
}

/// The read-side location directory service.
pub struct LocationService<S> {
    store: Arc<S>,
    config: ServiceConfig,
}

impl<S> Clone for LocationService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: LocationStore> LocationService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, ServiceConfig::default())
    }

    pub fn with_config(store: Arc<S>, config: ServiceConfig) -> Self {
        info!(?config, "location service ready");
        Self { store, config }
    }

    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn search_limit(&self, requested: Option<usize>) -> Result<usize> {
        match requested {
            None => Ok(self.config.default_limit),
            Some(limit) if limit >= 1 && limit <= self.config.max_limit => Ok(limit),
            Some(limit) => Err(ValidationError::LimitOutOfRange {
                limit,
                max: self.config.max_limit,
            }
            .into()),
        }
    }

    /// Resolve an optional proximity constraint. A lone latitude or longitude
    /// is rejected; a radius without a center is ignored.
    fn proximity(
        &self,
        lat: Option<f64>,
        lng: Option<f64>,
        radius_km: Option<f64>,
    ) -> Result<Option<Proximity>> {
        let center = match (lat, lng) {
            (Some(lat), Some(lng)) => Coordinates::new(lat, lng)?,
            (None, None) => return Ok(None),
            (lat, lng) => {
                return Err(ValidationError::InvalidCoordinates {
                    lat: lat.unwrap_or(f64::NAN),
                    lng: lng.unwrap_or(f64::NAN),
                }
                .into());
            }
        };
        let radius_km = radius_km.unwrap_or(self.config.default_radius_km);
        if radius_km < self.config.min_radius_km || radius_km > self.config.max_radius_km {
            return Err(ValidationError::RadiusOutOfRange {
                radius_km,
                min: self.config.min_radius_km,
                max: self.config.max_radius_km,
            }
            .into());
        }
        Ok(Some(Proximity { center, radius_km }))
    }

    /// Federated search across all (or one filtered) entity types.
    #[instrument(name = "Search", level = "info", skip(self, request), fields(term = %request.term))]
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResults> {
        let query = FederatedQuery {
            term: request.term.clone(),
            kind: request.kind,
            country_iso2: request.country_iso2.clone(),
            proximity: self.proximity(request.lat, request.lng, request.radius_km)?,
            language: request.language,
            limit: self.search_limit(request.limit)?,
            sub_search_timeout: self.config.sub_search_timeout,
        };
        aggregate::federated_search_inner(self.store.as_ref(), &query).await
    }

    /// Typeahead suggestions across all entity types.
    #[instrument(name = "Autocomplete", level = "info", skip(self, request), fields(term = %request.term))]
    pub async fn autocomplete(&self, request: &AutocompleteRequest) -> Result<Vec<Suggestion>> {
        let query = AutocompleteQuery {
            term: request.term.clone(),
            country_iso2: request.country_iso2.clone(),
            language: request.language,
            limit: autocomplete_limit(&self.config, request.limit),
            sub_search_timeout: self.config.autocomplete_timeout,
        };
        autocomplete::autocomplete_inner(self.store.as_ref(), &query).await
    }

    /// Paginated country listing, localized-name ascending.
    #[instrument(name = "List Countries", level = "debug", skip(self, request))]
    pub async fn list_countries(
        &self,
        request: &CountryListRequest,
    ) -> Result<Paginated<CountryView>> {
        request.page.validate()?;
        let filter = CountryListFilter {
            continent_code: request.continent_code.clone(),
            term: request.term.clone(),
        };
        let listed = self
            .store
            .list_countries(&filter, window(request.page))
            .await?;
        let data = listed
            .items
            .iter()
            .map(|country| type_search::country_view(country, request.language))
            .collect::<Result<Vec<_>>>()?;
        Ok(Paginated::build(data, listed.total, request.page))
    }

    /// Paginated city listing, major cities first, then population.
    #[instrument(name = "List Cities", level = "debug", skip(self, request))]
    pub async fn list_cities(&self, request: &CityListRequest) -> Result<Paginated<CityView>> {
        request.page.validate()?;
        let filter = CityListFilter {
            country_iso2: request.country_iso2.clone(),
            region_id: request.region_id.clone(),
            is_major_city: request.is_major_city,
            term: request.term.clone(),
        };
        let listed = self.store.list_cities(&filter, window(request.page)).await?;

        let store = self.store.as_ref();
        let mut context = ParentContext::default();
        let mut data = Vec::with_capacity(listed.items.len());
        for city in &listed.items {
            data.push(type_search::city_view(store, &mut context, city, None, request.language).await?);
        }
        Ok(Paginated::build(data, listed.total, request.page))
    }

    /// Paginated POI listing; distance-ordered when a proximity filter is
    /// given, type-then-name otherwise.
    #[instrument(name = "List POIs", level = "debug", skip(self, request))]
    pub async fn list_pois(&self, request: &PoiListRequest) -> Result<Paginated<PoiView>> {
        request.page.validate()?;
        let filter = PoiListFilter {
            city_id: request.city_id.clone(),
            poi_type: request.poi_type,
            term: request.term.clone(),
            proximity: self.proximity(request.lat, request.lng, request.radius_km)?,
        };
        let listed = self.store.list_pois(&filter, window(request.page)).await?;

        let store = self.store.as_ref();
        let mut context = ParentContext::default();
        let mut data = Vec::with_capacity(listed.items.len());
        for hit in &listed.items {
            data.push(
                type_search::poi_view(
                    store,
                    &mut context,
                    &hit.record,
                    hit.distance_km,
                    request.language,
                )
                .await?,
            );
        }
        Ok(Paginated::build(data, listed.total, request.page))
    }

    /// Country detail: the country plus its regions and top major cities.
    #[instrument(name = "Country Detail", level = "debug", skip(self))]
    pub async fn country_by_id(&self, id: &str, language: Language) -> Result<CountryDetail> {
        let country = self
            .store
            .country_by_id(id)
            .await?
            .ok_or_else(|| GazetteerError::not_found(LocationKind::Country, id))?;

        let regions = self.store.regions_of_country(&country.id).await?;
        let major_cities = self
            .store
            .major_cities_of_country(&country.id, DETAIL_MAJOR_CITIES)
            .await?;

        let regions = regions
            .iter()
            .map(|region| {
                Ok(RegionView {
                    id: region.id.clone(),
                    code: region.code.clone(),
                    display_name: region.names.resolve(language)?.to_string(),
                    names: region.names.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let store = self.store.as_ref();
        let mut context = ParentContext::default();
        let mut cities = Vec::with_capacity(major_cities.len());
        for city in &major_cities {
            cities.push(type_search::city_view(store, &mut context, city, None, language).await?);
        }

        Ok(CountryDetail {
            country: type_search::country_view(&country, language)?,
            regions,
            major_cities: cities,
        })
    }

    /// City detail: the city plus its districts and POIs grouped by type.
    #[instrument(name = "City Detail", level = "debug", skip(self))]
    pub async fn city_by_id(&self, id: &str, language: Language) -> Result<CityDetail> {
        let city = self
            .store
            .city_by_id(id)
            .await?
            .ok_or_else(|| GazetteerError::not_found(LocationKind::City, id))?;

        let (districts, pois) = tokio::try_join!(
            self.store.districts_of_city(&city.id, DETAIL_DISTRICTS),
            self.store.pois_of_city(&city.id, DETAIL_POIS),
        )?;

        let store = self.store.as_ref();
        let mut context = ParentContext::default();
        let city_view = type_search::city_view(store, &mut context, &city, None, language).await?;

        let mut district_views = Vec::with_capacity(districts.len());
        for district in &districts {
            district_views
                .push(type_search::district_view(store, &mut context, district, language).await?);
        }
        let mut poi_views = Vec::with_capacity(pois.len());
        for poi in &pois {
            poi_views.push(type_search::poi_view(store, &mut context, poi, None, language).await?);
        }

        Ok(CityDetail {
            city: city_view,
            districts: district_views,
            pois: poi_views,
        })
    }

    /// The seven continents, localized.
    pub fn continents(&self, language: Language) -> Result<Vec<ContinentView>> {
        refdata::continents()
            .iter()
            .map(|continent| {
                Ok(ContinentView {
                    code: continent.code.clone(),
                    display_name: continent.names.resolve(language)?.to_string(),
                })
            })
            .collect()
    }
}

fn window(page: PageRequest) -> PageWindow {
    PageWindow {
        offset: page.offset(),
        limit: page.limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> LocationService<MemoryStore> {
        LocationService::new(Arc::new(MemoryStore::builder().build()))
    }

    #[test]
    fn builder_presets_diverge_where_it_matters() {
        let fast = ServiceConfigBuilder::fast().build();
        let comprehensive = ServiceConfigBuilder::comprehensive().build();
        assert!(fast.default_limit < comprehensive.default_limit);
        assert!(fast.sub_search_timeout < comprehensive.sub_search_timeout);
        assert!(fast.autocomplete_timeout < comprehensive.autocomplete_timeout);
        assert_eq!(fast.default_radius_km, comprehensive.default_radius_km);
    }

    #[test]
    fn builder_setters_override_defaults() {
        let config = ServiceConfig::builder()
            .default_limit(7)
            .default_radius_km(25.0)
            .sub_search_timeout(Duration::from_millis(123))
            .build();
        assert_eq!(config.default_limit, 7);
        assert_eq!(config.default_radius_km, 25.0);
        assert_eq!(config.sub_search_timeout, Duration::from_millis(123));
        assert_eq!(config.max_limit, MAX_PAGE_LIMIT);
    }

    #[test]
    fn autocomplete_limit_defaults_and_caps() {
        let config = ServiceConfig::default();
        assert_eq!(autocomplete_limit(&config, None), 10);
        assert_eq!(autocomplete_limit(&config, Some(0)), 10);
        assert_eq!(autocomplete_limit(&config, Some(5)), 5);
        assert_eq!(autocomplete_limit(&config, Some(20)), 20);
        assert_eq!(autocomplete_limit(&config, Some(50)), 20);
    }

    #[tokio::test]
    async fn lone_latitude_is_rejected() {
        let service = service();
        let request = SearchRequest {
            lat: Some(52.52),
            ..SearchRequest::new("berlin")
        };
        let result = service.search(&request).await;
        assert!(matches!(
            result,
            Err(GazetteerError::Validation(
                ValidationError::InvalidCoordinates { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn out_of_range_radius_is_rejected() {
        let service = service();
        let request = SearchRequest::new("berlin").near(52.52, 13.405).radius_km(1500.0);
        let result = service.search(&request).await;
        assert!(matches!(
            result,
            Err(GazetteerError::Validation(
                ValidationError::RadiusOutOfRange { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn explicit_limit_is_bounded() {
        let service = service();
        let result = service.search(&SearchRequest::new("berlin").limit(101)).await;
        assert!(matches!(
            result,
            Err(GazetteerError::Validation(
                ValidationError::LimitOutOfRange { limit: 101, .. }
            ))
        ));
        let result = service.search(&SearchRequest::new("berlin").limit(0)).await;
        assert!(matches!(
            result,
            Err(GazetteerError::Validation(
                ValidationError::LimitOutOfRange { limit: 0, .. }
            ))
        ));
    }

    #[tokio::test]
    async fn missing_detail_reads_are_not_found() {
        let service = service();
        let result = service.country_by_id("co-missing", Language::En).await;
        assert!(matches!(
            result,
            Err(GazetteerError::NotFound {
                kind: LocationKind::Country,
                ..
            })
        ));
        let result = service.city_by_id("ci-missing", Language::En).await;
        assert!(matches!(
            result,
            Err(GazetteerError::NotFound {
                kind: LocationKind::City,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn continents_localize() {
        let service = service();
        let continents = service.continents(Language::De).unwrap();
        assert_eq!(continents.len(), 7);
        assert!(continents.iter().any(|c| c.display_name == "Europa"));
    }
}
