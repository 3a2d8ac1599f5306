//! The generic type-scoped searcher.
//!
//! One code path serves all four entity types: validate the term before any
//! store access, query the store through the [`EntitySearch`] capability,
//! apply the deterministic ranking policy, and assemble localized views with
//! read-only parent context. Parent links are resolved on demand from the
//! store and cached per request; they never form in-memory cycles.

use ahash::AHashMap;
use tracing::debug;

use crate::{
    error::{Result, ValidationError},
    model::{City, Country, District, Language, Poi, Region},
    rank, refdata,
    results::{CityRef, CityView, CountryRef, CountryView, DistrictView, PoiView, RegionRef},
    store::{EntityKind, EntityQuery, EntitySearch, Hit, LocationStore, Proximity},
};

/// Normalized inputs for one type-scoped search.
#[derive(Debug, Clone)]
pub(crate) struct TypeQuery {
    pub term: String,
    pub language: Language,
    pub country_iso2: Option<String>,
    pub proximity: Option<Proximity>,
    pub limit: usize,
}

/// Search one entity type: validate, query, rank.
///
/// An empty post-trim term is rejected before any repository call; a zero
/// limit short-circuits to an empty list without touching the store.
pub(crate) async fn search_kind<K, S>(store: &S, query: &TypeQuery) -> Result<Vec<Hit<K>>>
where
    K: EntityKind,
    S: EntitySearch<K> + ?Sized,
{
    let term = query.term.trim();
    if term.is_empty() {
        return Err(ValidationError::EmptyTerm.into());
    }
    if query.limit == 0 {
        return Ok(Vec::new());
    }

    let entity_query = EntityQuery {
        term: term.to_string(),
        country_iso2: query
            .country_iso2
            .as_deref()
            .map(str::to_ascii_uppercase),
        proximity: query.proximity,
        limit: query.limit,
    };
    let mut hits = store.search_entities(&entity_query).await?;

    // The store already orders natively before truncating; re-ranking here
    // pins down the documented policy independent of the backend.
    rank::rank(&mut hits, query.proximity.is_some());
    hits.truncate(query.limit);

    debug!(kind = %K::KIND, term, hits = hits.len(), "type search complete");
    Ok(hits)
}

/// Per-request cache of parent lookups.
#[derive(Default)]
pub(crate) struct ParentContext {
    countries: AHashMap<String, Option<Country>>,
    regions: AHashMap<String, Option<Region>>,
    cities: AHashMap<String, Option<City>>,
}

impl ParentContext {
    pub(crate) async fn country<S: LocationStore + ?Sized>(
        &mut self,
        store: &S,
        id: &str,
    ) -> Result<Option<&Country>> {
        if !self.countries.contains_key(id) {
            let fetched = store.country_by_id(id).await?;
            self.countries.insert(id.to_string(), fetched);
        }
        Ok(self.countries[id].as_ref())
    }

    async fn region<S: LocationStore + ?Sized>(
        &mut self,
        store: &S,
        id: &str,
    ) -> Result<Option<&Region>> {
        if !self.regions.contains_key(id) {
            let fetched = store.region_by_id(id).await?;
            self.regions.insert(id.to_string(), fetched);
        }
        Ok(self.regions[id].as_ref())
    }

    async fn city<S: LocationStore + ?Sized>(
        &mut self,
        store: &S,
        id: &str,
    ) -> Result<Option<&City>> {
        if !self.cities.contains_key(id) {
            let fetched = store.city_by_id(id).await?;
            self.cities.insert(id.to_string(), fetched);
        }
        Ok(self.cities[id].as_ref())
    }
}

pub(crate) fn country_view(country: &Country, language: Language) -> Result<CountryView> {
    let display_name = country.names.resolve(language)?.to_string();
    let continent_code = refdata::continents()
        .iter()
        .find(|c| c.id == country.continent_id)
        .map(|c| c.code.clone());
    Ok(CountryView {
        id: country.id.clone(),
        iso2: country.iso2.clone(),
        iso3: country.iso3.clone(),
        display_name,
        names: country.names.clone(),
        name_official: country.name_official.clone(),
        capital: country.capital.clone(),
        currency_code: country.currency_code.clone(),
        phone_code: country.phone_code.clone(),
        population: country.population,
        timezones: country.timezones.clone(),
        continent_code,
    })
}

pub(crate) fn country_views(hits: &[Hit<Country>], language: Language) -> Result<Vec<CountryView>> {
    hits.iter()
        .map(|hit| country_view(&hit.record, language))
        .collect()
}

pub(crate) async fn city_view<S: LocationStore + ?Sized>(
    store: &S,
    context: &mut ParentContext,
    city: &City,
    distance_km: Option<f64>,
    language: Language,
) -> Result<CityView> {
    let display_name = city.names.resolve(language)?.to_string();

    let country = match context.country(store, &city.country_id).await? {
        Some(country) => Some(CountryRef {
            id: country.id.clone(),
            iso2: country.iso2.clone(),
            display_name: country.names.resolve(language)?.to_string(),
        }),
        None => None,
    };
    let region = match &city.region_id {
        Some(region_id) => context.region(store, region_id).await?.map(|region| {
            Ok::<_, crate::error::GazetteerError>(RegionRef {
                id: region.id.clone(),
                code: region.code.clone(),
                display_name: region.names.resolve(language)?.to_string(),
            })
        }),
        None => None,
    }
    .transpose()?;

    Ok(CityView {
        id: city.id.clone(),
        slug: city.slug.clone(),
        display_name,
        names: city.names.clone(),
        population: city.population,
        timezone: city.timezone.clone(),
        is_capital: city.is_capital,
        is_major_city: city.is_major_city,
        latitude: city.location.lat,
        longitude: city.location.lng,
        distance_km,
        country,
        region,
    })
}

pub(crate) async fn city_views<S: LocationStore + ?Sized>(
    store: &S,
    hits: &[Hit<City>],
    language: Language,
) -> Result<Vec<CityView>> {
    let mut context = ParentContext::default();
    let mut views = Vec::with_capacity(hits.len());
    for hit in hits {
        views.push(city_view(store, &mut context, &hit.record, hit.distance_km, language).await?);
    }
    Ok(views)
}

pub(crate) async fn district_view<S: LocationStore + ?Sized>(
    store: &S,
    context: &mut ParentContext,
    district: &District,
    language: Language,
) -> Result<DistrictView> {
    let display_name = district.names.resolve(language)?.to_string();
    let city = match context.city(store, &district.city_id).await? {
        Some(city) => Some(CityRef {
            id: city.id.clone(),
            slug: city.slug.clone(),
            display_name: city.names.resolve(language)?.to_string(),
        }),
        None => None,
    };
    Ok(DistrictView {
        id: district.id.clone(),
        slug: district.slug.clone(),
        display_name,
        names: district.names.clone(),
        latitude: district.location.map(|l| l.lat),
        longitude: district.location.map(|l| l.lng),
        city,
    })
}

pub(crate) async fn district_views<S: LocationStore + ?Sized>(
    store: &S,
    hits: &[Hit<District>],
    language: Language,
) -> Result<Vec<DistrictView>> {
    let mut context = ParentContext::default();
    let mut views = Vec::with_capacity(hits.len());
    for hit in hits {
        views.push(district_view(store, &mut context, &hit.record, language).await?);
    }
    Ok(views)
}

pub(crate) async fn poi_view<S: LocationStore + ?Sized>(
    store: &S,
    context: &mut ParentContext,
    poi: &Poi,
    distance_km: Option<f64>,
    language: Language,
) -> Result<PoiView> {
    let city = match context.city(store, &poi.city_id).await? {
        Some(city) => Some(CityRef {
            id: city.id.clone(),
            slug: city.slug.clone(),
            display_name: city.names.resolve(language)?.to_string(),
        }),
        None => None,
    };
    Ok(PoiView {
        id: poi.id.clone(),
        slug: poi.slug.clone(),
        display_name: poi.name.clone(),
        poi_type: poi.poi_type,
        category: poi.poi_type.category(),
        description_short: poi.description_short.clone(),
        iata_code: poi.iata_code.clone(),
        icao_code: poi.icao_code.clone(),
        latitude: poi.location.lat,
        longitude: poi.location.lng,
        distance_km,
        city,
    })
}

pub(crate) async fn poi_views<S: LocationStore + ?Sized>(
    store: &S,
    hits: &[Hit<Poi>],
    language: Language,
) -> Result<Vec<PoiView>> {
    let mut context = ParentContext::default();
    let mut views = Vec::with_capacity(hits.len());
    for hit in hits {
        views.push(poi_view(store, &mut context, &hit.record, hit.distance_km, language).await?);
    }
    Ok(views)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::GazetteerError,
        model::{Coordinates, NameMap},
        store::MemoryStore,
    };

    fn empty_store() -> MemoryStore {
        MemoryStore::builder().build()
    }

    #[tokio::test]
    async fn empty_terms_fail_before_the_store() {
        let store = empty_store();
        let query = TypeQuery {
            term: "   ".into(),
            language: Language::En,
            country_iso2: None,
            proximity: None,
            limit: 10,
        };
        let result: Result<Vec<Hit<Country>>> = search_kind(&store, &query).await;
        assert!(matches!(
            result,
            Err(GazetteerError::Validation(ValidationError::EmptyTerm))
        ));
    }

    #[tokio::test]
    async fn zero_limit_returns_empty_not_error() {
        let store = MemoryStore::builder()
            .country(Country {
                id: "co-de".into(),
                continent_id: "EU".into(),
                iso2: "DE".into(),
                iso3: "DEU".into(),
                numeric_code: None,
                name_official: None,
                names: NameMap::english("Germany"),
                capital: None,
                currency_code: None,
                phone_code: None,
                population: Some(83_000_000),
                timezones: vec![],
            })
            .build();
        let query = TypeQuery {
            term: "germany".into(),
            language: Language::En,
            country_iso2: None,
            proximity: None,
            limit: 0,
        };
        let hits: Vec<Hit<Country>> = search_kind(&store, &query).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn city_view_composes_parent_country() {
        let store = MemoryStore::builder()
            .country(Country {
                id: "co-de".into(),
                continent_id: "EU".into(),
                iso2: "DE".into(),
                iso3: "DEU".into(),
                numeric_code: None,
                name_official: None,
                names: NameMap::canonical("Deutschland", "Germany"),
                capital: None,
                currency_code: None,
                phone_code: None,
                population: Some(83_000_000),
                timezones: vec![],
            })
            .city(City {
                id: "ci-berlin".into(),
                country_id: "co-de".into(),
                region_id: None,
                slug: "berlin".into(),
                names: NameMap::english("Berlin"),
                population: Some(3_700_000),
                location: Coordinates::new(52.52, 13.405).unwrap(),
                timezone: None,
                is_capital: true,
                is_major_city: true,
            })
            .build();

        let query = TypeQuery {
            term: "berlin".into(),
            language: Language::De,
            country_iso2: None,
            proximity: None,
            limit: 5,
        };
        let hits: Vec<Hit<City>> = search_kind(&store, &query).await.unwrap();
        let views = city_views(&store, &hits, Language::De).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].display_name, "Berlin");
        let country = views[0].country.as_ref().expect("parent country");
        assert_eq!(country.display_name, "Deutschland");
        assert_eq!(country.iso2, "DE");
    }
}
