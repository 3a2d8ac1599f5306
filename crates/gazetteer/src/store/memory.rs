//! In-process reference implementation of the store seam.
//!
//! An immutable snapshot built once from seed/fixture data. Because the
//! snapshot never changes after [`MemoryStoreBuilder::build`], every query
//! trivially sees a consistent read-committed view. Matching semantics
//! mirror the production backend: lowercase substring over searchable names
//! and enabled aliases, exact equality on structured codes, and a bounding
//! box prefilter ahead of the exact haversine radius check.

use ahash::AHashMap;
use async_trait::async_trait;
use itertools::Itertools;

use super::{
    CityListFilter, CountryLink, CountryListFilter, EntityKind, EntityQuery, EntitySearch, Hit,
    Importance, Listed, LocationStore, PageWindow, PoiListFilter, StoreResult,
};
use crate::{
    geo,
    model::{Alias, AliasTarget, City, Country, District, Language, Poi, Region},
    rank, refdata,
};

/// Immutable in-memory directory snapshot.
#[derive(Debug, Default)]
pub struct MemoryStore {
    countries: Vec<Country>,
    regions: Vec<Region>,
    cities: Vec<City>,
    districts: Vec<District>,
    pois: Vec<Poi>,
    country_id_by_iso2: AHashMap<String, String>,
    city_by_id: AHashMap<String, usize>,
    country_by_id: AHashMap<String, usize>,
    /// Lowercased searchable alias names per (target type, target id).
    aliases: AHashMap<(AliasTarget, String), Vec<String>>,
}

/// Fluent builder assembling a [`MemoryStore`] snapshot from seed data.
#[derive(Debug, Default)]
pub struct MemoryStoreBuilder {
    countries: Vec<Country>,
    regions: Vec<Region>,
    cities: Vec<City>,
    districts: Vec<District>,
    pois: Vec<Poi>,
    aliases: Vec<Alias>,
}

impl MemoryStoreBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn country(mut self, country: Country) -> Self {
        self.countries.push(country);
        self
    }

    #[must_use]
    pub fn region(mut self, region: Region) -> Self {
        self.regions.push(region);
        self
    }

    #[must_use]
    pub fn city(mut self, city: City) -> Self {
        self.cities.push(city);
        self
    }

    #[must_use]
    pub fn district(mut self, district: District) -> Self {
        self.districts.push(district);
        self
    }

    #[must_use]
    pub fn poi(mut self, poi: Poi) -> Self {
        self.pois.push(poi);
        self
    }

    #[must_use]
    pub fn alias(mut self, alias: Alias) -> Self {
        self.aliases.push(alias);
        self
    }

    #[must_use]
    pub fn build(self) -> MemoryStore {
        let country_id_by_iso2 = self
            .countries
            .iter()
            .map(|c| (c.iso2.to_ascii_uppercase(), c.id.clone()))
            .collect();
        let country_by_id = self
            .countries
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.id.clone(), idx))
            .collect();
        let city_by_id = self
            .cities
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.id.clone(), idx))
            .collect();

        let mut aliases: AHashMap<(AliasTarget, String), Vec<String>> = AHashMap::new();
        for alias in self.aliases {
            if !alias.use_for_search {
                continue;
            }
            aliases
                .entry((alias.target, alias.target_id))
                .or_default()
                .push(alias.alias_name.to_lowercase());
        }

        MemoryStore {
            countries: self.countries,
            regions: self.regions,
            cities: self.cities,
            districts: self.districts,
            pois: self.pois,
            country_id_by_iso2,
            country_by_id,
            city_by_id,
            aliases,
        }
    }
}

impl MemoryStore {
    #[must_use]
    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder::new()
    }

    fn city(&self, city_id: &str) -> Option<&City> {
        self.city_by_id.get(city_id).map(|&idx| &self.cities[idx])
    }

    fn city_importance(&self, city_id: &str) -> Importance {
        self.city(city_id)
            .map(|c| Importance {
                is_major: c.is_major_city,
                population: c.population,
            })
            .unwrap_or_default()
    }

    fn in_country(&self, link: CountryLink<'_>, country_id: &str) -> bool {
        match link {
            // Country rows are never scoped by the country filter.
            CountryLink::None => true,
            CountryLink::Direct(id) => id == country_id,
            CountryLink::ViaCity(city_id) => self
                .city(city_id)
                .is_some_and(|c| c.country_id == country_id),
        }
    }

    /// The single generic match path shared by all four entity types.
    fn match_rows<K: EntityKind>(&self, rows: &[K], query: &EntityQuery) -> Vec<Hit<K>> {
        let term = query.term.trim().to_lowercase();

        // An unknown scope ISO2 can match nothing (for scoped kinds).
        let scope_country_id = query
            .country_iso2
            .as_ref()
            .map(|iso2| self.country_id_by_iso2.get(&iso2.to_ascii_uppercase()));

        let prefilter = query
            .proximity
            .map(|p| (p, geo::bounding_box(p.center, p.radius_km)));

        let mut hits = Vec::new();
        for row in rows {
            match (row.country_link(), scope_country_id) {
                (CountryLink::None, _) | (_, None) => {}
                (link, Some(Some(country_id))) => {
                    if !self.in_country(link, country_id) {
                        continue;
                    }
                }
                (_, Some(None)) => continue,
            }

            let exact = row
                .exact_codes()
                .iter()
                .chain(row.search_names().iter())
                .any(|candidate| candidate.eq_ignore_ascii_case(&term));
            let matched = exact
                || row
                    .search_names()
                    .iter()
                    .any(|name| name.to_lowercase().contains(&term))
                || self
                    .aliases
                    .get(&(K::ALIAS_TARGET, row.id().to_string()))
                    .is_some_and(|names| names.iter().any(|name| name.contains(&term)));
            if !matched {
                continue;
            }

            let mut distance_km = None;
            if let Some((proximity, bbox)) = &prefilter {
                let Some(location) = row.location() else {
                    continue;
                };
                if !bbox.contains(location) {
                    continue;
                }
                let distance = geo::distance_km(proximity.center, location);
                if distance > proximity.radius_km {
                    continue;
                }
                distance_km = Some(distance);
            }

            let importance = match row.country_link() {
                CountryLink::ViaCity(city_id) => self.city_importance(city_id),
                _ => row.own_importance(),
            };

            hits.push(Hit {
                record: row.clone(),
                distance_km,
                exact,
                importance,
            });
        }

        // Native backend ordering before truncation, so the limit keeps the
        // best candidates rather than an arbitrary prefix.
        rank::rank(&mut hits, query.proximity.is_some());
        hits.truncate(query.limit);
        hits
    }

    fn window<T>(items: Vec<T>, window: PageWindow) -> Listed<T> {
        let total = items.len();
        let items = items
            .into_iter()
            .skip(window.offset)
            .take(window.limit)
            .collect();
        Listed { items, total }
    }
}

macro_rules! impl_entity_search {
    ($kind:ty, $field:ident) => {
        #[async_trait]
        impl EntitySearch<$kind> for MemoryStore {
            async fn search_entities(&self, query: &EntityQuery) -> StoreResult<Vec<Hit<$kind>>> {
                Ok(self.match_rows(&self.$field, query))
            }
        }
    };
}

impl_entity_search!(Country, countries);
impl_entity_search!(City, cities);
impl_entity_search!(District, districts);
impl_entity_search!(Poi, pois);

#[async_trait]
impl LocationStore for MemoryStore {
    async fn country_by_id(&self, id: &str) -> StoreResult<Option<Country>> {
        Ok(self
            .country_by_id
            .get(id)
            .map(|&idx| self.countries[idx].clone()))
    }

    async fn city_by_id(&self, id: &str) -> StoreResult<Option<City>> {
        Ok(self.city(id).cloned())
    }

    async fn region_by_id(&self, id: &str) -> StoreResult<Option<Region>> {
        Ok(self.regions.iter().find(|r| r.id == id).cloned())
    }

    async fn regions_of_country(&self, country_id: &str) -> StoreResult<Vec<Region>> {
        Ok(self
            .regions
            .iter()
            .filter(|r| r.country_id == country_id)
            .sorted_by(|a, b| a.code.cmp(&b.code))
            .cloned()
            .collect())
    }

    async fn major_cities_of_country(
        &self,
        country_id: &str,
        limit: usize,
    ) -> StoreResult<Vec<City>> {
        Ok(self
            .cities
            .iter()
            .filter(|c| c.country_id == country_id && c.is_major_city)
            .sorted_by(|a, b| b.population.unwrap_or(0).cmp(&a.population.unwrap_or(0)))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn districts_of_city(&self, city_id: &str, limit: usize) -> StoreResult<Vec<District>> {
        Ok(self
            .districts
            .iter()
            .filter(|d| d.city_id == city_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn pois_of_city(&self, city_id: &str, limit: usize) -> StoreResult<Vec<Poi>> {
        Ok(self
            .pois
            .iter()
            .filter(|p| p.city_id == city_id)
            .sorted_by_key(|p| p.poi_type)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_countries(
        &self,
        filter: &CountryListFilter,
        window: PageWindow,
    ) -> StoreResult<Listed<Country>> {
        let continent_id = filter
            .continent_code
            .as_deref()
            .map(|code| refdata::continent_by_code(code).map(|c| c.id.as_str()));
        let term = filter.term.as_ref().map(|t| t.trim().to_lowercase());

        let matches = self
            .countries
            .iter()
            .filter(|country| match continent_id {
                None => true,
                Some(Some(id)) => country.continent_id == id,
                // Unknown continent code matches nothing.
                Some(None) => false,
            })
            .filter(|country| {
                let Some(term) = &term else { return true };
                country.iso2.eq_ignore_ascii_case(term)
                    || country.iso3.eq_ignore_ascii_case(term)
                    || country
                        .names
                        .iter()
                        .any(|name| name.to_lowercase().contains(term))
            })
            .sorted_by(|a, b| {
                a.names
                    .get(Language::En)
                    .unwrap_or_default()
                    .cmp(b.names.get(Language::En).unwrap_or_default())
            })
            .cloned()
            .collect();

        Ok(Self::window(matches, window))
    }

    async fn list_cities(
        &self,
        filter: &CityListFilter,
        window: PageWindow,
    ) -> StoreResult<Listed<City>> {
        let country_id = filter
            .country_iso2
            .as_deref()
            .map(|iso2| self.country_id_by_iso2.get(&iso2.to_ascii_uppercase()));
        let term = filter.term.as_ref().map(|t| t.trim().to_lowercase());

        let mut matches: Vec<City> = self
            .cities
            .iter()
            .filter(|city| match country_id {
                None => true,
                Some(Some(id)) => &city.country_id == id,
                Some(None) => false,
            })
            .filter(|city| {
                filter
                    .region_id
                    .as_deref()
                    .is_none_or(|region| city.region_id.as_deref() == Some(region))
            })
            .filter(|city| {
                filter
                    .is_major_city
                    .is_none_or(|major| city.is_major_city == major)
            })
            .filter(|city| {
                let Some(term) = &term else { return true };
                city.slug.to_lowercase().contains(term)
                    || city.names.iter().any(|name| name.to_lowercase().contains(term))
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            b.is_major_city
                .cmp(&a.is_major_city)
                .then(match (a.population, b.population) {
                    (Some(a), Some(b)) => b.cmp(&a),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
                .then_with(|| a.slug.cmp(&b.slug))
        });

        Ok(Self::window(matches, window))
    }

    async fn list_pois(
        &self,
        filter: &PoiListFilter,
        window: PageWindow,
    ) -> StoreResult<Listed<Hit<Poi>>> {
        let term = filter.term.as_ref().map(|t| t.trim().to_lowercase());
        let prefilter = filter
            .proximity
            .map(|p| (p, geo::bounding_box(p.center, p.radius_km)));

        let mut matches: Vec<Hit<Poi>> = self
            .pois
            .iter()
            .filter(|poi| filter.city_id.as_deref().is_none_or(|c| poi.city_id == c))
            .filter(|poi| filter.poi_type.is_none_or(|ty| poi.poi_type == ty))
            .filter(|poi| {
                let Some(term) = &term else { return true };
                poi.name.to_lowercase().contains(term)
                    || poi.slug.to_lowercase().contains(term)
                    || poi
                        .iata_code
                        .as_deref()
                        .is_some_and(|code| code.eq_ignore_ascii_case(term))
                    || poi
                        .icao_code
                        .as_deref()
                        .is_some_and(|code| code.eq_ignore_ascii_case(term))
            })
            .filter_map(|poi| {
                let mut distance_km = None;
                if let Some((proximity, bbox)) = &prefilter {
                    if !bbox.contains(poi.location) {
                        return None;
                    }
                    let distance = geo::distance_km(proximity.center, poi.location);
                    if distance > proximity.radius_km {
                        return None;
                    }
                    distance_km = Some(distance);
                }
                Some(Hit {
                    record: poi.clone(),
                    distance_km,
                    exact: false,
                    importance: self.city_importance(&poi.city_id),
                })
            })
            .collect();

        if filter.proximity.is_some() {
            matches.sort_by(|a, b| {
                a.distance_km
                    .unwrap_or(f64::INFINITY)
                    .partial_cmp(&b.distance_km.unwrap_or(f64::INFINITY))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        } else {
            matches.sort_by(|a, b| a.record.slug.cmp(&b.record.slug));
        }

        Ok(Self::window(matches, window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinates, NameMap, PoiType};

    fn germany() -> Country {
        Country {
            id: "co-de".into(),
            continent_id: "EU".into(),
            iso2: "DE".into(),
            iso3: "DEU".into(),
            numeric_code: Some("276".into()),
            name_official: Some("Federal Republic of Germany".into()),
            names: NameMap::canonical("Deutschland", "Germany").with(Language::Fr, "Allemagne"),
            capital: Some("Berlin".into()),
            currency_code: Some("EUR".into()),
            phone_code: Some("+49".into()),
            population: Some(83_000_000),
            timezones: vec!["Europe/Berlin".into()],
        }
    }

    fn berlin() -> City {
        City {
            id: "ci-berlin".into(),
            country_id: "co-de".into(),
            region_id: None,
            slug: "berlin".into(),
            names: NameMap::english("Berlin"),
            population: Some(3_700_000),
            location: Coordinates::new(52.52, 13.405).unwrap(),
            timezone: Some("Europe/Berlin".into()),
            is_capital: true,
            is_major_city: true,
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::builder()
            .country(germany())
            .city(berlin())
            .alias(Alias {
                id: "al-1".into(),
                target: AliasTarget::City,
                target_id: "ci-berlin".into(),
                alias_name: "Berlín".into(),
                language: Some(Language::Es),
                use_for_search: true,
            })
            .alias(Alias {
                id: "al-2".into(),
                target: AliasTarget::City,
                target_id: "ci-berlin".into(),
                alias_name: "Hidden Name".into(),
                language: None,
                use_for_search: false,
            })
            .build()
    }

    fn query(term: &str) -> EntityQuery {
        EntityQuery {
            term: term.into(),
            country_iso2: None,
            proximity: None,
            limit: 10,
        }
    }

    #[tokio::test]
    async fn substring_matches_localized_names() {
        let store = store();
        let hits: Vec<Hit<Country>> = store.search_entities(&query("allem")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(!hits[0].exact);
    }

    #[tokio::test]
    async fn iso_codes_match_exactly_only() {
        let store = store();
        let hits: Vec<Hit<Country>> = store.search_entities(&query("de")).await.unwrap();
        assert_eq!(hits.len(), 1, "ISO2 should match");
        assert!(hits[0].exact);

        // Codes never participate in substring matching.
        let hits: Vec<Hit<Country>> = store.search_entities(&query("deu ")).await.unwrap();
        assert_eq!(hits.len(), 1);
        let hits: Vec<Hit<Country>> = store.search_entities(&query("eut")).await.unwrap();
        assert_eq!(hits.len(), 1, "only the name substring matches here");
    }

    #[tokio::test]
    async fn searchable_aliases_broaden_matching() {
        let store = store();
        let hits: Vec<Hit<City>> = store.search_entities(&query("berlín")).await.unwrap();
        assert_eq!(hits.len(), 1);

        let hits: Vec<Hit<City>> = store.search_entities(&query("hidden")).await.unwrap();
        assert!(hits.is_empty(), "non-searchable aliases must not match");
    }

    #[tokio::test]
    async fn unknown_country_scope_matches_nothing() {
        let store = store();
        let mut q = query("berlin");
        q.country_iso2 = Some("XX".into());
        let hits: Vec<Hit<City>> = store.search_entities(&q).await.unwrap();
        assert!(hits.is_empty());

        q.country_iso2 = Some("de".into());
        let hits: Vec<Hit<City>> = store.search_entities(&q).await.unwrap();
        assert_eq!(hits.len(), 1, "scope codes are case-insensitive");
    }

    #[tokio::test]
    async fn proximity_projects_distance_and_filters() {
        let store = store();
        let mut q = query("berlin");
        q.proximity = Some(super::super::Proximity {
            center: Coordinates::new(52.45, 13.3).unwrap(),
            radius_km: 15.0,
        });
        let hits: Vec<Hit<City>> = store.search_entities(&q).await.unwrap();
        assert_eq!(hits.len(), 1);
        let d = hits[0].distance_km.expect("distance projected");
        assert!(d > 0.0 && d < 15.0, "got {d}");

        q.proximity = Some(super::super::Proximity {
            center: Coordinates::new(48.14, 11.58).unwrap(),
            radius_km: 15.0,
        });
        let hits: Vec<Hit<City>> = store.search_entities(&q).await.unwrap();
        assert!(hits.is_empty(), "outside the radius");
    }

    #[tokio::test]
    async fn listing_windows_report_full_totals() {
        let mut builder = MemoryStore::builder().country(germany());
        for i in 0..5 {
            let mut city = berlin();
            city.id = format!("ci-{i}");
            city.slug = format!("city-{i}");
            city.names = NameMap::english(format!("City {i}"));
            city.population = Some(1_000 * (i + 1));
            builder = builder.city(city);
        }
        let store = builder.build();

        let listed = store
            .list_cities(
                &CityListFilter::default(),
                PageWindow {
                    offset: 2,
                    limit: 2,
                },
            )
            .await
            .unwrap();
        assert_eq!(listed.total, 5);
        assert_eq!(listed.items.len(), 2);
        // Population descending: page two holds the middle entries.
        assert_eq!(listed.items[0].population, Some(3_000));
    }

    #[tokio::test]
    async fn pois_of_city_are_ordered_by_type() {
        let poi = |id: &str, ty: PoiType, slug: &str| Poi {
            id: id.into(),
            city_id: "ci-berlin".into(),
            district_id: None,
            poi_type: ty,
            name: slug.to_uppercase(),
            slug: slug.into(),
            description_short: None,
            location: Coordinates::new(52.5, 13.4).unwrap(),
            iata_code: None,
            icao_code: None,
            external_id: None,
        };
        let store = MemoryStore::builder()
            .country(germany())
            .city(berlin())
            .poi(poi("p1", PoiType::Museum, "museum-island"))
            .poi(poi("p2", PoiType::Airport, "ber-airport"))
            .poi(poi("p3", PoiType::Park, "tiergarten"))
            .build();

        let pois = store.pois_of_city("ci-berlin", 20).await.unwrap();
        let types: Vec<_> = pois.iter().map(|p| p.poi_type).collect();
        assert_eq!(types, vec![PoiType::Airport, PoiType::Museum, PoiType::Park]);
    }
}
