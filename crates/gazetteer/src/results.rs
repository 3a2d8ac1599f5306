//! Transport-agnostic response shapes.
//!
//! Views are localized projections of the directory entities: each carries a
//! `display_name` resolved for the requested language, the raw name map for
//! clients that localize again downstream, and read-only parent context for
//! display composition. `distance_km` is present only on results produced
//! under a proximity filter.

use serde::{Deserialize, Serialize};

use crate::model::{LocationKind, NameMap, PoiCategory, PoiType};

/// Minimal parent-country context embedded in child views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRef {
    pub id: String,
    pub iso2: String,
    pub display_name: String,
}

/// Minimal parent-region context embedded in city views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRef {
    pub id: String,
    pub code: String,
    pub display_name: String,
}

/// Minimal parent-city context embedded in district and POI views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRef {
    pub id: String,
    pub slug: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryView {
    pub id: String,
    pub iso2: String,
    pub iso3: String,
    pub display_name: String,
    pub names: NameMap,
    pub name_official: Option<String>,
    pub capital: Option<String>,
    pub currency_code: Option<String>,
    pub phone_code: Option<String>,
    pub population: Option<u64>,
    pub timezones: Vec<String>,
    pub continent_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityView {
    pub id: String,
    pub slug: String,
    pub display_name: String,
    pub names: NameMap,
    pub population: Option<u64>,
    pub timezone: Option<String>,
    pub is_capital: bool,
    pub is_major_city: bool,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub country: Option<CountryRef>,
    pub region: Option<RegionRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictView {
    pub id: String,
    pub slug: String,
    pub display_name: String,
    pub names: NameMap,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<CityRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiView {
    pub id: String,
    pub slug: String,
    pub display_name: String,
    pub poi_type: PoiType,
    pub category: PoiCategory,
    pub description_short: Option<String>,
    pub iata_code: Option<String>,
    pub icao_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub city: Option<CityRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionView {
    pub id: String,
    pub code: String,
    pub display_name: String,
    pub names: NameMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinentView {
    pub code: String,
    pub display_name: String,
}

/// The federated search envelope: each type keeps its own ranked, capped
/// list; nothing is merged into one globally ranked list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub countries: Vec<CountryView>,
    pub cities: Vec<CityView>,
    pub districts: Vec<DistrictView>,
    pub pois: Vec<PoiView>,
    /// Sum of the returned list lengths; an "any matches" signal, not an
    /// exact corpus-wide count.
    pub total_results: usize,
}

impl SearchResults {
    pub(crate) fn finish(mut self) -> Self {
        self.total_results = self.countries.len()
            + self.cities.len()
            + self.districts.len()
            + self.pois.len();
        self
    }
}

/// One autocomplete suggestion line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: LocationKind,
    pub id: String,
    /// Composed single-line display string with disambiguating parent
    /// context, e.g. `Berlin, Germany` or `Brandenburg Gate (LANDMARK)`.
    pub display_name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_name: Option<String>,
}

/// Country detail: the country plus its regions and top major cities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryDetail {
    #[serde(flatten)]
    pub country: CountryView,
    pub regions: Vec<RegionView>,
    pub major_cities: Vec<CityView>,
}

/// City detail: the city plus its nested districts and POIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityDetail {
    #[serde(flatten)]
    pub city: CityView,
    pub districts: Vec<DistrictView>,
    pub pois: Vec<PoiView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city_view() -> CityView {
        CityView {
            id: "ci-berlin".into(),
            slug: "berlin".into(),
            display_name: "Berlin".into(),
            names: NameMap::english("Berlin"),
            population: Some(3_700_000),
            timezone: None,
            is_capital: true,
            is_major_city: true,
            latitude: 52.52,
            longitude: 13.405,
            distance_km: None,
            country: None,
            region: None,
        }
    }

    #[test]
    fn distance_is_omitted_without_a_proximity_filter() {
        let json = serde_json::to_value(city_view()).unwrap();
        assert!(json.get("distance_km").is_none());

        let mut view = city_view();
        view.distance_km = Some(12.5);
        let json = serde_json::to_value(view).unwrap();
        assert_eq!(json["distance_km"], 12.5);
    }

    #[test]
    fn detail_envelopes_flatten_the_base_view() {
        let detail = CityDetail {
            city: city_view(),
            districts: vec![],
            pois: vec![],
        };
        let json = serde_json::to_value(detail).unwrap();
        assert_eq!(json["slug"], "berlin", "base fields sit at the top level");
        assert!(json["districts"].as_array().unwrap().is_empty());
    }
}
