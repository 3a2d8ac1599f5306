//! Directory entities and their shared value types.
//!
//! All entities are plain read-only records: the engine only ever sees a
//! consistent snapshot produced by the write-side collaborator, and parent
//! links (`City` → `Country`, `District`/`Poi` → `City`) are foreign-key ids
//! resolved on demand, never in-memory object cycles.

mod names;
mod poi_type;

use serde::{Deserialize, Serialize};

pub use names::{Language, LocalizeError, NameMap};
pub use poi_type::{PoiCategory, PoiType};

use crate::error::ValidationError;

/// The four searchable entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Country,
    City,
    District,
    Poi,
}

impl LocationKind {
    pub const ALL: [Self; 4] = [Self::Country, Self::City, Self::District, Self::Poi];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::City => "city",
            Self::District => "district",
            Self::Poi => "poi",
        }
    }
}

impl std::fmt::Display for LocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated WGS84 point. Latitude in [-90, 90], longitude in [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, ValidationError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(ValidationError::InvalidCoordinates { lat, lng });
        }
        Ok(Self { lat, lng })
    }
}

/// Static reference entity: one of the seven continents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Continent {
    pub id: String,
    /// Two-letter continent code, e.g. `EU`.
    pub code: String,
    pub names: NameMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: String,
    pub continent_id: String,
    pub iso2: String,
    pub iso3: String,
    pub numeric_code: Option<String>,
    pub name_official: Option<String>,
    pub names: NameMap,
    pub capital: Option<String>,
    pub currency_code: Option<String>,
    pub phone_code: Option<String>,
    pub population: Option<u64>,
    pub timezones: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub country_id: String,
    /// Unique within the owning country.
    pub code: String,
    pub names: NameMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub country_id: String,
    pub region_id: Option<String>,
    /// Unique within the owning country.
    pub slug: String,
    pub names: NameMap,
    pub population: Option<u64>,
    pub location: Coordinates,
    pub timezone: Option<String>,
    pub is_capital: bool,
    pub is_major_city: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    pub id: String,
    pub city_id: String,
    /// Unique within the owning city.
    pub slug: String,
    pub names: NameMap,
    pub location: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub id: String,
    pub city_id: String,
    pub district_id: Option<String>,
    pub poi_type: PoiType,
    pub name: String,
    /// Unique within the owning city.
    pub slug: String,
    pub description_short: Option<String>,
    pub location: Coordinates,
    /// Meaningful only for [`PoiType::Airport`].
    pub iata_code: Option<String>,
    pub icao_code: Option<String>,
    pub external_id: Option<String>,
}

/// Entity types an [`Alias`] may point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AliasTarget {
    Country,
    Region,
    City,
    District,
    Poi,
}

/// A language-scoped alternative name. Broadens search matching only; it is
/// never used as a display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alias {
    pub id: String,
    pub target: AliasTarget,
    pub target_id: String,
    pub alias_name: String,
    pub language: Option<Language>,
    pub use_for_search: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_are_range_checked() {
        assert!(Coordinates::new(52.52, 13.405).is_ok());
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
        assert!(matches!(
            Coordinates::new(90.1, 0.0),
            Err(ValidationError::InvalidCoordinates { .. })
        ));
        assert!(matches!(
            Coordinates::new(0.0, -180.5),
            Err(ValidationError::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn location_kind_display_matches_wire_form() {
        assert_eq!(LocationKind::Country.to_string(), "country");
        assert_eq!(LocationKind::Poi.to_string(), "poi");
    }
}
