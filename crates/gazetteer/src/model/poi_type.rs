//! The closed point-of-interest type enumeration and its category buckets.

use serde::{Deserialize, Serialize};

/// Closed set of POI types known to the directory.
///
/// The variant order is the canonical listing order for POIs nested under a
/// city (transport first, then culture, leisure and commerce).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoiType {
    // Transport
    Airport,
    TrainStation,
    BusStation,
    Port,
    // Culture
    Museum,
    Monument,
    Landmark,
    Castle,
    Palace,
    Church,
    Mosque,
    Temple,
    Theater,
    OperaHouse,
    ExhibitionCenter,
    Attraction,
    // Leisure
    Park,
    Beach,
    ThemePark,
    Zoo,
    Aquarium,
    SkiResort,
    GolfCourse,
    Spa,
    Stadium,
    Arena,
    Nightlife,
    RestaurantArea,
    // Commerce
    Shopping,
    Market,
    Casino,
    BusinessDistrict,
    ConventionCenter,
    // Other
    University,
    Hospital,
}

/// Coarse grouping of [`PoiType`] variants used by display and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoiCategory {
    Transport,
    Culture,
    Leisure,
    Commerce,
    Other,
}

impl PoiType {
    #[must_use]
    pub fn category(self) -> PoiCategory {
        use PoiType::*;
        match self {
            Airport | TrainStation | BusStation | Port => PoiCategory::Transport,
            Museum | Monument | Landmark | Castle | Palace | Church | Mosque | Temple
            | Theater | OperaHouse | ExhibitionCenter | Attraction => PoiCategory::Culture,
            Park | Beach | ThemePark | Zoo | Aquarium | SkiResort | GolfCourse | Spa | Stadium
            | Arena | Nightlife | RestaurantArea => PoiCategory::Leisure,
            Shopping | Market | Casino | BusinessDistrict | ConventionCenter => {
                PoiCategory::Commerce
            }
            University | Hospital => PoiCategory::Other,
        }
    }

    /// Wire/display form, e.g. `TRAIN_STATION`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        use PoiType::*;
        match self {
            Airport => "AIRPORT",
            TrainStation => "TRAIN_STATION",
            BusStation => "BUS_STATION",
            Port => "PORT",
            Museum => "MUSEUM",
            Monument => "MONUMENT",
            Landmark => "LANDMARK",
            Castle => "CASTLE",
            Palace => "PALACE",
            Church => "CHURCH",
            Mosque => "MOSQUE",
            Temple => "TEMPLE",
            Theater => "THEATER",
            OperaHouse => "OPERA_HOUSE",
            ExhibitionCenter => "EXHIBITION_CENTER",
            Attraction => "ATTRACTION",
            Park => "PARK",
            Beach => "BEACH",
            ThemePark => "THEME_PARK",
            Zoo => "ZOO",
            Aquarium => "AQUARIUM",
            SkiResort => "SKI_RESORT",
            GolfCourse => "GOLF_COURSE",
            Spa => "SPA",
            Stadium => "STADIUM",
            Arena => "ARENA",
            Nightlife => "NIGHTLIFE",
            RestaurantArea => "RESTAURANT_AREA",
            Shopping => "SHOPPING",
            Market => "MARKET",
            Casino => "CASINO",
            BusinessDistrict => "BUSINESS_DISTRICT",
            ConventionCenter => "CONVENTION_CENTER",
            University => "UNIVERSITY",
            Hospital => "HOSPITAL",
        }
    }

    /// Parse the wire form. Case-insensitive; unknown values are rejected
    /// (the enumeration is closed).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        use PoiType::*;
        let normalized = value.trim().to_ascii_uppercase();
        let parsed = match normalized.as_str() {
            "AIRPORT" => Airport,
            "TRAIN_STATION" => TrainStation,
            "BUS_STATION" => BusStation,
            "PORT" => Port,
            "MUSEUM" => Museum,
            "MONUMENT" => Monument,
            "LANDMARK" => Landmark,
            "CASTLE" => Castle,
            "PALACE" => Palace,
            "CHURCH" => Church,
            "MOSQUE" => Mosque,
            "TEMPLE" => Temple,
            "THEATER" => Theater,
            "OPERA_HOUSE" => OperaHouse,
            "EXHIBITION_CENTER" => ExhibitionCenter,
            "ATTRACTION" => Attraction,
            "PARK" => Park,
            "BEACH" => Beach,
            "THEME_PARK" => ThemePark,
            "ZOO" => Zoo,
            "AQUARIUM" => Aquarium,
            "SKI_RESORT" => SkiResort,
            "GOLF_COURSE" => GolfCourse,
            "SPA" => Spa,
            "STADIUM" => Stadium,
            "ARENA" => Arena,
            "NIGHTLIFE" => Nightlife,
            "RESTAURANT_AREA" => RestaurantArea,
            "SHOPPING" => Shopping,
            "MARKET" => Market,
            "CASINO" => Casino,
            "BUSINESS_DISTRICT" => BusinessDistrict,
            "CONVENTION_CENTER" => ConventionCenter,
            "UNIVERSITY" => University,
            "HOSPITAL" => Hospital,
            _ => return None,
        };
        Some(parsed)
    }
}

impl std::fmt::Display for PoiType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_variant() {
        for ty in [
            PoiType::Airport,
            PoiType::TrainStation,
            PoiType::OperaHouse,
            PoiType::RestaurantArea,
            PoiType::Hospital,
        ] {
            assert_eq!(PoiType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(PoiType::parse("airport"), Some(PoiType::Airport));
        assert_eq!(PoiType::parse("CATHEDRAL"), None);
    }

    #[test]
    fn categories_cover_the_groups() {
        assert_eq!(PoiType::Airport.category(), PoiCategory::Transport);
        assert_eq!(PoiType::Monument.category(), PoiCategory::Culture);
        assert_eq!(PoiType::Beach.category(), PoiCategory::Leisure);
        assert_eq!(PoiType::Casino.category(), PoiCategory::Commerce);
        assert_eq!(PoiType::University.category(), PoiCategory::Other);
    }
}
