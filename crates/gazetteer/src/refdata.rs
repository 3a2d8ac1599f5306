//! Static reference data loaded once at process start.
//!
//! The continent table (and the closed POI-type enumeration in
//! [`crate::model::PoiType`]) is the only legitimate process-wide state in
//! the engine, and it is immutable for the process lifetime.

use once_cell::sync::Lazy;

use crate::model::{Continent, Language, NameMap};

static CONTINENTS: Lazy<Vec<Continent>> = Lazy::new(|| {
    fn continent(code: &str, en: &str, de: &str, es: &str, fr: &str, tr: &str) -> Continent {
        Continent {
            id: code.to_string(),
            code: code.to_string(),
            names: NameMap::english(en)
                .with(Language::De, de)
                .with(Language::Es, es)
                .with(Language::Fr, fr)
                .with(Language::Tr, tr),
        }
    }

    vec![
        continent("AF", "Africa", "Afrika", "África", "Afrique", "Afrika"),
        continent("AN", "Antarctica", "Antarktis", "Antártida", "Antarctique", "Antarktika"),
        continent("AS", "Asia", "Asien", "Asia", "Asie", "Asya"),
        continent("EU", "Europe", "Europa", "Europa", "Europe", "Avrupa"),
        continent("NA", "North America", "Nordamerika", "América del Norte", "Amérique du Nord", "Kuzey Amerika"),
        continent("OC", "Oceania", "Ozeanien", "Oceanía", "Océanie", "Okyanusya"),
        continent("SA", "South America", "Südamerika", "América del Sur", "Amérique du Sud", "Güney Amerika"),
    ]
});

/// All continents in code order.
#[must_use]
pub fn continents() -> &'static [Continent] {
    &CONTINENTS
}

/// Look up a continent by its two-letter code, case-insensitively.
#[must_use]
pub fn continent_by_code(code: &str) -> Option<&'static Continent> {
    let code = code.trim().to_ascii_uppercase();
    CONTINENTS.iter().find(|c| c.code == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_continents_with_unique_codes() {
        let all = continents();
        assert_eq!(all.len(), 7);
        let mut codes: Vec<_> = all.iter().map(|c| c.code.as_str()).collect();
        codes.dedup();
        assert_eq!(codes.len(), 7);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(continent_by_code("eu").unwrap().code, "EU");
        assert_eq!(continent_by_code(" AS ").unwrap().code, "AS");
        assert!(continent_by_code("XX").is_none());
    }

    #[test]
    fn every_continent_localizes_in_every_language() {
        for continent in continents() {
            for lang in Language::ALL {
                assert!(continent.names.resolve(lang).is_ok());
            }
        }
    }
}
