//! Deterministic candidate ordering.
//!
//! Two modes. Under an active proximity filter candidates are ordered
//! strictly by ascending distance and every importance signal is ignored.
//! Otherwise the tie-break chain is: exact code/name match, importance
//! (major flag, then population with unknown population last), ascending
//! canonical name. The sort is stable, so equal candidates keep their
//! repository order.

use std::cmp::Ordering;

/// Ranking inputs extracted from one candidate.
#[derive(Debug, Clone, Copy)]
pub struct RankSignals<'a> {
    /// Term matched a canonical name, localized name, or structured code
    /// (ISO2/ISO3, IATA/ICAO) exactly, case-insensitively.
    pub exact_match: bool,
    /// Major-city flag of the entity (or its owning city). Always false for
    /// countries, which rank by population alone.
    pub is_major: bool,
    pub population: Option<u64>,
    pub canonical_name: &'a str,
    /// Present only when a proximity filter was applied.
    pub distance_km: Option<f64>,
}

pub trait Rankable {
    fn rank_signals(&self) -> RankSignals<'_>;
}

/// Order `candidates` in place according to the documented policy.
pub fn rank<T: Rankable>(candidates: &mut [T], proximity_active: bool) {
    if proximity_active {
        candidates.sort_by(|a, b| {
            distance_asc(
                a.rank_signals().distance_km,
                b.rank_signals().distance_km,
            )
        });
    } else {
        candidates.sort_by(|a, b| importance_order(&a.rank_signals(), &b.rank_signals()));
    }
}

fn importance_order(a: &RankSignals<'_>, b: &RankSignals<'_>) -> Ordering {
    b.exact_match
        .cmp(&a.exact_match)
        .then(b.is_major.cmp(&a.is_major))
        .then(population_desc(a.population, b.population))
        .then_with(|| name_asc(a.canonical_name, b.canonical_name))
}

/// Higher population first; unknown population sorts last, never as zero.
fn population_desc(a: Option<u64>, b: Option<u64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn name_asc(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then(a.cmp(b))
}

fn distance_asc(a: Option<f64>, b: Option<f64>) -> Ordering {
    let a = a.unwrap_or(f64::INFINITY);
    let b = b.unwrap_or(f64::INFINITY);
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Candidate {
        name: &'static str,
        exact: bool,
        major: bool,
        population: Option<u64>,
        distance: Option<f64>,
    }

    impl Rankable for Candidate {
        fn rank_signals(&self) -> RankSignals<'_> {
            RankSignals {
                exact_match: self.exact,
                is_major: self.major,
                population: self.population,
                canonical_name: self.name,
                distance_km: self.distance,
            }
        }
    }

    fn candidate(name: &'static str, exact: bool, major: bool, pop: Option<u64>) -> Candidate {
        Candidate {
            name,
            exact,
            major,
            population: pop,
            distance: None,
        }
    }

    #[test]
    fn exact_match_outranks_any_population() {
        let mut candidates = vec![
            candidate("Germania Hills", false, true, Some(80_000_000)),
            candidate("Germany", true, false, Some(1_000)),
        ];
        rank(&mut candidates, false);
        assert_eq!(candidates[0].name, "Germany");
    }

    #[test]
    fn major_flag_then_population_break_ties() {
        let mut candidates = vec![
            candidate("Smallville", false, false, Some(5_000)),
            candidate("Bigtown", false, false, Some(900_000)),
            candidate("Majorville", false, true, Some(100)),
        ];
        rank(&mut candidates, false);
        let names: Vec<_> = candidates.iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Majorville", "Bigtown", "Smallville"]);
    }

    #[test]
    fn unknown_population_sorts_last_not_as_zero() {
        let mut candidates = vec![
            candidate("Nowhere", false, false, None),
            candidate("Zeroburg", false, false, Some(0)),
        ];
        rank(&mut candidates, false);
        assert_eq!(candidates[0].name, "Zeroburg");
        assert_eq!(candidates[1].name, "Nowhere");
    }

    #[test]
    fn name_is_the_final_tie_break() {
        let mut candidates = vec![
            candidate("b-place", false, false, Some(10)),
            candidate("A-place", false, false, Some(10)),
        ];
        rank(&mut candidates, false);
        assert_eq!(candidates[0].name, "A-place");
    }

    #[test]
    fn proximity_ignores_importance_entirely() {
        let mut candidates = vec![
            Candidate {
                name: "Metropolis",
                exact: true,
                major: true,
                population: Some(10_000_000),
                distance: Some(42.0),
            },
            Candidate {
                name: "Hamlet",
                exact: false,
                major: false,
                population: None,
                distance: Some(3.5),
            },
        ];
        rank(&mut candidates, true);
        assert_eq!(candidates[0].name, "Hamlet");
        // Output is non-decreasing in distance.
        let distances: Vec<_> = candidates.iter().filter_map(|c| c.distance).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }
}
