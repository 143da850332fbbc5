//! Catalog name matching for the chatbot.
//!
//! Two strategies, one picked per deployment via `MATCH_STRATEGY`:
//! - **containment**: the query mentions a cake name verbatim
//! (case-insensitive substring, first hit wins)
//! - **similarity**: Jaro-Winkler between query and name, scaled to 0-100,
//! best candidate above [`SIMILARITY_THRESHOLD`] wins
//!
//! A miss is `None`, never an error, so the chat handler can move on to the
//! AI fallback.

use std::str::FromStr;

use strsim::jaro_winkler;

use crate::catalog::Cake;

/// Minimum similarity score (0-100 scale) for a fuzzy hit. Scores at or
/// below this count as a miss.
pub const SIMILARITY_THRESHOLD: f64 = 60.0;

/// Score reported for containment hits; containment is exact, not ranked.
pub const CONTAINMENT_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    Containment,
    Similarity,
}

impl FromStr for MatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "containment" => Ok(Self::Containment),
            "similarity" => Ok(Self::Similarity),
            other => Err(format!("unknown match strategy: {other}")),
        }
    }
}

pub fn find_best<'a>(
    query: &str,
    cakes: &'a [Cake],
    strategy: MatchStrategy,
) -> Option<(&'a Cake, f64)> {
    match strategy {
        MatchStrategy::Containment => find_contained(query, cakes),
        MatchStrategy::Similarity => find_similar(query, cakes),
    }
}

fn find_contained<'a>(query: &str, cakes: &'a [Cake]) -> Option<(&'a Cake, f64)> {
    let query = query.to_lowercase();

    cakes
        .iter()
        .find(|cake| query.contains(&cake.name.to_lowercase()))
        .map(|cake| (cake, CONTAINMENT_SCORE))
}

fn find_similar<'a>(query: &str, cakes: &'a [Cake]) -> Option<(&'a Cake, f64)> {
    let query = query.to_lowercase();

    let mut best: Option<(&Cake, f64)> = None;
    for cake in cakes {
        let score = jaro_winkler(&query, &cake.name.to_lowercase()) * 100.0;

        // strict comparison keeps the first-encountered maximum on ties
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((cake, score));
        }
    }

    best.filter(|&(_, score)| score > SIMILARITY_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn cake(id: u32, name: &str) -> Cake {
        Cake {
            id,
            name: name.to_string(),
            description: None,
            price: Decimal::from(1000),
            stock: 1,
        }
    }

    #[test]
    fn containment_is_case_insensitive() {
        let catalog = vec![cake(1, "Медовик")];

        let (hit, score) =
            find_best("Есть ли у вас медовик?", &catalog, MatchStrategy::Containment).unwrap();

        assert_eq!(hit.id, 1);
        assert_eq!(score, CONTAINMENT_SCORE);
    }

    #[test]
    fn containment_misses_unmentioned_names() {
        let catalog = vec![cake(1, "Медовик")];

        assert!(find_best("привет", &catalog, MatchStrategy::Containment).is_none());
    }

    #[test]
    fn containment_first_match_wins() {
        let catalog = vec![cake(1, "Медовик"), cake(2, "Медовик")];

        let (hit, _) = find_best("хочу медовик", &catalog, MatchStrategy::Containment).unwrap();
        assert_eq!(hit.id, 1);
    }

    #[test]
    fn exact_name_scores_one_hundred() {
        let catalog = vec![cake(1, "Медовик")];

        let (hit, score) = find_best("медовик", &catalog, MatchStrategy::Similarity).unwrap();

        assert_eq!(hit.id, 1);
        assert_eq!(score, 100.0);
    }

    #[test]
    fn unrelated_query_stays_below_threshold() {
        let catalog = vec![cake(1, "Медовик")];

        assert!(find_best("привет", &catalog, MatchStrategy::Similarity).is_none());
    }

    #[test]
    fn similarity_keeps_first_of_tied_maxima() {
        let catalog = vec![cake(1, "Медовик"), cake(2, "Медовик")];

        let (hit, _) = find_best("медовик", &catalog, MatchStrategy::Similarity).unwrap();
        assert_eq!(hit.id, 1);
    }

    #[test]
    fn similarity_picks_the_closest_name() {
        let catalog = vec![cake(1, "Молочная девочка"), cake(2, "Медовик")];

        let (hit, _) = find_best("медовек", &catalog, MatchStrategy::Similarity).unwrap();
        assert_eq!(hit.id, 2);
    }

    #[test]
    fn empty_catalog_never_matches() {
        assert!(find_best("медовик", &[], MatchStrategy::Containment).is_none());
        assert!(find_best("медовик", &[], MatchStrategy::Similarity).is_none());
    }

    #[test]
    fn strategy_parses_from_config_values() {
        assert_eq!(
            "containment".parse::<MatchStrategy>().unwrap(),
            MatchStrategy::Containment
        );
        assert_eq!(
            "similarity".parse::<MatchStrategy>().unwrap(),
            MatchStrategy::Similarity
        );
        assert!("semantic".parse::<MatchStrategy>().is_err());
    }
}
