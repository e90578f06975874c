//! Fuzzy matching of unit names.
//!
//! The unit search endpoint can return several candidates for one term.
//! An exact match on the normalized (lowercased, accent-stripped) name wins
//! outright; otherwise the candidate with the highest similarity above a
//! cutoff is chosen, preferring the shorter name on equal scores.

use crate::SourceError;
use crate::client::Unit;

/// Minimum normalized similarity for a fuzzy match to be accepted.
const MATCH_CUTOFF: f64 = 0.8;

/// Picks the best match for `query` among `units`.
///
/// # Errors
///
/// Returns [`SourceError::UnitNotFound`] when no candidate reaches the
/// similarity cutoff.
pub fn best_unit_match<'a>(query: &str, units: &'a [Unit]) -> Result<&'a Unit, SourceError> {
    let target = normalize(query);
    let mut best: Option<(&Unit, f64)> = None;

    for unit in units {
        let candidate = normalize(&unit.name);
        if candidate == target {
            return Ok(unit);
        }
        let score = strsim::normalized_levenshtein(&target, &candidate);
        let better = match best {
            None => true,
            Some((best_unit, best_score)) => {
                score > best_score
                    || ((score - best_score).abs() < f64::EPSILON
                        && unit.name.len() < best_unit.name.len())
            }
        };
        if better {
            best = Some((unit, score));
        }
    }

    match best {
        Some((unit, score)) if score >= MATCH_CUTOFF => Ok(unit),
        _ => Err(SourceError::UnitNotFound {
            query: query.to_string(),
        }),
    }
}

/// Lowercases, trims, and strips Czech diacritics.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase().chars().map(fold_char).collect()
}

const fn fold_char(c: char) -> char {
    match c {
        'á' => 'a',
        'č' => 'c',
        'ď' => 'd',
        'é' | 'ě' => 'e',
        'í' => 'i',
        'ň' => 'n',
        'ó' => 'o',
        'ř' => 'r',
        'š' => 's',
        'ť' => 't',
        'ú' | 'ů' => 'u',
        'ý' => 'y',
        'ž' => 'z',
        other => other,
    }
}
