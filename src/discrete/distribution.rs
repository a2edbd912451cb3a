use crate::tree::annotation::AnnotationValue;
use std::collections::BTreeMap;

/// Probability mass over candidate locations for one node.
pub type LocationDistribution = BTreeMap<String, f64>;

pub const UNKNOWN_LOCATION: &str = "Unknown";

/// Turn a node's annotation map into a location distribution.
///
/// Keys are scanned in sorted order. Any key containing `prob`,
/// `posterior` or `freq` is treated as distribution-bearing; failing
/// that, a key ending in `state` or containing `location` supplies a
/// single best-guess label. An empty result is normalized to `Unknown`
/// by the caller.
pub fn extract_distribution(
    annotations: &BTreeMap<String, AnnotationValue>,
) -> LocationDistribution {
    for (key, value) in annotations {
        let lowered = key.to_lowercase();
        if ["prob", "posterior", "freq"]
            .iter()
            .any(|token| lowered.contains(token))
        {
            let distribution = coerce_distribution(key, value, annotations);
            if !distribution.is_empty() {
                return distribution;
            }
        }
    }

    for (key, value) in annotations {
        let lowered = key.to_lowercase();
        if lowered.ends_with("state") || lowered.contains("location") {
            let label = clean_label(value);
            if label != UNKNOWN_LOCATION {
                let mut single = LocationDistribution::new();
                single.insert(label, 1.0);
                return single;
            }
        }
    }

    LocationDistribution::new()
}

/// Drop non-positive entries and rescale the rest to sum to one. Empty or
/// degenerate input becomes the single-entry `Unknown` distribution.
pub fn normalize(distribution: LocationDistribution) -> LocationDistribution {
    let positive: LocationDistribution = distribution
        .into_iter()
        .filter(|(_, probability)| *probability > 0.0)
        .collect();
    let total: f64 = positive.values().sum();
    if positive.is_empty() || total <= 0.0 {
        let mut unknown = LocationDistribution::new();
        unknown.insert(UNKNOWN_LOCATION.to_string(), 1.0);
        return unknown;
    }
    positive
        .into_iter()
        .map(|(location, probability)| (location, probability / total))
        .collect()
}

/// The highest-probability entry. Ties break toward the lexicographically
/// smallest label, so the choice is independent of traversal order.
pub fn best_state(distribution: &LocationDistribution) -> (String, f64) {
    let mut best: Option<(&str, f64)> = None;
    for (location, probability) in distribution {
        if best.map_or(true, |(_, p)| *probability > p) {
            best = Some((location, *probability));
        }
    }
    match best {
        Some((location, probability)) => (location.to_string(), probability),
        None => (UNKNOWN_LOCATION.to_string(), 0.0),
    }
}

/// Render an annotation value as a location label, trimming whitespace and
/// surrounding double quotes. Anything blank becomes `Unknown`.
pub fn clean_label(value: &AnnotationValue) -> String {
    clean_label_text(&value.to_string())
}

pub fn clean_label_text(text: &str) -> String {
    let cleaned = text.trim().trim_matches('"').trim();
    if cleaned.is_empty() {
        UNKNOWN_LOCATION.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Coerce one distribution-bearing value by shape: direct map, numeric
/// list with a companion label list, list of `label=prob` strings, or a
/// delimited scalar string.
fn coerce_distribution(
    key: &str,
    value: &AnnotationValue,
    annotations: &BTreeMap<String, AnnotationValue>,
) -> LocationDistribution {
    match value {
        AnnotationValue::Map(entries) => entries
            .iter()
            .filter_map(|(label, probability)| {
                let label = clean_label_text(label);
                if label == UNKNOWN_LOCATION {
                    return None;
                }
                probability.as_f64().map(|p| (label, p))
            })
            .collect(),

        AnnotationValue::List(items) => {
            let numeric: Vec<Option<f64>> = items.iter().map(direct_f64).collect();
            if !items.is_empty() && numeric.iter().all(Option::is_some) {
                if let Some(labels) = companion_labels(key, annotations, items.len()) {
                    return labels
                        .into_iter()
                        .zip(numeric.into_iter().flatten())
                        .collect();
                }
                return LocationDistribution::new();
            }

            if items
                .iter()
                .all(|item| matches!(item, AnnotationValue::Text(_)))
            {
                let mut parsed = LocationDistribution::new();
                for item in items {
                    if let AnnotationValue::Text(text) = item {
                        let parts: Vec<&str> = text
                            .split(|c: char| matches!(c, '=' | ':' | '"') || c.is_whitespace())
                            .filter(|part| !part.is_empty())
                            .collect();
                        if parts.len() >= 2 {
                            if let Ok(probability) = parts[parts.len() - 1].parse::<f64>() {
                                parsed.insert(clean_label_text(parts[0]), probability);
                            }
                        }
                    }
                }
                return parsed;
            }

            LocationDistribution::new()
        }

        AnnotationValue::Text(text) => {
            let mut parsed = LocationDistribution::new();
            for segment in text.split([',', ';']) {
                let segment = segment.trim();
                if segment.is_empty() {
                    continue;
                }
                let Some((label, probability)) =
                    segment.split_once('=').or_else(|| segment.split_once(':'))
                else {
                    continue;
                };
                if let Ok(probability) = probability.trim().parse::<f64>() {
                    parsed.insert(clean_label_text(label), probability);
                }
            }
            parsed
        }

        _ => LocationDistribution::new(),
    }
}

/// Numeric view used for list elements; unlike `as_f64` this does not
/// accept numeric text, so `{0.7,0.3}` and `{"A=1","B=2"}` stay distinct.
fn direct_f64(value: &AnnotationValue) -> Option<f64> {
    match value {
        AnnotationValue::Text(_) => None,
        other => other.as_f64(),
    }
}

/// Look for a same-length label list under the naming conventions derived
/// from the probability key (`prob` -> `set`/`states`/`labels`/`state`,
/// `posterior` -> `states`). A substitution that leaves the key unchanged
/// is skipped, since it would pair the probabilities with themselves.
fn companion_labels(
    key: &str,
    annotations: &BTreeMap<String, AnnotationValue>,
    expected_len: usize,
) -> Option<Vec<String>> {
    let candidates = [
        key.replace("prob", "set"),
        key.replace("prob", "states"),
        key.replace("posterior", "states"),
        key.replace("prob", "labels"),
        key.replace("prob", "state"),
    ];
    for candidate in candidates {
        if candidate == key {
            continue;
        }
        if let Some(AnnotationValue::List(labels)) = annotations.get(&candidate) {
            if labels.len() == expected_len {
                return Some(labels.iter().map(clean_label).collect());
            }
        }
    }
    None
}

/// Probability-weighted coordinates, looked up under the usual aliases.
pub fn extract_coordinates(
    annotations: &BTreeMap<String, AnnotationValue>,
) -> Option<(f64, f64)> {
    let latitude = first_numeric(annotations, &["location_lat", "latitude", "lat", "location1"])?;
    let longitude = first_numeric(annotations, &["location_lon", "longitude", "lon", "location2"])?;
    Some((latitude, longitude))
}

fn first_numeric(
    annotations: &BTreeMap<String, AnnotationValue>,
    keys: &[&str],
) -> Option<f64> {
    keys.iter()
        .find_map(|key| annotations.get(*key).and_then(AnnotationValue::as_f64))
}
