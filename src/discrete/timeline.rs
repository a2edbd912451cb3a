use crate::tree::annotation::AnnotationValue;
use crate::tree::TreeNode;
use chrono::{Datelike, NaiveDate};

/// Infer the reference calendar year used to convert "time before
/// present" into calendar time: the most recent parseable date found in
/// any date/year-like annotation across the tree, as a fractional year.
///
/// This is a heuristic. The winning date is whatever the annotations
/// happen to carry, which need not be the sampling date the original
/// analysis intended.
pub fn infer_reference_year(nodes: &[TreeNode]) -> Option<f64> {
    let mut latest: Option<NaiveDate> = None;
    for node in nodes {
        for (key, value) in &node.annotations {
            let text = match value {
                AnnotationValue::Text(s) => s.clone(),
                AnnotationValue::Int(i) => i.to_string(),
                AnnotationValue::Float(f) => f.to_string(),
                _ => continue,
            };
            let lowered = key.to_lowercase();
            if !lowered.contains("date") && !lowered.contains("year") {
                continue;
            }
            if let Some(parsed) = parse_date(&text) {
                if latest.map_or(true, |current| parsed > current) {
                    latest = Some(parsed);
                }
            }
        }
    }

    let latest = latest?;
    let start_of_year = NaiveDate::from_ymd_opt(latest.year(), 1, 1)?;
    let elapsed_days = (latest - start_of_year).num_days() as f64;
    Some(latest.year() as f64 + elapsed_days / 365.25)
}

/// Accepted date formats, from most to least specific: `%Y-%m-%d`,
/// `%Y/%m/%d`, `%d-%b-%Y`, `%Y-%m`, `%Y`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%d-%b-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    // Year-month and bare-year forms lack a day; anchor them to the first.
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01-01", trimmed), "%Y-%m-%d") {
        return Some(date);
    }
    None
}

/// Time statistics inherited by edge observations from a child node:
/// median (explicit annotation, else time before present) and the 95% HPD
/// bounds when annotated. With a reference year, everything converts from
/// time-before-present to calendar years, re-sorting the bounds.
pub fn extract_time_stats(
    node: &TreeNode,
    reference_year: Option<f64>,
) -> (Option<f64>, Option<f64>, Option<f64>) {
    let mut median = numeric_annotation(node, &["height_median", "time_median"])
        .or(Some(node.time_before_present));

    let hpd_values = sequence_annotation(node, &["height_95%_HPD", "height_95%HPD", "time_95%_HPD"]);
    let (mut hpd_low, mut hpd_high) = match hpd_values {
        Some(values) if values.len() >= 2 => (
            values.iter().copied().reduce(f64::min),
            values.iter().copied().reduce(f64::max),
        ),
        _ => (None, None),
    };

    if let Some(reference_year) = reference_year {
        median = median.map(|value| reference_year - value);
        let converted_low = hpd_low.map(|value| reference_year - value);
        let converted_high = hpd_high.map(|value| reference_year - value);
        match (converted_low, converted_high) {
            (Some(low), Some(high)) => {
                hpd_low = Some(low.min(high));
                hpd_high = Some(low.max(high));
            }
            _ => {
                hpd_low = converted_low;
                hpd_high = converted_high;
            }
        }
    }

    (median, hpd_low, hpd_high)
}

fn numeric_annotation(node: &TreeNode, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| node.annotations.get(*key).and_then(AnnotationValue::as_f64))
}

fn sequence_annotation(node: &TreeNode, keys: &[&str]) -> Option<Vec<f64>> {
    for key in keys {
        if let Some(items) = node.annotations.get(*key).and_then(AnnotationValue::as_list) {
            let numeric: Vec<f64> = items.iter().filter_map(AnnotationValue::as_f64).collect();
            if !numeric.is_empty() {
                return Some(numeric);
            }
        }
    }
    None
}
