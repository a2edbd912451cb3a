use std::collections::BTreeMap;

/// Support metrics for one (source, destination) pair, merged from an
/// externally computed BSSVS / Markov jump table.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SupportEntry {
    pub bayes_factor: Option<f64>,
    pub posterior: Option<f64>,
    pub jumps_mean: Option<f64>,
    pub jumps_hpd_low: Option<f64>,
    pub jumps_hpd_high: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetricKind {
    BayesFactor,
    Posterior,
    Jumps,
}

#[derive(Debug, Default)]
struct MetricSeries {
    bayes_factor: Vec<f64>,
    posterior: Vec<f64>,
    jumps: Vec<f64>,
}

/// Parse a delimiter-sniffed support table into per-pair metric entries.
///
/// Headers that cannot be interpreted as a (source, destination) pair and
/// non-numeric cells are skipped silently; a table with no recognizable
/// columns merges nothing.
pub fn parse_support_table(raw: &str) -> BTreeMap<(String, String), SupportEntry> {
    let delimiter = sniff_delimiter(raw);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(raw.as_bytes());

    let columns: Vec<Option<((String, String), MetricKind)>> = match reader.headers() {
        Ok(headers) => headers.iter().map(interpret_support_column).collect(),
        Err(_) => return BTreeMap::new(),
    };

    let mut series: BTreeMap<(String, String), MetricSeries> = BTreeMap::new();
    for record in reader.records().flatten() {
        for (index, interpreted) in columns.iter().enumerate() {
            let Some((pair, metric)) = interpreted else {
                continue;
            };
            let Some(cell) = record.get(index) else {
                continue;
            };
            let Ok(value) = cell.trim().parse::<f64>() else {
                continue;
            };
            let entry = series.entry(pair.clone()).or_default();
            match metric {
                MetricKind::BayesFactor => entry.bayes_factor.push(value),
                MetricKind::Posterior => entry.posterior.push(value),
                MetricKind::Jumps => entry.jumps.push(value),
            }
        }
    }

    series
        .into_iter()
        .map(|(pair, metrics)| {
            let mut entry = SupportEntry::default();
            if !metrics.bayes_factor.is_empty() {
                entry.bayes_factor = Some(mean(&metrics.bayes_factor));
            }
            if !metrics.posterior.is_empty() {
                entry.posterior = Some(mean(&metrics.posterior).clamp(0.0, 1.0));
            }
            if !metrics.jumps.is_empty() {
                entry.jumps_mean = Some(mean(&metrics.jumps));
                let (low, high) = empirical_hpd(&metrics.jumps);
                entry.jumps_hpd_low = low;
                entry.jumps_hpd_high = high;
            }
            (pair, entry)
        })
        .collect()
}

/// Pick the candidate delimiter (comma, tab, semicolon) whose count is
/// non-zero and consistent across the leading lines; the most frequent
/// consistent candidate wins, comma on ties or when nothing qualifies.
/// Pair headers such as `location.Germany,France.bf` carry literal commas,
/// so a single-line count would misfire on tab-delimited tables.
fn sniff_delimiter(raw: &str) -> u8 {
    let lines: Vec<&str> = raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(5)
        .collect();
    let mut best = (b',', 0usize);
    for candidate in [b',', b'\t', b';'] {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| line.bytes().filter(|b| *b == candidate).count())
            .collect();
        let Some(&first) = counts.first() else {
            continue;
        };
        if first == 0 || counts.iter().any(|&count| count != first) {
            continue;
        }
        if first > best.1 {
            best = (candidate, first);
        }
    }
    best.0
}

/// Interpret a column header as `(source, destination)` plus a metric
/// classification. Tried in order: a bracketed/parenthesized pair, a pair
/// inside a `_`/`.`-separated segment, then a loose "anything before a
/// separator, anything after" split.
fn interpret_support_column(header: &str) -> Option<((String, String), MetricKind)> {
    let header = header.trim();
    if header.is_empty() {
        return None;
    }
    let lowered = header.to_lowercase();

    if let Some(open) = header.find(['[', '(']) {
        let inner_start = open + 1;
        let inner_end = header[inner_start..]
            .find([']', ')'])
            .map(|offset| inner_start + offset)
            .unwrap_or(header.len());
        if let Some(pair) = split_pair(&header[inner_start..inner_end], true) {
            let metric = classify_metric(&header[..open].to_lowercase());
            return Some((pair, metric));
        }
    }

    for segment in header.split(['_', '.']) {
        if let Some(pair) = split_pair(segment, false) {
            return Some((pair, classify_metric(&lowered)));
        }
    }

    split_pair(header, false).map(|pair| (pair, classify_metric(&lowered)))
}

/// Split text into two non-empty labels around the first `->`, `,` or `:`
/// (plus whitespace when allowed, for bracketed pairs).
fn split_pair(text: &str, allow_whitespace: bool) -> Option<(String, String)> {
    let text = text.trim();
    let mut split: Option<(usize, usize)> = None;
    let mut consider = |index: usize, len: usize| {
        if split.map_or(true, |(best, _)| index < best) {
            split = Some((index, len));
        }
    };
    if let Some(index) = text.find("->") {
        consider(index, 2);
    }
    for separator in [',', ':'] {
        if let Some(index) = text.find(separator) {
            consider(index, 1);
        }
    }
    if allow_whitespace {
        if let Some(index) = text.find(char::is_whitespace) {
            consider(index, 1);
        }
    }

    let (index, len) = split?;
    let src = text[..index].trim().trim_matches('"');
    let dst = text[index + len..]
        .trim_start_matches(|c: char| matches!(c, '-' | '>' | ',' | ':') || c.is_whitespace())
        .trim()
        .trim_matches('"');
    if src.is_empty() || dst.is_empty() {
        return None;
    }
    Some((src.to_string(), dst.to_string()))
}

fn classify_metric(text: &str) -> MetricKind {
    if text.contains("bf") || text.contains("bayes") {
        return MetricKind::BayesFactor;
    }
    if text.contains("indicator") || text.contains("posterior") || text.contains("support") {
        return MetricKind::Posterior;
    }
    if text.contains("jump") || text.contains("count") {
        return MetricKind::Jumps;
    }
    MetricKind::Posterior
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Empirical 2.5%/97.5% bounds by index-based order statistics, not
/// interpolated.
fn empirical_hpd(values: &[f64]) -> (Option<f64>, Option<f64>) {
    if values.is_empty() {
        return (None, None);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    let lower_index = ((n as f64 * 0.025) as isize - 1).max(0) as usize;
    let upper_index = ((n as f64 * 0.975) as usize).min(n - 1);
    (Some(sorted[lower_index]), Some(sorted[upper_index]))
}
