use crate::discrete::support::SupportEntry;
use crate::discrete::types::EdgeAggregate;
use std::cmp::Ordering;

/// One (source, destination) co-occurrence observed on a single tree
/// edge. Discarded after aggregation; only the per-pair aggregate
/// survives.
#[derive(Debug, Clone)]
pub struct EdgeObservation {
    pub weight: f64,
    pub time_median: Option<f64>,
    pub hpd_low: Option<f64>,
    pub hpd_high: Option<f64>,
}

/// Weighted-mean accumulator for location coordinates.
#[derive(Debug, Default, Clone)]
pub struct LocationAccumulator {
    weight_sum: f64,
    lat_sum: f64,
    lon_sum: f64,
}

impl LocationAccumulator {
    pub fn add(&mut self, latitude: f64, longitude: f64, weight: f64) {
        if !(latitude.is_finite() && longitude.is_finite() && weight > 0.0) {
            return;
        }
        self.weight_sum += weight;
        self.lat_sum += latitude * weight;
        self.lon_sum += longitude * weight;
    }

    pub fn mean(&self) -> Option<(f64, f64)> {
        if self.weight_sum <= 0.0 {
            return None;
        }
        Some((self.lat_sum / self.weight_sum, self.lon_sum / self.weight_sum))
    }
}

/// Weighted quantile over whichever observations carry the selected
/// value: sort ascending, accumulate weight, return the first value at
/// which the cumulative share reaches the quantile.
pub fn weighted_quantile(
    observations: &[EdgeObservation],
    quantile: f64,
    select: impl Fn(&EdgeObservation) -> Option<f64>,
) -> Option<f64> {
    let mut pairs: Vec<(f64, f64)> = observations
        .iter()
        .filter_map(|obs| select(obs).map(|value| (value, obs.weight)))
        .collect();
    if pairs.is_empty() {
        return None;
    }
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    let total: f64 = pairs.iter().map(|(_, weight)| weight).sum();
    let mut cumulative = 0.0;
    for (value, weight) in &pairs {
        cumulative += weight;
        if cumulative / total >= quantile {
            return Some(*value);
        }
    }
    pairs.last().map(|(value, _)| *value)
}

/// Reduce all observations for one (source, destination) pair to an
/// aggregate: summed weight, weighted time median and 95% bounds, plus
/// any externally supplied support metrics.
pub fn summarize_edge(
    src: &str,
    dst: &str,
    observations: &[EdgeObservation],
    support: Option<&SupportEntry>,
) -> EdgeAggregate {
    let total_weight: f64 = observations.iter().map(|obs| obs.weight).sum();
    if total_weight <= 0.0 {
        return EdgeAggregate {
            src: src.to_string(),
            dst: dst.to_string(),
            weight: 0.0,
            ..EdgeAggregate::default()
        };
    }

    let mut time_median = weighted_quantile(observations, 0.5, |obs| obs.time_median);
    let mut time_hpd_low = weighted_quantile(observations, 0.025, |obs| obs.hpd_low);
    let mut time_hpd_high = weighted_quantile(observations, 0.975, |obs| obs.hpd_high);

    if time_median.is_none() {
        let times: Vec<f64> = observations.iter().filter_map(|obs| obs.time_median).collect();
        if !times.is_empty() {
            time_median = Some(times.iter().sum::<f64>() / times.len() as f64);
        }
    }
    if time_hpd_low.is_none() {
        time_hpd_low = observations
            .iter()
            .filter_map(|obs| obs.hpd_low)
            .reduce(f64::min);
    }
    if time_hpd_high.is_none() {
        time_hpd_high = observations
            .iter()
            .filter_map(|obs| obs.hpd_high)
            .reduce(f64::max);
    }

    let mut aggregate = EdgeAggregate {
        src: src.to_string(),
        dst: dst.to_string(),
        weight: total_weight,
        time_median,
        time_hpd_low,
        time_hpd_high,
        ..EdgeAggregate::default()
    };

    if let Some(support) = support {
        aggregate.bayes_factor = support.bayes_factor;
        aggregate.posterior_support = support.posterior;
        aggregate.jumps_mean = support.jumps_mean;
        aggregate.jumps_hpd_low = support.jumps_hpd_low;
        aggregate.jumps_hpd_high = support.jumps_hpd_high;
    }

    aggregate
}
