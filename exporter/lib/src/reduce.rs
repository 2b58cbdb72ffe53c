//! Reduction of provider time series into scalar rates
//!
//! Everything here is pure. A `None` result means the series gave nothing to
//! divide by; callers omit the sample instead of exposing NaN.

use std::collections::BTreeMap;

use crate::config::BandwidthAverage;
use crate::models::provider::{BandwidthData, HitMissData};

/// Provider-side class buckets end with this character and are not inputs
const CLASS_SUFFIX: char = 'x';

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRatios {
    pub hit_rate: Option<f64>,
    pub byte_hit_rate: Option<f64>,
}

/// Sum of provider counters, widened so no sample set can overflow it
fn total<'a>(samples: impl IntoIterator<Item = &'a i64>) -> i128 {
    samples.into_iter().map(|&sample| i128::from(sample)).sum()
}

fn ratio(part: i128, whole: i128) -> Option<f64> {
    (whole != 0).then(|| part as f64 / whole as f64)
}

/// Average of the China zone samples, in bytes per second.
///
/// Samples of every entry are summed. The divisor depends on `mode`:
/// [`BandwidthAverage::LastEntry`] divides by the sample count of the last
/// entry in key order, [`BandwidthAverage::AllSamples`] by the count of every
/// entry. Overseas samples are not part of the average.
pub fn bandwidth_average(data: &BandwidthData, mode: BandwidthAverage) -> Option<f64> {
    let sum = total(data.values().flat_map(|zone| zone.china.iter()));

    let count = match mode {
        BandwidthAverage::LastEntry => data.values().last().map_or(0, |zone| zone.china.len()),
        BandwidthAverage::AllSamples => data.values().map(|zone| zone.china.len()).sum(),
    };

    (count != 0).then(|| sum as f64 / count as f64)
}

/// Request and byte hit ratios over the whole window
pub fn hit_ratios(data: &HitMissData) -> HitRatios {
    let hit = total(&data.hit);
    let miss = total(&data.miss);
    let traffic_hit = total(&data.traffic_hit);
    let traffic_miss = total(&data.traffic_miss);

    HitRatios {
        hit_rate: ratio(hit, hit + miss),
        byte_hit_rate: ratio(traffic_hit, traffic_hit + traffic_miss),
    }
}

/// Class bucket of an exact status code, by leading digit
fn status_class(code: &str) -> Option<&'static str> {
    match code.chars().next()? {
        '2' => Some("2xx"),
        '3' => Some("3xx"),
        '4' => Some("4xx"),
        '5' => Some("5xx"),
        _ => None,
    }
}

/// Share of each exact status code plus the `2xx`..`5xx` class shares.
///
/// Tokens ending in `x` are provider class buckets and are ignored, including
/// for the grand total. Exact codes outside 2-5 count toward the grand total
/// but get no class bucket. Empty when no request was counted.
pub fn status_proportions(codes: &BTreeMap<String, Vec<i64>>) -> BTreeMap<String, f64> {
    let totals: Vec<(&str, i128)> = codes
        .iter()
        .filter(|(code, _)| !code.ends_with(CLASS_SUFFIX))
        .map(|(code, samples)| (code.as_str(), total(samples)))
        .collect();

    let grand_total: i128 = totals.iter().map(|(_, count)| count).sum();

    let mut proportions = BTreeMap::new();
    if grand_total == 0 {
        return proportions;
    }

    for (code, count) in totals {
        let proportion = count as f64 / grand_total as f64;
        proportions.insert(code.to_string(), proportion);

        if let Some(class) = status_class(code) {
            *proportions.entry(class.to_string()).or_insert(0.0) += proportion;
        }
    }

    proportions
}
