use std::collections::BTreeMap;

use super::model::AggregatedPoint;

// ---------------------------------------------------------------------------
// Group-by-size
// ---------------------------------------------------------------------------

/// Group `samples` by problem size and summarise `metric` per group.
///
/// Groups come back in ascending size order. Only sizes that occur in the
/// input produce a group, so every point has `count >= 1`.
pub fn aggregate_by_size<T, K, M>(samples: &[T], size: K, metric: M) -> Vec<AggregatedPoint>
where
    K: Fn(&T) -> u32,
    M: Fn(&T) -> f64,
{
    let mut groups: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for sample in samples {
        groups.entry(size(sample)).or_default().push(metric(sample));
    }

    groups
        .into_iter()
        .map(|(size, values)| {
            let point = AggregatedPoint {
                size,
                mean: mean(&values),
                std_dev: sample_std_dev(&values),
                count: values.len(),
            };
            log::debug!(
                "size {size}: mean {:.4} over {} samples",
                point.mean,
                point.count
            );
            point
        })
        .collect()
}

/// Arithmetic mean. `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
///
/// `None` with fewer than two values, where it is undefined.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}
