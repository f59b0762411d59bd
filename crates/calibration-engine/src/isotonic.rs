//! Pool-adjacent-violators pooling toward a monotonic win-rate curve.

use crate::bucket::ConfidenceBucket;

/// Enforce a monotonically non-decreasing win-rate-vs-confidence
/// relationship over the bucket sequence.
///
/// Empty buckets carry no statistical weight and are discarded. Whenever an
/// adjacent pair violates monotonicity (left win rate above right), the two
/// are merged into a pooled bucket whose win rate is the count-weighted
/// average, whose outcome list is the concatenation, and whose confidence
/// range spans both.
///
/// Implemented as a single left-to-right pass with a stack: each incoming
/// bucket is merged backward into the stack until the suffix is ordered.
/// Cannot fail on well-formed input and terminates because every merge
/// reduces the bucket count by one.
pub fn pool_adjacent_violators(buckets: Vec<ConfidenceBucket>) -> Vec<ConfidenceBucket> {
    let mut pooled: Vec<ConfidenceBucket> = Vec::with_capacity(buckets.len());

    for bucket in buckets.into_iter().filter(|b| b.count > 0) {
        let mut current = bucket;
        while pooled
            .last()
            .map_or(false, |left| left.win_rate > current.win_rate)
        {
            if let Some(left) = pooled.pop() {
                current = merge(left, current);
            }
        }
        pooled.push(current);
    }

    pooled
}

fn merge(left: ConfidenceBucket, right: ConfidenceBucket) -> ConfidenceBucket {
    let count = left.count + right.count;
    let win_rate = if count == 0 {
        0.0
    } else {
        (left.win_rate * left.count as f64 + right.win_rate * right.count as f64) / count as f64
    };

    let mut outcomes = left.outcomes;
    outcomes.extend(right.outcomes);

    ConfidenceBucket {
        min_confidence: left.min_confidence.min(right.min_confidence),
        max_confidence: left.max_confidence.max(right.max_confidence),
        outcomes,
        win_rate,
        count,
    }
}
