//! Weighted median heuristic.

use crate::rng::Coin;

/// Median of a node without neighbours on the fixed side: keep its slot.
pub const NO_MEDIAN: f64 = -1.0;

/// Weighted median of sorted neighbour positions.
///
/// For an even count above two the inner pair is interpolated towards the side whose outer
/// neighbours are packed more tightly.
pub fn weighted_median(sorted: &[usize]) -> f64 {
    let n = sorted.len();
    match n {
        0 => NO_MEDIAN,
        _ if n % 2 == 1 => sorted[n / 2] as f64,
        2 => (sorted[0] + sorted[1]) as f64 / 2.0,
        _ => {
            let m = n / 2;
            let inner_left = sorted[m - 1] as f64;
            let inner_right = sorted[m] as f64;
            let left = inner_left - sorted[0] as f64;
            let right = sorted[n - 1] as f64 - inner_right;
            if left + right == 0.0 {
                (inner_left + inner_right) / 2.0
            } else {
                (inner_left * right + inner_right * left) / (left + right)
            }
        }
    }
}

/// Reorders `layer` by `medians` (indexed by node).
///
/// Nodes whose median is [`NO_MEDIAN`] stay in their slots; the others fill the remaining slots
/// in median order. Equal medians keep their relative order unless the coin sends a newcomer in
/// front of its equals.
pub(crate) fn sort_by_medians<C: Coin>(
    layer: &mut [usize],
    medians: &[f64],
    coin: &mut C,
    sorted: &mut Vec<(f64, usize)>,
) {
    sorted.clear();
    for &v in layer.iter() {
        let m = medians[v];
        if m == NO_MEDIAN {
            continue;
        }
        let after_equals = sorted.partition_point(|&(k, _)| k <= m);
        let before_equals = sorted.partition_point(|&(k, _)| k < m);
        let at = if before_equals < after_equals && coin.head_of_the_coin() {
            before_equals
        } else {
            after_equals
        };
        sorted.insert(at, (m, v));
    }

    let mut next = sorted.iter();
    for slot in layer.iter_mut() {
        if medians[*slot] == NO_MEDIAN {
            continue;
        }
        if let Some(&(_, v)) = next.next() {
            *slot = v;
        }
    }
}
