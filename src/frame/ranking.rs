use std::cmp::Ordering;

/// Entity indices ordered from highest to lowest raw value.
///
/// NaN samples sort after every numeric sample; equal values keep encounter order.
pub fn rank_order(raw: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..raw.len()).collect();
    order.sort_by(|&a, &b| compare_desc(raw[a], raw[b]));
    order
}

/// 0-based rank per entity index (0 = highest).
pub fn ranks(raw: &[f64]) -> Vec<usize> {
    let mut out = vec![0; raw.len()];
    for (rank, idx) in rank_order(raw).into_iter().enumerate() {
        out[idx] = rank;
    }
    out
}

fn compare_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/ranking.rs"]
mod tests;
