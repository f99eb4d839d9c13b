use kurabe_core::market::entity::DateKey;
use std::collections::BTreeSet;
use tracing::debug;

/// # Summary
/// 由各标的的交易日集合计算共享时间轴。
///
/// # Logic
/// 1. 对所有集合求交集。
/// 2. 交集非空时直接作为时间轴 (升序)。
/// 3. 交集为空 (某个标的无数据或交易日完全不重叠) 时退化为并集 (升序)。
///
/// # Arguments
/// * `date_sets`: 每个标的一个交易日集合，顺序无关。
///
/// # Returns
/// 严格升序、无重复的交易日序列。没有任何标的时返回空序列。
pub fn build_axis(date_sets: &[BTreeSet<DateKey>]) -> Vec<DateKey> {
    let Some((first, rest)) = date_sets.split_first() else {
        return Vec::new();
    };

    let intersection = rest.iter().fold(first.clone(), |acc, set| {
        acc.intersection(set).copied().collect()
    });

    if !intersection.is_empty() {
        debug!(
            "Shared axis: intersection of {} tickers, {} dates",
            date_sets.len(),
            intersection.len()
        );
        return intersection.into_iter().collect();
    }

    let union: BTreeSet<DateKey> = date_sets.iter().flatten().copied().collect();
    debug!(
        "Shared axis: empty intersection, falling back to union of {} dates",
        union.len()
    );
    union.into_iter().collect()
}
