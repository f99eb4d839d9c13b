use kurabe_core::compare::entity::{AlignedSeries, OhlcColumns};
use kurabe_core::market::entity::{Bar, DateKey, TickerSeries};
use std::collections::HashMap;

/// # Summary
/// 将单个标的的原始日线投影到共享时间轴上。
///
/// # Logic
/// 1. 建立 交易日 -> 日线 的查找表，重复交易日以后出现者为准。
/// 2. 遍历时间轴，命中则输出字段值，未命中输出 None。
/// 3. 成交量为 0 视为有效值；数据源未提供或非有限值的成交量输出 None。
///
/// # Arguments
/// * `series`: 标的原始日线，可为空。
/// * `axis`: 共享时间轴。
///
/// # Returns
/// 各列长度均等于 `axis.len()` 的对齐序列；空输入得到全 None 序列，标的身份保留。
pub fn reindex(series: &TickerSeries, axis: &[DateKey]) -> AlignedSeries {
    let lookup: HashMap<DateKey, &Bar> = series.bars.iter().map(|b| (b.date, b)).collect();

    let mut ohlc = OhlcColumns::with_capacity(axis.len());
    let mut volume = Vec::with_capacity(axis.len());

    for key in axis {
        let bar = lookup.get(key);
        ohlc.open.push(bar.map(|b| b.open));
        ohlc.high.push(bar.map(|b| b.high));
        ohlc.low.push(bar.map(|b| b.low));
        ohlc.close.push(bar.map(|b| b.close));
        volume.push(bar.and_then(|b| b.volume).filter(|v| v.is_finite()));
    }

    AlignedSeries {
        ticker: series.symbol.to_uppercase(),
        ohlc,
        volume,
    }
}
