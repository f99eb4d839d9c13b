use kurabe_core::compare::entity::{ComparedSeries, Comparison};
use kurabe_core::compare::error::CompareError;
use kurabe_core::market::entity::DateKey;

/// # Summary
/// 组装对比结果。
///
/// # Logic
/// 1. 校验时间轴严格升序。
/// 2. 校验每个序列的 OHLC、成交量及派生蜡烛长度都等于时间轴长度。
/// 3. 任何不一致都作为内部错误返回，绝不输出结构不一致的结果。
///
/// # Arguments
/// * `dates`: 共享时间轴。
/// * `series`: 各标的对齐序列 (及可选派生蜡烛)，顺序即输出顺序。
///
/// # Returns
/// 成功返回 `Comparison`，失败返回 `CompareError::Internal`。
pub fn assemble(
    dates: Vec<DateKey>,
    series: Vec<ComparedSeries>,
) -> Result<Comparison, CompareError> {
    if dates.windows(2).any(|w| w[0] >= w[1]) {
        return Err(CompareError::Internal(
            "shared axis is not strictly ascending".to_string(),
        ));
    }

    let len = dates.len();
    for s in &series {
        let aligned = &s.aligned;
        let candles_ok = s.candles.as_ref().is_none_or(|c| c.len() == len);
        if !aligned.ohlc.is_uniform(len) || aligned.volume.len() != len || !candles_ok {
            return Err(CompareError::Internal(format!(
                "series {} does not match axis length {}",
                aligned.ticker, len
            )));
        }
    }

    Ok(Comparison { dates, series })
}
