use kurabe_core::compare::entity::{CandleBar, CandleKind, OhlcColumns};

/// 单个位置上完整的 OHLC 输入
#[derive(Debug, Clone, Copy)]
struct OhlcRow {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

/// # Summary
/// 平均 K 线递推状态。
///
/// # Invariants
/// - `Reset`: 序列起点或上一位置未定义，下一根按 `(open + close) / 2` 起算。
/// - `Defined`: 上一位置已定义，下一根按 `(prevHaOpen + prevHaClose) / 2` 递推。
#[derive(Debug, Clone, Copy, PartialEq)]
enum Carry {
    Reset,
    Defined { ha_open: f64, ha_close: f64 },
}

/// 逐位置取出四列，任一缺失或非有限值则为 None
fn rows(ohlc: &OhlcColumns) -> impl Iterator<Item = Option<OhlcRow>> + '_ {
    let finite = |v: &Option<f64>| v.filter(|x| x.is_finite());
    ohlc.open
        .iter()
        .zip(&ohlc.high)
        .zip(&ohlc.low)
        .zip(&ohlc.close)
        .map(move |(((o, h), l), c)| {
            Some(OhlcRow {
                open: finite(o)?,
                high: finite(h)?,
                low: finite(l)?,
                close: finite(c)?,
            })
        })
}

/// # Summary
/// 由对齐后的 OHLC 计算平均 K 线 (Heikin-Ashi)。
///
/// # Logic
/// 严格从左到右的单遍折叠，状态由 `Carry` 显式携带：
/// 1. 任一输入缺失：输出 None 并将状态重置为 `Reset`。
/// 2. `haClose = (o + h + l + c) / 4`。
/// 3. `haOpen` 在 `Defined` 状态下取 `(prevHaOpen + prevHaClose) / 2`，否则取 `(o + c) / 2`。
/// 4. `haHigh = max(h, haOpen, haClose)`，`haLow = min(l, haOpen, haClose)`。
/// 5. 携带 `(haOpen, haClose)` 进入下一位置。
///
/// # Arguments
/// * `ohlc`: 对齐后的 OHLC 四列。
///
/// # Returns
/// 与输入等长的序列，None 表示该位置未定义。
pub fn heikin_ashi(ohlc: &OhlcColumns) -> Vec<Option<CandleBar>> {
    rows(ohlc)
        .scan(Carry::Reset, |carry, row| {
            let Some(row) = row else {
                *carry = Carry::Reset;
                return Some(None);
            };

            let ha_close = (row.open + row.high + row.low + row.close) / 4.0;
            let ha_open = match *carry {
                Carry::Defined { ha_open, ha_close } => (ha_open + ha_close) / 2.0,
                Carry::Reset => (row.open + row.close) / 2.0,
            };
            *carry = Carry::Defined { ha_open, ha_close };

            Some(Some(CandleBar {
                open: ha_open,
                close: ha_close,
                low: row.low.min(ha_open).min(ha_close),
                high: row.high.max(ha_open).max(ha_close),
            }))
        })
        .collect()
}

/// 普通蜡烛：逐位置独立映射为 `[open, close, low, high]`
pub fn candlesticks(ohlc: &OhlcColumns) -> Vec<Option<CandleBar>> {
    rows(ohlc)
        .map(|row| {
            row.map(|r| CandleBar {
                open: r.open,
                close: r.close,
                low: r.low,
                high: r.high,
            })
        })
        .collect()
}

/// 按请求的类型派生蜡烛序列
pub fn derive_candles(kind: CandleKind, ohlc: &OhlcColumns) -> Vec<Option<CandleBar>> {
    match kind {
        CandleKind::HeikinAshi => heikin_ashi(ohlc),
        CandleKind::Candlestick => candlesticks(ohlc),
    }
}
