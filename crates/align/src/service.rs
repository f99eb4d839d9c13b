use crate::assemble::assemble;
use crate::axis::build_axis;
use crate::candles::derive_candles;
use crate::range::resolve_range;
use crate::reindex::reindex;
use async_trait::async_trait;
use futures::future::join_all;
use kurabe_core::common::Stock;
use kurabe_core::common::time::TimeProvider;
use kurabe_core::compare::entity::{ComparedSeries, CompareQuery, Comparison, DateRange};
use kurabe_core::compare::error::CompareError;
use kurabe_core::compare::port::ComparePort;
use kurabe_core::market::entity::TickerSeries;
use kurabe_core::market::port::MarketDataProvider;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

/// # Summary
/// `CompareService` 是对比请求的编排者，实现了 `ComparePort`。
/// 串联 时间窗口解析 -> 并发抓取 -> 共享时间轴 -> 重建索引 -> 派生蜡烛 -> 组装。
///
/// # Invariants
/// - 无状态：不缓存任何行情数据，每个请求独立。
/// - 单个标的抓取失败只降级该标的为空序列，不影响整个请求。
pub struct CompareService {
    /// 原始行情数据源
    provider: Arc<dyn MarketDataProvider>,
    /// 参考时刻供给器
    clock: Arc<dyn TimeProvider>,
}

impl CompareService {
    pub fn new(provider: Arc<dyn MarketDataProvider>, clock: Arc<dyn TimeProvider>) -> Self {
        Self { provider, clock }
    }

    /// # Summary
    /// 并发抓取所有标的的日线并等待全部结束。
    ///
    /// # Logic
    /// 1. 每个标的启动一个独立任务，互不共享可变状态。
    /// 2. 等待所有任务结束，不提前返回。
    /// 3. 抓取错误或任务异常均记录警告，并降级为空序列。
    ///
    /// # Returns
    /// 与 `stocks` 顺序一致的原始序列。
    async fn fetch_all(&self, stocks: &[Stock], range: DateRange) -> Vec<TickerSeries> {
        let handles = stocks.iter().map(|stock| {
            let provider = self.provider.clone();
            let stock = stock.clone();
            tokio::spawn(async move {
                provider
                    .fetch_daily_bars(&stock, range.start, range.end)
                    .await
            })
        });

        join_all(handles)
            .await
            .into_iter()
            .zip(stocks)
            .map(|(joined, stock)| match joined {
                Ok(Ok(bars)) => TickerSeries::new(stock.symbol.clone(), bars),
                Ok(Err(e)) => {
                    warn!("Failed to fetch {}: {}", stock.symbol, e);
                    TickerSeries::empty(stock.symbol.clone())
                }
                Err(e) => {
                    warn!("Fetch task for {} aborted: {}", stock.symbol, e);
                    TickerSeries::empty(stock.symbol.clone())
                }
            })
            .collect()
    }
}

/// # Summary
/// 规范化并校验请求中的标的列表。
///
/// # Logic
/// 1. 每个代码去空白、转大写，丢弃空串。
/// 2. 规范化后为空则返回校验错误。
pub fn normalize_tickers(raw: &[String]) -> Result<Vec<Stock>, CompareError> {
    let stocks: Vec<Stock> = raw.iter().filter_map(|t| Stock::normalize(t)).collect();
    if stocks.is_empty() {
        return Err(CompareError::Validation("tickers required".to_string()));
    }
    Ok(stocks)
}

#[async_trait]
impl ComparePort for CompareService {
    /// # Logic
    /// 1. 规范化标的列表，为空立即返回校验错误，不做任何抓取。
    /// 2. 以注入的参考时刻解析时间窗口。
    /// 3. 并发抓取，全部结束后由各标的交易日集合构建共享时间轴。
    /// 4. 逐标的重建索引，按需派生蜡烛。
    /// 5. 校验长度一致性并组装。
    async fn compare(&self, query: CompareQuery) -> Result<Comparison, CompareError> {
        let stocks = normalize_tickers(&query.tickers)?;
        let range = resolve_range(query.timeframe, query.custom_range.as_ref(), self.clock.now());

        let fetched = self.fetch_all(&stocks, range).await;

        let date_sets: Vec<BTreeSet<_>> = fetched.iter().map(TickerSeries::date_keys).collect();
        let axis = build_axis(&date_sets);

        let series = fetched
            .iter()
            .map(|raw| {
                let aligned = reindex(raw, &axis);
                let candles = query.candles.map(|kind| derive_candles(kind, &aligned.ohlc));
                ComparedSeries { aligned, candles }
            })
            .collect();

        let comparison = assemble(axis, series)?;
        info!(
            "Compared {} tickers over {} dates ({} .. {})",
            comparison.series.len(),
            comparison.dates.len(),
            range.start.to_rfc3339(),
            range.end.to_rfc3339()
        );
        Ok(comparison)
    }
}
