//! # 测试工具
//!
//! 提供基于内存的行情源实现，供下游 crate 的单元测试与集成测试使用。

use crate::common::Stock;
use crate::market::entity::{Bar, DateKey};
use crate::market::error::MarketError;
use crate::market::port::MarketDataProvider;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use std::sync::Mutex;

/// # Summary
/// 内存行情源：按代码返回预置日线，或模拟单个标的抓取失败。
///
/// # Invariants
/// - 不按时间区间过滤数据，原样返回预置的日线。
/// - 记录每一次调用的 (代码, 开始, 结束)，便于断言传入的时间区间。
#[derive(Default)]
pub struct MemoryMarketProvider {
    bars: DashMap<String, Vec<Bar>>,
    failures: DashMap<String, String>,
    requests: Mutex<Vec<(String, DateTime<Utc>, DateTime<Utc>)>>,
}

impl MemoryMarketProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置某个代码的日线
    pub fn with_bars(self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.bars.insert(symbol.to_string(), bars);
        self
    }

    /// 让某个代码的抓取返回网络错误
    pub fn with_failure(self, symbol: &str, message: &str) -> Self {
        self.failures.insert(symbol.to_string(), message.to_string());
        self
    }

    /// 已收到的全部请求
    pub fn requests(&self) -> Vec<(String, DateTime<Utc>, DateTime<Utc>)> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl MarketDataProvider for MemoryMarketProvider {
    async fn fetch_daily_bars(
        &self,
        stock: &Stock,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>, MarketError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((stock.symbol.clone(), start, end));

        if let Some(message) = self.failures.get(&stock.symbol) {
            return Err(MarketError::Network(message.clone()));
        }

        Ok(self
            .bars
            .get(&stock.symbol)
            .map(|v| v.clone())
            .unwrap_or_default())
    }
}

/// # Summary
/// 构造一根日线。日期格式非法时退化为 Unix 纪元日，仅用于测试。
pub fn daily_bar(
    date: &str,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: Option<f64>,
) -> Bar {
    let date = date
        .parse::<DateKey>()
        .unwrap_or(DateKey(NaiveDate::default()));
    Bar {
        date,
        open,
        high,
        low,
        close,
        volume,
    }
}
