use crate::common::Stock;
use crate::market::entity::Bar;
use crate::market::error::MarketError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// # Summary
/// 行情数据提供者接口（原始数据源）。
///
/// # Invariants
/// - 每个标的的请求相互独立，可被并发调用。
/// - 重试、超时与限流由实现者自行负责，调用方不做任何补偿。
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// # Summary
    /// 获取特定证券在指定时间范围内的日线数据。
    ///
    /// # Logic
    /// 1. 构建数据源请求 (日线周期)。
    /// 2. 执行网络请求并解析响应数据。
    /// 3. 按交易日升序返回。
    ///
    /// # Arguments
    /// * `stock`: 证券身份。
    /// * `start`: 开始时间。
    /// * `end`: 结束时间。
    ///
    /// # Returns
    /// 成功返回日线列表，失败返回 MarketError。
    async fn fetch_daily_bars(
        &self,
        stock: &Stock,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>, MarketError>;
}
