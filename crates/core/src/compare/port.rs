use super::entity::{CompareQuery, Comparison};
use super::error::CompareError;
use async_trait::async_trait;

/// # Summary
/// 多标的对比服务抽象接口。
/// HTTP 网关通过此端口提交对比请求，不感知行情源与对齐算法的具体实现。
///
/// # Invariants
/// - 无状态、请求级：不同请求之间不共享任何可变数据，可完全并行。
#[async_trait]
pub trait ComparePort: Send + Sync {
    /// 执行一次对比
    ///
    /// # Arguments
    /// * `query` - 用户的原始对比请求
    ///
    /// # Returns
    /// * `Ok(Comparison)` - 时间轴与所有标的对齐序列，长度必然一致
    /// * `Err(CompareError)` - 校验失败或内部错误，不返回部分结果
    async fn compare(&self, query: CompareQuery) -> Result<Comparison, CompareError>;
}
