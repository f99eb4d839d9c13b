use thiserror::Error;

/// # Summary
/// 对比服务错误枚举。
///
/// # Invariants
/// - 单个标的的抓取失败不属于此错误，会在服务内部降级为空序列。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CompareError {
    /// 请求校验失败，例如规范化后标的列表为空
    #[error("{0}")]
    Validation(String),
    /// 组装过程中的意外失败，不返回任何部分结果
    #[error("Internal error: {0}")]
    Internal(String),
}
