use thiserror::Error;

/// 客户端错误
#[derive(Error, Debug)]
pub enum ClientError {
    /// 连接失败、超时等传输层错误
    #[error("Network error: {0}")]
    Network(String),

    /// 服务端返回非 2xx 状态
    #[error("{status}: {message}")]
    Status { status: u16, message: String },

    /// 响应体无法解析
    #[error("Decode error: {0}")]
    Decode(String),

    /// 端点地址非法
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}
