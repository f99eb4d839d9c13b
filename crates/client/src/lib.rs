//! # `kurabe-client` - 对比接口客户端
//!
//! 面向前端或脚本调用方的薄封装：优先请求直连后端，网络层不可达时回退到备用端点一次。

pub mod client;
pub mod error;
