//! # `kurabe-api` - HTTP API 网关
//!
//! 本 crate 是 Kurabe 多标的对比引擎的 HTTP/REST 服务入口。
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 接收来自图表前端的对比请求 (`POST /api/stock-data`)
//! - 调用下层 `ComparePort` 完成对齐与蜡烛派生
//! - 将领域模型转换为 DTO 返回给前端

pub mod error;
pub mod routes;
pub mod server;
pub mod types;
