//! # `kurabe-core` - 领域核心
//!
//! 定义多标的对比引擎的实体、错误类型与端口 (Port) 契约。
//! 本 crate 不包含任何基础设施实现，具体实现由 `feed`、`align` 等 crate 注入。

pub mod common;
pub mod config;

pub mod market {
    pub mod entity;
    pub mod error;
    pub mod port;
}

pub mod compare {
    pub mod entity;
    pub mod error;
    pub mod port;
}

#[cfg(feature = "test-utils")]
pub mod test_utils;
