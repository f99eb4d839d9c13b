//! # `kurabe-feed` - 行情源适配器
//!
//! `MarketDataProvider` 端口的具体实现。

pub mod yahoo;
