//! # `kurabe-align` - 时间序列对齐与派生引擎
//!
//! 将多个标的各自的日线序列对齐到同一条时间轴上，供图表层逐位置并排绘制。
//!
//! ## 处理流程
//! 1. `range`: 解析时间窗口标签为具体区间
//! 2. `service`: 并发抓取每个标的的日线
//! 3. `axis`: 计算共享时间轴 (交集优先，交集为空时退化为并集)
//! 4. `reindex`: 将每个标的投影到共享时间轴，缺失位置显式置空
//! 5. `candles`: 按需派生平均 K 线 / 普通蜡烛
//! 6. `assemble`: 校验长度一致性并组装结果

pub mod assemble;
pub mod axis;
pub mod candles;
pub mod range;
pub mod reindex;
pub mod service;
