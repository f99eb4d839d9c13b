//! 路由控制器

pub mod stock_data;
pub mod system;
