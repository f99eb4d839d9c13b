//! # 多标的对比路由控制器
//!
//! 实现 `/api/stock-data` 及其别名 `/api/stocks/fetch`。
//! 两个路径共享同一套处理逻辑，返回对齐后的时间轴与各标的序列。

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use kurabe_core::compare::entity::CompareQuery;
use tracing::Instrument;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ErrorResponse, StockDataRequest, StockDataResponse};

/// # Summary
/// 执行一次对比请求。
///
/// # Logic
/// 1. 请求体解析失败直接返回 400。
/// 2. 为本次请求生成 request_id 并挂到 tracing span 上。
/// 3. 调用 `ComparePort`，将领域结果转换为 DTO。
async fn run_compare(
    state: AppState,
    payload: Result<Json<StockDataRequest>, JsonRejection>,
) -> Result<Json<StockDataResponse>, ApiError> {
    let Json(req) = payload?;
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("compare", %request_id, tickers = req.tickers.len());

    let query: CompareQuery = req.into();
    let comparison = state.compare.compare(query).instrument(span).await?;

    Ok(Json(comparison.into()))
}

/// 获取多标的对齐行情
///
/// 按时间窗口并发抓取每个标的的日线，构建共享时间轴 (交集优先，为空时退化为并集)，
/// 缺失交易日以 null 填充；可选派生平均 K 线。
#[utoipa::path(
    post,
    path = "/api/stock-data",
    tag = "对比 (Compare)",
    request_body = StockDataRequest,
    responses(
        (status = 200, description = "对齐后的行情", body = StockDataResponse),
        (status = 400, description = "股票代码为空或请求体非法", body = ErrorResponse),
        (status = 500, description = "内部错误", body = ErrorResponse)
    )
)]
pub async fn fetch_stock_data(
    State(state): State<AppState>,
    payload: Result<Json<StockDataRequest>, JsonRejection>,
) -> Result<Json<StockDataResponse>, ApiError> {
    run_compare(state, payload).await
}

/// 获取多标的对齐行情 (别名路径)
#[utoipa::path(
    post,
    path = "/api/stocks/fetch",
    tag = "对比 (Compare)",
    request_body = StockDataRequest,
    responses(
        (status = 200, description = "对齐后的行情", body = StockDataResponse),
        (status = 400, description = "股票代码为空或请求体非法", body = ErrorResponse),
        (status = 500, description = "内部错误", body = ErrorResponse)
    )
)]
pub async fn fetch_stocks(
    State(state): State<AppState>,
    payload: Result<Json<StockDataRequest>, JsonRejection>,
) -> Result<Json<StockDataResponse>, ApiError> {
    run_compare(state, payload).await
}
