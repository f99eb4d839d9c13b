use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use kurabe_align::service::CompareService;
use kurabe_api::server::{AppState, build_router};
use kurabe_api::types::{ErrorResponse, HealthResponse, StockDataRequest, StockDataResponse};
use kurabe_core::common::time::FakeClockProvider;
use kurabe_core::compare::entity::{CompareQuery, Comparison};
use kurabe_core::compare::error::CompareError;
use kurabe_core::compare::port::ComparePort;
use kurabe_core::test_utils::{MemoryMarketProvider, daily_bar};
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;

// 帮助函数：在随机端口启动测试服务器
async fn spawn_server(compare: Arc<dyn ComparePort>) -> anyhow::Result<String> {
    let app = build_router(AppState { compare });
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = format!("http://{}", listener.local_addr()?);
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    Ok(addr)
}

fn http_client() -> anyhow::Result<reqwest::Client> {
    drop(rustls::crypto::ring::default_provider().install_default());
    Ok(reqwest::Client::builder().build()?)
}

fn compare_service() -> Arc<dyn ComparePort> {
    let provider = MemoryMarketProvider::new()
        .with_bars(
            "AAPL",
            vec![
                daily_bar("2024-01-02", 10.0, 12.0, 9.0, 11.0, Some(100.0)),
                daily_bar("2024-01-03", 11.0, 13.0, 10.0, 12.0, Some(200.0)),
                daily_bar("2024-01-04", 12.0, 14.0, 11.0, 13.0, Some(0.0)),
            ],
        )
        .with_bars(
            "MSFT",
            vec![
                daily_bar("2024-01-03", 50.0, 52.0, 49.0, 51.0, Some(10.0)),
                daily_bar("2024-01-04", 51.0, 53.0, 50.0, 52.0, None),
            ],
        )
        .with_failure("BROKEN", "connection reset");
    let clock = Arc::new(FakeClockProvider::new(
        Utc.with_ymd_and_hms(2024, 1, 31, 21, 0, 0).unwrap(),
    ));
    Arc::new(CompareService::new(Arc::new(provider), clock))
}

/// 始终返回内部错误的对比端口
struct FailingCompare;

#[async_trait]
impl ComparePort for FailingCompare {
    async fn compare(&self, _query: CompareQuery) -> Result<Comparison, CompareError> {
        Err(CompareError::Internal("column length mismatch".into()))
    }
}

/// # Summary
/// 完整链路：请求 → 对齐 → JSON 响应，两条路径返回相同结果。
#[tokio::test]
async fn test_stock_data_end_to_end() -> anyhow::Result<()> {
    let base = spawn_server(compare_service()).await?;
    let client = http_client()?;

    let body = StockDataRequest {
        tickers: vec!["aapl".into(), "msft".into()],
        timeframe: Some("1M".into()),
        ..Default::default()
    };

    let res = client
        .post(format!("{}/api/stock-data", base))
        .json(&body)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let data: StockDataResponse = res.json().await?;

    assert_eq!(data.dates, ["2024-01-03", "2024-01-04"]);
    assert_eq!(data.series.len(), 2);
    assert_eq!(data.series[0].ticker, "AAPL");
    assert_eq!(data.series[0].closes, [Some(12.0), Some(13.0)]);
    assert_eq!(data.series[0].volume, [Some(200.0), Some(0.0)]);
    assert_eq!(data.series[1].ticker, "MSFT");
    assert_eq!(data.series[1].ohlc.open, [Some(50.0), Some(51.0)]);
    assert_eq!(data.series[1].volume, [Some(10.0), None]);
    assert!(data.series[0].candles.is_none());

    let alias: Value = client
        .post(format!("{}/api/stocks/fetch", base))
        .json(&body)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(alias, serde_json::to_value(&data)?);
    Ok(())
}

/// # Summary
/// 某个标的抓取失败时整体仍返回 200，该标的全部为 null，时间轴退化为并集。
#[tokio::test]
async fn test_failed_ticker_degrades_to_nulls() -> anyhow::Result<()> {
    let base = spawn_server(compare_service()).await?;
    let client = http_client()?;

    let res = client
        .post(format!("{}/api/stock-data", base))
        .json(&json!({"tickers": ["AAPL", "BROKEN"], "timeframe": "3M"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let data: Value = res.json().await?;

    assert_eq!(data["dates"], json!(["2024-01-02", "2024-01-03", "2024-01-04"]));
    assert_eq!(data["series"][1]["ticker"], "BROKEN");
    assert_eq!(data["series"][1]["closes"], json!([null, null, null]));
    assert_eq!(data["series"][1]["ohlc"]["high"], json!([null, null, null]));
    Ok(())
}

#[tokio::test]
async fn test_empty_tickers_is_bad_request() -> anyhow::Result<()> {
    let base = spawn_server(compare_service()).await?;
    let client = http_client()?;

    for body in [json!({"tickers": []}), json!({"tickers": ["  ", ""]}), json!({})] {
        let res = client
            .post(format!("{}/api/stock-data", base))
            .json(&body)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let err: ErrorResponse = res.json().await?;
        assert_eq!(err.message, "tickers required");
    }
    Ok(())
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() -> anyhow::Result<()> {
    let base = spawn_server(compare_service()).await?;
    let client = http_client()?;

    let res = client
        .post(format!("{}/api/stock-data", base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = res.json().await?;
    assert!(!err.message.is_empty());
    Ok(())
}

/// # Summary
/// 请求平均 K 线时每个序列带上 `candles`，首根按 HA 公式计算。
#[tokio::test]
async fn test_heikin_candles_in_response() -> anyhow::Result<()> {
    let base = spawn_server(compare_service()).await?;
    let client = http_client()?;

    let data: Value = client
        .post(format!("{}/api/stock-data", base))
        .json(&json!({"tickers": ["AAPL"], "candles": "heikin"}))
        .send()
        .await?
        .json()
        .await?;

    let candles = data["series"][0]["candles"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    assert_eq!(candles.len(), 3);
    // haClose = (10+12+9+11)/4 = 10.5, haOpen = (10+11)/2 = 10.5
    assert_eq!(candles[0], json!([10.5, 10.5, 9.0, 12.0]));
    Ok(())
}

#[tokio::test]
async fn test_internal_error_hides_details() -> anyhow::Result<()> {
    let base = spawn_server(Arc::new(FailingCompare)).await?;
    let client = http_client()?;

    let res = client
        .post(format!("{}/api/stock-data", base))
        .json(&json!({"tickers": ["AAPL"]}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let err: ErrorResponse = res.json().await?;
    assert_eq!(err.message, "Unexpected error");
    Ok(())
}

#[tokio::test]
async fn test_health_and_openapi() -> anyhow::Result<()> {
    let base = spawn_server(compare_service()).await?;
    let client = http_client()?;

    let health: HealthResponse = client
        .get(format!("{}/api/health", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(health.status, "ok");

    let doc: Value = client
        .get(format!("{}/api-docs/openapi.json", base))
        .send()
        .await?
        .json()
        .await?;
    assert!(doc["paths"].get("/api/stock-data").is_some());
    assert!(doc["paths"].get("/api/stocks/fetch").is_some());
    Ok(())
}
