use chrono::{TimeZone, Utc};
use kurabe_align::service::CompareService;
use kurabe_core::common::Timeframe;
use kurabe_core::common::time::FakeClockProvider;
use kurabe_core::compare::entity::{CandleKind, CompareQuery, CustomRange};
use kurabe_core::compare::error::CompareError;
use kurabe_core::compare::port::ComparePort;
use kurabe_core::test_utils::{MemoryMarketProvider, daily_bar};
use std::sync::Arc;

fn query(tickers: &[&str]) -> CompareQuery {
    CompareQuery {
        tickers: tickers.iter().map(|t| t.to_string()).collect(),
        timeframe: Some(Timeframe::OneMonth),
        custom_range: None,
        candles: None,
    }
}

fn service(provider: Arc<MemoryMarketProvider>) -> CompareService {
    let clock = Arc::new(FakeClockProvider::new(
        Utc.with_ymd_and_hms(2024, 1, 31, 21, 0, 0).unwrap(),
    ));
    CompareService::new(provider, clock)
}

fn aapl_msft_provider() -> MemoryMarketProvider {
    MemoryMarketProvider::new()
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
}

/// # Summary
/// AAPL 拥有第 1-3 天，MSFT 只有第 2-3 天，共享时间轴取交集。
#[tokio::test]
async fn test_intersection_axis_drops_unshared_days() -> anyhow::Result<()> {
    let svc = service(Arc::new(aapl_msft_provider()));

    let out = svc.compare(query(&["aapl", " MSFT "])).await?;

    let dates: Vec<String> = out.dates.iter().map(ToString::to_string).collect();
    assert_eq!(dates, ["2024-01-03", "2024-01-04"]);
    assert_eq!(out.series.len(), 2);

    let aapl = &out.series[0].aligned;
    assert_eq!(aapl.ticker, "AAPL");
    assert_eq!(aapl.closes(), &[Some(12.0), Some(13.0)]);
    assert_eq!(aapl.volume, vec![Some(200.0), Some(0.0)]);

    let msft = &out.series[1].aligned;
    assert_eq!(msft.ticker, "MSFT");
    assert_eq!(msft.ohlc.open, vec![Some(50.0), Some(51.0)]);
    assert_eq!(msft.volume, vec![Some(10.0), None]);

    for s in &out.series {
        assert!(s.aligned.ohlc.is_uniform(out.dates.len()));
        assert!(s.candles.is_none());
    }
    Ok(())
}

/// # Summary
/// 单个标的抓取失败：请求仍然成功，该标的全部为空值，其他标的不受影响。
#[tokio::test]
async fn test_provider_failure_degrades_to_all_null_series() -> anyhow::Result<()> {
    let provider = aapl_msft_provider().with_failure("BROKEN", "connection reset");
    let svc = service(Arc::new(provider));

    let out = svc.compare(query(&["AAPL", "BROKEN"])).await?;

    // 失败标的没有数据，交集为空，退化为 AAPL 自身的并集
    assert_eq!(out.dates.len(), 3);
    let broken = &out.series[1].aligned;
    assert_eq!(broken.ticker, "BROKEN");
    assert_eq!(broken.closes().len(), 3);
    assert!(broken.closes().iter().all(Option::is_none));
    assert!(broken.ohlc.open.iter().all(Option::is_none));
    assert!(broken.volume.iter().all(Option::is_none));

    let aapl = &out.series[0].aligned;
    assert_eq!(aapl.closes(), &[Some(11.0), Some(12.0), Some(13.0)]);
    Ok(())
}

#[tokio::test]
async fn test_empty_tickers_fail_without_fetching() {
    let provider = Arc::new(aapl_msft_provider());
    let svc = service(provider.clone());

    let err = svc.compare(query(&["  ", ""])).await.unwrap_err();

    assert_eq!(err, CompareError::Validation("tickers required".to_string()));
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn test_resolved_range_is_passed_to_provider() -> anyhow::Result<()> {
    let provider = Arc::new(aapl_msft_provider());
    let svc = service(provider.clone());

    let mut q = query(&["AAPL"]);
    q.timeframe = Some(Timeframe::Custom);
    q.custom_range = Some(CustomRange {
        start: Some("2024-01-01".to_string()),
        end: Some("2024-01-15".to_string()),
    });
    svc.compare(q).await?;

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    let (symbol, start, end) = &requests[0];
    assert_eq!(symbol, "AAPL");
    assert_eq!(*start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(*end, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    Ok(())
}

#[tokio::test]
async fn test_heikin_candles_follow_axis() -> anyhow::Result<()> {
    let svc = service(Arc::new(aapl_msft_provider()));

    let mut q = query(&["AAPL", "MSFT"]);
    q.candles = Some(CandleKind::HeikinAshi);
    let out = svc.compare(q).await?;

    let aapl = out.series[0].candles.as_ref().expect("candles requested");
    assert_eq!(aapl.len(), out.dates.len());
    // 时间轴从 2024-01-03 开始，第一根按 (open + close) / 2 起算
    let first = aapl[0].expect("defined");
    assert_eq!(first.to_array(), [11.5, 11.5, 10.0, 13.0]);

    let json = serde_json::to_value(&out.series[1].candles)?;
    assert_eq!(json[0], serde_json::json!([50.5, 50.5, 49.0, 52.0]));
    Ok(())
}

#[tokio::test]
async fn test_all_tickers_failing_yields_empty_axis() -> anyhow::Result<()> {
    let provider = MemoryMarketProvider::new()
        .with_failure("A", "down")
        .with_failure("B", "down");
    let svc = service(Arc::new(provider));

    let out = svc.compare(query(&["A", "B"])).await?;
    assert!(out.dates.is_empty());
    assert_eq!(out.series.len(), 2);
    assert!(out.series.iter().all(|s| s.aligned.closes().is_empty()));
    Ok(())
}
