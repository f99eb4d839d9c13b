use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kurabe_core::common::Stock;
use kurabe_core::config::FeedConfig;
use kurabe_core::market::entity::{Bar, DateKey};
use kurabe_core::market::error::MarketError;
use kurabe_core::market::port::MarketDataProvider;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// # Summary
/// Yahoo Finance 行情提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯，超时由配置决定。
/// - 只请求日线 (`interval=1d`)。
#[derive(Clone)]
pub struct YahooProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
    /// API 根地址，如 `https://query1.finance.yahoo.com`
    base_url: Url,
}

impl YahooProvider {
    /// # Summary
    /// 根据配置创建 YahooProvider 实例。
    ///
    /// # Logic
    /// 1. 安装 rustls 的 ring 加密后端 (已安装则跳过)。
    /// 2. 设置伪装浏览器 Header (User-Agent) 以减少被拦截风险。
    /// 3. 按配置的超时初始化 reqwest 客户端。
    ///
    /// # Arguments
    /// * `config`: 行情源配置。
    ///
    /// # Returns
    /// 成功返回 YahooProvider，根地址或 Header 非法时返回 MarketError。
    pub fn new(config: &FeedConfig) -> Result<Self, MarketError> {
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
        {
            debug!("rustls crypto provider already installed");
        }

        let base_url =
            Url::parse(&config.base_url).map_err(|e| MarketError::Unknown(e.to_string()))?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            config
                .user_agent
                .parse()
                .map_err(|_| MarketError::Unknown("invalid user agent".into()))?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| MarketError::Network(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// 拼接 `/v8/finance/chart/{symbol}`，代码按路径段转义
    fn chart_url(&self, symbol: &str) -> Result<Url, MarketError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MarketError::Unknown(format!("invalid base url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        Ok(url)
    }
}

/// # Summary
/// Yahoo API 响应顶层结构。
///
/// # Invariants
/// - 映射自 Yahoo v8 chart 接口。
#[derive(Deserialize, Debug)]
struct YahooResponse {
    chart: YahooChart,
}

/// # Summary
/// Yahoo API 图表数据部分。
#[derive(Deserialize, Debug)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

/// # Summary
/// Yahoo API 错误详情。
#[derive(Deserialize, Debug)]
struct YahooError {
    description: String,
}

/// # Summary
/// Yahoo API 单个时间序列结果。
///
/// 区间内无交易日时 Yahoo 会省略 `timestamp` 字段。
#[derive(Deserialize, Debug)]
struct YahooResult {
    #[serde(default)]
    meta: YahooMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

/// # Summary
/// Yahoo API 元数据，仅使用交易所相对 UTC 的偏移秒数。
#[derive(Deserialize, Debug, Default)]
struct YahooMeta {
    #[serde(default)]
    gmtoffset: i64,
}

/// # Summary
/// Yahoo API 指标容器。
#[derive(Deserialize, Debug)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

/// # Summary
/// Yahoo API 原始报价数据。
#[derive(Deserialize, Debug, Default)]
struct YahooQuote {
    /// 开盘价列表
    #[serde(default)]
    open: Vec<Option<f64>>,
    /// 最高价列表
    #[serde(default)]
    high: Vec<Option<f64>>,
    /// 最低价列表
    #[serde(default)]
    low: Vec<Option<f64>>,
    /// 收盘价列表
    #[serde(default)]
    close: Vec<Option<f64>>,
    /// 成交量列表
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// # Summary
/// 将 Yahoo chart 响应转换为日线列表。
///
/// # Logic
/// 1. 响应中带有 error 时返回 Provider 错误。
/// 2. 时间戳加上交易所偏移后取日历日作为 DateKey，避免跨时区导致日期错位。
/// 3. 开高低收任一缺失的行直接跳过；成交量缺失保留为 None。
/// 4. 按交易日升序返回。
fn parse_chart(json: YahooResponse) -> Result<Vec<Bar>, MarketError> {
    if let Some(err) = json.chart.error {
        return Err(MarketError::Provider(err.description));
    }

    let result = json
        .chart
        .result
        .ok_or(MarketError::NotFound)?
        .pop()
        .ok_or(MarketError::NotFound)?;

    if result.timestamp.is_empty() {
        return Ok(Vec::new());
    }

    let quote = result
        .indicators
        .quote
        .first()
        .ok_or(MarketError::Parse("No quote data".into()))?;

    let offset = result.meta.gmtoffset;
    let mut bars = Vec::with_capacity(result.timestamp.len());

    for (i, &ts) in result.timestamp.iter().enumerate() {
        let field = |col: &Vec<Option<f64>>| col.get(i).copied().flatten();
        let (Some(open), Some(high), Some(low), Some(close)) = (
            field(&quote.open),
            field(&quote.high),
            field(&quote.low),
            field(&quote.close),
        ) else {
            continue;
        };

        let local = DateTime::<Utc>::from_timestamp(ts + offset, 0)
            .ok_or_else(|| MarketError::Parse(format!("Invalid timestamp: {}", ts)))?;

        bars.push(Bar {
            date: DateKey::from_utc(local),
            open,
            high,
            low,
            close,
            volume: field(&quote.volume),
        });
    }

    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    /// # Summary
    /// 从 Yahoo Finance 抓取日线历史数据。
    ///
    /// # Logic
    /// 1. 构建包含 period1, period2 的 API URL，周期固定为 1d。
    /// 2. 发起异步请求，非 2xx 状态视为网络错误。
    /// 3. 解析嵌套的 JSON 数据并转换为日线。
    ///
    /// # Arguments
    /// * `stock`: 证券实体。
    /// * `start`: 开始时间。
    /// * `end`: 结束时间。
    ///
    /// # Returns
    /// 成功返回日线列表，失败返回 MarketError。
    async fn fetch_daily_bars(
        &self,
        stock: &Stock,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>, MarketError> {
        let url = self.chart_url(&stock.symbol)?;

        let resp = self
            .client
            .get(url)
            .query(&[
                ("period1", start.timestamp().to_string()),
                ("period2", end.timestamp().to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Network(format!("HTTP {}", resp.status())));
        }

        let json: YahooResponse = resp
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;

        let bars = parse_chart(json)?;
        debug!("Fetched {} daily bars for {}", bars.len(), stock.symbol);
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<Vec<Bar>, MarketError> {
        parse_chart(serde_json::from_str(raw).unwrap())
    }

    #[test]
    fn test_parse_uses_exchange_offset_for_date_keys() {
        // 2024-01-02 09:30 America/New_York = 14:30 UTC; 偏移 -18000 秒
        let raw = r#"{"chart":{"result":[{
            "meta":{"gmtoffset":-18000},
            "timestamp":[1704205800,1704292200],
            "indicators":{"quote":[{
                "open":[187.15,184.22],"high":[188.44,185.88],
                "low":[183.89,183.43],"close":[185.64,184.25],
                "volume":[82488700,0]}]}}],"error":null}}"#;
        let bars = parse(raw).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date.to_string(), "2024-01-02");
        assert_eq!(bars[1].date.to_string(), "2024-01-03");
        assert_eq!(bars[0].close, 185.64);
        assert_eq!(bars[1].volume, Some(0.0));
    }

    #[test]
    fn test_parse_keeps_rows_with_missing_volume_only() {
        let raw = r#"{"chart":{"result":[{
            "timestamp":[1704205800,1704292200,1704378600],
            "indicators":{"quote":[{
                "open":[1.0,null,3.0],"high":[1.5,2.5,3.5],
                "low":[0.5,1.5,2.5],"close":[1.2,2.2,3.2],
                "volume":[10,20,null]}]}}],"error":null}}"#;
        let bars = parse(raw).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].volume, Some(10.0));
        assert_eq!(bars[1].close, 3.2);
        assert_eq!(bars[1].volume, None);
    }

    #[test]
    fn test_parse_empty_range() {
        let raw = r#"{"chart":{"result":[{"meta":{"gmtoffset":0},
            "indicators":{"quote":[{}]}}],"error":null}}"#;
        assert!(parse(raw).unwrap().is_empty());
    }

    #[test]
    fn test_parse_provider_error() {
        let raw = r#"{"chart":{"result":null,
            "error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = parse(raw).unwrap_err();
        assert!(matches!(err, MarketError::Provider(msg) if msg.contains("delisted")));
    }

    #[test]
    fn test_chart_url_escapes_symbol() {
        let provider = YahooProvider::new(&FeedConfig {
            base_url: "http://localhost:9999/".to_string(),
            ..FeedConfig::default()
        })
        .unwrap();
        let url = provider.chart_url("BRK/B").unwrap();
        assert_eq!(url.as_str(), "http://localhost:9999/v8/finance/chart/BRK%2FB");
    }
}
