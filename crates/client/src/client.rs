use kurabe_api::types::{ErrorResponse, StockDataRequest, StockDataResponse};
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ClientError;

/// 直连后端的对比路径
const DIRECT_PATH: [&str; 3] = ["api", "stocks", "fetch"];
/// 备用端点的对比路径
const FALLBACK_PATH: [&str; 2] = ["api", "stock-data"];

/// # Summary
/// 双端点对比客户端。
///
/// # Invariants
/// - 只有直连端点出现传输层错误时才回退，且最多回退一次。
/// - HTTP 错误状态与解码错误直接返回，不触发回退。
#[derive(Clone, Debug)]
pub struct CompareClient {
    http: Client,
    direct: Option<Url>,
    fallback: Url,
}

impl CompareClient {
    /// # Summary
    /// 创建客户端。
    ///
    /// # Arguments
    /// * `direct`: 直连后端根地址，可缺省。
    /// * `fallback`: 备用端点根地址。
    /// * `timeout`: 单次请求超时。
    pub fn new(
        direct: Option<&str>,
        fallback: &str,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
        {
            debug!("rustls crypto provider already installed");
        }

        let direct = direct
            .map(|base| endpoint(base, &DIRECT_PATH))
            .transpose()?;
        let fallback = endpoint(fallback, &FALLBACK_PATH)?;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http,
            direct,
            fallback,
        })
    }

    /// # Summary
    /// 请求多标的对齐行情。
    ///
    /// # Logic
    /// 1. 未配置直连端点时直接请求备用端点。
    /// 2. 直连端点返回传输层错误时，以相同请求体回退到备用端点。
    /// 3. 回退也失败时返回直连端点的原始错误。
    pub async fn fetch_stock_data(
        &self,
        request: &StockDataRequest,
    ) -> Result<StockDataResponse, ClientError> {
        let Some(direct) = &self.direct else {
            return self.post(&self.fallback, request).await;
        };

        match self.post(direct, request).await {
            Err(ClientError::Network(reason)) => {
                warn!(
                    "Direct backend {} unreachable ({}), falling back to {}",
                    direct, reason, self.fallback
                );
                match self.post(&self.fallback, request).await {
                    Ok(resp) => Ok(resp),
                    Err(fallback_err) => {
                        warn!("Fallback request failed: {}", fallback_err);
                        Err(ClientError::Network(reason))
                    }
                }
            }
            other => other,
        }
    }

    async fn post(
        &self,
        url: &Url,
        request: &StockDataRequest,
    ) -> Result<StockDataResponse, ClientError> {
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            // 优先使用响应体中的 message，否则退化为状态码的标准描述
            let message = resp
                .json::<ErrorResponse>()
                .await
                .map(|body| body.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                });
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        resp.json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// 在根地址后追加路径段
fn endpoint(base: &str, segments: &[&str]) -> Result<Url, ClientError> {
    let mut url = Url::parse(base).map_err(|e| ClientError::InvalidEndpoint(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidEndpoint(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
