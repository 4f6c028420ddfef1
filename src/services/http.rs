//! 带重试的 HTTP 客户端
//! 对 429/5xx 指数退避重试，支持 Retry-After 覆盖等待时间

use anyhow::{anyhow, Result};
use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;

/// 默认重试次数与起始退避
const DEFAULT_RETRIES: u32 = 3;
const DEFAULT_BASE_DELAY_MS: u64 = 800;

/// 单次调用的重试策略
/// 幂等与否由调用方显式选择，而不是套用隐式全局默认
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// 幂等读操作：查询、schema 获取
    pub fn idempotent() -> Self {
        Self::default()
    }

    /// 变更操作：重复执行的后果必须是调用方可接受的
    /// （本核心只在 upsert 语义下使用，重复写最终收敛）
    pub fn mutation() -> Self {
        Self::default()
    }
}

/// 状态码是否值得重试
pub fn is_retryable(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}

/// 计算第 attempt 次失败后的等待时长
/// 服务端给出的 Retry-After 秒数（正值）优先于指数退避
pub fn backoff_delay(attempt: u32, policy: &RetryPolicy, retry_after_secs: Option<u64>) -> Duration {
    if let Some(sec) = retry_after_secs {
        if sec > 0 {
            return Duration::from_secs(sec);
        }
    }
    policy.base_delay * 2u32.saturating_pow(attempt)
}

/// 从响应头解析 Retry-After 秒数
fn retry_after_secs(resp: &Response) -> Option<u64> {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// 封装 reqwest::Client 的重试客户端
#[derive(Debug, Clone, Default)]
pub struct ApiClient {
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// 发送请求；瞬时失败状态按策略重试，重试耗尽后原样返回响应
    /// 非 2xx 不视为错误，由调用方解读状态码
    pub async fn send(&self, request: RequestBuilder, policy: &RetryPolicy) -> Result<Response> {
        let mut attempt: u32 = 0;
        loop {
            let req = request
                .try_clone()
                .ok_or_else(|| anyhow!("请求体不可重放，无法重试"))?;
            let resp = req.send().await?;
            if resp.status().is_success() {
                return Ok(resp);
            }
            if attempt >= policy.retries || !is_retryable(resp.status()) {
                return Ok(resp);
            }
            let delay = backoff_delay(attempt, policy, retry_after_secs(&resp));
            log::warn!(
                "HTTP {} 第 {} 次重试，等待 {:?}",
                resp.status(),
                attempt + 1,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(is_retryable(StatusCode::BAD_GATEWAY));
        assert!(is_retryable(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retryable(StatusCode::GATEWAY_TIMEOUT));
        assert!(!is_retryable(StatusCode::BAD_REQUEST));
        assert!(!is_retryable(StatusCode::NOT_FOUND));
        assert!(!is_retryable(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(backoff_delay(0, &policy, None), Duration::from_millis(800));
        assert_eq!(backoff_delay(1, &policy, None), Duration::from_millis(1600));
        assert_eq!(backoff_delay(2, &policy, None), Duration::from_millis(3200));
    }

    #[test]
    fn test_retry_after_overrides_backoff() {
        let policy = RetryPolicy::default();
        assert_eq!(backoff_delay(0, &policy, Some(2)), Duration::from_secs(2));
        assert_eq!(backoff_delay(3, &policy, Some(5)), Duration::from_secs(5));
        // 非正值不覆盖
        assert_eq!(backoff_delay(1, &policy, Some(0)), Duration::from_millis(1600));
    }
}
