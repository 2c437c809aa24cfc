//! 気象庁 bosai/forecast API のクライアント。
//!
//! 府県予報（`forecast/{code}.json`）と天気概況（`overview_forecast/{code}.json`）を取得する。
//! タイムアウト・接続失敗・5xx・429 は指数バックオフで再試行する。

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::util::retry::{RetryPolicy, is_retryable};

/// 府県予報の1報（[0] が3日分の短期予報、[1] が週間予報）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JmaReport {
    #[serde(default)]
    pub(crate) time_series: Vec<JmaTimeSeries>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JmaTimeSeries {
    #[serde(default)]
    pub(crate) time_defines: Vec<String>,
    #[serde(default)]
    pub(crate) areas: Vec<JmaArea>,
}

/// 予報区ごとの値。気象庁は数値も文字列で返し、欠測は空文字になる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JmaArea {
    #[serde(default)]
    pub(crate) weathers: Vec<String>,
    #[serde(default)]
    pub(crate) weather_codes: Vec<String>,
    #[serde(default)]
    pub(crate) pops: Vec<String>,
    #[serde(default)]
    pub(crate) temps: Vec<String>,
    #[serde(default)]
    pub(crate) temps_min: Vec<String>,
    #[serde(default)]
    pub(crate) temps_max: Vec<String>,
}

/// 天気概況。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub(crate) struct JmaOverview {
    #[serde(default)]
    pub(crate) text: String,
}

#[derive(Debug, Clone)]
pub(crate) struct JmaClientConfig {
    pub(crate) base_url: String,
    pub(crate) connect_timeout: Duration,
    pub(crate) total_timeout: Duration,
    pub(crate) retry: RetryPolicy,
}

#[derive(Debug, Clone)]
pub(crate) struct JmaClient {
    client: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl JmaClient {
    /// # Errors
    /// URLのパースまたはHTTPクライアントの構築に失敗した場合はエラーを返します。
    pub(crate) fn new(config: JmaClientConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.total_timeout)
            .build()
            .context("failed to build JMA HTTP client")?;

        // join が最後のセグメントを置き換えないよう末尾のスラッシュを補う。
        let mut raw = config.base_url;
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw).context("invalid JMA base URL")?;

        Ok(Self {
            client,
            base_url,
            retry: config.retry,
        })
    }

    /// 府県予報を取得する。
    ///
    /// # Errors
    /// 再試行しても取得できない場合、または応答が解釈できない場合はエラーを返します。
    pub(crate) async fn forecast(&self, area_code: &str) -> Result<Vec<JmaReport>> {
        self.get_json(&format!("forecast/{area_code}.json")).await
    }

    /// 天気概況を取得する。
    ///
    /// # Errors
    /// 再試行しても取得できない場合、または応答が解釈できない場合はエラーを返します。
    pub(crate) async fn overview(&self, area_code: &str) -> Result<JmaOverview> {
        self.get_json(&format!("overview_forecast/{area_code}.json"))
            .await
    }

    async fn get_json<T: DeserializeOwned>(&self, relative: &str) -> Result<T> {
        let url = self
            .base_url
            .join(relative)
            .with_context(|| format!("failed to build JMA URL for {relative}"))?;
        let mut attempt = 0;

        loop {
            match self.get_once(url.clone()).await {
                Ok(body) => {
                    if attempt > 0 {
                        info!(attempt, %url, "JMA request succeeded after retry");
                    }
                    return Ok(body);
                }
                Err(err) => {
                    attempt += 1;

                    if !self.retry.allows(attempt) {
                        warn!(
                            attempt,
                            max_attempts = self.retry.max_attempts,
                            %url,
                            "JMA request failed after all retries"
                        );
                        return Err(err);
                    }

                    let retryable = err
                        .downcast_ref::<reqwest::Error>()
                        .is_some_and(is_retryable);
                    if !retryable {
                        warn!(?err, %url, "JMA error is not retryable");
                        return Err(err);
                    }

                    let delay = self.retry.backoff(attempt);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis(),
                        %url,
                        "JMA request failed, retrying after delay"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(%url, "requesting JMA resource");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("JMA request failed")?
            .error_for_status()
            .context("JMA returned error status")?;

        response
            .json::<T>()
            .await
            .context("failed to deserialize JMA response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> JmaClientConfig {
        JmaClientConfig {
            base_url,
            connect_timeout: Duration::from_secs(3),
            total_timeout: Duration::from_secs(5),
            retry: RetryPolicy::new(3, 1, 5),
        }
    }

    fn forecast_body() -> serde_json::Value {
        serde_json::json!([
            {
                "publishingOffice": "気象庁",
                "timeSeries": [
                    {
                        "timeDefines": ["2025-01-01T17:00:00+09:00", "2025-01-02T00:00:00+09:00"],
                        "areas": [{
                            "area": {"name": "東京地方", "code": "130010"},
                            "weatherCodes": ["100", "201"],
                            "weathers": ["晴れ", "くもり　時々　晴れ"]
                        }]
                    }
                ]
            }
        ])
    }

    #[tokio::test]
    async fn forecast_parses_reports() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bosai/forecast/data/forecast/130000.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = JmaClient::new(test_config(format!(
            "{}/bosai/forecast/data",
            server.uri()
        )))
        .expect("client builds");
        let reports = client.forecast("130000").await.expect("forecast succeeds");

        assert_eq!(reports.len(), 1);
        let area = &reports[0].time_series[0].areas[0];
        assert_eq!(area.weather_codes, vec!["100", "201"]);
        assert!(area.temps.is_empty());
    }

    #[tokio::test]
    async fn server_errors_are_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/overview_forecast/016000.json"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/overview_forecast/016000.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"text": "北海道は雪となっています。"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = JmaClient::new(test_config(server.uri())).expect("client builds");
        let overview = client.overview("016000").await.expect("overview succeeds");

        assert_eq!(overview.text, "北海道は雪となっています。");
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast/999999.json"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = JmaClient::new(test_config(server.uri())).expect("client builds");
        let result = client.forecast("999999").await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast/130000.json"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let client = JmaClient::new(test_config(server.uri())).expect("client builds");
        let result = client.forecast("130000").await;

        assert!(result.is_err());
    }
}
