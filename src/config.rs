use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use thiserror::Error;

#[cfg(test)]
use once_cell::sync::Lazy;
#[cfg(test)]
pub(crate) static ENV_MUTEX: Lazy<std::sync::Mutex<()>> = Lazy::new(|| std::sync::Mutex::new(()));

const DEFAULT_JMA_BASE_URL: &str = "https://www.jma.go.jp/bosai/forecast/data/";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    http_bind: SocketAddr,
    jma_base_url: String,
    jma_connect_timeout: Duration,
    jma_total_timeout: Duration,
    jma_request_interval: Duration,
    http_max_retries: usize,
    http_backoff_base_ms: u64,
    http_backoff_cap_ms: u64,
    snapshot_cache_ttl: Duration,
    script_target_chars: usize,
    snapshot_path: Option<PathBuf>,
    otel_exporter_endpoint: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl Config {
    /// 環境変数から設定値を読み込み、検証する。未設定の項目は既定値を使う。
    ///
    /// # Errors
    /// 数値／アドレスのパースに失敗した場合、または目標文字数が 0 の場合は [`ConfigError`] を返す。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_bind = parse_socket_addr("WEATHER_SCRIPT_HTTP_BIND", "0.0.0.0:9010")?;
        let jma_base_url =
            env::var("JMA_BASE_URL").unwrap_or_else(|_| DEFAULT_JMA_BASE_URL.to_string());

        // JMA HTTP settings
        let jma_connect_timeout = parse_duration_ms("JMA_CONNECT_TIMEOUT_MS", 3000)?;
        let jma_total_timeout = parse_duration_ms("JMA_TOTAL_TIMEOUT_MS", 10000)?;
        let jma_request_interval = parse_duration_ms("JMA_REQUEST_INTERVAL_MS", 500)?;

        // Retry settings (exponential backoff + jitter)
        let http_max_retries = parse_usize("HTTP_MAX_RETRIES", 3)?;
        let http_backoff_base_ms = parse_u64("HTTP_BACKOFF_BASE_MS", 250)?;
        let http_backoff_cap_ms = parse_u64("HTTP_BACKOFF_CAP_MS", 10000)?;

        let snapshot_cache_ttl = parse_duration_secs("SNAPSHOT_CACHE_TTL_SECS", 3600)?;
        let script_target_chars = parse_usize("SCRIPT_TARGET_CHARS", 500)?;
        if script_target_chars == 0 {
            return Err(ConfigError::Invalid {
                name: "SCRIPT_TARGET_CHARS",
                source: anyhow::anyhow!("value must be greater than zero"),
            });
        }
        let snapshot_path = env::var("WEATHER_SNAPSHOT_PATH")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        let otel_exporter_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .filter(|raw| !raw.trim().is_empty());

        Ok(Self {
            http_bind,
            jma_base_url,
            jma_connect_timeout,
            jma_total_timeout,
            jma_request_interval,
            http_max_retries,
            http_backoff_base_ms,
            http_backoff_cap_ms,
            snapshot_cache_ttl,
            script_target_chars,
            snapshot_path,
            otel_exporter_endpoint,
        })
    }

    #[must_use]
    pub fn http_bind(&self) -> SocketAddr {
        self.http_bind
    }

    #[must_use]
    pub fn jma_base_url(&self) -> &str {
        &self.jma_base_url
    }

    #[must_use]
    pub fn jma_connect_timeout(&self) -> Duration {
        self.jma_connect_timeout
    }

    #[must_use]
    pub fn jma_total_timeout(&self) -> Duration {
        self.jma_total_timeout
    }

    #[must_use]
    pub fn jma_request_interval(&self) -> Duration {
        self.jma_request_interval
    }

    #[must_use]
    pub fn http_max_retries(&self) -> usize {
        self.http_max_retries
    }

    #[must_use]
    pub fn http_backoff_base_ms(&self) -> u64 {
        self.http_backoff_base_ms
    }

    #[must_use]
    pub fn http_backoff_cap_ms(&self) -> u64 {
        self.http_backoff_cap_ms
    }

    #[must_use]
    pub fn snapshot_cache_ttl(&self) -> Duration {
        self.snapshot_cache_ttl
    }

    #[must_use]
    pub fn script_target_chars(&self) -> usize {
        self.script_target_chars
    }

    /// 設定されていれば気象庁の代わりにこのファイルのスナップショットを使う。
    #[must_use]
    pub fn snapshot_path(&self) -> Option<&PathBuf> {
        self.snapshot_path.as_ref()
    }

    #[must_use]
    pub fn otel_exporter_endpoint(&self) -> Option<&str> {
        self.otel_exporter_endpoint.as_deref()
    }
}

fn parse_socket_addr(name: &'static str, default: &str) -> Result<SocketAddr, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());

    raw.parse().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_duration_secs(name: &'static str, default_secs: u64) -> Result<Duration, ConfigError> {
    let value = parse_u64(name, default_secs)?;
    Ok(Duration::from_secs(value))
}

fn parse_duration_ms(name: &'static str, default_ms: u64) -> Result<Duration, ConfigError> {
    let value = parse_u64(name, default_ms)?;
    Ok(Duration::from_millis(value))
}

fn parse_usize(name: &'static str, default: usize) -> Result<usize, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<usize>()
        .map_err(|error| ConfigError::Invalid {
            name,
            source: anyhow::Error::new(error),
        })
}

fn parse_u64(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<u64>()
        .map_err(|error| ConfigError::Invalid {
            name,
            source: anyhow::Error::new(error),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 12] = [
        "WEATHER_SCRIPT_HTTP_BIND",
        "JMA_BASE_URL",
        "JMA_CONNECT_TIMEOUT_MS",
        "JMA_TOTAL_TIMEOUT_MS",
        "JMA_REQUEST_INTERVAL_MS",
        "HTTP_MAX_RETRIES",
        "HTTP_BACKOFF_BASE_MS",
        "HTTP_BACKOFF_CAP_MS",
        "SNAPSHOT_CACHE_TTL_SECS",
        "SCRIPT_TARGET_CHARS",
        "WEATHER_SNAPSHOT_PATH",
        "OTEL_EXPORTER_OTLP_ENDPOINT",
    ];

    fn set_env(name: &str, value: &str) {
        // SAFETY: tests run sequentially and assign valid UTF-8 values.
        unsafe {
            env::set_var(name, value);
        }
    }

    fn remove_env(name: &str) {
        // SAFETY: tests run sequentially and clean up deterministic keys.
        unsafe {
            env::remove_var(name);
        }
    }

    fn reset_env() {
        for key in KEYS {
            remove_env(key);
        }
    }

    #[test]
    fn from_env_uses_defaults_when_optional_missing() {
        let _lock = ENV_MUTEX.lock().expect("env mutex");
        reset_env();

        let config = Config::from_env().expect("config should load");

        assert_eq!(config.http_bind(), "0.0.0.0:9010".parse().expect("addr"));
        assert_eq!(config.jma_base_url(), DEFAULT_JMA_BASE_URL);
        assert_eq!(config.jma_connect_timeout(), Duration::from_millis(3000));
        assert_eq!(config.jma_total_timeout(), Duration::from_millis(10000));
        assert_eq!(config.jma_request_interval(), Duration::from_millis(500));
        assert_eq!(config.http_max_retries(), 3);
        assert_eq!(config.http_backoff_base_ms(), 250);
        assert_eq!(config.http_backoff_cap_ms(), 10000);
        assert_eq!(config.snapshot_cache_ttl(), Duration::from_secs(3600));
        assert_eq!(config.script_target_chars(), 500);
        assert!(config.snapshot_path().is_none());
        assert!(config.otel_exporter_endpoint().is_none());
    }

    #[test]
    fn from_env_reads_overrides() {
        let _lock = ENV_MUTEX.lock().expect("env mutex");
        reset_env();
        set_env("WEATHER_SCRIPT_HTTP_BIND", "127.0.0.1:8088");
        set_env("JMA_BASE_URL", "http://localhost:9999/data/");
        set_env("JMA_REQUEST_INTERVAL_MS", "0");
        set_env("HTTP_MAX_RETRIES", "5");
        set_env("SNAPSHOT_CACHE_TTL_SECS", "60");
        set_env("SCRIPT_TARGET_CHARS", "600");
        set_env("WEATHER_SNAPSHOT_PATH", "/tmp/snapshot.json");
        set_env("OTEL_EXPORTER_OTLP_ENDPOINT", "http://otel:4317");

        let config = Config::from_env().expect("config should load");

        assert_eq!(config.http_bind(), "127.0.0.1:8088".parse().expect("addr"));
        assert_eq!(config.jma_base_url(), "http://localhost:9999/data/");
        assert!(config.jma_request_interval().is_zero());
        assert_eq!(config.http_max_retries(), 5);
        assert_eq!(config.snapshot_cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.script_target_chars(), 600);
        assert_eq!(
            config.snapshot_path(),
            Some(&PathBuf::from("/tmp/snapshot.json"))
        );
        assert_eq!(config.otel_exporter_endpoint(), Some("http://otel:4317"));
        reset_env();
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let _lock = ENV_MUTEX.lock().expect("env mutex");
        reset_env();
        set_env("JMA_TOTAL_TIMEOUT_MS", "soon");

        let error = Config::from_env().expect_err("invalid timeout");
        assert!(matches!(
            error,
            ConfigError::Invalid {
                name: "JMA_TOTAL_TIMEOUT_MS",
                ..
            }
        ));

        reset_env();
        set_env("SCRIPT_TARGET_CHARS", "0");
        let error = Config::from_env().expect_err("zero target");
        assert!(error.to_string().contains("SCRIPT_TARGET_CHARS"));
        reset_env();
    }
}
