//! Prometheusメトリクス定義。

use std::sync::Arc;

use prometheus::{
    Counter, CounterVec, Gauge, Histogram, Registry, register_counter_vec_with_registry,
    register_counter_with_registry, register_gauge_with_registry,
    register_histogram_with_registry,
};

#[derive(Debug, Clone)]
pub struct Metrics {
    // カウンター
    pub scripts_generated: Counter,
    pub scripts_regenerated: Counter,
    pub scripts_edited: Counter,
    pub snapshot_fetch_failures: Counter,
    pub snapshot_cache_hits: Counter,
    pub section_fallbacks: CounterVec,

    // ヒストグラム
    pub generation_duration: Histogram,
    pub fetch_duration: Histogram,

    // ゲージ
    pub last_script_chars: Gauge,
}

impl Metrics {
    /// # Errors
    /// 同名のメトリクスが既に登録されている場合はエラーを返す。
    pub fn new(registry: &Arc<Registry>) -> Result<Self, prometheus::Error> {
        Ok(Self {
            scripts_generated: register_counter_with_registry!(
                "weather_script_generated_total",
                "Total number of scripts generated",
                registry
            )?,
            scripts_regenerated: register_counter_with_registry!(
                "weather_script_regenerated_total",
                "Total number of scripts regenerated with instructions",
                registry
            )?,
            scripts_edited: register_counter_with_registry!(
                "weather_script_edited_total",
                "Total number of edited scripts applied",
                registry
            )?,
            snapshot_fetch_failures: register_counter_with_registry!(
                "weather_script_snapshot_fetch_failures_total",
                "Number of failed forecast snapshot fetches",
                registry
            )?,
            snapshot_cache_hits: register_counter_with_registry!(
                "weather_script_snapshot_cache_hits_total",
                "Number of generations served from the cached snapshot",
                registry
            )?,
            section_fallbacks: register_counter_vec_with_registry!(
                "weather_script_section_fallbacks_total",
                "Number of sections replaced by their fixed fallback text",
                &["section"],
                registry
            )?,
            generation_duration: register_histogram_with_registry!(
                "weather_script_generation_duration_seconds",
                "Time spent assembling a script",
                vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5],
                registry
            )?,
            fetch_duration: register_histogram_with_registry!(
                "weather_script_fetch_duration_seconds",
                "Time spent fetching a forecast snapshot",
                vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0],
                registry
            )?,
            last_script_chars: register_gauge_with_registry!(
                "weather_script_last_total_chars",
                "Character count of the most recent script",
                registry
            )?,
        })
    }
}
