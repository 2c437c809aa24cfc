//! 予報の取得と原稿生成をつなぐサービス層。

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::forecast::WeatherSnapshot;
use crate::forecast::collector::SnapshotSource;
use crate::observability::Telemetry;
use crate::script::{
    Assembly, RandomPicker, ScriptAssembler, ScriptRecord, apply_edit, target_for_instructions,
};
use crate::util::time::now_jst;

struct CachedSnapshot {
    snapshot: Arc<WeatherSnapshot>,
    fetched_at: Instant,
}

/// スナップショットを TTL 付きで保持し、原稿の生成・再生成・編集反映を行う。
pub struct ScriptService {
    source: Arc<dyn SnapshotSource>,
    cache: Mutex<Option<CachedSnapshot>>,
    ttl: Duration,
    default_target: usize,
    telemetry: Telemetry,
}

impl std::fmt::Debug for ScriptService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptService")
            .field("source", &self.source.name())
            .field("ttl", &self.ttl)
            .field("default_target", &self.default_target)
            .finish_non_exhaustive()
    }
}

impl ScriptService {
    #[must_use]
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        ttl: Duration,
        default_target: usize,
        telemetry: Telemetry,
    ) -> Self {
        Self {
            source,
            cache: Mutex::new(None),
            ttl,
            default_target,
            telemetry,
        }
    }

    #[must_use]
    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    #[must_use]
    pub fn default_target(&self) -> usize {
        self.default_target
    }

    /// キャッシュが有効ならそれを返し、期限切れなら取得し直す。
    ///
    /// 取得中はロックを保持するので、同時に来た要求は1回の取得を共有する。
    ///
    /// # Errors
    /// 取得元からスナップショットを得られない場合はエラーを返す。
    pub async fn snapshot(&self) -> Result<Arc<WeatherSnapshot>> {
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                self.telemetry.metrics().snapshot_cache_hits.inc();
                return Ok(Arc::clone(&cached.snapshot));
            }
        }

        let started = Instant::now();
        let fetched = self.source.snapshot().await;
        self.telemetry
            .metrics()
            .fetch_duration
            .observe(started.elapsed().as_secs_f64());
        let snapshot = match fetched {
            Ok(snapshot) => Arc::new(snapshot),
            Err(err) => {
                self.telemetry.metrics().snapshot_fetch_failures.inc();
                warn!(source = self.source.name(), error = %err, "snapshot fetch failed");
                return Err(err);
            }
        };
        info!(
            source = self.source.name(),
            regions = snapshot.region_count(),
            weekly_days = snapshot.weekly.len(),
            warnings = snapshot.warnings.len(),
            "snapshot refreshed"
        );
        *cache = Some(CachedSnapshot {
            snapshot: Arc::clone(&snapshot),
            fetched_at: Instant::now(),
        });
        Ok(snapshot)
    }

    /// 既定の目標文字数で原稿を生成する。
    ///
    /// # Errors
    /// スナップショットの取得に失敗した場合はエラーを返す。
    pub async fn generate(&self) -> Result<ScriptRecord> {
        let snapshot = self.snapshot().await?;
        let record = self.assemble(&snapshot, self.default_target);
        self.telemetry.metrics().scripts_generated.inc();
        Ok(record)
    }

    /// 指示文から目標文字数を決めて原稿を作り直す。
    ///
    /// # Errors
    /// スナップショットの取得に失敗した場合はエラーを返す。
    pub async fn regenerate(&self, instructions: &str) -> Result<ScriptRecord> {
        let snapshot = self.snapshot().await?;
        let target = target_for_instructions(instructions, self.default_target);
        info!(target, instructions_chars = instructions.chars().count(), "regenerating script");
        let record = self.assemble(&snapshot, target);
        self.telemetry.metrics().scripts_regenerated.inc();
        Ok(record)
    }

    /// 編集済みテキストを原稿に反映する。
    #[must_use]
    pub fn apply_edit(&self, current: Option<&ScriptRecord>, text: &str) -> ScriptRecord {
        let record = apply_edit(current, text);
        let metrics = self.telemetry.metrics();
        metrics.scripts_edited.inc();
        metrics.last_script_chars.set(gauge_value(record.total_chars));
        record
    }

    fn assemble(&self, snapshot: &WeatherSnapshot, target: usize) -> ScriptRecord {
        let started = Instant::now();
        let mut picker = RandomPicker::from_entropy();
        let Assembly {
            record, fallbacks, ..
        } = ScriptAssembler::new(target).assemble(snapshot, &now_jst(), &mut picker);

        let metrics = self.telemetry.metrics();
        metrics
            .generation_duration
            .observe(started.elapsed().as_secs_f64());
        for section in fallbacks {
            metrics
                .section_fallbacks
                .with_label_values(&[section.id()])
                .inc();
        }
        metrics.last_script_chars.set(gauge_value(record.total_chars));
        record
    }
}

#[allow(clippy::cast_precision_loss)]
fn gauge_value(chars: usize) -> f64 {
    chars as f64
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::forecast::{DayKey, RegionCondition};
    use crate::script::SectionKey;

    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingSource {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl SnapshotSource for CountingSource {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn snapshot(&self) -> Result<WeatherSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("source unavailable");
            }
            let mut snapshot = WeatherSnapshot::default();
            snapshot
                .overview
                .entry(DayKey::Today)
                .insert("沖縄".into(), RegionCondition::new("晴れ", "100"));
            Ok(snapshot)
        }
    }

    fn service(source: Arc<CountingSource>, ttl: Duration) -> ScriptService {
        ScriptService::new(source, ttl, 500, Telemetry::new().expect("telemetry"))
    }

    #[tokio::test]
    async fn snapshot_is_cached_within_ttl() {
        let source = CountingSource::new(false);
        let service = service(Arc::clone(&source), Duration::from_secs(3600));

        service.generate().await.expect("first generate");
        service.regenerate("簡潔に").await.expect("regenerate");

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(
            service
                .telemetry
                .render_prometheus()
                .contains("weather_script_snapshot_cache_hits_total 1")
        );
    }

    #[tokio::test]
    async fn zero_ttl_refetches_every_time() {
        let source = CountingSource::new(false);
        let service = service(Arc::clone(&source), Duration::ZERO);

        service.generate().await.expect("first generate");
        service.generate().await.expect("second generate");

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fetch_failure_is_counted_and_returned() {
        let source = CountingSource::new(true);
        let service = service(Arc::clone(&source), Duration::from_secs(60));

        assert!(service.generate().await.is_err());
        assert!(
            service
                .telemetry
                .render_prometheus()
                .contains("weather_script_snapshot_fetch_failures_total 1")
        );
    }

    #[tokio::test]
    async fn generated_record_totals_match_sections() {
        let service = service(CountingSource::new(false), Duration::from_secs(60));

        let record = service.generate().await.expect("generate");

        assert_eq!(record.total_chars, record.sections.total_chars());
        for key in SectionKey::ALL {
            assert!(!record.sections.get(key).is_empty(), "{key} is empty");
        }
    }

    #[test]
    fn apply_edit_without_current_record() {
        let service = service(CountingSource::new(false), Duration::from_secs(60));

        let record = service.apply_edit(None, "2025年1月1日(水)\n今日の天気予報\n【全国天気】\nテスト内容\n");

        assert_eq!(record.sections.get(SectionKey::NationalWeather), "テスト内容");
        assert_eq!(record.total_chars, 5);
    }
}
