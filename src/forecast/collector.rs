//! 予報スナップショットの取得元。
//!
//! 気象庁から地方ごとに府県予報と天気概況を取得して [`WeatherSnapshot`] に正規化するか、
//! 保存済みの JSON を読み込む。

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use aho_corasick::AhoCorasick;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use tracing::{debug, info, warn};

use super::codes::{code_to_text, is_warning_prone};
use super::regions::{BROADCAST_REGIONS, Region, WEEKLY_REGION};
use super::{DayKey, RegionCondition, TemperatureReading, WeatherSnapshot, WeeklyDay, parse_number};
use crate::clients::JmaClient;
use crate::clients::jma::{JmaArea, JmaOverview, JmaReport};
use crate::util::time::now_jst;

/// 概況文のうち警報・注意報として拾う語。
const NOTICE_KEYWORDS: [&str; 5] = ["警報", "注意報", "特別警報", "警戒", "注意"];
/// 今日の天気文に含まれていれば注意を促す語。
const ALERT_KEYWORDS: [&str; 5] = ["大雨", "暴風", "雷", "激しく", "非常に激しく"];

static NOTICE_MATCHER: Lazy<AhoCorasick> =
    Lazy::new(|| AhoCorasick::new(NOTICE_KEYWORDS).expect("notice keywords are valid patterns"));
static ALERT_MATCHER: Lazy<AhoCorasick> =
    Lazy::new(|| AhoCorasick::new(ALERT_KEYWORDS).expect("alert keywords are valid patterns"));

const DAYS: [(usize, DayKey); 3] = [
    (0, DayKey::Today),
    (1, DayKey::Tomorrow),
    (2, DayKey::DayAfterTomorrow),
];

/// スナップショットの取得元。
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// ログとメトリクスに出す取得元の名前。
    fn name(&self) -> &'static str;

    /// # Errors
    /// 取得元からスナップショットを組み立てられない場合はエラーを返す。
    async fn snapshot(&self) -> Result<WeatherSnapshot>;
}

/// 1地方分の取得結果。
#[derive(Debug, Clone)]
pub(crate) struct RegionReport {
    pub(crate) region: &'static str,
    pub(crate) forecast: Vec<JmaReport>,
    pub(crate) overview: Option<JmaOverview>,
}

/// 気象庁から全地方を順に取得する。
pub(crate) struct JmaCollector {
    client: Arc<JmaClient>,
    regions: &'static [Region],
    request_interval: Duration,
}

impl JmaCollector {
    pub(crate) fn new(client: Arc<JmaClient>, request_interval: Duration) -> Self {
        Self {
            client,
            regions: &BROADCAST_REGIONS,
            request_interval,
        }
    }

    async fn fetch_region(&self, region: &Region) -> Result<RegionReport> {
        let forecast = self
            .client
            .forecast(region.area_code)
            .await
            .with_context(|| format!("failed to fetch forecast for {}", region.name))?;
        let overview = match self.client.overview(region.area_code).await {
            Ok(overview) => Some(overview),
            Err(err) => {
                warn!(region = region.name, ?err, "overview unavailable");
                None
            }
        };
        Ok(RegionReport {
            region: region.name,
            forecast,
            overview,
        })
    }
}

#[async_trait]
impl SnapshotSource for JmaCollector {
    fn name(&self) -> &'static str {
        "jma"
    }

    async fn snapshot(&self) -> Result<WeatherSnapshot> {
        let mut reports = Vec::with_capacity(self.regions.len());
        for (index, region) in self.regions.iter().enumerate() {
            if index > 0 && !self.request_interval.is_zero() {
                tokio::time::sleep(self.request_interval).await;
            }
            match self.fetch_region(region).await {
                Ok(report) => {
                    debug!(region = region.name, reports = report.forecast.len(), "fetched region");
                    reports.push(report);
                }
                Err(err) => warn!(region = region.name, ?err, "skipping region"),
            }
        }

        if reports.is_empty() {
            anyhow::bail!("no region could be fetched from JMA");
        }
        info!(
            regions = reports.len(),
            requested = self.regions.len(),
            "collected JMA forecasts"
        );
        Ok(normalize(&reports, now_jst().date_naive()))
    }
}

/// 保存済みのスナップショット JSON を読み込む。
#[derive(Debug, Clone)]
pub struct StaticSnapshotSource {
    path: PathBuf,
}

impl StaticSnapshotSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for StaticSnapshotSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn snapshot(&self) -> Result<WeatherSnapshot> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read snapshot file {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse snapshot file {}", self.path.display()))
    }
}

fn area(reports: &[JmaReport], report: usize, series: usize) -> Option<&JmaArea> {
    reports
        .get(report)?
        .time_series
        .get(series)?
        .areas
        .first()
}

fn value_at(values: &[String], index: usize) -> Option<&str> {
    values
        .get(index)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn number_at(values: &[String], index: usize) -> Option<f64> {
    value_at(values, index).and_then(parse_number)
}

/// 週間予報の `timeDefines` から `date` に当たる位置を探す。
fn weekly_index(reports: &[JmaReport], date: NaiveDate) -> Option<usize> {
    reports
        .get(1)?
        .time_series
        .first()?
        .time_defines
        .iter()
        .position(|raw| {
            DateTime::parse_from_rfc3339(raw).is_ok_and(|parsed| parsed.date_naive() == date)
        })
}

fn reading(max: Option<f64>, min: Option<f64>) -> Option<TemperatureReading> {
    (max.is_some() || min.is_some()).then_some(TemperatureReading { max, min })
}

/// 取得結果を [`WeatherSnapshot`] に正規化する。`today` は日本時間の今日。
pub(crate) fn normalize(reports: &[RegionReport], today: NaiveDate) -> WeatherSnapshot {
    let mut snapshot = WeatherSnapshot::default();
    let day_after = today.succ_opt().and_then(|day| day.succ_opt());

    for report in reports {
        let region = report.region;
        let forecast = &report.forecast;
        let weekly_at = day_after.and_then(|date| weekly_index(forecast, date));
        let weekly_area = area(forecast, 1, 0);

        if let Some(short) = area(forecast, 0, 0) {
            for (index, day) in DAYS {
                let mut code = value_at(&short.weather_codes, index).map(str::to_string);
                if code.is_none() && day == DayKey::DayAfterTomorrow {
                    code = weekly_at
                        .zip(weekly_area)
                        .and_then(|(at, weekly)| value_at(&weekly.weather_codes, at))
                        .map(str::to_string);
                }
                let description = value_at(&short.weathers, index)
                    .map(str::to_string)
                    .or_else(|| code.as_deref().and_then(code_to_text).map(str::to_string));
                if let Some(description) = description {
                    snapshot.overview.entry(day).insert(
                        region.to_string(),
                        RegionCondition::new(description, code.unwrap_or_default()),
                    );
                }
            }
        }

        if let Some(temps) = area(forecast, 0, 2).map(|area| &area.temps) {
            if let Some(today_reading) = reading(number_at(temps, 0), None) {
                snapshot
                    .temperature
                    .entry(DayKey::Today)
                    .insert(region.to_string(), today_reading);
            }
            if let Some(tomorrow) = reading(number_at(temps, 3), number_at(temps, 2)) {
                snapshot
                    .temperature
                    .entry(DayKey::Tomorrow)
                    .insert(region.to_string(), tomorrow);
            }
        }

        if let (Some(at), Some(weekly_temps)) = (weekly_at, area(forecast, 1, 1)) {
            let later = reading(
                number_at(&weekly_temps.temps_max, at),
                number_at(&weekly_temps.temps_min, at),
            );
            if let Some(later) = later {
                snapshot
                    .temperature
                    .entry(DayKey::DayAfterTomorrow)
                    .insert(region.to_string(), later);
            }
        }

        if region == WEEKLY_REGION {
            snapshot.weekly = weekly_days(forecast);
        }
    }

    snapshot.warnings = collect_warnings(reports);
    snapshot
}

/// 週間予報の各日。先頭は短期予報と重なるので除く。
fn weekly_days(forecast: &[JmaReport]) -> Vec<WeeklyDay> {
    let Some(series) = forecast.get(1).and_then(|report| report.time_series.first()) else {
        return Vec::new();
    };
    let Some(weekly) = series.areas.first() else {
        return Vec::new();
    };
    let temps = area(forecast, 1, 1);

    series
        .time_defines
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(index, raw)| {
            let date = match DateTime::parse_from_rfc3339(raw) {
                Ok(parsed) => parsed.format("%m/%d").to_string(),
                Err(err) => {
                    debug!(raw = %raw, %err, "skipping weekly entry with unparsable date");
                    return None;
                }
            };
            let weather_code = value_at(&weekly.weather_codes, index).map(str::to_string);
            Some(WeeklyDay {
                date,
                weather: weather_code
                    .as_deref()
                    .and_then(code_to_text)
                    .map(str::to_string),
                weather_code,
                pop: number_at(&weekly.pops, index),
                temp_min: temps.and_then(|area| number_at(&area.temps_min, index)),
                temp_max: temps.and_then(|area| number_at(&area.temps_max, index)),
            })
        })
        .collect()
}

fn push_unique(warnings: &mut Vec<String>, warning: String) {
    if !warnings.contains(&warning) {
        warnings.push(warning);
    }
}

/// 概況文と今日の天気から警報・注意報の一覧を作る。
pub(crate) fn collect_warnings(reports: &[RegionReport]) -> Vec<String> {
    let mut warnings = Vec::new();

    for report in reports {
        let region = report.region;

        if let Some(overview) = &report.overview {
            for sentence in overview.text.split('。') {
                let sentence = sentence.trim();
                if NOTICE_MATCHER.is_match(sentence) {
                    push_unique(&mut warnings, format!("{region}地方では{sentence}"));
                }
            }
        }

        let Some(short) = area(&report.forecast, 0, 0) else {
            continue;
        };
        if let Some(weather) = value_at(&short.weathers, 0) {
            // 「非常に激しく」は「激しく」とも重なるので重複一致で拾う。
            let mut hits = [false; ALERT_KEYWORDS.len()];
            for found in ALERT_MATCHER.find_overlapping_iter(weather) {
                hits[found.pattern().as_usize()] = true;
            }
            for (keyword, _) in ALERT_KEYWORDS.iter().zip(hits).filter(|(_, hit)| *hit) {
                push_unique(&mut warnings, format!("{region}地方では{keyword}に注意"));
            }
        }
        let prone = value_at(&short.weather_codes, 0).is_some_and(is_warning_prone);
        if prone && !warnings.iter().any(|warning| warning.contains(region)) {
            warnings.push(format!("{region}地方では天候の急変に注意"));
        }
    }

    warnings
}
