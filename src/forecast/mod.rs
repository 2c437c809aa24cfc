//! 天気原稿の入力となる予報スナップショットのデータモデル。
//!
//! 取得層（[`collector`]）が気象庁の応答をこの形に正規化し、原稿生成のコアは
//! このスナップショットだけを参照する。

pub mod codes;
pub mod collector;
pub mod regions;

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// 予報の対象日キー。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKey {
    Today,
    Tomorrow,
    DayAfterTomorrow,
}

impl DayKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DayKey::Today => "today",
            DayKey::Tomorrow => "tomorrow",
            DayKey::DayAfterTomorrow => "day_after_tomorrow",
        }
    }

    /// 読み上げ用の日付表現。
    #[must_use]
    pub fn spoken(self) -> &'static str {
        match self {
            DayKey::Today => "今日",
            DayKey::Tomorrow => "明日",
            DayKey::DayAfterTomorrow => "明後日",
        }
    }
}

impl std::fmt::Display for DayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 対象日ごとの値。欠けている日は `None` のまま保持する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ByDay<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tomorrow: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_after_tomorrow: Option<T>,
}

impl<T> Default for ByDay<T> {
    fn default() -> Self {
        Self {
            today: None,
            tomorrow: None,
            day_after_tomorrow: None,
        }
    }
}

impl<T> ByDay<T> {
    #[must_use]
    pub fn get(&self, day: DayKey) -> Option<&T> {
        match day {
            DayKey::Today => self.today.as_ref(),
            DayKey::Tomorrow => self.tomorrow.as_ref(),
            DayKey::DayAfterTomorrow => self.day_after_tomorrow.as_ref(),
        }
    }

    pub fn insert(&mut self, day: DayKey, value: T) {
        let slot = match day {
            DayKey::Today => &mut self.today,
            DayKey::Tomorrow => &mut self.tomorrow,
            DayKey::DayAfterTomorrow => &mut self.day_after_tomorrow,
        };
        *slot = Some(value);
    }
}

impl<T: Default> ByDay<T> {
    pub fn entry(&mut self, day: DayKey) -> &mut T {
        let slot = match day {
            DayKey::Today => &mut self.today,
            DayKey::Tomorrow => &mut self.tomorrow,
            DayKey::DayAfterTomorrow => &mut self.day_after_tomorrow,
        };
        slot.get_or_insert_with(T::default)
    }
}

/// 地域ごとの天気（説明文と気象庁天気コード）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCondition {
    #[serde(alias = "weather")]
    pub description: String,
    #[serde(default)]
    pub code: String,
}

impl RegionCondition {
    #[must_use]
    pub fn new(description: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            code: code.into(),
        }
    }
}

/// 地域ごとの最高・最低気温。数値でない値は `None` として扱う。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    #[serde(default, deserialize_with = "lenient_number")]
    pub max: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub min: Option<f64>,
}

/// 週間予報の1日分。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyDay {
    pub date: String,
    #[serde(default)]
    pub weather_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub pop: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub temp_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub temp_max: Option<f64>,
}

pub type RegionMap = BTreeMap<String, RegionCondition>;
pub type TemperatureMap = BTreeMap<String, TemperatureReading>;

/// 原稿生成の入力となる全国の予報データ。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    #[serde(default)]
    pub overview: ByDay<RegionMap>,
    #[serde(default)]
    pub temperature: ByDay<TemperatureMap>,
    #[serde(default)]
    pub weekly: Vec<WeeklyDay>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl WeatherSnapshot {
    /// 対象日の地域別天気が1件もないかどうか。
    #[must_use]
    pub fn has_overview_for(&self, day: DayKey) -> bool {
        self.overview.get(day).is_some_and(|regions| !regions.is_empty())
    }

    /// 取得できた地域数（全対象日の和集合）。
    #[must_use]
    pub fn region_count(&self) -> usize {
        let mut names: Vec<&str> = [DayKey::Today, DayKey::Tomorrow, DayKey::DayAfterTomorrow]
            .into_iter()
            .filter_map(|day| self.overview.get(day))
            .flat_map(|regions| regions.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    }
}

/// 数値・数値文字列・null を受け付け、それ以外は `None` にする。
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Number(number)) => number.as_f64(),
        Some(serde_json::Value::String(text)) => parse_number(&text),
        _ => None,
    })
}

/// 気象庁形式の数値文字列（空文字は欠測）を解釈する。
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}
