//! 生成された原稿と、その編集用テキスト表現。

use std::fmt;

use serde::{Deserialize, Serialize};

use super::formatter::char_len;

/// 1分あたりの読み上げ文字数。
pub const CHARS_PER_MINUTE: f64 = 250.0;

/// 原稿のセクション。並び順は放送順。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKey {
    #[serde(rename = "overview")]
    Overview,
    #[serde(rename = "near-term-points")]
    NearTermPoints,
    #[serde(rename = "national-weather")]
    NationalWeather,
    #[serde(rename = "national-temperature")]
    NationalTemperature,
    #[serde(rename = "weekly-forecast")]
    WeeklyForecast,
}

impl SectionKey {
    pub const ALL: [SectionKey; 5] = [
        SectionKey::Overview,
        SectionKey::NearTermPoints,
        SectionKey::NationalWeather,
        SectionKey::NationalTemperature,
        SectionKey::WeeklyForecast,
    ];

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            SectionKey::Overview => "overview",
            SectionKey::NearTermPoints => "near-term-points",
            SectionKey::NationalWeather => "national-weather",
            SectionKey::NationalTemperature => "national-temperature",
            SectionKey::WeeklyForecast => "weekly-forecast",
        }
    }

    /// 編集テキストの見出し。
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            SectionKey::Overview => "現在の全国天気の概況",
            SectionKey::NearTermPoints => "今後のポイント",
            SectionKey::NationalWeather => "全国天気",
            SectionKey::NationalTemperature => "全国気温",
            SectionKey::WeeklyForecast => "週間予報",
        }
    }

    #[must_use]
    pub fn from_title(title: &str) -> Option<Self> {
        let title = title.trim();
        Self::ALL.into_iter().find(|key| key.title() == title)
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// 5セクションの本文。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sections {
    #[serde(rename = "overview", default)]
    pub overview: String,
    #[serde(rename = "near-term-points", default)]
    pub near_term_points: String,
    #[serde(rename = "national-weather", default)]
    pub national_weather: String,
    #[serde(rename = "national-temperature", default)]
    pub national_temperature: String,
    #[serde(rename = "weekly-forecast", default)]
    pub weekly_forecast: String,
}

impl Sections {
    #[must_use]
    pub fn get(&self, key: SectionKey) -> &str {
        match key {
            SectionKey::Overview => &self.overview,
            SectionKey::NearTermPoints => &self.near_term_points,
            SectionKey::NationalWeather => &self.national_weather,
            SectionKey::NationalTemperature => &self.national_temperature,
            SectionKey::WeeklyForecast => &self.weekly_forecast,
        }
    }

    pub fn set(&mut self, key: SectionKey, text: String) {
        let slot = match key {
            SectionKey::Overview => &mut self.overview,
            SectionKey::NearTermPoints => &mut self.near_term_points,
            SectionKey::NationalWeather => &mut self.national_weather,
            SectionKey::NationalTemperature => &mut self.national_temperature,
            SectionKey::WeeklyForecast => &mut self.weekly_forecast,
        };
        *slot = text;
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionKey, &str)> + '_ {
        SectionKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }

    #[must_use]
    pub fn total_chars(&self) -> usize {
        self.iter().map(|(_, text)| char_len(text)).sum()
    }
}

/// 完成した原稿。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptRecord {
    pub date: String,
    pub forecast_date: String,
    #[serde(flatten)]
    pub sections: Sections,
    pub total_chars: usize,
    /// 読み上げ時間（分、小数第1位）。
    pub reading_time: f64,
}

impl ScriptRecord {
    #[must_use]
    pub fn new(date: String, forecast_date: String, sections: Sections) -> Self {
        let mut record = Self {
            date,
            forecast_date,
            sections,
            total_chars: 0,
            reading_time: 0.0,
        };
        record.recompute_totals();
        record
    }

    /// 本文から合計文字数と読み上げ時間を求め直す。
    pub fn recompute_totals(&mut self) {
        self.total_chars = self.sections.total_chars();
        self.reading_time = reading_minutes(self.total_chars);
    }

    /// 日付・見出し・各セクションを並べた編集用テキスト。
    #[must_use]
    pub fn editable_text(&self) -> String {
        let mut text = format!("{}\n{}\n", self.date, self.forecast_date);
        for (key, body) in self.sections.iter() {
            text.push_str(&format!("\n【{}】\n{}\n", key.title(), body));
        }
        text
    }

    /// 編集用テキストに文字数と読み上げ時間を添えた書き出し用テキスト。
    #[must_use]
    pub fn export_text(&self) -> String {
        format!(
            "{}\n合計文字数: {}文字\n読み上げ時間: {:.1}分\n",
            self.editable_text(),
            self.total_chars,
            self.reading_time
        )
    }
}

/// 250文字/分で換算し、小数第1位に丸める。
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn reading_minutes(total_chars: usize) -> f64 {
    (total_chars as f64 / CHARS_PER_MINUTE * 10.0).round() / 10.0
}
