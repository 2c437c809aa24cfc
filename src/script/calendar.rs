//! 季節・予報対象日・日付表記。

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Weekday};

use crate::forecast::DayKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// 3〜5月 春、6〜8月 夏、9〜11月 秋、それ以外は冬。
    #[must_use]
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    /// 気温が高めに推移しやすい季節かどうか。
    #[must_use]
    pub fn is_warm(self) -> bool {
        matches!(self, Season::Spring | Season::Summer)
    }
}

/// 原稿の基準日。正午より前は今日、正午以降は明日を主に伝える。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastAnchor {
    pub primary: DayKey,
    pub secondary: DayKey,
}

impl ForecastAnchor {
    #[must_use]
    pub fn from_hour(hour: u32) -> Self {
        if hour < 12 {
            Self {
                primary: DayKey::Today,
                secondary: DayKey::Tomorrow,
            }
        } else {
            Self {
                primary: DayKey::Tomorrow,
                secondary: DayKey::DayAfterTomorrow,
            }
        }
    }

    #[must_use]
    pub fn from_time(now: &DateTime<FixedOffset>) -> Self {
        Self::from_hour(now.hour())
    }

    /// 基準日の呼び方（今日／明日）。
    #[must_use]
    pub fn label(self) -> &'static str {
        self.primary.spoken()
    }

    /// 翌日の呼び方（明日／明後日）。
    #[must_use]
    pub fn next_label(self) -> &'static str {
        self.secondary.spoken()
    }

    /// 「今日の天気予報」などの見出し。
    #[must_use]
    pub fn forecast_label(self) -> String {
        format!("{}の天気予報", self.label())
    }
}

fn weekday_kanji(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "月",
        Weekday::Tue => "火",
        Weekday::Wed => "水",
        Weekday::Thu => "木",
        Weekday::Fri => "金",
        Weekday::Sat => "土",
        Weekday::Sun => "日",
    }
}

/// `2025年1月1日(水)` 形式の日付。
#[must_use]
pub fn date_label(now: &DateTime<FixedOffset>) -> String {
    format!(
        "{}年{}月{}日({})",
        now.year(),
        now.month(),
        now.day(),
        weekday_kanji(now.weekday())
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;
    use crate::util::time::jst;

    #[rstest]
    #[case(1, Season::Winter)]
    #[case(2, Season::Winter)]
    #[case(3, Season::Spring)]
    #[case(5, Season::Spring)]
    #[case(6, Season::Summer)]
    #[case(8, Season::Summer)]
    #[case(9, Season::Autumn)]
    #[case(11, Season::Autumn)]
    #[case(12, Season::Winter)]
    fn season_boundaries(#[case] month: u32, #[case] expected: Season) {
        assert_eq!(Season::from_month(month), expected);
    }

    #[rstest]
    #[case(0, DayKey::Today, "今日", "明日")]
    #[case(11, DayKey::Today, "今日", "明日")]
    #[case(12, DayKey::Tomorrow, "明日", "明後日")]
    #[case(23, DayKey::Tomorrow, "明日", "明後日")]
    fn anchor_switches_at_noon(
        #[case] hour: u32,
        #[case] primary: DayKey,
        #[case] label: &str,
        #[case] next: &str,
    ) {
        let anchor = ForecastAnchor::from_hour(hour);
        assert_eq!(anchor.primary, primary);
        assert_eq!(anchor.label(), label);
        assert_eq!(anchor.next_label(), next);
    }

    #[test]
    fn date_label_uses_kanji_weekday() {
        let now = jst()
            .with_ymd_and_hms(2025, 1, 1, 9, 0, 0)
            .single()
            .expect("valid date");
        assert_eq!(date_label(&now), "2025年1月1日(水)");
        assert_eq!(ForecastAnchor::from_time(&now).forecast_label(), "今日の天気予報");
    }
}
