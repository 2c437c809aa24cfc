use super::{ComposeContext, ComposeError, SectionComposer};
use crate::forecast::WeeklyDay;
use crate::forecast::codes::text_to_code;
use crate::script::classifier::Category;
use crate::script::phrase_bank::{CLOSINGS, Caution, caution_sentence};
use crate::script::picker::PhrasePicker;
use crate::script::record::SectionKey;

/// 降水確率を強調する下限（%）。
const POP_HIGHLIGHT_THRESHOLD: f64 = 50.0;

/// 週間予報。週を通した天気の傾向と、雨の可能性が高い日を伝える。
#[derive(Debug, Clone, Copy, Default)]
pub struct WeeklyForecastComposer;

#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    clear: usize,
    cloudy: usize,
    wet: usize,
}

impl Tally {
    fn of(days: &[WeeklyDay]) -> Self {
        let mut tally = Self::default();
        for day in days {
            let category = match day.weather_code.as_deref().map(str::trim) {
                Some(code) if !code.is_empty() => Category::from_code(code),
                _ => day
                    .weather
                    .as_deref()
                    .map_or(Category::Other, |text| Category::from_code(text_to_code(text))),
            };
            match category {
                Category::Clear => tally.clear += 1,
                Category::Cloudy => tally.cloudy += 1,
                Category::Rain | Category::Snow => tally.wet += 1,
                Category::Other => {}
            }
        }
        tally
    }

    fn total(&self) -> usize {
        self.clear + self.cloudy + self.wet
    }

    fn trend_sentence(&self) -> Option<&'static str> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some(if self.clear * 2 > total {
            "週間を通して晴れの天気が多くなりそうです。"
        } else if self.wet * 2 > total {
            "週間を通して雨や雪の天気が多くなりそうです。"
        } else if self.cloudy * 2 > total {
            "週間を通して曇りの天気が多くなりそうです。"
        } else {
            "週間を通して天気は変わりやすく、晴れや曇り、雨の天気が入れ替わる見込みです。"
        })
    }
}

/// 降水確率が最も高い最初の日。閾値未満なら `None`。
fn wettest_day(days: &[WeeklyDay]) -> Option<(&WeeklyDay, f64)> {
    let mut best: Option<(&WeeklyDay, f64)> = None;
    for day in days {
        let Some(pop) = day.pop else { continue };
        if best.is_none_or(|(_, top)| pop > top) {
            best = Some((day, pop));
        }
    }
    best.filter(|(_, pop)| *pop >= POP_HIGHLIGHT_THRESHOLD)
}

/// `01/05` を `1月5日` と読む。解釈できなければそのまま。
fn spoken_date(label: &str) -> String {
    let parsed = label.split_once('/').and_then(|(month, day)| {
        Some((month.trim().parse::<u32>().ok()?, day.trim().parse::<u32>().ok()?))
    });
    match parsed {
        Some((month, day)) if (1..=12).contains(&month) && (1..=31).contains(&day) => {
            format!("{month}月{day}日")
        }
        _ => label.to_string(),
    }
}

impl SectionComposer for WeeklyForecastComposer {
    fn section(&self) -> SectionKey {
        SectionKey::WeeklyForecast
    }

    fn compose(
        &self,
        ctx: &ComposeContext<'_>,
        picker: &mut dyn PhrasePicker,
    ) -> Result<String, ComposeError> {
        let days = &ctx.snapshot.weekly;
        if days.is_empty() {
            return Err(ComposeError::NoData("weekly"));
        }

        let tally = Tally::of(days);
        let mut text = String::from("週間予報をお伝えします。");
        if let Some(trend) = tally.trend_sentence() {
            text.push_str(trend);
        }
        if let Some((day, pop)) = wettest_day(days) {
            text.push_str(&format!(
                "特に{}は降水確率{pop}%の予想です。",
                spoken_date(&day.date)
            ));
        }
        text.push_str(if ctx.season.is_warm() {
            "気温は平年並みからやや高めで推移する見込みです。"
        } else {
            "気温は平年並みからやや低めで推移する見込みです。"
        });

        let caution = if tally.wet > 0 {
            Some(Caution::Rain)
        } else {
            Caution::for_season(ctx.season)
        };
        if let Some(kind) = caution {
            text.push_str(&caution_sentence(kind, picker));
        }
        text.push_str(picker.choose(CLOSINGS));
        text.push('。');
        Ok(text)
    }

    fn fallback(&self, _ctx: &ComposeContext<'_>) -> String {
        "週間予報については、明日以降も天気の変化にご注意ください。最新の気象情報をこまめに確認することをおすすめします。"
            .to_string()
    }
}
