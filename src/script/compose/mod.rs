//! セクションごとの原稿生成。
//!
//! 各コンポーザは予報スナップショット全体を受け取り、1セクション分の本文を返す。
//! データ不足は [`ComposeError`] として返し、[`compose_section`] が固定文に差し替える。

mod national_weather;
mod overview;
mod points;
mod temperature;
mod weekly;

use thiserror::Error;
use tracing::warn;

pub use national_weather::NationalWeatherComposer;
pub use overview::OverviewComposer;
pub use points::NearTermPointsComposer;
pub use temperature::NationalTemperatureComposer;
pub use weekly::WeeklyForecastComposer;

use super::calendar::{ForecastAnchor, Season};
use super::classifier::Category;
use super::picker::PhrasePicker;
use super::record::SectionKey;
use crate::forecast::regions::in_broadcast_order;
use crate::forecast::{DayKey, RegionCondition, RegionMap, WeatherSnapshot};

/// 「全国的に」と言える地域数。
pub(crate) const NATIONWIDE_REGIONS: usize = 7;
/// 「など」でまとめ始める地域数。
pub(crate) const GROUPED_REGIONS: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("forecast for {0} is missing")]
    MissingDay(DayKey),
    #[error("no regions reported for {0}")]
    NoRegions(DayKey),
    #[error("{0} data is empty")]
    NoData(&'static str),
}

/// コンポーザが参照する入力一式。
#[derive(Debug, Clone, Copy)]
pub struct ComposeContext<'a> {
    pub snapshot: &'a WeatherSnapshot,
    pub season: Season,
    pub anchor: ForecastAnchor,
}

impl<'a> ComposeContext<'a> {
    #[must_use]
    pub fn new(snapshot: &'a WeatherSnapshot, season: Season, anchor: ForecastAnchor) -> Self {
        Self {
            snapshot,
            season,
            anchor,
        }
    }

    /// 対象日の地域別天気。欠けている、または空ならエラー。
    pub(crate) fn regions_for(&self, day: DayKey) -> Result<&'a RegionMap, ComposeError> {
        let regions = self
            .snapshot
            .overview
            .get(day)
            .ok_or(ComposeError::MissingDay(day))?;
        if regions.is_empty() {
            return Err(ComposeError::NoRegions(day));
        }
        Ok(regions)
    }
}

pub trait SectionComposer: Send + Sync {
    fn section(&self) -> SectionKey;

    fn compose(
        &self,
        ctx: &ComposeContext<'_>,
        picker: &mut dyn PhrasePicker,
    ) -> Result<String, ComposeError>;

    /// データが足りないときの固定文。
    fn fallback(&self, ctx: &ComposeContext<'_>) -> String;
}

/// 生成結果。固定文に差し替えたかどうかを併せて返す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composed {
    pub text: String,
    pub fell_back: bool,
}

/// コンポーザを実行し、失敗や空文字は固定文に置き換える。
pub fn compose_section(
    composer: &dyn SectionComposer,
    ctx: &ComposeContext<'_>,
    picker: &mut dyn PhrasePicker,
) -> Composed {
    let section = composer.section();
    match composer.compose(ctx, picker) {
        Ok(text) if !text.trim().is_empty() => Composed {
            text,
            fell_back: false,
        },
        Ok(_) => {
            warn!(%section, "composer produced empty text, using fallback");
            Composed {
                text: composer.fallback(ctx),
                fell_back: true,
            }
        }
        Err(error) => {
            warn!(%section, %error, "composer failed, using fallback");
            Composed {
                text: composer.fallback(ctx),
                fell_back: true,
            }
        }
    }
}

/// 放送順に並んだ5つのコンポーザ。
#[must_use]
pub fn standard_composers() -> Vec<Box<dyn SectionComposer>> {
    vec![
        Box::new(OverviewComposer),
        Box::new(NearTermPointsComposer),
        Box::new(NationalWeatherComposer),
        Box::new(NationalTemperatureComposer),
        Box::new(WeeklyForecastComposer),
    ]
}

/// 説明文から大区分を決める。説明文が空ならコードで判定する。
pub(crate) fn classify(condition: &RegionCondition) -> Category {
    if condition.description.trim().is_empty() {
        Category::from_code(&condition.code)
    } else {
        Category::from_description(&condition.description)
    }
}

/// 大区分ごとの地域リスト。区分も地域も放送順に最初に現れた順。
pub(crate) fn group_by_category(regions: &RegionMap) -> Vec<(Category, Vec<&str>)> {
    let mut groups: Vec<(Category, Vec<&str>)> = Vec::new();
    for (name, condition) in in_broadcast_order(regions) {
        let category = classify(condition);
        match groups.iter_mut().find(|(existing, _)| *existing == category) {
            Some((_, names)) => names.push(name),
            None => groups.push((category, vec![name])),
        }
    }
    groups
}

/// 先頭2地域を「、」で結び、3地域以上なら「など」を付ける。
pub(crate) fn summarize_regions(names: &[&str]) -> String {
    let mut text = names.iter().take(2).copied().collect::<Vec<_>>().join("、");
    if names.len() > 2 {
        text.push_str("など");
    }
    text
}
