use std::cmp::Ordering;

use super::{ComposeContext, ComposeError, SectionComposer};
use crate::forecast::regions::TEMPERATURE_REGIONS;
use crate::forecast::TemperatureMap;
use crate::script::calendar::Season;
use crate::script::phrase_bank::POLITE_ENDINGS;
use crate::script::picker::PhrasePicker;
use crate::script::record::SectionKey;

/// 全国気温。代表地域の最高気温が翌日どう変わるかを伝える。
#[derive(Debug, Clone, Copy, Default)]
pub struct NationalTemperatureComposer;

fn general_trend(season: Season) -> &'static str {
    match season {
        Season::Summer => "全国的に気温が高く、熱中症対策が必要な一日となりそうです。",
        Season::Winter => "全国的に気温が低く、防寒対策をしっかりと行ってください。",
        Season::Spring | Season::Autumn => "全国的に気温は平年並みからやや高めで推移する見込みです。",
    }
}

fn max_of(map: &TemperatureMap, region: &str) -> Option<f64> {
    map.get(region).and_then(|reading| reading.max)
}

impl SectionComposer for NationalTemperatureComposer {
    fn section(&self) -> SectionKey {
        SectionKey::NationalTemperature
    }

    fn compose(
        &self,
        ctx: &ComposeContext<'_>,
        picker: &mut dyn PhrasePicker,
    ) -> Result<String, ComposeError> {
        let (primary, secondary) = (ctx.anchor.primary, ctx.anchor.secondary);
        let base = ctx
            .snapshot
            .temperature
            .get(primary)
            .ok_or(ComposeError::MissingDay(primary))?;
        let next = ctx
            .snapshot
            .temperature
            .get(secondary)
            .ok_or(ComposeError::MissingDay(secondary))?;
        let next_label = ctx.anchor.next_label();

        let mut sentences = Vec::new();
        for region in TEMPERATURE_REGIONS {
            let (Some(before), Some(after)) = (max_of(base, region), max_of(next, region)) else {
                continue;
            };
            let ending = picker.choose(POLITE_ENDINGS);
            let sentence = match after.partial_cmp(&before) {
                Some(Ordering::Greater) => {
                    format!("{region}地方は{next_label}の最高気温が{after}度まで上がる{ending}。")
                }
                Some(Ordering::Less) => {
                    format!("{region}地方は{next_label}の最高気温が{after}度まで下がる{ending}。")
                }
                _ => format!("{region}地方は{next_label}も最高気温が{after}度となる{ending}。"),
            };
            sentences.push(sentence);
        }

        let trend = general_trend(ctx.season);
        if sentences.is_empty() {
            return Ok(trend.to_string());
        }
        Ok(format!("気温についてお伝えします。{}{trend}", sentences.concat()))
    }

    fn fallback(&self, _ctx: &ComposeContext<'_>) -> String {
        "全国的に気温は平年並みで推移する見込みです。急な気温変化にはご注意ください。".to_string()
    }
}
