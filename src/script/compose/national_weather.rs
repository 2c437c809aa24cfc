use super::{ComposeContext, ComposeError, SectionComposer};
use crate::forecast::codes::text_to_code;
use crate::forecast::regions::NATIONAL_GROUPS;
use crate::forecast::RegionCondition;
use crate::script::classifier::describe;
use crate::script::picker::PhrasePicker;
use crate::script::record::SectionKey;

/// 全国天気。4つの広域ブロックごとに代表の天気を伝える。
#[derive(Debug, Clone, Copy, Default)]
pub struct NationalWeatherComposer;

/// コードが空なら説明文から推定する。
fn effective_code(condition: &RegionCondition) -> &str {
    let code = condition.code.trim();
    if code.is_empty() {
        text_to_code(&condition.description)
    } else {
        code
    }
}

/// 最も多いコード。同数なら先に現れたもの。
fn most_common<'a>(codes: &[&'a str]) -> Option<&'a str> {
    let mut tally: Vec<(&'a str, usize)> = Vec::new();
    for &code in codes {
        match tally.iter_mut().find(|(existing, _)| *existing == code) {
            Some((_, count)) => *count += 1,
            None => tally.push((code, 1)),
        }
    }
    let mut best: Option<(&'a str, usize)> = None;
    for (code, count) in tally {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((code, count));
        }
    }
    best.map(|(code, _)| code)
}

impl SectionComposer for NationalWeatherComposer {
    fn section(&self) -> SectionKey {
        SectionKey::NationalWeather
    }

    fn compose(
        &self,
        ctx: &ComposeContext<'_>,
        picker: &mut dyn PhrasePicker,
    ) -> Result<String, ComposeError> {
        let day = ctx.anchor.primary;
        let regions = ctx.regions_for(day)?;

        let mut clauses = Vec::with_capacity(NATIONAL_GROUPS.len());
        for (group, members) in NATIONAL_GROUPS {
            let codes: Vec<&str> = members
                .iter()
                .filter_map(|name| regions.get(*name))
                .map(effective_code)
                .collect();
            let Some(code) = most_common(&codes) else {
                continue;
            };
            clauses.push(format!("{group}は{}でしょう。", describe(code, picker)));
        }
        if clauses.is_empty() {
            return Err(ComposeError::NoRegions(day));
        }

        let trend = if ctx.season.is_warm() {
            "気温は平年並みから高めで推移する見込みです。"
        } else {
            "気温は平年並みから低めで推移する見込みです。"
        };
        Ok(format!(
            "全国の天気をお伝えします。{}の{}{trend}",
            ctx.anchor.label(),
            clauses.concat()
        ))
    }

    fn fallback(&self, _ctx: &ComposeContext<'_>) -> String {
        "全国的に天気は変化しています。各地の最新の気象情報にご注意ください。".to_string()
    }
}
