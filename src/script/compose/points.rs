use super::{
    ComposeContext, ComposeError, NATIONWIDE_REGIONS, SectionComposer, group_by_category,
    summarize_regions,
};
use crate::script::classifier::Category;
use crate::script::phrase_bank::{CONNECTIVES, Caution, caution_sentence};
use crate::script::picker::PhrasePicker;
use crate::script::record::SectionKey;

const LEAD: &str = "今後の天気のポイントをお伝えします。";
/// 読み上げる警報・注意報の件数。
const SPOKEN_WARNINGS: usize = 2;

/// 今後のポイント。警報・注意報と翌日の天気の傾向を伝える。
#[derive(Debug, Clone, Copy, Default)]
pub struct NearTermPointsComposer;

impl SectionComposer for NearTermPointsComposer {
    fn section(&self) -> SectionKey {
        SectionKey::NearTermPoints
    }

    fn compose(
        &self,
        ctx: &ComposeContext<'_>,
        picker: &mut dyn PhrasePicker,
    ) -> Result<String, ComposeError> {
        // 対象日のキーが無いときだけ失敗とする。空の地域表なら警報と季節の注意は伝える。
        let secondary = ctx.anchor.secondary;
        let next_day = ctx
            .snapshot
            .overview
            .get(secondary)
            .ok_or(ComposeError::MissingDay(secondary))?;
        let mut text = LEAD.to_string();

        let warnings = &ctx.snapshot.warnings;
        if !warnings.is_empty() {
            let mut spoken = warnings
                .iter()
                .take(SPOKEN_WARNINGS)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("、");
            if warnings.len() > SPOKEN_WARNINGS {
                spoken.push_str("など");
            }
            text.push_str(&format!("{spoken}が発表されています。十分ご注意ください。"));
        }

        let groups = group_by_category(next_day);
        // 同数なら先に現れた区分を採る。
        let majority = groups
            .iter()
            .fold(None::<&(Category, Vec<&str>)>, |best, group| match best {
                Some(current) if current.1.len() >= group.1.len() => Some(current),
                _ => Some(group),
            });
        if let Some((category, names)) = majority {
            let area = if names.len() >= NATIONWIDE_REGIONS {
                "全国的に".to_string()
            } else {
                format!("{}を中心に", summarize_regions(names))
            };
            if !warnings.is_empty() {
                text.push_str(picker.choose(CONNECTIVES));
            }
            text.push_str(&format!(
                "{}は{area}{}の天気となる見込みです。",
                ctx.anchor.next_label(),
                category.label()
            ));
        }

        let has = |wanted: Category| groups.iter().any(|(category, _)| *category == wanted);
        let caution = if has(Category::Rain) {
            Some(Caution::Rain)
        } else if has(Category::Snow) {
            Some(Caution::Snow)
        } else {
            Caution::for_season(ctx.season)
        };
        if let Some(kind) = caution {
            text.push_str(&caution_sentence(kind, picker));
        }

        Ok(text)
    }

    fn fallback(&self, _ctx: &ComposeContext<'_>) -> String {
        "今後の天気の変化にご注意ください。最新の気象情報をこまめに確認することをおすすめします。".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::{DayKey, RegionMap, WeatherSnapshot};
    use crate::script::calendar::{ForecastAnchor, Season};
    use crate::script::compose::compose_section;
    use crate::script::compose::test_support::snapshot_with;
    use crate::script::picker::FirstVariant;

    #[test]
    fn warnings_then_connective_then_majority() {
        let mut snapshot = snapshot_with(DayKey::Tomorrow, "雨", "300", 4);
        snapshot.warnings = vec![
            "北海道地方では大雨に注意".into(),
            "東北地方では雷に注意".into(),
            "九州地方では天候の急変に注意".into(),
        ];
        let ctx = ComposeContext::new(&snapshot, Season::Autumn, ForecastAnchor::from_hour(9));

        let text = NearTermPointsComposer
            .compose(&ctx, &mut FirstVariant)
            .expect("points compose");

        assert_eq!(
            text,
            "今後の天気のポイントをお伝えします。\
             北海道地方では大雨に注意、東北地方では雷に注意などが発表されています。十分ご注意ください。\
             また、明日は東海、近畿などを中心に晴れの天気となる見込みです。\
             お出かけの際は傘の準備にご注意ください。"
        );
    }

    #[test]
    fn nationwide_without_warnings_uses_season_caution() {
        let snapshot = snapshot_with(DayKey::DayAfterTomorrow, "晴れ", "100", 10);
        let ctx = ComposeContext::new(&snapshot, Season::Summer, ForecastAnchor::from_hour(13));

        let text = NearTermPointsComposer
            .compose(&ctx, &mut FirstVariant)
            .expect("points compose");

        assert_eq!(
            text,
            "今後の天気のポイントをお伝えします。明後日は全国的に晴れの天気となる見込みです。\
             お出かけの際は熱中症にご注意ください。"
        );
    }

    #[test]
    fn ties_pick_first_category() {
        let snapshot = snapshot_with(DayKey::Tomorrow, "雪", "400", 5);
        let ctx = ComposeContext::new(&snapshot, Season::Spring, ForecastAnchor::from_hour(9));

        let text = NearTermPointsComposer
            .compose(&ctx, &mut FirstVariant)
            .expect("points compose");

        assert!(text.contains("明日は北海道、東北などを中心に雪の天気となる見込みです。"));
        assert!(text.ends_with("お出かけの際は路面の凍結にご注意ください。"));
    }

    #[test]
    fn empty_secondary_day_still_reads_warnings() {
        let mut snapshot = WeatherSnapshot::default();
        snapshot.overview.insert(DayKey::Tomorrow, RegionMap::new());
        snapshot.warnings = vec!["九州地方では大雨特別警報".into()];
        let ctx = ComposeContext::new(&snapshot, Season::Winter, ForecastAnchor::from_hour(9));

        let composed = compose_section(&NearTermPointsComposer, &ctx, &mut FirstVariant);

        assert!(!composed.fell_back);
        assert_eq!(
            composed.text,
            "今後の天気のポイントをお伝えします。\
             九州地方では大雨特別警報が発表されています。十分ご注意ください。\
             お出かけの際は防寒対策にご注意ください。"
        );
    }

    #[test]
    fn missing_secondary_day_falls_back() {
        let snapshot = snapshot_with(DayKey::Today, "雨", "300", 10);
        let ctx = ComposeContext::new(&snapshot, Season::Spring, ForecastAnchor::from_hour(9));

        let composed = compose_section(&NearTermPointsComposer, &ctx, &mut FirstVariant);

        assert!(composed.fell_back);
        assert!(composed.text.starts_with("今後の天気の変化にご注意ください。"));
    }
}
