use super::{
    ComposeContext, ComposeError, GROUPED_REGIONS, NATIONWIDE_REGIONS, SectionComposer,
    group_by_category,
};
use crate::script::phrase_bank::{GREETINGS, seasonal_sentence};
use crate::script::picker::PhrasePicker;
use crate::script::record::SectionKey;

/// 現在の全国天気の概況。
#[derive(Debug, Clone, Copy, Default)]
pub struct OverviewComposer;

impl SectionComposer for OverviewComposer {
    fn section(&self) -> SectionKey {
        SectionKey::Overview
    }

    fn compose(
        &self,
        ctx: &ComposeContext<'_>,
        picker: &mut dyn PhrasePicker,
    ) -> Result<String, ComposeError> {
        let regions = ctx.regions_for(ctx.anchor.primary)?;

        let clauses: Vec<String> = group_by_category(regions)
            .into_iter()
            .map(|(category, names)| {
                let label = category.label();
                if names.len() >= NATIONWIDE_REGIONS {
                    format!("全国的に{label}の天気")
                } else if names.len() >= GROUPED_REGIONS {
                    format!("{}などでは{label}", names[..2].join("、"))
                } else {
                    format!("{}では{label}", names.join("、"))
                }
            })
            .collect();

        let greeting = picker.choose(GREETINGS);
        let mut text = format!(
            "{greeting}。{}の天気は、{}となっています。",
            ctx.anchor.label(),
            clauses.join("、")
        );
        text.push_str(&seasonal_sentence(ctx.season, picker));
        Ok(text)
    }

    fn fallback(&self, ctx: &ComposeContext<'_>) -> String {
        format!(
            "{}の天気は地域によって変化があります。お出かけの際は最新の天気予報をご確認ください。",
            ctx.anchor.label()
        )
    }
}
