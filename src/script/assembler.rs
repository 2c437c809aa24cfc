//! 5セクションを組み立て、全体の長さを目標文字数に寄せる。

use chrono::{DateTime, Datelike, FixedOffset};
use tracing::{debug, info};

use super::calendar::{ForecastAnchor, Season, date_label};
use super::compose::{ComposeContext, SectionComposer, compose_section, standard_composers};
use super::fitter::fit;
use super::formatter::{char_len, format_sentences};
use super::picker::PhrasePicker;
use super::record::{ScriptRecord, SectionKey, Sections};
use crate::forecast::WeatherSnapshot;

/// 既定の目標文字数（約2分）。
pub const DEFAULT_TARGET_CHARS: usize = 500;
/// 「簡潔に」「短く」と指示されたときの目標文字数。
pub const SHORT_TARGET_CHARS: usize = 400;
/// 「詳しく」「長く」と指示されたときの目標文字数。
pub const LONG_TARGET_CHARS: usize = 600;

const SHORTEN_MARKERS: [&str; 2] = ["簡潔", "短く"];
const LENGTHEN_MARKERS: [&str; 2] = ["詳しく", "長く"];

/// 再生成の指示文から目標文字数を決める。該当語がなければ `default_target`。
#[must_use]
pub fn target_for_instructions(instructions: &str, default_target: usize) -> usize {
    if SHORTEN_MARKERS.iter().any(|m| instructions.contains(m)) {
        SHORT_TARGET_CHARS
    } else if LENGTHEN_MARKERS.iter().any(|m| instructions.contains(m)) {
        LONG_TARGET_CHARS
    } else {
        default_target
    }
}

/// 組み立て結果。原稿に加えて、固定文に差し替えたセクションと再調整の有無を返す。
#[derive(Debug, Clone)]
pub struct Assembly {
    pub record: ScriptRecord,
    pub fallbacks: Vec<SectionKey>,
    pub refitted: bool,
}

pub struct ScriptAssembler {
    target_chars: usize,
    composers: Vec<Box<dyn SectionComposer>>,
}

impl std::fmt::Debug for ScriptAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptAssembler")
            .field("target_chars", &self.target_chars)
            .field("composers", &self.composers.len())
            .finish()
    }
}

impl Default for ScriptAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_CHARS)
    }
}

impl ScriptAssembler {
    #[must_use]
    pub fn new(target_chars: usize) -> Self {
        Self {
            target_chars,
            composers: standard_composers(),
        }
    }

    #[must_use]
    pub fn target_chars(&self) -> usize {
        self.target_chars
    }

    /// 各セクションを生成・整形し、合計が目標の±20%を外れたら全セクションを
    /// 目標の5分の1ずつに寄せ直す。
    pub fn assemble(
        &self,
        snapshot: &WeatherSnapshot,
        now: &DateTime<FixedOffset>,
        picker: &mut dyn PhrasePicker,
    ) -> Assembly {
        let season = Season::from_month(now.month());
        let anchor = ForecastAnchor::from_time(now);
        let ctx = ComposeContext::new(snapshot, season, anchor);

        let mut sections = Sections::default();
        let mut fallbacks = Vec::new();
        for composer in &self.composers {
            let composed = compose_section(composer.as_ref(), &ctx, picker);
            if composed.fell_back {
                fallbacks.push(composer.section());
            }
            sections.set(composer.section(), format_sentences(&composed.text));
        }

        let total = sections.total_chars();
        let target = self.target_chars;
        let refitted = total.saturating_mul(5) > target.saturating_mul(6)
            || total.saturating_mul(5) < target.saturating_mul(4);
        if refitted {
            let section_target = target / 5;
            debug!(total, target, section_target, "rebalancing sections");
            for key in SectionKey::ALL {
                let fitted = fit(sections.get(key), section_target, season, picker);
                sections.set(key, fitted);
            }
        }

        let record = ScriptRecord::new(date_label(now), anchor.forecast_label(), sections);
        info!(
            total_chars = record.total_chars,
            reading_time = record.reading_time,
            target,
            fallbacks = fallbacks.len(),
            "script assembled"
        );
        for (key, text) in record.sections.iter() {
            debug!(section = %key, chars = char_len(text), "section length");
        }

        Assembly {
            record,
            fallbacks,
            refitted,
        }
    }
}
