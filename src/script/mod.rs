//! 天気原稿の生成コア。
//!
//! 入出力を持たない同期処理だけで構成し、言い回しの揺らぎは [`PhrasePicker`] から受け取る。
//!
//! ```text
//! WeatherSnapshot -> compose (classifier + phrase_bank) -> formatter -> fitter -> ScriptRecord
//! ```

pub mod assembler;
pub mod calendar;
pub mod classifier;
pub mod compose;
pub mod edit;
pub mod fitter;
pub mod formatter;
pub mod phrase_bank;
pub mod picker;
pub mod record;

use chrono::{DateTime, FixedOffset};

pub use assembler::{
    Assembly, DEFAULT_TARGET_CHARS, LONG_TARGET_CHARS, SHORT_TARGET_CHARS, ScriptAssembler,
    target_for_instructions,
};
pub use edit::apply_edit;
pub use picker::{FirstVariant, PhrasePicker, RandomPicker};
pub use record::{ScriptRecord, SectionKey, Sections};

use crate::forecast::WeatherSnapshot;

/// 目標文字数を指定して原稿を生成する。
pub fn generate(
    snapshot: &WeatherSnapshot,
    now: &DateTime<FixedOffset>,
    target_chars: usize,
    picker: &mut dyn PhrasePicker,
) -> ScriptRecord {
    ScriptAssembler::new(target_chars)
        .assemble(snapshot, now, picker)
        .record
}

/// 指示文（「簡潔に」など）から目標文字数を決めて作り直す。
pub fn regenerate(
    snapshot: &WeatherSnapshot,
    now: &DateTime<FixedOffset>,
    instructions: &str,
    default_target: usize,
    picker: &mut dyn PhrasePicker,
) -> ScriptRecord {
    let target = target_for_instructions(instructions, default_target);
    generate(snapshot, now, target, picker)
}
