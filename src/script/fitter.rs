//! セクション本文を目標文字数に寄せる。

use super::calendar::Season;
use super::formatter::{char_len, ends_with_terminal, split_sentences};
use super::phrase_bank::seasonal_sentence;
use super::picker::PhrasePicker;

/// `len > 1.2 × target` なら中央の文から削り、`len < 0.8 × target` なら季節の一文を足す。
///
/// 削る場合は元より長くならず文の数も増えない。足す場合は必ず元より長くなる。
pub fn fit(text: &str, target: usize, season: Season, picker: &mut dyn PhrasePicker) -> String {
    let len = char_len(text);
    // 整数演算で 1.2 倍 / 0.8 倍を比較する。
    if len.saturating_mul(5) > target.saturating_mul(6) {
        shrink(text, target)
    } else if len.saturating_mul(5) < target.saturating_mul(4) {
        grow(text, season, picker)
    } else {
        text.to_string()
    }
}

fn shrink(text: &str, target: usize) -> String {
    let mut sentences = split_sentences(text);
    let mut total: usize = sentences.iter().map(|s| char_len(s)).sum();
    while total > target && sentences.len() > 1 {
        let removed = sentences.remove(sentences.len() / 2);
        total -= char_len(removed);
    }
    sentences.concat()
}

fn grow(text: &str, season: Season, picker: &mut dyn PhrasePicker) -> String {
    let mut grown = text.to_string();
    if !grown.is_empty() && !ends_with_terminal(&grown) {
        grown.push('。');
    }
    grown.push_str(&seasonal_sentence(season, picker));
    grown
}
