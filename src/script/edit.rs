//! 手で直した原稿テキストを [`ScriptRecord`] に反映する。
//!
//! 書式は先頭に日付行と見出し行、続いて `【見出し】` または `[見出し]` で始まるブロック。
//! 書き出し時の末尾（合計文字数・読み上げ時間）は読み飛ばす。

use once_cell::sync::Lazy;
use regex::Regex;

use super::record::{ScriptRecord, SectionKey};

static TITLE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[【\[](.+?)[】\]]\s*$").expect("valid title regex"));

const FOOTER_PREFIXES: [&str; 2] = ["合計文字数", "読み上げ時間"];

fn is_footer(line: &str) -> bool {
    let line = line.trim_start();
    FOOTER_PREFIXES.iter().any(|prefix| line.starts_with(prefix))
}

/// 末尾の書き出しフッターを除いた行。フッターは空行の後ろに続く場合だけ認める。
fn without_footer<'a, 'b>(lines: &'b [&'a str]) -> &'b [&'a str] {
    let mut end = lines.len();
    while end > 0 && lines[end - 1].trim().is_empty() {
        end -= 1;
    }
    let mut start = end;
    while start > 0 && is_footer(lines[start - 1]) {
        start -= 1;
    }
    if start < end && (start == 0 || lines[start - 1].trim().is_empty()) {
        &lines[..start]
    } else {
        lines
    }
}

/// 編集テキストを適用した新しい原稿を返す。
///
/// 既存の原稿がなければ空の原稿に適用する。見出しのないテキストは日付も本文も変えず、
/// 合計文字数と読み上げ時間だけを計算し直す。
#[must_use]
pub fn apply_edit(current: Option<&ScriptRecord>, edited_text: &str) -> ScriptRecord {
    let mut record = current.cloned().unwrap_or_default();
    let lines: Vec<&str> = edited_text.lines().collect();

    let mut header: Vec<&str> = Vec::new();
    let mut block: Option<(Option<SectionKey>, Vec<&str>)> = None;
    let mut saw_title = false;

    for &line in without_footer(&lines) {
        if let Some(captures) = TITLE_LINE.captures(line) {
            saw_title = true;
            flush(&mut record, block.take());
            let title = captures.get(1).map_or("", |m| m.as_str());
            let key = SectionKey::from_title(title);
            if key.is_none() {
                tracing::debug!(title, "ignoring unknown section title");
            }
            block = Some((key, Vec::new()));
            continue;
        }
        match block.as_mut() {
            Some((_, body)) => body.push(line),
            None => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    header.push(trimmed);
                }
            }
        }
    }
    flush(&mut record, block);

    if saw_title {
        if let Some(date) = header.first() {
            record.date = (*date).to_string();
        }
        if let Some(forecast_date) = header.get(1) {
            record.forecast_date = (*forecast_date).to_string();
        }
    } else {
        tracing::debug!("edited text has no section titles, keeping current script");
    }

    record.recompute_totals();
    record
}

fn flush(record: &mut ScriptRecord, block: Option<(Option<SectionKey>, Vec<&str>)>) {
    if let Some((Some(key), body)) = block {
        record.sections.set(key, body.join("\n").trim().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::record::Sections;

    #[test]
    fn applies_single_block_to_empty_record() {
        let record = apply_edit(None, "2025年1月1日(水)\n今日の天気予報\n【全国天気】\nテスト内容\n");
        assert_eq!(record.date, "2025年1月1日(水)");
        assert_eq!(record.forecast_date, "今日の天気予報");
        assert_eq!(record.sections.national_weather, "テスト内容");
        assert_eq!(record.total_chars, 5);
    }

    #[test]
    fn keeps_untouched_sections_and_ignores_unknown_titles() {
        let mut sections = Sections::default();
        sections.set(SectionKey::Overview, "元の概況。".into());
        sections.set(SectionKey::WeeklyForecast, "元の週間。".into());
        let current = ScriptRecord::new("d".into(), "f".into(), sections);

        let edited = "d\nf\n[週間予報]\n  新しい週間。  \n\n【天気図】\n無視される\n";
        let record = apply_edit(Some(&current), edited);

        assert_eq!(record.sections.overview, "元の概況。");
        assert_eq!(record.sections.weekly_forecast, "新しい週間。");
        assert_eq!(record.total_chars, 5 + 6);
    }

    #[test]
    fn text_without_titles_only_recomputes_totals() {
        let mut sections = Sections::default();
        sections.set(SectionKey::Overview, "晴れ。".into());
        let mut current = ScriptRecord::new("d".into(), "f".into(), sections);
        current.total_chars = 999;

        let record = apply_edit(Some(&current), "");
        assert_eq!(record.sections, current.sections);
        assert_eq!(record.total_chars, 3);
    }

    #[test]
    fn text_without_titles_keeps_date_and_label() {
        let mut sections = Sections::default();
        sections.set(SectionKey::Overview, "晴れ。".into());
        let current =
            ScriptRecord::new("2025年1月1日(水)".into(), "今日の天気予報".into(), sections);

        let record = apply_edit(Some(&current), "ちょっとした感想です\nもう一行\n");

        assert_eq!(record.date, "2025年1月1日(水)");
        assert_eq!(record.forecast_date, "今日の天気予報");
        assert_eq!(record.sections, current.sections);
        assert_eq!(record.total_chars, 3);
    }

    #[test]
    fn body_lines_that_look_like_footer_are_kept() {
        let edited = "d\nf\n【全国気温】\n合計文字数は気にせず読みます。\n読み上げ時間も同じです。\n\n合計文字数: 25文字\n読み上げ時間: 0.1分\n";

        let record = apply_edit(None, edited);

        assert_eq!(
            record.sections.national_temperature,
            "合計文字数は気にせず読みます。\n読み上げ時間も同じです。"
        );
    }

    #[test]
    fn export_text_round_trips_through_edit() {
        let mut sections = Sections::default();
        for key in SectionKey::ALL {
            sections.set(key, format!("{}の本文です。\n二行目です。", key.title()));
        }
        let exported = ScriptRecord::new("2025年3月3日(月)".into(), "明日の天気予報".into(), sections);

        let restored = apply_edit(None, &exported.export_text());

        assert_eq!(restored, exported);
    }
}
