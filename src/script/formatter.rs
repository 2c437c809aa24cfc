//! 文の整形。文末の句点を保証し、読点のない長い文に読点を1つ補う。

/// 文末とみなす記号。
pub const TERMINAL_MARKS: [char; 3] = ['。', '！', '？'];

/// 読点を補う対象となる文の長さ（文字数）。
const LONG_CLAUSE_CHARS: usize = 30;
/// 読点を探し始める位置。
const COMMA_SEARCH_START: usize = 15;
/// 文末側に残す文字数。
const COMMA_SEARCH_TAIL: usize = 5;
const PARTICLES: [char; 8] = ['は', 'が', 'を', 'に', 'で', 'と', 'も', 'や'];

#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[must_use]
pub fn ends_with_terminal(text: &str) -> bool {
    text.chars().last().is_some_and(|c| TERMINAL_MARKS.contains(&c))
}

/// 文末記号で区切った断片を返す。断片を連結すると元の文字列に戻る。
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for (index, ch) in text.char_indices() {
        if TERMINAL_MARKS.contains(&ch) {
            let end = index + ch.len_utf8();
            sentences.push(&text[start..end]);
            start = end;
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// セクション本文を読み上げ向けに整える。空文字列は空のまま返す。
#[must_use]
pub fn format_sentences(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut normalized = trimmed.to_string();
    if !ends_with_terminal(&normalized) {
        normalized.push('。');
    }

    let mut output = String::with_capacity(normalized.len() + 8);
    for sentence in split_sentences(&normalized) {
        let mut chars = sentence.chars();
        let Some(mark) = chars.next_back() else {
            continue;
        };
        let body = chars.as_str().trim();
        if body.is_empty() {
            continue;
        }
        output.push_str(&insert_comma(body));
        output.push(mark);
    }
    output
}

fn insert_comma(body: &str) -> String {
    let chars: Vec<char> = body.chars().collect();
    if chars.len() <= LONG_CLAUSE_CHARS || chars.contains(&'、') {
        return body.to_string();
    }
    let search_end = chars.len() - COMMA_SEARCH_TAIL;
    match (COMMA_SEARCH_START..search_end).find(|&i| PARTICLES.contains(&chars[i])) {
        Some(position) => {
            let mut with_comma = String::with_capacity(body.len() + '、'.len_utf8());
            with_comma.extend(&chars[..=position]);
            with_comma.push('、');
            with_comma.extend(&chars[position + 1..]);
            with_comma
        }
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_input_stay_empty() {
        assert_eq!(format_sentences(""), "");
        assert_eq!(format_sentences("   \n"), "");
    }

    #[test]
    fn appends_terminal_mark() {
        assert_eq!(format_sentences(" 晴れでしょう "), "晴れでしょう。");
        assert_eq!(format_sentences("本当ですか？"), "本当ですか？");
    }

    #[test]
    fn drops_empty_clauses() {
        assert_eq!(format_sentences("晴れ。。 曇り。"), "晴れ。曇り。");
    }

    #[test]
    fn inserts_one_comma_into_long_clause() {
        // 32文字、読点なし。位置15以降で最初の助詞は「が」。
        let body = "あいうえおかきくけこさしすせそらりるれろが降りますなにぬねのはひ";
        let formatted = format_sentences(body);
        assert_eq!(formatted.matches('、').count(), 1);
        assert!(formatted.starts_with("あいうえおかきくけこさしすせそらりるれろが、"));
        assert!(formatted.ends_with('。'));
    }

    #[test]
    fn short_or_already_punctuated_clauses_are_untouched() {
        let short = "関東甲信では晴れでしょう。";
        assert_eq!(format_sentences(short), short);
        let punctuated = "北日本は雲が広がり、東日本は青空が広がり西日本では雨が降るでしょう。";
        assert_eq!(format_sentences(punctuated), punctuated);
    }

    #[test]
    fn split_is_lossless() {
        let text = "晴れ。曇り！雨？雪";
        assert_eq!(split_sentences(text), vec!["晴れ。", "曇り！", "雨？", "雪"]);
        assert_eq!(split_sentences(text).concat(), text);
    }

    #[test]
    fn formatting_is_idempotent() {
        let raw = "皆さん、こんにちは。今日の天気は全国的に晴れの天気となっていますがところにより雲が広がるでしょう";
        let once = format_sentences(raw);
        assert_eq!(format_sentences(&once), once);
    }
}
