//! 地域ごとの天気を大まかな区分に丸める。

use super::phrase_bank::{self, GENERIC_WEATHER_EXPRESSION};
use super::picker::PhrasePicker;

/// 天気の大区分。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Other,
}

/// 説明文の判定規則。先に一致したものが優先される。
const DESCRIPTION_RULES: &[(&str, Category)] = &[
    ("晴", Category::Clear),
    ("曇", Category::Cloudy),
    // 気象庁の文言は「くもり」とかな書きになる。
    ("くもり", Category::Cloudy),
    ("雨", Category::Rain),
    ("雪", Category::Snow),
];

impl Category {
    #[must_use]
    pub fn from_description(description: &str) -> Self {
        DESCRIPTION_RULES
            .iter()
            .find(|(marker, _)| description.contains(marker))
            .map_or(Category::Other, |(_, category)| *category)
    }

    /// コード先頭の桁で判定する（1 晴れ、2 曇り、3 雨、4 雪）。
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim().chars().next() {
            Some('1') => Category::Clear,
            Some('2') => Category::Cloudy,
            Some('3') => Category::Rain,
            Some('4') => Category::Snow,
            _ => Category::Other,
        }
    }

    /// 読み上げ用の名称。
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Clear => "晴れ",
            Category::Cloudy => "曇り",
            Category::Rain => "雨",
            Category::Snow => "雪",
            Category::Other => "その他",
        }
    }
}

/// コードに対応する天気表現を1つ選ぶ。未知のコードは汎用表現。
pub fn describe(code: &str, picker: &mut dyn PhrasePicker) -> String {
    match phrase_bank::weather_expressions(code) {
        Some(variants) => picker.choose(variants).to_string(),
        None => GENERIC_WEATHER_EXPRESSION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::script::picker::FirstVariant;

    #[rstest]
    #[case("晴れ", Category::Clear)]
    #[case("雨のち晴れ", Category::Clear)]
    #[case("曇り時々雨", Category::Cloudy)]
    #[case("くもり　夜　雨", Category::Cloudy)]
    #[case("雨か雪", Category::Rain)]
    #[case("雪", Category::Snow)]
    #[case("霧", Category::Other)]
    #[case("", Category::Other)]
    fn description_rules(#[case] description: &str, #[case] expected: Category) {
        assert_eq!(Category::from_description(description), expected);
    }

    #[rstest]
    #[case("100", Category::Clear)]
    #[case("211", Category::Cloudy)]
    #[case("313", Category::Rain)]
    #[case("405", Category::Snow)]
    #[case("500", Category::Other)]
    #[case("", Category::Other)]
    fn code_rules(#[case] code: &str, #[case] expected: Category) {
        assert_eq!(Category::from_code(code), expected);
    }

    #[test]
    fn describe_falls_back_for_unknown_codes() {
        assert_eq!(describe("100", &mut FirstVariant), "青空が広がる");
        assert_eq!(describe("999", &mut FirstVariant), "天気が変わる");
    }
}
