//! 原稿の言い回しテーブル。
//!
//! どの表も「同じ役割で入れ替え可能な候補」の並びで、選択は [`PhrasePicker`] に任せる。
//! 原稿のトーンはここで決まり、各セクションの組み立てロジックは文言を持たない。

use super::calendar::Season;
use super::picker::PhrasePicker;

/// 天気コード → 「でしょう」で結べる天気表現。
const WEATHER_EXPRESSIONS: &[(&str, &[&str])] = &[
    ("100", &["青空が広がる", "晴れ渡った空", "日差しが降り注ぐ", "澄み切った青空の下"]),
    ("101", &["晴れ間が広がる", "時々雲が現れる", "おおむね晴れ", "晴れ時々曇り"]),
    ("110", &["晴れの天気", "日差しが感じられる", "晴れ模様", "日が差す天気"]),
    ("111", &["晴れ間が見える", "時々雲が広がる", "晴れ時々曇り", "晴れたり曇ったり"]),
    ("112", &["晴れ間が見える", "雨の合間に晴れ間", "晴れ間が出る", "雨上がりの晴れ間"]),
    ("115", &["晴れ間が見える", "雪の合間に晴れ間", "晴れ間が出る", "雪の晴れ間"]),
    ("200", &["雲が広がる", "曇り空", "雲に覆われた空", "グレーの雲に包まれた空"]),
    ("201", &["雲が多く見られる", "やや曇った空", "曇り時々晴れ", "雲の多い天気"]),
    ("202", &["雲が広がり一時雨", "曇り一時雨", "雨の降る可能性がある", "雨雲が近づく"]),
    ("203", &["曇り時々雨", "雨の降る時間帯もある", "雨雲が通過する", "雨が降ったり止んだり"]),
    ("204", &["曇り一時雪", "雪の降る可能性がある", "雪雲が近づく", "雪がちらつく"]),
    ("205", &["曇り時々雪", "雪の降る時間帯もある", "雪雲が通過する", "雪が降ったり止んだり"]),
    ("206", &["曇り一時雨か雪", "雨や雪の可能性がある", "天気が不安定", "雨や雪が混じる"]),
    ("207", &["曇り時々雨か雪", "雨や雪の降る時間帯もある", "天気が不安定", "雨や雪が混じる"]),
    ("208", &["曇り一時雨か雷雨", "雷を伴う雨の可能性がある", "雷雨の恐れがある", "激しい雨の可能性がある"]),
    ("209", &["霧が発生する", "視界不良となる", "霧に包まれる", "霧で見通しが悪い"]),
    ("210", &["曇りがちの天気", "雲の多い天気", "どんよりとした空", "薄暗い雲に覆われる"]),
    ("211", &["曇り後晴れ", "次第に晴れる", "雲が晴れてくる", "晴れ間が広がる"]),
    ("212", &["曇り後一時雨", "次第に雨の降る天気", "雨雲が近づく", "雨の予報"]),
    ("214", &["曇り後雨", "次第に雨の降る天気", "天気が崩れる", "雨の予報"]),
    ("217", &["曇り後雪", "次第に雪の降る天気", "雪雲が近づく", "雪の予報"]),
    ("218", &["曇り後雨か雪", "雨や雪に変わる", "天気が崩れる", "雨や雪の予報"]),
    ("224", &["曇り昼頃から雨", "昼頃から雨の降る天気", "午後は雨模様", "昼過ぎから雨"]),
    ("225", &["曇り夕方から雨", "夕方から雨の降る天気", "夜は雨模様", "夕刻から雨"]),
    ("226", &["曇り夜は雨", "夜になると雨", "夜間は雨の予報", "夜から雨模様"]),
    ("300", &["雨が降る", "雨模様", "傘が必要な天気", "雨の一日"]),
    ("301", &["雨時々晴れ", "雨の合間に晴れ間", "にわか雨", "晴れ間もある雨"]),
    ("302", &["雨時々止む", "断続的な雨", "雨が降ったり止んだり", "雨脚が強まったり弱まったりする"]),
    ("303", &["雨時々雪", "雨と雪が混じる", "雨や雪が降る", "雨と雪が入り混じる"]),
    ("304", &["雨か雪", "雨または雪", "雨や雪の可能性がある", "雨と雪の境界"]),
    ("306", &["大雨", "激しい雨", "土砂災害に警戒が必要", "河川の増水に注意が必要"]),
    ("308", &["雨で暴風を伴う", "暴風雨", "強風と雨", "風雨が強まる"]),
    ("309", &["雨一時雪", "雨が一時雪に変わる", "雨や雪が降る", "冷たい雨"]),
    ("311", &["雨後晴れ", "雨上がりの晴天", "雨の後は晴れる", "雨が止んで晴れる"]),
    ("313", &["雨後曇り", "雨が止んで曇る", "雨上がりの曇天", "雨の後は曇り空"]),
    ("314", &["雨後時々雪", "雨から雪に変わる", "雨が雪に変わる", "雨の後は雪"]),
    ("320", &["朝の内雨後晴れ", "朝は雨でその後晴れる", "午前中は雨で午後は晴れ", "朝の雨は上がり晴れる"]),
    ("321", &["朝の内雨後曇り", "朝は雨でその後曇る", "午前中は雨で午後は曇り", "朝の雨は上がり曇る"]),
    ("350", &["雷を伴う雨", "雷雨", "激しい雨と雷", "雷鳴の響く雨"]),
    ("400", &["雪が降る", "雪模様", "雪の舞う天気", "雪の一日"]),
    ("401", &["雪時々晴れ", "雪の合間に晴れ間", "にわか雪", "晴れ間もある雪"]),
    ("402", &["雪時々止む", "断続的な雪", "雪が降ったり止んだり", "雪の強さが変わる"]),
    ("403", &["雪時々雨", "雪と雨が混じる", "みぞれ", "雪と雨が入り混じる"]),
    ("405", &["大雪", "激しい雪", "積雪に警戒が必要", "交通障害に注意が必要"]),
    ("406", &["風雪が強い", "吹雪", "地吹雪", "視界不良に注意が必要"]),
    ("407", &["暴風雪", "猛吹雪", "外出が危険な荒れた天気", "厳重な警戒が必要"]),
    ("411", &["雪後晴れ", "雪上がりの晴天", "雪の後は晴れる", "雪が止んで晴れる"]),
    ("413", &["雪後曇り", "雪が止んで曇る", "雪上がりの曇天", "雪の後は曇り空"]),
    ("414", &["雪後雨", "雪から雨に変わる", "雪が雨に変わる", "雪の後は雨"]),
    ("420", &["朝の内雪後晴れ", "朝は雪でその後晴れる", "午前中は雪で午後は晴れ", "朝の雪は上がり晴れる"]),
    ("421", &["朝の内雪後曇り", "朝は雪でその後曇る", "午前中は雪で午後は曇り", "朝の雪は上がり曇る"]),
    ("450", &["雷を伴う雪", "雷雪", "雷を伴う激しい雪", "雷鳴の響く雪"]),
];

/// 表にないコードに使う汎用表現。
pub const GENERIC_WEATHER_EXPRESSION: &str = "天気が変わる";

const SPRING: &[&str] = &["春らしい陽気", "春の訪れ", "春めいた天気", "春風が心地よい季節"];
const SUMMER: &[&str] = &["夏らしい暑さ", "夏空", "真夏日となる所も", "熱中症に注意が必要な暑さ"];
const AUTUMN: &[&str] = &["秋らしい爽やかさ", "秋の気配", "秋晴れ", "秋の深まり"];
const WINTER: &[&str] = &["冬らしい冷え込み", "冬の厳しさ", "冬本番の寒さ", "冬の冷たい空気"];

/// 文頭の接続表現。読点込み。
pub const CONNECTIVES: &[&str] = &["また、", "そして、", "一方、", "さらに、", "なお、", "続いて、", "次に、"];

/// 動詞の終止形に続けられる丁寧な文末表現。句点は含まない。
pub const POLITE_ENDINGS: &[&str] = &["見込みです", "でしょう", "見通しです", "と予想されます"];

/// 冒頭のあいさつ。句点は含まない。
pub const GREETINGS: &[&str] = &[
    "皆さん、こんにちは",
    "お天気の時間です",
    "それでは天気予報をお伝えします",
    "今日の天気をお伝えします",
];

/// 締めくくり。句点は含まない。
pub const CLOSINGS: &[&str] = &[
    "以上、天気予報でした",
    "今日もお天気に気をつけてお過ごしください",
    "最新の気象情報にご注意ください",
    "お出かけの際は天気の変化にご注意ください",
];

const CAUTION_TEMPLATES: &[&str] = &[
    "お出かけの際は{item}にご注意ください",
    "{item}にはくれぐれもご注意ください",
    "{item}には十分お気をつけください",
    "{item}に対する備えをお願いします",
];

/// 注意喚起の種類。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caution {
    Rain,
    Snow,
    Heat,
    Cold,
}

impl Caution {
    fn items(self) -> &'static [&'static str] {
        match self {
            Caution::Rain => &["傘の準備", "足元の濡れ", "路面の滑りやすさ", "雨の強まり"],
            Caution::Snow => &["路面の凍結", "積雪", "視界不良", "転倒"],
            Caution::Heat => &["熱中症", "水分補給", "直射日光", "体調管理"],
            Caution::Cold => &["防寒対策", "凍結", "体温管理", "乾燥"],
        }
    }

    /// 季節だけで決まる注意（夏は暑さ、冬は寒さ）。
    #[must_use]
    pub fn for_season(season: Season) -> Option<Self> {
        match season {
            Season::Summer => Some(Caution::Heat),
            Season::Winter => Some(Caution::Cold),
            Season::Spring | Season::Autumn => None,
        }
    }
}

/// 天気コードに対応する表現候補。
#[must_use]
pub fn weather_expressions(code: &str) -> Option<&'static [&'static str]> {
    WEATHER_EXPRESSIONS
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|(_, variants)| *variants)
}

#[must_use]
pub fn seasonal_expressions(season: Season) -> &'static [&'static str] {
    match season {
        Season::Spring => SPRING,
        Season::Summer => SUMMER,
        Season::Autumn => AUTUMN,
        Season::Winter => WINTER,
    }
}

/// 季節感を添える一文。「{接続}{季節表現}を感じる一日となりそうです。」
pub fn seasonal_sentence(season: Season, picker: &mut dyn PhrasePicker) -> String {
    let connective = picker.choose(CONNECTIVES);
    let seasonal = picker.choose(seasonal_expressions(season));
    format!("{connective}{seasonal}を感じる一日となりそうです。")
}

/// 注意喚起の一文（句点つき）。
pub fn caution_sentence(kind: Caution, picker: &mut dyn PhrasePicker) -> String {
    let template = picker.choose(CAUTION_TEMPLATES);
    let item = picker.choose(kind.items());
    format!("{}。", template.replace("{item}", item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::picker::FirstVariant;

    #[test]
    fn every_table_has_interchangeable_variants() {
        for (code, variants) in WEATHER_EXPRESSIONS {
            assert!(!variants.is_empty(), "code {code} has no variants");
        }
        for season in [Season::Spring, Season::Summer, Season::Autumn, Season::Winter] {
            assert_eq!(seasonal_expressions(season).len(), 4);
        }
        assert!(CAUTION_TEMPLATES.iter().all(|t| t.contains("{item}")));
    }

    #[test]
    fn caution_sentence_fills_template() {
        let sentence = caution_sentence(Caution::Rain, &mut FirstVariant);
        assert_eq!(sentence, "お出かけの際は傘の準備にご注意ください。");
    }

    #[test]
    fn seasonal_sentence_uses_connective_and_season() {
        let sentence = seasonal_sentence(Season::Winter, &mut FirstVariant);
        assert_eq!(sentence, "また、冬らしい冷え込みを感じる一日となりそうです。");
    }

    #[test]
    fn season_only_caution() {
        assert_eq!(Caution::for_season(Season::Summer), Some(Caution::Heat));
        assert_eq!(Caution::for_season(Season::Autumn), None);
    }
}
