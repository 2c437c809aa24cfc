//! 気象庁天気コードと天気文言の対応表。

/// コード → 天気文言。
const CODE_TEXTS: &[(&str, &str)] = &[
    ("100", "晴れ"),
    ("101", "晴れ時々曇り"),
    ("102", "晴れ一時雨"),
    ("103", "晴れ時々雨"),
    ("104", "晴れ一時雪"),
    ("105", "晴れ時々雪"),
    ("106", "晴れ一時雨か雪"),
    ("107", "晴れ時々雨か雪"),
    ("108", "晴れ一時雨か雷雨"),
    ("110", "晴れ後時々曇り"),
    ("111", "晴れ後曇り"),
    ("112", "晴れ後一時雨"),
    ("113", "晴れ後時々雨"),
    ("114", "晴れ後雨"),
    ("115", "晴れ後一時雪"),
    ("116", "晴れ後時々雪"),
    ("117", "晴れ後雪"),
    ("118", "晴れ後雨か雪"),
    ("119", "晴れ後雨か雷雨"),
    ("120", "晴れ朝夕一時雨"),
    ("121", "晴れ朝の内一時雨"),
    ("122", "晴れ夕方一時雨"),
    ("123", "晴れ山沿い雷雨"),
    ("124", "晴れ山沿い雪"),
    ("125", "晴れ午後は雷雨"),
    ("126", "晴れ昼頃から雨"),
    ("127", "晴れ夕方から雨"),
    ("128", "晴れ夜は雨"),
    ("130", "朝の内霧後晴れ"),
    ("131", "晴れ明け方霧"),
    ("132", "晴れ朝夕曇り"),
    ("140", "晴れ時々雨で雷を伴う"),
    ("160", "晴れ一時雪か雨"),
    ("170", "晴れ時々雪か雨"),
    ("181", "晴れ後雪か雨"),
    ("200", "曇り"),
    ("201", "曇り時々晴れ"),
    ("202", "曇り一時雨"),
    ("203", "曇り時々雨"),
    ("204", "曇り一時雪"),
    ("205", "曇り時々雪"),
    ("206", "曇り一時雨か雪"),
    ("207", "曇り時々雨か雪"),
    ("208", "曇り一時雨か雷雨"),
    ("209", "霧"),
    ("210", "曇り後時々晴れ"),
    ("211", "曇り後晴れ"),
    ("212", "曇り後一時雨"),
    ("213", "曇り後時々雨"),
    ("214", "曇り後雨"),
    ("215", "曇り後一時雪"),
    ("216", "曇り後時々雪"),
    ("217", "曇り後雪"),
    ("218", "曇り後雨か雪"),
    ("219", "曇り後雨か雷雨"),
    ("220", "曇り朝夕一時雨"),
    ("221", "曇り朝の内一時雨"),
    ("222", "曇り夕方一時雨"),
    ("223", "曇り日中時々晴れ"),
    ("224", "曇り昼頃から雨"),
    ("225", "曇り夕方から雨"),
    ("226", "曇り夜は雨"),
    ("228", "曇り昼頃から雪"),
    ("229", "曇り夕方から雪"),
    ("230", "曇り夜は雪"),
    ("231", "曇り海上海岸は霧か霧雨"),
    ("240", "曇り時々雨で雷を伴う"),
    ("250", "曇り時々雪で雷を伴う"),
    ("260", "曇り一時雪か雨"),
    ("270", "曇り時々雪か雨"),
    ("281", "曇り後雪か雨"),
    ("300", "雨"),
    ("301", "雨時々晴れ"),
    ("302", "雨時々止む"),
    ("303", "雨時々雪"),
    ("304", "雨か雪"),
    ("306", "大雨"),
    ("308", "雨で暴風を伴う"),
    ("309", "雨一時雪"),
    ("311", "雨後晴れ"),
    ("313", "雨後曇り"),
    ("314", "雨後時々雪"),
    ("315", "雨後雪"),
    ("316", "雨か雪後晴れ"),
    ("317", "雨か雪後曇り"),
    ("320", "朝の内雨後晴れ"),
    ("321", "朝の内雨後曇り"),
    ("322", "雨朝晩一時雪"),
    ("323", "雨昼頃から晴れ"),
    ("324", "雨夕方から晴れ"),
    ("325", "雨夜は晴れ"),
    ("326", "雨昼頃から曇り"),
    ("327", "雨夕方から曇り"),
    ("328", "雨夜は曇り"),
    ("329", "雨一時強く降る"),
    ("340", "雪か雨"),
    ("350", "雨で雷を伴う"),
    ("361", "雪か雨後晴れ"),
    ("371", "雪か雨後曇り"),
    ("400", "雪"),
    ("401", "雪時々晴れ"),
    ("402", "雪時々止む"),
    ("403", "雪時々雨"),
    ("405", "大雪"),
    ("406", "風雪強い"),
    ("407", "暴風雪"),
    ("409", "雪一時雨"),
    ("411", "雪後晴れ"),
    ("413", "雪後曇り"),
    ("414", "雪後雨"),
    ("420", "朝の内雪後晴れ"),
    ("421", "朝の内雪後曇り"),
    ("422", "雪昼頃から雨"),
    ("423", "雪夕方から雨"),
    ("425", "雪一時強く降る"),
    ("426", "雪後みぞれ"),
    ("427", "みぞれ後雪"),
    ("450", "雪で雷を伴う"),
];

/// 荒天につながりやすいコード。該当地域には急変への注意を出す。
pub const WARNING_PRONE_CODES: &[&str] = &[
    "203", "204", "205", "206", "207", "208", "209", "300", "301", "302", "303", "304", "306",
    "308", "309", "350",
];

/// コードに対応する天気文言。未知のコードは `None`。
#[must_use]
pub fn code_to_text(code: &str) -> Option<&'static str> {
    CODE_TEXTS
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|(_, text)| *text)
}

/// 天気文言からコードを推定する。表に完全一致がなければキーワードで近似し、
/// 何も分からなければ曇り（200）とする。
#[must_use]
pub fn text_to_code(text: &str) -> &'static str {
    let text = text.trim();
    if text.is_empty() {
        return "200";
    }
    if let Some((code, _)) = CODE_TEXTS.iter().find(|(_, candidate)| *candidate == text) {
        return *code;
    }

    let sunny = text.contains('晴');
    let cloudy = text.contains('曇') || text.contains("くもり");
    let rain = text.contains('雨');
    let snow = text.contains('雪');
    match (sunny, cloudy, rain, snow) {
        (true, true, _, _) => "101",
        (true, false, _, _) => "100",
        (false, _, true, true) => "304",
        (false, _, true, false) => "300",
        (false, _, false, true) => "400",
        _ => "200",
    }
}

#[must_use]
pub fn is_warning_prone(code: &str) -> bool {
    WARNING_PRONE_CODES.contains(&code)
}
