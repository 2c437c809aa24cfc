//! 全国放送で扱う地方区分と気象庁エリアコード。

use std::collections::BTreeMap;

/// 放送対象の地方。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    /// 気象庁の予報区コード（府県予報区）。
    pub area_code: &'static str,
}

/// 北から南への放送順。地域の列挙順はすべてこの順序に従う。
pub const BROADCAST_REGIONS: [Region; 10] = [
    Region { name: "北海道", area_code: "016000" },
    Region { name: "東北", area_code: "040000" },
    Region { name: "関東甲信", area_code: "130000" },
    Region { name: "北陸", area_code: "170000" },
    Region { name: "東海", area_code: "230000" },
    Region { name: "近畿", area_code: "270000" },
    Region { name: "中国", area_code: "340000" },
    Region { name: "四国", area_code: "390000" },
    Region { name: "九州", area_code: "400000" },
    Region { name: "沖縄", area_code: "471000" },
];

/// 全国天気で使う4つの広域ブロック。
pub const NATIONAL_GROUPS: [(&str, &[&str]); 4] = [
    ("北日本", &["北海道", "東北"]),
    ("東日本", &["関東甲信", "北陸", "東海"]),
    ("西日本", &["近畿", "中国", "四国", "九州"]),
    ("沖縄", &["沖縄"]),
];

/// 気温の変化を伝える代表地域。
pub const TEMPERATURE_REGIONS: [&str; 3] = ["関東甲信", "北海道", "沖縄"];

/// 週間予報の代表地域（東京）。
pub const WEEKLY_REGION: &str = "関東甲信";

#[must_use]
pub fn is_broadcast_region(name: &str) -> bool {
    BROADCAST_REGIONS.iter().any(|region| region.name == name)
}

/// 放送順に並べた `(地域名, 値)` の列を返す。未知の地域は末尾に名前順で続く。
#[must_use]
pub fn in_broadcast_order<V>(map: &BTreeMap<String, V>) -> Vec<(&str, &V)> {
    let mut ordered: Vec<(&str, &V)> = BROADCAST_REGIONS
        .iter()
        .filter_map(|region| {
            map.get_key_value(region.name)
                .map(|(name, value)| (name.as_str(), value))
        })
        .collect();
    ordered.extend(
        map.iter()
            .filter(|(name, _)| !is_broadcast_region(name))
            .map(|(name, value)| (name.as_str(), value)),
    );
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_order_puts_known_regions_first() {
        let mut map = BTreeMap::new();
        map.insert("沖縄".to_string(), 3);
        map.insert("小笠原".to_string(), 9);
        map.insert("北海道".to_string(), 1);
        map.insert("近畿".to_string(), 2);

        let names: Vec<&str> = in_broadcast_order(&map).into_iter().map(|(n, _)| n).collect();

        assert_eq!(names, vec!["北海道", "近畿", "沖縄", "小笠原"]);
    }

    #[test]
    fn national_groups_cover_every_region_once() {
        let mut members: Vec<&str> = NATIONAL_GROUPS
            .iter()
            .flat_map(|(_, regions)| regions.iter().copied())
            .collect();
        members.sort_unstable();
        let mut expected: Vec<&str> = BROADCAST_REGIONS.iter().map(|r| r.name).collect();
        expected.sort_unstable();
        assert_eq!(members, expected);
    }
}
