// ==========================================
// 八字排盘引擎 - 领域类型定义
// ==========================================
// 天干 / 地支 / 五行 / 十神 / 性别 / 历法
// 所有枚举序列化为汉字，便于展示层直接使用
// ==========================================
// 注: 五行、阴阳、藏干等对照表见 engine::classifier
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 五行 (Element)
// ==========================================
// 声明顺序即相生顺序: 木 → 火 → 土 → 金 → 水
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Element {
    #[serde(rename = "木")]
    Wood,
    #[serde(rename = "火")]
    Fire,
    #[serde(rename = "土")]
    Earth,
    #[serde(rename = "金")]
    Metal,
    #[serde(rename = "水")]
    Water,
}

impl Element {
    /// 相生顺序
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    /// 报告排序顺序（金木水火土），用于最旺/最弱的并列裁决
    pub const REPORT_ORDER: [Element; 5] = [
        Element::Metal,
        Element::Wood,
        Element::Water,
        Element::Fire,
        Element::Earth,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_char(self) -> char {
        match self {
            Element::Wood => '木',
            Element::Fire => '火',
            Element::Earth => '土',
            Element::Metal => '金',
            Element::Water => '水',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        Element::ALL.into_iter().find(|e| e.as_char() == c)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

// ==========================================
// 天干 (Heavenly Stem)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stem {
    #[serde(rename = "甲")]
    Jia,
    #[serde(rename = "乙")]
    Yi,
    #[serde(rename = "丙")]
    Bing,
    #[serde(rename = "丁")]
    Ding,
    #[serde(rename = "戊")]
    Wu,
    #[serde(rename = "己")]
    Ji,
    #[serde(rename = "庚")]
    Geng,
    #[serde(rename = "辛")]
    Xin,
    #[serde(rename = "壬")]
    Ren,
    #[serde(rename = "癸")]
    Gui,
}

const STEM_CHARS: [char; 10] = ['甲', '乙', '丙', '丁', '戊', '己', '庚', '辛', '壬', '癸'];

impl Stem {
    pub const ALL: [Stem; 10] = [
        Stem::Jia,
        Stem::Yi,
        Stem::Bing,
        Stem::Ding,
        Stem::Wu,
        Stem::Ji,
        Stem::Geng,
        Stem::Xin,
        Stem::Ren,
        Stem::Gui,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// 按序号取天干（自动取模）
    pub fn from_index(index: usize) -> Self {
        Stem::ALL[index % 10]
    }

    pub fn as_char(self) -> char {
        STEM_CHARS[self.index()]
    }

    pub fn from_char(c: char) -> Option<Self> {
        STEM_CHARS.iter().position(|&s| s == c).map(Stem::from_index)
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Stem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Stem::from_char(c).ok_or_else(|| format!("未知天干: {}", s)),
            _ => Err(format!("未知天干: {}", s)),
        }
    }
}

// ==========================================
// 地支 (Earthly Branch)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Branch {
    #[serde(rename = "子")]
    Zi,
    #[serde(rename = "丑")]
    Chou,
    #[serde(rename = "寅")]
    Yin,
    #[serde(rename = "卯")]
    Mao,
    #[serde(rename = "辰")]
    Chen,
    #[serde(rename = "巳")]
    Si,
    #[serde(rename = "午")]
    Wu,
    #[serde(rename = "未")]
    Wei,
    #[serde(rename = "申")]
    Shen,
    #[serde(rename = "酉")]
    You,
    #[serde(rename = "戌")]
    Xu,
    #[serde(rename = "亥")]
    Hai,
}

const BRANCH_CHARS: [char; 12] = [
    '子', '丑', '寅', '卯', '辰', '巳', '午', '未', '申', '酉', '戌', '亥',
];

impl Branch {
    pub const ALL: [Branch; 12] = [
        Branch::Zi,
        Branch::Chou,
        Branch::Yin,
        Branch::Mao,
        Branch::Chen,
        Branch::Si,
        Branch::Wu,
        Branch::Wei,
        Branch::Shen,
        Branch::You,
        Branch::Xu,
        Branch::Hai,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// 按序号取地支（自动取模）
    pub fn from_index(index: usize) -> Self {
        Branch::ALL[index % 12]
    }

    pub fn as_char(self) -> char {
        BRANCH_CHARS[self.index()]
    }

    pub fn from_char(c: char) -> Option<Self> {
        BRANCH_CHARS.iter().position(|&b| b == c).map(Branch::from_index)
    }

    /// 六冲: 相隔六位的地支
    pub fn clash(self) -> Branch {
        Branch::from_index(self.index() + 6)
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Branch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Branch::from_char(c).ok_or_else(|| format!("未知地支: {}", s)),
            _ => Err(format!("未知地支: {}", s)),
        }
    }
}

// ==========================================
// 十神 (Ten Gods)
// ==========================================
// 日主与目标天干的关系: 五行生克 × 阴阳异同
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenGod {
    #[serde(rename = "比肩")]
    Peer,
    #[serde(rename = "劫财")]
    Rival,
    #[serde(rename = "食神")]
    OutputGentle,
    #[serde(rename = "伤官")]
    OutputSharp,
    #[serde(rename = "偏财")]
    WealthIndirect,
    #[serde(rename = "正财")]
    WealthDirect,
    #[serde(rename = "七杀")]
    AuthorityHarsh,
    #[serde(rename = "正官")]
    AuthorityProper,
    #[serde(rename = "偏印")]
    ResourceIndirect,
    #[serde(rename = "正印")]
    ResourceDirect,
}

impl TenGod {
    pub const ALL: [TenGod; 10] = [
        TenGod::Peer,
        TenGod::Rival,
        TenGod::OutputGentle,
        TenGod::OutputSharp,
        TenGod::WealthIndirect,
        TenGod::WealthDirect,
        TenGod::AuthorityHarsh,
        TenGod::AuthorityProper,
        TenGod::ResourceIndirect,
        TenGod::ResourceDirect,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TenGod::Peer => "比肩",
            TenGod::Rival => "劫财",
            TenGod::OutputGentle => "食神",
            TenGod::OutputSharp => "伤官",
            TenGod::WealthIndirect => "偏财",
            TenGod::WealthDirect => "正财",
            TenGod::AuthorityHarsh => "七杀",
            TenGod::AuthorityProper => "正官",
            TenGod::ResourceIndirect => "偏印",
            TenGod::ResourceDirect => "正印",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        TenGod::ALL.into_iter().find(|g| g.label() == label)
    }

    pub fn is_wealth(self) -> bool {
        matches!(self, TenGod::WealthIndirect | TenGod::WealthDirect)
    }

    pub fn is_output(self) -> bool {
        matches!(self, TenGod::OutputGentle | TenGod::OutputSharp)
    }

    pub fn is_authority(self) -> bool {
        matches!(self, TenGod::AuthorityHarsh | TenGod::AuthorityProper)
    }
}

impl fmt::Display for TenGod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 柱的十神标记
// ==========================================
// 日柱固定为"日主"，其余三柱为天干对日主的十神
// 序列化为单个字符串: "日主" / "比肩" / ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PillarRelation {
    DayMaster,
    God(TenGod),
}

pub const DAY_MASTER_LABEL: &str = "日主";

impl PillarRelation {
    pub fn label(self) -> &'static str {
        match self {
            PillarRelation::DayMaster => DAY_MASTER_LABEL,
            PillarRelation::God(god) => god.label(),
        }
    }

    pub fn ten_god(self) -> Option<TenGod> {
        match self {
            PillarRelation::DayMaster => None,
            PillarRelation::God(god) => Some(god),
        }
    }
}

impl From<PillarRelation> for String {
    fn from(value: PillarRelation) -> Self {
        value.label().to_string()
    }
}

impl TryFrom<String> for PillarRelation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == DAY_MASTER_LABEL {
            return Ok(PillarRelation::DayMaster);
        }
        TenGod::from_label(&value)
            .map(PillarRelation::God)
            .ok_or_else(|| format!("未知十神: {}", value))
    }
}

impl fmt::Display for PillarRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 性别 (Gender)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// 大运计算使用的性别代码: 男=1, 女=0
    pub fn code(self) -> u8 {
        match self {
            Gender::Male => 1,
            Gender::Female => 0,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" | "男" => Ok(Gender::Male),
            "female" | "f" | "女" => Ok(Gender::Female),
            other => Err(format!("未知性别: {}", other)),
        }
    }
}

// ==========================================
// 历法 (Calendar System)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarSystem {
    Solar,
    Lunar,
}

impl fmt::Display for CalendarSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarSystem::Solar => write!(f, "公历"),
            CalendarSystem::Lunar => write!(f, "农历"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_round_trip_by_char() {
        for stem in Stem::ALL {
            assert_eq!(Stem::from_char(stem.as_char()), Some(stem));
        }
        assert_eq!("庚".parse::<Stem>(), Ok(Stem::Geng));
        assert!("甲乙".parse::<Stem>().is_err());
    }

    #[test]
    fn test_branch_clash() {
        assert_eq!(Branch::Zi.clash(), Branch::Wu);
        assert_eq!(Branch::Hai.clash(), Branch::Si);
        assert_eq!(Branch::Chen.clash(), Branch::Xu);
    }

    #[test]
    fn test_pillar_relation_serializes_as_label() {
        let json = serde_json::to_string(&PillarRelation::DayMaster).unwrap();
        assert_eq!(json, "\"日主\"");

        let god: PillarRelation = serde_json::from_str("\"七杀\"").unwrap();
        assert_eq!(god, PillarRelation::God(TenGod::AuthorityHarsh));
    }

    #[test]
    fn test_element_serializes_as_chinese() {
        assert_eq!(serde_json::to_string(&Element::Water).unwrap(), "\"水\"");
        assert_eq!(Element::from_char('金'), Some(Element::Metal));
    }

    #[test]
    fn test_gender_code() {
        assert_eq!(Gender::Male.code(), 1);
        assert_eq!(Gender::Female.code(), 0);
        assert_eq!("女".parse::<Gender>(), Ok(Gender::Female));
    }
}
