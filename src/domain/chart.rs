// ==========================================
// 八字排盘引擎 - 命盘（四柱）
// ==========================================
// 不变量: 四柱必须同时存在，且来自同一时刻
// ==========================================

use crate::domain::types::{Branch, Element, Gender, PillarRelation, Stem, TenGod};
use serde::{Deserialize, Serialize};

// ==========================================
// Pillar - 单柱
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pillar {
    pub stem: Stem,
    pub branch: Branch,

    /// 地支藏干（本气在前）
    pub hidden_stems: Vec<Stem>,

    /// 天干对日主的十神；日柱固定为"日主"
    pub ten_god: PillarRelation,

    /// 藏干对日主的十神，与 hidden_stems 一一对应
    pub hidden_ten_gods: Vec<TenGod>,

    /// 干支五行标签，如 "木火"
    pub element_label: String,
}

impl Pillar {
    pub fn stem_element(&self) -> Element {
        self.stem.element()
    }

    pub fn branch_element(&self) -> Element {
        self.branch.element()
    }

    /// 地支本气（藏干首位）
    pub fn main_hidden_stem(&self) -> Option<Stem> {
        self.hidden_stems.first().copied()
    }
}

// ==========================================
// Chart - 命盘
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Pillar,

    pub day_master: Stem,            // 日主天干
    pub day_master_element: Element, // 日主五行
    pub gender: Gender,

    pub solar_date: String, // 公历（校正后）展示串
    pub lunar_date: String, // 农历展示串
}

impl Chart {
    /// 年、月、日、时顺序
    pub fn pillars(&self) -> [&Pillar; 4] {
        [&self.year, &self.month, &self.day, &self.hour]
    }

    /// 八个位置的五行（年干、年支、月干、月支……）
    pub fn position_elements(&self) -> [Element; 8] {
        let mut out = [Element::Wood; 8];
        for (i, pillar) in self.pillars().iter().enumerate() {
            out[i * 2] = pillar.stem_element();
            out[i * 2 + 1] = pillar.branch_element();
        }
        out
    }

    /// 年、月、时三柱天干的十神（不含日主）
    pub fn visible_ten_gods(&self) -> Vec<TenGod> {
        [&self.year, &self.month, &self.hour]
            .iter()
            .filter_map(|p| p.ten_god.ten_god())
            .collect()
    }
}
