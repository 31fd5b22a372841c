// ==========================================
// 八字排盘引擎 - 大运 / 流年
// ==========================================

use crate::domain::ganzhi::StemBranch;
use crate::domain::types::{Branch, Element, Stem};
use serde::{Deserialize, Serialize};

// ==========================================
// RawLuckCycle - 历法服务返回的原始大运
// ==========================================
// 首项可能是空干支占位（起运前），由引擎识别并丢弃
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLuckCycle {
    pub gan_zhi: String, // 干支串，占位项为空串
    pub start_age: i32,  // 起始虚岁
    pub start_year: i32, // 起始公历年
}

impl RawLuckCycle {
    pub fn is_placeholder(&self) -> bool {
        self.gan_zhi.trim().is_empty()
    }
}

// ==========================================
// LuckPillar - 大运（十年一步）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LuckPillar {
    pub stem: Stem,
    pub branch: Branch,
    pub start_age: i32,
    pub start_year: i32,
    pub stem_element: Element,
    pub branch_element: Element,
    pub score: i32, // 0-100
}

impl LuckPillar {
    pub fn gan_zhi(&self) -> StemBranch {
        StemBranch::new(self.stem, self.branch)
    }

    /// 展示标签，如 "丁卯"
    pub fn label(&self) -> String {
        self.gan_zhi().to_string()
    }
}

// ==========================================
// YearlyLuckPoint - 流年点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyLuckPoint {
    pub year: i32,
    pub age: i32, // 虚岁，下限 0
    pub stem: Stem,
    pub branch: Branch,
    pub score: i32,      // 10-95
    pub luck_pillar: String, // 所在大运标签
}
