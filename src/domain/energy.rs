// ==========================================
// 八字排盘引擎 - 五行统计 / 人生能量
// ==========================================

use crate::domain::types::Element;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 命盘八字位置总数（年月日时 × 干支）
pub const CHART_POSITIONS: u8 = 8;

// ==========================================
// ElementScoreMap - 五行计数
// ==========================================
// 不变量: 五个元素全部在表中，计数之和 == 8
// BTreeMap 保证序列化顺序固定（木火土金水）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementScoreMap(BTreeMap<Element, u8>);

impl ElementScoreMap {
    /// 空表（五行均为 0）
    pub fn zeroed() -> Self {
        Self(Element::ALL.iter().map(|e| (*e, 0)).collect())
    }

    /// 按位置五行计数
    pub fn from_elements<I: IntoIterator<Item = Element>>(elements: I) -> Self {
        let mut map = Self::zeroed();
        for element in elements {
            map.increment(element);
        }
        map
    }

    pub fn increment(&mut self, element: Element) {
        *self.0.entry(element).or_insert(0) += 1;
    }

    pub fn count(&self, element: Element) -> u8 {
        self.0.get(&element).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.0.values().map(|v| u32::from(*v)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Element, u8)> + '_ {
        self.0.iter().map(|(e, v)| (*e, *v))
    }

    /// 计数为 0 的元素（报告顺序）
    pub fn missing(&self) -> Vec<Element> {
        Element::REPORT_ORDER
            .into_iter()
            .filter(|e| self.count(*e) == 0)
            .collect()
    }

    /// 计数 ≥ threshold 的元素个数
    pub fn count_at_least(&self, threshold: u8) -> usize {
        self.0.values().filter(|v| **v >= threshold).count()
    }
}

// ==========================================
// WuxingSummary - 五行概要
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WuxingSummary {
    pub scores: ElementScoreMap,
    pub strongest: Element,
    pub weakest: Element,
    pub missing: Vec<Element>,
}

// ==========================================
// LifeEnergyReport - 人生能量
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyScores {
    pub career: i32,
    pub wealth: i32,
    pub emotion: i32,
    pub health: i32,
    pub wisdom: i32,
}

impl EnergyScores {
    pub fn as_array(&self) -> [i32; 5] {
        [
            self.career,
            self.wealth,
            self.emotion,
            self.health,
            self.wisdom,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergySubScores {
    pub nobleman: i32,      // 贵人运
    pub peach_blossom: i32, // 桃花运
    pub career: i32,
    pub wealth: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeEnergyReport {
    pub scores: EnergyScores,
    pub total_score: i32,
    pub description: String,
    pub sub_scores: EnergySubScores,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_elements_sums_to_eight() {
        let map = ElementScoreMap::from_elements([
            Element::Wood,
            Element::Fire,
            Element::Wood,
            Element::Wood,
            Element::Metal,
            Element::Fire,
            Element::Earth,
            Element::Wood,
        ]);
        assert_eq!(map.total(), u32::from(CHART_POSITIONS));
        assert_eq!(map.count(Element::Wood), 4);
        assert_eq!(map.missing(), vec![Element::Water]);
        assert_eq!(map.count_at_least(4), 1);
    }

    #[test]
    fn test_serializes_in_fixed_order_with_zero_entries() {
        let map = ElementScoreMap::from_elements([Element::Water; 8]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"木":0,"火":0,"土":0,"金":0,"水":8}"#);
    }
}
