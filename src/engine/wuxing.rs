// ==========================================
// 八字排盘引擎 - 五行统计
// ==========================================
// 八个位置（四柱干支）逐一计数
// 最旺: 按 金木水火土 顺序稳定降序后的首位
// 最弱: 同一排序的末位（并列时取顺序靠后者）
// ==========================================

use crate::domain::chart::Chart;
use crate::domain::energy::{ElementScoreMap, WuxingSummary};
use crate::domain::types::Element;

pub fn count_elements(chart: &Chart) -> ElementScoreMap {
    ElementScoreMap::from_elements(chart.position_elements())
}

/// 金木水火土 顺序下按计数稳定降序
pub fn ranked_elements(scores: &ElementScoreMap) -> Vec<(Element, u8)> {
    let mut ranked: Vec<(Element, u8)> = Element::REPORT_ORDER
        .iter()
        .map(|e| (*e, scores.count(*e)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

pub fn summarize(scores: ElementScoreMap) -> WuxingSummary {
    let ranked = ranked_elements(&scores);
    let strongest = ranked.first().map(|(e, _)| *e).unwrap_or(Element::Metal);
    let weakest = ranked.last().map(|(e, _)| *e).unwrap_or(Element::Earth);
    let missing = scores.missing();
    WuxingSummary {
        scores,
        strongest,
        weakest,
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Element::*;

    #[test]
    fn test_missing_and_extremes() {
        // 木3 火2 土2 金1 水0
        let scores =
            ElementScoreMap::from_elements([Wood, Wood, Wood, Fire, Fire, Earth, Earth, Metal]);
        let summary = summarize(scores);
        assert_eq!(summary.missing, vec![Water]);
        assert_eq!(summary.strongest, Wood);
        assert_eq!(summary.weakest, Water);
        assert_eq!(summary.scores.total(), 8);
    }

    #[test]
    fn test_tie_break_order() {
        // 金2 木2 水2 火1 土1: 最旺取 金，最弱取 土
        let scores =
            ElementScoreMap::from_elements([Metal, Metal, Wood, Wood, Water, Water, Fire, Earth]);
        let summary = summarize(scores);
        assert_eq!(summary.strongest, Metal);
        assert_eq!(summary.weakest, Earth);
        assert!(summary.missing.is_empty());
    }

    #[test]
    fn test_multiple_missing_follow_report_order() {
        let scores = ElementScoreMap::from_elements([Fire, Fire, Fire, Fire, Earth, Earth, Earth, Earth]);
        let summary = summarize(scores);
        assert_eq!(summary.missing, vec![Metal, Wood, Water]);
        assert_eq!(summary.strongest, Fire);
        assert_eq!(summary.weakest, Water);
    }
}
