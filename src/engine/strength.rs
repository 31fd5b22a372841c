// ==========================================
// 八字排盘引擎 - 身强身弱
// ==========================================
// 单因素判定: 只看月令（月支五行）
//   月支与日主同五行（得令）或月支生日主 → 身强
//   其余 → 身弱
// 注: 不含天干透出、通根、得地等多因素分析
// ==========================================

use crate::domain::types::{Branch, Element};

pub fn is_strong(day_master: Element, month_branch: Branch) -> bool {
    is_strong_by_element(day_master, month_branch.element())
}

pub fn is_strong_by_element(day_master: Element, month_element: Element) -> bool {
    month_element == day_master || month_element.generates() == day_master
}
