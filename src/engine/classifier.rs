// ==========================================
// 八字排盘引擎 - 五行分类表
// ==========================================
// 纯查表，无状态:
//   天干 → 五行 / 阴阳
//   地支 → 五行 / 藏干
//   五行相生、相克环
// ==========================================

use crate::domain::types::{Branch, Element, Stem};

// 地支五行（子丑寅卯辰巳午未申酉戌亥）
const BRANCH_ELEMENTS: [Element; 12] = [
    Element::Water,
    Element::Earth,
    Element::Wood,
    Element::Wood,
    Element::Earth,
    Element::Fire,
    Element::Fire,
    Element::Earth,
    Element::Metal,
    Element::Metal,
    Element::Earth,
    Element::Water,
];

// 地支藏干，本气在前
const HIDDEN_STEMS: [&[Stem]; 12] = [
    &[Stem::Gui],                      // 子
    &[Stem::Ji, Stem::Gui, Stem::Xin], // 丑
    &[Stem::Jia, Stem::Bing, Stem::Wu], // 寅
    &[Stem::Yi],                       // 卯
    &[Stem::Wu, Stem::Yi, Stem::Gui],  // 辰
    &[Stem::Bing, Stem::Wu, Stem::Geng], // 巳
    &[Stem::Ding, Stem::Ji],           // 午
    &[Stem::Ji, Stem::Ding, Stem::Yi], // 未
    &[Stem::Geng, Stem::Ren, Stem::Wu], // 申
    &[Stem::Xin],                      // 酉
    &[Stem::Wu, Stem::Xin, Stem::Ding], // 戌
    &[Stem::Ren, Stem::Jia],           // 亥
];

impl Stem {
    /// 甲乙木、丙丁火、戊己土、庚辛金、壬癸水
    pub fn element(self) -> Element {
        Element::ALL[self.index() / 2]
    }

    /// 阳干: 甲丙戊庚壬
    pub fn is_yang(self) -> bool {
        self.index() % 2 == 0
    }
}

impl Branch {
    pub fn element(self) -> Element {
        BRANCH_ELEMENTS[self.index()]
    }

    pub fn hidden_stems(self) -> &'static [Stem] {
        HIDDEN_STEMS[self.index()]
    }
}

impl Element {
    /// 我生者: 木→火→土→金→水→木
    pub fn generates(self) -> Element {
        Element::ALL[(self.index() + 1) % 5]
    }

    /// 我克者: 木→土→水→火→金→木
    pub fn controls(self) -> Element {
        Element::ALL[(self.index() + 2) % 5]
    }

    /// 生我者
    pub fn generated_by(self) -> Element {
        Element::ALL[(self.index() + 4) % 5]
    }

    /// 克我者
    pub fn controlled_by(self) -> Element {
        Element::ALL[(self.index() + 3) % 5]
    }
}

// ==========================================
// ElementRelation - 目标五行相对日主五行的关系
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRelation {
    Same,       // 同我（比劫）
    Output,     // 我生（食伤）
    Wealth,     // 我克（财）
    Authority,  // 克我（官杀）
    Resource,   // 生我（印）
}

impl ElementRelation {
    /// 五种关系互斥且穷尽
    pub fn between(me: Element, target: Element) -> Self {
        if target == me {
            ElementRelation::Same
        } else if me.generates() == target {
            ElementRelation::Output
        } else if target.generates() == me {
            ElementRelation::Resource
        } else if me.controls() == target {
            ElementRelation::Wealth
        } else {
            ElementRelation::Authority
        }
    }

    /// 关系对应的五行
    pub fn element_for(self, me: Element) -> Element {
        match self {
            ElementRelation::Same => me,
            ElementRelation::Output => me.generates(),
            ElementRelation::Wealth => me.controls(),
            ElementRelation::Authority => me.controlled_by(),
            ElementRelation::Resource => me.generated_by(),
        }
    }
}
