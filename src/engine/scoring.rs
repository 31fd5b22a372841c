// ==========================================
// 八字排盘引擎 - 人生能量评分
// ==========================================
// 以日主五行为"我":
//   食伤 = 我生，财 = 我克，官杀 = 克我，印 = 生我
// 基础分 base(x) = min(95, 60 + 8x + 噪声[0,5))，取整向下
// 健康 = 90 - 5×缺失五行数 - 5×过旺(≥4)五行数，组装时截断
// ==========================================

use crate::domain::energy::{ElementScoreMap, EnergyScores, EnergySubScores};
use crate::domain::types::Element;
use crate::engine::classifier::ElementRelation;
use crate::i18n::{t, t_with_args};
use rand::Rng;

const ENERGY_BASE: f64 = 60.0;
const ENERGY_STEP: f64 = 8.0;
const ENERGY_CAP: f64 = 95.0;
/// 噪声上限（不含）
pub const ENERGY_NOISE_MAX: f64 = 5.0;

const HEALTH_BASE: i32 = 90;
const HEALTH_PENALTY: i32 = 5;
const EXCESSIVE_COUNT: u8 = 4;

const UPPER_TIER_ABOVE: i32 = 80;
const MIDDLE_TIER_ABOVE: i32 = 65;

/// 六次基础分各自的噪声，按抽取顺序排列
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyNoise {
    pub career: f64,
    pub wealth: f64,
    pub wisdom: f64,
    pub emotion: f64,
    pub nobleman: f64,
    pub peach_blossom: f64,
}

impl EnergyNoise {
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut next = || rng.gen_range(0.0..ENERGY_NOISE_MAX);
        Self {
            career: next(),
            wealth: next(),
            wisdom: next(),
            emotion: next(),
            nobleman: next(),
            peach_blossom: next(),
        }
    }
}

/// base(x) 取整前
pub fn base_with_noise(x: f64, noise: f64) -> f64 {
    (ENERGY_BASE + ENERGY_STEP * x + noise).min(ENERGY_CAP)
}

fn floor_score(v: f64) -> i32 {
    v.floor() as i32
}

/// 十神类别对应的五行计数
struct GodCounts {
    output: f64,
    wealth: f64,
    officer: f64,
    resource: f64,
}

impl GodCounts {
    fn new(me: Element, scores: &ElementScoreMap) -> Self {
        let count = |rel: ElementRelation| f64::from(scores.count(rel.element_for(me)));
        Self {
            output: count(ElementRelation::Output),
            wealth: count(ElementRelation::Wealth),
            officer: count(ElementRelation::Authority),
            resource: count(ElementRelation::Resource),
        }
    }
}

/// 健康分（未截断）
pub fn raw_health(scores: &ElementScoreMap) -> i32 {
    let missing = scores.missing().len() as i32;
    let excessive = scores.count_at_least(EXCESSIVE_COUNT) as i32;
    HEALTH_BASE - HEALTH_PENALTY * missing - HEALTH_PENALTY * excessive
}

/// 五维分与四项子分（给定噪声），健康分未截断
pub fn energy_scores_with_noise(
    me: Element,
    scores: &ElementScoreMap,
    strong: bool,
    noise: &EnergyNoise,
) -> (EnergyScores, EnergySubScores) {
    let c = GodCounts::new(me, scores);

    let career = base_with_noise(c.officer * 1.5 + c.output * 0.5, noise.career);
    let wealth = base_with_noise(c.wealth * 1.5 + c.output * 0.5, noise.wealth);
    let wisdom = base_with_noise(c.resource * 1.5 + c.output * 0.5, noise.wisdom);
    let spouse_star = c.wealth + c.officer;
    let leaning = if strong { c.wealth } else { c.officer };
    let emotion = base_with_noise(spouse_star * 0.8 + leaning * 0.5, noise.emotion);

    let officer_bonus = if c.officer > 0.0 { 2.0 } else { 0.0 };
    let nobleman = base_with_noise(c.resource * 1.2 + officer_bonus, noise.nobleman);
    let peach_blossom = base_with_noise(c.wealth + c.output, noise.peach_blossom);

    let scores = EnergyScores {
        career: floor_score(career),
        wealth: floor_score(wealth),
        emotion: floor_score(emotion),
        health: raw_health(scores),
        wisdom: floor_score(wisdom),
    };
    let sub_scores = EnergySubScores {
        nobleman: floor_score(nobleman),
        peach_blossom: floor_score(peach_blossom),
        career: scores.career,
        wealth: scores.wealth,
    };
    (scores, sub_scores)
}

pub fn energy_scores<R: Rng + ?Sized>(
    me: Element,
    scores: &ElementScoreMap,
    strong: bool,
    rng: &mut R,
) -> (EnergyScores, EnergySubScores) {
    let noise = EnergyNoise::draw(rng);
    energy_scores_with_noise(me, scores, strong, &noise)
}

/// 五维均分，向下取整
pub fn total_score(scores: &EnergyScores) -> i32 {
    scores.as_array().iter().sum::<i32>().div_euclid(5)
}

// ==========================================
// 描述文案参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyTier {
    Upper,
    Middle,
    Potential,
}

impl EnergyTier {
    pub fn from_total(total: i32) -> Self {
        if total > UPPER_TIER_ABOVE {
            EnergyTier::Upper
        } else if total > MIDDLE_TIER_ABOVE {
            EnergyTier::Middle
        } else {
            EnergyTier::Potential
        }
    }

    fn key(self) -> &'static str {
        match self {
            EnergyTier::Upper => "energy.tier.upper",
            EnergyTier::Middle => "energy.tier.middle",
            EnergyTier::Potential => "energy.tier.potential",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptionParams {
    pub total: i32,
    pub tier: EnergyTier,
    pub element: Element,
    pub strong: bool,
    pub balanced: bool,
    pub career_focus: bool,
}

impl DescriptionParams {
    pub fn new(total: i32, element: Element, strong: bool, scores: &EnergyScores, any_missing: bool) -> Self {
        Self {
            total,
            tier: EnergyTier::from_total(total),
            element,
            strong,
            balanced: !any_missing,
            career_focus: scores.career > scores.wealth,
        }
    }

    /// 按当前语言渲染
    pub fn render(&self) -> String {
        let temper = t(if self.strong {
            "energy.temper.strong"
        } else {
            "energy.temper.weak"
        });
        let balance = t(if self.balanced {
            "energy.balance.balanced"
        } else {
            "energy.balance.skewed"
        });
        let focus = t(if self.career_focus {
            "energy.focus.career"
        } else {
            "energy.focus.wealth"
        });
        let tier = t(self.tier.key());
        let total = self.total.to_string();
        let element = self.element.to_string();
        t_with_args(
            "energy.description",
            &[
                ("total", total.as_str()),
                ("tier", tier.as_str()),
                ("element", element.as_str()),
                ("temper", temper.as_str()),
                ("balance", balance.as_str()),
                ("focus", focus.as_str()),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use Element::*;

    fn sample_scores() -> ElementScoreMap {
        // 甲辰 丙寅 甲辰 庚午: 木3 土2 火2 金1 水0
        ElementScoreMap::from_elements([Wood, Earth, Fire, Wood, Wood, Earth, Metal, Fire])
    }

    #[test]
    fn test_base_formula() {
        assert_eq!(base_with_noise(0.0, 0.0), 60.0);
        assert_eq!(base_with_noise(2.0, 4.5), 80.5);
        assert_eq!(base_with_noise(10.0, 0.0), 95.0);
    }

    #[test]
    fn test_scores_for_wood_day_master_without_noise() {
        // 木日主: 食伤=火2 财=土2 官杀=金1 印=水0
        let (scores, subs) =
            energy_scores_with_noise(Wood, &sample_scores(), true, &EnergyNoise::default());
        assert_eq!(scores.career, 80); // 60 + 8×(1.5 + 1.0)
        assert_eq!(scores.wealth, 92); // 60 + 8×(3.0 + 1.0)
        assert_eq!(scores.wisdom, 68); // 60 + 8×1.0
        assert_eq!(scores.emotion, 87); // 60 + 8×(2.4 + 1.0) = 87.2
        assert_eq!(scores.health, 85); // 缺水
        assert_eq!(subs.nobleman, 76); // 60 + 8×2
        assert_eq!(subs.peach_blossom, 92); // 60 + 8×4
        assert_eq!(subs.career, scores.career);
        assert_eq!(subs.wealth, scores.wealth);
    }

    #[test]
    fn test_emotion_leans_on_officer_when_weak() {
        let (weak, _) =
            energy_scores_with_noise(Wood, &sample_scores(), false, &EnergyNoise::default());
        assert_eq!(weak.emotion, 83); // 60 + 8×(2.4 + 0.5) = 83.2
    }

    #[test]
    fn test_health_penalties() {
        let lopsided = ElementScoreMap::from_elements([Fire; 8]);
        // 缺 4 行、过旺 1 行
        assert_eq!(raw_health(&lopsided), 65);
        let balanced = ElementScoreMap::from_elements([Wood, Fire, Earth, Metal, Water, Wood, Fire, Earth]);
        assert_eq!(raw_health(&balanced), 90);
    }

    #[test]
    fn test_scores_capped_with_noise() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for me in Element::ALL {
            for strong in [true, false] {
                let (scores, subs) = energy_scores(me, &sample_scores(), strong, &mut rng);
                for v in [scores.career, scores.wealth, scores.emotion, scores.wisdom] {
                    assert!((60..=95).contains(&v));
                }
                assert!((60..=95).contains(&subs.nobleman));
                assert!((60..=95).contains(&subs.peach_blossom));
            }
        }
    }

    #[test]
    fn test_total_is_floored_mean() {
        let scores = EnergyScores {
            career: 72,
            wealth: 92,
            emotion: 87,
            health: 85,
            wisdom: 68,
        };
        // 404 / 5 = 80.8
        assert_eq!(total_score(&scores), 80);
    }

    #[test]
    fn test_description_parameters() {
        assert_eq!(EnergyTier::from_total(81), EnergyTier::Upper);
        assert_eq!(EnergyTier::from_total(80), EnergyTier::Middle);
        assert_eq!(EnergyTier::from_total(66), EnergyTier::Middle);
        assert_eq!(EnergyTier::from_total(65), EnergyTier::Potential);

        let scores = EnergyScores {
            career: 72,
            wealth: 92,
            emotion: 87,
            health: 85,
            wisdom: 68,
        };
        let params = DescriptionParams::new(80, Wood, true, &scores, true);
        assert_eq!(params.tier, EnergyTier::Middle);
        assert!(!params.balanced);
        assert!(!params.career_focus);
    }
}
