// ==========================================
// 八字排盘引擎 - 大运 / 流年
// ==========================================
// 大运: 过滤占位项 → 校验顺序 → 取前 N 步 → 评分
// 流年: 自首步大运起逐年生成，分数 = 0.6×大运 + 0.4×流年
//       + 5×sin(0.5×年) + 噪声[-3,3)，截断到 [10,95]
// 随机扰动仅作展示纹理；每个含噪公式都有传入噪声值的纯函数版本
// ==========================================

use crate::calendar::CalendarProvider;
use crate::domain::ganzhi::StemBranch;
use crate::domain::luck::{LuckPillar, RawLuckCycle, YearlyLuckPoint};
use crate::domain::types::Element;
use crate::engine::classifier::ElementRelation;
use crate::engine::error::{EngineError, EngineResult};
use rand::Rng;
use tracing::{debug, warn};

pub const LUCK_BASE_SCORE: i32 = 60;
pub const STEM_WEIGHT: i32 = 10;
pub const BRANCH_WEIGHT: i32 = 15;
/// 大运评分噪声上限（含）
pub const LUCK_NOISE_MAX: i32 = 5;

pub const YEARLY_SCORE_MIN: f64 = 10.0;
pub const YEARLY_SCORE_MAX: f64 = 95.0;
const PILLAR_BLEND_WEIGHT: f64 = 0.6;
const YEAR_BLEND_WEIGHT: f64 = 0.4;
const OSCILLATION_AMPLITUDE: f64 = 5.0;
const OSCILLATION_FREQUENCY: f64 = 0.5;
/// 流年噪声半宽: [-3, 3)
pub const YEARLY_NOISE_SPAN: f64 = 3.0;

pub const DEFAULT_MAX_LUCK_PILLARS: usize = 8;
pub const DEFAULT_YEARLY_SPAN: i32 = 80;

// ==========================================
// 评分函数
// ==========================================

/// 目标五行对日主的喜忌: +1 喜, -1 忌
///
/// 身强喜泄、耗、克；身弱喜生、扶。
pub fn relation_score(target: Element, day_master: Element, strong: bool) -> i32 {
    let favourable = match ElementRelation::between(day_master, target) {
        ElementRelation::Same | ElementRelation::Resource => !strong,
        ElementRelation::Output | ElementRelation::Wealth | ElementRelation::Authority => strong,
    };
    if favourable {
        1
    } else {
        -1
    }
}

/// 大运评分（给定噪声）
pub fn luck_score_with_noise(
    stem_element: Element,
    branch_element: Element,
    day_master: Element,
    strong: bool,
    noise: i32,
) -> i32 {
    let score = LUCK_BASE_SCORE
        + relation_score(stem_element, day_master, strong) * STEM_WEIGHT
        + relation_score(branch_element, day_master, strong) * BRANCH_WEIGHT
        + noise;
    score.clamp(0, 100)
}

/// 大运评分（噪声取自随机源，整数 0..=5）
pub fn luck_score<R: Rng + ?Sized>(
    stem_element: Element,
    branch_element: Element,
    day_master: Element,
    strong: bool,
    rng: &mut R,
) -> i32 {
    let noise = rng.gen_range(0..=LUCK_NOISE_MAX);
    luck_score_with_noise(stem_element, branch_element, day_master, strong, noise)
}

/// 流年混合分（给定噪声）
pub fn blend_yearly_score(pillar_score: i32, yearly_raw: i32, year: i32, noise: f64) -> i32 {
    let blended = f64::from(pillar_score) * PILLAR_BLEND_WEIGHT
        + f64::from(yearly_raw) * YEAR_BLEND_WEIGHT;
    let oscillation = (f64::from(year) * OSCILLATION_FREQUENCY).sin() * OSCILLATION_AMPLITUDE;
    (blended + oscillation + noise)
        .clamp(YEARLY_SCORE_MIN, YEARLY_SCORE_MAX)
        .round() as i32
}

pub fn yearly_noise<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(-YEARLY_NOISE_SPAN..YEARLY_NOISE_SPAN)
}

/// 虚岁，下限 0
pub fn nominal_age(year: i32, birth_year: i32) -> i32 {
    (year - birth_year + 1).max(0)
}

// ==========================================
// LuckCycleGenerator
// ==========================================
pub struct LuckCycleGenerator {
    max_pillars: usize,
    span_years: i32,
}

impl Default for LuckCycleGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LUCK_PILLARS, DEFAULT_YEARLY_SPAN)
    }
}

impl LuckCycleGenerator {
    pub fn new(max_pillars: usize, span_years: i32) -> Self {
        Self {
            max_pillars,
            span_years,
        }
    }

    /// 过滤占位项并校验: 干支可解析，起运年与岁数严格递增
    pub fn validate_cycles(&self, raw: &[RawLuckCycle]) -> EngineResult<Vec<(StemBranch, i32, i32)>> {
        let placeholders = raw.iter().filter(|c| c.is_placeholder()).count();
        if placeholders > 0 {
            debug!(placeholders, "丢弃起运前占位大运");
        }

        let mut out: Vec<(StemBranch, i32, i32)> = Vec::with_capacity(self.max_pillars);
        for cycle in raw.iter().filter(|c| !c.is_placeholder()).take(self.max_pillars) {
            let pair = cycle
                .gan_zhi
                .parse::<StemBranch>()
                .ok()
                .filter(|p| p.cycle_index().is_some())
                .ok_or_else(|| {
                    warn!(gan_zhi = %cycle.gan_zhi, "大运干支无法识别");
                    EngineError::InconsistentLuckCycles(format!(
                        "无法识别的大运干支 '{}'",
                        cycle.gan_zhi
                    ))
                })?;

            if cycle.start_age < 0 {
                warn!(start_age = cycle.start_age, "大运起运岁数为负");
                return Err(EngineError::InconsistentLuckCycles(format!(
                    "大运 {} 起运岁数为负: {}",
                    pair, cycle.start_age
                )));
            }

            if let Some((prev, prev_age, prev_year)) = out.last() {
                if cycle.start_year <= *prev_year || cycle.start_age <= *prev_age {
                    warn!(
                        prev = %prev,
                        prev_year,
                        next = %pair,
                        next_year = cycle.start_year,
                        "大运未按起运年递增"
                    );
                    return Err(EngineError::InconsistentLuckCycles(format!(
                        "大运 {}({}年/{}岁) 不晚于 {}({}年/{}岁)",
                        pair, cycle.start_year, cycle.start_age, prev, prev_year, prev_age
                    )));
                }
            }
            out.push((pair, cycle.start_age, cycle.start_year));
        }
        Ok(out)
    }

    /// 大运列表（按起运年升序，至多 max_pillars 步）
    pub fn build_luck_pillars<R: Rng + ?Sized>(
        &self,
        raw: &[RawLuckCycle],
        day_master: Element,
        strong: bool,
        rng: &mut R,
    ) -> EngineResult<Vec<LuckPillar>> {
        let cycles = self.validate_cycles(raw)?;
        Ok(cycles
            .into_iter()
            .map(|(pair, start_age, start_year)| {
                let stem_element = pair.stem.element();
                let branch_element = pair.branch.element();
                LuckPillar {
                    stem: pair.stem,
                    branch: pair.branch,
                    start_age,
                    start_year,
                    stem_element,
                    branch_element,
                    score: luck_score(stem_element, branch_element, day_master, strong, rng),
                }
            })
            .collect())
    }

    /// 流年序列: [首步大运起运年, +span)
    pub fn build_yearly_series<P, R>(
        &self,
        pillars: &[LuckPillar],
        birth_year: i32,
        day_master: Element,
        strong: bool,
        calendar: &P,
        rng: &mut R,
    ) -> EngineResult<Vec<YearlyLuckPoint>>
    where
        P: CalendarProvider + ?Sized,
        R: Rng + ?Sized,
    {
        let Some(first) = pillars.first() else {
            return Ok(Vec::new());
        };

        let start = first.start_year;
        let mut series = Vec::with_capacity(self.span_years.max(0) as usize);
        for year in start..start + self.span_years {
            let enclosing = enclosing_pillar(pillars, year).unwrap_or(first);
            let pair = calendar.year_pillar(year)?;
            let raw = luck_score(
                pair.stem.element(),
                pair.branch.element(),
                day_master,
                strong,
                rng,
            );
            let score = blend_yearly_score(enclosing.score, raw, year, yearly_noise(rng));
            series.push(YearlyLuckPoint {
                year,
                age: nominal_age(year, birth_year),
                stem: pair.stem,
                branch: pair.branch,
                score,
                luck_pillar: enclosing.label(),
            });
        }
        Ok(series)
    }
}

/// 起运年不晚于 year 的最后一步大运
pub fn enclosing_pillar(pillars: &[LuckPillar], year: i32) -> Option<&LuckPillar> {
    pillars.iter().rev().find(|p| p.start_year <= year)
}
