// ==========================================
// 八字排盘引擎 - 引擎编排器
// ==========================================
// 主流程:
//   输入解析 → 历法适配 → 排柱 → 五行统计 → 身强弱
//   → 大运 → 流年 → 人生能量 → 文字解读 → 组装报告
// 只有历法步骤可能失败；失败即整体失败，不产出报告
// 随机源由调用方注入，同一种子得到完全一致的报告
// ==========================================

use crate::calendar::{CalendarAdapter, CalendarProvider, CalendarRequest, ChineseCalendar};
use crate::config::EngineConfig;
use crate::domain::input::UserInput;
use crate::domain::report::Report;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::luck_cycle::LuckCycleGenerator;
use crate::engine::narrative::{DefaultNarrative, NarrativeContext, NarrativeRenderer};
use crate::engine::pillar_builder::PillarBuilder;
use crate::engine::report_assembler::ReportAssembler;
use crate::engine::scoring;
use crate::engine::strength;
use crate::engine::wuxing;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, instrument};

// ==========================================
// BaziEngine - 引擎编排器
// ==========================================
pub struct BaziEngine<P: CalendarProvider> {
    adapter: CalendarAdapter<P>,
    luck: LuckCycleGenerator,
    narrative: Box<dyn NarrativeRenderer>,
}

impl Default for BaziEngine<ChineseCalendar> {
    fn default() -> Self {
        Self::new(ChineseCalendar::new(), &EngineConfig::default())
    }
}

impl<P: CalendarProvider> BaziEngine<P> {
    /// 创建引擎实例
    ///
    /// # 参数
    /// - provider: 历法服务
    /// - config: 引擎配置（经线、大运步数、流年跨度）
    pub fn new(provider: P, config: &EngineConfig) -> Self {
        Self {
            adapter: CalendarAdapter::with_meridian(provider, config.standard_meridian),
            luck: LuckCycleGenerator::new(config.max_luck_pillars, config.yearly_span_years),
            narrative: Box::new(DefaultNarrative),
        }
    }

    /// 替换文字解读实现
    pub fn with_narrative(mut self, narrative: Box<dyn NarrativeRenderer>) -> Self {
        self.narrative = narrative;
        self
    }

    pub fn adapter(&self) -> &CalendarAdapter<P> {
        &self.adapter
    }

    /// 执行一次完整排盘
    ///
    /// # 错误
    /// - InvalidDate / MalformedInput: 输入日期或时间无效
    /// - InconsistentLuckCycles: 历法服务返回的大运顺序异常
    #[instrument(skip_all, fields(name = %input.name, birth_date = %input.birth_date, is_lunar = input.is_lunar))]
    pub fn calculate<R: Rng + ?Sized>(&self, input: &UserInput, rng: &mut R) -> EngineResult<Report> {
        // ==========================================
        // 步骤1: 历法适配
        // ==========================================
        let request = CalendarRequest::from_input(input)?;
        let moment = self.adapter.resolve(&request).map_err(|e| {
            EngineError::for_input_date(
                e,
                request.calendar_system(),
                request.year,
                request.month,
                request.day,
            )
        })?;

        // ==========================================
        // 步骤2: 排柱 / 五行 / 身强弱
        // ==========================================
        let chart = PillarBuilder::build_chart(
            &moment.eight_char,
            input.gender,
            moment.solar_label.clone(),
            moment.lunar_label.clone(),
        );
        let me = chart.day_master_element;
        let summary = wuxing::summarize(wuxing::count_elements(&chart));
        let strong = strength::is_strong(me, chart.month.branch);
        debug!(
            day_master = %chart.day_master,
            strongest = %summary.strongest,
            weakest = %summary.weakest,
            missing = summary.missing.len(),
            strong,
            "命盘统计完成"
        );

        // ==========================================
        // 步骤3: 大运 / 流年
        // ==========================================
        let raw_cycles = self.adapter.decennial_cycles(&moment, input.gender)?;
        let luck_pillars = self.luck.build_luck_pillars(&raw_cycles, me, strong, rng)?;
        // 流年虚岁按输入的出生年份计（农历输入即农历年）
        let yearly_luck = self.luck.build_yearly_series(
            &luck_pillars,
            request.year,
            me,
            strong,
            self.adapter.provider(),
            rng,
        )?;

        // ==========================================
        // 步骤4: 人生能量
        // ==========================================
        let (scores, sub_scores) = scoring::energy_scores(me, &summary.scores, strong, rng);
        let life_energy =
            ReportAssembler::life_energy(scores, sub_scores, &chart, &summary, strong);

        // ==========================================
        // 步骤5: 文字解读 + 组装
        // ==========================================
        let analysis = self.narrative.render(&NarrativeContext {
            chart: &chart,
            wuxing: &summary,
            strong,
            luck_pillars: &luck_pillars,
        });

        info!(
            eight_char = %moment.eight_char,
            luck_pillars = luck_pillars.len(),
            yearly_points = yearly_luck.len(),
            total_score = life_energy.total_score,
            "排盘完成"
        );

        Ok(ReportAssembler::assemble(
            chart,
            summary,
            strong,
            luck_pillars,
            yearly_luck,
            life_energy,
            analysis,
        ))
    }

    /// 以固定种子排盘（ChaCha8），同一输入与种子结果一致
    pub fn calculate_seeded(&self, input: &UserInput, seed: u64) -> EngineResult<Report> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.calculate(input, &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Gender;

    fn engine() -> BaziEngine<ChineseCalendar> {
        BaziEngine::default()
    }

    fn input(date: &str, time: &str) -> UserInput {
        UserInput {
            name: "测试".to_string(),
            gender: Gender::Male,
            birth_date: date.to_string(),
            birth_time: time.to_string(),
            is_lunar: false,
            use_solar_time: false,
            birth_location: None,
        }
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let engine = engine();
        let a = engine.calculate_seeded(&input("2024-02-10", "12:00"), 7).unwrap();
        let b = engine.calculate_seeded(&input("2024-02-10", "12:00"), 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_config_limits_are_respected() {
        let config = EngineConfig {
            max_luck_pillars: 5,
            yearly_span_years: 30,
            ..Default::default()
        };
        let engine = BaziEngine::new(ChineseCalendar::new(), &config);
        let report = engine.calculate_seeded(&input("1990-06-15", "08:30"), 1).unwrap();
        assert_eq!(report.luck_pillars.len(), 5);
        assert_eq!(report.yearly_luck.len(), 30);
    }

    #[test]
    fn test_malformed_time_is_invalid_date_class() {
        let engine = engine();
        let err = engine.calculate_seeded(&input("2024-02-10", "25:00"), 1).unwrap_err();
        assert!(err.is_invalid_date());
    }

    #[test]
    fn test_out_of_range_year_is_invalid_date() {
        let engine = engine();
        let err = engine.calculate_seeded(&input("1850-02-10", "12:00"), 1).unwrap_err();
        assert!(err.is_invalid_date(), "{:?}", err);
    }
}
