// ==========================================
// 八字排盘引擎 - 报告组装
// ==========================================
// 健康分在此截断到 [0,100]，总分按截断后的五维重算
// 报告整体生成，不存在半成品
// ==========================================

use crate::domain::chart::Chart;
use crate::domain::energy::{EnergyScores, EnergySubScores, LifeEnergyReport, WuxingSummary};
use crate::domain::luck::{LuckPillar, YearlyLuckPoint};
use crate::domain::report::{AnalysisSections, Report};
use crate::engine::scoring::{total_score, DescriptionParams};

const SCORE_MIN: i32 = 0;
const SCORE_MAX: i32 = 100;

pub struct ReportAssembler;

impl ReportAssembler {
    /// 人生能量: 截断健康分、计算总分、渲染描述
    pub fn life_energy(
        scores: EnergyScores,
        sub_scores: EnergySubScores,
        chart: &Chart,
        wuxing: &WuxingSummary,
        strong: bool,
    ) -> LifeEnergyReport {
        let scores = EnergyScores {
            health: scores.health.clamp(SCORE_MIN, SCORE_MAX),
            ..scores
        };
        let total = total_score(&scores);
        let description = DescriptionParams::new(
            total,
            chart.day_master_element,
            strong,
            &scores,
            !wuxing.missing.is_empty(),
        )
        .render();

        LifeEnergyReport {
            scores,
            total_score: total,
            description,
            sub_scores,
        }
    }

    pub fn assemble(
        chart: Chart,
        wuxing: WuxingSummary,
        day_master_strong: bool,
        luck_pillars: Vec<LuckPillar>,
        yearly_luck: Vec<YearlyLuckPoint>,
        life_energy: LifeEnergyReport,
        analysis: AnalysisSections,
    ) -> Report {
        Report {
            chart,
            wuxing,
            day_master_strong,
            luck_pillars,
            yearly_luck,
            life_energy,
            analysis,
        }
    }
}
