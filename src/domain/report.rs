// ==========================================
// 八字排盘引擎 - 报告（根聚合）
// ==========================================
// 每次计算生成一份完整报告，不做局部修改
// ==========================================

use crate::domain::chart::Chart;
use crate::domain::energy::{LifeEnergyReport, WuxingSummary};
use crate::domain::luck::{LuckPillar, YearlyLuckPoint};
use serde::{Deserialize, Serialize};

// ==========================================
// AnalysisSections - 文字解读
// ==========================================
// 每个段落为若干行文本，由 NarrativeRenderer 生成
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisSections {
    pub personality: Vec<String>,  // 性格
    pub career: Vec<String>,       // 事业财运
    pub love: Vec<String>,         // 感情家庭
    pub health: Vec<String>,       // 健康
    pub advice: Vec<String>,       // 开运建议
    pub life_message: Vec<String>, // 人生寄语
}

impl AnalysisSections {
    /// (标题, 内容) 顺序列表
    pub fn sections(&self) -> [(&'static str, &[String]); 6] {
        [
            ("性格分析", self.personality.as_slice()),
            ("事业财运", self.career.as_slice()),
            ("感情家庭", self.love.as_slice()),
            ("健康提示", self.health.as_slice()),
            ("开运建议", self.advice.as_slice()),
            ("人生寄语", self.life_message.as_slice()),
        ]
    }

    pub fn is_complete(&self) -> bool {
        self.sections().iter().all(|(_, lines)| !lines.is_empty())
    }
}

// ==========================================
// Report
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub chart: Chart,
    pub wuxing: WuxingSummary,
    pub day_master_strong: bool, // 身强/身弱
    pub luck_pillars: Vec<LuckPillar>,
    pub yearly_luck: Vec<YearlyLuckPoint>,
    pub life_energy: LifeEnergyReport,
    pub analysis: AnalysisSections,
}
