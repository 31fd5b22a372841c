// ==========================================
// 八字排盘引擎 - 领域模型层
// ==========================================
// 纯值类型，不含计算逻辑与 I/O
// ==========================================

pub mod chart;
pub mod energy;
pub mod ganzhi;
pub mod history;
pub mod input;
pub mod luck;
pub mod report;
pub mod types;

// 重导出核心类型
pub use chart::{Chart, Pillar};
pub use energy::{
    ElementScoreMap, EnergyScores, EnergySubScores, LifeEnergyReport, WuxingSummary,
    CHART_POSITIONS,
};
pub use ganzhi::{StemBranch, SEXAGENARY_CYCLE};
pub use history::{HistoryRecord, HistorySummary};
pub use input::{BirthLocation, UserInput};
pub use luck::{LuckPillar, RawLuckCycle, YearlyLuckPoint};
pub use report::{AnalysisSections, Report};
pub use types::{Branch, CalendarSystem, Element, Gender, PillarRelation, Stem, TenGod};
