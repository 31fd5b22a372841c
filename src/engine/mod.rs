// ==========================================
// 八字排盘引擎 - 引擎层
// ==========================================
// 职责: 由历法结果推导命盘、五行、大运流年、能量评分与解读
// 红线: 引擎不做 I/O，不访问历史记录；随机源一律由调用方注入
// ==========================================

pub mod classifier;
pub mod error;
pub mod luck_cycle;
pub mod narrative;
pub mod orchestrator;
pub mod pillar_builder;
pub mod report_assembler;
pub mod scoring;
pub mod strength;
pub mod ten_gods;
pub mod wuxing;

// 重导出核心引擎
pub use classifier::ElementRelation;
pub use error::{EngineError, EngineResult};
pub use luck_cycle::LuckCycleGenerator;
pub use narrative::{DefaultNarrative, NarrativeContext, NarrativeRenderer};
pub use orchestrator::BaziEngine;
pub use pillar_builder::PillarBuilder;
pub use report_assembler::ReportAssembler;
