// ==========================================
// 八字排盘引擎 - 核心库
// ==========================================
// 四柱排盘、五行统计、大运流年与人生能量评分
// 技术栈: Rust + SQLite（历史记录 / 配置）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 值类型
pub mod domain;

// 历法层 - 公农历、节气、八字、起运
pub mod calendar;

// 引擎层 - 排盘与评分规则
pub mod engine;

// 配置层 - 引擎参数
pub mod config;

// 数据仓储层 - 排盘历史
pub mod repository;

// 数据库基础设施（连接初始化/建表）
pub mod db;

// API 层 - 展示层入口
pub mod api;

// 数据导出
pub mod export;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    BirthLocation, Branch, Chart, Element, Gender, LuckPillar, Report, Stem, TenGod, UserInput,
    YearlyLuckPoint,
};

pub use calendar::{CalendarProvider, ChineseCalendar};

pub use engine::{BaziEngine, EngineError, EngineResult};

pub use api::{BaziApi, CalculateOptions};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "八字排盘引擎";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
