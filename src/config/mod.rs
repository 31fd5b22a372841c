// ==========================================
// 八字排盘引擎 - 配置层
// ==========================================
// 职责: 引擎可调参数与其持久化
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod engine_config;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use engine_config::{ConfigError, EngineConfig};
