// ==========================================
// 八字排盘引擎 - 引擎配置
// ==========================================
// 可调项: 标准时区经线、大运步数、流年跨度、历史保留条数
// 评分公式常量不在此列
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_STANDARD_MERIDIAN: f64 = 120.0;
pub const DEFAULT_MAX_LUCK_PILLARS: usize = 8;
pub const DEFAULT_YEARLY_SPAN_YEARS: i32 = 80;
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// 大运至多 9 步（历法服务返回 10 项，首项为占位）
const MAX_LUCK_PILLARS_LIMIT: usize = 9;
const MAX_YEARLY_SPAN_YEARS: i32 = 120;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("配置项 {key} 取值无效 '{value}': {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub standard_meridian: f64,  // 标准时区经线（东经为正）
    pub max_luck_pillars: usize, // 大运步数
    pub yearly_span_years: i32,  // 流年序列长度
    pub history_limit: usize,    // 历史记录保留条数
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            standard_meridian: DEFAULT_STANDARD_MERIDIAN,
            max_luck_pillars: DEFAULT_MAX_LUCK_PILLARS,
            yearly_span_years: DEFAULT_YEARLY_SPAN_YEARS,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.standard_meridian.is_finite() || self.standard_meridian.abs() > 180.0 {
            return Err(ConfigError::InvalidValue {
                key: "standard_meridian",
                value: self.standard_meridian.to_string(),
                reason: "经线需在 [-180, 180] 之间",
            });
        }
        if self.max_luck_pillars == 0 || self.max_luck_pillars > MAX_LUCK_PILLARS_LIMIT {
            return Err(ConfigError::InvalidValue {
                key: "max_luck_pillars",
                value: self.max_luck_pillars.to_string(),
                reason: "大运步数需在 1..=9 之间",
            });
        }
        if self.yearly_span_years <= 0 || self.yearly_span_years > MAX_YEARLY_SPAN_YEARS {
            return Err(ConfigError::InvalidValue {
                key: "yearly_span_years",
                value: self.yearly_span_years.to_string(),
                reason: "流年跨度需在 1..=120 之间",
            });
        }
        if self.history_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "history_limit",
                value: self.history_limit.to_string(),
                reason: "历史保留条数至少为 1",
            });
        }
        Ok(())
    }
}
