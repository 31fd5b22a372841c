// ==========================================
// 八字排盘引擎 - API 层
// ==========================================
// 职责: 为展示层（CLI 等）提供统一入口
// 红线: API 层不做排盘计算，只编排引擎与仓储
// ==========================================

pub mod bazi_api;
pub mod error;

// 重导出
pub use bazi_api::{BaziApi, CalculateOptions, CalculationResponse};
pub use error::{ApiError, ApiResult};
