// ==========================================
// 八字排盘引擎 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑，引擎层不依赖本层
// 职责: 排盘历史的持久化
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod history_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use history_repo::ReportHistoryRepository;
