// ==========================================
// 八字排盘引擎 - 排盘 API
// ==========================================
// 职责: 展示层门面
//   1. 排盘（可选固定种子）
//   2. 可选保存到历史并按保留条数清理
//   3. 历史查询 / 删除
// 引擎本身不访问历史记录，持久化只在本层发生
// ==========================================

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::calendar::ChineseCalendar;
use crate::config::{ConfigManager, EngineConfig};
use crate::db::open_sqlite_connection;
use crate::domain::history::{HistoryRecord, HistorySummary};
use crate::domain::input::UserInput;
use crate::domain::report::Report;
use crate::engine::BaziEngine;
use crate::repository::ReportHistoryRepository;

/// 排盘选项
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CalculateOptions {
    /// 固定随机种子；None 时使用线程随机源
    pub seed: Option<u64>,
    /// 是否保存到历史记录
    pub save: bool,
}

/// 排盘结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    /// 已保存时的历史记录 id
    pub record_id: Option<String>,
    pub report: Report,
}

// ==========================================
// BaziApi - 排盘 API
// ==========================================
pub struct BaziApi {
    engine: BaziEngine<ChineseCalendar>,
    history_repo: Arc<ReportHistoryRepository>,
    config: EngineConfig,
}

impl BaziApi {
    pub fn new(
        engine: BaziEngine<ChineseCalendar>,
        history_repo: Arc<ReportHistoryRepository>,
        config: EngineConfig,
    ) -> Self {
        Self {
            engine,
            history_repo,
            config,
        }
    }

    /// 由数据库文件组装（读取 config_kv 中的引擎配置）
    pub fn from_db_path(db_path: &str) -> ApiResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = ConfigManager::from_connection(conn.clone())
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let config = config_manager
            .load_engine_config()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        let history_repo = Arc::new(ReportHistoryRepository::from_connection(conn)?);
        let engine = BaziEngine::new(ChineseCalendar::new(), &config);
        Ok(Self::new(engine, history_repo, config))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 排盘
    ///
    /// # 参数
    /// - input: 排盘输入
    /// - options: 种子与保存选项
    ///
    /// # 返回
    /// - Ok(CalculationResponse): 报告（及保存后的记录 id）
    /// - Err(ApiError::InvalidDate): 日期无效，不产出报告
    pub fn calculate(
        &self,
        input: &UserInput,
        options: CalculateOptions,
    ) -> ApiResult<CalculationResponse> {
        if input.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("姓名不能为空".to_string()));
        }

        let report = match options.seed {
            Some(seed) => self.engine.calculate_seeded(input, seed),
            None => self.engine.calculate(input, &mut rand::thread_rng()),
        }
        .map_err(|e| {
            warn!(name = %input.name, error = %e, "排盘失败");
            ApiError::from(e)
        })?;

        if !options.save {
            return Ok(CalculationResponse {
                record_id: None,
                report,
            });
        }

        let record = HistoryRecord::new(input.clone(), report);
        self.history_repo.save(&record)?;
        let pruned = self.history_repo.prune(self.config.history_limit)?;
        info!(id = %record.id, pruned, "排盘记录已保存");

        Ok(CalculationResponse {
            record_id: Some(record.id),
            report: record.report,
        })
    }

    /// 历史摘要（新 → 旧），limit 缺省为保留条数
    pub fn list_history(&self, limit: Option<usize>) -> ApiResult<Vec<HistorySummary>> {
        let limit = limit.unwrap_or(self.config.history_limit);
        Ok(self.history_repo.list_summaries(limit)?)
    }

    pub fn get_history(&self, id: &str) -> ApiResult<HistoryRecord> {
        if id.trim().is_empty() {
            return Err(ApiError::InvalidInput("记录ID不能为空".to_string()));
        }
        self.history_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("排盘记录(id={})不存在", id)))
    }

    pub fn delete_history(&self, id: &str) -> ApiResult<()> {
        if id.trim().is_empty() {
            return Err(ApiError::InvalidInput("记录ID不能为空".to_string()));
        }
        self.history_repo.delete(id)?;
        info!(id, "删除排盘记录");
        Ok(())
    }
}
