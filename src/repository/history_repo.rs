// ==========================================
// 八字排盘引擎 - 排盘历史仓储
// ==========================================
// 表: report_history
// 输入与报告整体以 JSON 存储，created_at 为 RFC3339（微秒，UTC）
// 排序: created_at 降序，同一时刻按写入顺序（rowid）降序
// ==========================================

use crate::db::{configure_sqlite_connection, ensure_schema};
use crate::domain::history::{HistoryRecord, HistorySummary};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tracing::debug;

const SELECT_COLUMNS: &str = "SELECT id, name, input_json, report_json, created_at FROM report_history";

/// 数据库行（未反序列化）
struct HistoryRow {
    id: String,
    name: String,
    input_json: String,
    report_json: String,
    created_at: String,
}

impl HistoryRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            input_json: row.get(2)?,
            report_json: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn into_record(self) -> RepositoryResult<HistoryRecord> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| RepositoryError::FieldValueError {
                field: "created_at".to_string(),
                message: format!("{} ({})", e, self.created_at),
            })?
            .with_timezone(&Utc);
        Ok(HistoryRecord {
            id: self.id,
            name: self.name,
            input: serde_json::from_str(&self.input_json)?,
            report: serde_json::from_str(&self.report_json)?,
            created_at,
        })
    }
}

// ==========================================
// ReportHistoryRepository - 排盘历史仓储
// ==========================================
/// 职责: 管理 report_history 表的 CRUD 操作
pub struct ReportHistoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ReportHistoryRepository {
    /// 打开（或创建）数据库文件
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = Connection::open(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        configure_sqlite_connection(&conn)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例（建表幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            ensure_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 保存一条记录（id 重复时报唯一约束错误）
    pub fn save(&self, record: &HistoryRecord) -> RepositoryResult<()> {
        let input_json = serde_json::to_string(&record.input)?;
        let report_json = serde_json::to_string(&record.report)?;
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO report_history (id, name, input_json, report_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id,
                record.name,
                input_json,
                report_json,
                record
                    .created_at
                    .to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )?;
        debug!(id = %record.id, name = %record.name, "保存排盘记录");
        Ok(())
    }

    /// 最近的 limit 条记录（新 → 旧）
    pub fn list(&self, limit: usize) -> RepositoryResult<Vec<HistoryRecord>> {
        let rows = {
            let conn = self.get_conn()?;
            let mut stmt = conn.prepare(&format!(
                "{} ORDER BY created_at DESC, rowid DESC LIMIT ?1",
                SELECT_COLUMNS
            ))?;
            let rows = stmt
                .query_map(params![limit as i64], HistoryRow::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        };
        rows.into_iter().map(HistoryRow::into_record).collect()
    }

    /// 最近记录的摘要
    pub fn list_summaries(&self, limit: usize) -> RepositoryResult<Vec<HistorySummary>> {
        Ok(self
            .list(limit)?
            .iter()
            .map(HistorySummary::from)
            .collect())
    }

    /// 按 id 查询
    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<HistoryRecord>> {
        let row = {
            let conn = self.get_conn()?;
            let row = conn
                .query_row(
                    &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                    params![id],
                    HistoryRow::from_row,
                )
                .optional()?;
            row
        };
        row.map(HistoryRow::into_record).transpose()
    }

    /// 删除一条记录；不存在时返回 NotFound
    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM report_history WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "ReportHistory".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 只保留最近 keep 条，返回删除条数
    pub fn prune(&self, keep: usize) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let deleted = conn.execute(
            "DELETE FROM report_history WHERE id NOT IN (
                SELECT id FROM report_history ORDER BY created_at DESC, rowid DESC LIMIT ?1
             )",
            params![keep as i64],
        )?;
        if deleted > 0 {
            debug!(deleted, keep, "清理过期排盘记录");
        }
        Ok(deleted)
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM report_history", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}
