// ==========================================
// 八字排盘引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)，当前只用 global
// ==========================================

use crate::config::engine_config::EngineConfig;
use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager（PRAGMA 与建表均幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            configure_sqlite_connection(&conn_guard)?;
            ensure_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 解析数值配置；缺失取默认值，格式错误告警后取默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr + Copy,
    {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };
        Ok(raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!(config_key = key, raw_value = %raw, "配置格式错误，使用默认值");
            default
        }))
    }

    /// 加载引擎配置（未覆写的键取默认值）并校验
    pub fn load_engine_config(&self) -> Result<EngineConfig, Box<dyn Error>> {
        let defaults = EngineConfig::default();
        let config = EngineConfig {
            standard_meridian: self
                .get_parsed_or_default(config_keys::STANDARD_MERIDIAN, defaults.standard_meridian)?,
            max_luck_pillars: self
                .get_parsed_or_default(config_keys::MAX_LUCK_PILLARS, defaults.max_luck_pillars)?,
            yearly_span_years: self
                .get_parsed_or_default(config_keys::YEARLY_SPAN_YEARS, defaults.yearly_span_years)?,
            history_limit: self
                .get_parsed_or_default(config_keys::HISTORY_LIMIT, defaults.history_limit)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// 保存整份引擎配置（先校验）
    pub fn save_engine_config(&self, config: &EngineConfig) -> Result<(), Box<dyn Error>> {
        config.validate()?;
        self.set_global_config_value(
            config_keys::STANDARD_MERIDIAN,
            &config.standard_meridian.to_string(),
        )?;
        self.set_global_config_value(
            config_keys::MAX_LUCK_PILLARS,
            &config.max_luck_pillars.to_string(),
        )?;
        self.set_global_config_value(
            config_keys::YEARLY_SPAN_YEARS,
            &config.yearly_span_years.to_string(),
        )?;
        self.set_global_config_value(config_keys::HISTORY_LIMIT, &config.history_limit.to_string())?;
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON，按键排序）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 从配置快照恢复配置，返回写入条数
    ///
    /// 会覆盖同名的 global 配置
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> Result<usize, Box<dyn Error>> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 真太阳时
    pub const STANDARD_MERIDIAN: &str = "standard_meridian";

    // 大运 / 流年
    pub const MAX_LUCK_PILLARS: &str = "max_luck_pillars";
    pub const YEARLY_SPAN_YEARS: &str = "yearly_span_years";

    // 历史记录
    pub const HISTORY_LIMIT: &str = "history_limit";
}
