// ==========================================
// 八字排盘引擎 - 历史记录
// ==========================================
// 由展示层持有，引擎不读写
// ==========================================

use crate::domain::input::UserInput;
use crate::domain::report::Report;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    pub name: String,
    pub input: UserInput,
    pub report: Report,
    pub created_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// 新建记录（随机 id，当前时间）
    pub fn new(input: UserInput, report: Report) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name.clone(),
            input,
            report,
            created_at: Utc::now(),
        }
    }
}

/// 列表展示用摘要（不含完整报告）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub id: String,
    pub name: String,
    pub birth_date: String,
    pub birth_time: String,
    pub day_pillar: String,
    pub total_score: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&HistoryRecord> for HistorySummary {
    fn from(record: &HistoryRecord) -> Self {
        let day = &record.report.chart.day;
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            birth_date: record.input.birth_date.clone(),
            birth_time: record.input.birth_time.clone(),
            day_pillar: format!("{}{}", day.stem, day.branch),
            total_score: record.report.life_energy.total_score,
            created_at: record.created_at,
        }
    }
}
