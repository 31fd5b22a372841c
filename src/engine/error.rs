// ==========================================
// 八字排盘引擎 - 引擎层错误类型
// ==========================================
// 对调用方只暴露"日期无效"一类可恢复错误（由用户修正输入），
// 其余为上游历法服务的契约违背
// ==========================================

use crate::calendar::CalendarError;
use crate::domain::types::CalendarSystem;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("无效{calendar}日期 {year}-{month}-{day}: {reason}")]
    InvalidDate {
        calendar: CalendarSystem,
        year: i32,
        month: u32,
        day: u32,
        reason: String,
    },

    #[error("输入格式错误 {field}='{value}': {reason}")]
    MalformedInput {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("大运数据不一致: {0}")]
    InconsistentLuckCycles(String),

    #[error("历法服务错误: {0}")]
    Calendar(CalendarError),
}

impl EngineError {
    /// 是否属于"日期无效"类错误（格式错误或日期不存在）
    pub fn is_invalid_date(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidDate { .. } | EngineError::MalformedInput { .. }
        )
    }

    /// 带上下文的转换: 超出历表范围的输入日期同样视为无效日期
    pub fn for_input_date(
        err: CalendarError,
        calendar: CalendarSystem,
        year: i32,
        month: u32,
        day: u32,
    ) -> Self {
        match err {
            CalendarError::YearOutOfRange { .. } => EngineError::InvalidDate {
                calendar,
                year,
                month,
                day,
                reason: err.to_string(),
            },
            other => other.into(),
        }
    }
}

impl From<CalendarError> for EngineError {
    fn from(err: CalendarError) -> Self {
        let reason = err.to_string();
        match err {
            CalendarError::LunarDateNotFound {
                year, month, day, ..
            } => EngineError::InvalidDate {
                calendar: CalendarSystem::Lunar,
                year,
                month,
                day,
                reason,
            },
            CalendarError::SolarDateNotFound { year, month, day } => EngineError::InvalidDate {
                calendar: CalendarSystem::Solar,
                year,
                month,
                day,
                reason,
            },
            CalendarError::MalformedField { field, value } => EngineError::MalformedInput {
                field,
                value,
                reason,
            },
            CalendarError::InvalidLongitude { value } => EngineError::MalformedInput {
                field: "longitude",
                value: value.to_string(),
                reason,
            },
            CalendarError::InvalidTime { hour, minute } => EngineError::MalformedInput {
                field: "birth_time",
                value: format!("{:02}:{:02}", hour, minute),
                reason,
            },
            other => EngineError::Calendar(other),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
