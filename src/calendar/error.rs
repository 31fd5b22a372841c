// ==========================================
// 历法层 - 错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalendarError {
    #[error("年份 {year} 超出支持范围 ({min}-{max})")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("农历日期 {year}年{}{month}月{day}日 不存在 (可能是该月只有29天)", leap_prefix(.leap))]
    LunarDateNotFound {
        year: i32,
        month: u32,
        day: u32,
        leap: bool,
    },

    #[error("公历日期 {year}年{month}月{day}日 不存在")]
    SolarDateNotFound { year: i32, month: u32, day: u32 },

    #[error("{field} 格式无效: '{value}'")]
    MalformedField { field: &'static str, value: String },

    #[error("时间 {hour:02}:{minute:02} 无效")]
    InvalidTime { hour: u32, minute: u32 },

    #[error("经度 {value} 无效 (需在 -180 到 180 之间)")]
    InvalidLongitude { value: f64 },

    #[error("无法求解 {year} 年节气 {term}")]
    SolarTermNotFound { year: i32, term: &'static str },

    #[error("时间运算溢出: {0}")]
    Overflow(String),
}

fn leap_prefix(leap: &bool) -> &'static str {
    if *leap {
        "闰"
    } else {
        ""
    }
}

pub type CalendarResult<T> = Result<T, CalendarError>;
