// ==========================================
// 历法层 - 历法适配器
// ==========================================
// 输入: 年月日时分 + 是否农历 + 是否真太阳时校正 + 经度
// 输出: 规范公历时刻 + 农历表示 + 八字 + 展示串
// 真太阳时: 偏移秒数 = (经度 - 标准经线) × 4 × 60，作用于完整时刻，可跨日
// ==========================================

use crate::calendar::eight_char::EightChar;
use crate::calendar::error::{CalendarError, CalendarResult};
use crate::calendar::lunar::LunarDate;
use crate::calendar::CalendarProvider;
use crate::domain::ganzhi::StemBranch;
use crate::domain::input::UserInput;
use crate::domain::luck::RawLuckCycle;
use crate::domain::types::{CalendarSystem, Gender};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 中国标准时间所用经线（东经 120°）
pub const DEFAULT_STANDARD_MERIDIAN: f64 = 120.0;
/// 经度每度对应的时间（秒）
const SECONDS_PER_DEGREE: f64 = 4.0 * 60.0;
const MAX_ABS_LONGITUDE: f64 = 180.0;

// ==========================================
// CalendarRequest
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarRequest {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub is_lunar: bool,
    pub use_solar_time: bool,
    pub longitude: Option<f64>,
}

fn parse_fields<const N: usize>(
    raw: &str,
    separator: char,
    field: &'static str,
) -> CalendarResult<[i64; N]> {
    let malformed = || CalendarError::MalformedField {
        field,
        value: raw.to_string(),
    };
    let parts: Vec<&str> = raw.trim().split(separator).collect();
    if parts.len() != N {
        return Err(malformed());
    }
    let mut out = [0i64; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part.trim().parse::<i64>().map_err(|_| malformed())?;
    }
    Ok(out)
}

impl CalendarRequest {
    /// 解析 "YYYY-MM-DD" 与 "HH:mm"
    pub fn from_input(input: &UserInput) -> CalendarResult<Self> {
        let [year, month, day] = parse_fields::<3>(&input.birth_date, '-', "birth_date")?;
        let [hour, minute] = parse_fields::<2>(&input.birth_time, ':', "birth_time")?;

        let to_u32 = |v: i64, field: &'static str, raw: &str| {
            u32::try_from(v).map_err(|_| CalendarError::MalformedField {
                field,
                value: raw.to_string(),
            })
        };

        Ok(Self {
            year: i32::try_from(year).map_err(|_| CalendarError::MalformedField {
                field: "birth_date",
                value: input.birth_date.clone(),
            })?,
            month: to_u32(month, "birth_date", &input.birth_date)?,
            day: to_u32(day, "birth_date", &input.birth_date)?,
            hour: to_u32(hour, "birth_time", &input.birth_time)?,
            minute: to_u32(minute, "birth_time", &input.birth_time)?,
            is_lunar: input.is_lunar,
            use_solar_time: input.use_solar_time,
            longitude: input.correction_longitude(),
        })
    }

    pub fn calendar_system(&self) -> CalendarSystem {
        if self.is_lunar {
            CalendarSystem::Lunar
        } else {
            CalendarSystem::Solar
        }
    }
}

// ==========================================
// CalendarMoment - 适配结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarMoment {
    /// 未校正的公历时刻（民用时间）
    pub civil: NaiveDateTime,
    /// 规范公历时刻（已做真太阳时校正）
    pub solar: NaiveDateTime,
    /// 实际施加的校正秒数
    pub correction_seconds: i64,
    pub lunar: LunarDate,
    pub eight_char: EightChar,
    pub solar_label: String,
    pub lunar_label: String,
}

/// 经度须为有限值且在 [-180, 180] 内
pub fn validate_longitude(longitude: f64) -> CalendarResult<f64> {
    if longitude.is_finite() && longitude.abs() <= MAX_ABS_LONGITUDE {
        Ok(longitude)
    } else {
        Err(CalendarError::InvalidLongitude { value: longitude })
    }
}

/// 真太阳时偏移秒数
pub fn solar_time_offset_seconds(longitude: f64, standard_meridian: f64) -> i64 {
    ((longitude - standard_meridian) * SECONDS_PER_DEGREE).round() as i64
}

/// 公历展示串，如 "2024年2月10日 12时"（只到时）
pub fn solar_label(instant: NaiveDateTime) -> String {
    format!(
        "{}年{}月{}日 {}时",
        instant.year(),
        instant.month(),
        instant.day(),
        instant.hour()
    )
}

// ==========================================
// CalendarAdapter
// ==========================================
pub struct CalendarAdapter<P: CalendarProvider> {
    provider: P,
    standard_meridian: f64,
}

impl<P: CalendarProvider> CalendarAdapter<P> {
    pub fn new(provider: P) -> Self {
        Self::with_meridian(provider, DEFAULT_STANDARD_MERIDIAN)
    }

    pub fn with_meridian(provider: P, standard_meridian: f64) -> Self {
        Self {
            provider,
            standard_meridian,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn standard_meridian(&self) -> f64 {
        self.standard_meridian
    }

    /// 解析请求为规范时刻
    pub fn resolve(&self, request: &CalendarRequest) -> CalendarResult<CalendarMoment> {
        let date = if request.is_lunar {
            self.provider.lunar_to_solar(&LunarDate::new(
                request.year,
                request.month,
                request.day,
            ))?
        } else {
            NaiveDate::from_ymd_opt(request.year, request.month, request.day).ok_or(
                CalendarError::SolarDateNotFound {
                    year: request.year,
                    month: request.month,
                    day: request.day,
                },
            )?
        };
        let time = NaiveTime::from_hms_opt(request.hour, request.minute, 0).ok_or(
            CalendarError::InvalidTime {
                hour: request.hour,
                minute: request.minute,
            },
        )?;
        let civil = date.and_time(time);

        let correction_seconds = match (request.use_solar_time, request.longitude) {
            (true, Some(longitude)) => {
                solar_time_offset_seconds(validate_longitude(longitude)?, self.standard_meridian)
            }
            _ => 0,
        };
        let solar = Duration::try_seconds(correction_seconds)
            .and_then(|shift| civil.checked_add_signed(shift))
            .ok_or_else(|| CalendarError::Overflow(format!("{} 校正越界", civil)))?;

        let lunar = self.provider.solar_to_lunar(solar.date())?;
        let eight_char = self.provider.eight_char(solar)?;

        debug!(
            civil = %civil,
            solar = %solar,
            correction_seconds,
            eight_char = %eight_char,
            "历法适配完成"
        );

        Ok(CalendarMoment {
            civil,
            solar,
            correction_seconds,
            lunar,
            eight_char,
            solar_label: solar_label(solar),
            lunar_label: lunar.to_string(),
        })
    }

    /// 以规范时刻计算大运
    pub fn decennial_cycles(
        &self,
        moment: &CalendarMoment,
        gender: Gender,
    ) -> CalendarResult<Vec<RawLuckCycle>> {
        self.provider.decennial_cycles(moment.solar, gender.code())
    }

    pub fn year_pillar(&self, year: i32) -> CalendarResult<StemBranch> {
        self.provider.year_pillar(year)
    }
}
