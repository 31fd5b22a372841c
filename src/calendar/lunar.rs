// ==========================================
// 历法层 - 农历日期与公历互转
// ==========================================

use crate::calendar::error::{CalendarError, CalendarResult};
use crate::calendar::lunar_data::{
    is_supported_year, leap_days, leap_month, month_days, year_days, BASE_SOLAR_DATE,
    MAX_LUNAR_YEAR, MIN_LUNAR_YEAR,
};
use crate::domain::ganzhi::StemBranch;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

const DIGITS: [char; 10] = ['〇', '一', '二', '三', '四', '五', '六', '七', '八', '九'];
const MONTH_NAMES: [&str; 12] = [
    "正", "二", "三", "四", "五", "六", "七", "八", "九", "十", "冬", "腊",
];
const DAY_TENS: [&str; 4] = ["初", "十", "廿", "三"];
const DAY_UNITS: [&str; 10] = ["一", "二", "三", "四", "五", "六", "七", "八", "九", "十"];

// ==========================================
// LunarDate
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunarDate {
    pub year: i32,
    pub month: u32, // 1-12
    pub day: u32,   // 1-30
    #[serde(default)]
    pub is_leap: bool,
}

fn base_date() -> CalendarResult<NaiveDate> {
    let (y, m, d) = BASE_SOLAR_DATE;
    NaiveDate::from_ymd_opt(y, m, d).ok_or(CalendarError::SolarDateNotFound {
        year: y,
        month: m,
        day: d,
    })
}

impl LunarDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self {
            year,
            month,
            day,
            is_leap: false,
        }
    }

    pub fn leap(year: i32, month: u32, day: u32) -> Self {
        Self {
            year,
            month,
            day,
            is_leap: true,
        }
    }

    fn not_found(&self) -> CalendarError {
        CalendarError::LunarDateNotFound {
            year: self.year,
            month: self.month,
            day: self.day,
            leap: self.is_leap,
        }
    }

    /// 该日期所在月的天数；月份不存在时返回 None
    fn days_in_month(&self) -> Option<u32> {
        if !(1..=12).contains(&self.month) {
            return None;
        }
        if self.is_leap {
            (leap_month(self.year) == self.month).then(|| leap_days(self.year))
        } else {
            Some(month_days(self.year, self.month))
        }
    }

    /// 农历 → 公历
    pub fn to_solar(&self) -> CalendarResult<NaiveDate> {
        if !is_supported_year(self.year) {
            return Err(CalendarError::YearOutOfRange {
                year: self.year,
                min: MIN_LUNAR_YEAR,
                max: MAX_LUNAR_YEAR,
            });
        }
        let length = self.days_in_month().ok_or_else(|| self.not_found())?;
        if self.day < 1 || self.day > length {
            return Err(self.not_found());
        }

        let mut offset: i64 = (MIN_LUNAR_YEAR..self.year)
            .map(|y| i64::from(year_days(y)))
            .sum();

        let leap = leap_month(self.year);
        for m in 1..self.month {
            offset += i64::from(month_days(self.year, m));
            if m == leap {
                offset += i64::from(leap_days(self.year));
            }
        }
        // 闰月排在同名普通月之后
        if self.is_leap {
            offset += i64::from(month_days(self.year, self.month));
        }
        offset += i64::from(self.day) - 1;

        base_date()?
            .checked_add_signed(chrono::Duration::days(offset))
            .ok_or_else(|| CalendarError::Overflow(format!("农历偏移 {} 天", offset)))
    }

    /// 公历 → 农历
    pub fn from_solar(date: NaiveDate) -> CalendarResult<Self> {
        let base = base_date()?;
        let mut offset = (date - base).num_days();
        if offset < 0 {
            return Err(CalendarError::YearOutOfRange {
                year: date.year(),
                min: MIN_LUNAR_YEAR,
                max: MAX_LUNAR_YEAR,
            });
        }

        let mut year = MIN_LUNAR_YEAR;
        loop {
            if !is_supported_year(year) {
                return Err(CalendarError::YearOutOfRange {
                    year,
                    min: MIN_LUNAR_YEAR,
                    max: MAX_LUNAR_YEAR,
                });
            }
            let days = i64::from(year_days(year));
            if offset < days {
                break;
            }
            offset -= days;
            year += 1;
        }

        let leap = leap_month(year);
        for month in 1..=12 {
            let days = i64::from(month_days(year, month));
            if offset < days {
                return Ok(Self::new(year, month, offset as u32 + 1));
            }
            offset -= days;

            if month == leap {
                let days = i64::from(leap_days(year));
                if offset < days {
                    return Ok(Self::leap(year, month, offset as u32 + 1));
                }
                offset -= days;
            }
        }

        Err(CalendarError::Overflow(format!("农历 {} 年日序越界", year)))
    }

    /// 农历年干支（以正月初一换年）
    pub fn year_gan_zhi(&self) -> StemBranch {
        StemBranch::from_cycle_index(i64::from(self.year) - 4)
    }

    pub fn month_name(&self) -> String {
        let name = MONTH_NAMES[(self.month.clamp(1, 12) - 1) as usize];
        if self.is_leap {
            format!("闰{}月", name)
        } else {
            format!("{}月", name)
        }
    }

    pub fn day_name(&self) -> String {
        match self.day {
            10 => "初十".to_string(),
            20 => "二十".to_string(),
            30 => "三十".to_string(),
            d => {
                let tens = DAY_TENS[((d / 10) as usize).min(3)];
                let units = DAY_UNITS[((d + 9) % 10) as usize];
                format!("{}{}", tens, units)
            }
        }
    }
}

impl fmt::Display for LunarDate {
    /// 如 "二〇二四年正月初一"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year: String = self
            .year
            .to_string()
            .chars()
            .filter_map(|c| c.to_digit(10).map(|d| DIGITS[d as usize]))
            .collect();
        write!(f, "{}年{}{}", year, self.month_name(), self.day_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_base_date() {
        assert_eq!(LunarDate::new(1900, 1, 1).to_solar().unwrap(), ymd(1900, 1, 31));
        assert_eq!(LunarDate::from_solar(ymd(1900, 1, 31)).unwrap(), LunarDate::new(1900, 1, 1));
    }

    #[test]
    fn test_spring_festival_2024() {
        assert_eq!(LunarDate::new(2024, 1, 1).to_solar().unwrap(), ymd(2024, 2, 10));
        assert_eq!(LunarDate::from_solar(ymd(2024, 2, 9)).unwrap(), LunarDate::new(2023, 12, 30));
    }

    #[test]
    fn test_leap_month_2023() {
        // 2023 闰二月初一 = 2023-03-22
        let leap = LunarDate::leap(2023, 2, 1);
        assert_eq!(leap.to_solar().unwrap(), ymd(2023, 3, 22));
        assert_eq!(LunarDate::from_solar(ymd(2023, 3, 22)).unwrap(), leap);
        assert_eq!(LunarDate::new(2023, 3, 1).to_solar().unwrap(), ymd(2023, 4, 20));
    }

    #[test]
    fn test_non_existent_dates() {
        assert!(matches!(
            LunarDate::new(2024, 1, 30).to_solar(),
            Err(CalendarError::LunarDateNotFound { day: 30, .. })
        ));
        assert!(LunarDate::leap(2024, 5, 1).to_solar().is_err());
        assert!(LunarDate::new(2024, 13, 1).to_solar().is_err());
        assert!(matches!(
            LunarDate::new(1899, 1, 1).to_solar(),
            Err(CalendarError::YearOutOfRange { .. })
        ));
    }

    #[test]
    fn test_round_trip_over_a_year() {
        let mut date = ymd(2020, 1, 1);
        while date < ymd(2021, 1, 1) {
            let lunar = LunarDate::from_solar(date).unwrap();
            assert_eq!(lunar.to_solar().unwrap(), date);
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_chinese_display() {
        assert_eq!(LunarDate::new(2024, 1, 1).to_string(), "二〇二四年正月初一");
        assert_eq!(LunarDate::new(1990, 12, 21).to_string(), "一九九〇年腊月廿一");
        assert_eq!(LunarDate::leap(2023, 2, 10).to_string(), "二〇二三年闰二月初十");
        assert_eq!(LunarDate::new(2023, 11, 30).day_name(), "三十");
    }
}
