// ==========================================
// 历法层 - 内置中国历法实现
// ==========================================

use crate::calendar::decennial;
use crate::calendar::eight_char::EightChar;
use crate::calendar::error::CalendarResult;
use crate::calendar::lunar::LunarDate;
use crate::calendar::CalendarProvider;
use crate::domain::ganzhi::StemBranch;
use crate::domain::luck::RawLuckCycle;
use chrono::{NaiveDate, NaiveDateTime};

/// 流年取值所用的农历月、日
const YEAR_PILLAR_PROBE: (u32, u32) = (6, 15);

/// 基于内置农历表与节气算法的历法服务（无状态）
#[derive(Debug, Clone, Copy, Default)]
pub struct ChineseCalendar;

impl ChineseCalendar {
    pub fn new() -> Self {
        Self
    }
}

impl CalendarProvider for ChineseCalendar {
    fn lunar_to_solar(&self, lunar: &LunarDate) -> CalendarResult<NaiveDate> {
        lunar.to_solar()
    }

    fn solar_to_lunar(&self, date: NaiveDate) -> CalendarResult<LunarDate> {
        LunarDate::from_solar(date)
    }

    fn eight_char(&self, instant: NaiveDateTime) -> CalendarResult<EightChar> {
        EightChar::from_instant(instant)
    }

    fn decennial_cycles(
        &self,
        instant: NaiveDateTime,
        gender_code: u8,
    ) -> CalendarResult<Vec<RawLuckCycle>> {
        decennial::decennial_cycles(instant, gender_code)
    }

    fn year_pillar(&self, year: i32) -> CalendarResult<StemBranch> {
        // 年中日期必然落在同名农历年内，干支按年序推得，不受农历表范围限制
        let (month, day) = YEAR_PILLAR_PROBE;
        Ok(LunarDate::new(year, month, day).year_gan_zhi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_pillar() {
        let cal = ChineseCalendar::new();
        assert_eq!(cal.year_pillar(2024).unwrap().to_string(), "甲辰");
        assert_eq!(cal.year_pillar(1984).unwrap().to_string(), "甲子");
        assert_eq!(cal.year_pillar(2111).unwrap().to_string(), "辛未");
    }
}
