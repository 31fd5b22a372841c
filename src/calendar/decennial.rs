// ==========================================
// 历法层 - 大运起运
// ==========================================
// 顺逆: 阳年男、阴年女顺排，反之逆排
// 起运: 出生到下一个节（顺）或上一个节到出生（逆）的间隔，
//       三天折一年，一天折四个月，一个时辰折十天
// 大运干支: 自月柱起顺/逆推六十甲子
// ==========================================

use crate::calendar::eight_char::{hour_branch_index, EightChar};
use crate::calendar::error::{CalendarError, CalendarResult};
use crate::calendar::solar_terms::surrounding_jie;
use crate::domain::luck::RawLuckCycle;
use chrono::{Datelike, Months, NaiveDateTime, Timelike};

/// 返回的大运条数（含首项占位）
pub const DECENNIAL_ENTRIES: usize = 10;
pub const YEARS_PER_CYCLE: i32 = 10;

/// 起运间隔换算结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartOffset {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

/// 起运计算使用的时辰序号，23 点记为亥后（11）
fn cycle_hour_index(instant: NaiveDateTime) -> i64 {
    if instant.hour() == 23 {
        11
    } else {
        hour_branch_index(instant.hour()) as i64
    }
}

/// 由区间两端换算起运年/月/日
pub fn start_offset(start: NaiveDateTime, end: NaiveDateTime) -> StartOffset {
    let mut hour_diff = cycle_hour_index(end) - cycle_hour_index(start);
    let mut day_diff = (end.date() - start.date()).num_days();
    if hour_diff < 0 {
        hour_diff += 12;
        day_diff -= 1;
    }
    let month_diff = hour_diff * 10 / 30;
    let total_months = (day_diff * 4 + month_diff).max(0);
    let days = (hour_diff * 10 - month_diff * 30).max(0);
    StartOffset {
        years: (total_months / 12) as u32,
        months: (total_months % 12) as u32,
        days: days as u32,
    }
}

/// 是否顺排
pub fn is_forward(eight_char: &EightChar, gender_code: u8) -> bool {
    let yang_year = eight_char.year.stem.index() % 2 == 0;
    let male = gender_code == 1;
    yang_year == male
}

/// 起运时刻 = 出生 + 年 + 月 + 日（月末按月长截断）
pub fn start_instant(birth: NaiveDateTime, offset: StartOffset) -> CalendarResult<NaiveDateTime> {
    let overflow = || CalendarError::Overflow(format!("{} 起运推算越界", birth));
    birth
        .checked_add_months(Months::new(offset.years * 12))
        .and_then(|t| t.checked_add_months(Months::new(offset.months)))
        .and_then(|t| t.checked_add_signed(chrono::Duration::days(i64::from(offset.days))))
        .ok_or_else(overflow)
}

/// 大运列表（首项为起运前占位，干支为空串）
pub fn decennial_cycles(
    birth: NaiveDateTime,
    gender_code: u8,
) -> CalendarResult<Vec<RawLuckCycle>> {
    let eight_char = EightChar::from_instant(birth)?;
    let forward = is_forward(&eight_char, gender_code);

    let ((_, prev_at), (_, next_at)) = surrounding_jie(birth)?;
    let offset = if forward {
        start_offset(birth, next_at)
    } else {
        start_offset(prev_at, birth)
    };
    let start = start_instant(birth, offset)?;

    let birth_year = birth.year();
    let mut cycles = Vec::with_capacity(DECENNIAL_ENTRIES);
    cycles.push(RawLuckCycle {
        gan_zhi: String::new(),
        start_age: 1,
        start_year: birth_year,
    });

    for i in 1..DECENNIAL_ENTRIES as i64 {
        let step = if forward { i } else { -i };
        let pair = eight_char.month.offset(step).ok_or_else(|| {
            CalendarError::Overflow(format!("月柱 {} 不在六十甲子中", eight_char.month))
        })?;
        let start_year = start.year() + YEARS_PER_CYCLE * (i as i32 - 1);
        cycles.push(RawLuckCycle {
            gan_zhi: pair.to_string(),
            start_age: start_year - birth_year + 1,
            start_year,
        });
    }

    Ok(cycles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_start_offset_conversion() {
        // 23 天又 11 个时辰: 95 个月 20 天
        let offset = start_offset(at(2024, 2, 10, 12, 0), at(2024, 3, 5, 10, 23));
        assert_eq!(
            offset,
            StartOffset {
                years: 7,
                months: 11,
                days: 20
            }
        );
    }

    #[test]
    fn test_male_yang_year_runs_forward() {
        let cycles = decennial_cycles(at(2024, 2, 10, 12, 0), 1).unwrap();
        assert_eq!(cycles.len(), DECENNIAL_ENTRIES);
        assert!(cycles[0].is_placeholder());
        assert_eq!(cycles[0].start_year, 2024);
        assert_eq!(cycles[1].gan_zhi, "丁卯");
        assert_eq!(cycles[1].start_year, 2032);
        assert_eq!(cycles[1].start_age, 9);
        assert_eq!(cycles[2].gan_zhi, "戊辰");
        assert_eq!(cycles[2].start_year, 2042);
    }

    #[test]
    fn test_female_yang_year_runs_backward() {
        let cycles = decennial_cycles(at(2024, 2, 10, 12, 0), 0).unwrap();
        assert_eq!(cycles[1].gan_zhi, "乙丑");
        assert_eq!(cycles[1].start_year, 2026);
        assert_eq!(cycles[1].start_age, 3);
        assert_eq!(cycles[2].gan_zhi, "甲子");
    }

    #[test]
    fn test_start_instant_clamps_month_end() {
        let birth = at(2024, 1, 31, 8, 0);
        let start = start_instant(
            birth,
            StartOffset {
                years: 0,
                months: 1,
                days: 0,
            },
        )
        .unwrap();
        assert_eq!(start.date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }
}
