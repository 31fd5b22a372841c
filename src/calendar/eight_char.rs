// ==========================================
// 历法层 - 八字（四柱干支）
// ==========================================
// 年柱: 以立春交节时刻换年
// 月柱: 以最近一个"节"定月令，月干按年干起月（甲己之年丙作首）
// 日柱: 儒略日序推算，23 点不换日
// 时柱: 时支 = (时+1)/2，时干按日干起时；23 点起用次日日干
// ==========================================

use crate::calendar::error::{CalendarError, CalendarResult};
use crate::calendar::solar_terms::{jie_instant, surrounding_jie, Jie};
use crate::domain::ganzhi::StemBranch;
use crate::domain::types::{Branch, Stem};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 公元 1 年 1 月 1 日（前一日）的儒略日数
const JDN_CE_OFFSET: i64 = 1_721_425;
/// 日柱序号 = (JDN + 49) mod 60
const DAY_CYCLE_OFFSET: i64 = 49;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EightChar {
    pub year: StemBranch,
    pub month: StemBranch,
    pub day: StemBranch,
    pub hour: StemBranch,
}

/// 儒略日数（整数，按公历日期）
pub fn julian_day_number(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) + JDN_CE_OFFSET
}

/// 某公历日期的日柱
pub fn day_pillar(date: NaiveDate) -> StemBranch {
    StemBranch::from_cycle_index(julian_day_number(date) + DAY_CYCLE_OFFSET)
}

/// 时辰序号 0-11（子=0），23 点归子
pub fn hour_branch_index(hour: u32) -> usize {
    (((hour + 1) / 2) % 12) as usize
}

/// 五虎遁: 由年干求寅月天干
fn first_month_stem(year_stem: Stem) -> usize {
    (year_stem.index() % 5) * 2 + 2
}

/// 五鼠遁: 由日干求子时天干
fn first_hour_stem(day_stem: Stem) -> usize {
    (day_stem.index() % 5) * 2
}

/// 月令地支距寅月的序数
fn months_since_yin(branch: Branch) -> usize {
    (branch.index() + 12 - Branch::Yin.index()) % 12
}

impl EightChar {
    /// 由北京时间（或已校正的真太阳时）推算八字
    pub fn from_instant(instant: NaiveDateTime) -> CalendarResult<Self> {
        let date = instant.date();

        // 年柱
        let li_chun = jie_instant(date.year(), Jie::LiChun)?;
        let solar_year = if instant >= li_chun {
            date.year()
        } else {
            date.year() - 1
        };
        let year = StemBranch::from_cycle_index(i64::from(solar_year) - 4);

        // 月柱
        let ((prev_jie, _), _) = surrounding_jie(instant)?;
        let month_branch = prev_jie.month_branch();
        let month_stem = Stem::from_index(
            first_month_stem(year.stem) + months_since_yin(month_branch),
        );
        let month = StemBranch::new(month_stem, month_branch);

        // 日柱
        let day = day_pillar(date);

        // 时柱
        let hour_of_day = instant.hour();
        let stem_day = if hour_of_day >= 23 {
            let next = date.succ_opt().ok_or_else(|| {
                CalendarError::Overflow(format!("{} 之后无日期", date))
            })?;
            day_pillar(next)
        } else {
            day
        };
        let branch_index = hour_branch_index(hour_of_day);
        let hour = StemBranch::new(
            Stem::from_index(first_hour_stem(stem_day.stem) + branch_index),
            Branch::from_index(branch_index),
        );

        Ok(Self {
            year,
            month,
            day,
            hour,
        })
    }

    /// 年、月、日、时顺序
    pub fn pillars(&self) -> [StemBranch; 4] {
        [self.year, self.month, self.day, self.hour]
    }

    /// 八个字: 年干、年支、月干、月支、日干、日支、时干、时支
    pub fn chars(&self) -> [char; 8] {
        let mut out = ['\0'; 8];
        for (i, pillar) in self.pillars().iter().enumerate() {
            out[i * 2] = pillar.stem.as_char();
            out[i * 2 + 1] = pillar.branch.as_char();
        }
        out
    }
}

impl fmt::Display for EightChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.year, self.month, self.day, self.hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_reference_chart_2024_02_10_noon() {
        let ec = EightChar::from_instant(at(2024, 2, 10, 12, 0)).unwrap();
        assert_eq!(ec.to_string(), "甲辰 丙寅 甲辰 庚午");
        assert_eq!(ec.chars().iter().collect::<String>(), "甲辰丙寅甲辰庚午");
    }

    #[test]
    fn test_year_switches_at_li_chun_not_new_year() {
        // 2024-02-03 仍属癸卯年、乙丑月
        let ec = EightChar::from_instant(at(2024, 2, 3, 12, 0)).unwrap();
        assert_eq!(ec.year.to_string(), "癸卯");
        assert_eq!(ec.month.to_string(), "乙丑");
    }

    #[test]
    fn test_pillars_flip_at_li_chun_minute() {
        // 2023 立春交于 10:42，交节前仍是壬寅年癸丑月
        let before = EightChar::from_instant(at(2023, 2, 4, 10, 38)).unwrap();
        assert_eq!(before.to_string(), "壬寅 癸丑 癸巳 丁巳");

        let after = EightChar::from_instant(at(2023, 2, 4, 10, 45)).unwrap();
        assert_eq!(after.to_string(), "癸卯 甲寅 癸巳 丁巳");
    }

    #[test]
    fn test_known_day_pillars() {
        assert_eq!(day_pillar(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()).to_string(), "戊午");
        assert_eq!(day_pillar(NaiveDate::from_ymd_opt(1949, 10, 1).unwrap()).to_string(), "甲子");
    }

    #[test]
    fn test_late_zi_hour_keeps_day_but_advances_hour_stem() {
        // 2024-02-10 甲辰日；次日乙巳，乙日子时为丙子
        let ec = EightChar::from_instant(at(2024, 2, 10, 23, 30)).unwrap();
        assert_eq!(ec.day.to_string(), "甲辰");
        assert_eq!(ec.hour.to_string(), "丙子");

        let early = EightChar::from_instant(at(2024, 2, 10, 0, 30)).unwrap();
        assert_eq!(early.hour.to_string(), "甲子");
    }

    #[test]
    fn test_hour_branch_index() {
        assert_eq!(hour_branch_index(0), 0);
        assert_eq!(hour_branch_index(1), 1);
        assert_eq!(hour_branch_index(12), 6);
        assert_eq!(hour_branch_index(22), 11);
        assert_eq!(hour_branch_index(23), 0);
    }
}
