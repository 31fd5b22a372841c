// ==========================================
// 八字排盘引擎 - 历法层
// ==========================================
// 职责: 公历/农历互转、节气、八字、大运起运、真太阳时校正
// 引擎只通过 CalendarProvider 访问历法能力
// ==========================================

pub mod adapter;
pub mod chinese;
pub mod decennial;
pub mod eight_char;
pub mod error;
pub mod lunar;
pub mod lunar_data;
pub mod solar_terms;

use crate::domain::ganzhi::StemBranch;
use crate::domain::luck::RawLuckCycle;
use chrono::{NaiveDate, NaiveDateTime};

pub use adapter::{CalendarAdapter, CalendarMoment, CalendarRequest};
pub use chinese::ChineseCalendar;
pub use eight_char::EightChar;
pub use error::{CalendarError, CalendarResult};
pub use lunar::LunarDate;

// ==========================================
// CalendarProvider - 历法服务契约
// ==========================================
pub trait CalendarProvider: Send + Sync {
    /// 农历 → 公历；日期不存在时返回 LunarDateNotFound
    fn lunar_to_solar(&self, lunar: &LunarDate) -> CalendarResult<NaiveDate>;

    /// 公历 → 农历
    fn solar_to_lunar(&self, date: NaiveDate) -> CalendarResult<LunarDate>;

    /// 指定时刻的八字
    fn eight_char(&self, instant: NaiveDateTime) -> CalendarResult<EightChar>;

    /// 大运序列（gender_code: 1 = 男, 0 = 女）
    ///
    /// 首项可以是干支为空串的占位项。
    fn decennial_cycles(
        &self,
        instant: NaiveDateTime,
        gender_code: u8,
    ) -> CalendarResult<Vec<RawLuckCycle>>;

    /// 某公历年的流年干支（取该年农历六月十五所在农历年）
    fn year_pillar(&self, year: i32) -> CalendarResult<StemBranch>;
}
