// ==========================================
// 历法适配集成测试
// ==========================================
// 测试目标: 公农历往返、真太阳时偏移、流年干支、身强弱查表
// ==========================================


use bazi_engine::calendar::lunar_data::month_days;
use bazi_engine::calendar::{
    CalendarAdapter, CalendarError, CalendarProvider, CalendarRequest, ChineseCalendar, LunarDate,
};
use bazi_engine::domain::{Branch, Element};
use bazi_engine::engine::strength::is_strong;
use chrono::{Duration, NaiveDate};
use test_helpers::{solar_input, solar_time_input};

#[test]
fn test_lunar_round_trip_through_adapter() {
    let adapter = CalendarAdapter::new(ChineseCalendar::new());
    for year in (1901..=2099).step_by(7) {
        for month in 1..=12u32 {
            for day in [1, 15, month_days(year, month)] {
                let request = CalendarRequest {
                    year,
                    month,
                    day,
                    hour: 12,
                    minute: 0,
                    is_lunar: true,
                    use_solar_time: false,
                    longitude: None,
                };
                let moment = adapter.resolve(&request).unwrap();
                assert_eq!(
                    moment.lunar,
                    LunarDate::new(year, month, day),
                    "{}-{}-{}",
                    year,
                    month,
                    day
                );
            }
        }
    }
}

#[test]
fn test_solar_round_trip_every_tenth_day() {
    let calendar = ChineseCalendar::new();
    let mut date = NaiveDate::from_ymd_opt(1900, 2, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2100, 12, 1).unwrap();
    while date < end {
        let lunar = calendar.solar_to_lunar(date).unwrap();
        assert_eq!(calendar.lunar_to_solar(&lunar).unwrap(), date);
        date += Duration::days(10);
    }
}

#[test]
fn test_scenario_c_offset_is_one_hour() {
    let adapter = CalendarAdapter::new(ChineseCalendar::new());
    let request = CalendarRequest::from_input(&solar_time_input("2024-02-10", "12:00", 135.0)).unwrap();
    let moment = adapter.resolve(&request).unwrap();
    assert_eq!(moment.correction_seconds, 3600);
    assert_eq!((moment.solar - moment.civil).num_seconds(), 3600);
}

#[test]
fn test_west_of_meridian_shifts_backward() {
    let adapter = CalendarAdapter::new(ChineseCalendar::new());
    let request = CalendarRequest::from_input(&solar_time_input("2024-02-10", "12:00", 87.6)).unwrap();
    let moment = adapter.resolve(&request).unwrap();
    // (87.6 - 120) × 240 = -7776 秒
    assert_eq!(moment.correction_seconds, -7776);
}

#[test]
fn test_custom_meridian() {
    let adapter = CalendarAdapter::with_meridian(ChineseCalendar::new(), 135.0);
    let request = CalendarRequest::from_input(&solar_time_input("2024-02-10", "12:00", 135.0)).unwrap();
    assert_eq!(adapter.resolve(&request).unwrap().correction_seconds, 0);
}

#[test]
fn test_out_of_range_year() {
    let adapter = CalendarAdapter::new(ChineseCalendar::new());
    let request = CalendarRequest::from_input(&solar_input(
        "x",
        bazi_engine::domain::Gender::Male,
        "2150-06-01",
        "12:00",
    ))
    .unwrap();
    assert!(matches!(
        adapter.resolve(&request),
        Err(CalendarError::YearOutOfRange { .. })
    ));
}

#[test]
fn test_year_pillar_sequence() {
    let calendar = ChineseCalendar::new();
    assert_eq!(calendar.year_pillar(1984).unwrap().to_string(), "甲子");
    assert_eq!(calendar.year_pillar(2024).unwrap().to_string(), "甲辰");
    assert_eq!(calendar.year_pillar(2043).unwrap().to_string(), "癸亥");
    // 超出历表范围的年份仍可推算
    assert_eq!(calendar.year_pillar(2104).unwrap().to_string(), "甲子");
}

#[test]
fn test_scenario_d_wood_in_hai_month_is_strong() {
    assert!(is_strong(Element::Wood, Branch::Hai));
    assert!(!is_strong(Element::Wood, Branch::Shen));
}
