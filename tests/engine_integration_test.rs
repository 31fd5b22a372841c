// ==========================================
// 排盘引擎集成测试
// ==========================================
// 测试目标: 端到端排盘结果的结构性质与典型场景
// ==========================================


use bazi_engine::calendar::ChineseCalendar;
use bazi_engine::config::EngineConfig;
use bazi_engine::domain::{Element, Gender, PillarRelation, Report, CHART_POSITIONS};
use bazi_engine::engine::{BaziEngine, EngineError};
use bazi_engine::logging;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use test_helpers::{lunar_input, scenario_a, solar_input, solar_time_input};

fn engine() -> BaziEngine<ChineseCalendar> {
    BaziEngine::default()
}

/// 与具体日期无关、对所有报告都成立的性质
fn assert_report_invariants(report: &Report) {
    // 五行计数和为 8
    assert_eq!(report.wuxing.scores.total(), u32::from(CHART_POSITIONS));

    // 缺失五行与计数一致
    for element in Element::ALL {
        let missing = report.wuxing.missing.contains(&element);
        assert_eq!(missing, report.wuxing.scores.count(element) == 0);
    }

    // 日柱十神固定为日主
    assert_eq!(report.chart.day.ten_god, PillarRelation::DayMaster);

    // 大运: 至多 8 步，起运岁数严格递增，分数在 [0,100]
    assert!(report.luck_pillars.len() <= 8);
    assert!(report
        .luck_pillars
        .windows(2)
        .all(|w| w[0].start_age < w[1].start_age && w[0].start_year < w[1].start_year));
    assert!(report.luck_pillars.iter().all(|p| (0..=100).contains(&p.score)));

    // 流年: 自首步大运起 80 年，分数在 [10,95]，虚岁非负
    if let Some(first) = report.luck_pillars.first() {
        assert_eq!(report.yearly_luck.len(), 80);
        assert_eq!(report.yearly_luck[0].year, first.start_year);
        assert!(report
            .yearly_luck
            .windows(2)
            .all(|w| w[1].year == w[0].year + 1));
    }
    assert!(report
        .yearly_luck
        .iter()
        .all(|p| (10..=95).contains(&p.score) && p.age >= 0));

    // 人生能量
    let energy = &report.life_energy;
    for v in energy.scores.as_array() {
        assert!((0..=100).contains(&v));
    }
    assert_eq!(
        energy.total_score,
        energy.scores.as_array().iter().sum::<i32>() / 5
    );
    assert!(!energy.description.is_empty());
    assert_eq!(energy.sub_scores.career, energy.scores.career);
    assert_eq!(energy.sub_scores.wealth, energy.scores.wealth);

    // 六段解读齐全
    assert!(report.analysis.is_complete());
}

// ==========================================
// 场景 A: 公历 2024-02-10 12:00 男
// ==========================================
#[test]
fn test_scenario_a_reference_chart() {
    let report = engine().calculate_seeded(&scenario_a(), 2024).unwrap();
    let chart = &report.chart;

    let pillars: Vec<String> = chart
        .pillars()
        .iter()
        .map(|p| format!("{}{}", p.stem, p.branch))
        .collect();
    assert_eq!(pillars, vec!["甲辰", "丙寅", "甲辰", "庚午"]);
    assert_eq!(chart.day_master_element, Element::Wood);
    assert_eq!(chart.lunar_date, "二〇二四年正月初一");

    // 木日主生于寅月（木）为身强
    assert!(report.day_master_strong);

    // 阳年男命顺排: 丁卯 起 2032 年 9 岁
    assert_eq!(report.luck_pillars.len(), 8);
    assert_eq!(report.luck_pillars[0].label(), "丁卯");
    assert_eq!(report.luck_pillars[0].start_year, 2032);
    assert_eq!(report.luck_pillars[0].start_age, 9);
    assert_eq!(report.luck_pillars[7].label(), "甲戌");

    // 流年首年 2032 壬子
    assert_eq!(report.yearly_luck[0].year, 2032);
    assert_eq!(report.yearly_luck[0].age, 9);
    assert_eq!(
        format!("{}{}", report.yearly_luck[0].stem, report.yearly_luck[0].branch),
        "壬子"
    );

    // 木3 火2 土2 金1 水0
    assert_eq!(report.wuxing.missing, vec![Element::Water]);
    assert_eq!(report.wuxing.strongest, Element::Wood);
    assert_eq!(report.wuxing.weakest, Element::Water);

    assert_report_invariants(&report);
}

#[test]
fn test_female_runs_backward() {
    let input = solar_input("李四", Gender::Female, "2024-02-10", "12:00");
    let report = engine().calculate_seeded(&input, 1).unwrap();
    assert_eq!(report.luck_pillars[0].label(), "乙丑");
    assert_eq!(report.luck_pillars[0].start_year, 2026);
    assert_eq!(report.luck_pillars[0].start_age, 3);
    assert_report_invariants(&report);
}

// ==========================================
// 场景 B: 农历日期不存在
// ==========================================
#[test]
fn test_scenario_b_nonexistent_lunar_day() {
    // 2024 年农历正月只有 29 天
    let input = lunar_input("王五", Gender::Male, "2024-01-30", "12:00");
    let err = engine().calculate_seeded(&input, 1).unwrap_err();

    match &err {
        EngineError::InvalidDate {
            year, month, day, ..
        } => {
            assert_eq!((*year, *month, *day), (2024, 1, 30));
        }
        other => panic!("期望 InvalidDate，实际 {:?}", other),
    }
    let message = err.to_string();
    assert!(message.contains("农历"));
    assert!(message.contains("29天"));
}

#[test]
fn test_lunar_input_ages_count_from_lunar_year() {
    // 农历 2023 年腊月二十 = 公历 2024-01-30
    let input = lunar_input("赵六", Gender::Male, "2023-12-20", "12:00");
    let report = engine().calculate_seeded(&input, 1).unwrap();
    assert!(report.chart.solar_date.starts_with("2024年1月30日"));

    let first = &report.yearly_luck[0];
    assert_eq!(first.age, first.year - 2023 + 1);
}

#[test]
fn test_nonexistent_solar_day_and_malformed_strings() {
    let engine = engine();
    for (date, time) in [
        ("2023-02-29", "12:00"),
        ("2023/02/01", "12:00"),
        ("2023-02-01", "noon"),
        ("2023-02-01", "12:60"),
    ] {
        let err = engine
            .calculate_seeded(&solar_input("x", Gender::Male, date, time), 1)
            .unwrap_err();
        assert!(err.is_invalid_date(), "{} {} -> {:?}", date, time, err);
    }
}

// ==========================================
// 场景 C: 真太阳时校正
// ==========================================
#[test]
fn test_scenario_c_solar_time_shifts_hour_pillar() {
    // 东经 135° 比 120° 快 1 小时: 12:00 → 13:00，时支由午变未
    let plain = engine()
        .calculate_seeded(&solar_input("校正", Gender::Male, "2024-02-10", "12:00"), 1)
        .unwrap();
    let corrected = engine()
        .calculate_seeded(&solar_time_input("2024-02-10", "12:00", 135.0), 1)
        .unwrap();

    assert_eq!(plain.chart.hour.branch.to_string(), "午");
    assert_eq!(corrected.chart.hour.branch.to_string(), "未");
    assert_eq!(corrected.chart.day, plain.chart.day);
    assert_eq!(corrected.chart.solar_date, "2024年2月10日 13时");
}

#[test]
fn test_out_of_range_longitude_is_rejected() {
    logging::init_test();
    for longitude in [1.0e20, -200.0, f64::NAN] {
        let err = engine()
            .calculate_seeded(&solar_time_input("2024-02-10", "12:00", longitude), 1)
            .unwrap_err();
        assert!(
            matches!(err, EngineError::MalformedInput { field: "longitude", .. }),
            "longitude {} gave {:?}",
            longitude,
            err
        );
    }
}

#[test]
fn test_longitude_ignored_when_correction_off() {
    let mut input = solar_time_input("2024-02-10", "12:00", 1.0e20);
    input.use_solar_time = false;
    let report = engine().calculate_seeded(&input, 1).unwrap();
    assert_eq!(report.chart.hour.branch.to_string(), "午");
}

#[test]
fn test_solar_time_flag_without_location_is_ignored() {
    let mut input = solar_input("校正", Gender::Male, "2024-02-10", "12:00");
    input.use_solar_time = true;
    let report = engine().calculate_seeded(&input, 1).unwrap();
    assert_eq!(report.chart.hour.branch.to_string(), "午");
}

// ==========================================
// 幂等性与随机源
// ==========================================
#[test]
fn test_same_seed_gives_byte_identical_json() {
    let engine = engine();
    let a = engine.calculate_seeded(&scenario_a(), 99).unwrap();
    let b = engine.calculate_seeded(&scenario_a(), 99).unwrap();
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn test_injected_rng_matches_seeded_entry() {
    let engine = engine();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let via_rng = engine.calculate(&scenario_a(), &mut rng).unwrap();
    let via_seed = engine.calculate_seeded(&scenario_a(), 5).unwrap();
    assert_eq!(via_rng, via_seed);
}

#[test]
fn test_seed_only_affects_scores() {
    let engine = engine();
    let a = engine.calculate_seeded(&scenario_a(), 1).unwrap();
    let b = engine.calculate_seeded(&scenario_a(), 2).unwrap();
    assert_eq!(a.chart, b.chart);
    assert_eq!(a.wuxing, b.wuxing);
    let labels = |r: &Report| r.luck_pillars.iter().map(|p| p.label()).collect::<Vec<_>>();
    assert_eq!(labels(&a), labels(&b));
}

// ==========================================
// 性质测试: 跨年份、性别、时辰
// ==========================================
#[test]
fn test_invariants_across_many_inputs() {
    let engine = engine();
    let mut seed = 0u64;
    for year in (1901..=2099).step_by(13) {
        for (month, day) in [(1, 3), (2, 4), (6, 21), (12, 31)] {
            for hour in [0, 11, 23] {
                for gender in [Gender::Male, Gender::Female] {
                    seed += 1;
                    let input = solar_input(
                        "性质",
                        gender,
                        &format!("{:04}-{:02}-{:02}", year, month, day),
                        &format!("{:02}:30", hour),
                    );
                    let report = engine
                        .calculate_seeded(&input, seed)
                        .unwrap_or_else(|e| panic!("{:?}: {}", input, e));
                    assert_report_invariants(&report);
                }
            }
        }
    }
}

#[test]
fn test_custom_config_limits() {
    let config = EngineConfig {
        max_luck_pillars: 4,
        yearly_span_years: 40,
        ..Default::default()
    };
    let engine = BaziEngine::new(ChineseCalendar::new(), &config);
    let report = engine.calculate_seeded(&scenario_a(), 3).unwrap();
    assert_eq!(report.luck_pillars.len(), 4);
    assert_eq!(report.yearly_luck.len(), 40);
    assert_eq!(report.yearly_luck.last().unwrap().year, 2071);
}
