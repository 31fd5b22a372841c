use super::*;
use crate::calendar::EightChar;
use crate::domain::energy::ElementScoreMap;
use crate::domain::ganzhi::StemBranch;
use crate::domain::types::Gender;
use crate::engine::pillar_builder::PillarBuilder;
use crate::engine::wuxing;
use Element::*;

fn chart(pillars: &str) -> Chart {
    let p: Vec<StemBranch> = pillars
        .split_whitespace()
        .map(|s| s.parse().unwrap())
        .collect();
    let eight_char = EightChar {
        year: p[0],
        month: p[1],
        day: p[2],
        hour: p[3],
    };
    PillarBuilder::build_chart(&eight_char, Gender::Male, String::new(), String::new())
}

fn luck(scores: &[i32]) -> Vec<LuckPillar> {
    scores
        .iter()
        .enumerate()
        .map(|(i, score)| LuckPillar {
            stem: Stem::Jia,
            branch: Branch::Zi,
            start_age: 5 + 10 * i as i32,
            start_year: 2030 + 10 * i as i32,
            stem_element: Wood,
            branch_element: Water,
            score: *score,
        })
        .collect()
}

#[test]
fn test_favourable_elements() {
    assert_eq!(favourable_elements(Wood, true), vec![Earth, Metal, Fire]);
    assert_eq!(favourable_elements(Wood, false), vec![Water, Wood]);
    assert_eq!(favourable_elements(Metal, false), vec![Earth, Metal]);
    assert_eq!(
        unfavourable_elements(&favourable_elements(Wood, false)),
        vec![Fire, Earth, Metal]
    );
}

#[test]
fn test_vine_support() {
    // 年干透甲
    assert!(has_vine_support(&chart("甲辰 丙寅 乙巳 庚午")));
    // 地支见亥
    assert!(has_vine_support(&chart("庚申 丙戌 乙亥 壬午")));
    assert!(!has_vine_support(&chart("庚申 丙戌 乙巳 壬午")));
    // 非乙日主
    assert!(!has_vine_support(&chart("甲辰 丙寅 甲辰 庚午")));
}

#[test]
fn test_day_branch_clashes() {
    let c = chart("辛亥 丙申 乙巳 辛巳");
    let clashes = DayBranchClashes::of(&c);
    assert!(clashes.year);
    assert!(!clashes.month);
    assert!(!clashes.hour);
}

#[test]
fn test_wealth_pattern() {
    // 戊 为甲之偏财
    assert_eq!(
        wealth_pattern(&chart("甲辰 戊辰 甲子 丙寅"), true),
        WealthPattern::IndirectUsable
    );
    assert_eq!(
        wealth_pattern(&chart("甲辰 戊辰 甲子 丙寅"), false),
        WealthPattern::IndirectBurden
    );
    // 己 为甲之正财
    assert_eq!(
        wealth_pattern(&chart("甲子 己巳 甲子 丙寅"), false),
        WealthPattern::DirectSteady
    );
    assert_eq!(
        wealth_pattern(&chart("甲子 丙子 甲子 丙寅"), true),
        WealthPattern::SkillBased
    );
    assert_eq!(
        wealth_pattern(&chart("甲子 丙子 甲子 丙寅"), false),
        WealthPattern::Accumulating
    );
}

#[test]
fn test_main_qi_ten_god() {
    assert_eq!(main_qi_ten_god(Stem::Jia, Branch::Shen), Some(TenGod::AuthorityHarsh));
    assert_eq!(main_qi_ten_god(Stem::Jia, Branch::Wu), Some(TenGod::OutputSharp));
}

#[test]
fn test_late_luck_only_counts_from_fourth_cycle() {
    assert!(!has_late_luck(&luck(&[90, 90, 90, 60, 60])));
    assert!(has_late_luck(&luck(&[40, 40, 40, 40, 70])));
    assert!(!has_late_luck(&luck(&[80, 80])));
}

#[test]
fn test_dominant_conflict() {
    // 水4 木2 土2，金火为 0: 最旺水克最弱火
    let summary = wuxing::summarize(ElementScoreMap::from_elements([
        Water, Water, Water, Water, Wood, Wood, Earth, Earth,
    ]));
    assert_eq!(dominant_conflict(&summary), Some((Water, Fire)));

    let calm = wuxing::summarize(ElementScoreMap::from_elements([
        Wood, Fire, Earth, Metal, Water, Wood, Fire, Earth,
    ]));
    assert_eq!(dominant_conflict(&calm), None);
}

#[test]
fn test_seasonal_climate() {
    assert_eq!(seasonal_climate(Branch::Zi), SeasonalClimate::ColdDamp);
    assert_eq!(seasonal_climate(Branch::Wu), SeasonalClimate::HotDry);
    assert_eq!(seasonal_climate(Branch::Yin), SeasonalClimate::Mild);
}

#[test]
fn test_render_fills_every_section() {
    let c = chart("甲辰 丙寅 乙巳 庚午");
    let summary = wuxing::summarize(wuxing::count_elements(&c));
    let pillars = luck(&[60, 65, 70, 75, 80]);
    let ctx = NarrativeContext {
        chart: &c,
        wuxing: &summary,
        strong: true,
        luck_pillars: &pillars,
    };
    let sections = DefaultNarrative.render(&ctx);

    assert!(sections.is_complete());
    assert!(sections.career.iter().any(|l| l.contains("藤萝系甲")));
    assert!(sections.personality[0].contains('乙'));
    assert!(sections.life_message.iter().any(|l| l.contains("先抑后扬")));
}

#[test]
fn test_render_weak_chart_without_late_luck() {
    let c = chart("庚申 丙戌 甲子 壬申");
    let summary = wuxing::summarize(wuxing::count_elements(&c));
    let pillars = luck(&[50, 50, 50, 50]);
    let ctx = NarrativeContext {
        chart: &c,
        wuxing: &summary,
        strong: false,
        luck_pillars: &pillars,
    };
    let sections = DefaultNarrative.render(&ctx);

    assert!(sections.is_complete());
    assert!(sections.career.iter().any(|l| l.contains("借力")));
    assert!(sections.life_message.iter().any(|l| l.contains("起伏平缓")));
    // 身弱木日主首喜水
    assert!(sections.advice.iter().any(|l| l.contains("北方")));
}
