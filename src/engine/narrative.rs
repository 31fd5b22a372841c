// ==========================================
// 八字排盘引擎 - 文字解读
// ==========================================
// 输入: 命盘、五行概要、身强弱、大运
// 输出: 六段文本（性格 / 事业 / 感情 / 健康 / 开运 / 寄语）
// 文案措辞可替换（NarrativeRenderer），参数选择逻辑在本模块以纯函数给出
// ==========================================

use crate::domain::chart::Chart;
use crate::domain::energy::WuxingSummary;
use crate::domain::luck::LuckPillar;
use crate::domain::report::AnalysisSections;
use crate::domain::types::{Branch, Element, Stem, TenGod};
use crate::engine::classifier::ElementRelation;
use crate::engine::ten_gods;

/// 晚运判定: 第四步及之后的大运中出现此分数以上
pub const LATE_LUCK_THRESHOLD: i32 = 70;
const LATE_LUCK_FROM_INDEX: usize = 3;

// ==========================================
// NarrativeContext / NarrativeRenderer
// ==========================================
pub struct NarrativeContext<'a> {
    pub chart: &'a Chart,
    pub wuxing: &'a WuxingSummary,
    pub strong: bool,
    pub luck_pillars: &'a [LuckPillar],
}

pub trait NarrativeRenderer: Send + Sync {
    fn render(&self, ctx: &NarrativeContext<'_>) -> AnalysisSections;
}

// ==========================================
// 参数选择（与措辞无关）
// ==========================================

/// 喜用五行: 身强取 财、官杀、食伤；身弱取 印、比劫。首位为主喜用
pub fn favourable_elements(me: Element, strong: bool) -> Vec<Element> {
    let relations: &[ElementRelation] = if strong {
        &[
            ElementRelation::Wealth,
            ElementRelation::Authority,
            ElementRelation::Output,
        ]
    } else {
        &[ElementRelation::Resource, ElementRelation::Same]
    };
    relations.iter().map(|r| r.element_for(me)).collect()
}

pub fn unfavourable_elements(favourable: &[Element]) -> Vec<Element> {
    Element::ALL
        .into_iter()
        .filter(|e| !favourable.contains(e))
        .collect()
}

/// 乙木日主见甲木（天干透甲，或地支有寅、亥）
pub fn has_vine_support(chart: &Chart) -> bool {
    if chart.day_master != Stem::Yi {
        return false;
    }
    let jia_visible = [&chart.year, &chart.month, &chart.hour]
        .iter()
        .any(|p| p.stem == Stem::Jia);
    let jia_rooted = chart
        .pillars()
        .iter()
        .any(|p| matches!(p.branch, Branch::Yin | Branch::Hai));
    jia_visible || jia_rooted
}

/// 日支与其他三柱地支的六冲
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayBranchClashes {
    pub year: bool,
    pub month: bool,
    pub hour: bool,
}

impl DayBranchClashes {
    pub fn of(chart: &Chart) -> Self {
        let clash = chart.day.branch.clash();
        Self {
            year: chart.year.branch == clash,
            month: chart.month.branch == clash,
            hour: chart.hour.branch == clash,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WealthPattern {
    IndirectUsable,   // 偏财 + 身强
    IndirectBurden,   // 偏财 + 身弱
    DirectSteady,     // 仅正财
    SkillBased,       // 无财星 + 身强
    Accumulating,     // 无财星 + 身弱
}

pub fn wealth_pattern(chart: &Chart, strong: bool) -> WealthPattern {
    let gods = chart.visible_ten_gods();
    let has_indirect = gods.contains(&TenGod::WealthIndirect);
    let has_wealth = gods.iter().any(|g| g.is_wealth());
    match (has_indirect, has_wealth, strong) {
        (true, _, true) => WealthPattern::IndirectUsable,
        (true, _, false) => WealthPattern::IndirectBurden,
        (false, true, _) => WealthPattern::DirectSteady,
        (false, false, true) => WealthPattern::SkillBased,
        (false, false, false) => WealthPattern::Accumulating,
    }
}

/// 某柱地支本气对日主的十神
pub fn main_qi_ten_god(day_master: Stem, branch: Branch) -> Option<TenGod> {
    branch
        .hidden_stems()
        .first()
        .map(|s| ten_gods::resolve(day_master, *s))
}

/// 第四步及之后的大运是否出现高分
pub fn has_late_luck(pillars: &[LuckPillar]) -> bool {
    pillars
        .iter()
        .skip(LATE_LUCK_FROM_INDEX)
        .any(|p| p.score >= LATE_LUCK_THRESHOLD)
}

/// 最旺克最弱（旺者 ≥3 且弱者 ≤1）时返回 (旺, 弱)
pub fn dominant_conflict(wuxing: &WuxingSummary) -> Option<(Element, Element)> {
    let strong = wuxing.strongest;
    let weak = wuxing.weakest;
    let conflict = wuxing.scores.count(strong) >= 3
        && wuxing.scores.count(weak) <= 1
        && strong.controls() == weak;
    conflict.then_some((strong, weak))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonalClimate {
    ColdDamp, // 亥子丑月
    HotDry,   // 巳午未月
    Mild,
}

pub fn seasonal_climate(month_branch: Branch) -> SeasonalClimate {
    match month_branch {
        Branch::Hai | Branch::Zi | Branch::Chou => SeasonalClimate::ColdDamp,
        Branch::Si | Branch::Wu | Branch::Wei => SeasonalClimate::HotDry,
        _ => SeasonalClimate::Mild,
    }
}

// ==========================================
// 文案表
// ==========================================

fn temperament(stem: Stem) -> &'static str {
    match stem {
        Stem::Jia => "甲木如参天之树，正直有担当，进取心强，认定的方向很难回头；短处是过刚，不肯弯腰。",
        Stem::Yi => "乙木如藤蔓花草，柔韧善变，懂得借势，心思细密有艺术感；短处是依赖心重，容易患得患失。",
        Stem::Bing => "丙火如当空烈日，热情坦荡，乐于分享，不记隔夜仇；短处是性子急，说话直来直去。",
        Stem::Ding => "丁火如灯下烛光，外柔内定，观察入微，重情重义；短处是思虑过多，容易自我消耗。",
        Stem::Wu => "戊土如厚重山岳，守信稳健，能扛事也能容人；短处是变通慢，有时错过时机。",
        Stem::Ji => "己土如田园沃土，温和细致，善于经营和照料；短处是心思深，不轻易交出信任。",
        Stem::Geng => "庚金如出鞘刀剑，果断利落，讲义气，执行力强；短处是锋芒外露，易伤人伤己。",
        Stem::Xin => "辛金如珠玉首饰，气质精致，自尊心强，追求体面；短处是敏感，小事也放在心上。",
        Stem::Ren => "壬水如奔流江河，思维敏捷，向往自由，胆子大；短处是耐性不足，情绪起伏大。",
        Stem::Gui => "癸水如春雨雨露，温柔含蓄，想象力丰富，润物无声；短处是容易悲观，情绪内收。",
    }
}

fn verse(stem: Stem) -> &'static str {
    match stem {
        Stem::Jia => "直干凌云立，风霜不改枝。",
        Stem::Yi => "柔藤依古木，随势上高枝。",
        Stem::Bing => "红轮悬碧落，万物尽沾光。",
        Stem::Ding => "一灯明暗室，幽处见真心。",
        Stem::Wu => "高岗承万物，默默镇四方。",
        Stem::Ji => "沃野含春意，耕耘自有时。",
        Stem::Geng => "寒锋初出匣，百炼始成钢。",
        Stem::Xin => "温润藏锋处，珠光自照人。",
        Stem::Ren => "长河奔远海，不舍昼与夜。",
        Stem::Gui => "细雨润无声，点滴入人心。",
    }
}

fn day_branch_relation(me: Element, branch_element: Element) -> &'static str {
    match ElementRelation::between(me, branch_element) {
        ElementRelation::Same => "干支同气，主见强，凡事倾向自己拿主意。",
        ElementRelation::Output => "日主生坐下，愿意为家人和伴侣付出。",
        ElementRelation::Resource => "坐下生日主，家庭与伴侣是可靠的后援。",
        ElementRelation::Wealth => "日主克坐下，在家中习惯掌握主导。",
        ElementRelation::Authority => "坐下克日主，责任心重，也较多受家庭牵制。",
    }
}

fn industries(e: Element) -> &'static str {
    match e {
        Element::Wood => "教育培训、医疗健康、园艺林业、家居设计、出版传媒",
        Element::Fire => "互联网、人工智能、能源、餐饮娱乐、美业、自媒体",
        Element::Earth => "地产建筑、农业、企业管理、仓储物流、收藏鉴定",
        Element::Metal => "金融投资、机械制造、法律、外科、珠宝、汽车交通",
        Element::Water => "外贸、旅游运输、环保、服务业、自由职业、营销策划",
    }
}

fn partner_type(e: Element) -> &'static str {
    match e {
        Element::Wood => "宜找积极向上、心地良善的伴侣，能像大树一样给您依靠。",
        Element::Fire => "宜找开朗热情、欣赏您才华的伴侣，能给生活添些亮色。",
        Element::Earth => "宜找诚实稳重、包容心强的伴侣，带来踏实的安全感。",
        Element::Metal => "宜找干练果断、有原则的伴侣，帮您理清生活中的取舍。",
        Element::Water => "宜找温和包容、善解人意的伴侣，能分担您的压力。",
    }
}

fn organs(e: Element) -> &'static str {
    match e {
        Element::Wood => "肝胆、神经、四肢",
        Element::Fire => "心脏、小肠、血液、眼睛",
        Element::Earth => "脾胃、消化、肌肉",
        Element::Metal => "肺、呼吸道、大肠、皮肤",
        Element::Water => "肾、膀胱、生殖系统、耳",
    }
}

fn symptoms(e: Element) -> &'static str {
    match e {
        Element::Wood => "焦虑失眠、肝气郁结、头痛、四肢外伤",
        Element::Fire => "心律不齐、血压波动、视力下降",
        Element::Earth => "消化不良、胃病、体重起伏",
        Element::Metal => "易感冒咳嗽、皮肤过敏、鼻炎",
        Element::Water => "腰膝酸软、水肿、畏寒",
    }
}

fn foods(e: Element) -> &'static str {
    match e {
        Element::Wood => "绿叶蔬菜、猕猴桃、绿茶",
        Element::Fire => "红枣、桂圆、红豆、羊肉",
        Element::Earth => "小米、南瓜、红薯、牛肉",
        Element::Metal => "白萝卜、梨、银耳、百合",
        Element::Water => "黑豆、黑芝麻、木耳、海产",
    }
}

fn wellness_keywords(e: Element) -> &'static str {
    match e {
        Element::Wood => "扶木疏肝",
        Element::Fire => "暖局补火",
        Element::Earth => "健脾固本",
        Element::Metal => "强金宣肺",
        Element::Water => "润燥补水",
    }
}

struct LuckyInfo {
    direction: &'static str,
    colour: &'static str,
    numbers: &'static str,
    items: &'static str,
    animals: &'static str,
}

fn lucky_info(e: Element) -> LuckyInfo {
    match e {
        Element::Wood => LuckyInfo {
            direction: "东方、东南方",
            colour: "绿色、青色",
            numbers: "3、8",
            items: "木质饰品、绿植",
            animals: "虎、兔",
        },
        Element::Fire => LuckyInfo {
            direction: "南方",
            colour: "红色、紫色",
            numbers: "2、7",
            items: "红绳、暖色灯具",
            animals: "蛇、马",
        },
        Element::Earth => LuckyInfo {
            direction: "东北、西南",
            colour: "黄色、棕色",
            numbers: "5、0",
            items: "玉石、陶瓷",
            animals: "龙、狗、牛、羊",
        },
        Element::Metal => LuckyInfo {
            direction: "西方、西北方",
            colour: "白色、金色",
            numbers: "4、9",
            items: "金属腕表、银饰",
            animals: "猴、鸡",
        },
        Element::Water => LuckyInfo {
            direction: "北方",
            colour: "黑色、蓝色",
            numbers: "1、6",
            items: "黑曜石、流水摆件",
            animals: "猪、鼠",
        },
    }
}

// ==========================================
// DefaultNarrative - 默认中文文案
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNarrative;

impl DefaultNarrative {
    fn personality(&self, ctx: &NarrativeContext<'_>) -> Vec<String> {
        let chart = ctx.chart;
        let me = chart.day_master_element;
        let day_branch_element = chart.day.branch.element();
        vec![
            format!("日主 {}{}", chart.day_master, me),
            "【性情】".to_string(),
            temperament(chart.day_master).to_string(),
            format!("【诗】{}", verse(chart.day_master)),
            "【日柱】".to_string(),
            format!(
                "日干 {} 属{}，日支 {} 属{}。{}",
                chart.day_master,
                me,
                chart.day.branch,
                day_branch_element,
                day_branch_relation(me, day_branch_element)
            ),
        ]
    }

    fn career(&self, ctx: &NarrativeContext<'_>, favourable: &[Element]) -> Vec<String> {
        let primary = favourable[0];
        let secondary = favourable.get(1).copied().unwrap_or(primary);

        let strategy = if has_vine_support(ctx.chart) {
            "【藤萝系甲】乙木得甲木为依托，适合与实力强的平台或伙伴深度合作，借势而上。"
        } else if !ctx.strong {
            "【借力】命局偏弱，不宜单打独斗。多考证书、多积累人脉，靠团队和平台补足自身。"
        } else {
            "【独当一面】命局偏旺，抗压与执行力强，适合开拓性工作或管理岗位，注意收敛锋芒。"
        };

        let wealth = match wealth_pattern(ctx.chart, ctx.strong) {
            WealthPattern::IndirectUsable => "【偏财可用】身强带偏财，有投资眼光，可适度经营副业或理财。",
            WealthPattern::IndirectBurden => "【财多身弱】偏财机会多而身弱难担，宜见好就收，合伙求财分担风险。",
            WealthPattern::DirectSteady => "【正财稳健】财源以薪资与本业为主，深耕主业，少碰投机。",
            WealthPattern::SkillBased => "【技艺生财】财星不显而身强，靠专业与才华换取收入。",
            WealthPattern::Accumulating => "【积少成多】财运靠积累，养成储蓄习惯，开源节流。",
        };

        vec![
            "【行业】".to_string(),
            format!(
                "首选五行属{}的行业，如{}；其次可考虑属{}的方向。",
                primary,
                industries(primary),
                secondary
            ),
            "【策略】".to_string(),
            strategy.to_string(),
            "【财运】".to_string(),
            wealth.to_string(),
        ]
    }

    fn love(&self, ctx: &NarrativeContext<'_>, favourable: &[Element]) -> Vec<String> {
        let chart = ctx.chart;
        let clashes = DayBranchClashes::of(chart);
        let clash_branch = chart.day.branch.clash();

        let mut lines = vec![
            "【择偶】".to_string(),
            partner_type(favourable[0]).to_string(),
        ];
        if has_vine_support(chart) {
            lines.push("伴侣往往也是您事业上的依靠。".to_string());
        }

        lines.push("【婚姻】".to_string());
        if clashes.month || clashes.year {
            lines.push(format!(
                "日支{}与{}相冲，夫妻宫不够安稳，需要双方有意识地经营。",
                chart.day.branch,
                if clashes.month { "月支" } else { "年支" }
            ));
        } else {
            lines.push("夫妻宫无明显冲克，平淡日子里多些仪式感。".to_string());
        }
        lines.push(
            match chart.day_master {
                Stem::Bing | Stem::Ding => "沟通上热情有余，急躁时先缓一缓再开口。",
                Stem::Jia | Stem::Yi | Stem::Wu | Stem::Ji => "您不善表达感受，婚姻里的沉默要主动打破。",
                _ => "保持坦诚交流，别让冷战消耗感情。",
            }
            .to_string(),
        );
        if clashes.month {
            lines.push("适当保留个人空间，可缓和冲的张力。".to_string());
        }
        lines.push(format!("逢{}年为感情考验之年，多些耐心。", clash_branch));

        lines.push("【家庭】".to_string());
        let mut parents = if clashes.month {
            "月柱逢冲，与父母聚少离多或管束较严。".to_string()
        } else {
            "月柱安稳，父母是可靠的后盾。".to_string()
        };
        if main_qi_ten_god(chart.day_master, chart.month.branch) == Some(TenGod::AuthorityHarsh) {
            parents.push_str("月令七杀，父母期望较高。");
        }
        lines.push(parents);

        let child_god = main_qi_ten_god(chart.day_master, chart.hour.branch);
        let children = match child_god {
            Some(g) if g.is_output() => "子女聪慧有才艺。",
            Some(g) if g.is_authority() => "子女个性强，或您管教偏严。",
            _ => "亲子关系平顺，晚年可享天伦。",
        };
        lines.push(format!(
            "时柱坐{}，{}",
            child_god.map(|g| g.label()).unwrap_or("-"),
            children
        ));
        lines
    }

    fn health(&self, ctx: &NarrativeContext<'_>, favourable: &[Element]) -> Vec<String> {
        let primary = favourable[0];
        let secondary = favourable.get(1).copied().unwrap_or(primary);
        let month = ctx.chart.month.branch;

        let mut lines = vec!["【体质】".to_string()];
        let conflict = dominant_conflict(ctx.wuxing);
        if let Some((s, w)) = conflict {
            lines.push(format!(
                "{}{}交战: {}旺克{}，{}易受累，留意{}。（{}主{}）",
                s,
                w,
                s,
                w,
                organs(w),
                symptoms(w),
                s,
                organs(s)
            ));
        }
        let climate = seasonal_climate(month);
        match climate {
            SeasonalClimate::ColdDamp => lines.push(format!(
                "生于{}月，水寒土湿，注意{}。",
                month,
                if month == Branch::Chou {
                    "脾胃虚寒"
                } else {
                    "肾气与体寒"
                }
            )),
            SeasonalClimate::HotDry => lines.push(format!(
                "生于{}月，火旺土燥，注意心火、睡眠与皮肤干燥。",
                month
            )),
            SeasonalClimate::Mild => {}
        }
        if conflict.is_none() && climate == SeasonalClimate::Mild {
            lines.push("五行流通，无明显冲克，换季时做好基础保养即可。".to_string());
        }

        let keywords: Vec<&str> = favourable.iter().map(|e| wellness_keywords(*e)).collect();
        lines.push(format!("【养生】{}", keywords.join("、")));
        lines.push(format!(
            "【饮食】多吃属{}、{}的食物，如{}。",
            primary,
            secondary,
            foods(primary)
        ));
        lines.push(
            match primary {
                Element::Fire => "少吃生冷寒凉。",
                Element::Water => "少吃辛辣燥热。",
                _ => "饮食清淡，少吃加工食品。",
            }
            .to_string(),
        );
        lines.push(
            match primary {
                Element::Fire | Element::Wood => "【运动】慢跑、羽毛球等能出汗的运动，多晒太阳。",
                Element::Water | Element::Metal => "【运动】游泳、太极、散步等舒缓运动。",
                Element::Earth => "【运动】徒步、爬山、园艺。",
            }
            .to_string(),
        );
        lines.push(
            match ctx.wuxing.weakest {
                Element::Wood => "【情志】木弱，少生闷气，学会疏导。",
                Element::Fire => "【情志】火弱，易焦虑，可练习冥想。",
                Element::Earth => "【情志】土弱，思虑重，多去户外。",
                Element::Metal => "【情志】金弱，易伤感，秋季尤需调节。",
                Element::Water => "【情志】水弱，安全感不足，多晒太阳增自信。",
            }
            .to_string(),
        );
        lines
    }

    fn advice(&self, favourable: &[Element]) -> Vec<String> {
        let primary = favourable[0];
        let unfavourable = unfavourable_elements(favourable);

        let mut lines = vec!["【吉方】".to_string()];
        lines.extend(
            favourable
                .iter()
                .map(|e| format!("{}（{}）", lucky_info(*e).direction, e)),
        );
        lines.push("【避方】".to_string());
        lines.extend(
            unfavourable
                .iter()
                .map(|e| format!("{}（{}）", lucky_info(*e).direction, e)),
        );
        lines.push("【幸运色】".to_string());
        lines.extend(favourable.iter().map(|e| {
            format!(
                "{}（{}）{}",
                lucky_info(*e).colour,
                e,
                if *e == primary { "首选" } else { "次选" }
            )
        }));
        lines.push("【忌用色】".to_string());
        lines.extend(
            unfavourable
                .iter()
                .map(|e| format!("{}（{}）", lucky_info(*e).colour, e)),
        );
        lines.push("【幸运数字】".to_string());
        lines.extend(
            favourable
                .iter()
                .map(|e| format!("{}（{}）", lucky_info(*e).numbers, e)),
        );
        let info = lucky_info(primary);
        lines.push(format!("【饰品】{}；生肖: {}", info.items, info.animals));
        lines.push(format!("家中{}可摆放{}，助旺{}。", info.direction, info.items, primary));
        lines
    }

    fn life_message(&self, ctx: &NarrativeContext<'_>, favourable: &[Element]) -> Vec<String> {
        let primary = favourable[0];
        let me = ctx.chart.day_master_element;
        let flow = if has_late_luck(ctx.luck_pillars) {
            "命盘先抑后扬，早年的磨砺是在蓄力，中晚年渐入佳境。"
        } else {
            "命盘起伏平缓，顺境不骄，逆境不馁，自有节奏。"
        };
        let nature = if ctx.strong {
            format!("元神旺如{}之势，刚毅自强，这股韧劲是成事之本。", me)
        } else {
            format!("元神柔如{}之质，内敛含蓄，以柔克刚是您的智慧。", me)
        };
        vec![
            "【寄语】".to_string(),
            flow.to_string(),
            nature,
            format!(
                "以「{}」为机缘，多往{}走动，多亲近{}。",
                primary,
                lucky_info(primary).direction,
                lucky_info(primary).colour
            ),
            "知命而不认命，愿您行稳致远。".to_string(),
        ]
    }
}

impl NarrativeRenderer for DefaultNarrative {
    fn render(&self, ctx: &NarrativeContext<'_>) -> AnalysisSections {
        let favourable = favourable_elements(ctx.chart.day_master_element, ctx.strong);
        AnalysisSections {
            personality: self.personality(ctx),
            career: self.career(ctx, &favourable),
            love: self.love(ctx, &favourable),
            health: self.health(ctx, &favourable),
            advice: self.advice(&favourable),
            life_message: self.life_message(ctx, &favourable),
        }
    }
}

#[cfg(test)]
mod tests;
