// ==========================================
// 历法层 - 节气（十二节）
// ==========================================
// 太阳视黄经: VSOP87 地球日心黄经截断级数（Meeus 附录 III 项数）
//             + FK5 修正 + 黄经章动 + 光行差
// ΔT: Espenak-Meeus 分段多项式
// 时刻: 北京时间 (UTC+8)
// 求解: 在估算日期 ±8 天窗口内对黄经差做二分，交节时刻误差约在半分钟内
// ==========================================

use crate::calendar::error::{CalendarError, CalendarResult};
use crate::domain::types::Branch;
use chrono::{DateTime, Datelike, NaiveDateTime};

/// J2000.0 儒略日
const J2000: f64 = 2_451_545.0;
/// Unix 纪元的儒略日
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const SECONDS_PER_DAY: f64 = 86_400.0;
/// 北京时间相对 UTC 的偏移（秒）
const BEIJING_OFFSET_SECONDS: i64 = 8 * 3600;
/// 太阳平均日行（度）
const MEAN_DAILY_MOTION: f64 = 0.985_647;
/// VSOP87 动力学黄道 → FK5 的黄经修正（角秒）
const FK5_CORRECTION_ARCSEC: f64 = 0.090_33;
/// 光行差常数（角秒，1 AU 处）
const ABERRATION_CONSTANT_ARCSEC: f64 = 20.489_8;
const SEARCH_HALF_WINDOW_DAYS: f64 = 8.0;
const BISECTION_STEPS: usize = 48;

// ==========================================
// Jie - 十二节（月令分界）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Jie {
    XiaoHan,   // 小寒
    LiChun,    // 立春
    JingZhe,   // 惊蛰
    QingMing,  // 清明
    LiXia,     // 立夏
    MangZhong, // 芒种
    XiaoShu,   // 小暑
    LiQiu,     // 立秋
    BaiLu,     // 白露
    HanLu,     // 寒露
    LiDong,    // 立冬
    DaXue,     // 大雪
}

impl Jie {
    /// 公历年内先后顺序
    pub const IN_YEAR_ORDER: [Jie; 12] = [
        Jie::XiaoHan,
        Jie::LiChun,
        Jie::JingZhe,
        Jie::QingMing,
        Jie::LiXia,
        Jie::MangZhong,
        Jie::XiaoShu,
        Jie::LiQiu,
        Jie::BaiLu,
        Jie::HanLu,
        Jie::LiDong,
        Jie::DaXue,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Jie::XiaoHan => "小寒",
            Jie::LiChun => "立春",
            Jie::JingZhe => "惊蛰",
            Jie::QingMing => "清明",
            Jie::LiXia => "立夏",
            Jie::MangZhong => "芒种",
            Jie::XiaoShu => "小暑",
            Jie::LiQiu => "立秋",
            Jie::BaiLu => "白露",
            Jie::HanLu => "寒露",
            Jie::LiDong => "立冬",
            Jie::DaXue => "大雪",
        }
    }

    /// 太阳视黄经（度）
    pub fn longitude(self) -> f64 {
        match self {
            Jie::XiaoHan => 285.0,
            Jie::LiChun => 315.0,
            Jie::JingZhe => 345.0,
            Jie::QingMing => 15.0,
            Jie::LiXia => 45.0,
            Jie::MangZhong => 75.0,
            Jie::XiaoShu => 105.0,
            Jie::LiQiu => 135.0,
            Jie::BaiLu => 165.0,
            Jie::HanLu => 195.0,
            Jie::LiDong => 225.0,
            Jie::DaXue => 255.0,
        }
    }

    /// 此节开始的月令地支
    pub fn month_branch(self) -> Branch {
        match self {
            Jie::XiaoHan => Branch::Chou,
            Jie::LiChun => Branch::Yin,
            Jie::JingZhe => Branch::Mao,
            Jie::QingMing => Branch::Chen,
            Jie::LiXia => Branch::Si,
            Jie::MangZhong => Branch::Wu,
            Jie::XiaoShu => Branch::Wei,
            Jie::LiQiu => Branch::Shen,
            Jie::BaiLu => Branch::You,
            Jie::HanLu => Branch::Xu,
            Jie::LiDong => Branch::Hai,
            Jie::DaXue => Branch::Zi,
        }
    }
}

/// 将角度规约到 (-180, 180]
pub fn normalize_to_pm180(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    if r > 180.0 {
        r - 360.0
    } else {
        r
    }
}

/// ΔT = TT - UT（秒），Espenak-Meeus 分段多项式
pub fn delta_t_seconds(year: f64) -> f64 {
    let y = year;
    if y < 1900.0 {
        let u = (y - 1820.0) / 100.0;
        return -20.0 + 32.0 * u * u;
    }
    if y < 1920.0 {
        let t = y - 1900.0;
        return -2.79 + 1.494119 * t - 0.0598939 * t.powi(2) + 0.0061966 * t.powi(3)
            - 0.000197 * t.powi(4);
    }
    if y < 1941.0 {
        let t = y - 1920.0;
        return 21.20 + 0.84493 * t - 0.076100 * t.powi(2) + 0.0020936 * t.powi(3);
    }
    if y < 1961.0 {
        let t = y - 1950.0;
        return 29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0;
    }
    if y < 1986.0 {
        let t = y - 1975.0;
        return 45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0;
    }
    if y < 2005.0 {
        let t = y - 2000.0;
        return 63.86 + 0.3345 * t - 0.060374 * t.powi(2)
            + 0.0017275 * t.powi(3)
            + 0.000651814 * t.powi(4)
            + 0.00002373599 * t.powi(5);
    }
    if y < 2050.0 {
        let t = y - 2000.0;
        return 62.92 + 0.32217 * t + 0.005589 * t.powi(2);
    }
    let u = (y - 1820.0) / 100.0;
    if y < 2150.0 {
        return -20.0 + 32.0 * u * u - 0.5628 * (2150.0 - y);
    }
    -20.0 + 32.0 * u * u
}

/// 把 naive 时间按 UTC 解释，换算儒略日
fn julian_day_utc(dt: NaiveDateTime) -> f64 {
    let utc = dt.and_utc();
    let seconds = utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9;
    UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
}

/// 儒略日 (UT) → 北京时间
fn beijing_time_from_jd(jd_ut: f64) -> CalendarResult<NaiveDateTime> {
    let seconds = ((jd_ut - UNIX_EPOCH_JD) * SECONDS_PER_DAY).round() as i64;
    DateTime::from_timestamp(seconds + BEIJING_OFFSET_SECONDS, 0)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| CalendarError::Overflow(format!("儒略日 {}", jd_ut)))
}

// ==========================================
// VSOP87 截断级数（地球日心，J2000 黄道）
// ==========================================
// 每项 (A, B, C): A × cos(B + C × τ)，τ 为自 J2000 起的儒略千年数，
// 结果单位 1e-8 弧度（黄经）或 1e-8 AU（向径）

type VsopTerm = (f64, f64, f64);

const EARTH_L0: &[VsopTerm] = &[
    (175347046.0, 0.0, 0.0),
    (3341656.0, 4.6692568, 6283.07585),
    (34894.0, 4.6261, 12566.1517),
    (3497.0, 2.7441, 5753.3849),
    (3418.0, 2.8289, 3.5231),
    (3136.0, 3.6277, 77713.7715),
    (2676.0, 4.4181, 7860.4194),
    (2343.0, 6.1352, 3930.2097),
    (1324.0, 0.7425, 11506.7698),
    (1273.0, 2.0371, 529.691),
    (1199.0, 1.1096, 1577.3435),
    (990.0, 5.233, 5884.927),
    (902.0, 2.045, 26.298),
    (857.0, 3.508, 398.149),
    (780.0, 1.179, 5223.694),
    (753.0, 2.533, 5507.553),
    (505.0, 4.583, 18849.228),
    (492.0, 4.205, 775.523),
    (357.0, 2.92, 0.067),
    (317.0, 5.849, 11790.629),
    (284.0, 1.899, 796.298),
    (271.0, 0.315, 10977.079),
    (243.0, 0.345, 5486.778),
    (206.0, 4.806, 2544.314),
    (205.0, 1.869, 5573.143),
    (202.0, 2.458, 6069.777),
    (156.0, 0.833, 213.299),
    (132.0, 3.411, 2942.463),
    (126.0, 1.083, 20.775),
    (115.0, 0.645, 0.98),
    (103.0, 0.636, 4694.003),
    (102.0, 0.976, 15720.839),
    (102.0, 4.267, 7.114),
    (99.0, 6.21, 2146.17),
    (98.0, 0.68, 155.42),
    (86.0, 5.98, 161000.69),
    (85.0, 1.3, 6275.96),
    (85.0, 3.67, 71430.7),
    (80.0, 1.81, 17260.15),
    (79.0, 3.04, 12036.46),
    (75.0, 1.76, 5088.63),
    (74.0, 3.5, 3154.69),
    (74.0, 4.68, 801.82),
    (70.0, 0.83, 9437.76),
    (62.0, 3.98, 8827.39),
    (61.0, 1.82, 7084.9),
    (57.0, 2.78, 6286.6),
    (56.0, 4.39, 14143.5),
    (56.0, 3.47, 6279.55),
    (52.0, 0.19, 12139.55),
    (52.0, 1.33, 1748.02),
    (51.0, 0.28, 5856.48),
    (49.0, 0.49, 1194.45),
    (41.0, 5.37, 8429.24),
    (41.0, 2.4, 19651.05),
    (39.0, 6.17, 10447.39),
    (37.0, 6.04, 10213.29),
    (37.0, 2.57, 1059.38),
    (36.0, 1.71, 2352.87),
    (36.0, 1.78, 6812.77),
    (33.0, 0.59, 17789.85),
    (30.0, 0.44, 83996.85),
    (30.0, 2.74, 1349.87),
    (25.0, 3.16, 4690.48),
];
const EARTH_L1: &[VsopTerm] = &[
    (628331966747.0, 0.0, 0.0),
    (206059.0, 2.678235, 6283.07585),
    (4303.0, 2.6351, 12566.1517),
    (425.0, 1.59, 3.523),
    (119.0, 5.796, 26.298),
    (109.0, 2.966, 1577.344),
    (93.0, 2.59, 18849.23),
    (72.0, 1.14, 529.69),
    (68.0, 1.87, 398.15),
    (67.0, 4.41, 5507.55),
    (59.0, 2.89, 5223.69),
    (56.0, 2.17, 155.42),
    (45.0, 0.4, 796.3),
    (36.0, 0.47, 775.52),
    (29.0, 2.65, 7.11),
    (21.0, 5.34, 0.98),
    (19.0, 1.85, 5486.78),
    (19.0, 4.97, 213.3),
    (17.0, 2.99, 6275.96),
    (16.0, 0.03, 2544.31),
    (16.0, 1.43, 2146.17),
    (15.0, 1.21, 10977.08),
    (12.0, 2.83, 1748.02),
    (12.0, 3.26, 5088.63),
    (12.0, 5.27, 1194.45),
    (12.0, 2.08, 4694.0),
    (11.0, 0.77, 553.57),
    (10.0, 1.3, 6286.6),
    (10.0, 4.24, 1349.87),
    (9.0, 2.7, 242.73),
    (9.0, 5.64, 951.72),
    (8.0, 5.3, 2352.87),
    (6.0, 2.65, 9437.76),
    (6.0, 4.67, 4690.48),
];
const EARTH_L2: &[VsopTerm] = &[
    (52919.0, 0.0, 0.0),
    (8720.0, 1.0721, 6283.0758),
    (309.0, 0.867, 12566.152),
    (27.0, 0.05, 3.52),
    (16.0, 5.19, 26.3),
    (16.0, 3.68, 155.42),
    (10.0, 0.76, 18849.23),
    (9.0, 2.06, 77713.77),
    (7.0, 0.83, 775.52),
    (5.0, 4.66, 1577.34),
    (4.0, 1.03, 7.11),
    (4.0, 3.44, 5573.14),
    (3.0, 5.14, 796.3),
    (3.0, 6.05, 5507.55),
    (3.0, 1.19, 242.73),
    (3.0, 6.12, 529.69),
    (3.0, 0.31, 398.15),
    (3.0, 2.28, 553.57),
    (2.0, 4.38, 5223.69),
    (2.0, 3.75, 0.98),
];
const EARTH_L3: &[VsopTerm] = &[
    (289.0, 5.844, 6283.076),
    (35.0, 0.0, 0.0),
    (17.0, 5.49, 12566.15),
    (3.0, 5.2, 155.42),
    (1.0, 4.72, 3.52),
    (1.0, 5.3, 18849.23),
    (1.0, 5.97, 242.73),
];
const EARTH_L4: &[VsopTerm] = &[
    (114.0, 3.142, 0.0),
    (8.0, 4.13, 6283.08),
    (1.0, 3.84, 12566.15),
];
const EARTH_L5: &[VsopTerm] = &[
    (1.0, 3.14, 0.0),
];
const EARTH_R0: &[VsopTerm] = &[
    (100013989.0, 0.0, 0.0),
    (1670700.0, 3.0984635, 6283.07585),
    (13956.0, 3.05525, 12566.1517),
    (3084.0, 5.1985, 77713.7715),
    (1628.0, 1.1739, 5753.3849),
    (1576.0, 2.8469, 7860.4194),
    (925.0, 5.453, 11506.77),
    (542.0, 4.564, 3930.21),
    (472.0, 3.661, 5884.927),
    (346.0, 0.964, 5507.553),
    (329.0, 5.9, 5223.694),
    (307.0, 0.299, 5573.143),
    (243.0, 4.273, 11790.629),
    (212.0, 5.847, 1577.344),
    (186.0, 5.022, 10977.079),
    (175.0, 3.012, 18849.228),
    (110.0, 5.055, 5486.778),
    (98.0, 0.89, 6069.78),
    (86.0, 5.69, 15720.84),
    (86.0, 1.27, 161000.69),
    (65.0, 0.27, 17260.15),
    (63.0, 0.92, 529.69),
    (57.0, 2.01, 83996.85),
    (56.0, 5.24, 71430.7),
    (49.0, 3.25, 2544.31),
    (47.0, 2.58, 775.52),
    (45.0, 5.54, 9437.76),
    (43.0, 6.01, 6275.96),
    (39.0, 5.36, 4694.0),
    (38.0, 2.39, 8827.39),
    (37.0, 0.83, 19651.05),
    (37.0, 4.9, 12139.55),
    (36.0, 1.67, 12036.46),
    (35.0, 1.84, 2942.46),
    (33.0, 0.24, 7084.9),
    (32.0, 0.18, 5088.63),
    (32.0, 1.78, 398.15),
    (28.0, 1.21, 6286.6),
    (28.0, 1.9, 6279.55),
    (26.0, 4.59, 10447.39),
];
const EARTH_R1: &[VsopTerm] = &[
    (103019.0, 1.10749, 6283.07585),
    (1721.0, 1.0644, 12566.1517),
    (702.0, 3.142, 0.0),
    (32.0, 1.02, 18849.23),
    (31.0, 2.84, 5507.55),
    (25.0, 1.32, 5223.69),
    (18.0, 1.42, 1577.34),
    (10.0, 5.91, 10977.08),
    (9.0, 1.42, 6275.96),
    (9.0, 0.27, 5486.78),
];
const EARTH_R2: &[VsopTerm] = &[
    (4359.0, 5.7846, 6283.0758),
    (124.0, 5.579, 12566.152),
    (12.0, 3.14, 0.0),
    (9.0, 3.63, 77713.77),
    (6.0, 1.87, 5573.14),
    (3.0, 5.47, 18849.23),
];
const EARTH_R3: &[VsopTerm] = &[
    (145.0, 4.273, 6283.076),
    (7.0, 3.92, 12566.15),
];
const EARTH_R4: &[VsopTerm] = &[
    (4.0, 2.56, 6283.08),
];

fn series(terms: &[VsopTerm], tau: f64) -> f64 {
    terms.iter().map(|(a, b, c)| a * (b + c * tau).cos()).sum()
}

/// Σ series_i × τ^i，按霍纳法则
fn power_series(groups: &[&[VsopTerm]], tau: f64) -> f64 {
    groups
        .iter()
        .rev()
        .fold(0.0, |acc, terms| acc * tau + series(terms, tau))
        * 1e-8
}

/// 黄经章动（角秒），IAU 1980 主项
fn nutation_in_longitude_arcsec(t: f64) -> f64 {
    let omega = (125.044_52 - 1_934.136_261 * t).to_radians();
    let sun_mean = (280.466_5 + 36_000.769_8 * t).to_radians();
    let moon_mean = (218.316_5 + 481_267.881_3 * t).to_radians();
    -17.20 * omega.sin() - 1.32 * (2.0 * sun_mean).sin() - 0.23 * (2.0 * moon_mean).sin()
        + 0.21 * (2.0 * omega).sin()
}

/// 太阳视黄经（度，0-360），输入为力学时儒略日
pub fn sun_apparent_longitude(jd_tt: f64) -> f64 {
    let tau = (jd_tt - J2000) / 365_250.0;
    let earth_longitude = power_series(
        &[EARTH_L0, EARTH_L1, EARTH_L2, EARTH_L3, EARTH_L4, EARTH_L5],
        tau,
    );
    let radius = power_series(&[EARTH_R0, EARTH_R1, EARTH_R2, EARTH_R3, EARTH_R4], tau);

    // 地心太阳 = 日心地球 + 180°
    let geometric = earth_longitude.to_degrees() + 180.0 - FK5_CORRECTION_ARCSEC / 3600.0;
    let nutation = nutation_in_longitude_arcsec(tau * 10.0);
    let aberration = -ABERRATION_CONSTANT_ARCSEC / radius;
    (geometric + (nutation + aberration) / 3600.0).rem_euclid(360.0)
}

fn sun_longitude_at_ut(jd_ut: f64) -> f64 {
    // 年份粗估足够 ΔT 使用
    let year = 2000.0 + (jd_ut - J2000) / 365.25;
    sun_apparent_longitude(jd_ut + delta_t_seconds(year) / SECONDS_PER_DAY)
}

/// 指定公历年内某个节的交节时刻（北京时间）
pub fn jie_instant(year: i32, jie: Jie) -> CalendarResult<NaiveDateTime> {
    let not_found = || CalendarError::SolarTermNotFound {
        year,
        term: jie.name(),
    };

    // 以当年春分（约 3 月 20 日）为参照估算日期
    let equinox = chrono::NaiveDate::from_ymd_opt(year, 3, 20)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(not_found)?;
    let target = jie.longitude();
    // 小寒、立春、惊蛰在春分之前
    let ahead = if target >= 270.0 { target - 360.0 } else { target };
    let guess = julian_day_utc(equinox) + ahead / MEAN_DAILY_MOTION;

    let diff = |jd: f64| normalize_to_pm180(sun_longitude_at_ut(jd) - target);

    let mut lo = guess - SEARCH_HALF_WINDOW_DAYS;
    let mut hi = guess + SEARCH_HALF_WINDOW_DAYS;
    if !(diff(lo) < 0.0 && diff(hi) > 0.0) {
        return Err(not_found());
    }
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if diff(mid) < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    beijing_time_from_jd(0.5 * (lo + hi))
}

/// 某时刻前后的节: (上一个节及时刻, 下一个节及时刻)
///
/// 交节时刻本身算作"上一个节"。
pub fn surrounding_jie(
    instant: NaiveDateTime,
) -> CalendarResult<((Jie, NaiveDateTime), (Jie, NaiveDateTime))> {
    let year = instant.date().year();
    let mut terms = Vec::with_capacity(36);
    for y in (year - 1)..=(year + 1) {
        for jie in Jie::IN_YEAR_ORDER {
            terms.push((jie, jie_instant(y, jie)?));
        }
    }

    let next_pos = terms
        .iter()
        .position(|(_, at)| *at > instant)
        .ok_or_else(|| CalendarError::SolarTermNotFound {
            year: year + 1,
            term: Jie::DaXue.name(),
        })?;
    if next_pos == 0 {
        return Err(CalendarError::SolarTermNotFound {
            year: year - 1,
            term: Jie::XiaoHan.name(),
        });
    }
    Ok((terms[next_pos - 1], terms[next_pos]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, sec)
            .unwrap()
    }

    /// 交节时刻与参考值相差不超过一分钟
    fn assert_close(actual: NaiveDateTime, expected: NaiveDateTime) {
        let seconds = (actual - expected).num_seconds().abs();
        assert!(
            seconds <= 60,
            "actual {} expected {} ({} s apart)",
            actual,
            expected,
            seconds
        );
    }

    #[test]
    fn test_normalize_to_pm180() {
        assert_eq!(normalize_to_pm180(190.0), -170.0);
        assert_eq!(normalize_to_pm180(-190.0), 170.0);
        assert_eq!(normalize_to_pm180(360.0), 0.0);
    }

    #[test]
    fn test_sun_longitude_at_j2000() {
        // J2000.0 太阳视黄经约 280.37°
        let lon = sun_apparent_longitude(J2000);
        assert!((lon - 280.37).abs() < 0.01, "longitude {}", lon);
    }

    #[test]
    fn test_jie_instants_2024() {
        assert_close(jie_instant(2024, Jie::XiaoHan).unwrap(), at(2024, 1, 6, 4, 49, 9));
        assert_close(jie_instant(2024, Jie::LiChun).unwrap(), at(2024, 2, 4, 16, 26, 53));
        assert_close(jie_instant(2024, Jie::JingZhe).unwrap(), at(2024, 3, 5, 10, 22, 31));
        assert_close(jie_instant(2024, Jie::DaXue).unwrap(), at(2024, 12, 6, 23, 16, 47));
    }

    #[test]
    fn test_li_chun_across_decades() {
        assert_close(jie_instant(1950, Jie::LiChun).unwrap(), at(1950, 2, 4, 17, 20, 42));
        assert_close(jie_instant(1984, Jie::LiChun).unwrap(), at(1984, 2, 4, 23, 18, 47));
        assert_close(jie_instant(1990, Jie::LiChun).unwrap(), at(1990, 2, 4, 10, 14, 31));
        assert_close(jie_instant(2000, Jie::LiChun).unwrap(), at(2000, 2, 4, 20, 40, 24));
        assert_close(jie_instant(2022, Jie::LiChun).unwrap(), at(2022, 2, 4, 4, 50, 36));
        assert_close(jie_instant(2023, Jie::LiChun).unwrap(), at(2023, 2, 4, 10, 42, 21));
    }

    #[test]
    fn test_surrounding_jie() {
        let ((prev, _), (next, _)) = surrounding_jie(at(2024, 2, 10, 12, 0, 0)).unwrap();
        assert_eq!(prev, Jie::LiChun);
        assert_eq!(next, Jie::JingZhe);

        let ((prev, _), (next, _)) = surrounding_jie(at(2024, 1, 2, 0, 0, 0)).unwrap();
        assert_eq!(prev, Jie::DaXue);
        assert_eq!(next, Jie::XiaoHan);
    }

    #[test]
    fn test_delta_t_is_about_a_minute_now() {
        let dt = delta_t_seconds(2024.0);
        assert!((60.0..80.0).contains(&dt), "ΔT = {}", dt);
    }
}
