// ==========================================
// 八字排盘引擎 - 排柱
// ==========================================
// 输入: 八字（四组干支）+ 展示用日期串 + 性别
// 输出: Chart（四柱 + 日主）
// 日柱十神固定为"日主"，不参与判定
// ==========================================

use crate::calendar::EightChar;
use crate::domain::chart::{Chart, Pillar};
use crate::domain::ganzhi::StemBranch;
use crate::domain::types::{Gender, PillarRelation, Stem};
use crate::engine::ten_gods;
use tracing::debug;

pub struct PillarBuilder;

impl PillarBuilder {
    /// 单柱
    pub fn build_pillar(pair: StemBranch, day_master: Stem) -> Pillar {
        let hidden_stems = pair.branch.hidden_stems().to_vec();
        let hidden_ten_gods = hidden_stems
            .iter()
            .map(|s| ten_gods::resolve(day_master, *s))
            .collect();
        Pillar {
            stem: pair.stem,
            branch: pair.branch,
            ten_god: PillarRelation::God(ten_gods::resolve(day_master, pair.stem)),
            hidden_stems,
            hidden_ten_gods,
            element_label: format!("{}{}", pair.stem.element(), pair.branch.element()),
        }
    }

    /// 四柱命盘
    pub fn build_chart(
        eight_char: &EightChar,
        gender: Gender,
        solar_date: String,
        lunar_date: String,
    ) -> Chart {
        let day_master = eight_char.day.stem;

        let mut day = Self::build_pillar(eight_char.day, day_master);
        day.ten_god = PillarRelation::DayMaster;

        let chart = Chart {
            year: Self::build_pillar(eight_char.year, day_master),
            month: Self::build_pillar(eight_char.month, day_master),
            day,
            hour: Self::build_pillar(eight_char.hour, day_master),
            day_master,
            day_master_element: day_master.element(),
            gender,
            solar_date,
            lunar_date,
        };

        debug!(
            year = %eight_char.year,
            month = %eight_char.month,
            day = %eight_char.day,
            hour = %eight_char.hour,
            day_master = %day_master,
            "四柱排定"
        );
        chart
    }
}
