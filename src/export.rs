// ==========================================
// 八字排盘引擎 - 数据导出
// ==========================================
// 大运与流年序列导出为 CSV，供图表工具使用
// 表头为英文列名，干支与五行保持汉字
// ==========================================

use crate::domain::luck::{LuckPillar, YearlyLuckPoint};
use crate::domain::report::Report;
use crate::domain::types::Element;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const LUCK_PILLARS_FILE: &str = "luck_pillars.csv";
pub const YEARLY_LUCK_FILE: &str = "yearly_luck.csv";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize)]
struct LuckPillarRow {
    start_age: i32,
    start_year: i32,
    gan_zhi: String,
    stem_element: Element,
    branch_element: Element,
    score: i32,
}

impl From<&LuckPillar> for LuckPillarRow {
    fn from(p: &LuckPillar) -> Self {
        Self {
            start_age: p.start_age,
            start_year: p.start_year,
            gan_zhi: p.label(),
            stem_element: p.stem_element,
            branch_element: p.branch_element,
            score: p.score,
        }
    }
}

#[derive(Serialize)]
struct YearlyLuckRow<'a> {
    year: i32,
    age: i32,
    gan_zhi: String,
    score: i32,
    luck_pillar: &'a str,
}

impl<'a> From<&'a YearlyLuckPoint> for YearlyLuckRow<'a> {
    fn from(p: &'a YearlyLuckPoint) -> Self {
        Self {
            year: p.year,
            age: p.age,
            gan_zhi: format!("{}{}", p.stem, p.branch),
            score: p.score,
            luck_pillar: &p.luck_pillar,
        }
    }
}

pub fn write_luck_pillars<W: Write>(writer: W, pillars: &[LuckPillar]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for pillar in pillars {
        wtr.serialize(LuckPillarRow::from(pillar))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_yearly_luck<W: Write>(writer: W, points: &[YearlyLuckPoint]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for point in points {
        wtr.serialize(YearlyLuckRow::from(point))?;
    }
    wtr.flush()?;
    Ok(())
}

/// 在 dir 下写出 luck_pillars.csv 与 yearly_luck.csv
pub fn export_report_csv(report: &Report, dir: &Path) -> Result<(PathBuf, PathBuf), ExportError> {
    std::fs::create_dir_all(dir)?;
    let luck_path = dir.join(LUCK_PILLARS_FILE);
    let yearly_path = dir.join(YEARLY_LUCK_FILE);
    write_luck_pillars(File::create(&luck_path)?, &report.luck_pillars)?;
    write_yearly_luck(File::create(&yearly_path)?, &report.yearly_luck)?;
    Ok((luck_path, yearly_path))
}
