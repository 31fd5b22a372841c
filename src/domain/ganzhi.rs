// ==========================================
// 八字排盘引擎 - 干支对
// ==========================================
// 六十甲子: 天干与地支同步轮转，序号 0 = 甲子
// ==========================================

use crate::domain::types::{Branch, Stem};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 六十甲子周期长度
pub const SEXAGENARY_CYCLE: usize = 60;

/// 干支对（不可变值）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StemBranch {
    pub stem: Stem,
    pub branch: Branch,
}

impl StemBranch {
    pub fn new(stem: Stem, branch: Branch) -> Self {
        Self { stem, branch }
    }

    /// 从六十甲子序号构造（负数与越界自动取模）
    pub fn from_cycle_index(index: i64) -> Self {
        let i = index.rem_euclid(SEXAGENARY_CYCLE as i64) as usize;
        Self {
            stem: Stem::from_index(i),
            branch: Branch::from_index(i),
        }
    }

    /// 六十甲子序号
    ///
    /// 天干序号 s 与地支序号 b 奇偶必然一致，序号 i 满足
    /// i ≡ s (mod 10) 且 i ≡ b (mod 12)。
    /// 对阴阳不匹配的组合（如 甲丑），返回 None。
    pub fn cycle_index(self) -> Option<usize> {
        let s = self.stem.index();
        let b = self.branch.index();
        (0..SEXAGENARY_CYCLE).find(|i| i % 10 == s && i % 12 == b)
    }

    /// 在六十甲子中前后移动
    pub fn offset(self, steps: i64) -> Option<Self> {
        self.cycle_index()
            .map(|i| StemBranch::from_cycle_index(i as i64 + steps))
    }
}

impl fmt::Display for StemBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem, self.branch)
    }
}

impl FromStr for StemBranch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.len() != 2 {
            return Err(format!("干支格式无效: '{}'", s));
        }
        let stem = Stem::from_char(chars[0]).ok_or_else(|| format!("未知天干: {}", chars[0]))?;
        let branch =
            Branch::from_char(chars[1]).ok_or_else(|| format!("未知地支: {}", chars[1]))?;
        Ok(Self { stem, branch })
    }
}
