// ==========================================
// 八字排盘引擎 - 十神判定
// ==========================================
// 规则: 五行关系（同我/我生/生我/我克/克我）× 阴阳异同
// ==========================================

use crate::domain::types::{Stem, TenGod};
use crate::engine::classifier::ElementRelation;

/// 目标天干相对日主的十神
pub fn resolve(day_master: Stem, target: Stem) -> TenGod {
    let same_polarity = day_master.is_yang() == target.is_yang();
    let relation = ElementRelation::between(day_master.element(), target.element());
    match (relation, same_polarity) {
        (ElementRelation::Same, true) => TenGod::Peer,
        (ElementRelation::Same, false) => TenGod::Rival,
        (ElementRelation::Output, true) => TenGod::OutputGentle,
        (ElementRelation::Output, false) => TenGod::OutputSharp,
        (ElementRelation::Resource, true) => TenGod::ResourceIndirect,
        (ElementRelation::Resource, false) => TenGod::ResourceDirect,
        (ElementRelation::Wealth, true) => TenGod::WealthIndirect,
        (ElementRelation::Wealth, false) => TenGod::WealthDirect,
        (ElementRelation::Authority, true) => TenGod::AuthorityHarsh,
        (ElementRelation::Authority, false) => TenGod::AuthorityProper,
    }
}
