//! Selecting the buffs that apply to a roll item

use crate::models::{Buff, RollItem, RollKind};

/// Whether a single buff applies to an item.
///
/// The buff must be active, have a non-empty effect, and at least one target
/// selecting the item by wildcard, exact name, or the item's category.
pub fn buff_applies(buff: &Buff, kind: RollKind, item: &RollItem) -> bool {
    if !buff.active || buff.effect.is_empty() {
        return false;
    }
    let category = item.category.as_deref().filter(|c| !c.is_empty());
    buff.targets.iter().any(|t| t.applies_to(kind, &item.name, category))
}

/// All buffs applying to an item, in buff-list order.
///
/// Each buff appears at most once no matter how many of its targets match.
///
/// # Example
///
/// ```
/// use jetpalette::matcher::matching_buffs;
/// use jetpalette::models::{Buff, RollItem, RollKind};
/// use jetpalette::target::Target;
///
/// let item = RollItem::new("武器A", "k20", Some("武器攻撃".into()));
/// let buffs = vec![
///     Buff::new("全判定", "+1", vec![Target::AllJudge], "#FFFFFF"),
///     Buff::new("武器", "+2", vec![Target::AttackCategory("武器攻撃".into())], "#FFFFFF"),
/// ];
/// let hits = matching_buffs(&buffs, RollKind::Attack, &item);
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].name, "武器");
/// ```
pub fn matching_buffs<'a>(buffs: &'a [Buff], kind: RollKind, item: &RollItem) -> Vec<&'a Buff> {
    buffs.iter().filter(|b| buff_applies(b, kind, item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Target;

    fn buff(name: &str, targets: Vec<Target>) -> Buff {
        Buff::new(name, "+1", targets, "#FFFFFF")
    }

    fn judge(name: &str, category: Option<&str>) -> RollItem {
        RollItem::new(name, "2d", category.map(String::from))
    }

    #[test]
    fn test_wildcard_matches_only_its_kind() {
        let buffs = vec![buff("j", vec![Target::AllJudge]), buff("a", vec![Target::AllAttack])];
        let hits = matching_buffs(&buffs, RollKind::Judge, &judge("x", None));
        assert_eq!(hits.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(), vec!["j"]);
    }

    #[test]
    fn test_exact_name() {
        let buffs = vec![buff("hit", vec![Target::Judge("命中".into())])];
        assert_eq!(matching_buffs(&buffs, RollKind::Judge, &judge("命中", None)).len(), 1);
        assert!(matching_buffs(&buffs, RollKind::Judge, &judge("回避", None)).is_empty());
        assert!(matching_buffs(&buffs, RollKind::Attack, &judge("命中", None)).is_empty());
    }

    #[test]
    fn test_category_requires_item_category() {
        let buffs = vec![buff("c", vec![Target::JudgeCategory("魔法".into())])];
        assert_eq!(matching_buffs(&buffs, RollKind::Judge, &judge("x", Some("魔法"))).len(), 1);
        assert!(matching_buffs(&buffs, RollKind::Judge, &judge("x", None)).is_empty());
        assert!(matching_buffs(&buffs, RollKind::Judge, &judge("x", Some("剣"))).is_empty());
    }

    #[test]
    fn test_empty_category_string_is_uncategorized() {
        let buffs = vec![buff("c", vec![Target::JudgeCategory(String::new())])];
        assert!(matching_buffs(&buffs, RollKind::Judge, &judge("x", Some(""))).is_empty());
    }

    #[test]
    fn test_inactive_and_empty_effect_skipped() {
        let mut off = buff("off", vec![Target::AllJudge]);
        off.active = false;
        let mut empty = buff("empty", vec![Target::AllJudge]);
        empty.effect.clear();
        let buffs = vec![off, empty];
        assert!(matching_buffs(&buffs, RollKind::Judge, &judge("x", None)).is_empty());
    }

    #[test]
    fn test_category_and_name_are_additive() {
        let buffs = vec![
            buff("by-cat", vec![Target::JudgeCategory("魔法".into())]),
            buff("by-name", vec![Target::Judge("x".into())]),
        ];
        let hits = matching_buffs(&buffs, RollKind::Judge, &judge("x", Some("魔法")));
        assert_eq!(hits.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(), vec!["by-cat", "by-name"]);
    }

    #[test]
    fn test_multiple_matching_targets_count_once() {
        let buffs = vec![buff(
            "both",
            vec![Target::AllJudge, Target::Judge("x".into()), Target::JudgeCategory("c".into())],
        )];
        assert_eq!(matching_buffs(&buffs, RollKind::Judge, &judge("x", Some("c"))).len(), 1);
    }

    #[test]
    fn test_preserves_list_order() {
        let buffs = vec![
            buff("3", vec![Target::AllJudge]),
            buff("1", vec![Target::AllJudge]),
            buff("2", vec![Target::AllJudge]),
        ];
        let hits = matching_buffs(&buffs, RollKind::Judge, &judge("x", None));
        assert_eq!(hits.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(), vec!["3", "1", "2"]);
    }

    #[test]
    fn test_none_target_never_matches() {
        let buffs = vec![buff("none", vec![Target::None])];
        assert!(matching_buffs(&buffs, RollKind::Judge, &judge("x", None)).is_empty());
    }
}
