//! QA rank ladder. Ranks are derived from the cumulative squash count and never
//! stored on their own.

/// One milestone on the ladder. `id` is the tier identity used to detect rank-ups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankTier {
    pub id: u8,
    pub name: &'static str,
    pub min_bugs: u32,
    pub icon: &'static str, // glyph shown in the celebration badge
    pub accent: &'static str, // CSS colour for the glyph
}

/// Ascending by `min_bugs`.
pub const RANK_TIERS: &[RankTier] = &[
    RankTier { id: 1, name: "Junior Test Engineer", min_bugs: 1, icon: "🎓", accent: "#0ea5e9" },
    RankTier { id: 2, name: "Bug Reproduction Intern", min_bugs: 3, icon: "🐛", accent: "#10b981" },
    RankTier { id: 3, name: "Flaky Test Whisperer", min_bugs: 7, icon: "🪄", accent: "#a855f7" },
    RankTier { id: 4, name: "Automation Script Goblin", min_bugs: 15, icon: "🔨", accent: "#f97316" },
    RankTier { id: 5, name: "Regression Necromancer", min_bugs: 35, icon: "💀", accent: "#94a3b8" },
    RankTier { id: 6, name: "QA Chaos Wrangler", min_bugs: 80, icon: "🛡", accent: "#6366f1" },
    RankTier { id: 7, name: "Senior Defect Detective", min_bugs: 180, icon: "✨", accent: "#facc15" },
    RankTier { id: 8, name: "SDET of Doom Scenarios", min_bugs: 400, icon: "🔥", accent: "#ef4444" },
    RankTier { id: 9, name: "Principal Flaky Test Exorcist", min_bugs: 700, icon: "⚡", accent: "#2dd4bf" },
    RankTier { id: 10, name: "Legendary Production Firefighter", min_bugs: 1000, icon: "🏆", accent: "#fbbf24" },
];

/// Highest tier whose threshold is at or below `total`; `None` for a zero total.
pub fn rank_for_total(total: u32) -> Option<&'static RankTier> {
    if total == 0 {
        return None;
    }
    RANK_TIERS.iter().take_while(|tier| total >= tier.min_bugs).last()
}

/// Next tier still to unlock, if any.
pub fn next_rank(total: u32) -> Option<&'static RankTier> {
    RANK_TIERS.iter().find(|tier| tier.min_bugs > total)
}

/// Tier identity comparison; `None` counts as its own tier.
pub fn same_tier(a: Option<&RankTier>, b: Option<&RankTier>) -> bool {
    a.map(|t| t.id) == b.map(|t| t.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_total_has_no_rank() {
        assert!(rank_for_total(0).is_none());
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(rank_for_total(1).unwrap().name, "Junior Test Engineer");
        assert_eq!(rank_for_total(2).unwrap().name, "Junior Test Engineer");
        assert_eq!(rank_for_total(3).unwrap().name, "Bug Reproduction Intern");
        assert_eq!(rank_for_total(6).unwrap().name, "Bug Reproduction Intern");
        assert_eq!(rank_for_total(7).unwrap().name, "Flaky Test Whisperer");
    }

    #[test]
    fn top_tier_holds_for_huge_totals() {
        assert_eq!(rank_for_total(1000).unwrap().id, 10);
        assert_eq!(rank_for_total(u32::MAX).unwrap().id, 10);
    }

    #[test]
    fn rank_matches_highest_qualifying_threshold_everywhere() {
        for total in 0..1200u32 {
            let expected = RANK_TIERS.iter().filter(|t| t.min_bugs <= total).max_by_key(|t| t.min_bugs);
            assert_eq!(rank_for_total(total).map(|t| t.id), expected.map(|t| t.id), "total {}", total);
        }
    }

    #[test]
    fn next_rank_points_past_current() {
        assert_eq!(next_rank(0).unwrap().id, 1);
        assert_eq!(next_rank(5).unwrap().min_bugs, 7);
        assert!(next_rank(1000).is_none());
    }

    #[test]
    fn same_tier_compares_identity() {
        assert!(same_tier(None, None));
        assert!(same_tier(rank_for_total(3), rank_for_total(6)));
        assert!(!same_tier(None, rank_for_total(1)));
        assert!(!same_tier(rank_for_total(2), rank_for_total(3)));
    }
}
