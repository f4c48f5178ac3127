//! Points, rank and the reward catalogue.
//!
//! Rank is never stored: it is derived from the current point total every
//! time it is read, so it cannot drift from the points it describes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::registration::DisplayName;
use crate::report::ReportData;

/// Points granted on registration.
pub const WELCOME_POINTS: u32 = 50;

/// Point total at which a user becomes a Heritage Guardian.
pub const GUARDIAN_THRESHOLD: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    NoviceGuardian,
    HeritageGuardian,
}

impl Rank {
    #[must_use]
    pub const fn for_points(points: u32) -> Self {
        if points >= GUARDIAN_THRESHOLD {
            Self::HeritageGuardian
        } else {
            Self::NoviceGuardian
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoviceGuardian => "Novice Guardian",
            Self::HeritageGuardian => "Heritage Guardian",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reward {
    pub title: &'static str,
    pub icon: &'static str,
    pub cost: u32,
}

impl Reward {
    #[must_use]
    pub const fn is_redeemable(&self, points: u32) -> bool {
        points >= self.cost
    }
}

/// Display order matches the profile screen.
pub const REWARDS: [Reward; 2] = [
    Reward {
        title: "Rice Sack (10kg)",
        icon: "rice",
        cost: 2000,
    },
    Reward {
        title: "Team T-Shirt",
        icon: "t-shirt",
        cost: 1000,
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    name: DisplayName,
    points: u32,
    history: Vec<ReportData>,
}

impl UserProfile {
    /// A freshly registered user.
    #[must_use]
    pub fn register(name: DisplayName) -> Self {
        Self::with_points(name, WELCOME_POINTS)
    }

    #[must_use]
    pub fn with_points(name: DisplayName, points: u32) -> Self {
        Self {
            name,
            points,
            history: Vec::new(),
        }
    }

    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn rank(&self) -> Rank {
        Rank::for_points(self.points)
    }

    /// Most recent first.
    pub fn history(&self) -> &[ReportData] {
        &self.history
    }

    /// Records a submitted report and returns the points it earned.
    pub fn record_report(&mut self, report: ReportData) -> u32 {
        let award = report.kind().profile().points;
        self.points = self.points.saturating_add(award);
        self.history.insert(0, report);
        award
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImagePayload, UnixTimeMs};
    use crate::report::{ReportDraft, ReportKind};
    use proptest::prelude::*;

    fn report(kind: ReportKind, at: u64) -> ReportData {
        let mut draft = ReportDraft::new(kind);
        draft.select_image(ImagePayload::new(vec![0xFF, 0xD8], "image/jpeg"), None).unwrap();
        draft.begin_submit().unwrap();
        draft.into_report(UnixTimeMs(at)).unwrap()
    }

    #[test]
    fn rank_labels() {
        assert_eq!(Rank::NoviceGuardian.label(), "Novice Guardian");
        assert_eq!(Rank::HeritageGuardian.to_string(), "Heritage Guardian");
    }

    #[test]
    fn rank_boundary() {
        assert_eq!(Rank::for_points(999), Rank::NoviceGuardian);
        assert_eq!(Rank::for_points(1000), Rank::HeritageGuardian);
        assert_eq!(Rank::for_points(0), Rank::NoviceGuardian);
    }

    #[test]
    fn registration_starts_with_welcome_points() {
        let user = UserProfile::register(DisplayName::parse("Sopheap").unwrap());
        assert_eq!(user.points(), 50);
        assert_eq!(user.rank(), Rank::NoviceGuardian);
        assert!(user.history().is_empty());
    }

    #[test]
    fn points_award_follows_report_kind() {
        let mut user = UserProfile::register(DisplayName::parse("Sopheap").unwrap());

        assert_eq!(user.record_report(report(ReportKind::Finding, 1)), 500);
        assert_eq!(user.points(), 550);
        assert_eq!(user.rank(), Rank::NoviceGuardian);

        assert_eq!(user.record_report(report(ReportKind::Looting, 2)), 1000);
        assert_eq!(user.points(), 1550);
        assert_eq!(user.rank(), Rank::HeritageGuardian);
    }

    #[test]
    fn history_is_most_recent_first() {
        let mut user = UserProfile::register(DisplayName::parse("Bopha").unwrap());
        user.record_report(report(ReportKind::Finding, 10));
        user.record_report(report(ReportKind::Looting, 20));

        let stamps: Vec<_> = user.history().iter().map(|r| r.timestamp().0).collect();
        assert_eq!(stamps, vec![20, 10]);
    }

    #[test]
    fn points_saturate_instead_of_wrapping() {
        let mut user = UserProfile::with_points(DisplayName::parse("Max").unwrap(), u32::MAX - 10);
        user.record_report(report(ReportKind::Looting, 1));
        assert_eq!(user.points(), u32::MAX);
    }

    #[test]
    fn rewards_unlock_at_their_cost() {
        let [rice, shirt] = REWARDS;
        assert!(!shirt.is_redeemable(999));
        assert!(shirt.is_redeemable(1000));
        assert!(!rice.is_redeemable(1999));
        assert!(rice.is_redeemable(2000));
    }

    proptest! {
        #[test]
        fn rank_is_a_pure_function_of_points(points in any::<u32>()) {
            let expected = if points >= 1000 { "Heritage Guardian" } else { "Novice Guardian" };
            prop_assert_eq!(Rank::for_points(points).label(), expected);
        }

        #[test]
        fn points_never_decrease(kinds in proptest::collection::vec(any::<bool>(), 0..20)) {
            let mut user = UserProfile::register(DisplayName::parse("Prop").unwrap());
            let mut previous = user.points();
            for (i, looting) in kinds.into_iter().enumerate() {
                let kind = if looting { ReportKind::Looting } else { ReportKind::Finding };
                user.record_report(report(kind, i as u64));
                prop_assert!(user.points() >= previous);
                prop_assert_eq!(user.rank(), Rank::for_points(user.points()));
                previous = user.points();
            }
        }
    }
}
