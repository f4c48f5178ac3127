//! Screen navigation as a pure state machine.
//!
//! `Session::apply` consumes the current session and an action and returns
//! the next session. Actions that are not legal from the current screen come
//! back as [`Outcome::Ignored`] with the session untouched.

use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;
use crate::registration::DisplayName;
use crate::report::{ReportData, ReportKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Unregistered,
    Home,
    Report(ReportKind),
    Success,
    Profile,
}

#[derive(Debug)]
pub enum Action {
    Register(DisplayName),
    Restore { name: DisplayName, points: u32 },
    OpenReport(ReportKind),
    Back,
    Submit(Box<ReportData>),
    ReturnHome,
    OpenProfile,
    CloseProfile,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Register(_) => "register",
            Self::Restore { .. } => "restore",
            Self::OpenReport(_) => "open_report",
            Self::Back => "back",
            Self::Submit(_) => "submit",
            Self::ReturnHome => "return_home",
            Self::OpenProfile => "open_profile",
            Self::CloseProfile => "close_profile",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored,
}

/// Points earned by the most recent submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Award {
    pub kind: ReportKind,
    pub points: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    screen: Screen,
    profile: Option<UserProfile>,
    last_award: Option<Award>,
}

impl Session {
    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn last_award(&self) -> Option<Award> {
        self.last_award
    }

    /// The report behind the success screen.
    pub fn last_report(&self) -> Option<&ReportData> {
        self.last_award?;
        self.profile.as_ref()?.history().first()
    }

    #[must_use]
    pub fn apply(self, action: Action) -> (Self, Outcome) {
        match (self.screen, action) {
            (Screen::Unregistered, Action::Register(name)) => (
                Self {
                    screen: Screen::Home,
                    profile: Some(UserProfile::register(name)),
                    last_award: None,
                },
                Outcome::Applied,
            ),

            (Screen::Unregistered, Action::Restore { name, points }) => (
                Self {
                    screen: Screen::Home,
                    profile: Some(UserProfile::with_points(name, points)),
                    last_award: None,
                },
                Outcome::Applied,
            ),

            (Screen::Home, Action::OpenReport(kind)) => {
                self.go_to(Screen::Report(kind))
            }

            (Screen::Report(_), Action::Back)
            | (Screen::Success, Action::ReturnHome)
            | (Screen::Profile, Action::CloseProfile) => self.go_to(Screen::Home),

            (Screen::Home, Action::OpenProfile) => self.go_to(Screen::Profile),

            (Screen::Report(kind), Action::Submit(report)) if report.kind() == kind => {
                let Self {
                    profile,
                    last_award,
                    screen,
                } = self;
                match profile {
                    Some(mut profile) => {
                        let points = profile.record_report(*report);
                        (
                            Self {
                                screen: Screen::Success,
                                profile: Some(profile),
                                last_award: Some(Award { kind, points }),
                            },
                            Outcome::Applied,
                        )
                    }
                    None => (
                        Self {
                            screen,
                            profile: None,
                            last_award,
                        },
                        Outcome::Ignored,
                    ),
                }
            }

            (_, _) => (self, Outcome::Ignored),
        }
    }

    fn go_to(self, screen: Screen) -> (Self, Outcome) {
        (Self { screen, ..self }, Outcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImagePayload, UnixTimeMs};
    use crate::profile::Rank;
    use crate::report::ReportDraft;

    fn name(s: &str) -> DisplayName {
        DisplayName::parse(s).unwrap()
    }

    fn report(kind: ReportKind, at: u64) -> Box<ReportData> {
        let mut draft = ReportDraft::new(kind);
        draft.select_image(ImagePayload::new(vec![1, 2, 3], "image/jpeg"), None).unwrap();
        draft.begin_submit().unwrap();
        Box::new(draft.into_report(UnixTimeMs(at)).unwrap())
    }

    fn run(session: Session, actions: Vec<Action>) -> Session {
        actions.into_iter().fold(session, |s, a| s.apply(a).0)
    }

    fn registered() -> Session {
        run(Session::default(), vec![Action::Register(name("Sopheap"))])
    }

    #[test]
    fn starts_unregistered() {
        let session = Session::default();
        assert_eq!(session.screen(), Screen::Unregistered);
        assert!(session.profile().is_none());
    }

    #[test]
    fn registration_enters_home_with_welcome_points() {
        let session = registered();
        assert_eq!(session.screen(), Screen::Home);
        let profile = session.profile().unwrap();
        assert_eq!(profile.points(), 50);
        assert_eq!(profile.rank(), Rank::NoviceGuardian);
    }

    #[test]
    fn restore_uses_the_supplied_points() {
        let (session, outcome) = Session::default().apply(Action::Restore {
            name: name("Visoth"),
            points: 1250,
        });
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(session.screen(), Screen::Home);
        assert_eq!(session.profile().unwrap().rank(), Rank::HeritageGuardian);
    }

    #[test]
    fn restore_after_registration_is_ignored() {
        let (session, outcome) = registered().apply(Action::Restore {
            name: name("Other"),
            points: 1250,
        });
        assert_eq!(outcome, Outcome::Ignored);
        assert_eq!(session.profile().unwrap().points(), 50);
    }

    #[test]
    fn scenario_points_and_rank() {
        let session = run(
            registered(),
            vec![
                Action::OpenReport(ReportKind::Finding),
                Action::Submit(report(ReportKind::Finding, 1)),
            ],
        );
        assert_eq!(session.screen(), Screen::Success);
        assert_eq!(session.profile().unwrap().points(), 550);
        assert_eq!(session.profile().unwrap().rank(), Rank::NoviceGuardian);
        assert_eq!(
            session.last_award(),
            Some(Award {
                kind: ReportKind::Finding,
                points: 500
            })
        );

        let session = run(
            session,
            vec![
                Action::ReturnHome,
                Action::OpenReport(ReportKind::Looting),
                Action::Submit(report(ReportKind::Looting, 2)),
            ],
        );
        let profile = session.profile().unwrap();
        assert_eq!(profile.points(), 1550);
        assert_eq!(profile.rank(), Rank::HeritageGuardian);
        assert_eq!(session.last_report().unwrap().timestamp(), UnixTimeMs(2));
    }

    #[test]
    fn back_returns_home_without_side_effects() {
        let session = run(
            registered(),
            vec![Action::OpenReport(ReportKind::Looting), Action::Back],
        );
        assert_eq!(session.screen(), Screen::Home);
        assert_eq!(session.profile().unwrap().points(), 50);
        assert!(session.profile().unwrap().history().is_empty());
    }

    #[test]
    fn profile_toggles_with_home() {
        let session = registered().apply(Action::OpenProfile).0;
        assert_eq!(session.screen(), Screen::Profile);
        let session = session.apply(Action::CloseProfile).0;
        assert_eq!(session.screen(), Screen::Home);
    }

    #[test]
    fn submit_of_other_kind_is_ignored() {
        let session = registered().apply(Action::OpenReport(ReportKind::Finding)).0;
        let (session, outcome) = session.apply(Action::Submit(report(ReportKind::Looting, 1)));
        assert_eq!(outcome, Outcome::Ignored);
        assert_eq!(session.screen(), Screen::Report(ReportKind::Finding));
        assert_eq!(session.profile().unwrap().points(), 50);
    }

    #[test]
    fn illegal_actions_are_ignored() {
        let cases: Vec<(Session, Action)> = vec![
            (Session::default(), Action::OpenReport(ReportKind::Finding)),
            (Session::default(), Action::OpenProfile),
            (registered(), Action::Register(name("Again"))),
            (registered(), Action::Back),
            (registered(), Action::ReturnHome),
            (registered(), Action::Submit(report(ReportKind::Finding, 1))),
            (
                registered().apply(Action::OpenProfile).0,
                Action::OpenReport(ReportKind::Finding),
            ),
        ];

        for (session, action) in cases {
            let label = action.name();
            let before = session.clone();
            let (after, outcome) = session.apply(action);
            assert_eq!(outcome, Outcome::Ignored, "{label} should be ignored");
            assert_eq!(after, before, "{label} changed the session");
        }
    }

    #[test]
    fn success_screen_only_leaves_to_home() {
        let session = run(
            registered(),
            vec![
                Action::OpenReport(ReportKind::Finding),
                Action::Submit(report(ReportKind::Finding, 1)),
            ],
        );
        let (session, outcome) = session.apply(Action::OpenProfile);
        assert_eq!(outcome, Outcome::Ignored);
        assert_eq!(session.screen(), Screen::Success);
    }
}
