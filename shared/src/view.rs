use serde::{Deserialize, Serialize};

use crate::error::{Notice, NoticeKind};
use crate::model::Model;
use crate::profile::{Rank, REWARDS};
use crate::report::{Accent, ButtonStyle, Organization, ReportDraft};
use crate::session::Screen;

pub const THANK_YOU_TITLE: &str = "Thank You!";
pub const THANK_YOU_MESSAGE: &str =
    "Your report helps us preserve Cambodia's history. The authorities have been notified.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityItem {
    pub title: String,
    pub time: String,
    pub user: String,
    pub initial: String,
}

// Static showcase feed; nothing here comes from real reports.
const COMMUNITY_ACTIVITY: [(&str, &str, &str); 3] = [
    ("Pottery fragments near stream", "25m ago", "Bopha"),
    ("Looting pit spotted at midnight", "3h ago", "Sambath"),
    ("Overgrown temple entrance found", "1d ago", "Visoth"),
];

fn community_activity() -> Vec<ActivityItem> {
    COMMUNITY_ACTIVITY
        .iter()
        .map(|&(title, time, user)| ActivityItem {
            title: title.to_string(),
            time: time.to_string(),
            user: user.to_string(),
            initial: user.chars().take(1).collect(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizationView {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

impl From<&Organization> for OrganizationView {
    fn from(org: &Organization) -> Self {
        Self {
            id: org.id.to_string(),
            name: org.name.clone(),
            selected: org.selected,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RewardView {
    pub title: String,
    pub icon: String,
    pub cost: u32,
    pub redeemable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ScreenView {
    Registration {
        name: String,
        can_submit: bool,
    },
    Home {
        greeting: String,
        points: u32,
        activity: Vec<ActivityItem>,
    },
    Report {
        header: String,
        accent: Accent,
        submit_style: ButtonStyle,
        has_image: bool,
        preview_uri: Option<String>,
        can_analyze: bool,
        is_analyzing: bool,
        location_text: String,
        location_ok: bool,
        description: String,
        organizations: Vec<OrganizationView>,
        is_submitting: bool,
    },
    Success {
        title: String,
        message: String,
        points_earned: u32,
    },
    Profile {
        name: String,
        initial: String,
        rank: Rank,
        rank_label: String,
        points: u32,
        report_count: usize,
        rewards: Vec<RewardView>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoticeView {
    pub message: String,
    pub kind: NoticeKind,
}

impl From<&Notice> for NoticeView {
    fn from(notice: &Notice) -> Self {
        Self {
            message: notice.message.clone(),
            kind: notice.kind,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub screen: ScreenView,
    pub notice: Option<NoticeView>,
}

impl ViewModel {
    pub fn build(model: &Model) -> Self {
        Self {
            screen: screen_view(model),
            notice: model.notice.as_ref().map(NoticeView::from),
        }
    }
}

fn registration_view(model: &Model) -> ScreenView {
    ScreenView::Registration {
        name: model.registration.name.clone(),
        can_submit: model.registration.can_submit(),
    }
}

fn screen_view(model: &Model) -> ScreenView {
    let session = &model.session;
    // Every screen past registration has a profile; fall back to the form if not.
    let Some(profile) = session.profile() else {
        return registration_view(model);
    };

    match session.screen() {
        Screen::Unregistered => registration_view(model),
        Screen::Home => ScreenView::Home {
            greeting: format!("Welcome, {}", profile.name()),
            points: profile.points(),
            activity: community_activity(),
        },
        Screen::Report(_) => match &model.draft {
            Some(draft) => report_view(draft),
            None => ScreenView::Home {
                greeting: format!("Welcome, {}", profile.name()),
                points: profile.points(),
                activity: community_activity(),
            },
        },
        Screen::Success => ScreenView::Success {
            title: THANK_YOU_TITLE.to_string(),
            message: THANK_YOU_MESSAGE.to_string(),
            points_earned: session.last_award().map_or(0, |award| award.points),
        },
        Screen::Profile => {
            let points = profile.points();
            let rank = profile.rank();
            ScreenView::Profile {
                name: profile.name().to_string(),
                initial: profile.name().initial(),
                rank,
                rank_label: rank.label().to_string(),
                points,
                report_count: profile.history().len(),
                rewards: REWARDS
                    .iter()
                    .map(|reward| RewardView {
                        title: reward.title.to_string(),
                        icon: reward.icon.to_string(),
                        cost: reward.cost,
                        redeemable: reward.is_redeemable(points),
                    })
                    .collect(),
            }
        }
    }
}

fn report_view(draft: &ReportDraft) -> ScreenView {
    let kind = draft.kind().profile();
    ScreenView::Report {
        header: kind.header.to_string(),
        accent: kind.accent,
        submit_style: kind.submit_style,
        has_image: draft.image().is_some(),
        preview_uri: draft.preview().map(|p| p.data_uri.clone()),
        can_analyze: draft.can_analyze(),
        is_analyzing: draft.is_analyzing(),
        location_text: draft.location().text(),
        location_ok: draft.location().coordinates().is_some(),
        description: draft.description().to_string(),
        organizations: draft
            .organizations()
            .iter()
            .map(OrganizationView::from)
            .collect(),
        is_submitting: draft.is_submitting(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::DisplayName;
    use crate::report::ReportKind;
    use crate::session::Action;

    fn registered(name: &str) -> Model {
        let mut model = Model::default();
        let session = std::mem::take(&mut model.session);
        let (session, _) = session.apply(Action::Register(DisplayName::parse(name).unwrap()));
        model.session = session;
        model
    }

    #[test]
    fn unregistered_user_sees_the_form() {
        let mut model = Model::default();
        model.registration.set_name("  ");
        assert_eq!(
            ViewModel::build(&model).screen,
            ScreenView::Registration {
                name: "  ".into(),
                can_submit: false
            }
        );
    }

    #[test]
    fn home_greets_by_name_with_fixed_feed() {
        let view = ViewModel::build(&registered("Sopheap"));
        let ScreenView::Home {
            greeting,
            points,
            activity,
        } = view.screen
        else {
            panic!("expected home screen");
        };
        assert_eq!(greeting, "Welcome, Sopheap");
        assert_eq!(points, 50);
        assert_eq!(activity.len(), 3);
        assert_eq!(activity[1].title, "Looting pit spotted at midnight");
        assert_eq!(activity[1].user, "Sambath");
        assert_eq!(activity[1].initial, "S");
    }

    #[test]
    fn report_screen_reflects_kind_and_draft() {
        let mut model = registered("Dara");
        let session = std::mem::take(&mut model.session);
        let (session, _) = session.apply(Action::OpenReport(ReportKind::Looting));
        model.session = session;
        model.draft = Some(ReportDraft::new(ReportKind::Looting));

        let ScreenView::Report {
            header,
            accent,
            submit_style,
            has_image,
            can_analyze,
            location_text,
            location_ok,
            organizations,
            ..
        } = ViewModel::build(&model).screen
        else {
            panic!("expected report screen");
        };
        assert_eq!(header, "Report Looting Activity");
        assert_eq!(accent, Accent::Danger);
        assert_eq!(submit_style, ButtonStyle::Danger);
        assert!(!has_image);
        assert!(!can_analyze);
        assert_eq!(location_text, "Acquiring GPS...");
        assert!(!location_ok);
        let selected: Vec<bool> = organizations.iter().map(|o| o.selected).collect();
        assert_eq!(selected, vec![true, true, false, true]);
    }

    #[test]
    fn profile_lists_rewards_against_points() {
        let mut model = registered("vanna");
        let session = std::mem::take(&mut model.session);
        let (session, _) = session.apply(Action::OpenProfile);
        model.session = session;

        let ScreenView::Profile {
            initial,
            rank_label,
            rewards,
            report_count,
            ..
        } = ViewModel::build(&model).screen
        else {
            panic!("expected profile screen");
        };
        assert_eq!(initial, "V");
        assert_eq!(rank_label, "Novice Guardian");
        assert_eq!(report_count, 0);
        assert_eq!(rewards[0].title, "Rice Sack (10kg)");
        assert!(rewards.iter().all(|r| !r.redeemable));
    }

    #[test]
    fn notice_is_carried_into_the_view() {
        let mut model = Model::default();
        model.show_notice(Notice::alert("Please enter your name to start."));
        let view = ViewModel::build(&model);
        assert_eq!(
            view.notice,
            Some(NoticeView {
                message: "Please enter your name to start.".into(),
                kind: NoticeKind::Alert
            })
        );
    }
}
