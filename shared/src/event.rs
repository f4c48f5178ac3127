use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisError, GenerateContentResponse};
use crate::capabilities::{CameraResult, GeolocationResult, ImageSource, ShareResult, TimerOutput};
use crate::error::AppError;
use crate::model::DraftId;
use crate::report::{OrgId, ReportKind};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    /// First event from the shell. `config` is the JSON form of
    /// [`crate::config::AppConfig`]; `None` keeps the defaults.
    Started {
        config: Option<String>,
    },
    SavedNameLoaded(Result<Option<Vec<u8>>, AppError>),

    RegistrationNameChanged(String),
    RegisterRequested,
    NamePersisted(Result<(), AppError>),

    OpenReport(ReportKind),
    Back,
    ReturnHome,
    OpenProfile,
    CloseProfile,

    LocationResolved {
        draft_id: DraftId,
        result: GeolocationResult,
    },
    CapturePhotoRequested(ImageSource),
    PhotoCaptured {
        draft_id: DraftId,
        result: CameraResult,
    },
    DescriptionChanged(String),
    OrganizationToggled(OrgId),

    AnalyzeRequested,
    AnalysisCompleted {
        draft_id: DraftId,
        outcome: Result<GenerateContentResponse, AnalysisError>,
    },

    SubmitRequested,
    SubmitDelayElapsed {
        draft_id: DraftId,
        output: TimerOutput,
    },

    ShareRequested,
    ShareCompleted(ShareResult),
    ClipboardCompleted(ShareResult),
    FeedbackEmailRequested,

    DismissNotice,
}

impl Event {
    /// Stable name for logs. Payloads may hold personal data and are never
    /// logged.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::SavedNameLoaded(_) => "saved_name_loaded",
            Self::RegistrationNameChanged(_) => "registration_name_changed",
            Self::RegisterRequested => "register_requested",
            Self::NamePersisted(_) => "name_persisted",
            Self::OpenReport(_) => "open_report",
            Self::Back => "back",
            Self::ReturnHome => "return_home",
            Self::OpenProfile => "open_profile",
            Self::CloseProfile => "close_profile",
            Self::LocationResolved { .. } => "location_resolved",
            Self::CapturePhotoRequested(_) => "capture_photo_requested",
            Self::PhotoCaptured { .. } => "photo_captured",
            Self::DescriptionChanged(_) => "description_changed",
            Self::OrganizationToggled(_) => "organization_toggled",
            Self::AnalyzeRequested => "analyze_requested",
            Self::AnalysisCompleted { .. } => "analysis_completed",
            Self::SubmitRequested => "submit_requested",
            Self::SubmitDelayElapsed { .. } => "submit_delay_elapsed",
            Self::ShareRequested => "share_requested",
            Self::ShareCompleted(_) => "share_completed",
            Self::ClipboardCompleted(_) => "clipboard_completed",
            Self::FeedbackEmailRequested => "feedback_email_requested",
            Self::DismissNotice => "dismiss_notice",
        }
    }

    pub fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::RegistrationNameChanged(_)
                | Self::RegisterRequested
                | Self::OpenReport(_)
                | Self::Back
                | Self::ReturnHome
                | Self::OpenProfile
                | Self::CloseProfile
                | Self::CapturePhotoRequested(_)
                | Self::DescriptionChanged(_)
                | Self::OrganizationToggled(_)
                | Self::AnalyzeRequested
                | Self::SubmitRequested
                | Self::ShareRequested
                | Self::FeedbackEmailRequested
                | Self::DismissNotice
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_cross_the_bridge_as_json() {
        let event = Event::OpenReport(ReportKind::Looting);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"OpenReport":"looting"}"#);
        assert_eq!(serde_json::from_str::<Event>(&json).unwrap(), event);
    }

    #[test]
    fn names_never_include_payload() {
        let event = Event::RegistrationNameChanged("Sopheap".into());
        assert_eq!(event.name(), "registration_name_changed");
        assert!(event.is_user_initiated());
        assert!(!Event::SavedNameLoaded(Ok(None)).is_user_initiated());
    }
}
