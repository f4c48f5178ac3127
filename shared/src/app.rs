use secrecy::ExposeSecret;
use tracing::{debug, info, warn};

use crate::analysis::{self, AnalysisError, GenerateContentRequest, GenerateContentResponse};
use crate::capabilities::{
    CameraOutput, CameraResult, Capabilities, PositionOptions, ShareContent, ShareError,
    USER_NAME_KEY,
};
use crate::config::AppConfig;
use crate::error::{AppError, ErrorKind, Notice};
use crate::event::Event;
use crate::model::{DraftId, Model, UnixTimeMs};
use crate::preview;
use crate::registration::{DisplayName, RegistrationForm};
use crate::report::{FormError, ReportDraft, ReportKind};
use crate::session::{Action, Outcome};
use crate::view::ViewModel;

pub const SHARE_FALLBACK_NOTICE: &str =
    "App link copied to clipboard! Send this to your teammates.";
pub const FEEDBACK_SUBJECT: &str = "App Feedback";

#[derive(Default)]
pub struct App;

impl App {
    /// Runs one navigation step through the session state machine.
    fn apply(model: &mut Model, action: Action) -> Outcome {
        let name = action.name();
        let session = std::mem::take(&mut model.session);
        let (session, outcome) = session.apply(action);
        model.session = session;
        if outcome == Outcome::Ignored {
            debug!(action = name, screen = ?model.session.screen(), "action ignored");
        }
        outcome
    }

    fn report_error(model: &mut Model, error: &AppError) {
        if error.kind.is_user_visible() {
            model.show_notice(Notice::from(error));
        } else {
            warn!(code = error.code(), error = %error, "suppressed error");
        }
    }

    fn storage_error(e: impl std::fmt::Display) -> AppError {
        AppError::new(ErrorKind::Storage, "key-value store request failed").with_internal(e.to_string())
    }

    fn load_config(model: &mut Model, raw: Option<&str>) {
        let Some(raw) = raw else {
            return;
        };
        match AppConfig::from_json(raw) {
            Ok(config) => {
                info!(
                    has_api_key = config.analysis.api_key.is_some(),
                    model = %config.analysis.model,
                    "configuration loaded"
                );
                model.config = config;
            }
            Err(e) => {
                let error = AppError::from(e);
                warn!(code = error.code(), error = %error, "invalid configuration, keeping defaults");
            }
        }
    }

    fn restore(model: &mut Model, stored: Option<Vec<u8>>) {
        let Some(bytes) = stored else {
            debug!("no stored name, showing registration");
            return;
        };
        let name = String::from_utf8(bytes)
            .ok()
            .and_then(|raw| DisplayName::parse(&raw).ok());
        let Some(name) = name else {
            warn!("stored name unreadable, showing registration");
            return;
        };
        let points = model.config.restored_points;
        if Self::apply(model, Action::Restore { name, points }) == Outcome::Applied {
            info!(points, "returning user restored");
        }
    }

    fn register(model: &mut Model, caps: &Capabilities) {
        let name = match model.registration.submit() {
            Ok(name) => name,
            Err(e) => {
                Self::report_error(model, &AppError::from(e));
                return;
            }
        };
        let stored = name.as_str().as_bytes().to_vec();
        if Self::apply(model, Action::Register(name)) == Outcome::Applied {
            model.registration = RegistrationForm::default();
            caps.kv.set(USER_NAME_KEY.to_string(), stored, |result| {
                Event::NamePersisted(result.map(|_| ()).map_err(Self::storage_error))
            });
            info!(points = crate::profile::WELCOME_POINTS, "user registered");
        }
    }

    fn open_report(model: &mut Model, caps: &Capabilities, kind: ReportKind) {
        if Self::apply(model, Action::OpenReport(kind)) == Outcome::Ignored {
            return;
        }
        let draft = ReportDraft::new(kind);
        let draft_id = draft.id();
        model.draft = Some(draft);

        caps.geolocation.current_position(
            PositionOptions::fresh_fix(model.config.geolocation_timeout_ms),
            move |result| Event::LocationResolved { draft_id, result },
        );
        info!(%draft_id, %kind, "report form opened");
    }

    fn photo_captured(model: &mut Model, draft_id: DraftId, result: CameraResult) {
        if model.draft_mut(draft_id).is_none() {
            debug!(%draft_id, "stale photo dropped");
            return;
        }
        let output = match result {
            Ok(output) => output,
            Err(e) => {
                warn!(%draft_id, error = %e, "camera request failed");
                let error = AppError::new(
                    ErrorKind::FeatureUnavailable,
                    "Unable to access the camera. Please choose a photo from your gallery.",
                );
                Self::report_error(model, &error);
                return;
            }
        };
        let CameraOutput::Photo(captured) = output else {
            debug!(%draft_id, "photo selection cancelled");
            return;
        };
        let payload = match captured.into_payload() {
            Ok(payload) => payload,
            Err(e) => {
                warn!(%draft_id, error = %e, "rejected picked image");
                model.show_notice(Notice::alert(
                    AppError::new(ErrorKind::ImageProcessing, e.to_string()).user_facing_message(),
                ));
                return;
            }
        };
        // A broken preview never blocks the report itself.
        let preview = match preview::generate(&payload) {
            Ok(preview) => Some(preview),
            Err(e) => {
                let error = AppError::from(e);
                warn!(%draft_id, code = error.code(), error = %error, "preview generation failed");
                None
            }
        };
        let size_bytes = payload.len();
        let mime = payload.mime_type.clone();
        if let Some(draft) = model.draft_mut(draft_id) {
            match draft.select_image(payload, preview) {
                Ok(()) => info!(%draft_id, size_bytes, %mime, "photo attached"),
                Err(e) => Self::form_locked(draft_id, e),
            }
        }
    }

    fn form_locked(draft_id: DraftId, error: FormError) {
        debug!(%draft_id, error = %error, "edit ignored");
    }

    fn start_analysis(model: &mut Model, caps: &Capabilities) {
        let Some(draft) = model.draft.as_mut() else {
            return;
        };
        let draft_id = draft.id();
        let kind = draft.kind();
        let request = draft
            .begin_analysis()
            .map(|image| GenerateContentRequest::new(image, kind));
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                Self::report_error(model, &AppError::from(e));
                return;
            }
        };

        let config = &model.config.analysis;
        let Some(api_key) = config.api_key.as_ref() else {
            info!(%draft_id, "no analysis key configured");
            Self::finish_analysis(model, draft_id, Err(AnalysisError::MissingApiKey));
            return;
        };

        let built = caps
            .http
            .post(config.generate_content_url())
            .header(analysis::API_KEY_HEADER, api_key.expose_secret().as_str())
            .body_json(&request);

        match built {
            Ok(builder) => {
                builder
                    .expect_json::<GenerateContentResponse>()
                    .send(move |result| Event::AnalysisCompleted {
                        draft_id,
                        outcome: analysis::outcome(result),
                    });
                info!(%draft_id, %kind, "image analysis requested");
            }
            Err(e) => {
                warn!(%draft_id, error = %e, "could not build analysis request");
                if let Some(draft) = model.draft_mut(draft_id) {
                    draft.abort_analysis();
                }
                let error = AppError::from(AnalysisError::InvalidRequest(e.to_string()));
                model.show_notice(Notice::from(&error));
            }
        }
    }

    fn finish_analysis(
        model: &mut Model,
        draft_id: DraftId,
        outcome: Result<GenerateContentResponse, AnalysisError>,
    ) {
        match model.draft_mut(draft_id) {
            Some(draft) if draft.is_analyzing() => {
                let text = analysis::describe(outcome);
                draft.append_analysis(&text);
                debug!(%draft_id, "analysis appended");
            }
            _ => debug!(%draft_id, "stale analysis result dropped"),
        }
    }

    fn start_submit(model: &mut Model, caps: &Capabilities) {
        let Some(draft) = model.draft.as_mut() else {
            return;
        };
        let started = draft.begin_submit().map(|()| (draft.id(), draft.kind()));
        match started {
            Ok((draft_id, kind)) => {
                caps.timer.sleep(model.config.submit_delay_ms, move |output| {
                    Event::SubmitDelayElapsed { draft_id, output }
                });
                info!(%draft_id, %kind, "submitting report");
            }
            Err(e) => Self::report_error(model, &AppError::from(e)),
        }
    }

    fn finish_submit(model: &mut Model, draft_id: DraftId, now: UnixTimeMs) {
        let current = model
            .draft
            .as_ref()
            .is_some_and(|d| d.id() == draft_id && d.is_submitting());
        if !current {
            debug!(%draft_id, "stale submission dropped");
            return;
        }
        let Some(draft) = model.draft.take() else {
            return;
        };
        let report = match draft.into_report(now) {
            Ok(report) => report,
            Err(e) => {
                warn!(%draft_id, error = %e, "could not finalize report");
                return;
            }
        };
        let kind = report.kind();
        match Self::apply(model, Action::Submit(Box::new(report))) {
            Outcome::Applied => {
                let award = model.session.last_award().map_or(0, |a| a.points);
                let total = model.session.profile().map_or(0, |p| p.points());
                info!(%draft_id, %kind, award, total, "report submitted");
            }
            Outcome::Ignored => warn!(%draft_id, %kind, "report did not match the open screen"),
        }
    }

    fn share_completed(model: &Model, caps: &Capabilities, result: Result<(), ShareError>) {
        match result {
            Ok(()) => info!("app link shared"),
            Err(ShareError::Unavailable) => {
                debug!("share sheet unavailable, copying link instead");
                caps.share
                    .copy_to_clipboard(model.config.share.url.clone(), Event::ClipboardCompleted);
            }
            Err(e) => info!(error = %e, "share not completed"),
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        if event.is_user_initiated() {
            debug!(event = event.name(), "user action");
        } else {
            debug!(event = event.name(), "shell response");
        }

        match event {
            Event::Started { config } => {
                Self::load_config(model, config.as_deref());
                caps.kv.get(USER_NAME_KEY.to_string(), |result| {
                    Event::SavedNameLoaded(result.map_err(Self::storage_error))
                });
            }

            Event::SavedNameLoaded(result) => match result {
                Ok(stored) => Self::restore(model, stored),
                Err(e) => Self::report_error(model, &e),
            },

            Event::RegistrationNameChanged(name) => model.registration.set_name(name),

            Event::RegisterRequested => Self::register(model, caps),

            Event::NamePersisted(result) => match result {
                Ok(()) => debug!("display name stored"),
                Err(e) => Self::report_error(model, &e),
            },

            Event::OpenReport(kind) => Self::open_report(model, caps, kind),

            Event::Back => {
                if Self::apply(model, Action::Back) == Outcome::Applied {
                    if let Some(draft) = model.draft.take() {
                        if draft.is_submitting() {
                            info!(draft_id = %draft.id(), "pending submission discarded");
                        }
                    }
                }
            }

            Event::ReturnHome => {
                Self::apply(model, Action::ReturnHome);
            }

            Event::OpenProfile => {
                Self::apply(model, Action::OpenProfile);
            }

            Event::CloseProfile => {
                Self::apply(model, Action::CloseProfile);
            }

            Event::LocationResolved { draft_id, result } => match model.draft_mut(draft_id) {
                Some(draft) => {
                    draft.resolve_location(&result);
                    match &result {
                        Ok(position) => {
                            debug!(%draft_id, accuracy_m = ?position.accuracy_m, "location fixed");
                        }
                        Err(e) => info!(%draft_id, error = %e, "location unavailable"),
                    }
                }
                None => debug!(%draft_id, "stale location dropped"),
            },

            Event::CapturePhotoRequested(source) => {
                if let Some(draft) = &model.draft {
                    let draft_id = draft.id();
                    caps.camera.pick_image(source, move |result| Event::PhotoCaptured {
                        draft_id,
                        result,
                    });
                }
            }

            Event::PhotoCaptured { draft_id, result } => {
                Self::photo_captured(model, draft_id, result);
            }

            Event::DescriptionChanged(text) => {
                if let Some(draft) = model.draft.as_mut() {
                    if let Err(e) = draft.set_description(text) {
                        Self::form_locked(draft.id(), e);
                    }
                }
            }

            Event::OrganizationToggled(id) => {
                if let Some(draft) = model.draft.as_mut() {
                    match draft.toggle_organization(&id) {
                        Ok(()) => {}
                        Err(FormError::UnknownOrganization) => warn!(org = %id, "unknown organization"),
                        Err(e) => Self::form_locked(draft.id(), e),
                    }
                }
            }

            Event::AnalyzeRequested => Self::start_analysis(model, caps),

            Event::AnalysisCompleted { draft_id, outcome } => {
                Self::finish_analysis(model, draft_id, outcome);
            }

            Event::SubmitRequested => Self::start_submit(model, caps),

            Event::SubmitDelayElapsed { draft_id, output } => {
                Self::finish_submit(model, draft_id, output.now());
            }

            Event::ShareRequested => {
                let share = &model.config.share;
                caps.share.share(
                    ShareContent {
                        title: share.title.clone(),
                        text: share.text.clone(),
                        url: share.url.clone(),
                    },
                    Event::ShareCompleted,
                );
            }

            Event::ShareCompleted(result) => Self::share_completed(model, caps, result),

            Event::ClipboardCompleted(result) => match result {
                Ok(()) => model.show_notice(Notice::info(SHARE_FALLBACK_NOTICE)),
                Err(e) => warn!(error = %e, "clipboard copy failed"),
            },

            Event::FeedbackEmailRequested => {
                caps.share.compose_email(
                    model.config.feedback_email.clone(),
                    FEEDBACK_SUBJECT.to_string(),
                );
            }

            Event::DismissNotice => model.clear_notice(),
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::build(model)
    }
}
