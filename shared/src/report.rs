use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::capabilities::{GeolocationError, Position};
use crate::error::{AppError, ErrorKind};
use crate::model::{DraftId, ImagePayload, ImagePreview, LatLon, UnixTimeMs};

const ANALYSIS_PREFIX: &str = "AI Analysis: ";
const PARAGRAPH_BREAK: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    /// An archaeological discovery. Not urgent.
    Finding,
    /// Heritage destruction or theft. Urgent.
    Looting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Accent {
    Heritage,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ButtonStyle {
    Primary,
    Danger,
}

/// Everything that differs between the two report kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindProfile {
    pub accent: Accent,
    pub header: &'static str,
    pub submit_style: ButtonStyle,
    pub points: u32,
    pub prompt: &'static str,
}

const FINDING: KindProfile = KindProfile {
    accent: Accent::Heritage,
    header: "Report New Finding",
    submit_style: ButtonStyle::Primary,
    points: 500,
    prompt: "You are an assistant for a villager in Cambodia reporting an archaeological finding. \
             Analyze this image. Describe what the object or structure looks like simply and clearly. \
             Mention if it looks like pottery, stone carving, or a structure. Keep it under 50 words.",
};

const LOOTING: KindProfile = KindProfile {
    accent: Accent::Danger,
    header: "Report Looting Activity",
    submit_style: ButtonStyle::Danger,
    points: 1000,
    prompt: "You are an assistant for a villager in Cambodia reporting archaeological looting. \
             Analyze this image. Describe signs of digging, holes, broken artifacts, or damage to heritage sites. \
             Keep it under 50 words and factual.",
};

impl ReportKind {
    #[must_use]
    pub const fn profile(self) -> &'static KindProfile {
        match self {
            Self::Finding => &FINDING,
            Self::Looting => &LOOTING,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Finding => "finding",
            Self::Looting => "looting",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrgId(pub String);

impl OrgId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrgId,
    pub name: String,
    pub selected: bool,
}

const ORGANIZATIONS: [(&str, &str, bool); 4] = [
    ("1", "Apsara National Authority", true),
    ("2", "Ministry of Culture & Fine Arts", true),
    ("3", "Heritage Police", false),
    ("4", "S-Robot Team", true),
];

/// The notification targets as a new form shows them.
#[must_use]
pub fn default_organizations() -> Vec<Organization> {
    ORGANIZATIONS
        .iter()
        .map(|&(id, name, selected)| Organization {
            id: OrgId::new(id),
            name: name.to_string(),
            selected,
        })
        .collect()
}

/// Why no coordinates are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationFailure {
    PermissionDenied,
    InsecureContext,
    Unsupported,
    Unavailable,
}

impl LocationFailure {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::PermissionDenied => "Location permission denied.",
            Self::InsecureContext => "GPS requires HTTPS or localhost.",
            Self::Unsupported => "Geolocation is not supported by your browser",
            Self::Unavailable => "Unable to retrieve location.",
        }
    }
}

impl From<&GeolocationError> for LocationFailure {
    fn from(e: &GeolocationError) -> Self {
        match e {
            GeolocationError::PermissionDenied => Self::PermissionDenied,
            GeolocationError::InsecureContext => Self::InsecureContext,
            GeolocationError::Unsupported => Self::Unsupported,
            GeolocationError::PositionUnavailable { .. } | GeolocationError::Timeout => {
                Self::Unavailable
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LocationStatus {
    Acquiring,
    Fixed(LatLon),
    Failed(LocationFailure),
}

impl LocationStatus {
    pub fn text(&self) -> String {
        match self {
            Self::Acquiring => "Acquiring GPS...".into(),
            Self::Fixed(loc) => format!("GPS Attached: {loc}"),
            Self::Failed(failure) => failure.message().into(),
        }
    }

    pub fn coordinates(&self) -> Option<LatLon> {
        match self {
            Self::Fixed(loc) => Some(*loc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please upload a photo of the site.")]
    MissingImage,
    #[error("an analysis is already running")]
    AnalysisInFlight,
    #[error("the report is already being submitted")]
    AlreadySubmitting,
    #[error("the report has not been submitted")]
    NotSubmitting,
    #[error("no organization with that id")]
    UnknownOrganization,
}

impl From<FormError> for AppError {
    fn from(e: FormError) -> Self {
        let kind = match e {
            FormError::MissingImage => ErrorKind::Validation,
            _ => ErrorKind::InvalidState,
        };
        AppError::new(kind, e.to_string())
    }
}

/// A finished report. Immutable once built.
#[derive(Clone, PartialEq)]
pub struct ReportData {
    image: ImagePayload,
    preview: Option<ImagePreview>,
    description: String,
    location: Option<LatLon>,
    organizations: Vec<Organization>,
    timestamp: UnixTimeMs,
    kind: ReportKind,
}

impl ReportData {
    pub fn image(&self) -> &ImagePayload {
        &self.image
    }

    pub fn preview(&self) -> Option<&ImagePreview> {
        self.preview.as_ref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> Option<LatLon> {
        self.location
    }

    /// Only the organizations that were ticked.
    pub fn organizations(&self) -> &[Organization] {
        &self.organizations
    }

    pub fn timestamp(&self) -> UnixTimeMs {
        self.timestamp
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }
}

// Redact debug output because this can contain sensitive user-provided data.
impl fmt::Debug for ReportData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportData")
            .field("kind", &self.kind)
            .field("timestamp", &self.timestamp)
            .field("image", &self.image)
            .field("preview_present", &self.preview.is_some())
            .field("description_len", &self.description.len())
            .field("location_present", &self.location.is_some())
            .field("organizations", &self.organizations.len())
            .finish()
    }
}

/// The state of one open report form.
#[derive(Clone)]
pub struct ReportDraft {
    id: DraftId,
    kind: ReportKind,
    image: Option<ImagePayload>,
    preview: Option<ImagePreview>,
    description: String,
    location: LocationStatus,
    organizations: Vec<Organization>,
    analyzing: bool,
    submitting: bool,
}

impl ReportDraft {
    #[must_use]
    pub fn new(kind: ReportKind) -> Self {
        Self {
            id: DraftId::generate(),
            kind,
            image: None,
            preview: None,
            description: String::new(),
            location: LocationStatus::Acquiring,
            organizations: default_organizations(),
            analyzing: false,
            submitting: false,
        }
    }

    pub fn id(&self) -> DraftId {
        self.id
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn image(&self) -> Option<&ImagePayload> {
        self.image.as_ref()
    }

    pub fn preview(&self) -> Option<&ImagePreview> {
        self.preview.as_ref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> &LocationStatus {
        &self.location
    }

    pub fn organizations(&self) -> &[Organization] {
        &self.organizations
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// The analyze control is offered once a photo exists and stays disabled
    /// while a call is running.
    pub fn can_analyze(&self) -> bool {
        self.image.is_some() && !self.analyzing
    }

    pub fn resolve_location(&mut self, result: &Result<Position, GeolocationError>) {
        self.location = match result {
            Ok(position) => match LatLon::new(position.latitude, position.longitude) {
                Ok(loc) => LocationStatus::Fixed(loc),
                Err(_) => LocationStatus::Failed(LocationFailure::Unavailable),
            },
            Err(e) => LocationStatus::Failed(LocationFailure::from(e)),
        };
    }

    /// The form is frozen from [`Self::begin_submit`] on, so the report
    /// holds what the user saw when they pressed submit.
    fn ensure_editable(&self) -> Result<(), FormError> {
        if self.submitting {
            return Err(FormError::AlreadySubmitting);
        }
        Ok(())
    }

    pub fn set_description(&mut self, text: String) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.description = text;
        Ok(())
    }

    /// Replaces any previously selected photo.
    pub fn select_image(
        &mut self,
        image: ImagePayload,
        preview: Option<ImagePreview>,
    ) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.image = Some(image);
        self.preview = preview;
        Ok(())
    }

    pub fn toggle_organization(&mut self, id: &OrgId) -> Result<(), FormError> {
        self.ensure_editable()?;
        let org = self
            .organizations
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or(FormError::UnknownOrganization)?;
        org.selected = !org.selected;
        Ok(())
    }

    /// Marks an analysis as running and hands back the photo to send.
    pub fn begin_analysis(&mut self) -> Result<&ImagePayload, FormError> {
        self.ensure_editable()?;
        if self.analyzing {
            return Err(FormError::AnalysisInFlight);
        }
        let image = self.image.as_ref().ok_or(FormError::MissingImage)?;
        self.analyzing = true;
        Ok(image)
    }

    /// Appends the analysis text below whatever the user already typed.
    /// A result arriving after submit only ends the analysis.
    pub fn append_analysis(&mut self, text: &str) {
        self.analyzing = false;
        if self.submitting {
            return;
        }
        if !self.description.is_empty() {
            self.description.push_str(PARAGRAPH_BREAK);
        }
        self.description.push_str(ANALYSIS_PREFIX);
        self.description.push_str(text);
    }

    /// Ends an analysis that produced nothing; the description is untouched.
    pub fn abort_analysis(&mut self) {
        self.analyzing = false;
    }

    pub fn begin_submit(&mut self) -> Result<(), FormError> {
        if self.image.is_none() {
            return Err(FormError::MissingImage);
        }
        if self.submitting {
            return Err(FormError::AlreadySubmitting);
        }
        self.submitting = true;
        Ok(())
    }

    /// Builds the immutable report. Only valid after [`Self::begin_submit`].
    pub fn into_report(self, timestamp: UnixTimeMs) -> Result<ReportData, FormError> {
        if !self.submitting {
            return Err(FormError::NotSubmitting);
        }
        let image = self.image.ok_or(FormError::MissingImage)?;
        Ok(ReportData {
            image,
            preview: self.preview,
            description: self.description,
            location: self.location.coordinates(),
            organizations: self
                .organizations
                .into_iter()
                .filter(|o| o.selected)
                .collect(),
            timestamp,
            kind: self.kind,
        })
    }
}

impl fmt::Debug for ReportDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportDraft")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("image", &self.image)
            .field("description_len", &self.description.len())
            .field("location", &self.location)
            .field("analyzing", &self.analyzing)
            .field("submitting", &self.submitting)
            .finish_non_exhaustive()
    }
}
