use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::Notice;
use crate::registration::RegistrationForm;
use crate::report::ReportDraft;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    #[error("Latitude {0} is out of valid range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} is out of valid range [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("Coordinate value is not finite (NaN or Infinity)")]
    NonFinite,
}

/// Validated lat/lng
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    lat: f64,
    lng: f64,
}

impl LatLon {
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(self) -> f64 {
        self.lat
    }

    pub fn lng(self) -> f64 {
        self.lng
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

/// Explicit timestamp unit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnixTimeMs(pub u64);

/// Identifies one opening of the report form; async results carry it back.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftId(pub Uuid);

impl DraftId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Raw photo bytes as handed over by the camera or file picker.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    #[serde(with = "serde_bytes")]
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Never dump image bytes into logs.
impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("size_bytes", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// Display-only thumbnail derived from an [`ImagePayload`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePreview {
    pub data_uri: String,
    pub width: u32,
    pub height: u32,
}

impl fmt::Debug for ImagePreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePreview")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("uri_len", &self.data_uri.len())
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct Model {
    pub session: Session,
    pub registration: RegistrationForm,
    /// The open report form, present only while a report screen is shown.
    pub draft: Option<ReportDraft>,
    pub config: AppConfig,
    pub notice: Option<Notice>,
}

impl Model {
    pub fn show_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// The open draft, if it is the one `id` refers to.
    pub fn draft_mut(&mut self, id: DraftId) -> Option<&mut ReportDraft> {
        self.draft.as_mut().filter(|d| d.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportKind;

    #[test]
    fn coordinates_are_validated() {
        assert!(LatLon::new(13.4125, 103.8670).is_ok());
        assert_eq!(
            LatLon::new(91.0, 0.0),
            Err(CoordinateError::LatitudeOutOfRange(91.0))
        );
        assert_eq!(
            LatLon::new(0.0, -181.0),
            Err(CoordinateError::LongitudeOutOfRange(-181.0))
        );
        assert_eq!(LatLon::new(f64::NAN, 0.0), Err(CoordinateError::NonFinite));
    }

    #[test]
    fn coordinates_display_with_five_decimals() {
        let loc = LatLon::new(13.412_512_3, 103.866_98).unwrap();
        assert_eq!(loc.to_string(), "13.41251, 103.86698");
    }

    #[test]
    fn image_debug_omits_bytes() {
        let image = ImagePayload::new(vec![1, 2, 3, 4], "image/jpeg");
        let debug = format!("{image:?}");
        assert!(debug.contains("size_bytes: 4"));
        assert!(!debug.contains("[1, 2, 3, 4]"));
    }

    #[test]
    fn draft_lookup_ignores_stale_ids() {
        let mut model = Model::default();
        let draft = ReportDraft::new(ReportKind::Finding);
        let id = draft.id();
        model.draft = Some(draft);

        assert!(model.draft_mut(id).is_some());
        assert!(model.draft_mut(DraftId::generate()).is_none());
    }
}
