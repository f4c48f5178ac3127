use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ImagePayload;

pub const MAX_IMAGE_SIZE_BYTES: usize = 20 * 1024 * 1024;

pub struct Camera<Ev> {
    context: CapabilityContext<CameraOperation, Ev>,
}

impl<Ev> Capability<Ev> for Camera<Ev> {
    type Operation = CameraOperation;
    type MappedSelf<MappedEv> = Camera<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Camera::new(self.context.map_event(f))
    }
}

impl<Ev> Camera<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<CameraOperation, Ev>) -> Self {
        Self { context }
    }

    /// Asks the shell for exactly one photo, from the rear camera when
    /// available and the gallery otherwise.
    pub fn pick_image<F>(&self, source: ImageSource, make_event: F)
    where
        F: FnOnce(CameraResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(CameraOperation::PickImage { source })
                .await;
            context.update_app(make_event(result));
        });
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSource {
    /// Rear ("environment") camera with gallery fallback.
    #[default]
    Camera,
    Gallery,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CameraOperation {
    PickImage { source: ImageSource },
}

impl Operation for CameraOperation {
    type Output = CameraResult;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Heic,
    WebP,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Heic => "image/heic",
            ImageFormat::WebP => "image/webp",
        }
    }

    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(ImageFormat::Png);
        }

        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        if data.len() >= 12 && &data[4..8] == b"ftyp" {
            let brand = &data[8..12];
            if brand == b"heic" || brand == b"heix" || brand == b"mif1" {
                return Some(ImageFormat::Heic);
            }
        }

        None
    }
}

/// A photo as the shell hands it over.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CapturedImage {
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
    /// What the picker reported; may be empty on some platforms.
    #[serde(default)]
    pub mime_type: String,
}

impl std::fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedImage")
            .field("size_bytes", &self.data.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

impl CapturedImage {
    /// Validates the payload and settles its mime type, trusting the
    /// declared type only when the bytes do not say otherwise.
    pub fn into_payload(self) -> Result<ImagePayload, CameraError> {
        if self.data.is_empty() {
            return Err(CameraError::InvalidImage {
                reason: "image data is empty".to_string(),
            });
        }

        if self.data.len() > MAX_IMAGE_SIZE_BYTES {
            return Err(CameraError::ImageTooLarge {
                size: self.data.len(),
                max: MAX_IMAGE_SIZE_BYTES,
            });
        }

        let mime_type = match ImageFormat::from_magic_bytes(&self.data) {
            Some(format) => format.mime_type().to_string(),
            None if self.mime_type.starts_with("image/") => self.mime_type,
            None => {
                return Err(CameraError::InvalidImage {
                    reason: "not a recognised image".to_string(),
                })
            }
        };

        Ok(ImagePayload::new(self.data, mime_type))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CameraOutput {
    Photo(CapturedImage),
    Cancelled,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum CameraError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("camera unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("invalid image: {reason}")]
    InvalidImage { reason: String },

    #[error("image too large: {size} bytes, max {max}")]
    ImageTooLarge { size: usize, max: usize },
}

pub type CameraResult = Result<CameraOutput, CameraError>;
