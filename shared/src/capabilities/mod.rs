mod camera;
mod geolocation;
mod share;
mod timer;

pub use self::camera::{
    Camera, CameraError, CameraOperation, CameraOutput, CameraResult, CapturedImage, ImageFormat,
    ImageSource,
};
pub use self::geolocation::{
    Geolocation, GeolocationError, GeolocationOperation, GeolocationResult, Position,
    PositionOptions,
};
pub use self::share::{Share, ShareContent, ShareError, ShareOperation, ShareResult};
pub use self::timer::{Timer, TimerOperation, TimerOutput};

// Crux's built-in capabilities cover rendering, HTTP and key-value storage.
pub use crux_core::render::Render;
pub use crux_http::Http;
pub use crux_kv::KeyValue;

use crate::event::Event;

/// Key under which the registered display name is stored.
pub const USER_NAME_KEY: &str = "s-robot-user-name";

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub http: Http<Event>,
    pub kv: KeyValue<Event>,
    pub geolocation: Geolocation<Event>,
    pub camera: Camera<Event>,
    pub share: Share<Event>,
    pub timer: Timer<Event>,
}
