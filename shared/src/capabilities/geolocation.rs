use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub struct Geolocation<Ev> {
    context: CapabilityContext<GeolocationOperation, Ev>,
}

impl<Ev> Capability<Ev> for Geolocation<Ev> {
    type Operation = GeolocationOperation;
    type MappedSelf<MappedEv> = Geolocation<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Geolocation::new(self.context.map_event(f))
    }
}

impl<Ev> Geolocation<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<GeolocationOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn current_position<F>(&self, options: PositionOptions, make_event: F)
    where
        F: FnOnce(GeolocationResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(GeolocationOperation::CurrentPosition(options))
                .await;
            context.update_app(make_event(result));
        });
    }
}

/// The shell must answer within `timeout_ms`, with [`GeolocationError::Timeout`]
/// if no fix arrived in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout_ms: u64,
    pub maximum_age_ms: u64,
}

impl PositionOptions {
    #[must_use]
    pub fn fresh_fix(timeout_ms: u64) -> Self {
        Self {
            high_accuracy: true,
            timeout_ms,
            maximum_age_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum GeolocationOperation {
    CurrentPosition(PositionOptions),
}

impl Operation for GeolocationOperation {
    type Output = GeolocationResult;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub accuracy_m: Option<f64>,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("geolocation requires a secure context")]
    InsecureContext,

    #[error("geolocation is not supported on this device")]
    Unsupported,

    #[error("position unavailable: {reason}")]
    PositionUnavailable { reason: String },

    #[error("timed out waiting for a position")]
    Timeout,
}

pub type GeolocationResult = Result<Position, GeolocationError>;
