// Shared core for Heritage Guard: reporting archaeological findings and looting.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod analysis;
pub mod app;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod event;
pub mod model;
pub mod preview;
pub mod profile;
pub mod registration;
pub mod report;
pub mod session;
pub mod view;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::AppConfig;
pub use crux_core::App as CruxApp;
pub use error::{AppError, ErrorKind, Notice, NoticeKind};
pub use event::Event;
pub use model::Model;
pub use profile::Rank;
pub use report::ReportKind;
pub use session::Screen;
pub use view::{ScreenView, ViewModel};
