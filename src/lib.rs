// Library surface for the binary, headless tests and reuse.
pub mod acquire;
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod render;
pub mod runtime;
pub mod samples;
pub mod session;
pub mod stats;
pub mod ui;
pub mod util;

pub use app::{run_app, App};
pub use error::AcquireError;
pub use session::TypingSession;
