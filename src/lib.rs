pub mod clipboard;
pub mod content;
pub mod diff;
pub mod logging;
pub mod masking;
pub mod overlay;
pub mod session;
pub mod settings;

#[cfg(feature = "gui")]
pub mod gui;

pub use session::Session;
pub use settings::Settings;
