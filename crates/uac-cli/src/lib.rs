//! Library side of the `uac` command: logging setup and persisted settings.

pub mod logging;
pub mod settings;
