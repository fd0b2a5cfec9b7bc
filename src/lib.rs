// Library surface for headless/integration tests and reuse.
// The binary in main.rs is a thin Session Host over these modules.
pub mod app_dirs;
pub mod bank;
pub mod config;
pub mod host;
pub mod question;
pub mod report;
pub mod runtime;
pub mod session;
pub mod store;
pub mod timer;
pub mod ui;
pub mod util;
