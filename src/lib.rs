pub mod annotation;
pub mod config;
pub mod editor;
pub mod environment;
pub mod error;
pub mod geometry;
pub mod host;
pub mod logging;
pub mod replay;
pub mod state;
pub mod widgets;
pub use error::{AppError, AppResult};

use std::path::Path;

/// Entrypoint used by the CLI: replays a scripted editing session.
pub fn run(script_path: &Path) -> AppResult<replay::ReplayReport> {
    logging::init();
    tracing::info!(script = %script_path.display(), "starting annotation-popup replay");

    let config = config::load_app_config();
    let script = replay::load_script(script_path)?;
    let report = replay::run_script(script, &config)?;

    tracing::info!(
        events = report.events.len(),
        still_editing = report.still_editing,
        "replay complete"
    );
    Ok(report)
}
