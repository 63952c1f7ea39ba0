use std::path::PathBuf;

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    let script_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: annotation-popup <session-script.json>")?;

    let report = annotation_popup::run(&script_path)
        .with_context(|| format!("replaying {}", script_path.display()))?;

    let output = serde_json::to_string_pretty(&report).context("encoding replay report")?;
    println!("{output}");
    Ok(())
}
