use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gback_core::{CalendarApi, Session};
use tracing::info;

pub async fn run<A: CalendarApi>(session: &Session<A>, calendar_name: &str, dir: &Path) -> Result<()> {
    let calendar = session.resolve(calendar_name)?;

    let ics = calendar.list_events().await?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let path = export_path(dir, calendar_name);
    std::fs::write(&path, ics.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), "exported calendar");

    Ok(())
}

/// `dir/NAME.ical`, with path separators in the calendar name replaced.
fn export_path(dir: &Path, calendar_name: &str) -> PathBuf {
    let file_name = calendar_name.replace(['/', '\\', ':'], "_");
    dir.join(format!("{}.ical", file_name))
}
