use std::io::Write;

use anyhow::Result;
use gback_core::{CalendarApi, EventDraft, EventTiming, Session};
use tracing::info;

pub async fn run<A: CalendarApi>(
    session: &Session<A>,
    calendar_name: &str,
    draft: &EventDraft,
    out: &mut impl Write,
) -> Result<()> {
    let calendar = session.resolve(calendar_name)?;

    let link = calendar.add_event(draft).await?;

    match draft.timing {
        EventTiming::WholeDay { date } => {
            info!(calendar = calendar_name, %date, "added whole-day event")
        }
        EventTiming::Timed { start, end } => {
            info!(calendar = calendar_name, %start, %end, "added timed event")
        }
    }

    writeln!(out, "{}", link)?;

    Ok(())
}
