use std::io::Write;

use anyhow::Result;
use gback_core::{CalendarApi, Session};

pub fn run<A: CalendarApi>(session: &Session<A>, out: &mut impl Write) -> Result<()> {
    for name in session.calendar_names() {
        writeln!(out, "{}", name)?;
    }

    Ok(())
}
