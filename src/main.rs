mod commands;

use std::future::Future;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gback_core::{CalendarApi, EventDraft, EventPoint, EventTiming, GbackError, GbackResult, Session};
use gback_google::SessionConfig;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
To list command line options:
  $ gback -h

To list calendar names:
  $ gback --list --oauthfn ~/gback.oauth

To add a whole day event:
  $ gback --add <CALENDAR> -d <YYYYMMDD> -s \"<summary>\"

To add a timed event:
  $ gback --add <CALENDAR> -d \"<YYYYMMDD HH:MM>\" --end \"<YYYYMMDD HH:MM>\" -s \"<summary>\"

To export calendar to ical file:
  $ gback --export <CALENDAR> [--path <PATH>]
";

#[derive(Parser, Debug)]
#[command(name = "gback")]
#[command(version, about = "Back up Google Calendar")]
struct Cli {
    /// List calendar names
    #[arg(short, long)]
    list: bool,

    /// Add an event to calendar NAME (needs -d and -s)
    #[arg(short, long, value_name = "NAME")]
    add: Option<String>,

    /// Event date (YYYYMMDD), or start date and time with --end
    #[arg(short = 'd', value_name = "YYYYMMDD")]
    date: Option<String>,

    /// End date and time; makes the event a timed event
    #[arg(long, value_name = "DATETIME")]
    end: Option<String>,

    /// Summary string
    #[arg(short = 's', value_name = "SUMMARY")]
    summary: Option<String>,

    /// Description
    #[arg(long = "descr", value_name = "TEXT")]
    description: Option<String>,

    /// Location
    #[arg(long, value_name = "TEXT")]
    location: Option<String>,

    /// Export calendar NAME to an ical file
    #[arg(short, long, value_name = "NAME")]
    export: Option<String>,

    /// Directory to export into
    #[arg(short, long, default_value = "./")]
    path: String,

    /// OAuth credential file
    #[arg(long, default_value = "~/gback.oauth", value_name = "FILENAME")]
    oauthfn: String,

    /// Client id/secret file (defaults to the OAuth credential file)
    #[arg(long, value_name = "FILENAME")]
    clientfn: Option<String>,
}

/// What one invocation does, checked before any connection is made.
#[derive(Debug, PartialEq)]
enum Action {
    List,
    Add { calendar: String, draft: EventDraft },
    Export { calendar: String, dir: PathBuf },
    Usage,
}

impl Cli {
    fn action(&self) -> GbackResult<Action> {
        if self.list {
            return Ok(Action::List);
        }

        if let Some(ref calendar) = self.add {
            let date = self
                .date
                .as_deref()
                .ok_or_else(|| GbackError::Validation("You must use -d <YYYYMMDD>".to_string()))?;
            let summary = self.summary.clone().ok_or_else(|| {
                GbackError::Validation("You must use -s <event description>".to_string())
            })?;

            let start = EventPoint::parse(date)?;
            let end = self.end.as_deref().map(EventPoint::parse).transpose()?;
            let draft = EventDraft::new(summary, EventTiming::from_points(start, end)?)
                .with_description(self.description.clone())
                .with_location(self.location.clone());

            return Ok(Action::Add {
                calendar: calendar.clone(),
                draft,
            });
        }

        if let Some(ref calendar) = self.export {
            return Ok(Action::Export {
                calendar: calendar.clone(),
                dir: expand(&self.path),
            });
        }

        Ok(Action::Usage)
    }

    fn session_config(&self) -> SessionConfig {
        match self.clientfn {
            Some(ref clientfn) => SessionConfig {
                credential_path: expand(&self.oauthfn),
                client_secret_path: expand(clientfn),
            },
            None => SessionConfig::single_file(expand(&self.oauthfn)),
        }
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("GBACK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout();

    run(
        &cli,
        |config| async move { gback_google::connect(&config).await },
        &mut stdout,
    )
    .await
}

/// Validate the request, then connect and carry it out.
async fn run<C, F, A>(cli: &Cli, connect: C, out: &mut impl Write) -> Result<()>
where
    C: FnOnce(SessionConfig) -> F,
    F: Future<Output = GbackResult<Session<A>>>,
    A: CalendarApi,
{
    let action = cli.action()?;

    if action == Action::Usage {
        write!(out, "{}", USAGE)?;
        return Ok(());
    }

    let session = connect(cli.session_config())
        .await
        .context("Could not connect to Google Calendar")?;

    match action {
        Action::List => commands::list::run(&session, out),
        Action::Add { calendar, draft } => commands::add::run(&session, &calendar, &draft, out).await,
        Action::Export { calendar, dir } => commands::export::run(&session, &calendar, &dir).await,
        Action::Usage => Ok(()),
    }
}
