use chrono::Local;
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

use hirebot::{
    app_dirs::AppDirs,
    bank::{BankError, QuestionBank},
    config::{Config, ConfigStore, FileConfigStore},
    host::{App, HostAction},
    question::Question,
    report,
    runtime::{CrosstermEvents, EventLoop, UiEvent},
    session::Session,
    store::{AnswerDb, AnswerStore, MemoryStore},
    timer::TICK_RATE_MS,
};

/// terminal runner for timed technical interview sessions
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Administers a timed technical interview in the terminal: each question gets a difficulty-scaled countdown, answers are captured on submit or expiry, and every answer lands in a durable local log for later review."
)]
pub struct Cli {
    /// built-in question bank to administer
    #[clap(short = 'b', long, value_enum)]
    bank: Option<SampleBank>,

    /// load questions from a JSON file instead of a built-in bank
    #[clap(short = 'f', long)]
    file: Option<PathBuf>,

    /// explicit interview identifier recorded with every answer
    #[clap(short = 'i', long)]
    interview_id: Option<String>,

    /// candidate name shown on the completion screen
    #[clap(short = 'c', long)]
    candidate: Option<String>,

    /// keep answers in memory only; skip the durable answer log
    #[clap(long)]
    ephemeral: bool,

    /// print recorded answers grouped by interview and exit
    #[clap(long)]
    report: bool,

    /// export the full answer log as CSV to the given path and exit
    #[clap(long)]
    export: Option<PathBuf>,

    /// persist the chosen bank and candidate as defaults
    #[clap(long)]
    save_defaults: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SampleBank {
    General,
    Backend,
    Frontend,
}

/// Explicit prioritized lookup for the interview id, highest first:
/// the --interview-id flag, then a candidate-derived id, then a
/// timestamp-derived one. Resolved once, before the session is built.
fn resolve_interview_id(cli: &Cli, config: &Config) -> String {
    if let Some(id) = &cli.interview_id {
        return id.clone();
    }
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    match &config.candidate {
        Some(name) => format!("{}-{stamp}", name.to_lowercase().replace(' ', "-")),
        None => format!("interview-{stamp}"),
    }
}

fn load_questions(cli: &Cli, config: &Config) -> Result<Vec<Question>, BankError> {
    let bank = if let Some(path) = &cli.file {
        QuestionBank::from_file(path)?
    } else {
        let name = cli
            .bank
            .map(|b| b.to_string())
            .unwrap_or_else(|| config.default_bank.clone());
        QuestionBank::builtin(&name)?
    };
    Ok(bank.into_questions())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Report and export read the answer log and never touch the terminal.
    if cli.report || cli.export.is_some() {
        return run_headless(&cli);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    if let Some(bank) = cli.bank {
        config.default_bank = bank.to_string();
    }
    if let Some(candidate) = &cli.candidate {
        config.candidate = Some(candidate.clone());
    }
    if cli.save_defaults {
        config_store.save(&config)?;
    }

    let interview_id = resolve_interview_id(&cli, &config);

    let mut open_warning = None;
    let answer_store: Box<dyn AnswerStore> = if cli.ephemeral {
        Box::new(MemoryStore::new())
    } else {
        match AnswerDb::open_default(&interview_id) {
            Ok(db) => Box::new(db),
            // An unusable local log must not stop the interview; the session
            // keeps answers in memory and carries the gap as a visible
            // storage warning.
            Err(err) => {
                open_warning =
                    Some(format!("answer log unavailable ({err}); answers kept in memory only"));
                Box::new(MemoryStore::new())
            }
        }
    };

    let mut session = Session::new().with_store(answer_store);
    if let Some(warning) = open_warning {
        session.warn_storage(warning);
    }
    match load_questions(&cli, &config) {
        // An empty list moves the session to Failed; the error screen
        // renders the message carried by the phase.
        Ok(questions) => {
            let _ = session.begin(questions);
        }
        Err(err) => session.fail(err.to_string()),
    }

    let mut app = App::new(session, interview_id, config.candidate.clone());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let events = EventLoop::new(
        CrosstermEvents::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    loop {
        terminal.draw(|f| ui(app, f))?;

        match events.next() {
            UiEvent::Tick => app.on_tick(),
            UiEvent::Resize => {}
            UiEvent::Key(key) => {
                if app.handle_key(key) == HostAction::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

fn run_headless(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let path = AppDirs::answer_log_path().unwrap_or_else(|| PathBuf::from("hirebot_answers.db"));
    let db = AnswerDb::open_for_review(&path)?;
    let rows = db.rows()?;

    if let Some(export_path) = &cli.export {
        let file = std::fs::File::create(export_path)?;
        report::export_csv(&rows, file)?;
        println!(
            "exported {} answers to {}",
            rows.len(),
            export_path.display()
        );
    }
    if cli.report {
        print!("{}", report::render_report(&rows));
    }

    Ok(())
}
