//! BetaKit CLI
//!
//! Daily beta-feedback questions and analytics events from the command line.

use anyhow::{bail, Context, Result};
use betakit::{
    analytics::{read_recorded_events, DefaultHandler, EventSummary, FanOut, JsonLinesHandler},
    config::Config,
    feedback::FeedbackSession,
    question::{FeedbackQuestion, QuestionRotator, ZonedCalendar},
    state::BetaState,
    create_shared_sink, SharedEventSink, SCREENSHOT_TIP, VERSION,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "betakit")]
#[command(version = VERSION)]
#[command(about = "Daily beta-feedback questions and analytics events", long_about = None)]
struct Cli {
    /// Time zone for day-of-year computation (overrides config)
    #[arg(long, global = true)]
    tz: Option<String>,

    /// JSON file with a custom question pool (overrides config)
    #[arg(long, global = true)]
    questions: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's question
    Today {
        /// Instant to evaluate (RFC3339 or YYYY-MM-DD); defaults to now
        #[arg(long)]
        at: Option<String>,

        /// Don't read or update the stored selection
        #[arg(long)]
        no_store: bool,
    },

    /// Preview the rotation for upcoming days
    Schedule {
        /// First day (RFC3339 or YYYY-MM-DD); defaults to today
        #[arg(long)]
        from: Option<String>,

        /// Number of days to show
        #[arg(long, default_value = "7")]
        days: u32,
    },

    /// List the active question pool
    Questions,

    /// Answer today's question
    Answer {
        /// The one-sentence answer
        text: String,
    },

    /// Skip today's question
    Skip,

    /// Show the screenshot tip and mark it as seen
    Tip,

    /// Summarize recorded analytics events
    Events,

    /// Show stored state
    Status,

    /// Show configuration, or change and save it
    Config {
        /// Save a new default time zone (IANA name)
        #[arg(long)]
        set_timezone: Option<String>,

        /// Save a new default question pool file
        #[arg(long)]
        set_questions: Option<PathBuf>,

        /// Save whether sessions append to the event log
        #[arg(long)]
        record_events: Option<bool>,
    },

    /// Clear stored state
    Reset {
        /// Also delete the recorded event log
        #[arg(long)]
        events: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "betakit=debug" } else { "betakit=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load().context("loading configuration")?;
    if let Err(e) = config.ensure_directories() {
        tracing::warn!("could not create data directory: {e}");
    }
    if let Some(tz) = cli.tz {
        config.timezone = tz;
    }
    if let Some(path) = cli.questions {
        config.questions_path = Some(path);
    }

    match cli.command {
        Commands::Today { at, no_store } => cmd_today(&config, at.as_deref(), no_store),
        Commands::Schedule { from, days } => cmd_schedule(&config, from.as_deref(), days),
        Commands::Questions => cmd_questions(&config),
        Commands::Answer { text } => cmd_answer(&config, Some(text.as_str())),
        Commands::Skip => cmd_answer(&config, None),
        Commands::Tip => cmd_tip(&config),
        Commands::Events => cmd_events(&config),
        Commands::Status => cmd_status(&config),
        Commands::Config {
            set_timezone,
            set_questions,
            record_events,
        } => cmd_config(&config, set_timezone, set_questions, record_events),
        Commands::Reset { events } => cmd_reset(&config, events),
    }
}

fn build_rotator(config: &Config) -> Result<QuestionRotator> {
    let calendar = config.calendar()?;
    let questions = config.load_questions().context("loading questions")?;
    Ok(QuestionRotator::new(questions, calendar))
}

/// Parse an RFC3339 instant, or a plain date evaluated at local noon.
fn parse_instant(input: &str, calendar: &ZonedCalendar) -> Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Ok(instant.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("'{input}' is neither RFC3339 nor YYYY-MM-DD"))?;
    match calendar.noon_on(date) {
        Some(instant) => Ok(instant),
        None => bail!("{date} has no noon in {}", calendar.timezone()),
    }
}

/// Resolve today's question through the stored selection and persist it.
fn todays_question(
    config: &Config,
    rotator: &QuestionRotator,
    instant: DateTime<Utc>,
) -> Result<FeedbackQuestion> {
    let state_path = config.state_path();
    let mut state = BetaState::load_or_default(&state_path);

    let day = rotator.day_of_year(instant);
    let decision = rotator.resolve(state.selection.as_ref(), instant);
    if state.apply(&decision, day) {
        state
            .save(&state_path)
            .with_context(|| format!("saving state to {state_path:?}"))?;
    }
    Ok(decision.question)
}

/// Sink that always logs through the default handler, and records to the
/// event log when enabled.
fn build_sink(config: &Config) -> Result<SharedEventSink> {
    let sink = create_shared_sink();
    if config.record_events {
        let recorder = JsonLinesHandler::open(config.events_path())
            .with_context(|| format!("opening event log {:?}", config.events_path()))?;
        tracing::debug!(path = ?recorder.path(), "recording events");

        let mut handlers = FanOut::default();
        handlers.push(Arc::new(DefaultHandler));
        handlers.push(Arc::new(recorder));
        sink.configure(handlers);
    }
    Ok(sink)
}

fn print_question(question: &FeedbackQuestion) {
    println!("{}", question.title);
    println!("  {}", question.helper_text);
    println!("  {}", question.placeholder);
    println!("  (id: {})", question.id);
}

fn cmd_today(config: &Config, at: Option<&str>, no_store: bool) -> Result<()> {
    let rotator = build_rotator(config)?;
    let instant = match at {
        Some(input) => parse_instant(input, rotator.calendar())?,
        None => Utc::now(),
    };

    let question = if no_store {
        rotator.question_for(instant)
    } else {
        todays_question(config, &rotator, instant)?
    };

    println!(
        "Question for {} (day {} in {}):",
        rotator.calendar().local_date(instant),
        rotator.day_of_year(instant),
        rotator.calendar().timezone()
    );
    println!();
    print_question(&question);
    Ok(())
}

fn cmd_schedule(config: &Config, from: Option<&str>, days: u32) -> Result<()> {
    let rotator = build_rotator(config)?;
    let start = match from {
        Some(input) => parse_instant(input, rotator.calendar())?,
        None => Utc::now(),
    };

    println!("Rotation in {}:", rotator.calendar().timezone());
    for offset in 0..days {
        let instant = start + Duration::days(i64::from(offset));
        let question = rotator.question_for(instant);
        println!(
            "  {}  day {:>3}  {:<12} {}",
            rotator.calendar().local_date(instant),
            rotator.day_of_year(instant),
            question.id,
            question.title
        );
    }
    Ok(())
}

fn cmd_questions(config: &Config) -> Result<()> {
    let rotator = build_rotator(config)?;
    let source = match &config.questions_path {
        Some(path) => format!("{path:?}"),
        None => "built-in".to_string(),
    };

    println!("Question pool ({source}, {} questions):", rotator.pool().len());
    for (index, question) in rotator.pool().iter().enumerate() {
        println!("  {}. [{}] {}", index + 1, question.id, question.title);
    }
    Ok(())
}

fn cmd_answer(config: &Config, answer: Option<&str>) -> Result<()> {
    let rotator = build_rotator(config)?;
    let question = todays_question(config, &rotator, Utc::now())?;
    let sink = build_sink(config)?;

    println!("{}", question.title);
    let mut session = FeedbackSession::open(question, sink);
    match answer {
        Some(text) => {
            let recorded = session.submit(text)?;
            println!("Thanks! Recorded: \"{recorded}\"");
        }
        None => {
            session.skip()?;
            println!("Skipped.");
        }
    }

    let state_path = config.state_path();
    let mut state = BetaState::load_or_default(&state_path);
    state.mark_feedback_prompt_shown();
    state
        .save(&state_path)
        .with_context(|| format!("saving state to {state_path:?}"))?;
    Ok(())
}

fn cmd_tip(config: &Config) -> Result<()> {
    println!("{SCREENSHOT_TIP}");

    let state_path = config.state_path();
    let mut state = BetaState::load_or_default(&state_path);
    if state.should_show_screenshot_tip() {
        state.mark_screenshot_tip_seen();
        state
            .save(&state_path)
            .with_context(|| format!("saving state to {state_path:?}"))?;
    }
    Ok(())
}

fn cmd_events(config: &Config) -> Result<()> {
    let path = config.events_path();
    let events =
        read_recorded_events(&path).with_context(|| format!("reading event log {path:?}"))?;
    println!("{}", EventSummary::from_events(&events).render());
    Ok(())
}

fn cmd_status(config: &Config) -> Result<()> {
    let state = BetaState::load(&config.state_path())?;

    println!("BetaKit Status");
    println!("==============");
    println!();
    match &state.selection {
        Some(selection) => println!(
            "Stored question: {} (day {})",
            selection.question_id, selection.day_of_year
        ),
        None => println!("Stored question: none"),
    }
    println!(
        "Screenshot tip: {}",
        if state.has_seen_screenshot_tip {
            "seen"
        } else {
            "not seen"
        }
    );
    println!(
        "Feedback prompt shown: {}",
        if state.has_shown_feedback_prompt {
            "yes"
        } else {
            "no"
        }
    );
    if let Some(updated) = state.last_updated {
        println!("Last updated: {}", updated.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    Ok(())
}

fn cmd_config(
    config: &Config,
    set_timezone: Option<String>,
    set_questions: Option<PathBuf>,
    record_events: Option<bool>,
) -> Result<()> {
    if set_timezone.is_some() || set_questions.is_some() || record_events.is_some() {
        // Edit the file as stored, not the copy carrying --tz/--questions.
        let mut stored = Config::load().context("loading configuration")?;
        if let Some(tz) = set_timezone {
            ZonedCalendar::from_name(&tz)?;
            stored.timezone = tz;
        }
        if let Some(path) = set_questions {
            stored.questions_path = Some(path);
            stored.load_questions().context("checking question file")?;
        }
        if let Some(record) = record_events {
            stored.record_events = record;
        }
        stored.save().context("saving configuration")?;
        println!("Saved {:?}", Config::config_path());
        println!();
        return print_config(&stored);
    }
    print_config(config)
}

fn print_config(config: &Config) -> Result<()> {
    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn cmd_reset(config: &Config, events: bool) -> Result<()> {
    let state_path = config.state_path();
    if state_path.exists() {
        std::fs::remove_file(&state_path)
            .with_context(|| format!("removing {state_path:?}"))?;
    }

    if events {
        let events_path = config.events_path();
        if events_path.exists() {
            std::fs::remove_file(&events_path)
                .with_context(|| format!("removing {events_path:?}"))?;
        }
    }

    tracing::info!(events, "state reset");
    println!("Stored state cleared.");
    Ok(())
}
