use std::fmt;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use emmet_core::model::{AttemptStatus, GameMode};
use services::config::{mode_from_env, parse_seed};
use services::{
    Advance, AiClient, AiExpander, AiHints, Clock, EngineConfig, Expander, HintOutcome,
    HintProvider, LocalExpander, SessionError, SessionHandle, SessionLoopService,
    SessionSnapshot, StaticHints, SubmitOutcome,
};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidMode { raw: String },
    InvalidExpander { raw: String },
    InvalidSeed { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidMode { raw } => write!(f, "invalid --mode value: {raw}"),
            ArgsError::InvalidExpander { raw } => write!(f, "invalid --expander value: {raw}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExpanderKind {
    Local,
    Ai,
}

impl ExpanderKind {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg.trim().to_ascii_lowercase().as_str() {
            "local" => Some(Self::Local),
            "ai" => Some(Self::Ai),
            _ => None,
        }
    }
}

struct Args {
    mode: Option<GameMode>,
    expander: ExpanderKind,
    seed: Option<u64>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--mode learning|challenge] [--expander local|ai] [--seed <u64>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --mode      asked on start");
    eprintln!("  --expander  local");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  EMMET_MODE, EMMET_SEED, EMMET_CHALLENGE_SIZE");
    eprintln!("  EMMET_AI_API_KEY, EMMET_AI_BASE_URL, EMMET_AI_MODEL");
    eprintln!("  RUST_LOG (logs go to stderr)");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut mode = None;
        let mut expander = ExpanderKind::Local;
        let mut seed = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--mode" => {
                    let value = require_value(args, "--mode")?;
                    let parsed = value
                        .parse::<GameMode>()
                        .map_err(|_| ArgsError::InvalidMode { raw: value.clone() })?;
                    mode = Some(parsed);
                }
                "--expander" => {
                    let value = require_value(args, "--expander")?;
                    expander = ExpanderKind::from_arg(&value)
                        .ok_or(ArgsError::InvalidExpander { raw: value })?;
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed =
                        parse_seed(&value).map_err(|_| ArgsError::InvalidSeed { raw: value })?;
                    seed = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            mode,
            expander,
            seed,
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout belongs to the game; logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(env_filter)
        .init();
}

fn build_collaborators(kind: ExpanderKind) -> (Arc<dyn Expander>, Arc<dyn HintProvider>) {
    let client = AiClient::from_env();
    let hints: Arc<dyn HintProvider> = if client.enabled() {
        Arc::new(AiHints::new(client.clone()))
    } else {
        Arc::new(StaticHints)
    };

    let expander: Arc<dyn Expander> = match kind {
        ExpanderKind::Ai if client.enabled() => Arc::new(AiExpander::new(client)),
        ExpanderKind::Ai => {
            tracing::warn!("EMMET_AI_API_KEY is not set; using the local expander");
            Arc::new(LocalExpander)
        }
        ExpanderKind::Local => Arc::new(LocalExpander),
    };
    (expander, hints)
}

type Input = Lines<BufReader<Stdin>>;

async fn prompt(input: &mut Input, label: &str) -> Result<Option<String>, std::io::Error> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(label.as_bytes()).await?;
    stdout.flush().await?;
    input.next_line().await
}

async fn choose_mode(input: &mut Input) -> Result<Option<GameMode>, std::io::Error> {
    println!("Choose a track: [l]earning or [c]hallenge");
    while let Some(line) = prompt(input, "mode> ").await? {
        match line.trim().to_ascii_lowercase().as_str() {
            "l" => return Ok(Some(GameMode::Learning)),
            "c" => return Ok(Some(GameMode::Challenge)),
            other => match other.parse::<GameMode>() {
                Ok(mode) => return Ok(Some(mode)),
                Err(err) => println!("{err}"),
            },
        }
    }
    Ok(None)
}

fn print_level(snapshot: &SessionSnapshot) {
    let level = &snapshot.level;
    println!();
    println!(
        "── Level {} / {} · {} · {} ({})",
        level.number, level.total, level.title, level.difficulty, level.rank
    );
    println!("Concept: {}", level.concept);
    if let Some(examples) = &level.examples {
        println!("Examples: {}", examples.join("   "));
    }
    println!("Target:");
    for line in level.target_markup.lines() {
        println!("  {line}");
    }
    if let Some(timer) = &snapshot.timer {
        println!("Time: {timer}");
    }
}

fn print_help(snapshot: &SessionSnapshot) {
    println!("Type an abbreviation to run it. Commands:");
    if snapshot.level.examples.is_some() {
        println!("  :hint     ask for a hint");
    }
    println!("  :status   show the current level again");
    println!("  :restart  start this track over");
    println!("  :quit     leave the session");
}

/// What the play loop should do after a session ends.
enum Exit {
    Finished,
    Quit,
}

async fn play(handle: &SessionHandle, input: &mut Input) -> Result<Exit, Box<dyn std::error::Error>> {
    let snapshot = handle.snapshot().await;
    print_level(&snapshot);
    print_help(&snapshot);

    while let Some(line) = prompt(input, "emmet> ").await? {
        match line.trim() {
            ":quit" | ":q" => {
                handle.abandon().await;
                return Ok(Exit::Quit);
            }
            ":status" => print_level(&handle.snapshot().await),
            ":help" => print_help(&handle.snapshot().await),
            ":restart" => {
                handle.restart().await?;
                print_level(&handle.snapshot().await);
            }
            ":hint" => match handle.request_hint().await {
                Ok(HintOutcome::Shown(text)) => println!("Hint: {text}"),
                Ok(HintOutcome::Discarded) => {}
                Err(SessionError::HintsDisabled) => println!("No hints in challenge mode."),
                Err(SessionError::NoMistake) => println!("Hints unlock after a wrong answer."),
                Err(err) => return Err(err.into()),
            },
            _ => match handle.submit(&line).await? {
                SubmitOutcome::Ignored | SubmitOutcome::Discarded => {}
                SubmitOutcome::Resolved(status) => {
                    let snapshot = handle.snapshot().await;
                    if !snapshot.produced_markup.is_empty() {
                        println!("{}", snapshot.produced_markup);
                    }
                    if status == AttemptStatus::Matched {
                        println!("✓ Correct!");
                        match handle.advance().await? {
                            Advance::NextLevel { .. } => print_level(&handle.snapshot().await),
                            Advance::Completed { .. } => return Ok(Exit::Finished),
                        }
                    } else if let Some(message) = snapshot.error_message {
                        println!("✗ {message}");
                    }
                }
            },
        }
    }

    handle.abandon().await;
    Ok(Exit::Quit)
}

async fn issue_diploma(handle: &SessionHandle, input: &mut Input) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = handle.snapshot().await;
    println!();
    println!("Track complete!");
    if let Some(time) = &snapshot.final_time {
        println!("Final time: {time}");
    }

    while let Some(name) = prompt(input, "Your name for the diploma: ").await? {
        match handle.record_completion(&name).await {
            Ok(record) => {
                println!();
                println!("═══ Emmet Mastery Certificate ═══");
                println!("Awarded to {}", record.learner_name());
                println!("Track: {}", record.mode());
                if let Some(time) = record.final_time_display() {
                    println!("Time: {time}");
                }
                println!("Issued: {}", record.completed_at().format("%Y-%m-%d"));
                println!("{}", serde_json::to_string_pretty(&record)?);
                return Ok(());
            }
            Err(SessionError::Completion(err)) => println!("{err}"),
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut iter = std::env::args().skip(1);
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let mut config = EngineConfig::from_env()?;
    if parsed.seed.is_some() {
        config = config.with_seed(parsed.seed);
    }
    let preset_mode = match parsed.mode {
        Some(mode) => Some(mode),
        None => mode_from_env()?,
    };

    let (expander, hints) = build_collaborators(parsed.expander);
    let service = SessionLoopService::new(expander, hints, config, Clock::system());
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    println!("Emmet trainer");
    let mut next_mode = preset_mode;
    loop {
        let mode = match next_mode.take() {
            Some(mode) => mode,
            None => match choose_mode(&mut input).await? {
                Some(mode) => mode,
                None => return Ok(()),
            },
        };

        let handle = service.start_session(mode).await?;
        tracing::info!(%mode, "track started");
        match play(&handle, &mut input).await? {
            Exit::Finished => {
                issue_diploma(&handle, &mut input).await?;
                return Ok(());
            }
            Exit::Quit => {
                if preset_mode.is_some() {
                    return Ok(());
                }
            }
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
