use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::QuizDefinition;
use services::{
    Clock, HttpQuizSource, QuizService, QuizSessionRunner, QuizSource, QuizSourceConfig,
    SessionUpdate, StaticQuizSource,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt as log_fmt, layer::SubscriberExt, util::SubscriberInitExt};
use ui::vm::{IntroVm, QuestionScreenVm, ResultsVm};

mod terminal;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTickMs { raw: String },
    MissingSource,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTickMs { raw } => write!(f, "invalid --tick-ms value: {raw}"),
            ArgsError::MissingSource => {
                write!(f, "no quiz source: pass --url or --file (or set QUIZ_SOURCE_URL)")
            }
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz [--url <url>] [--proxy <prefix>] [--file <path>] [--shuffle] [--tick-ms <ms>]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --url <url>        Quiz document URL");
    eprintln!("  --proxy <prefix>   Prefix the encoded URL with a CORS proxy");
    eprintln!("  --file <path>      Read the quiz document from a local JSON file");
    eprintln!("  --shuffle          Shuffle option order");
    eprintln!("  --tick-ms <ms>     Real milliseconds per countdown second (default: 1000)");
    eprintln!();
    eprintln!("Environment (also read from .env):");
    eprintln!("  QUIZ_SOURCE_URL, QUIZ_PROXY_URL, QUIZ_FILE, RUST_LOG");
}

struct Args {
    url: Option<String>,
    proxy: Option<String>,
    file: Option<String>,
    shuffle: bool,
    tick_interval: Duration,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            url: None,
            proxy: None,
            file: env_value("QUIZ_FILE"),
            shuffle: false,
            tick_interval: Duration::from_secs(1),
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--url" => parsed.url = Some(require_value(args, "--url")?),
                "--proxy" => parsed.proxy = Some(require_value(args, "--proxy")?),
                "--file" => parsed.file = Some(require_value(args, "--file")?),
                "--shuffle" => parsed.shuffle = true,
                "--tick-ms" => {
                    let value = require_value(args, "--tick-ms")?;
                    let millis: u64 = value
                        .parse()
                        .ok()
                        .filter(|ms| *ms > 0)
                        .ok_or_else(|| ArgsError::InvalidTickMs { raw: value.clone() })?;
                    parsed.tick_interval = Duration::from_millis(millis);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    fn source(&self) -> Result<Arc<dyn QuizSource>, Box<dyn std::error::Error>> {
        if let Some(path) = &self.file {
            let body = std::fs::read_to_string(path)?;
            return Ok(Arc::new(StaticQuizSource::from_json(&body)?));
        }

        let config = match &self.url {
            Some(url) => Some(QuizSourceConfig::new(url)?),
            None => QuizSourceConfig::from_env()?,
        };
        let mut config = config.ok_or(ArgsError::MissingSource)?;
        if let Some(proxy) = &self.proxy {
            config = config.with_proxy(proxy)?;
        }
        Ok(Arc::new(HttpQuizSource::new(config)))
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = log_fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}

/// Lines typed by the learner, read on a background task.
struct Input {
    lines: mpsc::Receiver<String>,
}

impl Input {
    fn spawn() -> Self {
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if tx.send(line).await.is_err() {
                    break;
                }
            }
        });
        Self { lines: rx }
    }

    async fn next_line(&mut self) -> Option<String> {
        self.lines.recv().await
    }
}

async fn play(
    definition: &Arc<QuizDefinition>,
    tick_interval: Duration,
    input: &mut Input,
) -> Result<(), Box<dyn std::error::Error>> {
    let (answer_tx, answer_rx) = mpsc::channel(8);
    let (update_tx, mut update_rx) = mpsc::channel(64);
    let runner = QuizSessionRunner::new(Arc::clone(definition), Clock::default_clock())
        .with_tick_interval(tick_interval);
    let session = tokio::spawn(runner.run(answer_rx, update_tx));

    let mut screen: Option<QuestionScreenVm> = None;
    let mut input_open = true;
    loop {
        tokio::select! {
            update = update_rx.recv() => match update {
                Some(SessionUpdate::Started(state) | SessionUpdate::Answered(state)) => {
                    screen = QuestionScreenVm::from_snapshot(definition, &state);
                    if let Some(vm) = &screen {
                        terminal::render_question(vm);
                    }
                }
                Some(SessionUpdate::Ticked(state)) => {
                    screen = QuestionScreenVm::from_snapshot(definition, &state);
                    let remaining = state.time_remaining_seconds();
                    if let Some(vm) = &screen
                        && terminal::TIMER_WARNINGS.contains(&remaining)
                    {
                        terminal::render_timer_warning(vm);
                    }
                }
                Some(SessionUpdate::Rejected { .. }) => terminal::render_rejected(),
                Some(SessionUpdate::Finished(outcome)) => {
                    let results = ResultsVm::from_summary(definition, &outcome.state, &outcome.summary);
                    terminal::render_results(&results);
                    break;
                }
                None => break,
            },
            line = input.next_line(), if input_open => match line {
                Some(line) => {
                    let Some(vm) = &screen else { continue };
                    let choice = line
                        .trim()
                        .parse::<usize>()
                        .ok()
                        .and_then(|number| vm.option_for_number(number));
                    match choice {
                        Some(option_id) => {
                            if answer_tx.send(option_id).await.is_err() {
                                break;
                            }
                        }
                        None => terminal::render_invalid_choice(vm.options.len()),
                    }
                }
                None => input_open = false,
            },
        }
    }

    drop(answer_tx);
    session.await??;
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse(&mut std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let service = QuizService::new(args.source()?).with_shuffle_options(args.shuffle);
    let definition = service.load().await.map_err(|e| {
        terminal::render_load_error();
        e
    })?;

    let mut input = Input::spawn();
    terminal::render_intro(&IntroVm::from_definition(&definition));
    if input.next_line().await.is_none() {
        return Ok(());
    }

    loop {
        play(&definition, args.tick_interval, &mut input).await?;

        terminal::prompt("Try again? [y/N] ");
        match input.next_line().await {
            Some(answer) if answer.trim().eq_ignore_ascii_case("y") => {
                info!(title = %definition.title, "restarting quiz");
            }
            _ => break,
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
