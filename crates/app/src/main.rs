mod input;
mod logging;
mod render;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use quiz_core::model::{Topic, TopicCatalog};
use quiz_services::{Clock, HttpQuizApi, QuizApiConfig, QuizController, QuizLoopService};

use crate::input::{HELP, Input};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidUrl { raw: String },
    InvalidTimeout { raw: String },
    InvalidTopics { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidUrl { raw } => write!(f, "invalid --api value: {raw}"),
            ArgsError::InvalidTimeout { raw } => write!(f, "invalid --timeout value: {raw}"),
            ArgsError::InvalidTopics { raw } => write!(f, "invalid topic list: {raw}"),
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
    eprintln!("  quiz [--api <url>] [--timeout <secs>] [--topics <a,b,..>] [--topic <name>] [-v]...");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api http://127.0.0.1:5000");
    eprintln!("  --timeout 30");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_API_URL, QUIZ_API_TIMEOUT_SECS, QUIZ_TOPICS, RUST_LOG");
}

struct Args {
    api: QuizApiConfig,
    topics: TopicCatalog,
    topic: Option<Topic>,
    verbosity: u8,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut api = QuizApiConfig::from_env();
        let mut topics = match std::env::var("QUIZ_TOPICS") {
            Ok(raw) => parse_topics(&raw)?,
            Err(_) => TopicCatalog::default(),
        };
        let mut topic = None;
        let mut verbosity = 0_u8;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => {
                    let value = require_value(args, "--api")?;
                    if !(value.starts_with("http://") || value.starts_with("https://")) {
                        return Err(ArgsError::InvalidUrl { raw: value });
                    }
                    api.base_url = value;
                }
                "--timeout" => {
                    let value = require_value(args, "--timeout")?;
                    let secs: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidTimeout { raw: value.clone() })?;
                    api.timeout = Duration::from_secs(secs);
                }
                "--topics" => {
                    let value = require_value(args, "--topics")?;
                    topics = parse_topics(&value)?;
                }
                "--topic" => {
                    let value = require_value(args, "--topic")?;
                    let parsed = Topic::new(value.clone())
                        .map_err(|_| ArgsError::InvalidTopics { raw: value })?;
                    topic = Some(parsed);
                }
                "-v" | "--verbose" => verbosity = verbosity.saturating_add(1),
                "-vv" => verbosity = verbosity.saturating_add(2),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            api,
            topics,
            topic,
            verbosity,
        })
    }
}

fn parse_topics(raw: &str) -> Result<TopicCatalog, ArgsError> {
    TopicCatalog::parse_list(raw).map_err(|_| ArgsError::InvalidTopics {
        raw: raw.to_string(),
    })
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    logging::init_logging(args.verbosity).map_err(|e| e.to_string())?;
    tracing::info!(api = %args.api.base_url, "starting quiz shell");

    let api = Arc::new(HttpQuizApi::new(args.api)?);
    let service = QuizLoopService::new(api.clone(), api);
    let mut controller = QuizController::new(Clock::system(), args.topics);
    if let Some(topic) = &args.topic {
        controller.select_topic(topic)?;
    }

    println!("{}", render::render(&controller.view()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let view = controller.view();
        let action = match input::parse(&line, &view) {
            Ok(Input::Act(action)) => action,
            Ok(Input::Show) => {
                println!("{}", render::render(&view));
                continue;
            }
            Ok(Input::Help) => {
                println!("{HELP}");
                continue;
            }
            Ok(Input::Quit) => break,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        if let Err(err) = service.handle(&mut controller, action).await {
            // User-visible failures are already part of the rendered view.
            if !err.is_user_visible() {
                println!("{err}");
            }
        }
        println!("{}", render::render(&controller.view()));
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
