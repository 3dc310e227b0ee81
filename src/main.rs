use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lesson_quiz::config::{self, QuizConfig};
use lesson_quiz::quiz::QuizPipeline;
use lesson_quiz::QuizError;

#[derive(Parser)]
#[command(name = "lesson-quiz")]
#[command(about = "Show how quiz sections are picked for a lesson", long_about = None)]
struct Args {
  /// Lesson markdown file
  #[arg(value_name = "FILE")]
  lesson: PathBuf,

  /// Heading id the learner has read up to
  #[arg(long)]
  heading: Option<String>,

  /// Print the report as JSON
  #[arg(long)]
  json: bool,

  /// Config file (defaults to config.toml or LESSON_QUIZ_CONFIG)
  #[arg(long)]
  config: Option<PathBuf>,
}

fn main() -> ExitCode {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lesson_quiz=info".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let args = Args::parse();
  match run(&args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::error!("{}", e);
      eprintln!("{}", e.user_message());
      ExitCode::FAILURE
    }
  }
}

fn run(args: &Args) -> Result<(), QuizError> {
  let cfg = match &args.config {
    Some(path) => QuizConfig::from_file(path)?,
    None => config::load_config()?,
  };

  let bytes = std::fs::read(&args.lesson).map_err(|source| QuizError::Io {
    path: args.lesson.clone(),
    source,
  })?;

  let pipeline = QuizPipeline::new(cfg);
  let report = pipeline.inspect_bytes(&bytes, args.heading.as_deref())?;

  if args.json {
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
  } else {
    print!("{}", report.to_text());
  }
  Ok(())
}
