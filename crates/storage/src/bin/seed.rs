use std::fmt;

use chrono::{DateTime, Utc};
use quiz_core::editor::{QuestionDraft, QuizDraft};
use quiz_core::model::{QuestionKind, QuizId, QuizSettings};
use storage::repository::{QuizRepository, Storage};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("QUIZ_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut now = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let raw = require_value(&mut args, "--db")?;
                    if raw.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw });
                    }
                    db_url = raw;
                }
                "--now" => {
                    let raw = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&raw)
                        .map_err(|_| ArgsError::InvalidNow { raw })?;
                    now = Some(parsed.with_timezone(&Utc));
                }
                other => return Err(ArgsError::UnknownArg(other.to_owned())),
            }
        }

        Ok(Self { db_url, now })
    }
}

fn mc(prompt: &str, options: &[&str], correct_index: usize, points: u32) -> QuestionDraft {
    QuestionDraft {
        prompt: prompt.to_owned(),
        kind: QuestionKind::MultipleChoice {
            options: options.iter().map(|o| (*o).to_owned()).collect(),
            correct_index,
        },
        points,
        explanation: None,
        time_limit_secs: None,
    }
}

fn sample_quizzes(now: DateTime<Utc>) -> Result<Vec<quiz_core::model::Quiz>, Box<dyn std::error::Error>> {
    let js = QuizDraft {
        title: "JavaScript Fundamentals".to_owned(),
        description: Some("Test your knowledge of basic JavaScript concepts".to_owned()),
        questions: vec![
            (
                None,
                mc(
                    "Which of the following is NOT a JavaScript data type?",
                    &["String", "Boolean", "Integer", "Undefined"],
                    2,
                    10,
                ),
            ),
            (
                None,
                QuestionDraft {
                    prompt: "JavaScript is a statically typed language.".to_owned(),
                    kind: QuestionKind::TrueFalse {
                        correct_value: false,
                    },
                    points: 5,
                    explanation: Some(
                        "JavaScript is dynamically typed - variables can hold different types."
                            .to_owned(),
                    ),
                    time_limit_secs: None,
                },
            ),
            (
                None,
                QuestionDraft {
                    prompt: "What keyword is used to declare a constant in JavaScript?"
                        .to_owned(),
                    kind: QuestionKind::ShortAnswer {
                        correct_text: "const".to_owned(),
                    },
                    points: 5,
                    explanation: None,
                    time_limit_secs: None,
                },
            ),
            (
                None,
                mc(
                    "What will `typeof null` return in JavaScript?",
                    &["null", "undefined", "object", "boolean"],
                    2,
                    15,
                ),
            ),
        ],
        settings: QuizSettings::new(false, true, true, true, Some(30), Some(70))?,
    };

    let general = QuizDraft {
        title: "General Knowledge".to_owned(),
        description: Some("A quick mixed-topic warm-up".to_owned()),
        questions: vec![
            (
                None,
                mc(
                    "What is the capital of France?",
                    &["Berlin", "Paris", "Madrid", "Rome"],
                    1,
                    10,
                ),
            ),
            (
                None,
                QuestionDraft {
                    prompt: "The Pacific is the largest ocean on Earth.".to_owned(),
                    kind: QuestionKind::TrueFalse {
                        correct_value: true,
                    },
                    points: 5,
                    explanation: None,
                    time_limit_secs: None,
                },
            ),
            (
                None,
                QuestionDraft {
                    prompt: "Describe a book you read recently and what you took from it."
                        .to_owned(),
                    kind: QuestionKind::Essay,
                    points: 10,
                    explanation: None,
                    time_limit_secs: Some(300),
                },
            ),
        ],
        settings: QuizSettings::default(),
    };

    Ok(vec![
        js.build(QuizId::generate(), now, now)?,
        general.build(QuizId::generate(), now, now)?,
    ])
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse()?;
    let now = args.now.unwrap_or_else(Utc::now);

    let storage = Storage::sqlite(&args.db_url).await?;

    let quizzes = sample_quizzes(now)?;
    let count = quizzes.len();
    for quiz in &quizzes {
        storage.quizzes.upsert_quiz(quiz).await?;
    }

    println!("Seeded {count} sample quizzes into {}", args.db_url);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
