use std::process::ExitCode;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use themequiz::db::{Db, Theme};
use themequiz::models::{AnswerIndex, NewQuestion};
use themequiz::names;
use themequiz::session::QuizSession;
use themequiz::QuizError;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// SQLite URL or file path of the quiz catalog.
    #[arg(short, long, env = "DATABASE_URL", default_value = names::DEFAULT_DATABASE_URL)]
    database_url: String,

    /// Do not load the default catalog into an empty store on startup.
    #[arg(long, env = "THEMEQUIZ_NO_SEED")]
    no_seed: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List themes and how many questions each one has.
    Themes,
    /// Create a theme.
    AddTheme { name: String },
    /// Delete a theme together with all of its questions.
    DeleteTheme {
        /// Theme id or name.
        theme: String,
        #[arg(long)]
        yes: bool,
    },
    /// List the questions of a theme.
    Questions {
        /// Theme id or name.
        theme: String,
    },
    /// Add a four-option question to a theme.
    AddQuestion {
        /// Theme id or name.
        theme: String,
        #[arg(long)]
        statement: String,
        /// Repeat exactly four times.
        #[arg(long = "option", required = true)]
        options: Vec<String>,
        /// Number (1-4) of the correct option.
        #[arg(long)]
        correct: i64,
    },
    /// Delete a single question.
    DeleteQuestion {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Play a round on a theme.
    Play {
        /// Theme id or name.
        theme: String,
        #[arg(short, long, default_value_t = names::DEFAULT_QUESTION_COUNT)]
        count: usize,
        /// Fix the draw order.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Load the default catalog if the store has no themes.
    Seed,
    /// Delete every theme and question.
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;

    let filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| names::DEFAULT_LOG_FILTER.to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let db = Db::new(&args.database_url)
        .await
        .wrap_err_with(|| format!("could not open {}", args.database_url))?;

    let seeds_itself = matches!(args.command, Command::Seed | Command::Reset { .. });
    if !args.no_seed && !seeds_itself {
        db.seed_if_empty().await?;
    }

    let outcome = run(&db, args.command).await;
    db.close().await;

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(report) => match report.downcast_ref::<QuizError>() {
            Some(err) if err.is_user_error() => {
                eprintln!("error: {err}");
                Ok(ExitCode::from(2))
            }
            _ => Err(report),
        },
    }
}

async fn run(db: &Db, command: Command) -> color_eyre::Result<()> {
    match command {
        Command::Themes => {
            let themes = db.list_themes_with_counts().await?;
            if themes.is_empty() {
                println!("no themes yet");
            }
            for theme in themes {
                println!("{}  {} ({})", theme.id, theme.name, theme.question_count);
            }
        }
        Command::AddTheme { name } => {
            let theme = db.add_theme(&name).await?;
            println!("created theme {} ({})", theme.name, theme.id);
        }
        Command::DeleteTheme { theme, yes } => {
            let theme = resolve_theme(db, &theme).await?;
            confirm(yes, &format!("delete theme '{}' and all its questions", theme.name))?;
            db.delete_theme(&theme.id).await?;
            println!("deleted theme {}", theme.name);
        }
        Command::Questions { theme } => {
            let theme = resolve_theme(db, &theme).await?;
            let questions = db.list_questions_by_theme(&theme.id).await?;
            if questions.is_empty() {
                println!("theme '{}' has no questions", theme.name);
            }
            for question in questions {
                println!("{}  {}", question.id, question.statement);
                for (idx, option) in AnswerIndex::ALL.iter().zip(&question.options) {
                    let mark = if *idx == question.correct_index { '*' } else { ' ' };
                    println!("   {mark}{idx}) {option}");
                }
            }
        }
        Command::AddQuestion {
            theme,
            statement,
            options,
            correct,
        } => {
            let theme = resolve_theme(db, &theme).await?;
            let options: [String; names::OPTION_COUNT] = options.try_into().map_err(|given: Vec<String>| {
                QuizError::Validation(format!(
                    "exactly {} options are required, got {}",
                    names::OPTION_COUNT,
                    given.len()
                ))
            })?;
            let question = db
                .add_question(
                    &theme.id,
                    &NewQuestion {
                        statement,
                        options,
                        correct_index: correct,
                    },
                )
                .await?;
            println!("added question {} to {}", question.id, theme.name);
        }
        Command::DeleteQuestion { id, yes } => {
            confirm(yes, &format!("delete question {id}"))?;
            if db.delete_question(&id).await? {
                println!("deleted question {id}");
            } else {
                println!("no question with id {id}");
            }
        }
        Command::Play { theme, count, seed } => {
            let theme = resolve_theme(db, &theme).await?;
            play(db, &theme, count, seed).await?;
        }
        Command::Seed => {
            if db.seed_if_empty().await? {
                println!("default catalog loaded");
            } else {
                println!("catalog already has themes, nothing loaded");
            }
        }
        Command::Reset { yes } => {
            confirm(yes, "delete every theme and question")?;
            let removed = db.reset_catalog().await?;
            println!("removed {removed} theme(s)");
        }
    }

    Ok(())
}

/// Accepts a theme id or, failing that, a case-insensitive theme name.
async fn resolve_theme(db: &Db, key: &str) -> color_eyre::Result<Theme> {
    if let Some(theme) = db.get_theme(key).await? {
        return Ok(theme);
    }

    let key = key.trim();
    db.list_themes_with_counts()
        .await?
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(key))
        .map(|t| Theme { id: t.id, name: t.name })
        .ok_or_else(|| QuizError::Validation(format!("no theme named or identified by '{key}'")).into())
}

/// Destructive commands only run with `--yes`.
fn confirm(yes: bool, action: &str) -> themequiz::Result<()> {
    if !yes {
        return Err(QuizError::Validation(format!("refusing to {action} without --yes")));
    }
    Ok(())
}

async fn play(db: &Db, theme: &Theme, count: usize, seed: Option<u64>) -> color_eyre::Result<()> {
    let mut session = QuizSession::new();
    match seed {
        Some(seed) => session.start_seeded(db, &theme.id, count, seed).await?,
        None => session.start(db, &theme.id, count).await?,
    }

    println!("{}: {} question(s). Answer with 1-4.", theme.name, count);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(question) = session.current_question() {
        println!();
        println!(
            "[{}/{}] {}",
            session.position() + 1,
            session.drawn_questions().len(),
            question.statement
        );
        for (idx, option) in AnswerIndex::ALL.iter().zip(&question.options) {
            println!("  {idx}) {option}");
        }

        let Some(line) = lines.next_line().await.wrap_err("could not read answer")? else {
            println!("input closed, round abandoned");
            return Ok(());
        };

        let chosen = match line.trim().parse::<i64>() {
            Ok(n) => match AnswerIndex::new(n) {
                Ok(chosen) => chosen,
                Err(err) => {
                    println!("{err}");
                    continue;
                }
            },
            Err(_) => {
                println!("please answer with a number from 1 to {}", names::OPTION_COUNT);
                continue;
            }
        };

        let answer = session.submit_answer(chosen)?;
        if answer.is_correct() {
            println!("correct!");
        } else {
            println!(
                "wrong, the answer was {}) {}",
                answer.question.correct_index,
                answer.correct_option()
            );
        }
    }

    let card = session.scorecard()?;
    println!();
    println!("You got {}% right ({} of {}).", card.score, card.correct, card.total);
    for miss in card.misses() {
        println!(
            "  {}: you chose {}) {}, correct was {}) {}",
            miss.question.statement,
            miss.chosen,
            miss.chosen_option(),
            miss.question.correct_index,
            miss.correct_option()
        );
    }

    Ok(())
}
