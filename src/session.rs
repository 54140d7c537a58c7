//! One play-through of a theme: draw questions, collect answers, score.
//!
//! ```text
//! Selecting --start--> InProgress --last submit_answer--> Finished
//!     ^                     |                                 |
//!     +------------------ restart ----------------------------+
//! ```

use crate::db::{Db, Question};
use crate::error::{QuizError, Result};
use crate::models::AnswerIndex;

#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Selecting,
    InProgress(Round),
    Finished(Round),
}

/// Questions drawn for a round and the answers given so far.
#[derive(Debug, Clone)]
pub struct Round {
    theme_id: String,
    drawn: Vec<Question>,
    answers: Vec<Answer>,
}

impl Round {
    fn position(&self) -> usize {
        self.answers.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub question: Question,
    pub chosen: AnswerIndex,
}

impl Answer {
    pub fn is_correct(&self) -> bool {
        self.question.is_correct(self.chosen)
    }

    pub fn chosen_option(&self) -> &str {
        self.question.option(self.chosen)
    }

    pub fn correct_option(&self) -> &str {
        self.question.correct_option()
    }
}

/// Result of a finished round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scorecard<'a> {
    pub theme_id: &'a str,
    /// Percentage of correct answers, rounded half up.
    pub score: u32,
    pub correct: usize,
    pub total: usize,
    pub answers: &'a [Answer],
}

impl<'a> Scorecard<'a> {
    pub fn misses(&self) -> impl Iterator<Item = &'a Answer> {
        self.answers.iter().filter(|a| !a.is_correct())
    }
}

#[derive(Debug, Default)]
pub struct QuizSession {
    state: SessionState,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self.state, SessionState::Selecting)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, SessionState::Finished(_))
    }

    fn round(&self) -> Option<&Round> {
        match &self.state {
            SessionState::Selecting => None,
            SessionState::InProgress(round) | SessionState::Finished(round) => Some(round),
        }
    }

    pub fn theme_id(&self) -> Option<&str> {
        self.round().map(|r| r.theme_id.as_str())
    }

    pub fn drawn_questions(&self) -> &[Question] {
        self.round().map(|r| r.drawn.as_slice()).unwrap_or_default()
    }

    pub fn answers(&self) -> &[Answer] {
        self.round().map(|r| r.answers.as_slice()).unwrap_or_default()
    }

    /// Index of the next unanswered question.
    pub fn position(&self) -> usize {
        self.round().map_or(0, Round::position)
    }

    pub fn remaining(&self) -> usize {
        self.drawn_questions().len() - self.position()
    }

    /// The question awaiting an answer, while a round is in progress.
    pub fn current_question(&self) -> Option<&Question> {
        match &self.state {
            SessionState::InProgress(round) => round.drawn.get(round.position()),
            _ => None,
        }
    }

    /// Starts a round of `count` questions from `theme_id`.
    ///
    /// The theme must hold at least `count` questions and `count` must be at
    /// least one; otherwise the session stays in `Selecting`.
    pub async fn start(&mut self, db: &Db, theme_id: &str, count: usize) -> Result<()> {
        self.start_seeded(db, theme_id, count, rand::random::<u64>())
            .await
    }

    /// Like [`QuizSession::start`] with a fixed shuffle seed.
    pub async fn start_seeded(&mut self, db: &Db, theme_id: &str, count: usize, seed: u64) -> Result<()> {
        self.ensure_selecting()?;

        let available = db
            .list_themes_with_counts()
            .await?
            .into_iter()
            .find(|t| t.id == theme_id)
            .and_then(|t| usize::try_from(t.question_count).ok())
            .unwrap_or(0);

        if count == 0 || available < count {
            tracing::warn!("cannot start round on theme {theme_id}: {count} requested, {available} available");
            return Err(QuizError::InsufficientData {
                requested: count,
                available,
            });
        }

        let drawn = db
            .sample_random_questions_seeded(theme_id, count, seed)
            .await?;
        self.start_with_questions(theme_id, drawn)
    }

    /// Starts a round over an already drawn, non-empty set of questions.
    pub fn start_with_questions(&mut self, theme_id: &str, drawn: Vec<Question>) -> Result<()> {
        self.ensure_selecting()?;

        if drawn.is_empty() {
            return Err(QuizError::InsufficientData {
                requested: 0,
                available: 0,
            });
        }

        tracing::info!("round started on theme {theme_id} with {} question(s)", drawn.len());
        self.state = SessionState::InProgress(Round {
            theme_id: theme_id.to_owned(),
            drawn,
            answers: Vec::new(),
        });
        Ok(())
    }

    /// Records `chosen` for the current question and moves on. Answering the
    /// last question finishes the round.
    pub fn submit_answer(&mut self, chosen: AnswerIndex) -> Result<&Answer> {
        let SessionState::InProgress(round) = &mut self.state else {
            return Err(QuizError::InvalidState(match self.state {
                SessionState::Finished(_) => "the round is over; restart to play again".into(),
                _ => "no round in progress; start one first".into(),
            }));
        };

        let question = round
            .drawn
            .get(round.position())
            .cloned()
            .ok_or_else(|| QuizError::InvalidState("every question has been answered".into()))?;

        round.answers.push(Answer { question, chosen });

        if round.position() == round.drawn.len() {
            if let SessionState::InProgress(round) = std::mem::take(&mut self.state) {
                tracing::info!("round finished on theme {}", round.theme_id);
                self.state = SessionState::Finished(round);
            }
        }

        self.answers()
            .last()
            .ok_or_else(|| QuizError::InvalidState("answer was not recorded".into()))
    }

    /// Score breakdown, available once every drawn question is answered.
    pub fn scorecard(&self) -> Result<Scorecard<'_>> {
        let SessionState::Finished(round) = &self.state else {
            return Err(QuizError::InvalidState("the round is not finished yet".into()));
        };

        let total = round.answers.len();
        let correct = round.answers.iter().filter(|a| a.is_correct()).count();
        let score = percentage(correct, total)
            .ok_or_else(|| QuizError::InvalidState("no answers were recorded".into()))?;

        Ok(Scorecard {
            theme_id: &round.theme_id,
            score,
            correct,
            total,
            answers: &round.answers,
        })
    }

    /// Back to `Selecting`, discarding the current round.
    pub fn restart(&mut self) {
        self.state = SessionState::Selecting;
    }

    fn ensure_selecting(&self) -> Result<()> {
        if self.is_selecting() {
            Ok(())
        } else {
            Err(QuizError::InvalidState(
                "a round is already under way; restart first".into(),
            ))
        }
    }
}

/// `round(100 * correct / total)` with halves rounded up, `None` when `total` is zero.
fn percentage(correct: usize, total: usize) -> Option<u32> {
    if total == 0 {
        return None;
    }
    u32::try_from((200 * correct + total) / (2 * total)).ok()
}
