use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;

use crate::db::models::Question;
use crate::error::{QuizError, Result};
use crate::names::OPTION_COUNT;

/// 1-based position of an option within a question. Only 1..=4 can be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnswerIndex(u8);

impl AnswerIndex {
    pub const ALL: [AnswerIndex; OPTION_COUNT] =
        [AnswerIndex(1), AnswerIndex(2), AnswerIndex(3), AnswerIndex(4)];

    pub fn new(value: i64) -> Result<Self> {
        if (1..=OPTION_COUNT as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(QuizError::Validation(format!(
                "option number must be between 1 and {OPTION_COUNT}, got {value}"
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based slot into a question's `options` array.
    pub fn slot(self) -> usize {
        usize::from(self.0) - 1
    }
}

impl fmt::Display for AnswerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A question as typed in by a user or read from the default catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    pub statement: String,
    pub options: [String; OPTION_COUNT],
    pub correct_index: i64,
}

impl NewQuestion {
    pub fn new(statement: impl Into<String>, options: [&str; OPTION_COUNT], correct_index: i64) -> Self {
        Self {
            statement: statement.into(),
            options: options.map(str::to_owned),
            correct_index,
        }
    }

    /// Checks every field and builds the stored form with trimmed text.
    pub fn to_question(&self, id: String, theme_id: &str) -> Result<Question> {
        let statement = self.statement.trim();
        if statement.is_empty() {
            return Err(QuizError::Validation("question statement must not be empty".into()));
        }

        if let Some(pos) = self.options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuizError::Validation(format!("option {} must not be empty", pos + 1)));
        }

        let correct_index = AnswerIndex::new(self.correct_index)?;

        Ok(Question {
            id,
            theme_id: theme_id.to_owned(),
            statement: statement.to_owned(),
            options: self.options.clone().map(|o| o.trim().to_owned()),
            correct_index,
        })
    }
}

/// Shape of `seed/default_catalog.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSeed {
    pub themes: Vec<SeedTheme>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedTheme {
    pub name: String,
    #[serde(default)]
    pub questions: Vec<NewQuestion>,
}

const DEFAULT_CATALOG: &str = include_str!("../seed/default_catalog.json");

impl CatalogSeed {
    pub fn default_catalog() -> Result<Self> {
        Ok(serde_json::from_str(DEFAULT_CATALOG)?)
    }

    /// Rejects empty or duplicate theme names and malformed questions before
    /// anything is written.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for theme in &self.themes {
            let name = theme.name.trim();
            if name.is_empty() {
                return Err(QuizError::Validation("seed theme name must not be empty".into()));
            }
            if !seen.insert(name) {
                return Err(QuizError::Conflict(format!("seed theme '{name}' appears twice")));
            }
            for question in &theme.questions {
                question.to_question(String::new(), "")?;
            }
        }
        Ok(())
    }

    pub fn question_count(&self) -> usize {
        self.themes.iter().map(|t| t.questions.len()).sum()
    }
}
