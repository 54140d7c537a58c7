// Database model structs

use crate::error::{QuizError, Result};
use crate::models::AnswerIndex;
use crate::names::OPTION_COUNT;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Theme {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ThemeWithCount {
    pub id: String,
    pub name: String,
    pub question_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub theme_id: String,
    pub statement: String,
    pub options: [String; OPTION_COUNT],
    pub correct_index: AnswerIndex,
}

impl Question {
    pub fn option(&self, index: AnswerIndex) -> &str {
        &self.options[index.slot()]
    }

    pub fn correct_option(&self) -> &str {
        self.option(self.correct_index)
    }

    pub fn is_correct(&self, chosen: AnswerIndex) -> bool {
        chosen == self.correct_index
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct QuestionRow {
    pub id: String,
    pub theme_id: String,
    pub statement: String,
    pub opt1: String,
    pub opt2: String,
    pub opt3: String,
    pub opt4: String,
    pub correct_index: i64,
}

impl TryFrom<QuestionRow> for Question {
    type Error = QuizError;

    fn try_from(row: QuestionRow) -> Result<Self> {
        let correct_index = AnswerIndex::new(row.correct_index).map_err(|_| {
            QuizError::Integrity(format!(
                "stored question {} has correct index {}",
                row.id, row.correct_index
            ))
        })?;

        Ok(Question {
            id: row.id,
            theme_id: row.theme_id,
            statement: row.statement,
            options: [row.opt1, row.opt2, row.opt3, row.opt4],
            correct_index,
        })
    }
}
