use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use sqlx::{Executor, Sqlite};

use super::models::{Question, QuestionRow};
use super::Db;
use crate::error::{QuizError, Result, ResultExt};
use crate::models::NewQuestion;

impl Db {
    /// Adds a question to an existing theme.
    pub async fn add_question(&self, theme_id: &str, new_question: &NewQuestion) -> Result<Question> {
        let question = new_question.to_question(self.ids.next_id(), theme_id)?;

        if !self.theme_exists(theme_id).await? {
            tracing::warn!("rejected question for missing theme {theme_id}");
            return Err(QuizError::Integrity(format!("theme '{theme_id}' does not exist")));
        }

        // The foreign key still guards against a theme deleted in between.
        insert_question(&self.pool, &question)
            .await
            .or_classify("question")?;

        tracing::info!("new question created with id: {} in theme: {theme_id}", question.id);
        Ok(question)
    }

    pub async fn list_questions_by_theme(&self, theme_id: &str) -> Result<Vec<Question>> {
        let rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, theme_id, statement, opt1, opt2, opt3, opt4, correct_index
            FROM questions
            WHERE theme_id = ?
            ORDER BY rowid
            "#,
        )
        .bind(theme_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Question::try_from).collect()
    }

    /// Missing ids are a no-op; the return value tells whether anything was removed.
    pub async fn delete_question(&self, question_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM questions WHERE id = ?")
            .bind(question_id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            tracing::info!("question deleted with id: {question_id}");
        }
        Ok(removed)
    }

    /// Draws `count` distinct questions of a theme uniformly at random.
    pub async fn sample_random_questions(&self, theme_id: &str, count: usize) -> Result<Vec<Question>> {
        self.sample_random_questions_seeded(theme_id, count, rand::random::<u64>())
            .await
    }

    /// Same as [`Db::sample_random_questions`], reproducible for a given seed
    /// and pool.
    pub async fn sample_random_questions_seeded(
        &self,
        theme_id: &str,
        count: usize,
        seed: u64,
    ) -> Result<Vec<Question>> {
        let mut questions = self.list_questions_by_theme(theme_id).await?;

        if questions.len() < count {
            tracing::warn!(
                "theme {theme_id} has {} question(s), {count} requested",
                questions.len()
            );
            return Err(QuizError::InsufficientData {
                requested: count,
                available: questions.len(),
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        questions.shuffle(&mut rng);
        questions.truncate(count);

        tracing::debug!("drew {count} question(s) from theme {theme_id} with seed {seed}");
        Ok(questions)
    }
}

pub(super) async fn insert_question<'e, E>(executor: E, question: &Question) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let [opt1, opt2, opt3, opt4] = &question.options;

    sqlx::query(
        r#"
        INSERT INTO questions (id, theme_id, statement, opt1, opt2, opt3, opt4, correct_index)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&question.id)
    .bind(&question.theme_id)
    .bind(&question.statement)
    .bind(opt1)
    .bind(opt2)
    .bind(opt3)
    .bind(opt4)
    .bind(i64::from(question.correct_index.get()))
    .execute(executor)
    .await?;

    Ok(())
}
