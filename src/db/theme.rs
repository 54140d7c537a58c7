use sqlx::{Executor, Sqlite};

use super::models::{Theme, ThemeWithCount};
use super::Db;
use crate::error::{QuizError, Result, ResultExt};

impl Db {
    /// Creates a theme. The name is stored trimmed and must be unique.
    pub async fn add_theme(&self, name: &str) -> Result<Theme> {
        let name = name.trim();
        if name.is_empty() {
            tracing::warn!("rejected theme with empty name");
            return Err(QuizError::Validation("theme name must not be empty".into()));
        }

        let theme = Theme {
            id: self.ids.next_id(),
            name: name.to_owned(),
        };

        insert_theme(&self.pool, &theme)
            .await
            .or_classify(&format!("theme '{name}'"))?;

        tracing::info!("new theme created with id: {}", theme.id);
        Ok(theme)
    }

    /// All themes with the number of questions each one owns, empty themes included.
    pub async fn list_themes_with_counts(&self) -> Result<Vec<ThemeWithCount>> {
        let themes = sqlx::query_as::<_, ThemeWithCount>(
            r#"
            SELECT
              themes.id AS id,
              themes.name AS name,
              COUNT(questions.id) AS question_count
            FROM
              themes
              LEFT JOIN questions ON questions.theme_id = themes.id
            GROUP BY
              themes.id, themes.name
            ORDER BY
              themes.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(themes)
    }

    pub async fn get_theme(&self, theme_id: &str) -> Result<Option<Theme>> {
        let theme = sqlx::query_as::<_, Theme>("SELECT id, name FROM themes WHERE id = ?")
            .bind(theme_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(theme)
    }

    pub(crate) async fn theme_exists(&self, theme_id: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM themes WHERE id = ?)")
            .bind(theme_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Deletes a theme and, by cascade, its questions. Missing ids are a no-op;
    /// the return value tells whether anything was removed.
    pub async fn delete_theme(&self, theme_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM themes WHERE id = ?")
            .bind(theme_id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            tracing::info!("theme deleted with id: {theme_id}");
        } else {
            tracing::debug!("no theme with id {theme_id} to delete");
        }
        Ok(removed)
    }

    /// Removes every theme and question. Returns how many themes were removed.
    pub async fn reset_catalog(&self) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let questions = sqlx::query("DELETE FROM questions").execute(&mut *tx).await?;
        let themes = sqlx::query("DELETE FROM themes").execute(&mut *tx).await?;

        tx.commit().await?;

        tracing::info!(
            themes = themes.rows_affected(),
            questions = questions.rows_affected(),
            "catalog reset"
        );
        Ok(themes.rows_affected())
    }
}

pub(super) async fn insert_theme<'e, E>(executor: E, theme: &Theme) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("INSERT INTO themes (id, name) VALUES (?, ?)")
        .bind(&theme.id)
        .bind(&theme.name)
        .execute(executor)
        .await?;

    Ok(())
}
