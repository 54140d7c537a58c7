use super::models::Theme;
use super::question::insert_question;
use super::theme::insert_theme;
use super::Db;
use crate::error::{QuizError, Result, ResultExt};
use crate::models::CatalogSeed;

impl Db {
    /// Loads the built-in catalog when the store has no themes at all.
    /// Returns whether anything was written.
    pub async fn seed_if_empty(&self) -> Result<bool> {
        let catalog = CatalogSeed::default_catalog()?;
        self.seed_catalog_if_empty(&catalog).await
    }

    /// Writes `catalog` in one transaction, but only into a store without
    /// themes. Concurrent callers sharing this handle run one at a time.
    ///
    /// The write lock is taken before the emptiness check, so a handle on
    /// the same file that loses the race waits, then finds the themes.
    pub async fn seed_catalog_if_empty(&self, catalog: &CatalogSeed) -> Result<bool> {
        catalog.validate()?;

        let _guard = self.seed_guard.lock().await;
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM themes")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            tracing::debug!("catalog already has {existing} theme(s), skipping seed");
            return Ok(false);
        }

        for seed_theme in &catalog.themes {
            let theme = Theme {
                id: self.ids.next_id(),
                name: seed_theme.name.trim().to_owned(),
            };

            // Another process seeded first; dropping the transaction rolls ours back.
            match insert_theme(&mut *tx, &theme)
                .await
                .or_classify(&format!("theme '{}'", theme.name))
            {
                Err(QuizError::Conflict(_)) => {
                    tracing::warn!("catalog was seeded concurrently, rolling back");
                    return Ok(false);
                }
                other => other?,
            }

            for seed_question in &seed_theme.questions {
                let question = seed_question.to_question(self.ids.next_id(), &theme.id)?;
                insert_question(&mut *tx, &question)
                    .await
                    .or_classify("seed question")?;
            }
        }

        tx.commit().await?;

        tracing::info!(
            themes = catalog.themes.len(),
            questions = catalog.question_count(),
            "default catalog seeded"
        );
        Ok(true)
    }
}
