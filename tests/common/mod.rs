#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use themequiz::db::{Db, Question, Theme};
use themequiz::ids::{IdGenerator, SequentialIds, UlidGenerator};
use themequiz::models::NewQuestion;

pub async fn create_test_db() -> Db {
    create_test_db_with(Arc::new(UlidGenerator)).await
}

/// Path of a fresh, not yet created database file.
pub fn temp_db_path(label: &str) -> PathBuf {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir().join(format!(
        "themequiz_{label}_{}_{}.db",
        std::process::id(),
        id
    ));
    // Clean up leftover file from previous runs
    let _ = std::fs::remove_file(&path);
    path
}

pub fn temp_db_url() -> String {
    format!("sqlite://{}", temp_db_path("test").display())
}

pub async fn create_test_db_with(ids: Arc<dyn IdGenerator>) -> Db {
    Db::with_id_generator(&temp_db_url(), ids)
        .await
        .expect("failed to create test database")
}

pub async fn create_sequential_test_db(prefix: &str) -> Db {
    create_test_db_with(Arc::new(SequentialIds::new(prefix))).await
}

/// Question `n` of a generated set; its correct option cycles through 1..=4.
pub fn make_question(n: usize) -> NewQuestion {
    NewQuestion {
        statement: format!("Question {n}"),
        options: [
            format!("A{n}"),
            format!("B{n}"),
            format!("C{n}"),
            format!("D{n}"),
        ],
        correct_index: (n % 4) as i64 + 1,
    }
}

pub async fn theme_with_questions(db: &Db, name: &str, n: usize) -> (Theme, Vec<Question>) {
    let theme = db.add_theme(name).await.expect("add theme");
    let mut questions = Vec::with_capacity(n);
    for i in 0..n {
        questions.push(
            db.add_question(&theme.id, &make_question(i))
                .await
                .expect("add question"),
        );
    }
    (theme, questions)
}
