mod common;

use std::collections::HashSet;

use common::{create_test_db, theme_with_questions};
use themequiz::db::Question;
use themequiz::models::AnswerIndex;
use themequiz::session::{QuizSession, SessionState};
use themequiz::QuizError;

fn wrong_answer(question: &Question) -> AnswerIndex {
    AnswerIndex::ALL
        .into_iter()
        .find(|idx| *idx != question.correct_index)
        .expect("four options always leave a wrong one")
}

/// Answers the current question, correctly when `correct` is set.
fn answer(session: &mut QuizSession, correct: bool) -> bool {
    let question = session.current_question().expect("question in progress");
    let chosen = if correct {
        question.correct_index
    } else {
        wrong_answer(question)
    };
    session.submit_answer(chosen).expect("answer accepted").is_correct()
}

#[tokio::test]
async fn test_three_of_five_scores_sixty() {
    let db = create_test_db().await;
    let (theme, _) = theme_with_questions(&db, "Quiz", 8).await;

    let mut session = QuizSession::new();
    session.start(&db, &theme.id, 5).await.unwrap();
    assert_eq!(session.drawn_questions().len(), 5);

    for correct in [true, false, true, false, true] {
        assert_eq!(answer(&mut session, correct), correct);
    }

    assert!(session.is_finished());
    let card = session.scorecard().unwrap();
    assert_eq!(card.score, 60);
    assert_eq!(card.correct, 3);
    assert_eq!(card.total, 5);
    assert_eq!(card.theme_id, theme.id);
    assert_eq!(card.answers.len(), 5);
    assert_eq!(card.misses().count(), 2);
}

#[tokio::test]
async fn test_answers_follow_draw_order() {
    let db = create_test_db().await;
    let (theme, _) = theme_with_questions(&db, "Quiz", 6).await;

    let mut session = QuizSession::new();
    session.start(&db, &theme.id, 4).await.unwrap();
    let drawn: Vec<Question> = session.drawn_questions().to_vec();

    let unique: HashSet<&str> = drawn.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(unique.len(), 4);

    for (i, expected) in drawn.iter().enumerate() {
        assert_eq!(session.position(), i);
        assert_eq!(session.remaining(), 4 - i);
        assert_eq!(session.current_question(), Some(expected));
        answer(&mut session, i % 2 == 0);
    }

    assert_eq!(session.position(), 4);
    assert!(session.current_question().is_none());

    let answered: Vec<&str> = session
        .answers()
        .iter()
        .map(|a| a.question.id.as_str())
        .collect();
    let drawn_ids: Vec<&str> = drawn.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(answered, drawn_ids);

    for miss in session.scorecard().unwrap().misses() {
        assert_ne!(miss.chosen, miss.question.correct_index);
        assert_eq!(miss.correct_option(), miss.question.correct_option());
    }
}

#[tokio::test]
async fn test_submit_after_finish_is_invalid() {
    let db = create_test_db().await;
    let (theme, _) = theme_with_questions(&db, "Quiz", 2).await;

    let mut session = QuizSession::new();
    session.start(&db, &theme.id, 2).await.unwrap();
    answer(&mut session, true);
    answer(&mut session, true);
    assert_eq!(session.scorecard().unwrap().score, 100);

    let result = session.submit_answer(AnswerIndex::new(1).unwrap());
    assert!(matches!(result, Err(QuizError::InvalidState(_))));
    assert_eq!(session.answers().len(), 2);
}

#[tokio::test]
async fn test_restart_from_finished() {
    let db = create_test_db().await;
    let (theme, _) = theme_with_questions(&db, "Quiz", 3).await;

    let mut session = QuizSession::new();
    session.start(&db, &theme.id, 1).await.unwrap();
    answer(&mut session, false);
    assert!(session.is_finished());
    assert_eq!(session.scorecard().unwrap().score, 0);

    session.restart();

    assert!(matches!(session.state(), SessionState::Selecting));
    assert!(session.drawn_questions().is_empty());
    assert!(session.answers().is_empty());
    assert_eq!(session.position(), 0);
    assert!(session.theme_id().is_none());

    // A fresh round can begin.
    session.start(&db, &theme.id, 3).await.unwrap();
    assert_eq!(session.drawn_questions().len(), 3);
}

#[tokio::test]
async fn test_restart_mid_round_discards_answers() {
    let db = create_test_db().await;
    let (theme, _) = theme_with_questions(&db, "Quiz", 3).await;

    let mut session = QuizSession::new();
    session.start(&db, &theme.id, 3).await.unwrap();
    answer(&mut session, true);

    session.restart();
    assert!(session.is_selecting());
    assert!(session.answers().is_empty());
}

#[tokio::test]
async fn test_start_requires_enough_questions() {
    let db = create_test_db().await;
    let (theme, _) = theme_with_questions(&db, "Small", 3).await;

    let mut session = QuizSession::new();

    let result = session.start(&db, &theme.id, 4).await;
    assert!(matches!(
        result,
        Err(QuizError::InsufficientData {
            requested: 4,
            available: 3
        })
    ));
    assert!(session.is_selecting());

    let result = session.start(&db, &theme.id, 0).await;
    assert!(matches!(result, Err(QuizError::InsufficientData { requested: 0, .. })));
    assert!(session.is_selecting());

    let result = session.start(&db, "unknown-theme", 1).await;
    assert!(matches!(
        result,
        Err(QuizError::InsufficientData {
            requested: 1,
            available: 0
        })
    ));
    assert!(session.is_selecting());
}

#[tokio::test]
async fn test_out_of_state_calls_are_invalid() {
    let db = create_test_db().await;
    let (theme, _) = theme_with_questions(&db, "Quiz", 3).await;

    let mut session = QuizSession::new();
    assert!(matches!(
        session.submit_answer(AnswerIndex::new(2).unwrap()),
        Err(QuizError::InvalidState(_))
    ));
    assert!(matches!(session.scorecard(), Err(QuizError::InvalidState(_))));

    session.start(&db, &theme.id, 2).await.unwrap();
    assert!(matches!(session.scorecard(), Err(QuizError::InvalidState(_))));

    let again = session.start(&db, &theme.id, 1).await;
    assert!(matches!(again, Err(QuizError::InvalidState(_))));
    assert_eq!(session.drawn_questions().len(), 2);
}

#[tokio::test]
async fn test_seeded_start_draws_same_questions() {
    let db = create_test_db().await;
    let (theme, _) = theme_with_questions(&db, "Quiz", 10).await;

    let mut first = QuizSession::new();
    first.start_seeded(&db, &theme.id, 5, 7).await.unwrap();
    let mut second = QuizSession::new();
    second.start_seeded(&db, &theme.id, 5, 7).await.unwrap();

    assert_eq!(first.drawn_questions(), second.drawn_questions());
}

#[tokio::test]
async fn test_round_over_default_catalog() {
    let db = create_test_db().await;
    db.seed_if_empty().await.unwrap();
    let theme = db
        .list_themes_with_counts()
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.name == "Science")
        .expect("seeded theme");

    let mut session = QuizSession::new();
    session
        .start(&db, &theme.id, theme.question_count as usize)
        .await
        .unwrap();
    while session.current_question().is_some() {
        answer(&mut session, true);
    }

    assert_eq!(session.scorecard().unwrap().score, 100);
}
