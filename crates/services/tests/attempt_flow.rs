use std::sync::Arc;

use quiz_core::editor::{QuestionDraft, QuizDraft};
use quiz_core::grading::Answer;
use quiz_core::model::QuestionKind;
use quiz_core::time::fixed_now;
use services::{AppServices, AttemptError, Clock};
use storage::repository::InMemoryRepository;

fn sample_draft() -> QuizDraft {
    let mut draft = QuizDraft::blank();
    draft.title = "Smoke Quiz".to_owned();

    let mut mc = QuestionDraft::blank(QuestionKind::MultipleChoice {
        options: vec!["2".into(), "3".into(), "4".into()],
        correct_index: 2,
    });
    mc.prompt = "What is 2 + 2?".to_owned();
    mc.points = 10;

    let mut tf = QuestionDraft::blank(QuestionKind::TrueFalse {
        correct_value: false,
    });
    tf.prompt = "The sun orbits the earth".to_owned();
    tf.points = 5;

    let mut sa = QuestionDraft::blank(QuestionKind::ShortAnswer {
        correct_text: "Paris".to_owned(),
    });
    sa.prompt = "Capital of France?".to_owned();
    sa.points = 5;

    draft.questions.push((None, mc));
    draft.questions.push((None, tf));
    draft.questions.push((None, sa));
    draft
}

#[tokio::test]
async fn full_attempt_persists_a_result() {
    let services = AppServices::new_in_memory(Clock::fixed(fixed_now()));
    let quiz_id = services
        .quiz_service()
        .create_quiz(&sample_draft())
        .await
        .unwrap();

    let attempt_service = services.attempt_service();
    let mut session = attempt_service.start_attempt(&quiz_id).await.unwrap();

    // Answer in presentation order; the MC quiz uses no shuffling here.
    let answers = [
        Answer::Choice(2),
        Answer::Bool(false),
        Answer::Text("  PARIS ".to_owned()),
    ];
    for answer in answers {
        let question_id = session.current_question().unwrap().id().clone();
        session.submit_answer(&question_id, answer).unwrap();
        session.advance(fixed_now()).unwrap();
    }
    assert!(session.is_finished());

    let outcome = attempt_service.finish_attempt(&mut session).await.unwrap();
    assert_eq!(outcome.summary.correct_count, 3);
    assert_eq!(outcome.summary.earned_points, 20);
    assert_eq!(outcome.summary.percentage, 100);

    let result_id = outcome.result_id.expect("result persisted");
    let stored = services
        .result_service()
        .get_result(&result_id)
        .await
        .unwrap()
        .expect("stored result");
    assert_eq!(stored.quiz_id(), &quiz_id);
    assert_eq!(stored.score(), 20);
    assert!(stored.passed());

    let stats = services
        .result_service()
        .quiz_stats(&quiz_id)
        .await
        .unwrap();
    assert_eq!(stats.total_attempts, 1);
    assert_eq!(stats.best_score, 20);
}

#[tokio::test]
async fn finish_is_idempotent_over_the_stored_result() {
    let services = AppServices::new_in_memory(Clock::fixed(fixed_now()));
    let quiz_id = services
        .quiz_service()
        .create_quiz(&sample_draft())
        .await
        .unwrap();

    let attempt_service = services.attempt_service();
    let mut session = attempt_service.start_attempt(&quiz_id).await.unwrap();
    while !session.is_finished() {
        let question_id = session.current_question().unwrap().id().clone();
        session.submit_answer(&question_id, Answer::Bool(true)).unwrap();
        session.advance(fixed_now()).unwrap();
    }

    let first = attempt_service.finish_attempt(&mut session).await.unwrap();
    let second = attempt_service.finish_attempt(&mut session).await.unwrap();
    assert_eq!(first.result_id, second.result_id);

    let results = services
        .result_service()
        .results_for_quiz(&quiz_id)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn deleting_a_quiz_removes_its_results() {
    let repo = Arc::new(InMemoryRepository::new());
    let quiz_service = services::QuizService::new(Clock::fixed(fixed_now()), repo.clone());
    let attempt_service =
        services::AttemptService::new(Clock::fixed(fixed_now()), repo.clone(), repo.clone());
    let result_service = services::ResultService::new(repo.clone());

    let quiz_id = quiz_service.create_quiz(&sample_draft()).await.unwrap();
    let mut session = attempt_service.start_attempt(&quiz_id).await.unwrap();
    while !session.is_finished() {
        let question_id = session.current_question().unwrap().id().clone();
        session.submit_answer(&question_id, Answer::Bool(true)).unwrap();
        session.advance(fixed_now()).unwrap();
    }
    attempt_service.finish_attempt(&mut session).await.unwrap();
    assert_eq!(result_service.results_for_quiz(&quiz_id).await.unwrap().len(), 1);

    quiz_service.delete_quiz(&quiz_id).await.unwrap();
    assert!(result_service.results_for_quiz(&quiz_id).await.unwrap().is_empty());
    let err = attempt_service.start_attempt(&quiz_id).await.unwrap_err();
    assert!(matches!(err, AttemptError::QuizNotFound));
}

#[tokio::test]
async fn restart_allows_a_second_run() {
    let services = AppServices::new_in_memory(Clock::fixed(fixed_now()));
    let quiz_id = services
        .quiz_service()
        .create_quiz(&sample_draft())
        .await
        .unwrap();

    let attempt_service = services.attempt_service();
    let mut session = attempt_service.start_attempt(&quiz_id).await.unwrap();
    while !session.is_finished() {
        let question_id = session.current_question().unwrap().id().clone();
        session.submit_answer(&question_id, Answer::Bool(true)).unwrap();
        session.advance(fixed_now()).unwrap();
    }
    attempt_service.finish_attempt(&mut session).await.unwrap();

    session.restart(fixed_now() + chrono::Duration::hours(1));
    assert!(!session.is_finished());
    assert!(session.result_id().is_none());

    while !session.is_finished() {
        let question_id = session.current_question().unwrap().id().clone();
        session.submit_answer(&question_id, Answer::Bool(false)).unwrap();
        session.advance(fixed_now() + chrono::Duration::hours(2)).unwrap();
    }
    let outcome = attempt_service.finish_attempt(&mut session).await.unwrap();
    assert!(outcome.result_id.is_some());

    let results = services
        .result_service()
        .results_for_quiz(&quiz_id)
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
}
