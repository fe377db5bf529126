use quiz_core::grading::{Answer, AnswerMap};
use quiz_core::model::{
    Question, QuestionId, QuestionKind, Quiz, QuizId, QuizResult, QuizSettings, ResultId,
};
use quiz_core::time::fixed_now;
use storage::repository::{QuizRepository, ResultRepository};
use storage::sqlite::SqliteRepository;

fn build_quiz(id: &str) -> Quiz {
    let questions = vec![
        Question::new(
            QuestionId::new(format!("{id}-q1")),
            "Which one?",
            QuestionKind::MultipleChoice {
                options: vec!["a".into(), "b".into(), "c".into()],
                correct_index: 1,
            },
            10,
            Some("It is b.".into()),
            Some(60),
        )
        .unwrap(),
        Question::new(
            QuestionId::new(format!("{id}-q2")),
            "Water is wet.",
            QuestionKind::TrueFalse {
                correct_value: true,
            },
            5,
            None,
            None,
        )
        .unwrap(),
        Question::new(
            QuestionId::new(format!("{id}-q3")),
            "Name the keyword.",
            QuestionKind::ShortAnswer {
                correct_text: "const".into(),
            },
            5,
            None,
            None,
        )
        .unwrap(),
        Question::new(
            QuestionId::new(format!("{id}-q4")),
            "Discuss.",
            QuestionKind::Essay,
            20,
            None,
            None,
        )
        .unwrap(),
    ];
    let settings = QuizSettings::new(true, true, false, false, Some(15), Some(70)).unwrap();
    Quiz::new(
        QuizId::new(id),
        "Round Trip",
        Some("all four variants".into()),
        questions,
        settings,
        fixed_now(),
        fixed_now(),
    )
    .unwrap()
}

fn build_result(id: &str, quiz: &Quiz) -> QuizResult {
    let mut answers = AnswerMap::new();
    answers.insert(quiz.questions()[0].id().clone(), Answer::Choice(1));
    answers.insert(quiz.questions()[1].id().clone(), Answer::Bool(false));
    answers.insert(
        quiz.questions()[2].id().clone(),
        Answer::Text("const".into()),
    );
    QuizResult::new(
        ResultId::new(id),
        quiz.id().clone(),
        answers,
        15,
        40,
        fixed_now(),
        fixed_now() + chrono::Duration::minutes(3),
        false,
    )
    .unwrap()
}

#[tokio::test]
async fn sqlite_round_trips_quiz_with_all_variants() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_quiz_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let quiz = build_quiz("z1");
    repo.upsert_quiz(&quiz).await.unwrap();

    let fetched = repo.get_quiz(quiz.id()).await.unwrap().expect("present");
    assert_eq!(fetched, quiz);

    // Question order must follow positions, not insertion accidents.
    let ids: Vec<&str> = fetched.questions().iter().map(|q| q.id().as_str()).collect();
    assert_eq!(ids, ["z1-q1", "z1-q2", "z1-q3", "z1-q4"]);
}

#[tokio::test]
async fn sqlite_upsert_replaces_question_set() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_quiz_upsert?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let quiz = build_quiz("z1");
    repo.upsert_quiz(&quiz).await.unwrap();

    let trimmed = quiz.clone().with_questions(
        vec![quiz.questions()[3].clone()],
        fixed_now() + chrono::Duration::minutes(1),
    );
    repo.upsert_quiz(&trimmed).await.unwrap();

    let fetched = repo.get_quiz(quiz.id()).await.unwrap().expect("present");
    assert_eq!(fetched.question_count(), 1);
    assert_eq!(fetched.questions()[0].id().as_str(), "z1-q4");
}

#[tokio::test]
async fn sqlite_round_trips_results_and_orders_recent_first() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_results?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let quiz = build_quiz("z1");
    repo.upsert_quiz(&quiz).await.unwrap();

    let first = build_result("r1", &quiz);
    repo.insert_result(&first).await.unwrap();

    let later = QuizResult::new(
        ResultId::new("r2"),
        quiz.id().clone(),
        AnswerMap::new(),
        0,
        40,
        fixed_now() + chrono::Duration::hours(1),
        fixed_now() + chrono::Duration::hours(2),
        false,
    )
    .unwrap();
    repo.insert_result(&later).await.unwrap();

    let fetched = repo.get_result(first.id()).await.unwrap().expect("present");
    assert_eq!(fetched, first);

    let listed = repo.results_for_quiz(quiz.id()).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id().as_str(), "r2");

    let err = repo.insert_result(&first).await.unwrap_err();
    assert!(matches!(err, storage::repository::StorageError::Conflict));
}

#[tokio::test]
async fn sqlite_delete_quiz_cascades_to_results() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_cascade?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let quiz = build_quiz("z1");
    let other = build_quiz("z2");
    repo.upsert_quiz(&quiz).await.unwrap();
    repo.upsert_quiz(&other).await.unwrap();
    repo.insert_result(&build_result("r1", &quiz)).await.unwrap();
    repo.insert_result(&build_result("r2", &other)).await.unwrap();

    repo.delete_quiz(quiz.id()).await.unwrap();

    assert!(repo.get_quiz(quiz.id()).await.unwrap().is_none());
    assert!(repo.results_for_quiz(quiz.id()).await.unwrap().is_empty());
    assert_eq!(repo.results_for_quiz(other.id()).await.unwrap().len(), 1);
    assert_eq!(repo.list_results(10).await.unwrap().len(), 1);
}
