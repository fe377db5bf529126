use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::grading::{Answer, AnswerMap, is_answered};
use quiz_core::model::{Question, QuestionId, Quiz, QuizId, QuizSettings, ResultId};
use quiz_core::score::{ScoreSummary, score_questions};

use super::progress::AttemptProgress;
use crate::error::AttemptError;

//
// ─── PLAYER SESSION ────────────────────────────────────────────────────────────
//

/// In-memory state for one run-through of a quiz.
///
/// The session is ephemeral by design: it holds no storage reference, is
/// discarded on restart or navigation, and a reload loses progress. The
/// question list is the *effective* order for this attempt (shuffling
/// already applied), so `current` always indexes into presentation order.
///
/// `current` only ever moves forward, one question per `advance` call;
/// there is no going back and no skipping.
pub struct PlayerSession {
    quiz_id: QuizId,
    settings: QuizSettings,
    questions: Vec<Question>,
    current: usize,
    answers: AnswerMap,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    showing_results: bool,
    time_remaining_secs: Option<u32>,
    result_id: Option<ResultId>,
}

impl PlayerSession {
    /// Start a fresh attempt over the given effective question order.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Empty` if there are no questions to play.
    pub fn new(
        quiz: &Quiz,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, AttemptError> {
        if questions.is_empty() {
            return Err(AttemptError::Empty);
        }

        Ok(Self {
            quiz_id: quiz.id().clone(),
            settings: quiz.settings().clone(),
            questions,
            current: 0,
            answers: AnswerMap::new(),
            started_at,
            finished_at: None,
            showing_results: false,
            time_remaining_secs: quiz.settings().time_limit_secs(),
            result_id: None,
        })
    }

    // Accessors
    #[must_use]
    pub fn quiz_id(&self) -> &QuizId {
        &self.quiz_id
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Finishing and showing results happen together in this design.
    #[must_use]
    pub fn is_showing_results(&self) -> bool {
        self.showing_results
    }

    /// Initial countdown budget, when the quiz has a time limit.
    ///
    /// The ticking countdown itself lives in the presentation layer; the
    /// session only carries the starting value.
    #[must_use]
    pub fn time_remaining_secs(&self) -> Option<u32> {
        self.time_remaining_secs
    }

    /// Id of the persisted result, once the workflow has stored one.
    #[must_use]
    pub fn result_id(&self) -> Option<&ResultId> {
        self.result_id.as_ref()
    }

    pub(crate) fn set_result_id(&mut self, id: ResultId) {
        self.result_id = Some(id);
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// The recorded answer for a question in this attempt, if any.
    #[must_use]
    pub fn answer_for(&self, question_id: &QuestionId) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    /// Whether the current question already has a recorded answer.
    #[must_use]
    pub fn current_is_answered(&self) -> bool {
        self.current_question()
            .is_some_and(|q| self.answers.contains_key(q.id()))
    }

    /// Record an answer for the current question.
    ///
    /// Does not advance. Re-submitting for a question that already has an
    /// answer in this attempt is rejected, so feedback shown after the
    /// first submission stays truthful.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Finished` after the attempt is over,
    /// `AttemptError::WrongQuestion` if `question_id` is not the current
    /// question, or `AttemptError::AlreadyAnswered` on a duplicate.
    pub fn submit_answer(
        &mut self,
        question_id: &QuestionId,
        answer: Answer,
    ) -> Result<(), AttemptError> {
        if self.is_finished() {
            return Err(AttemptError::Finished);
        }
        let Some(current) = self.current_question() else {
            return Err(AttemptError::Finished);
        };
        if current.id() != question_id {
            return Err(AttemptError::WrongQuestion);
        }
        if self.answers.contains_key(question_id) {
            return Err(AttemptError::AlreadyAnswered);
        }

        self.answers.insert(question_id.clone(), answer);
        Ok(())
    }

    /// Move to the next question, or finish after the last one.
    ///
    /// Finishing sets the results flag in the same step. Returns whether
    /// the attempt is now finished.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Finished` after the attempt is over, or
    /// `AttemptError::NotAnswered` if the current question has no recorded
    /// answer yet.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<bool, AttemptError> {
        if self.is_finished() {
            return Err(AttemptError::Finished);
        }
        if !self.current_is_answered() {
            return Err(AttemptError::NotAnswered);
        }

        if self.current + 1 == self.questions.len() {
            self.finished_at = Some(now);
            self.showing_results = true;
        } else {
            self.current += 1;
        }
        Ok(self.is_finished())
    }

    /// Discard all progress and return to a freshly started state.
    ///
    /// Valid from any state. The effective question order is kept; answers,
    /// position, flags, and the countdown budget reset.
    pub fn restart(&mut self, now: DateTime<Utc>) {
        self.current = 0;
        self.answers.clear();
        self.started_at = now;
        self.finished_at = None;
        self.showing_results = false;
        self.time_remaining_secs = self.settings.time_limit_secs();
        self.result_id = None;
    }

    /// Score the attempt as it stands; unanswered questions count wrong.
    #[must_use]
    pub fn score(&self) -> ScoreSummary {
        score_questions(&self.questions, &self.settings, &self.answers)
    }

    /// Progress counts for the presentation layer.
    #[must_use]
    pub fn progress(&self) -> AttemptProgress {
        let answered = self
            .questions
            .iter()
            .filter(|q| is_answered(q, self.answers.get(q.id())))
            .count();
        AttemptProgress::new(answered, self.questions.len(), self.is_finished())
    }
}

impl fmt::Debug for PlayerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerSession")
            .field("quiz_id", &self.quiz_id)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("started_at", &self.started_at)
            .field("finished_at", &self.finished_at)
            .field("showing_results", &self.showing_results)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionKind, QuizSettings};
    use quiz_core::time::fixed_now;

    fn build_question(id: &str, points: u32) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Prompt {id}"),
            QuestionKind::TrueFalse {
                correct_value: true,
            },
            points,
            None,
            None,
        )
        .unwrap()
    }

    fn build_quiz(question_ids: &[&str], settings: QuizSettings) -> Quiz {
        let questions = question_ids
            .iter()
            .map(|id| build_question(id, 10))
            .collect();
        Quiz::new(
            QuizId::new("z1"),
            "Quiz",
            None,
            questions,
            settings,
            fixed_now(),
            fixed_now(),
        )
        .unwrap()
    }

    fn start(question_ids: &[&str]) -> PlayerSession {
        let quiz = build_quiz(question_ids, QuizSettings::default());
        let questions = quiz.questions().to_vec();
        PlayerSession::new(&quiz, questions, fixed_now()).unwrap()
    }

    #[test]
    fn empty_quiz_cannot_start() {
        let quiz = build_quiz(&[], QuizSettings::default());
        let err = PlayerSession::new(&quiz, Vec::new(), fixed_now()).unwrap_err();
        assert!(matches!(err, AttemptError::Empty));
    }

    #[test]
    fn fresh_session_state() {
        let session = start(&["q1", "q2"]);
        assert_eq!(session.current_index(), 0);
        assert!(session.answers().is_empty());
        assert_eq!(session.started_at(), fixed_now());
        assert!(!session.is_finished());
        assert!(!session.is_showing_results());
        assert_eq!(session.time_remaining_secs(), None);
    }

    #[test]
    fn time_limit_seeds_countdown() {
        let settings = QuizSettings::new(false, false, true, true, Some(30), None).unwrap();
        let quiz = build_quiz(&["q1"], settings);
        let session =
            PlayerSession::new(&quiz, quiz.questions().to_vec(), fixed_now()).unwrap();
        assert_eq!(session.time_remaining_secs(), Some(1800));
    }

    #[test]
    fn advance_without_answer_is_rejected() {
        let mut session = start(&["q1", "q2"]);
        let err = session.advance(fixed_now()).unwrap_err();
        assert!(matches!(err, AttemptError::NotAnswered));
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn submit_records_without_advancing() {
        let mut session = start(&["q1", "q2"]);
        session
            .submit_answer(&QuestionId::new("q1"), Answer::Bool(true))
            .unwrap();
        assert_eq!(session.current_index(), 0);
        assert!(session.current_is_answered());
    }

    #[test]
    fn duplicate_submission_is_rejected() {
        let mut session = start(&["q1", "q2"]);
        let q1 = QuestionId::new("q1");
        session.submit_answer(&q1, Answer::Bool(true)).unwrap();
        let err = session
            .submit_answer(&q1, Answer::Bool(false))
            .unwrap_err();
        assert!(matches!(err, AttemptError::AlreadyAnswered));
        assert_eq!(session.answer_for(&q1), Some(&Answer::Bool(true)));
    }

    #[test]
    fn submitting_for_a_non_current_question_is_rejected() {
        let mut session = start(&["q1", "q2"]);
        let err = session
            .submit_answer(&QuestionId::new("q2"), Answer::Bool(true))
            .unwrap_err();
        assert!(matches!(err, AttemptError::WrongQuestion));
    }

    #[test]
    fn advance_moves_exactly_one_question() {
        let mut session = start(&["q1", "q2", "q3"]);
        session
            .submit_answer(&QuestionId::new("q1"), Answer::Bool(true))
            .unwrap();
        let finished = session.advance(fixed_now()).unwrap();
        assert!(!finished);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.current_question().unwrap().id().as_str(), "q2");
    }

    #[test]
    fn last_advance_finishes_and_shows_results_together() {
        let mut session = start(&["q1"]);
        session
            .submit_answer(&QuestionId::new("q1"), Answer::Bool(true))
            .unwrap();
        let at = fixed_now() + chrono::Duration::minutes(2);
        let finished = session.advance(at).unwrap();
        assert!(finished);
        assert!(session.is_finished());
        assert!(session.is_showing_results());
        assert_eq!(session.finished_at(), Some(at));
    }

    #[test]
    fn finished_session_rejects_further_transitions() {
        let mut session = start(&["q1"]);
        session
            .submit_answer(&QuestionId::new("q1"), Answer::Bool(true))
            .unwrap();
        session.advance(fixed_now()).unwrap();

        let err = session
            .submit_answer(&QuestionId::new("q1"), Answer::Bool(false))
            .unwrap_err();
        assert!(matches!(err, AttemptError::Finished));
        let err = session.advance(fixed_now()).unwrap_err();
        assert!(matches!(err, AttemptError::Finished));
    }

    #[test]
    fn restart_matches_fresh_session() {
        let mut session = start(&["q1", "q2"]);
        session
            .submit_answer(&QuestionId::new("q1"), Answer::Bool(true))
            .unwrap();
        session.advance(fixed_now()).unwrap();
        session
            .submit_answer(&QuestionId::new("q2"), Answer::Bool(false))
            .unwrap();
        session.advance(fixed_now()).unwrap();
        assert!(session.is_finished());

        let later = fixed_now() + chrono::Duration::hours(1);
        session.restart(later);
        assert_eq!(session.current_index(), 0);
        assert!(session.answers().is_empty());
        assert_eq!(session.started_at(), later);
        assert!(!session.is_finished());
        assert!(!session.is_showing_results());
        assert!(session.result_id().is_none());
    }

    #[test]
    fn score_counts_unanswered_as_wrong() {
        let mut session = start(&["q1", "q2"]);
        session
            .submit_answer(&QuestionId::new("q1"), Answer::Bool(true))
            .unwrap();
        let summary = session.score();
        assert_eq!(summary.correct_count, 1);
        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.earned_points, 10);
        assert_eq!(summary.total_points, 20);
        assert_eq!(summary.percentage, 50);
    }

    #[test]
    fn progress_reports_answered_counts() {
        let mut session = start(&["q1", "q2"]);
        assert_eq!(session.progress().answered, 0);
        session
            .submit_answer(&QuestionId::new("q1"), Answer::Bool(true))
            .unwrap();
        let progress = session.progress();
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.total, 2);
        assert_eq!(progress.remaining, 1);
        assert!(!progress.is_complete);
    }
}
