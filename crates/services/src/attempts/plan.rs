use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::model::{Question, Quiz};

/// Effective question order for one attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptPlan {
    pub questions: Vec<Question>,
    pub questions_shuffled: bool,
    pub options_shuffled: bool,
}

impl AttemptPlan {
    /// Number of questions in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Returns true when the quiz has no questions to play.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Builds the presentation order for an attempt from the quiz settings.
///
/// Shuffling is applied once at attempt start; the plan is then fixed for
/// the whole run, including on restart.
pub struct AttemptBuilder<'a> {
    quiz: &'a Quiz,
}

impl<'a> AttemptBuilder<'a> {
    #[must_use]
    pub fn new(quiz: &'a Quiz) -> Self {
        Self { quiz }
    }

    /// Build the plan, shuffling questions and/or options per the settings.
    ///
    /// Option shuffling only affects multiple-choice questions; the stored
    /// correct index is remapped so grading is order-independent.
    #[must_use]
    pub fn build(self) -> AttemptPlan {
        let settings = self.quiz.settings();
        let mut questions: Vec<Question> = self.quiz.questions().to_vec();

        if settings.shuffle_questions() {
            let mut rng = rng();
            questions.as_mut_slice().shuffle(&mut rng);
        }

        if settings.shuffle_options() {
            let mut rng = rng();
            questions = questions
                .into_iter()
                .map(|q| {
                    let mut order: Vec<usize> = (0..q.option_count()).collect();
                    order.as_mut_slice().shuffle(&mut rng);
                    q.with_option_order(&order)
                })
                .collect();
        }

        AttemptPlan {
            questions,
            questions_shuffled: settings.shuffle_questions(),
            options_shuffled: settings.shuffle_options(),
        }
    }
}
