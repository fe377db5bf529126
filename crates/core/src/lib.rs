#![forbid(unsafe_code)]

pub mod editor;
pub mod error;
pub mod grading;
pub mod model;
pub mod score;
pub mod time;

pub use editor::{QuestionDraft, QuizDraft, ValidationError};
pub use error::Error;
pub use grading::{Answer, AnswerMap, is_answered, is_correct};
pub use score::{ScoreSummary, compute_result, score_questions};
pub use time::Clock;
