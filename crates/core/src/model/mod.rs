mod ids;
mod question;
mod quiz;
mod result;
mod settings;

pub use ids::{QuestionId, QuizId, ResultId};
pub use question::{Question, QuestionError, QuestionKind};
pub use quiz::{Quiz, QuizError};
pub use result::{QuizResult, ResultError};
pub use settings::{QuizSettings, SettingsError};
