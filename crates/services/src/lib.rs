#![forbid(unsafe_code)]

pub mod app_services;
pub mod attempts;
pub mod error;
pub mod quiz_service;
pub mod result_service;
pub mod transfer;

pub use quiz_core::Clock;

pub use error::{
    AppServicesError, AttemptError, QuizServiceError, ResultServiceError, TransferError,
};

pub use app_services::AppServices;
pub use attempts::{
    AttemptBuilder, AttemptOutcome, AttemptPlan, AttemptProgress, AttemptService, PlayerSession,
    format_clock,
};
pub use quiz_service::QuizService;
pub use result_service::{QuizStats, ResultService};
pub use transfer::{TransferService, decode_share_data, encode_share_data, export_results_csv};
