//! Prakriti (Ayurvedic constitution) assessment: the question bank, the
//! dosha classifier, the step-by-step assessment session, and the HTTP
//! routes that expose and persist results.
pub mod handlers;
pub mod router;
pub mod models;
pub mod services;

pub use models::{
    Dosha,
    DoshaDescription,
    DoshaOption,
    DoshaOptions,
    DoshaResult,
    PrakritiProfile,
    Question,
    QuestionBank,
    QuestionCategory,
    ResponseSet,
};

pub use router::prakriti_routes;

pub mod api {
    pub use crate::services::classifier::{DoshaClassifier, DoshaScores, DUAL_DOSHA_THRESHOLD};
    pub use crate::services::profile::PrakritiProfileService;
    pub use crate::services::session::{AssessmentSession, SessionError, SessionState};
    pub use crate::services::bank::load_question_bank;
}
