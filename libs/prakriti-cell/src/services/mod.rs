pub mod bank;
pub mod classifier;
pub mod profile;
pub mod session;

pub use bank::load_question_bank;
pub use classifier::{DoshaClassifier, DoshaScores};
pub use profile::PrakritiProfileService;
pub use session::{AssessmentSession, SessionError, SessionState};
