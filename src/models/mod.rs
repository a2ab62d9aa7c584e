pub mod listing;
pub mod loaders;
pub mod profile;
pub mod question;
pub mod session;

pub use listing::{AttemptOutcome, FailReason, JobListing, SkipReason};
pub use loaders::{load_layout_toml, load_profile_toml};
pub use profile::{ProfileRow, UserProfile};
pub use question::{normalize_question, QuestionKind, ScreeningAnswer, ScreeningQuestion};
pub use session::{Credentials, Identity, RunSettings, RunState, RunSummary, SessionConfig};
