pub mod answer_cache;
pub mod profile_provider;
pub mod question_resolver;
pub mod unresolved_writer;

pub use answer_cache::{AnswerCache, AnswerStore, JsonFileStore, MemoryStore};
pub use profile_provider::{HttpProfileProvider, ProfileProvider, TomlProfileProvider};
pub use question_resolver::{
    AnswerSource, ControlSelection, QuestionResolver, Resolution, ResolverSettings,
    SelectionSource,
};
pub use unresolved_writer::UnresolvedWriter;
