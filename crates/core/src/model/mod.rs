mod dataset;
mod history;
mod ids;
mod question;
mod selection;

pub use dataset::{Dataset, DatasetMetadata, DatasetPayload, GenreStat};
pub use history::History;
pub use ids::QuestionId;
pub use question::Question;
pub use selection::{CommitMode, QuestionRange, Selection, SelectionDraft, SelectionError};
