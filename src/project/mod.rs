// Project persistence - Saving and loading compositions
//
// JSON is the interchange shape `{ tempo, bars, beatsPerBar, notes }`;
// files ending in `.ron` are written and read as RON instead.

pub mod serialization;
pub mod types;

pub use serialization::ProjectFormat;
pub use types::{CompositionData, NoteData};

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),

    #[error("RON parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),
}
