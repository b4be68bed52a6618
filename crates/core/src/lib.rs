pub mod config;
pub mod error;
pub mod fs;
pub mod model;
pub mod paths;
pub mod progress;

pub use config::{parse_provider, ConfigError, SpindleConfig};
pub use error::BackendError;
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use model::{
    ApplyResult, Change, ChangeOperation, ChangeSet, FileRecord, Intent, IntentMode, Language,
    ModificationType, RelevantPaths, SemanticSummary, ValidationError,
};
pub use progress::{LoggingHandler, NoOpHandler, ProgressEvent, ProgressHandler};
