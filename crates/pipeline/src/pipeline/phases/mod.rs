// Phases of the request pipeline, in their standard execution order. Each
// phase is self-contained: it reads what it needs from the context and
// writes its contribution back.

#[path = "01_tree.rs"]
pub mod tree;

#[path = "02_read.rs"]
pub mod read;

#[path = "03_semantic.rs"]
pub mod semantic;

#[path = "04_intent.rs"]
pub mod intent;

#[path = "05_discover.rs"]
pub mod discover;

#[path = "06_changes.rs"]
pub mod changes;

#[path = "07_apply.rs"]
pub mod apply;

#[path = "08_report.rs"]
pub mod report;

#[path = "09_answer.rs"]
pub mod answer;

pub use answer::AnswerPhase;
pub use apply::ApplyChangesPhase;
pub use changes::GenerateChangesPhase;
pub use discover::DiscoverFilesPhase;
pub use intent::IntentPhase;
pub use read::ReadFilesPhase;
pub use report::WriteReportPhase;
pub use semantic::SemanticParsePhase;
pub use tree::ProjectTreePhase;
