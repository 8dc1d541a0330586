pub mod chat;
pub mod domain;
pub mod fingerprint;
pub mod generator;
pub mod options;
pub mod ports;
pub mod prompt;
pub mod text;

pub use chat::{ChatOrchestrator, ChatReply};
pub use domain::{ChatTurn, GenerationOutcome, LearningState, MessageType, DEFAULT_TOPIC};
pub use fingerprint::fingerprint;
pub use generator::ReadingGenerator;
pub use options::GenerationOptions;
pub use ports::{ContentStore, GenerationClient, Notifier, PortError, PortResult, ReadingExporter};
pub use text::{clean_markdown, truncate_chars};
