pub mod db;
pub mod export;
pub mod generation_llm;
pub mod notify;

pub use db::SqliteStore;
pub use export::FileExporter;
pub use generation_llm::DeepSeekClient;
pub use notify::LogNotifier;
