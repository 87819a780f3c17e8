pub mod change_tracker;
pub mod language_model;

pub use change_tracker::ChangeRequestTracker;
pub use language_model::LanguageModelService;
