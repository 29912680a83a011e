//! Port implementations.
//!
//! The config store, member directory, document store and mail service
//! are external systems; these adapters stand in for them with in-memory
//! state behind the persistence ports and the log behind the notifier.
//! They serve as both the default runtime wiring and the test fakes.

mod config_store;
mod member_directory;
mod notifier;
mod share_repository;

pub use config_store::InMemoryConfigStore;
pub use member_directory::InMemoryMemberDirectory;
pub use notifier::LoggingNotifier;
pub use share_repository::InMemoryShareRepository;
