//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod file_policy_settings_repository;
mod in_memory_user_directory;
mod postgres_user_directory;

pub use file_policy_settings_repository::FilePolicySettingsRepository;
pub use in_memory_user_directory::InMemoryUserDirectory;
pub use postgres_user_directory::PostgresUserDirectory;
