//! Application services and ports.

#![forbid(unsafe_code)]

mod cleanup_task;
mod directory_ports;
mod policy_ports;
mod reaper_service;

#[cfg(test)]
mod test_support;

pub use cleanup_task::{InactiveAccountCleanupTask, NoopRunProgress, RunProgress, TaskTrigger};
pub use directory_ports::{DirectoryEntry, UserDirectory};
pub use policy_ports::PolicySettingsRepository;
pub use reaper_service::InactivityReaperService;
