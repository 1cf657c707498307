//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod account;
mod classification;
mod policy;
mod run_summary;

pub use account::{AccountId, AccountSnapshot};
pub use classification::{AccountClassification, classify_account};
pub use policy::{
    ActionKind, CheckHour, DEFAULT_INACTIVITY_THRESHOLD_DAYS, PolicyConfiguration,
    PolicyCorrection, PolicySettings,
};
pub use run_summary::{AccountFailure, AccountFailureStage, RunSummary};
