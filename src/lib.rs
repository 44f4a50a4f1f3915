pub mod audio;
pub mod cli;
pub mod config;
pub mod probe;
pub mod utils;

pub use audio::{
    Action, ChannelInventory, EventLog, Plan, RemediationDecision, RemediationEngine,
    RemediationOptions, SkipReason, Toggle,
};
pub use config::Config;
pub use probe::{parse_probe_output, FileMedium, ProbedFile, ProbedStream, Prober};
pub use utils::{Error, Result};
