#![no_std]
#![allow(dead_code)]

mod events;
mod policy;
mod storage;
mod types;
mod validation;
mod vault;
mod vesting;

pub mod migration;
pub mod sale;
pub mod token;

// ============================================================================
// CONTRATOS PRINCIPAIS
// ============================================================================

pub use migration::{MigrationAgent, MigrationAgentClient};
pub use sale::{SafraSale, SafraSaleClient};
pub use token::{SafraToken, SafraTokenClient};
pub use types::*;
