// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod config;
pub mod evolution;
pub mod ledger;
pub mod players;
pub mod service;
pub mod session;
pub mod timeline;
