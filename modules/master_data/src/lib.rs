// === PUBLIC CONTRACT ===
// Only the contract module should be public for other modules to consume
pub mod contract;
pub use contract::{client, error, model};

// === ERROR CATALOG ===
pub mod errors;

// === MODULE DEFINITION ===
pub mod module;
pub use module::MasterData;

// === INTERNAL MODULES ===
// Exposed for integration tests only; consumers should stay on `contract`.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
