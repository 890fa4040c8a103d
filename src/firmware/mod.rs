pub mod config;
pub mod controller;
pub mod echo;
pub mod lamp;
pub mod link;
pub(crate) mod telemetry;
pub mod touch;
pub mod types;

#[cfg(feature = "esp-hal-runtime")]
mod runtime;

#[cfg(feature = "esp-hal-runtime")]
pub use runtime::run;
