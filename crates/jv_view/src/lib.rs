#![doc = include_str!("../README.md")]

// -----------------------------------------------------------------------------
// Alloc

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod engine;
mod error;
mod ignore;
mod view;
mod writer;

pub mod attrs;
pub mod cache;
pub mod config;
pub mod hierarchy;
pub mod introspect;
pub mod pattern;
pub mod rules;
pub mod store;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Exports

pub use config::{Inclusion, Resolution, ViewConfig};
pub use engine::ViewEngine;
pub use error::{ConfigError, WriteError};
pub use rules::{Match, RuleSet};
pub use view::View;
pub use writer::ViewDriver;
