#![doc = include_str!("../README.md")]

// -----------------------------------------------------------------------------
// Alloc

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod access;
mod reflect;

pub mod impls;
pub mod info;
pub mod ops;
pub mod registry;

// -----------------------------------------------------------------------------
// Exports

pub use access::{AccessError, ProjectFn, PropertyValue, ReadFn};
pub use access::{projection, reader};
pub use reflect::{AsReflect, Reflect, ReflectRef};

// -----------------------------------------------------------------------------
// Re-export crates

pub use erased_serde;
