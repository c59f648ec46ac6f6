//! [`Reflect`](crate::Reflect) implementations for standard and well-known types.

// -----------------------------------------------------------------------------
// Modules

mod collections;
mod primitives;
mod scalars;
mod wrappers;

#[cfg(feature = "chrono")]
mod chrono;
#[cfg(feature = "uuid")]
mod uuid;

// -----------------------------------------------------------------------------
// Exports

pub use scalars::Bytes;
