//! onda-types - Value types, signatures and literals for the Onda IR
//!
//! This crate is the type facade consumed by the IR core: the basic value
//! kinds of the bytecode format, tuple composition, function signatures,
//! the `none`/`unreachable` sentinels used by type finalization, and the
//! tagged numeric literals carried by constant expressions.

pub mod features;
pub mod literal;
pub mod types;

pub use features::FeatureSet;
pub use literal::Literal;
pub use types::{Signature, Type};
