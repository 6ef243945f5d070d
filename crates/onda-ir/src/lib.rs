//! onda-ir - The in-memory IR for a stack-based, structured-control-flow
//! bytecode format
//!
//! Front ends build expression trees bottom-up inside a [`Module`]'s arena,
//! calling the finalization routines in [`typing`] as children settle.
//! Passes mutate subtrees and re-finalize affected ancestors; encoders
//! traverse the finished tree read-only.
//!
//! Nodes live in one arena per module and are addressed by stable
//! [`ExprId`] indices, which also serve as the keys of the debug-location
//! side tables.

pub mod arena;
pub mod builder;
pub mod expr;
pub mod fmt;
pub mod function;
pub mod locations;
pub mod module;
pub mod ops;
pub mod registry;
pub mod stack;
pub mod typing;

pub use arena::{deep_copy, ExprArena, ExprId};
pub use builder::Builder;
pub use expr::{literal_of, literals_of, ExprKind, Expression, Kind, Specific};
pub use function::Function;
pub use module::{Event, Export, ExternalKind, Global, Memory, Module, Table};
pub use ops::{
    AtomicRmwOp, BinaryOp, SimdExtractOp, SimdLoadOp, SimdReplaceOp, SimdShiftOp, SimdTernaryOp,
    UnaryOp,
};
pub use typing::finalize;

/// An index in a module (function/local/lane/segment indices)
pub type Index = u32;

/// An address or offset in linear memory
pub type Address = u64;
