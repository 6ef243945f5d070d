//! Stack IR - a secondary, linear form of a function body
//!
//! Derived from the primary tree and possibly optimized separately. The two
//! forms are not kept in sync: a [`StackIr`] records the arena generation it
//! was built against, and [`Function::stack_ir`](crate::Function::stack_ir)
//! treats it as absent once the tree has been mutated since.

use crate::arena::ExprId;
use onda_types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackInstKind {
    /// An ordinary instruction
    Basic,
    BlockBegin,
    BlockEnd,
    IfBegin,
    IfElse,
    IfEnd,
    LoopBegin,
    LoopEnd,
    TryBegin,
    Catch,
    TryEnd,
}

/// One linear instruction, pointing back at the tree node it came from
#[derive(Debug, Clone, PartialEq)]
pub struct StackInst {
    pub kind: StackInstKind,
    pub origin: ExprId,
    pub ty: Type,
}

/// A linear function body, stamped with the arena generation it reflects
#[derive(Debug, Clone, PartialEq)]
pub struct StackIr {
    pub insts: Vec<StackInst>,
    generation: u64,
}

impl StackIr {
    pub fn new(insts: Vec<StackInst>, generation: u64) -> Self {
        Self { insts, generation }
    }

    /// The arena generation this form was built against
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
