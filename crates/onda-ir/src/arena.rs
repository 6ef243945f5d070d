//! Expression arena
//!
//! Every node of a module's expression trees lives in one contiguous arena
//! owned by the [`Module`](crate::Module). Nodes are addressed by stable
//! [`ExprId`] indices; there is no per-node deallocation, only the single
//! [`ExprArena::reset`] teardown point. Ids stay valid for the arena's whole
//! lifetime, which makes them safe keys for the debug-location side tables
//! even when passes clone subtrees.
//!
//! The arena keeps a generation counter that is bumped by every allocation
//! and every mutable node access. Side forms derived from the tree (stack
//! IR) are stamped with the generation they were built against and read as
//! absent once the counter has moved on.

use crate::expr::{ExprKind, Expression};
use std::fmt;
use std::ops;

/// Stable handle to an expression node in its module's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Bump arena owning every expression of one module
#[derive(Debug, Default)]
pub struct ExprArena {
    nodes: Vec<Expression>,
    generation: u64,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a node, fixing its kind tag permanently. The node starts
    /// with its construction-time default type (diverting kinds start
    /// `unreachable`) and is typed for real by finalization.
    pub fn alloc(&mut self, kind: impl Into<ExprKind>) -> ExprId {
        let kind = kind.into();
        let id = ExprId(self.nodes.len() as u32);
        let ty = kind.initial_type();
        self.nodes.push(Expression { kind, ty });
        self.generation += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The single release point: drops every node at once. Ids handed out
    /// before the reset are invalidated in bulk.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.generation += 1;
    }

    /// Current mutation generation; bumped on allocation and on every
    /// mutable node access
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, id: ExprId) -> &Expression {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: ExprId) -> &mut Expression {
        self.generation += 1;
        &mut self.nodes[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExprId, &Expression)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, e)| (ExprId(i as u32), e))
    }
}

impl ops::Index<ExprId> for ExprArena {
    type Output = Expression;

    fn index(&self, id: ExprId) -> &Expression {
        self.get(id)
    }
}

impl ops::IndexMut<ExprId> for ExprArena {
    fn index_mut(&mut self, id: ExprId) -> &mut Expression {
        self.get_mut(id)
    }
}

/// Clones the subtree rooted at `id` into another arena, returning the new
/// root. Sharing nodes between modules is illegal; moving a tree across
/// modules goes through this copy.
pub fn deep_copy(src: &ExprArena, id: ExprId, dst: &mut ExprArena) -> ExprId {
    let mut kind = src[id].kind.clone();
    kind.for_each_child_mut(|child| *child = deep_copy(src, *child, dst));
    let ty = src[id].ty.clone();
    let new_id = dst.alloc(kind);
    dst[new_id].ty = ty;
    new_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Block, Const, Nop, Return};
    use onda_types::{Literal, Type};

    #[test]
    fn test_alloc_and_reset() {
        let mut arena = ExprArena::new();
        let a = arena.alloc(Nop);
        let b = arena.alloc(Const {
            value: Literal::I32(1),
        });
        assert_eq!(arena.len(), 2);
        assert_ne!(a, b);

        arena.reset();
        assert!(arena.is_empty());
    }

    #[test]
    fn test_initial_types() {
        let mut arena = ExprArena::new();
        let nop = arena.alloc(Nop);
        let ret = arena.alloc(Return { value: None });
        assert_eq!(arena[nop].ty, Type::None);
        assert_eq!(arena[ret].ty, Type::Unreachable);
    }

    #[test]
    fn test_generation_bumps_on_mutable_access() {
        let mut arena = ExprArena::new();
        let id = arena.alloc(Nop);
        let before = arena.generation();

        // read-only access leaves the generation alone
        let _ = &arena[id];
        assert_eq!(arena.generation(), before);

        arena[id].ty = Type::None;
        assert!(arena.generation() > before);
    }

    #[test]
    fn test_deep_copy() {
        let mut src = ExprArena::new();
        let c = src.alloc(Const {
            value: Literal::I32(7),
        });
        src[c].ty = Type::I32;
        let block = src.alloc(Block {
            name: None,
            list: vec![c],
        });
        src[block].ty = Type::I32;

        let mut dst = ExprArena::new();
        let copied = deep_copy(&src, block, &mut dst);
        assert_eq!(dst.len(), 2);
        assert_eq!(dst[copied].ty, Type::I32);

        let inner = dst[copied].cast::<Block>().list[0];
        assert_eq!(
            dst[inner].cast::<Const>().value,
            Literal::I32(7)
        );
    }
}
