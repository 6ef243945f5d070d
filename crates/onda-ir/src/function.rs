//! Functions
//!
//! A function owns its signature, its non-param locals, its body tree (by
//! root id into the module's arena; absent for an import), an optional
//! stack-IR side form, sparse local-name maps, and the debug-location side
//! tables for its nodes.

use crate::arena::{ExprArena, ExprId};
use crate::locations::{DebugLocation, DelimiterLocations, FunctionLocations, Span};
use crate::stack::{StackInst, StackIr};
use crate::Index;
use onda_types::{Signature, Type};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Default)]
pub struct Function {
    pub name: String,
    /// Import origin; a function with a module/base pair is an import
    pub module: Option<String>,
    pub base: Option<String>,
    /// Parameters and results
    pub sig: Signature,
    /// Non-param locals, indexed after the params
    pub vars: Vec<Type>,
    /// Root of the body tree; absent for an import
    pub body: Option<ExprId>,
    stack_ir: Option<StackIr>,

    // local names are optional and sparse
    local_names: HashMap<Index, String>,
    local_indices: HashMap<String, Index>,

    // source-map debugging info
    pub debug_locations: HashMap<ExprId, DebugLocation>,
    pub prolog_location: BTreeSet<DebugLocation>,
    pub epilog_location: BTreeSet<DebugLocation>,

    // binary-offset debugging info
    pub expression_locations: HashMap<ExprId, Span>,
    pub delimiter_locations: HashMap<ExprId, DelimiterLocations>,
    pub func_location: FunctionLocations,
}

impl Function {
    pub fn new(name: impl Into<String>, sig: Signature) -> Self {
        Self {
            name: name.into(),
            sig,
            ..Default::default()
        }
    }

    /// Declares an imported function with its origin
    pub fn import(
        name: impl Into<String>,
        module: impl Into<String>,
        base: impl Into<String>,
        sig: Signature,
    ) -> Self {
        Self {
            name: name.into(),
            module: Some(module.into()),
            base: Some(base.into()),
            sig,
            ..Default::default()
        }
    }

    pub fn is_imported(&self) -> bool {
        self.module.is_some()
    }

    // Locals: params come first, then vars.

    pub fn num_params(&self) -> usize {
        self.sig.params.arity()
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn num_locals(&self) -> usize {
        self.num_params() + self.num_vars()
    }

    pub fn is_param(&self, index: Index) -> bool {
        (index as usize) < self.num_params()
    }

    pub fn is_var(&self, index: Index) -> bool {
        let index = index as usize;
        index >= self.num_params() && index < self.num_locals()
    }

    /// The first index belonging to the declared vars
    pub fn var_index_base(&self) -> Index {
        self.num_params() as Index
    }

    /// Declares a new local and returns its index
    pub fn add_var(&mut self, ty: Type) -> Index {
        self.vars.push(ty);
        (self.num_locals() - 1) as Index
    }

    pub fn get_local_type(&self, index: Index) -> Type {
        let params = self.sig.params.components();
        let index = index as usize;
        if index < params.len() {
            params[index].clone()
        } else {
            self.vars
                .get(index - params.len())
                .unwrap_or_else(|| panic!("no local with index {}", index))
                .clone()
        }
    }

    // Local naming. Names are optional; the maps stay bidirectional.

    pub fn has_local_name(&self, index: Index) -> bool {
        self.local_names.contains_key(&index)
    }

    pub fn get_local_name(&self, index: Index) -> Option<&str> {
        self.local_names.get(&index).map(String::as_str)
    }

    pub fn get_local_index(&self, name: &str) -> Option<Index> {
        self.local_indices.get(name).copied()
    }

    /// The local's name, or a deterministic synthetic one derived from the
    /// index
    pub fn get_local_name_or_default(&self, index: Index) -> String {
        match self.get_local_name(index) {
            Some(name) => name.to_string(),
            None => index.to_string(),
        }
    }

    /// Inserts or overwrites the name of a local, in both directions
    pub fn set_local_name(&mut self, index: Index, name: impl Into<String>) {
        let name = name.into();
        if let Some(old) = self.local_names.insert(index, name.clone()) {
            self.local_indices.remove(&old);
        }
        if let Some(old_index) = self.local_indices.insert(name, index) {
            if old_index != index {
                self.local_names.remove(&old_index);
            }
        }
    }

    /// Removes every local name without touching indices or types
    pub fn clear_names(&mut self) {
        self.local_names.clear();
        self.local_indices.clear();
    }

    // Stack IR.

    /// Attaches a stack-IR form built against the arena's current
    /// generation
    pub fn set_stack_ir(&mut self, insts: Vec<StackInst>, arena: &ExprArena) {
        self.stack_ir = Some(StackIr::new(insts, arena.generation()));
    }

    /// The stack-IR form, if present and still in sync with the tree.
    /// Any mutation of the arena since it was built makes it read as
    /// absent.
    pub fn stack_ir(&self, arena: &ExprArena) -> Option<&StackIr> {
        self.stack_ir
            .as_ref()
            .filter(|ir| ir.generation() == arena.generation())
    }

    /// Drops the stack-IR form outright
    pub fn discard_stack_ir(&mut self) {
        self.stack_ir = None;
    }

    /// Clears every debug table of this function
    pub fn clear_debug_info(&mut self) {
        self.debug_locations.clear();
        self.prolog_location.clear();
        self.epilog_location.clear();
        self.expression_locations.clear();
        self.delimiter_locations.clear();
        self.func_location = FunctionLocations::default();
    }
}
