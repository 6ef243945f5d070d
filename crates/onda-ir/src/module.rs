//! Modules - the root of the IR
//!
//! A module owns its top-level entities (functions, globals, events,
//! exports), one table and one memory (which may be declared non-existent),
//! and the arena holding every expression node. Entities are added and
//! removed through the registry operations, which keep the owning
//! sequences and the name indexes in lockstep.

use crate::arena::{ExprArena, ExprId};
use crate::function::Function;
use crate::registry::{Entity, Registry};
use crate::{Address, Index};
use onda_error::Result;
use onda_types::{FeatureSet, Signature, Type};

/// The kind of an import or export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalKind {
    Function,
    Table,
    Memory,
    Global,
    Event,
}

/// Maps an external name to an internal one. The external name is the key
/// and is unique among exports; internal names are not (several exports may
/// alias one entity).
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub name: String,
    /// Internal name of the exported entity
    pub value: String,
    pub kind: ExternalKind,
}

#[derive(Debug)]
pub struct Global {
    pub name: String,
    pub module: Option<String>,
    pub base: Option<String>,
    pub ty: Type,
    /// Initializer expression; absent for an import
    pub init: Option<ExprId>,
    pub mutable: bool,
}

impl Global {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            module: None,
            base: None,
            ty,
            init: None,
            mutable: false,
        }
    }

    pub fn is_imported(&self) -> bool {
        self.module.is_some()
    }
}

/// The only event attribute that exists today: an exception
pub const EVENT_ATTRIBUTE_EXCEPTION: u32 = 0;

#[derive(Debug)]
pub struct Event {
    pub name: String,
    pub module: Option<String>,
    pub base: Option<String>,
    pub attribute: u32,
    pub sig: Signature,
}

impl Event {
    pub fn new(name: impl Into<String>, sig: Signature) -> Self {
        Self {
            name: name.into(),
            module: None,
            base: None,
            attribute: EVENT_ATTRIBUTE_EXCEPTION,
            sig,
        }
    }

    pub fn is_imported(&self) -> bool {
        self.module.is_some()
    }
}

impl Entity for Function {
    const KIND: &'static str = "function";

    fn entity_name(&self) -> &str {
        &self.name
    }
}

impl Entity for Global {
    const KIND: &'static str = "global";

    fn entity_name(&self) -> &str {
        &self.name
    }
}

impl Entity for Event {
    const KIND: &'static str = "event";

    fn entity_name(&self) -> &str {
        &self.name
    }
}

impl Entity for Export {
    const KIND: &'static str = "export";

    fn entity_name(&self) -> &str {
        // the external name is the unique key
        &self.name
    }
}

/// A chunk of table elements applied at an offset at instantiation
#[derive(Debug, Clone, PartialEq)]
pub struct TableSegment {
    pub offset: ExprId,
    /// Function names
    pub data: Vec<String>,
}

/// The module always *has* a table; it *exists* once defined or imported.
/// It can exist and still be empty.
#[derive(Debug, Default)]
pub struct Table {
    pub exists: bool,
    pub name: String,
    pub module: Option<String>,
    pub base: Option<String>,
    pub initial: Address,
    /// Absent means unlimited
    pub max: Option<Address>,
    pub segments: Vec<TableSegment>,
}

impl Table {
    pub const PAGE_SIZE: Address = 1;

    pub fn is_imported(&self) -> bool {
        self.module.is_some()
    }

    pub fn has_max(&self) -> bool {
        self.max.is_some()
    }

    pub fn clear(&mut self) {
        *self = Table::default();
    }
}

/// A chunk of memory bytes; active segments carry an offset, passive ones
/// are applied later by an explicit instruction
#[derive(Debug, Clone, PartialEq)]
pub struct MemorySegment {
    pub passive: bool,
    pub offset: Option<ExprId>,
    pub data: Vec<u8>,
}

/// Linear memory; sizes are in pages. See the comment on [`Table`] for the
/// exists flag.
#[derive(Debug)]
pub struct Memory {
    pub exists: bool,
    pub name: String,
    pub module: Option<String>,
    pub base: Option<String>,
    pub initial: Address,
    pub max: Option<Address>,
    pub segments: Vec<MemorySegment>,
    pub shared: bool,
    /// i32 or i64 addressing
    pub index_ty: Type,
}

impl Memory {
    pub const PAGE_SIZE: Address = 64 * 1024;
    /// With 32-bit addressing the memory tops out at 4GB
    pub const MAX_SIZE_32: Address = (4 * 1024 * 1024 * 1024) / Self::PAGE_SIZE;

    pub fn is_imported(&self) -> bool {
        self.module.is_some()
    }

    pub fn has_max(&self) -> bool {
        self.max.is_some()
    }

    pub fn is_64(&self) -> bool {
        self.index_ty == Type::I64
    }

    pub fn clear(&mut self) {
        *self = Memory::default();
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self {
            exists: false,
            name: String::new(),
            module: None,
            base: None,
            initial: 0,
            max: Some(Self::MAX_SIZE_32),
            segments: Vec::new(),
            shared: false,
            index_ty: Type::I32,
        }
    }
}

/// Opaque data held in binaries but not part of the core format
#[derive(Debug, Clone, PartialEq)]
pub struct UserSection {
    pub name: String,
    pub data: Vec<u8>,
}

/// The optional dynamic-linking section
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DylinkSection {
    pub memory_size: Index,
    pub memory_alignment: Index,
    pub table_size: Index,
    pub table_alignment: Index,
    pub needed_dynlibs: Vec<String>,
}

/// The root of the IR; owns every entity and the expression arena
#[derive(Debug, Default)]
pub struct Module {
    pub exports: Registry<Export>,
    pub functions: Registry<Function>,
    pub globals: Registry<Global>,
    pub events: Registry<Event>,

    pub table: Table,
    pub memory: Memory,
    /// Name of the start function, if any
    pub start: Option<String>,

    pub user_sections: Vec<UserSection>,
    pub dylink_section: Option<DylinkSection>,

    /// Source-map file names referenced by per-function debug locations
    pub debug_info_file_names: Vec<String>,

    pub features: FeatureSet,
    pub has_features_section: bool,

    /// Module name; documentary only
    pub name: Option<String>,

    pub arena: ExprArena,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    // Functions

    pub fn add_function(&mut self, function: Function) -> Result<&mut Function> {
        self.functions.add(function)
    }

    /// Returns the function. Asking for an absent name is a caller bug.
    pub fn get_function(&self, name: &str) -> &Function {
        self.functions.get(name)
    }

    pub fn get_function_mut(&mut self, name: &str) -> &mut Function {
        self.functions.get_mut(name)
    }

    pub fn lookup_function(&self, name: &str) -> Option<&Function> {
        self.functions.lookup(name)
    }

    pub fn remove_function(&mut self, name: &str) -> Option<Function> {
        self.functions.remove(name)
    }

    pub fn remove_functions_where(&mut self, pred: impl FnMut(&Function) -> bool) {
        self.functions.remove_where(pred)
    }

    // Globals

    pub fn add_global(&mut self, global: Global) -> Result<&mut Global> {
        self.globals.add(global)
    }

    pub fn get_global(&self, name: &str) -> &Global {
        self.globals.get(name)
    }

    pub fn lookup_global(&self, name: &str) -> Option<&Global> {
        self.globals.lookup(name)
    }

    pub fn remove_global(&mut self, name: &str) -> Option<Global> {
        self.globals.remove(name)
    }

    pub fn remove_globals_where(&mut self, pred: impl FnMut(&Global) -> bool) {
        self.globals.remove_where(pred)
    }

    // Events

    pub fn add_event(&mut self, event: Event) -> Result<&mut Event> {
        self.events.add(event)
    }

    pub fn get_event(&self, name: &str) -> &Event {
        self.events.get(name)
    }

    pub fn lookup_event(&self, name: &str) -> Option<&Event> {
        self.events.lookup(name)
    }

    pub fn remove_event(&mut self, name: &str) -> Option<Event> {
        self.events.remove(name)
    }

    pub fn remove_events_where(&mut self, pred: impl FnMut(&Event) -> bool) {
        self.events.remove_where(pred)
    }

    // Exports, keyed by the external name

    pub fn add_export(&mut self, export: Export) -> Result<&mut Export> {
        self.exports.add(export)
    }

    pub fn get_export(&self, name: &str) -> &Export {
        self.exports.get(name)
    }

    pub fn lookup_export(&self, name: &str) -> Option<&Export> {
        self.exports.lookup(name)
    }

    pub fn remove_export(&mut self, name: &str) -> Option<Export> {
        self.exports.remove(name)
    }

    pub fn remove_exports_where(&mut self, pred: impl FnMut(&Export) -> bool) {
        self.exports.remove_where(pred)
    }

    pub fn add_start(&mut self, name: impl Into<String>) {
        self.start = Some(name.into());
    }

    /// Reconstructs every name index from the owning sequences, after bulk
    /// structural edits that bypassed the add/remove contract
    pub fn update_maps(&mut self) {
        tracing::debug!("rebuilding module entity indexes");
        self.functions.rebuild();
        self.globals.rebuild();
        self.events.rebuild();
        self.exports.rebuild();
    }

    /// Drops all debugging info of the module and its functions
    pub fn clear_debug_info(&mut self) {
        self.debug_info_file_names.clear();
        for function in self.functions.iter_mut() {
            function.clear_debug_info();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onda_error::IrError;

    fn named_function(name: &str) -> Function {
        Function::new(name, Signature::new(Type::I32, Type::I32))
    }

    #[test]
    fn test_function_round_trip() {
        let mut module = Module::new();
        module.add_function(named_function("f")).unwrap();

        assert_eq!(module.get_function("f").name, "f");
        assert!(module.lookup_function("g").is_none());

        assert!(module.remove_function("f").is_some());
        assert!(module.lookup_function("f").is_none());
        assert!(module.remove_function("f").is_none());
    }

    #[test]
    fn test_duplicate_function_name_is_rejected() {
        let mut module = Module::new();
        module.add_function(named_function("f")).unwrap();
        let err = module.add_function(named_function("f")).unwrap_err();
        assert_eq!(err, IrError::duplicate("function", "f"));
    }

    #[test]
    fn test_update_maps_restores_consistency() {
        let mut module = Module::new();
        module.add_function(named_function("f")).unwrap();
        module
            .add_global(Global::new("g", Type::I64))
            .unwrap();

        // bulk edit bypassing the contract
        for function in module.functions.iter_mut() {
            function.name = "renamed".to_string();
        }
        module.update_maps();

        assert!(module.lookup_function("f").is_none());
        assert_eq!(module.get_function("renamed").name, "renamed");
        assert_eq!(module.get_global("g").ty, Type::I64);
    }

    #[test]
    fn test_exports_key_on_external_name() {
        let mut module = Module::new();
        module.add_function(named_function("f")).unwrap();

        // two exports aliasing one internal entity are fine
        module
            .add_export(Export {
                name: "a".to_string(),
                value: "f".to_string(),
                kind: ExternalKind::Function,
            })
            .unwrap();
        module
            .add_export(Export {
                name: "b".to_string(),
                value: "f".to_string(),
                kind: ExternalKind::Function,
            })
            .unwrap();
        assert_eq!(module.get_export("a").value, "f");
        assert_eq!(module.get_export("b").value, "f");

        // a second export under one external name is not
        let err = module
            .add_export(Export {
                name: "a".to_string(),
                value: "g".to_string(),
                kind: ExternalKind::Global,
            })
            .unwrap_err();
        assert_eq!(err, IrError::duplicate("export", "a"));
    }

    #[test]
    fn test_table_and_memory_singletons() {
        let mut module = Module::new();
        assert!(!module.table.exists);
        assert!(!module.memory.exists);

        module.memory.exists = true;
        module.memory.initial = 1;
        module.memory.max = None;
        assert!(!module.memory.has_max());
        assert!(!module.memory.is_64());

        module.memory.index_ty = Type::I64;
        assert!(module.memory.is_64());

        module.memory.clear();
        assert!(!module.memory.exists);
        assert_eq!(module.memory.max, Some(Memory::MAX_SIZE_32));
    }

    #[test]
    fn test_remove_where_bulk() {
        let mut module = Module::new();
        for name in ["a", "b", "keep"] {
            module.add_function(named_function(name)).unwrap();
        }
        module.remove_functions_where(|f| f.name != "keep");
        assert_eq!(module.functions.len(), 1);
        assert!(module.lookup_function("keep").is_some());
    }
}
