//! End-to-end tests over the whole IR: building, finalizing, registries,
//! side tables, and the staleness contract of the secondary form.

use onda_error::IrError;
use onda_ir::expr::{Block, Const, If, LocalGet, StructNew};
use onda_ir::fmt::dump;
use onda_ir::locations::Span;
use onda_ir::stack::{StackInst, StackInstKind};
use onda_ir::{deep_copy, finalize, literal_of, literals_of, Builder, Function, Module};
use onda_tests::{build_counter_module, init_logging};
use onda_types::{Literal, Signature, Type};
use pretty_assertions::assert_eq;

// the canonical scenario: (i32) -> i32, body
// Block[ If(LocalGet 0, Return(Const 1), -) , Const 2 ]
#[test]
fn test_finalization_scenario_bottom_up() {
    init_logging();
    let mut module = Module::new();
    let mut b = Builder::new(&mut module);

    let one = b.const_(Literal::I32(1)).unwrap();
    let ret = b.return_(Some(one)).unwrap();
    let cond = b.local_get(0, Type::I32).unwrap();
    let if_ = b.if_(cond, ret, None).unwrap();
    let two = b.const_(Literal::I32(2)).unwrap();
    let body = b.block(None, vec![if_, two]).unwrap();

    // the return diverges, the else-less if discards its arm, and the block
    // picks up the type of its last reachable statement
    assert_eq!(module.arena[ret].ty, Type::Unreachable);
    assert_eq!(module.arena[if_].ty, Type::None);
    assert_eq!(module.arena[body].ty, Type::I32);

    // kind queries see through the tree
    assert!(module.arena[body].is::<Block>());
    assert!(module.arena[if_].dyn_cast::<If>().is_some());
    assert!(module.arena[if_].dyn_cast::<Const>().is_none());
    assert_eq!(module.arena[cond].cast::<LocalGet>().index, 0);

    let mut function = Function::new("f", Signature::new(Type::I32, Type::I32));
    function.body = Some(body);
    module.add_function(function).unwrap();

    assert_eq!(
        dump(&module.arena, body),
        "(block (if (local.get 0) (return (i32.const 1))) (i32.const 2))"
    );
}

#[test]
fn test_refinalization_after_mutation() {
    let mut module = Module::new();
    let mut b = Builder::new(&mut module);

    let value = b.const_(Literal::I32(7)).unwrap();
    let block = b.block(None, vec![value]).unwrap();
    let ret = b.return_(None).unwrap();
    assert_eq!(module.arena[block].ty, Type::I32);

    // a pass rewrites the tail to a return; the ancestor must be
    // re-finalized before its type is trusted again
    module.arena[block].cast_mut::<Block>().list = vec![ret];
    finalize(&mut module.arena, block).unwrap();
    assert_eq!(module.arena[block].ty, Type::Unreachable);
}

#[test]
fn test_module_registry_round_trip() {
    let mut module = build_counter_module();

    // add / get / remove keep sequence and index in lockstep
    module
        .add_function(Function::new("aux", Signature::default()))
        .unwrap();
    assert_eq!(module.get_function("aux").name, "aux");

    assert!(module.remove_function("aux").is_some());
    assert!(module.lookup_function("aux").is_none());
    assert!(module.lookup_function("add1").is_some());

    // duplicate names are rejected gracefully
    let err = module
        .add_function(Function::new("add1", Signature::default()))
        .unwrap_err();
    assert_eq!(err, IrError::duplicate("function", "add1"));

    // bulk rename + rebuild restores consistency
    for function in module.functions.iter_mut() {
        function.name = format!("v2_{}", function.name);
    }
    module.update_maps();
    assert!(module.lookup_function("add1").is_none());
    assert!(module.lookup_function("v2_add1").is_some());
}

#[test]
fn test_stack_ir_staleness_is_typed() {
    let mut module = build_counter_module();
    let body = module.get_function("add1").body.unwrap();

    let insts = vec![StackInst {
        kind: StackInstKind::Basic,
        origin: body,
        ty: module.arena[body].ty.clone(),
    }];
    let arena = &module.arena;
    let function = module.functions.get_mut("add1");
    function.set_stack_ir(insts, arena);
    assert!(function.stack_ir(arena).is_some());

    // any mutation of the tree moves the arena generation on, and the
    // secondary form reads as absent instead of silently going stale
    finalize(&mut module.arena, body).unwrap();
    let function = module.get_function("add1");
    assert!(function.stack_ir(&module.arena).is_none());
}

#[test]
fn test_literal_extraction() {
    let mut module = Module::new();
    let mut b = Builder::new(&mut module);

    let c = b.const_(Literal::from_f64(1.5)).unwrap();
    let null = b.ref_null().unwrap();
    let func_ref = b.ref_func("add1").unwrap();
    let pair = b.tuple_make(vec![c, null]).unwrap();
    let other = b.nop().unwrap();

    assert_eq!(literal_of(&module.arena, c), Some(Literal::from_f64(1.5)));
    assert_eq!(literal_of(&module.arena, null), Some(Literal::Null));
    assert_eq!(
        literal_of(&module.arena, func_ref),
        Some(Literal::Func("add1".to_string()))
    );
    assert_eq!(
        literals_of(&module.arena, pair),
        Some(vec![Literal::from_f64(1.5), Literal::Null])
    );
    // a non-constant form is an absence, not an error
    assert_eq!(literal_of(&module.arena, other), None);
}

#[test]
fn test_deep_copy_across_modules() {
    let mut source = Module::new();
    let mut b = Builder::new(&mut source);
    let one = b.const_(Literal::I32(1)).unwrap();
    let ret = b.return_(Some(one)).unwrap();
    let block = b.block(None, vec![ret]).unwrap();

    let mut destination = Module::new();
    let copied = deep_copy(&source.arena, block, &mut destination.arena);

    assert_eq!(destination.arena[copied].ty, Type::Unreachable);
    assert_eq!(
        dump(&destination.arena, copied),
        dump(&source.arena, block)
    );
    // the copy is fully owned by the destination arena
    source.arena.reset();
    assert_eq!(destination.arena[copied].ty, Type::Unreachable);
}

#[test]
fn test_debug_side_tables_survive_tree_work() {
    let mut module = build_counter_module();
    let body = module.get_function("add1").body.unwrap();

    let function = module.functions.iter_mut().next().unwrap();
    function
        .expression_locations
        .insert(body, Span { start: 12, end: 40 });

    // finalization never consults or disturbs the side tables
    finalize(&mut module.arena, body).unwrap();
    let function = module.functions.iter().next().unwrap();
    assert_eq!(
        function.expression_locations.get(&body),
        Some(&Span { start: 12, end: 40 })
    );
}

#[test]
fn test_unsupported_nodes_are_rejected_not_fatal() {
    let mut module = Module::new();
    let stub = module.arena.alloc(StructNew);
    let err = finalize(&mut module.arena, stub).unwrap_err();
    assert_eq!(err, IrError::Unimplemented("struct.new"));
}
