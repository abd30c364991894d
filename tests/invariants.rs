//! Universal invariants (SPEC_FULL §8), exercised through the public API
//! rather than the parser's private inherited-attribute state.

use declaratio::checker::{self, Purpose};
use declaratio::context::Context;
use declaratio::dialect::Dialect;
use declaratio::intern::Interner;
use declaratio::parser::{parse_command, Command};
use declaratio::render::{render_english, render_native};
use declaratio::typeval::{Bit, BaseBit, Form, StorageBit, TypeValue};

/// Parses `source` as a `declare`/`explain` command and renders both forms,
/// panicking on any parse or check error. Mirrors `tests/scenarios.rs`'s
/// `run_ok` but returns both renderings, since the round-trip invariant
/// needs to reparse each of them in turn.
fn declare_and_render_both(ctx: &mut Context, source: &str) -> (String, String) {
    let mut interner = Interner::new();
    let parsed = parse_command(source, ctx.dialect, &mut interner, &mut ctx.registry)
        .unwrap_or_else(|d| panic!("parse error on {source:?}: {}", d.display_with_source(source)));
    assert!(!parsed.diagnostics.has_errors(), "unexpected parse diagnostics on {source:?}");
    let Command::Declare { arena, root } = parsed.command else {
        panic!("{source:?} did not parse to a declare command");
    };
    let diags = checker::check(&arena, root, ctx.dialect, Purpose::Declaration, &interner, &ctx.registry);
    assert!(!diags.has_errors(), "unexpected check errors on {source:?}: {:?}", diags.errors());
    let native = render_native(&arena, root, &interner, ctx.dialect, &ctx.render);
    let english = render_english(&arena, root, &interner, ctx.dialect);
    (native, english)
}

// ═══════════════════════════════════════════════════════════════════
// 1. Round-trip: rendering either form and reparsing it reaches a fixed
//    point (a proxy for structural equivalence to the original tree,
//    since our renderer is deterministic over equivalent trees).
// ═══════════════════════════════════════════════════════════════════

const ROUND_TRIP_SAMPLES: &[&str] = &[
    "declare p as array 10 of pointer to const int",
    "declare foo as function (int, char const *) returning pointer to char",
    "declare p as pointer to member of class C function (int) returning void",
    "declare f as noexcept function () returning int",
];

// `explain` only accepts a bare native declarator (`parse_native_command`
// calls `parse_native_type` alone, with no trailing-specifier grammar), so
// it cannot reparse a rendering that carries `noexcept`, an `operator`
// name, or `friend`/`= default` — those are only reachable through the
// `declare ... as ...` English grammar. The native round-trip check is
// restricted to samples that are plain declarators.
const NATIVE_ROUND_TRIP_SAMPLES: &[&str] = &[
    "declare p as array 10 of pointer to const int",
    "declare foo as function (int, char const *) returning pointer to char",
    "declare p as pointer to member of class C function (int) returning void",
];

#[test]
fn native_rendering_reaches_a_fixed_point_under_reparse() {
    for source in NATIVE_ROUND_TRIP_SAMPLES {
        let mut ctx = Context::new(Dialect::Cpp17);
        let (native_once, _) = declare_and_render_both(&mut ctx, source);

        let mut ctx2 = Context::new(Dialect::Cpp17);
        let explain_source = format!("explain {native_once}");
        let mut interner = Interner::new();
        let parsed = parse_command(&explain_source, ctx2.dialect, &mut interner, &mut ctx2.registry)
            .unwrap_or_else(|d| panic!("reparse error on {explain_source:?}: {}", d.display_with_source(&explain_source)));
        assert!(!parsed.diagnostics.has_errors(), "unexpected diagnostics reparsing {explain_source:?}");
        let Command::Explain { arena, root } = parsed.command else {
            panic!("{explain_source:?} did not parse to an explain command");
        };
        let diags = checker::check(&arena, root, ctx2.dialect, Purpose::Declaration, &interner, &ctx2.registry);
        assert!(!diags.has_errors(), "unexpected check errors reparsing {explain_source:?}");
        let native_again = render_native(&arena, root, &interner, ctx2.dialect, &ctx2.render);
        assert_eq!(native_once, native_again, "native rendering of {source:?} did not round-trip");
    }
}

#[test]
fn english_rendering_reaches_a_fixed_point_under_reparse() {
    for source in ROUND_TRIP_SAMPLES {
        let mut ctx = Context::new(Dialect::Cpp17);
        let (_, english_once) = declare_and_render_both(&mut ctx, source);

        let mut ctx2 = Context::new(Dialect::Cpp17);
        let (_, english_again) = declare_and_render_both(&mut ctx2, &english_once);
        assert_eq!(english_once, english_again, "english rendering of {source:?} did not round-trip");
    }
}

// ═══════════════════════════════════════════════════════════════════
// 2. normalize(normalize(V)) == normalize(V); name() is stable across
//    normalize-equivalent type values.
// ═══════════════════════════════════════════════════════════════════

#[test]
fn normalize_is_idempotent() {
    let mut signed_int = TypeValue::new();
    signed_int.add(Bit::Base(BaseBit::Signed)).unwrap();
    signed_int.add(Bit::Base(BaseBit::Int)).unwrap();

    let once = signed_int.normalize();
    let twice = once.normalize();
    assert_eq!(once, twice);
}

#[test]
fn name_is_stable_across_normalize_equivalent_values() {
    // `signed int` and plain `int` normalise to the same bit pattern, so
    // their canonical names must agree.
    let mut signed_int = TypeValue::new();
    signed_int.add(Bit::Base(BaseBit::Signed)).unwrap();
    signed_int.add(Bit::Base(BaseBit::Int)).unwrap();

    let mut plain_int = TypeValue::new();
    plain_int.add(Bit::Base(BaseBit::Int)).unwrap();

    assert_eq!(signed_int.normalize(), plain_int.normalize());
    assert_eq!(signed_int.name(Form::Native), plain_int.name(Form::Native));
    assert_eq!(signed_int.name(Form::English), plain_int.name(Form::English));
}

#[test]
fn signed_char_does_not_normalize_away_its_signed_bit() {
    // Unlike `signed int`, `signed char` is a distinct type from plain
    // `char` and must keep its `signed` bit through normalize.
    let mut signed_char = TypeValue::new();
    signed_char.add(Bit::Base(BaseBit::Signed)).unwrap();
    signed_char.add(Bit::Base(BaseBit::Char)).unwrap();

    let mut plain_char = TypeValue::new();
    plain_char.add(Bit::Base(BaseBit::Char)).unwrap();

    assert_ne!(signed_char.normalize(), plain_char.normalize());
}

// ═══════════════════════════════════════════════════════════════════
// 3. Arena/stack state is command-scoped: an earlier failing or
//    succeeding command never perturbs a later one's result.
// ═══════════════════════════════════════════════════════════════════

#[test]
fn a_failed_command_does_not_affect_a_later_independent_command() {
    let mut ctx = Context::new(Dialect::C99);
    let mut interner = Interner::new();

    // This one is rejected by the checker (triple `long`).
    let bad = parse_command("declare x as long long long int", ctx.dialect, &mut interner, &mut ctx.registry)
        .expect("parses structurally even though it will fail checking");
    if let Command::Declare { arena, root } = bad.command {
        let diags = checker::check(&arena, root, ctx.dialect, Purpose::Declaration, &interner, &ctx.registry);
        assert!(diags.has_errors());
    }

    // A later, unrelated command must render exactly as it would standalone.
    let (native, _) = declare_and_render_both(&mut ctx, "declare p as array 10 of pointer to const int");
    assert_eq!(native, "int const *p[10]");
}

#[test]
fn repeated_identical_commands_produce_identical_output() {
    let mut ctx = Context::new(Dialect::C99);
    let (first, _) = declare_and_render_both(&mut ctx, "declare p as array 10 of pointer to const int");
    let (second, _) = declare_and_render_both(&mut ctx, "declare p as array 10 of pointer to const int");
    assert_eq!(first, second);
}

// ═══════════════════════════════════════════════════════════════════
// 4. The type-bit-pair legality table is symmetric in meaning: the
//    dialect set a pair of bits is legal under does not depend on the
//    order those bits were added to a `TypeValue`.
// ═══════════════════════════════════════════════════════════════════

#[test]
fn checking_a_type_value_is_independent_of_bit_insertion_order() {
    for dialect in Dialect::ALL {
        let mut forward = TypeValue::new();
        forward.add(Bit::Storage(StorageBit::Static)).unwrap();
        forward.add(Bit::Base(BaseBit::Int)).unwrap();

        let mut backward = TypeValue::new();
        backward.add(Bit::Base(BaseBit::Int)).unwrap();
        backward.add(Bit::Storage(StorageBit::Static)).unwrap();

        assert_eq!(forward.check(dialect), backward.check(dialect));
    }
}

// ═══════════════════════════════════════════════════════════════════
// 5. Source spans: start <= end, within the input buffer.
// ═══════════════════════════════════════════════════════════════════

#[test]
fn every_node_span_is_well_formed_and_within_the_source_buffer() {
    let mut ctx = Context::new(Dialect::Cpp17);
    let mut interner = Interner::new();
    let source = "declare p as array 10 of pointer to const int";
    let parsed = parse_command(source, ctx.dialect, &mut interner, &mut ctx.registry).unwrap();
    let Command::Declare { arena, root } = parsed.command else {
        panic!("expected a declare command");
    };
    let diags = checker::check(&arena, root, ctx.dialect, Purpose::Declaration, &interner, &ctx.registry);
    assert!(!diags.has_errors());

    declaratio::ast::NodeArena::visit(&arena, root, declaratio::ast::Direction::OuterToInner, &mut |id| {
        let span = arena.get(id).span;
        assert!(span.start <= span.end, "span {:?} has start > end", span);
        assert!(span.end <= source.len(), "span {:?} runs past the source buffer", span);
    });
}
