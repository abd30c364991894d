//! End-to-end scenarios and boundary behaviours (SPEC_FULL §8), run through
//! the same `parse_command` → `checker::check` → `render_*` pipeline the
//! CLI driver uses.

use declaratio::checker::{self, Purpose};
use declaratio::context::Context;
use declaratio::dialect::Dialect;
use declaratio::intern::Interner;
use declaratio::parser::{parse_command, Command};
use declaratio::render::{render_cast_native, render_english, render_native};

/// Runs one command to completion, returning the rendered output. Panics
/// with the diagnostics if parsing or checking failed — every case in this
/// file is expected to succeed unless noted otherwise.
fn run_ok(ctx: &mut Context, source: &str) -> String {
    let mut interner = Interner::new();
    let parsed = parse_command(source, ctx.dialect, &mut interner, &mut ctx.registry)
        .unwrap_or_else(|d| panic!("parse error on {source:?}: {}", d.display_with_source(source)));
    assert!(
        !parsed.diagnostics.has_errors(),
        "unexpected parse diagnostics on {source:?}: {:?}",
        parsed.diagnostics.errors()
    );
    match parsed.command {
        Command::Declare { arena, root } => {
            let diags = checker::check(&arena, root, ctx.dialect, Purpose::Declaration, &interner, &ctx.registry);
            assert!(!diags.has_errors(), "unexpected check errors on {source:?}: {:?}", diags.errors());
            render_native(&arena, root, &interner, ctx.dialect, &ctx.render)
        }
        Command::Cast { arena, root, kind } => {
            let diags = checker::check(&arena, root, ctx.dialect, Purpose::Cast(kind), &interner, &ctx.registry);
            assert!(!diags.has_errors(), "unexpected check errors on {source:?}: {:?}", diags.errors());
            render_cast_native(&arena, root, kind, &interner, ctx.dialect, &ctx.render)
        }
        Command::Explain { arena, root } => {
            let diags = checker::check(&arena, root, ctx.dialect, Purpose::Declaration, &interner, &ctx.registry);
            assert!(!diags.has_errors(), "unexpected check errors on {source:?}: {:?}", diags.errors());
            render_english(&arena, root, &interner, ctx.dialect)
        }
        Command::Define { arena, root, key, scoped, form } => {
            let diags = checker::check(&arena, root, ctx.dialect, Purpose::Alias, &interner, &ctx.registry);
            assert!(!diags.has_errors(), "unexpected check errors on {source:?}: {:?}", diags.errors());
            ctx.registry
                .define(key.clone(), scoped, &arena, root, form)
                .unwrap_or_else(|e| panic!("unexpected alias conflict defining '{key}': {e:?}"));
            format!("defined '{key}'")
        }
        _ => panic!("{source:?} did not parse to a declare/cast/explain/define command"),
    }
}

/// Parses `source` and returns whether the command failed (parse error, or
/// checker error). Used by the boundary-behaviour tests that expect
/// rejection rather than a rendered result.
fn run_fails(ctx: &mut Context, source: &str) -> bool {
    let mut interner = Interner::new();
    let parsed = match parse_command(source, ctx.dialect, &mut interner, &mut ctx.registry) {
        Ok(p) => p,
        Err(_) => return true,
    };
    if parsed.diagnostics.has_errors() {
        return true;
    }
    match parsed.command {
        Command::Declare { arena, root } => {
            checker::check(&arena, root, ctx.dialect, Purpose::Declaration, &interner, &ctx.registry).has_errors()
        }
        Command::Cast { arena, root, kind } => {
            checker::check(&arena, root, ctx.dialect, Purpose::Cast(kind), &interner, &ctx.registry).has_errors()
        }
        Command::Explain { arena, root } => {
            checker::check(&arena, root, ctx.dialect, Purpose::Declaration, &interner, &ctx.registry).has_errors()
        }
        Command::Define { arena, root, .. } => {
            checker::check(&arena, root, ctx.dialect, Purpose::Alias, &interner, &ctx.registry).has_errors()
        }
        _ => false,
    }
}

// ═══════════════════════════════════════════════════════════════════
// §8 end-to-end scenarios
// ═══════════════════════════════════════════════════════════════════

#[test]
fn scenario_1_array_of_pointer_to_const_int() {
    let mut ctx = Context::new(Dialect::C99);
    let out = run_ok(&mut ctx, "declare p as array 10 of pointer to const int");
    assert_eq!(out, "int const *p[10]");
}

#[test]
fn scenario_2_explain_pointer_to_array_of_const_int() {
    let mut ctx = Context::new(Dialect::C99);
    let out = run_ok(&mut ctx, "explain int const (*p)[10]");
    assert_eq!(out, "declare p as pointer to array 10 of const int");
}

#[test]
fn scenario_3_function_returning_pointer_to_char() {
    let mut ctx = Context::new(Dialect::Cpp17);
    let out = run_ok(
        &mut ctx,
        "declare foo as function (int, char const *) returning pointer to char",
    );
    assert_eq!(out, "char *foo(int, char const *)");
}

#[test]
fn scenario_4_noexcept_function_returning_int() {
    let mut ctx = Context::new(Dialect::Cpp11);
    let out = run_ok(&mut ctx, "declare f as noexcept function () returning int");
    assert_eq!(out, "int f() noexcept");
}

#[test]
fn scenario_5_defaulted_equality_operator() {
    let mut ctx = Context::new(Dialect::Cpp20);
    let out = run_ok(
        &mut ctx,
        "declare op as non-member friend default function operator == \
         (reference to const class C, reference to const class C) returning bool",
    );
    assert_eq!(out, "friend bool operator==(C const&, C const&) = default");
}

#[test]
fn scenario_6_explain_atomic_int_pointer() {
    let mut ctx = Context::new(Dialect::C11);
    let out = run_ok(&mut ctx, "explain _Atomic(int) *p");
    assert_eq!(out, "declare p as pointer to atomic integer");
}

#[test]
fn scenario_7_pointer_to_member_function() {
    let mut ctx = Context::new(Dialect::Cpp17);
    let out = run_ok(
        &mut ctx,
        "declare m as pointer to member of class C function (int) returning void",
    );
    assert_eq!(out, "void (C::*m)(int)");
}

// ═══════════════════════════════════════════════════════════════════
// §8 boundary behaviours
// ═══════════════════════════════════════════════════════════════════

#[test]
fn triple_long_is_rejected() {
    let mut ctx = Context::new(Dialect::Cpp17);
    assert!(run_fails(&mut ctx, "declare x as long long long int"));
}

#[test]
fn signed_char_is_accepted_everywhere() {
    for dialect in [Dialect::C89, Dialect::C99, Dialect::C11, Dialect::Cpp11, Dialect::Cpp17, Dialect::Cpp20] {
        let mut ctx = Context::new(dialect);
        assert!(!run_fails(&mut ctx, "declare c as signed char"), "signed char should be legal under {dialect:?}");
    }
}

#[test]
fn signed_bool_is_rejected_everywhere() {
    for dialect in [Dialect::C99, Dialect::C11, Dialect::Cpp11, Dialect::Cpp17] {
        let mut ctx = Context::new(dialect);
        assert!(run_fails(&mut ctx, "declare b as signed bool"), "signed bool should be illegal under {dialect:?}");
    }
}

#[test]
fn bare_void_variable_is_rejected() {
    let mut ctx = Context::new(Dialect::C99);
    assert!(run_fails(&mut ctx, "declare x as void"));
}

#[test]
fn function_returning_void_is_accepted() {
    let mut ctx = Context::new(Dialect::C99);
    let out = run_ok(&mut ctx, "declare p as pointer to function () returning void");
    assert_eq!(out, "void (*p)()");
}

#[test]
fn typedef_of_void_is_accepted_and_usable_behind_a_pointer() {
    let mut ctx = Context::new(Dialect::C99);
    let define_out = run_ok(&mut ctx, "define v as void");
    assert_eq!(define_out, "defined 'v'");

    let pointer_out = run_ok(&mut ctx, "declare p as pointer to v");
    assert_eq!(pointer_out, "v *p");
}

#[test]
fn bare_variable_of_an_alias_that_resolves_to_void_is_rejected() {
    let mut ctx = Context::new(Dialect::C99);
    assert_eq!(run_ok(&mut ctx, "define v as void"), "defined 'v'");
    assert!(
        run_fails(&mut ctx, "explain v x"),
        "'v' resolves to void through the registry, so a bare variable of it should be rejected just like a bare 'void'"
    );
}

#[test]
fn define_rejects_an_array_of_void() {
    let mut ctx = Context::new(Dialect::C99);
    assert!(run_fails(&mut ctx, "define v as array of void"));
}

#[test]
fn define_rejects_signed_bool() {
    let mut ctx = Context::new(Dialect::C99);
    assert!(run_fails(&mut ctx, "define b as signed bool"));
}

#[test]
fn native_typedef_defines_a_usable_alias() {
    let mut ctx = Context::new(Dialect::Cpp17);
    let define_out = run_ok(&mut ctx, "typedef void v");
    assert_eq!(define_out, "defined 'v'");

    let pointer_out = run_ok(&mut ctx, "declare p as pointer to v");
    assert_eq!(pointer_out, "v *p");
}

#[test]
fn native_using_defines_a_usable_alias() {
    let mut ctx = Context::new(Dialect::Cpp17);
    let define_out = run_ok(&mut ctx, "using v = void");
    assert_eq!(define_out, "defined 'v'");

    let pointer_out = run_ok(&mut ctx, "declare p as pointer to v");
    assert_eq!(pointer_out, "v *p");
}

#[test]
fn vla_star_accepted_only_in_function_parameter_under_c99() {
    let mut ctx = Context::new(Dialect::C99);
    let out = run_ok(
        &mut ctx,
        "declare f as function (array variable length of int) returning void",
    );
    assert_eq!(out, "void f(int[*])");

    assert!(
        run_fails(&mut ctx, "declare a as array variable length of int"),
        "a VLA-star array outside a function parameter should be rejected"
    );
}

#[test]
fn main_like_signature_accepted_in_c_and_cpp() {
    // Parameter lists only carry bare types (no `<type> as <name>` binding
    // exists in the grammar, in English or native form), so this checks the
    // same two-argument `main` shape the scenario table uses without names.
    let mut ctx_c = Context::new(Dialect::C99);
    let c_out = run_ok(
        &mut ctx_c,
        "declare main as function (int, pointer to pointer to const char) returning int",
    );
    assert_eq!(c_out, "int main(int, char const **)");

    let mut ctx_cpp = Context::new(Dialect::Cpp17);
    let cpp_out = run_ok(
        &mut ctx_cpp,
        "declare main as function (int, pointer to pointer to const char) returning int",
    );
    assert_eq!(cpp_out, "int main(int, char const **)");
}
