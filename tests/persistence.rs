//! Round-trips the Type Alias Registry through its persisted-command form
//! (SPEC_FULL §6 "Persisted state"): every alias serialises as a standalone
//! native `typedef` command, and replaying those commands into a fresh
//! session under the same dialect reconstructs an equivalent registry.

use std::io::Write;

use declaratio::checker::{self, Purpose};
use declaratio::context::Context;
use declaratio::dialect::Dialect;
use declaratio::intern::Interner;
use declaratio::parser::{parse_command, Command};
use declaratio::render::render_native;

/// Defines one alias against `ctx`/`interner`, checking it the same way the
/// CLI driver does before writing it into the registry.
fn define(ctx: &mut Context, interner: &mut Interner, source: &str) {
    let parsed = parse_command(source, ctx.dialect, interner, &mut ctx.registry)
        .unwrap_or_else(|d| panic!("parse error on {source:?}: {}", d.display_with_source(source)));
    assert!(!parsed.diagnostics.has_errors(), "unexpected parse diagnostics on {source:?}");
    let Command::Define { arena, root, key, scoped, form } = parsed.command else {
        panic!("{source:?} did not parse to a define command");
    };
    let diags = checker::check(&arena, root, ctx.dialect, Purpose::Alias, interner, &ctx.registry);
    assert!(!diags.has_errors(), "unexpected check errors on {source:?}: {:?}", diags.errors());
    ctx.registry
        .define(key, scoped, &arena, root, form)
        .unwrap_or_else(|e| panic!("unexpected alias conflict defining {source:?}: {e:?}"));
}

#[test]
fn persisted_aliases_replay_into_an_equivalent_registry() {
    let dialect = Dialect::Cpp17;
    let mut ctx = Context::new(dialect);
    let mut interner = Interner::new();

    define(&mut ctx, &mut interner, "define v as void");
    define(&mut ctx, &mut interner, "typedef int p");
    define(&mut ctx, &mut interner, "define ipp as pointer to pointer to int");

    let commands = ctx.registry.persist(&interner, dialect, &ctx.render);
    assert_eq!(commands.len(), 3, "persisted list should carry every defined alias, in order: {commands:?}");
    assert!(commands[0].starts_with("typedef void v"));
    assert!(commands[1].starts_with("typedef int p"));

    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    for line in &commands {
        writeln!(file, "{line}").unwrap();
    }
    let saved = std::fs::read_to_string(file.path()).expect("read temp file back");

    let mut replay_ctx = Context::new(dialect);
    let mut replay_interner = Interner::new();
    for line in saved.lines().filter(|l| !l.trim().is_empty()) {
        define(&mut replay_ctx, &mut replay_interner, line);
    }

    for key in ["v", "p", "ipp"] {
        assert!(replay_ctx.registry.lookup(key).is_some(), "'{key}' missing after replay");
    }

    let out = {
        let parsed = parse_command("declare q as pointer to ipp", dialect, &mut replay_interner, &mut replay_ctx.registry)
            .unwrap_or_else(|d| panic!("parse error: {}", d.display_with_source("declare q as pointer to ipp")));
        let Command::Declare { arena, root } = parsed.command else {
            panic!("expected a declare command");
        };
        let diags =
            checker::check(&arena, root, replay_ctx.dialect, Purpose::Declaration, &replay_interner, &replay_ctx.registry);
        assert!(!diags.has_errors(), "{:?}", diags.errors());
        render_native(&arena, root, &replay_interner, replay_ctx.dialect, &replay_ctx.render)
    };
    assert_eq!(out, "ipp *q");
}

#[test]
fn replaying_the_same_persisted_list_twice_is_idempotent() {
    let dialect = Dialect::C99;
    let mut ctx = Context::new(dialect);
    let mut interner = Interner::new();
    define(&mut ctx, &mut interner, "define v as void");

    let commands = ctx.registry.persist(&interner, dialect, &ctx.render);
    for line in &commands {
        define(&mut ctx, &mut interner, line);
    }
    assert_eq!(ctx.registry.persist(&interner, dialect, &ctx.render), commands);
}
