//! Command-line driver (SPEC_FULL §9.4, §6 "Persisted state"): splits input
//! on `;`/EOF and `#` comments, feeds each command through
//! `parser::parse_command` → `checker::check` → `render::render_*`, and maps
//! the outcome to stdout/stderr and an exit status. Everything here is
//! explicitly outside the core (§6/§1 non-goals: no readline/history/color/
//! config-file loading) — grounded on the teacher's `fn main` → `run_cli`
//! dispatch shape (`src/main.rs`/`src/cli.rs`) and its `clap` derive usage,
//! kept behind the same `cli` feature name the teacher gates it with.
//! Session/command/diagnostic events go through `log` (the same crate the
//! teacher's `logicaffeine_lsp` uses for its own driver), initialised here
//! via `env_logger` against `RUST_LOG`.

use std::io::{self, Read, Write};

use clap::Parser;

use crate::checker::{self, Purpose};
use crate::context::Context;
use crate::dialect::Dialect;
use crate::error::Diagnostics;
use crate::intern::Interner;
use crate::parser::{parse_command, Command};
use crate::render::{render_cast_native, render_english, render_native};

#[derive(Parser)]
#[command(name = "declaratio")]
#[command(about = "Translates between pseudo-English and native C/C++ declarator syntax")]
#[command(version)]
pub struct Cli {
    /// Dialect to start in (§4.1 selectors, e.g. `c99`, `c++17`).
    #[arg(long, default_value = "c++17")]
    pub dialect: String,

    /// Trail the qualifier after the base type in native output (`int
    /// const`) instead of before it (`const int`).
    #[arg(long, default_value_t = true)]
    pub east_const: bool,

    /// One or more `;`-terminated commands. Reads from stdin if omitted.
    pub commands: Vec<String>,
}

/// Entry point for the binary (teacher's `run_cli` shape).
pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let dialect = Dialect::from_selector(&cli.dialect.to_lowercase()).ok_or_else(|| {
        log::error!("unknown dialect '{}'", cli.dialect);
        format!("unknown dialect '{}'", cli.dialect)
    })?;
    log::info!("starting session in {}", dialect.name());

    let mut ctx = Context::new(dialect);
    ctx.render.east_const = cli.east_const;

    let source = if cli.commands.is_empty() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        cli.commands.join(" ")
    };

    let stdout = io::stdout();
    let stderr = io::stderr();
    let ok = run_session(&mut ctx, &source, &mut stdout.lock(), &mut stderr.lock());
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Runs every command in `source` against `ctx`, in order, writing rendered
/// output to `out` and diagnostics to `err`. Returns `false` if any command
/// produced an error, so the caller can map that to a non-zero exit status.
/// Split out from `run_cli` so it can be driven directly by tests without a
/// real process/stdin.
pub fn run_session(ctx: &mut Context, source: &str, out: &mut impl Write, err: &mut impl Write) -> bool {
    let mut interner = Interner::new();
    let mut ok = true;
    for command_text in split_commands(source) {
        log::debug!("running command: {command_text}");
        match run_one(ctx, &command_text, &mut interner) {
            Ok(Some(line)) => {
                let _ = writeln!(out, "{line}");
            }
            Ok(None) => {}
            Err(Outcome::Quit) => break,
            Err(Outcome::Diagnostics(diags)) => {
                ok = ok && !diags.has_errors();
                log::warn!("{command_text:?} produced {} diagnostic(s)", diags.all().count());
                for d in diags.all() {
                    let _ = writeln!(err, "{}", d.display_with_source(&command_text));
                }
            }
            Err(Outcome::Fatal(message)) => {
                ok = false;
                log::error!("fatal error on {command_text:?}: {message}");
                let _ = writeln!(err, "error: {message}");
            }
        }
    }
    ok
}

enum Outcome {
    Quit,
    Diagnostics(Diagnostics),
    Fatal(String),
}

fn run_one(ctx: &mut Context, command_text: &str, interner: &mut Interner) -> Result<Option<String>, Outcome> {
    let parsed = parse_command(command_text, ctx.dialect, interner, &mut ctx.registry)
        .map_err(|d| Outcome::Diagnostics({
            let mut diags = Diagnostics::new();
            diags.push_error(d);
            diags
        }))?;

    if parsed.diagnostics.has_errors() {
        return Err(Outcome::Diagnostics(parsed.diagnostics));
    }

    match parsed.command {
        Command::Declare { arena, root } => {
            let diags = checker::check(&arena, root, ctx.dialect, Purpose::Declaration, interner, &ctx.registry);
            if diags.has_errors() {
                return Err(Outcome::Diagnostics(diags));
            }
            Ok(Some(render_native(&arena, root, interner, ctx.dialect, &ctx.render)))
        }
        Command::Cast { arena, root, kind } => {
            let diags = checker::check(&arena, root, ctx.dialect, Purpose::Cast(kind), interner, &ctx.registry);
            if diags.has_errors() {
                return Err(Outcome::Diagnostics(diags));
            }
            Ok(Some(render_cast_native(&arena, root, kind, interner, ctx.dialect, &ctx.render)))
        }
        Command::Explain { arena, root } => {
            let diags = checker::check(&arena, root, ctx.dialect, Purpose::Declaration, interner, &ctx.registry);
            if diags.has_errors() {
                return Err(Outcome::Diagnostics(diags));
            }
            Ok(Some(render_english(&arena, root, interner, ctx.dialect)))
        }
        Command::Define { arena, root, key, scoped, form } => {
            let diags = checker::check(&arena, root, ctx.dialect, Purpose::Alias, interner, &ctx.registry);
            if diags.has_errors() {
                return Err(Outcome::Diagnostics(diags));
            }
            ctx.registry
                .define(key.clone(), scoped, &arena, root, form)
                .map_err(|conflict| {
                    Outcome::Fatal(format!(
                        "'{key}' redefined with a different type (previously defined in {:?} form)",
                        conflict.existing_form
                    ))
                })?;
            Ok(Some(format!("defined '{key}'")))
        }
        Command::Help => Ok(Some(help_text().to_string())),
        Command::Set { name } => {
            let Some(sym) = name else {
                return Ok(Some(format!("dialect: {}", ctx.dialect.name())));
            };
            let word = crate::lexer::resolve_identifier(sym, interner).to_lowercase();
            match Dialect::from_selector(&word) {
                Some(d) => {
                    ctx.dialect = d;
                    Ok(Some(format!("dialect set to {}", d.name())))
                }
                None => Err(Outcome::Fatal(format!("unknown dialect '{word}'"))),
            }
        }
        Command::Show => Ok(Some(format!(
            "dialect: {}, east_const: {}, trailing_semicolon: {}",
            ctx.dialect.name(),
            ctx.render.east_const,
            ctx.render.trailing_semicolon
        ))),
        Command::Quit => Err(Outcome::Quit),
    }
}

fn help_text() -> &'static str {
    "commands: declare <name> as <english-type>; cast <name> as [const|static|dynamic|reinterpret] to <type>; \
     define <name> as <type>; explain <native-type>; set [dialect]; show; quit"
}

/// Strips a `#`-to-end-of-line comment from each line, then splits the
/// remainder on `;`, trimming and dropping empty commands.
fn split_commands(source: &str) -> Vec<String> {
    let stripped: String = source
        .lines()
        .map(|line| match line.find('#') {
            Some(i) => &line[..i],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n");

    stripped
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
