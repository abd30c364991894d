//! Top-level command dispatch (SPEC_FULL §4.6): the lead token decides the
//! English family (`declare`/`cast`/`define`/`explain`/`help`/`set`/`show`/
//! `quit`) from the native lead-in, and both families bottom out in the
//! shared native/English sub-grammars.

mod common;
mod english;
mod native;

pub use common::{known_words, ParseResult, Parser, ParserGuard};

use crate::ast::{NodeArena, NodeId};
use crate::dialect::Dialect;
use crate::error::{Diagnostic, Diagnostics};
use crate::intern::{Interner, Symbol};
use crate::lexer::{resolve_identifier, Lexer, LexerMode};
use crate::registry::AliasRegistry;
use crate::scope::ScopedName;
use crate::token::{CastKind, EnglishVerb, TokenType};
use crate::typeval::{Bit, Form, StorageBit, TypeValue};

/// One fully parsed command, its declarator tree (if any) owned by its own
/// arena, ready to be handed to the checker and renderer.
pub enum Command {
    Declare { arena: NodeArena, root: NodeId },
    Cast { arena: NodeArena, root: NodeId, kind: CastKind },
    Explain { arena: NodeArena, root: NodeId },
    /// Carries the parsed-but-not-yet-registered alias: the caller must run
    /// it through `checker::check` and only call `AliasRegistry::define` on
    /// success (§2 "written to by successful define/typedef/using parses
    /// that pass the Checker").
    Define {
        arena: NodeArena,
        root: NodeId,
        key: String,
        scoped: ScopedName,
        form: Form,
    },
    Help,
    Set { name: Option<Symbol> },
    Show,
    Quit,
}

pub struct ParsedCommand {
    pub command: Command,
    pub diagnostics: Diagnostics,
}

/// Lexes and parses one command. The lexer's mode is fixed for the whole
/// command from its lead word (§4.5); native spellings stay recognisable
/// throughout so that parameter and cast-target types embedded in an
/// English command can still be written in native form.
pub fn parse_command(
    source: &str,
    dialect: Dialect,
    interner: &mut Interner,
    registry: &mut AliasRegistry,
) -> Result<ParsedCommand, Diagnostic> {
    let mode = detect_mode(source);
    let mut lexer = Lexer::new(source, dialect, mode);
    let tokens = lexer.tokenize(interner, registry)?;
    let mut parser = Parser::new(tokens, dialect, interner, registry);

    let result = match mode {
        LexerMode::English => parse_english_command(&mut parser),
        LexerMode::Native => parse_native_command(&mut parser),
    };

    parser.end_command();
    let diagnostics = parser.into_diagnostics();
    result.map(|command| ParsedCommand { command, diagnostics })
}

/// The lead word decides the lexer's mode for the whole command: one of the
/// eight English verbs, or else a native lead-in (§4.5).
fn detect_mode(source: &str) -> LexerMode {
    let first_word: String = source
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    match first_word.to_lowercase().as_str() {
        "declare" | "cast" | "define" | "explain" | "help" | "set" | "show" | "quit" => LexerMode::English,
        _ => LexerMode::Native,
    }
}

fn parse_english_command(parser: &mut Parser) -> ParseResult<Command> {
    let verb = match parser.peek().kind {
        TokenType::Verb(v) => v,
        _ => return Err(parser.error_here("a command verb")),
    };
    parser.advance();

    match verb {
        EnglishVerb::Declare => {
            let name = parser.expect_identifier()?;
            parser.expect(&TokenType::As, "'as'")?;
            let root = parser.parse_english_type()?;
            parser.arena_mut().get_mut(root).name = Some(ScopedName::local(name));
            Ok(Command::Declare {
                arena: std::mem::take(&mut parser.arena),
                root,
            })
        }
        EnglishVerb::Cast => {
            let name = parser.expect_identifier()?;
            parser.expect(&TokenType::As, "'as' (or 'into')")?;
            let kind = if let TokenType::CastKeyword(k) = parser.peek().kind {
                parser.advance();
                parser.expect(&TokenType::To, "'to'")?;
                k
            } else {
                CastKind::CStyle
            };
            let root = parser.parse_english_type()?;
            parser.arena_mut().get_mut(root).name = Some(ScopedName::local(name));
            Ok(Command::Cast {
                arena: std::mem::take(&mut parser.arena),
                root,
                kind,
            })
        }
        EnglishVerb::Define => {
            let name = parser.expect_identifier()?;
            parser.expect(&TokenType::As, "'as'")?;
            let root = parser.parse_english_type()?;
            let key = resolve_identifier(name, parser.interner).to_string();
            let scoped = ScopedName::local(name);
            Ok(Command::Define {
                arena: std::mem::take(&mut parser.arena),
                root,
                key,
                scoped,
                form: Form::English,
            })
        }
        EnglishVerb::Explain => {
            let root = parser.parse_native_type()?;
            Ok(Command::Explain {
                arena: std::mem::take(&mut parser.arena),
                root,
            })
        }
        EnglishVerb::Help => Ok(Command::Help),
        EnglishVerb::Set => {
            let name = if let TokenType::Identifier(s) = parser.peek().kind {
                parser.advance();
                Some(s)
            } else {
                None
            };
            Ok(Command::Set { name })
        }
        EnglishVerb::Show => Ok(Command::Show),
        EnglishVerb::Quit => Ok(Command::Quit),
    }
}

/// A command that doesn't lead with an English verb is a bare native type
/// expression — `explain`'s implicit counterpart, used e.g. when replaying
/// a persisted `declare` entry (§6 "Persisted state") — unless it leads with
/// `using`, or the parsed type carries the `typedef` storage bit, in which
/// case it defines a named alias instead of merely explaining a type.
fn parse_native_command(parser: &mut Parser) -> ParseResult<Command> {
    if matches!(parser.peek().kind, TokenType::Using) {
        return parse_using_command(parser);
    }
    let root = parser.parse_native_type()?;
    if parser.arena().get(root).ty.has(Bit::Storage(StorageBit::Typedef)) {
        return finish_define_from_native(parser, root, Form::Native);
    }
    Ok(Command::Explain {
        arena: std::mem::take(&mut parser.arena),
        root,
    })
}

/// `using V = <native-type>;` — the C++11+ alternative spelling for
/// `typedef <native-type> V;`, replaying a persisted alias in native form
/// (§6 "Persisted state").
fn parse_using_command(parser: &mut Parser) -> ParseResult<Command> {
    parser.advance();
    let name = parser.expect_identifier()?;
    parser.expect(&TokenType::Assign, "'='")?;
    let root = parser.parse_native_type()?;
    Ok(finish_define(parser, root, name, Form::Native))
}

/// `typedef <native-type> V;` parses as an ordinary native type-specifier
/// plus declarator — the bare word `typedef` already lexes as the
/// `StorageBit::Typedef` type bit (§4.5), not a dedicated keyword — so this
/// only strips that bit back off the parsed type and pulls the declared name
/// `parse_native_type` already deposited at the root.
fn finish_define_from_native(parser: &mut Parser, root: NodeId, form: Form) -> ParseResult<Command> {
    let name = parser
        .arena()
        .get(root)
        .name
        .clone()
        .ok_or_else(|| parser.error_here("a name to define"))?;
    let sym = name.local_name();
    let mut typedef_bit = TypeValue::new();
    let _ = typedef_bit.add(Bit::Storage(StorageBit::Typedef));
    let stripped = parser.arena().get(root).ty.diff(typedef_bit);
    parser.arena_mut().get_mut(root).ty = stripped;
    Ok(finish_define(parser, root, sym, form))
}

/// Shared tail for every alias-defining production: hands the parsed tree
/// over as an un-registered `Command::Define` so the caller can check it
/// before writing it to the `AliasRegistry` (§2).
fn finish_define(parser: &mut Parser, root: NodeId, name: Symbol, form: Form) -> Command {
    let key = resolve_identifier(name, parser.interner).to_string();
    let scoped = ScopedName::local(name);
    Command::Define {
        arena: std::mem::take(&mut parser.arena),
        root,
        key,
        scoped,
        form,
    }
}
