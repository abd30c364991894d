//! Parser core: cursor primitives, RAII backtracking, and the
//! inherited-attribute stacks (SPEC_FULL §4.6).
//!
//! Grounded on the teacher's `Parser` + `ParserGuard`/`ParserCheckpoint`
//! (`src/parser/mod.rs`): a checkpoint snapshots cursor position and stack
//! depths; a guard restores them on drop unless `commit()`ed. Generalized
//! here from the teacher's NLP-specific fields (`var_counter`,
//! `donkey_bindings`, …) to this grammar's two inherited-attribute stacks —
//! the type-context stack and the qualifier stack — plus the per-command
//! declarator arena.

use crate::ast::{NodeArena, NodeId};
use crate::dialect::Dialect;
use crate::error::{Diagnostic, Diagnostics, Kind, Span};
use crate::intern::Interner;
use crate::registry::AliasRegistry;
use crate::suggest::KNOWN_WORDS;
use crate::token::{Token, TokenType};
use crate::typeval::TypeValue;
use std::mem::discriminant;
use std::ops::{Deref, DerefMut};

pub(super) type ParseResult<T> = Result<T, Diagnostic>;

#[derive(Clone, Copy)]
pub(super) struct ParserCheckpoint {
    pos: usize,
    type_context_len: usize,
    qualifier_len: usize,
}

pub struct Parser<'a> {
    pub(super) tokens: Vec<Token>,
    pub(super) current: usize,
    pub(super) dialect: Dialect,
    pub(super) interner: &'a mut Interner,
    pub(super) registry: &'a mut AliasRegistry,
    pub(super) arena: NodeArena,
    pub(super) diags: Diagnostics,
    /// The base type subtree pushed before descending into a native
    /// declarator, so the innermost leaf can graft it in (§4.6).
    pub(super) type_context: Vec<NodeId>,
    /// Qualifiers accumulated in English phrases, attached to the next
    /// declarator node created (§4.6).
    pub(super) qualifiers: Vec<TypeValue>,
}

pub struct ParserGuard<'p, 'a> {
    parser: &'p mut Parser<'a>,
    checkpoint: ParserCheckpoint,
    committed: bool,
}

impl<'p, 'a> ParserGuard<'p, 'a> {
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl<'p, 'a> Drop for ParserGuard<'p, 'a> {
    fn drop(&mut self) {
        if !self.committed {
            self.parser.restore(self.checkpoint);
        }
    }
}

impl<'p, 'a> Deref for ParserGuard<'p, 'a> {
    type Target = Parser<'a>;
    fn deref(&self) -> &Self::Target {
        self.parser
    }
}

impl<'p, 'a> DerefMut for ParserGuard<'p, 'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.parser
    }
}

impl<'a> Parser<'a> {
    pub fn new(
        tokens: Vec<Token>,
        dialect: Dialect,
        interner: &'a mut Interner,
        registry: &'a mut AliasRegistry,
    ) -> Self {
        Parser {
            tokens,
            current: 0,
            dialect,
            interner,
            registry,
            arena: NodeArena::new(),
            diags: Diagnostics::new(),
            type_context: Vec::new(),
            qualifiers: Vec::new(),
        }
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diags
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    pub(super) fn checkpoint(&self) -> ParserCheckpoint {
        ParserCheckpoint {
            pos: self.current,
            type_context_len: self.type_context.len(),
            qualifier_len: self.qualifiers.len(),
        }
    }

    pub(super) fn restore(&mut self, cp: ParserCheckpoint) {
        self.current = cp.pos;
        self.type_context.truncate(cp.type_context_len);
        self.qualifiers.truncate(cp.qualifier_len);
    }

    pub(super) fn guard(&mut self) -> ParserGuard<'_, 'a> {
        ParserGuard {
            checkpoint: self.checkpoint(),
            parser: self,
            committed: false,
        }
    }

    /// §4.6: unconditionally drop both inherited-attribute stacks at a
    /// command boundary, whether the command succeeded or failed.
    pub fn end_command(&mut self) {
        self.type_context.clear();
        self.qualifiers.clear();
    }

    pub(super) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    pub(super) fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    pub(super) fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenType::Eof)
    }

    pub(super) fn check(&self, kind: &TokenType) -> bool {
        !self.is_at_end() && discriminant(&self.peek().kind) == discriminant(kind)
    }

    pub(super) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    pub(super) fn matches(&mut self, kind: &TokenType) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn expect(&mut self, kind: &TokenType, expected: &str) -> ParseResult<&Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let span = self.peek().span;
            Err(Diagnostic::error(Kind::Grammar, span, format!("expected {expected}")))
        }
    }

    pub(super) fn error_here(&self, message: impl Into<String>) -> Diagnostic {
        Diagnostic::error(Kind::Grammar, self.peek().span, message)
    }

    pub(super) fn unknown_identifier(&self, word: &str, span: Span) -> Diagnostic {
        Diagnostic::error(Kind::UnknownIdentifier, span, format!("unknown identifier '{word}'"))
            .with_suggestion(word)
    }

    pub(super) fn push_error(&mut self, d: Diagnostic) {
        self.diags.push_error(d);
    }

    pub(super) fn push_warning(&mut self, d: Diagnostic) {
        self.diags.push_warning(d);
    }
}

/// Used by callers building "did you mean" hints outside the parser proper.
pub fn known_words() -> &'static [&'static str] {
    KNOWN_WORDS
}
