//! Scanner (SPEC_FULL §4.5).
//!
//! Grounded on the teacher's single-pass `classify_word` dispatch
//! (`src/lexer.rs`), simplified here to one stage — this grammar has no
//! indentation or line structure, only `;`-separated commands — and
//! generalized to the dialect- and mode-aware identifier classification
//! order §4.5 specifies: English keyword, then dialect-filtered native
//! keyword, then type-alias registry, then plain identifier.

use crate::ast::OperatorId;
use crate::dialect::Dialect;
use crate::error::{Diagnostic, Kind, Span};
use crate::intern::{Interner, Symbol};
use crate::registry::AliasRegistry;
use crate::token::{CastKind, EnglishVerb, Token, TokenType};
use crate::typeval::{AttributeBit, BaseBit, Bit, Form, StorageBit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexerMode {
    English,
    Native,
}

pub struct Lexer<'src> {
    source: &'src str,
    bytes: &'src [u8],
    pos: usize,
    dialect: Dialect,
    mode: LexerMode,
}

const ECSU_BASE: &[BaseBit] = &[
    BaseBit::Enum,
    BaseBit::Struct,
    BaseBit::Union,
    BaseBit::Class,
    BaseBit::Namespace,
    BaseBit::Scope,
];

fn lookup_bit(word: &str, form: Form) -> Option<Bit> {
    for b in BaseBit::ALL {
        if ECSU_BASE.contains(&b) {
            continue;
        }
        let s = match form {
            Form::English => b.english(),
            Form::Native => b.native(),
        };
        if !s.is_empty() && s.eq_ignore_ascii_case(word) {
            return Some(Bit::Base(b));
        }
    }
    for s in StorageBit::ALL {
        let text = match form {
            Form::English => s.english(),
            Form::Native => s.native(),
        };
        if !text.is_empty() && text.eq_ignore_ascii_case(word) {
            return Some(Bit::Storage(s));
        }
    }
    for a in AttributeBit::ALL {
        let text = match form {
            Form::English => a.english(),
            Form::Native => a.native(),
        };
        if !text.is_empty() && text.eq_ignore_ascii_case(word) {
            return Some(Bit::Attribute(a));
        }
    }
    None
}

fn lookup_verb(word: &str) -> Option<EnglishVerb> {
    Some(match word {
        "declare" => EnglishVerb::Declare,
        "cast" => EnglishVerb::Cast,
        "define" => EnglishVerb::Define,
        "explain" => EnglishVerb::Explain,
        "help" => EnglishVerb::Help,
        "set" => EnglishVerb::Set,
        "show" => EnglishVerb::Show,
        "quit" => EnglishVerb::Quit,
        _ => return None,
    })
}

/// Structural words valid only in the English grammar (§4.5 mode 1).
fn lookup_english_structural(word: &str) -> Option<TokenType> {
    Some(match word {
        "as" | "into" => TokenType::As,
        "pointer" => TokenType::Pointer,
        "reference" => TokenType::Reference,
        "rvalue" => TokenType::Rvalue,
        "array" => TokenType::Array,
        "function" => TokenType::Function,
        "returning" => TokenType::Returning,
        "to" => TokenType::To,
        "of" => TokenType::Of,
        "member" => TokenType::Member,
        "non-member" => TokenType::NonMember,
        "constructor" => TokenType::Constructor,
        "destructor" => TokenType::Destructor,
        "conversion" => TokenType::Conversion,
        "literal" => TokenType::Literal,
        "block" => TokenType::AppleBlockWord,
        "variadic" => TokenType::Variadic,
        _ => return None,
    })
}

/// The four named casts, spelled the same (one underscored word) in both
/// grammars and gated to C++98 and later — introduced with the first
/// standardized dialect, absent from `CppPre98`.
fn lookup_cast_keyword(word: &str) -> Option<CastKind> {
    Some(match word {
        "const_cast" => CastKind::Const,
        "static_cast" => CastKind::Static,
        "dynamic_cast" => CastKind::Dynamic,
        "reinterpret_cast" => CastKind::Reinterpret,
        _ => return None,
    })
}

/// Words that introduce a scope segment, spelled the same in both grammars.
fn lookup_scope_keyword(word: &str) -> Option<TokenType> {
    Some(match word {
        "class" => TokenType::Class,
        "struct" | "structure" => TokenType::Struct,
        "union" => TokenType::Union,
        "enum" | "enumeration" => TokenType::Enum,
        "namespace" => TokenType::Namespace,
        "operator" => TokenType::Operator,
        "using" => TokenType::Using,
        _ => return None,
    })
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, dialect: Dialect, mode: LexerMode) -> Self {
        Lexer {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            dialect,
            mode,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        self.source[self.pos..].starts_with(s)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Tokenizes the full command. `interner` is used to intern identifier
    /// text; `registry` supplies order (3) of §4.5's classification chain.
    pub fn tokenize(
        &mut self,
        interner: &mut Interner,
        registry: &AliasRegistry,
    ) -> Result<Vec<Token>, Diagnostic> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let start = self.pos;
            let Some(b) = self.peek() else {
                tokens.push(Token::new(TokenType::Eof, Span::new(start, start)));
                break;
            };

            if b == b'"' {
                tokens.push(self.scan_string(interner)?);
                continue;
            }
            if b.is_ascii_digit() {
                tokens.push(self.scan_number());
                continue;
            }
            if b == b'_' || b.is_ascii_alphabetic() {
                tokens.push(self.scan_word(interner, registry));
                continue;
            }
            tokens.push(self.scan_punct()?);
        }
        Ok(tokens)
    }

    fn scan_number(&mut self) -> Token {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        let text = &self.source[start..self.pos];
        let value: u64 = text.parse().unwrap_or(0);
        Token::new(TokenType::IntegerLiteral(value), Span::new(start, self.pos))
    }

    fn scan_string(&mut self, interner: &mut Interner) -> Result<Token, Diagnostic> {
        let start = self.pos;
        self.pos += 1;
        let content_start = self.pos;
        while let Some(b) = self.peek() {
            if b == b'"' {
                let text = &self.source[content_start..self.pos];
                self.pos += 1;
                let sym = interner.intern(text);
                return Ok(Token::new(TokenType::StringLiteral(sym), Span::new(start, self.pos)));
            }
            self.pos += 1;
        }
        Err(Diagnostic::error(
            Kind::Lexical,
            Span::new(start, self.pos),
            "unterminated string literal",
        ))
    }

    fn scan_word(&mut self, interner: &mut Interner, registry: &AliasRegistry) -> Token {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == b'_' || b.is_ascii_alphanumeric() {
                self.pos += 1;
            } else {
                break;
            }
        }
        // "non-member" is hyphenated; fold the trailing "-member" if present.
        if self.source[start..self.pos].eq_ignore_ascii_case("non") && self.starts_with("-member") {
            self.pos += "-member".len();
        }
        let word = &self.source[start..self.pos];
        let lower = word.to_lowercase();
        let span = Span::new(start, self.pos);

        if self.mode == LexerMode::English {
            if let Some(verb) = lookup_verb(&lower) {
                return Token::new(TokenType::Verb(verb), span);
            }
            if let Some(tt) = lookup_english_structural(&lower) {
                return Token::new(tt, span);
            }
        }
        if let Some(kind) = lookup_cast_keyword(&lower) {
            if Dialect::Cpp98.min().contains(self.dialect) {
                return Token::new(TokenType::CastKeyword(kind), span);
            }
        }
        if let Some(tt) = lookup_scope_keyword(&lower) {
            if lower == "operator" {
                if let Some(op_tok) = self.try_scan_operator_symbol() {
                    return Token::new(TokenType::OperatorSymbol(op_tok), span.join(Span::new(self.pos, self.pos)));
                }
            }
            return Token::new(tt, span);
        }
        if self.mode == LexerMode::English {
            if let Some(bit) = lookup_bit(&lower, Form::English) {
                return Token::new(TokenType::TypeBit(bit), span);
            }
        }
        // Parameter lists and cast targets are written in native syntax even
        // inside an English command (§8 scenario 3), so native spellings are
        // recognised regardless of mode.
        if let Some(bit) = lookup_bit(&lower, Form::Native) {
            if bit.dialects().contains(self.dialect) {
                return Token::new(TokenType::TypeBit(bit), span);
            }
        }
        if registry.lookup(&lower).is_some() {
            let sym = interner.intern(word);
            return Token::new(TokenType::TypedefName(sym), span);
        }
        let sym = interner.intern(word);
        Token::new(TokenType::Identifier(sym), span)
    }

    /// After the `operator` keyword in native syntax, greedily match the
    /// longest known operator symbol (`operator==`, `operator[]`, …).
    fn try_scan_operator_symbol(&mut self) -> Option<OperatorId> {
        const CANDIDATES: &[OperatorId] = &[
            OperatorId::Spaceship,
            OperatorId::ArrowStar,
            OperatorId::Eq,
            OperatorId::Ne,
            OperatorId::Le,
            OperatorId::Ge,
            OperatorId::Shl,
            OperatorId::Shr,
            OperatorId::ShlAssign,
            OperatorId::ShrAssign,
            OperatorId::AddAssign,
            OperatorId::SubAssign,
            OperatorId::MulAssign,
            OperatorId::DivAssign,
            OperatorId::ModAssign,
            OperatorId::AndAssign,
            OperatorId::OrAssign,
            OperatorId::XorAssign,
            OperatorId::LogAnd,
            OperatorId::LogOr,
            OperatorId::Increment,
            OperatorId::Decrement,
            OperatorId::Arrow,
            OperatorId::Subscript,
            OperatorId::Call,
            OperatorId::Lt,
            OperatorId::Gt,
            OperatorId::Add,
            OperatorId::Sub,
            OperatorId::Mul,
            OperatorId::Div,
            OperatorId::Mod,
            OperatorId::BitAnd,
            OperatorId::BitOr,
            OperatorId::BitXor,
            OperatorId::BitNot,
            OperatorId::Not,
            OperatorId::Assign,
            OperatorId::Comma,
        ];
        let save = self.pos;
        self.skip_whitespace();
        for &op in CANDIDATES {
            let tok = op.token();
            if self.starts_with(tok) {
                self.pos += tok.len();
                return Some(op);
            }
        }
        self.pos = save;
        None
    }

    fn scan_punct(&mut self) -> Result<Token, Diagnostic> {
        let start = self.pos;
        let three = [("...", TokenType::Ellipsis)];
        for (text, tt) in three {
            if self.starts_with(text) {
                self.pos += text.len();
                return Ok(Token::new(tt, Span::new(start, self.pos)));
            }
        }
        let two = [
            ("::", TokenType::ColonColon),
            ("->", TokenType::Arrow),
            ("&&", TokenType::AmpAmp),
        ];
        for (text, tt) in two {
            if self.starts_with(text) {
                self.pos += text.len();
                return Ok(Token::new(tt, Span::new(start, self.pos)));
            }
        }
        let one = self.peek().unwrap();
        let tt = match one {
            b'*' => TokenType::Star,
            b'&' => TokenType::Amp,
            b'(' => TokenType::LParen,
            b')' => TokenType::RParen,
            b'[' => {
                // C99 VLA `[*]`
                if self.peek_at(1) == Some(b'*') && self.peek_at(2) == Some(b']') {
                    self.pos += 3;
                    return Ok(Token::new(TokenType::VlaStar, Span::new(start, self.pos)));
                }
                TokenType::LBracket
            }
            b']' => TokenType::RBracket,
            b',' => TokenType::Comma,
            b';' => TokenType::Semicolon,
            b':' => TokenType::Colon,
            b'=' => TokenType::Assign,
            _ => {
                self.pos += 1;
                return Err(Diagnostic::error(
                    Kind::Lexical,
                    Span::new(start, self.pos),
                    format!("unexpected character '{}'", one as char),
                ));
            }
        };
        self.pos += 1;
        Ok(Token::new(tt, Span::new(start, self.pos)))
    }
}

/// Retained for symmetry with consumers that only have a `Symbol` in hand
/// and need its interned text, e.g. diagnostics.
pub fn resolve_identifier(sym: Symbol, interner: &Interner) -> &str {
    interner.resolve(sym)
}
