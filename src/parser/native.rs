//! Native-form declarator grammar (SPEC_FULL §4.6), shared by the top-level
//! native command and by parameter/cast type expressions embedded inside
//! English commands.
//!
//! The declarator is built with a placeholder leaf standing in for the base
//! type (§3.2 "Placeholder semantics"); `patch_placeholder` substitutes the
//! real base type once the whole declarator shape is known, so
//! `add_array`/`add_function` never need to know the base type up front —
//! exactly the kernel §4.4 describes.

use super::common::{ParseResult, Parser};
use crate::ast::{ArraySize, NodeId, NodeKind};
use crate::error::{Kind, Span};
use crate::scope::{ScopeKind, ScopedName, Segment};
use crate::token::TokenType;
use crate::typeval::{AddError, BaseBit, Bit, StorageBit, TypeValue};

impl<'a> Parser<'a> {
    /// Parses `<type-specifier> <declarator>` and splices them together —
    /// the shape used both by the top-level native command and by every
    /// parameter/cast-target type expression.
    pub(super) fn parse_native_type(&mut self) -> ParseResult<NodeId> {
        let base = self.parse_type_specifier()?;
        let decl = self.parse_declarator()?;
        let root = self.arena_mut().patch_placeholder(base, decl);
        self.arena_mut().take_name(root);
        Ok(root)
    }

    pub(super) fn parse_type_specifier(&mut self) -> ParseResult<NodeId> {
        let start = self.peek().span;
        let mut v = TypeValue::new();
        loop {
            if let TokenType::TypeBit(bit) = self.peek().kind.clone() {
                self.advance();
                if let Err(AddError::ConflictingSpecifier(conflicting)) = v.add(bit) {
                    self.push_error(self.conflicting_specifier(conflicting, start));
                }
                if bit == Bit::Storage(StorageBit::Atomic) && self.matches(&TokenType::LParen) {
                    let inner = self.parse_type_specifier()?;
                    let inner_ty = self.arena().get(inner).ty;
                    v = v.union(inner_ty);
                    self.expect(&TokenType::RParen, "')'")?;
                }
                continue;
            }
            break;
        }

        if let Some(base_bit) = self.peek_ecsu_keyword() {
            self.advance();
            let _ = v.add(Bit::Base(base_bit));
            let name = self.parse_scoped_name()?;
            let span = self.previous().span;
            let id = self.arena_mut().new_node(NodeKind::Ecsu { underlying: None }, span);
            let node = self.arena_mut().get_mut(id);
            node.ty = v;
            node.name = Some(name);
            return Ok(id);
        }

        if let TokenType::TypedefName(sym) = self.peek().kind {
            self.advance();
            let span = self.previous().span;
            let id = self.arena_mut().new_node(
                NodeKind::TypedefRef {
                    alias_name: ScopedName::local(sym),
                },
                span,
            );
            self.arena_mut().get_mut(id).ty = v;
            return Ok(id);
        }

        let id = self.arena_mut().new_node(NodeKind::BuiltIn { bitfield_width: None }, start);
        self.arena_mut().get_mut(id).ty = v;
        Ok(id)
    }

    fn peek_ecsu_keyword(&self) -> Option<BaseBit> {
        Some(match self.peek().kind {
            TokenType::Struct => BaseBit::Struct,
            TokenType::Union => BaseBit::Union,
            TokenType::Enum => BaseBit::Enum,
            TokenType::Class => BaseBit::Class,
            _ => return None,
        })
    }

    pub(super) fn conflicting_specifier(&self, bit: Bit, span: Span) -> crate::error::Diagnostic {
        crate::error::Diagnostic::error(
            Kind::TypeCombination {
                would_be_legal_in: crate::dialect::DialectSet::NONE,
            },
            span,
            format!("conflicting type specifier '{}'", bit.native()),
        )
    }

    pub(super) fn parse_scoped_name(&mut self) -> ParseResult<ScopedName> {
        let first = self.expect_identifier()?;
        let mut name = ScopedName::local(first);
        while self.matches(&TokenType::ColonColon) {
            let seg = self.expect_identifier()?;
            name.append(Segment {
                name: seg,
                kind: ScopeKind::Scope,
            });
        }
        Ok(name)
    }

    pub(super) fn expect_identifier(&mut self) -> ParseResult<crate::intern::Symbol> {
        match self.peek().kind {
            TokenType::Identifier(s) | TokenType::TypedefName(s) => {
                self.advance();
                Ok(s)
            }
            _ => Err(self.error_here("an identifier")),
        }
    }

    fn parse_cv_quals(&mut self) -> TypeValue {
        let mut v = TypeValue::new();
        loop {
            if let TokenType::TypeBit(Bit::Storage(s)) = self.peek().kind {
                if matches!(
                    s,
                    StorageBit::Const | StorageBit::Volatile | StorageBit::Restrict | StorageBit::Atomic
                ) {
                    self.advance();
                    let _ = v.add(Bit::Storage(s));
                    continue;
                }
            }
            break;
        }
        v
    }

    /// `declarator := ('*' | '&' | '&&' | ID '::' '*') cv-quals* declarator
    ///              | direct-declarator`
    pub(super) fn parse_declarator(&mut self) -> ParseResult<NodeId> {
        let span = self.peek().span;
        if self.matches(&TokenType::Star) {
            let cv = self.parse_cv_quals();
            let inner = self.parse_declarator()?;
            let ptr = self.arena_mut().new_node(NodeKind::Pointer { target: inner }, span);
            self.arena_mut().set_parent(inner, ptr);
            self.arena_mut().get_mut(ptr).ty = cv;
            return Ok(ptr);
        }
        if self.matches(&TokenType::AmpAmp) {
            let inner = self.parse_declarator()?;
            let node = self.arena_mut().new_node(NodeKind::RvalueReference { target: inner }, span);
            self.arena_mut().set_parent(inner, node);
            return Ok(node);
        }
        if self.matches(&TokenType::Amp) {
            let inner = self.parse_declarator()?;
            let node = self.arena_mut().new_node(NodeKind::Reference { target: inner }, span);
            self.arena_mut().set_parent(inner, node);
            return Ok(node);
        }
        if let TokenType::Identifier(sym) = self.peek().kind {
            if self.looks_like_pointer_to_member(sym) {
                self.advance();
                let class_name = ScopedName::local(sym);
                self.expect(&TokenType::ColonColon, "'::'")?;
                self.expect(&TokenType::Star, "'*'")?;
                let _ = self.parse_cv_quals();
                let inner = self.parse_declarator()?;
                let node = self.arena_mut().new_node(NodeKind::PointerToMember { class_name, target: inner }, span);
                self.arena_mut().set_parent(inner, node);
                return Ok(node);
            }
        }
        self.parse_direct_declarator()
    }

    /// `::` immediately followed by `*` after a bare identifier signals a
    /// pointer-to-member prefix rather than a scoped type name.
    fn looks_like_pointer_to_member(&self, _sym: crate::intern::Symbol) -> bool {
        matches!(self.tokens.get(self.current + 1).map(|t| &t.kind), Some(TokenType::ColonColon))
            && matches!(self.tokens.get(self.current + 2).map(|t| &t.kind), Some(TokenType::Star))
    }

    fn parse_direct_declarator(&mut self) -> ParseResult<NodeId> {
        let span = self.peek().span;
        let mut node = if self.matches(&TokenType::LParen) {
            let inner = self.parse_declarator()?;
            self.expect(&TokenType::RParen, "')'")?;
            inner
        } else if let TokenType::Identifier(sym) = self.peek().kind {
            self.advance();
            let ph = self.arena_mut().new_node(NodeKind::Placeholder, span);
            self.arena_mut().get_mut(ph).name = Some(ScopedName::local(sym));
            ph
        } else {
            self.arena_mut().new_node(NodeKind::Placeholder, span)
        };

        loop {
            if self.matches(&TokenType::VlaStar) {
                node = self.arena_mut().add_array(node, ArraySize::VlaStar, span);
                continue;
            }
            if self.matches(&TokenType::LBracket) {
                let size = self.parse_array_size()?;
                self.expect(&TokenType::RBracket, "']'")?;
                node = self.arena_mut().add_array(node, size, span);
                continue;
            }
            if self.matches(&TokenType::LParen) {
                let (params, variadic) = self.parse_param_list()?;
                self.expect(&TokenType::RParen, "')'")?;
                node = self.arena_mut().add_function(node, params, variadic, span);
                continue;
            }
            break;
        }
        Ok(node)
    }

    fn parse_array_size(&mut self) -> ParseResult<ArraySize> {
        if self.check(&TokenType::RBracket) {
            return Ok(ArraySize::Unknown);
        }
        if let TokenType::IntegerLiteral(n) = self.peek().kind {
            self.advance();
            return Ok(ArraySize::Integer(n));
        }
        if let TokenType::Identifier(_) = self.peek().kind {
            self.advance();
            return Ok(ArraySize::Constant);
        }
        Err(self.error_here("an array size"))
    }

    pub(super) fn parse_param_list(&mut self) -> ParseResult<(Vec<NodeId>, bool)> {
        let mut params = Vec::new();
        if self.check(&TokenType::RParen) {
            return Ok((params, false));
        }
        loop {
            if self.matches(&TokenType::Ellipsis) {
                return Ok((params, true));
            }
            let root = self.parse_native_type()?;
            params.push(root);
            if !self.matches(&TokenType::Comma) {
                break;
            }
        }
        Ok((params, false))
    }
}
