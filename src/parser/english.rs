//! English type-phrase grammar: the recursive "pointer to / array N of /
//! function (...) returning" family, plus the constructor/destructor/
//! operator/conversion/literal/block leaves.
//!
//! Built outside-in, matching the phrase order directly: each production
//! recurses into its own "to"/"of"/"returning" continuation first and wraps
//! the result, so (unlike the native declarator) no placeholder splice is
//! needed — the tree shape and the token order already agree. Base-type
//! leaves fall through to the native type-specifier parser, since a bare
//! type name ("int", "const class C") is spelled identically whether it
//! is reached from an English or a native phrase.

use super::common::{ParseResult, Parser};
use crate::ast::{ArraySize, NodeId, NodeKind};
use crate::error::Span;
use crate::token::TokenType;
use crate::typeval::{AddError, Bit, TypeValue};

impl<'a> Parser<'a> {
    /// `english-type := prefix-word* ( pointer-phrase | reference-phrase
    ///                  | array-phrase | function-phrase | block-phrase
    ///                  | constructor-phrase | destructor-phrase
    ///                  | conversion-phrase | literal-phrase | base-type )`
    pub(super) fn parse_english_type(&mut self) -> ParseResult<NodeId> {
        let start = self.peek().span;
        let (prefix, non_member) = self.parse_prefix_words(start);

        if self.matches(&TokenType::Pointer) {
            self.expect(&TokenType::To, "'to'")?;
            if self.matches(&TokenType::Member) {
                self.expect(&TokenType::Of, "'of'")?;
                self.expect(&TokenType::Class, "'class'")?;
                let class_name = self.parse_scoped_name()?;
                let inner = self.parse_english_type()?;
                let id = self
                    .arena_mut()
                    .new_node(NodeKind::PointerToMember { class_name, target: inner }, start);
                self.arena_mut().set_parent(inner, id);
                self.arena_mut().get_mut(id).ty = prefix;
                return Ok(id);
            }
            let inner = self.parse_english_type()?;
            let id = self.arena_mut().new_node(NodeKind::Pointer { target: inner }, start);
            self.arena_mut().set_parent(inner, id);
            self.arena_mut().get_mut(id).ty = prefix;
            return Ok(id);
        }

        if self.matches(&TokenType::Rvalue) {
            self.expect(&TokenType::Reference, "'reference'")?;
            self.expect(&TokenType::To, "'to'")?;
            let inner = self.parse_english_type()?;
            let id = self.arena_mut().new_node(NodeKind::RvalueReference { target: inner }, start);
            self.arena_mut().set_parent(inner, id);
            self.arena_mut().get_mut(id).ty = prefix;
            return Ok(id);
        }

        if self.matches(&TokenType::Reference) {
            self.expect(&TokenType::To, "'to'")?;
            let inner = self.parse_english_type()?;
            let id = self.arena_mut().new_node(NodeKind::Reference { target: inner }, start);
            self.arena_mut().set_parent(inner, id);
            self.arena_mut().get_mut(id).ty = prefix;
            return Ok(id);
        }

        if self.matches(&TokenType::Array) {
            let size = self.parse_english_array_size();
            self.expect(&TokenType::Of, "'of'")?;
            let inner = self.parse_english_type()?;
            let id = self.arena_mut().new_node(NodeKind::Array { element: inner, size }, start);
            self.arena_mut().set_parent(inner, id);
            self.arena_mut().get_mut(id).ty = prefix;
            return Ok(id);
        }

        if self.matches(&TokenType::Function) {
            if let TokenType::OperatorSymbol(op) = self.peek().kind {
                self.advance();
                self.expect(&TokenType::LParen, "'('")?;
                let (params, _variadic) = self.parse_english_param_list()?;
                self.expect(&TokenType::RParen, "')'")?;
                self.expect(&TokenType::Returning, "'returning'")?;
                let ret = self.parse_english_type()?;
                let id = self.arena_mut().new_node(
                    NodeKind::Operator {
                        op,
                        params,
                        ret,
                        is_member: !non_member,
                    },
                    start,
                );
                self.arena_mut().set_parent(ret, id);
                self.arena_mut().get_mut(id).ty = prefix;
                return Ok(id);
            }
            self.expect(&TokenType::LParen, "'('")?;
            let (params, variadic) = self.parse_param_list()?;
            self.expect(&TokenType::RParen, "')'")?;
            self.expect(&TokenType::Returning, "'returning'")?;
            let ret = self.parse_english_type()?;
            let id = self.arena_mut().new_node(NodeKind::Function { ret, params, variadic }, start);
            self.arena_mut().set_parent(ret, id);
            self.arena_mut().get_mut(id).ty = prefix;
            return Ok(id);
        }

        if self.matches(&TokenType::AppleBlockWord) {
            self.expect(&TokenType::LParen, "'('")?;
            let (params, _variadic) = self.parse_param_list()?;
            self.expect(&TokenType::RParen, "')'")?;
            self.expect(&TokenType::Returning, "'returning'")?;
            let ret = self.parse_english_type()?;
            let id = self.arena_mut().new_node(NodeKind::AppleBlock { ret, params }, start);
            self.arena_mut().set_parent(ret, id);
            self.arena_mut().get_mut(id).ty = prefix;
            return Ok(id);
        }

        if self.matches(&TokenType::Constructor) {
            self.expect(&TokenType::LParen, "'('")?;
            let (params, _variadic) = self.parse_param_list()?;
            self.expect(&TokenType::RParen, "')'")?;
            let id = self.arena_mut().new_node(NodeKind::Constructor { params }, start);
            self.arena_mut().get_mut(id).ty = prefix;
            return Ok(id);
        }

        if self.matches(&TokenType::Destructor) {
            let id = self.arena_mut().new_node(NodeKind::Destructor, start);
            self.arena_mut().get_mut(id).ty = prefix;
            return Ok(id);
        }

        if self.matches(&TokenType::Conversion) {
            self.expect(&TokenType::Operator, "'operator'")?;
            self.expect(&TokenType::Returning, "'returning'")?;
            let target = self.parse_english_type()?;
            let id = self.arena_mut().new_node(NodeKind::UserConversion { target }, start);
            self.arena_mut().set_parent(target, id);
            self.arena_mut().get_mut(id).ty = prefix;
            return Ok(id);
        }

        if self.matches(&TokenType::Literal) {
            self.expect(&TokenType::LParen, "'('")?;
            let (params, _variadic) = self.parse_param_list()?;
            self.expect(&TokenType::RParen, "')'")?;
            let id = self.arena_mut().new_node(NodeKind::UserLiteral { params }, start);
            self.arena_mut().get_mut(id).ty = prefix;
            return Ok(id);
        }

        let leaf = self.parse_type_specifier()?;
        let leaf_ty = self.arena().get(leaf).ty;
        self.arena_mut().get_mut(leaf).ty = leaf_ty.union(prefix);
        Ok(leaf)
    }

    /// Collects leading storage/attribute words (`friend`, `default`,
    /// `noexcept`, cv-quals, …) and the `non-member` flag that precede a
    /// structural phrase or a base-type leaf. Base bits are left alone —
    /// they belong to the leaf's own type-specifier, not a prefix.
    fn parse_prefix_words(&mut self, start: Span) -> (TypeValue, bool) {
        let mut v = TypeValue::new();
        let mut non_member = false;
        loop {
            if self.matches(&TokenType::NonMember) {
                non_member = true;
                continue;
            }
            if let TokenType::TypeBit(bit) = self.peek().kind.clone() {
                if matches!(bit, Bit::Base(_)) {
                    break;
                }
                self.advance();
                if let Err(AddError::ConflictingSpecifier(conflicting)) = v.add(bit) {
                    self.push_error(self.conflicting_specifier(conflicting, start));
                }
                continue;
            }
            break;
        }
        (v, non_member)
    }

    fn parse_english_array_size(&mut self) -> ArraySize {
        if let TokenType::IntegerLiteral(n) = self.peek().kind {
            self.advance();
            return ArraySize::Integer(n);
        }
        if let TokenType::Identifier(_) = self.peek().kind {
            self.advance();
            return ArraySize::Constant;
        }
        ArraySize::Unknown
    }

    /// Parameter list written in English phrases (`reference to const class
    /// C`) rather than native punctuation — the form operator overloads use.
    fn parse_english_param_list(&mut self) -> ParseResult<(Vec<NodeId>, bool)> {
        let mut params = Vec::new();
        if self.check(&TokenType::RParen) {
            return Ok((params, false));
        }
        loop {
            if self.matches(&TokenType::Variadic) {
                return Ok((params, true));
            }
            params.push(self.parse_english_type()?);
            if !self.matches(&TokenType::Comma) {
                break;
            }
        }
        Ok((params, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::intern::Interner;
    use crate::lexer::{Lexer, LexerMode};
    use crate::registry::AliasRegistry;

    fn parser_for<'a>(
        src: &str,
        dialect: Dialect,
        interner: &'a mut Interner,
        registry: &'a mut AliasRegistry,
    ) -> Parser<'a> {
        let mut lexer = Lexer::new(src, dialect, LexerMode::English);
        let tokens = lexer.tokenize(interner, registry).unwrap();
        Parser::new(tokens, dialect, interner, registry)
    }

    #[test]
    fn array_of_pointer_to_const_int() {
        let mut interner = Interner::new();
        let mut registry = AliasRegistry::new();
        let mut parser = parser_for("array 10 of pointer to const int", Dialect::C99, &mut interner, &mut registry);
        let root = parser.parse_english_type().unwrap();
        let NodeKind::Array { element, size } = parser.arena().get(root).kind.clone() else {
            panic!("expected array root");
        };
        assert_eq!(size, ArraySize::Integer(10));
        assert!(matches!(parser.arena().get(element).kind, NodeKind::Pointer { .. }));
    }

    #[test]
    fn function_taking_native_params_returning_pointer_to_char() {
        let mut interner = Interner::new();
        let mut registry = AliasRegistry::new();
        let mut parser = parser_for(
            "function (int, char const *) returning pointer to char",
            Dialect::Cpp17,
            &mut interner,
            &mut registry,
        );
        let root = parser.parse_english_type().unwrap();
        let NodeKind::Function { ret, params, variadic } = parser.arena().get(root).kind.clone() else {
            panic!("expected function root");
        };
        assert!(!variadic);
        assert_eq!(params.len(), 2);
        assert!(matches!(parser.arena().get(ret).kind, NodeKind::Pointer { .. }));
    }

    #[test]
    fn noexcept_function_returning_int() {
        let mut interner = Interner::new();
        let mut registry = AliasRegistry::new();
        let mut parser = parser_for(
            "noexcept function () returning int",
            Dialect::Cpp11,
            &mut interner,
            &mut registry,
        );
        let root = parser.parse_english_type().unwrap();
        let node = parser.arena().get(root);
        assert!(matches!(node.kind, NodeKind::Function { .. }));
        assert!(node.ty.has(Bit::Storage(crate::typeval::StorageBit::Noexcept)));
    }

    #[test]
    fn non_member_friend_default_equality_operator() {
        let mut interner = Interner::new();
        let mut registry = AliasRegistry::new();
        let mut parser = parser_for(
            "non-member friend default function operator == (reference to const class C, reference to const class C) returning bool",
            Dialect::Cpp20,
            &mut interner,
            &mut registry,
        );
        let root = parser.parse_english_type().unwrap();
        let NodeKind::Operator { op, params, is_member, .. } = parser.arena().get(root).kind.clone() else {
            panic!("expected operator root");
        };
        assert_eq!(op, crate::ast::OperatorId::Eq);
        assert!(!is_member);
        assert_eq!(params.len(), 2);
        assert!(parser.arena().get(root).ty.has(Bit::Storage(crate::typeval::StorageBit::Friend)));
        assert!(parser.arena().get(root).ty.has(Bit::Storage(crate::typeval::StorageBit::Default)));
    }

    #[test]
    fn pointer_to_member_of_class_function_returning_void() {
        let mut interner = Interner::new();
        let mut registry = AliasRegistry::new();
        let mut parser = parser_for(
            "pointer to member of class C function (int) returning void",
            Dialect::Cpp17,
            &mut interner,
            &mut registry,
        );
        let root = parser.parse_english_type().unwrap();
        let NodeKind::PointerToMember { class_name, target } = parser.arena().get(root).kind.clone() else {
            panic!("expected pointer-to-member root");
        };
        assert_eq!(interner.resolve(class_name.local_name()), "C");
        assert!(matches!(parser.arena().get(target).kind, NodeKind::Function { .. }));
    }
}
