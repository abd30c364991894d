//! Native C/C++ declarator rendering (SPEC_FULL §4.8 "Native renderer").
//!
//! Builds inside-out: starting from the root and walking toward the leaf,
//! each declarator layer wraps an accumulating `core` string (the
//! identifier, or nothing for an abstract/cast-target type), adding
//! parentheses whenever its own C precedence is lower than the layer that
//! will wrap it next (a pointer whose target is an array or function). Once
//! the leaf is reached, the base-type words are prepended and the whole
//! thing is returned.

use super::{cv_mask, AlignasStyle, RenderConfig};
use crate::ast::{ArraySize, Node, NodeArena, NodeId, NodeKind};
use crate::dialect::Dialect;
use crate::intern::Interner;
use crate::scope::{ScopeKind, ScopedName, Segment};
use crate::typeval::{AttributeBit, BaseBit, Bit, Form, StorageBit, TypeValue};

/// The four base bits that name an enum/struct/union/class kind, as opposed
/// to the cv-qualifiers that may accompany them on an `Ecsu` node.
fn ecsu_kind_mask() -> TypeValue {
    let mut v = TypeValue::new();
    for b in [BaseBit::Enum, BaseBit::Struct, BaseBit::Union, BaseBit::Class] {
        let _ = v.add(Bit::Base(b));
    }
    v
}

struct Ctx<'a> {
    arena: &'a NodeArena,
    interner: &'a Interner,
    dialect: Dialect,
    config: &'a RenderConfig,
}

pub fn render(arena: &NodeArena, root: NodeId, interner: &Interner, dialect: Dialect, config: &RenderConfig) -> String {
    let ctx = Ctx { arena, interner, dialect, config };
    let name = ctx.arena.get(root).name.as_ref().map(|n| n.full_name(interner)).unwrap_or_default();
    let mut text = ctx.declare(root, name);
    if config.trailing_semicolon {
        text.push(';');
    }
    text
}

/// Renders `root` as an abstract (name-less) type, for cast targets and
/// `alignas(T)` spelling.
pub fn render_anonymous(arena: &NodeArena, root: NodeId, interner: &Interner, dialect: Dialect, config: &RenderConfig) -> String {
    let ctx = Ctx { arena, interner, dialect, config };
    ctx.declare(root, String::new())
}

/// Renders a `typedef`-kind alias definition, wrapping it in its enclosing
/// `namespace`/`class`/`struct`/`union` frames when `name` carries more than
/// one segment (§4.8). A bare (single-segment) name renders with no frame at
/// all, the common case.
pub fn render_scoped_typedef(
    arena: &NodeArena,
    root: NodeId,
    name: &ScopedName,
    interner: &Interner,
    dialect: Dialect,
    config: &RenderConfig,
) -> String {
    let local = interner.resolve(name.local_name());
    let ty = render_anonymous(arena, root, interner, dialect, config);
    let inner = format!("typedef {ty} {local};");
    wrap_scope_frames(name.scope_name(), interner, dialect, inner)
}

/// Builds the scope frames outside-in, from the innermost enclosing segment
/// to the outermost. A maximal all-namespace path under C++17+ coalesces
/// into one `namespace A::B { … }` frame rather than nesting each segment.
fn wrap_scope_frames(segments: &[Segment], interner: &Interner, dialect: Dialect, inner: String) -> String {
    if segments.is_empty() {
        return inner;
    }
    let all_namespaces = segments
        .iter()
        .all(|s| matches!(s.kind, ScopeKind::Namespace | ScopeKind::InlineNamespace));
    if all_namespaces && Dialect::Cpp17.min().contains(dialect) {
        let path = segments.iter().map(|s| interner.resolve(s.name)).collect::<Vec<_>>().join("::");
        return format!("namespace {path} {{ {inner} }}");
    }
    segments.iter().rev().fold(inner, |acc, seg| wrap_scope_frame(*seg, interner, acc))
}

fn wrap_scope_frame(seg: Segment, interner: &Interner, inner: String) -> String {
    let name = interner.resolve(seg.name);
    match seg.kind {
        ScopeKind::Namespace => format!("namespace {name} {{ {inner} }}"),
        ScopeKind::InlineNamespace => format!("inline namespace {name} {{ {inner} }}"),
        ScopeKind::Class => format!("class {name} {{ {inner} }};"),
        ScopeKind::Struct => format!("struct {name} {{ {inner} }};"),
        ScopeKind::Union => format!("union {name} {{ {inner} }};"),
        // The generic file-scope kind carries no frame of its own.
        ScopeKind::Scope => inner,
    }
}

/// True for target kinds whose own native syntax is a postfix operator
/// (`[]`, `(...)`), which binds tighter than a prefix `*`/`&` — the case
/// that forces parentheses around the prefix form.
fn needs_parens_as_target(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Array { .. } | NodeKind::Function { .. } | NodeKind::AppleBlock { .. } | NodeKind::Operator { .. }
    )
}

/// Storage bits that precede the base type on a function-like declaration
/// (`friend`, `static`, `virtual`, `explicit`, `inline`, …) as opposed to
/// ones that trail the parameter list (`const`, `noexcept`, `= default`,
/// ref-qualifiers, …). Grounded on the §8 scenario table (`friend bool
/// operator==(...) = default`, `int f() noexcept`): the split is specific to
/// function-like declarators and deliberately distinct from
/// `TypeValue::name`'s canonical variable-declaration ordering.
fn is_function_prefix_storage(s: StorageBit) -> bool {
    matches!(
        s,
        StorageBit::Friend
            | StorageBit::Typedef
            | StorageBit::Extern
            | StorageBit::ExternC
            | StorageBit::Static
            | StorageBit::AutoStorage
            | StorageBit::Register
            | StorageBit::ThreadLocal
            | StorageBit::Consteval
            | StorageBit::Constexpr
            | StorageBit::Constinit
            | StorageBit::Virtual
            | StorageBit::Explicit
            | StorageBit::Inline
            | StorageBit::Export
    )
}

impl<'a> Ctx<'a> {
    fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    /// Top-level entry: builds the full declaration (base type + declarator
    /// around `core`), prefixed with `alignas`/`_Alignas` if `root` carries
    /// one.
    fn declare(&self, root: NodeId, core: String) -> String {
        let body = self.build(root, core);
        match self.node(root).align {
            Some(spec) => format!("{} {}", self.align_prefix(spec), body),
            None => body,
        }
    }

    fn align_prefix(&self, spec: crate::ast::AlignSpec) -> String {
        let inner = match spec {
            crate::ast::AlignSpec::Integer(n) => n.to_string(),
            crate::ast::AlignSpec::Type(t) => self.declare(t, String::new()),
        };
        match self.config.alignas_style {
            AlignasStyle::Keyword => format!("alignas({inner})"),
            AlignasStyle::Underscore => format!("_Alignas({inner})"),
        }
    }

    /// The recursive inside-out builder. `core` is everything accumulated
    /// so far around the identifier; returns the full text once a leaf (or
    /// a function-like terminal with no spine child) is reached.
    fn build(&self, id: NodeId, core: String) -> String {
        let node = self.node(id);
        match &node.kind {
            NodeKind::Placeholder => core,
            NodeKind::Variadic => "...".to_string(),
            NodeKind::NameOnly => core,
            NodeKind::BuiltIn { bitfield_width } => {
                let core = match bitfield_width {
                    Some(w) => format!("{core} : {w}"),
                    None => core,
                };
                self.with_base_words(node.ty, core)
            }
            NodeKind::Ecsu { underlying } => {
                // C requires the elaborated-type keyword on every reference
                // (`struct Foo`); C++ allows (and idiomatically drops) it once
                // the tag has been declared, so a bare `Foo`/`C` is enough
                // there (cf. scenario row 7's `C const&`, no `class` keyword).
                let kind_mask = ecsu_kind_mask();
                let keyword = if self.dialect.is_c() {
                    node.ty
                        .intersect(kind_mask)
                        .base_bits()
                        .next()
                        .map(|b| format!("{} ", b.native()))
                        .unwrap_or_default()
                } else {
                    String::new()
                };
                let name = node.name.as_ref().map(|n| n.full_name(self.interner)).unwrap_or_default();
                let noun_ty = node.ty.diff(kind_mask);
                let noun = self.qualify_noun(noun_ty, format!("{keyword}{name}"));
                let suffix = match underlying {
                    Some(u) => format!(" : {}", self.build(*u, String::new())),
                    None => String::new(),
                };
                join_base_and_decl(&format!("{noun}{suffix}"), &core)
            }
            NodeKind::TypedefRef { alias_name } => {
                let base = self.qualify_noun(node.ty, alias_name.full_name(self.interner));
                join_base_and_decl(&base, &core)
            }
            NodeKind::Pointer { target } => {
                let wrapped = self.wrap_prefix("*", node.ty, *target, core);
                self.build(*target, wrapped)
            }
            NodeKind::Reference { target } => {
                let wrapped = self.wrap_prefix("&", node.ty, *target, core);
                self.build(*target, wrapped)
            }
            NodeKind::RvalueReference { target } => {
                let wrapped = self.wrap_prefix("&&", node.ty, *target, core);
                self.build(*target, wrapped)
            }
            NodeKind::PointerToMember { class_name, target } => {
                let sigil = format!("{}::*", class_name.full_name(self.interner));
                let wrapped = self.wrap_prefix(&sigil, node.ty, *target, core);
                self.build(*target, wrapped)
            }
            NodeKind::Array { element, size } => {
                let quals = self.leading_qualifier_words(node.ty);
                let size_text = match size {
                    ArraySize::Unknown => String::new(),
                    ArraySize::Integer(n) => n.to_string(),
                    ArraySize::VlaStar => "*".to_string(),
                    ArraySize::Constant => String::new(),
                };
                let new_core = format!("{core}[{quals}{size_text}]");
                self.build(*element, new_core)
            }
            NodeKind::Function { ret, params, variadic } => {
                let (prefix, suffix) = self.function_storage(node.ty);
                let params_text = self.params_text(params, *variadic);
                let new_core = format!("{prefix}{core}({params_text}){suffix}");
                self.build(*ret, new_core)
            }
            NodeKind::AppleBlock { ret, params } => {
                let (prefix, suffix) = self.function_storage(node.ty);
                let params_text = self.params_text(params, false);
                let new_core = format!("{prefix}(^{core})({params_text}){suffix}");
                self.build(*ret, new_core)
            }
            NodeKind::Constructor { params } => {
                let (prefix, suffix) = self.function_storage(node.ty);
                let name = node.name.as_ref().map(|n| n.full_name(self.interner)).unwrap_or_default();
                let params_text = self.params_text(params, false);
                format!("{prefix}{name}({params_text}){suffix}")
            }
            NodeKind::Destructor => {
                let (prefix, suffix) = self.function_storage(node.ty);
                let name = node.name.as_ref().map(|n| n.full_name(self.interner)).unwrap_or_default();
                format!("{prefix}{name}(){suffix}")
            }
            NodeKind::Operator { op, params, ret, is_member } => {
                let (prefix, suffix) = self.function_storage(node.ty);
                let scope = if *is_member {
                    String::new()
                } else {
                    node.name.as_ref().map(|n| format!("{}::", n.full_name(self.interner))).unwrap_or_default()
                };
                let params_text = self.params_text(params, false);
                let new_core = format!("{prefix}{scope}operator{}({params_text}){suffix}", op.token());
                self.build(*ret, new_core)
            }
            NodeKind::UserConversion { target } => {
                let (prefix, suffix) = self.function_storage(node.ty);
                let target_text = self.build(*target, String::new());
                format!("{prefix}operator {target_text}(){suffix}")
            }
            NodeKind::UserLiteral { params } => {
                let suffix_name = node.name.as_ref().map(|n| n.full_name(self.interner)).unwrap_or_default();
                let params_text = self.params_text(params, false);
                format!("operator\"\" {suffix_name}({params_text})")
            }
        }
    }

    /// Wraps the accumulated `core` with a `*`/`&`/`&&`/`Class::*` sigil plus
    /// this node's own qualifiers and calling-convention attribute, then
    /// parenthesises the whole thing if `target`'s own syntax is a
    /// tighter-binding postfix form (`[]`/`()` bind tighter than a prefix
    /// `*`/`&`, so `pointer to array` needs `(*p)[10]`, not `*p[10]`).
    fn wrap_prefix(&self, sigil: &str, ty: TypeValue, target: NodeId, core: String) -> String {
        let quals = self.leading_qualifier_words(ty);
        let cc = ty
            .attribute_bits()
            .find(|a| a.is_calling_convention())
            .map(|a| format!("{} ", a.native()))
            .unwrap_or_default();
        let combined = format!("{cc}{sigil}{quals}{core}");
        if needs_parens_as_target(&self.node(target).kind) {
            format!("({combined})")
        } else {
            combined
        }
    }

    /// Storage/qualifier words that trail a pointer/reference/array sigil
    /// directly (e.g. `*const`), space-separated and itself followed by a
    /// trailing space when non-empty.
    fn leading_qualifier_words(&self, ty: TypeValue) -> String {
        let words: Vec<&str> = ty.storage_bits().map(StorageBit::native).collect();
        if words.is_empty() {
            String::new()
        } else {
            format!(" {} ", words.join(" ")).trim_start().to_string()
        }
    }

    /// Splits a function-like node's own storage bits into the words that
    /// precede its name (and return type) versus the ones that trail its
    /// parameter list.
    fn function_storage(&self, ty: TypeValue) -> (String, String) {
        let mut prefix_words: Vec<&str> = Vec::new();
        let mut suffix_words: Vec<String> = Vec::new();
        for bit in ty.storage_bits() {
            if is_function_prefix_storage(bit) {
                prefix_words.push(StorageBit::native(bit));
            } else {
                suffix_words.push(StorageBit::native(bit).to_string());
            }
        }
        let cc = ty
            .attribute_bits()
            .find(|a| a.is_calling_convention())
            .map(AttributeBit::native);
        let attrs: Vec<&str> = ty.attribute_bits().filter(|a| !a.is_calling_convention()).map(AttributeBit::native).collect();

        let mut prefix = String::new();
        if !attrs.is_empty() {
            prefix.push_str(&format!("[[{}]] ", attrs.join(", ")));
        }
        if !prefix_words.is_empty() {
            prefix.push_str(&prefix_words.join(" "));
            prefix.push(' ');
        }
        if let Some(cc) = cc {
            prefix.push_str(cc);
            prefix.push(' ');
        }

        let suffix = if suffix_words.is_empty() {
            String::new()
        } else {
            format!(" {}", suffix_words.join(" "))
        };
        (prefix, suffix)
    }

    /// Places `noun`'s cv-qualifiers around it per `east_const`, with any
    /// other storage words (rare on an `Ecsu` reference, but not dropped)
    /// kept immediately before the noun. Unlike `with_base_words`, there is
    /// no base-type word to fold the qualifiers into — `noun` already *is*
    /// the whole declared-type name.
    fn qualify_noun(&self, ty: TypeValue, noun: String) -> String {
        let mask = cv_mask();
        let cv = ty.intersect(mask).name(Form::Native);
        let other: Vec<&str> = ty.diff(mask).storage_bits().map(StorageBit::native).collect();
        let with_other = if other.is_empty() { noun } else { format!("{} {noun}", other.join(" ")) };
        if cv.is_empty() {
            with_other
        } else if self.config.east_const {
            format!("{with_other} {cv}")
        } else {
            format!("{cv} {with_other}")
        }
    }

    fn with_base_words(&self, ty: TypeValue, core: String) -> String {
        let mask = cv_mask();
        let base = if self.config.east_const {
            let quals = ty.intersect(mask).name(Form::Native);
            let rest = ty.diff(mask).name(Form::Native);
            if quals.is_empty() {
                rest
            } else if rest.is_empty() {
                quals
            } else {
                format!("{rest} {quals}")
            }
        } else {
            ty.name(Form::Native)
        };
        join_base_and_decl(&base, &core)
    }

    fn params_text(&self, params: &[NodeId], variadic: bool) -> String {
        let mut parts: Vec<String> = params
            .iter()
            .map(|&p| {
                let name = self.node(p).name.as_ref().map(|n| n.full_name(self.interner)).unwrap_or_default();
                self.build(p, name)
            })
            .collect();
        if variadic {
            parts.push("...".to_string());
        }
        parts.join(", ")
    }
}

/// Joins a base-type (or noun) string with the declarator text wrapped
/// around it. No space before `&`/`&&` — this corpus writes reference
/// declarators flush against the type (`C const&`), unlike pointers
/// (`char *foo`), matching the scenario table's own spacing exactly.
fn join_base_and_decl(base: &str, decl: &str) -> String {
    if decl.is_empty() {
        base.to_string()
    } else if decl.starts_with('&') {
        format!("{base}{decl}")
    } else {
        format!("{base} {decl}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ArraySize, NodeArena, NodeKind};
    use crate::error::Span;
    use crate::intern::Interner;
    use crate::scope::ScopedName;
    use crate::typeval::{BaseBit, Bit, StorageBit};

    fn sp() -> Span {
        Span::new(0, 1)
    }

    fn const_int(arena: &mut NodeArena) -> NodeId {
        let leaf = arena.new_node(NodeKind::BuiltIn { bitfield_width: None }, sp());
        let mut ty = TypeValue::new();
        ty.add(Bit::Base(BaseBit::Int)).unwrap();
        ty.add(Bit::Storage(StorageBit::Const)).unwrap();
        arena.get_mut(leaf).ty = ty;
        leaf
    }

    #[test]
    fn pointer_to_array_of_const_int_needs_parens() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let leaf = const_int(&mut arena);
        let array = arena.new_node(NodeKind::Array { element: leaf, size: ArraySize::Integer(10) }, sp());
        arena.set_parent(leaf, array);
        let ptr = arena.new_node(NodeKind::Pointer { target: array }, sp());
        arena.set_parent(array, ptr);
        arena.get_mut(ptr).name = Some(ScopedName::local(interner.intern("p")));
        let text = render(&arena, ptr, &interner, Dialect::C99, &RenderConfig::default());
        assert_eq!(text, "int const (*p)[10]");
    }

    #[test]
    fn array_of_pointer_needs_no_parens() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let leaf = const_int(&mut arena);
        let ptr = arena.new_node(NodeKind::Pointer { target: leaf }, sp());
        arena.set_parent(leaf, ptr);
        let array = arena.new_node(NodeKind::Array { element: ptr, size: ArraySize::Integer(10) }, sp());
        arena.set_parent(ptr, array);
        arena.get_mut(array).name = Some(ScopedName::local(interner.intern("p")));
        let text = render(&arena, array, &interner, Dialect::C99, &RenderConfig::default());
        assert_eq!(text, "int const *p[10]");
    }

    #[test]
    fn function_returning_pointer_to_char() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let ret_leaf = arena.new_node(NodeKind::BuiltIn { bitfield_width: None }, sp());
        let mut char_ty = TypeValue::new();
        char_ty.add(Bit::Base(BaseBit::Char)).unwrap();
        arena.get_mut(ret_leaf).ty = char_ty;
        let ret_ptr = arena.new_node(NodeKind::Pointer { target: ret_leaf }, sp());
        arena.set_parent(ret_leaf, ret_ptr);

        let p1 = arena.new_node(NodeKind::BuiltIn { bitfield_width: None }, sp());
        let mut int_ty = TypeValue::new();
        int_ty.add(Bit::Base(BaseBit::Int)).unwrap();
        arena.get_mut(p1).ty = int_ty;

        let p2 = const_int(&mut arena);

        let func = arena.new_node(
            NodeKind::Function {
                ret: ret_ptr,
                params: vec![p1, p2],
                variadic: false,
            },
            sp(),
        );
        arena.set_parent(ret_ptr, func);
        arena.get_mut(func).name = Some(ScopedName::local(interner.intern("foo")));
        let text = render(&arena, func, &interner, Dialect::Cpp17, &RenderConfig::default());
        assert!(text.starts_with("char *foo("));
    }

    #[test]
    fn noexcept_function_renders_trailing() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let ret = arena.new_node(NodeKind::BuiltIn { bitfield_width: None }, sp());
        let mut ty = TypeValue::new();
        ty.add(Bit::Base(BaseBit::Int)).unwrap();
        arena.get_mut(ret).ty = ty;
        let func = arena.new_node(
            NodeKind::Function {
                ret,
                params: vec![],
                variadic: false,
            },
            sp(),
        );
        arena.set_parent(ret, func);
        arena.get_mut(func).ty.add(Bit::Storage(StorageBit::Noexcept)).unwrap();
        arena.get_mut(func).name = Some(ScopedName::local(interner.intern("f")));
        let text = render(&arena, func, &interner, Dialect::Cpp11, &RenderConfig::default());
        assert_eq!(text, "int f() noexcept");
    }

    #[test]
    fn disabling_east_const_moves_qualifier_before_base() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let leaf = const_int(&mut arena);
        arena.get_mut(leaf).name = Some(ScopedName::local(interner.intern("x")));
        let config = RenderConfig {
            east_const: false,
            ..RenderConfig::default()
        };
        let text = render(&arena, leaf, &interner, Dialect::C99, &config);
        assert_eq!(text, "const int x");
    }

    #[test]
    fn east_const_is_the_default() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let leaf = const_int(&mut arena);
        arena.get_mut(leaf).name = Some(ScopedName::local(interner.intern("x")));
        let text = render(&arena, leaf, &interner, Dialect::C99, &RenderConfig::default());
        assert_eq!(text, "int const x");
    }

    fn void_node(arena: &mut NodeArena) -> NodeId {
        let id = arena.new_node(NodeKind::BuiltIn { bitfield_width: None }, sp());
        arena.get_mut(id).ty.add(Bit::Base(BaseBit::Void)).unwrap();
        id
    }

    #[test]
    fn bare_alias_name_renders_without_any_scope_frame() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let root = void_node(&mut arena);
        let name = ScopedName::local(interner.intern("v"));
        let text = render_scoped_typedef(&arena, root, &name, &interner, Dialect::Cpp17, &RenderConfig::default());
        assert_eq!(text, "typedef void v;");
    }

    #[test]
    fn namespace_scoped_alias_wraps_in_a_namespace_frame() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let root = void_node(&mut arena);
        let name = ScopedName::from_segments(vec![
            Segment { name: interner.intern("N"), kind: ScopeKind::Namespace },
            Segment { name: interner.intern("v"), kind: ScopeKind::Scope },
        ]);
        let text = render_scoped_typedef(&arena, root, &name, &interner, Dialect::Cpp17, &RenderConfig::default());
        assert_eq!(text, "namespace N { typedef void v; }");
    }

    #[test]
    fn class_scoped_alias_wraps_in_a_struct_frame_with_a_trailing_semicolon() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let root = void_node(&mut arena);
        let name = ScopedName::from_segments(vec![
            Segment { name: interner.intern("S"), kind: ScopeKind::Struct },
            Segment { name: interner.intern("v"), kind: ScopeKind::Scope },
        ]);
        let text = render_scoped_typedef(&arena, root, &name, &interner, Dialect::Cpp17, &RenderConfig::default());
        assert_eq!(text, "struct S { typedef void v; };");
    }

    #[test]
    fn nested_namespace_segments_coalesce_under_cpp17() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let root = void_node(&mut arena);
        let name = ScopedName::from_segments(vec![
            Segment { name: interner.intern("A"), kind: ScopeKind::Namespace },
            Segment { name: interner.intern("B"), kind: ScopeKind::Namespace },
            Segment { name: interner.intern("v"), kind: ScopeKind::Scope },
        ]);
        let text = render_scoped_typedef(&arena, root, &name, &interner, Dialect::Cpp17, &RenderConfig::default());
        assert_eq!(text, "namespace A::B { typedef void v; }");
    }

    #[test]
    fn nested_namespace_segments_do_not_coalesce_before_cpp17() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let root = void_node(&mut arena);
        let name = ScopedName::from_segments(vec![
            Segment { name: interner.intern("A"), kind: ScopeKind::Namespace },
            Segment { name: interner.intern("B"), kind: ScopeKind::Namespace },
            Segment { name: interner.intern("v"), kind: ScopeKind::Scope },
        ]);
        let text = render_scoped_typedef(&arena, root, &name, &interner, Dialect::Cpp11, &RenderConfig::default());
        assert_eq!(text, "namespace A { namespace B { typedef void v; } }");
    }

    #[test]
    fn a_class_nested_in_a_namespace_wraps_both_frames_outside_in() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let root = void_node(&mut arena);
        let name = ScopedName::from_segments(vec![
            Segment { name: interner.intern("N"), kind: ScopeKind::Namespace },
            Segment { name: interner.intern("C"), kind: ScopeKind::Class },
            Segment { name: interner.intern("v"), kind: ScopeKind::Scope },
        ]);
        let text = render_scoped_typedef(&arena, root, &name, &interner, Dialect::Cpp17, &RenderConfig::default());
        assert_eq!(text, "namespace N { class C { typedef void v; }; }");
    }
}
