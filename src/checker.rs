//! Semantic checker (SPEC_FULL §4.7).
//!
//! Grounded on the teacher's `src/kernel/type_checker.rs`: one match per term
//! shape, each arm delegating to a small focused helper rather than one giant
//! function. The error pass aborts a tree at its first error (`?` all the
//! way down); the warning pass never short-circuits and walks the whole tree
//! regardless of what the error pass found.

use crate::ast::{AlignSpec, ArraySize, Node, NodeArena, NodeId, NodeKind, OperatorId};
use crate::dialect::{Dialect, DialectSet};
use crate::error::{Diagnostic, Diagnostics, Kind, Span};
use crate::intern::Interner;
use crate::registry::AliasRegistry;
use crate::scope::ScopeKind;
use crate::token::CastKind;
use crate::typeval::{AttributeBit, BaseBit, Bit, StorageBit, TypeValue};

/// What the tree under check is *for* — a handful of rules (void allowance,
/// cast-target storage restrictions) depend on this rather than on shape
/// alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Declaration,
    Cast(CastKind),
    /// Checking the right-hand side of a `define`/`typedef`/`using`: the
    /// root names a *type*, not a variable of one, so `void` is as legal at
    /// the root here as it is as a cast target (§8 "typedef of void").
    Alias,
}

/// Why the node currently being visited is reachable from the root — carried
/// down the recursion so kind-agnostic rules (void allowance, CV-on-
/// reference, array-element restrictions) can consult *position* as well as
/// *shape*.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Root,
    PointerTarget,
    ReferenceTarget,
    ArrayElement,
    FunctionReturn { params_empty: bool },
    Param,
    AlignType,
    /// Anywhere else a spine continues (e.g. an enum's underlying type) that
    /// carries none of the above rules' special treatment.
    Plain,
}

const MEMBER_ONLY: [StorageBit; 6] = [
    StorageBit::Virtual,
    StorageBit::Override,
    StorageBit::Final,
    StorageBit::PureVirtual,
    StorageBit::Mutable,
    StorageBit::Explicit,
];

const FREE_ONLY: [StorageBit; 2] = [StorageBit::Extern, StorageBit::Static];

/// Runs the full rule set over one declarator tree, producing both the
/// error pass (first failure wins) and the warning pass (exhaustive).
pub fn check(
    arena: &NodeArena,
    root: NodeId,
    dialect: Dialect,
    purpose: Purpose,
    interner: &Interner,
    registry: &AliasRegistry,
) -> Diagnostics {
    let mut diags = Diagnostics::new();
    if let Err(d) = check_tree(arena, root, dialect, purpose, interner, registry, Role::Root, false) {
        diags.push_error(d);
    }
    collect_warnings(arena, root, dialect, interner, registry, &mut diags);
    diags
}

fn is_function_like(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Function { .. }
            | NodeKind::AppleBlock { .. }
            | NodeKind::Constructor { .. }
            | NodeKind::Destructor
            | NodeKind::Operator { .. }
            | NodeKind::UserConversion { .. }
            | NodeKind::UserLiteral { .. }
    )
}

fn is_class_like(node: &Node) -> bool {
    matches!(node.kind, NodeKind::Ecsu { .. })
        && (node.ty.has(Bit::Base(BaseBit::Class))
            || node.ty.has(Bit::Base(BaseBit::Struct))
            || node.ty.has(Bit::Base(BaseBit::Union)))
}

/// True if `node` is `void`, following a `TypedefRef` chain through the
/// registry when needed — an alias of `void` is `void` (§8 boundary
/// behaviour). Bounded to guard against a pathological alias cycle; the
/// registry's own `define` rejects most such cycles before they can land
/// here, so this is a backstop, not the primary defence.
fn is_void(node: &Node, registry: &AliasRegistry, interner: &Interner) -> bool {
    if matches!(node.kind, NodeKind::BuiltIn { .. }) && node.ty.base_bits().eq([BaseBit::Void]) {
        return true;
    }
    let NodeKind::TypedefRef { alias_name } = &node.kind else {
        return false;
    };
    let mut key = interner.resolve(alias_name.local_name()).to_string();
    for _ in 0..64 {
        let Some((arena, id)) = registry.untypedef(&key) else {
            return false;
        };
        let resolved = arena.get(id);
        if matches!(resolved.kind, NodeKind::BuiltIn { .. }) && resolved.ty.base_bits().eq([BaseBit::Void]) {
            return true;
        }
        match &resolved.kind {
            NodeKind::TypedefRef { alias_name } => key = interner.resolve(alias_name.local_name()).to_string(),
            _ => return false,
        }
    }
    false
}

fn structural(span: Span, message: impl Into<String>) -> Diagnostic {
    Diagnostic::error(Kind::KindStructural, span, message)
}

fn naming(span: Span, message: impl Into<String>) -> Diagnostic {
    Diagnostic::error(Kind::Naming, span, message)
}

/// The single recursive walk. Runs every shape-independent rule against
/// `id`, then recurses into whatever children the node's kind has, threading
/// the right `Role` into each.
#[allow(clippy::too_many_arguments)]
fn check_tree(
    arena: &NodeArena,
    id: NodeId,
    dialect: Dialect,
    purpose: Purpose,
    interner: &Interner,
    registry: &AliasRegistry,
    role: Role,
    in_function_params: bool,
) -> Result<(), Diagnostic> {
    let node = arena.get(id);

    check_alignment(arena, node, dialect, purpose, interner, registry)?;
    check_void(node, role, purpose, registry, interner)?;
    check_pointer_reference(arena, node, registry, interner)?;
    check_calling_convention(arena, node)?;
    check_builtin(node, dialect)?;
    check_type_combination(node, dialect)?;
    check_return_type(node, role, dialect)?;
    if matches!(role, Role::Root) {
        check_cast(arena, node, purpose, registry, interner)?;
    }
    check_function_like(arena, node, dialect, interner, registry)?;
    check_user_conversion(arena, node)?;
    check_user_literal(node)?;
    check_scope(node)?;

    match &node.kind {
        NodeKind::Array { element, size } => {
            check_array(arena, node, *size, *element, dialect, in_function_params, registry, interner)?;
            check_tree(arena, *element, dialect, purpose, interner, registry, Role::ArrayElement, in_function_params)?;
        }
        NodeKind::Pointer { target } => {
            check_tree(arena, *target, dialect, purpose, interner, registry, Role::PointerTarget, in_function_params)?;
        }
        NodeKind::Reference { target } | NodeKind::RvalueReference { target } => {
            check_tree(arena, *target, dialect, purpose, interner, registry, Role::ReferenceTarget, in_function_params)?;
        }
        NodeKind::PointerToMember { target, .. } => {
            check_tree(arena, *target, dialect, purpose, interner, registry, Role::PointerTarget, in_function_params)?;
        }
        NodeKind::UserConversion { target } => {
            check_tree(arena, *target, dialect, purpose, interner, registry, Role::Plain, in_function_params)?;
        }
        NodeKind::Ecsu { underlying: Some(u) } => {
            check_tree(arena, *u, dialect, purpose, interner, registry, Role::Plain, in_function_params)?;
        }
        NodeKind::Function { ret, params, .. } | NodeKind::AppleBlock { ret, params } => {
            check_tree(
                arena,
                *ret,
                dialect,
                purpose,
                interner,
                registry,
                Role::FunctionReturn { params_empty: params.is_empty() },
                in_function_params,
            )?;
            check_param_list(arena, params, dialect, registry, interner)?;
            for &p in params {
                check_tree(arena, p, dialect, purpose, interner, registry, Role::Param, true)?;
            }
        }
        NodeKind::Operator { ret, params, .. } => {
            check_tree(
                arena,
                *ret,
                dialect,
                purpose,
                interner,
                registry,
                Role::FunctionReturn { params_empty: params.is_empty() },
                in_function_params,
            )?;
            check_param_list(arena, params, dialect, registry, interner)?;
            for &p in params {
                check_tree(arena, p, dialect, purpose, interner, registry, Role::Param, true)?;
            }
        }
        NodeKind::Constructor { params } | NodeKind::UserLiteral { params } => {
            check_param_list(arena, params, dialect, registry, interner)?;
            for &p in params {
                check_tree(arena, p, dialect, purpose, interner, registry, Role::Param, true)?;
            }
        }
        _ => {}
    }

    Ok(())
}

/// Rule family 1 — alignment (`alignas`).
fn check_alignment(
    arena: &NodeArena,
    node: &Node,
    dialect: Dialect,
    purpose: Purpose,
    interner: &Interner,
    registry: &AliasRegistry,
) -> Result<(), Diagnostic> {
    let Some(align) = node.align else { return Ok(()) };
    if node.ty.has(Bit::Storage(StorageBit::Typedef)) {
        return Err(structural(node.span, "'alignas' cannot annotate a type alias, only the type it names"));
    }
    if node.ty.has(Bit::Storage(StorageBit::Register)) {
        return Err(structural(node.span, "'alignas' cannot combine with 'register'"));
    }
    match align {
        AlignSpec::Integer(n) => {
            if n == 0 || (n & (n - 1)) != 0 {
                return Err(structural(node.span, "'alignas' requires a nonzero power of two"));
            }
        }
        AlignSpec::Type(target) => {
            check_tree(arena, target, dialect, purpose, interner, registry, Role::AlignType, false)?;
        }
    }
    Ok(())
}

/// Rule family — `void`'s four legal positions (§3.2 "void placement").
fn check_void(node: &Node, role: Role, purpose: Purpose, registry: &AliasRegistry, interner: &Interner) -> Result<(), Diagnostic> {
    if !is_void(node, registry, interner) {
        return Ok(());
    }
    let allowed = match role {
        Role::Root => matches!(purpose, Purpose::Cast(_) | Purpose::Alias),
        Role::FunctionReturn { params_empty } => params_empty,
        Role::PointerTarget => true,
        _ => false,
    };
    if !allowed {
        return Err(structural(node.span, "'void' is not permitted here").with_hint(
            "void is only legal as a zero-parameter function's return type, a cast target, or pointed to",
        ));
    }
    Ok(())
}

/// Rule family 7 — pointer/reference shape restrictions.
fn check_pointer_reference(arena: &NodeArena, node: &Node, registry: &AliasRegistry, interner: &Interner) -> Result<(), Diagnostic> {
    match &node.kind {
        NodeKind::Pointer { target } => {
            let t = arena.get(*target);
            if matches!(t.kind, NodeKind::Reference { .. } | NodeKind::RvalueReference { .. }) {
                return Err(
                    structural(node.span, "a pointer cannot target a reference").with_hint("reference-to-pointer instead")
                );
            }
            if t.ty.has(Bit::Storage(StorageBit::Register)) {
                return Err(structural(node.span, "a pointer cannot target a 'register' object"));
            }
        }
        NodeKind::Reference { .. } | NodeKind::RvalueReference { .. } => {
            if node.ty.has(Bit::Storage(StorageBit::Const)) || node.ty.has(Bit::Storage(StorageBit::Volatile)) {
                return Err(structural(node.span, "a reference cannot itself be cv-qualified")
                    .with_hint("the qualifier belongs on the referenced type"));
            }
            let target_id = match &node.kind {
                NodeKind::Reference { target } | NodeKind::RvalueReference { target } => *target,
                _ => unreachable!(),
            };
            let t = arena.get(target_id);
            if is_void(t, registry, interner) {
                return Err(structural(node.span, "a reference cannot target 'void'"));
            }
            if matches!(t.kind, NodeKind::Reference { .. } | NodeKind::RvalueReference { .. }) {
                return Err(structural(node.span, "a reference cannot target another reference"));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Calling-convention attributes are only meaningful on a function or a
/// pointer to one.
fn check_calling_convention(arena: &NodeArena, node: &Node) -> Result<(), Diagnostic> {
    if !node.ty.attribute_bits().any(|a| a.is_calling_convention()) {
        return Ok(());
    }
    let ok = is_function_like(&node.kind)
        || matches!(&node.kind, NodeKind::Pointer { target } if matches!(arena.get(*target).kind, NodeKind::Function { .. }));
    if !ok {
        return Err(structural(
            node.span,
            "a calling-convention attribute is only valid on a function or a pointer to one",
        ));
    }
    Ok(())
}

/// True if `ty` carries no `int` bit and no other noun either — only (any
/// subset of) `signed`/`unsigned`/`short`/`long`/`long long`, which default
/// to `int` when nothing else names a base type. Deliberately not
/// `TypeValue::has_only_modifiers`: that helper treats a bare `int` bit
/// itself as "just a modifier" (it exists to drive English-form rendering,
/// not this distinction), so using it here would flag an explicit `int` as
/// implicit too.
fn implicit_int(ty: TypeValue) -> bool {
    if ty.has(Bit::Base(BaseBit::Int)) {
        return false;
    }
    !ty.base_bits().any(|b| {
        !matches!(
            b,
            BaseBit::Signed | BaseBit::Unsigned | BaseBit::Short | BaseBit::Long | BaseBit::LongLong
        )
    })
}

/// Rule family — the type algebra's per-bit and per-bit-pair dialect legality
/// table (§4.2 `check`), e.g. `signed bool` or a bit not available until a
/// later dialect.
fn check_type_combination(node: &Node, dialect: Dialect) -> Result<(), Diagnostic> {
    let allowed = node.ty.check(dialect);
    if allowed.contains(dialect) {
        return Ok(());
    }
    Err(Diagnostic::error(
        Kind::TypeCombination { would_be_legal_in: allowed },
        node.span,
        "this combination of type specifiers is not legal together",
    ))
}

/// Rule family 3 — built-in type composition.
fn check_builtin(node: &Node, dialect: Dialect) -> Result<(), Diagnostic> {
    if let NodeKind::BuiltIn { bitfield_width } = &node.kind {
        if implicit_int(node.ty) && (Dialect::C99.min().contains(dialect) || dialect.is_cpp()) {
            return Err(Diagnostic::error(
                Kind::DialectFeature { feature: "implicit int".into(), needs: DialectSet::NONE },
                node.span,
                "an 'int' base type must be written out explicitly here",
            ));
        }
        if bitfield_width.is_some() {
            if let Some(name) = &node.name {
                if name.segments().len() > 1 {
                    return Err(structural(node.span, "a bit-field cannot carry a scoped name"));
                }
            }
            if node.ty.storage_bits().next().is_some() {
                return Err(structural(node.span, "a bit-field cannot carry a storage class"));
            }
        }
    }
    if node.ty.has(Bit::Storage(StorageBit::Inline))
        && !is_function_like(&node.kind)
        && !Dialect::Cpp17.min().contains(dialect)
    {
        return Err(Diagnostic::dialect_feature(node.span, "inline variable", Dialect::Cpp17.min(), dialect));
    }
    Ok(())
}

/// Rule family 8 — a function's return type.
fn check_return_type(node: &Node, role: Role, dialect: Dialect) -> Result<(), Diagnostic> {
    if let Role::FunctionReturn { .. } = role {
        match &node.kind {
            NodeKind::Array { .. } => {
                return Err(structural(node.span, "a function cannot return an array")
                    .with_hint("return a pointer to the array instead"))
            }
            NodeKind::Function { .. } | NodeKind::AppleBlock { .. } => {
                return Err(structural(node.span, "a function cannot return a function")
                    .with_hint("return a pointer to the function instead"))
            }
            _ => {}
        }
        if node.ty.has(Bit::Base(BaseBit::AutoPlaceholder)) && !Dialect::Cpp14.min().contains(dialect) {
            return Err(Diagnostic::dialect_feature(node.span, "'auto' return type", Dialect::Cpp14.min(), dialect));
        }
    }
    if node.ty.has(Bit::Storage(StorageBit::Explicit))
        && !matches!(node.kind, NodeKind::Constructor { .. } | NodeKind::UserConversion { .. })
    {
        return Err(structural(node.span, "'explicit' is only valid on a constructor or conversion operator"));
    }
    Ok(())
}

/// Rule family 4 — cast target compatible with the flavour of cast.
fn check_cast(arena: &NodeArena, node: &Node, purpose: Purpose, registry: &AliasRegistry, interner: &Interner) -> Result<(), Diagnostic> {
    let Purpose::Cast(kind) = purpose else { return Ok(()) };
    let storage_class = [
        StorageBit::AutoStorage,
        StorageBit::Extern,
        StorageBit::ExternC,
        StorageBit::Register,
        StorageBit::Static,
        StorageBit::ThreadLocal,
        StorageBit::Typedef,
        StorageBit::Mutable,
    ];
    if storage_class.iter().any(|b| node.ty.has(Bit::Storage(*b))) {
        return Err(structural(node.span, "a cast target cannot carry a storage class"));
    }
    match kind {
        CastKind::Const => {
            if !matches!(
                node.kind,
                NodeKind::Pointer { .. } | NodeKind::Reference { .. } | NodeKind::RvalueReference { .. } | NodeKind::PointerToMember { .. }
            ) {
                return Err(structural(node.span, "'const_cast' may only target a pointer, reference, or pointer-to-member"));
            }
        }
        CastKind::Dynamic => {
            let target = match &node.kind {
                NodeKind::Pointer { target } | NodeKind::Reference { target } => Some(arena.get(*target)),
                _ => None,
            };
            if !target.is_some_and(is_class_like) {
                return Err(structural(node.span, "'dynamic_cast' may only target a pointer or reference to class/struct/union"));
            }
        }
        CastKind::Reinterpret => {
            if is_void(node, registry, interner) {
                return Err(structural(node.span, "'reinterpret_cast' cannot target 'void'"));
            }
        }
        CastKind::Static | CastKind::CStyle => {}
    }
    Ok(())
}

/// Rule family 9 — user-defined conversion operators.
fn check_user_conversion(arena: &NodeArena, node: &Node) -> Result<(), Diagnostic> {
    if let NodeKind::UserConversion { target } = &node.kind {
        let allowed = [
            StorageBit::Explicit,
            StorageBit::Const,
            StorageBit::Constexpr,
            StorageBit::Consteval,
            StorageBit::Noexcept,
            StorageBit::Throw,
            StorageBit::Friend,
            StorageBit::Virtual,
            StorageBit::Override,
            StorageBit::Final,
            StorageBit::Default,
            StorageBit::Delete,
            StorageBit::Inline,
            StorageBit::RefQualifier,
            StorageBit::RvalueRefQualifier,
        ];
        for s in node.ty.storage_bits() {
            if !allowed.contains(&s) {
                return Err(structural(
                    node.span,
                    format!("'{}' is not allowed on a user-defined conversion operator", s.native()),
                ));
            }
        }
        if matches!(arena.get(*target).kind, NodeKind::Array { .. }) {
            return Err(structural(node.span, "a user-defined conversion cannot convert to an array")
                .with_hint("convert to a pointer-to-array instead"));
        }
    }
    Ok(())
}

/// Rule family 10 — user-defined literal operator parameter shapes.
fn check_user_literal(node: &Node) -> Result<(), Diagnostic> {
    if let NodeKind::UserLiteral { params } = &node.kind {
        if params.is_empty() || params.len() > 2 {
            return Err(structural(
                node.span,
                "a user-defined literal operator takes one raw-literal parameter or a (pointer, length) pair",
            ));
        }
    }
    Ok(())
}

/// Rule family 11 — scope nesting and member/enclosing-name collisions.
fn check_scope(node: &Node) -> Result<(), Diagnostic> {
    let Some(name) = &node.name else { return Ok(()) };
    if let Err(e) = name.check() {
        return Err(naming(
            node.span,
            format!("a {} cannot nest inside a {}", e.inner.keyword(), e.outer.keyword()),
        ));
    }
    let is_ctor = matches!(node.kind, NodeKind::Constructor { .. }) || matches!(node.kind, NodeKind::Destructor);
    if !is_ctor && name.member_shadows_enclosing_type() {
        return Err(naming(node.span, "a member cannot share the name of its immediately enclosing type"));
    }
    Ok(())
}

/// Rule family 5 — function-like shapes: `main`, ref-qualifiers,
/// member-vs-free storage, `=default`/`=delete`, postfix `++`/`--`,
/// constructor/destructor whitelists, and the special `operator` return
/// types.
fn check_function_like(arena: &NodeArena, node: &Node, dialect: Dialect, interner: &Interner, registry: &AliasRegistry) -> Result<(), Diagnostic> {
    match &node.kind {
        NodeKind::Function { ret, params, .. } => {
            check_main_signature(arena, node, *ret, params, dialect, interner, registry)?;
            check_ref_qualifier(node, dialect)?;
            check_member_vs_free(node)?;
            check_default_delete(node)?;
        }
        NodeKind::Operator { op, params, ret, .. } => {
            check_ref_qualifier(node, dialect)?;
            check_member_vs_free(node)?;
            check_default_delete(node)?;
            check_postfix_inc_dec(arena, *op, params)?;
            check_operator_return(arena, *op, *ret, registry, interner)?;
        }
        NodeKind::Constructor { .. } => {
            check_ctor_dtor_whitelist(node, true)?;
            check_default_delete(node)?;
        }
        NodeKind::Destructor => {
            check_ctor_dtor_whitelist(node, false)?;
            check_default_delete(node)?;
        }
        _ => {}
    }
    Ok(())
}

fn looks_like_member(node: &Node) -> bool {
    if MEMBER_ONLY.iter().any(|b| node.ty.has(Bit::Storage(*b))) {
        return true;
    }
    if let Some(name) = &node.name {
        let segs = name.segments();
        if segs.len() >= 2 {
            let enclosing = segs[segs.len() - 2].kind;
            return matches!(enclosing, ScopeKind::Class | ScopeKind::Struct | ScopeKind::Union);
        }
    }
    false
}

fn is_plain_int(arena: &NodeArena, id: NodeId) -> bool {
    let n = arena.get(id);
    matches!(n.kind, NodeKind::BuiltIn { .. }) && n.ty.base_bits().eq([BaseBit::Int])
}

fn is_char_double_pointer(arena: &NodeArena, id: NodeId) -> bool {
    let n = arena.get(id);
    let NodeKind::Pointer { target: t1 } = &n.kind else { return false };
    let n1 = arena.get(*t1);
    let NodeKind::Pointer { target: t2 } = &n1.kind else { return false };
    let n2 = arena.get(*t2);
    matches!(n2.kind, NodeKind::BuiltIn { .. }) && n2.ty.has(Bit::Base(BaseBit::Char))
}

fn check_main_signature(
    arena: &NodeArena,
    node: &Node,
    ret: NodeId,
    params: &[NodeId],
    dialect: Dialect,
    interner: &Interner,
    registry: &AliasRegistry,
) -> Result<(), Diagnostic> {
    let Some(name) = &node.name else { return Ok(()) };
    if interner.resolve(name.local_name()) != "main" {
        return Ok(());
    }
    if dialect.is_cpp() && looks_like_member(node) {
        return Ok(());
    }
    if !is_plain_int(arena, ret) {
        return Err(structural(node.span, "'main' must return 'int'"));
    }
    let shape_ok = match params.len() {
        0 => true,
        1 => is_void(arena.get(params[0]), registry, interner),
        2 => is_plain_int(arena, params[0]) && is_char_double_pointer(arena, params[1]),
        3 => {
            is_plain_int(arena, params[0])
                && is_char_double_pointer(arena, params[1])
                && is_char_double_pointer(arena, params[2])
        }
        _ => false,
    };
    if !shape_ok {
        return Err(structural(
            node.span,
            "'main' must take (), (void), (int, char **), or (int, char **, char **)",
        ));
    }
    Ok(())
}

fn check_ref_qualifier(node: &Node, dialect: Dialect) -> Result<(), Diagnostic> {
    let has_ref_qual =
        node.ty.has(Bit::Storage(StorageBit::RefQualifier)) || node.ty.has(Bit::Storage(StorageBit::RvalueRefQualifier));
    if !has_ref_qual {
        return Ok(());
    }
    if !Dialect::Cpp11.min().contains(dialect) {
        return Err(Diagnostic::dialect_feature(node.span, "a ref-qualified member function", Dialect::Cpp11.min(), dialect));
    }
    if FREE_ONLY.iter().any(|b| node.ty.has(Bit::Storage(*b))) {
        return Err(structural(node.span, "a ref-qualified function cannot also be 'extern' or 'static'"));
    }
    Ok(())
}

fn check_member_vs_free(node: &Node) -> Result<(), Diagnostic> {
    let has_member_only = MEMBER_ONLY.iter().any(|b| node.ty.has(Bit::Storage(*b)));
    let has_free_only = FREE_ONLY.iter().any(|b| node.ty.has(Bit::Storage(*b)));
    if has_member_only && has_free_only {
        return Err(structural(node.span, "a member-only specifier cannot combine with 'extern' or 'static'"));
    }
    Ok(())
}

fn check_default_delete(node: &Node) -> Result<(), Diagnostic> {
    let has_dd = node.ty.has(Bit::Storage(StorageBit::Default)) || node.ty.has(Bit::Storage(StorageBit::Delete));
    if !has_dd {
        return Ok(());
    }
    let allowed = match &node.kind {
        NodeKind::Constructor { .. } | NodeKind::Destructor | NodeKind::UserConversion { .. } => true,
        // Copy/move assignment can only be defaulted as a member; the C++20
        // comparison family (`==`, `!=`, `<=>`, …) may be defaulted either
        // as a member or as a non-member `friend`.
        NodeKind::Operator { op, is_member, .. } => (*op == OperatorId::Assign && *is_member) || op.is_relational(),
        _ => false,
    };
    if !allowed {
        return Err(structural(node.span, "'= default'/'= delete' is only valid on a special member function"));
    }
    Ok(())
}

fn check_postfix_inc_dec(arena: &NodeArena, op: OperatorId, params: &[NodeId]) -> Result<(), Diagnostic> {
    if matches!(op, OperatorId::Increment | OperatorId::Decrement) && params.len() == 2 && !is_plain_int(arena, params[1]) {
        return Err(structural(
            arena.get(params[1]).span,
            "the postfix form's second parameter must be exactly 'int'",
        ));
    }
    Ok(())
}

fn check_operator_return(arena: &NodeArena, op: OperatorId, ret: NodeId, registry: &AliasRegistry, interner: &Interner) -> Result<(), Diagnostic> {
    let r = arena.get(ret);
    match op {
        OperatorId::Arrow => {
            let ok = matches!(&r.kind, NodeKind::Pointer { target } if is_class_like(arena.get(*target)));
            if !ok {
                return Err(structural(r.span, "'operator->' must return a pointer to a class, struct, or union"));
            }
        }
        OperatorId::New | OperatorId::NewArray => {
            let ok = matches!(&r.kind, NodeKind::Pointer { target } if is_void(arena.get(*target), registry, interner));
            if !ok {
                return Err(structural(r.span, "'operator new' must return 'void *'"));
            }
        }
        OperatorId::Delete | OperatorId::DeleteArray => {
            if !is_void(r, registry, interner) {
                return Err(structural(r.span, "'operator delete' must return 'void'"));
            }
        }
        _ => {}
    }
    Ok(())
}

fn check_ctor_dtor_whitelist(node: &Node, is_ctor: bool) -> Result<(), Diagnostic> {
    let allowed: &[StorageBit] = if is_ctor {
        &[
            StorageBit::Explicit,
            StorageBit::Default,
            StorageBit::Delete,
            StorageBit::Noexcept,
            StorageBit::Throw,
            StorageBit::Friend,
            StorageBit::Constexpr,
            StorageBit::Consteval,
            StorageBit::Inline,
        ]
    } else {
        &[
            StorageBit::Virtual,
            StorageBit::Default,
            StorageBit::Delete,
            StorageBit::Noexcept,
            StorageBit::Throw,
            StorageBit::Friend,
            StorageBit::Inline,
        ]
    };
    for s in node.ty.storage_bits() {
        if !allowed.contains(&s) {
            let what = if is_ctor { "constructor" } else { "destructor" };
            return Err(structural(node.span, format!("'{}' is not valid on a {what}", s.native())));
        }
    }
    Ok(())
}

/// Rule family 2 — array element and size restrictions.
#[allow(clippy::too_many_arguments)]
fn check_array(
    arena: &NodeArena,
    node: &Node,
    size: ArraySize,
    element: NodeId,
    dialect: Dialect,
    in_function_params: bool,
    registry: &AliasRegistry,
    interner: &Interner,
) -> Result<(), Diagnostic> {
    if matches!(size, ArraySize::VlaStar) {
        if !in_function_params {
            return Err(structural(node.span, "a variable-length array bound is only allowed in a function parameter"));
        }
        if !(dialect.is_c() && Dialect::C99.min().contains(dialect)) {
            return Err(Diagnostic::dialect_feature(node.span, "a variable-length array", Dialect::C99.min(), dialect));
        }
    }
    let el = arena.get(element);
    if is_void(el, registry, interner) {
        return Err(structural(node.span, "an array cannot have 'void' elements").with_hint("an array of pointer-to-void, perhaps"));
    }
    if matches!(el.kind, NodeKind::Function { .. } | NodeKind::AppleBlock { .. }) {
        return Err(structural(node.span, "an array cannot have function elements").with_hint("an array of pointer-to-function, perhaps"));
    }
    if matches!(el.kind, NodeKind::Reference { .. } | NodeKind::RvalueReference { .. }) {
        return Err(structural(node.span, "an array cannot have reference elements"));
    }
    Ok(())
}

/// Rule family 6 — parameter-list level checks.
fn check_param_list(arena: &NodeArena, params: &[NodeId], dialect: Dialect, registry: &AliasRegistry, interner: &Interner) -> Result<(), Diagnostic> {
    let mut seen = Vec::new();
    for (i, &p) in params.iter().enumerate() {
        let node = arena.get(p);
        if is_void(node, registry, interner) && (params.len() != 1 || node.name.is_some() || !node.ty.is_empty()) {
            return Err(structural(node.span, "'void' may only appear as the sole, unnamed, unqualified parameter"));
        }
        if let NodeKind::BuiltIn { bitfield_width: Some(_) } = node.kind {
            return Err(structural(node.span, "a parameter cannot carry a bit-field width"));
        }
        if node.ty.has(Bit::Base(BaseBit::AutoPlaceholder)) && !Dialect::Cpp20.min().contains(dialect) {
            return Err(Diagnostic::dialect_feature(node.span, "an 'auto' parameter", Dialect::Cpp20.min(), dialect));
        }
        if matches!(node.kind, NodeKind::NameOnly) && Dialect::C2x.min().contains(dialect) {
            return Err(Diagnostic::error(
                Kind::DialectFeature { feature: "a K&R name-only parameter".into(), needs: DialectSet::NONE },
                node.span,
                "a K&R name-only parameter is not valid from C2x onward — give it a type",
            ));
        }
        if matches!(node.kind, NodeKind::Variadic) && i != params.len() - 1 {
            return Err(structural(node.span, "the variadic marker must be the last parameter"));
        }
        if let Some(name) = &node.name {
            let sym = name.local_name();
            if seen.contains(&sym) {
                return Err(naming(node.span, "duplicate parameter name"));
            }
            seen.push(sym);
        }
    }
    Ok(())
}

fn reserved_name_pattern(word: &str) -> Option<&'static str> {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        if first == '_' {
            if matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_uppercase()) {
                return Some("a leading underscore followed by an uppercase letter or underscore is reserved to the implementation");
            }
        }
    }
    if word.contains("__") {
        return Some("an identifier containing a double underscore is reserved to the implementation");
    }
    None
}

/// The warnings pass: never aborts on the first hit, walks the whole tree
/// regardless of what the error pass found.
fn collect_warnings(arena: &NodeArena, id: NodeId, dialect: Dialect, interner: &Interner, registry: &AliasRegistry, diags: &mut Diagnostics) {
    let node = arena.get(id);

    if node.ty.has(Bit::Storage(StorageBit::Register)) {
        if Dialect::Cpp17.min().contains(dialect) {
            diags.push_warning(Diagnostic::warning(Kind::Naming, node.span, "'register' was removed in C++17"));
        } else if Dialect::Cpp11.min().contains(dialect) {
            diags.push_warning(Diagnostic::warning(Kind::Naming, node.span, "'register' is deprecated"));
        }
    }

    if node.ty.has(Bit::Storage(StorageBit::Throw)) {
        if Dialect::Cpp20.min().contains(dialect) {
            diags.push_warning(Diagnostic::warning(Kind::Naming, node.span, "a dynamic exception specification was removed in C++20"));
        } else if Dialect::Cpp11.min().contains(dialect) {
            diags.push_warning(Diagnostic::warning(Kind::Naming, node.span, "a dynamic exception specification is deprecated"));
        }
    }

    if node.ty.has(Bit::Attribute(AttributeBit::Nodiscard)) && is_function_like(&node.kind) {
        if let Some(ret) = node.kind.spine_child() {
            if is_void(arena.get(ret), registry, interner) {
                diags.push_warning(Diagnostic::warning(
                    Kind::Naming,
                    node.span,
                    "'nodiscard' has no effect on a function returning 'void'",
                ));
            }
        }
    }

    if matches!(node.kind, NodeKind::NameOnly) && Dialect::C89.min().contains(dialect) && !Dialect::C2x.min().contains(dialect) {
        diags.push_warning(Diagnostic::warning(Kind::Naming, node.span, "a K&R name-only parameter is assumed to have type 'int'"));
    }

    if let NodeKind::UserLiteral { .. } = node.kind {
        if let Some(name) = &node.name {
            let text = interner.resolve(name.local_name());
            if !text.starts_with('_') {
                diags.push_warning(Diagnostic::warning(
                    Kind::Naming,
                    node.span,
                    "a user-defined literal suffix not starting with '_' is reserved to the standard library",
                ));
            }
        }
    }

    if let Some(name) = &node.name {
        if let Some(reason) = reserved_name_pattern(interner.resolve(name.local_name())) {
            diags.push_warning(Diagnostic::warning(Kind::Naming, node.span, reason));
        }
    }

    if let Some(child) = node.kind.spine_child() {
        collect_warnings(arena, child, dialect, interner, registry, diags);
    }
    for &p in node.kind.params() {
        collect_warnings(arena, p, dialect, interner, registry, diags);
    }
    if let NodeKind::Ecsu { underlying: Some(u) } = &node.kind {
        collect_warnings(arena, *u, dialect, interner, registry, diags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::Interner;
    use crate::scope::ScopedName;

    fn builtin(arena: &mut NodeArena, bits: &[Bit]) -> NodeId {
        let id = arena.new_node(NodeKind::BuiltIn { bitfield_width: None }, Span::default());
        for &b in bits {
            arena.get_mut(id).ty.add(b).unwrap();
        }
        id
    }

    fn named(arena: &mut NodeArena, id: NodeId, interner: &mut Interner, name: &str) -> NodeId {
        arena.get_mut(id).name = Some(ScopedName::local(interner.intern(name)));
        id
    }

    #[test]
    fn plain_int_declaration_passes() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let id = builtin(&mut arena, &[Bit::Base(BaseBit::Int)]);
        named(&mut arena, id, &mut interner, "x");
        let diags = check(&arena, id, Dialect::Cpp17, Purpose::Declaration, &interner, &AliasRegistry::new());
        assert!(!diags.has_errors());
    }

    #[test]
    fn bare_void_declaration_is_rejected() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let id = builtin(&mut arena, &[Bit::Base(BaseBit::Void)]);
        named(&mut arena, id, &mut interner, "x");
        let diags = check(&arena, id, Dialect::Cpp17, Purpose::Declaration, &interner, &AliasRegistry::new());
        assert!(diags.has_errors());
    }

    #[test]
    fn void_is_allowed_as_cast_target() {
        let mut arena = NodeArena::new();
        let interner = Interner::new();
        let id = builtin(&mut arena, &[Bit::Base(BaseBit::Void)]);
        let diags = check(&arena, id, Dialect::Cpp17, Purpose::Cast(CastKind::CStyle), &interner, &AliasRegistry::new());
        assert!(!diags.has_errors());
    }

    #[test]
    fn void_is_allowed_behind_a_pointer() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let void = builtin(&mut arena, &[Bit::Base(BaseBit::Void)]);
        let ptr = arena.new_node(NodeKind::Pointer { target: void }, Span::default());
        named(&mut arena, ptr, &mut interner, "p");
        let diags = check(&arena, ptr, Dialect::Cpp17, Purpose::Declaration, &interner, &AliasRegistry::new());
        assert!(!diags.has_errors());
    }

    #[test]
    fn function_returning_an_array_is_rejected() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let int = builtin(&mut arena, &[Bit::Base(BaseBit::Int)]);
        let arr = arena.new_node(NodeKind::Array { element: int, size: ArraySize::Integer(4) }, Span::default());
        let func = arena.new_node(NodeKind::Function { ret: arr, params: Vec::new(), variadic: false }, Span::default());
        named(&mut arena, func, &mut interner, "f");
        let diags = check(&arena, func, Dialect::Cpp17, Purpose::Declaration, &interner, &AliasRegistry::new());
        assert!(diags.has_errors());
    }

    #[test]
    fn array_of_references_is_rejected() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let int = builtin(&mut arena, &[Bit::Base(BaseBit::Int)]);
        let r = arena.new_node(NodeKind::Reference { target: int }, Span::default());
        let arr = arena.new_node(NodeKind::Array { element: r, size: ArraySize::Unknown }, Span::default());
        named(&mut arena, arr, &mut interner, "a");
        let diags = check(&arena, arr, Dialect::Cpp17, Purpose::Declaration, &interner, &AliasRegistry::new());
        assert!(diags.has_errors());
    }

    #[test]
    fn reference_to_reference_is_rejected() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let int = builtin(&mut arena, &[Bit::Base(BaseBit::Int)]);
        let inner = arena.new_node(NodeKind::Reference { target: int }, Span::default());
        let outer = arena.new_node(NodeKind::Reference { target: inner }, Span::default());
        named(&mut arena, outer, &mut interner, "r");
        let diags = check(&arena, outer, Dialect::Cpp17, Purpose::Declaration, &interner, &AliasRegistry::new());
        assert!(diags.has_errors());
    }

    #[test]
    fn const_qualified_reference_is_rejected() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let int = builtin(&mut arena, &[Bit::Base(BaseBit::Int)]);
        let r = arena.new_node(NodeKind::Reference { target: int }, Span::default());
        arena.get_mut(r).ty.add(Bit::Storage(StorageBit::Const)).unwrap();
        named(&mut arena, r, &mut interner, "r");
        let diags = check(&arena, r, Dialect::Cpp17, Purpose::Declaration, &interner, &AliasRegistry::new());
        assert!(diags.has_errors());
    }

    #[test]
    fn main_must_return_int() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let dbl = builtin(&mut arena, &[Bit::Base(BaseBit::Double)]);
        let func = arena.new_node(NodeKind::Function { ret: dbl, params: Vec::new(), variadic: false }, Span::default());
        named(&mut arena, func, &mut interner, "main");
        let diags = check(&arena, func, Dialect::Cpp17, Purpose::Declaration, &interner, &AliasRegistry::new());
        assert!(diags.has_errors());
    }

    #[test]
    fn main_with_argc_argv_passes() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let int = builtin(&mut arena, &[Bit::Base(BaseBit::Int)]);
        let char_ty = builtin(&mut arena, &[Bit::Base(BaseBit::Char)]);
        let p1 = arena.new_node(NodeKind::Pointer { target: char_ty }, Span::default());
        let p2 = arena.new_node(NodeKind::Pointer { target: p1 }, Span::default());
        let ret = builtin(&mut arena, &[Bit::Base(BaseBit::Int)]);
        let func = arena.new_node(
            NodeKind::Function { ret, params: vec![int, p2], variadic: false },
            Span::default(),
        );
        named(&mut arena, func, &mut interner, "main");
        let diags = check(&arena, func, Dialect::Cpp17, Purpose::Declaration, &interner, &AliasRegistry::new());
        assert!(!diags.has_errors());
    }

    #[test]
    fn alignas_on_typedef_is_rejected() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let id = builtin(&mut arena, &[Bit::Base(BaseBit::Int), Bit::Storage(StorageBit::Typedef)]);
        arena.get_mut(id).align = Some(AlignSpec::Integer(8));
        named(&mut arena, id, &mut interner, "t");
        let diags = check(&arena, id, Dialect::Cpp17, Purpose::Declaration, &interner, &AliasRegistry::new());
        assert!(diags.has_errors());
    }

    #[test]
    fn alignas_non_power_of_two_is_rejected() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let id = builtin(&mut arena, &[Bit::Base(BaseBit::Int)]);
        arena.get_mut(id).align = Some(AlignSpec::Integer(6));
        named(&mut arena, id, &mut interner, "x");
        let diags = check(&arena, id, Dialect::Cpp17, Purpose::Declaration, &interner, &AliasRegistry::new());
        assert!(diags.has_errors());
    }

    #[test]
    fn const_cast_to_a_plain_int_is_rejected() {
        let mut arena = NodeArena::new();
        let interner = Interner::new();
        let id = builtin(&mut arena, &[Bit::Base(BaseBit::Int)]);
        let diags = check(&arena, id, Dialect::Cpp17, Purpose::Cast(CastKind::Const), &interner, &AliasRegistry::new());
        assert!(diags.has_errors());
    }

    #[test]
    fn const_cast_to_a_pointer_passes() {
        let mut arena = NodeArena::new();
        let int = builtin(&mut arena, &[Bit::Base(BaseBit::Int)]);
        let ptr = arena.new_node(NodeKind::Pointer { target: int }, Span::default());
        let interner = Interner::new();
        let diags = check(&arena, ptr, Dialect::Cpp17, Purpose::Cast(CastKind::Const), &interner, &AliasRegistry::new());
        assert!(!diags.has_errors());
    }

    #[test]
    fn register_is_a_deprecation_warning_not_an_error() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let id = builtin(&mut arena, &[Bit::Base(BaseBit::Int), Bit::Storage(StorageBit::Register)]);
        named(&mut arena, id, &mut interner, "r");
        let diags = check(&arena, id, Dialect::Cpp11, Purpose::Declaration, &interner, &AliasRegistry::new());
        assert!(!diags.has_errors());
        assert!(!diags.warnings().is_empty());
    }

    #[test]
    fn duplicate_parameter_names_are_rejected() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let a = builtin(&mut arena, &[Bit::Base(BaseBit::Int)]);
        named(&mut arena, a, &mut interner, "x");
        let b = builtin(&mut arena, &[Bit::Base(BaseBit::Int)]);
        named(&mut arena, b, &mut interner, "x");
        let ret = builtin(&mut arena, &[Bit::Base(BaseBit::Int)]);
        let func = arena.new_node(NodeKind::Function { ret, params: vec![a, b], variadic: false }, Span::default());
        named(&mut arena, func, &mut interner, "f");
        let diags = check(&arena, func, Dialect::Cpp17, Purpose::Declaration, &interner, &AliasRegistry::new());
        assert!(diags.has_errors());
    }

    #[test]
    fn non_member_defaulted_equality_operator_is_accepted() {
        let mut arena = NodeArena::new();
        let interner = Interner::new();
        let lhs = builtin(&mut arena, &[Bit::Base(BaseBit::Int)]);
        let rhs = builtin(&mut arena, &[Bit::Base(BaseBit::Int)]);
        let ret = builtin(&mut arena, &[Bit::Base(BaseBit::Bool)]);
        let op = arena.new_node(
            NodeKind::Operator {
                op: OperatorId::Eq,
                params: vec![lhs, rhs],
                ret,
                is_member: false,
            },
            Span::default(),
        );
        arena.get_mut(op).ty.add(Bit::Storage(StorageBit::Default)).unwrap();
        let diags = check(&arena, op, Dialect::Cpp20, Purpose::Declaration, &interner, &AliasRegistry::new());
        assert!(!diags.has_errors(), "{:?}", diags.errors());
    }

    #[test]
    fn non_member_defaulted_assignment_operator_is_rejected() {
        let mut arena = NodeArena::new();
        let interner = Interner::new();
        let rhs = builtin(&mut arena, &[Bit::Base(BaseBit::Int)]);
        let ret = builtin(&mut arena, &[Bit::Base(BaseBit::Int)]);
        let op = arena.new_node(
            NodeKind::Operator {
                op: OperatorId::Assign,
                params: vec![rhs],
                ret,
                is_member: false,
            },
            Span::default(),
        );
        arena.get_mut(op).ty.add(Bit::Storage(StorageBit::Default)).unwrap();
        let diags = check(&arena, op, Dialect::Cpp20, Purpose::Declaration, &interner, &AliasRegistry::new());
        assert!(diags.has_errors(), "assignment can only be defaulted as a member");
    }

    #[test]
    fn user_defined_literal_without_leading_underscore_warns() {
        let mut arena = NodeArena::new();
        let mut interner = Interner::new();
        let ld = builtin(&mut arena, &[Bit::Base(BaseBit::Long), Bit::Base(BaseBit::Double)]);
        let lit = arena.new_node(NodeKind::UserLiteral { params: vec![ld] }, Span::default());
        named(&mut arena, lit, &mut interner, "km");
        let diags = check(&arena, lit, Dialect::Cpp17, Purpose::Declaration, &interner, &AliasRegistry::new());
        assert!(!diags.warnings().is_empty());
    }

    #[test]
    fn bare_variable_of_a_void_alias_is_rejected() {
        let mut interner = Interner::new();
        let mut registry = AliasRegistry::new();
        let mut alias_arena = NodeArena::new();
        let void = builtin(&mut alias_arena, &[Bit::Base(BaseBit::Void)]);
        let v_name = ScopedName::local(interner.intern("V"));
        registry
            .define("V".to_string(), v_name, &alias_arena, void, crate::typeval::Form::Native)
            .unwrap();

        let mut arena = NodeArena::new();
        let id = arena.new_node(NodeKind::TypedefRef { alias_name: ScopedName::local(interner.intern("V")) }, Span::default());
        named(&mut arena, id, &mut interner, "x");
        let diags = check(&arena, id, Dialect::Cpp17, Purpose::Declaration, &interner, &registry);
        assert!(diags.has_errors());
    }

    #[test]
    fn a_void_alias_is_still_allowed_behind_a_pointer() {
        let mut interner = Interner::new();
        let mut registry = AliasRegistry::new();
        let mut alias_arena = NodeArena::new();
        let void = builtin(&mut alias_arena, &[Bit::Base(BaseBit::Void)]);
        let v_name = ScopedName::local(interner.intern("V"));
        registry
            .define("V".to_string(), v_name, &alias_arena, void, crate::typeval::Form::Native)
            .unwrap();

        let mut arena = NodeArena::new();
        let alias_ref = arena.new_node(NodeKind::TypedefRef { alias_name: ScopedName::local(interner.intern("V")) }, Span::default());
        let ptr = arena.new_node(NodeKind::Pointer { target: alias_ref }, Span::default());
        named(&mut arena, ptr, &mut interner, "p");
        let diags = check(&arena, ptr, Dialect::Cpp17, Purpose::Declaration, &interner, &registry);
        assert!(!diags.has_errors(), "{:?}", diags.errors());
    }
}
