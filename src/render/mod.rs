//! Renderer (SPEC_FULL §4.8): two output paths driven by the same
//! declarator tree and the type algebra's canonical bit ordering — English
//! (outside-in, pre-order) and native (inside-out, precedence-
//! parenthesised). Grounded on the teacher's `src/formatter.rs`
//! (`LatexFormatter`/`LogicFormatter`/`UnicodeFormatter` selected by an
//! explicit enum rather than a trait object): this repo picks the same
//! "one function per target, no trait object" shape, selected by `Form`
//! at the call site rather than a runtime-selected formatter value.

mod english;
mod native;

use crate::ast::{NodeArena, NodeId};
use crate::dialect::Dialect;
use crate::intern::Interner;
use crate::scope::ScopedName;
use crate::token::CastKind;
use crate::typeval::{Bit, StorageBit, TypeValue};

/// §6 "configuration surface": the rendering toggles, modelled as plain
/// struct fields rather than a file format (file loading is an external-CLI
/// concern; the struct itself is core).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub trailing_semicolon: bool,
    pub east_const: bool,
    pub alignas_style: AlignasStyle,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            trailing_semicolon: false,
            // The corpus's own native rendering convention trails the
            // qualifier after the base type (`int const`, not `const int`);
            // `east_const: false` opts into the alternative leading style.
            east_const: true,
            alignas_style: AlignasStyle::Keyword,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignasStyle {
    /// `alignas(...)`.
    Keyword,
    /// `_Alignas(...)`.
    Underscore,
}

/// Render the declarator tree rooted at `root` as a native C/C++ declaration
/// (the name, if any, comes from the root node — both `declare` and
/// `explain` leave it there; see `src/parser/mod.rs` and `take_name`).
pub fn render_native(arena: &NodeArena, root: NodeId, interner: &Interner, dialect: Dialect, config: &RenderConfig) -> String {
    native::render(arena, root, interner, dialect, config)
}

/// Render the declarator tree rooted at `root` as the pseudo-English
/// `declare`/`constructor`/`destructor`/… sentence (what the `explain`
/// command emits).
pub fn render_english(arena: &NodeArena, root: NodeId, interner: &Interner, dialect: Dialect) -> String {
    english::render(arena, root, interner, dialect)
}

/// Render `root` as an abstract (name-less) native type — the registry's
/// persisted-state form (§6) renders each alias's definition this way and
/// supplies the name itself in the surrounding `typedef ... name;` text.
pub fn render_anonymous(arena: &NodeArena, root: NodeId, interner: &Interner, dialect: Dialect, config: &RenderConfig) -> String {
    native::render_anonymous(arena, root, interner, dialect, config)
}

/// Render a `typedef`-kind alias definition under its full scoped name,
/// wrapping it in `namespace`/`class`/`struct`/`union` frames when `name`
/// has more than one segment (§4.8).
pub fn render_scoped_typedef(
    arena: &NodeArena,
    root: NodeId,
    name: &ScopedName,
    interner: &Interner,
    dialect: Dialect,
    config: &RenderConfig,
) -> String {
    native::render_scoped_typedef(arena, root, name, interner, dialect, config)
}

/// Render a `cast` command's result: `root` is the target type (its own
/// name, if any, is the value being cast), `kind` picks the cast flavour.
pub fn render_cast_native(
    arena: &NodeArena,
    root: NodeId,
    kind: CastKind,
    interner: &Interner,
    dialect: Dialect,
    config: &RenderConfig,
) -> String {
    let subject = arena
        .get(root)
        .name
        .as_ref()
        .map(|n| n.full_name(interner))
        .unwrap_or_default();
    let target = native::render_anonymous(arena, root, interner, dialect, config);
    match kind {
        CastKind::CStyle => format!("({target}){subject}"),
        CastKind::Const => format!("const_cast<{target}>({subject})"),
        CastKind::Static => format!("static_cast<{target}>({subject})"),
        CastKind::Dynamic => format!("dynamic_cast<{target}>({subject})"),
        CastKind::Reinterpret => format!("reinterpret_cast<{target}>({subject})"),
    }
}

/// The four qualifier/atomic bits that `east_const` repositions. Built via
/// `add` rather than a literal mask so the partition tagging stays the only
/// way bits are constructed (§3.1 invariant i).
fn cv_mask() -> TypeValue {
    let mut v = TypeValue::new();
    for b in [StorageBit::Const, StorageBit::Volatile, StorageBit::Restrict, StorageBit::Atomic] {
        let _ = v.add(Bit::Storage(b));
    }
    v
}

