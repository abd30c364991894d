//! English declarator rendering (SPEC_FULL §4.8 "English renderer").
//!
//! Builds outside-in, pre-order: each layer names its own contribution
//! ("pointer to", "array 10 of", "function (...) returning", …) before
//! descending into whatever it wraps. Type words reuse native spelling by
//! default (`const int`, matching the §8 scenario table's `explain` output)
//! — the same abbreviated vocabulary the classic `cdecl` tool's English
//! explanations use — except once any bit's native spelling is one of the
//! underscore-prefixed C11/C2x keywords (`_Atomic`, `_Complex`, `_Imaginary`,
//! `_Accum`, `_Fract`, `_Sat`), which read poorly as bare tokens in a
//! sentence; in that case every word in the same type switches to the long
//! English spelling instead (`atomic integer`, not `_Atomic int`).

use crate::ast::{ArraySize, Node, NodeArena, NodeId, NodeKind};
use crate::dialect::Dialect;
use crate::intern::Interner;
use crate::typeval::{BaseBit, Bit, TypeValue};

struct Ctx<'a> {
    arena: &'a NodeArena,
    interner: &'a Interner,
}

/// `dialect` is accepted for symmetry with `render_native` (both are called
/// uniformly from `src/render/mod.rs`) — unlike native syntax, the English
/// phrasing itself (§8 scenario row 5's `reference to const class C` under
/// C++20) doesn't vary by dialect, so it isn't threaded any further here.
pub fn render(arena: &NodeArena, root: NodeId, interner: &Interner, _dialect: Dialect) -> String {
    let ctx = Ctx { arena, interner };
    ctx.sentence(root)
}

/// True once any bit set on `ty` spells, in native form, with a leading
/// underscore — the trigger for switching the whole type to long English
/// words (cf. scenario row 6, `_Atomic(int)` → "atomic integer").
fn has_underscore_bit(ty: TypeValue) -> bool {
    ty.base_bits().any(|b| b.native().starts_with('_')) || ty.storage_bits().any(|s| s.native().starts_with('_'))
}

/// Renders `ty`'s own words (attributes, storage, base) in sentence order,
/// picking native spelling unless `has_underscore_bit` forces the long form.
/// Leaves the "bare storage implies `int`" fallback to the caller: a
/// qualifier-only declarator layer (a `const` pointer, say) has no base word
/// to fall back to, while a `BuiltIn` leaf does.
fn type_words(ty: TypeValue, with_base_fallback: bool) -> Vec<String> {
    let long_form = has_underscore_bit(ty);
    let word = |b: Bit| -> String {
        if long_form {
            b.english().to_string()
        } else {
            b.native().to_string()
        }
    };
    let mut words: Vec<String> = ty.attribute_bits().map(|a| word(Bit::Attribute(a))).collect();
    words.extend(ty.storage_bits().map(|s| word(Bit::Storage(s))));
    let base_words: Vec<String> = ty.base_bits().map(|b| word(Bit::Base(b))).collect();
    if base_words.is_empty() {
        if with_base_fallback && (!words.is_empty() || ty.is_empty()) {
            words.push(if long_form { "integer".to_string() } else { "int".to_string() });
        }
    } else {
        words.extend(base_words);
    }
    words.retain(|w| !w.is_empty());
    words
}

impl<'a> Ctx<'a> {
    fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    fn name_of(&self, id: NodeId) -> String {
        self.node(id).name.as_ref().map(|n| n.full_name(self.interner)).unwrap_or_default()
    }

    /// Top-level sentence: `declare <name> as <phrase>`, with the handful of
    /// root kinds that don't fit that template (constructors, destructors,
    /// conversions, user-defined literals, free operators) spelled out on
    /// their own terms.
    fn sentence(&self, root: NodeId) -> String {
        let node = self.node(root);
        match &node.kind {
            NodeKind::Constructor { params } => {
                format!("declare {} as constructor ({})", self.name_of(root), self.params_phrase(params))
            }
            NodeKind::Destructor => {
                format!("declare {} as destructor", self.name_of(root))
            }
            NodeKind::UserConversion { target } => {
                format!(
                    "declare {} as conversion operator returning {}",
                    self.name_of(root),
                    self.phrase(*target)
                )
            }
            NodeKind::UserLiteral { params } => {
                format!(
                    "declare {} as user-defined literal operator ({})",
                    self.name_of(root),
                    self.params_phrase(params)
                )
            }
            NodeKind::Operator { op, params, ret, is_member } => {
                let mut words = function_storage_words(node.ty);
                if !*is_member {
                    words.insert(0, "non-member".to_string());
                }
                words.push("function".to_string());
                format!(
                    "declare {} as {} operator {} ({}) returning {}",
                    self.name_of(root),
                    words.join(" "),
                    op.token(),
                    self.params_phrase(params),
                    self.phrase(*ret)
                )
            }
            _ => format!("declare {} as {}", self.name_of(root), self.phrase(root)),
        }
    }

    fn params_phrase(&self, params: &[NodeId]) -> String {
        params
            .iter()
            .map(|&p| {
                let name = self.name_of(p);
                let phrase = self.phrase(p);
                if name.is_empty() {
                    phrase
                } else {
                    format!("{name} as {phrase}")
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The recursive outside-in describer: each declarator layer names its
    /// own shape, then recurses into what it wraps.
    fn phrase(&self, id: NodeId) -> String {
        let node = self.node(id);
        match &node.kind {
            NodeKind::Placeholder | NodeKind::NameOnly => String::new(),
            NodeKind::Variadic => "...".to_string(),
            NodeKind::BuiltIn { .. } => type_words(node.ty, true).join(" "),
            NodeKind::Ecsu { underlying } => {
                let quals = type_words(node.ty.diff(ecsu_kind_mask()), false);
                let kind_mask = ecsu_kind_mask();
                let kind_word = node.ty.intersect(kind_mask).base_bits().next().map(BaseBit::english);
                let name = self.name_of(id);
                let mut words = quals;
                if let Some(k) = kind_word {
                    words.push(k.to_string());
                }
                if !name.is_empty() {
                    words.push(name);
                }
                let noun = words.join(" ");
                match underlying {
                    Some(u) => format!("{noun} with underlying type {}", self.phrase(*u)),
                    None => noun,
                }
            }
            NodeKind::TypedefRef { alias_name } => {
                let quals = type_words(node.ty, false);
                let mut words = quals;
                words.push(alias_name.full_name(self.interner));
                words.join(" ")
            }
            NodeKind::Pointer { target } => self.wrap("pointer to", node.ty, *target),
            NodeKind::Reference { target } => self.wrap("reference to", node.ty, *target),
            NodeKind::RvalueReference { target } => self.wrap("rvalue reference to", node.ty, *target),
            NodeKind::PointerToMember { class_name, target } => {
                let lead = format!("pointer to member of class {}", class_name.full_name(self.interner));
                self.wrap(&lead, node.ty, *target)
            }
            NodeKind::Array { element, size } => {
                let count = match size {
                    ArraySize::Unknown => String::new(),
                    ArraySize::Integer(n) => format!("{n} "),
                    ArraySize::VlaStar => "variable length ".to_string(),
                    ArraySize::Constant => String::new(),
                };
                format!("array {count}of {}", self.phrase(*element))
            }
            NodeKind::Function { ret, params, variadic } => {
                self.function_phrase(node.ty, params, *variadic, *ret)
            }
            NodeKind::AppleBlock { ret, params } => {
                let storage = function_storage_words(node.ty);
                let prefix = if storage.is_empty() { String::new() } else { format!("{} ", storage.join(" ")) };
                format!(
                    "{prefix}block ({}) returning {}",
                    self.params_phrase(params),
                    self.phrase(*ret)
                )
            }
            // These only ever appear as a command's root; `sentence` handles
            // them before `phrase` is reached.
            NodeKind::Constructor { .. }
            | NodeKind::Destructor
            | NodeKind::Operator { .. }
            | NodeKind::UserConversion { .. }
            | NodeKind::UserLiteral { .. } => String::new(),
        }
    }

    fn function_phrase(&self, ty: TypeValue, params: &[NodeId], variadic: bool, ret: NodeId) -> String {
        let storage = function_storage_words(ty);
        let prefix = if storage.is_empty() { String::new() } else { format!("{} ", storage.join(" ")) };
        let mut params_text = self.params_phrase(params);
        if variadic {
            if !params_text.is_empty() {
                params_text.push_str(", ");
            }
            params_text.push_str("...");
        }
        format!("{prefix}function ({params_text}) returning {}", self.phrase(ret))
    }

    fn wrap(&self, lead: &str, ty: TypeValue, target: NodeId) -> String {
        let quals = type_words(ty, false);
        if quals.is_empty() {
            format!("{lead} {}", self.phrase(target))
        } else {
            format!("{} {lead} {}", quals.join(" "), self.phrase(target))
        }
    }
}

/// Storage/attribute words that read naturally in front of "function"/
/// "block" (`static function`, `friend function`, `noexcept function`) — a
/// function-like node's own qualifier words, with the same native-unless-
/// underscore spelling rule as any other type word (the English grammar
/// itself accepts `noexcept`, `friend`, `default`, … spelled natively; cf.
/// scenario row 4's `declare f as noexcept function ()`).
fn function_storage_words(ty: TypeValue) -> Vec<String> {
    type_words(ty, false)
}

fn ecsu_kind_mask() -> TypeValue {
    let mut v = TypeValue::new();
    for b in [BaseBit::Enum, BaseBit::Struct, BaseBit::Union, BaseBit::Class] {
        let _ = v.add(Bit::Base(b));
    }
    v
}
