//! Alias (typedef/using) registry (SPEC_FULL §3.4, §4.4 `untypedef`).
//!
//! Grounded on the teacher's `kernel/type_checker.rs` symbol-table pattern
//! (a `HashMap` from name to definition, consulted during both parsing and
//! checking) but specialized to own a long-lived `NodeArena` of its own: a
//! registered alias's declarator tree must outlive the single parse that
//! introduced it, so it cannot live in the per-command arena.

use crate::ast::{Node, NodeArena, NodeId};
use crate::dialect::Dialect;
use crate::intern::Interner;
use crate::render::{render_scoped_typedef, RenderConfig};
use crate::scope::ScopedName;
use crate::typeval::Form;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct AliasRecord {
    pub name: ScopedName,
    pub root: NodeId,
    pub source_form: Form,
}

/// Maps a scoped name's joined text to its definition. Keyed by the joined
/// `::`-separated string rather than `ScopedName` itself so lookups don't
/// need an `Interner` in hand.
#[derive(Debug, Default)]
pub struct AliasRegistry {
    arena: NodeArena,
    by_name: HashMap<String, AliasRecord>,
    /// Definition order, kept separately since `HashMap` doesn't preserve it
    /// and §6 "Persisted state" requires replaying aliases in the order they
    /// were originally defined.
    order: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasConflict {
    pub existing_form: Form,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// §3.4: re-declaring an alias under the same name is permitted only if
    /// the new declarator tree is structurally equivalent (§4.4 `equiv`) to
    /// the existing one; otherwise it's a conflict.
    pub fn define(
        &mut self,
        key: String,
        name: ScopedName,
        source_arena: &NodeArena,
        root: NodeId,
        source_form: Form,
    ) -> Result<(), AliasConflict> {
        if let Some(existing) = self.by_name.get(&key) {
            let matches = Self::cross_arena_equiv(source_arena, root, &self.arena, existing.root);
            if !matches {
                return Err(AliasConflict {
                    existing_form: existing.source_form,
                });
            }
            return Ok(());
        }
        let copied = self.import(source_arena, root);
        self.order.push(key.clone());
        self.by_name.insert(
            key,
            AliasRecord {
                name,
                root: copied,
                source_form,
            },
        );
        Ok(())
    }

    pub fn lookup(&self, key: &str) -> Option<&AliasRecord> {
        self.by_name.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<AliasRecord> {
        self.order.retain(|k| k != key);
        self.by_name.remove(key)
    }

    pub fn clear(&mut self) {
        self.by_name.clear();
        self.order.clear();
    }

    /// §6 "Persisted state": every alias as a standalone native `typedef`
    /// command, in definition order. Replaying the list into a fresh
    /// registry under the same dialect reproduces an equivalent registry —
    /// idempotent, since `define` accepts a structurally equivalent
    /// redefinition of the same key.
    pub fn persist(&self, interner: &Interner, dialect: Dialect, config: &RenderConfig) -> Vec<String> {
        self.order
            .iter()
            .map(|key| {
                let rec = &self.by_name[key];
                render_scoped_typedef(&self.arena, rec.root, &rec.name, interner, dialect, config)
            })
            .collect()
    }

    /// §4.4 `untypedef`: resolve a `TypedefRef` node to the registry's own
    /// arena and node id, one layer at a time (the caller loops if the
    /// resolved root is itself a `TypedefRef`).
    pub fn untypedef(&self, key: &str) -> Option<(&NodeArena, NodeId)> {
        self.by_name.get(key).map(|rec| (&self.arena, rec.root))
    }

    /// Deep-copies the subtree rooted at `root` in `source` into this
    /// registry's own arena, since declarator trees aren't addressable
    /// across distinct `NodeArena`s.
    fn import(&mut self, source: &NodeArena, root: NodeId) -> NodeId {
        let node = source.get(root);
        let new_kind = Self::remap_kind(source, self, node);
        let new_id = self.arena.new_node(new_kind, node.span);
        {
            let copy = self.arena.get_mut(new_id);
            copy.name = node.name.clone();
            copy.ty = node.ty;
            copy.align = node.align;
        }
        new_id
    }

    fn remap_kind(source: &NodeArena, dest: &mut AliasRegistry, node: &Node) -> crate::ast::NodeKind {
        use crate::ast::NodeKind::*;
        match &node.kind {
            Placeholder => Placeholder,
            BuiltIn { bitfield_width } => BuiltIn {
                bitfield_width: *bitfield_width,
            },
            Ecsu { underlying } => Ecsu {
                underlying: underlying.map(|u| dest.import(source, u)),
            },
            NameOnly => NameOnly,
            Variadic => Variadic,
            TypedefRef { alias_name } => TypedefRef {
                alias_name: alias_name.clone(),
            },
            Pointer { target } => Pointer {
                target: dest.import(source, *target),
            },
            Reference { target } => Reference {
                target: dest.import(source, *target),
            },
            RvalueReference { target } => RvalueReference {
                target: dest.import(source, *target),
            },
            PointerToMember { class_name, target } => PointerToMember {
                class_name: class_name.clone(),
                target: dest.import(source, *target),
            },
            Array { element, size } => Array {
                element: dest.import(source, *element),
                size: *size,
            },
            Function { ret, params, variadic } => Function {
                ret: dest.import(source, *ret),
                params: params.iter().map(|p| dest.import(source, *p)).collect(),
                variadic: *variadic,
            },
            AppleBlock { ret, params } => AppleBlock {
                ret: dest.import(source, *ret),
                params: params.iter().map(|p| dest.import(source, *p)).collect(),
            },
            Constructor { params } => Constructor {
                params: params.iter().map(|p| dest.import(source, *p)).collect(),
            },
            Destructor => Destructor,
            Operator {
                op,
                params,
                ret,
                is_member,
            } => Operator {
                op: *op,
                params: params.iter().map(|p| dest.import(source, *p)).collect(),
                ret: dest.import(source, *ret),
                is_member: *is_member,
            },
            UserConversion { target } => UserConversion {
                target: dest.import(source, *target),
            },
            UserLiteral { params } => UserLiteral {
                params: params.iter().map(|p| dest.import(source, *p)).collect(),
            },
        }
    }

    /// Structural equivalence across two distinct arenas — needed because a
    /// freshly parsed redefinition lives in the caller's per-command arena,
    /// not this registry's own.
    fn cross_arena_equiv(a_arena: &NodeArena, a: NodeId, b_arena: &NodeArena, b: NodeId) -> bool {
        let na = a_arena.get(a);
        let nb = b_arena.get(b);
        if na.ty != nb.ty {
            return false;
        }
        use crate::ast::NodeKind::*;
        match (&na.kind, &nb.kind) {
            (Placeholder, Placeholder) | (Variadic, Variadic) | (NameOnly, NameOnly) | (Destructor, Destructor) => true,
            (BuiltIn { bitfield_width: w1 }, BuiltIn { bitfield_width: w2 }) => w1 == w2,
            (TypedefRef { alias_name: n1 }, TypedefRef { alias_name: n2 }) => n1 == n2,
            (Ecsu { underlying: u1 }, Ecsu { underlying: u2 }) => match (u1, u2) {
                (Some(x), Some(y)) => Self::cross_arena_equiv(a_arena, *x, b_arena, *y),
                (None, None) => true,
                _ => false,
            },
            (Pointer { target: t1 }, Pointer { target: t2 })
            | (Reference { target: t1 }, Reference { target: t2 })
            | (RvalueReference { target: t1 }, RvalueReference { target: t2 })
            | (UserConversion { target: t1 }, UserConversion { target: t2 }) => {
                Self::cross_arena_equiv(a_arena, *t1, b_arena, *t2)
            }
            (PointerToMember { class_name: c1, target: t1 }, PointerToMember { class_name: c2, target: t2 }) => {
                c1 == c2 && Self::cross_arena_equiv(a_arena, *t1, b_arena, *t2)
            }
            (Array { element: e1, size: s1 }, Array { element: e2, size: s2 }) => {
                s1 == s2 && Self::cross_arena_equiv(a_arena, *e1, b_arena, *e2)
            }
            (
                Function {
                    ret: r1,
                    params: p1,
                    variadic: v1,
                },
                Function {
                    ret: r2,
                    params: p2,
                    variadic: v2,
                },
            ) => {
                v1 == v2
                    && p1.len() == p2.len()
                    && Self::cross_arena_equiv(a_arena, *r1, b_arena, *r2)
                    && p1.iter().zip(p2.iter()).all(|(x, y)| Self::cross_arena_equiv(a_arena, *x, b_arena, *y))
            }
            (AppleBlock { ret: r1, params: p1 }, AppleBlock { ret: r2, params: p2 }) => {
                p1.len() == p2.len()
                    && Self::cross_arena_equiv(a_arena, *r1, b_arena, *r2)
                    && p1.iter().zip(p2.iter()).all(|(x, y)| Self::cross_arena_equiv(a_arena, *x, b_arena, *y))
            }
            (Constructor { params: p1 }, Constructor { params: p2 }) => {
                p1.len() == p2.len() && p1.iter().zip(p2.iter()).all(|(x, y)| Self::cross_arena_equiv(a_arena, *x, b_arena, *y))
            }
            (
                Operator {
                    op: o1,
                    params: p1,
                    ret: r1,
                    is_member: m1,
                },
                Operator {
                    op: o2,
                    params: p2,
                    ret: r2,
                    is_member: m2,
                },
            ) => {
                o1 == o2
                    && m1 == m2
                    && p1.len() == p2.len()
                    && Self::cross_arena_equiv(a_arena, *r1, b_arena, *r2)
                    && p1.iter().zip(p2.iter()).all(|(x, y)| Self::cross_arena_equiv(a_arena, *x, b_arena, *y))
            }
            (UserLiteral { params: p1 }, UserLiteral { params: p2 }) => {
                p1.len() == p2.len() && p1.iter().zip(p2.iter()).all(|(x, y)| Self::cross_arena_equiv(a_arena, *x, b_arena, *y))
            }
            _ => false,
        }
    }
}
