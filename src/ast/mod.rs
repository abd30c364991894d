//! Declarator tree (SPEC_FULL §3.2, §4.4).
//!
//! Grounded on the teacher's `src/ast/mod.rs` module-re-export shape and
//! `src/visitor.rs`'s direction-parameterized depth-first walk, generalized
//! here to the single tagged-variant node described by §3.2. Per the design
//! notes ("represent as a bump arena owning a vector of nodes; nodes
//! reference each other via stable indices"), `NodeArena` is a `Vec<Node>`
//! addressed by `NodeId`, not the teacher's bump-allocated `&T` references —
//! the declarator tree needs copyable, comparable handles for parent and
//! target back-references that a pure bump reference can't give cheaply.

mod node;

pub use node::{AlignSpec, ArraySize, Node, NodeId, NodeKind, OperatorId};

use crate::error::Span;
use crate::scope::ScopedName;

#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Outside-in: the node closest to the declared name is visited last.
    OuterToInner,
    /// Inside-out: the innermost leaf is visited first.
    InnerToOuter,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// §4.4 `new_node`: allocate a node with common fields zeroed.
    pub fn new_node(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(kind, span));
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    /// §4.4 `set_parent`: only parent-capable kinds may accept children.
    pub fn set_parent(&mut self, child: NodeId, parent: NodeId) {
        assert!(
            !self.get(parent).kind.is_leaf(),
            "leaf kind {:?} cannot accept children",
            self.get(parent).kind
        );
        self.get_mut(child).parent = Some(parent);
    }

    /// Walks `host`'s chain (following `target`, falling back to the single
    /// spine child) to the first placeholder or leaf, returning that node's
    /// id — the splice point for a further layer.
    fn find_splice_point(&self, host: NodeId) -> NodeId {
        let mut cur = host;
        loop {
            let node = self.get(cur);
            if let Some(target) = node.target {
                cur = target;
                continue;
            }
            match &node.kind {
                NodeKind::Placeholder => return cur,
                _ if node.kind.is_leaf() => return cur,
                _ => match node.kind.spine_child() {
                    Some(child) => cur = child,
                    None => return cur,
                },
            }
        }
    }

    /// §4.4 `add_array`: extend `host`'s declarator with an array layer,
    /// splicing at the first placeholder/leaf. Returns the (possibly new)
    /// chain head.
    pub fn add_array(&mut self, host: NodeId, size: ArraySize, span: Span) -> NodeId {
        let splice = self.find_splice_point(host);
        let array = self.new_node(
            NodeKind::Array {
                element: splice,
                size,
            },
            span,
        );
        self.set_parent(splice, array);
        self.get_mut(host).target = Some(array);
        if host == splice {
            array
        } else {
            host
        }
    }

    /// §4.4 `add_function`: extend `host` with a function-returning layer.
    pub fn add_function(&mut self, host: NodeId, params: Vec<NodeId>, variadic: bool, span: Span) -> NodeId {
        let splice = self.find_splice_point(host);
        let func = self.new_node(
            NodeKind::Function {
                ret: splice,
                params,
                variadic,
            },
            span,
        );
        self.set_parent(splice, func);
        self.get_mut(host).target = Some(func);
        if host == splice {
            func
        } else {
            host
        }
    }

    /// §4.4 `patch_placeholder`: substitute `type_root` into the first
    /// placeholder found in `decl_root`'s chain. No-op if there is none.
    pub fn patch_placeholder(&mut self, type_root: NodeId, decl_root: NodeId) -> NodeId {
        if let Some(ph) = self.find_first(decl_root, |n| matches!(n.kind, NodeKind::Placeholder)) {
            let parent = self.get(ph).parent;
            let name = self.get_mut(ph).name.take();
            if name.is_some() {
                self.get_mut(type_root).name = name;
            }
            self.get_mut(type_root).parent = parent;
            if let Some(parent_id) = parent {
                self.replace_child(parent_id, ph, type_root);
            }
            if decl_root == ph {
                return type_root;
            }
        }
        decl_root
    }

    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        let node = self.get_mut(parent);
        match &mut node.kind {
            NodeKind::Pointer { target }
            | NodeKind::Reference { target }
            | NodeKind::RvalueReference { target }
            | NodeKind::PointerToMember { target, .. }
            | NodeKind::UserConversion { target } => {
                if *target == old {
                    *target = new;
                }
            }
            NodeKind::Array { element, .. } => {
                if *element == old {
                    *element = new;
                }
            }
            NodeKind::Function { ret, params, .. } | NodeKind::AppleBlock { ret, params } => {
                if *ret == old {
                    *ret = new;
                }
                for p in params.iter_mut() {
                    if *p == old {
                        *p = new;
                    }
                }
            }
            NodeKind::Operator { ret, params, .. } => {
                if *ret == old {
                    *ret = new;
                }
                for p in params.iter_mut() {
                    if *p == old {
                        *p = new;
                    }
                }
            }
            _ => {}
        }
    }

    /// §4.4 `visit`: depth-first, post-order over the spine only — function
    /// parameter lists are independent trees the caller visits explicitly.
    pub fn visit(&self, root: NodeId, direction: Direction, visitor: &mut impl FnMut(NodeId)) {
        let mut spine = vec![root];
        let mut cur = root;
        while let Some(child) = self.get(cur).kind.spine_child() {
            spine.push(child);
            cur = child;
        }
        match direction {
            Direction::OuterToInner => {
                for &id in &spine {
                    visitor(id);
                }
            }
            Direction::InnerToOuter => {
                for &id in spine.iter().rev() {
                    visitor(id);
                }
            }
        }
    }

    /// §4.4 `find_first`: first node in `root`'s full subtree (including
    /// parameter lists) matching `predicate`.
    pub fn find_first(&self, root: NodeId, predicate: impl Fn(&Node) -> bool + Copy) -> Option<NodeId> {
        if predicate(self.get(root)) {
            return Some(root);
        }
        let node = self.get(root);
        if let Some(child) = node.kind.spine_child() {
            if let Some(found) = self.find_first(child, predicate) {
                return Some(found);
            }
        }
        for &p in node.kind.params() {
            if let Some(found) = self.find_first(p, predicate) {
                return Some(found);
            }
        }
        None
    }

    /// §4.4 `take_name`: relocate the deepest name in `root`'s spine to the
    /// root, emptying the source node's name.
    pub fn take_name(&mut self, root: NodeId) -> Option<ScopedName> {
        let mut cur = root;
        while let Some(child) = self.get(cur).kind.spine_child() {
            cur = child;
        }
        let taken = self.get_mut(cur).name.take();
        if cur != root {
            self.get_mut(root).name = taken.clone();
        }
        taken
    }

    /// §4.4 `equiv`: structural equality up to names and source locations.
    pub fn equiv(&self, a: NodeId, b: NodeId) -> bool {
        let na = self.get(a);
        let nb = self.get(b);
        if na.ty != nb.ty || na.align.is_some() != nb.align.is_some() {
            return false;
        }
        match (&na.kind, &nb.kind) {
            (NodeKind::Placeholder, NodeKind::Placeholder) => true,
            (NodeKind::Variadic, NodeKind::Variadic) => true,
            (NodeKind::NameOnly, NodeKind::NameOnly) => true,
            (NodeKind::BuiltIn { bitfield_width: w1 }, NodeKind::BuiltIn { bitfield_width: w2 }) => w1 == w2,
            (NodeKind::Ecsu { underlying: u1 }, NodeKind::Ecsu { underlying: u2 }) => {
                match (u1, u2) {
                    (Some(x), Some(y)) => self.equiv(*x, *y),
                    (None, None) => true,
                    _ => false,
                }
            }
            (NodeKind::TypedefRef { alias_name: n1 }, NodeKind::TypedefRef { alias_name: n2 }) => n1 == n2,
            (NodeKind::Pointer { target: t1 }, NodeKind::Pointer { target: t2 })
            | (NodeKind::Reference { target: t1 }, NodeKind::Reference { target: t2 })
            | (NodeKind::RvalueReference { target: t1 }, NodeKind::RvalueReference { target: t2 })
            | (NodeKind::UserConversion { target: t1 }, NodeKind::UserConversion { target: t2 }) => {
                self.equiv(*t1, *t2)
            }
            (
                NodeKind::PointerToMember { class_name: c1, target: t1 },
                NodeKind::PointerToMember { class_name: c2, target: t2 },
            ) => c1 == c2 && self.equiv(*t1, *t2),
            (NodeKind::Array { element: e1, size: s1 }, NodeKind::Array { element: e2, size: s2 }) => {
                s1 == s2 && self.equiv(*e1, *e2)
            }
            (
                NodeKind::Function {
                    ret: r1,
                    params: p1,
                    variadic: v1,
                },
                NodeKind::Function {
                    ret: r2,
                    params: p2,
                    variadic: v2,
                },
            )
            | (
                NodeKind::AppleBlock { ret: r1, params: p1 },
                NodeKind::AppleBlock { ret: r2, params: p2 },
            ) if matches!((na.kind.clone(), nb.kind.clone()), (NodeKind::Function { .. }, NodeKind::Function { .. }))
                || matches!(
                    (na.kind.clone(), nb.kind.clone()),
                    (NodeKind::AppleBlock { .. }, NodeKind::AppleBlock { .. })
                ) =>
            {
                let variadic_ok = match (&na.kind, &nb.kind) {
                    (NodeKind::Function { .. }, NodeKind::Function { .. }) => v1 == v2,
                    _ => true,
                };
                variadic_ok
                    && p1.len() == p2.len()
                    && self.equiv(*r1, *r2)
                    && p1.iter().zip(p2.iter()).all(|(x, y)| self.equiv(*x, *y))
            }
            (NodeKind::Constructor { params: p1 }, NodeKind::Constructor { params: p2 }) => {
                p1.len() == p2.len() && p1.iter().zip(p2.iter()).all(|(x, y)| self.equiv(*x, *y))
            }
            (NodeKind::Destructor, NodeKind::Destructor) => true,
            (
                NodeKind::Operator {
                    op: o1,
                    params: p1,
                    ret: r1,
                    is_member: m1,
                },
                NodeKind::Operator {
                    op: o2,
                    params: p2,
                    ret: r2,
                    is_member: m2,
                },
            ) => {
                o1 == o2
                    && m1 == m2
                    && p1.len() == p2.len()
                    && self.equiv(*r1, *r2)
                    && p1.iter().zip(p2.iter()).all(|(x, y)| self.equiv(*x, *y))
            }
            (NodeKind::UserLiteral { params: p1 }, NodeKind::UserLiteral { params: p2 }) => {
                p1.len() == p2.len() && p1.iter().zip(p2.iter()).all(|(x, y)| self.equiv(*x, *y))
            }
            _ => false,
        }
    }
}
