//! Process-scoped configuration as an explicit value (SPEC_FULL §9.1), not a
//! global: the active dialect, the renderer's toggles, and a handle to the
//! long-lived alias registry all live on one `Context`, threaded through
//! `parse`/`check`/`render` by reference rather than read off a `static`.
//! Grounded on the teacher's `DiscourseContext`/`AstContext` pattern — a
//! single struct passed to the lexer, parser and checker instead of module-
//! level mutable state — and its `AstContext::new()` convention of building
//! a fresh context per test case.

use crate::dialect::Dialect;
use crate::registry::AliasRegistry;
use crate::render::RenderConfig;

/// Everything `parse`, `check`, and `render` need besides the command text
/// itself. `set`/`show` (§4.6) mutate `dialect`/`render` in place; `define`
/// (§3.4, §4.4 `untypedef`) writes into `registry`.
#[derive(Debug)]
pub struct Context {
    pub dialect: Dialect,
    pub render: RenderConfig,
    pub registry: AliasRegistry,
}

impl Context {
    pub fn new(dialect: Dialect) -> Self {
        Context {
            dialect,
            render: RenderConfig::default(),
            registry: AliasRegistry::new(),
        }
    }
}
