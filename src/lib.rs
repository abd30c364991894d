//! Translates between the pseudo-English declarator sentences and native
//! C/C++ declarator syntax (SPEC_FULL §1 overview): `declare`/`cast`/
//! `define`/`explain` commands are lexed and parsed into a shared declarator
//! tree (`ast`), checked against the active dialect's legality rules
//! (`checker`), and rendered back out in whichever form was asked for
//! (`render`). `context::Context` is the single value threading the active
//! dialect, rendering configuration, and alias registry through all three
//! stages; nothing here reaches for global state.

pub mod arena;
pub mod ast;
pub mod checker;
pub mod context;
pub mod dialect;
pub mod error;
pub mod intern;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod render;
pub mod scope;
pub mod suggest;
pub mod token;
pub mod typeval;

#[cfg(feature = "cli")]
pub mod cli;
