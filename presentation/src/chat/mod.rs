//! Interactive question mode
//!
//! Provides a line-editor based loop for asking several questions in a row.

mod repl;

pub use repl::ChatRepl;
