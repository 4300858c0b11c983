//! Convenient re-exports for typical usage
//!
//! ```rust
//! use cellscript::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! let result = sheet.submit("A1 :: 6*7");
//! assert_eq!(result.value(), 42.0);
//! ```

pub use crate::error::{Error, Result};
pub use crate::sheet::{compile, Compilation, Sheet};
pub use cellscript_compiler::CompilerOptions;
pub use cellscript_core::{Diagnostic, Severity, SourceText, Span};
