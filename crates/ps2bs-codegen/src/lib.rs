//! Generator for `ps2bs_gen.go`, a Go file of pointer helpers for built-in
//! and standard library types.

pub mod error;
pub mod format;
pub mod generator;
pub mod naming;
pub mod resolver;

pub use error::{Error, Result};
pub use format::{CanonicalFormatter, GofmtFormatter, SourceFormatter};
pub use generator::{generate, output_path, render, GenerationContext, Generated, Options};
pub use naming::{OUTPUT_FILE_NAME, TYPES};
pub use resolver::{resolve, ResolvedPackage};
