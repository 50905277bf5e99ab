//! Rendering and writing of the pointer helper file.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::format::SourceFormatter;
use crate::naming::{first_as_lower, qualifier, simple_name, title_case, OUTPUT_FILE_NAME, TYPES};
use crate::resolver::{resolve, ResolvedPackage};

/// Options for a single generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Destination directory.
    pub directory: PathBuf,
    /// Generate exported names with doc comments.
    pub exported: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            exported: false,
        }
    }
}

/// Everything the renderer needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationContext {
    pub package_name: String,
    pub is_library: bool,
    pub is_exported: bool,
    pub types: &'static [&'static str],
}

impl GenerationContext {
    /// Build the context for the fixed type list.
    pub fn new(package: &ResolvedPackage, exported: bool) -> Self {
        Self {
            package_name: package.name.clone(),
            is_library: !package.already_existed,
            is_exported: exported,
            types: TYPES,
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct Generated {
    /// Path of the written file.
    pub path: PathBuf,
    /// Package the file was generated into.
    pub package: ResolvedPackage,
    /// Bytes written to `path`.
    pub source: String,
}

/// Render the Go source for `ctx`.
pub fn render(ctx: &GenerationContext) -> Result<String> {
    let mut out = String::new();

    writeln!(
        out,
        "// This file is generated and should not be modified directly."
    )?;
    writeln!(
        out,
        "// Regenerate using ps2bs: '{}'",
        regenerate_command(ctx.is_exported)
    )?;
    writeln!(out)?;

    if ctx.is_library {
        writeln!(
            out,
            "// Package {} provides functions which return pointers to",
            ctx.package_name
        )?;
        writeln!(
            out,
            "// built-ins and other commonly used standard library types."
        )?;
    }
    writeln!(out, "package {}", ctx.package_name)?;

    let imports: BTreeSet<&str> = ctx.types.iter().filter_map(|ty| qualifier(ty)).collect();
    match imports.len() {
        0 => {}
        1 => {
            writeln!(out)?;
            for path in &imports {
                writeln!(out, "import \"{path}\"")?;
            }
        }
        _ => {
            writeln!(out)?;
            writeln!(out, "import (")?;
            for path in &imports {
                writeln!(out, "\t\"{path}\"")?;
            }
            writeln!(out, ")")?;
        }
    }

    let prefix = if ctx.is_exported { "To" } else { "to" };
    for ty in ctx.types {
        let name = simple_name(ty);
        let func = format!("{prefix}{}", title_case(name));
        let param = first_as_lower(name);

        writeln!(out)?;
        if ctx.is_exported {
            writeln!(out, "// {func} returns a pointer to the type '{ty}'.")?;
        }
        writeln!(out, "func {func}({param} {ty}) *{ty} {{")?;
        writeln!(out, "\treturn &{param}")?;
        writeln!(out, "}}")?;
    }

    Ok(out)
}

fn regenerate_command(exported: bool) -> &'static str {
    if exported {
        "ps2bs -e"
    } else {
        "ps2bs"
    }
}

/// Resolve, render, format and write the helper file.
///
/// The file is only written once rendering and formatting have both
/// succeeded, so a failed run leaves the directory untouched.
pub fn generate(options: &Options, formatter: &dyn SourceFormatter) -> Result<Generated> {
    let package = resolve(&options.directory)?;
    let ctx = GenerationContext::new(&package, options.exported);

    let raw = render(&ctx)?;
    debug!(bytes = raw.len(), functions = ctx.types.len(), "Rendered source");

    let source = formatter.format(&raw)?;
    let path = output_path(&options.directory);
    std::fs::write(&path, &source)?;

    info!(
        file = %path.display(),
        package = %package.name,
        library = ctx.is_library,
        exported = ctx.is_exported,
        "Generated pointer helpers"
    );

    Ok(Generated {
        path,
        package,
        source,
    })
}

/// Where the generated file lands inside `dir`.
pub fn output_path(dir: &Path) -> PathBuf {
    dir.join(OUTPUT_FILE_NAME)
}
