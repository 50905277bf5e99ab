//! Package discovery for the destination directory.
//!
//! Decides which Go package owns the generated file. If the directory holds
//! no Go sources (or only our own prior output) the generated file starts a
//! new library named after the directory. Otherwise it joins the package
//! already declared there.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::naming::OUTPUT_FILE_NAME;

/// Outcome of package discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    /// Package the generated file declares.
    pub name: String,
    /// Whether the directory already held a package of its own.
    pub already_existed: bool,
}

/// Resolve the package that should own the generated file in `dir`.
pub fn resolve(dir: &Path) -> Result<ResolvedPackage> {
    let dir = std::fs::canonicalize(dir)?;
    if !dir.is_dir() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("not a directory: {}", dir.display()),
        )));
    }

    let files = go_files(&dir)?;
    let only_prior_output =
        files.len() == 1 && files[0].file_name() == Some(OsStr::new(OUTPUT_FILE_NAME));

    if files.is_empty() || only_prior_output {
        let name = dir
            .file_name()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!(
                        "cannot derive a package name from directory: {}",
                        dir.display()
                    ),
                ))
            })?;
        debug!(dir = %dir.display(), package = %name, "No existing package, starting a new library");
        return Ok(ResolvedPackage {
            name,
            already_existed: false,
        });
    }

    let name = import_dir(&dir, &files)?;
    debug!(dir = %dir.display(), package = %name, files = files.len(), "Adopting existing package");
    Ok(ResolvedPackage {
        name,
        already_existed: true,
    })
}

/// List `*.go` files directly inside `dir`, sorted by name.
fn go_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "go") {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Read the package name shared by the buildable sources in `files`.
///
/// Mirrors what `go build` considers part of the package: files starting
/// with `_` or `.` and files constrained by `ignore` are skipped, as are
/// external test packages. Our own output is skipped too so that a stale
/// generated file never conflicts with a renamed package.
fn import_dir(dir: &Path, files: &[PathBuf]) -> Result<String> {
    let mut found: Option<(String, PathBuf)> = None;

    for path in files {
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        if file_name.starts_with('_') || file_name.starts_with('.') || file_name == OUTPUT_FILE_NAME
        {
            debug!(file = ?path, "Skipping file");
            continue;
        }

        let source = String::from_utf8(std::fs::read(path)?)
            .map_err(|_| Error::package_parse(path, "source is not valid UTF-8"))?;
        if has_ignore_constraint(&source) {
            debug!(file = ?path, "Skipping file with ignore build constraint");
            continue;
        }

        let name = parse_package_clause(&source).map_err(|msg| Error::package_parse(path, msg))?;
        if file_name.ends_with("_test.go") && name.ends_with("_test") {
            continue;
        }

        match &found {
            None => found = Some((name.to_string(), path.clone())),
            Some((existing, first)) if existing != name => {
                return Err(Error::package_parse(
                    dir,
                    format!(
                        "found packages {} ({}) and {} ({})",
                        existing,
                        display_name(first),
                        name,
                        display_name(path)
                    ),
                ));
            }
            Some(_) => {}
        }
    }

    found
        .map(|(name, _)| name)
        .ok_or_else(|| Error::package_parse(dir, "no buildable Go source files"))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read the package name from the package clause of a Go source file.
pub(crate) fn parse_package_clause(source: &str) -> std::result::Result<&str, String> {
    split_package_clause(source).map(|(name, _)| name)
}

/// Split a Go source file into its package name and the text following it.
pub(crate) fn split_package_clause(source: &str) -> std::result::Result<(&str, &str), String> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let rest = skip_trivia(source)?;

    let rest = rest
        .strip_prefix("package")
        .filter(|r| r.starts_with(char::is_whitespace) || r.starts_with("/*"))
        .ok_or_else(|| "expected 'package' clause".to_string())?;
    let rest = skip_trivia(rest)?;

    let end = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    let name = &rest[..end];

    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err("expected package name after 'package'".to_string());
    }
    Ok((name, &rest[end..]))
}

/// Skip whitespace and comments.
fn skip_trivia(mut s: &str) -> std::result::Result<&str, String> {
    loop {
        s = s.trim_start();
        if let Some(rest) = s.strip_prefix("//") {
            s = rest.find('\n').map_or("", |i| &rest[i..]);
        } else if let Some(rest) = s.strip_prefix("/*") {
            let end = rest
                .find("*/")
                .ok_or_else(|| "unterminated block comment".to_string())?;
            s = &rest[end + 2..];
        } else {
            return Ok(s);
        }
    }
}

/// Whether the file header carries `//go:build ignore` or `// +build ignore`.
fn has_ignore_constraint(source: &str) -> bool {
    source
        .lines()
        .map(str::trim)
        .take_while(|line| !line.starts_with("package"))
        .any(|line| line == "//go:build ignore" || line == "// +build ignore")
}
