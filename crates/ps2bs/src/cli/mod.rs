use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use ps2bs_codegen::{
    generate, CanonicalFormatter, GofmtFormatter, Options, SourceFormatter, OUTPUT_FILE_NAME,
};

/// Generate Go helpers that return pointers to built-in and standard library values.
#[derive(Parser, Debug)]
#[command(name = "ps2bs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Destination directory.
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Export functions (capitalized names with doc comments).
    #[arg(short = 'e', long)]
    pub exported: bool,

    /// Format with the external gofmt instead of the built-in formatter.
    #[arg(long)]
    pub gofmt: bool,

    /// Verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Execute the generation run.
    pub fn execute(self) -> Result<()> {
        let log_level = if self.verbose { "debug" } else { "warn" };
        let _ = tracing_subscriber::fmt()
            .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()))
            .with_writer(std::io::stderr)
            .try_init();

        let options = Options {
            directory: self.dir.clone(),
            exported: self.exported,
        };
        let formatter: Box<dyn SourceFormatter> = if self.gofmt {
            Box::new(GofmtFormatter::new())
        } else {
            Box::new(CanonicalFormatter)
        };

        let generated = generate(&options, formatter.as_ref()).with_context(|| {
            format!(
                "Failed to generate {} in {}",
                OUTPUT_FILE_NAME,
                self.dir.display()
            )
        })?;

        println!(
            "  {} Generated {} (package {})",
            style("✓").green(),
            style(generated.path.display()).cyan(),
            style(&generated.package.name).bold()
        );

        Ok(())
    }
}

/// Accept Go-style single-dash `-dir` flags alongside `--dir`.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-dir") => OsString::from("--dir"),
            Some(s) if s.starts_with("-dir=") => OsString::from(format!("-{s}")),
            _ => arg,
        })
        .collect()
}
