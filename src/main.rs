use clap::Parser;
use folio::compiler::{self, CompilerError};
use folio::config::{self, ConfigError};
use folio::document::{self, BuildError};
use folio::output;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Build Kindle periodicals from directories of HTML articles")]
#[command(long_about = "\
Build Kindle periodicals from directories of HTML articles

Your filesystem is the data source. Directories under sections/ become
sections, the HTML files inside them become articles, and each article's
<head> supplies its title, author and description.

Book structure:

  book/
  ├── _document.toml               # output_filename (required) + metadata for templates
  ├── templates/                   # Optional overrides: opf, ncx, contents, section (.jinja)
  └── sections/
      ├── 000/                     # Sections are built in directory name order
      │   ├── _section.txt         # Section title
      │   ├── 000.html             # Articles, in file name order
      │   └── 001.html
      └── 001/
          ├── _section.txt
          └── 000.html

Generated files: folio.opf, nav-contents.ncx, contents.html and
sections/*/section.html. The periodical itself is compiled by kindlegen
(or [compiler] program), which must be on PATH.

Set RUST_LOG=folio=debug for per-article logging.")]
#[command(version)]
struct Cli {
    /// Book directory
    #[arg(default_value = ".")]
    dir: PathBuf,
}

#[derive(Error, Debug)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Compiler(#[from] CompilerError),
}

impl RunError {
    fn exit_code(&self) -> ExitCode {
        match self {
            RunError::Compiler(err) => ExitCode::from(compiler::cli_exit_code(err.exit_code())),
            _ => ExitCode::FAILURE,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(&cli.dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            if matches!(err, RunError::Config(ConfigError::Missing(_))) {
                eprintln!("Run 'folio --help' to see the expected book layout.");
            }
            err.exit_code()
        }
    }
}

fn run(dir: &Path) -> Result<(), RunError> {
    let config = config::load_config(dir)?;
    compiler::ensure_available(&config.compiler)?;

    println!("==> Assembling {}", dir.display());
    let doc = document::assemble_with(dir, &config)?;
    output::print_document_output(&doc);

    println!("==> Compiling {}", doc.output_filename);
    compiler::invoke(dir, &doc, &config.compiler)?;

    println!("==> Build complete: {}", dir.join(&doc.output_filename).display());
    Ok(())
}

/// Log to stderr so the summary on stdout stays clean. `RUST_LOG` overrides
/// the default filter.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("folio=info"));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
