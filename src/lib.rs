//! # Folio
//!
//! Builds Kindle periodicals from a directory of HTML articles. Your
//! filesystem is the data source: directories under `sections/` become
//! sections, the HTML files inside them become articles, and their `<head>`
//! supplies titles, authors and descriptions.
//!
//! # Architecture: Assemble, Then Compile
//!
//! ```text
//! 1. Assemble  book/  →  folio.opf, nav-contents.ncx, contents.html,
//!                        sections/*/section.html
//! 2. Compile   folio.opf  →  <output_filename>   (external kindlegen)
//! ```
//!
//! Assembly is the interesting part and is entirely in-process. Compilation
//! is a single child process run in the book directory.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`document`] | Top-level assembly: sections in order, manifest, spine, package files |
//! | [`section`] | One section directory: title file, article files, `section.html` |
//! | [`article`] | Metadata extraction from one article's markup |
//! | [`ids`] | Playorder counter and identifier schemes |
//! | [`shorten`] | Word-boundary title truncation |
//! | [`templates`] | Custom-then-bundled template resolution and rendering |
//! | [`config`] | `_document.toml` loading and validation |
//! | [`compiler`] | External compiler discovery and invocation |
//! | [`output`] | CLI summary formatting |
//!
//! # Design Decisions
//!
//! ## One Counter, Threaded Explicitly
//!
//! Reading order is a single [`ids::Playorder`] passed by `&mut` through the
//! traversal. Section builds can be tested in isolation by handing them a
//! fresh counter; there is no global state to reset between tests.
//!
//! ## Sequential Identifiers
//!
//! Manifest ids default to `item-NNN` from the playorder, which is unique by
//! construction. Deriving ids from the digits in a file's path is still
//! available (`idref_scheme = "path-digits"`) for trees whose custom
//! templates depend on it; collisions are then logged as warnings.
//!
//! ## Runtime Templates
//!
//! The four output documents are rendered with MiniJinja so a book can
//! override any of them by dropping a file into `templates/`. The defaults
//! are compiled into the binary with `include_str!`, so a stock install needs
//! no template directory.
//!
//! ## Fail Before Writing
//!
//! The configuration is loaded and the compiler is located before any
//! section is touched. A broken setup never leaves half a package behind.

pub mod article;
pub mod compiler;
pub mod config;
pub mod document;
pub mod ids;
pub mod output;
pub mod section;
pub mod shorten;
pub mod templates;

#[cfg(test)]
pub(crate) mod test_helpers;
