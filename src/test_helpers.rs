//! Shared test utilities for the folio test suite.
//!
//! Provides fixture setup, small book-tree builders, lookup helpers and bulk
//! extractors that work with assembly data structures (`Document`,
//! `Section`, `Article`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let doc = assemble(tmp.path()).unwrap();
//!
//! let section = find_section(&doc, "Front Page");
//! let article = find_article(section, "Council Approves Harbour Plan");
//! assert_eq!(article.author.as_deref(), Some("Dana Reyes"));
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::article::Article;
use crate::config::CONFIG_FILE;
use crate::document::{CONTENTS_FILE, Document, NCX_FILE, OPF_FILE, SECTIONS_DIR};
use crate::section::{SECTION_PAGE, Section, TITLE_FILE};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/book/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/book");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Tree builders
// =========================================================================

/// Write a `_document.toml` naming `test.mobi`, followed by `extra` lines.
pub fn write_config(root: &Path, extra: &str) {
    let content = format!("output_filename = \"test.mobi\"\n{extra}");
    fs::write(root.join(CONFIG_FILE), content).unwrap();
}

/// Create `sections/<name>/` with a title file and the given articles.
pub fn write_section(root: &Path, name: &str, title: &str, articles: &[(&str, String)]) -> PathBuf {
    let dir = root.join(SECTIONS_DIR).join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(TITLE_FILE), title).unwrap();
    for (file, html) in articles {
        fs::write(dir.join(file), html).unwrap();
    }
    dir
}

/// Minimal article markup with a `<title>` and the given body.
pub fn article_html(title: &str, body: &str) -> String {
    format!("<html><head><title>{title}</title></head><body>{body}</body></html>")
}

// =========================================================================
// Document lookups (panic with a clear message on miss)
// =========================================================================

/// Find a section by title. Panics if not found.
pub fn find_section<'a>(doc: &'a Document, title: &str) -> &'a Section {
    doc.sections
        .iter()
        .find(|s| s.title == title)
        .unwrap_or_else(|| {
            let titles = section_titles(doc);
            panic!("section '{title}' not found. Available: {titles:?}")
        })
}

/// Find an article by title within a section. Panics if not found.
pub fn find_article<'a>(section: &'a Section, title: &str) -> &'a Article {
    section
        .articles
        .iter()
        .find(|a| a.title == title)
        .unwrap_or_else(|| {
            let titles = article_titles(section);
            panic!(
                "article '{title}' not found in section '{}'. Available: {titles:?}",
                section.title
            )
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All section titles in document order.
pub fn section_titles(doc: &Document) -> Vec<&str> {
    doc.sections.iter().map(|s| s.title.as_str()).collect()
}

/// All article titles in section order.
pub fn article_titles(section: &Section) -> Vec<&str> {
    section.articles.iter().map(|a| a.title.as_str()).collect()
}

/// Playorders in traversal order: each section, then its articles.
pub fn playorders(doc: &Document) -> Vec<u32> {
    doc.sections
        .iter()
        .flat_map(|s| std::iter::once(s.playorder).chain(s.articles.iter().map(|a| a.playorder)))
        .collect()
}

/// `playOrder` values of a rendered NCX in document order, without the
/// contents page entry (0).
pub fn ncx_playorders(ncx: &str) -> Vec<u32> {
    const ATTR: &str = "playOrder=\"";
    ncx.match_indices(ATTR)
        .filter_map(|(start, _)| {
            let rest = &ncx[start + ATTR.len()..];
            rest[..rest.find('"')?].parse().ok()
        })
        .filter(|order| *order != 0)
        .collect()
}

/// Contents of every generated file, keyed by path relative to `root`.
pub fn snapshot_outputs(root: &Path) -> Vec<(String, String)> {
    let mut files: Vec<PathBuf> = [OPF_FILE, NCX_FILE, CONTENTS_FILE]
        .iter()
        .map(|f| root.join(f))
        .collect();

    let mut section_dirs: Vec<PathBuf> = fs::read_dir(root.join(SECTIONS_DIR))
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.is_dir())
        .collect();
    section_dirs.sort();
    files.extend(section_dirs.iter().map(|d| d.join(SECTION_PAGE)));

    files
        .iter()
        .map(|path| {
            let rel = path.strip_prefix(root).unwrap().to_string_lossy().into_owned();
            let content = fs::read_to_string(path)
                .unwrap_or_else(|e| panic!("{} not readable: {e}", path.display()));
            (rel, content)
        })
        .collect()
}
