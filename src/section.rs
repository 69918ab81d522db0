//! Section building.
//!
//! A section is one directory under `sections/`:
//!
//! ```text
//! sections/000/
//! ├── _section.txt     # section title (required)
//! ├── 000.html         # articles, in file name order
//! ├── 001.html
//! └── section.html     # generated by this module
//! ```
//!
//! Any file whose name contains `section` is never treated as an article, so
//! the title file and a previously generated page are skipped on rebuilds.
//! Dotfiles and subdirectories are ignored.

use crate::article::{self, Article};
use crate::document::{BuildError, write_output};
use crate::ids::{IdScheme, Placement, Playorder};
use crate::shorten::shorten;
use crate::templates::{TemplateKind, Templates};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Title file every section directory must contain.
pub const TITLE_FILE: &str = "_section.txt";
/// Generated page written into every section directory.
pub const SECTION_PAGE: &str = "section.html";
/// Files whose name contains this are not articles.
pub const EXCLUDE_MARKER: &str = "section";
/// Maximum length of [`Section::title`] before the ellipsis.
pub const SECTION_TITLE_MAX: usize = 40;

/// One section directory and its articles.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    /// Directory relative to the book root.
    pub path: String,
    /// Title from `_section.txt`, shortened.
    pub title: String,
    pub playorder: u32,
    pub idref: String,
    /// The generated `section.html`, relative to the book root.
    pub href: String,
    pub articles: Vec<Article>,
}

/// What every section build in one run shares.
pub struct BuildContext<'a> {
    pub root: &'a Path,
    pub scheme: IdScheme,
    pub templates: &'a Templates,
}

/// Build the section at `dir`, advancing `counter` once for the section and
/// once per article, and write its `section.html`.
pub fn build(
    ctx: &BuildContext<'_>,
    dir: &Path,
    counter: &mut Playorder,
) -> Result<Section, BuildError> {
    let raw_title = read_title(dir)?;
    let files = article_files(dir)?;

    let path = relative_href(ctx.root, dir);
    let placement = Placement::take(counter, ctx.scheme, &path);
    debug!(section = %path, playorder = placement.playorder, "building section");

    let mut articles = Vec::with_capacity(files.len());
    for file in &files {
        let html = read_lossy(file)?;
        let href = relative_href(ctx.root, file);
        let placement = Placement::take(counter, ctx.scheme, &href);
        let article = article::extract(&html, &href, placement);
        debug!(
            article = %href,
            playorder = article.playorder,
            title = %article.title,
            images = article.images.len(),
            "extracted article"
        );
        articles.push(article);
    }

    let section = Section {
        href: format!("{}/{}", path, SECTION_PAGE),
        path,
        title: shorten(&raw_title, SECTION_TITLE_MAX),
        playorder: placement.playorder,
        idref: placement.idref,
        articles,
    };

    let page = ctx.templates.render(TemplateKind::Section, &section)?;
    write_output(&dir.join(SECTION_PAGE), &page)?;

    Ok(section)
}

fn read_title(dir: &Path) -> Result<String, BuildError> {
    let title_path = dir.join(TITLE_FILE);
    if !title_path.is_file() {
        return Err(BuildError::MissingTitleFile(dir.to_path_buf()));
    }
    Ok(read_lossy(&title_path)?.trim().to_string())
}

/// Article files directly inside `dir`, sorted by name.
pub fn article_files(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() && is_article_name(&entry.file_name().to_string_lossy()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_article_name(name: &str) -> bool {
    !name.starts_with('.') && !name.contains(EXCLUDE_MARKER)
}

/// Read a file as UTF-8, replacing invalid sequences.
pub(crate) fn read_lossy(path: &Path) -> Result<String, BuildError> {
    let bytes = fs::read(path).map_err(|source| BuildError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// `path` relative to `root`, `/`-separated on every platform.
pub(crate) fn relative_href(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
