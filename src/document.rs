//! Document assembly.
//!
//! The top-level build step. Loads `_document.toml`, builds every section
//! under `sections/` in name order with one shared playorder counter, then
//! flattens the result into the manifest and spine the package files need.
//!
//! ## Output Files
//!
//! ```text
//! book/
//! ├── folio.opf            # package manifest (opf template)
//! ├── nav-contents.ncx     # navigation map (ncx template)
//! ├── contents.html        # table of contents (contents template)
//! └── sections/
//!     └── 000/
//!         └── section.html # one per section (section template)
//! ```
//!
//! ## Manifest Order
//!
//! Section pages and articles come first, in reading order. Images follow,
//! in the order they appear across all articles, with positional ids
//! `img-000`, `img-001`, ... Two `<img>` tags pointing at the same file
//! produce two manifest items. The same list is available to templates as
//! `images`.
//!
//! Writes are plain replace-or-create. A failure part-way leaves whatever
//! was already written in place.

use crate::article::{Article, Image};
use crate::config::{self, ConfigError, DocumentConfig};
use crate::ids::{IdScheme, Playorder, image_idref};
use crate::section::{self, BuildContext, Section};
use crate::templates::{TemplateError, TemplateKind, Templates};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Directory holding one subdirectory per section.
pub const SECTIONS_DIR: &str = "sections";
/// Package manifest handed to the compiler.
pub const OPF_FILE: &str = "folio.opf";
/// Navigation map.
pub const NCX_FILE: &str = "nav-contents.ncx";
/// Table of contents page.
pub const CONTENTS_FILE: &str = "contents.html";
/// Media type of section pages and articles.
pub const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";

const PACKAGE_OUTPUTS: [(TemplateKind, &str); 3] = [
    (TemplateKind::Opf, OPF_FILE),
    (TemplateKind::Ncx, NCX_FILE),
    (TemplateKind::Contents, CONTENTS_FILE),
];

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Missing {} in section {}", section::TITLE_FILE, .0.display())]
    MissingTitleFile(PathBuf),
    #[error("No section directories found in {}", .0.display())]
    NoSections(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to list directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("Failed to write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Everything the package templates see.
#[derive(Debug, Serialize)]
pub struct Document {
    pub sections: Vec<Section>,
    pub manifest_items: Vec<ManifestItem>,
    pub spine_items: Vec<SpineItem>,
    /// Every article's images in reading order, each with its `img-NNN` id.
    pub images: Vec<Image>,
    /// First article of the first section; absent when that section is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_article: Option<Article>,
    pub output_filename: String,
    /// Passthrough keys from `_document.toml`.
    #[serde(flatten)]
    pub extra: toml::Table,
}

/// One entry of the package manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestItem {
    /// Absent only for an `<img>` without `src`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    pub idref: String,
    pub kind: ItemKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Section,
    Article,
    Image,
}

/// One entry of the reading-order spine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpineItem {
    pub idref: String,
}

impl Document {
    /// Flatten built sections into manifest, spine, image list and
    /// first-article reference.
    pub fn from_sections(sections: Vec<Section>, config: &DocumentConfig) -> Self {
        let mut manifest_items = Vec::new();
        let mut spine_items = Vec::new();

        for section in &sections {
            manifest_items.push(ManifestItem {
                href: Some(section.href.clone()),
                media: Some(XHTML_MEDIA_TYPE.to_string()),
                idref: section.idref.clone(),
                kind: ItemKind::Section,
            });
            spine_items.push(SpineItem {
                idref: section.idref.clone(),
            });

            for article in &section.articles {
                manifest_items.push(ManifestItem {
                    href: Some(article.href.clone()),
                    media: Some(XHTML_MEDIA_TYPE.to_string()),
                    idref: article.idref.clone(),
                    kind: ItemKind::Article,
                });
                spine_items.push(SpineItem {
                    idref: article.idref.clone(),
                });
            }
        }

        let mut images = Vec::new();
        let found = sections
            .iter()
            .flat_map(|s| &s.articles)
            .flat_map(|a| &a.images);
        for (index, image) in found.enumerate() {
            let idref = image_idref(index);
            manifest_items.push(ManifestItem {
                href: image.href.clone(),
                media: image.media_type.clone(),
                idref: idref.clone(),
                kind: ItemKind::Image,
            });
            images.push(Image {
                idref: Some(idref),
                ..image.clone()
            });
        }

        let first_article = sections
            .first()
            .and_then(|s| s.articles.first())
            .cloned();

        Self {
            sections,
            manifest_items,
            spine_items,
            images,
            first_article,
            output_filename: config.output_filename.clone(),
            extra: config.template_metadata(),
        }
    }

    /// All articles in reading order.
    pub fn articles(&self) -> impl Iterator<Item = &Article> {
        self.sections.iter().flat_map(|s| &s.articles)
    }

    /// Manifest items of one kind, in manifest order.
    pub fn items_of(&self, kind: ItemKind) -> impl Iterator<Item = &ManifestItem> {
        self.manifest_items.iter().filter(move |i| i.kind == kind)
    }

    /// Idrefs that appear more than once in the spine.
    pub fn duplicate_idrefs(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut dupes = Vec::new();
        for item in &self.spine_items {
            if !seen.insert(item.idref.as_str()) && !dupes.contains(&item.idref.as_str()) {
                dupes.push(item.idref.as_str());
            }
        }
        dupes
    }

    /// Render the opf, ncx and contents templates into `root`.
    pub fn write_package(&self, root: &Path, templates: &Templates) -> Result<(), BuildError> {
        for (kind, file) in PACKAGE_OUTPUTS {
            let rendered = templates.render(kind, self)?;
            let path = root.join(file);
            write_output(&path, &rendered)?;
            info!("Wrote {}", path.display());
        }
        Ok(())
    }
}

/// Load `_document.toml` from `root` and assemble the book.
pub fn assemble(root: &Path) -> Result<Document, BuildError> {
    let config = config::load_config(root)?;
    assemble_with(root, &config)
}

/// Assemble the book at `root` with an already loaded configuration.
pub fn assemble_with(root: &Path, config: &DocumentConfig) -> Result<Document, BuildError> {
    let section_dirs = section_dirs(root)?;
    let templates = Templates::load(root)?;
    let ctx = BuildContext {
        root,
        scheme: config.idref_scheme,
        templates: &templates,
    };

    let mut counter = Playorder::new();
    let mut sections = Vec::with_capacity(section_dirs.len());
    for dir in &section_dirs {
        sections.push(section::build(&ctx, dir, &mut counter)?);
    }
    info!(
        "Assembled {} sections, {} reading-order entries",
        sections.len(),
        counter.current()
    );

    let document = Document::from_sections(sections, config);
    if config.idref_scheme == IdScheme::PathDigits {
        for idref in document.duplicate_idrefs() {
            warn!(
                idref,
                "identifier shared by several files; set idref_scheme = \"sequential\" to make ids unique"
            );
        }
    }
    if document.first_article.is_none() {
        warn!("first section has no articles; the guide will have no start reference");
    }

    document.write_package(root, &templates)?;
    Ok(document)
}

/// Section directories under `sections/`, sorted by name.
pub fn section_dirs(root: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let sections_root = root.join(SECTIONS_DIR);
    if !sections_root.is_dir() {
        return Err(BuildError::NoSections(sections_root));
    }

    let mut dirs = Vec::new();
    for entry in WalkDir::new(&sections_root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_dir() && !entry.file_name().to_string_lossy().starts_with('.') {
            dirs.push(entry.into_path());
        }
    }

    if dirs.is_empty() {
        return Err(BuildError::NoSections(sections_root));
    }
    Ok(dirs)
}

/// Replace-or-create `path` with `content`.
pub(crate) fn write_output(path: &Path, content: &str) -> Result<(), BuildError> {
    fs::write(path, content).map_err(|source| BuildError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}
