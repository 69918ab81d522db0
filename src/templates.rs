//! Template lookup and rendering.
//!
//! Four templates produce every generated file:
//!
//! | Template | Context | Output |
//! |----------|---------|--------|
//! | `opf` | [`Document`](crate::document::Document) | `folio.opf` |
//! | `ncx` | `Document` | `nav-contents.ncx` |
//! | `contents` | `Document` | `contents.html` |
//! | `section` | [`Section`](crate::section::Section) | `sections/*/section.html` |
//!
//! ## Overrides
//!
//! A book can replace any of them by shipping `templates/<name>.jinja` next
//! to its `_document.toml`. [`resolve_template`] is the single place that
//! decides between the override and the default compiled into the binary.
//!
//! ## Escaping
//!
//! Templates are rendered with [MiniJinja](https://docs.rs/minijinja) with
//! auto-escaping off. Every value the bundled templates print goes through
//! the `xml` filter, which escapes `& < > " '` and nothing else. MiniJinja's
//! own `| e` also escapes `/`, which would mangle every href in the OPF and
//! NCX. Custom templates should use `| xml` the same way.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Directory inside a book that holds template overrides.
pub const TEMPLATE_DIR: &str = "templates";
/// File extension of template files.
pub const TEMPLATE_EXTENSION: &str = "jinja";
/// Filter registered for XML text and attribute values.
pub const XML_FILTER: &str = "xml";

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to read template {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid {name} template: {source}")]
    Syntax {
        name: &'static str,
        source: minijinja::Error,
    },
    #[error("Failed to render {name} template: {source}")]
    Render {
        name: &'static str,
        source: minijinja::Error,
    },
}

/// The four templates a build renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Opf,
    Ncx,
    Contents,
    Section,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 4] = [
        TemplateKind::Opf,
        TemplateKind::Ncx,
        TemplateKind::Contents,
        TemplateKind::Section,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TemplateKind::Opf => "opf",
            TemplateKind::Ncx => "ncx",
            TemplateKind::Contents => "contents",
            TemplateKind::Section => "section",
        }
    }

    fn bundled(self) -> &'static str {
        match self {
            TemplateKind::Opf => include_str!("../templates/opf.jinja"),
            TemplateKind::Ncx => include_str!("../templates/ncx.jinja"),
            TemplateKind::Contents => include_str!("../templates/contents.jinja"),
            TemplateKind::Section => include_str!("../templates/section.jinja"),
        }
    }

    /// Path an override for this template would live at.
    pub fn custom_path(self, root: &Path) -> PathBuf {
        root.join(TEMPLATE_DIR)
            .join(format!("{}.{}", self.name(), TEMPLATE_EXTENSION))
    }
}

/// Where a resolved template came from.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateOrigin {
    Custom(PathBuf),
    Bundled,
}

/// Template source text plus its origin.
#[derive(Debug, Clone)]
pub struct ResolvedTemplate {
    pub kind: TemplateKind,
    pub origin: TemplateOrigin,
    pub source: String,
}

/// Pick the override under `<root>/templates/` if present, else the default.
pub fn resolve_template(root: &Path, kind: TemplateKind) -> Result<ResolvedTemplate, TemplateError> {
    let custom = kind.custom_path(root);
    if custom.is_file() {
        let source = fs::read_to_string(&custom).map_err(|source| TemplateError::Read {
            path: custom.clone(),
            source,
        })?;
        return Ok(ResolvedTemplate {
            kind,
            origin: TemplateOrigin::Custom(custom),
            source,
        });
    }
    Ok(ResolvedTemplate {
        kind,
        origin: TemplateOrigin::Bundled,
        source: kind.bundled().to_string(),
    })
}

/// All four templates, resolved and compiled once per build.
pub struct Templates {
    env: minijinja::Environment<'static>,
}

impl Templates {
    /// Resolve and compile every template for the book at `root`.
    pub fn load(root: &Path) -> Result<Self, TemplateError> {
        let mut env = minijinja::Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        env.add_filter(XML_FILTER, |value: minijinja::Value| {
            xml_escape(&value.to_string())
        });

        for kind in TemplateKind::ALL {
            let resolved = resolve_template(root, kind)?;
            if let TemplateOrigin::Custom(path) = &resolved.origin {
                info!("Using custom template {}", path.display());
            }
            let name = resolved.kind.name();
            env.add_template_owned(name, resolved.source)
                .map_err(|source| TemplateError::Syntax { name, source })?;
        }
        Ok(Self { env })
    }

    /// Render `kind` with `context`.
    pub fn render<S: Serialize>(&self, kind: TemplateKind, context: &S) -> Result<String, TemplateError> {
        let render_err = |source| TemplateError::Render {
            name: kind.name(),
            source,
        };
        let template = self.env.get_template(kind.name()).map_err(render_err)?;
        template.render(context).map_err(render_err)
    }
}

/// Escape `value` for XML text or a quoted attribute. Slashes are kept.
pub fn xml_escape(value: &str) -> String {
    quick_xml::escape::escape(value).into_owned()
}
