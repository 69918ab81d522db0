//! Article metadata extraction.
//!
//! Each HTML file inside a section directory is one article. Its markup is
//! the only metadata source:
//!
//! | Field | Source | Fallback |
//! |-------|--------|----------|
//! | title | text of the first `html > head > title` | `"no title"` |
//! | author | `content` of the first `meta[name="author"]` | none |
//! | description | `content` of the first `meta[name="description"]` | none |
//! | images | every `img`, in document order | empty |
//!
//! Extraction is a pure function of the markup, the file's path and the
//! [`Placement`] the section builder assigned. Reading the file is the
//! caller's job.

use crate::ids::Placement;
use crate::shorten::shorten;
use scraper::{Html, Selector};
use serde::Serialize;
use std::path::Path;
use std::sync::LazyLock;

/// Title used when an article has no (or an empty) `<title>`.
pub const NO_TITLE: &str = "no title";

/// Maximum length of [`Article::short_title`] before the ellipsis.
pub const SHORT_TITLE_MAX: usize = 60;

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("html > head > title").expect("static selector"));
static AUTHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="author"]"#).expect("static selector"));
static DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="description"]"#).expect("static selector"));
static IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("static selector"));

/// One content file of a section.
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    /// Source path relative to the book directory.
    pub file: String,
    /// Same as `file`; the manifest and NCX link to the source directly.
    pub href: String,
    /// Last path component, for links from the section page next to it.
    pub file_name: String,
    pub title: String,
    pub short_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub playorder: u32,
    pub idref: String,
    pub images: Vec<Image>,
}

/// An `<img>` reference found in an article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    /// The `src` attribute, absent for a malformed `<img>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// `image/<extension>` of the href.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Positional `img-NNN` id. Only set on the copies in the book-wide
    /// image list built by the document assembler.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idref: Option<String>,
}

impl Image {
    fn from_src(src: Option<&str>) -> Self {
        Self {
            href: src.map(String::from),
            media_type: src.map(image_media_type),
            idref: None,
        }
    }
}

/// `image/` followed by the href's extension, without the dot.
///
/// The extension is taken verbatim (`photo.JPG` → `image/JPG`) and an href
/// with no extension yields a bare `image/`. A query string or fragment is
/// not part of the extension (`pic.png?w=1` → `image/png`).
pub fn image_media_type(href: &str) -> String {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    let ext = Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("image/{}", ext)
}

/// Build an [`Article`] from its markup.
pub fn extract(html: &str, file: &str, placement: Placement) -> Article {
    let doc = Html::parse_document(html);

    let title = doc
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let author = meta_content(&doc, &AUTHOR);
    let description = meta_content(&doc, &DESCRIPTION);

    let images = doc
        .select(&IMG)
        .map(|img| Image::from_src(img.value().attr("src")))
        .collect();

    let file_name = Path::new(file)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Article {
        file: file.to_string(),
        href: file.to_string(),
        file_name,
        short_title: shorten(&title, SHORT_TITLE_MAX),
        title,
        author,
        description,
        playorder: placement.playorder,
        idref: placement.idref,
        images,
    }
}

fn meta_content(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(String::from)
}
