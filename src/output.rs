//! CLI output formatting for the build summary.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (section, article) is its semantic identity: reading
//! position and title. Filesystem paths are secondary context on indented
//! `Source:` lines, so the summary reads as a table of contents while still
//! letting users trace entries back to specific files.
//!
//! # Entity Display Contract
//!
//! 1. **Header line**: playorder + title (+ article count for sections)
//! 2. **Context lines**: indented `Source:`, `Author:`, description preview,
//!    image count
//!
//! # Output Format
//!
//! ```text
//! Sections
//! 001 Front Page (2 articles)
//!     Source: sections/000/
//!     002 Council Approves Harbour Plan
//!         Source: sections/000/000.html
//!         Author: Dana Reyes
//!         The waterfront redevelopment clears its final vote.
//!         Images: 1
//!     003 (001.html)
//!
//! Package
//!     folio.opf
//!     nav-contents.ncx
//!     contents.html
//!
//! Built 2 sections, 3 articles, 2 images → evening-edition.mobi
//! ```
//!
//! # Architecture
//!
//! [`format_document_output`] returns `Vec<String>` for testability and
//! [`print_document_output`] writes it to stdout. Formatting is pure: no I/O,
//! no side effects.

use crate::article::{Article, NO_TITLE};
use crate::document::{CONTENTS_FILE, Document, ItemKind, NCX_FILE, OPF_FILE};
use crate::shorten::shorten;

/// Longest description preview shown under an article.
const DESCRIPTION_PREVIEW: usize = 60;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a reading position as 3-digit zero-padded.
fn format_index(pos: u32) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format a section header: playorder + title + article count.
///
/// ```text
/// 001 Front Page (2 articles)
/// 004 Letters (1 article)
/// ```
fn section_header(playorder: u32, title: &str, articles: usize) -> String {
    let noun = if articles == 1 { "article" } else { "articles" };
    format!("{} {} ({} {})", format_index(playorder), title, articles, noun)
}

/// Format an article line: titled articles show title, untitled show the
/// file name in parens.
///
/// ```text
/// 002 Council Approves Harbour Plan   // titled
/// 003 (001.html)                      // untitled, file name IS the identity
/// ```
fn article_line(article: &Article) -> String {
    if article.title == NO_TITLE {
        format!("{} ({})", format_index(article.playorder), article.file_name)
    } else {
        format!("{} {}", format_index(article.playorder), article.title)
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}

// ============================================================================
// Build summary
// ============================================================================

/// Format the assembled document as a reading-order inventory.
pub fn format_document_output(doc: &Document) -> Vec<String> {
    let mut lines = vec!["Sections".to_string()];

    for section in &doc.sections {
        lines.push(section_header(
            section.playorder,
            &section.title,
            section.articles.len(),
        ));
        lines.push(format!("{}Source: {}/", indent(1), section.path));

        for article in &section.articles {
            lines.push(format!("{}{}", indent(1), article_line(article)));
            if article.title != NO_TITLE {
                lines.push(format!("{}Source: {}", indent(2), article.file));
            }
            if let Some(author) = &article.author {
                lines.push(format!("{}Author: {}", indent(2), author));
            }
            if let Some(desc) = &article.description {
                let preview = shorten(desc.trim(), DESCRIPTION_PREVIEW);
                if !preview.is_empty() {
                    lines.push(format!("{}{}", indent(2), preview));
                }
            }
            if !article.images.is_empty() {
                lines.push(format!("{}Images: {}", indent(2), article.images.len()));
            }
        }
    }

    lines.push(String::new());
    lines.push("Package".to_string());
    for file in [OPF_FILE, NCX_FILE, CONTENTS_FILE] {
        lines.push(format!("{}{}", indent(1), file));
    }

    lines.push(String::new());
    lines.push(format!(
        "Built {}, {}, {} \u{2192} {}",
        plural(doc.sections.len(), "section", "sections"),
        plural(doc.articles().count(), "article", "articles"),
        plural(doc.items_of(ItemKind::Image).count(), "image", "images"),
        doc.output_filename
    ));

    lines
}

/// Print the build summary to stdout.
pub fn print_document_output(doc: &Document) {
    for line in format_document_output(doc) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::Image;
    use crate::config::{CompilerConfig, DocumentConfig};
    use crate::ids::IdScheme;
    use crate::section::Section;

    fn article(playorder: u32, title: &str, file_name: &str) -> Article {
        let file = format!("sections/000/{}", file_name);
        Article {
            href: file.clone(),
            file,
            file_name: file_name.to_string(),
            title: title.to_string(),
            short_title: title.to_string(),
            author: None,
            description: None,
            playorder,
            idref: format!("item-{:03}", playorder),
            images: Vec::new(),
        }
    }

    fn section(playorder: u32, title: &str, articles: Vec<Article>) -> Section {
        Section {
            path: "sections/000".to_string(),
            title: title.to_string(),
            playorder,
            idref: format!("item-{:03}", playorder),
            href: "sections/000/section.html".to_string(),
            articles,
        }
    }

    fn document(sections: Vec<Section>) -> Document {
        let config = DocumentConfig {
            output_filename: "paper.mobi".to_string(),
            idref_scheme: IdScheme::Sequential,
            compiler: CompilerConfig::default(),
            extra: toml::Table::new(),
        };
        Document::from_sections(sections, &config)
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1234), "1234");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn section_header_singular_and_plural() {
        assert_eq!(section_header(1, "Front", 2), "001 Front (2 articles)");
        assert_eq!(section_header(4, "Letters", 1), "004 Letters (1 article)");
        assert_eq!(section_header(7, "Empty", 0), "007 Empty (0 articles)");
    }

    #[test]
    fn article_line_titled() {
        let a = article(2, "Harbour Plan", "000.html");
        assert_eq!(article_line(&a), "002 Harbour Plan");
    }

    #[test]
    fn article_line_untitled_shows_file_name() {
        let a = article(3, NO_TITLE, "001.html");
        assert_eq!(article_line(&a), "003 (001.html)");
    }

    // =========================================================================
    // Summary tests
    // =========================================================================

    #[test]
    fn summary_lists_sections_and_articles() {
        let mut first = article(2, "Harbour Plan", "000.html");
        first.author = Some("Dana Reyes".to_string());
        first.images = vec![Image {
            href: Some("images/cover.png".to_string()),
            media_type: Some("image/png".to_string()),
            idref: None,
        }];
        let second = article(3, NO_TITLE, "001.html");
        let doc = document(vec![section(1, "Front Page", vec![first, second])]);

        let lines = format_document_output(&doc);
        assert_eq!(
            lines,
            vec![
                "Sections",
                "001 Front Page (2 articles)",
                "    Source: sections/000/",
                "    002 Harbour Plan",
                "        Source: sections/000/000.html",
                "        Author: Dana Reyes",
                "        Images: 1",
                "    003 (001.html)",
                "",
                "Package",
                "    folio.opf",
                "    nav-contents.ncx",
                "    contents.html",
                "",
                "Built 1 section, 2 articles, 1 image \u{2192} paper.mobi",
            ]
        );
    }

    #[test]
    fn description_preview_is_shortened() {
        let mut a = article(2, "Long Read", "000.html");
        a.description = Some(
            "  A very long description that goes on and on about the council vote and beyond  "
                .to_string(),
        );
        let doc = document(vec![section(1, "Front", vec![a])]);

        let lines = format_document_output(&doc);
        assert!(lines.contains(
            &"        A very long description that goes on and on about the...".to_string()
        ));
    }

    #[test]
    fn empty_section_has_no_article_lines() {
        let doc = document(vec![section(1, "Empty", vec![])]);
        let lines = format_document_output(&doc);
        assert_eq!(lines[1], "001 Empty (0 articles)");
        assert_eq!(lines[3], "");
        assert!(lines.last().unwrap().starts_with("Built 1 section, 0 articles, 0 images"));
    }
}
