//! Reading order and manifest identifiers.
//!
//! Every section page and every article gets two things from the traversal:
//! a `playorder` (its position in the global reading order) and an `idref`
//! (the manifest identifier the spine and NCX point at). Images get a
//! positional `img-NNN` identifier once the global image list is known.
//!
//! ## Playorder
//!
//! A single [`Playorder`] counter is threaded by `&mut` through the whole
//! traversal: section, its articles, next section, and so on. The first
//! call to [`Playorder::advance`] returns 1, leaving 0 for the contents page.
//!
//! ## Identifier Schemes
//!
//! - [`IdScheme::Sequential`] (default): `item-NNN` from the playorder,
//!   zero-padded to three digits. Unique by construction.
//! - [`IdScheme::PathDigits`]: every digit of the relative path, prefixed
//!   with `item-`. `sections/001/002.html` → `item-001002`. Kept for trees
//!   whose custom templates hard-code those ids. Two paths that differ only
//!   in non-digit characters (`article-1.html`, `article_1.html`) collide.

use serde::{Deserialize, Serialize};

/// Monotonic reading-order counter shared across one assembly run.
#[derive(Debug, Default)]
pub struct Playorder {
    current: u32,
}

impl Playorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the counter and return the new value.
    pub fn advance(&mut self) -> u32 {
        self.current += 1;
        self.current
    }

    /// The last value handed out (0 if none yet).
    pub fn current(&self) -> u32 {
        self.current
    }
}

/// How section and article identifiers are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdScheme {
    #[default]
    Sequential,
    PathDigits,
}

impl IdScheme {
    /// Identifier for the entity at `rel_path` holding `playorder`.
    pub fn idref(self, rel_path: &str, playorder: u32) -> String {
        match self {
            IdScheme::Sequential => format!("item-{:03}", playorder),
            IdScheme::PathDigits => path_digits_idref(rel_path),
        }
    }
}

/// Position of one section or article in the reading order.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub playorder: u32,
    pub idref: String,
}

impl Placement {
    /// Take the next playorder from `counter` and derive the idref for it.
    pub fn take(counter: &mut Playorder, scheme: IdScheme, rel_path: &str) -> Self {
        let playorder = counter.advance();
        Self {
            playorder,
            idref: scheme.idref(rel_path, playorder),
        }
    }
}

/// `item-` followed by every ASCII digit in `path`, in order.
pub fn path_digits_idref(path: &str) -> String {
    let digits: String = path.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("item-{}", digits)
}

/// Positional identifier for the image at `index` in the global image list.
pub fn image_idref(index: usize) -> String {
    format!("img-{:03}", index)
}
