//! Page selection: parse page-range expressions into a validated page set.
//!
//! Expressions look like `"1-5,7,10-15"`. Every selected page must lie
//! within `1..=total_pages`.

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use crate::config::Parity;
use crate::error::ParseError;

/// A range of pages (1-indexed, inclusive), validated against a page count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    /// Start page (1-indexed, inclusive).
    pub start: u32,
    /// End page (1-indexed, inclusive).
    pub end: u32,
}

impl PageRange {
    /// Parse one comma-separated part such as `"2-5"` or `"3"`.
    pub fn parse(part: &str, total_pages: u32) -> Result<Self, ParseError> {
        if part.contains('-') {
            let invalid = || ParseError::InvalidRange(part.to_string());
            let mut bounds = part.split('-');
            let (Some(start_str), Some(end_str), None) =
                (bounds.next(), bounds.next(), bounds.next())
            else {
                return Err(invalid());
            };
            let start: u32 = start_str.trim().parse().map_err(|_| invalid())?;
            let end: u32 = end_str.trim().parse().map_err(|_| invalid())?;
            if start < 1 || start > end || end > total_pages {
                return Err(invalid());
            }
            Ok(Self { start, end })
        } else {
            let page: u32 = part
                .trim()
                .parse()
                .map_err(|_| ParseError::InvalidPage(part.to_string()))?;
            if page < 1 || page > total_pages {
                return Err(ParseError::InvalidPage(part.to_string()));
            }
            Ok(Self {
                start: page,
                end: page,
            })
        }
    }

    /// Iterate over every page in the range.
    pub fn pages(self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }
}

/// A duplicate-free set of page numbers, always iterated in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSet(BTreeSet<u32>);

impl PageSet {
    /// Every page of a `total_pages`-page document.
    pub fn full(total_pages: u32) -> Self {
        Self((1..=total_pages).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, page: u32) -> bool {
        self.0.contains(&page)
    }

    pub fn first(&self) -> Option<u32> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<u32> {
        self.0.last().copied()
    }

    /// Pages in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    /// Keep only pages that pass `parity`.
    ///
    /// Fails with [`ParseError::EmptyAfterFilter`] if nothing is left.
    pub fn apply_parity(self, parity: Parity) -> Result<Self, ParseError> {
        let filtered: BTreeSet<u32> = self.0.into_iter().filter(|p| parity.keeps(*p)).collect();
        if filtered.is_empty() {
            return Err(ParseError::EmptyAfterFilter);
        }
        Ok(Self(filtered))
    }
}

impl FromIterator<u32> for PageSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Renders as an ascending comma-joined list, e.g. `1,3,5`.
impl fmt::Display for PageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, page) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{page}")?;
        }
        Ok(())
    }
}

/// Parse a page-range expression against a document of `total_pages` pages.
///
/// An empty or whitespace-only expression selects every page. Otherwise the
/// result is the union of all comma-separated parts.
pub fn select(expression: &str, total_pages: u32) -> Result<PageSet, ParseError> {
    if expression.trim().is_empty() {
        return Ok(PageSet::full(total_pages));
    }

    let mut pages = BTreeSet::new();
    for part in expression.split(',') {
        let range = PageRange::parse(part, total_pages)?;
        pages.extend(range.pages());
    }
    debug!(expression, total_pages, selected = pages.len(), "parsed page selection");
    Ok(PageSet(pages))
}

/// [`select`] followed by [`PageSet::apply_parity`].
pub fn select_with_parity(
    expression: &str,
    total_pages: u32,
    parity: Parity,
) -> Result<PageSet, ParseError> {
    select(expression, total_pages)?.apply_parity(parity)
}
