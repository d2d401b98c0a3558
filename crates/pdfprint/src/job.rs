//! Print job assembly: turn validated user input into the options record
//! handed to the printing subsystem.

use crate::config::{MediaSize, Orientation};
use crate::error::ValidationError;
use crate::pages::PageSet;

/// Title attached to every submitted job.
pub const JOB_TITLE: &str = "PDF Print";

/// Normalized parameters for a single print job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    /// Number of copies, always at least 1.
    pub copies: u32,
    /// Selected pages, never empty.
    pub pages: PageSet,
    pub orientation: Orientation,
    pub media: MediaSize,
}

impl PrintOptions {
    /// Ascending comma-joined page list, e.g. `"1,3,5"`.
    pub fn page_ranges(&self) -> String {
        self.pages.to_string()
    }

    /// Options in the key/value form the printing subsystem expects.
    pub fn to_cups_options(&self) -> Vec<(&'static str, String)> {
        vec![
            ("copies", self.copies.to_string()),
            ("page-ranges", self.page_ranges()),
            ("orientation-requested", self.orientation.ipp_code().to_string()),
            ("media", self.media.keyword()),
        ]
    }
}

/// Build a [`PrintOptions`] record from raw copies text and a page selection.
pub fn build(
    copies: &str,
    pages: PageSet,
    orientation: Orientation,
    media: MediaSize,
) -> Result<PrintOptions, ValidationError> {
    let copies = parse_copies(copies)?;
    if pages.is_empty() {
        return Err(ValidationError::NoPages);
    }
    Ok(PrintOptions {
        copies,
        pages,
        orientation,
        media,
    })
}

fn parse_copies(text: &str) -> Result<u32, ValidationError> {
    match text.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ValidationError::InvalidCopies(text.to_string())),
    }
}
