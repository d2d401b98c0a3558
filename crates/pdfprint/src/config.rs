use std::fmt;
use std::str::FromStr;

/// Restricts a page selection to even- or odd-numbered pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parity {
    #[default]
    All,
    Even,
    Odd,
}

impl Parity {
    /// Whether `page` passes this filter.
    pub fn keeps(self, page: u32) -> bool {
        match self {
            Self::All => true,
            Self::Even => page % 2 == 0,
            Self::Odd => page % 2 == 1,
        }
    }
}

impl FromStr for Parity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "even" => Ok(Self::Even),
            "odd" => Ok(Self::Odd),
            _ => Err(format!("unknown page mode: {s} (expected all, even or odd)")),
        }
    }
}

/// Paper orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// The IPP `orientation-requested` enum value for this orientation.
    pub fn ipp_code(self) -> &'static str {
        match self {
            Self::Portrait => "3",
            Self::Landscape => "4",
        }
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            _ => Err(format!(
                "unknown orientation: {s} (expected portrait or landscape)"
            )),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Portrait => f.write_str("Portrait"),
            Self::Landscape => f.write_str("Landscape"),
        }
    }
}

/// Supported paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaSize {
    #[default]
    A4,
    A3,
    Letter,
    Legal,
}

impl MediaSize {
    /// Display name as shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::A3 => "A3",
            Self::Letter => "Letter",
            Self::Legal => "Legal",
        }
    }

    /// Lower-cased media keyword sent to the printing subsystem.
    pub fn keyword(self) -> String {
        self.label().to_lowercase()
    }
}

impl FromStr for MediaSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(Self::A4),
            "a3" => Ok(Self::A3),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            _ => Err(format!(
                "unknown paper size: {s} (expected A4, A3, Letter or Legal)"
            )),
        }
    }
}

impl fmt::Display for MediaSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw print settings as entered by the user, before validation.
#[derive(Debug, Clone)]
pub struct PrintRequest {
    /// Number of copies, as free text.
    pub copies: String,
    /// Page-range expression such as `"1-5,7,10-15"`. Empty selects every page.
    pub pages: String,
    pub parity: Parity,
    pub orientation: Orientation,
    pub media: MediaSize,
}

impl Default for PrintRequest {
    fn default() -> Self {
        Self {
            copies: "1".to_string(),
            pages: String::new(),
            parity: Parity::default(),
            orientation: Orientation::default(),
            media: MediaSize::default(),
        }
    }
}
