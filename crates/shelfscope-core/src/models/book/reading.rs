use serde::{Deserialize, Serialize};

/// Where a book sits in the reading lifecycle. `Unset` is the sentinel for
/// books that were never given a status; filters and stats fall back to it
/// rather than treating the field as an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadStatus {
    #[default]
    Unset,
    Unread,
    Reading,
    ReReading,
    Read,
    PartiallyRead,
    Paused,
    WontRead,
    Abandoned,
}

impl ReadStatus {
    /// Human label used in stats output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unset => "No Status",
            Self::Unread => "Unread",
            Self::Reading => "Currently Reading",
            Self::ReReading => "Re-reading",
            Self::Read => "Read",
            Self::PartiallyRead => "Partially Read",
            Self::Paused => "Paused",
            Self::WontRead => "Won't Read",
            Self::Abandoned => "Abandoned",
        }
    }
}

impl std::fmt::Display for ReadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => write!(f, "unset"),
            Self::Unread => write!(f, "unread"),
            Self::Reading => write!(f, "reading"),
            Self::ReReading => write!(f, "re_reading"),
            Self::Read => write!(f, "read"),
            Self::PartiallyRead => write!(f, "partially_read"),
            Self::Paused => write!(f, "paused"),
            Self::WontRead => write!(f, "wont_read"),
            Self::Abandoned => write!(f, "abandoned"),
        }
    }
}

impl std::str::FromStr for ReadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unset" => Ok(Self::Unset),
            "unread" => Ok(Self::Unread),
            "reading" => Ok(Self::Reading),
            "re_reading" => Ok(Self::ReReading),
            "read" => Ok(Self::Read),
            "partially_read" => Ok(Self::PartiallyRead),
            "paused" => Ok(Self::Paused),
            "wont_read" => Ok(Self::WontRead),
            "abandoned" => Ok(Self::Abandoned),
            _ => Err(format!("Invalid ReadStatus: {s}")),
        }
    }
}

/// The format a book is stored and read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookType {
    Pdf,
    Epub,
    Cbx,
}

impl std::fmt::Display for BookType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdf => write!(f, "pdf"),
            Self::Epub => write!(f, "epub"),
            Self::Cbx => write!(f, "cbx"),
        }
    }
}

impl std::str::FromStr for BookType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(Self::Pdf),
            "epub" => Ok(Self::Epub),
            "cbx" => Ok(Self::Cbx),
            _ => Err(format!("Invalid BookType: {s}")),
        }
    }
}

/// Reading position reported by one reader integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadProgress {
    /// Percentage read, 0–100.
    pub percentage: f64,
}

impl ReadProgress {
    pub fn new(percentage: f64) -> Self {
        Self { percentage }
    }
}
