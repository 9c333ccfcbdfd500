use std::fmt;

/// Canonical session label
///
/// A subject has at most two visits. Raw data never carries these labels
/// directly: one site embeds acquisition dates in folder names, the other
/// uses `ses-01`/`ses-02` folders. Both are mapped onto this canonical set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SessionLabel {
    Session1,
    Session2,
}

impl SessionLabel {
    /// All sessions in processing order (`session-1` strictly first)
    pub const ALL: [SessionLabel; 2] = [SessionLabel::Session1, SessionLabel::Session2];

    /// Returns the canonical label string
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionLabel::Session1 => "session-1",
            SessionLabel::Session2 => "session-2",
        }
    }

    /// Returns the 1-based session ordinal
    pub fn ordinal(&self) -> usize {
        match self {
            SessionLabel::Session1 => 1,
            SessionLabel::Session2 => 2,
        }
    }

    /// Parses a canonical label from a directory name
    pub fn from_dir_name(name: &str) -> Option<Self> {
        match name {
            "session-1" => Some(SessionLabel::Session1),
            "session-2" => Some(SessionLabel::Session2),
            _ => None,
        }
    }
}

impl fmt::Display for SessionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
