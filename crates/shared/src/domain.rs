use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);
    };
}

id_newtype!(SubmissionId);

impl SubmissionId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why the traveller is going. Sent to the planning service as the lowercase literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    #[default]
    Business,
    Romantic,
    Solo,
    Friends,
    Family,
}

impl Reason {
    pub const ALL: [Reason; 5] = [
        Reason::Business,
        Reason::Romantic,
        Reason::Solo,
        Reason::Friends,
        Reason::Family,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Reason::Business => "business",
            Reason::Romantic => "romantic",
            Reason::Solo => "solo",
            Reason::Friends => "friends",
            Reason::Family => "family",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Reason::Business => "Business",
            Reason::Romantic => "Romantic",
            Reason::Solo => "Solo",
            Reason::Friends => "Friends",
            Reason::Family => "Family",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
