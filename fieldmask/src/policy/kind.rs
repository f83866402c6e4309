//! Mask-kind tokens used in field templates.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Category of sensitive value, selecting which masker a field goes through.
///
/// Tokens are matched exactly (lower case) against the values of a
/// `maskingTemplate` configuration object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskKind {
    /// Show the outer thirds and mask the middle.
    Default,
    /// Identity card numbers.
    IdCard,
    /// Personal names.
    Name,
    /// Phone and mobile numbers.
    Phone,
    /// Replace with an empty string.
    Blank,
}

impl MaskKind {
    pub const ALL: [MaskKind; 5] = [
        MaskKind::Default,
        MaskKind::IdCard,
        MaskKind::Name,
        MaskKind::Phone,
        MaskKind::Blank,
    ];

    /// Returns the configuration token for this kind.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            MaskKind::Default => "default",
            MaskKind::IdCard => "idcard",
            MaskKind::Name => "name",
            MaskKind::Phone => "phone",
            MaskKind::Blank => "blank",
        }
    }

    /// Parses a configuration token. Unknown tokens yield `None`.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.token() == token)
    }
}

impl fmt::Display for MaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Error returned when a string is not one of the known mask-kind tokens.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown mask kind `{0}`")]
pub struct UnknownMaskKind(pub String);

impl FromStr for MaskKind {
    type Err = UnknownMaskKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| UnknownMaskKind(s.to_string()))
    }
}
