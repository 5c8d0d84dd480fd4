use std::fmt;
use std::str::FromStr;

use crate::error::TraceError;

/// The four trace modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceMode {
  /// Descendant-only report rooted at the queried instance.
  Children,
  /// CHILDREN run from the queried instance's oldest ancestor.
  Complete,
  /// Ancestor listing followed by the CHILDREN report.
  Relatives,
  /// One composite tree with spawned instances attached in place.
  Combined,
}

impl FromStr for TraceMode {
  type Err = TraceError;

  /// Parse a mode token, case-insensitively.
  fn from_str(token: &str) -> Result<Self, Self::Err> {
    match token.to_ascii_uppercase().as_str() {
      "CHILDREN" => Ok(Self::Children),
      "COMPLETE" => Ok(Self::Complete),
      "RELATIVES" => Ok(Self::Relatives),
      "COMBINED" => Ok(Self::Combined),
      _ => Err(TraceError::InvalidMode {
        token: token.to_string(),
      }),
    }
  }
}

impl fmt::Display for TraceMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Children => "CHILDREN",
      Self::Complete => "COMPLETE",
      Self::Relatives => "RELATIVES",
      Self::Combined => "COMBINED",
    };
    f.write_str(name)
  }
}
