//! Vessel visibility.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Who can see a vessel.
///
/// A `Global` vessel is listed for every scope; a `Scoped` vessel is only listed for the
/// scope that created it. Defaults to `Scoped`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    /// Visible to every scope.
    Global,
    /// Visible to the creation scope only.
    #[default]
    Scoped,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("GLOBAL"),
            Self::Scoped => f.write_str("SCOPED"),
        }
    }
}
