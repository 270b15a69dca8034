use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Marker between the location code and the stem number.
pub const STEM_MARKER: &str = "-S";

/// The stored identifier of a tree: a location code plus, for multi-stem
/// trees, the 1-based stem number.
///
/// Recomposed from scratch whenever the coordinates, precision or stem
/// count change; it has no state of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct TreeAddress {
    code: String,
    stem_index: Option<u32>,
}

impl TreeAddress {
    /// The location code part.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The 1-based stem number, for multi-stem trees.
    pub fn stem_index(&self) -> Option<u32> {
        self.stem_index
    }

    /// Splits a stored address back into its code and stem number.
    ///
    /// A trailing `-S{n}` with a positive number is read as the stem; anything
    /// else is kept as part of the code.
    ///
    /// ```
    /// use treegrid_rs::TreeAddress;
    ///
    /// let address = TreeAddress::parse("2222222-S3");
    /// assert_eq!(address.code(), "2222222");
    /// assert_eq!(address.stem_index(), Some(3));
    /// ```
    pub fn parse(s: &str) -> Self {
        let stem = s.rsplit_once(STEM_MARKER).and_then(|(code, stem)| {
            let index = stem.parse::<u32>().ok().filter(|&n| n > 0)?;
            Some((code, index))
        });

        match stem {
            Some((code, index)) => Self {
                code: code.to_string(),
                stem_index: Some(index),
            },
            None => Self {
                code: s.to_string(),
                stem_index: None,
            },
        }
    }
}

impl fmt::Display for TreeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stem_index {
            Some(index) => write!(f, "{}{}{}", self.code, STEM_MARKER, index),
            None => f.write_str(&self.code),
        }
    }
}

impl From<TreeAddress> for String {
    fn from(address: TreeAddress) -> String {
        address.to_string()
    }
}

impl From<String> for TreeAddress {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl PartialEq<str> for TreeAddress {
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<&str> for TreeAddress {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

/// Composes a tree address from a (usually shortened) code and an optional
/// 1-based stem number.
///
/// `Some(0)` is not a stem number and is dropped.
///
/// ```
/// use treegrid_rs::compose_tree_address;
///
/// assert_eq!(compose_tree_address("ABCDE12345", Some(2)), "ABCDE12345-S2");
/// assert_eq!(compose_tree_address("ABCDE12345", None), "ABCDE12345");
/// ```
pub fn compose_tree_address(code: &str, stem_index: Option<u32>) -> TreeAddress {
    let stem_index = match stem_index {
        Some(0) => {
            warn!(code, "stem numbers are 1-based, ignoring stem 0");
            None
        }
        other => other,
    };

    TreeAddress {
        code: code.to_string(),
        stem_index,
    }
}

/// Composes a tree address, numbering the stem only when the tree has more
/// than one.
pub fn compose_for_stems(code: &str, stem_index: u32, stem_count: u32) -> TreeAddress {
    if stem_count > 1 {
        compose_tree_address(code, Some(stem_index))
    } else {
        compose_tree_address(code, None)
    }
}
