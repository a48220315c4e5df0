//! JWT header wire type.

use serde::{Deserialize, Serialize};

/// JWT header structure.
///
/// Fixed at strategy construction time; encoded once and pinned on every
/// verification by exact string comparison of the encoded form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Algorithm used for signing ("HS256" or "RS256").
    pub alg: String,
    /// Token type (always "JWT").
    pub typ: String,
}

impl Header {
    /// Create a new header for the given algorithm.
    #[must_use]
    pub fn new(alg: &str) -> Self {
        Self {
            alg: alg.to_string(),
            typ: "JWT".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_alg_then_typ() {
        let json = serde_json::to_string(&Header::new("HS256")).unwrap();
        assert_eq!(json, r#"{"alg":"HS256","typ":"JWT"}"#);
    }
}
