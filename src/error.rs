use thiserror::Error;

/// Everything that can go wrong while turning a name into a [`Molecule`](crate::Molecule).
///
/// A failed parse never hands back a partial molecule; the error carries enough of the
/// offending fragment (token, element, 0-based chain position) to build a diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unrecognized token '{token}'")]
    Lexical { token: String },

    #[error("unknown numeral stem '{stem}'")]
    UnknownStem { stem: String },

    #[error("bond to {element} at position {position} would exceed its valence of {valence}")]
    ValenceExceeded {
        element: String,
        position: usize,
        valence: u8,
    },

    #[error("malformed locant list '{locants}': {reason}")]
    AmbiguousLocant { locants: String, reason: String },

    #[error("no atom at index {index}")]
    MissingAtom { index: usize },

    #[error("unknown element symbol '{symbol}'")]
    UnknownElement { symbol: String },

    #[error("{element} at position {position} carries bond order {bonds}, expected {valence}")]
    ValenceMismatch {
        element: String,
        position: usize,
        bonds: u32,
        valence: u8,
    },
}

impl ParseError {
    pub fn lexical(token: impl Into<String>) -> Self {
        Self::Lexical {
            token: token.into(),
        }
    }

    pub fn unknown_stem(stem: impl Into<String>) -> Self {
        Self::UnknownStem { stem: stem.into() }
    }

    pub fn ambiguous_locant(locants: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AmbiguousLocant {
            locants: locants.into(),
            reason: reason.into(),
        }
    }

    /// The 0-based chain position the error points at, if it has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::ValenceExceeded { position, .. } | Self::ValenceMismatch { position, .. } => {
                Some(*position)
            }
            Self::MissingAtom { index } => Some(*index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_fragment() {
        let err = ParseError::ValenceExceeded {
            element: "C".to_string(),
            position: 1,
            valence: 4,
        };
        assert_eq!(
            err.to_string(),
            "bond to C at position 1 would exceed its valence of 4"
        );
        assert_eq!(err.position(), Some(1));

        let err = ParseError::ambiguous_locant("a,b", "'a' is not a number");
        assert_eq!(
            err.to_string(),
            "malformed locant list 'a,b': 'a' is not a number"
        );
        assert_eq!(err.position(), None);
    }
}
