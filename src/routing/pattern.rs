//! Path pattern model.
//!
//! # Responsibilities
//! - Parse pattern tokens (`/literal`, `:param`, `*`, `**`) into segments
//! - Reject malformed patterns at registration time
//!
//! # Design Decisions
//! - A `PathPattern` can only be built through validating constructors,
//!   so the matcher never sees a multi wildcard in a non-terminal position
//! - Literal tokens keep their leading separator, as written by the caller

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const SEPARATOR: char = '/';
const PARAM_MARKER: char = ':';
const WILDCARD: &str = "*";
const MULTI_WILDCARD: &str = "**";

/// Errors raised while building a [`PathPattern`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// Token is not a literal, parameter or wildcard.
    #[error("invalid pattern token `{0}`")]
    InvalidToken(String),

    /// Parameter token has no name (`":"`).
    #[error("parameter at position {0} has an empty name")]
    EmptyParameter(usize),

    /// Literal token is a bare separator.
    #[error("literal at position {0} is empty")]
    EmptyLiteral(usize),

    /// Literal token spans more than one path segment.
    #[error("literal `{0}` contains an embedded separator")]
    EmbeddedSeparator(String),

    /// `**` appears before the last position.
    #[error("multi wildcard at position {position} must be the last of {len} segments")]
    NonTerminalMultiWildcard { position: usize, len: usize },

    /// The same parameter name is bound twice.
    #[error("duplicate parameter name `{0}`")]
    DuplicateParameter(String),
}

/// One token of a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches exactly one identical path segment. Stored with its separator.
    Literal(String),
    /// Matches any one path segment and binds it under the given name.
    Param(String),
    /// Matches any one path segment without binding it.
    Wildcard,
    /// Matches the rest of the path, zero or more segments.
    MultiWildcard,
}

impl Segment {
    fn parse(token: &str, position: usize) -> Result<Self, PatternError> {
        match token {
            MULTI_WILDCARD => Ok(Segment::MultiWildcard),
            WILDCARD => Ok(Segment::Wildcard),
            _ => {
                if let Some(name) = token.strip_prefix(PARAM_MARKER) {
                    if name.is_empty() {
                        return Err(PatternError::EmptyParameter(position));
                    }
                    Ok(Segment::Param(name.to_string()))
                } else if let Some(text) = token.strip_prefix(SEPARATOR) {
                    if text.is_empty() {
                        return Err(PatternError::EmptyLiteral(position));
                    }
                    if text.contains(SEPARATOR) {
                        return Err(PatternError::EmbeddedSeparator(token.to_string()));
                    }
                    Ok(Segment::Literal(token.to_string()))
                } else {
                    Err(PatternError::InvalidToken(token.to_string()))
                }
            }
        }
    }

    /// Path segment text a literal must equal (separator stripped).
    ///
    /// `None` for non-literal segments.
    pub fn literal_text(&self) -> Option<&str> {
        match self {
            Segment::Literal(literal) => Some(literal.strip_prefix(SEPARATOR).unwrap_or(literal)),
            _ => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(literal) => f.write_str(literal),
            Segment::Param(name) => write!(f, "{PARAM_MARKER}{name}"),
            Segment::Wildcard => f.write_str(WILDCARD),
            Segment::MultiWildcard => f.write_str(MULTI_WILDCARD),
        }
    }
}

/// Ordered, validated sequence of segments.
///
/// The empty pattern matches only the root path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Build a pattern from its tokens, e.g. `["/users", ":id"]`.
    pub fn new<I, S>(tokens: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments = tokens
            .into_iter()
            .enumerate()
            .map(|(position, token)| Segment::parse(token.as_ref(), position))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_segments(segments)
    }

    /// Parse the path form of a pattern, e.g. `"/users/:id"` or `"/files/**"`.
    ///
    /// Each `/`-delimited piece becomes one token; plain text becomes a literal.
    pub fn parse(path: &str) -> Result<Self, PatternError> {
        let tokens = path
            .split(SEPARATOR)
            .filter(|piece| !piece.is_empty())
            .map(|piece| {
                if piece == WILDCARD || piece == MULTI_WILDCARD || piece.starts_with(PARAM_MARKER) {
                    piece.to_string()
                } else {
                    format!("{SEPARATOR}{piece}")
                }
            });
        Self::new(tokens)
    }

    /// Validate already-built segments.
    pub fn from_segments(segments: Vec<Segment>) -> Result<Self, PatternError> {
        let len = segments.len();
        let mut names = HashSet::new();

        for (position, segment) in segments.iter().enumerate() {
            match segment {
                Segment::MultiWildcard if position + 1 != len => {
                    return Err(PatternError::NonTerminalMultiWildcard { position, len });
                }
                Segment::Param(name) if name.is_empty() => {
                    return Err(PatternError::EmptyParameter(position));
                }
                Segment::Param(name) if !names.insert(name.as_str()) => {
                    return Err(PatternError::DuplicateParameter(name.clone()));
                }
                Segment::Literal(literal) => {
                    // Re-run token validation for hand-built literals.
                    if !matches!(Segment::parse(literal, position)?, Segment::Literal(_)) {
                        return Err(PatternError::InvalidToken(literal.clone()));
                    }
                }
                _ => {}
            }
        }

        Ok(Self { segments })
    }

    /// The root pattern, matching only `/`.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True if the pattern ends with `**`.
    pub fn is_open_ended(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::MultiWildcard))
    }

    /// Names bound by this pattern, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => f.write_str(literal)?,
                other => write!(f, "{SEPARATOR}{other}")?,
            }
        }
        Ok(())
    }
}

impl FromStr for PathPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for PathPattern {
    type Error = PatternError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl<const N: usize> TryFrom<[&str; N]> for PathPattern {
    type Error = PatternError;

    fn try_from(tokens: [&str; N]) -> Result<Self, Self::Error> {
        Self::new(tokens)
    }
}
