//! Parsed query representation.

/// A segment in a parsed query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches exactly one path segment with this text
    Literal(String),
    /// Matches one or more consecutive path segments
    Wildcard,
}

impl Segment {
    pub fn literal(text: impl Into<String>) -> Self {
        Segment::Literal(text.into())
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Segment::Wildcard)
    }
}

/// A complete query: an ordered, non-empty list of segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    segments: Vec<Segment>,
}

impl ParsedQuery {
    /// Creates a query from its segments.
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn has_wildcard(&self) -> bool {
        self.segments.iter().any(Segment::is_wildcard)
    }
}

impl std::fmt::Display for ParsedQuery {
    /// Renders the query back into its dotted form, quoting literals that
    /// contain dots.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                Segment::Wildcard => f.write_str("*")?,
                Segment::Literal(text) if text.contains('.') && !text.contains('\'') => {
                    write!(f, "'{}'", text)?
                }
                Segment::Literal(text) if text.contains('.') => write!(f, "\"{}\"", text)?,
                Segment::Literal(text) => f.write_str(text)?,
            }
        }
        Ok(())
    }
}
