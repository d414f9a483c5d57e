//! Query string parser.
//!
//! A query is a dotted list of segments:
//!
//! - `foo.bar` - literal segments
//! - `'a.b'` or `"a.b"` - quoted literal, taken verbatim (no escapes)
//! - `foo\.bar` - a backslash keeps a dot inside an unquoted segment
//! - `*` - wildcard, one or more path segments
//! - `.foo` / `foo.` - leading or trailing dot, shorthand for `*.foo` / `foo.*`

use super::ast::{ParsedQuery, Segment};
use super::error::QueryError;

/// Parser for query strings.
pub struct Parser<'q> {
    input: &'q str,
    position: usize,
    /// End of the core query, before any trailing boundary dot
    end: usize,
}

impl<'q> Parser<'q> {
    /// Parses a query string into a `ParsedQuery`.
    ///
    /// # Errors
    ///
    /// Returns a `QueryError` for an empty query, an empty segment, an
    /// unterminated quote or text following a closing quote.
    pub fn parse(query: &'q str) -> Result<ParsedQuery, QueryError> {
        if query.is_empty() {
            return Err(QueryError::Empty);
        }

        let leading = query.starts_with('.');
        let start = if leading { 1 } else { 0 };
        let core = &query[start..];
        let trailing = core.ends_with('.') && !core.ends_with("\\.");
        let end = if trailing { query.len() - 1 } else { query.len() };

        let mut parser = Parser {
            input: query,
            position: start,
            end,
        };

        let mut segments = Vec::new();
        if leading {
            segments.push(Segment::Wildcard);
        }
        parser.parse_segments(&mut segments)?;
        if trailing {
            segments.push(Segment::Wildcard);
        }

        Ok(ParsedQuery::new(segments))
    }

    /// Returns the unparsed part of the core query.
    fn rest(&self) -> &'q str {
        &self.input[self.position.min(self.end)..self.end]
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Returns the next character and advances position.
    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn is_quote(ch: char) -> bool {
        ch == '\'' || ch == '"'
    }

    fn parse_segments(&mut self, segments: &mut Vec<Segment>) -> Result<(), QueryError> {
        loop {
            let segment = match self.peek() {
                None => {
                    return Err(QueryError::EmptySegment {
                        position: self.position,
                    })
                }
                Some(ch) if Self::is_quote(ch) => self.parse_quoted(ch)?,
                Some(_) => self.parse_unquoted()?,
            };
            segments.push(segment);

            match self.next() {
                None => return Ok(()),
                Some('.') => {}
                Some(found) => {
                    return Err(QueryError::TrailingAfterQuote {
                        found,
                        position: self.position - found.len_utf8(),
                    })
                }
            }
        }
    }

    /// Parses `'...'` or `"..."` up to the next matching quote.
    fn parse_quoted(&mut self, quote: char) -> Result<Segment, QueryError> {
        let open = self.position;
        self.next();

        let rest = self.rest();
        let Some(close) = rest.find(quote) else {
            return Err(QueryError::UnterminatedQuote {
                quote,
                position: open,
            });
        };

        self.position += close + quote.len_utf8();
        Ok(Segment::Literal(rest[..close].to_string()))
    }

    /// Parses up to the next unescaped dot.
    fn parse_unquoted(&mut self) -> Result<Segment, QueryError> {
        let start = self.position;
        let mut text = String::new();

        while let Some(ch) = self.peek() {
            match ch {
                '.' => break,
                '\\' if self.rest()[1..].starts_with('.') => {
                    self.next();
                    self.next();
                    text.push('.');
                }
                _ => {
                    self.next();
                    text.push(ch);
                }
            }
        }

        if text.is_empty() {
            return Err(QueryError::EmptySegment { position: start });
        }
        if &self.input[start..self.position] == "*" {
            return Ok(Segment::Wildcard);
        }
        Ok(Segment::Literal(text))
    }
}

/// Parses a query string. Shorthand for [`Parser::parse`].
pub fn parse(query: &str) -> Result<ParsedQuery, QueryError> {
    Parser::parse(query)
}
