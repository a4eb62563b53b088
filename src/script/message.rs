//! Constrained ICU-like message templates.
//!
//! Supported grammar:
//!
//! - literal text, with ICU apostrophe quoting (`''` is a literal apostrophe,
//!   `'{…}'` quotes syntax characters)
//! - `{arg}` placeholders
//! - `{arg, plural, [offset:N] key {…} …}` and the same with `selectordinal`,
//!   where `key` is `zero|one|two|few|many|other` or `=<digits>`
//! - `{arg, select, key {…} …}`
//! - `#` inside a plural case body, standing for the (offset) count
//!
//! Every plural, selectordinal and select construct must have an `other`
//! case. Anything else (other argument types, missing `other`, unbalanced
//! braces) is reported as [`Error::UnsupportedMessageFormat`].

use crate::common::{Error, Result};

/// Counting mode of a plural construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralMode {
    /// `plural`
    Cardinal,
    /// `selectordinal`
    Ordinal,
}

impl PluralMode {
    /// Keyword used in message source.
    pub fn keyword(&self) -> &'static str {
        match self {
            PluralMode::Cardinal => "plural",
            PluralMode::Ordinal => "selectordinal",
        }
    }

    /// Name used in flowdoc XML.
    pub fn as_str(&self) -> &'static str {
        match self {
            PluralMode::Cardinal => "cardinal",
            PluralMode::Ordinal => "ordinal",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "cardinal" => Some(PluralMode::Cardinal),
            "ordinal" => Some(PluralMode::Ordinal),
            _ => None,
        }
    }
}

/// Case selector of a plural construct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PluralCase {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
    /// `=<digits>`; the digits are kept verbatim
    Exact(String),
}

impl PluralCase {
    /// Plural category names, in CLDR order.
    pub const CATEGORIES: [&'static str; 6] = ["zero", "one", "two", "few", "many", "other"];

    /// Parse a source key (`one`, `=3`, …).
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "zero" => Some(PluralCase::Zero),
            "one" => Some(PluralCase::One),
            "two" => Some(PluralCase::Two),
            "few" => Some(PluralCase::Few),
            "many" => Some(PluralCase::Many),
            "other" => Some(PluralCase::Other),
            _ => {
                let digits = key.strip_prefix('=')?;
                if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                    Some(PluralCase::Exact(digits.to_string()))
                } else {
                    None
                }
            },
        }
    }

    /// Category name, or `None` for an exact-value case.
    pub fn category(&self) -> Option<&'static str> {
        match self {
            PluralCase::Zero => Some("zero"),
            PluralCase::One => Some("one"),
            PluralCase::Two => Some("two"),
            PluralCase::Few => Some("few"),
            PluralCase::Many => Some("many"),
            PluralCase::Other => Some("other"),
            PluralCase::Exact(_) => None,
        }
    }

    /// Key as written in message source.
    pub fn source_key(&self) -> String {
        match self {
            PluralCase::Exact(digits) => format!("={}", digits),
            other => other.category().unwrap_or_default().to_string(),
        }
    }
}

/// Case selector of a select construct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectCase {
    When(String),
    Other,
}

impl SelectCase {
    pub fn source_key(&self) -> &str {
        match self {
            SelectCase::When(key) => key,
            SelectCase::Other => "other",
        }
    }
}

/// One token of a parsed message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageNode {
    /// Literal text (unescaped)
    Text(String),
    /// `#` inside a plural case
    Count,
    /// `{var}`
    Value { var: String },
    Plural {
        var: String,
        mode: PluralMode,
        offset: Option<u32>,
        cases: Vec<(PluralCase, Vec<MessageNode>)>,
    },
    Select {
        var: String,
        cases: Vec<(SelectCase, Vec<MessageNode>)>,
    },
}

/// A parsed message template.
///
/// # Examples
///
/// ```
/// use flowdoc::script::MessageFormat;
///
/// let source = "{n, plural, one {1 item} other {# items}}";
/// let message = MessageFormat::parse(source).unwrap();
/// assert_eq!(message.to_source(), source);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MessageFormat {
    nodes: Vec<MessageNode>,
}

impl MessageFormat {
    /// Parse message source; fails with `UnsupportedMessageFormat`.
    pub fn parse(source: &str) -> Result<Self> {
        let mut parser = Parser { src: source, pos: 0 };
        let nodes = parser.parse_nodes(false, false)?;
        Ok(Self { nodes })
    }

    #[inline]
    pub fn from_nodes(nodes: Vec<MessageNode>) -> Self {
        Self { nodes }
    }

    #[inline]
    pub fn nodes(&self) -> &[MessageNode] {
        &self.nodes
    }

    /// Render back to message source, quoting literal syntax characters.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        write_nodes(&self.nodes, false, false, &mut out);
        out
    }
}

/// Check whether `source` is inside the supported message grammar.
///
/// # Examples
///
/// ```
/// use flowdoc::script::is_supported_message_format;
///
/// assert!(is_supported_message_format("{n, plural, one {1 item} other {# items}}"));
/// assert!(!is_supported_message_format("{n, plural, one {1 item}}"));
/// ```
pub fn is_supported_message_format(source: &str) -> bool {
    MessageFormat::parse(source).is_ok()
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    #[inline]
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    #[inline]
    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn unsupported(&self, what: impl std::fmt::Display) -> Error {
        Error::UnsupportedMessageFormat(format!("{} at offset {}", what, self.pos))
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.bump() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(self.unsupported(format!("expected '{}', found '{}'", expected, ch))),
            None => Err(self.unsupported(format!("expected '{}', found end of message", expected))),
        }
    }

    fn parse_nodes(&mut self, in_plural: bool, nested: bool) -> Result<Vec<MessageNode>> {
        let mut nodes = Vec::new();
        let mut text = String::new();

        loop {
            let Some(ch) = self.peek() else {
                if nested {
                    return Err(self.unsupported("unterminated case body"));
                }
                break;
            };
            match ch {
                '}' if nested => break,
                '}' => return Err(self.unsupported("unbalanced '}'")),
                '{' => {
                    flush_text(&mut text, &mut nodes);
                    nodes.push(self.parse_argument(in_plural)?);
                },
                '#' if in_plural => {
                    self.bump();
                    flush_text(&mut text, &mut nodes);
                    nodes.push(MessageNode::Count);
                },
                '\'' => self.parse_apostrophe(in_plural, &mut text),
                _ => {
                    self.bump();
                    text.push(ch);
                },
            }
        }

        flush_text(&mut text, &mut nodes);
        Ok(nodes)
    }

    fn parse_apostrophe(&mut self, in_plural: bool, text: &mut String) {
        self.bump();
        match self.peek() {
            Some('\'') => {
                self.bump();
                text.push('\'');
            },
            Some(c) if is_syntax_char(c, in_plural) => {
                // Quoted literal runs until the next lone apostrophe
                while let Some(c) = self.bump() {
                    if c != '\'' {
                        text.push(c);
                    } else if self.peek() == Some('\'') {
                        self.bump();
                        text.push('\'');
                    } else {
                        break;
                    }
                }
            },
            _ => text.push('\''),
        }
    }

    fn parse_identifier(&mut self) -> Result<String> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_' || c == '-') {
            self.bump();
        }
        if start == self.pos {
            return Err(self.unsupported("expected identifier"));
        }
        Ok(self.src[start..self.pos].to_string())
    }

    fn parse_digits(&mut self) -> Result<String> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        if start == self.pos {
            return Err(self.unsupported("expected digits"));
        }
        Ok(self.src[start..self.pos].to_string())
    }

    fn parse_argument(&mut self, in_plural: bool) -> Result<MessageNode> {
        self.expect('{')?;
        self.skip_whitespace();
        let var = self.parse_identifier()?;
        self.skip_whitespace();

        match self.bump() {
            Some('}') => return Ok(MessageNode::Value { var }),
            Some(',') => {},
            _ => return Err(self.unsupported("expected ',' or '}' after argument name")),
        }

        self.skip_whitespace();
        let kind = self.parse_identifier()?;
        self.skip_whitespace();
        match kind.as_str() {
            "plural" => {
                self.expect(',')?;
                self.parse_plural(var, PluralMode::Cardinal)
            },
            "selectordinal" => {
                self.expect(',')?;
                self.parse_plural(var, PluralMode::Ordinal)
            },
            "select" => {
                self.expect(',')?;
                self.parse_select(var, in_plural)
            },
            other => Err(self.unsupported(format!("argument type '{}'", other))),
        }
    }

    fn parse_plural(&mut self, var: String, mode: PluralMode) -> Result<MessageNode> {
        self.skip_whitespace();
        let mut offset = None;
        if self.src[self.pos..].starts_with("offset:") {
            self.pos += "offset:".len();
            self.skip_whitespace();
            let digits = self.parse_digits()?;
            offset = Some(
                digits
                    .parse()
                    .map_err(|_| self.unsupported("offset out of range"))?,
            );
        }

        let mut cases: Vec<(PluralCase, Vec<MessageNode>)> = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('}') => {
                    self.bump();
                    break;
                },
                None => return Err(self.unsupported("unterminated plural")),
                _ => {},
            }

            let key = if self.peek() == Some('=') {
                self.bump();
                format!("={}", self.parse_digits()?)
            } else {
                self.parse_identifier()?
            };
            let case = PluralCase::parse(&key)
                .ok_or_else(|| self.unsupported(format!("plural case '{}'", key)))?;
            if cases.iter().any(|(existing, _)| *existing == case) {
                return Err(self.unsupported(format!("duplicate plural case '{}'", key)));
            }

            self.skip_whitespace();
            self.expect('{')?;
            let body = self.parse_nodes(true, true)?;
            self.expect('}')?;
            cases.push((case, body));
        }

        if !cases.iter().any(|(case, _)| *case == PluralCase::Other) {
            return Err(self.unsupported(format!("{} without 'other' case", mode.keyword())));
        }
        Ok(MessageNode::Plural {
            var,
            mode,
            offset,
            cases,
        })
    }

    fn parse_select(&mut self, var: String, in_plural: bool) -> Result<MessageNode> {
        let mut cases: Vec<(SelectCase, Vec<MessageNode>)> = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('}') => {
                    self.bump();
                    break;
                },
                None => return Err(self.unsupported("unterminated select")),
                _ => {},
            }

            let key = self.parse_identifier()?;
            let case = if key == "other" {
                SelectCase::Other
            } else {
                SelectCase::When(key)
            };
            if cases.iter().any(|(existing, _)| *existing == case) {
                return Err(self.unsupported(format!("duplicate select case '{}'", case.source_key())));
            }

            self.skip_whitespace();
            self.expect('{')?;
            let body = self.parse_nodes(in_plural, true)?;
            self.expect('}')?;
            cases.push((case, body));
        }

        if !cases.iter().any(|(case, _)| *case == SelectCase::Other) {
            return Err(self.unsupported("select without 'other' case"));
        }
        Ok(MessageNode::Select { var, cases })
    }
}

#[inline]
fn is_syntax_char(ch: char, in_plural: bool) -> bool {
    ch == '{' || ch == '}' || (in_plural && ch == '#')
}

fn flush_text(text: &mut String, nodes: &mut Vec<MessageNode>) {
    if !text.is_empty() {
        nodes.push(MessageNode::Text(std::mem::take(text)));
    }
}

fn write_nodes(nodes: &[MessageNode], in_plural: bool, nested: bool, out: &mut String) {
    for (index, node) in nodes.iter().enumerate() {
        match node {
            MessageNode::Text(text) => {
                // A trailing apostrophe is followed by more syntax unless the
                // message ends right here
                let followed = nested || index + 1 < nodes.len();
                write_text(text, in_plural, followed, out);
            },
            MessageNode::Count => out.push('#'),
            MessageNode::Value { var } => {
                out.push('{');
                out.push_str(var);
                out.push('}');
            },
            MessageNode::Plural {
                var,
                mode,
                offset,
                cases,
            } => {
                out.push('{');
                out.push_str(var);
                out.push_str(", ");
                out.push_str(mode.keyword());
                out.push_str(", ");
                if let Some(offset) = offset {
                    out.push_str("offset:");
                    out.push_str(&offset.to_string());
                    out.push(' ');
                }
                for (i, (case, body)) in cases.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    out.push_str(&case.source_key());
                    out.push_str(" {");
                    write_nodes(body, true, true, out);
                    out.push('}');
                }
                out.push('}');
            },
            MessageNode::Select { var, cases } => {
                out.push('{');
                out.push_str(var);
                out.push_str(", select, ");
                for (i, (case, body)) in cases.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    out.push_str(case.source_key());
                    out.push_str(" {");
                    write_nodes(body, in_plural, true, out);
                    out.push('}');
                }
                out.push('}');
            },
        }
    }
}

fn write_text(text: &str, in_plural: bool, followed: bool, out: &mut String) {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if is_syntax_char(ch, in_plural) {
            // Quote the whole run of syntax characters (and apostrophes in it)
            out.push('\'');
            while i < chars.len() && (is_syntax_char(chars[i], in_plural) || chars[i] == '\'') {
                if chars[i] == '\'' {
                    out.push_str("''");
                } else {
                    out.push(chars[i]);
                }
                i += 1;
            }
            out.push('\'');
            continue;
        }
        if ch == '\'' {
            let needs_double = match chars.get(i + 1) {
                Some(&next) => next == '\'' || is_syntax_char(next, in_plural),
                None => followed,
            };
            out.push_str(if needs_double { "''" } else { "'" });
        } else {
            out.push(ch);
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(source: &str) -> String {
        MessageFormat::parse(source).unwrap().to_source()
    }

    #[test]
    fn test_supported_messages() {
        assert!(is_supported_message_format(""));
        assert!(is_supported_message_format("Hello {name}!"));
        assert!(is_supported_message_format("{n, plural, one {1 item} other {# items}}"));
        assert!(is_supported_message_format(
            "{n, selectordinal, one {#st} two {#nd} few {#rd} other {#th}}"
        ));
        assert!(is_supported_message_format(
            "{g, select, male {He} female {She} other {They}} liked it"
        ));
        assert!(is_supported_message_format(
            "{n, plural, offset:1 =0 {nobody} =1 {just {who}} other {{who} and # others}}"
        ));
    }

    #[test]
    fn test_unsupported_messages() {
        assert!(!is_supported_message_format("{n, plural, one {1 item}}"));
        assert!(!is_supported_message_format("{g, select, male {He}}"));
        assert!(!is_supported_message_format("{n, number}"));
        assert!(!is_supported_message_format("{n, plural, lots {x} other {y}}"));
        assert!(!is_supported_message_format("{n, plural, one {a} one {b} other {c}}"));
        assert!(!is_supported_message_format("unbalanced }"));
        assert!(!is_supported_message_format("{open"));
        assert!(matches!(
            MessageFormat::parse("{n, plural, one {x}}"),
            Err(Error::UnsupportedMessageFormat(_))
        ));
    }

    #[test]
    fn test_canonical_source_is_preserved() {
        for source in [
            "Hello {name}!",
            "{n, plural, one {1 item} other {# items}}",
            "{n, selectordinal, one {#st} other {#th}}",
            "{n, plural, offset:1 =0 {nobody} other {# others}}",
            "{g, select, male {He} other {They}}",
            "Don't stop",
            "It's {n, plural, other {'#'}}",
        ] {
            assert_eq!(round_trip(source), source);
        }
    }

    #[test]
    fn test_quoting() {
        let message = MessageFormat::parse("a '{literal}' b").unwrap();
        assert_eq!(
            message.nodes(),
            &[MessageNode::Text("a {literal} b".to_string())]
        );

        // Hash is only special inside plural bodies
        let message = MessageFormat::parse("#1 {n, plural, other {# of '#'1}}").unwrap();
        let MessageNode::Plural { cases, .. } = &message.nodes()[1] else {
            panic!("expected plural");
        };
        assert_eq!(
            cases[0].1,
            vec![
                MessageNode::Count,
                MessageNode::Text(" of #1".to_string())
            ]
        );

        assert_eq!(
            MessageFormat::parse("it''s").unwrap().nodes(),
            &[MessageNode::Text("it's".to_string())]
        );
    }

    #[test]
    fn test_escaped_text_reparses_equal() {
        for source in [
            "a '{literal}' b",
            "x'{'y",
            "tail''",
            "before''{n}",
            "{n, plural, other {'{''}' '#' ''}}",
        ] {
            let parsed = MessageFormat::parse(source).unwrap();
            let rendered = parsed.to_source();
            assert_eq!(MessageFormat::parse(&rendered).unwrap(), parsed, "{source}");
        }
    }

    #[test]
    fn test_select_inside_plural_keeps_count() {
        let message =
            MessageFormat::parse("{n, plural, other {{g, select, other {# items}}}}").unwrap();
        let MessageNode::Plural { cases, .. } = &message.nodes()[0] else {
            panic!("expected plural");
        };
        let MessageNode::Select { cases: inner, .. } = &cases[0].1[0] else {
            panic!("expected select");
        };
        assert_eq!(inner[0].1[0], MessageNode::Count);
    }
}
