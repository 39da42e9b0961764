// src/template.rs
use crate::errors::{InterpError, Result};
use crate::parser::Parser;

/// One piece of a parsed specification string: either raw text to pass
/// through verbatim, or a `${...}` reference to substitute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Reference(Reference),
}

/// A single parsed `${...}` expression, with the original span retained so
/// the parse is lossless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub expr: RefExpr,
    raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefExpr {
    /// Dotted path form, e.g. `attr.cpu.arch` → `["attr", "cpu", "arch"]`.
    /// Always at least one segment; the first selects the namespace.
    Path(Vec<String>),
    /// Indexed form, e.g. `env["invalid...name"]`. The key is opaque and
    /// looked up verbatim.
    Index { base: String, key: String },
}

impl Reference {
    /// The original `${...}` text this reference was parsed from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// First path token, i.e. the namespace selector.
    pub fn base(&self) -> &str {
        match &self.expr {
            RefExpr::Path(segments) => &segments[0],
            RefExpr::Index { base, .. } => base,
        }
    }
}

/// Parse a raw string into an ordered segment sequence.
///
/// `${` always opens a reference; there is no escape mechanism. Text outside
/// references is preserved byte-for-byte, including lone `$`, `{`, and `}`.
pub fn parse_template(input: &str) -> Result<Vec<Segment>> {
    let mut p = Parser::new(input);
    let mut out = Vec::new();
    let mut lit = String::new();

    while !p.eof() {
        if p.peek_str("${") {
            if !lit.is_empty() {
                out.push(Segment::Literal(std::mem::take(&mut lit)));
            }
            let start = p.pos();
            p.advance(2);
            let expr = parse_reference(&mut p)?;
            out.push(Segment::Reference(Reference {
                expr,
                raw: input[start..p.pos()].to_string(),
            }));
        } else if let Some(c) = p.peek_char() {
            lit.push(c);
            p.advance(c.len_utf8());
        }
    }
    if !lit.is_empty() {
        out.push(Segment::Literal(lit));
    }
    Ok(out)
}

/// Parse the body of one reference; the cursor sits just past `${` and is
/// left just past the closing `}`.
fn parse_reference(p: &mut Parser) -> Result<RefExpr> {
    if p.peek_char() == Some('}') {
        return Err(InterpError::MalformedExpression("empty reference".into()));
    }
    let base = p.parse_identifier()?;

    // Index form: exactly one base identifier, one bracketed key, then `}`.
    if p.consume_char('[') {
        let key = p.parse_quoted_literal()?;
        p.expect(']')?;
        p.expect('}')?;
        return Ok(RefExpr::Index { base, key });
    }

    let mut segments = vec![base];
    loop {
        if p.consume_char('.') {
            if !matches!(p.peek_char(), Some(c) if c == '_' || c == '-' || c.is_ascii_alphanumeric())
            {
                // Consecutive dots or a trailing dot. Keys that themselves
                // contain dots must use the env["..."] index form.
                return Err(InterpError::MalformedExpression(
                    "empty path segment; keys containing dots must use the env[\"...\"] form"
                        .into(),
                ));
            }
            segments.push(p.parse_identifier()?);
            continue;
        }
        if p.consume_char('}') {
            return Ok(RefExpr::Path(segments));
        }
        return Err(match p.peek_char() {
            Some(c) => InterpError::MalformedExpression(format!(
                "unexpected '{}' in reference at offset {}",
                c,
                p.pos()
            )),
            None => InterpError::MalformedExpression("unterminated reference".into()),
        });
    }
}
