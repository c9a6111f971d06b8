//! Placeholder tokenizer for kernel templates.
//!
//! A placeholder is framed by `%%` on both sides and is either a bare tag
//! (`%%FUNC_NAME%%`) or a tag with one argument (`%%LOAD_BUFFER(prod_X)%%`).
//! Tag names are `[A-Z_][A-Z0-9_]*`; arguments are `[A-Za-z0-9_]+`.

use super::error::{CodegenError, CodegenResult};

const DELIMITER: &str = "%%";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub name: &'a str,
    pub arg: Option<&'a str>,
    /// Byte offset of the opening delimiter.
    pub offset: usize,
    /// The placeholder exactly as written, delimiters included.
    pub raw: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Placeholder(Placeholder<'a>),
}

#[derive(Debug, Clone)]
pub struct Template<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> Template<'a> {
    pub fn parse(source: &'a str) -> CodegenResult<Self> {
        let mut segments = Vec::new();
        let mut cursor = 0;
        while let Some(found) = source[cursor..].find(DELIMITER) {
            let open = cursor + found;
            if open > cursor {
                segments.push(Segment::Text(&source[cursor..open]));
            }
            let body_start = open + DELIMITER.len();
            let close = source[body_start..]
                .find(DELIMITER)
                .map(|pos| body_start + pos)
                .ok_or_else(|| malformed(open, "unterminated placeholder"))?;
            let end = close + DELIMITER.len();
            let (name, arg) = parse_body(&source[body_start..close], open)?;
            segments.push(Segment::Placeholder(Placeholder {
                name,
                arg,
                offset: open,
                raw: &source[open..end],
            }));
            cursor = end;
        }
        if cursor < source.len() {
            segments.push(Segment::Text(&source[cursor..]));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder<'a>> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(placeholder) => Some(placeholder),
            Segment::Text(_) => None,
        })
    }

    /// Rebuilds the text, substituting each placeholder for which `resolve`
    /// returns `Some`. Placeholders it declines are kept verbatim.
    pub fn render<F>(&self, mut resolve: F) -> CodegenResult<String>
    where
        F: FnMut(&Placeholder<'a>) -> CodegenResult<Option<String>>,
    {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(placeholder) => match resolve(placeholder)? {
                    Some(replacement) => out.push_str(&replacement),
                    None => out.push_str(placeholder.raw),
                },
            }
        }
        Ok(out)
    }
}

pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> CodegenError {
    CodegenError::MalformedTemplate {
        offset,
        reason: reason.into(),
    }
}

fn parse_body(body: &str, offset: usize) -> CodegenResult<(&str, Option<&str>)> {
    let (name, arg) = match body.find('(') {
        Some(open) => {
            let rest = &body[open + 1..];
            let arg = rest
                .strip_suffix(')')
                .ok_or_else(|| malformed(offset, format!("`{body}` is missing a closing `)`")))?;
            (&body[..open], Some(arg))
        }
        None => (body, None),
    };

    let mut chars = name.chars();
    let valid_name = matches!(chars.next(), Some(ch) if ch.is_ascii_uppercase() || ch == '_')
        && chars.all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_');
    if !valid_name {
        return Err(malformed(offset, format!("invalid placeholder name `{name}`")));
    }
    if let Some(arg) = arg {
        if arg.is_empty() || !arg.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
            return Err(malformed(offset, format!("invalid argument `{arg}` to `{name}`")));
        }
    }
    Ok((name, arg))
}
