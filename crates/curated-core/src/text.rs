//! Plain-text rendering of biography markup.
//!
//! Biographies arrive as small HTML fragments. They are read with
//! `quick-xml`'s streaming reader in a lenient configuration (end tags are not
//! matched against start tags, stray end tags are ignored, unquoted attributes
//! are accepted) and flattened to readable text:
//!
//! - character references resolve against the XML set, numeric references
//!   and a table of common HTML names; anything unresolvable (a bare `&`,
//!   `&hearts;`) is kept as literal text, as is a `<` that cannot open a tag;
//! - text runs have their whitespace (including non-breaking spaces) collapsed
//!   and are trimmed;
//! - adjacent runs are separated by a single space unless one side already
//!   carries whitespace or the next run starts with `.`;
//! - block elements become paragraph breaks, `<br>` a line break, and list
//!   items `* `-prefixed lines;
//! - `<a href="url">text</a>` renders as `text ( url )`; the URL is dropped
//!   when empty or identical to the link text;
//! - `script`, `style` and `head` content is discarded, as is any inline
//!   formatting markup.
//!
//! Consumers compare the rendered text literally, so the output for a given
//! input must not change between releases without a data migration.

use std::borrow::Cow;

use quick_xml::{
  Reader,
  escape::resolve_predefined_entity,
  events::{BytesStart, Event, attributes::AttrError},
};
use thiserror::Error;

/// The markup could not be read.
#[derive(Debug, Error)]
pub enum RenderError {
  #[error("malformed markup: {0}")]
  Markup(#[from] quick_xml::Error),

  #[error("malformed attribute: {0}")]
  Attribute(#[from] AttrError),

  #[error("invalid UTF-8: {0}")]
  Utf8(#[from] std::str::Utf8Error),
}

// ─── Element classes ─────────────────────────────────────────────────────────

const BLOCK_ELEMENTS: &[&str] = &[
  "p", "div", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote",
  "section", "article", "table", "tr", "pre", "header", "footer",
];

const VOID_ELEMENTS: &[&str] =
  &["br", "hr", "img", "input", "meta", "link", "wbr", "col", "source"];

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "head"];

const PARAGRAPH_BREAK: &str = "\n\n";

// ─── Entities ────────────────────────────────────────────────────────────────

/// Named references beyond the five XML ones that show up in editorial copy.
fn resolve_html_entity(name: &str) -> Option<&'static str> {
  let resolved = match name {
    "nbsp" => "\u{a0}",
    "ndash" => "\u{2013}",
    "mdash" => "\u{2014}",
    "lsquo" => "\u{2018}",
    "rsquo" => "\u{2019}",
    "ldquo" => "\u{201c}",
    "rdquo" => "\u{201d}",
    "hellip" => "\u{2026}",
    "bull" => "\u{2022}",
    "middot" => "\u{b7}",
    "copy" => "\u{a9}",
    "reg" => "\u{ae}",
    "trade" => "\u{2122}",
    "pound" => "\u{a3}",
    "euro" => "\u{20ac}",
    "eacute" => "\u{e9}",
    "egrave" => "\u{e8}",
    "aacute" => "\u{e1}",
    "uuml" => "\u{fc}",
    "ouml" => "\u{f6}",
    "auml" => "\u{e4}",
    _ => return None,
  };
  Some(resolved)
}

fn resolve_numeric(reference: &str) -> Option<char> {
  let code = match reference.strip_prefix(['x', 'X']) {
    Some(hex) => u32::from_str_radix(hex, 16).ok()?,
    None => reference.parse().ok()?,
  };
  char::from_u32(code).filter(|&c| c != '\0')
}

/// Resolve character references, leaving any that are unterminated or
/// unknown in place verbatim.
fn unescape(raw: &str) -> Cow<'_, str> {
  if !raw.contains('&') {
    return Cow::Borrowed(raw);
  }

  let mut out = String::with_capacity(raw.len());
  let mut rest = raw;
  while let Some(amp) = rest.find('&') {
    out.push_str(&rest[..amp]);
    let after = &rest[amp + 1..];
    let name_len = after
      .find(|c: char| !(c.is_ascii_alphanumeric() || c == '#'))
      .unwrap_or(after.len());
    let name = &after[..name_len];

    let resolved = after[name_len..]
      .starts_with(';')
      .then(|| match name.strip_prefix('#') {
        Some(number) => resolve_numeric(number).map(String::from),
        None => resolve_predefined_entity(name)
          .or_else(|| resolve_html_entity(name))
          .map(str::to_owned),
      })
      .flatten();

    match resolved {
      Some(text) => {
        out.push_str(&text);
        rest = &after[name_len + 1..];
      }
      None => {
        out.push('&');
        rest = after;
      }
    }
  }
  out.push_str(rest);
  Cow::Owned(out)
}

/// Escape every `<` that cannot start a tag, comment or declaration so the
/// reader keeps it as text instead of swallowing what follows.
fn escape_stray_angles(html: &str) -> Cow<'_, str> {
  let bytes = html.as_bytes();
  let stray = |i: usize| {
    bytes[i] == b'<'
      && !bytes
        .get(i + 1)
        .is_some_and(|&b| b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?'))
  };
  if !(0..bytes.len()).any(stray) {
    return Cow::Borrowed(html);
  }

  let mut out = String::with_capacity(html.len() + 8);
  for (i, c) in html.char_indices() {
    if stray(i) {
      out.push_str("&lt;");
    } else {
      out.push(c);
    }
  }
  Cow::Owned(out)
}

// ─── Renderer ────────────────────────────────────────────────────────────────

/// An element whose end tag has not been seen yet.
struct OpenElement {
  name:       String,
  /// Normalised `href` for anchors.
  href:       Option<String>,
  /// Output length when the element opened; used to recover link text.
  text_start: usize,
}

#[derive(Default)]
struct Renderer {
  out:        String,
  open:       Vec<OpenElement>,
  skip_depth: usize,
}

impl Renderer {
  /// Append a chunk, separating it from the previous one with a space when
  /// neither side carries whitespace.
  fn emit(&mut self, chunk: &str) {
    if chunk.is_empty() || self.skip_depth > 0 {
      return;
    }
    let ends_with_space =
      self.out.is_empty() || self.out.ends_with(char::is_whitespace);
    let starts_with_space = chunk.starts_with(char::is_whitespace);
    if !ends_with_space && !starts_with_space && !chunk.starts_with('.') {
      self.out.push(' ');
    }
    self.out.push_str(chunk);
  }

  fn text(&mut self, raw: &str) -> Result<(), RenderError> {
    if self.skip_depth > 0 {
      return Ok(());
    }
    let unescaped = unescape(raw);
    let collapsed = unescaped.split_whitespace().collect::<Vec<_>>().join(" ");
    self.emit(&collapsed);
    Ok(())
  }

  fn open(&mut self, element: &BytesStart<'_>) -> Result<(), RenderError> {
    let name = element_name(element.name().as_ref())?;
    if VOID_ELEMENTS.contains(&name.as_str()) {
      return self.empty(element);
    }

    let href = if name == "a" { anchor_href(element)? } else { None };

    if SKIPPED_ELEMENTS.contains(&name.as_str()) {
      self.skip_depth += 1;
    } else if BLOCK_ELEMENTS.contains(&name.as_str()) {
      self.emit(PARAGRAPH_BREAK);
    } else if name == "li" {
      self.emit("\n* ");
    }

    self.open.push(OpenElement {
      name,
      href,
      text_start: self.out.len(),
    });
    Ok(())
  }

  fn empty(&mut self, element: &BytesStart<'_>) -> Result<(), RenderError> {
    let name = element_name(element.name().as_ref())?;
    if name == "br" {
      self.emit("\n");
    } else if BLOCK_ELEMENTS.contains(&name.as_str()) {
      self.emit(PARAGRAPH_BREAK);
    }
    Ok(())
  }

  /// Close the innermost open element called `name`, implicitly closing any
  /// elements opened inside it. Unmatched end tags are ignored.
  fn close(&mut self, name: &str) {
    let Some(position) = self.open.iter().rposition(|e| e.name == name) else {
      return;
    };
    while self.open.len() > position {
      if let Some(element) = self.open.pop() {
        self.finish(element);
      }
    }
  }

  fn finish(&mut self, element: OpenElement) {
    let name = element.name.as_str();
    if SKIPPED_ELEMENTS.contains(&name) {
      self.skip_depth = self.skip_depth.saturating_sub(1);
    } else if BLOCK_ELEMENTS.contains(&name) {
      self.emit(PARAGRAPH_BREAK);
    } else if let Some(href) = element.href {
      let link_text = self.out.get(element.text_start..).unwrap_or("").trim();
      if link_text != href {
        self.emit(&format!("( {href} )"));
      }
    }
  }

  fn into_text(mut self) -> String {
    while let Some(element) = self.open.pop() {
      self.finish(element);
    }
    normalise_breaks(&self.out.replace("\n ", "\n"))
      .trim()
      .to_owned()
  }
}

fn element_name(raw: &[u8]) -> Result<String, RenderError> {
  Ok(std::str::from_utf8(raw)?.to_ascii_lowercase())
}

fn anchor_href(element: &BytesStart<'_>) -> Result<Option<String>, RenderError> {
  for attribute in element.html_attributes() {
    let attribute = attribute?;
    if !attribute.key.as_ref().eq_ignore_ascii_case(b"href") {
      continue;
    }
    let raw = std::str::from_utf8(&attribute.value)?;
    let href = unescape(raw);
    let href = href.trim();
    let href = href.strip_prefix("mailto:").unwrap_or(href);
    return Ok((!href.is_empty()).then(|| href.to_owned()));
  }
  Ok(None)
}

/// Collapse every run of two or more newlines to exactly one blank line.
fn normalise_breaks(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  let mut newlines = 0;
  for c in text.chars() {
    if c == '\n' {
      newlines += 1;
      continue;
    }
    match newlines {
      0 => {}
      1 => out.push('\n'),
      _ => out.push_str(PARAGRAPH_BREAK),
    }
    newlines = 0;
    out.push(c);
  }
  out
}

/// Render an HTML fragment as plain text.
pub fn html_to_text(html: &str) -> Result<String, RenderError> {
  let html = escape_stray_angles(html);
  let mut reader = Reader::from_str(&html);
  let config = reader.config_mut();
  config.trim_text(false);
  config.check_end_names = false;
  config.allow_unmatched_ends = true;
  config.check_comments = false;

  let mut renderer = Renderer::default();
  loop {
    match reader.read_event()? {
      Event::Start(e) => renderer.open(&e)?,
      Event::Empty(e) => renderer.empty(&e)?,
      Event::End(e) => {
        let name = element_name(e.name().as_ref())?;
        renderer.close(&name);
      }
      Event::Text(e) => renderer.text(std::str::from_utf8(&e)?)?,
      Event::CData(e) => {
        let raw = std::str::from_utf8(&e)?;
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        renderer.emit(&collapsed);
      }
      Event::Eof => break,
      _ => {}
    }
  }
  Ok(renderer.into_text())
}
