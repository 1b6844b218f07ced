//! Format-preserving printer.
//!
//! Output is produced by copying the original source and splicing in
//! replacement text for the ranges that were rewritten. Everything outside an
//! edit, comments included, is reproduced byte for byte, except for leading
//! indentation removed from lines that were lifted out of a factory body.

use oxc_ast::ast::Program;
use oxc_ast::ast::StringLiteral;
use oxc_ast::ast::TemplateLiteral;
use oxc_ast_visit::walk;
use oxc_ast_visit::Visit;
use oxc_span::Span;

/// Replacement of `span` with `text`. Edits rendered together never overlap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Edit {
  pub span: Span,
  pub text: String,
}

pub(crate) struct Printer<'s> {
  source: &'s str,
  /// Literals spanning multiple lines; their inner lines are never re-indented.
  verbatim: Vec<Span>,
}

impl<'s> Printer<'s> {
  pub fn new(source: &'s str, verbatim: Vec<Span>) -> Self {
    Self { source, verbatim }
  }

  pub fn slice(&self, span: Span) -> &'s str {
    &self.source[span.start as usize..span.end as usize]
  }

  /// Renders `span` with every edit it fully contains applied, removing up to
  /// `dedent` columns of indentation from each line after the first.
  pub fn render(&self, span: Span, edits: &[Edit], dedent: usize) -> String {
    let mut out = String::with_capacity(span.size() as usize);
    let mut pos = span.start;
    for edit in edits
      .iter()
      .filter(|edit| edit.span.start >= span.start && edit.span.end <= span.end)
    {
      debug_assert!(edit.span.start >= pos, "overlapping edits");
      self.copy(&mut out, pos, edit.span.start, dedent);
      out.push_str(&edit.text);
      pos = edit.span.end;
    }
    self.copy(&mut out, pos, span.end, dedent);
    out
  }

  fn copy(&self, out: &mut String, start: u32, end: u32, dedent: usize) {
    if start >= end {
      return;
    }
    let mut offset = start as usize;
    for (i, line) in self.source[start as usize..end as usize]
      .split_inclusive('\n')
      .enumerate()
    {
      if i == 0 || dedent == 0 || self.is_verbatim(offset) {
        out.push_str(line);
      } else {
        out.push_str(strip_indent(line, dedent));
      }
      offset += line.len();
    }
  }

  fn is_verbatim(&self, offset: usize) -> bool {
    self
      .verbatim
      .iter()
      .any(|span| (span.start as usize) < offset && offset < span.end as usize)
  }

  /// Leading whitespace of the line containing `offset`.
  pub fn line_indent(&self, offset: u32) -> &'s str {
    let offset = offset as usize;
    let line_start = self.source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = &self.source[line_start..offset];
    let len = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..len]
  }

  /// Line terminator used by the line containing `offset`, or by the last
  /// line before it if that line is the final one.
  pub fn line_ending(&self, offset: u32) -> &'static str {
    let offset = offset as usize;
    let newline = self.source[offset..]
      .find('\n')
      .map(|i| offset + i)
      .or_else(|| self.source[..offset].rfind('\n'));
    match newline {
      Some(i) if self.source[..i].ends_with('\r') => "\r\n",
      _ => "\n",
    }
  }

  /// Trims surrounding whitespace from `region`. Returns `None` if nothing is
  /// left.
  pub fn trim(&self, region: Span) -> Option<Span> {
    let text = self.slice(region);
    let leading = text.len() - text.trim_start().len();
    let trimmed = text.trim();
    if trimmed.is_empty() {
      return None;
    }
    let start = region.start + leading as u32;
    Some(Span::new(start, start + trimmed.len() as u32))
  }

  /// Indentation the lines of the block `content` (trimmed, taken from the
  /// block `region`) are written at.
  ///
  /// When the content starts on its own line, that line's indentation is used.
  /// Otherwise, e.g. `{ a();\n    b(); }`, the shallowest following line
  /// decides.
  pub fn block_indent(&self, region: Span, content: Span) -> usize {
    let lead = &self.source[region.start as usize..content.start as usize];
    if lead.contains('\n') {
      return self.line_indent(content.start).len();
    }
    let mut offset = content.start as usize;
    let mut indent: Option<usize> = None;
    for (i, line) in self.slice(content).split_inclusive('\n').enumerate() {
      if i > 0 && !self.is_verbatim(offset) && !line.trim().is_empty() {
        let width = line.len() - line.trim_start_matches([' ', '\t']).len();
        indent = Some(indent.map_or(width, |current| current.min(width)));
      }
      offset += line.len();
    }
    indent.unwrap_or(0)
  }
}

/// Removes up to `width` leading spaces or tabs.
pub(crate) fn strip_indent(line: &str, width: usize) -> &str {
  let available = line.len() - line.trim_start_matches([' ', '\t']).len();
  &line[available.min(width)..]
}

#[derive(Default)]
struct VerbatimCollector {
  spans: Vec<Span>,
}

impl<'a> Visit<'a> for VerbatimCollector {
  fn visit_template_literal(&mut self, it: &TemplateLiteral<'a>) {
    self.spans.push(it.span);
    walk::walk_template_literal(self, it);
  }

  fn visit_string_literal(&mut self, it: &StringLiteral<'a>) {
    // Only reachable with line continuations.
    if it.raw.as_ref().is_some_and(|raw| raw.contains('\n')) {
      self.spans.push(it.span);
    }
  }
}

/// Collects the spans of literals whose lines must not be re-indented.
pub(crate) fn collect_verbatim(program: &Program) -> Vec<Span> {
  let mut collector = VerbatimCollector::default();
  collector.visit_program(program);
  collector.spans
}
