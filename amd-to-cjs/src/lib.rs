use oxc_allocator::Allocator;
use oxc_span::Span;
use print::collect_verbatim;
use print::Printer;
use tracing::debug_span;

pub use err::ConvertError;

mod ancestor;
mod body;
mod deps;
mod detect;
mod err;
mod generate;
mod print;
mod resolve;
mod rewrite;
mod tree;

/// How to parse the provided code.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TopLevelMode {
  /// Classic script; what AMD sources almost always are.
  Global,
  Module,
}

/// What to do with `require(DEPS, factory)` when `DEPS` is not declared as an
/// array literal anywhere in the file.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum UnresolvedPolicy {
  /// Fail the whole conversion.
  #[default]
  Abort,
  /// Leave that call untouched and convert the rest.
  Skip,
}

#[derive(Clone, Copy, Debug)]
pub struct ConvertOptions {
  pub top_level_mode: TopLevelMode,
  pub unresolved_policy: UnresolvedPolicy,
}

impl ConvertOptions {
  pub fn new(top_level_mode: TopLevelMode) -> Self {
    Self {
      top_level_mode,
      unresolved_policy: UnresolvedPolicy::default(),
    }
  }

  pub fn with_unresolved_policy(mut self, unresolved_policy: UnresolvedPolicy) -> Self {
    self.unresolved_policy = unresolved_policy;
    self
  }
}

impl Default for ConvertOptions {
  fn default() -> Self {
    Self::new(TopLevelMode::Global)
  }
}

/// Converts AMD modules in UTF-8 JavaScript code into CommonJS.
///
/// # Arguments
///
/// * `top_level_mode` - How to parse the provided code.
/// * `source` - A string slice representing the source code to convert.
/// * `output` - Destination to write output JavaScript code.
///
/// # Examples
///
/// ```
/// use amd_to_cjs::{convert, TopLevelMode};
///
/// let code: &str = "define(['dep'], function (dep) { return dep.value; });";
/// let mut out = Vec::new();
/// convert(TopLevelMode::Global, code, &mut out).unwrap();
/// assert_eq!(
///   out.as_slice(),
///   b"var dep = require('dep');\nmodule.exports = dep.value;".as_slice()
/// );
/// ```
pub fn convert(
  top_level_mode: TopLevelMode,
  source: &str,
  output: &mut Vec<u8>,
) -> Result<(), ConvertError> {
  convert_with_options(ConvertOptions::new(top_level_mode), source, output)
}

/// Converts with explicit options. Nothing is written to `output` unless the
/// whole conversion succeeds.
pub fn convert_with_options(
  options: ConvertOptions,
  source: &str,
  output: &mut Vec<u8>,
) -> Result<(), ConvertError> {
  let converted = convert_source(options, source)?;
  output.extend_from_slice(converted.as_bytes());
  Ok(())
}

/// Converts `source` as a global script with default options.
pub fn convert_to_string(source: &str) -> Result<String, ConvertError> {
  convert_source(ConvertOptions::default(), source)
}

fn convert_source(options: ConvertOptions, source: &str) -> Result<String, ConvertError> {
  let span = debug_span!("convert", len = source.len(), mode = ?options.top_level_mode);
  let _guard = span.enter();

  let allocator = Allocator::default();
  let program = tree::parse(&allocator, source, options.top_level_mode)?;
  let printer = Printer::new(source, collect_verbatim(&program));
  let edits = rewrite::rewrite_program(&program, &printer, options)?;
  Ok(printer.render(Span::new(0, source.len() as u32), &edits, 0))
}
