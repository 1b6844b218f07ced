use crate::err::ConvertError;
use crate::TopLevelMode;
use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_parser::Parser;
use oxc_parser::ParserReturn;
use oxc_span::SourceType;

fn source_type(mode: TopLevelMode) -> SourceType {
  match mode {
    TopLevelMode::Global => SourceType::cjs(),
    TopLevelMode::Module => SourceType::mjs(),
  }
}

/// Parses `source` into `allocator`, failing on the first syntax error.
pub(crate) fn parse<'a>(
  allocator: &'a Allocator,
  source: &'a str,
  mode: TopLevelMode,
) -> Result<Program<'a>, ConvertError> {
  let ParserReturn {
    program,
    errors,
    panicked,
    ..
  } = Parser::new(allocator, source, source_type(mode)).parse();
  if let Some(error) = errors.first() {
    let offset = error
      .labels
      .as_ref()
      .and_then(|labels| labels.first())
      .map(|label| label.offset());
    return Err(ConvertError::Syntax {
      message: error.to_string(),
      offset,
    });
  }
  if panicked {
    return Err(ConvertError::Syntax {
      message: "parser aborted".to_string(),
      offset: None,
    });
  }
  Ok(program)
}
