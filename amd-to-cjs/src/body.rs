use crate::detect::is_amd;
use oxc_ast::ast::Argument;
use oxc_ast::ast::CallExpression;
use oxc_ast::ast::FunctionBody;
use oxc_span::GetSpan;
use oxc_span::Span;

/// What an AMD factory turns into once the call is unwrapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ModuleBody {
  /// Statements lifted out of a function factory.
  Statements {
    /// Everything between the body's braces.
    region: Span,
    /// From the first to the last directive of the body's prologue.
    directives: Option<Span>,
  },
  /// Expression assigned to `module.exports`.
  Export(Span),
  Unsupported,
}

pub(crate) fn normalize_body(call: &CallExpression) -> ModuleBody {
  debug_assert!(is_amd(call), "body normalization on a non-AMD call");
  match call.arguments.last() {
    Some(Argument::ObjectExpression(object)) => ModuleBody::Export(object.span),
    // Async and generator bodies can't be lifted to the top level.
    Some(Argument::FunctionExpression(func)) if func.r#async || func.generator => {
      ModuleBody::Unsupported
    }
    Some(Argument::FunctionExpression(func)) => match &func.body {
      Some(body) => lifted(body),
      None => ModuleBody::Unsupported,
    },
    Some(Argument::ArrowFunctionExpression(arrow)) if arrow.r#async => ModuleBody::Unsupported,
    Some(Argument::ArrowFunctionExpression(arrow)) => match arrow.get_expression() {
      Some(expr) => ModuleBody::Export(expr.without_parentheses().span()),
      None => lifted(&arrow.body),
    },
    _ => ModuleBody::Unsupported,
  }
}

fn lifted(body: &FunctionBody) -> ModuleBody {
  let directives = match (body.directives.first(), body.directives.last()) {
    (Some(first), Some(last)) => Some(Span::new(first.span.start, last.span.end)),
    _ => None,
  };
  ModuleBody::Statements {
    region: between_braces(body.span),
    directives,
  }
}

fn between_braces(block: Span) -> Span {
  Span::new(block.start + 1, block.end.saturating_sub(1).max(block.start + 1))
}
