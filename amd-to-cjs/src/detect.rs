use oxc_ast::ast::Argument;
use oxc_ast::ast::CallExpression;
use oxc_ast::ast::Expression;
use oxc_ast::AstKind;

/// Whether `call` is an AMD `define(...)` or `require(...)` invocation.
///
/// Matching is purely on the callee's name: any call to a bare `define` or
/// `require` identifier qualifies, except `require('path')` with a single
/// string literal argument, which is already CommonJS.
pub(crate) fn is_amd(call: &CallExpression) -> bool {
  let Expression::Identifier(callee) = &call.callee else {
    return false;
  };
  match callee.name.as_str() {
    "define" => true,
    "require" => !is_cjs_require(call),
    _ => false,
  }
}

fn is_cjs_require(call: &CallExpression) -> bool {
  matches!(call.arguments.as_slice(), [Argument::StringLiteral(_)])
}

pub(crate) fn is_amd_kind(kind: &AstKind) -> bool {
  matches!(kind, AstKind::CallExpression(call) if is_amd(call))
}
