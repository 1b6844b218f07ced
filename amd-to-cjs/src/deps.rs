use crate::detect::is_amd;
use crate::resolve::resolve_array_initializer;
use itertools::EitherOrBoth;
use itertools::Itertools;
use oxc_ast::ast::Argument;
use oxc_ast::ast::ArrayExpressionElement;
use oxc_ast::ast::CallExpression;
use oxc_ast::ast::FormalParameter;
use oxc_ast::ast::Program;
use oxc_span::GetSpan;
use oxc_span::Span;

/// One entry of an AMD dependency list paired with the factory parameter at
/// the same position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Dependency {
  pub specifier: Span,
  /// Binding pattern of the matching parameter; `None` for side-effect-only
  /// dependencies past the last parameter.
  pub binding: Option<Span>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum DependencyError {
  /// The dependency list is an identifier with no array literal declaration.
  Unresolved { name: String, offset: usize },
  Unsupported(&'static str),
}

/// Pairs the specifiers of an AMD call's dependency list with its factory's
/// parameters.
///
/// Returns `Ok(None)` for the bare-factory form (fewer than two arguments).
pub(crate) fn extract_dependencies<'a>(
  call: &CallExpression<'a>,
  root: &Program<'a>,
) -> Result<Option<Vec<Dependency>>, DependencyError> {
  debug_assert!(is_amd(call), "dependency extraction on a non-AMD call");
  if call.arguments.len() < 2 {
    return Ok(None);
  }
  let (Some(operand), Some(factory)) = (call.arguments.first(), call.arguments.last()) else {
    return Ok(None);
  };

  let specifiers = match operand {
    Argument::ArrayExpression(array) => array.elements.as_slice(),
    Argument::Identifier(ident) => match resolve_array_initializer(ident.name.as_str(), root) {
      Some(array) => array.elements.as_slice(),
      None => {
        return Err(DependencyError::Unresolved {
          name: ident.name.to_string(),
          offset: ident.span.start as usize,
        })
      }
    },
    _ => {
      return Err(DependencyError::Unsupported(
        "dependency list is neither an array literal nor an identifier",
      ))
    }
  };

  let mut dependencies = Vec::with_capacity(specifiers.len());
  for pair in specifiers.iter().zip_longest(factory_params(factory)) {
    let (element, param) = match pair {
      EitherOrBoth::Both(element, param) => (element, Some(param)),
      EitherOrBoth::Left(element) => (element, None),
      // Parameters past the last dependency bind nothing.
      EitherOrBoth::Right(_) => break,
    };
    match element {
      ArrayExpressionElement::Elision(_) => continue,
      ArrayExpressionElement::SpreadElement(_) => {
        return Err(DependencyError::Unsupported(
          "spread element in dependency list",
        ))
      }
      _ => {}
    }
    dependencies.push(Dependency {
      specifier: element.span(),
      binding: param.map(|param| param.pattern.span()),
    });
  }
  Ok(Some(dependencies))
}

fn factory_params<'f, 'a>(factory: &'f Argument<'a>) -> &'f [FormalParameter<'a>] {
  match factory {
    Argument::FunctionExpression(func) => func.params.items.as_slice(),
    Argument::ArrowFunctionExpression(arrow) => arrow.params.items.as_slice(),
    _ => &[],
  }
}
