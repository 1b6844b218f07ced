use oxc_ast::ast::ArrayExpression;
use oxc_ast::ast::BindingPattern;
use oxc_ast::ast::Expression;
use oxc_ast::ast::Program;
use oxc_ast::ast::VariableDeclarator;
use oxc_ast_visit::walk;
use oxc_ast_visit::Visit;

struct DeclaratorFinder<'a, 'n> {
  name: &'n str,
  found: Option<&'a VariableDeclarator<'a>>,
}

impl<'a> Visit<'a> for DeclaratorFinder<'a, '_> {
  fn visit_variable_declarator(&mut self, it: &VariableDeclarator<'a>) {
    if self.found.is_some() {
      return;
    }
    if let BindingPattern::BindingIdentifier(id) = &it.id {
      if id.name.as_str() == self.name {
        self.found = Some(self.alloc(it));
        return;
      }
    }
    walk::walk_variable_declarator(self, it);
  }
}

/// Finds the array literal bound to `name`, e.g. the `["a", "b"]` in
/// `var DEPS = ["a", "b"];`.
///
/// The first declarator for `name` in source order wins, whatever its scope.
/// Returns `None` if there is no such declarator or its initializer is not an
/// array literal.
pub(crate) fn resolve_array_initializer<'a>(
  name: &str,
  root: &Program<'a>,
) -> Option<&'a ArrayExpression<'a>> {
  let mut finder = DeclaratorFinder { name, found: None };
  finder.visit_program(root);
  match &finder.found?.init {
    Some(Expression::ArrayExpression(array)) => Some(&**array),
    _ => None,
  }
}
