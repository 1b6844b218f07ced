use crate::ancestor::has_ancestor;
use crate::ancestor::FACTORY_RETURN_DEPTH;
use crate::body::normalize_body;
use crate::body::ModuleBody;
use crate::deps::extract_dependencies;
use crate::deps::Dependency;
use crate::deps::DependencyError;
use crate::detect::is_amd;
use crate::detect::is_amd_kind;
use crate::err::ConvertError;
use crate::generate::generate_exports;
use crate::generate::generate_require;
use crate::print::strip_indent;
use crate::print::Edit;
use crate::print::Printer;
use crate::ConvertOptions;
use crate::UnresolvedPolicy;
use oxc_ast::ast::CallExpression;
use oxc_ast::ast::Expression;
use oxc_ast::ast::ExpressionStatement;
use oxc_ast::ast::Program;
use oxc_ast::ast::ReturnStatement;
use oxc_ast::AstKind;
use oxc_ast_visit::walk;
use oxc_ast_visit::Visit;
use oxc_span::GetSpan;
use oxc_span::Span;
use tracing::debug;
use tracing::trace;

/// Edits collected for one rendered region, and the indentation removed from
/// that region's lines when it is printed.
struct Frame {
  dedent: usize,
  edits: Vec<Edit>,
}

impl Frame {
  fn new(dedent: usize) -> Self {
    Self {
      dedent,
      edits: Vec::new(),
    }
  }
}

struct ModulePlan {
  dependencies: Vec<Dependency>,
  body: ModuleBody,
}

struct AmdRewriter<'a, 'r, 's> {
  root: &'r Program<'a>,
  printer: &'r Printer<'s>,
  options: ConvertOptions,
  ancestors: Vec<AstKind<'a>>,
  frames: Vec<Frame>,
  /// Spans of AMD calls whose enclosing statements are being replaced.
  converting: Vec<Span>,
  error: Option<ConvertError>,
}

impl<'a, 'r, 's> AmdRewriter<'a, 'r, 's> {
  fn new(root: &'r Program<'a>, printer: &'r Printer<'s>, options: ConvertOptions) -> Self {
    Self {
      root,
      printer,
      options,
      ancestors: Vec::new(),
      frames: vec![Frame::new(0)],
      converting: Vec::new(),
      error: None,
    }
  }

  fn frame(&mut self) -> &mut Frame {
    // The root frame is never popped.
    let last = self.frames.len() - 1;
    &mut self.frames[last]
  }

  fn in_statement_list(&self) -> bool {
    matches!(
      self.ancestors.last(),
      Some(
        AstKind::Program(_)
          | AstKind::FunctionBody(_)
          | AstKind::BlockStatement(_)
          | AstKind::SwitchCase(_)
          | AstKind::StaticBlock(_)
      )
    )
  }

  fn is_converting(&self, kind: &AstKind) -> bool {
    is_amd_kind(kind)
      && matches!(kind, AstKind::CallExpression(call) if self.converting.contains(&call.span))
  }

  fn plan_module(&self, call: &CallExpression<'a>) -> Result<Option<ModulePlan>, ConvertError> {
    let dependencies = match extract_dependencies(call, self.root) {
      Ok(Some(dependencies)) => dependencies,
      Ok(None) => {
        debug!(offset = call.span.start, "AMD call without dependency list");
        Vec::new()
      }
      Err(DependencyError::Unresolved { name, offset }) => match self.options.unresolved_policy {
        UnresolvedPolicy::Abort => {
          return Err(ConvertError::UnresolvedDependencies { name, offset });
        }
        UnresolvedPolicy::Skip => {
          debug!(offset, name = %name, "unresolved dependency list, leaving call as is");
          return Ok(None);
        }
      },
      Err(DependencyError::Unsupported(reason)) => {
        debug!(offset = call.span.start, reason, "unsupported AMD call, leaving as is");
        return Ok(None);
      }
    };
    let body = normalize_body(call);
    if body == ModuleBody::Unsupported {
      debug!(
        offset = call.span.start,
        "unsupported AMD factory, leaving as is"
      );
      return Ok(None);
    }
    Ok(Some(ModulePlan { dependencies, body }))
  }

  /// Replaces `stmt`, whose expression is the AMD call `call`, with the
  /// module's require statements followed by its unwrapped body.
  fn rewrite_module(
    &mut self,
    stmt: &ExpressionStatement<'a>,
    call: &CallExpression<'a>,
    plan: ModulePlan,
  ) {
    let printer = self.printer;
    let outer_dedent = self.frame().dedent;
    let indent = strip_indent(printer.line_indent(stmt.span.start), outer_dedent);

    let lifted = match plan.body {
      ModuleBody::Statements { region, .. } => printer
        .trim(region)
        .map(|content| (content, printer.block_indent(region, content))),
      _ => None,
    };
    let inner_dedent = match lifted {
      Some((_, block_indent)) => block_indent.saturating_sub(indent.len()),
      None => outer_dedent,
    };

    // Convert nested modules and the factory's returns before lifting.
    self.frames.push(Frame::new(inner_dedent));
    self.converting.push(call.span);
    walk::walk_expression_statement(self, stmt);
    self.converting.pop();
    let Some(frame) = self.frames.pop() else {
      return;
    };

    let mut statements: Vec<String> = Vec::new();
    let mut rest = lifted.map(|(content, _)| content);
    if let (ModuleBody::Statements { directives: Some(prologue), .. }, Some(content)) =
      (plan.body, rest)
    {
      // The prologue stays first so it keeps applying to the module.
      let prologue = Span::new(content.start, prologue.end);
      statements.push(printer.render(prologue, &frame.edits, inner_dedent));
      rest = printer.trim(Span::new(prologue.end, content.end));
    }
    statements.extend(plan.dependencies.iter().map(|dependency| {
      generate_require(
        &printer.render(dependency.specifier, &frame.edits, outer_dedent),
        dependency.binding.map(|binding| printer.slice(binding)),
      )
    }));
    match plan.body {
      ModuleBody::Statements { .. } => {
        if let Some(rest) = rest {
          statements.push(printer.render(rest, &frame.edits, inner_dedent));
        }
      }
      ModuleBody::Export(expr) => {
        statements.push(generate_exports(&printer.render(
          expr,
          &frame.edits,
          outer_dedent,
        )));
      }
      ModuleBody::Unsupported => {}
    }

    debug!(
      offset = stmt.span.start,
      dependencies = plan.dependencies.len(),
      body = ?plan.body,
      "converted AMD module"
    );
    let newline = printer.line_ending(stmt.span.start);
    let text = statements.join(&format!("{newline}{indent}"));
    self.frame().edits.push(Edit {
      span: stmt.span,
      text,
    });
  }

  fn finish(self) -> Result<Vec<Edit>, ConvertError> {
    if let Some(error) = self.error {
      return Err(error);
    }
    Ok(
      self
        .frames
        .into_iter()
        .next()
        .map(|root| root.edits)
        .unwrap_or_default(),
    )
  }
}

impl<'a> Visit<'a> for AmdRewriter<'a, '_, '_> {
  fn enter_node(&mut self, kind: AstKind<'a>) {
    self.ancestors.push(kind);
  }

  fn leave_node(&mut self, _kind: AstKind<'a>) {
    self.ancestors.pop();
  }

  fn visit_expression_statement(&mut self, it: &ExpressionStatement<'a>) {
    if self.error.is_some() {
      return;
    }
    if let Expression::CallExpression(call) = &it.expression {
      if is_amd(call) {
        if !self.in_statement_list() {
          debug!(
            offset = call.span.start,
            "AMD call outside a statement list, leaving as is"
          );
        } else {
          match self.plan_module(call) {
            Ok(Some(plan)) => {
              self.rewrite_module(it, call, plan);
              return;
            }
            Ok(None) => {}
            Err(error) => {
              self.error = Some(error);
              return;
            }
          }
        }
      }
    }
    walk::walk_expression_statement(self, it);
  }

  fn visit_return_statement(&mut self, it: &ReturnStatement<'a>) {
    if let Some(argument) = &it.argument {
      if has_ancestor(&self.ancestors, FACTORY_RETURN_DEPTH, |kind| {
        self.is_converting(kind)
      }) {
        let dedent = self.frame().dedent;
        let text = generate_exports(&self.printer.render(argument.span(), &[], dedent));
        trace!(offset = it.span.start, "factory return to module.exports");
        self.frame().edits.push(Edit {
          span: it.span,
          text,
        });
        return;
      }
    }
    walk::walk_return_statement(self, it);
  }
}

/// Walks `program` and returns the top-level edits that turn its AMD modules
/// into CommonJS.
pub(crate) fn rewrite_program<'a>(
  program: &Program<'a>,
  printer: &Printer,
  options: ConvertOptions,
) -> Result<Vec<Edit>, ConvertError> {
  let mut rewriter = AmdRewriter::new(program, printer, options);
  rewriter.visit_program(program);
  rewriter.finish()
}
