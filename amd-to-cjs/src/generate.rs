pub(crate) fn generate_require(specifier: &str, binding: Option<&str>) -> String {
  match binding {
    Some(binding) => format!("var {binding} = require({specifier});"),
    None => format!("require({specifier});"),
  }
}

pub(crate) fn generate_exports(expr: &str) -> String {
  format!("module.exports = {expr};")
}
