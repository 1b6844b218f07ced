#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
  #[error("{message}")]
  Syntax {
    message: String,
    offset: Option<usize>,
  },
  #[error("cannot resolve dependency list `{name}` to an array literal")]
  UnresolvedDependencies { name: String, offset: usize },
}

impl ConvertError {
  /// Byte offset into the source the error points at, if known.
  pub fn offset(&self) -> Option<usize> {
    match self {
      ConvertError::Syntax { offset, .. } => *offset,
      ConvertError::UnresolvedDependencies { offset, .. } => Some(*offset),
    }
  }
}
