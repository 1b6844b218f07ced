/// Number of ancestors between a factory's own `return` and the AMD call:
/// function body, function, call.
pub(crate) const FACTORY_RETURN_DEPTH: usize = 3;

/// Walks up from the innermost entry of `ancestors` (the node's parent),
/// visiting at most `max_depth` entries, and reports whether any satisfies
/// `predicate`.
pub(crate) fn has_ancestor<T>(
  ancestors: &[T],
  max_depth: usize,
  mut predicate: impl FnMut(&T) -> bool,
) -> bool {
  let mut depth = 0;
  for ancestor in ancestors.iter().rev() {
    if depth == max_depth {
      return false;
    }
    if predicate(ancestor) {
      return true;
    }
    depth += 1;
  }
  false
}

#[cfg(test)]
mod tests {
  use super::has_ancestor;

  #[test]
  fn finds_ancestor_within_depth() {
    let chain = [1, 2, 3, 4];
    assert!(has_ancestor(&chain, 3, |&n| n == 2));
    assert!(has_ancestor(&chain, 1, |&n| n == 4));
  }

  #[test]
  fn stops_at_max_depth() {
    let chain = [1, 2, 3, 4];
    assert!(!has_ancestor(&chain, 3, |&n| n == 1));
    assert!(!has_ancestor(&chain, 0, |&n| n == 4));
  }

  #[test]
  fn runs_off_the_root() {
    let chain: [u8; 0] = [];
    assert!(!has_ancestor(&chain, 3, |_| true));
    assert!(!has_ancestor(&[7], 3, |&n| n == 8));
  }
}
