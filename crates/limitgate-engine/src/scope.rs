//! Namespace scope filtering
//!
//! Pure predicate deciding whether a namespace falls under a policy's
//! include/exclude filters. Exclude always wins over include.

/// Whether `name` is in scope for the given filters
///
/// A non-empty include list requires membership; the exclude list then
/// removes names regardless of how they qualified. Total: no error
/// cases, no side effects.
pub fn in_scope(name: &str, include: &[String], exclude: &[String]) -> bool {
    if !include.is_empty() && !include.iter().any(|n| n == name) {
        return false;
    }
    !exclude.iter().any(|n| n == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_include_means_all() {
        assert!(in_scope("anything", &[], &[]));
    }

    #[test]
    fn test_include_requires_membership() {
        let include = names(&["a", "b"]);
        assert!(in_scope("a", &include, &[]));
        assert!(!in_scope("c", &include, &[]));
    }

    #[test]
    fn test_exclude_filters() {
        let exclude = names(&["kube-system"]);
        assert!(!in_scope("kube-system", &[], &exclude));
        assert!(in_scope("team-a", &[], &exclude));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let include = names(&["a", "kube-system"]);
        let exclude = names(&["kube-system"]);
        assert!(!in_scope("kube-system", &include, &exclude));
        assert!(in_scope("a", &include, &exclude));
    }
}
