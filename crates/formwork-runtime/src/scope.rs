//! Resolving a form name from an enclosing scope
//!
//! Field components may live anywhere below the container that names their
//! form. Containers expose their ancestry through [`FormScope`], and the
//! nearest container carrying a form marker wins.

/// A node in a container hierarchy that may carry a form marker
pub trait FormScope {
    /// Form name declared by this node, if any
    fn form_marker(&self) -> Option<&str>;

    /// Enclosing node
    fn parent(&self) -> Option<&Self>;
}

/// Walk from `scope` up to the nearest node with a form marker
///
/// Returns `None` when no ancestor (including `scope` itself) names a form.
pub fn resolve_form_name<S: FormScope + ?Sized>(scope: &S) -> Option<&str> {
    let mut node = Some(scope);
    while let Some(current) = node {
        if let Some(name) = current.form_marker() {
            return Some(name);
        }
        node = current.parent();
    }
    None
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal container chain used by tests
    #[derive(Debug)]
    pub(crate) struct Node<'a> {
        pub marker: Option<&'a str>,
        pub parent: Option<&'a Node<'a>>,
    }

    impl FormScope for Node<'_> {
        fn form_marker(&self) -> Option<&str> {
            self.marker
        }

        fn parent(&self) -> Option<&Self> {
            self.parent
        }
    }

    #[test]
    fn test_nearest_marker_wins() {
        let root = Node { marker: Some("outer"), parent: None };
        let inner = Node { marker: Some("inner"), parent: Some(&root) };
        let leaf = Node { marker: None, parent: Some(&inner) };

        assert_eq!(resolve_form_name(&leaf), Some("inner"));
        assert_eq!(resolve_form_name(&root), Some("outer"));
    }

    #[test]
    fn test_deep_chain() {
        let root = Node { marker: Some("login"), parent: None };
        let a = Node { marker: None, parent: Some(&root) };
        let b = Node { marker: None, parent: Some(&a) };
        let c = Node { marker: None, parent: Some(&b) };

        assert_eq!(resolve_form_name(&c), Some("login"));
    }

    #[test]
    fn test_no_marker() {
        let root = Node { marker: None, parent: None };
        let leaf = Node { marker: None, parent: Some(&root) };

        assert_eq!(resolve_form_name(&leaf), None);
    }
}
