use crate::domain::model::ScopeItemState;

/// Read access to a set of scope item states by exact name.
///
/// Unknown names resolve to the neutral defaults (not in scope, quantity 0),
/// never to an error.
pub trait ScopeLookup {
    fn find(&self, name: &str) -> Option<&ScopeItemState>;

    fn in_scope(&self, name: &str) -> bool {
        self.find(name).map(|s| s.is_in_scope()).unwrap_or(false)
    }

    /// Quantity regardless of the in-scope flag.
    fn details(&self, name: &str) -> f64 {
        self.find(name).map(|s| s.details).unwrap_or(0.0)
    }

    /// Quantity only when the item is in scope, else 0.
    fn scoped_details(&self, name: &str) -> f64 {
        match self.find(name) {
            Some(s) if s.is_in_scope() => s.details,
            _ => 0.0,
        }
    }
}
