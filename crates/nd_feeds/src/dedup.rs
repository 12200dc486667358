use std::collections::HashSet;

/// Remembers normalized titles seen during one aggregation pass.
#[derive(Debug, Default)]
pub struct DuplicateSuppressor {
    seen: HashSet<String>,
}

impl DuplicateSuppressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time a signature is offered, false afterwards.
    pub fn admit(&mut self, signature: &str) -> bool {
        if self.seen.contains(signature) {
            return false;
        }
        self.seen.insert(signature.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_title;

    #[test]
    fn test_first_signature_wins() {
        let mut suppressor = DuplicateSuppressor::new();
        assert!(suppressor.is_empty());
        assert!(suppressor.admit(&normalize_title("[Tag] Foo - Source A")));
        assert!(!suppressor.admit(&normalize_title("Foo | Source B")));
        assert!(suppressor.admit(&normalize_title("Bar - Source A")));
        assert_eq!(suppressor.len(), 2);
    }

    #[test]
    fn test_signatures_are_exact() {
        let mut suppressor = DuplicateSuppressor::new();
        assert!(suppressor.admit("Foo"));
        assert!(suppressor.admit("foo"));
        assert!(suppressor.admit("Foo bar"));
    }
}
