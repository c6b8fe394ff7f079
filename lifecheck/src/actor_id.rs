use std::{hash::Hash, sync::Arc};

/// Stable identity of one observed actor (an activity instance under test).
///
/// Callback sources report transitions against an `ActorId`; wait predicates
/// and expected sequences name actors the same way. Activity class names make
/// good IDs:
///
/// ```
/// use lifecheck::ActorId;
///
/// let first = ActorId::new("FirstActivity");
/// assert_eq!(first.as_str(), "FirstActivity");
/// assert_eq!(first, ActorId::from("FirstActivity"));
/// ```
///
/// `ActorId` is cheap to clone. Equality compares the string contents, with a
/// fast path when both sides share an allocation.
#[derive(Debug, Clone, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(Arc<str>);

impl ActorId {
    pub fn new(id: &str) -> Self {
        Self(Arc::from(id))
    }

    /// Returns the string representation of this actor ID.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for ActorId {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for ActorId {}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Hash for ActorId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl From<&str> for ActorId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ActorId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<&ActorId> for ActorId {
    fn from(id: &ActorId) -> Self {
        id.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn clones_compare_equal() {
        let a = ActorId::new("FirstActivity");
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn separate_allocations_compare_by_content() {
        let a = ActorId::new("FirstActivity");
        let b = ActorId::from(String::from("FirstActivity"));
        assert_eq!(a, b);
        assert_ne!(a, ActorId::new("SecondActivity"));
    }

    #[test]
    fn hash_matches_equality() {
        let mut set = HashSet::new();
        set.insert(ActorId::new("A"));
        assert!(set.contains(&ActorId::from("A")));
        assert!(!set.contains(&ActorId::from("B")));
    }

    #[test]
    fn display_is_the_raw_name() {
        assert_eq!(ActorId::new("SingleTopActivity").to_string(), "SingleTopActivity");
    }
}
