//! Identity types for Vista
//!
//! Numeric ids are 64-bit and cheap to copy. Targets are addressed by the
//! stable string identifiers the host page already uses (`box1`, `.content p`,
//! `macbook`), so they stay readable in traces.

use std::fmt;
use std::sync::Arc;

/// Trigger region identity - a section of the document that scroll is measured against
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TriggerId(pub u64);

impl TriggerId {
    pub const ZERO: TriggerId = TriggerId(0);

    #[inline]
    pub fn new(id: u64) -> Self {
        TriggerId(id)
    }
}

impl fmt::Debug for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Trigger({})", self.0)
    }
}

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trigger-{}", self.0)
    }
}

/// Scroll subscription identity, handed out by the tracker on bind
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subscription(pub u64);

impl Subscription {
    #[inline]
    pub fn new(id: u64) -> Self {
        Subscription(id)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Mounted page section identity
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(pub u64);

impl SectionId {
    #[inline]
    pub fn new(id: u64) -> Self {
        SectionId(id)
    }
}

impl fmt::Debug for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Section({})", self.0)
    }
}

/// Stable identifier of a host element or scene node (`box3`, `.mask img`, `macbook`)
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(Arc<str>);

impl TargetId {
    pub fn new(id: &str) -> Self {
        TargetId(Arc::from(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TargetId {
    fn from(id: &str) -> Self {
        TargetId::new(id)
    }
}

impl fmt::Debug for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Target({})", self.0)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_target_id_equality() {
        let a = TargetId::new("box1");
        let b: TargetId = "box1".into();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "box1");
        assert_eq!(format!("{}", a), "box1");
    }

    #[test]
    fn test_target_id_hashing() {
        let mut set = HashSet::new();
        set.insert(TargetId::new(".content p"));
        set.insert(TargetId::new(".content p"));
        set.insert(TargetId::new(".mask img"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_trigger_display() {
        assert_eq!(format!("{}", TriggerId::new(7)), "trigger-7");
        assert_eq!(format!("{:?}", TriggerId::new(7)), "Trigger(7)");
    }
}
