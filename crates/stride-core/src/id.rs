//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a worker thread within a run.
///
/// Workers are spawned at run start and assigned sequential IDs.
/// `WorkerId(n)` corresponds to the n-th worker, `0 <= n < threads`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(pub u32);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for WorkerId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_id_display_is_bare_number() {
        assert_eq!(WorkerId(7).to_string(), "7");
    }

    #[test]
    fn worker_id_orders_by_index() {
        assert!(WorkerId(0) < WorkerId(1));
        assert_eq!(WorkerId::from(3), WorkerId(3));
    }
}
