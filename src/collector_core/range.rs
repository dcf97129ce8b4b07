//! Block range resolution
//!
//! Turns the optional `from` / `to` / `count` arguments into a concrete
//! half-open `[from, to)` interval. Rules, first match wins:
//!
//! 1. from + to        → as given
//! 2. from + count     → `[from, from + count)`
//! 3. from only        → `[from, latest)`
//! 4. to + count       → `[to - count, to)`
//! 5. count only       → `[latest - count, latest)`
//! 6. nothing          → `[0, latest)`
//!
//! A `from` that would go below zero is rejected, never clamped.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeSpec {
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// `to - count` went below zero
    NegativeFrom { to: u64, count: u64 },
    /// `from + count` does not fit in a block number
    Overflow { from: u64, count: u64 },
    /// Resolved `from` lies past `to`
    Inverted { from: u64, to: u64 },
}

impl std::fmt::Display for RangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeError::NegativeFrom { to, count } => {
                write!(f, "count {} exceeds upper bound {}: start block would be negative", count, to)
            }
            RangeError::Overflow { from, count } => {
                write!(f, "start block {} plus count {} overflows", from, count)
            }
            RangeError::Inverted { from, to } => {
                write!(f, "start block {} is past end block {}", from, to)
            }
        }
    }
}

impl std::error::Error for RangeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub from: u64,
    pub to: u64,
}

impl BlockRange {
    pub fn len(&self) -> u64 {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    pub fn blocks(&self) -> impl Iterator<Item = u64> {
        self.from..self.to
    }
}

impl RangeSpec {
    /// Resolve against the shard's current chain head
    pub fn resolve(&self, latest: u64) -> Result<BlockRange, RangeError> {
        let (from, to) = match (self.from, self.to, self.count) {
            (Some(from), Some(to), _) => (from, to),
            (Some(from), None, Some(count)) => {
                let to = from.checked_add(count).ok_or(RangeError::Overflow { from, count })?;
                (from, to)
            }
            (Some(from), None, None) => (from, latest),
            (None, Some(to), Some(count)) => {
                let from = to.checked_sub(count).ok_or(RangeError::NegativeFrom { to, count })?;
                (from, to)
            }
            (None, None, Some(count)) => {
                let from = latest
                    .checked_sub(count)
                    .ok_or(RangeError::NegativeFrom { to: latest, count })?;
                (from, latest)
            }
            // `to` alone carries no start; everything up to it
            (None, Some(to), None) => (0, to),
            (None, None, None) => (0, latest),
        };

        if from > to {
            return Err(RangeError::Inverted { from, to });
        }

        Ok(BlockRange { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(from: Option<u64>, to: Option<u64>, count: Option<u64>) -> RangeSpec {
        RangeSpec { from, to, count }
    }

    #[test]
    fn test_from_and_to() {
        let range = spec(Some(10), Some(20), Some(999)).resolve(5_000).unwrap();
        assert_eq!(range, BlockRange { from: 10, to: 20 });
    }

    #[test]
    fn test_from_and_count_ignores_latest() {
        let range = spec(Some(100), None, Some(50)).resolve(7).unwrap();
        assert_eq!(range, BlockRange { from: 100, to: 150 });
        assert_eq!(range.len(), 50);
    }

    #[test]
    fn test_from_only_runs_to_latest() {
        let range = spec(Some(100), None, None).resolve(1_000).unwrap();
        assert_eq!(range, BlockRange { from: 100, to: 1_000 });
    }

    #[test]
    fn test_to_and_count() {
        let range = spec(None, Some(500), Some(200)).resolve(9_999).unwrap();
        assert_eq!(range, BlockRange { from: 300, to: 500 });
    }

    #[test]
    fn test_count_only_counts_back_from_latest() {
        let range = spec(None, None, Some(100)).resolve(1_000).unwrap();
        assert_eq!(range, BlockRange { from: 900, to: 1_000 });
    }

    #[test]
    fn test_nothing_given() {
        let range = RangeSpec::default().resolve(42).unwrap();
        assert_eq!(range, BlockRange { from: 0, to: 42 });
        assert_eq!(range.blocks().count(), 42);
    }

    #[test]
    fn test_negative_from_is_rejected() {
        assert_eq!(
            spec(None, Some(10), Some(20)).resolve(1_000),
            Err(RangeError::NegativeFrom { to: 10, count: 20 })
        );
        assert_eq!(
            spec(None, None, Some(50)).resolve(10),
            Err(RangeError::NegativeFrom { to: 10, count: 50 })
        );
    }

    #[test]
    fn test_count_equal_to_bound_is_allowed() {
        let range = spec(None, Some(10), Some(10)).resolve(0).unwrap();
        assert_eq!(range, BlockRange { from: 0, to: 10 });
    }

    #[test]
    fn test_inverted_and_overflow() {
        assert_eq!(
            spec(Some(2_000), None, None).resolve(1_000),
            Err(RangeError::Inverted { from: 2_000, to: 1_000 })
        );
        assert_eq!(
            spec(Some(30), Some(20), None).resolve(1_000),
            Err(RangeError::Inverted { from: 30, to: 20 })
        );
        assert!(matches!(
            spec(Some(u64::MAX), None, Some(1)).resolve(0),
            Err(RangeError::Overflow { .. })
        ));
    }
}
