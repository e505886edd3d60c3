use serde::{Deserialize, Serialize};

/// Bounded counter for a finite resource (course seats, hostel rooms).
///
/// `available` never exceeds `total` and never goes below zero; `reserve`
/// either applies in full or leaves the counter untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    total: u32,
    available: u32,
}

impl Capacity {
    /// A fresh resource with every unit available.
    pub fn new(total: u32) -> Self {
        Self {
            total,
            available: total,
        }
    }

    /// Rehydrate a counter from stored totals.
    pub fn with_available(total: u32, available: u32) -> Result<Self, CapacityError> {
        if available > total {
            return Err(CapacityError::AvailableExceedsTotal { total, available });
        }
        Ok(Self { total, available })
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn available(&self) -> u32 {
        self.available
    }

    pub fn in_use(&self) -> u32 {
        self.total - self.available
    }

    pub fn is_exhausted(&self) -> bool {
        self.available == 0
    }

    /// Take `count` units, failing without partial effect if fewer remain.
    pub fn reserve(&mut self, count: u32) -> Result<(), CapacityError> {
        if count > self.available {
            return Err(CapacityError::Insufficient {
                requested: count,
                available: self.available,
            });
        }
        self.available -= count;
        Ok(())
    }

    /// Return `count` units, bounded by what is actually in use.
    pub fn release(&mut self, count: u32) -> Result<(), CapacityError> {
        let in_use = self.in_use();
        if count > in_use {
            return Err(CapacityError::ReleaseExceedsUse {
                requested: count,
                in_use,
            });
        }
        self.available += count;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CapacityError {
    #[error("insufficient capacity: requested {requested}, available {available}")]
    Insufficient { requested: u32, available: u32 },
    #[error("release of {requested} exceeds units in use ({in_use})")]
    ReleaseExceedsUse { requested: u32, in_use: u32 },
    #[error("stored counter invalid: available {available} exceeds total {total}")]
    AvailableExceedsTotal { total: u32, available: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_decrements_and_bounds() {
        let mut seats = Capacity::new(3);
        seats.reserve(2).expect("two of three");
        assert_eq!(seats.available(), 1);
        assert_eq!(seats.in_use(), 2);

        let err = seats.reserve(2).expect_err("only one left");
        assert_eq!(
            err,
            CapacityError::Insufficient {
                requested: 2,
                available: 1,
            }
        );
        // Failed reservation leaves the counter untouched.
        assert_eq!(seats.available(), 1);
    }

    #[test]
    fn reserve_zero_is_a_no_op() {
        let mut seats = Capacity::new(0);
        seats.reserve(0).expect("zero against zero");
        assert!(seats.is_exhausted());
    }

    #[test]
    fn release_is_bounded_by_units_in_use() {
        let mut rooms = Capacity::new(5);
        rooms.reserve(2).expect("reserve");
        rooms.release(1).expect("release one");
        assert_eq!(rooms.available(), 4);

        let err = rooms.release(2).expect_err("only one in use");
        assert_eq!(
            err,
            CapacityError::ReleaseExceedsUse {
                requested: 2,
                in_use: 1,
            }
        );
    }

    #[test]
    fn with_available_rejects_inconsistent_counters() {
        assert!(Capacity::with_available(4, 4).is_ok());
        assert!(Capacity::with_available(4, 0).is_ok());
        assert!(matches!(
            Capacity::with_available(4, 5),
            Err(CapacityError::AvailableExceedsTotal { .. })
        ));
    }
}
