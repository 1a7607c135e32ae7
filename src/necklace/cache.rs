use serde::{Deserialize, Serialize};

use super::error::{NecklaceError, NecklaceResult};

/// What happens to existing per-sample shifts when the sample count changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShiftPolicy {
    /// Drop every shift and start over at zero.
    #[default]
    Reset,
    /// Keep the shared prefix, zero-fill the rest.
    Preserve,
}

/// Reconciles stored shifts with a requested sample count using the reset
/// policy. Returns the shifts to use and whether they were reallocated.
pub fn reconcile(
    requested: usize,
    previous: Option<usize>,
    existing: &[f64],
) -> NecklaceResult<(Vec<f64>, bool)> {
    if previous == Some(requested) {
        Ok((existing.to_vec(), false))
    } else {
        Ok((zeroed(requested)?, true))
    }
}

/// `count` zeros, or an error when the allocation cannot be made.
fn zeroed(count: usize) -> NecklaceResult<Vec<f64>> {
    let mut shifts = Vec::new();
    grow(&mut shifts, count)?;
    Ok(shifts)
}

fn grow(shifts: &mut Vec<f64>, count: usize) -> NecklaceResult<()> {
    let additional = count.saturating_sub(shifts.len());
    shifts
        .try_reserve_exact(additional)
        .map_err(|_| NecklaceError::SampleCountTooLarge { count })?;
    shifts.resize(count, 0.0);
    Ok(())
}

/// Per-sample length shifts that survive recomputation while the sample
/// count stays the same.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShiftCache {
    last_count: Option<usize>,
    shifts: Vec<f64>,
    policy: ShiftPolicy,
}

impl ShiftCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_policy(policy: ShiftPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn policy(&self) -> ShiftPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: ShiftPolicy) {
        self.policy = policy;
    }

    /// Sample count seen by the last [`reconcile`](Self::reconcile) call.
    #[must_use]
    pub const fn last_count(&self) -> Option<usize> {
        self.last_count
    }

    #[must_use]
    pub fn shifts(&self) -> &[f64] {
        &self.shifts
    }

    /// Brings the storage in line with `requested`. Returns `true` when the
    /// storage was rebuilt. The first call always rebuilds. A count that
    /// cannot be allocated leaves the cache untouched.
    pub fn reconcile(&mut self, requested: usize) -> NecklaceResult<bool> {
        if self.last_count == Some(requested) {
            return Ok(false);
        }

        match self.policy {
            ShiftPolicy::Reset => {
                self.shifts = zeroed(requested)?;
            }
            ShiftPolicy::Preserve => {
                grow(&mut self.shifts, requested)?;
            }
        }
        log::debug!(
            "shift cache rebuilt: {:?} -> {requested} samples ({:?})",
            self.last_count,
            self.policy
        );
        self.last_count = Some(requested);
        Ok(true)
    }

    pub fn set_shift(&mut self, index: usize, value: f64) -> NecklaceResult<()> {
        if !value.is_finite() {
            return Err(NecklaceError::NonFinite { field: "shift" });
        }
        let count = self.shifts.len();
        let slot = self
            .shifts
            .get_mut(index)
            .ok_or(NecklaceError::ShiftIndexOutOfRange { index, count })?;
        *slot = value;
        Ok(())
    }

    /// Replaces every shift at once; the length must match the current count.
    pub fn set_shifts(&mut self, values: &[f64]) -> NecklaceResult<()> {
        if values.len() != self.shifts.len() {
            return Err(NecklaceError::ShiftLengthMismatch {
                expected: self.shifts.len(),
                actual: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(NecklaceError::NonFinite { field: "shift" });
        }
        self.shifts.copy_from_slice(values);
        Ok(())
    }

    /// Forgets the last seen count so the next reconcile rebuilds.
    pub fn invalidate(&mut self) {
        self.last_count = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_reconcile_resets_on_count_change() {
        let (shifts, changed) = reconcile(3, Some(2), &[1.0, 2.0]).unwrap();
        assert!(changed);
        assert_eq!(shifts, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn free_reconcile_keeps_shifts_on_same_count() {
        let (shifts, changed) = reconcile(2, Some(2), &[1.0, -2.0]).unwrap();
        assert!(!changed);
        assert_eq!(shifts, vec![1.0, -2.0]);
    }

    #[test]
    fn free_reconcile_first_call_allocates() {
        let (shifts, changed) = reconcile(0, None, &[]).unwrap();
        assert!(changed);
        assert!(shifts.is_empty());
    }

    #[test]
    fn cache_preserves_edits_while_count_is_stable() {
        let mut cache = ShiftCache::new();
        assert!(cache.reconcile(4).unwrap());
        cache.set_shift(1, 0.25).unwrap();
        cache.set_shift(3, -1.5).unwrap();

        assert!(!cache.reconcile(4).unwrap());
        assert_eq!(cache.shifts(), &[0.0, 0.25, 0.0, -1.5]);
    }

    #[test]
    fn cache_resets_all_edits_on_count_change() {
        let mut cache = ShiftCache::new();
        cache.reconcile(3).unwrap();
        cache.set_shifts(&[1.0, 2.0, 3.0]).unwrap();

        assert!(cache.reconcile(2).unwrap());
        assert_eq!(cache.shifts(), &[0.0, 0.0]);
        assert_eq!(cache.last_count(), Some(2));

        // Going back to the old count does not bring old values back.
        assert!(cache.reconcile(3).unwrap());
        assert_eq!(cache.shifts(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn preserve_policy_keeps_common_prefix() {
        let mut cache = ShiftCache::with_policy(ShiftPolicy::Preserve);
        cache.reconcile(3).unwrap();
        cache.set_shifts(&[1.0, 2.0, 3.0]).unwrap();

        assert!(cache.reconcile(5).unwrap());
        assert_eq!(cache.shifts(), &[1.0, 2.0, 3.0, 0.0, 0.0]);
        assert!(cache.reconcile(2).unwrap());
        assert_eq!(cache.shifts(), &[1.0, 2.0]);
    }

    #[test]
    fn unallocatable_count_is_an_error() {
        let huge = usize::MAX / 2;
        assert_eq!(
            reconcile(huge, None, &[]),
            Err(NecklaceError::SampleCountTooLarge { count: huge })
        );

        let mut cache = ShiftCache::new();
        cache.reconcile(2).unwrap();
        assert_eq!(
            cache.reconcile(huge),
            Err(NecklaceError::SampleCountTooLarge { count: huge })
        );
        assert_eq!(cache.shifts(), &[0.0, 0.0]);
        assert_eq!(cache.last_count(), Some(2));
    }

    #[test]
    fn set_shift_out_of_range_is_an_error() {
        let mut cache = ShiftCache::new();
        cache.reconcile(2).unwrap();
        assert_eq!(
            cache.set_shift(2, 1.0),
            Err(NecklaceError::ShiftIndexOutOfRange { index: 2, count: 2 })
        );
        assert_eq!(cache.shifts().len(), 2);
    }

    #[test]
    fn set_shifts_rejects_wrong_length_and_non_finite() {
        let mut cache = ShiftCache::new();
        cache.reconcile(2).unwrap();
        assert_eq!(
            cache.set_shifts(&[1.0]),
            Err(NecklaceError::ShiftLengthMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            cache.set_shifts(&[1.0, f64::NAN]),
            Err(NecklaceError::NonFinite { field: "shift" })
        );
        assert_eq!(cache.shifts(), &[0.0, 0.0]);
    }

    #[test]
    fn invalidate_forces_rebuild() {
        let mut cache = ShiftCache::new();
        cache.reconcile(2).unwrap();
        cache.set_shift(0, 4.0).unwrap();
        cache.invalidate();
        assert!(cache.reconcile(2).unwrap());
        assert_eq!(cache.shifts(), &[0.0, 0.0]);
    }
}
