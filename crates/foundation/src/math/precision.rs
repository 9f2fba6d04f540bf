//! Precision policies.
//!
//! Floats used as ordered keys (dash arrays keyed into the pattern atlas,
//! zoom stops) go through the canonicalization here so lookups are
//! deterministic.

use core::cmp::Ordering;

/// Canonicalize a floating-point value for deterministic ordering.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f32(v: f32) -> f32 {
    if v == 0.0 {
        // Handles +0.0 and -0.0.
        0.0
    } else if v.is_nan() {
        f32::NAN
    } else {
        v
    }
}

/// Deterministic total ordering for floats.
pub fn stable_total_cmp_f32(a: f32, b: f32) -> Ordering {
    canonical_f32(a).total_cmp(&canonical_f32(b))
}

/// A float wrapper with a deterministic total ordering.
///
/// Treats NaN as equal to NaN (after canonicalization), enabling use in
/// `BTreeMap` keys.
#[derive(Debug, Copy, Clone, Default)]
pub struct StableF32(pub f32);

impl PartialEq for StableF32 {
    fn eq(&self, other: &Self) -> bool {
        stable_total_cmp_f32(self.0, other.0) == Ordering::Equal
    }
}

impl Eq for StableF32 {}

impl PartialOrd for StableF32 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StableF32 {
    fn cmp(&self, other: &Self) -> Ordering {
        stable_total_cmp_f32(self.0, other.0)
    }
}

/// Wraps a float slice into an ordered key.
pub fn stable_key(values: &[f32]) -> Vec<StableF32> {
    values.iter().copied().map(StableF32).collect()
}
