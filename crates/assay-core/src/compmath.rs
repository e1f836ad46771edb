//! Pure arithmetic over composition vectors.
//!
//! None of these functions allocate identity or touch shared state; they are
//! the building blocks [`Composition`](crate::Composition) and materials use
//! to combine and split mass vectors. Binary operations take the union of
//! both key sets, treating a missing nuclide as zero.

use crate::error::CompositionError;
use crate::types::CompMap;

/// Sum of all components.
pub fn sum(v: &CompMap) -> f64 {
    v.values().sum()
}

/// Scale `v` in place so its components sum to `total`.
///
/// Empty and zero-sum vectors are left unchanged.
pub fn normalize(v: &mut CompMap, total: f64) {
    let current = sum(v);
    if v.is_empty() || current == 0.0 {
        return;
    }
    let factor = total / current;
    for value in v.values_mut() {
        *value *= factor;
    }
}

/// Component-wise `a + b`.
pub fn add(a: &CompMap, b: &CompMap) -> CompMap {
    let mut out = a.clone();
    for (nuc, value) in b {
        *out.entry(*nuc).or_insert(0.0) += value;
    }
    out
}

/// Component-wise `a - b`. Components may go negative.
pub fn sub(a: &CompMap, b: &CompMap) -> CompMap {
    let mut out = a.clone();
    for (nuc, value) in b {
        *out.entry(*nuc).or_insert(0.0) -= value;
    }
    out
}

/// Drop every component whose magnitude is at or below `threshold`.
///
/// # Errors
///
/// - [`CompositionError::NegativeThreshold`] if `threshold < 0`; `v` is untouched.
pub fn apply_threshold(v: &mut CompMap, threshold: f64) -> Result<(), CompositionError> {
    if threshold < 0.0 || threshold.is_nan() {
        return Err(CompositionError::NegativeThreshold(threshold));
    }
    v.retain(|_, value| value.abs() > threshold);
    Ok(())
}

/// Convert a mass vector to an (unnormalized) atom vector.
pub fn mass_to_atom(mass: &CompMap) -> CompMap {
    mass.iter()
        .map(|(nuc, m)| (*nuc, m / nuc.molar_mass()))
        .collect()
}

/// Convert an atom vector to an (unnormalized) mass vector.
pub fn atom_to_mass(atom: &CompMap) -> CompMap {
    atom.iter()
        .map(|(nuc, n)| (*nuc, n * nuc.molar_mass()))
        .collect()
}

/// Whether `a` and `b` agree within `tol` once both are normalized to 1.
pub fn almost_eq(a: &CompMap, b: &CompMap, tol: f64) -> bool {
    let mut a = a.clone();
    let mut b = b.clone();
    normalize(&mut a, 1.0);
    normalize(&mut b, 1.0);
    let diff = sub(&a, &b);
    diff.values().all(|d| d.abs() <= tol)
}
