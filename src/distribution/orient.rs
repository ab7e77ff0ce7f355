//! Canonical orientation of a raw curve.
//!
//! Porosimeters report intrusion with diameters falling as pressure rises,
//! while cumulative void ratio rises. Files of known distributions come in
//! either order. Downstream stages want one form: `d` ascending and `e`
//! growing with `d`.
//!
//! Pairs are always co-sorted, so a diameter keeps its own void ratio. If, in
//! diameter order, the void ratio falls from the first to the last point, the
//! curve is reflected about its maximum (`e' = max(e) - e`). Repeated
//! diameters are ordered by the final void ratio, so a monotone run stays
//! monotone across the tie. Running the normalizer on its own output changes
//! nothing.

use std::cmp::Ordering;

use crate::domain::Curve;
use crate::error::{PoreError, Stage};

/// Return `curve` with `d` ascending and `e` increasing with `d`.
pub fn orient(curve: &Curve) -> Result<Curve, PoreError> {
    let n = curve.len();
    let mut pairs: Vec<(f64, f64)> = curve.d().iter().copied().zip(curve.e().iter().copied()).collect();
    sort_pairs(&mut pairs);

    if pairs[0].1 > pairs[n - 1].1 {
        let (_, max) = curve.e_range();
        for (_, e) in &mut pairs {
            *e = max - *e;
        }
        // Reflection flips the order inside each run of equal diameters.
        sort_pairs(&mut pairs);
        tracing::debug!(points = n, "reflected void ratio about its maximum");
    }

    let (d, e) = pairs.into_iter().unzip();
    Curve::checked(Stage::Orientation, d, e)
}

fn sort_pairs(pairs: &mut [(f64, f64)]) {
    pairs.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(Ordering::Equal)
            .then(a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
    });
}

/// `true` when `d` is ascending and `e` never falls along it.
pub fn is_canonical(curve: &Curve) -> bool {
    let d = curve.d();
    let e = curve.e();
    d.windows(2).all(|w| w[0] <= w[1]) && e.windows(2).all(|w| w[0] <= w[1])
}
