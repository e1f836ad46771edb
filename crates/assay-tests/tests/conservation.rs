//! Conservation tests.
//!
//! Mass must never be created or destroyed by splitting and recombining.
//! Single splits and same-composition round trips are exact; long random
//! sequences are checked against a relative tolerance, since each split can
//! round its pieces by one ulp.

use assay_core::constants::{U235, U238};
use assay_material::{Material, MaterialError};
use assay_tests::helpers::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ---------------------------------------------------------------------------
// Exact laws
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn split_is_exact(total in 0.0f64..1e9, frac in 0.0f64..=1.0) {
        let ctx = static_context();
        let mut m = Material::create(&ctx, total, fresh_fuel()).unwrap();
        let part = m.extract_qty(total * frac).unwrap();
        prop_assert_eq!(m.quantity() + part.quantity(), total);
    }

    #[test]
    fn round_trip_is_exact(total in 0.0f64..1e9, fracs in prop::collection::vec(0.0f64..=1.0, 1..10)) {
        let ctx = static_context();
        let c = fresh_fuel();
        let mut m = Material::create(&ctx, total, c.clone()).unwrap();
        for frac in fracs {
            let mut part = m.extract_qty(m.quantity() * frac).unwrap();
            m.absorb(&mut part).unwrap();
            prop_assert_eq!(part.quantity(), 0.0);
        }
        prop_assert_eq!(m.quantity(), total);
        prop_assert_eq!(m.comp(), c);
    }

    #[test]
    fn overdraft_is_rejected(total in 0.0f64..1e6, extra in 1e-6f64..1e6) {
        let ctx = static_context();
        let mut m = Material::create(&ctx, total, fresh_fuel()).unwrap();
        let err = m.extract_qty(total + extra).unwrap_err();
        let is_overdraft = matches!(err, MaterialError::Overdraft { .. });
        prop_assert!(is_overdraft);
        prop_assert_eq!(m.quantity(), total);
    }
}

// ---------------------------------------------------------------------------
// Random exchange sequences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Step {
    Extract { from: usize, frac: f64 },
    Absorb { into: usize, from: usize },
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (any::<usize>(), 0.0f64..=1.0).prop_map(|(from, frac)| Step::Extract { from, frac }),
        (any::<usize>(), any::<usize>()).prop_map(|(into, from)| Step::Absorb { into, from }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn mixed_sequences_conserve_mass(steps in prop::collection::vec(step(), 1..80)) {
        let ctx = static_context();
        let mut pool = seed(&ctx, 2, 50.0, &fresh_fuel());
        pool.push(Material::create(&ctx, 25.0, spent_fuel()).unwrap());
        let before = total_mass(&pool);

        for s in steps {
            match s {
                Step::Extract { from, frac } => {
                    let i = from % pool.len();
                    let q = pool[i].quantity() * frac;
                    let part = pool[i].extract_qty(q).unwrap();
                    pool.push(part);
                }
                Step::Absorb { into, from } => {
                    let i = into % pool.len();
                    let j = from % pool.len();
                    if i != j {
                        let mut other = pool.swap_remove(j);
                        let i = if i == pool.len() { j } else { i };
                        pool[i].absorb(&mut other).unwrap();
                        prop_assert_eq!(other.quantity(), 0.0);
                    }
                }
            }
        }

        let after = total_mass(&pool);
        prop_assert!((after - before).abs() <= 1e-9 * before, "before {} after {}", before, after);
        for m in &pool {
            prop_assert!(m.quantity() >= 0.0);
        }
    }
}

#[test]
fn random_walk_conserves_mass() {
    let ctx = static_context();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut pool = seed(&ctx, 4, 100.0, &spent_fuel());
    let before = total_mass(&pool);

    for _ in 0..2_000 {
        let i = rng.gen_range(0..pool.len());
        if rng.gen_bool(0.5) || pool.len() < 2 {
            let q = pool[i].quantity() * rng.gen_range(0.0..1.0);
            let part = pool[i].extract_qty(q).unwrap();
            pool.push(part);
        } else {
            let mut other = pool.swap_remove(i);
            let j = rng.gen_range(0..pool.len());
            pool[j].absorb(&mut other).unwrap();
        }
    }

    let after = total_mass(&pool);
    assert!((after - before).abs() <= 1e-9 * before);
}

#[test]
fn extraction_with_arithmetic_conserves_nuclides() {
    let ctx = static_context();
    let source = fresh_fuel();
    let mut m = Material::create(&ctx, 100.0, source.clone()).unwrap();
    let u238 = comp(&[(U238, 1.0)]);

    let part = m.extract_comp(10.0, &u238, 1e-9).unwrap();
    let left = m.comp();
    let u235_left = left.mass()[&U235] * m.quantity();
    let u235_start = source.mass()[&U235] * 100.0;

    assert!((m.quantity() + part.quantity() - 100.0).abs() < 1e-12);
    assert!((u235_left - u235_start).abs() < 1e-9);
}
