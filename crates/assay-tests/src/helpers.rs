//! Shared helpers for integration tests.

use std::sync::Arc;

use assay_core::constants::{AM241, CS137, PU239, PU241, SR90, U235, U238};
use assay_core::record::MemoryRecorder;
use assay_core::{CompMap, Composition, Nuclide};
use assay_decay::{DecayEngine, HalfLifeTable, NoDecay};
use assay_material::{Context, Material, SimConfig};

/// Composition from `(nuclide, mass)` pairs.
pub fn comp(entries: &[(Nuclide, f64)]) -> Composition {
    let v: CompMap = entries.iter().copied().collect();
    Composition::from_mass(v).unwrap()
}

/// Low-enriched fresh fuel.
pub fn fresh_fuel() -> Composition {
    comp(&[(U235, 0.045), (U238, 0.955)])
}

/// A crude spent-fuel vector with a few short-lived fission products.
pub fn spent_fuel() -> Composition {
    comp(&[
        (U235, 0.8),
        (U238, 93.4),
        (PU239, 1.2),
        (PU241, 0.1),
        (AM241, 0.05),
        (CS137, 0.3),
        (SR90, 0.2),
    ])
}

/// Context whose decay collaborator never changes anything.
pub fn static_context() -> Context {
    Context::builder().decay_calculator(Arc::new(NoDecay)).build()
}

/// Context where one step is exactly one Cs-137 half-life and nothing else decays.
pub fn fast_decay_context() -> Context {
    let engine = DecayEngine::new()
        .with_table(HalfLifeTable::empty())
        .with_step_seconds(1)
        .with_half_life(CS137, 1.0)
        .unwrap();
    Context::builder().decay_calculator(Arc::new(engine)).build()
}

/// Context with the default engine that keeps every recorded datum.
pub fn recording_context() -> (Context, Arc<MemoryRecorder>) {
    let recorder = Arc::new(MemoryRecorder::new());
    let ctx = Context::builder()
        .config(SimConfig::default())
        .recorder(recorder.clone())
        .build();
    (ctx, recorder)
}

/// Sum of quantities.
pub fn total_mass<'a>(materials: impl IntoIterator<Item = &'a Material>) -> f64 {
    materials.into_iter().map(Material::quantity).sum()
}

/// Seed `n` tracked batches of `quantity` kilograms each.
pub fn seed(ctx: &Context, n: usize, quantity: f64, comp: &Composition) -> Vec<Material> {
    (0..n)
        .map(|_| Material::create(ctx, quantity, comp.clone()).unwrap())
        .collect()
}
