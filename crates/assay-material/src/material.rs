//! The material resource.
//!
//! A [`Material`] pairs a quantity in kilograms with a shared, immutable
//! [`Composition`]. Operations replace the composition wholesale and never
//! edit a snapshot in place.
//!
//! Every operation validates first and mutates last: when an error is
//! returned, the quantity, the composition and the provenance graph are as
//! they were before the call.
//!
//! Locks are always taken in the order registry, material state, tracker.

use std::fmt;
use std::sync::Arc;

use assay_core::compmath;
use assay_core::constants::{MASS_UNITS, MATERIAL_TYPE};
use assay_core::error::{CompositionError, DecayError};
use assay_core::{CompId, Composition, ObjId, SimTime};
use assay_heritage::{LineageEvent, Snapshot};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::context::Context;
use crate::error::MaterialError;
use crate::registry::{Registration, RegistryKey};

/// Whether, and as which entity, a material appears in the provenance graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lineage {
    /// Live entity in the graph; registered for decay sweeps.
    Tracked(ObjId),
    /// Never in the graph (samples and transient copies).
    Untracked,
    /// Was absorbed into another material; its history is closed.
    Retired(ObjId),
}

impl Lineage {
    pub fn obj(&self) -> Option<ObjId> {
        match self {
            Self::Tracked(obj) | Self::Retired(obj) => Some(*obj),
            Self::Untracked => None,
        }
    }

    pub fn is_tracked(&self) -> bool {
        matches!(self, Self::Tracked(_))
    }
}

/// Mutable part of a material, shared with the registry through a weak reference.
pub(crate) struct MaterialState {
    quantity: f64,
    comp: Composition,
    last_decay: SimTime,
    lineage: Lineage,
}

impl MaterialState {
    pub(crate) fn new(quantity: f64, comp: Composition, last_decay: SimTime, lineage: Lineage) -> Self {
        Self {
            quantity,
            comp,
            last_decay,
            lineage,
        }
    }

    pub(crate) fn quantity(&self) -> f64 {
        self.quantity
    }

    /// Replace the composition, reporting a modification if tracked.
    fn set_comp(&mut self, ctx: &Context, comp: Composition, time: SimTime) -> Result<(), MaterialError> {
        if let Lineage::Tracked(obj) = self.lineage {
            let snapshot = snapshot(self.quantity, &comp, time);
            ctx.apply(LineageEvent::Modified { obj, snapshot })?;
            comp.record(ctx.recorder());
        }
        self.comp = comp;
        Ok(())
    }

    fn decay_to(&mut self, ctx: &Context, time: SimTime) -> Result<(), MaterialError> {
        if !ctx.config().decays() {
            return Ok(());
        }
        if time < self.last_decay {
            warn!(
                time,
                last_decay = self.last_decay,
                obj = ?self.lineage.obj(),
                "decay requested for an earlier time; ignoring"
            );
            return Ok(());
        }
        let dt = time
            .checked_sub(self.last_decay)
            .and_then(|dt| u64::try_from(dt).ok())
            .ok_or(DecayError::ArithmeticOverflow)?;
        if dt == 0 {
            return Ok(());
        }

        let decayed = self.comp.decay(dt, ctx.decay_calculator())?;
        if decayed != self.comp {
            self.set_comp(ctx, decayed, time)?;
        }
        self.last_decay = time;
        Ok(())
    }
}

fn snapshot(quantity: f64, comp: &Composition, time: SimTime) -> Snapshot {
    Snapshot {
        quantity,
        comp: comp.id(),
        time,
    }
}

fn check_construction(quantity: f64) -> Result<(), MaterialError> {
    if quantity.is_finite() && quantity >= 0.0 {
        Ok(())
    } else {
        Err(MaterialError::Construction(format!(
            "quantity must be finite and non-negative, got {quantity}"
        )))
    }
}

/// Mass vector of `comp` scaled to `quantity` kilograms.
fn scaled_mass(comp: &Composition, quantity: f64) -> assay_core::CompMap {
    let mut v = comp.mass().clone();
    compmath::normalize(&mut v, quantity);
    v
}

/// Composition left after removing `take_qty` of `take` from `have_qty` of `have`.
fn remainder(
    have: &Composition,
    have_qty: f64,
    take: &Composition,
    take_qty: f64,
    threshold: f64,
) -> Result<Composition, CompositionError> {
    let mut left = compmath::sub(&scaled_mass(have, have_qty), &scaled_mass(take, take_qty));
    compmath::apply_threshold(&mut left, threshold)?;
    Composition::from_mass(left)
}

/// Composition of `a_qty` of `a` mixed with `b_qty` of `b`.
///
/// Both vectors are scaled to their quantities, summed and read back as atom
/// amounts.
fn mixture(a: &Composition, a_qty: f64, b: &Composition, b_qty: f64) -> Result<Composition, CompositionError> {
    if a == b || b_qty == 0.0 {
        return Ok(a.clone());
    }
    if a_qty == 0.0 {
        return Ok(b.clone());
    }
    Composition::from_atom(compmath::add(&scaled_mass(a, a_qty), &scaled_mass(b, b_qty)))
}

/// A quantity of material with a known isotopic composition.
pub struct Material {
    state: Arc<Mutex<MaterialState>>,
    ctx: Context,
    registration: Option<Registration>,
}

impl Material {
    fn assemble(ctx: &Context, state: MaterialState) -> Self {
        let tracked = state.lineage.is_tracked();
        let state = Arc::new(Mutex::new(state));
        let registration = tracked.then(|| ctx.registry().register(&state));
        Self {
            state,
            ctx: ctx.clone(),
            registration,
        }
    }

    // --- construction ---

    /// Manufacture a tracked material from nothing.
    ///
    /// The material is registered for decay sweeps, starts a new root in the
    /// provenance graph and takes the context's current time as its decay
    /// reference.
    ///
    /// # Errors
    ///
    /// - [`MaterialError::Construction`] if `quantity` is negative or not finite
    pub fn create(ctx: &Context, quantity: f64, comp: Composition) -> Result<Self, MaterialError> {
        check_construction(quantity)?;
        let time = ctx.time();
        let applied = ctx.apply(LineageEvent::Created {
            snapshot: snapshot(quantity, &comp, time),
        })?;
        let obj = applied
            .new_obj()
            .ok_or_else(|| MaterialError::Construction("tracker did not start a lineage".to_string()))?;
        comp.record(ctx.recorder());
        debug!(%obj, quantity, comp = %comp.id(), "material created");
        Ok(Self::assemble(ctx, MaterialState::new(quantity, comp, time, Lineage::Tracked(obj))))
    }

    /// Build a material that never appears in the provenance graph or the
    /// decay sweep.
    ///
    /// # Errors
    ///
    /// - [`MaterialError::Construction`] if `quantity` is negative or not finite
    pub fn create_untracked(ctx: &Context, quantity: f64, comp: Composition) -> Result<Self, MaterialError> {
        check_construction(quantity)?;
        Ok(Self::assemble(
            ctx,
            MaterialState::new(quantity, comp, ctx.time(), Lineage::Untracked),
        ))
    }

    // --- split ---

    /// Split off `quantity` kilograms of composition `comp`.
    ///
    /// When `comp` is this material's own snapshot no arithmetic is done and
    /// the composition is kept. Otherwise `comp` (scaled to `quantity`) is
    /// subtracted from this material's mass vector, components at or below
    /// `threshold` are dropped, and the remainder becomes the new composition.
    ///
    /// The new material inherits the decay reference time. It is tracked as a
    /// child of this material's previous version if this material is tracked,
    /// and untracked otherwise.
    ///
    /// # Errors
    ///
    /// - [`MaterialError::InvalidQuantity`] if `quantity` is negative or not finite
    /// - [`MaterialError::Overdraft`] if `quantity` exceeds the quantity held
    /// - [`MaterialError::Composition`] if the remainder is not a valid
    ///   composition (some nuclide would go negative) or `threshold` is negative
    pub fn extract_comp(
        &mut self,
        quantity: f64,
        comp: &Composition,
        threshold: f64,
    ) -> Result<Material, MaterialError> {
        if !quantity.is_finite() || quantity < 0.0 {
            return Err(MaterialError::InvalidQuantity(quantity));
        }
        let time = self.ctx.time();

        let child = {
            let mut state = self.state.lock();
            let have = state.quantity;
            if quantity > have {
                return Err(MaterialError::Overdraft { have, need: quantity });
            }

            let left_comp = if *comp == state.comp {
                trace!(comp = %comp.id(), "same composition, skipping arithmetic");
                state.comp.clone()
            } else {
                remainder(&state.comp, have, comp, quantity, threshold)?
            };
            let left = have - quantity;
            // Derived from the remainder so the two halves sum back to `have` exactly.
            let taken = have - left;

            let lineage = match state.lineage {
                Lineage::Tracked(source) => {
                    let applied = self.ctx.apply(LineageEvent::Split {
                        source,
                        remaining: snapshot(left, &left_comp, time),
                        extracted: snapshot(taken, comp, time),
                    })?;
                    let child = applied.new_obj().ok_or_else(|| {
                        MaterialError::Construction("tracker did not start a lineage".to_string())
                    })?;
                    left_comp.record(self.ctx.recorder());
                    comp.record(self.ctx.recorder());
                    debug!(%source, %child, quantity = taken, "material split");
                    Lineage::Tracked(child)
                }
                Lineage::Untracked | Lineage::Retired(_) => Lineage::Untracked,
            };

            state.quantity = left;
            state.comp = left_comp;
            MaterialState::new(taken, comp.clone(), state.last_decay, lineage)
        };

        Ok(Self::assemble(&self.ctx, child))
    }

    /// Split off `quantity` kilograms with this material's own composition.
    ///
    /// # Errors
    ///
    /// Same as [`Material::extract_comp`], minus the composition failures.
    pub fn extract_qty(&mut self, quantity: f64) -> Result<Material, MaterialError> {
        let comp = self.comp();
        let threshold = self.ctx.config().threshold;
        self.extract_comp(quantity, &comp, threshold)
    }

    // --- merge ---

    /// Pour `other` into this material.
    ///
    /// Quantities add up and `other` is left empty. When both share one
    /// snapshot the composition is kept; otherwise the vectors, scaled to their
    /// quantities, are summed into a new snapshot built from atom amounts.
    /// Both materials must come from the same context.
    ///
    /// If this material is tracked, its node advances with `other`'s head as
    /// a second parent and `other` is retired: it leaves the registry and
    /// emits no further lineage events. If only `other` is tracked, its
    /// entity records a version with zero quantity and stays live.
    ///
    /// # Errors
    ///
    /// - [`MaterialError::ForeignContext`] if `other` was built from another context
    /// - [`MaterialError::Composition`] if the mixture cannot be built
    /// - [`MaterialError::Tracker`] if the merge is rejected by the tracker
    pub fn absorb(&mut self, other: &mut Material) -> Result<(), MaterialError> {
        if !self.ctx.same(&other.ctx) {
            return Err(MaterialError::ForeignContext);
        }
        let time = self.ctx.time();
        let mut mine = self.state.lock();
        let mut theirs = other.state.lock();

        let comp = mixture(&mine.comp, mine.quantity, &theirs.comp, theirs.quantity)?;
        let quantity = mine.quantity + theirs.quantity;

        let retired = match (mine.lineage, theirs.lineage) {
            (Lineage::Tracked(into), absorbed) => {
                let absorbed = match absorbed {
                    Lineage::Tracked(obj) => Some(obj),
                    Lineage::Untracked | Lineage::Retired(_) => None,
                };
                self.ctx.apply(LineageEvent::Merged {
                    into,
                    absorbed,
                    snapshot: snapshot(quantity, &comp, time),
                })?;
                comp.record(self.ctx.recorder());
                debug!(%into, ?absorbed, quantity, "material absorbed");
                absorbed
            }
            (_, Lineage::Tracked(obj)) => {
                self.ctx.apply(LineageEvent::Modified {
                    obj,
                    snapshot: snapshot(0.0, &theirs.comp, time),
                })?;
                debug!(%obj, "tracked material drained into an untracked one");
                None
            }
            _ => None,
        };

        mine.quantity = quantity;
        mine.comp = comp;
        theirs.quantity = 0.0;
        if let Some(obj) = retired {
            theirs.lineage = Lineage::Retired(obj);
        }
        drop(theirs);
        drop(mine);

        if retired.is_some() {
            other.registration = None;
        }
        Ok(())
    }

    // --- in-place changes ---

    /// Replace the composition wholesale.
    ///
    /// # Errors
    ///
    /// - [`MaterialError::Tracker`] if the modification is rejected by the tracker
    pub fn transmute(&mut self, comp: Composition) -> Result<(), MaterialError> {
        let time = self.ctx.time();
        self.state.lock().set_comp(&self.ctx, comp, time)
    }

    /// Apply the decay accumulated since the last decay, up to `time`.
    ///
    /// Repeated calls at one time are no-ops, and so are calls with an
    /// earlier time (logged as a warning).
    ///
    /// # Errors
    ///
    /// - [`MaterialError::Decay`] if the decay collaborator fails
    pub fn decay(&mut self, time: SimTime) -> Result<(), MaterialError> {
        self.state.lock().decay_to(&self.ctx, time)
    }

    /// Decay every tracked material registered with `ctx` up to `time`.
    ///
    /// Each material is visited once. Returns the number visited, which is
    /// zero under [`DecayMode::Never`](crate::DecayMode::Never).
    ///
    /// # Errors
    ///
    /// Stops at the first failure and returns it. Materials already visited
    /// keep their decay; the failing material is unchanged.
    pub fn decay_all(ctx: &Context, time: SimTime) -> Result<usize, MaterialError> {
        if !ctx.config().decays() {
            return Ok(0);
        }
        let visited = ctx.registry().sweep(|_, state| state.decay_to(ctx, time))?;
        debug!(time, visited, "decay sweep complete");
        Ok(visited)
    }

    /// Untracked copy with the same quantity, composition and decay time.
    pub fn sample(&self) -> Material {
        let state = self.state.lock();
        let copy = MaterialState::new(state.quantity, state.comp.clone(), state.last_decay, Lineage::Untracked);
        drop(state);
        Self::assemble(&self.ctx, copy)
    }

    /// Hand the current composition to `ctx`'s recorder.
    pub fn record(&self, ctx: &Context) {
        self.state.lock().comp.record(ctx.recorder());
    }

    // --- accessors ---

    /// Quantity in kilograms.
    pub fn quantity(&self) -> f64 {
        self.state.lock().quantity
    }

    pub fn comp(&self) -> Composition {
        self.state.lock().comp.clone()
    }

    pub fn last_decay_time(&self) -> SimTime {
        self.state.lock().last_decay
    }

    pub fn lineage(&self) -> Lineage {
        self.state.lock().lineage
    }

    pub fn obj_id(&self) -> Option<ObjId> {
        self.lineage().obj()
    }

    pub fn is_tracked(&self) -> bool {
        self.lineage().is_tracked()
    }

    /// Identity of the current composition.
    pub fn state_id(&self) -> CompId {
        self.state.lock().comp.id()
    }

    pub fn units(&self) -> &'static str {
        MASS_UNITS
    }

    pub fn resource_type(&self) -> &'static str {
        MATERIAL_TYPE
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Registry slot, present while tracked.
    pub fn registry_key(&self) -> Option<RegistryKey> {
        self.registration.as_ref().map(Registration::key)
    }
}

impl Clone for Material {
    /// Same as [`Material::sample`]: the copy is untracked.
    fn clone(&self) -> Self {
        self.sample()
    }
}

impl fmt::Debug for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Material")
            .field("quantity", &state.quantity)
            .field("comp", &state.comp.id())
            .field("last_decay", &state.last_decay)
            .field("lineage", &state.lineage)
            .finish()
    }
}
