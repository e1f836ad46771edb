//! Simulation context shared by every material.
//!
//! A [`Context`] is a cheap handle to the clock, the heritage tracker, the
//! material registry and the two collaborators (decay and recording). All
//! materials built from one context report into the same ledger.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use assay_core::SimTime;
use assay_core::record::NullRecorder;
use assay_core::traits::{DecayCalculator, Recorder};
use assay_decay::DecayEngine;
use assay_heritage::{Applied, HeritageTracker, LineageEvent, TrackerError};
use parking_lot::Mutex;

use crate::config::SimConfig;
use crate::error::MaterialError;
use crate::material::Material;
use crate::registry::MaterialRegistry;

struct Inner {
    config: SimConfig,
    time: AtomicI64,
    tracker: Mutex<HeritageTracker>,
    registry: Arc<MaterialRegistry>,
    decay: Arc<dyn DecayCalculator>,
    recorder: Arc<dyn Recorder>,
}

/// Shared simulation state.
#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

impl Context {
    /// Context with the exponential decay engine and no recording.
    pub fn new(config: SimConfig) -> Self {
        ContextBuilder::new().config(config).build()
    }

    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    /// Whether `other` is a handle to this same context.
    pub fn same(&self, other: &Context) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn config(&self) -> &SimConfig {
        &self.inner.config
    }

    /// Current simulated time.
    pub fn time(&self) -> SimTime {
        self.inner.time.load(Ordering::Acquire)
    }

    pub fn set_time(&self, time: SimTime) {
        self.inner.time.store(time, Ordering::Release);
    }

    /// Move the clock forward by `steps` and return the new time.
    pub fn advance(&self, steps: SimTime) -> SimTime {
        self.inner.time.fetch_add(steps, Ordering::AcqRel) + steps
    }

    /// Decay every tracked material to the current time.
    ///
    /// Returns the number of materials visited.
    pub fn decay_all(&self) -> Result<usize, MaterialError> {
        Material::decay_all(self, self.time())
    }

    /// Read access to the provenance graph.
    pub fn with_tracker<R>(&self, f: impl FnOnce(&HeritageTracker) -> R) -> R {
        f(&*self.inner.tracker.lock())
    }

    pub fn registry(&self) -> &Arc<MaterialRegistry> {
        &self.inner.registry
    }

    pub fn decay_calculator(&self) -> &dyn DecayCalculator {
        self.inner.decay.as_ref()
    }

    pub fn recorder(&self) -> &dyn Recorder {
        self.inner.recorder.as_ref()
    }

    pub(crate) fn apply(&self, event: LineageEvent) -> Result<Applied, TrackerError> {
        self.inner.tracker.lock().apply(event)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("time", &self.time())
            .field("decay", &self.inner.decay.name())
            .field("registered", &self.inner.registry.len())
            .finish()
    }
}

/// Builder for a [`Context`] with injected collaborators.
#[derive(Default)]
pub struct ContextBuilder {
    config: SimConfig,
    decay: Option<Arc<dyn DecayCalculator>>,
    recorder: Option<Arc<dyn Recorder>>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the decay collaborator. Defaults to [`DecayEngine`] stepped at
    /// `config.step_seconds`.
    pub fn decay_calculator(mut self, decay: Arc<dyn DecayCalculator>) -> Self {
        self.decay = Some(decay);
        self
    }

    /// Replace the recording collaborator. Defaults to [`NullRecorder`].
    pub fn recorder(mut self, recorder: Arc<dyn Recorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn build(self) -> Context {
        let step_seconds = self.config.step_seconds;
        let decay = self.decay.unwrap_or_else(|| {
            Arc::new(DecayEngine::new().with_step_seconds(step_seconds)) as Arc<dyn DecayCalculator>
        });
        let recorder = self
            .recorder
            .unwrap_or_else(|| Arc::new(NullRecorder) as Arc<dyn Recorder>);
        Context {
            inner: Arc::new(Inner {
                time: AtomicI64::new(self.config.start_time),
                tracker: Mutex::new(HeritageTracker::new(Arc::clone(&recorder))),
                registry: Arc::new(MaterialRegistry::new()),
                config: self.config,
                decay,
                recorder,
            }),
        }
    }
}
