//! Resource-agnostic view of a material.
//!
//! Exchange code that only needs to move quantities around works through
//! [`Resource`] and never names [`Material`] directly.

use std::fmt;

use assay_core::{CompId, ObjId};

use crate::context::Context;
use crate::error::MaterialError;
use crate::material::Material;

/// Capabilities shared by every kind of resource.
pub trait Resource: fmt::Debug + Send {
    /// Amount held, in [`Resource::units`].
    fn quantity(&self) -> f64;

    fn units(&self) -> &'static str;

    /// Kind of resource, e.g. `"Material"`.
    fn resource_type(&self) -> &'static str;

    /// Identity of the resource's current internal state.
    fn state_id(&self) -> CompId;

    /// Lineage entity, if the resource is or was tracked.
    fn obj_id(&self) -> Option<ObjId>;

    /// Split off `quantity` with the resource's own state.
    fn extract_res(&mut self, quantity: f64) -> Result<Box<dyn Resource>, MaterialError>;

    /// Untracked copy.
    fn clone_res(&self) -> Box<dyn Resource>;

    /// Hand the resource's state to `ctx`'s recorder.
    fn record(&self, ctx: &Context);
}

impl Resource for Material {
    fn quantity(&self) -> f64 {
        Material::quantity(self)
    }

    fn units(&self) -> &'static str {
        Material::units(self)
    }

    fn resource_type(&self) -> &'static str {
        Material::resource_type(self)
    }

    fn state_id(&self) -> CompId {
        Material::state_id(self)
    }

    fn obj_id(&self) -> Option<ObjId> {
        Material::obj_id(self)
    }

    fn extract_res(&mut self, quantity: f64) -> Result<Box<dyn Resource>, MaterialError> {
        Ok(Box::new(self.extract_qty(quantity)?))
    }

    fn clone_res(&self) -> Box<dyn Resource> {
        Box::new(self.sample())
    }

    fn record(&self, ctx: &Context) {
        Material::record(self, ctx);
    }
}
