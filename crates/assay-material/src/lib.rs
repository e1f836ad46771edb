//! # assay-material — Conserved material resources.
//!
//! A [`Material`] is a quantity in kilograms plus a shared [`Composition`]
//! snapshot. Materials split ([`Material::extract_comp`],
//! [`Material::extract_qty`]), merge ([`Material::absorb`]), change in place
//! ([`Material::transmute`], [`Material::decay`]) and produce untracked
//! samples ([`Material::sample`]).
//!
//! Every tracked material reports its operations to the
//! [`HeritageTracker`](assay_heritage::HeritageTracker) owned by its
//! [`Context`], and holds a [`Registration`](registry::Registration) in the
//! context's [`MaterialRegistry`] so that [`Material::decay_all`] can age the
//! whole population in one sweep.
//!
//! [`Composition`]: assay_core::Composition

pub mod config;
pub mod context;
pub mod error;
pub mod material;
pub mod registry;
pub mod resource;

pub use config::{DecayMode, SimConfig};
pub use context::{Context, ContextBuilder};
pub use error::MaterialError;
pub use material::{Lineage, Material};
pub use registry::{MaterialRegistry, RegistryKey};
pub use resource::Resource;
