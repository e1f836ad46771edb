//! Model constants. All material quantities are in kilograms.

use crate::types::Nuclide;

/// Units of every material quantity. Fixed, not configurable.
pub const MASS_UNITS: &str = "kg";

/// Resource type name reported by materials.
pub const MATERIAL_TYPE: &str = "Material";

/// Default negligibility threshold (kg) applied after extraction arithmetic.
///
/// Components whose magnitude is at or below this value are dropped from the
/// remainder so rounding residue does not accumulate across repeated splits.
pub const DEFAULT_THRESHOLD: f64 = 1e-6;

/// Default length of one simulation step in seconds (an average month).
pub const DEFAULT_STEP_SECONDS: u64 = 2_629_846;

/// Seconds in a Julian year, used when quoting half-lives.
pub const SECONDS_PER_YEAR: f64 = 31_557_600.0;

/// Multiplier for the atomic number in a `ZZAAAM` nuclide id.
pub const ZZAAAM_Z: u32 = 10_000_000;

/// Multiplier for the mass number in a `ZZAAAM` nuclide id.
pub const ZZAAAM_A: u32 = 10_000;

// Frequently used nuclides.

pub const H3: Nuclide = Nuclide::new(1, 3);
pub const O16: Nuclide = Nuclide::new(8, 16);
pub const CO60: Nuclide = Nuclide::new(27, 60);
pub const SR90: Nuclide = Nuclide::new(38, 90);
pub const CS137: Nuclide = Nuclide::new(55, 137);
pub const U235: Nuclide = Nuclide::new(92, 235);
pub const U238: Nuclide = Nuclide::new(92, 238);
pub const PU239: Nuclide = Nuclide::new(94, 239);
pub const PU241: Nuclide = Nuclide::new(94, 241);
pub const AM241: Nuclide = Nuclide::new(95, 241);
