pub mod engine;
pub mod profile;
pub mod schedule;
pub mod sensitivity;

pub use engine::{analyze_affordability, evaluate, AffordabilityResult};
pub use profile::{AffordabilityInput, BorrowerProfile, PolicyThresholds};
