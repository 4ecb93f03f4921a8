pub mod model;
pub mod standardize;
pub mod network;
pub mod gaussian;

pub use model::{DenoiseModel, FnModel, IdentityModel};
pub use standardize::{Standardization, REFERENCE_RESOLUTION};
pub use network::{NetworkModel, SliceNetwork};
pub use gaussian::GaussianModel;
pub use stk_core::ModelError;
