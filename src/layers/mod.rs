pub mod dense;
pub mod initialization;

pub use dense::{Layer, LayerRole, LayerSpec};
pub use initialization::{distribution_bound, initialize_bias, initialize_weights, DistributionStrategy};
