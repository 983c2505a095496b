pub mod proxy;
pub mod registry;

#[cfg(test)]
pub mod model_bridge;

pub use proxy::*;
pub use registry::*;
