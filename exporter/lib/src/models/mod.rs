pub mod health;
pub mod metrics;
pub mod provider;

pub use health::*;
pub use metrics::*;
pub use provider::*;
