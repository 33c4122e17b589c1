pub mod orchard;
pub mod utils;

pub use orchard::{BootstrapReport, Orchard};
