pub mod geo;
pub mod stop;

pub use geo::*;
pub use stop::*;
