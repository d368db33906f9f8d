pub mod location_mapping;
pub mod redirect_map;

pub use location_mapping::{LocationMapping, SourceLocationRemapper};
pub use redirect_map::{RedirectMap, RedirectWarning};
