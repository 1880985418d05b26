//! API endpoint modules.

mod zones;

pub use zones::{ZoneListing, ZonesApi};
