pub mod identity;
pub mod lock_table;

pub use identity::{domain_identity, parse_zone_identity, zone_identity};
pub use lock_table::{KeyGuard, KeyedLocks, resource_key};
