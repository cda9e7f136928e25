//! Services Module
//!
//! Collaborators shared by the engines:
//! - [`CacheService`] - get-or-compute cache with prefix invalidation
//! - [`EntityNotifier`] - entity inserted/updated/deleted broadcasts
//! - [`GeoLookup`] - IP → country resolution

pub mod cache;
pub mod geo;
pub mod notifier;

pub use cache::CacheService;
pub use geo::{GeoLookup, NoGeoLookup, StaticGeoLookup};
pub use notifier::{EntityEvent, EntityKind, EntityNotifier};
