//! Infinite pan/zoom biome map with a viewport-driven tile pipeline.
//!
//! The map is generated lazily, one square tile at a time, from a seeded
//! per-pixel biome classifier. The interesting part is the multi-resolution
//! tile pipeline: [`map::BiomeMap`] decides which cached raster each visible
//! slot shows, schedules missing resolutions on worker threads, cancels work
//! the moment it scrolls out of view, and merges finished tiles back without
//! tearing. Coarse tiles appear first and are silently replaced as finer
//! ones land.

pub mod biomes;
pub mod cache;
pub mod compositor;
pub mod config;
pub mod coords;
pub mod export;
pub mod map;
pub mod scheduler;
pub mod tile;
pub mod viewer;
pub mod viewport;
