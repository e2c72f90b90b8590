//! The tile map controller.
//!
//! [`BiomeMap`] owns the cache, the pending-job table and the displayed-tile
//! state, all on the caller's thread; workers only ever talk back through the
//! scheduler's completion channel. Every viewport change triggers one
//! recompute pass, and [`BiomeMap::pump`] merges finished tiles in between.
//!
//! The pass per visible slot: show the finest cached raster (a coarse tile
//! appears immediately), and if that is still coarser than the desired lod,
//! request exactly the desired lod. When the finer raster lands it silently
//! replaces the coarse one: progressive refinement.

use std::collections::HashSet;
use std::sync::Arc;

use crate::biomes::BiomeProvider;
use crate::cache::TileCache;
use crate::compositor::{DisplayCompositor, ShowTile};
use crate::coords::TileKey;
use crate::scheduler::JobScheduler;
use crate::viewport::Viewport;

pub struct BiomeMap {
    tile_size: u32,
    provider: Arc<dyn BiomeProvider>,
    cache: TileCache,
    scheduler: JobScheduler,
    compositor: DisplayCompositor,
    viewport: Viewport,
    desired_lod: u8,
}

impl BiomeMap {
    pub fn new(provider: Arc<dyn BiomeProvider>, tile_size: u32) -> Self {
        Self {
            tile_size,
            provider,
            cache: TileCache::new(),
            scheduler: JobScheduler::new(),
            compositor: DisplayCompositor::new(),
            viewport: Viewport::default(),
            desired_lod: 0,
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn seed(&self) -> u64 {
        self.provider.seed()
    }

    /// New viewport state from the input layer. Runs one recompute pass:
    /// shows/schedules for every visible slot, then cancels jobs and retires
    /// occupants for slots that left visibility.
    pub fn update_viewport(&mut self, x: f64, y: f64, width: f64, height: f64, lod: u8) {
        self.viewport = Viewport::new(x, y, width, height);
        self.desired_lod = lod;
        self.refresh();
    }

    fn refresh(&mut self) {
        let visible_tiles = self.viewport.visible_tiles(self.tile_size);
        let visible: HashSet<_> = visible_tiles.iter().copied().collect();

        for &coord in &visible_tiles {
            match self.cache.best_available(coord) {
                Some((image, lod)) => {
                    self.compositor.offer(coord, image, lod);
                    // Coarser than wanted: generate the desired lod, never
                    // an intermediate one
                    if lod > self.desired_lod {
                        self.scheduler.request(
                            &self.cache,
                            TileKey::new(coord, self.desired_lod),
                            self.tile_size,
                            &self.provider,
                        );
                    }
                }
                None => {
                    self.scheduler.request(
                        &self.cache,
                        TileKey::new(coord, self.desired_lod),
                        self.tile_size,
                        &self.provider,
                    );
                }
            }
        }

        self.scheduler.cancel_all_except(&visible);
        self.compositor.retire_hidden(&visible);
    }

    /// Merge finished generation results: cache them and promote any that
    /// refine a displayed slot. Returns how many tiles were merged, so the
    /// caller knows whether the screen changed.
    pub fn pump(&mut self) -> usize {
        let finished = self.scheduler.drain_completions();
        let merged = finished.len();
        for (key, image) in finished {
            self.cache.insert(key, Arc::clone(&image));
            // A job only survives cancellation while its slot is visible,
            // so offering straight to the compositor is safe here
            self.compositor.offer(key.coord, image, key.lod);
        }
        merged
    }

    /// Show instructions for everything currently displayed.
    pub fn show_instructions(&self) -> Vec<ShowTile> {
        self.compositor.show_instructions(self.tile_size)
    }

    pub fn cached_tiles(&self) -> usize {
        self.cache.len()
    }

    pub fn pending_jobs(&self) -> usize {
        self.scheduler.pending_count()
    }
}
