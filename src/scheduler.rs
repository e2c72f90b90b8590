//! Asynchronous tile-generation scheduling.
//!
//! The scheduler owns the pending-job table (`TileKey` to cancellation
//! handle) and the completion channel. Generation runs on the rayon global
//! pool; workers receive only immutable inputs and post their result back as
//! a message, never touching shared state. The controller drains completions
//! on its own thread and a result is applied only while its key is still
//! pending, so a job that is cancelled and then finishes is discarded rather
//! than cached or displayed.
//!
//! Backpressure is implicit: one job per key, and every job whose coordinate
//! leaves visibility is cancelled on the next viewport update, so in-flight
//! work is bounded by the size of the visible set.

use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use image::RgbaImage;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::biomes::BiomeProvider;
use crate::cache::TileCache;
use crate::coords::{TileCoord, TileKey};
use crate::tile::{render_tile, TileError};

/// Message posted from a worker back to the controller thread.
pub struct TileCompletion {
    pub key: TileKey,
    pub result: Result<RgbaImage, TileError>,
}

pub struct JobScheduler {
    pending: HashMap<TileKey, CancellationToken>,
    completion_tx: Sender<TileCompletion>,
    completion_rx: Receiver<TileCompletion>,
}

impl JobScheduler {
    pub fn new() -> Self {
        let (completion_tx, completion_rx) = channel();
        Self {
            pending: HashMap::new(),
            completion_tx,
            completion_rx,
        }
    }

    pub fn is_pending(&self, key: &TileKey) -> bool {
        self.pending.contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Start generating `key` unless it is already cached or already in
    /// flight (one dedup check covers both states). The worker gets the
    /// coordinate, tile size and provider and nothing else.
    pub fn request(
        &mut self,
        cache: &TileCache,
        key: TileKey,
        tile_size: u32,
        provider: &Arc<dyn BiomeProvider>,
    ) {
        if cache.contains(&key) || self.pending.contains_key(&key) {
            return;
        }

        let token = CancellationToken::new();
        self.pending.insert(key, token.clone());

        let tx = self.completion_tx.clone();
        let provider = Arc::clone(provider);
        rayon::spawn(move || {
            let result = render_tile(provider.as_ref(), key, tile_size, &token);
            // Receiver gone means the whole map was torn down; nothing to do
            let _ = tx.send(TileCompletion { key, result });
        });
    }

    /// Cancel and forget every pending job whose coordinate is not in the
    /// visible set. Cooperative: a worker that already finished will have
    /// its result discarded at the application point instead.
    pub fn cancel_all_except(&mut self, visible: &HashSet<TileCoord>) {
        self.pending.retain(|key, token| {
            if visible.contains(&key.coord) {
                true
            } else {
                token.cancel();
                false
            }
        });
    }

    /// Drain completion messages, returning successfully generated rasters
    /// for keys that are still pending. Results whose key was cancelled in
    /// the meantime are dropped; failures are logged and their key reverts
    /// to absent (so a still-visible slot re-requests it next pass).
    pub fn drain_completions(&mut self) -> Vec<(TileKey, Arc<RgbaImage>)> {
        let mut finished = Vec::new();
        while let Ok(completion) = self.completion_rx.try_recv() {
            if self.pending.remove(&completion.key).is_none() {
                // Cancelled after the work ran to completion
                continue;
            }
            match completion.result {
                Ok(image) => finished.push((completion.key, Arc::new(image))),
                Err(TileError::Cancelled(_)) => {}
                Err(err) => {
                    warn!(key = ?completion.key, error = %err, "tile generation failed");
                }
            }
        }
        finished
    }

    /// Direct handle onto the completion channel, used by tests to inject
    /// deterministic completions without racing real workers.
    #[cfg(test)]
    pub(crate) fn completion_sender(&self) -> Sender<TileCompletion> {
        self.completion_tx.clone()
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}
