//! Interactive map viewer.
//!
//! A minifb window over a [`BiomeMap`]: drag with the left mouse button to
//! pan, scroll to zoom, `R` to reseed, `Esc` to exit. The viewer owns all
//! input handling and drawing; the map itself stays purely reactive to the
//! viewport updates pushed from here.

use std::sync::Arc;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::biomes::NoiseBiomeProvider;
use crate::compositor::ShowTile;
use crate::config::MapConfig;
use crate::map::BiomeMap;
use crate::viewport::lod_for_zoom;

const MIN_ZOOM_LEVEL: f64 = -3.0;
const MAX_ZOOM_LEVEL: f64 = 3.0;
const ZOOM_STEP: f64 = 0.2;

const BACKGROUND: u32 = (24 << 16) | (24 << 8) | 34;

/// Run the interactive viewer until the window closes.
pub fn run_viewer(config: &MapConfig, seed: u64) {
    let width = config.window_width;
    let height = config.window_height;

    let mut window = Window::new(
        &title_for(seed),
        width,
        height,
        WindowOptions {
            resize: false,
            ..WindowOptions::default()
        },
    )
    .expect("Failed to create window");

    window.set_target_fps(60);

    println!("Viewer started (seed: {}). Controls:", seed);
    println!("  Drag:   pan");
    println!("  Scroll: zoom");
    println!("  R:      regenerate with a new seed");
    println!("  Esc:    exit");

    let mut map = BiomeMap::new(Arc::new(NoiseBiomeProvider::new(seed)), config.tile_size);

    // World-space top-left corner, starting centered on the origin
    let mut view_x = -(width as f64) / 2.0;
    let mut view_y = -(height as f64) / 2.0;
    let mut zoom_level: f64 = 0.0;

    let mut last_mouse: Option<(f32, f32)> = None;
    let mut buffer = vec![BACKGROUND; width * height];
    let mut viewport_dirty = true;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let zoom = 2f64.powf(zoom_level);

        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            let new_seed: u64 = rand::random();
            println!("Regenerating with seed: {}", new_seed);
            map = BiomeMap::new(Arc::new(NoiseBiomeProvider::new(new_seed)), config.tile_size);
            window.set_title(&title_for(new_seed));
            viewport_dirty = true;
        }

        // Drag to pan: screen delta scaled back to world units
        if window.get_mouse_down(MouseButton::Left) {
            if let Some((mx, my)) = window.get_mouse_pos(MouseMode::Pass) {
                if let Some((lx, ly)) = last_mouse {
                    let dx = (mx - lx) as f64 / zoom;
                    let dy = (my - ly) as f64 / zoom;
                    if dx != 0.0 || dy != 0.0 {
                        view_x -= dx;
                        view_y -= dy;
                        viewport_dirty = true;
                    }
                }
                last_mouse = Some((mx, my));
            }
        } else {
            last_mouse = None;
        }

        // Scroll to zoom, keeping the window centre fixed in world space
        if let Some((_, scroll_y)) = window.get_scroll_wheel() {
            if scroll_y.abs() > f32::EPSILON {
                let step = if scroll_y > 0.0 { ZOOM_STEP } else { -ZOOM_STEP };
                let new_level = (zoom_level + step).clamp(MIN_ZOOM_LEVEL, MAX_ZOOM_LEVEL);
                if new_level != zoom_level {
                    let old_zoom = 2f64.powf(zoom_level);
                    let new_zoom = 2f64.powf(new_level);
                    let center_x = width as f64 / 2.0;
                    let center_y = height as f64 / 2.0;

                    view_x += center_x / old_zoom - center_x / new_zoom;
                    view_y += center_y / old_zoom - center_y / new_zoom;
                    zoom_level = new_level;
                    viewport_dirty = true;
                }
            }
        }

        let zoom = 2f64.powf(zoom_level);
        if viewport_dirty {
            map.update_viewport(
                view_x,
                view_y,
                width as f64 / zoom,
                height as f64 / zoom,
                lod_for_zoom(zoom),
            );
        }

        let merged = map.pump();
        if viewport_dirty || merged > 0 {
            buffer.fill(BACKGROUND);
            for show in map.show_instructions() {
                blit_tile(&mut buffer, width, height, &show, view_x, view_y, zoom);
            }
            viewport_dirty = false;
        }

        window
            .update_with_buffer(&buffer, width, height)
            .expect("Failed to update window");
    }
}

fn title_for(seed: u64) -> String {
    format!("Biome Atlas - seed {} - drag to pan, scroll to zoom", seed)
}

/// Nearest-neighbour blit of one tile raster into the framebuffer, scaled by
/// the current zoom and clipped to the window.
fn blit_tile(
    buffer: &mut [u32],
    win_width: usize,
    win_height: usize,
    show: &ShowTile,
    view_x: f64,
    view_y: f64,
    zoom: f64,
) {
    let edge = show.image.width();
    if edge == 0 {
        return;
    }

    let screen_x0 = ((show.world_x as f64 - view_x) * zoom).floor() as i64;
    let screen_y0 = ((show.world_y as f64 - view_y) * zoom).floor() as i64;
    let span = (show.size as f64 * zoom).ceil() as i64;

    let x_start = screen_x0.max(0);
    let y_start = screen_y0.max(0);
    let x_end = (screen_x0 + span).min(win_width as i64);
    let y_end = (screen_y0 + span).min(win_height as i64);

    let scale = edge as f64 / show.size as f64;
    for py in y_start..y_end {
        // World offset into the tile for this row of screen pixels
        let world_dy = view_y + (py as f64 + 0.5) / zoom - show.world_y as f64;
        let v = ((world_dy * scale) as i64).clamp(0, edge as i64 - 1) as u32;

        for px in x_start..x_end {
            let world_dx = view_x + (px as f64 + 0.5) / zoom - show.world_x as f64;
            let u = ((world_dx * scale) as i64).clamp(0, edge as i64 - 1) as u32;

            let pixel = show.image.get_pixel(u, v);
            buffer[py as usize * win_width + px as usize] =
                ((pixel[0] as u32) << 16) | ((pixel[1] as u32) << 8) | pixel[2] as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_blit_clips_to_window() {
        // Tile hangs off the top-left corner; only the overlap is drawn
        let mut buffer = vec![0u32; 16];
        let image = Arc::new(RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255])));
        let show = ShowTile {
            world_x: -2,
            world_y: -2,
            size: 4,
            lod: 0,
            image,
        };

        blit_tile(&mut buffer, 4, 4, &show, 0.0, 0.0, 1.0);

        assert_eq!(buffer[0], 0xFF0000);
        assert_eq!(buffer[1 * 4 + 1], 0xFF0000);
        // Beyond the tile's 2x2 overlap the background is untouched
        assert_eq!(buffer[2 * 4 + 2], 0);
        assert_eq!(buffer[3], 0);
    }

    #[test]
    fn test_blit_scales_coarse_rasters_up() {
        // A lod-1 raster (2x2 pixels over a 4-unit tile) fills a 4x4 window
        let mut buffer = vec![0u32; 16];
        let mut raster = RgbaImage::new(2, 2);
        raster.put_pixel(0, 0, image::Rgba([10, 0, 0, 255]));
        raster.put_pixel(1, 0, image::Rgba([20, 0, 0, 255]));
        raster.put_pixel(0, 1, image::Rgba([30, 0, 0, 255]));
        raster.put_pixel(1, 1, image::Rgba([40, 0, 0, 255]));
        let show = ShowTile {
            world_x: 0,
            world_y: 0,
            size: 4,
            lod: 1,
            image: Arc::new(raster),
        };

        blit_tile(&mut buffer, 4, 4, &show, 0.0, 0.0, 1.0);

        // Each raster pixel covers a 2x2 block of screen pixels
        assert_eq!(buffer[0], 10 << 16);
        assert_eq!(buffer[3], 20 << 16);
        assert_eq!(buffer[3 * 4], 30 << 16);
        assert_eq!(buffer[3 * 4 + 3], 40 << 16);
    }
}
