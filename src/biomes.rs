//! Biome classification and the per-pixel biome provider.
//!
//! A [`BiomeProvider`] maps a world coordinate to a [`Biome`] deterministically
//! for a fixed seed. The default [`NoiseBiomeProvider`] derives elevation,
//! temperature and moisture from seeded fractal Perlin fields and classifies
//! them with temperature/moisture bands plus altitudinal zones.

use noise::{NoiseFn, Perlin};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Temperature drop per 1000m of elevation (°C/km)
const ELEVATION_LAPSE_RATE: f32 = 6.5;

/// Biome types based on elevation, temperature and moisture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Biome {
    // Ocean biomes
    DeepOcean,
    Ocean,
    CoastalWater,

    // Cold biomes
    Ice,
    Tundra,
    BorealForest,

    // Temperate biomes
    TemperateGrassland,
    TemperateForest,
    TemperateRainforest,

    // Warm biomes
    Desert,
    Savanna,
    TropicalForest,
    TropicalRainforest,

    // Mountain biomes
    AlpineTundra,
    SnowyPeaks,
}

impl Biome {
    /// Classify lowland biomes based purely on temperature and moisture
    fn classify_lowland(temperature: f32, moisture: f32) -> Biome {
        match (temperature, moisture) {
            // Freezing temperatures
            (t, _) if t < -10.0 => Biome::Ice,
            (t, _) if t < 0.0 => Biome::Tundra,

            // Cold temperatures
            (t, m) if t < 10.0 => {
                if m > 0.5 { Biome::BorealForest } else { Biome::Tundra }
            }

            // Temperate temperatures
            (t, m) if t < 20.0 => {
                if m > 0.7 { Biome::TemperateRainforest }
                else if m > 0.4 { Biome::TemperateForest }
                else { Biome::TemperateGrassland }
            }

            // Warm/tropical temperatures
            (_, m) => {
                if m > 0.7 { Biome::TropicalRainforest }
                else if m > 0.4 { Biome::TropicalForest }
                else if m > 0.2 { Biome::Savanna }
                else { Biome::Desert }
            }
        }
    }

    /// Classify biome from elevation (m), temperature (°C) and moisture (0-1)
    pub fn classify(elevation: f32, temperature: f32, moisture: f32) -> Biome {
        // Ocean biomes by depth
        if elevation <= 0.0 {
            return if elevation < -2000.0 {
                Biome::DeepOcean
            } else if elevation < -100.0 {
                Biome::Ocean
            } else {
                Biome::CoastalWater
            };
        }

        // High-elevation zones override the lowland bands
        match elevation {
            e if e > 3500.0 => Biome::SnowyPeaks,
            e if e > 2500.0 => Biome::AlpineTundra,
            _ => Self::classify_lowland(temperature, moisture),
        }
    }

    /// Get RGB color for rendering
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            // Ocean
            Biome::DeepOcean => (20, 40, 80),
            Biome::Ocean => (30, 60, 120),
            Biome::CoastalWater => (60, 100, 160),

            // Cold
            Biome::Ice => (240, 250, 255),
            Biome::Tundra => (180, 190, 170),
            Biome::BorealForest => (50, 80, 50),

            // Temperate
            Biome::TemperateGrassland => (140, 170, 80),
            Biome::TemperateForest => (40, 100, 40),
            Biome::TemperateRainforest => (30, 80, 50),

            // Warm
            Biome::Desert => (210, 180, 120),
            Biome::Savanna => (170, 160, 80),
            Biome::TropicalForest => (30, 120, 30),
            Biome::TropicalRainforest => (20, 90, 40),

            // Mountain
            Biome::AlpineTundra => (140, 140, 130),
            Biome::SnowyPeaks => (255, 255, 255),
        }
    }
}

/// Pure per-pixel biome classifier. `sample` must be deterministic for fixed
/// inputs; it is called once per pixel from generation workers, so
/// implementations must be `Send + Sync` and side-effect free.
pub trait BiomeProvider: Send + Sync {
    fn sample(&self, world_x: i64, world_y: i64) -> Biome;

    /// Seed the provider was built with, for display and reproducibility.
    fn seed(&self) -> u64;
}

/// Noise-backed biome provider: fractal Perlin elevation, temperature and
/// moisture fields classified per pixel.
pub struct NoiseBiomeProvider {
    seed: u64,
    elevation: Perlin,
    temperature: Perlin,
    moisture: Perlin,
}

/// World-units-to-noise-space frequency. Larger divisor = larger landmasses.
const ELEVATION_SCALE: f64 = 1.0 / 2048.0;
const CLIMATE_SCALE: f64 = 1.0 / 4096.0;

impl NoiseBiomeProvider {
    pub fn new(seed: u64) -> Self {
        // Independent sub-seeds per field so the three layers decorrelate
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self {
            seed,
            elevation: Perlin::new(rng.gen()),
            temperature: Perlin::new(rng.gen()),
            moisture: Perlin::new(rng.gen()),
        }
    }

    /// Elevation in metres, roughly -3400..3000 with ocean basins below zero
    fn elevation_at(&self, x: f64, y: f64) -> f32 {
        let n = fbm_noise(&self.elevation, x * ELEVATION_SCALE, y * ELEVATION_SCALE, 5, 0.5, 2.0);
        // Bias below zero so oceans cover more than half the world
        (n as f32 * 3200.0) - 200.0
    }

    /// Sea-level temperature in °C
    fn temperature_at(&self, x: f64, y: f64) -> f32 {
        let n = fbm_noise(&self.temperature, x * CLIMATE_SCALE, y * CLIMATE_SCALE, 4, 0.5, 2.0);
        12.0 + n as f32 * 25.0
    }

    /// Moisture in 0..1
    fn moisture_at(&self, x: f64, y: f64) -> f32 {
        let n = fbm_noise(&self.moisture, x * CLIMATE_SCALE, y * CLIMATE_SCALE, 4, 0.5, 2.0);
        ((n as f32) * 0.5 + 0.5).clamp(0.0, 1.0)
    }
}

impl BiomeProvider for NoiseBiomeProvider {
    fn sample(&self, world_x: i64, world_y: i64) -> Biome {
        let (x, y) = (world_x as f64, world_y as f64);

        let elevation = self.elevation_at(x, y);
        let moisture = self.moisture_at(x, y);
        // Cool the air with altitude
        let temperature = if elevation > 0.0 {
            self.temperature_at(x, y) - (elevation / 1000.0) * ELEVATION_LAPSE_RATE
        } else {
            self.temperature_at(x, y)
        };

        Biome::classify(elevation, temperature, moisture)
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}

/// Fractional Brownian Motion noise, normalized to roughly -1..1
fn fbm_noise(
    noise: &impl NoiseFn<f64, 2>,
    x: f64,
    y: f64,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += amplitude * noise.get([x * frequency, y * frequency]);
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    total / max_value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_ocean_depths() {
        assert_eq!(Biome::classify(-3000.0, 10.0, 0.5), Biome::DeepOcean);
        assert_eq!(Biome::classify(-500.0, 10.0, 0.5), Biome::Ocean);
        assert_eq!(Biome::classify(-20.0, 10.0, 0.5), Biome::CoastalWater);
    }

    #[test]
    fn test_classify_temperature_bands() {
        assert_eq!(Biome::classify(100.0, -15.0, 0.5), Biome::Ice);
        assert_eq!(Biome::classify(100.0, 5.0, 0.8), Biome::BorealForest);
        assert_eq!(Biome::classify(100.0, 15.0, 0.5), Biome::TemperateForest);
        assert_eq!(Biome::classify(100.0, 28.0, 0.1), Biome::Desert);
        assert_eq!(Biome::classify(100.0, 28.0, 0.9), Biome::TropicalRainforest);
    }

    #[test]
    fn test_classify_mountains_override_bands() {
        assert_eq!(Biome::classify(4000.0, 25.0, 0.5), Biome::SnowyPeaks);
        assert_eq!(Biome::classify(3000.0, 25.0, 0.5), Biome::AlpineTundra);
    }

    #[test]
    fn test_provider_is_deterministic() {
        let a = NoiseBiomeProvider::new(42);
        let b = NoiseBiomeProvider::new(42);
        for &(x, y) in &[(0, 0), (1000, -1000), (-123456, 789012)] {
            assert_eq!(a.sample(x, y), b.sample(x, y));
        }
    }

    #[test]
    fn test_different_seeds_diverge_somewhere() {
        let a = NoiseBiomeProvider::new(1);
        let b = NoiseBiomeProvider::new(2);
        let diverged = (0..64).any(|i| {
            let p = i * 997;
            a.sample(p, -p) != b.sample(p, -p)
        });
        assert!(diverged);
    }
}
