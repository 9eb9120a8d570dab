// src/noise.rs
//! Сидируемое поле градиентного шума
//!
//! Обёртка над `FastNoiseLite` в режиме Perlin + FBm: 5 октав, каждая следующая
//! с удвоенной частотой и вдвое меньшей амплитудой. Значения примерно в `[-1, 1]`.
//! Всё состояние определяется сидом, глобального изменяемого состояния нет.

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use std::fmt;

/// Число октав FBm
pub const OCTAVES: i32 = 5;

pub struct NoiseField {
    noise: FastNoiseLite,
    seed: i32,
}

impl NoiseField {
    #[must_use]
    pub fn new(seed: i32) -> Self {
        let mut noise = FastNoiseLite::new();
        noise.set_seed(Some(seed));
        noise.set_noise_type(Some(NoiseType::Perlin));
        noise.set_fractal_type(Some(FractalType::FBm));
        noise.set_fractal_octaves(Some(OCTAVES));
        noise.set_fractal_lacunarity(Some(2.0));
        noise.set_fractal_gain(Some(0.5));
        // Масштаб задаёт вызывающая сторона через координаты
        noise.set_frequency(Some(1.0));
        Self { noise, seed }
    }

    #[must_use]
    pub fn seed(&self) -> i32 {
        self.seed
    }

    #[must_use]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        self.noise.get_noise_2d(x, y)
    }
}

impl fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseField")
            .field("seed", &self.seed)
            .field("octaves", &OCTAVES)
            .finish()
    }
}
