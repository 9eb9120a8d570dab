// src/generator.rs
//! Точка входа генератора королевства
//!
//! Порядок этапов:
//! 1. Сетка по форме
//! 2. Высоты: шум + шаблон формации
//! 3. Местность: полосы по высоте и релаксация
//! 4. Барьеры (если включены)
//! 5. Владения и главное владение
//! 6. Ориентиры
//! 7. Мифы
//!
//! Запуск либо возвращает целое королевство, либо ошибку; частичный результат наружу не выходит.

use crate::barrier::place_barriers;
use crate::config::GenerationOptions;
use crate::error::GenerationError;
use crate::features::{place_holdings, place_landmarks, place_myths};
use crate::heightmap::{Formation, generate_heightmap};
use crate::hex::{GridShape, HexGrid};
use crate::noise::NoiseField;
use crate::realm::{Cell, Realm};
use crate::terrain::assign_terrain;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Генерирует королевство.
///
/// Источник случайности: `ChaCha8Rng` с сидом из `options.seed`.
/// Без сида берётся случайный сид, он пишется в лог.
pub fn generate_realm(
    shape: GridShape,
    options: &GenerationOptions,
) -> Result<Realm, GenerationError> {
    let seed = options.seed.unwrap_or_else(rand::random);
    if options.seed.is_none() {
        tracing::info!(target: "realmgen::generator", seed, "generator.random_seed");
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_realm_with_rng(shape, options, &mut rng)
}

/// Генерирует королевство с внешним источником случайности.
/// `options.seed` здесь не используется.
pub fn generate_realm_with_rng<R: Rng + ?Sized>(
    shape: GridShape,
    options: &GenerationOptions,
    rng: &mut R,
) -> Result<Realm, GenerationError> {
    let compiled = options.compile()?;

    let grid = HexGrid::new(shape);
    if grid.is_empty() {
        return Err(GenerationError::EmptyGrid);
    }
    tracing::debug!(target: "realmgen::generator", cells = grid.len(), ?shape, "generator.grid");

    let noise = NoiseField::new(rng.gen_range(i32::MIN..=i32::MAX));
    let heightmap = generate_heightmap(
        &grid,
        &noise,
        &Formation::from_options(options),
        options.terrain_roughness,
    );

    let terrain = assign_terrain(&grid, &heightmap, &compiled, options.terrain_roughness);
    let mut cells: Vec<Cell> = grid
        .hexes()
        .iter()
        .zip(&terrain)
        .map(|(&hex, &id)| Cell::new(hex, compiled.catalog.name(id)))
        .collect();

    if options.generate_barriers {
        place_barriers(&grid, &mut cells, rng);
    }

    let holdings = place_holdings(
        &grid,
        &mut cells,
        &terrain,
        &compiled.holding_excluded,
        &options.holding_types,
        options.num_holdings,
        rng,
    );
    let landmarks = place_landmarks(&mut cells, &options.landmarks, rng);
    let myths = place_myths(
        &grid,
        &mut cells,
        options.num_myths,
        options.myth_min_distance,
        rng,
    )?;

    tracing::info!(
        target: "realmgen::generator",
        cells = cells.len(),
        noise_seed = noise.seed(),
        holdings = holdings.placed.len(),
        forced_seat_of_power = holdings.forced,
        landmarks,
        myths = myths.len(),
        "generator.done"
    );

    Ok(Realm {
        shape,
        seat_of_power: grid.hex(holdings.seat_of_power),
        cells,
        myths,
    })
}
