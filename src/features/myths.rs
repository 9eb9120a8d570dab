// src/features/myths.rs
//! Размещение мифов
//!
//! Мифы тяготеют к самым глухим местам: кандидаты сортируются по убыванию
//! расстояния до ближайшего владения или ориентира, а при равенстве по удалённости
//! от центра сетки. Перед стабильной сортировкой кандидаты перемешиваются,
//! чтобы равные по обоим ключам клетки шли в случайном порядке.
//!
//! Затем список обходится жадно: кандидат принимается, если до всех уже принятых
//! мифов не меньше `min_distance`. При недоборе возвращается [`GenerationError::MythsInfeasible`].

use crate::error::GenerationError;
use crate::hex::HexGrid;
use crate::realm::{Cell, Myth};
use rand::Rng;
use rand::seq::SliceRandom;

/// Кандидаты на мифы от самого глухого к самому людному
pub fn remoteness_order<R: Rng + ?Sized>(grid: &HexGrid, cells: &[Cell], rng: &mut R) -> Vec<usize> {
    let features: Vec<usize> = (0..cells.len()).filter(|&i| cells[i].is_feature()).collect();
    let mut candidates: Vec<usize> = (0..cells.len()).filter(|&i| !cells[i].is_feature()).collect();
    candidates.shuffle(rng);

    // (клетка, до ближайшего объекта, до центра)
    let mut keyed: Vec<(usize, u32, u32)> = candidates
        .into_iter()
        .map(|idx| {
            let hex = grid.hex(idx);
            let nearest = features
                .iter()
                .map(|&f| grid.hex(f).distance(hex))
                .min()
                .unwrap_or(0);
            (idx, nearest, hex.length())
        })
        .collect();

    keyed.sort_by(|a, b| b.1.cmp(&a.1).then(b.2.cmp(&a.2)));
    keyed.into_iter().map(|(idx, _, _)| idx).collect()
}

/// Размещает `requested` мифов на расстоянии не меньше `min_distance` друг от друга.
///
/// При ошибке клетки не изменяются.
pub fn place_myths<R: Rng + ?Sized>(
    grid: &HexGrid,
    cells: &mut [Cell],
    requested: usize,
    min_distance: u32,
    rng: &mut R,
) -> Result<Vec<Myth>, GenerationError> {
    if requested == 0 {
        return Ok(Vec::new());
    }

    let order = remoteness_order(grid, cells, rng);
    let mut accepted: Vec<usize> = Vec::with_capacity(requested);
    for idx in order {
        if accepted.len() == requested {
            break;
        }
        let hex = grid.hex(idx);
        if accepted
            .iter()
            .all(|&other| grid.hex(other).distance(hex) >= min_distance)
        {
            accepted.push(idx);
        }
    }

    tracing::debug!(
        target: "realmgen::features",
        requested,
        placed = accepted.len(),
        min_distance,
        "features.myths"
    );

    if accepted.len() < requested {
        return Err(GenerationError::MythsInfeasible {
            placed: accepted.len(),
            requested,
        });
    }

    let myths = (1u32..)
        .zip(accepted)
        .map(|(id, idx)| {
            cells[idx].myth = Some(id);
            let hex = grid.hex(idx);
            Myth {
                id,
                name: format!("Myth {id}"),
                q: hex.q,
                r: hex.r,
            }
        })
        .collect();
    Ok(myths)
}
