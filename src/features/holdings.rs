// src/features/holdings.rs
use crate::hex::{Hex, HexGrid};
use crate::realm::Cell;
use crate::terrain::TerrainId;
use rand::Rng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldingPlacement {
    /// Индексы клеток с владениями в порядке размещения
    pub placed: Vec<usize>,
    /// Индекс главного владения
    pub seat_of_power: usize,
    /// Владение поставлено принудительно, потому что случайный отбор ничего не дал
    pub forced: bool,
}

/// Минимальное расстояние между владениями: четверть характерного размера сетки
#[must_use]
pub fn holding_spacing(grid: &HexGrid) -> f64 {
    f64::from(grid.shape().size_for_density()) / 4.0
}

/// Размещает владения.
///
/// Кандидаты: клетки, чья местность не исключена. Каждый вытянутый кандидат
/// удаляется из пула независимо от исхода. Первое владение становится главным.
/// Если не поставлено ни одного, владение ставится в начало координат
/// (или в первую клетку сетки).
///
/// `holding_types` не должен быть пустым.
pub fn place_holdings<R: Rng + ?Sized>(
    grid: &HexGrid,
    cells: &mut [Cell],
    terrain: &[TerrainId],
    excluded: &[bool],
    holding_types: &[String],
    requested: usize,
    rng: &mut R,
) -> HoldingPlacement {
    let spacing = holding_spacing(grid);
    let mut pool: Vec<usize> = (0..cells.len())
        .filter(|&idx| !excluded[terrain[idx]])
        .collect();
    let mut placed: Vec<usize> = Vec::with_capacity(requested);
    let mut rejected = 0usize;

    while placed.len() < requested && !pool.is_empty() {
        let pick = pool.swap_remove(rng.gen_range(0..pool.len()));
        let hex = grid.hex(pick);

        let spaced = placed
            .iter()
            .all(|&other| f64::from(grid.hex(other).distance(hex)) >= spacing);
        if cells[pick].holding.is_some() || !spaced {
            rejected += 1;
            continue;
        }

        cells[pick].holding = holding_types.choose(rng).cloned();
        placed.push(pick);
    }

    tracing::debug!(
        target: "realmgen::features",
        requested,
        placed = placed.len(),
        rejected,
        spacing,
        "features.holdings"
    );

    let forced = placed.is_empty();
    if forced {
        let idx = grid.index_of(Hex::ORIGIN).unwrap_or(0);
        if cells[idx].holding.is_none() {
            cells[idx].holding = holding_types.choose(rng).cloned();
        }
        tracing::warn!(
            target: "realmgen::features",
            q = grid.hex(idx).q,
            r = grid.hex(idx).r,
            "features.holdings.forced_seat_of_power"
        );
        placed.push(idx);
    }

    HoldingPlacement {
        seat_of_power: placed[0],
        placed,
        forced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::GridShape;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn types() -> Vec<String> {
        vec!["castle".into(), "town".into()]
    }

    #[test]
    fn holdings_respect_spacing() {
        let grid = HexGrid::new(GridShape::Hex { radius: 8 });
        let mut cells: Vec<Cell> = grid.hexes().iter().map(|&h| Cell::new(h, "plains")).collect();
        let terrain = vec![0; grid.len()];
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        let result = place_holdings(&grid, &mut cells, &terrain, &[false], &types(), 6, &mut rng);
        assert!(!result.forced);
        assert_eq!(result.seat_of_power, result.placed[0]);

        for (i, &a) in result.placed.iter().enumerate() {
            for &b in &result.placed[i + 1..] {
                assert!(grid.hex(a).distance(grid.hex(b)) >= 2);
            }
        }
        assert_eq!(
            cells.iter().filter(|c| c.holding.is_some()).count(),
            result.placed.len()
        );
    }

    #[test]
    fn excluded_terrain_never_gets_holdings() {
        let grid = HexGrid::new(GridShape::Hex { radius: 5 });
        let mut cells: Vec<Cell> = grid.hexes().iter().map(|&h| Cell::new(h, "x")).collect();
        let terrain: Vec<TerrainId> = (0..grid.len()).map(|i| i % 2).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let result = place_holdings(&grid, &mut cells, &terrain, &[true, false], &types(), 10, &mut rng);
        assert!(!result.forced);
        assert!(result.placed.iter().all(|&idx| terrain[idx] == 1));
    }

    #[test]
    fn zero_requested_forces_origin() {
        let grid = HexGrid::new(GridShape::Hex { radius: 2 });
        let mut cells: Vec<Cell> = grid.hexes().iter().map(|&h| Cell::new(h, "plains")).collect();
        let terrain = vec![0; grid.len()];
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let result = place_holdings(&grid, &mut cells, &terrain, &[false], &types(), 0, &mut rng);
        assert!(result.forced);
        assert_eq!(grid.hex(result.seat_of_power), Hex::ORIGIN);
        assert!(cells[result.seat_of_power].holding.is_some());
    }

    #[test]
    fn fully_excluded_grid_forces_origin() {
        let grid = HexGrid::new(GridShape::Hex { radius: 2 });
        let mut cells: Vec<Cell> = grid.hexes().iter().map(|&h| Cell::new(h, "lake")).collect();
        let terrain = vec![0; grid.len()];
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let result = place_holdings(&grid, &mut cells, &terrain, &[true], &types(), 3, &mut rng);
        assert!(result.forced);
        assert_eq!(result.placed.len(), 1);
        assert_eq!(grid.hex(result.seat_of_power), Hex::ORIGIN);
    }
}
