use crate::hex::{EDGE_COUNT, HexGrid, opposite_edge};
use crate::realm::Cell;
use rand::Rng;

/// Доля рёбер с барьером: 1/6
pub const BARRIER_CHANCE_DENOMINATOR: usize = 6;

/// Целевое число барьеров: `floor(клетки × 6 × 1/6 / 2)`, каждый барьер делят две клетки
#[must_use]
pub fn barrier_target(cell_count: usize) -> usize {
    cell_count * usize::from(EDGE_COUNT) / BARRIER_CHANCE_DENOMINATOR / 2
}

/// Разбрасывает барьеры по рёбрам и возвращает число поставленных.
///
/// Делается ровно [`barrier_target`] попыток: попадание в уже занятое ребро
/// просто тратит попытку, поэтому результат не превышает цель.
/// На границе сетки барьер остаётся односторонним.
pub fn place_barriers<R: Rng + ?Sized>(grid: &HexGrid, cells: &mut [Cell], rng: &mut R) -> usize {
    if cells.is_empty() {
        return 0;
    }
    let target = barrier_target(cells.len());
    let mut placed = 0;

    for _ in 0..target {
        let idx = rng.gen_range(0..cells.len());
        let edge = rng.gen_range(0..EDGE_COUNT);

        if !cells[idx].add_barrier(edge) {
            continue;
        }
        if let Some(n) = grid.neighbor_index(idx, edge) {
            cells[n].add_barrier(opposite_edge(edge));
        }
        placed += 1;
    }

    tracing::debug!(
        target: "realmgen::barrier",
        placed,
        target,
        "barrier.placed"
    );
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::GridShape;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn blank_cells(grid: &HexGrid) -> Vec<Cell> {
        grid.hexes().iter().map(|&h| Cell::new(h, "plains")).collect()
    }

    #[test]
    fn target_matches_formula() {
        assert_eq!(barrier_target(16), 8);
        assert_eq!(barrier_target(37), 18);
        assert_eq!(barrier_target(1), 0);
    }

    #[test]
    fn barriers_are_mirrored_on_neighbours() {
        let grid = HexGrid::new(GridShape::Hex { radius: 4 });
        let mut cells = blank_cells(&grid);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let placed = place_barriers(&grid, &mut cells, &mut rng);
        assert!(placed > 0);
        assert!(placed <= barrier_target(grid.len()));

        for (idx, cell) in cells.iter().enumerate() {
            for &edge in &cell.barrier_edges {
                if let Some(n) = grid.neighbor_index(idx, edge) {
                    assert!(cells[n].has_barrier(opposite_edge(edge)));
                }
            }
            assert!(cell.barrier_edges.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
