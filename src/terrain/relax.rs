// src/terrain/relax.rs
//! Релаксация местности по графу смежности
//!
//! Каждый проход читает снимок предыдущего прохода и пишет новый буфер,
//! поэтому изменения внутри прохода не распространяются каскадом.

use super::{AffinityMatrix, TerrainId};
use petgraph::graph::{NodeIndex, UnGraph};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Число проходов релаксации
pub const RELAXATION_PASSES: usize = 4;

/// Надбавка за совпадение с начальной (высотной) местностью клетки
pub const ANCHOR_BONUS: f32 = 1.5;

#[derive(Debug, Clone, Copy)]
pub struct Relaxation<'a> {
    pub graph: &'a UnGraph<usize, u8>,
    pub matrix: &'a AffinityMatrix,
    pub passes: usize,
    pub anchor_bonus: f32,
}

impl<'a> Relaxation<'a> {
    #[must_use]
    pub fn new(graph: &'a UnGraph<usize, u8>, matrix: &'a AffinityMatrix) -> Self {
        Self {
            graph,
            matrix,
            passes: RELAXATION_PASSES,
            anchor_bonus: ANCHOR_BONUS,
        }
    }

    /// Прогоняет все проходы и возвращает итоговую раскладку
    #[must_use]
    pub fn run(&self, initial: &[TerrainId]) -> Vec<TerrainId> {
        let mut current = initial.to_vec();
        for pass in 0..self.passes {
            let next = self.pass(&current, initial);
            let changed = next.iter().zip(&current).filter(|(a, b)| a != b).count();
            tracing::debug!(
                target: "realmgen::terrain",
                pass,
                changed,
                "terrain.relax.pass"
            );
            current = next;
            if changed == 0 {
                break;
            }
        }
        current
    }

    /// Один проход: читает снимок `current` и возвращает новый буфер
    #[must_use]
    pub fn pass(&self, current: &[TerrainId], initial: &[TerrainId]) -> Vec<TerrainId> {
        let pick = |idx: usize| self.best_terrain(idx, current, initial[idx]);

        #[cfg(feature = "parallel")]
        let next: Vec<TerrainId> = (0..current.len()).into_par_iter().map(pick).collect();
        #[cfg(not(feature = "parallel"))]
        let next: Vec<TerrainId> = (0..current.len()).map(pick).collect();

        next
    }

    /// Местность с наибольшим счётом; при равенстве остаётся первая по каталогу
    fn best_terrain(&self, idx: usize, current: &[TerrainId], anchor: TerrainId) -> TerrainId {
        let node = NodeIndex::new(idx);
        let mut best = anchor;
        let mut best_score = f32::NEG_INFINITY;

        for candidate in 0..self.matrix.size() {
            let mut score: f32 = self
                .graph
                .neighbors(node)
                .map(|n| self.matrix.get(candidate, current[self.graph[n]]))
                .sum();
            if candidate == anchor {
                score += self.anchor_bonus;
            }
            if score > best_score {
                best_score = score;
                best = candidate;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::{GridShape, Hex, HexGrid};

    #[test]
    fn isolated_outlier_joins_its_neighbours() {
        let grid = HexGrid::new(GridShape::Hex { radius: 1 });
        let graph = grid.adjacency_graph();
        let centre = grid.index_of(Hex::ORIGIN).unwrap();

        let mut initial = vec![0; grid.len()];
        initial[centre] = 1;

        let matrix = AffinityMatrix::identity(2);
        let relaxed = Relaxation::new(&graph, &matrix).pass(&initial, &initial);
        // 6 соседей × 1.0 против надбавки 1.5
        assert_eq!(relaxed[centre], 0);
        assert!(relaxed.iter().all(|&t| t == 0));
    }

    #[test]
    fn anchor_holds_against_weak_neighbours() {
        let grid = HexGrid::new(GridShape::Hex { radius: 1 });
        let graph = grid.adjacency_graph();
        let centre = grid.index_of(Hex::ORIGIN).unwrap();

        let mut initial = vec![0; grid.len()];
        initial[centre] = 1;

        let mut matrix = AffinityMatrix::identity(2);
        matrix.set(0, 0, 0.2);
        let relaxed = Relaxation::new(&graph, &matrix).pass(&initial, &initial);
        // 6 × 0.2 = 1.2 < 1.5
        assert_eq!(relaxed[centre], 1);
    }

    #[test]
    fn pass_reads_snapshot_only() {
        // Линия из трёх клеток: результат прохода не зависит от порядка обхода
        let grid = HexGrid::new(GridShape::Rectangular {
            width: 3,
            height: 1,
        });
        let graph = grid.adjacency_graph();
        let initial = vec![0, 1, 0];
        let matrix = AffinityMatrix::identity(2);
        let relaxation = Relaxation {
            anchor_bonus: 0.5,
            ..Relaxation::new(&graph, &matrix)
        };
        let next = relaxation.pass(&initial, &initial);
        // Крайние клетки видят только центр (1.0 за местность 1 против 0.5 якоря)
        assert_eq!(next, vec![1, 0, 1]);
    }

    #[test]
    fn ties_keep_first_candidate() {
        let grid = HexGrid::new(GridShape::Hex { radius: 0 });
        let graph = grid.adjacency_graph();
        let matrix = AffinityMatrix::zeros(3);
        let relaxation = Relaxation {
            anchor_bonus: 0.0,
            ..Relaxation::new(&graph, &matrix)
        };
        assert_eq!(relaxation.pass(&[2], &[2]), vec![0]);
    }
}
