pub mod affinity;
pub mod classify;
pub mod relax;

pub use affinity::{AffinityMatrix, TerrainCatalog, TerrainId};
pub use classify::{band_sizes, initial_assignment};
pub use relax::{ANCHOR_BONUS, RELAXATION_PASSES, Relaxation};

use crate::config::CompiledTerrain;
use crate::heightmap::Heightmap;
use crate::hex::HexGrid;

/// Множитель силы кластеризации: гладкая местность кластеризуется сильнее
#[must_use]
pub fn clustering_multiplier(roughness: f32) -> f32 {
    0.5 + 1.5 * (1.0 - roughness)
}

/// Раскладка местности: полосы по высоте, затем релаксация по соседям
#[must_use]
pub fn assign_terrain(
    grid: &HexGrid,
    heightmap: &Heightmap,
    terrain: &CompiledTerrain,
    roughness: f32,
) -> Vec<TerrainId> {
    let initial = initial_assignment(heightmap, &terrain.biases);
    tracing::debug!(
        target: "realmgen::terrain",
        cells = initial.len(),
        bands = ?band_sizes(&terrain.biases, initial.len()),
        "terrain.initial_bands"
    );

    let graph = grid.adjacency_graph();
    let matrix = terrain.matrix.scaled(clustering_multiplier(roughness));
    Relaxation::new(&graph, &matrix).run(&initial)
}
