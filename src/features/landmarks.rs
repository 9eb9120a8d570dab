use crate::realm::Cell;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

/// Размещает ориентиры в свободных клетках (без владения и ориентира).
///
/// Порядок типов перемешивается, чтобы при нехватке клеток не страдали
/// всегда одни и те же типы. Возвращает число поставленных ориентиров.
pub fn place_landmarks<R: Rng + ?Sized>(
    cells: &mut [Cell],
    landmarks: &BTreeMap<String, usize>,
    rng: &mut R,
) -> usize {
    let mut pool: Vec<usize> = (0..cells.len())
        .filter(|&idx| !cells[idx].is_feature())
        .collect();

    let mut kinds: Vec<(&String, usize)> = landmarks.iter().map(|(k, &n)| (k, n)).collect();
    kinds.shuffle(rng);

    let mut total = 0;
    for (kind, count) in kinds {
        let mut placed = 0;
        while placed < count && !pool.is_empty() {
            let pick = pool.swap_remove(rng.gen_range(0..pool.len()));
            cells[pick].landmark = Some(kind.clone());
            placed += 1;
        }
        if placed < count {
            tracing::warn!(
                target: "realmgen::features",
                landmark = kind.as_str(),
                placed,
                requested = count,
                "features.landmarks.pool_exhausted"
            );
        }
        total += placed;
    }

    tracing::debug!(target: "realmgen::features", placed = total, "features.landmarks");
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::{GridShape, HexGrid};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn cells(radius: u32) -> Vec<Cell> {
        HexGrid::new(GridShape::Hex { radius })
            .hexes()
            .iter()
            .map(|&h| Cell::new(h, "plains"))
            .collect()
    }

    #[test]
    fn requested_counts_are_met_when_room_allows() {
        let mut cells = cells(3);
        cells[0].holding = Some("castle".into());
        let landmarks: BTreeMap<String, usize> =
            [("ruin".to_string(), 3), ("sanctum".to_string(), 2)].into();
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        assert_eq!(place_landmarks(&mut cells, &landmarks, &mut rng), 5);
        assert!(cells[0].landmark.is_none());
        let ruins = cells
            .iter()
            .filter(|c| c.landmark.as_deref() == Some("ruin"))
            .count();
        assert_eq!(ruins, 3);
    }

    #[test]
    fn exhausted_pool_stops_without_overwriting() {
        // радиус 1: 7 клеток, одна занята владением
        let mut cells = cells(1);
        cells[3].holding = Some("tower".into());
        let landmarks: BTreeMap<String, usize> =
            [("hazard".to_string(), 5), ("curse".to_string(), 5)].into();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        assert_eq!(place_landmarks(&mut cells, &landmarks, &mut rng), 6);
        assert!(cells.iter().all(|c| !(c.holding.is_some() && c.landmark.is_some())));
    }
}
