// src/terrain/classify.rs
use super::TerrainId;
use crate::heightmap::Heightmap;
use crate::hex::round_half_up;

/// Размеры полос в порядке каталога: `round(bias / sum * total)`.
///
/// Если все веса нулевые, каждая местность получает вес 1.
#[must_use]
pub fn band_sizes(biases: &[f32], total: usize) -> Vec<usize> {
    let sum: f64 = biases.iter().map(|&b| f64::from(b)).sum();
    let uniform = sum <= 0.0;
    let sum = if uniform { biases.len() as f64 } else { sum };

    biases
        .iter()
        .map(|&bias| {
            let weight = if uniform { 1.0 } else { f64::from(bias) };
            round_half_up(weight / sum * total as f64).max(0.0) as usize
        })
        .collect()
}

/// Начальная раскладка местности по высоте.
///
/// Клетки ранжируются по убыванию высоты и режутся на подряд идущие полосы:
/// первая полоса получает первую местность каталога, и так далее.
/// Клетки, не вошедшие ни в одну полосу из-за округления, получают последнюю местность.
#[must_use]
pub fn initial_assignment(heightmap: &Heightmap, biases: &[f32]) -> Vec<TerrainId> {
    let total = heightmap.len();
    let mut assignment = vec![0; total];
    if biases.is_empty() {
        return assignment;
    }

    let ranked = heightmap.ranked_indices();
    let sizes = band_sizes(biases, total);
    let last = biases.len() - 1;

    let mut cursor = 0;
    for (terrain, &size) in sizes.iter().enumerate() {
        let end = (cursor + size).min(total);
        for &idx in &ranked[cursor..end] {
            assignment[idx] = terrain;
        }
        cursor = end;
    }
    for &idx in &ranked[cursor..] {
        assignment[idx] = last;
    }

    assignment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_biases_split_in_half() {
        let heights: Vec<f32> = (0..37).map(|i| ((i * 7) % 37) as f32).collect();
        let map = Heightmap::new(heights);
        let assignment = initial_assignment(&map, &[1.0, 1.0]);

        let first = assignment.iter().filter(|&&t| t == 0).count();
        let second = assignment.iter().filter(|&&t| t == 1).count();
        assert_eq!(first, 19);
        assert_eq!(second, 18);

        // вся первая полоса выше всей второй
        let min_first = (0..37)
            .filter(|&i| assignment[i] == 0)
            .map(|i| map.get(i))
            .fold(f32::INFINITY, f32::min);
        let max_second = (0..37)
            .filter(|&i| assignment[i] == 1)
            .map(|i| map.get(i))
            .fold(f32::NEG_INFINITY, f32::max);
        assert!(min_first > max_second);
    }

    #[test]
    fn zero_biases_fall_back_to_uniform() {
        assert_eq!(band_sizes(&[0.0, 0.0, 0.0], 9), vec![3, 3, 3]);
    }

    #[test]
    fn rounding_leftovers_go_to_last_terrain() {
        // 3 полосы по round(10/3) = 3, десятая клетка уходит последней местности
        let map = Heightmap::new((0..10).map(|i| i as f32).collect());
        let assignment = initial_assignment(&map, &[1.0, 1.0, 1.0]);
        assert_eq!(assignment.iter().filter(|&&t| t == 2).count(), 4);
        // самая низкая клетка
        assert_eq!(assignment[0], 2);
        // самая высокая клетка
        assert_eq!(assignment[9], 0);
    }

    #[test]
    fn zero_weight_terrain_gets_no_band() {
        let map = Heightmap::new((0..8).map(|i| i as f32).collect());
        let assignment = initial_assignment(&map, &[1.0, 0.0, 1.0]);
        assert!(!assignment.contains(&1));
    }
}
