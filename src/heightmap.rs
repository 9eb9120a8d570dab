use crate::config::{GenerationOptions, HighlandFormation};
use crate::hex::HexGrid;
use crate::noise::NoiseField;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Вклад шаблона формации в высоту при силе 1.0
pub const FORMATION_WEIGHT: f32 = 1.5;

/// Максимальный поворот треугольника: фигура симметрична относительно 120°
pub const TRIANGLE_MAX_ROTATION: f32 = 120.0;

/// Сдвиг координат шума от узлов решётки: в целых точках шум Перлина равен нулю
const NOISE_OFFSET: f32 = 0.371;

const TRIANGLE: [(f32, f32); 3] = [(0.0, -1.0), (0.866, 0.5), (-0.866, 0.5)];

/// Высота каждой клетки сетки (индексы совпадают с [`HexGrid`])
#[derive(Debug, Clone)]
pub struct Heightmap {
    pub data: Vec<f32>,
}

impl Heightmap {
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> f32 {
        self.data[idx]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Индексы клеток от самой высокой к самой низкой.
    /// Сортировка стабильная, равные высоты сохраняют порядок сетки.
    #[must_use]
    pub fn ranked_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.data.len()).collect();
        indices.sort_by(|&a, &b| self.data[b].total_cmp(&self.data[a]));
        indices
    }
}

/// Параметры формации высокогорья
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Formation {
    pub kind: HighlandFormation,
    pub strength: f32,
    /// Градусы
    pub rotation: f32,
    pub inverse: bool,
}

impl Formation {
    #[must_use]
    pub fn from_options(options: &GenerationOptions) -> Self {
        Self {
            kind: options.highland_formation,
            strength: options.highland_formation_strength,
            rotation: options.highland_formation_rotation,
            inverse: options.highland_formation_inverse,
        }
    }

    /// Значение шаблона в нормализованной точке `(x, y)` из `[-1, 1]²`
    #[must_use]
    pub fn modifier(&self, x: f32, y: f32) -> f32 {
        let rotation = match self.kind {
            HighlandFormation::Triangle => self.rotation.min(TRIANGLE_MAX_ROTATION),
            _ => self.rotation,
        };
        let (sin, cos) = rotation.to_radians().sin_cos();
        let rx = x * cos - y * sin;
        let ry = x * sin + y * cos;

        let value = match self.kind {
            HighlandFormation::Random => 0.0,
            HighlandFormation::Linear => -ry,
            HighlandFormation::Circle => {
                let dist = (rx * rx + ry * ry).sqrt();
                1.0 - (dist / std::f32::consts::SQRT_2).min(1.0)
            }
            HighlandFormation::Triangle => {
                if point_in_triangle((rx, ry), TRIANGLE) {
                    1.0
                } else {
                    0.0
                }
            }
        };

        if self.inverse && self.kind.supports_inverse() {
            -value
        } else {
            value
        }
    }
}

fn sign(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    (p.0 - b.0) * (a.1 - b.1) - (a.0 - b.0) * (p.1 - b.1)
}

fn point_in_triangle(p: (f32, f32), [a, b, c]: [(f32, f32); 3]) -> bool {
    let d1 = sign(p, a, b);
    let d2 = sign(p, b, c);
    let d3 = sign(p, c, a);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Масштаб координат шума: чем меньше шероховатость, тем крупнее области
#[must_use]
pub fn noise_scale(roughness: f32) -> f32 {
    1.0 + roughness * 9.0
}

/// Положение центров клеток относительно центра ограничивающего прямоугольника, в `[-1, 1]`.
///
/// Вырожденная ось (одна строка или столбец) даёт 0.
#[must_use]
pub fn normalized_positions(grid: &HexGrid) -> Vec<(f32, f32)> {
    let pixels: Vec<(f32, f32)> = grid.hexes().iter().map(|h| h.to_pixel()).collect();
    if pixels.is_empty() {
        return pixels;
    }

    let (mut min_x, mut max_x) = (f32::INFINITY, f32::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f32::INFINITY, f32::NEG_INFINITY);
    for &(x, y) in &pixels {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    let (cx, cy) = ((min_x + max_x) * 0.5, (min_y + max_y) * 0.5);
    let (hx, hy) = ((max_x - min_x) * 0.5, (max_y - min_y) * 0.5);

    let norm = |v: f32, c: f32, half: f32| {
        if half > f32::EPSILON {
            (v - c) / half
        } else {
            0.0
        }
    };

    pixels
        .into_iter()
        .map(|(x, y)| (norm(x, cx, hx), norm(y, cy, hy)))
        .collect()
}

/// Высота клеток: шум плюс шаблон формации
#[must_use]
pub fn generate_heightmap(
    grid: &HexGrid,
    noise: &NoiseField,
    formation: &Formation,
    roughness: f32,
) -> Heightmap {
    let scale = noise_scale(roughness);
    let positions = normalized_positions(grid);

    let sample = |&(x, y): &(f32, f32)| {
        let base = noise.sample(x * scale + NOISE_OFFSET, y * scale + NOISE_OFFSET);
        base + formation.modifier(x, y) * FORMATION_WEIGHT * formation.strength
    };

    #[cfg(feature = "parallel")]
    let data: Vec<f32> = positions.par_iter().map(sample).collect();
    #[cfg(not(feature = "parallel"))]
    let data: Vec<f32> = positions.iter().map(sample).collect();

    Heightmap { data }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::{GridShape, Hex};

    fn formation(kind: HighlandFormation) -> Formation {
        Formation {
            kind,
            strength: 1.0,
            rotation: 0.0,
            inverse: false,
        }
    }

    #[test]
    fn random_formation_is_flat() {
        let f = formation(HighlandFormation::Random);
        assert_eq!(f.modifier(0.3, -0.8), 0.0);
    }

    #[test]
    fn linear_slopes_towards_negative_y() {
        let f = formation(HighlandFormation::Linear);
        assert!(f.modifier(0.0, -1.0) > f.modifier(0.0, 1.0));

        let turned = Formation {
            rotation: 180.0,
            ..f
        };
        assert!(turned.modifier(0.0, 1.0) > turned.modifier(0.0, -1.0));
    }

    #[test]
    fn circle_peaks_at_centre_and_inverts() {
        let f = formation(HighlandFormation::Circle);
        assert!((f.modifier(0.0, 0.0) - 1.0).abs() < 1e-6);
        assert!(f.modifier(1.0, 1.0).abs() < 1e-6);

        let inverted = Formation { inverse: true, ..f };
        assert!((inverted.modifier(0.0, 0.0) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn inverse_ignored_for_linear() {
        let f = Formation {
            inverse: true,
            ..formation(HighlandFormation::Linear)
        };
        assert!(f.modifier(0.0, -1.0) > 0.0);
    }

    #[test]
    fn triangle_contains_centre_not_corners() {
        let f = formation(HighlandFormation::Triangle);
        assert_eq!(f.modifier(0.0, 0.0), 1.0);
        assert_eq!(f.modifier(0.95, -0.95), 0.0);
    }

    #[test]
    fn triangle_rotation_is_clamped() {
        let at_limit = Formation {
            rotation: 120.0,
            ..formation(HighlandFormation::Triangle)
        };
        let beyond = Formation {
            rotation: 300.0,
            ..at_limit
        };
        for &(x, y) in &[(0.1, 0.8), (-0.7, -0.3), (0.5, 0.2)] {
            assert_eq!(at_limit.modifier(x, y), beyond.modifier(x, y));
        }
    }

    #[test]
    fn positions_span_unit_square() {
        let grid = HexGrid::new(GridShape::Hex { radius: 4 });
        let positions = normalized_positions(&grid);
        let origin = grid.index_of(Hex::ORIGIN).unwrap();
        assert!(positions[origin].0.abs() < 1e-6 && positions[origin].1.abs() < 1e-6);
        assert!(
            positions
                .iter()
                .all(|&(x, y)| (-1.0..=1.0).contains(&x) && (-1.0..=1.0).contains(&y))
        );
    }

    #[test]
    fn heightmap_is_reproducible() {
        let grid = HexGrid::new(GridShape::Rectangular {
            width: 6,
            height: 4,
        });
        let f = formation(HighlandFormation::Circle);
        let a = generate_heightmap(&grid, &NoiseField::new(11), &f, 0.3);
        let b = generate_heightmap(&grid, &NoiseField::new(11), &f, 0.3);
        assert_eq!(a.data, b.data);
        assert_eq!(a.len(), grid.len());
    }

    #[test]
    fn ranked_indices_descend() {
        let map = Heightmap::new(vec![0.1, 0.9, -0.4, 0.9, 0.5]);
        assert_eq!(map.ranked_indices(), vec![1, 3, 4, 0, 2]);
    }
}
