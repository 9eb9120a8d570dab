// src/hex.rs
//! Геометрия гексагональной сетки
//!
//! Осевые координаты `(q, r)` с избыточной третьей кубической координатой `s = -q - r`,
//! шесть направлений рёбер в фиксированном порядке и метрика расстояния.
//!
//! ## Рёбра
//!
//! Индекс ребра `i` (0..5) всегда противоположен ребру `(i + 3) % 6` соседней клетки.
//! На этом соотношении держится согласованность барьеров (см. [`crate::barrier`]).
//!
//! ## Формы сетки
//!
//! - [`GridShape::Hex`] — все клетки на расстоянии не больше радиуса от начала координат
//! - [`GridShape::Rectangular`] — строки со сдвигом (odd-r), переведённые в осевые координаты
//!   и отцентрированные так, чтобы центроид округлялся к `(0, 0)`

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Количество рёбер у клетки
pub const EDGE_COUNT: u8 = 6;

/// Осевые смещения соседей по рёбрам 0..5
pub const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Ребро соседа, совпадающее с ребром `edge` текущей клетки
#[must_use]
pub const fn opposite_edge(edge: u8) -> u8 {
    (edge + 3) % EDGE_COUNT
}

/// Округление половины вверх: `floor(x + 0.5)`.
///
/// `-0.5` округляется к нулю, а не к `-1`, поэтому центрирование прямоугольной сетки
/// с полуцелым центроидом остаётся устойчивым.
#[must_use]
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Клетка сетки в осевых координатах
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    pub const ORIGIN: Hex = Hex { q: 0, r: 0 };

    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Строит клетку из кубических координат.
    ///
    /// Возвращает `None`, если нарушено `q + r + s == 0`.
    #[must_use]
    pub fn from_cube(q: i32, r: i32, s: i32) -> Option<Self> {
        (q + r + s == 0).then_some(Self { q, r })
    }

    /// Третья кубическая координата
    #[must_use]
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    /// Сосед по ребру `edge` (берётся по модулю 6)
    #[must_use]
    pub fn neighbor(self, edge: u8) -> Self {
        let (dq, dr) = DIRECTIONS[usize::from(edge % EDGE_COUNT)];
        Self::new(self.q + dq, self.r + dr)
    }

    /// Гексагональное расстояние: `(|dq| + |dr| + |dq + dr|) / 2`
    #[must_use]
    pub fn distance(self, other: Hex) -> u32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        ((dq.abs() + dr.abs() + (dq + dr).abs()) / 2) as u32
    }

    /// Расстояние от начала координат
    #[must_use]
    pub fn length(self) -> u32 {
        self.distance(Self::ORIGIN)
    }

    /// Центр клетки на плоскости (гексы «остриём вверх», единичный размер)
    #[must_use]
    pub fn to_pixel(self) -> (f32, f32) {
        let q = self.q as f32;
        let r = self.r as f32;
        (3.0_f32.sqrt() * (q + r / 2.0), 1.5 * r)
    }
}

/// Форма сетки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GridShape {
    /// Шестиугольник радиуса `radius`
    Hex { radius: u32 },
    /// Прямоугольник `width × height` клеток
    Rectangular { width: u32, height: u32 },
}

impl GridShape {
    /// Характерный размер для правил плотности: радиус или большая сторона прямоугольника
    #[must_use]
    pub fn size_for_density(self) -> u32 {
        match self {
            GridShape::Hex { radius } => radius,
            GridShape::Rectangular { width, height } => width.max(height),
        }
    }

    /// Ожидаемое число клеток (`3R² + 3R + 1` для шестиугольника)
    #[must_use]
    pub fn cell_count(self) -> usize {
        match self {
            GridShape::Hex { radius } => {
                let r = radius as usize;
                3 * r * r + 3 * r + 1
            }
            GridShape::Rectangular { width, height } => width as usize * height as usize,
        }
    }
}

/// Набор клеток сетки с быстрым поиском индексов и соседей
#[derive(Debug, Clone)]
pub struct HexGrid {
    shape: GridShape,
    hexes: Vec<Hex>,
    index: HashMap<Hex, usize>,
    neighbors: Vec<[Option<usize>; 6]>,
}

impl HexGrid {
    #[must_use]
    pub fn new(shape: GridShape) -> Self {
        let hexes = match shape {
            GridShape::Hex { radius } => hexagon_cells(radius as i32),
            GridShape::Rectangular { width, height } => {
                rectangular_cells(width as i32, height as i32, shape.cell_count())
            }
        };

        let index: HashMap<Hex, usize> = hexes.iter().enumerate().map(|(i, &h)| (h, i)).collect();

        let neighbors = hexes
            .iter()
            .map(|&hex| {
                let mut row = [None; 6];
                for (edge, slot) in (0..EDGE_COUNT).zip(row.iter_mut()) {
                    *slot = index.get(&hex.neighbor(edge)).copied();
                }
                row
            })
            .collect();

        Self {
            shape,
            hexes,
            index,
            neighbors,
        }
    }

    #[must_use]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hexes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hexes.is_empty()
    }

    #[must_use]
    pub fn hexes(&self) -> &[Hex] {
        &self.hexes
    }

    #[must_use]
    pub fn hex(&self, idx: usize) -> Hex {
        self.hexes[idx]
    }

    #[must_use]
    pub fn index_of(&self, hex: Hex) -> Option<usize> {
        self.index.get(&hex).copied()
    }

    /// Индекс соседа по ребру `edge`, `None` за границей сетки
    #[must_use]
    pub fn neighbor_index(&self, idx: usize, edge: u8) -> Option<usize> {
        self.neighbors[idx][usize::from(edge % EDGE_COUNT)]
    }

    /// Существующие соседи в порядке рёбер
    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.neighbors[idx].iter().filter_map(|n| *n)
    }

    /// Граф смежности клеток.
    ///
    /// Узел `i` соответствует клетке с индексом `i`, вес ребра графа — индекс ребра
    /// со стороны клетки с меньшим индексом.
    #[must_use]
    pub fn adjacency_graph(&self) -> UnGraph<usize, u8> {
        let mut graph = UnGraph::with_capacity(self.len(), self.len() * 3);
        for idx in 0..self.len() {
            graph.add_node(idx);
        }
        for (idx, row) in self.neighbors.iter().enumerate() {
            for (edge, neighbor) in (0..EDGE_COUNT).zip(row.iter()) {
                match *neighbor {
                    Some(n) if n > idx => {
                        graph.add_edge(NodeIndex::new(idx), NodeIndex::new(n), edge);
                    }
                    _ => {}
                }
            }
        }
        graph
    }
}

fn hexagon_cells(radius: i32) -> Vec<Hex> {
    let mut cells = Vec::new();
    for q in -radius..=radius {
        let r_min = (-radius).max(-q - radius);
        let r_max = radius.min(-q + radius);
        for r in r_min..=r_max {
            cells.push(Hex::new(q, r));
        }
    }
    cells
}

fn rectangular_cells(width: i32, height: i32, capacity: usize) -> Vec<Hex> {
    let mut cells = Vec::with_capacity(capacity);
    for row in 0..height {
        // odd-r: нечётные строки сдвинуты на полклетки вправо
        let shift = (row - (row & 1)) / 2;
        for col in 0..width {
            cells.push(Hex::new(col - shift, row));
        }
    }

    if cells.is_empty() {
        return cells;
    }

    let n = cells.len() as f64;
    let mean_q = cells.iter().map(|h| f64::from(h.q)).sum::<f64>() / n;
    let mean_r = cells.iter().map(|h| f64::from(h.r)).sum::<f64>() / n;
    let dq = round_half_up(mean_q) as i32;
    let dr = round_half_up(mean_r) as i32;

    for cell in &mut cells {
        cell.q -= dq;
        cell.r -= dr;
    }
    cells
}
