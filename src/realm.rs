// src/realm.rs
//! Результат генерации — королевство
//!
//! Структуры этого модуля и есть JSON-контракт импорта/экспорта редактора:
//! - `shape` — форма сетки (`{"type": "hex", "radius": R}` или `{"type": "rectangular", ...}`)
//! - `cells` — плотный список клеток с местностью, барьерами и необязательными объектами
//! - `seatOfPower` — координаты главного владения
//! - `myths` — список мифов, присутствует всегда (даже пустой)
//!
//! Необязательные поля клеток (`holding`, `landmark`, `myth`) при отсутствии не сериализуются.

use crate::error::RealmError;
use crate::hex::{EDGE_COUNT, GridShape, Hex, opposite_edge};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub q: i32,
    pub r: i32,
    pub terrain: String,
    /// Индексы рёбер 0..5, по возрастанию, без повторов
    #[serde(default)]
    pub barrier_edges: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub myth: Option<u32>,
}

impl Cell {
    #[must_use]
    pub fn new(hex: Hex, terrain: impl Into<String>) -> Self {
        Self {
            q: hex.q,
            r: hex.r,
            terrain: terrain.into(),
            barrier_edges: Vec::new(),
            holding: None,
            landmark: None,
            myth: None,
        }
    }

    #[must_use]
    pub fn hex(&self) -> Hex {
        Hex::new(self.q, self.r)
    }

    /// Клетка с владением или ориентиром
    #[must_use]
    pub fn is_feature(&self) -> bool {
        self.holding.is_some() || self.landmark.is_some()
    }

    #[must_use]
    pub fn has_barrier(&self, edge: u8) -> bool {
        self.barrier_edges.binary_search(&edge).is_ok()
    }

    /// Добавляет барьер, сохраняя порядок. `false`, если барьер уже был.
    pub fn add_barrier(&mut self, edge: u8) -> bool {
        match self.barrier_edges.binary_search(&edge) {
            Ok(_) => false,
            Err(pos) => {
                self.barrier_edges.insert(pos, edge);
                true
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Myth {
    /// Плотная нумерация с 1
    pub id: u32,
    pub name: String,
    pub q: i32,
    pub r: i32,
}

impl Myth {
    #[must_use]
    pub fn hex(&self) -> Hex {
        Hex::new(self.q, self.r)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Realm {
    pub shape: GridShape,
    pub cells: Vec<Cell>,
    pub seat_of_power: Hex,
    #[serde(default)]
    pub myths: Vec<Myth>,
}

impl Realm {
    #[must_use]
    pub fn cell(&self, hex: Hex) -> Option<&Cell> {
        self.cells.iter().find(|c| c.hex() == hex)
    }

    pub fn cell_mut(&mut self, hex: Hex) -> Option<&mut Cell> {
        self.cells.iter_mut().find(|c| c.hex() == hex)
    }

    #[must_use]
    pub fn seat_of_power_cell(&self) -> Option<&Cell> {
        self.cell(self.seat_of_power)
    }

    /// Число клеток каждой местности
    #[must_use]
    pub fn terrain_histogram(&self) -> BTreeMap<&str, usize> {
        let mut histogram = BTreeMap::new();
        for cell in &self.cells {
            *histogram.entry(cell.terrain.as_str()).or_insert(0) += 1;
        }
        histogram
    }

    /// Число барьеров: общее ребро двух клеток считается один раз
    #[must_use]
    pub fn barrier_count(&self) -> usize {
        let present: HashMap<Hex, &Cell> = self.cells.iter().map(|c| (c.hex(), c)).collect();
        self.cells
            .iter()
            .flat_map(|cell| cell.barrier_edges.iter().map(move |&e| (cell.hex(), e)))
            .filter(|&(hex, edge)| {
                // двустороннее ребро учитываем со стороны рёбер 0..2
                edge < EDGE_COUNT / 2 || !present.contains_key(&hex.neighbor(edge))
            })
            .count()
    }

    #[must_use]
    pub fn holdings(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| c.holding.is_some())
    }

    #[must_use]
    pub fn landmarks(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| c.landmark.is_some())
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Разбирает JSON и проверяет инварианты
    pub fn from_json(json: &str) -> Result<Self, RealmError> {
        let realm: Self = serde_json::from_str(json)?;
        realm.validate()?;
        Ok(realm)
    }

    /// Проверяет инварианты королевства
    pub fn validate(&self) -> Result<(), RealmError> {
        let mut by_hex: HashMap<Hex, &Cell> = HashMap::with_capacity(self.cells.len());
        for cell in &self.cells {
            if by_hex.insert(cell.hex(), cell).is_some() {
                return Err(RealmError::DuplicateCell(cell.hex()));
            }
        }

        for cell in &self.cells {
            let hex = cell.hex();
            if let Some(&edge) = cell.barrier_edges.iter().find(|&&e| e >= EDGE_COUNT) {
                return Err(RealmError::InvalidEdge { hex, edge });
            }
            if cell.barrier_edges.windows(2).any(|w| w[0] >= w[1]) {
                return Err(RealmError::UnsortedEdges(hex));
            }
            for &edge in &cell.barrier_edges {
                let neighbor = hex.neighbor(edge);
                match by_hex.get(&neighbor) {
                    Some(other) if !other.has_barrier(opposite_edge(edge)) => {
                        return Err(RealmError::AsymmetricBarrier {
                            hex,
                            edge,
                            neighbor,
                        });
                    }
                    _ => {}
                }
            }
            if cell.holding.is_some() && cell.landmark.is_some() {
                return Err(RealmError::HoldingLandmarkConflict(hex));
            }
        }

        match by_hex.get(&self.seat_of_power) {
            Some(cell) if cell.holding.is_some() => {}
            _ => return Err(RealmError::MissingSeatOfPower(self.seat_of_power)),
        }

        for (expected, myth) in (1..).zip(&self.myths) {
            if myth.id != expected {
                return Err(RealmError::MythIdGap {
                    expected,
                    found: myth.id,
                });
            }
            let carried = by_hex
                .get(&myth.hex())
                .is_some_and(|cell| cell.myth == Some(myth.id));
            if !carried {
                return Err(RealmError::MythLocationMismatch {
                    id: myth.id,
                    recorded: myth.hex(),
                });
            }
        }

        for cell in &self.cells {
            if let Some(id) = cell.myth {
                let hex = cell.hex();
                if !self.myths.iter().any(|m| m.id == id && m.hex() == hex) {
                    return Err(RealmError::OrphanMyth { id, hex });
                }
            }
        }

        Ok(())
    }
}
