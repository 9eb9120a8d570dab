// src/terrain/affinity.rs
use crate::error::OptionsError;
use std::collections::{BTreeMap, HashMap};

/// Индекс местности в каталоге
pub type TerrainId = usize;

/// Стабильная таблица «имя местности → индекс» в порядке высот (от высокой к низкой)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainCatalog {
    names: Vec<String>,
    index: HashMap<String, TerrainId>,
}

impl TerrainCatalog {
    pub fn new(height_order: &[String]) -> Result<Self, OptionsError> {
        if height_order.is_empty() {
            return Err(OptionsError::EmptyTerrainOrder);
        }
        let mut index = HashMap::with_capacity(height_order.len());
        for (id, name) in height_order.iter().enumerate() {
            if index.insert(name.clone(), id).is_some() {
                return Err(OptionsError::DuplicateTerrain(name.clone()));
            }
        }
        Ok(Self {
            names: height_order.to_vec(),
            index,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn id(&self, name: &str) -> Option<TerrainId> {
        self.index.get(name).copied()
    }

    /// Как [`Self::id`], но для неизвестного имени возвращает ошибку с источником ссылки
    pub fn require(&self, name: &str, context: &'static str) -> Result<TerrainId, OptionsError> {
        self.id(name).ok_or_else(|| OptionsError::UnknownTerrain {
            terrain: name.to_string(),
            context,
        })
    }

    #[must_use]
    pub fn name(&self, id: TerrainId) -> &str {
        &self.names[id]
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Квадратная симметричная матрица сродства местностей.
///
/// Запись идёт только через [`AffinityMatrix::set`], которая пишет обе половины,
/// поэтому `get(a, b) == get(b, a)` всегда.
#[derive(Debug, Clone, PartialEq)]
pub struct AffinityMatrix {
    size: usize,
    weights: Vec<f32>,
}

impl AffinityMatrix {
    #[must_use]
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            weights: vec![0.0; size * size],
        }
    }

    #[must_use]
    pub fn identity(size: usize) -> Self {
        let mut matrix = Self::zeros(size);
        for i in 0..size {
            matrix.set(i, i, 1.0);
        }
        matrix
    }

    /// Строит матрицу из вложенного словаря имён.
    ///
    /// Пара, заданная в одну сторону, зеркалится. Пара, заданная в обе стороны
    /// с разными весами, считается ошибкой. Незаданные пары равны нулю.
    pub fn from_nested(
        catalog: &TerrainCatalog,
        nested: &BTreeMap<String, BTreeMap<String, f32>>,
    ) -> Result<Self, OptionsError> {
        let mut matrix = Self::zeros(catalog.len());
        for (a, row) in nested {
            let ia = catalog.require(a, "clustering matrix")?;
            for (b, &value) in row {
                let ib = catalog.require(b, "clustering matrix")?;
                if !(0.0..=1.0).contains(&value) {
                    return Err(OptionsError::InvalidAffinity {
                        a: a.clone(),
                        b: b.clone(),
                        value,
                    });
                }
                match nested.get(b).and_then(|r| r.get(a)) {
                    Some(&reverse) if reverse.to_bits() != value.to_bits() => {
                        return Err(OptionsError::AsymmetricAffinity {
                            a: a.clone(),
                            b: b.clone(),
                            ab: value,
                            ba: reverse,
                        });
                    }
                    _ => {}
                }
                matrix.set(ia, ib, value);
            }
        }
        Ok(matrix)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn set(&mut self, a: TerrainId, b: TerrainId, weight: f32) {
        self.weights[a * self.size + b] = weight;
        self.weights[b * self.size + a] = weight;
    }

    #[must_use]
    pub fn get(&self, a: TerrainId, b: TerrainId) -> f32 {
        self.weights[a * self.size + b]
    }

    /// Копия со всеми весами, умноженными на `factor`
    #[must_use]
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            size: self.size,
            weights: self.weights.iter().map(|w| w * factor).collect(),
        }
    }

    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|a| (a..self.size).all(|b| self.get(a, b) == self.get(b, a)))
    }
}
