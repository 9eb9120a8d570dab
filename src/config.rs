// src/config.rs
//! Конфигурация генерации королевства
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией:
//! - Форму рельефа (формации высокогорья, шероховатость)
//! - Каталог типов местности, их доли и матрицу кластеризации
//! - Количество владений, ориентиров и мифов
//!
//! Значения по умолчанию строятся явно при каждом вызове: общего изменяемого реестра нет,
//! вызывающая сторона переопределяет их через [`GenerationOptions`].
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.

use crate::error::OptionsError;
use crate::hex::GridShape;
use crate::terrain::{AffinityMatrix, TerrainCatalog};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Геометрический шаблон высокогорья
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HighlandFormation {
    /// Чистый шум, без шаблона
    #[default]
    #[serde(alias = "none")]
    Random,
    /// Односторонний склон, высокогорье в направлении поворота
    Linear,
    /// Высокогорье в центре, спадающее к краям
    Circle,
    /// Высокогорье внутри треугольника
    Triangle,
}

impl HighlandFormation {
    /// Инверсия имеет смысл только для круга и треугольника
    #[must_use]
    pub fn supports_inverse(self) -> bool {
        matches!(self, HighlandFormation::Circle | HighlandFormation::Triangle)
    }
}

/// Параметры одного запуска генератора
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Сид генератора случайных чисел. Без сида каждый запуск даёт новую карту.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Сколько владений пытаться разместить
    #[serde(default = "default_num_holdings")]
    pub num_holdings: usize,

    /// Сколько мифов разместить; при недоборе генерация падает
    #[serde(default = "default_num_myths")]
    pub num_myths: usize,

    /// Минимальное расстояние между мифами в клетках
    #[serde(default = "default_myth_min_distance")]
    pub myth_min_distance: u32,

    /// Тип ориентира → количество
    #[serde(default = "default_landmarks")]
    pub landmarks: BTreeMap<String, usize>,

    #[serde(default = "default_generate_barriers")]
    pub generate_barriers: bool,

    #[serde(default)]
    pub highland_formation: HighlandFormation,

    /// Вес шаблона относительно шума, 0..1
    #[serde(default = "default_highland_formation_strength")]
    pub highland_formation_strength: f32,

    /// Поворот шаблона в градусах (линия и треугольник)
    #[serde(default)]
    pub highland_formation_rotation: f32,

    /// Меняет местами высокогорье и низины (круг и треугольник)
    #[serde(default)]
    pub highland_formation_inverse: bool,

    /// Шероховатость 0..1:
    /// - `0.0` — крупные гладкие области и сильная кластеризация
    /// - `1.0` — мелкая пёстрая местность
    #[serde(default = "default_terrain_roughness")]
    pub terrain_roughness: f32,

    /// Симметричная матрица сродства местностей, веса 0..1.
    /// Достаточно задать одно направление пары, второе зеркалится.
    #[serde(default = "default_terrain_clustering_matrix")]
    pub terrain_clustering_matrix: BTreeMap<String, BTreeMap<String, f32>>,

    /// Относительная доля площади каждой местности
    #[serde(default = "default_terrain_biases")]
    pub terrain_biases: BTreeMap<String, f32>,

    /// Местности от самой высокой к самой низкой
    #[serde(default = "default_terrain_height_order")]
    pub terrain_height_order: Vec<String>,

    #[serde(default = "default_holding_types")]
    pub holding_types: Vec<String>,

    /// Местности, непригодные для владений
    #[serde(default = "default_holding_excluded_terrain")]
    pub holding_excluded_terrain: Vec<String>,
}

fn default_num_holdings() -> usize {
    4
}
fn default_num_myths() -> usize {
    6
}
fn default_myth_min_distance() -> u32 {
    3
}
fn default_generate_barriers() -> bool {
    true
}
fn default_highland_formation_strength() -> f32 {
    0.5
}
fn default_terrain_roughness() -> f32 {
    0.5
}

/// Типы ориентиров по умолчанию
pub const LANDMARK_TYPES: [&str; 6] = ["curse", "dwelling", "hazard", "monument", "ruin", "sanctum"];

/// Типы владений по умолчанию
pub const HOLDING_TYPES: [&str; 4] = ["castle", "fortress", "tower", "town"];

/// Местности по умолчанию, от самой высокой к самой низкой
pub const TERRAIN_TYPES: [&str; 6] = ["mountains", "hills", "forest", "plains", "marsh", "lake"];

fn default_landmarks() -> BTreeMap<String, usize> {
    LANDMARK_TYPES.iter().map(|t| ((*t).to_string(), 3)).collect()
}

fn default_holding_types() -> Vec<String> {
    HOLDING_TYPES.iter().map(ToString::to_string).collect()
}

fn default_holding_excluded_terrain() -> Vec<String> {
    vec!["mountains".to_string(), "lake".to_string()]
}

fn default_terrain_height_order() -> Vec<String> {
    TERRAIN_TYPES.iter().map(ToString::to_string).collect()
}

fn default_terrain_biases() -> BTreeMap<String, f32> {
    [
        ("mountains", 1.0),
        ("hills", 2.0),
        ("forest", 3.0),
        ("plains", 4.0),
        ("marsh", 1.5),
        ("lake", 1.0),
    ]
    .into_iter()
    .map(|(t, w)| (t.to_string(), w))
    .collect()
}

fn default_terrain_clustering_matrix() -> BTreeMap<String, BTreeMap<String, f32>> {
    // Одно направление каждой пары; на диагонали сродство местности с самой собой
    let pairs: [(&str, &str, f32); 21] = [
        ("mountains", "mountains", 1.0),
        ("mountains", "hills", 0.6),
        ("mountains", "forest", 0.2),
        ("mountains", "plains", 0.0),
        ("mountains", "marsh", 0.0),
        ("mountains", "lake", 0.1),
        ("hills", "hills", 0.9),
        ("hills", "forest", 0.5),
        ("hills", "plains", 0.3),
        ("hills", "marsh", 0.0),
        ("hills", "lake", 0.1),
        ("forest", "forest", 0.9),
        ("forest", "plains", 0.4),
        ("forest", "marsh", 0.3),
        ("forest", "lake", 0.2),
        ("plains", "plains", 0.8),
        ("plains", "marsh", 0.3),
        ("plains", "lake", 0.3),
        ("marsh", "marsh", 0.8),
        ("marsh", "lake", 0.6),
        ("lake", "lake", 1.0),
    ];

    let mut matrix: BTreeMap<String, BTreeMap<String, f32>> = BTreeMap::new();
    for (a, b, w) in pairs {
        matrix
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string(), w);
    }
    matrix
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            seed: None,
            num_holdings: default_num_holdings(),
            num_myths: default_num_myths(),
            myth_min_distance: default_myth_min_distance(),
            landmarks: default_landmarks(),
            generate_barriers: default_generate_barriers(),
            highland_formation: HighlandFormation::default(),
            highland_formation_strength: default_highland_formation_strength(),
            highland_formation_rotation: 0.0,
            highland_formation_inverse: false,
            terrain_roughness: default_terrain_roughness(),
            terrain_clustering_matrix: default_terrain_clustering_matrix(),
            terrain_biases: default_terrain_biases(),
            terrain_height_order: default_terrain_height_order(),
            holding_types: default_holding_types(),
            holding_excluded_terrain: default_holding_excluded_terrain(),
        }
    }
}

/// Проверенные и приведённые к индексам параметры местности
#[derive(Debug, Clone)]
pub struct CompiledTerrain {
    pub catalog: TerrainCatalog,
    pub matrix: AffinityMatrix,
    /// Веса долей в порядке каталога
    pub biases: Vec<f32>,
    /// `true` для местностей, где нельзя ставить владения
    pub holding_excluded: Vec<bool>,
}

impl GenerationOptions {
    /// Проверяет параметры и строит индексированное представление местности.
    pub fn compile(&self) -> Result<CompiledTerrain, OptionsError> {
        check_unit("highland_formation_strength", self.highland_formation_strength)?;
        check_unit("terrain_roughness", self.terrain_roughness)?;

        if self.holding_types.is_empty() {
            return Err(OptionsError::NoHoldingTypes);
        }

        let catalog = TerrainCatalog::new(&self.terrain_height_order)?;
        let matrix = AffinityMatrix::from_nested(&catalog, &self.terrain_clustering_matrix)?;

        let mut biases = vec![0.0; catalog.len()];
        for (terrain, &value) in &self.terrain_biases {
            let id = catalog.require(terrain, "terrain biases")?;
            if !value.is_finite() || value < 0.0 {
                return Err(OptionsError::InvalidBias {
                    terrain: terrain.clone(),
                    value,
                });
            }
            biases[id] = value;
        }

        let mut holding_excluded = vec![false; catalog.len()];
        // исключение работает как фильтр: имя вне каталога ничего не исключает
        for terrain in &self.holding_excluded_terrain {
            match catalog.id(terrain) {
                Some(id) => holding_excluded[id] = true,
                None => tracing::warn!(
                    target: "realmgen::config",
                    terrain = terrain.as_str(),
                    "config.unknown_holding_exclusion"
                ),
            }
        }

        Ok(CompiledTerrain {
            catalog,
            matrix,
            biases,
            holding_excluded,
        })
    }
}

fn check_unit(name: &'static str, value: f32) -> Result<(), OptionsError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(OptionsError::OutOfUnitRange { name, value })
    }
}

/// Ошибка загрузки файла конфигурации
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read realm config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse realm config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Полная конфигурация запуска: форма сетки и параметры генерации
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealmConfig {
    pub shape: GridShape,
    #[serde(default)]
    pub options: GenerationOptions,
}

impl RealmConfig {
    /// Загружает конфигурацию из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # realm.toml
    /// [shape]
    /// type = "hex"
    /// radius = 6
    ///
    /// [options]
    /// seed = 42
    /// num_myths = 4
    /// highland_formation = "circle"
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_compile() {
        let compiled = GenerationOptions::default().compile().unwrap();
        assert_eq!(compiled.catalog.len(), TERRAIN_TYPES.len());
        assert!(compiled.matrix.is_symmetric());
        assert!(compiled.holding_excluded[compiled.catalog.id("lake").unwrap()]);
        assert!(!compiled.holding_excluded[compiled.catalog.id("plains").unwrap()]);
    }

    #[test]
    fn unknown_bias_terrain_is_rejected() {
        let mut options = GenerationOptions::default();
        options.terrain_biases.insert("tundra".into(), 1.0);
        assert!(matches!(
            options.compile(),
            Err(OptionsError::UnknownTerrain { ref terrain, .. }) if terrain == "tundra"
        ));
    }

    #[test]
    fn exclusions_outside_catalog_exclude_nothing() {
        let options = GenerationOptions {
            terrain_height_order: vec!["A".into(), "B".into()],
            terrain_biases: [("A".to_string(), 1.0), ("B".to_string(), 1.0)].into(),
            terrain_clustering_matrix: BTreeMap::new(),
            ..GenerationOptions::default()
        };
        let compiled = options.compile().unwrap();
        assert_eq!(compiled.holding_excluded, vec![false, false]);
    }

    #[test]
    fn negative_bias_is_rejected() {
        let mut options = GenerationOptions::default();
        options.terrain_biases.insert("hills".into(), -1.0);
        assert!(matches!(
            options.compile(),
            Err(OptionsError::InvalidBias { .. })
        ));
    }

    #[test]
    fn out_of_range_strength_is_rejected() {
        let options = GenerationOptions {
            highland_formation_strength: 1.5,
            ..GenerationOptions::default()
        };
        assert!(matches!(
            options.compile(),
            Err(OptionsError::OutOfUnitRange { name: "highland_formation_strength", .. })
        ));
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let config = RealmConfig::from_toml_str(
            r#"
            [shape]
            type = "rectangular"
            width = 8
            height = 5

            [options]
            seed = 9
            highland_formation = "none"
            num_myths = 2
            "#,
        )
        .unwrap();

        assert_eq!(
            config.shape,
            GridShape::Rectangular {
                width: 8,
                height: 5
            }
        );
        assert_eq!(config.options.seed, Some(9));
        assert_eq!(config.options.highland_formation, HighlandFormation::Random);
        assert_eq!(config.options.num_myths, 2);
        assert_eq!(config.options.num_holdings, default_num_holdings());
        assert_eq!(config.options.terrain_height_order.len(), 6);
    }
}
