// src/error.rs
//! Ошибки генерации и проверки королевства

use crate::hex::Hex;
use thiserror::Error;

/// Некорректные параметры генерации
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionsError {
    #[error("terrain height order is empty")]
    EmptyTerrainOrder,
    #[error("terrain `{0}` appears more than once in the height order")]
    DuplicateTerrain(String),
    #[error("unknown terrain `{terrain}` referenced from {context}")]
    UnknownTerrain {
        terrain: String,
        context: &'static str,
    },
    #[error("bias for terrain `{terrain}` must be a finite non-negative number, got {value}")]
    InvalidBias { terrain: String, value: f32 },
    #[error("clustering weight {a}/{b} must lie in 0..=1, got {value}")]
    InvalidAffinity { a: String, b: String, value: f32 },
    #[error("clustering matrix is not symmetric: {a}/{b} = {ab}, {b}/{a} = {ba}")]
    AsymmetricAffinity {
        a: String,
        b: String,
        ab: f32,
        ba: f32,
    },
    #[error("{name} must lie in 0..=1, got {value}")]
    OutOfUnitRange { name: &'static str, value: f32 },
    #[error("holding type list is empty")]
    NoHoldingTypes,
}

/// Ошибка одного запуска генератора
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("invalid generation options: {0}")]
    InvalidOptions(#[from] OptionsError),
    #[error("grid shape produces no cells")]
    EmptyGrid,
    #[error(
        "could only place {placed} of {requested} myths; \
         reduce the number of myths or the minimum myth distance"
    )]
    MythsInfeasible { placed: usize, requested: usize },
}

/// Нарушение инвариантов сохранённого королевства
#[derive(Debug, Error)]
pub enum RealmError {
    #[error("failed to parse realm: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("cell {0:?} appears more than once")]
    DuplicateCell(Hex),
    #[error("cell {hex:?} has barrier edge {edge} outside 0..=5")]
    InvalidEdge { hex: Hex, edge: u8 },
    #[error("cell {0:?} barrier edges are not sorted and unique")]
    UnsortedEdges(Hex),
    #[error("barrier on edge {edge} of {hex:?} has no counterpart on {neighbor:?}")]
    AsymmetricBarrier { hex: Hex, edge: u8, neighbor: Hex },
    #[error("cell {0:?} carries both a holding and a landmark")]
    HoldingLandmarkConflict(Hex),
    #[error("seat of power {0:?} is not a holding cell")]
    MissingSeatOfPower(Hex),
    #[error("myth ids are not dense: expected {expected}, found {found}")]
    MythIdGap { expected: u32, found: u32 },
    #[error("myth {id} is recorded at {recorded:?} but its cell does not carry it")]
    MythLocationMismatch { id: u32, recorded: Hex },
    #[error("cell {hex:?} carries myth {id} that is not in the myth list")]
    OrphanMyth { id: u32, hex: Hex },
}
