pub mod barrier;
pub mod config;
pub mod error;
pub mod features;
pub mod generator;
pub mod heightmap;
pub mod hex;
pub mod noise;
pub mod realm;
pub mod terrain;

pub use config::{GenerationOptions, HighlandFormation, RealmConfig};
pub use error::{GenerationError, OptionsError, RealmError};
pub use generator::{generate_realm, generate_realm_with_rng};
pub use hex::{GridShape, Hex, HexGrid};
pub use realm::{Cell, Myth, Realm};
