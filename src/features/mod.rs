pub mod holdings;
pub mod landmarks;
pub mod myths;

pub use holdings::{HoldingPlacement, holding_spacing, place_holdings};
pub use landmarks::place_landmarks;
pub use myths::{place_myths, remoteness_order};
