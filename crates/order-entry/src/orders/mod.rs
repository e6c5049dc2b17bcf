/// Active order record
pub mod model;

/// Display details per dosing type
pub mod details;

pub use details::{ActivePeriod, OrderDetails, RowStatus};
pub use model::{ActiveOrder, Concept, DosingType};
