//! Active medication orders: pagination, order details and discontinuation drafts

/// Environment configuration
pub mod config;

/// Draft orders and the draft table aggregate
pub mod drafts;

/// Domain errors
pub mod errors;

/// Active order model and display details
pub mod orders;

/// Page cursor and fetch dispatch
pub mod pagination;

/// Order-query service client
pub mod query;

/// Active orders view session
pub mod session;

/// Fetched order state
pub mod store;

pub use config::Settings;
pub use errors::Error;
pub use session::ActiveOrdersSession;
