/// Draft order record
pub mod model;

/// Draft table aggregate
pub mod aggregate;

/// Commands
pub mod commands;

/// Events
pub mod events;

/// View (read model)
pub mod view;

/// CQRS setup
pub mod cqrs;

/// Discontinuation composer and its collaborators
pub mod composer;

pub use aggregate::{DraftTable, Services, AGGREGATE_TYPE};
pub use commands::Command;
pub use composer::{CqrsDraftSink, DraftComposer, DraftSink, ParentView};
pub use events::Event;
pub use model::{compose_discontinuation, DraftAction, DraftOrder};
pub use view::{DraftTableQuery, DraftTableView, MemViewRepository};
