/// Context, cursor and fetch request values
pub mod request;

/// Page cursor state machine
pub mod controller;

/// Fire-and-continue fetch dispatch
pub mod dispatch;

pub use controller::{PageController, PageEvent};
pub use dispatch::{FetchDispatcher, FetchOutcome, TaskDispatcher};
pub use request::{FetchRequest, OrderContext, PageRequest, RequestToken};
