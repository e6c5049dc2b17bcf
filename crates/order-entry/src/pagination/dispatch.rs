use std::sync::Arc;

use derive_new::new;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    errors::Error,
    query::{OrderPage, OrderQuery},
};

use super::request::{FetchRequest, RequestToken};

/// Sends a fetch without waiting for its result
pub trait FetchDispatcher {
    fn dispatch(&self, request: FetchRequest);
}

/// Result of one dispatched fetch, tagged with its request token
#[derive(Debug, new)]
pub struct FetchOutcome {
    pub token: RequestToken,
    pub result: Result<OrderPage, Error>,
}

/// Runs each fetch on its own tokio task and reports into a channel.
///
/// `dispatch` must be called from within a tokio runtime.
pub struct TaskDispatcher<Q> {
    query: Arc<Q>,
    outcomes: UnboundedSender<FetchOutcome>,
}

impl<Q: OrderQuery + 'static> TaskDispatcher<Q> {
    pub fn new(query: Arc<Q>) -> (Self, UnboundedReceiver<FetchOutcome>) {
        let (outcomes, receiver) = mpsc::unbounded_channel();
        (Self { query, outcomes }, receiver)
    }
}

impl<Q: OrderQuery + 'static> FetchDispatcher for TaskDispatcher<Q> {
    fn dispatch(&self, request: FetchRequest) {
        let query = Arc::clone(&self.query);
        let outcomes = self.outcomes.clone();

        tokio::spawn(async move {
            let result = query.fetch(&request).await;
            if let Err(e) = &result {
                tracing::warn!("Fetch {:?} at offset {} failed: {}", request.token, request.offset, e);
            }
            if outcomes.send(FetchOutcome::new(request.token, result)).is_err() {
                tracing::debug!("Outcome receiver dropped for {:?}", request.token);
            }
        });
    }
}
