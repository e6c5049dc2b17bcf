use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    config::Settings,
    drafts::{DraftComposer, DraftSink, ParentView},
    errors::Error,
    orders::{ActivePeriod, OrderDetails, RowStatus},
    pagination::{FetchOutcome, FetchRequest, OrderContext, PageController, TaskDispatcher},
    query::{HttpOrderQuery, OrderQuery},
    store::ActiveOrderStore,
};

/// One rendered line of the active orders table
#[derive(Clone, Debug, Serialize, Eq, PartialEq)]
pub struct OrderRow {
    pub uuid: String,
    pub period: String,
    pub details: String,
    pub status: RowStatus,
}

/// Active orders list for one parent view.
///
/// Every fetch is dispatched onto the tokio runtime; outcomes are applied
/// through [`next_outcome`](Self::next_outcome) or
/// [`drain_outcomes`](Self::drain_outcomes), newest request only.
pub struct ActiveOrdersSession<Q, S, P> {
    controller: PageController<TaskDispatcher<Q>>,
    outcomes: UnboundedReceiver<FetchOutcome>,
    store: ActiveOrderStore,
    composer: DraftComposer<S>,
    parent: P,
}

impl<Q, S, P> ActiveOrdersSession<Q, S, P>
where
    Q: OrderQuery + 'static,
    S: DraftSink,
    P: ParentView,
{
    pub fn new(limit: u32, query: Arc<Q>, sink: S, parent: P) -> Result<Self, Error> {
        let (dispatcher, outcomes) = TaskDispatcher::new(query);

        Ok(Self {
            controller: PageController::new(limit, dispatcher)?,
            outcomes,
            store: ActiveOrderStore::new(limit),
            composer: DraftComposer::new(sink),
            parent,
        })
    }

    pub fn mount(&mut self, context: OrderContext) -> FetchRequest {
        let request = self.controller.initialize(context);
        self.store.begin(&request);
        request
    }

    pub fn change_context(&mut self, context: OrderContext) -> Option<FetchRequest> {
        let request = self.controller.on_context_changed(context)?;
        self.store.begin(&request);
        Some(request)
    }

    pub fn select_page(&mut self, index: u32) -> Result<FetchRequest, Error> {
        let request = self.controller.on_page_selected(index)?;
        self.store.begin(&request);
        Ok(request)
    }

    /// Waits for the next fetch outcome; `Some(true)` if it was applied
    pub async fn next_outcome(&mut self) -> Option<bool> {
        let outcome = self.outcomes.recv().await?;
        Some(self.apply(outcome))
    }

    /// Applies every outcome already delivered; returns how many were applied
    pub fn drain_outcomes(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.outcomes.try_recv() {
            if self.apply(outcome) {
                applied += 1;
            }
        }
        applied
    }

    fn apply(&mut self, outcome: FetchOutcome) -> bool {
        let applied = self.store.receive(outcome);
        if applied {
            self.controller.sync_page_count(self.store.page_count());
        }
        applied
    }

    pub async fn discontinue(&mut self, uuid: &str) -> Result<(), Error> {
        let order = self.store.find(uuid).cloned().ok_or_else(|| Error::NotFound {
            entity: format!("ActiveOrder {uuid}"),
        })?;

        self.composer.discontinue(&order, &mut self.parent).await
    }

    pub fn edit(&mut self, uuid: &str) -> Result<(), Error> {
        let order = self.store.find(uuid).ok_or_else(|| Error::NotFound {
            entity: format!("ActiveOrder {uuid}"),
        })?;

        self.parent.handle_edit_active_drug_order(order);
        Ok(())
    }

    pub fn rows(&self, edit_order_number: Option<&str>, is_delete: bool) -> Vec<OrderRow> {
        self.store
            .orders()
            .iter()
            .map(|order| OrderRow {
                uuid: order.uuid.clone(),
                period: ActivePeriod::of(order).to_string(),
                details: OrderDetails::of(order).to_string(),
                status: RowStatus::of(order, edit_order_number, is_delete),
            })
            .collect()
    }

    pub fn store(&self) -> &ActiveOrderStore {
        &self.store
    }

    pub fn controller(&self) -> &PageController<TaskDispatcher<Q>> {
        &self.controller
    }

    pub fn composer(&self) -> &DraftComposer<S> {
        &self.composer
    }

    pub fn parent(&self) -> &P {
        &self.parent
    }
}

impl<S, P> ActiveOrdersSession<HttpOrderQuery, S, P>
where
    S: DraftSink,
    P: ParentView,
{
    /// Session against the configured order service
    pub fn connect(settings: &Settings, sink: S, parent: P) -> Result<Self, Error> {
        let query = HttpOrderQuery::new(reqwest::Client::new(), settings.openmrs_base_url.clone());
        Self::new(settings.page_size, Arc::new(query), sink, parent)
    }
}
