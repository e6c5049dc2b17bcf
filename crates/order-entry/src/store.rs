use crate::{
    orders::ActiveOrder,
    pagination::{FetchOutcome, FetchRequest, RequestToken},
};

/// What the list view should show
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderState<'a> {
    Loading,
    Empty,
    Orders(&'a [ActiveOrder]),
}

/// Latest fetched page of active orders.
///
/// Only the outcome of the most recently begun fetch is applied.
#[derive(Debug)]
pub struct ActiveOrderStore {
    limit: u32,
    offset: u32,
    requested_offset: u32,
    latest: Option<RequestToken>,
    loading: bool,
    active_orders: Option<Vec<ActiveOrder>>,
    total_count: u64,
}

impl ActiveOrderStore {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            offset: 0,
            requested_offset: 0,
            latest: None,
            loading: false,
            active_orders: None,
            total_count: 0,
        }
    }

    pub fn begin(&mut self, request: &FetchRequest) {
        self.latest = Some(request.token);
        self.limit = request.limit;
        self.requested_offset = request.offset;
        self.loading = true;
    }

    /// Applies the outcome if it answers the latest request; returns whether it was applied
    pub fn receive(&mut self, outcome: FetchOutcome) -> bool {
        if self.latest != Some(outcome.token) {
            tracing::warn!(
                "Ignoring stale fetch outcome {:?} (latest {:?})",
                outcome.token,
                self.latest
            );
            return false;
        }

        self.loading = false;
        self.offset = self.requested_offset;
        match outcome.result {
            Ok(page) => {
                tracing::debug!(
                    "Applied {} orders of {} for {:?}",
                    page.orders.len(),
                    page.total_count,
                    outcome.token
                );
                self.active_orders = Some(page.orders);
                self.total_count = page.total_count;
            }
            Err(e) => {
                tracing::warn!("Active orders unavailable: {}", e);
                self.active_orders = Some(Vec::new());
                self.total_count = 0;
            }
        }
        true
    }

    pub fn render_state(&self) -> RenderState<'_> {
        match &self.active_orders {
            None => RenderState::Loading,
            Some(_) if self.loading => RenderState::Loading,
            Some(orders) if orders.is_empty() => RenderState::Empty,
            Some(orders) => RenderState::Orders(orders),
        }
    }

    pub fn page_count(&self) -> u32 {
        let pages = self.total_count.div_ceil(u64::from(self.limit.max(1)));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// e.g. `Showing 11 to 20 of 55 entries`, for the last applied page
    pub fn result_count_label(&self) -> String {
        let shown = self.orders().len() as u64;
        if shown == 0 {
            return format!("Showing 0 to 0 of {} entries", self.total_count);
        }
        let first = u64::from(self.offset) + 1;
        let last = u64::from(self.offset) + shown;
        format!("Showing {first} to {last} of {} entries", self.total_count)
    }

    pub fn find(&self, uuid: &str) -> Option<&ActiveOrder> {
        self.orders().iter().find(|order| order.uuid == uuid)
    }

    pub fn orders(&self) -> &[ActiveOrder] {
        self.active_orders.as_deref().unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn latest_token(&self) -> Option<RequestToken> {
        self.latest
    }
}
