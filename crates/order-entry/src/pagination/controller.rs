use crate::errors::Error;

use super::{
    dispatch::FetchDispatcher,
    request::{FetchRequest, OrderContext, PageRequest, RequestToken},
};

/// Triggers that move the page cursor
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PageEvent {
    /// The list view became active
    Mounted(OrderContext),
    /// The identifying context (tab, patient, care setting) may have changed
    ContextChanged(OrderContext),
    /// The user picked a zero-based page
    PageSelected(u32),
}

/// Owns the page cursor and issues exactly one fetch per accepted event
pub struct PageController<D> {
    dispatcher: D,
    cursor: PageRequest,
    context: Option<OrderContext>,
    page_count: Option<u32>,
    last_token: u64,
}

impl<D: FetchDispatcher> PageController<D> {
    pub fn new(limit: u32, dispatcher: D) -> Result<Self, Error> {
        if limit == 0 {
            return Err(Error::Validation {
                message: "page size must be positive".to_string(),
            });
        }

        Ok(Self {
            dispatcher,
            cursor: PageRequest::first(limit),
            context: None,
            page_count: None,
            last_token: 0,
        })
    }

    /// Returns the dispatched request, or `None` when the event was a no-op
    pub fn handle(&mut self, event: PageEvent) -> Result<Option<FetchRequest>, Error> {
        match event {
            PageEvent::Mounted(context) => Ok(Some(self.initialize(context))),
            PageEvent::ContextChanged(context) => Ok(self.on_context_changed(context)),
            PageEvent::PageSelected(index) => self.on_page_selected(index).map(Some),
        }
    }

    pub fn initialize(&mut self, context: OrderContext) -> FetchRequest {
        self.page_count = None;
        self.reset_and_fetch(PageRequest::first(self.cursor.limit), context)
    }

    pub fn on_context_changed(&mut self, context: OrderContext) -> Option<FetchRequest> {
        if self.context.as_ref() == Some(&context) {
            tracing::debug!("Context unchanged for tab {}", context.tab_name);
            return None;
        }
        Some(self.initialize(context))
    }

    pub fn on_page_selected(&mut self, index: u32) -> Result<FetchRequest, Error> {
        let context = self.context.clone().ok_or_else(|| Error::Validation {
            message: "page selected before the view was mounted".to_string(),
        })?;

        if let Some(page_count) = self.page_count {
            if index > 0 && index >= page_count {
                return Err(Error::PageOutOfRange { index, page_count });
            }
        }

        let cursor = PageRequest::at(index, self.cursor.limit)?;
        Ok(self.reset_and_fetch(cursor, context))
    }

    /// Page count from the latest fetch's total-count metadata
    pub fn sync_page_count(&mut self, page_count: u32) {
        self.page_count = Some(page_count);
    }

    fn reset_and_fetch(&mut self, cursor: PageRequest, context: OrderContext) -> FetchRequest {
        self.last_token += 1;

        let request = FetchRequest {
            token: RequestToken(self.last_token),
            limit: cursor.limit,
            offset: cursor.offset,
            patient_uuid: context.patient_uuid.clone(),
            care_setting_uuid: context.care_setting_uuid.clone(),
        };

        self.cursor = cursor;
        self.context = Some(context);

        tracing::info!(
            "Fetching active orders for {} (limit {}, offset {}, {:?})",
            request.patient_uuid,
            request.limit,
            request.offset,
            request.token
        );
        self.dispatcher.dispatch(request.clone());
        request
    }

    pub fn cursor(&self) -> PageRequest {
        self.cursor
    }

    pub fn limit(&self) -> u32 {
        self.cursor.limit
    }

    pub fn offset(&self) -> u32 {
        self.cursor.offset
    }

    pub fn page_index(&self) -> u32 {
        self.cursor.page_index
    }

    pub fn page_count(&self) -> Option<u32> {
        self.page_count
    }

    pub fn context(&self) -> Option<&OrderContext> {
        self.context.as_ref()
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<FetchRequest>>);

    impl FetchDispatcher for Recorder {
        fn dispatch(&self, request: FetchRequest) {
            self.0.borrow_mut().push(request);
        }
    }

    impl Recorder {
        fn offsets(&self) -> Vec<u32> {
            self.0.borrow().iter().map(|r| r.offset).collect()
        }

        fn count(&self) -> usize {
            self.0.borrow().len()
        }
    }

    fn context(tab: &str) -> OrderContext {
        OrderContext::new(tab.to_string(), "patient-1".to_string(), "outpatient".to_string())
    }

    fn controller() -> PageController<Recorder> {
        PageController::new(10, Recorder::default()).unwrap()
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert!(matches!(
            PageController::new(0, Recorder::default()),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn mount_fetches_first_page() {
        let mut controller = controller();
        let request = controller.initialize(context("active"));

        assert_eq!(request.limit, 10);
        assert_eq!(request.offset, 0);
        assert_eq!(request.patient_uuid, "patient-1");
        assert_eq!(request.care_setting_uuid, "outpatient");
        assert_eq!(controller.dispatcher().count(), 1);
    }

    #[test]
    fn selecting_page_two_fetches_offset_twenty() {
        let mut controller = controller();
        controller.initialize(context("active"));

        let request = controller.on_page_selected(2).unwrap();

        assert_eq!((request.limit, request.offset), (10, 20));
        assert_eq!(controller.offset(), 20);
        assert_eq!(controller.page_index(), 2);
        assert_eq!(controller.dispatcher().offsets(), vec![0, 20]);
    }

    #[test]
    fn page_selection_keeps_offset_in_step_with_index() {
        let mut controller = controller();
        controller.initialize(context("active"));

        for index in [3, 0, 9, 1, 4] {
            controller.on_page_selected(index).unwrap();
            assert_eq!(controller.page_index(), index);
            assert_eq!(controller.offset(), index * controller.limit());
        }
    }

    #[test]
    fn unchanged_context_is_a_no_op() {
        let mut controller = controller();
        controller.initialize(context("active"));
        controller.on_page_selected(3).unwrap();

        assert_eq!(controller.on_context_changed(context("active")), None);
        assert_eq!(controller.offset(), 30);
        assert_eq!(controller.dispatcher().count(), 2);
    }

    #[test]
    fn changed_context_resets_to_first_page() {
        let mut controller = controller();
        controller.initialize(context("active"));
        controller.sync_page_count(6);
        controller.on_page_selected(3).unwrap();

        let request = controller.on_context_changed(context("past")).unwrap();

        assert_eq!(request.offset, 0);
        assert_eq!(controller.page_index(), 0);
        assert_eq!(controller.page_count(), None);
        assert_eq!(controller.context().unwrap().tab_name, "past");
        assert_eq!(controller.dispatcher().offsets(), vec![0, 30, 0]);
    }

    #[test]
    fn tokens_increase_with_every_fetch() {
        let mut controller = controller();
        let first = controller.initialize(context("active"));
        let second = controller.on_page_selected(1).unwrap();
        let third = controller.on_context_changed(context("past")).unwrap();

        assert!(first.token < second.token);
        assert!(second.token < third.token);
    }

    #[test]
    fn out_of_range_page_is_rejected_without_fetch() {
        let mut controller = controller();
        controller.initialize(context("active"));
        controller.sync_page_count(3);

        assert_eq!(
            controller.on_page_selected(3),
            Err(Error::PageOutOfRange {
                index: 3,
                page_count: 3
            })
        );
        assert_eq!(controller.offset(), 0);
        assert_eq!(controller.dispatcher().count(), 1);
    }

    #[test]
    fn first_page_is_valid_for_empty_results() {
        let mut controller = controller();
        controller.initialize(context("active"));
        controller.sync_page_count(0);

        assert!(controller.on_page_selected(0).is_ok());
    }

    #[test]
    fn page_selection_before_mount_is_rejected() {
        let mut controller = controller();
        assert!(matches!(
            controller.on_page_selected(1),
            Err(Error::Validation { .. })
        ));
        assert_eq!(controller.dispatcher().count(), 0);
    }

    #[test]
    fn events_route_through_handle() {
        let mut controller = controller();

        let mounted = controller.handle(PageEvent::Mounted(context("active"))).unwrap();
        let same = controller.handle(PageEvent::ContextChanged(context("active"))).unwrap();
        let page = controller.handle(PageEvent::PageSelected(4)).unwrap();

        assert_eq!(mounted.map(|r| r.offset), Some(0));
        assert_eq!(same, None);
        assert_eq!(page.map(|r| r.offset), Some(40));
        assert_eq!(controller.dispatcher().count(), 2);
    }
}
