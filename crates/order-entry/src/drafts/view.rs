use std::{collections::HashMap, sync::RwLock};

use async_trait::async_trait;
use cqrs_es::{
    persist::{PersistenceError, ViewContext, ViewRepository},
    Aggregate, EventEnvelope, View as CqrsView,
};
use serde::{Deserialize, Serialize};

use super::{cqrs::DraftsRepo, DraftTable, AGGREGATE_TYPE};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DraftTableView {
    pub aggregate_type: String,
    pub command_id: String,
    pub patient_uuid: String,
    pub table: DraftTable,
}

impl CqrsView<DraftTable> for DraftTableView {
    fn update(&mut self, event: &EventEnvelope<DraftTable>) {
        self.patient_uuid.clone_from(&event.aggregate_id);
        self.aggregate_type = AGGREGATE_TYPE.to_string();
        self.command_id = event
            .metadata
            .get("command_id")
            .cloned()
            .unwrap_or_default();
        self.table.apply(event.payload.clone());
    }
}

impl DraftTableView {
    pub fn for_patient(patient_uuid: &str) -> Self {
        Self {
            aggregate_type: AGGREGATE_TYPE.to_string(),
            patient_uuid: patient_uuid.to_string(),
            ..Default::default()
        }
    }
}

pub struct DraftTableQuery {
    repo: DraftsRepo,
}

impl DraftTableQuery {
    pub fn new(repo: DraftsRepo) -> Self {
        Self { repo }
    }

    async fn project(
        &self,
        patient_uuid: &str,
        events: &[EventEnvelope<DraftTable>],
    ) -> Result<(), PersistenceError> {
        // clearing an empty table commits nothing
        if events.is_empty() {
            return Ok(());
        }

        let (mut view, context) = self
            .repo
            .load_with_context(patient_uuid)
            .await?
            .unwrap_or_else(|| {
                (
                    DraftTableView::for_patient(patient_uuid),
                    ViewContext::new(patient_uuid.to_string(), 0),
                )
            });

        events.iter().for_each(|event| view.update(event));
        self.repo.update_view(view, context).await
    }
}

#[async_trait]
impl cqrs_es::Query<DraftTable> for DraftTableQuery {
    async fn dispatch(&self, patient_uuid: &str, events: &[EventEnvelope<DraftTable>]) {
        if let Err(err) = self.project(patient_uuid, events).await {
            tracing::error!("DraftTableQuery error for {}: {}", patient_uuid, err);
        }
    }
}

/// Process-local view repository for local runs and tests
#[derive(Default)]
pub struct MemViewRepository {
    views: RwLock<HashMap<String, (DraftTableView, i64)>>,
}

#[async_trait]
impl ViewRepository<DraftTableView, DraftTable> for MemViewRepository {
    async fn load(&self, view_id: &str) -> Result<Option<DraftTableView>, PersistenceError> {
        Ok(self
            .load_with_context(view_id)
            .await?
            .map(|(view, _)| view))
    }

    async fn load_with_context(
        &self,
        view_id: &str,
    ) -> Result<Option<(DraftTableView, ViewContext)>, PersistenceError> {
        let views = self
            .views
            .read()
            .map_err(|e| PersistenceError::UnknownError(e.to_string().into()))?;

        Ok(views
            .get(view_id)
            .map(|(view, version)| (view.clone(), ViewContext::new(view_id.to_string(), *version))))
    }

    async fn update_view(
        &self,
        view: DraftTableView,
        context: ViewContext,
    ) -> Result<(), PersistenceError> {
        let mut views = self
            .views
            .write()
            .map_err(|e| PersistenceError::UnknownError(e.to_string().into()))?;

        views.insert(context.view_instance_id, (view, context.version + 1));
        Ok(())
    }
}
