use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use cqrs_es::{CqrsFramework, EventStore};
use ulid::Ulid;

use crate::{errors::Error, orders::ActiveOrder};

use super::{model::compose_discontinuation, Command, DraftOrder, DraftTable};

/// Callbacks owned by the view hosting the active orders list
pub trait ParentView {
    /// Delete-mode display toggle
    fn on_delete(&mut self, is_delete: bool);

    /// Enter edit mode for an order
    fn handle_edit_active_drug_order(&mut self, order: &ActiveOrder);
}

/// Destination of composed drafts; upserts by draft uuid
#[async_trait]
pub trait DraftSink: Send + Sync {
    async fn add_draft(&self, draft: DraftOrder) -> Result<(), Error>;
}

pub struct DraftComposer<S> {
    sink: S,
}

impl<S: DraftSink> DraftComposer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Stages a discontinuation draft for `order`.
    ///
    /// Delete mode is switched on before the draft is handed to the sink. If the
    /// sink rejects the draft, delete mode is switched back off before returning.
    pub async fn discontinue<P>(&self, order: &ActiveOrder, parent: &mut P) -> Result<(), Error>
    where
        P: ParentView + ?Sized,
    {
        let draft = compose_discontinuation(order)?;
        let uuid = draft.uuid.clone();

        parent.on_delete(true);
        if let Err(e) = self.sink.add_draft(draft).await {
            tracing::warn!("Draft for {} was not staged: {}", uuid, e);
            parent.on_delete(false);
            return Err(e);
        }

        tracing::info!("Staged discontinuation draft for {}", uuid);
        Ok(())
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// Sink backed by a patient's draft table aggregate
pub struct CqrsDraftSink<ES>
where
    ES: EventStore<DraftTable>,
{
    cqrs: Arc<CqrsFramework<DraftTable, ES>>,
    patient_uuid: String,
}

impl<ES: EventStore<DraftTable>> CqrsDraftSink<ES> {
    pub fn new(cqrs: Arc<CqrsFramework<DraftTable, ES>>, patient_uuid: impl Into<String>) -> Self {
        Self {
            cqrs,
            patient_uuid: patient_uuid.into(),
        }
    }
}

#[async_trait]
impl<ES> DraftSink for CqrsDraftSink<ES>
where
    ES: EventStore<DraftTable>,
    ES::AC: Send,
{
    async fn add_draft(&self, draft: DraftOrder) -> Result<(), Error> {
        let mut metadata = HashMap::new();
        metadata.insert("command_id".to_string(), Ulid::new().to_string());

        self.cqrs
            .execute_with_metadata(&self.patient_uuid, Command::AddDraftOrder { draft }, metadata)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use cqrs_es::persist::ViewRepository;

    use super::*;
    use crate::{
        drafts::{cqrs::init_in_memory, DraftAction},
        orders::model::fixtures::paracetamol,
    };

    #[derive(Clone, Default)]
    struct Journal(Arc<Mutex<Vec<String>>>);

    impl Journal {
        fn record(&self, entry: String) {
            self.0.lock().unwrap().push(entry);
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct JournalSink {
        journal: Journal,
        fail: bool,
    }

    #[async_trait]
    impl DraftSink for JournalSink {
        async fn add_draft(&self, draft: DraftOrder) -> Result<(), Error> {
            if self.fail {
                return Err(Error::Persistence {
                    message: "table unavailable".to_string(),
                });
            }
            self.journal.record(format!("draft:{}", draft.uuid));
            Ok(())
        }
    }

    struct JournalParent(Journal);

    impl ParentView for JournalParent {
        fn on_delete(&mut self, is_delete: bool) {
            self.0.record(format!("delete:{is_delete}"));
        }

        fn handle_edit_active_drug_order(&mut self, order: &ActiveOrder) {
            self.0.record(format!("edit:{}", order.uuid));
        }
    }

    fn composer(journal: &Journal, fail: bool) -> DraftComposer<JournalSink> {
        DraftComposer::new(JournalSink {
            journal: journal.clone(),
            fail,
        })
    }

    #[tokio::test]
    async fn delete_mode_then_draft() {
        let journal = Journal::default();
        let mut parent = JournalParent(journal.clone());

        composer(&journal, false)
            .discontinue(&paracetamol(), &mut parent)
            .await
            .unwrap();

        assert_eq!(journal.entries(), vec!["delete:true", "draft:o1"]);
    }

    #[tokio::test]
    async fn invalid_order_has_no_side_effects() {
        let journal = Journal::default();
        let mut parent = JournalParent(journal.clone());
        let mut order = paracetamol();
        order.drug.display.clear();

        let err = composer(&journal, false)
            .discontinue(&order, &mut parent)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            Error::InvalidOrder {
                field: "drug".to_string()
            }
        );
        assert!(journal.entries().is_empty());
    }

    #[tokio::test]
    async fn rejected_draft_turns_delete_mode_off() {
        let journal = Journal::default();
        let mut parent = JournalParent(journal.clone());

        let err = composer(&journal, true)
            .discontinue(&paracetamol(), &mut parent)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Persistence { .. }));
        assert_eq!(journal.entries(), vec!["delete:true", "delete:false"]);
    }

    #[tokio::test]
    async fn cqrs_sink_stages_draft_in_patient_table() {
        let (cqrs, repo) = init_in_memory();
        let composer = DraftComposer::new(CqrsDraftSink::new(cqrs, "patient-1"));
        let mut parent = JournalParent(Journal::default());

        composer.discontinue(&paracetamol(), &mut parent).await.unwrap();
        composer.discontinue(&paracetamol(), &mut parent).await.unwrap();

        let view = repo.load("patient-1").await.unwrap().unwrap();
        assert_eq!(view.table.drafts.len(), 1);
        assert_eq!(view.table.drafts[0].action, DraftAction::Discontinue);
        assert_eq!(view.table.drafts[0].order_number, "ORD-1");
        assert!(!view.command_id.is_empty());
    }
}
