use async_trait::async_trait;
use cqrs_es::Aggregate;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

use super::{model::DraftOrder, Command, Event};

/// Staged drafts for one patient, keyed by order uuid
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DraftTable {
    pub drafts: Vec<DraftOrder>,
}

pub const AGGREGATE_TYPE: &str = "DraftTable";

#[derive(Clone, Default)]
pub struct Services {}

#[async_trait]
impl Aggregate for DraftTable {
    type Command = Command;
    type Event = Event;
    type Error = Error;
    type Services = Services;

    fn aggregate_type() -> String {
        AGGREGATE_TYPE.to_string()
    }

    async fn handle(
        &self,
        command: Self::Command,
        _services: &Self::Services,
    ) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            Command::AddDraftOrder { draft } => {
                validate_draft(&draft)?;

                if self.find(&draft.uuid).is_some() {
                    Ok(vec![Event::DraftOrderReplaced { draft }])
                } else {
                    Ok(vec![Event::DraftOrderAdded { draft }])
                }
            }

            Command::RemoveDraftOrder { uuid } => {
                if self.find(&uuid).is_none() {
                    return Err(Error::NotFound {
                        entity: format!("DraftOrder {uuid}"),
                    });
                }

                Ok(vec![Event::DraftOrderRemoved { uuid }])
            }

            Command::ClearDrafts => {
                if self.drafts.is_empty() {
                    return Ok(vec![]);
                }

                Ok(vec![Event::DraftsCleared])
            }
        }
    }

    fn apply(&mut self, event: Self::Event) {
        match event {
            Event::DraftOrderAdded { draft } => {
                self.drafts.push(draft);
            }

            Event::DraftOrderReplaced { draft } => {
                if let Some(existing) = self.drafts.iter_mut().find(|d| d.uuid == draft.uuid) {
                    *existing = draft;
                }
            }

            Event::DraftOrderRemoved { uuid } => {
                self.drafts.retain(|d| d.uuid != uuid);
            }

            Event::DraftsCleared => {
                self.drafts.clear();
            }
        }
    }
}

impl DraftTable {
    pub fn find(&self, uuid: &str) -> Option<&DraftOrder> {
        self.drafts.iter().find(|d| d.uuid == uuid)
    }
}

fn validate_draft(draft: &DraftOrder) -> Result<(), Error> {
    if draft.uuid.trim().is_empty() {
        return Err(Error::Validation {
            message: "Draft order requires a uuid".to_string(),
        });
    }
    if draft.drug_name.trim().is_empty() {
        return Err(Error::Validation {
            message: format!("Draft order {} requires a drug name", draft.uuid),
        });
    }
    Ok(())
}
