use cqrs_es::DomainEvent;
use serde::{Deserialize, Serialize};

use super::model::DraftOrder;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Event {
    DraftOrderAdded {
        draft: DraftOrder,
    },

    DraftOrderReplaced {
        draft: DraftOrder,
    },

    DraftOrderRemoved {
        uuid: String,
    },

    DraftsCleared,
}

impl DomainEvent for Event {
    fn event_type(&self) -> String {
        match self {
            Event::DraftOrderAdded { .. } => "DraftTable:DraftOrderAdded".to_string(),
            Event::DraftOrderReplaced { .. } => "DraftTable:DraftOrderReplaced".to_string(),
            Event::DraftOrderRemoved { .. } => "DraftTable:DraftOrderRemoved".to_string(),
            Event::DraftsCleared => "DraftTable:Cleared".to_string(),
        }
    }

    fn event_version(&self) -> String {
        "1.0".to_string()
    }
}
