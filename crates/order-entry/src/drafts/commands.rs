use serde::{Deserialize, Serialize};

use super::model::DraftOrder;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum Command {
    /// Add a draft, replacing any draft with the same uuid
    AddDraftOrder {
        draft: DraftOrder,
    },

    /// Drop the draft staged for an order
    RemoveDraftOrder {
        uuid: String,
    },

    /// Drop every staged draft
    ClearDrafts,
}
