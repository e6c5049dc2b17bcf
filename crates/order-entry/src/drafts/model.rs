use serde::{Deserialize, Serialize};

use crate::{
    errors::Error,
    orders::{ActiveOrder, Concept},
};

/// What the draft will do to the order once submitted
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "UPPERCASE")]
pub enum DraftAction {
    Revise,
    Discontinue,
}

/// Staged order change awaiting confirmation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrder {
    pub uuid: String,
    pub drug_name: String,
    pub action: DraftAction,
    pub dose: Option<f64>,
    pub dosing_unit: Option<String>,
    pub frequency: Option<String>,
    pub route: Option<String>,
    pub duration: Option<u32>,
    pub duration_unit: Option<String>,
    pub reason: Option<String>,
    pub drug_instructions: Option<String>,
    pub dispensing_quantity: Option<f64>,
    pub dispensing_unit: Option<String>,
    pub order_number: String,
}

impl DraftOrder {
    /// Projects an active order into a discontinuation draft without checking it
    pub fn discontinuing(order: &ActiveOrder) -> Self {
        let display = |concept: &Option<Concept>| {
            concept.as_ref().map(|c| c.display.clone())
        };

        Self {
            uuid: order.uuid.clone(),
            drug_name: order.drug.display.clone(),
            action: DraftAction::Discontinue,
            dose: order.dose,
            dosing_unit: display(&order.dose_units),
            frequency: display(&order.frequency),
            route: display(&order.route),
            duration: order.duration,
            duration_unit: display(&order.duration_units),
            reason: None,
            drug_instructions: order.dosing_instructions.clone(),
            dispensing_quantity: order.quantity,
            dispensing_unit: display(&order.quantity_units),
            order_number: order.order_number.clone(),
        }
    }
}

/// Validated discontinuation draft for `order`
pub fn compose_discontinuation(order: &ActiveOrder) -> Result<DraftOrder, Error> {
    order.validate()?;
    Ok(DraftOrder::discontinuing(order))
}
