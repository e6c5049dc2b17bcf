use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::model::{ActiveOrder, Concept, DosingType};

const PERIOD_FORMAT: &str = "%m-%d-%Y %H:%M";

/// Display fragments for one order, selected by dosing type
#[derive(Clone, Debug, Serialize, Eq, PartialEq)]
pub struct OrderDetails {
    pub drug: String,
    pub fragments: Vec<String>,
}

impl OrderDetails {
    pub fn of(order: &ActiveOrder) -> Self {
        let fragments = match order.dosing_type {
            DosingType::Simple => simple_fragments(order),
            DosingType::FreeText => free_text_fragments(order),
        };

        Self {
            drug: order.drug.display.clone(),
            fragments,
        }
    }
}

impl fmt::Display for OrderDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.drug)?;
        for fragment in &self.fragments {
            f.write_str(fragment)?;
        }
        Ok(())
    }
}

fn display(concept: &Option<Concept>) -> &str {
    concept.as_ref().map(|c| c.display.as_str()).unwrap_or_default()
}

fn number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn simple_fragments(order: &ActiveOrder) -> Vec<String> {
    let mut fragments = vec![
        format!(" {}", order.dose.map(number).unwrap_or_default()),
        format!(" {}", display(&order.dose_units)),
        format!(", {}", display(&order.frequency)),
        format!(", {}", display(&order.route)),
    ];

    if let Some(duration) = order.duration {
        fragments.push(format!(", for {duration}"));
    }
    if let Some(units) = &order.duration_units {
        fragments.push(format!(" {} total", units.display));
    }
    if let Some(instructions) = &order.dosing_instructions {
        fragments.push(format!(", ({instructions})"));
    }
    fragments.extend(dispense_fragment(order));
    fragments
}

fn free_text_fragments(order: &ActiveOrder) -> Vec<String> {
    let mut fragments = Vec::new();
    if let Some(instructions) = &order.dosing_instructions {
        fragments.push(format!(" {instructions}"));
    }
    fragments.extend(dispense_fragment(order));
    fragments
}

fn dispense_fragment(order: &ActiveOrder) -> Option<String> {
    match (order.quantity, &order.quantity_units) {
        (Some(quantity), Some(units)) => Some(format!(
            ", (Dispense: {} {})",
            number(quantity),
            units.display
        )),
        _ => None,
    }
}

/// Activation span of an order, `MM-DD-YYYY HH:mm[ - MM-DD-YYYY HH:mm]`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActivePeriod {
    pub activated: DateTime<FixedOffset>,
    pub expires: Option<DateTime<FixedOffset>>,
}

impl ActivePeriod {
    pub fn of(order: &ActiveOrder) -> Self {
        Self {
            activated: order.date_activated,
            expires: order.auto_expire_date,
        }
    }
}

impl fmt::Display for ActivePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.activated.format(PERIOD_FORMAT))?;
        if let Some(expires) = self.expires {
            write!(f, " - {}", expires.format(PERIOD_FORMAT))?;
        }
        Ok(())
    }
}

/// Action cell state for a row
#[derive(Clone, Copy, Debug, Serialize, Eq, PartialEq)]
pub enum RowStatus {
    /// The parent is revising this order
    WillRevise,
    /// Delete mode is on for the view
    WillDiscontinue,
    /// Edit and discontinue are offered
    Actionable,
}

impl RowStatus {
    pub fn of(order: &ActiveOrder, edit_order_number: Option<&str>, is_delete: bool) -> Self {
        if edit_order_number == Some(order.order_number.as_str()) {
            RowStatus::WillRevise
        } else if is_delete {
            RowStatus::WillDiscontinue
        } else {
            RowStatus::Actionable
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::orders::model::fixtures::{free_text, paracetamol};

    #[test]
    fn simple_dosing_shows_structured_fields() {
        let details = OrderDetails::of(&paracetamol());
        assert_eq!(details.to_string(), "Paracetamol: 500 mg, BD, Oral");
    }

    #[test]
    fn simple_dosing_with_optional_fields() {
        let mut order = paracetamol();
        order.duration = Some(5);
        order.duration_units = Some(Concept::named("Days"));
        order.dosing_instructions = Some("after meals".to_string());
        order.quantity = Some(20.0);
        order.quantity_units = Some(Concept::named("Tablet"));

        assert_eq!(
            OrderDetails::of(&order).to_string(),
            "Paracetamol: 500 mg, BD, Oral, for 5 Days total, (after meals), (Dispense: 20 Tablet)"
        );
    }

    #[test]
    fn free_text_never_shows_structured_fields() {
        let mut order = free_text();
        order.dose = Some(250.0);
        order.frequency = Some(Concept::named("TDS"));
        order.route = Some(Concept::named("Oral"));

        let text = OrderDetails::of(&order).to_string();
        assert_eq!(
            text,
            "Amoxicillin: one capsule three times daily, (Dispense: 21 Capsule)"
        );
        assert!(!text.contains("250"));
        assert!(!text.contains("TDS"));
        assert!(!text.contains("Oral"));
    }

    #[test]
    fn dispense_requires_quantity_and_units() {
        let mut order = free_text();
        order.quantity_units = None;
        assert_eq!(
            OrderDetails::of(&order).to_string(),
            "Amoxicillin: one capsule three times daily"
        );
    }

    #[test]
    fn period_with_and_without_expiry() {
        let mut order = paracetamol();
        assert_eq!(ActivePeriod::of(&order).to_string(), "07-10-2018 11:22");

        order.auto_expire_date = Some(DateTime::parse_from_rfc3339("2018-07-15T23:59:00+00:00").unwrap());
        assert_eq!(
            ActivePeriod::of(&order).to_string(),
            "07-10-2018 11:22 - 07-15-2018 23:59"
        );
    }

    #[test]
    fn revise_takes_precedence_over_delete_mode() {
        let order = paracetamol();
        assert_eq!(RowStatus::of(&order, Some("ORD-1"), true), RowStatus::WillRevise);
        assert_eq!(RowStatus::of(&order, Some("ORD-9"), true), RowStatus::WillDiscontinue);
        assert_eq!(RowStatus::of(&order, None, false), RowStatus::Actionable);
    }
}
