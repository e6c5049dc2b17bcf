use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Dosing instructions discriminator
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub enum DosingType {
    /// Structured dose, units, frequency and route
    #[serde(rename = "org.openmrs.SimpleDosingInstructions")]
    Simple,
    /// Free-text instructions; any other dosing type name lands here
    #[default]
    #[serde(rename = "org.openmrs.FreeTextDosingInstructions")]
    #[serde(other)]
    FreeText,
}

/// Coded reference with a display name
#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct Concept {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub display: String,
}

impl Concept {
    pub fn named(display: impl Into<String>) -> Self {
        Self {
            uuid: None,
            display: display.into(),
        }
    }
}

/// Active drug order as returned by the order service
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveOrder {
    pub uuid: String,
    pub drug: Concept,
    pub dose: Option<f64>,
    pub dose_units: Option<Concept>,
    pub frequency: Option<Concept>,
    pub route: Option<Concept>,
    pub duration: Option<u32>,
    pub duration_units: Option<Concept>,
    pub dosing_instructions: Option<String>,
    pub quantity: Option<f64>,
    pub quantity_units: Option<Concept>,
    pub order_number: String,
    #[serde(with = "timestamp")]
    pub date_activated: DateTime<FixedOffset>,
    #[serde(default, with = "timestamp::optional")]
    pub auto_expire_date: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "nullable_dosing_type")]
    pub dosing_type: DosingType,
}

fn nullable_dosing_type<'de, D>(d: D) -> Result<DosingType, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<DosingType>::deserialize(d)?.unwrap_or_default())
}

impl ActiveOrder {
    /// Required fields for composing a draft from this order
    pub fn validate(&self) -> Result<(), Error> {
        require_text("uuid", &self.uuid)?;
        require_text("drug", &self.drug.display)?;
        require_text("orderNumber", &self.order_number)?;

        if self.dosing_type == DosingType::Simple {
            if self.dose.is_none() {
                return Err(missing("dose"));
            }
            require_concept("doseUnits", &self.dose_units)?;
            require_concept("frequency", &self.frequency)?;
            require_concept("route", &self.route)?;
        }
        Ok(())
    }
}

fn missing(field: &str) -> Error {
    Error::InvalidOrder {
        field: field.to_string(),
    }
}

fn require_text(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(missing(field));
    }
    Ok(())
}

fn require_concept(field: &str, value: &Option<Concept>) -> Result<(), Error> {
    match value {
        Some(concept) => require_text(field, &concept.display),
        None => Err(missing(field)),
    }
}

/// Order service timestamps, e.g. `2018-07-10T11:22:33.000+0100`
mod timestamp {
    use chrono::{DateTime, FixedOffset};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

    pub fn parse(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw).or_else(|_| DateTime::parse_from_str(raw, FORMAT))
    }

    pub fn serialize<S: Serializer>(value: &DateTime<FixedOffset>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<FixedOffset>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub mod optional {
        use chrono::{DateTime, FixedOffset};
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<FixedOffset>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => s.serialize_some(&value.to_rfc3339()),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<FixedOffset>>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(raw) => super::parse(&raw).map(Some).map_err(de::Error::custom),
                None => Ok(None),
            }
        }
    }
}
