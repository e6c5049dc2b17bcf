use std::env;

use crate::errors::Error;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Settings read from the process environment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub page_size: u32,
    pub openmrs_base_url: String,
    pub care_setting_uuid: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            openmrs_base_url: "http://localhost:8080/openmrs".to_string(),
            care_setting_uuid: String::new(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut settings = Settings::default();

        if let Some(raw) = lookup("ACTIVE_ORDERS_PAGE_SIZE") {
            settings.page_size = parse_page_size(&raw)?;
        }
        if let Some(v) = lookup("OPENMRS_BASE_URL") {
            settings.openmrs_base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("CARE_SETTING_UUID") {
            settings.care_setting_uuid = v;
        }

        Ok(settings)
    }
}

fn parse_page_size(raw: &str) -> Result<u32, Error> {
    match raw.trim().parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(Error::Validation {
            message: format!("ACTIVE_ORDERS_PAGE_SIZE must be a positive integer, got {raw:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.page_size, 10);
    }

    #[test]
    fn reads_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("ACTIVE_ORDERS_PAGE_SIZE", "25"),
            ("OPENMRS_BASE_URL", "https://emr.example.org/openmrs/"),
            ("CARE_SETTING_UUID", "6f0c9a92"),
        ]))
        .unwrap();

        assert_eq!(settings.page_size, 25);
        assert_eq!(settings.openmrs_base_url, "https://emr.example.org/openmrs");
        assert_eq!(settings.care_setting_uuid, "6f0c9a92");
    }

    #[test]
    fn rejects_zero_page_size() {
        let err = Settings::from_lookup(lookup(&[("ACTIVE_ORDERS_PAGE_SIZE", "0")])).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn rejects_non_numeric_page_size() {
        let err = Settings::from_lookup(lookup(&[("ACTIVE_ORDERS_PAGE_SIZE", "ten")])).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }
}
