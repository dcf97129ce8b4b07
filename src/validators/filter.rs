use crate::config::ConfigError;
use crate::rpc_core::ValidatorRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterField {
    #[default]
    None,
    Website,
    Identity,
}

impl FilterField {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_lowercase().as_str() {
            "" | "none" => Ok(FilterField::None),
            "website" => Ok(FilterField::Website),
            "identity" => Ok(FilterField::Identity),
            other => Err(ConfigError::InvalidValue(format!(
                "unknown filter field '{}' (supported: website, identity)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Contains,
    Equals,
}

impl FilterMode {
    pub fn parse(raw: &str) -> Result<Option<Self>, ConfigError> {
        match raw.trim().to_lowercase().as_str() {
            "" => Ok(None),
            "contains" => Ok(Some(FilterMode::Contains)),
            "equals" => Ok(Some(FilterMode::Equals)),
            other => Err(ConfigError::InvalidValue(format!(
                "unknown filter mode '{}' (supported: contains, equals)",
                other
            ))),
        }
    }
}

/// Field filter over validator metadata
///
/// Only applied when field, value and mode are all set; otherwise every
/// record passes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub field: FilterField,
    pub value: String,
    pub mode: Option<FilterMode>,
}

impl FilterCriteria {
    pub fn is_active(&self) -> bool {
        self.field != FilterField::None && !self.value.is_empty() && self.mode.is_some()
    }

    /// Case-insensitive match; a record with an empty target field always passes
    pub fn matches(&self, record: &ValidatorRecord) -> bool {
        let mode = match self.mode {
            Some(mode) if self.is_active() => mode,
            _ => return true,
        };

        let target = match self.field {
            FilterField::Website => &record.website,
            FilterField::Identity => &record.identity,
            FilterField::None => return true,
        };

        if target.is_empty() {
            return true;
        }

        let target = target.to_lowercase();
        let value = self.value.to_lowercase();

        match mode {
            FilterMode::Contains => target.contains(&value),
            FilterMode::Equals => target == value,
        }
    }
}
