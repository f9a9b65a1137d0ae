// ── List query filters ──
//
// A typed replacement for ad-hoc filter objects. Every field is optional;
// absence means "no constraint". Blank strings count as absent.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Longest fragment accepted for any filter field.
pub const MAX_FILTER_LEN: usize = 128;

/// Narrowing applied to a client list query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientFilters {
    /// Fragment of the given or family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Fragment of the identification code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identification: Option<String>,
    /// Owning account. Defaults to the session's user when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl ClientFilters {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_identification(mut self, identification: impl Into<String>) -> Self {
        self.identification = Some(identification.into());
        self
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    /// Trim every field and drop the blank ones.
    pub fn normalized(self) -> Self {
        Self {
            name: non_blank(self.name),
            identification: non_blank(self.identification),
            owner_id: non_blank(self.owner_id),
        }
    }

    /// `true` when no field constrains the query.
    pub fn is_empty(&self) -> bool {
        let normalized = self.clone().normalized();
        normalized.name.is_none()
            && normalized.identification.is_none()
            && normalized.owner_id.is_none()
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let fields = [
            ("name", &self.name),
            ("identification", &self.identification),
            ("owner_id", &self.owner_id),
        ];
        for (field, value) in fields {
            if let Some(v) = value {
                if v.chars().count() > MAX_FILTER_LEN {
                    return Err(CoreError::validation(
                        field,
                        format!("filter longer than {MAX_FILTER_LEN} characters"),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}
