// ── Client domain types ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::entity_id::EntityId;
use crate::error::CoreError;

/// Gender as recorded on the client file. The server stores `"M"` / `"F"`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Gender {
    #[serde(alias = "M")]
    #[strum(to_string = "Male", serialize = "M")]
    Male,
    #[serde(alias = "F")]
    #[strum(to_string = "Female", serialize = "F")]
    Female,
}

impl Gender {
    /// Single-letter wire code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }
}

/// The canonical Client type, as held after the server assigned an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: EntityId,
    pub given_name: String,
    pub family_name: String,
    /// Unique per account owner; the server enforces it.
    pub identification: String,
    pub mobile_phone: String,
    /// `None` means "not provided", never an empty string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_phone: Option<String>,
    pub address: String,
    pub birth_date: NaiveDate,
    pub affiliation_date: NaiveDate,
    pub gender: Gender,
    #[serde(default)]
    pub personal_note: String,
    /// Opaque encoded image (base64).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_id: Option<EntityId>,
    /// Owning account, set by the server from the creating session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl Client {
    /// Editable copy of this record, without its identity.
    pub fn to_draft(&self) -> ClientDraft {
        ClientDraft {
            given_name: self.given_name.clone(),
            family_name: self.family_name.clone(),
            identification: self.identification.clone(),
            mobile_phone: self.mobile_phone.clone(),
            other_phone: self.other_phone.clone(),
            address: self.address.clone(),
            birth_date: self.birth_date,
            affiliation_date: self.affiliation_date,
            gender: self.gender,
            personal_note: self.personal_note.clone(),
            image: self.image.clone(),
            interest_id: self.interest_id.clone(),
        }
    }

    pub fn display_name(&self) -> String {
        join_name(&self.given_name, &self.family_name)
    }
}

/// A client as submitted by a view: every field except the identifier.
///
/// Used for both create and update. There is no way to put an id in a
/// draft, so a payload built from one can't carry a client-chosen id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDraft {
    pub given_name: String,
    pub family_name: String,
    pub identification: String,
    pub mobile_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_phone: Option<String>,
    pub address: String,
    pub birth_date: NaiveDate,
    pub affiliation_date: NaiveDate,
    pub gender: Gender,
    #[serde(default)]
    pub personal_note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_id: Option<EntityId>,
}

impl ClientDraft {
    /// Trim text fields and fold blank optionals into `None`.
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.given_name,
            &mut self.family_name,
            &mut self.identification,
            &mut self.mobile_phone,
            &mut self.address,
        ] {
            *field = field.trim().to_owned();
        }
        self.other_phone = non_blank(self.other_phone);
        self.image = non_blank(self.image);
        self.interest_id = self.interest_id.filter(|id| !id.is_blank());
        self
    }

    /// Check required fields before anything is sent.
    ///
    /// Call on a [`normalized`](Self::normalized) draft; whitespace-only
    /// values are treated as missing either way.
    pub fn validate(&self) -> Result<(), CoreError> {
        let required = [
            ("given_name", &self.given_name),
            ("family_name", &self.family_name),
            ("identification", &self.identification),
            ("mobile_phone", &self.mobile_phone),
            ("address", &self.address),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(CoreError::validation(*field, "is required"));
        }

        if self.affiliation_date < self.birth_date {
            return Err(CoreError::validation(
                "affiliation_date",
                format!(
                    "{} is before the birth date {}",
                    self.affiliation_date, self.birth_date
                ),
            ));
        }

        Ok(())
    }
}

/// Reduced projection of a client used for table rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientListItem {
    pub id: EntityId,
    pub identification: String,
    pub given_name: String,
    pub family_name: String,
}

impl ClientListItem {
    pub fn display_name(&self) -> String {
        join_name(&self.given_name, &self.family_name)
    }
}

impl From<&Client> for ClientListItem {
    fn from(c: &Client) -> Self {
        Self {
            id: c.id.clone(),
            identification: c.identification.clone(),
            given_name: c.given_name.clone(),
            family_name: c.family_name.clone(),
        }
    }
}

fn join_name(given: &str, family: &str) -> String {
    format!("{given} {family}").trim().to_owned()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}
