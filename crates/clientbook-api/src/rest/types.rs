// Wire types for the clientbook REST API.
//
// Field names follow the server's JSON schema verbatim (Spanish, camelCase).
// Domain-facing names live in clientbook-core; nothing here is validated.

use serde::{Deserialize, Deserializer, Serialize};

/// Server identifiers arrive as strings on most deployments but as bare
/// integers on some; both are accepted and normalized to `String`.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    })
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(i64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Str(s)) => Some(s),
        Some(Raw::Num(n)) => Some(n.to_string()),
        None => None,
    })
}

// ── Clients ──────────────────────────────────────────────────────────

/// Full client record as returned by `GET clients/{id}`, `POST clients`
/// and `PUT clients/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub nombre: String,
    pub apellidos: String,
    pub identificacion: String,
    pub telefono_celular: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otro_telefono: Option<String>,
    pub direccion: String,
    /// `YYYY-MM-DD`, possibly with a trailing time component.
    pub f_nacimiento: String,
    /// `YYYY-MM-DD`, possibly with a trailing time component.
    pub f_afiliacion: String,
    /// `"M"` or `"F"`.
    pub sexo: String,
    #[serde(default)]
    pub resena_personal: String,
    /// Base64 image data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imagen: Option<String>,
    /// Selected interest.
    #[serde(
        default,
        rename = "interesFK",
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub interes_fk: Option<String>,
    /// Older servers name the interest `interesesId`; some send both keys.
    #[serde(
        default,
        rename = "interesesId",
        deserialize_with = "opt_string_or_number",
        skip_serializing
    )]
    pub intereses_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub usuario_id: Option<String>,
}

/// Reduced list row returned by `GET clients`.
///
/// Servers may return full records here; extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub identificacion: String,
    pub nombre: String,
    pub apellidos: String,
}

/// Create / update payload. Never carries an identifier: the server
/// assigns it on create and the path addresses it on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRequest {
    pub nombre: String,
    pub apellidos: String,
    pub identificacion: String,
    pub telefono_celular: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otro_telefono: Option<String>,
    pub direccion: String,
    pub f_nacimiento: String,
    pub f_afiliacion: String,
    pub sexo: String,
    pub resena_personal: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imagen: Option<String>,
    #[serde(rename = "interesFK", skip_serializing_if = "Option::is_none")]
    pub interes_fk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usuario_id: Option<String>,
}

/// Query parameters for `GET clients`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientQuery {
    pub nombre: Option<String>,
    pub identificacion: Option<String>,
    pub usuario_id: Option<String>,
}

impl ClientQuery {
    /// Render as `(key, value)` pairs, skipping unset fields.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        [
            ("nombre", &self.nombre),
            ("identificacion", &self.identificacion),
            ("usuarioId", &self.usuario_id),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|v| (key, v)))
        .collect()
    }
}

// ── Interests ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub descripcion: String,
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Session material returned by a successful login.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(
        alias = "userid",
        alias = "usuarioId",
        deserialize_with = "string_or_number"
    )]
    pub user_id: String,
    #[serde(default, alias = "username", alias = "nombre")]
    pub display_name: Option<String>,
}
