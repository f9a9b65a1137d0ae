// ── API-to-domain type conversions ──
//
// Bridges raw `clientbook_api` wire types into canonical
// `clientbook_core::model` types and back. Wire dates are `YYYY-MM-DD`;
// a trailing time component is tolerated and dropped.

use chrono::NaiveDate;

use clientbook_api::{
    ClientQuery, ClientRequest, ClientResponse, ClientSummary, InterestResponse,
};

use crate::error::CoreError;
use crate::model::{Client, ClientDraft, ClientFilters, ClientListItem, EntityId, Gender, Interest};

const WIRE_DATE: &str = "%Y-%m-%d";

// ── Helpers ────────────────────────────────────────────────────────

/// Parse a wire date, keeping only the leading `YYYY-MM-DD`.
pub fn parse_wire_date(raw: &str) -> Result<NaiveDate, CoreError> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, WIRE_DATE).map_err(|e| CoreError::Deserialization {
        message: format!("invalid date {raw:?}: {e}"),
    })
}

pub fn format_wire_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE).to_string()
}

fn parse_gender(raw: &str) -> Result<Gender, CoreError> {
    match raw.trim() {
        "M" | "m" => Ok(Gender::Male),
        "F" | "f" => Ok(Gender::Female),
        other => Err(CoreError::Deserialization {
            message: format!("unknown gender code {other:?}"),
        }),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

// ── Client ─────────────────────────────────────────────────────────

impl TryFrom<ClientResponse> for Client {
    type Error = CoreError;

    fn try_from(c: ClientResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EntityId::new(c.id),
            birth_date: parse_wire_date(&c.f_nacimiento)?,
            affiliation_date: parse_wire_date(&c.f_afiliacion)?,
            gender: parse_gender(&c.sexo)?,
            given_name: c.nombre,
            family_name: c.apellidos,
            identification: c.identificacion,
            mobile_phone: c.telefono_celular,
            other_phone: non_blank(c.otro_telefono),
            address: c.direccion,
            personal_note: c.resena_personal,
            image: non_blank(c.imagen),
            interest_id: non_blank(c.interes_fk)
                .or_else(|| non_blank(c.intereses_id))
                .map(EntityId::new),
            owner_id: non_blank(c.usuario_id),
        })
    }
}

impl From<ClientSummary> for ClientListItem {
    fn from(s: ClientSummary) -> Self {
        Self {
            id: EntityId::new(s.id),
            identification: s.identificacion,
            given_name: s.nombre,
            family_name: s.apellidos,
        }
    }
}

/// Build the create/update payload for a draft.
///
/// `owner_id` is stamped on create; updates pass `None` and leave
/// ownership to the server.
pub(crate) fn draft_to_request(draft: &ClientDraft, owner_id: Option<&str>) -> ClientRequest {
    ClientRequest {
        nombre: draft.given_name.clone(),
        apellidos: draft.family_name.clone(),
        identificacion: draft.identification.clone(),
        telefono_celular: draft.mobile_phone.clone(),
        otro_telefono: draft.other_phone.clone(),
        direccion: draft.address.clone(),
        f_nacimiento: format_wire_date(draft.birth_date),
        f_afiliacion: format_wire_date(draft.affiliation_date),
        sexo: draft.gender.code().to_owned(),
        resena_personal: draft.personal_note.clone(),
        imagen: draft.image.clone(),
        interes_fk: draft.interest_id.as_ref().map(|id| id.as_str().to_owned()),
        usuario_id: owner_id.map(str::to_owned),
    }
}

impl From<ClientFilters> for ClientQuery {
    fn from(f: ClientFilters) -> Self {
        let f = f.normalized();
        Self {
            nombre: f.name,
            identificacion: f.identification,
            usuario_id: f.owner_id,
        }
    }
}

// ── Interest ───────────────────────────────────────────────────────

impl From<InterestResponse> for Interest {
    fn from(i: InterestResponse) -> Self {
        Self {
            id: EntityId::new(i.id),
            description: i.descripcion,
        }
    }
}
