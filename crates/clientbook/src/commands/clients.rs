//! Client command handlers.

use chrono::Local;
use tabled::Tabled;

use clientbook_core::{
    Client, ClientDraft, ClientFilters, ClientListItem, EntityId, Gender, RefreshOutcome,
};

use crate::cli::{ClientFieldArgs, ClientListArgs, ClientsArgs, ClientsCommand, GenderArg, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Identification")]
    identification: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&ClientListItem> for ClientRow {
    fn from(c: &ClientListItem) -> Self {
        Self {
            id: c.id.to_string(),
            identification: c.identification.clone(),
            name: c.display_name(),
        }
    }
}

fn detail(c: &Client) -> String {
    let mut lines = vec![
        format!("ID:             {}", c.id),
        format!("Name:           {}", c.display_name()),
        format!("Identification: {}", c.identification),
        format!("Gender:         {}", c.gender),
        format!("Mobile:         {}", c.mobile_phone),
        format!("Other phone:    {}", c.other_phone.as_deref().unwrap_or("-")),
        format!("Address:        {}", c.address),
        format!("Born:           {}", c.birth_date),
        format!("Affiliated:     {}", c.affiliation_date),
        format!(
            "Interest:       {}",
            c.interest_id.as_ref().map_or("-", EntityId::as_str)
        ),
    ];
    if !c.personal_note.is_empty() {
        lines.push(format!("Note:           {}", c.personal_note));
    }
    if c.image.is_some() {
        lines.push("Image:          (attached)".into());
    }
    lines.join("\n")
}

// ── Draft assembly ──────────────────────────────────────────────────

fn gender(arg: GenderArg) -> Gender {
    match arg {
        GenderArg::M => Gender::Male,
        GenderArg::F => Gender::Female,
    }
}

fn required<T>(value: Option<T>, flag: &str) -> Result<T, CliError> {
    value.ok_or_else(|| CliError::Validation {
        field: flag.into(),
        reason: format!("--{flag} is required (or use --from-file)"),
    })
}

/// Empty string on the command line means "clear this optional field".
fn optional(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}

/// Build a new draft entirely from flags.
fn draft_from_flags(f: ClientFieldArgs) -> Result<ClientDraft, CliError> {
    let birth_date = util::parse_date("birth-date", &required(f.birth_date, "birth-date")?)?;
    let affiliation_date = match f.affiliation_date {
        Some(raw) => util::parse_date("affiliation-date", &raw)?,
        None => Local::now().date_naive(),
    };

    Ok(ClientDraft {
        given_name: required(f.given_name, "given-name")?,
        family_name: required(f.family_name, "family-name")?,
        identification: required(f.identification, "identification")?,
        mobile_phone: required(f.mobile_phone, "mobile-phone")?,
        other_phone: f.other_phone.and_then(optional),
        address: required(f.address, "address")?,
        birth_date,
        affiliation_date,
        gender: gender(required(f.gender, "gender")?),
        personal_note: f.note.unwrap_or_default(),
        image: f.image.and_then(optional),
        interest_id: f.interest.and_then(optional).map(EntityId::new),
    })
}

/// Overlay the flags that were given onto an existing draft.
fn patch_draft(mut draft: ClientDraft, f: ClientFieldArgs) -> Result<ClientDraft, CliError> {
    if let Some(v) = f.given_name {
        draft.given_name = v;
    }
    if let Some(v) = f.family_name {
        draft.family_name = v;
    }
    if let Some(v) = f.identification {
        draft.identification = v;
    }
    if let Some(v) = f.mobile_phone {
        draft.mobile_phone = v;
    }
    if let Some(v) = f.other_phone {
        draft.other_phone = optional(v);
    }
    if let Some(v) = f.address {
        draft.address = v;
    }
    if let Some(v) = f.birth_date {
        draft.birth_date = util::parse_date("birth-date", &v)?;
    }
    if let Some(v) = f.affiliation_date {
        draft.affiliation_date = util::parse_date("affiliation-date", &v)?;
    }
    if let Some(v) = f.gender {
        draft.gender = gender(v);
    }
    if let Some(v) = f.note {
        draft.personal_note = v;
    }
    if let Some(v) = f.image {
        draft.image = optional(v);
    }
    if let Some(v) = f.interest {
        draft.interest_id = optional(v).map(EntityId::new);
    }
    Ok(draft)
}

fn print_client(client: &Client, global: &GlobalOpts) {
    let out = output::render_single(&global.output, client, detail, |c| c.id.to_string());
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: ClientsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ClientsCommand::List(list) => list_clients(ctx, list, global).await,

        ClientsCommand::Get { id } => {
            let spin = util::spinner("Loading client...", global);
            let result = ctx.store.get_by_id(&EntityId::new(&*id)).await;
            util::finish(spin);
            let client = result.map_err(|e| CliError::for_client(e, &id))?;
            print_client(&client, global);
            Ok(())
        }

        ClientsCommand::Create { fields, from_file } => {
            let draft = match from_file {
                Some(path) => util::read_json_file::<ClientDraft>(&path)?,
                None => draft_from_flags(fields)?,
            };

            let spin = util::spinner("Creating client...", global);
            let result = ctx.store.create(draft).await;
            util::finish(spin);
            let created = result?;

            output::print_status(&format!("Created client {}", created.id), global);
            print_client(&created, global);
            Ok(())
        }

        ClientsCommand::Update {
            id,
            fields,
            from_file,
        } => {
            let entity_id = EntityId::new(&*id);
            let draft = match from_file {
                Some(path) => util::read_json_file::<ClientDraft>(&path)?,
                None => {
                    let current = ctx
                        .store
                        .get_by_id(&entity_id)
                        .await
                        .map_err(|e| CliError::for_client(e, &id))?;
                    patch_draft(current.to_draft(), fields)?
                }
            };

            let spin = util::spinner("Saving client...", global);
            let result = ctx.store.update(&entity_id, draft).await;
            util::finish(spin);
            let updated = result.map_err(|e| CliError::for_client(e, &id))?;

            output::print_status(&format!("Updated client {}", updated.id), global);
            print_client(&updated, global);
            Ok(())
        }

        ClientsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete client {id}?"), "clients delete", global.yes)? {
                return Ok(());
            }
            ctx.store
                .delete(&EntityId::new(&*id))
                .await
                .map_err(|e| CliError::for_client(e, &id))?;
            output::print_status(&format!("Deleted client {id}"), global);
            Ok(())
        }
    }
}

async fn list_clients(
    ctx: &Context,
    args: ClientListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let filters = ClientFilters {
        name: args.name,
        identification: args.identification,
        owner_id: args.owner,
    };

    let spin = util::spinner("Loading clients...", global);
    let outcome = ctx.store.refresh(Some(&filters)).await;
    util::finish(spin);

    if let RefreshOutcome::Failed(e) = outcome {
        return Err(e.into());
    }

    let state = ctx.store.snapshot();
    let out = output::render_list(
        &global.output,
        state.entities.as_slice(),
        |c| ClientRow::from(c),
        |c| c.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
