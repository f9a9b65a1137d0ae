//! Login, registration, logout, and session inspection.

use dialoguer::Input;
use secrecy::SecretString;
use serde::Serialize;

use crate::cli::{GlobalOpts, LoginArgs, RegisterArgs};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_text(label: &str, given: Option<String>) -> Result<String, CliError> {
    match given {
        Some(v) => Ok(v),
        None => Input::new()
            .with_prompt(label)
            .interact_text()
            .map_err(prompt_err),
    }
}

fn read_password(prompt: &str, from_env: Option<&str>) -> Result<SecretString, CliError> {
    if let Some(var) = from_env {
        return std::env::var(var)
            .map(SecretString::from)
            .map_err(|_| CliError::Validation {
                field: "password-env".into(),
                reason: format!("environment variable {var} is not set"),
            });
    }
    let pass = rpassword::prompt_password(prompt).map_err(prompt_err)?;
    Ok(SecretString::from(pass))
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn login(ctx: &Context, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let username = prompt_text("Username", args.username)?;
    let password = read_password("Password: ", args.password_env.as_deref())?;

    let spin = util::spinner("Logging in...", global);
    let result = ctx.auth.login(&username, &password).await;
    util::finish(spin);
    let snapshot = result?;

    ctx.session_file.save(&snapshot)?;
    let who = snapshot.display_name.unwrap_or(username);
    output::print_status(&format!("Logged in as {who} (profile '{}')", ctx.profile), global);
    Ok(())
}

pub async fn register(
    ctx: &Context,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let username = prompt_text("Username", args.username)?;
    let email = prompt_text("Email", args.email)?;
    let password = read_password("Password: ", None)?;
    let confirm = read_password("Confirm password: ", None)?;

    let spin = util::spinner("Creating account...", global);
    let result = ctx.auth.register(&username, &email, &password, &confirm).await;
    util::finish(spin);
    result?;

    output::print_status(
        &format!("Account '{username}' created. Run: clientbook login -u {username}"),
        global,
    );
    Ok(())
}

pub fn logout(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.auth.logout();
    ctx.session_file.clear()?;
    output::print_status(&format!("Logged out (profile '{}')", ctx.profile), global);
    Ok(())
}

#[derive(Serialize)]
struct Whoami {
    profile: String,
    api_url: String,
    user_id: Option<String>,
    display_name: Option<String>,
}

fn detail(w: &Whoami) -> String {
    [
        format!("User:      {}", w.display_name.as_deref().unwrap_or("-")),
        format!("User ID:   {}", w.user_id.as_deref().unwrap_or("-")),
        format!("Profile:   {}", w.profile),
        format!("API:       {}", w.api_url),
    ]
    .join("\n")
}

pub fn whoami(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.require_login()?;
    let view = Whoami {
        profile: ctx.profile.clone(),
        api_url: ctx.api_url.clone(),
        user_id: ctx.session.user_id(),
        display_name: ctx.session.display_name(),
    };
    let out = output::render_single(&global.output, &view, detail, |w| {
        w.user_id.clone().unwrap_or_default()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
