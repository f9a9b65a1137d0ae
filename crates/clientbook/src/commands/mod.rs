//! Command dispatch: bridges CLI args -> store / services -> output formatting.

pub mod auth;
pub mod clients;
pub mod config_cmd;
pub mod interests;
pub mod util;

use clientbook_core::{AuthService, ClientStore, SessionContext};

use crate::cli::{Command, GlobalOpts};
use crate::config::SessionFile;
use crate::error::CliError;

/// Everything a session-bound command needs.
pub struct Context {
    pub profile: String,
    pub api_url: String,
    pub session: SessionContext,
    pub session_file: SessionFile,
    pub auth: AuthService,
    pub store: ClientStore,
}

impl Context {
    /// Gate for commands that talk to protected endpoints.
    pub fn require_login(&self) -> Result<(), CliError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(CliError::NotLoggedIn {
                profile: self.profile.clone(),
            })
        }
    }
}

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(ctx, args, global).await,
        Command::Register(args) => auth::register(ctx, args, global).await,
        Command::Logout => auth::logout(ctx, global),
        Command::Whoami => auth::whoami(ctx, global),
        Command::Clients(args) => {
            ctx.require_login()?;
            clients::handle(ctx, args, global).await
        }
        Command::Interests(args) => {
            ctx.require_login()?;
            interests::handle(ctx, args, global).await
        }
        Command::Config(_) | Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "handled before a session is opened".into(),
        }),
    }
}
