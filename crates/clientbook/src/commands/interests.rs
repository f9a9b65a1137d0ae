//! Interest command handlers.

use clientbook_core::Interest;
use tabled::Tabled;

use crate::cli::{GlobalOpts, InterestsArgs, InterestsCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

#[derive(Tabled)]
struct InterestRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Interest> for InterestRow {
    fn from(i: &Interest) -> Self {
        Self {
            id: i.id.to_string(),
            description: i.description.clone(),
        }
    }
}

pub async fn handle(
    ctx: &Context,
    args: InterestsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        InterestsCommand::List => {
            let spin = util::spinner("Loading interests...", global);
            let result = ctx.store.fetch_reference_data().await;
            util::finish(spin);
            let interests = result?;

            let out = output::render_list(
                &global.output,
                interests.as_slice(),
                |i| InterestRow::from(i),
                |i| i.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
