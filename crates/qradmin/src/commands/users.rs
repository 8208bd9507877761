//! User listing handlers.

use std::sync::Arc;

use tabled::Tabled;

use qradmin_core::{ContentClass, DiskEffects, Unfiltered, UserRecord, classify, format_date};

use crate::cli::{FetchArgs, GlobalOpts, OutputFormat, UsersArgs, UsersCommand};
use crate::commands::{Context, codes, util};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Joined Date")]
    joined: String,
}

impl From<&UserRecord> for UserRow {
    fn from(u: &UserRecord) -> Self {
        Self {
            id: u.id.clone(),
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role.clone(),
            joined: format_date(u.created_at.as_deref()),
        }
    }
}

pub async fn handle(args: UsersArgs, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List(list) => {
            let ctl = ctx.console.users();
            let rows = util::load(&ctl, Unfiltered::All, list.fetch.retry, global).await?;
            util::present(
                rows.as_slice(),
                &list,
                global,
                |u| UserRow::from(*u),
                |u| u.id.clone(),
            )
        }

        UsersCommand::Export(export) => {
            let ctl = ctx.console.users();
            util::load(&ctl, Unfiltered::All, export.fetch.retry, global).await?;
            util::export(&ctl, &export, ctx, global)
        }

        UsersCommand::Show { id, fetch } => show(&id, &fetch, ctx, global).await,
    }
}

/// Follow the detail route for `id` and list both code families.
async fn show(id: &str, fetch: &FetchArgs, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let effects = Arc::new(DiskEffects::new(&ctx.download_dir));
    ctx.console.dispatcher(effects).view_details(id);
    let Some(owner) = util::requested_user(ctx) else {
        return Ok(());
    };

    let text = codes::load_text(ctx, &owner, "all", fetch.retry, global).await?;
    let files = codes::load_files(ctx, &owner, "all", fetch.retry, global).await?;

    match global.output {
        OutputFormat::Table => {
            output::note(global, &format!("Text and link codes for {owner}"));
            output::print_output(&codes::text_table(&text)?, global.quiet);
            output::note(global, &format!("File codes for {owner}"));
            output::print_output(&codes::file_table(&files)?, global.quiet);
        }
        _ => {
            let combined = serde_json::json!({
                "user": owner,
                "text": text.as_slice(),
                "files": files.as_slice(),
            });
            let out = output::render_single(&global.output, &combined, |_| String::new(), |_| {
                text.iter()
                    .map(|c| c.id.clone())
                    .chain(files.iter().map(|c| c.id.clone()))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
            output::print_output(&out, global.quiet);
        }
    }

    let actionable = text
        .iter()
        .filter(|c| !matches!(classify(&c.text, &c.content_type), ContentClass::Text))
        .count();
    if actionable > 0 {
        output::note(
            global,
            &format!("{actionable} code(s) can be opened with: qradmin open <value> --content-type <type>"),
        );
    }
    Ok(())
}
