//! Per-user QR code listing handlers.

use std::sync::Arc;

use tabled::Tabled;

use qradmin_core::{
    FileCodeRecord, FileFilter, FilterValue, TextCodeRecord, TextFilter, classify, format_date,
};

use crate::cli::{
    CodesArgs, CodesCommand, FileCodesCommand, GlobalOpts, OutputFormat, TextCodesCommand,
};
use crate::commands::{Context, util};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct TextCodeRow {
    #[tabled(rename = "Purpose")]
    purpose: String,
    #[tabled(rename = "Content Type")]
    content_type: String,
    #[tabled(rename = "Text/Link")]
    text: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "QR Code")]
    qr: String,
    #[tabled(rename = "Created At")]
    created: String,
}

impl From<&TextCodeRecord> for TextCodeRow {
    fn from(c: &TextCodeRecord) -> Self {
        Self {
            purpose: c.purpose.clone(),
            content_type: c.content_type.clone(),
            text: c.text.clone(),
            action: classify(&c.text, &c.content_type)
                .action_label()
                .unwrap_or_else(|| "-".into()),
            qr: util::or_dash(c.file.as_ref().map(|f| f.url.as_str())),
            created: format_date(c.created_at.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct FileCodeRow {
    #[tabled(rename = "Purpose")]
    purpose: String,
    #[tabled(rename = "Content Type")]
    content_type: String,
    #[tabled(rename = "Uploaded File")]
    uploaded: String,
    #[tabled(rename = "QR Code")]
    qr: String,
    #[tabled(rename = "Created At")]
    created: String,
}

impl From<&FileCodeRecord> for FileCodeRow {
    fn from(c: &FileCodeRecord) -> Self {
        Self {
            purpose: c.purpose.clone(),
            content_type: c.content_type.clone(),
            uploaded: util::or_dash(c.uploaded_file.as_ref().map(|f| f.url.as_str())),
            qr: util::or_dash(c.file.as_ref().map(|f| f.url.as_str())),
            created: format_date(c.created_at.as_deref()),
        }
    }
}

pub fn text_table(rows: &[TextCodeRecord]) -> Result<String, CliError> {
    output::render_list(&OutputFormat::Table, rows, |c| TextCodeRow::from(c), |c| c.id.clone())
}

pub fn file_table(rows: &[FileCodeRecord]) -> Result<String, CliError> {
    output::render_list(&OutputFormat::Table, rows, |c| FileCodeRow::from(c), |c| c.id.clone())
}

// ── Loading ─────────────────────────────────────────────────────────

/// Parse a filter name against its vocabulary.
fn parse_filter<F: FilterValue>(raw: &str) -> Result<F, CliError> {
    F::from_str(raw).map_err(|_| CliError::Validation {
        field: "filter".into(),
        reason: format!("expected one of: {}", F::vocabulary().join(", ")),
    })
}

pub async fn load_text(
    ctx: &Context,
    owner: &str,
    filter: &str,
    retry: u32,
    global: &GlobalOpts,
) -> Result<Arc<Vec<TextCodeRecord>>, CliError> {
    let filter: TextFilter = parse_filter(filter)?;
    let ctl = ctx.console.text_codes(owner);
    util::load(&ctl, filter, retry, global).await
}

pub async fn load_files(
    ctx: &Context,
    owner: &str,
    filter: &str,
    retry: u32,
    global: &GlobalOpts,
) -> Result<Arc<Vec<FileCodeRecord>>, CliError> {
    let filter: FileFilter = parse_filter(filter)?;
    let ctl = ctx.console.file_codes(owner);
    util::load(&ctl, filter, retry, global).await
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: CodesArgs, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        CodesCommand::Text(text) => match text.command {
            TextCodesCommand::List {
                owner,
                filter,
                list,
            } => {
                let rows = load_text(ctx, &owner, &filter, list.fetch.retry, global).await?;
                util::present(
                    rows.as_slice(),
                    &list,
                    global,
                    |c| TextCodeRow::from(*c),
                    |c| c.text.clone(),
                )
            }
            TextCodesCommand::Export {
                owner,
                filter,
                export,
            } => {
                let filter: TextFilter = parse_filter(&filter)?;
                let ctl = ctx.console.text_codes(owner);
                util::load(&ctl, filter, export.fetch.retry, global).await?;
                util::export(&ctl, &export, ctx, global)
            }
        },

        CodesCommand::Files(files) => match files.command {
            FileCodesCommand::List {
                owner,
                filter,
                list,
            } => {
                let rows = load_files(ctx, &owner, &filter, list.fetch.retry, global).await?;
                util::present(
                    rows.as_slice(),
                    &list,
                    global,
                    |c| FileCodeRow::from(*c),
                    |c| {
                        c.uploaded_file
                            .as_ref()
                            .map_or_else(|| c.id.clone(), |f| f.url.clone())
                    },
                )
            }
            FileCodesCommand::Export {
                owner,
                filter,
                export,
            } => {
                let filter: FileFilter = parse_filter(&filter)?;
                let ctl = ctx.console.file_codes(owner);
                util::load(&ctl, filter, export.fetch.retry, global).await?;
                util::export(&ctl, &export, ctx, global)
            }
        },
    }
}
