//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use qradmin_core::paging::{self, page_count};
use qradmin_core::{
    DiskEffects, FetchOutcome, Page, RemoteTableController, Row, Route, TableView,
};

use crate::cli::{ExportArgs, GlobalOpts, ListArgs, OutputFormat};
use crate::commands::Context;
use crate::error::CliError;
use crate::output;

// ── Spinner ─────────────────────────────────────────────────────────

/// Stderr spinner, hidden when quiet or not attached to a terminal.
pub fn spinner(global: &GlobalOpts, message: impl Into<String>) -> ProgressBar {
    if global.quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

// ── Fetching ────────────────────────────────────────────────────────

/// Apply `filter` and load the controller's rows, refreshing up to `retry`
/// times after a transient failure.
///
/// A redirect to the login route surfaces as [`CliError::NotSignedIn`].
pub async fn load<V: TableView>(
    ctl: &RemoteTableController<V>,
    filter: V::Filter,
    retry: u32,
    global: &GlobalOpts,
) -> Result<Arc<Vec<V::Row>>, CliError> {
    let pb = spinner(global, format!("Loading {}", V::TITLE));

    // Re-selecting the current filter issues nothing, so fetch explicitly.
    let mut outcome = match ctl.on_filter_change(filter).await {
        Some(outcome) => outcome,
        None => ctl.fetch().await,
    };
    let mut attempts = 0;

    let result = loop {
        match outcome {
            FetchOutcome::Loaded(_) => break Ok(ctl.rows().unwrap_or_default()),
            FetchOutcome::Redirected => break Err(CliError::NotSignedIn),
            FetchOutcome::Failed(failure) if attempts < retry && failure.kind.is_transient() => {
                attempts += 1;
                warn!(attempt = attempts, error = %failure.message, "fetch failed, retrying");
                pb.set_message(format!("Retrying {} ({attempts}/{retry})", V::TITLE));
                outcome = ctl.refresh().await;
            }
            FetchOutcome::Failed(failure) => break Err(failure.into()),
            FetchOutcome::Superseded => outcome = ctl.fetch().await,
        }
    };

    pb.finish_and_clear();
    result
}

// ── Presentation ────────────────────────────────────────────────────

/// Resolve `--page`/`--page-size`/`--all` into a page over `total` rows.
pub fn page_for(args: &ListArgs, total: usize) -> Result<Page, CliError> {
    if args.all {
        return Ok(Page {
            number: 1,
            size: total.max(1),
        });
    }
    let size: usize = args.page_size.parse().map_err(|_| CliError::Validation {
        field: "page-size".into(),
        reason: format!("not a number: {}", args.page_size),
    })?;
    Page::new(args.page, size).ok_or_else(|| CliError::Validation {
        field: "page".into(),
        reason: format!("page {} with size {size} is not available", args.page),
    })
}

/// Quick-filter, page, and render `rows`, with a page footer on stderr.
pub fn present<R, T>(
    rows: &[R],
    args: &ListArgs,
    global: &GlobalOpts,
    to_row: impl Fn(&&R) -> T,
    id_fn: impl Fn(&&R) -> String,
) -> Result<(), CliError>
where
    R: Row,
    T: tabled::Tabled,
{
    let matched = match args.search {
        Some(ref needle) => paging::search(rows, needle),
        None => rows.iter().collect(),
    };
    let page = page_for(args, matched.len())?;
    let visible = paging::slice(&matched, page);

    let out = output::render_list(&global.output, visible, to_row, id_fn)?;
    output::print_output(&out, global.quiet);

    if matches!(global.output, OutputFormat::Table) {
        let pages = page_count(matched.len(), page.size);
        output::note(
            global,
            &format!(
                "Page {} of {pages} · {} of {} rows",
                page.number.min(pages),
                visible.len(),
                matched.len()
            ),
        );
    }
    Ok(())
}

// ── Export ──────────────────────────────────────────────────────────

/// Write the loaded rows as CSV to the download directory or stdout.
pub fn export<V: TableView>(
    ctl: &RemoteTableController<V>,
    args: &ExportArgs,
    ctx: &Context,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if args.stdout {
        match ctl.export_document() {
            Some(doc) => output::print_output(&doc.body, false),
            None => output::note(global, "Nothing to export"),
        }
        return Ok(());
    }

    let effects = DiskEffects::new(&ctx.download_dir);
    match ctl.export_csv(&effects)? {
        Some(path) => output::success(global, &format!("Exported {}", path.display())),
        None => output::note(global, "Nothing to export"),
    }
    Ok(())
}

// ── Navigation ──────────────────────────────────────────────────────

/// The user id of the last detail-view request, if any.
pub fn requested_user(ctx: &Context) -> Option<String> {
    match ctx.navigator.last() {
        Some(Route::UserDetail(id)) => Some(id),
        _ => None,
    }
}

/// Display value for an optional asset URL.
pub fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Command, UsersCommand};

    fn list_args(argv: &[&str]) -> ListArgs {
        let mut full = vec!["qradmin", "users", "list"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Command::Users(u) => match u.command {
                UsersCommand::List(args) => args,
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn default_page_is_first_ten() {
        let page = page_for(&list_args(&[]), 42).unwrap();
        assert_eq!(page, Page::default());
    }

    #[test]
    fn all_flag_fits_every_row() {
        let page = page_for(&list_args(&["--all"]), 42).unwrap();
        assert_eq!(page.size, 42);

        let empty = page_for(&list_args(&["--all"]), 0).unwrap();
        assert_eq!(empty.size, 1);
    }

    #[test]
    fn page_zero_clamps_to_first() {
        let page = page_for(&list_args(&["--page", "0", "--page-size", "25"]), 5).unwrap();
        assert_eq!(page.number, 1);
        assert_eq!(page.size, 25);
    }

    #[test]
    fn dash_for_missing_assets() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("")), "-");
        assert_eq!(or_dash(Some("http://x/a.png")), "http://x/a.png");
    }
}
