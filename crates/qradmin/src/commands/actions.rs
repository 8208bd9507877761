//! Row action handlers: download documents, open links.

use std::sync::Arc;

use qradmin_core::{ActionOutcome, DiskEffects};

use crate::cli::{GlobalOpts, OpenArgs};
use crate::commands::{Context, util};
use crate::error::CliError;
use crate::output;

fn effects(ctx: &Context, opener: Option<String>) -> Arc<DiskEffects> {
    let disk = DiskEffects::new(&ctx.download_dir);
    Arc::new(match opener {
        Some(program) => disk.with_opener(program),
        None => disk,
    })
}

pub async fn download(url: &str, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let dispatcher = ctx.console.dispatcher(effects(ctx, None));
    let pb = util::spinner(global, format!("Downloading {url}"));
    let result = dispatcher.download(url).await;
    pb.finish_and_clear();

    let path = result?;
    output::success(global, &format!("Saved {}", path.display()));
    Ok(())
}

pub async fn open(args: OpenArgs, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let dispatcher = ctx.console.dispatcher(effects(ctx, args.opener));
    let pb = util::spinner(global, "Working");
    let result = dispatcher.activate(&args.value, &args.content_type).await;
    pb.finish_and_clear();

    match result? {
        ActionOutcome::Downloaded(path) => {
            output::success(global, &format!("Saved {}", path.display()));
        }
        ActionOutcome::Opened(url) => output::success(global, &format!("Opened {url}")),
        ActionOutcome::Inert => output::note(global, "Plain text, nothing to open"),
    }
    Ok(())
}
