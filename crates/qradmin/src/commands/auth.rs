//! Sign-in, registration, and session handlers.

use dialoguer::Input;
use secrecy::SecretString;
use tracing::debug;

use qradmin_core::{AdminProfile, AuthGate, Route, format_date};

use crate::cli::{CredentialsArgs, GlobalOpts};
use crate::commands::Context;
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Fill in whichever of email/password the flags left out.
fn collect_credentials(args: CredentialsArgs) -> Result<(String, SecretString), CliError> {
    let email = match args.email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(prompt_err)?,
    };
    let password = match args.password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ").map_err(prompt_err)?,
    };
    Ok((email.trim().to_owned(), SecretString::from(password)))
}

pub async fn login(
    args: CredentialsArgs,
    ctx: &Context,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (email, password) = collect_credentials(args)?;
    let credential = ctx.console.login(&email, &password).await?;
    ctx.store.persist(&credential)?;

    output::success(
        global,
        &format!(
            "Signed in as {email} (profile '{}', session valid until {})",
            ctx.profile_name,
            credential.expires_at.format("%Y-%m-%d %H:%M UTC")
        ),
    );
    if ctx.navigator.last() == Some(Route::Dashboard) {
        output::note(global, "Next: qradmin users list");
    }
    Ok(())
}

pub async fn register(
    args: CredentialsArgs,
    ctx: &Context,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (email, password) = collect_credentials(args)?;
    ctx.console.register(&email, &password).await?;
    output::success(global, &format!("Registered {email}. Sign in with: qradmin login"));
    Ok(())
}

pub fn logout(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    // The console may be holding a --token gate; the stored session goes too.
    ctx.console.logout();
    ctx.store.clear_credential();
    debug!(session = %ctx.store.describe(), "session cleared");
    output::success(global, &format!("Signed out of profile '{}'", ctx.profile_name));
    Ok(())
}

fn profile_detail(profile: &AdminProfile, ctx: &Context) -> String {
    let expires = ctx
        .console
        .gate()
        .credential()
        .map_or_else(|| "-".to_owned(), |c| c.expires_at.format("%Y-%m-%d %H:%M UTC").to_string());
    output::detail_block(&[
        ("Email", profile.email.clone()),
        ("Role", profile.role.clone()),
        ("Joined", format_date(profile.created_at.as_deref())),
        ("Profile", ctx.profile_name.clone()),
        ("Session expires", expires),
    ])
}

pub async fn whoami(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let pb = crate::commands::util::spinner(global, "Loading profile");
    let result = ctx.console.profile().await;
    pb.finish_and_clear();

    let profile = result?;
    let out = output::render_single(
        &global.output,
        &profile,
        |p| profile_detail(p, ctx),
        |p| p.email.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
