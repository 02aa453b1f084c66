//! Single-user command handlers. Results are printed as pretty JSON on stdout.

use cpstats_clients::Verification;
use cpstats_core::Platform;
use serde::Serialize;
use uuid::Uuid;

use crate::AppContext;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) async fn run_fetch(
    ctx: &AppContext,
    platform: Platform,
    username: &str,
) -> anyhow::Result<()> {
    let profile = ctx.clients.fetch_profile(platform, username).await?;
    print_json(&profile)
}

pub(crate) async fn run_verify(ctx: &AppContext, platform: Platform, username: &str) {
    let verdict = ctx.service().check_username(platform, username).await;
    let label = match verdict {
        Verification::Exists => "exists",
        Verification::NotFound => "not found",
        Verification::Unavailable => "unavailable (try again later)",
    };
    println!("{platform} user {username}: {label}");
}

/// # Errors
///
/// Fails if the user is unknown and `create` is not set, or if the fetch or
/// save fails. Nothing is stored on failure.
pub(crate) async fn run_add(
    ctx: &AppContext,
    user_id: Uuid,
    platform: Platform,
    username: &str,
    create: bool,
) -> anyhow::Result<()> {
    if create {
        ctx.directory.ensure_user(user_id).await?;
    }
    let profile = ctx.service().add_profile(user_id, platform, username).await?;
    print_json(&profile)
}

pub(crate) async fn run_refresh(
    ctx: &AppContext,
    user_id: Uuid,
    platform: Platform,
) -> anyhow::Result<()> {
    let profile = ctx.service().refresh_profile(user_id, platform).await?;
    print_json(&profile)
}

pub(crate) async fn run_remove(
    ctx: &AppContext,
    user_id: Uuid,
    platform: Platform,
) -> anyhow::Result<()> {
    ctx.service().remove_profile(user_id, platform).await?;
    println!("removed {platform} profile for user {user_id}");
    Ok(())
}

pub(crate) async fn run_show(ctx: &AppContext, user_id: Uuid) -> anyhow::Result<()> {
    let profiles = ctx.service().get_profiles(user_id).await?;
    print_json(&profiles)
}
