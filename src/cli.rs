use crate::{
    config::Config,
    import, output,
    payload::Payload,
    prompt::{self, LineSource},
    role::{self, Role},
    Args,
};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

pub struct Context {
    pub args: Args,
    pub config: Config,
}

fn verbose(ctx: &Context, message: &str) {
    if ctx.args.verbose || ctx.args.debug {
        eprintln!("[VERBOSE] {}", message);
    }
}

fn debug(ctx: &Context, message: &str) {
    if ctx.args.debug {
        eprintln!("[DEBUG] {}", message);
    }
}

/// One registration: prompt, resolve the role, print payload and command
pub fn run_session(ctx: &Context, source: &mut dyn LineSource, out: &mut dyn Write) -> Result<()> {
    if !ctx.args.quiet {
        output::write_banner(out)?;
        out.flush()?;
    }

    let input = prompt::collect_input(source)?;

    let admin_key = ctx.config.resolve_admin_key();
    debug(ctx, &format!("Endpoint: {}", ctx.config.endpoint()));
    debug(
        ctx,
        &format!("Admin key source: {}", ctx.config.admin_key_source()),
    );

    let selection = role::resolve(&input.role_choice, admin_key.as_deref())?;
    verbose(
        ctx,
        &format!(
            "Role choice {:?} resolved to {}",
            input.role_choice, selection.role
        ),
    );

    if selection.role == Role::Admin {
        if let Some(key) = &selection.admin_key {
            output::write_admin_notice(out, key)?;
        }
    }

    let payload = Payload::new(&input, &selection);
    let json = if ctx.args.pretty {
        payload.to_json_pretty()?
    } else {
        payload.to_json()?
    };

    output::write_report(out, ctx.config.endpoint(), &json)
}

/// Bulk import: every CSV row becomes a Student payload
pub fn run_import(ctx: &Context, path: &Path, out: &mut dyn Write) -> Result<()> {
    debug(ctx, &format!("Endpoint: {}", ctx.config.endpoint()));
    let summary = import::import_file(path, ctx.config.endpoint(), ctx.args.pretty, out)?;
    verbose(
        ctx,
        &format!(
            "Imported {}: {} generated, {} skipped",
            path.display(),
            summary.generated,
            summary.skipped
        ),
    );
    out.flush()?;
    Ok(())
}

/// Print the resolved settings without prompting
pub fn show_config(ctx: &Context, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Endpoint: {}", ctx.config.endpoint())?;
    writeln!(out, "Admin key: {}", ctx.config.admin_key_source())?;
    if ctx.config.sources.is_empty() {
        writeln!(out, "Config files: <built-in defaults>")?;
    } else {
        writeln!(out, "Config files:")?;
        for path in &ctx.config.sources {
            writeln!(out, "  {}", path.display())?;
        }
    }
    Ok(())
}
