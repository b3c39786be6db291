//! Text presented to the user once the payload is built.

use crate::role::mask_key;
use anyhow::Result;
use std::io::Write;

pub const BANNER: &str = "--- MRS Registration Payload Generator ---";

/// Shell command that POSTs `json` to `endpoint`. Both are shell-quoted,
/// so plain JSON comes out as `-d '<json>'`.
pub fn curl_command(endpoint: &str, json: &str) -> String {
    format!(
        "curl -X POST {} -H \"Content-Type: application/json\" -d {}",
        shell_words::quote(endpoint),
        shell_words::quote(json)
    )
}

pub fn write_banner(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", BANNER)?;
    Ok(())
}

pub fn write_admin_notice(out: &mut dyn Write, admin_key: &str) -> Result<()> {
    writeln!(out, "Auto-filling Admin Key: {}", mask_key(admin_key))?;
    Ok(())
}

/// Print the payload followed by the ready-to-run curl command
pub fn write_report(out: &mut dyn Write, endpoint: &str, json: &str) -> Result<()> {
    writeln!(out, "\nGenerated JSON Payload:\n{}", json)?;
    writeln!(out, "\nTo execute with CURL:\n{}", curl_command(endpoint, json))?;
    out.flush()?;
    Ok(())
}
