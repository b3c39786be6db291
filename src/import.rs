//! Bulk student import: one payload and curl command per CSV row.

use crate::{
    output,
    payload::{Payload, RegistrationInput},
    role::{Role, RoleSelection},
};
use anyhow::{anyhow, bail, Context as _, Result};
use std::io::{Read, Write};
use std::path::Path;

pub const REQUIRED_HEADERS: [&str; 3] = ["name", "email", "password"];

/// Counts reported at the end of an import
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub generated: usize,
    pub skipped: usize,
}

/// Column positions of the required headers
struct Columns {
    name: usize,
    email: usize,
    password: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |wanted: &str| headers.iter().position(|h| h == wanted);
        let missing: Vec<&str> = REQUIRED_HEADERS
            .iter()
            .copied()
            .filter(|&h| find(h).is_none())
            .collect();
        if !missing.is_empty() {
            bail!(
                "CSV file must contain the headers: {} (missing: {})",
                REQUIRED_HEADERS.join(", "),
                missing.join(", ")
            );
        }
        Ok(Self {
            name: find("name").unwrap_or_default(),
            email: find("email").unwrap_or_default(),
            password: find("password").unwrap_or_default(),
        })
    }
}

/// Open `path` and import it; the file name goes into the header line
pub fn import_file(
    path: &Path,
    endpoint: &str,
    pretty: bool,
    out: &mut dyn Write,
) -> Result<ImportSummary> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open CSV file {}", path.display()))?;
    writeln!(out, "--- Starting Bulk Import from {} ---", path.display())?;
    import_reader(file, endpoint, pretty, out)
        .with_context(|| format!("failed to import {}", path.display()))
}

/// Every row becomes a Student payload regardless of any role column.
/// Rows missing an email or password are skipped with a notice.
pub fn import_reader<R: Read>(
    reader: R,
    endpoint: &str,
    pretty: bool,
    out: &mut dyn Write,
) -> Result<ImportSummary> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let columns = Columns::from_headers(csv_reader.headers()?)?;
    let student = RoleSelection {
        role: Role::Student,
        admin_key: None,
    };
    let mut summary = ImportSummary::default();

    for (n, res) in csv_reader.records().enumerate() {
        let record = res.map_err(|e| match e.position() {
            Some(p) => anyhow!("Error on line {}: {}", p.line(), e),
            None => anyhow!("Error in CSV record {}: {}", n, e),
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(n as u64 + 2);
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();

        let input = RegistrationInput {
            name: field(columns.name),
            email: field(columns.email),
            password: field(columns.password),
            role_choice: String::new(),
        };

        if input.email.is_empty() || input.password.is_empty() {
            writeln!(
                out,
                "Skipping line {}: missing email or password",
                line
            )?;
            summary.skipped += 1;
            continue;
        }

        let payload = Payload::new(&input, &student);
        let json = if pretty {
            payload.to_json_pretty()?
        } else {
            payload.to_json()?
        };
        output::write_report(out, endpoint, &json)?;
        summary.generated += 1;
    }

    writeln!(
        out,
        "\n--- Import Summary ---\nGenerated: {}\nSkipped:   {}",
        summary.generated, summary.skipped
    )?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const ENDPOINT: &str = "http://localhost:8000/api/register";

    fn import(csv_text: &str) -> Result<(ImportSummary, String)> {
        let mut out = Vec::new();
        let summary = import_reader(csv_text.as_bytes(), ENDPOINT, false, &mut out)?;
        Ok((summary, String::from_utf8(out)?))
    }

    fn payloads(text: &str) -> Vec<Value> {
        text.lines()
            .filter(|l| l.starts_with('{'))
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_imports_each_row_as_student() {
        let (summary, text) = import(
            "name,email,password\nAlice,a@b.com,pw1\nBob Smith , bob@c.org , pw2\n",
        )
        .unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                generated: 2,
                skipped: 0
            }
        );

        let rows = payloads(&text);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "Alice");
        assert_eq!(rows[1]["name"], "Bob Smith");
        assert_eq!(rows[1]["email"], "bob@c.org");
        assert!(rows.iter().all(|r| r["role"] == "Student"));

        let first = r#"{"name": "Alice","email": "a@b.com","password": "pw1","role": "Student"}"#;
        assert!(text.contains(&format!("-d '{}'", first)));
        assert!(text.ends_with("Generated: 2\nSkipped:   0\n"));
    }

    #[test]
    fn test_role_column_is_ignored() {
        let (_, text) = import("email,role,password,name\nroot@x.io,3,pw,Root\n").unwrap();
        let rows = payloads(&text);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["role"], "Student");
        assert_eq!(rows[0]["name"], "Root");
        assert!(!text.contains("adminKey"));
    }

    #[test]
    fn test_skips_rows_missing_email_or_password() {
        let (summary, text) = import(
            "name,email,password\nNoMail,,pw\nNoPass,np@x.io,\nOk,ok@x.io,pw\nShort,short@x.io\n",
        )
        .unwrap();
        assert_eq!(summary.generated, 1);
        assert_eq!(summary.skipped, 3);
        assert!(text.contains("Skipping line 2: missing email or password"));
        assert!(text.contains("Skipping line 3: missing email or password"));
        assert!(text.contains("Skipping line 5: missing email or password"));
        assert_eq!(payloads(&text).len(), 1);
    }

    #[test]
    fn test_missing_headers_rejected() {
        let err = import("name,mail,password\nAlice,a@b.com,pw\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("name, email, password"));
        assert!(message.contains("missing: email"));
    }

    #[test]
    fn test_empty_file_rejected() {
        let err = import("").unwrap_err();
        assert!(err.to_string().contains("missing: name, email, password"));
    }

    #[test]
    fn test_import_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        std::fs::write(&path, "name,email,password\nCarol,c@d.e,pw\n").unwrap();

        let mut out = Vec::new();
        let summary = import_file(&path, "https://mrs.test/api/register", false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(summary.generated, 1);
        assert!(text.starts_with("--- Starting Bulk Import from "));
        assert!(text.contains("curl -X POST https://mrs.test/api/register -H"));
    }

    #[test]
    fn test_import_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        let mut out = Vec::new();
        let err = import_file(&path, ENDPOINT, false, &mut out).unwrap_err();
        assert!(err.to_string().contains("absent.csv"));
        assert!(out.is_empty());
    }
}
