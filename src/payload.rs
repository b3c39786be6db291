//! Registration payload and its JSON rendering.

use crate::role::{Role, RoleSelection};
use anyhow::Result;
use serde::Serialize;
use std::io;

/// Raw answers collected at the prompts, unvalidated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role_choice: String,
}

/// Body of a registration request. Field order is the wire key order.
#[derive(Debug, Serialize)]
pub struct Payload<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role: Role,
    #[serde(rename = "adminKey", skip_serializing_if = "Option::is_none")]
    pub admin_key: Option<&'a str>,
}

impl<'a> Payload<'a> {
    pub fn new(input: &'a RegistrationInput, selection: &'a RoleSelection) -> Self {
        Self {
            name: &input.name,
            email: &input.email,
            password: &input.password,
            role: selection.role,
            admin_key: selection.admin_key.as_deref(),
        }
    }

    /// Single-line JSON: `{"key": "value","key": "value"}`
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, ColonSpaceFormatter);
        self.serialize(&mut ser)?;
        Ok(String::from_utf8(buf)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Compact formatter that writes `": "` between keys and values
struct ColonSpaceFormatter;

impl serde_json::ser::Formatter for ColonSpaceFormatter {
    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}
