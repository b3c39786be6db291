use anyhow::{anyhow, Result};
use serde::Serialize;

/// Registration role selected by number at the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    /// Map a menu choice to a role. Only an exact "2" or "3" selects
    /// Teacher or Admin; everything else is Student.
    pub fn from_choice(choice: &str) -> Self {
        match choice {
            "3" => Self::Admin,
            "2" => Self::Teacher,
            _ => Self::Student,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Teacher => "Teacher",
            Self::Admin => "Admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved role plus the admin key, which is only present for Admin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSelection {
    pub role: Role,
    pub admin_key: Option<String>,
}

/// Resolve a role choice, attaching `admin_key` when the choice selects Admin.
/// Fails if Admin is selected and no key is available.
pub fn resolve(choice: &str, admin_key: Option<&str>) -> Result<RoleSelection> {
    let role = Role::from_choice(choice);
    let admin_key = match role {
        Role::Admin => Some(
            admin_key
                .ok_or_else(|| {
                    anyhow!(
                        "no admin key configured; set MRS_ADMIN_KEY, pass --admin-key, or set admin_key in .mrs/config.toml"
                    )
                })?
                .to_string(),
        ),
        Role::Student | Role::Teacher => None,
    };
    Ok(RoleSelection { role, admin_key })
}

/// Mask a secret for display: first four characters, then `****`
pub fn mask_key(key: &str) -> String {
    if key.chars().count() <= 4 {
        return "****".to_string();
    }
    let prefix: String = key.chars().take(4).collect();
    format!("{}****", prefix)
}
