//! Authorization primitives for suite modules.
//!
//! Callers arrive with a set of granted authorities resolved by the upstream
//! authentication layer. This crate collapses those into a single [`Role`] and
//! answers which fields that role may see.

use std::fmt;

/// Authority granted to HR staff.
pub const AUTHORITY_HR: &str = "ROLE_HR";
/// Authority granted to every regular employee.
pub const AUTHORITY_EMPLOYEE: &str = "ROLE_EMPLOYEE";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Role {
    Hr,
    Employee,
    #[default]
    None,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Hr => "HR",
            Role::Employee => "EMPLOYEE",
            Role::None => "NONE",
        }
    }

    /// Map a role name onto the closed set. Anything unrecognised is `None`.
    pub fn parse(value: &str) -> Self {
        match value {
            "HR" => Role::Hr,
            "EMPLOYEE" => Role::Employee,
            _ => Role::None,
        }
    }

    /// Collapse granted authorities into a role. `ROLE_HR` is checked first,
    /// so a caller holding both resolves to [`Role::Hr`].
    pub fn from_authorities<I, S>(authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut employee = false;
        for authority in authorities {
            match authority.as_ref() {
                AUTHORITY_HR => return Role::Hr,
                AUTHORITY_EMPLOYEE => employee = true,
                _ => {}
            }
        }
        if employee { Role::Employee } else { Role::None }
    }

    /// Identity fields (id, name, title).
    pub fn can_view_profile(self) -> bool {
        matches!(self, Role::Hr | Role::Employee)
    }

    pub fn can_view_salary(self) -> bool {
        matches!(self, Role::Hr)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
