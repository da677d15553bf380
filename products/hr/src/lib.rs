//! HR module: the employee directory and its role-filtered views.

mod service;
mod store;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use platform_authz::Role;
pub use service::{DefaultEmployeeService, EmployeeService};
pub use store::{EmployeeStore, InMemoryEmployeeStore};

#[derive(Debug, Error)]
pub enum HrError {
    #[error("employee {id} not found")]
    NotFound { id: String },
    #[error("duplicate employee id {id} in directory")]
    DuplicateId { id: String },
    #[error("failed to read directory {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid directory data")]
    Parse(#[from] serde_json::Error),
}

pub type HrResult<T> = Result<T, HrError>;

/// Full directory record, as held by the store.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub salary: Option<u64>,
}

impl Employee {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        title: impl Into<String>,
        salary: Option<u64>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            title: title.into(),
            salary,
        }
    }
}

/// Role-filtered view of an [`Employee`]. Unset fields were withheld from the
/// caller; an entirely empty value is a valid answer for an unprivileged role.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProjectedEmployee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<u64>,
}

impl ProjectedEmployee {
    /// Copy the fields `role` is allowed to see.
    pub fn project(employee: &Employee, role: Role) -> Self {
        let mut view = Self::default();
        if role.can_view_profile() {
            view.id = Some(employee.id.clone());
            view.name = Some(employee.name.clone());
            view.title = Some(employee.title.clone());
        }
        if role.can_view_salary() {
            view.salary = employee.salary;
        }
        view
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none() && self.title.is_none() && self.salary.is_none()
    }
}
