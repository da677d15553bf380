use std::sync::Arc;

use platform_authz::Role;
use tracing::debug;

use crate::{EmployeeStore, HrError, HrResult, ProjectedEmployee};

/// Directory lookups filtered by the caller's role.
pub trait EmployeeService: Send + Sync {
    fn get(&self, id: &str, role: Role) -> HrResult<ProjectedEmployee>;
}

#[derive(Clone)]
pub struct DefaultEmployeeService {
    store: Arc<dyn EmployeeStore>,
}

impl DefaultEmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }
}

impl EmployeeService for DefaultEmployeeService {
    fn get(&self, id: &str, role: Role) -> HrResult<ProjectedEmployee> {
        let employee = self
            .store
            .lookup(id)
            .ok_or_else(|| HrError::NotFound { id: id.to_string() })?;
        let view = ProjectedEmployee::project(&employee, role);
        debug!(employee_id = id, %role, withheld = view.is_empty(), "employee projected");
        Ok(view)
    }
}
