use platform_api::{ApiError, ApiResult};
use platform_authz::Role;
use products_hr::{EmployeeService, HrError, ProjectedEmployee};

/// Look up a role-filtered employee view for either API surface.
pub fn fetch_employee(
    service: &dyn EmployeeService,
    id: &str,
    role: Role,
) -> ApiResult<ProjectedEmployee> {
    if id.is_empty() {
        return Err(ApiError::InvalidInput("employee id must not be empty".into()));
    }
    service.get(id, role).map_err(|err| match err {
        HrError::NotFound { id } => ApiError::NotFound(format!("employee {id}")),
        other => anyhow::Error::from(other).into(),
    })
}
