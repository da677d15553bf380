use async_graphql::SimpleObject;
use products_hr::ProjectedEmployee;

/// Fields withheld from the caller resolve to `null`.
#[derive(Clone, Debug, SimpleObject)]
pub struct EmployeePayload {
    pub id: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub salary: Option<u64>,
}

impl From<ProjectedEmployee> for EmployeePayload {
    fn from(view: ProjectedEmployee) -> Self {
        let ProjectedEmployee {
            id,
            name,
            title,
            salary,
        } = view;
        Self {
            id,
            name,
            title,
            salary,
        }
    }
}
