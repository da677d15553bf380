use std::{collections::HashMap, path::Path};

use tracing::info;

use crate::{Employee, HrError, HrResult};

/// Read-only source of directory records.
pub trait EmployeeStore: Send + Sync {
    fn lookup(&self, id: &str) -> Option<Employee>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Directory held in memory, populated once at startup.
#[derive(Clone, Debug, Default)]
pub struct InMemoryEmployeeStore {
    employees: HashMap<String, Employee>,
}

impl InMemoryEmployeeStore {
    pub fn from_employees(employees: impl IntoIterator<Item = Employee>) -> HrResult<Self> {
        let mut map = HashMap::new();
        for employee in employees {
            if map.contains_key(&employee.id) {
                return Err(HrError::DuplicateId { id: employee.id });
            }
            map.insert(employee.id.clone(), employee);
        }
        Ok(Self { employees: map })
    }

    /// Parse a JSON array of employee records.
    pub fn from_json(raw: &str) -> HrResult<Self> {
        let employees: Vec<Employee> = serde_json::from_str(raw)?;
        Self::from_employees(employees)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> HrResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| HrError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let store = Self::from_json(&raw)?;
        info!(path = %path.display(), employees = store.len(), "employee directory loaded");
        Ok(store)
    }

    /// Small built-in directory for local runs without a directory file.
    pub fn demo() -> Self {
        let employees = [
            Employee::new("1", "Max Power", "The Leader", Some(640_000)),
            Employee::new("2", "Jane McDoe", "Engineer", Some(120_000)),
            Employee::new("3", "Nick Two", "HR Partner", Some(95_000)),
        ];
        Self {
            employees: employees
                .into_iter()
                .map(|employee| (employee.id.clone(), employee))
                .collect(),
        }
    }
}

impl EmployeeStore for InMemoryEmployeeStore {
    fn lookup(&self, id: &str) -> Option<Employee> {
        self.employees.get(id).cloned()
    }

    fn len(&self) -> usize {
        self.employees.len()
    }
}
