//! Employee registry: role-keyed creation, shared company name, salary rules.

use std::fmt;
use std::sync::{Arc, RwLock};

use log::info;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::config::get_registry_config;
use crate::registry::{Attributes, Entity, EntityId, EntityKind, Registry, RegistryError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeRole {
    Engineer,
    Manager,
    Designer,
}

impl fmt::Display for EmployeeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EmployeeRole::Engineer => "Engineer",
            EmployeeRole::Manager => "Manager",
            EmployeeRole::Designer => "Designer",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    pub role: EmployeeRole,
    /// Annual salary, if one was supplied.
    pub salary: Option<f64>,
}

impl Employee {
    /// Copy of this record with the salary raised by `percentage` percent.
    ///
    /// An employee without a salary stays without one.
    pub fn with_raise(&self, percentage: f64) -> Result<Employee, RegistryError> {
        if !percentage.is_finite() || percentage < 0.0 {
            return Err(RegistryError::invalid(
                &self.role,
                format!("raise percentage must be non-negative, got {percentage}"),
            ));
        }

        Ok(Employee {
            salary: self.salary.map(|s| s * (1.0 + percentage / 100.0)),
            ..self.clone()
        })
    }
}

impl EntityKind for EmployeeRole {
    type Record = Employee;

    const FAMILY: &'static str = "employee";

    fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        [EmployeeRole::Engineer, EmployeeRole::Manager, EmployeeRole::Designer]
            .into_iter()
            .find(|role| role.to_string().eq_ignore_ascii_case(tag))
    }

    fn tags() -> &'static [&'static str] {
        &["Engineer", "Manager", "Designer"]
    }

    fn build(&self, attrs: &Attributes) -> Result<Employee, RegistryError> {
        Ok(Employee {
            name: attrs.required_str(self, "name")?,
            role: *self,
            salary: attrs.optional_amount(self, "salary")?,
        })
    }
}

/// Global employee registry.
pub static GLOBAL_EMPLOYEE_REGISTRY: Lazy<Registry<EmployeeRole>> = Lazy::new(Registry::new);

static COMPANY_NAME: Lazy<RwLock<String>> =
    Lazy::new(|| RwLock::new(get_registry_config().company_name().to_string()));

/// Accessor for the global employee registry.
#[inline]
pub fn employee_registry() -> &'static Registry<EmployeeRole> {
    &GLOBAL_EMPLOYEE_REGISTRY
}

/// Company name shared by every employee.
pub fn company_name() -> String {
    match COMPANY_NAME.read() {
        Ok(name) => name.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Renames the company for all employees at once. Blank names are rejected.
pub fn set_company_name(name: &str) -> Result<(), RegistryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RegistryError::invalid(&"company", "company name must not be empty"));
    }

    let mut guard = COMPANY_NAME
        .write()
        .map_err(|e| RegistryError::Internal(format!("RwLock poisoned in set_company_name: {}", e)))?;
    *guard = name.to_string();
    info!("Company name set to {}", name);
    Ok(())
}

/// Whether `salary` lies within the configured inclusive bounds.
pub fn is_valid_salary(salary: f64) -> bool {
    let (min, max) = get_registry_config().salary_bounds();
    salary.is_finite() && (min..=max).contains(&salary)
}

fn name_only(name: &str) -> Attributes {
    Attributes::new().with("name", name)
}

impl Registry<EmployeeRole> {
    pub fn create_engineer(&self, name: &str) -> Result<Arc<Entity<EmployeeRole>>, RegistryError> {
        self.create_kind(EmployeeRole::Engineer, &name_only(name))
    }

    pub fn create_manager(&self, name: &str) -> Result<Arc<Entity<EmployeeRole>>, RegistryError> {
        self.create_kind(EmployeeRole::Manager, &name_only(name))
    }

    pub fn create_designer(&self, name: &str) -> Result<Arc<Entity<EmployeeRole>>, RegistryError> {
        self.create_kind(EmployeeRole::Designer, &name_only(name))
    }

    /// All employees holding `role`, in creation order.
    pub fn with_role(&self, role: EmployeeRole) -> Vec<Arc<Entity<EmployeeRole>>> {
        self.iter().filter(|e| e.kind() == role).collect()
    }

    /// Company-wide summary backed by this registry.
    pub fn summary(&self) -> CompanySummary {
        CompanySummary {
            name: company_name(),
            total_employees: self.count(),
            next_employee_id: self.peek_next_id(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompanySummary {
    pub name: String,
    pub total_employees: usize,
    pub next_employee_id: EntityId,
}

impl Entity<EmployeeRole> {
    /// `[#1] Alex - Engineer`
    pub fn describe(&self) -> String {
        format!("[{}] {} - {}", self.id(), self.record().name, self.kind())
    }
}
