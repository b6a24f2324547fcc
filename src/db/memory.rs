use std::collections::BTreeMap;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use crate::db::{not_found, EmployeeStore, StoreResult};
use crate::models::employee::{Contact, Employee, EmployeeLocation, Location, NewEmployee};
use crate::search::LocationFilter;

/// In-process store mirroring the relational tables. A single write lock
/// guards each nested write, so writes are atomic.
#[derive(Default)]
pub struct MemoryEmployeeStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    next_employee_id: i32,
    next_contact_id: i32,
    next_location_id: i32,
    employees: BTreeMap<i32, Employee>,
    contacts: BTreeMap<i32, Contact>,
    locations: BTreeMap<i32, Location>,
    links: Vec<(i32, i32)>,
}

impl MemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row counts of (contacts, locations, links), for checking cascades.
    pub async fn child_row_counts(&self) -> (usize, usize, usize) {
        let tables = self.tables.read().await;
        (tables.contacts.len(), tables.locations.len(), tables.links.len())
    }
}

impl Tables {
    fn insert_children(&mut self, employee_id: i32, employee: &NewEmployee) {
        for contact in &employee.contacts {
            self.next_contact_id += 1;
            self.contacts.insert(
                self.next_contact_id,
                Contact {
                    id: self.next_contact_id,
                    employee_id,
                    contact_type: contact.contact_type.clone(),
                    phone_number: contact.phone_number.clone(),
                },
            );
        }
        for location in &employee.locations {
            self.next_location_id += 1;
            self.locations.insert(
                self.next_location_id,
                Location {
                    id: self.next_location_id,
                    city: location.city.clone(),
                    state: location.state.clone(),
                    country: location.country.clone(),
                },
            );
            self.links.push((employee_id, self.next_location_id));
        }
    }

    fn delete_children(&mut self, employee_id: i32) {
        self.contacts.retain(|_, contact| contact.employee_id != employee_id);

        let mut removed = Vec::new();
        self.links.retain(|&(owner, location_id)| {
            if owner == employee_id {
                removed.push(location_id);
                false
            } else {
                true
            }
        });
        for location_id in removed {
            self.locations.remove(&location_id);
        }
    }

    fn joined(&self, employee: &Employee) -> Employee {
        let mut joined = employee.clone();
        joined.contacts = self
            .contacts
            .values()
            .filter(|contact| contact.employee_id == employee.id)
            .cloned()
            .collect();

        let mut locations: Vec<EmployeeLocation> = self
            .links
            .iter()
            .filter(|(owner, _)| *owner == employee.id)
            .filter_map(|&(owner, location_id)| {
                self.locations.get(&location_id).map(|location| EmployeeLocation {
                    employee_id: owner,
                    location_id,
                    location: location.clone(),
                })
            })
            .collect();
        locations.sort_by_key(|link| link.location_id);
        joined.locations = locations;
        joined
    }

    fn load(&self, id: i32) -> StoreResult<Employee> {
        self.employees
            .get(&id)
            .map(|employee| self.joined(employee))
            .ok_or_else(|| not_found(id))
    }
}

#[async_trait]
impl EmployeeStore for MemoryEmployeeStore {
    async fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables.employees.values().map(|employee| tables.joined(employee)).collect())
    }

    async fn search_employees(&self, filter: &LocationFilter) -> StoreResult<Vec<Employee>> {
        let employees = self.list_employees().await?;
        Ok(filter.apply(employees))
    }

    async fn create_employee(&self, employee: NewEmployee) -> StoreResult<Employee> {
        let mut tables = self.tables.write().await;
        tables.next_employee_id += 1;
        let id = tables.next_employee_id;
        let now = Utc::now();

        tables.employees.insert(
            id,
            Employee {
                id,
                full_name: employee.full_name.clone(),
                date_of_birth: employee.date_of_birth,
                department: employee.department.clone(),
                job_title: employee.job_title.clone(),
                created_at: now,
                updated_at: now,
                contacts: Vec::new(),
                locations: Vec::new(),
            },
        );
        tables.insert_children(id, &employee);
        tables.load(id)
    }

    async fn update_employee(&self, id: i32, employee: NewEmployee) -> StoreResult<Employee> {
        let mut tables = self.tables.write().await;
        let row = tables.employees.get_mut(&id).ok_or_else(|| not_found(id))?;
        row.full_name = employee.full_name.clone();
        row.date_of_birth = employee.date_of_birth;
        row.department = employee.department.clone();
        row.job_title = employee.job_title.clone();
        row.updated_at = Utc::now();

        tables.delete_children(id);
        tables.insert_children(id, &employee);
        tables.load(id)
    }

    async fn delete_employee(&self, id: i32) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.employees.remove(&id).is_none() {
            return Err(not_found(id));
        }
        tables.delete_children(id);
        Ok(())
    }
}
