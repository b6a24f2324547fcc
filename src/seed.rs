use chrono::NaiveDate;
use log::info;
use crate::db::{EmployeeStore, StoreResult};
use crate::models::employee::{Employee, NewContact, NewEmployee, NewLocation};

/// The sample employee inserted by the `seed` binary.
pub fn demo_employee() -> NewEmployee {
    NewEmployee {
        full_name: "Uzair".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 15).expect("valid seed date"),
        department: "IT".to_string(),
        job_title: "Software Engineer".to_string(),
        contacts: vec![
            NewContact {
                contact_type: "Work".to_string(),
                phone_number: "0333337890".to_string(),
            },
            NewContact {
                contact_type: "Mobile".to_string(),
                phone_number: "0333344444".to_string(),
            },
        ],
        locations: vec![NewLocation {
            city: "New York".to_string(),
            state: "NY".to_string(),
            country: "USA".to_string(),
        }],
    }
}

pub async fn seed_demo_data(store: &dyn EmployeeStore) -> StoreResult<Employee> {
    let employee = store.create_employee(demo_employee()).await?;
    info!("Seeded employee {} ({})", employee.id, employee.full_name);
    Ok(employee)
}
