use serde::Deserialize;
use validator::Validate;
use crate::models::employee::{NewContact, NewEmployee, NewLocation};
use crate::utils::validation::{self, validate_calendar_date, ValidationIssue};

/// Employee submission as it arrives on the wire. Missing strings default to
/// empty so they are reported together with every other violation.
#[derive(Deserialize, Validate, Debug, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeePayload {
    #[validate(length(min = 2, message = "Full name must be at least 2 characters"))]
    pub full_name: String,
    #[validate(custom = "validate_calendar_date")]
    pub date_of_birth: String,
    #[validate(length(min = 1, message = "Department is required"))]
    pub department: String,
    #[validate(length(min = 1, message = "Job title is required"))]
    pub job_title: String,
    #[validate]
    pub contacts: Vec<ContactPayload>,
    #[validate]
    pub locations: Vec<LocationPayload>,
}

#[derive(Deserialize, Validate, Debug, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactPayload {
    #[validate(length(min = 1, message = "Contact type is required"))]
    pub contact_type: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone_number: String,
}

#[derive(Deserialize, Validate, Debug, Default, Clone)]
#[serde(default)]
pub struct LocationPayload {
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
}

/// PUT body: the employee fields plus the id of the record to replace.
#[derive(Deserialize, Debug)]
pub struct EmployeeUpdatePayload {
    pub id: Option<i32>,
    #[serde(flatten)]
    pub employee: EmployeePayload,
}

#[derive(Deserialize, Debug)]
pub struct EmployeeIdPayload {
    pub id: Option<i32>,
}

impl EmployeePayload {
    /// Validates the submission and normalizes it into a [`NewEmployee`].
    pub fn into_new_employee(self) -> Result<NewEmployee, Vec<ValidationIssue>> {
        self.validate().map_err(|errors| validation::collect_issues(&errors))?;

        let date_of_birth = validation::parse_calendar_date(&self.date_of_birth).ok_or_else(|| {
            vec![ValidationIssue::invalid_date("dateOfBirth")]
        })?;

        Ok(NewEmployee {
            full_name: self.full_name,
            date_of_birth,
            department: self.department,
            job_title: self.job_title,
            contacts: self
                .contacts
                .into_iter()
                .map(|contact| NewContact {
                    contact_type: contact.contact_type,
                    phone_number: contact.phone_number,
                })
                .collect(),
            locations: self
                .locations
                .into_iter()
                .map(|location| NewLocation {
                    city: location.city,
                    state: location.state,
                    country: location.country,
                })
                .collect(),
        })
    }
}
