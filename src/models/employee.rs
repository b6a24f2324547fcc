use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i32,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub department: String,
    pub job_title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub contacts: Vec<Contact>,
    #[sqlx(skip)]
    pub locations: Vec<EmployeeLocation>,
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i32,
    pub employee_id: i32,
    pub contact_type: String,
    pub phone_number: String,
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Location {
    pub id: i32,
    pub city: String,
    pub state: String,
    pub country: String,
}

/// Join row linking an employee to one of its locations, with the location embedded.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeLocation {
    pub employee_id: i32,
    pub location_id: i32,
    #[sqlx(flatten)]
    pub location: Location,
}

/// A submission that passed validation, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub department: String,
    pub job_title: String,
    pub contacts: Vec<NewContact>,
    pub locations: Vec<NewLocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NewContact {
    pub contact_type: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NewLocation {
    pub city: String,
    pub state: String,
    pub country: String,
}

impl Employee {
    /// Contacts as submitted, without storage identifiers.
    pub fn contact_entries(&self) -> Vec<NewContact> {
        self.contacts
            .iter()
            .map(|contact| NewContact {
                contact_type: contact.contact_type.clone(),
                phone_number: contact.phone_number.clone(),
            })
            .collect()
    }

    /// Locations as submitted, without storage identifiers.
    pub fn location_entries(&self) -> Vec<NewLocation> {
        self.locations
            .iter()
            .map(|link| NewLocation {
                city: link.location.city.clone(),
                state: link.location.state.clone(),
                country: link.location.country.clone(),
            })
            .collect()
    }
}
