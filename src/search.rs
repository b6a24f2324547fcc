use serde::Deserialize;
use crate::models::employee::{Employee, Location};

/// Conjunctive, case-insensitive substring filter over location fields.
/// Absent or empty fields impose no constraint.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct LocationFilter {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl LocationFilter {
    pub fn new(city: Option<&str>, state: Option<&str>, country: Option<&str>) -> Self {
        LocationFilter {
            city: city.map(str::to_string),
            state: state.map(str::to_string),
            country: country.map(str::to_string),
        }
        .normalized()
    }

    /// Drops empty strings so they behave like omitted parameters.
    pub fn normalized(self) -> Self {
        let keep = |value: Option<String>| value.filter(|v| !v.is_empty());
        LocationFilter {
            city: keep(self.city),
            state: keep(self.state),
            country: keep(self.country),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.city.is_none() && self.state.is_none() && self.country.is_none()
    }

    /// Provided fields paired with the column they constrain.
    pub fn constraints(&self) -> Vec<(&'static str, &str)> {
        [("city", &self.city), ("state", &self.state), ("country", &self.country)]
            .into_iter()
            .filter_map(|(column, value)| value.as_deref().map(|v| (column, v)))
            .collect()
    }

    pub fn matches(&self, location: &Location) -> bool {
        self.constraints().into_iter().all(|(column, needle)| {
            let haystack = match column {
                "city" => &location.city,
                "state" => &location.state,
                _ => &location.country,
            };
            contains_ignore_case(haystack, needle)
        })
    }

    /// Narrows each employee's locations to the matching ones and drops
    /// employees left without any.
    pub fn apply(&self, employees: Vec<Employee>) -> Vec<Employee> {
        employees
            .into_iter()
            .filter_map(|mut employee| {
                employee.locations.retain(|link| self.matches(&link.location));
                (!employee.locations.is_empty()).then_some(employee)
            })
            .collect()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
