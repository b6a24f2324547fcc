use std::borrow::Cow;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// One segment of the path to an offending field: a field name or a list index.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// A single field-level violation, reported to clients under `errors`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub code: String,
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl ValidationIssue {
    pub fn invalid_date(field: &str) -> Self {
        ValidationIssue {
            code: "invalid_date".to_string(),
            path: vec![PathSegment::Field(field.to_string())],
            message: "Invalid date".to_string(),
        }
    }

    /// Dotted form of the path, e.g. `contacts.0.phoneNumber`.
    pub fn path_string(&self) -> String {
        self.path
            .iter()
            .map(|segment| match segment {
                PathSegment::Field(name) => name.clone(),
                PathSegment::Index(index) => index.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Accepts `YYYY-MM-DD`, an RFC 3339 date-time, or an ISO date-time without
/// offset, keeping only the date.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

pub fn validate_calendar_date(value: &str) -> Result<(), ValidationError> {
    if parse_calendar_date(value).is_none() {
        let mut err = ValidationError::new("invalid_date");
        err.message = Some(Cow::from("Invalid date"));
        return Err(err);
    }
    Ok(())
}

/// Flattens nested validator errors into a list sorted by path.
pub fn collect_issues(errors: &ValidationErrors) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    walk(errors, &mut Vec::new(), &mut issues);
    issues.sort_by(|a, b| a.path.cmp(&b.path));
    issues
}

fn walk(errors: &ValidationErrors, prefix: &mut Vec<PathSegment>, issues: &mut Vec<ValidationIssue>) {
    for (field, kind) in errors.errors() {
        prefix.push(PathSegment::Field(to_camel_case(field)));
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    issues.push(ValidationIssue {
                        code: err.code.to_string(),
                        path: prefix.clone(),
                        message: err
                            .message
                            .as_ref()
                            .map(|msg| msg.to_string())
                            .unwrap_or_else(|| format!("{} is invalid", field)),
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => walk(nested, prefix, issues),
            ValidationErrorsKind::List(entries) => {
                for (index, nested) in entries {
                    prefix.push(PathSegment::Index(*index));
                    walk(nested, prefix, issues);
                    prefix.pop();
                }
            }
        }
        prefix.pop();
    }
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}
