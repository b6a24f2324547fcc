use actix_web::{web, HttpResponse};
use log::info;
use serde_json::json;
use crate::db::EmployeeStore;
use crate::errors::AppError;
use crate::models::payload::{EmployeeIdPayload, EmployeePayload, EmployeeUpdatePayload};

pub async fn get_employees(
    store: web::Data<dyn EmployeeStore>,
) -> Result<HttpResponse, AppError> {
    let employees = store.list_employees().await?;
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn create_employee(
    store: web::Data<dyn EmployeeStore>,
    payload: web::Json<EmployeePayload>,
) -> Result<HttpResponse, AppError> {
    let new_employee = payload.into_inner().into_new_employee()?;

    let employee = store.create_employee(new_employee).await?;
    info!("Created employee {}", employee.id);

    Ok(HttpResponse::Created().json(employee))
}

pub async fn update_employee(
    store: web::Data<dyn EmployeeStore>,
    payload: web::Json<EmployeeUpdatePayload>,
) -> Result<HttpResponse, AppError> {
    let EmployeeUpdatePayload { id, employee } = payload.into_inner();
    let id = id.ok_or_else(|| AppError::BadRequest("Employee id is required".to_string()))?;
    let new_employee = employee.into_new_employee()?;

    let employee = store.update_employee(id, new_employee).await?;
    info!("Updated employee {}", id);

    Ok(HttpResponse::Ok().json(employee))
}

pub async fn delete_employee(
    store: web::Data<dyn EmployeeStore>,
    payload: web::Json<EmployeeIdPayload>,
) -> Result<HttpResponse, AppError> {
    let id = payload
        .id
        .ok_or_else(|| AppError::BadRequest("Employee id is required".to_string()))?;

    store.delete_employee(id).await?;
    info!("Deleted employee {}", id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deleted successfully",
    })))
}
