use actix_web::{web, HttpResponse};
use crate::db::EmployeeStore;
use crate::errors::AppError;
use crate::search::LocationFilter;

pub async fn search_employees(
    store: web::Data<dyn EmployeeStore>,
    query: web::Query<LocationFilter>,
) -> Result<HttpResponse, AppError> {
    let filter = query.into_inner().normalized();
    let employees = store.search_employees(&filter).await?;
    Ok(HttpResponse::Ok().json(employees))
}
