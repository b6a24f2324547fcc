pub mod employee;
pub mod search;

use actix_web::{error::{JsonPayloadError, QueryPayloadError}, web, HttpRequest};
use log::warn;
use crate::errors::AppError;

/// Registers the employee routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(
            web::resource("/employees/search")
                .route(web::get().to(search::search_employees)),
        )
        .service(
            web::resource("/employees")
                .route(web::get().to(employee::get_employees))
                .route(web::post().to(employee::create_employee))
                .route(web::put().to(employee::update_employee))
                .route(web::delete().to(employee::delete_employee)),
        );
}

/// Malformed bodies are answered with the same `{error}` shape as other 400s.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, req: &HttpRequest| {
        warn!("Rejected body for {} {}: {}", req.method(), req.path(), err);
        AppError::BadRequest(format!("Invalid request body: {}", err)).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, req: &HttpRequest| {
        warn!("Rejected query for {} {}: {}", req.method(), req.path(), err);
        AppError::BadRequest(format!("Invalid query string: {}", err)).into()
    })
}
