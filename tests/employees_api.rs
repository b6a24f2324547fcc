use std::sync::Arc;
use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use employee_directory::db::{EmployeeStore, MemoryEmployeeStore};
use employee_directory::handlers;

macro_rules! app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::from($store.clone() as Arc<dyn EmployeeStore>))
                .configure(handlers::configure),
        )
        .await
    };
}

fn uzair() -> Value {
    json!({
        "fullName": "Uzair",
        "dateOfBirth": "1990-05-15",
        "department": "IT",
        "jobTitle": "Software Engineer",
        "contacts": [
            {"contactType": "Work", "phoneNumber": "0333337890"},
            {"contactType": "Mobile", "phoneNumber": "0333344444"}
        ],
        "locations": [{"city": "New York", "state": "NY", "country": "USA"}]
    })
}

#[actix_web::test]
async fn create_then_search_by_city() {
    let store = Arc::new(MemoryEmployeeStore::new());
    let app = app!(store);

    let req = test::TestRequest::post().uri("/employees").set_json(uzair()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["fullName"], "Uzair");
    assert_eq!(created["dateOfBirth"], "1990-05-15");
    assert_eq!(created["contacts"].as_array().unwrap().len(), 2);
    assert_eq!(created["locations"][0]["location"]["city"], "New York");

    for city in ["new", "NEW", "New"] {
        let req = test::TestRequest::get()
            .uri(&format!("/employees/search?city={}", city))
            .to_request();
        let found: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(found.as_array().unwrap().len(), 1, "city={}", city);
        assert_eq!(found[0]["id"], created["id"]);
    }

    let req = test::TestRequest::get().uri("/employees/search?city=tokyo").to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found, json!([]));
}

#[actix_web::test]
async fn search_without_params_returns_located_employees() {
    let store = Arc::new(MemoryEmployeeStore::new());
    let app = app!(store);

    let mut remote = uzair();
    remote["fullName"] = json!("Remote Worker");
    remote["locations"] = json!([]);
    for body in [uzair(), remote] {
        let req = test::TestRequest::post().uri("/employees").set_json(body).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/employees").to_request();
    let all: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let req = test::TestRequest::get().uri("/employees/search?city=&state=").to_request();
    let located: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(located.as_array().unwrap().len(), 1);
    assert_eq!(located[0]["fullName"], "Uzair");
}

#[actix_web::test]
async fn invalid_submission_is_rejected_and_not_persisted() {
    let store = Arc::new(MemoryEmployeeStore::new());
    let app = app!(store);

    let mut body = uzair();
    body["fullName"] = json!("U");
    body["contacts"][1]["phoneNumber"] = json!("");
    let req = test::TestRequest::post().uri("/employees").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let errors: Value = test::read_body_json(resp).await;
    let paths: Vec<Value> = errors["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| issue["path"].clone())
        .collect();
    assert_eq!(paths, vec![json!(["contacts", 1, "phoneNumber"]), json!(["fullName"])]);

    let mut missing_name = uzair();
    missing_name.as_object_mut().unwrap().remove("fullName");
    let req = test::TestRequest::post().uri("/employees").set_json(missing_name).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    assert!(store.list_employees().await.unwrap().is_empty());
    assert_eq!(store.child_row_counts().await, (0, 0, 0));
}

#[actix_web::test]
async fn malformed_body_gets_error_message() {
    let store = Arc::new(MemoryEmployeeStore::new());
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri("/employees")
        .set_json(json!({"fullName": 42}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[actix_web::test]
async fn update_replaces_children() {
    let store = Arc::new(MemoryEmployeeStore::new());
    let app = app!(store);

    let req = test::TestRequest::post().uri("/employees").set_json(uzair()).to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;

    let mut update = uzair();
    update["id"] = created["id"].clone();
    update["jobTitle"] = json!("Engineering Manager");
    update["contacts"] = json!([{"contactType": "Home", "phoneNumber": "021111111"}]);
    update["locations"] = json!([{"city": "Karachi", "state": "Sindh", "country": "Pakistan"}]);

    for _ in 0..2 {
        let req = test::TestRequest::put().uri("/employees").set_json(update.clone()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let updated: Value = test::read_body_json(resp).await;
        assert_eq!(updated["jobTitle"], "Engineering Manager");
        assert_eq!(updated["contacts"].as_array().unwrap().len(), 1);
        assert_eq!(updated["contacts"][0]["contactType"], "Home");
        assert_eq!(updated["locations"].as_array().unwrap().len(), 1);
        assert_eq!(updated["locations"][0]["location"]["country"], "Pakistan");
    }
    assert_eq!(store.child_row_counts().await, (1, 1, 1));

    let req = test::TestRequest::get().uri("/employees/search?city=new").to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found, json!([]));
}

#[actix_web::test]
async fn update_requires_existing_id() {
    let store = Arc::new(MemoryEmployeeStore::new());
    let app = app!(store);

    let req = test::TestRequest::put().uri("/employees").set_json(uzair()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let mut body = uzair();
    body["id"] = json!(999);
    let req = test::TestRequest::put().uri("/employees").set_json(body.clone()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let error: Value = test::read_body_json(resp).await;
    assert_eq!(error["error"], "Employee 999 not found");

    body["department"] = json!("");
    let req = test::TestRequest::put().uri("/employees").set_json(body).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn delete_removes_employee_and_children() {
    let store = Arc::new(MemoryEmployeeStore::new());
    let app = app!(store);

    let req = test::TestRequest::post().uri("/employees").set_json(uzair()).to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::delete()
        .uri("/employees")
        .set_json(json!({"id": created["id"]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Employee deleted successfully");

    assert_eq!(store.child_row_counts().await, (0, 0, 0));
    let req = test::TestRequest::get().uri("/employees").to_request();
    let all: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all, json!([]));

    let req = test::TestRequest::delete()
        .uri("/employees")
        .set_json(json!({"id": created["id"]}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete().uri("/employees").set_json(json!({})).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn malformed_query_gets_error_message() {
    let store = Arc::new(MemoryEmployeeStore::new());
    let app = app!(store);

    let req = test::TestRequest::get()
        .uri("/employees/search?city=new&city=york")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid query string"));
}

#[actix_web::test]
async fn date_time_without_offset_is_accepted() {
    let store = Arc::new(MemoryEmployeeStore::new());
    let app = app!(store);

    let req = test::TestRequest::post().uri("/employees").set_json(uzair()).to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;

    let mut update = uzair();
    update["id"] = created["id"].clone();
    update["dateOfBirth"] = json!("1991-06-20T00:00:00");
    let req = test::TestRequest::put().uri("/employees").set_json(update).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["dateOfBirth"], "1991-06-20");
}
