use std::collections::HashMap;
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use crate::db::{not_found, EmployeeStore, StoreResult};
use crate::models::employee::{Contact, Employee, EmployeeLocation, NewEmployee};
use crate::search::LocationFilter;

const EMPLOYEE_COLUMNS: &str =
    "SELECT id, full_name, date_of_birth, department, job_title, created_at, updated_at FROM employees";

/// PostgreSQL-backed store. Every nested write runs in one transaction.
#[derive(Clone)]
pub struct PgEmployeeStore {
    pool: PgPool,
}

impl PgEmployeeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for PgEmployeeStore {
    async fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        let mut conn = self.pool.acquire().await?;
        let mut employees = sqlx::query_as::<_, Employee>(&format!("{} ORDER BY id", EMPLOYEE_COLUMNS))
            .fetch_all(&mut *conn)
            .await?;
        attach_children(&mut conn, &mut employees, None).await?;
        Ok(employees)
    }

    async fn search_employees(&self, filter: &LocationFilter) -> StoreResult<Vec<Employee>> {
        let mut conn = self.pool.acquire().await?;

        let mut query_builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(EMPLOYEE_COLUMNS);
        query_builder.push(
            " WHERE id IN (SELECT el.employee_id FROM employee_locations el \
             JOIN locations l ON l.id = el.location_id WHERE TRUE",
        );
        push_location_conditions(&mut query_builder, filter);
        query_builder.push(") ORDER BY id");

        let mut employees = query_builder
            .build_query_as::<Employee>()
            .fetch_all(&mut *conn)
            .await?;
        attach_children(&mut conn, &mut employees, Some(filter)).await?;
        employees.retain(|employee| !employee.locations.is_empty());
        Ok(employees)
    }

    async fn create_employee(&self, employee: NewEmployee) -> StoreResult<Employee> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO employees (full_name, date_of_birth, department, job_title) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&employee.full_name)
        .bind(employee.date_of_birth)
        .bind(&employee.department)
        .bind(&employee.job_title)
        .fetch_one(&mut *tx)
        .await?;

        insert_children(&mut tx, id, &employee).await?;
        let created = load_employee(&mut tx, id).await?;
        tx.commit().await?;

        Ok(created)
    }

    async fn update_employee(&self, id: i32, employee: NewEmployee) -> StoreResult<Employee> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE employees SET full_name = $1, date_of_birth = $2, department = $3, \
             job_title = $4, updated_at = now() WHERE id = $5",
        )
        .bind(&employee.full_name)
        .bind(employee.date_of_birth)
        .bind(&employee.department)
        .bind(&employee.job_title)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        delete_children(&mut tx, id).await?;
        insert_children(&mut tx, id, &employee).await?;
        let updated = load_employee(&mut tx, id).await?;
        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_employee(&self, id: i32) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        delete_children(&mut tx, id).await?;
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

async fn load_employee(conn: &mut PgConnection, id: i32) -> StoreResult<Employee> {
    let employee = sqlx::query_as::<_, Employee>(&format!("{} WHERE id = $1", EMPLOYEE_COLUMNS))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut employees = vec![employee];
    attach_children(conn, &mut employees, None).await?;
    employees.pop().ok_or_else(|| not_found(id))
}

/// Fills `contacts` and `locations` for the given employees. With a filter,
/// only matching locations are attached.
async fn attach_children(
    conn: &mut PgConnection,
    employees: &mut [Employee],
    filter: Option<&LocationFilter>,
) -> StoreResult<()> {
    if employees.is_empty() {
        return Ok(());
    }
    let ids: Vec<i32> = employees.iter().map(|employee| employee.id).collect();

    let contacts = sqlx::query_as::<_, Contact>(
        "SELECT id, employee_id, contact_type, phone_number FROM contacts \
         WHERE employee_id = ANY($1) ORDER BY id",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut query_builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
        "SELECT el.employee_id, el.location_id, l.id, l.city, l.state, l.country \
         FROM employee_locations el JOIN locations l ON l.id = el.location_id \
         WHERE el.employee_id = ANY(",
    );
    query_builder.push_bind(ids.clone());
    query_builder.push(")");
    if let Some(filter) = filter {
        push_location_conditions(&mut query_builder, filter);
    }
    query_builder.push(" ORDER BY l.id");

    let links = query_builder
        .build_query_as::<EmployeeLocation>()
        .fetch_all(&mut *conn)
        .await?;

    let mut contacts_by_employee: HashMap<i32, Vec<Contact>> = HashMap::new();
    for contact in contacts {
        contacts_by_employee.entry(contact.employee_id).or_default().push(contact);
    }
    let mut links_by_employee: HashMap<i32, Vec<EmployeeLocation>> = HashMap::new();
    for link in links {
        links_by_employee.entry(link.employee_id).or_default().push(link);
    }

    for employee in employees.iter_mut() {
        employee.contacts = contacts_by_employee.remove(&employee.id).unwrap_or_default();
        employee.locations = links_by_employee.remove(&employee.id).unwrap_or_default();
    }
    Ok(())
}

async fn insert_children(conn: &mut PgConnection, employee_id: i32, employee: &NewEmployee) -> StoreResult<()> {
    for contact in &employee.contacts {
        sqlx::query("INSERT INTO contacts (employee_id, contact_type, phone_number) VALUES ($1, $2, $3)")
            .bind(employee_id)
            .bind(&contact.contact_type)
            .bind(&contact.phone_number)
            .execute(&mut *conn)
            .await?;
    }

    // Locations are never shared: each write creates its own rows.
    for location in &employee.locations {
        let location_id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO locations (city, state, country) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&location.city)
        .bind(&location.state)
        .bind(&location.country)
        .fetch_one(&mut *conn)
        .await?;

        sqlx::query("INSERT INTO employee_locations (employee_id, location_id) VALUES ($1, $2)")
            .bind(employee_id)
            .bind(location_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn delete_children(conn: &mut PgConnection, employee_id: i32) -> StoreResult<()> {
    sqlx::query("DELETE FROM contacts WHERE employee_id = $1")
        .bind(employee_id)
        .execute(&mut *conn)
        .await?;

    let location_ids = sqlx::query_scalar::<_, i32>(
        "DELETE FROM employee_locations WHERE employee_id = $1 RETURNING location_id",
    )
    .bind(employee_id)
    .fetch_all(&mut *conn)
    .await?;

    if !location_ids.is_empty() {
        sqlx::query("DELETE FROM locations WHERE id = ANY($1)")
            .bind(&location_ids)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

fn push_location_conditions(query_builder: &mut QueryBuilder<'_, Postgres>, filter: &LocationFilter) {
    for (column, needle) in filter.constraints() {
        query_builder.push(format!(" AND l.{} ILIKE ", column));
        query_builder.push_bind(format!("%{}%", escape_like(needle)));
    }
}

/// Escapes LIKE wildcards so the needle is matched literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
