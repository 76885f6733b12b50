#![cfg(feature = "postgres-tests")]

mod common;

use axum::http::StatusCode;
use common::send;
use rollcall::router::init_router;
use rollcall::state::AppState;
use rollcall_config::CorsConfig;
use serde_json::{Value, json};
use sqlx::PgPool;

fn app(pool: PgPool) -> axum::Router {
    init_router(AppState::new(pool, CorsConfig::parse("*")))
}

fn class_body(name: &str, limit: i64) -> Value {
    json!({
        "name": name,
        "year": 2024,
        "studentFees": 1500,
        "studentLimit": limit
    })
}

fn teacher_body(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "gender": "Female",
        "dob": "1984-04-12",
        "contact": "0123456789",
        "salary": 51000,
        "email": email
    })
}

fn student_body(name: &str, gender: &str) -> Value {
    json!({
        "name": name,
        "gender": gender,
        "dob": "2013-09-01",
        "contact": "0987654321",
        "feesPaid": 250
    })
}

async fn create(app: &axum::Router, uri: &str, body: Value) -> String {
    let (status, body) = send(app, "POST", uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_string()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health_check(pool: PgPool) {
    let app = app(pool);
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_class_reports_every_violation(pool: PgPool) {
    let app = app(pool);
    let (status, body) = send(
        &app,
        "POST",
        "/api/classes",
        Some(json!({"name": "A", "year": 1990, "studentFees": -1, "studentLimit": 0})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Name must be between 3 and 50 characters"));
    assert!(message.contains("Student fees cannot be negative"));
    assert!(message.contains("Student limit must be at least 1"));
    assert!(message.contains("Year must be between 2000 and next year"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_class_with_missing_teacher(pool: PgPool) {
    let app = app(pool);
    let mut body = class_body("Grade 1A", 30);
    body["teacher"] = json!("00000000-0000-0000-0000-000000000001");

    let (status, body) = send(&app, "POST", "/api/classes", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Teacher not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_class_teacher_is_linked_both_ways(pool: PgPool) {
    let app = app(pool);
    let teacher_id = create(&app, "/api/teachers", teacher_body("Ada Lovelace", "ada@school.test")).await;

    let mut body = class_body("Grade 2B", 30);
    body["teacher"] = json!(teacher_id);
    let class_id = create(&app, "/api/classes", body).await;

    let (_, teacher) = send(&app, "GET", &format!("/api/teachers/{teacher_id}"), None).await;
    assert_eq!(teacher["assignedClass"], json!(class_id));

    let (status, class) = send(&app, "GET", &format!("/api/classes/{class_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(class["teacher"]["name"], "Ada Lovelace");

    let (status, body) = send(&app, "DELETE", &format!("/api/teachers/{teacher_id}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cannot delete teacher assigned to a class");

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/classes/{class_id}"),
        Some(json!({"teacher": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "DELETE", &format!("/api/teachers/{teacher_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Teacher deleted");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_teacher_email(pool: PgPool) {
    let app = app(pool);
    create(&app, "/api/teachers", teacher_body("Grace Hopper", "grace@school.test")).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/teachers",
        Some(teacher_body("Grace Murray", "GRACE@school.test")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "A teacher with this email already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_third_page_of_twenty_five_students(pool: PgPool) {
    let app = app(pool);
    for i in 0..25 {
        create(&app, "/api/students", student_body(&format!("Student {i:02}"), "Male")).await;
    }

    let (status, body) = send(&app, "GET", "/api/students?page=3&limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["students"].as_array().unwrap().len(), 5);
    assert_eq!(body["total"], 25);
    assert_eq!(body["page"], 3);
    assert_eq!(body["limit"], 10);
    assert_eq!(body["totalPages"], 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_filter_and_sort_students(pool: PgPool) {
    let app = app(pool);
    for name in ["Alice Moss", "Bob Stone", "Carla Mossberg"] {
        create(&app, "/api/students", student_body(name, "Female")).await;
    }

    let (status, body) = send(&app, "GET", "/api/students?filter=MOSS&sortBy=-name", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["students"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Carla Mossberg", "Alice Moss"]);

    let (status, body) = send(&app, "GET", "/api/students?sortBy=password", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid sort field");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_roster_endpoints_enforce_limit(pool: PgPool) {
    let app = app(pool);
    let class_id = create(&app, "/api/classes", class_body("Grade 3C", 1)).await;
    let a = create(&app, "/api/students", student_body("Student A", "Male")).await;
    let b = create(&app, "/api/students", student_body("Student B", "Female")).await;

    let (status, class) = send(&app, "POST", &format!("/api/classes/{class_id}/students/{a}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(class["students"], json!([a]));

    let (status, body) = send(&app, "POST", &format!("/api/classes/{class_id}/students/{a}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Student already assigned to this class");

    let (status, body) = send(&app, "POST", &format!("/api/classes/{class_id}/students/{b}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Student limit for this class is reached");

    let (status, class) = send(&app, "DELETE", &format!("/api/classes/{class_id}/students/{a}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(class["students"], json!([]));

    let (status, _) = send(&app, "POST", &format!("/api/classes/{class_id}/students/{b}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, student) = send(&app, "GET", &format!("/api/students/{b}"), None).await;
    assert_eq!(student["class"], json!(class_id));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_lowering_limit_below_enrolment(pool: PgPool) {
    let app = app(pool);
    let class_id = create(&app, "/api/classes", class_body("Grade 4D", 5)).await;
    for name in ["Student A", "Student B"] {
        let id = create(&app, "/api/students", student_body(name, "Male")).await;
        send(&app, "POST", &format!("/api/classes/{class_id}/students/{id}"), None).await;
    }

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/classes/{class_id}"),
        Some(json!({"studentLimit": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Student limit cannot be lower than the number of assigned students"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_assign_and_unassign_class(pool: PgPool) {
    let app = app(pool);
    let first = create(&app, "/api/classes", class_body("Grade 5A", 30)).await;
    let second = create(&app, "/api/classes", class_body("Grade 5B", 30)).await;
    let student = create(&app, "/api/students", student_body("Student A", "Other")).await;

    let uri = format!("/api/students/{student}/assign-class");
    let (status, body) = send(&app, "POST", &uri, Some(json!({"classId": first}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Class assigned to student successfully");

    send(&app, "POST", &uri, Some(json!({"classId": second}))).await;

    let (_, old) = send(&app, "GET", &format!("/api/classes/{first}"), None).await;
    assert_eq!(old["students"], json!([]));
    let (_, new) = send(&app, "GET", &format!("/api/classes/{second}"), None).await;
    assert_eq!(new["students"][0]["id"], json!(student));

    let (_, list) = send(&app, "GET", "/api/students?includeClass=true", None).await;
    assert_eq!(list["students"][0]["classInfo"]["name"], "Grade 5B");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/students/{student}/unassign-class"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Class unassigned from student successfully");

    let (_, reloaded) = send(&app, "GET", &format!("/api/students/{student}"), None).await;
    assert_eq!(reloaded["class"], Value::Null);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_class_keeps_students(pool: PgPool) {
    let app = app(pool);
    let class_id = create(&app, "/api/classes", class_body("Grade 6A", 30)).await;
    let student = create(&app, "/api/students", student_body("Student A", "Male")).await;
    send(&app, "POST", &format!("/api/classes/{class_id}/students/{student}"), None).await;

    let (status, body) = send(&app, "DELETE", &format!("/api/classes/{class_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Class deleted");

    let (status, reloaded) = send(&app, "GET", &format!("/api/students/{student}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reloaded["class"], Value::Null);

    let (status, _) = send(&app, "GET", &format!("/api/classes/{class_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_malformed_and_unknown_ids(pool: PgPool) {
    let app = app(pool);

    let (status, body) = send(&app, "GET", "/api/classes/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid id format");

    let (status, body) = send(
        &app,
        "GET",
        "/api/classes/00000000-0000-0000-0000-000000000001",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Class not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_class_gender_distribution(pool: PgPool) {
    let app = app(pool);
    let class_id = create(&app, "/api/classes", class_body("Grade 7A", 30)).await;
    for (name, gender) in [
        ("Student A", "Male"),
        ("Student B", "Female"),
        ("Student C", "Female"),
        ("Student D", "Other"),
    ] {
        let id = create(&app, "/api/students", student_body(name, gender)).await;
        send(&app, "POST", &format!("/api/classes/{class_id}/students/{id}"), None).await;
    }

    let (status, body) = send(&app, "GET", &format!("/api/analytics/class/{class_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["class"]["name"], "Grade 7A");
    assert_eq!(body["class"]["students"].as_array().unwrap().len(), 4);
    assert_eq!(body["class"]["students"][0]["name"], "Student A");
    assert_eq!(body["genderDistribution"], json!({"male": 1, "female": 2}));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_financials_for_february(pool: PgPool) {
    for (email, salary, created_at) in [
        ("feb@school.test", 4000.0, "2024-02-01T00:00:00Z"),
        ("leap@school.test", 1000.0, "2024-02-29T23:59:59Z"),
        ("march@school.test", 9999.0, "2024-03-01T00:00:00Z"),
    ] {
        sqlx::query(
            r#"INSERT INTO teachers (name, gender, dob, contact, salary, email, created_at)
               VALUES ('Teacher', 'Male', '1980-01-01', '0123456789', $1, $2, $3::timestamptz)"#,
        )
        .bind(salary)
        .bind(email)
        .bind(created_at)
        .execute(&pool)
        .await
        .unwrap();
    }
    sqlx::query(
        r#"INSERT INTO students (name, gender, dob, contact, fees_paid, created_at)
           VALUES ('Student', 'Female', '2012-01-01', '0123456789', 750, '2024-02-15T08:00:00Z')"#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let app = app(pool);

    let (status, body) = send(&app, "GET", "/api/analytics/financials?type=monthly&year=2024&month=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"expenses": 5000.0, "income": 750.0}));

    let (_, body) = send(&app, "GET", "/api/analytics/financials?type=yearly&year=2024", None).await;
    assert_eq!(body["expenses"], json!(14999.0));

    let (status, body) = send(&app, "GET", "/api/analytics/financials?type=monthly&year=2024", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Month is required for monthly reports");
}
