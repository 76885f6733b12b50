#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{NaiveDate, Utc};
use http_body_util::BodyExt;
use rollcall::modules::relationships::MemoryReferenceStore;
use rollcall_models::{Class, ClassId, Gender, Student, StudentId, Teacher, TeacherId};
use serde_json::Value;
use tower::ServiceExt;

pub fn class(name: &str, student_limit: i32) -> Class {
    Class {
        id: ClassId::new(),
        name: name.to_string(),
        year: 2024,
        teacher_id: None,
        student_fees: 1200.0,
        student_limit,
        student_ids: Vec::new(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn teacher(name: &str) -> Teacher {
    Teacher {
        id: TeacherId::new(),
        name: name.to_string(),
        gender: Gender::Female,
        dob: NaiveDate::from_ymd_opt(1982, 6, 2).unwrap(),
        contact: "0123456789".to_string(),
        salary: 48000.0,
        email: format!("{}@school.test", name.to_lowercase().replace(' ', ".")),
        assigned_class_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn student(name: &str, gender: Gender) -> Student {
    Student {
        id: StudentId::new(),
        name: name.to_string(),
        gender,
        dob: NaiveDate::from_ymd_opt(2014, 1, 20).unwrap(),
        contact: "0987654321".to_string(),
        fees_paid: 300.0,
        class_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// A store holding one class with the given limit and `students` unassigned students.
pub fn seeded_store(student_limit: i32, students: usize) -> (MemoryReferenceStore, Class, Vec<Student>) {
    let store = MemoryReferenceStore::new();
    let c = class("Grade 5A", student_limit);
    store.insert_class(c.clone());

    let roster: Vec<Student> = (0..students)
        .map(|i| student(&format!("Student {}", i + 1), Gender::Male))
        .collect();
    for s in &roster {
        store.insert_student(s.clone());
    }

    (store, c, roster)
}

/// Sends one request through the router and returns status plus JSON body.
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}
