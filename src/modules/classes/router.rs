use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    assign_student, create_class, delete_class, get_class, get_classes, unassign_student,
    update_class,
};

pub fn init_classes_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_class).get(get_classes))
        .route(
            "/{id}",
            get(get_class).put(update_class).delete(delete_class),
        )
        .route(
            "/{class_id}/students/{student_id}",
            post(assign_student).delete(unassign_student),
        )
}
