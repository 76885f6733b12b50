mod common;

use common::{class, seeded_store, student, teacher};
use rollcall::modules::relationships::{MemoryReferenceStore, RelationshipService};
use rollcall_core::ErrorKind;
use rollcall_models::Gender;

#[tokio::test]
async fn test_assign_sets_both_sides() {
    let (store, c, roster) = seeded_store(30, 1);
    let s = &roster[0];

    let updated = RelationshipService::assign_student_to_class(&store, c.id, s.id)
        .await
        .unwrap();

    assert_eq!(updated.student_ids, vec![s.id]);
    assert_eq!(store.class(c.id).unwrap().student_ids, vec![s.id]);
    assert_eq!(store.student(s.id).unwrap().class_id, Some(c.id));
}

#[tokio::test]
async fn test_assign_missing_ids_is_not_found() {
    let (store, c, roster) = seeded_store(30, 1);

    let ghost = student("Ghost", Gender::Male);
    let err = RelationshipService::assign_student_to_class(&store, c.id, ghost.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.message(), "Class or student not found");

    let elsewhere = class("Elsewhere", 5);
    let err = RelationshipService::assign_student_to_class(&store, elsewhere.id, roster[0].id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn test_assign_twice_is_conflict() {
    let (store, c, roster) = seeded_store(30, 1);
    let s = &roster[0];

    RelationshipService::assign_student_to_class(&store, c.id, s.id)
        .await
        .unwrap();
    let err = RelationshipService::assign_student_to_class(&store, c.id, s.id)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(err.message(), "Student already assigned to this class");
    assert_eq!(store.class(c.id).unwrap().student_ids, vec![s.id]);
}

#[tokio::test]
async fn test_assign_into_full_class_leaves_records_unchanged() {
    let (store, c, roster) = seeded_store(2, 3);

    for s in &roster[..2] {
        RelationshipService::assign_student_to_class(&store, c.id, s.id)
            .await
            .unwrap();
    }
    let writes_before = store.writes();

    let err = RelationshipService::assign_student_to_class(&store, c.id, roster[2].id)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::CapacityExceeded);
    assert_eq!(err.message(), "Student limit for this class is reached");
    assert_eq!(store.writes(), writes_before);
    assert_eq!(store.class(c.id).unwrap().student_ids.len(), 2);
    assert_eq!(store.student(roster[2].id).unwrap().class_id, None);
}

#[tokio::test]
async fn test_single_seat_class_scenario() {
    let (store, c, roster) = seeded_store(1, 2);
    let (a, b) = (&roster[0], &roster[1]);

    let updated = RelationshipService::assign_student_to_class(&store, c.id, a.id)
        .await
        .unwrap();
    assert_eq!(updated.student_ids, vec![a.id]);

    let err = RelationshipService::assign_student_to_class(&store, c.id, b.id)
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Student limit for this class is reached");

    let updated = RelationshipService::unassign_student_from_class(&store, c.id, a.id)
        .await
        .unwrap();
    assert!(updated.student_ids.is_empty());
    assert_eq!(store.student(a.id).unwrap().class_id, None);

    let updated = RelationshipService::assign_student_to_class(&store, c.id, b.id)
        .await
        .unwrap();
    assert_eq!(updated.student_ids, vec![b.id]);
    assert_eq!(store.student(b.id).unwrap().class_id, Some(c.id));
}

#[tokio::test]
async fn test_unassign_student_not_in_class_is_conflict() {
    let (store, c, roster) = seeded_store(30, 1);

    let err = RelationshipService::unassign_student_from_class(&store, c.id, roster[0].id)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(err.message(), "Student is not assigned to this class");
}

#[tokio::test]
async fn test_reassign_moves_student_between_classes() {
    let (store, old, roster) = seeded_store(30, 1);
    let s = &roster[0];
    let new = class("Grade 6A", 30);
    store.insert_class(new.clone());

    RelationshipService::assign_student_to_class(&store, old.id, s.id)
        .await
        .unwrap();
    let updated = RelationshipService::reassign_student_class(&store, s.id, new.id)
        .await
        .unwrap();

    assert_eq!(updated.student_ids, vec![s.id]);
    assert!(store.class(old.id).unwrap().student_ids.is_empty());
    assert_eq!(store.class(new.id).unwrap().student_ids, vec![s.id]);
    assert_eq!(store.student(s.id).unwrap().class_id, Some(new.id));
}

#[tokio::test]
async fn test_reassign_skips_missing_old_class() {
    let store = MemoryReferenceStore::new();
    let new = class("Grade 6A", 30);
    let mut s = student("Dangling", Gender::Female);
    s.class_id = Some(class("Deleted", 30).id);
    store.insert_class(new.clone());
    store.insert_student(s.clone());

    RelationshipService::reassign_student_class(&store, s.id, new.id)
        .await
        .unwrap();

    assert_eq!(store.student(s.id).unwrap().class_id, Some(new.id));
    assert_eq!(store.class(new.id).unwrap().student_ids, vec![s.id]);
}

#[tokio::test]
async fn test_unassign_student_class_clears_both_sides() {
    let (store, c, roster) = seeded_store(30, 2);

    for s in &roster {
        RelationshipService::assign_student_to_class(&store, c.id, s.id)
            .await
            .unwrap();
    }
    RelationshipService::unassign_student_class(&store, roster[0].id)
        .await
        .unwrap();

    assert_eq!(store.class(c.id).unwrap().student_ids, vec![roster[1].id]);
    assert_eq!(store.student(roster[0].id).unwrap().class_id, None);
}

#[tokio::test]
async fn test_delete_class_detaches_teacher_and_students() {
    let (store, c, roster) = seeded_store(30, 3);
    let t = teacher("Mary Jackson");
    store.insert_teacher(t.clone());

    RelationshipService::set_class_teacher(&store, c.id, Some(t.id))
        .await
        .unwrap();
    for s in &roster {
        RelationshipService::assign_student_to_class(&store, c.id, s.id)
            .await
            .unwrap();
    }

    RelationshipService::delete_class(&store, c.id).await.unwrap();

    assert!(store.class(c.id).is_none());
    assert_eq!(store.teacher(t.id).unwrap().assigned_class_id, None);
    for s in &roster {
        let kept = store.student(s.id).unwrap();
        assert_eq!(kept.class_id, None);
        assert_eq!(kept.name, s.name);
    }
}

#[tokio::test]
async fn test_delete_missing_class_is_not_found() {
    let store = MemoryReferenceStore::new();
    let err = RelationshipService::delete_class(&store, class("Nowhere", 1).id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.message(), "Class not found");
}

#[tokio::test]
async fn test_delete_assigned_teacher_is_conflict_without_writes() {
    let store = MemoryReferenceStore::new();
    let c = class("Grade 3C", 30);
    let t = teacher("Dorothy Vaughan");
    store.insert_class(c.clone());
    store.insert_teacher(t.clone());

    RelationshipService::set_class_teacher(&store, c.id, Some(t.id))
        .await
        .unwrap();
    let writes_before = store.writes();

    let err = RelationshipService::delete_teacher(&store, t.id)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(err.message(), "Cannot delete teacher assigned to a class");
    assert_eq!(store.writes(), writes_before);
    assert!(store.teacher(t.id).is_some());
    assert_eq!(store.class(c.id).unwrap().teacher_id, Some(t.id));
}

#[tokio::test]
async fn test_delete_unassigned_teacher() {
    let store = MemoryReferenceStore::new();
    let t = teacher("Katherine Johnson");
    store.insert_teacher(t.clone());

    RelationshipService::delete_teacher(&store, t.id).await.unwrap();
    assert!(store.teacher(t.id).is_none());
}

#[tokio::test]
async fn test_delete_student_removes_it_from_roster() {
    let (store, c, roster) = seeded_store(30, 2);
    for s in &roster {
        RelationshipService::assign_student_to_class(&store, c.id, s.id)
            .await
            .unwrap();
    }

    RelationshipService::delete_student(&store, roster[0].id)
        .await
        .unwrap();

    assert!(store.student(roster[0].id).is_none());
    assert_eq!(store.class(c.id).unwrap().student_ids, vec![roster[1].id]);
}

#[tokio::test]
async fn test_roster_order_follows_assignment_order() {
    let (store, c, roster) = seeded_store(30, 4);
    for s in roster.iter().rev() {
        RelationshipService::assign_student_to_class(&store, c.id, s.id)
            .await
            .unwrap();
    }

    let expected: Vec<_> = roster.iter().rev().map(|s| s.id).collect();
    assert_eq!(store.class(c.id).unwrap().student_ids, expected);
}
