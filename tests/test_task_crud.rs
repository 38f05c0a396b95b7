//! Integration tests for task operations and progress.

mod common;

use common::*;

#[test]
fn test_add_task_binds_to_active_project() {
    let mut db = fresh_db();
    let previous = db.active_project_id();

    let side = db.add_project(NewProject::named("Side"));
    let task = db.add_task("X");

    assert_eq!(task.project_id, side.id);
    assert!(!task.done);
    assert_eq!(task.title, "X");
    assert_eq!(db.get_tasks(), vec![task.clone()]);
    assert!(
        db.get_tasks_by_project(Some(previous.as_str()))
            .iter()
            .all(|t| t.id != task.id),
        "task must not leak into the previously active project"
    );
}

#[test]
fn test_progress_after_adding_to_completed_project() {
    // 1. Complete every task of a fresh project
    let mut db = fresh_db();
    db.add_project(NewProject::named("Side"));
    let a = db.add_task("First");
    let b = db.add_task("Second");
    db.toggle_task(&a.id, true);
    db.toggle_task(&b.id, true);
    assert_eq!(db.get_progress(), Progress { total: 2, done: 2, pct: 100 });

    // 2. Add one more open task
    db.add_task("Write tests");

    // 3. Progress drops to two of three
    assert_eq!(db.get_progress(), Progress { total: 3, done: 2, pct: 67 });
}

#[test]
fn test_progress_of_empty_project_is_zero() {
    let mut db = fresh_db();
    db.add_project(NewProject::default());

    assert_eq!(db.get_progress(), Progress { total: 0, done: 0, pct: 0 });
    assert_eq!(db.get_progress().to_string(), "0% complete (0/0)");
}

#[test]
fn test_progress_percentage_bounds() {
    for total in 1..=12usize {
        for done in 0..=total {
            let progress = Progress::new(total, done);
            let expected = (100.0 * done as f64 / total as f64).round() as u8;
            assert_eq!(progress.pct, expected, "{done}/{total}");
            assert!(progress.pct <= 100);
        }
    }
    assert_eq!(Progress::new(0, 0).pct, 0);
}

#[test]
fn test_toggle_task() {
    let mut db = fresh_db();
    let task = db.get_tasks().into_iter().find(|t| !t.done).expect("an open seed task");

    assert!(db.toggle_task(&task.id, true));
    assert!(db.state().task(&task.id).expect("task exists").done);

    assert!(db.toggle_task(&task.id, false));
    assert!(!db.state().task(&task.id).expect("task exists").done);
}

#[test]
fn test_toggle_unknown_task_is_silent_noop() {
    let mut db = fresh_db();
    let before = db.state().clone();
    let writes = db.storage().write_count();
    let (events, _sub) = record_events(&db);

    assert!(!db.toggle_task("no-such-task", true));

    assert_eq!(db.state(), &before);
    assert_eq!(db.storage().write_count(), writes);
    assert!(events.borrow().is_empty());
}

#[test]
fn test_remove_task() {
    let mut db = fresh_db();
    let task = db.add_task("Disposable");
    assert_eq!(db.get_tasks().len(), 4);

    assert!(db.remove_task(&task.id));
    assert_eq!(db.get_tasks().len(), 3);
    assert!(db.state().task(&task.id).is_none());

    let writes = db.storage().write_count();
    assert!(!db.remove_task(&task.id), "second removal finds nothing");
    assert_eq!(db.storage().write_count(), writes);
}

#[test]
fn test_get_tasks_by_project() {
    let mut db = fresh_db();
    let main = db.active_project_id();
    let side = db.add_project(NewProject::named("Side"));
    db.add_task("Only on side");

    assert_eq!(db.get_tasks_by_project(Some(main.as_str())).len(), 3);
    assert_eq!(db.get_tasks_by_project(Some(side.id.as_str())).len(), 1);
    assert_eq!(db.get_tasks_by_project(None), db.get_tasks());
    assert!(db.get_tasks_by_project(Some("unknown")).is_empty());
}

#[test]
fn test_task_mutations_persist() {
    let mut db = fresh_db();
    let task = db.add_task("Survives restart");
    db.toggle_task(&task.id, true);

    let db = reopen(db);

    let reloaded = db.state().task(&task.id).expect("task reloaded");
    assert!(reloaded.done);
    assert_eq!(reloaded.title, "Survives restart");
}
