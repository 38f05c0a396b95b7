mod common;

use common::*;

#[test]
fn test_simple() {
    let db = fresh_db();

    let users = db.list_users();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Estudiante");

    let tasks = db.get_tasks();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks.iter().filter(|t| t.done).count(), 1);

    assert_eq!(db.get_progress(), Progress { total: 3, done: 1, pct: 33 });
}
