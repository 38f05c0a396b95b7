//! Integration tests for change notifications.

mod common;

use std::{cell::RefCell, rc::Rc};

use common::*;

#[test]
fn test_each_mutation_announces_itself() {
    let mut db = fresh_db();
    let (events, _sub) = record_events(&db);
    let first_user = db.active_user_id();

    let user = db.add_user(NewUser::named("Second"));
    db.set_user(UserUpdate {
        name: Some("Renamed".to_string()),
        ..UserUpdate::default()
    });
    db.set_active_user(&first_user);
    let project = db.add_project(NewProject::named("Side"));
    db.update_project_name(&project.id, "Side B");
    let task = db.add_task("Task");
    db.toggle_task(&task.id, true);
    db.remove_task(&task.id);
    let main = db.list_projects()[0].id.clone();
    db.set_active_project(&main);
    db.remove_project(&project.id);

    assert_eq!(
        *events.borrow(),
        vec![
            StoreEvent::UserAdded { id: user.id.clone() },
            StoreEvent::UserUpdated { id: user.id.clone() },
            StoreEvent::UserSwitched { id: first_user.clone() },
            StoreEvent::ProjectAdded { id: project.id.clone() },
            StoreEvent::ProjectUpdated { id: project.id.clone() },
            StoreEvent::TaskAdded { id: task.id.clone() },
            StoreEvent::TaskToggled { id: task.id.clone() },
            StoreEvent::TaskRemoved { id: task.id.clone() },
            StoreEvent::ProjectSwitched { id: main.clone() },
            StoreEvent::ProjectRemoved { id: project.id.clone() },
        ]
    );
}

#[test]
fn test_event_tags_and_entities() {
    let id = "abc".to_string();
    let cases = [
        (StoreEvent::UserUpdated { id: id.clone() }, "user:update", EntityKind::User),
        (StoreEvent::UserAdded { id: id.clone() }, "user:add", EntityKind::User),
        (StoreEvent::UserSwitched { id: id.clone() }, "user:switch", EntityKind::User),
        (StoreEvent::ProjectAdded { id: id.clone() }, "project:add", EntityKind::Project),
        (StoreEvent::ProjectSwitched { id: id.clone() }, "project:switch", EntityKind::Project),
        (StoreEvent::ProjectRemoved { id: id.clone() }, "project:remove", EntityKind::Project),
        (StoreEvent::ProjectUpdated { id: id.clone() }, "project:update", EntityKind::Project),
        (StoreEvent::TaskAdded { id: id.clone() }, "task:add", EntityKind::Task),
        (StoreEvent::TaskToggled { id: id.clone() }, "task:toggle", EntityKind::Task),
        (StoreEvent::TaskRemoved { id: id.clone() }, "task:remove", EntityKind::Task),
    ];
    for (event, tag, entity) in cases {
        assert_eq!(event.tag(), tag);
        assert_eq!(event.entity(), entity);
        assert_eq!(event.id(), "abc");
        assert!(event.tag().starts_with(match entity {
            EntityKind::User => "user:",
            EntityKind::Project => "project:",
            EntityKind::Task => "task:",
        }));
        assert_eq!(event.to_string(), format!("{tag} abc"));
    }
}

#[test]
fn test_listener_sees_state_after_mutation() {
    let mut db = fresh_db();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let _sub = db.subscribe(move |event, state| {
        if event.entity() == EntityKind::Task {
            sink.borrow_mut().push(state.progress());
        }
    });

    let task = db.add_task("New");
    db.toggle_task(&task.id, true);

    assert_eq!(
        *seen.borrow(),
        vec![Progress::new(4, 1), Progress::new(4, 2)]
    );
}

#[test]
fn test_listeners_run_in_subscription_order() {
    let mut db = fresh_db();
    let order = Rc::new(RefCell::new(Vec::new()));
    let subs: Vec<Subscription> = (0..3)
        .map(|n| {
            let order = order.clone();
            db.subscribe(move |_, _| order.borrow_mut().push(n))
        })
        .collect();
    assert_eq!(db.subscriber_count(), 3);

    db.add_task("Ordered");

    assert_eq!(*order.borrow(), vec![0, 1, 2]);
    drop(subs);
    assert_eq!(db.subscriber_count(), 0);
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let mut db = fresh_db();
    let (events, sub) = record_events(&db);

    db.add_task("Seen");
    assert!(sub.is_active());
    sub.unsubscribe();
    db.add_task("Unseen");

    assert_eq!(events.borrow().len(), 1);
    assert_eq!(db.subscriber_count(), 0);
}

#[test]
fn test_events_without_listeners_are_lost() {
    let mut db = fresh_db();
    db.add_task("Before anyone listens");

    let (events, _sub) = record_events(&db);
    assert!(events.borrow().is_empty());

    db.add_task("After");
    assert_eq!(events.borrow().len(), 1);
}

#[test]
fn test_listener_can_unsubscribe_itself() {
    let mut db = fresh_db();
    let calls = Rc::new(RefCell::new(0));
    let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let counter = calls.clone();
    let own = slot.clone();
    let sub = db.subscribe(move |_, _| {
        *counter.borrow_mut() += 1;
        own.borrow_mut().take();
    });
    *slot.borrow_mut() = Some(sub);
    let (others, _other_sub) = record_events(&db);

    db.add_task("One");
    db.add_task("Two");

    assert_eq!(*calls.borrow(), 1);
    assert_eq!(others.borrow().len(), 2, "later listeners still get every event");
    assert_eq!(db.subscriber_count(), 1);
}

#[test]
fn test_listener_dropped_during_event_is_not_called() {
    // 1. The first listener holds the second listener's subscription
    let mut db = fresh_db();
    let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    let victim = slot.clone();
    let _first = db.subscribe(move |_, _| {
        victim.borrow_mut().take();
    });
    let (second, second_sub) = record_events(&db);
    *slot.borrow_mut() = Some(second_sub);
    let (third, _third_sub) = record_events(&db);

    // 2. The first listener drops it on the first event
    db.add_task("One");

    // 3. The second listener is skipped immediately; later ones still run
    assert!(second.borrow().is_empty());
    assert_eq!(third.borrow().len(), 1);
    assert_eq!(db.subscriber_count(), 2);

    db.add_task("Two");
    assert!(second.borrow().is_empty());
    assert_eq!(third.borrow().len(), 2);
}

#[test]
fn test_noops_do_not_notify() {
    let mut db = fresh_db();
    let (events, _sub) = record_events(&db);

    db.set_active_user("unknown");
    db.set_active_project("unknown");
    db.remove_project("unknown");
    db.update_project_name("unknown", "x");
    db.toggle_task("unknown", true);
    db.remove_task("unknown");

    assert!(events.borrow().is_empty());
}
