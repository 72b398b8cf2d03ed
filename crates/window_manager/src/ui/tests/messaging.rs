//! Direct messages and broadcasts

use super::support::Harness;
use crate::ui::{CloseOptions, MessageArg, OpenOptions, WindowError, WindowMessage};

#[test]
fn test_broadcast_reaches_newest_first() {
    let mut h = Harness::new();
    h.foreground("A").foreground("B");
    h.manager.open_window("A", OpenOptions::default()).unwrap();
    h.manager.open_window("B", OpenOptions::default()).unwrap();
    h.clear_log();

    h.manager.broadcast(&WindowMessage::new(7));

    assert_eq!(*h.log.borrow(), vec!["B.message(7)", "A.message(7)"]);
}

#[test]
fn test_broadcast_covers_hidden_but_not_destroyed_windows() {
    let mut h = Harness::new();
    h.foreground("A").foreground("B").foreground("C");
    for name in ["A", "B", "C"] {
        h.manager.open_window(name, OpenOptions::default()).unwrap();
    }
    h.manager.close_window("B", CloseOptions::anywhere()).unwrap();
    h.manager.destroy_window("C").unwrap();
    h.clear_log();

    h.manager.broadcast(&WindowMessage::new(1));

    assert_eq!(*h.log.borrow(), vec!["B.message(1)", "A.message(1)"]);
}

#[test]
fn test_broadcast_order_follows_instantiation() {
    let mut h = Harness::new();
    h.foreground("A").foreground("B");
    h.manager.open_window("A", OpenOptions::default()).unwrap();
    h.manager.open_window("B", OpenOptions::default()).unwrap();
    h.manager.destroy_window("A").unwrap();
    h.manager.open_window("A", OpenOptions::default()).unwrap();
    h.clear_log();

    h.manager.broadcast(&WindowMessage::new(2));

    assert_eq!(*h.log.borrow(), vec!["A.message(2)", "B.message(2)"]);
}

#[test]
fn test_send_message() {
    let mut h = Harness::new();
    h.foreground("Shop");
    let message = WindowMessage::new(3).with_arg("gold", MessageArg::Int(40));

    let result = h.manager.send_message("Shop", &message);
    assert!(matches!(result, Err(WindowError::NotInstantiated(_))));
    assert!(h.log.borrow().is_empty());

    assert!(matches!(
        h.manager.send_message("Nope", &message),
        Err(WindowError::UnknownWindow(_))
    ));

    h.manager.open_window("Shop", OpenOptions::default()).unwrap();
    h.clear_log();
    h.manager.send_message("Shop", &message).unwrap();

    assert_eq!(*h.log.borrow(), vec!["Shop.message(3)"]);
}
