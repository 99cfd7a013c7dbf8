//! Integration tests for the lifecycle of registered kinds in a process-wide registry.
//!
//! NOTE: All tests use #[serial] because they share the same registry (forms).
//! Each test starts from `forms::unregister_all()`.

mod common;

use common::{AboutWindow, MainWindow, SettingsWindow};
use disposable_registry::{define_registry, Disposable, Init, OnDisposed, RegistryError, Teardown};
use serial_test::serial;
use std::sync::Arc;

define_registry!(forms);

#[test]
#[serial]
fn test_register_twice_is_idempotent() {
    forms::unregister_all();

    assert!(forms::register::<MainWindow>(Init::Lazy));
    let window = forms::get::<MainWindow>(OnDisposed::Reinitialize).unwrap();

    // Neither a second lazy nor an eager registration resets the instance.
    assert!(forms::register::<MainWindow>(Init::Lazy));
    assert!(forms::register::<MainWindow>(Init::Eager));

    let again = forms::get::<MainWindow>(OnDisposed::Reinitialize).unwrap();
    assert!(Arc::ptr_eq(&window, &again));
}

#[test]
#[serial]
fn test_lazy_registration_defers_construction() {
    forms::unregister_all();
    let before = SettingsWindow::constructed();

    assert!(forms::register::<SettingsWindow>(Init::Lazy));
    assert!(forms::is_registered::<SettingsWindow>());
    assert_eq!(SettingsWindow::constructed(), before);

    let _window = forms::get::<SettingsWindow>(OnDisposed::Reinitialize).unwrap();
    assert_eq!(SettingsWindow::constructed(), before + 1);
}

#[test]
#[serial]
fn test_get_returns_same_instance() {
    forms::unregister_all();
    forms::register::<MainWindow>(Init::Lazy);

    let first = forms::get::<MainWindow>(OnDisposed::Reinitialize).unwrap();
    let second = forms::get::<MainWindow>(OnDisposed::Reinitialize).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.serial, second.serial);
}

#[test]
#[serial]
fn test_reinitialize_after_external_disposal() {
    forms::unregister_all();
    forms::register::<MainWindow>(Init::Lazy);

    let first = forms::get::<MainWindow>(OnDisposed::Reinitialize).unwrap();
    first.dispose().unwrap();

    let second = forms::get::<MainWindow>(OnDisposed::Reinitialize).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(!second.is_disposed());
    assert!(first.is_disposed());
}

#[test]
#[serial]
fn test_no_reinitialization_when_disabled() {
    forms::unregister_all();
    forms::register::<MainWindow>(Init::Lazy);

    let first = forms::get::<MainWindow>(OnDisposed::Reinitialize).unwrap();
    first.dispose().unwrap();
    let before = MainWindow::constructed();

    let stale = forms::get::<MainWindow>(OnDisposed::ReturnStale).unwrap();
    assert!(Arc::ptr_eq(&first, &stale));
    assert!(stale.is_disposed());
    assert_eq!(MainWindow::constructed(), before);
}

#[test]
#[serial]
fn test_unregister_never_registered_fails() {
    forms::unregister_all();

    assert!(!forms::unregister::<AboutWindow>(Teardown::Detach));
    assert_eq!(
        forms::try_unregister::<AboutWindow>(Teardown::Dispose),
        Err(RegistryError::NotRegistered {
            type_name: std::any::type_name::<AboutWindow>()
        })
    );
}

#[test]
#[serial]
fn test_get_never_registered_does_not_construct() {
    forms::unregister_all();
    let before = AboutWindow::constructed();

    assert!(forms::get::<AboutWindow>(OnDisposed::Reinitialize).is_none());
    assert_eq!(AboutWindow::constructed(), before);
}

#[test]
#[serial]
fn test_unregister_with_dispose() {
    forms::unregister_all();
    forms::register::<SettingsWindow>(Init::Lazy);
    let window = forms::get::<SettingsWindow>(OnDisposed::Reinitialize).unwrap();

    assert!(forms::unregister::<SettingsWindow>(Teardown::Dispose));
    assert!(window.is_disposed());
    assert!(!forms::is_registered::<SettingsWindow>());
}

#[test]
#[serial]
fn test_unregister_never_constructed_lazy_entry() {
    forms::unregister_all();
    let before = SettingsWindow::constructed();
    forms::register::<SettingsWindow>(Init::Lazy);

    assert!(forms::unregister::<SettingsWindow>(Teardown::Dispose));
    assert_eq!(SettingsWindow::constructed(), before);
}

#[test]
#[serial]
fn test_unregister_all_does_not_dispose() {
    forms::unregister_all();
    forms::register::<MainWindow>(Init::Lazy);
    forms::register::<SettingsWindow>(Init::Eager);

    let main = forms::get::<MainWindow>(OnDisposed::Reinitialize).unwrap();
    let settings = forms::get::<SettingsWindow>(OnDisposed::Reinitialize).unwrap();

    forms::unregister_all();

    assert!(!forms::is_registered::<MainWindow>());
    assert!(!forms::is_registered::<SettingsWindow>());
    assert!(!main.is_disposed());
    assert!(!settings.is_disposed());
}

#[test]
#[serial]
fn test_cleanup_disposes_all_and_clears_state() {
    forms::unregister_all();
    forms::register::<MainWindow>(Init::Lazy);
    forms::register::<SettingsWindow>(Init::Lazy);
    forms::register::<AboutWindow>(Init::Lazy);

    let main = forms::get::<MainWindow>(OnDisposed::Reinitialize).unwrap();
    let settings = forms::get::<SettingsWindow>(OnDisposed::Reinitialize).unwrap();
    let about = forms::get::<AboutWindow>(OnDisposed::Reinitialize).unwrap();

    forms::cleanup();

    assert!(main.is_disposed());
    assert!(settings.is_disposed());
    assert!(about.is_disposed());
    assert!(!forms::is_registered::<MainWindow>());
    assert!(!forms::is_registered::<SettingsWindow>());
    assert!(!forms::is_registered::<AboutWindow>());
}

#[test]
#[serial]
fn test_cleanup_skips_disposed_and_unbuilt_entries() {
    forms::unregister_all();
    let before = AboutWindow::constructed();
    forms::register::<MainWindow>(Init::Lazy);
    forms::register::<AboutWindow>(Init::Lazy);

    let main = forms::get::<MainWindow>(OnDisposed::Reinitialize).unwrap();
    main.dispose().unwrap();

    let events = Arc::new(std::sync::Mutex::new(Vec::new()));
    let events_clone = events.clone();
    forms::set_trace_callback(move |event| {
        events_clone.lock().unwrap().push(event.to_string());
    });

    forms::cleanup();
    forms::clear_trace_callback();

    assert_eq!(AboutWindow::constructed(), before);
    assert_eq!(
        *events.lock().unwrap(),
        vec!["cleanup { disposed: 0, failed: 0 }".to_string()]
    );
}

#[test]
#[serial]
fn test_full_scenario() {
    forms::unregister_all();

    assert!(forms::register::<MainWindow>(Init::Lazy));
    assert!(forms::is_registered::<MainWindow>());

    let x = forms::get::<MainWindow>(OnDisposed::Reinitialize).unwrap();
    let x_again = forms::get::<MainWindow>(OnDisposed::Reinitialize).unwrap();
    assert!(Arc::ptr_eq(&x, &x_again));

    x.dispose().unwrap();

    let y = forms::get::<MainWindow>(OnDisposed::Reinitialize).unwrap();
    assert!(!Arc::ptr_eq(&x, &y));

    forms::cleanup();

    assert!(!forms::is_registered::<MainWindow>());
    assert!(y.is_disposed());
}

#[test]
#[serial]
fn test_instances_can_reach_each_other() {
    forms::unregister_all();
    forms::register::<MainWindow>(Init::Lazy);
    forms::register::<SettingsWindow>(Init::Lazy);

    // A handler on the settings window retitles the main window.
    let settings = forms::get::<SettingsWindow>(OnDisposed::Reinitialize).unwrap();
    settings.set_title("settings open");
    forms::get::<MainWindow>(OnDisposed::Reinitialize)
        .unwrap()
        .set_title("changed from settings");

    let main = forms::get::<MainWindow>(OnDisposed::Reinitialize).unwrap();
    assert_eq!(main.title(), "changed from settings");
    assert_eq!(settings.title(), "settings open");

    forms::cleanup();
}

#[test]
#[serial]
fn test_cleanup_guard() {
    forms::unregister_all();

    let main = {
        let _teardown = forms::cleanup_on_drop();
        forms::register::<MainWindow>(Init::Lazy);
        forms::get::<MainWindow>(OnDisposed::Reinitialize).unwrap()
    };

    assert!(main.is_disposed());
    assert!(!forms::is_registered::<MainWindow>());
}
