//! Disposable test kinds shared by the integration tests.

#![allow(dead_code)]

use disposable_registry::Disposable;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Declares a window-like kind with its own construction counter.
macro_rules! window_kind {
    ($name:ident) => {
        pub struct $name {
            pub serial: usize,
            title: Mutex<String>,
            disposed: AtomicBool,
        }

        impl $name {
            fn counter() -> &'static AtomicUsize {
                static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);
                &CONSTRUCTED
            }

            /// How many instances have been built so far.
            pub fn constructed() -> usize {
                Self::counter().load(Ordering::SeqCst)
            }

            pub fn title(&self) -> String {
                self.title.lock().unwrap().clone()
            }

            pub fn set_title(&self, title: &str) {
                *self.title.lock().unwrap() = title.to_string();
            }
        }

        impl Default for $name {
            fn default() -> Self {
                let serial = Self::counter().fetch_add(1, Ordering::SeqCst) + 1;
                Self {
                    serial,
                    title: Mutex::new(stringify!($name).to_string()),
                    disposed: AtomicBool::new(false),
                }
            }
        }

        impl Disposable for $name {
            fn dispose(&self) -> anyhow::Result<()> {
                self.disposed.store(true, Ordering::SeqCst);
                Ok(())
            }

            fn is_disposed(&self) -> bool {
                self.disposed.load(Ordering::SeqCst)
            }
        }
    };
}

window_kind!(MainWindow);
window_kind!(SettingsWindow);
window_kind!(AboutWindow);
window_kind!(LogWindow);
window_kind!(ThreadedWindow);
window_kind!(RacedWindow);

/// A kind whose `Default` always panics.
pub struct PanickyWindow;

impl Default for PanickyWindow {
    fn default() -> Self {
        panic!("native handle unavailable")
    }
}

impl Disposable for PanickyWindow {
    fn dispose(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn is_disposed(&self) -> bool {
        false
    }
}

/// A kind only ever registered with a factory that fails.
pub struct UnbuildableWindow;

impl Disposable for UnbuildableWindow {
    fn dispose(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn is_disposed(&self) -> bool {
        false
    }
}

/// A kind whose disposal fails until `allow_dispose` is set.
#[derive(Default)]
pub struct StickyWindow {
    pub allow_dispose: AtomicBool,
    disposed: AtomicBool,
}

impl Disposable for StickyWindow {
    fn dispose(&self) -> anyhow::Result<()> {
        if !self.allow_dispose.load(Ordering::SeqCst) {
            anyhow::bail!("modal loop still running");
        }
        self.disposed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

/// A kind whose disposal panics.
#[derive(Default)]
pub struct CrashingWindow;

impl Disposable for CrashingWindow {
    fn dispose(&self) -> anyhow::Result<()> {
        panic!("double free detected")
    }

    fn is_disposed(&self) -> bool {
        false
    }
}

/// A kind whose `is_disposed` panics.
#[derive(Default)]
pub struct HauntedWindow {
    pub disposed: AtomicBool,
}

impl Disposable for HauntedWindow {
    fn dispose(&self) -> anyhow::Result<()> {
        self.disposed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_disposed(&self) -> bool {
        panic!("window handle table corrupted")
    }
}
