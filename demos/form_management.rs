//! Form management example for disposable-registry.
//!
//! Demonstrates:
//! - Registering two window kinds lazily in a process-wide registry
//! - Windows reaching each other through the registry from their click handlers
//! - A closed (disposed) window being rebuilt on its next access
//! - Tearing everything down once the interaction loop ends
//!
//! Nothing is rendered: each "window" only tracks its title and visibility, and the
//! interaction loop replays a fixed list of clicks.
//!
//! Run with: `cargo run --example form_management`
//! (set `RUST_LOG=debug` to see the registry's lifecycle logs)

use disposable_registry::{define_registry, Disposable, Init, OnDisposed};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::SystemTime;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Process-wide registry every window can reach
define_registry!(forms);

// -------------------------------------------------------------------------------------------------
// Windows
// -------------------------------------------------------------------------------------------------

#[derive(Debug)]
struct MainForm {
    title: Mutex<String>,
    visible: AtomicBool,
    closed: AtomicBool,
}

impl Default for MainForm {
    fn default() -> Self {
        Self {
            title: Mutex::new("Main".to_string()),
            visible: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }
    }
}

impl MainForm {
    fn change_title(&self, title: &str) {
        *self.title.lock().unwrap_or_else(|p| p.into_inner()) = title.to_string();
        info!(title, "main form retitled");
    }

    fn title(&self) -> String {
        self.title.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn show(&self) {
        self.visible.store(true, Ordering::SeqCst);
    }

    fn on_retitle_clicked(&self) {
        self.change_title("Title changed from the main form");
    }

    fn on_open_detail_clicked(&self) {
        if let Some(detail) = forms::get::<DetailForm>(OnDisposed::Reinitialize) {
            detail.show();
        }
    }
}

impl Disposable for MainForm {
    fn dispose(&self) -> anyhow::Result<()> {
        self.visible.store(false, Ordering::SeqCst);
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_disposed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
struct DetailForm {
    opened_at: SystemTime,
    visible: AtomicBool,
    closed: AtomicBool,
}

impl Default for DetailForm {
    fn default() -> Self {
        let opened_at = SystemTime::now();
        info!(?opened_at, "detail form loaded");
        Self {
            opened_at,
            visible: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }
    }
}

impl DetailForm {
    fn show(&self) {
        self.visible.store(true, Ordering::SeqCst);
    }

    fn on_update_main_clicked(&self) {
        if let Some(main) = forms::get::<MainForm>(OnDisposed::Reinitialize) {
            main.change_title("Title changed from the detail form");
            main.show();
        }
    }

    /// Closing a window disposes it; the registry rebuilds it on the next access.
    fn close(&self) -> anyhow::Result<()> {
        self.dispose()
    }
}

impl Disposable for DetailForm {
    fn dispose(&self) -> anyhow::Result<()> {
        self.visible.store(false, Ordering::SeqCst);
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_disposed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

// -------------------------------------------------------------------------------------------------
// Interaction loop
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Click {
    MainRetitle,
    MainOpenDetail,
    DetailUpdateMain,
    DetailClose,
}

fn dispatch(main: &MainForm, click: Click) -> anyhow::Result<()> {
    info!(?click, "click");
    match click {
        Click::MainRetitle => main.on_retitle_clicked(),
        Click::MainOpenDetail => main.on_open_detail_clicked(),
        Click::DetailUpdateMain => {
            if let Some(detail) = forms::get::<DetailForm>(OnDisposed::Reinitialize) {
                detail.on_update_main_clicked();
            }
        }
        Click::DetailClose => {
            if let Some(detail) = forms::get::<DetailForm>(OnDisposed::ReturnStale) {
                detail.close()?;
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let _teardown = forms::cleanup_on_drop();

    forms::register::<MainForm>(Init::Lazy);
    forms::register::<DetailForm>(Init::Lazy);

    let main = forms::try_get::<MainForm>(OnDisposed::Reinitialize)?;
    main.show();

    let first_detail = forms::try_get::<DetailForm>(OnDisposed::Reinitialize)?;

    let script = [
        Click::MainRetitle,
        Click::MainOpenDetail,
        Click::DetailUpdateMain,
        Click::DetailClose,
        Click::MainOpenDetail,
    ];
    for click in script {
        dispatch(&main, click)?;
    }

    let second_detail = forms::try_get::<DetailForm>(OnDisposed::Reinitialize)?;
    info!(
        title = %main.title(),
        detail_rebuilt = !std::sync::Arc::ptr_eq(&first_detail, &second_detail),
        first_opened_at = ?first_detail.opened_at,
        second_opened_at = ?second_detail.opened_at,
        "interaction loop finished"
    );

    // `_teardown` disposes both forms here.
    Ok(())
}
