//! Config command handler.
//!
//! Shows where settings and window state live and what they currently hold.

use crate::config::{config_dir, SettingsStore, Virtualization};
use crate::error::Result;
use crate::output::{print_field, print_warning};
use crate::session::SessionStore;

/// Print configuration paths and stored values.
///
/// With `backend` set, the virtualization backend is updated first.
pub fn config_command(backend: Option<Virtualization>) -> Result<()> {
    let settings_store = SettingsStore::new()?;
    let session_store = SessionStore::new()?;

    let settings = match settings_store.load() {
        Ok(settings) => settings,
        Err(e) => {
            print_warning(&format!("{} (showing defaults)", e));
            Default::default()
        }
    };

    let settings = match backend {
        Some(backend) if backend != settings.virtualization => {
            let updated = settings.with_virtualization(backend);
            settings_store.save(&updated)?;
            updated
        }
        _ => settings,
    };

    let session = session_store.load();

    print_field("Config dir", config_dir()?.display());
    print_field("Settings file", settings_store.path().display());
    print_field("Welcome shown", settings.welcome_shown);
    print_field("Backend", settings.virtualization);
    print_field("Session file", session_store.path().display());
    print_field(
        "Window",
        format!(
            "{}x{}{}",
            session.width,
            session.height,
            if session.maximized { " (maximized)" } else { "" }
        ),
    );

    Ok(())
}
