//! GUI command handler.

use crate::error::Result;
use crate::gui::app::run_gui;

/// Open the main window.
///
/// Returns once the user closes the window.
pub fn gui_command() -> Result<()> {
    run_gui()
}
