//! Check command handler.

use std::path::Path;

use super::resolve_package_dir;
use crate::error::Result;
use crate::output::{print_info, print_warning};
use crate::package::PackageCheck;

/// Inspect `directory` for `debian/tests/control` and report the result.
pub fn check_command(directory: &Path) -> Result<PackageCheck> {
    let directory = resolve_package_dir(directory)?;
    let check = PackageCheck::inspect(&directory);

    if check.has_control() {
        print_info(&check.status_message());
    } else {
        print_warning(&check.status_message());
    }

    Ok(check)
}
