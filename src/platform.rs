//! # Platform-specific utilities
//!
//! Questo modulo centralizza la delega alla shell di sistema per aprire
//! cartelle e rivelare file. Operazioni best-effort: nessun contratto di
//! ritorno oltre al tentativo.

use crate::formats::OutputFormat;
use crate::output_dir;
use std::path::Path;
use std::process::Command;

/// Platform command used to open a path with the default handler
fn opener_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(windows) {
        "explorer"
    } else {
        "xdg-open"
    }
}

/// Open a directory in the system file manager, best effort
pub fn open_folder(dir: &Path) {
    let _ = Command::new(opener_command()).arg(dir).spawn();
}

/// Reveal a file by opening its containing directory, best effort
pub fn reveal_in_file_manager(path: &Path) {
    let target = path.parent().unwrap_or(path);
    let _ = Command::new(opener_command()).arg(target).spawn();
}

/// Open the output folder for a format, best effort
pub fn open_output_folder(format: OutputFormat, base_override: Option<&Path>) {
    if let Ok(dir) = output_dir::output_dir_path(format, base_override) {
        open_folder(&dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opener_command_known() {
        let cmd = opener_command();
        assert!(matches!(cmd, "open" | "explorer" | "xdg-open"));
    }
}
