//! System clipboard access through external tools

use blockpress_core::config::{ClipboardConfig, consts};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Tools tried in order when no command is configured
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip", &[]),
];

/// Where the copied text ended up
#[derive(Debug, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Piped into this clipboard tool
    Clipboard(String),
    /// No tool worked; written to this file instead
    File(PathBuf),
    /// Nothing worked; the failure was logged
    Failed,
}

/// Copies `text` to the clipboard, falling back to `clipboard.html` in the data directory
///
/// Failures never abort the caller.
pub fn copy(text: &str, config: &ClipboardConfig, data_dir: &Path) -> CopyOutcome {
    match &config.command {
        Some(command) => {
            let mut parts = command.split_whitespace();
            if let Some(program) = parts.next() {
                let args: Vec<&str> = parts.collect();
                if pipe_into(program, &args, text) {
                    return CopyOutcome::Clipboard(program.to_string());
                }
            } else {
                log::warn!("clipboard.command is empty, ignoring it");
            }
        }
        None => {
            for (program, args) in CLIPBOARD_TOOLS {
                if which::which(program).is_err() {
                    continue;
                }
                if pipe_into(program, args, text) {
                    return CopyOutcome::Clipboard(program.to_string());
                }
            }
            log::info!("No working clipboard tool found");
        }
    }

    let path = data_dir.join(consts::files::CLIPBOARD_FILE);
    match write_fallback(&path, text) {
        Ok(()) => CopyOutcome::File(path),
        Err(e) => {
            log::error!("Failed to copy output: could not write {}: {}", path.display(), e);
            CopyOutcome::Failed
        }
    }
}

/// Runs `program` with `text` on stdin; true on a zero exit status
fn pipe_into(program: &str, args: &[&str], text: &str) -> bool {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    let mut child = match child {
        Ok(child) => child,
        Err(e) => {
            log::warn!("Could not start {}: {}", program, e);
            return false;
        }
    };

    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = stdin.write_all(text.as_bytes()) {
            log::warn!("Could not write to {}: {}", program, e);
        }
    }

    match child.wait() {
        Ok(status) if status.success() => true,
        Ok(status) => {
            log::warn!("{} exited with {}", program, status);
            false
        }
        Err(e) => {
            log::warn!("Waiting for {} failed: {}", program, e);
            false
        }
    }
}

fn write_fallback(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_configured_command_falls_back_to_file() {
        let temp = TempDir::new().unwrap();
        let config = ClipboardConfig {
            command: Some("blockpress-no-such-clipboard-tool --flag".to_string()),
        };

        let outcome = copy("<p>x</p>\n", &config, temp.path());

        let path = temp.path().join("clipboard.html");
        assert_eq!(outcome, CopyOutcome::File(path.clone()));
        assert_eq!(fs::read_to_string(path).unwrap(), "<p>x</p>\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_configured_command_receives_text() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("copied.txt");
        let config = ClipboardConfig {
            command: Some(format!("tee {}", target.display())),
        };

        let outcome = copy("<h2>t</h2>", &config, temp.path());

        assert_eq!(outcome, CopyOutcome::Clipboard("tee".to_string()));
        assert_eq!(fs::read_to_string(target).unwrap(), "<h2>t</h2>");
        assert!(!temp.path().join("clipboard.html").exists());
    }

    #[test]
    fn test_unwritable_fallback_reports_failure() {
        let temp = TempDir::new().unwrap();
        // A file where the data directory should be
        let blocker = temp.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();
        let config = ClipboardConfig {
            command: Some("blockpress-no-such-clipboard-tool".to_string()),
        };

        assert_eq!(copy("x", &config, &blocker), CopyOutcome::Failed);
    }
}
