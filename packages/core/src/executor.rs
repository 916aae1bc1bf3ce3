//! Command execution and privilege escalation.
//!
//! Enumeration tools (`lsblk`, `lsusb`) are run unprivileged and their output
//! captured. Mount and unmount are never executed here: the escalation method
//! only decides which prefix the emitted command carries.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, IoResultExt, Result};

/// Privilege escalation method for the emitted mount/unmount command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrivilegeEscalation {
    /// No prefix; the caller is expected to already be root.
    None,
    /// Use `sudo` for TTY-based privilege escalation.
    #[default]
    Sudo,
    /// Use `pkexec` for polkit-based privilege escalation.
    Pkexec,
}

impl PrivilegeEscalation {
    /// Returns the wrapper program, if any.
    pub fn wrapper(self) -> Option<&'static str> {
        match self {
            PrivilegeEscalation::None => None,
            PrivilegeEscalation::Sudo => Some("sudo"),
            PrivilegeEscalation::Pkexec => Some("pkexec"),
        }
    }

    /// Prepends the wrapper to a command line.
    pub fn wrap(self, command: &str) -> String {
        match self.wrapper() {
            Some(wrapper) => format!("{} {}", wrapper, command),
            None => command.to_string(),
        }
    }
}

impl fmt::Display for PrivilegeEscalation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wrapper().unwrap_or("none"))
    }
}

impl FromStr for PrivilegeEscalation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(PrivilegeEscalation::None),
            "sudo" => Ok(PrivilegeEscalation::Sudo),
            "pkexec" => Ok(PrivilegeEscalation::Pkexec),
            other => Err(format!(
                "unknown escalation '{}', expected one of: none, sudo, pkexec",
                other
            )),
        }
    }
}

/// Where a device listing is read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Source {
    /// Run the enumeration tool on the live system.
    #[default]
    System,
    /// Read previously captured tool output from a file.
    Snapshot(PathBuf),
}

impl Source {
    /// Returns the listing text, running `cmd` for [`Source::System`].
    pub fn read(&self, cmd: &str, args: &[&str]) -> Result<String> {
        match self {
            Source::System => run_command(cmd, args),
            Source::Snapshot(path) => {
                debug!(path = %path.display(), "reading {} snapshot", cmd);
                fs::read_to_string(path).snapshot_context(path)
            }
        }
    }
}

/// Runs a command directly and returns its standard output.
pub fn run_command(cmd: &str, args: &[&str]) -> Result<String> {
    debug!(command = cmd, ?args, "running command");

    let output = Command::new(cmd)
        .args(args)
        .output()
        .command_context(cmd)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(Error::CommandExit {
            command: cmd.to_string(),
            code: output.status.code().unwrap_or(-1),
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
