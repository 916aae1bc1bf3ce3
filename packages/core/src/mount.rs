//! Mount point derivation and mount/unmount command construction.
//!
//! Commands are only built here, never executed: the caller prints them.

use std::path::{Path, PathBuf};

use crate::disk::DeviceNode;
use crate::executor::PrivilegeEscalation;

/// Default directory under which mount points are derived.
pub const DEFAULT_MOUNT_ROOT: &str = "/mnt";

/// Directory name used when a partition has no usable label.
pub const FALLBACK_NAME: &str = "usb";

/// Sanitize a volume label for use as a mount point directory name.
///
/// Alphanumerics are lowercased, space, hyphen and underscore become
/// underscores, everything else is dropped. Leading and trailing
/// underscores are stripped.
pub fn sanitize_label(label: &str) -> String {
    let mut safe = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_alphanumeric() {
            safe.extend(c.to_lowercase());
        } else if matches!(c, ' ' | '-' | '_') {
            safe.push('_');
        }
    }
    safe.trim_matches('_').to_string()
}

/// Where default mount points go and how emitted commands are escalated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPolicy {
    pub mount_root: PathBuf,
    pub escalation: PrivilegeEscalation,
}

impl Default for MountPolicy {
    fn default() -> Self {
        Self {
            mount_root: PathBuf::from(DEFAULT_MOUNT_ROOT),
            escalation: PrivilegeEscalation::default(),
        }
    }
}

impl MountPolicy {
    pub fn new(mount_root: impl Into<PathBuf>, escalation: PrivilegeEscalation) -> Self {
        Self {
            mount_root: mount_root.into(),
            escalation,
        }
    }

    /// Returns `<root>/<sanitized label>`, or `<root>/usb` without a usable label.
    pub fn default_mountpoint(&self, part: &DeviceNode) -> String {
        let label = sanitize_label(part.label.as_deref().unwrap_or_default());
        let name = if label.is_empty() {
            FALLBACK_NAME
        } else {
            label.as_str()
        };
        join(&self.mount_root, name)
    }

    /// Builds the mount command, pinning the filesystem type when known.
    pub fn mount_command(&self, device: &str, mountpoint: &str, fstype: Option<&str>) -> String {
        let command = match fstype.filter(|f| !f.is_empty()) {
            Some(fstype) => format!("mount -t {} {} {}", fstype, device, mountpoint),
            None => format!("mount {} {}", device, mountpoint),
        };
        self.escalation.wrap(&command)
    }

    /// Builds the unmount command for a device.
    pub fn unmount_command(&self, device: &str) -> String {
        self.escalation.wrap(&format!("umount {}", device))
    }
}

fn join(root: &Path, name: &str) -> String {
    let root = root.to_string_lossy();
    format!("{}/{}", root.trim_end_matches('/'), name)
}

/// Derives the default mount point under `/mnt`.
pub fn default_mountpoint(part: &DeviceNode) -> String {
    MountPolicy::default().default_mountpoint(part)
}

/// Builds a `sudo mount` command.
pub fn build_mount_command(device: &str, mountpoint: &str, fstype: Option<&str>) -> String {
    MountPolicy::default().mount_command(device, mountpoint, fstype)
}

/// Builds a `sudo umount` command.
pub fn build_unmount_command(device: &str) -> String {
    MountPolicy::default().unmount_command(device)
}
