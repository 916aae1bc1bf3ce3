//! USB bus summary from `lsusb`.
//!
//! The output is only displayed, never interpreted.

use tracing::{debug, warn};

use crate::error::Result;
use crate::executor::Source;

/// Lists attached USB devices, one `lsusb` line each.
pub fn list_usb_devices(source: &Source) -> Result<Vec<String>> {
    let text = source.read("lsusb", &[])?;
    Ok(text
        .trim()
        .lines()
        .map(str::to_string)
        .collect())
}

/// Lists attached USB devices, turning any failure into a diagnostic line.
pub fn load_usb_summary(source: &Source) -> Vec<String> {
    match list_usb_devices(source) {
        Ok(lines) => {
            debug!(count = lines.len(), "loaded usb summary");
            lines
        }
        Err(e) => {
            warn!(error = %e, "usb summary unavailable");
            vec![format!("lsusb error: {}", e)]
        }
    }
}
