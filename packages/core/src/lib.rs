//! usbmount-core: Core library for the USB storage mount helper.
//!
//! This library turns `lsblk`/`lsusb` output into a list of USB partitions
//! and drives the interactive session that picks one of them and produces
//! the matching mount or unmount command. It never mounts anything itself.
//!
//! # Modules
//!
//! - [`disk`]: Block device parsing, flattening and USB partition filtering
//! - [`usb`]: `lsusb` summary lines
//! - [`mount`]: Default mount points and command construction
//! - [`session`]: Interactive selection state machine
//! - [`executor`]: Command execution, listing sources and privilege escalation
//! - [`error`]: Error types
//!
//! # Example
//!
//! ```no_run
//! use usbmount_core::{disk, mount::MountPolicy, session::{InputEvent, Session}, Source};
//!
//! let parts = disk::load_usb_partitions(&Source::System);
//! let mut session = Session::new(parts, MountPolicy::default());
//!
//! if let Some(outcome) = session.handle(InputEvent::Enter) {
//!     if let Some(command) = outcome.command() {
//!         println!("{}", command);
//!     }
//! }
//! ```

pub mod disk;
pub mod error;
pub mod executor;
pub mod mount;
pub mod session;
pub mod usb;

// Re-export commonly used types
pub use disk::{DeviceNode, ErrorRecord, NodeType, Record};
pub use error::{Error, Result};
pub use executor::{PrivilegeEscalation, Source};
pub use mount::MountPolicy;
pub use session::{Focus, InputEvent, Outcome, Session};
