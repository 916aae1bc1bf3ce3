//! usbmount - pick a USB partition and print the command to mount or unmount it.
//!
//! The command is printed on stdout after the terminal is restored, so it
//! can be reviewed or piped into a shell. Nothing is printed on quit.

mod app;
mod error;
mod input;
mod logging;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use usbmount_core::mount::DEFAULT_MOUNT_ROOT;
use usbmount_core::{MountPolicy, Outcome, PrivilegeEscalation, Session, Source, disk, usb};

use crate::app::App;

/// USB storage mount helper.
#[derive(Parser, Debug)]
#[command(name = "usbmount")]
#[command(about = "Pick a USB partition and print its mount/unmount command", long_about = None)]
struct Cli {
    /// Prefix for the printed command: none, sudo or pkexec.
    #[arg(long, default_value = "sudo")]
    escalation: PrivilegeEscalation,

    /// Directory under which default mount points are suggested.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_MOUNT_ROOT)]
    mount_root: PathBuf,

    /// Read `lsblk -J` output from a file instead of running lsblk.
    #[arg(long, value_name = "FILE")]
    lsblk_json: Option<PathBuf>,

    /// Read `lsusb` output from a file instead of running lsusb.
    #[arg(long, value_name = "FILE")]
    lsusb: Option<PathBuf>,

    /// Write logs to this file.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn source(snapshot: Option<&PathBuf>) -> Source {
    snapshot
        .map(|path| Source::Snapshot(path.clone()))
        .unwrap_or_default()
}

fn run(cli: &Cli) -> error::Result<Outcome> {
    let usb_lines = usb::load_usb_summary(&source(cli.lsusb.as_ref()));
    let parts = disk::load_usb_partitions(&source(cli.lsblk_json.as_ref()));
    info!(partitions = parts.len(), "starting session");

    let policy = MountPolicy::new(&cli.mount_root, cli.escalation);
    App::new(usb_lines, Session::new(parts, policy)).run()
}

fn main() {
    let cli = Cli::parse();

    let guard = match logging::init(cli.log_file.as_deref(), &cli.log_level) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match run(&cli) {
        Ok(Outcome::Committed(command)) => {
            info!(%command, "command selected");
            println!("{}", command);
        }
        Ok(Outcome::Cancelled) => info!("cancelled"),
        Err(e) => {
            error!(error = %e, "session failed");
            eprintln!("Error: {}", e);
            drop(guard);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["usbmount"]).unwrap();
        assert_eq!(cli.escalation, PrivilegeEscalation::Sudo);
        assert_eq!(cli.mount_root, PathBuf::from("/mnt"));
        assert_eq!(source(cli.lsblk_json.as_ref()), Source::System);
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn test_cli_options() {
        let cli = Cli::try_parse_from([
            "usbmount",
            "--escalation",
            "pkexec",
            "--mount-root",
            "/media",
            "--lsblk-json",
            "/tmp/lsblk.json",
        ])
        .unwrap();
        assert_eq!(cli.escalation, PrivilegeEscalation::Pkexec);
        assert_eq!(cli.mount_root, PathBuf::from("/media"));
        assert_eq!(
            source(cli.lsblk_json.as_ref()),
            Source::Snapshot(PathBuf::from("/tmp/lsblk.json"))
        );
    }

    #[test]
    fn test_cli_rejects_unknown_escalation() {
        assert!(Cli::try_parse_from(["usbmount", "--escalation", "doas"]).is_err());
    }
}
