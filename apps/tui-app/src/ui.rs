//! Screen layout.
//!
//! Fixed rows from the top (title, lsusb summary, partition list) and from
//! the bottom (mount point line, key legend, status message). Rows that do
//! not fit are skipped and long lines are clipped at the right edge.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Clear, Paragraph},
};
use usbmount_core::{Focus, Record, Session};

pub const TITLE: &str = "USB Storage Helper";
pub const LIST_HEADER: &str = "USB partitions (select with arrows):";
pub const FOOTER: &str = "Enter=print cmd  Tab=focus  q=quit";

/// Most lsusb lines shown, before the height limit.
const MAX_USB_LINES: usize = 5;

/// Rows kept free below the partition list.
const BOTTOM_ROWS: usize = 5;

pub fn draw(frame: &mut Frame, usb_lines: &[String], session: &Session) {
    let height = frame.area().height as usize;

    put(frame, 0, 0, TITLE, Style::default().add_modifier(Modifier::BOLD));

    let mut row = 2;
    put(frame, row, 0, "lsusb:", Style::default());
    row += 1;
    let max_usb = (height / 4).clamp(1, MAX_USB_LINES);
    for line in usb_lines.iter().take(max_usb) {
        put(frame, row, 2, line, Style::default());
        row += 1;
    }

    row += 1;
    put(frame, row, 0, LIST_HEADER, Style::default());
    row += 1;

    let list_height = height.saturating_sub(row + BOTTOM_ROWS);
    let selected = session.selected();
    let start = (selected + 1).saturating_sub(list_height);
    let visible = session
        .records()
        .iter()
        .enumerate()
        .skip(start)
        .take(list_height);
    for (offset, (index, record)) in visible.enumerate() {
        let (marker, style) = if index == selected {
            (">", Style::default().add_modifier(Modifier::REVERSED))
        } else {
            (" ", Style::default())
        };
        let text = format!("{} {}", marker, describe(record));
        put(frame, row + offset, 0, &text, style);
    }

    if let Some(row) = height.checked_sub(3) {
        let line = mountpoint_line(session);
        put(frame, row, 0, &line, Style::default());
        if session.focus() == Focus::Mountpoint && !is_mounted(session) {
            place_cursor(frame, row, line.chars().count());
        }
    }
    if let Some(row) = height.checked_sub(2) {
        put(frame, row, 0, FOOTER, Style::default().add_modifier(Modifier::DIM));
    }
    if let (Some(row), Some(message)) = (height.checked_sub(1), session.message()) {
        put(frame, row, 0, message, Style::default());
    }
}

/// One list row: `path  size  fstype  mountpoint  label  model`.
pub fn describe(record: &Record) -> String {
    match record {
        Record::Error(error) => error.message.clone(),
        Record::Device(device) => {
            let or_dash = |value: Option<&str>| match value {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => "-".to_string(),
            };
            format!(
                "{}  {}  {}  {}  {}  {}",
                device.device_path(),
                device.size,
                or_dash(device.fstype.as_deref()),
                or_dash(device.mountpoint.as_deref()),
                or_dash(device.label.as_deref()),
                or_dash(device.model.as_deref()),
            )
        }
    }
}

/// Either `mounted at: <path>` or the editable `mountpoint: <text>` field.
pub fn mountpoint_line(session: &Session) -> String {
    if let Some(mounted) = session.current().device().and_then(|d| d.mounted_at()) {
        return format!("mounted at: {}", mounted);
    }
    let indicator = match session.focus() {
        Focus::Mountpoint => "*",
        Focus::List => "",
    };
    format!("mountpoint{}: {}", indicator, session.mountpoint())
}

fn is_mounted(session: &Session) -> bool {
    session.current().device().is_some_and(|d| d.is_mounted())
}

/// Draws `text` on one row, skipping rows and columns outside the frame.
fn put(frame: &mut Frame, row: usize, col: u16, text: &str, style: Style) {
    let area = frame.area();
    let Ok(y) = u16::try_from(row) else {
        return;
    };
    if y >= area.height || col >= area.width {
        return;
    }
    let rect = Rect::new(area.x + col, area.y + y, area.width - col, 1);
    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(Line::styled(text.to_string(), style)), rect);
}

fn place_cursor(frame: &mut Frame, row: usize, col: usize) {
    let area = frame.area();
    let (Ok(y), Ok(x)) = (u16::try_from(row), u16::try_from(col)) else {
        return;
    };
    if area.width == 0 {
        return;
    }
    let x = x.min(area.width - 1);
    frame.set_cursor_position(Position::new(area.x + x, area.y + y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};
    use usbmount_core::{DeviceNode, InputEvent, MountPolicy, NodeType};

    fn part(name: &str, label: Option<&str>, mounted: Option<&str>) -> Record {
        Record::Device(DeviceNode {
            name: name.to_string(),
            path: format!("/dev/{}", name),
            node_type: NodeType::Part,
            size: "14.9G".to_string(),
            fstype: Some("vfat".to_string()),
            label: label.map(str::to_string),
            model: Some("Ultra".to_string()),
            mountpoint: mounted.map(str::to_string),
            transport: Some("usb".to_string()),
            ..Default::default()
        })
    }

    fn render(width: u16, height: u16, usb_lines: &[String], session: &Session) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| draw(frame, usb_lines, session))
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    fn usb_lines() -> Vec<String> {
        vec![
            "Bus 001 Device 001: ID 1d6b:0002 Linux Foundation 2.0 root hub".to_string(),
            "Bus 001 Device 004: ID 0781:5581 SanDisk Corp. Ultra".to_string(),
        ]
    }

    #[test]
    fn test_layout() {
        let session = Session::new(
            vec![
                part("sdb1", Some("Backup"), None),
                part("sdc1", None, Some("/media/stick")),
            ],
            MountPolicy::default(),
        );
        let lines = render(80, 24, &usb_lines(), &session);

        assert_eq!(lines[0], TITLE);
        assert_eq!(lines[2], "lsusb:");
        assert_eq!(lines[3], "  Bus 001 Device 001: ID 1d6b:0002 Linux Foundation 2.0 root hub");
        assert_eq!(lines[6], LIST_HEADER);
        assert_eq!(lines[7], "> /dev/sdb1  14.9G  vfat  -  Backup  Ultra");
        assert_eq!(lines[8], "  /dev/sdc1  14.9G  vfat  /media/stick  -  Ultra");
        assert_eq!(lines[21], "mountpoint: /mnt/backup");
        assert_eq!(lines[22], FOOTER);
        assert_eq!(lines[23], "");
    }

    #[test]
    fn test_editor_focus_and_mounted_line() {
        let mut session = Session::new(
            vec![
                part("sdb1", Some("Backup"), None),
                part("sdc1", None, Some("/media/stick")),
            ],
            MountPolicy::default(),
        );
        session.handle(InputEvent::Tab);
        let lines = render(60, 20, &[], &session);
        assert_eq!(lines[17], "mountpoint*: /mnt/backup");

        session.handle(InputEvent::Tab);
        session.handle(InputEvent::Down);
        let lines = render(60, 20, &[], &session);
        assert_eq!(lines[17], "mounted at: /media/stick");
    }

    #[test]
    fn test_status_message() {
        let mut session = Session::new(Vec::new(), MountPolicy::default());
        session.handle(InputEvent::Enter);
        let lines = render(60, 20, &[], &session);
        assert_eq!(lines[5], "> No USB partitions found");
        assert_eq!(lines[19], "Selection is not a device");
    }

    #[test]
    fn test_list_scrolls_to_selection() {
        let records = (0..30)
            .map(|i| part(&format!("part{}", i), None, None))
            .collect();
        let mut session = Session::new(records, MountPolicy::default());
        for _ in 0..29 {
            session.handle(InputEvent::Down);
        }
        let lines = render(80, 24, &[], &session);

        // rows 5..19 hold the 14 visible entries, ending at the selection
        assert!(lines[5].starts_with("  /dev/part16  "));
        assert!(lines[18].starts_with("> /dev/part29  "));
        assert_eq!(lines.iter().filter(|l| l.starts_with('>')).count(), 1);
    }

    #[test]
    fn test_small_terminal_is_clipped() {
        let session = Session::new(
            vec![part("sdb1", Some("Backup"), None)],
            MountPolicy::default(),
        );
        let lines = render(10, 6, &usb_lines(), &session);
        assert_eq!(lines[0], "USB Storag");
        assert!(lines.iter().all(|l| l.chars().count() <= 10));

        // too small for most rows, but must not panic
        render(3, 2, &usb_lines(), &session);
        render(1, 1, &[], &session);
    }

    #[test]
    fn test_describe_error_row() {
        assert_eq!(
            describe(&Record::error("lsblk error: boom")),
            "lsblk error: boom"
        );
    }
}
