//! Output formatting utilities.

use cesr_stream::{display_field, Event};

/// Formats an event body as pretty JSON.
pub fn format_json(event: &Event) -> String {
    serde_json::to_string_pretty(&event.ked).unwrap_or_else(|_| "{}".to_string())
}

/// Formats one event for the dump listing; `index` is zero-based.
pub fn format_event(index: usize, event: &Event) -> String {
    let mut out = format!(
        "\n### Event {}  (t={}  sn={})\n{}\n",
        index + 1,
        display_field(event.ilk()),
        display_field(event.sequence()),
        format_json(event)
    );
    if event.attachment_len > 0 {
        out.push_str(&format!("• attachment bytes: {}\n", event.attachment_len));
    }
    out
}
