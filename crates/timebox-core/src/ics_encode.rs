//! ICS encoder — plan blocks out as an RFC 5545 calendar document.
//!
//! The output is meant to be re-importable by standard calendar
//! applications, so the wire details are exact requirements:
//!
//! - CRLF line terminators throughout
//! - UTC-normalized `DTSTART`/`DTEND`/`DTSTAMP` (`YYYYMMDD'T'HHMMSS'Z'`)
//! - RFC 5545 text escaping of `;`, `,`, `\` and newlines
//! - content lines over 75 octets folded with a one-space continuation
//! - one `DTSTAMP` per event equal to encode time, one globally unique
//!   `UID` per event even across repeated calls
//!
//! The CSV export path in [`crate::csv`] shares these routines but keeps
//! its own product identifier and UID scheme.

use chrono::Utc;

use crate::id::random_base36;
use crate::model::PlanBlock;
use crate::time::format_ics_utc;

/// Encode plan blocks as a complete ICS calendar document.
///
/// An empty slice yields a valid calendar with zero events; deciding that
/// there is "nothing to export" is the caller's concern.
pub fn generate_ics(blocks: &[PlanBlock]) -> String {
    let timestamp = format_ics_utc(Utc::now());

    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, "PRODID:-//Timebox//Timebox v0.1//EN");
    push_line(&mut out, "CALSCALE:GREGORIAN");
    push_line(&mut out, "METHOD:PUBLISH");

    for block in blocks {
        push_line(&mut out, "BEGIN:VEVENT");
        push_line(&mut out, &format!("UID:{}", plan_uid()));
        push_line(&mut out, &format!("DTSTAMP:{timestamp}"));
        push_line(&mut out, &format!("DTSTART:{}", format_ics_utc(block.start)));
        push_line(&mut out, &format!("DTEND:{}", format_ics_utc(block.end)));
        push_folded(&mut out, &format!("SUMMARY:{}", escape_text(&block.title)));
        if let Some(location) = &block.location {
            push_folded(&mut out, &format!("LOCATION:{}", escape_text(location)));
        }
        if let Some(notes) = &block.notes {
            push_folded(&mut out, &format!("DESCRIPTION:{}", escape_text(notes)));
        }
        push_line(&mut out, "STATUS:CONFIRMED");
        push_line(&mut out, "SEQUENCE:0");
        push_line(&mut out, "END:VEVENT");
    }

    push_line(&mut out, "END:VCALENDAR");
    out
}

/// UID for a plan-block export event:
/// `<millis>-<12 random base-36 chars>@timebox.app`, regenerated per event.
fn plan_uid() -> String {
    format!(
        "{}-{}@timebox.app",
        Utc::now().timestamp_millis(),
        random_base36(12)
    )
}

/// Append one content line with a CRLF terminator.
pub(crate) fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push_str("\r\n");
}

/// Fold and append a content line: the first physical line carries at most
/// 75 octets, each continuation a space plus at most 74 more. Splits on
/// character boundaries so multi-byte text is never cut mid-sequence.
pub(crate) fn push_folded(out: &mut String, line: &str) {
    let mut current = String::new();
    for ch in line.chars() {
        if current.len() + ch.len_utf8() > 75 {
            push_line(out, &current);
            current = String::from(" ");
        }
        current.push(ch);
    }
    push_line(out, &current);
}

/// RFC 5545 text escaping: backslash, semicolon, comma, and newlines.
/// CR/LF pairs collapse to a single escaped newline.
pub(crate) fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}
