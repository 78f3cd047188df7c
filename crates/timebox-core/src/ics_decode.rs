//! ICS (RFC 5545 subset) decoder — busy events for one target day.
//!
//! The decoder is a hand-written line parser over the unfolded content
//! lines of a calendar document. It recognizes `VCALENDAR` containing
//! `VEVENT` components and, per event, the `SUMMARY`, `LOCATION`,
//! `DTSTART` and `DTEND` properties plus the recurrence and date-only
//! indicators.
//!
//! # Policies (deliberate, not bugs)
//!
//! - **Recurring events are never expanded** — any event carrying an
//!   `RRULE` or `RDATE` is skipped with a `"Recurring event: <title>"`
//!   reason.
//! - **All-day events are skipped** — a date-only `DTSTART` yields an
//!   `"All-day event: <title>"` reason.
//! - **Day filter is silent** — events whose start falls outside the
//!   target local day are simply dropped, with no reason line. They still
//!   count into `ignored_count`, which is `total_events - events.len()`
//!   by definition, so `ignored_count` can exceed `ignored_reasons.len()`.
//! - **Per-event failures never abort the decode** — a malformed event
//!   contributes a `"Parse error: ..."` reason and processing continues.
//!   Only a broken container (no `VCALENDAR`, unterminated `VEVENT`) is
//!   fatal.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, TimeboxError};
use crate::model::{BusyEvent, EventSource, IcsParseResult};
use crate::time::is_within_day;

/// Decode an ICS document into the busy events of one local day.
///
/// `tz` defines what "the target day" means: an event survives only if
/// its start instant falls within `[midnight, next midnight)` of
/// `target_date` in `tz`.
///
/// # Errors
///
/// Returns [`TimeboxError::IcsParse`] only when the document cannot be
/// interpreted as a calendar container at all. Everything event-level is
/// recoverable and reported through `ignored_reasons`.
pub fn parse_ics(content: &str, target_date: NaiveDate, tz: Tz) -> Result<IcsParseResult> {
    let lines = unfold_lines(content);
    let components = collect_vevents(&lines)?;
    let total_events = components.len();

    let mut events: Vec<BusyEvent> = Vec::new();
    let mut ignored_reasons: Vec<String> = Vec::new();

    for component in &components {
        match decode_event(component, tz) {
            DecodedEvent::Busy(event) => {
                // Events for other days are dropped without a reason line.
                if is_within_day(event.start, target_date, tz) {
                    events.push(event);
                }
            }
            DecodedEvent::Skipped(reason) => ignored_reasons.push(reason),
        }
    }

    let ignored_count = total_events - events.len();
    Ok(IcsParseResult {
        events,
        total_events,
        ignored_count,
        ignored_reasons,
    })
}

/// Outcome of decoding a single VEVENT component.
enum DecodedEvent {
    /// A concrete, timed event (not yet day-filtered).
    Busy(BusyEvent),
    /// Excluded by policy or unparseable; carries the reason line.
    Skipped(String),
}

/// One unfolded content line split into name, parameters, and value.
struct Property {
    name: String,
    params: Vec<(String, String)>,
    value: String,
}

/// Unfold content lines: a line beginning with a space or horizontal tab
/// continues the previous line (RFC 5545 §3.1). Accepts CRLF or bare LF.
fn unfold_lines(content: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in content.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        if let Some(rest) = raw.strip_prefix(' ').or_else(|| raw.strip_prefix('\t')) {
            if let Some(last) = lines.last_mut() {
                last.push_str(rest);
                continue;
            }
        }
        if !raw.is_empty() {
            lines.push(raw.to_string());
        }
    }
    lines
}

/// Scan the unfolded lines for the VCALENDAR container and collect the
/// properties of each VEVENT inside it.
///
/// Fatal errors: no `BEGIN:VCALENDAR`, no `END:VCALENDAR`, or a
/// `BEGIN:VEVENT` with no matching `END:VEVENT`.
fn collect_vevents(lines: &[String]) -> Result<Vec<Vec<Property>>> {
    if !lines.iter().any(|l| l.eq_ignore_ascii_case("BEGIN:VCALENDAR")) {
        return Err(TimeboxError::IcsParse("missing BEGIN:VCALENDAR".to_string()));
    }
    if !lines.iter().any(|l| l.eq_ignore_ascii_case("END:VCALENDAR")) {
        return Err(TimeboxError::IcsParse("missing END:VCALENDAR".to_string()));
    }

    let mut components: Vec<Vec<Property>> = Vec::new();
    let mut current: Option<Vec<Property>> = None;

    for line in lines {
        if line.eq_ignore_ascii_case("BEGIN:VEVENT") {
            if current.is_some() {
                return Err(TimeboxError::IcsParse("nested BEGIN:VEVENT".to_string()));
            }
            current = Some(Vec::new());
        } else if line.eq_ignore_ascii_case("END:VEVENT") {
            match current.take() {
                Some(props) => components.push(props),
                None => {
                    return Err(TimeboxError::IcsParse(
                        "END:VEVENT without BEGIN:VEVENT".to_string(),
                    ))
                }
            }
        } else if let Some(props) = current.as_mut() {
            if let Some(prop) = parse_property(line) {
                props.push(prop);
            }
        }
    }

    if current.is_some() {
        return Err(TimeboxError::IcsParse("unterminated VEVENT".to_string()));
    }
    Ok(components)
}

/// Split a content line `NAME;PARAM=VAL;...:VALUE` into its parts.
/// Names and parameter names are uppercased for matching.
fn parse_property(line: &str) -> Option<Property> {
    let colon = line.find(':')?;
    let (head, value) = (&line[..colon], &line[colon + 1..]);

    let mut segments = head.split(';');
    let name = segments.next()?.trim().to_ascii_uppercase();
    if name.is_empty() {
        return None;
    }

    let params = segments
        .filter_map(|segment| {
            let (key, val) = segment.split_once('=')?;
            Some((key.trim().to_ascii_uppercase(), val.trim().to_string()))
        })
        .collect();

    Some(Property {
        name,
        params,
        value: value.to_string(),
    })
}

/// Decode one VEVENT's properties into a busy event or a skip reason.
fn decode_event(props: &[Property], tz: Tz) -> DecodedEvent {
    let mut summary: Option<String> = None;
    let mut location: Option<String> = None;
    let mut dtstart: Option<&Property> = None;
    let mut dtend: Option<&Property> = None;
    let mut recurring = false;

    for prop in props {
        match prop.name.as_str() {
            "SUMMARY" => summary = Some(unescape_text(&prop.value)),
            "LOCATION" => location = Some(unescape_text(&prop.value)),
            "DTSTART" => dtstart = Some(prop),
            "DTEND" => dtend = Some(prop),
            "RRULE" | "RDATE" => recurring = true,
            _ => {}
        }
    }

    let title = summary.unwrap_or_else(|| "Untitled Event".to_string());

    // Recurrence is checked before the all-day policy, so a recurring
    // all-day event is reported as recurring.
    if recurring {
        return DecodedEvent::Skipped(format!("Recurring event: {title}"));
    }

    let Some(start_prop) = dtstart else {
        return DecodedEvent::Skipped("Parse error: missing DTSTART".to_string());
    };

    if is_date_only(start_prop) {
        return DecodedEvent::Skipped(format!("All-day event: {title}"));
    }

    let start = match parse_datetime(start_prop, tz) {
        Ok(instant) => instant,
        Err(reason) => return DecodedEvent::Skipped(format!("Parse error: {reason}")),
    };
    let end = match dtend {
        Some(prop) => match parse_datetime(prop, tz) {
            Ok(instant) => instant,
            Err(reason) => return DecodedEvent::Skipped(format!("Parse error: {reason}")),
        },
        // No DTEND (and DURATION is out of scope): zero-length event.
        None => start,
    };

    let id = content_hash(&format!(
        "{}-{}-{}",
        start.to_rfc3339(),
        end.to_rfc3339(),
        title
    ));

    DecodedEvent::Busy(BusyEvent {
        id,
        title,
        start,
        end,
        location: location.filter(|l| !l.is_empty()),
        source: EventSource::Ics,
        all_day: false,
    })
}

/// A property is date-only when it carries `VALUE=DATE` or its value is a
/// bare 8-digit date.
fn is_date_only(prop: &Property) -> bool {
    let flagged = prop
        .params
        .iter()
        .any(|(key, val)| key == "VALUE" && val.eq_ignore_ascii_case("DATE"));
    let bare_date = prop.value.len() == 8 && prop.value.bytes().all(|b| b.is_ascii_digit());
    flagged || bare_date
}

/// Resolve a DTSTART/DTEND value to an absolute instant.
///
/// Three forms are recognized:
/// - `...Z` suffix — already UTC
/// - `TZID=<iana>` parameter — interpreted in that zone via chrono-tz
/// - floating (neither) — interpreted in the caller's `tz`
fn parse_datetime(prop: &Property, tz: Tz) -> std::result::Result<DateTime<Utc>, String> {
    let value = prop.value.trim();

    if let Some(utc_part) = value.strip_suffix('Z') {
        let naive = parse_ics_naive(utc_part)?;
        return Ok(Utc.from_utc_datetime(&naive));
    }

    let zone = match prop.params.iter().find(|(key, _)| key == "TZID") {
        Some((_, tzid)) => tzid
            .parse::<Tz>()
            .map_err(|_| format!("unknown timezone {tzid}"))?,
        None => tz,
    };

    let naive = parse_ics_naive(value)?;
    zone.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("nonexistent local time {value}"))
}

/// Parse the bare `YYYYMMDDTHHMMSS` form used by ICS date-times.
fn parse_ics_naive(value: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S")
        .map_err(|_| format!("invalid date-time {value}"))
}

/// Reverse RFC 5545 text escaping: `\n`, `\,`, `\;`, `\\`.
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(',') => out.push(','),
            Some(';') => out.push(';'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Deterministic content hash for busy-event identity: the classic 32-bit
/// shift-subtract string hash, rendered in signed base-36. Stability
/// across re-imports is the only requirement; this is not a
/// compatibility-critical algorithm.
fn content_hash(input: &str) -> String {
    let mut hash: i32 = 0;
    for ch in input.chars() {
        hash = hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(ch as i32);
    }
    to_base36(hash)
}

/// Render a signed 32-bit value in lowercase base-36.
fn to_base36(value: i32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut magnitude = i64::from(value).unsigned_abs();
    let mut digits: Vec<char> = Vec::new();
    while magnitude > 0 {
        digits.push(char::from(DIGITS[(magnitude % 36) as usize]));
        magnitude /= 36;
    }
    let mut out = String::new();
    if value < 0 {
        out.push('-');
    }
    out.extend(digits.iter().rev());
    out
}
