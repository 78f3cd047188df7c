//! CSV codec — tabular schedule rows in, per-row validation out, plus
//! re-encoding of the valid rows as an ICS document.
//!
//! The reader is a hand-written record splitter: quoted fields, doubled
//! quotes inside quoted fields, newlines inside quoted fields, CRLF or
//! bare LF terminators, and empty-line skipping. Header names are
//! lowercased and trimmed before column matching.
//!
//! # Validation order (per row)
//!
//! 1. Schema — `title`, `start`, `end` must be present and non-empty; one
//!    `"<field>: <reason>"` error per violation. A schema failure skips
//!    the later stages for that row (avoids piling confusing messages on
//!    a row that is missing the field anyway).
//! 2. Format — `start` and `end` must each parse as a date/time, and a
//!    non-empty `timezone` must name a known IANA zone.
//! 3. Ordering — only when both instants parsed: `end` must be strictly
//!    after `start`.

use chrono::{TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, TimeboxError};
use crate::ics_encode::{escape_text, push_folded, push_line};
use crate::id::random_base36;
use crate::model::{CsvParseResult, ParsedCsvRow};
use crate::time::{format_ics_utc, parse_csv_datetime};

const REQUIRED_ERRORS: [(&str, &str); 3] = [
    ("title", "Title is required"),
    ("start", "Start time is required"),
    ("end", "End time is required"),
];

const FORMAT_HINT: &str = "Invalid date/time format (use ISO 8601: YYYY-MM-DDTHH:mm)";

/// Validate a CSV table against the schedule-row schema.
///
/// Never fails at the document level: an empty document simply yields
/// zero rows. Row numbering counts the header as row 1, so the first data
/// row reports `row_number == 2`.
pub fn parse_csv(content: &str) -> CsvParseResult {
    let mut records = split_records(content).into_iter();
    let header: Vec<String> = records
        .next()
        .unwrap_or_default()
        .iter()
        .map(|name| name.trim().to_lowercase())
        .collect();

    let mut rows: Vec<ParsedCsvRow> = Vec::new();
    let mut valid_count = 0;
    let mut invalid_count = 0;

    for (index, record) in records.enumerate() {
        let field = |name: &str| -> String {
            header
                .iter()
                .position(|h| h == name)
                .and_then(|col| record.get(col))
                .cloned()
                .unwrap_or_default()
        };

        let title = field("title");
        let start = field("start");
        let end = field("end");
        let timezone = field("timezone");

        let errors = validate_row(&title, &start, &end, &timezone);
        let is_valid = errors.is_empty();
        if is_valid {
            valid_count += 1;
        } else {
            invalid_count += 1;
        }

        rows.push(ParsedCsvRow {
            row_number: index + 2,
            title,
            start,
            end,
            location: non_empty(field("location")),
            description: non_empty(field("description")),
            timezone: non_empty(timezone),
            is_valid,
            errors,
        });
    }

    CsvParseResult {
        rows,
        valid_count,
        invalid_count,
        has_errors: invalid_count > 0,
    }
}

/// Run the three validation stages for one row.
fn validate_row(title: &str, start: &str, end: &str, timezone: &str) -> Vec<String> {
    let mut errors: Vec<String> = Vec::new();

    for (field, reason) in REQUIRED_ERRORS {
        let value = match field {
            "title" => title,
            "start" => start,
            _ => end,
        };
        if value.trim().is_empty() {
            errors.push(format!("{field}: {reason}"));
        }
    }
    if !errors.is_empty() {
        return errors;
    }

    let parsed_start = parse_csv_datetime(start);
    let parsed_end = parse_csv_datetime(end);
    if parsed_start.is_none() {
        errors.push(format!("start: {FORMAT_HINT}"));
    }
    if parsed_end.is_none() {
        errors.push(format!("end: {FORMAT_HINT}"));
    }
    if !timezone.trim().is_empty() && timezone.trim().parse::<Tz>().is_err() {
        errors.push("timezone: Unknown timezone".to_string());
    }

    if errors.is_empty() {
        if let (Some(s), Some(e)) = (parsed_start, parsed_end) {
            if e <= s {
                errors.push("End time must be after start time".to_string());
            }
        }
    }

    errors
}

/// Re-encode the valid rows of a parsed table as an ICS document.
///
/// Rows with a `timezone` value are interpreted in that zone; the rest in
/// `default_tz`. Shares the escaping/folding/UTC-format routines with the
/// plan-block encoder but keeps its own product identifier and UID scheme
/// (the two exports are deliberately distinct).
///
/// # Errors
///
/// Returns [`TimeboxError::NoValidRows`] when no valid rows remain —
/// silently emitting an empty-but-valid calendar would hide the mistake.
pub fn rows_to_ics(rows: &[ParsedCsvRow], default_tz: Tz) -> Result<String> {
    let valid: Vec<&ParsedCsvRow> = rows.iter().filter(|row| row.is_valid).collect();
    if valid.is_empty() {
        return Err(TimeboxError::NoValidRows);
    }

    let timestamp = format_ics_utc(Utc::now());

    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, "PRODID:-//Timebox//CSV Import//EN");
    push_line(&mut out, "CALSCALE:GREGORIAN");

    for row in valid {
        // Valid rows are guaranteed parseable; anything else would be a
        // validation bug, and skipping beats panicking in an encoder.
        let Some((start, end)) = row_interval(row, default_tz) else {
            continue;
        };

        push_line(&mut out, "BEGIN:VEVENT");
        push_line(&mut out, &format!("UID:{}", csv_uid()));
        push_line(&mut out, &format!("DTSTAMP:{timestamp}"));
        push_line(&mut out, &format!("DTSTART:{start}"));
        push_line(&mut out, &format!("DTEND:{end}"));
        push_folded(&mut out, &format!("SUMMARY:{}", escape_text(&row.title)));
        if let Some(location) = &row.location {
            push_folded(&mut out, &format!("LOCATION:{}", escape_text(location)));
        }
        if let Some(description) = &row.description {
            push_folded(
                &mut out,
                &format!("DESCRIPTION:{}", escape_text(description)),
            );
        }
        push_line(&mut out, "STATUS:CONFIRMED");
        push_line(&mut out, "SEQUENCE:0");
        push_line(&mut out, "END:VEVENT");
    }

    push_line(&mut out, "END:VCALENDAR");
    Ok(out)
}

/// UID for a CSV-derived event:
/// `<millis>-<9 random base-36 chars>@timebox.app`, regenerated per event.
fn csv_uid() -> String {
    format!(
        "{}-{}@timebox.app",
        Utc::now().timestamp_millis(),
        random_base36(9)
    )
}

/// Resolve one valid row's start/end to UTC ICS timestamps.
fn row_interval(row: &ParsedCsvRow, default_tz: Tz) -> Option<(String, String)> {
    let tz = row
        .timezone
        .as_deref()
        .and_then(|name| name.trim().parse::<Tz>().ok())
        .unwrap_or(default_tz);

    let start = tz
        .from_local_datetime(&parse_csv_datetime(&row.start)?)
        .earliest()?
        .with_timezone(&Utc);
    let end = tz
        .from_local_datetime(&parse_csv_datetime(&row.end)?)
        .earliest()?
        .with_timezone(&Utc);

    Some((format_ics_utc(start), format_ics_utc(end)))
}

/// `Some(value)` when non-empty after trimming, else `None`. Keeps absent
/// and blank optional columns indistinguishable downstream.
fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Split CSV content into records of fields.
///
/// Handles quoted fields (`"a, b"`), doubled quotes inside quoted fields
/// (`""` → `"`), newlines inside quoted fields, and CRLF terminators.
/// Records consisting of a single empty field (blank lines) are skipped.
fn split_records(content: &str) -> Vec<Vec<String>> {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = content.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(ch),
            }
            continue;
        }
        match ch {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                flush_record(&mut records, &mut record);
            }
            _ => field.push(ch),
        }
    }

    // Final record when the file has no trailing newline.
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        flush_record(&mut records, &mut record);
    }

    records
}

/// Push a completed record unless it is a blank line.
fn flush_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>) {
    let blank = record.len() == 1 && record[0].trim().is_empty();
    if !blank {
        records.push(std::mem::take(record));
    } else {
        record.clear();
    }
}
