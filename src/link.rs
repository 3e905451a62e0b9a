//! Link records — the normalized result of every provider call.
//!
//! Providers talk to their application through an automation script
//! that prints one record per line, target and title separated by
//! [`FIELD_DELIMITER`]. [`parse_records`] turns that output into a
//! [`Grab`].

use serde::{Deserialize, Serialize};

/// Separator between target and title in automation output.
pub const FIELD_DELIMITER: &str = "::split::";

/// A single link: what to point at, and what to call it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// URI-like target (`https://`, `file://`, `message://`, `skim://`, ...).
    pub target: String,
    /// Free-form human-readable title.
    pub title: String,
}

impl LinkRecord {
    pub fn new(target: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            title: title.into(),
        }
    }
}

/// What a provider yields for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grab {
    /// Nothing to link (no document, tab, or selection).
    Absent,
    /// Exactly one link.
    One(LinkRecord),
    /// A multi-selection, in the application's selection order.
    Many(Vec<LinkRecord>),
}

impl Grab {
    /// Build a grab from parsed records: none → `Absent`, one → `One`.
    pub fn from_records(mut records: Vec<LinkRecord>) -> Self {
        match records.len() {
            0 => Grab::Absent,
            1 => Grab::One(records.remove(0)),
            _ => Grab::Many(records),
        }
    }

    /// Normalize to a non-empty sequence of records.
    ///
    /// Records with an empty target are dropped. Returns `None` when
    /// nothing is left, so an empty `Many` and `Absent` read the same.
    pub fn into_records(self) -> Option<Vec<LinkRecord>> {
        let records: Vec<LinkRecord> = match self {
            Grab::Absent => return None,
            Grab::One(record) => vec![record],
            Grab::Many(records) => records,
        };

        let records: Vec<LinkRecord> = records
            .into_iter()
            .filter(|r| !r.target.is_empty())
            .collect();

        if records.is_empty() {
            None
        } else {
            Some(records)
        }
    }
}

/// Parse automation output into a [`Grab`].
///
/// Each non-blank line is `target::split::title`. Only the first
/// delimiter splits, so a title may itself contain the delimiter. A
/// line without a delimiter is a bare target. Lines with an empty
/// target are skipped.
pub fn parse_records(output: &str) -> Grab {
    let records = output
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let (target, title) = line.split_once(FIELD_DELIMITER).unwrap_or((line, ""));
            let target = target.trim();
            if target.is_empty() {
                None
            } else {
                Some(LinkRecord::new(target, title))
            }
        })
        .collect();

    Grab::from_records(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_record() {
        let grab = parse_records("https://example.com::split::Example\n");
        assert_eq!(
            grab,
            Grab::One(LinkRecord::new("https://example.com", "Example"))
        );
    }

    #[test]
    fn parse_multiple_records_keeps_order() {
        let out = "file:///a::split::a\nfile:///b::split::b\nfile:///c::split::c\n";
        let Grab::Many(records) = parse_records(out) else {
            panic!("expected Many");
        };
        let targets: Vec<&str> = records.iter().map(|r| r.target.as_str()).collect();
        assert_eq!(targets, vec!["file:///a", "file:///b", "file:///c"]);
    }

    #[test]
    fn title_keeps_later_delimiters() {
        let grab = parse_records("x://1::split::left::split::right");
        assert_eq!(grab, Grab::One(LinkRecord::new("x://1", "left::split::right")));
    }

    #[test]
    fn bare_target_has_empty_title() {
        let grab = parse_records("terminal://ttys003");
        assert_eq!(grab, Grab::One(LinkRecord::new("terminal://ttys003", "")));
    }

    #[test]
    fn empty_output_is_absent() {
        assert_eq!(parse_records(""), Grab::Absent);
        assert_eq!(parse_records("\n  \n"), Grab::Absent);
    }

    #[test]
    fn empty_target_lines_skipped() {
        let grab = parse_records("::split::orphan title\nhttps://x/::split::X");
        assert_eq!(grab, Grab::One(LinkRecord::new("https://x/", "X")));
    }

    #[test]
    fn crlf_line_endings() {
        let grab = parse_records("https://x/::split::X\r\n");
        assert_eq!(grab, Grab::One(LinkRecord::new("https://x/", "X")));
    }

    #[test]
    fn into_records_absent_is_none() {
        assert!(Grab::Absent.into_records().is_none());
    }

    #[test]
    fn into_records_empty_many_is_none() {
        assert!(Grab::Many(Vec::new()).into_records().is_none());
    }

    #[test]
    fn into_records_drops_empty_targets() {
        let grab = Grab::Many(vec![
            LinkRecord::new("", "ghost"),
            LinkRecord::new("https://x/", "X"),
        ]);
        let records = grab.into_records().unwrap();
        assert_eq!(records, vec![LinkRecord::new("https://x/", "X")]);
    }

    #[test]
    fn into_records_single_empty_target_is_none() {
        assert!(Grab::One(LinkRecord::new("", "t")).into_records().is_none());
    }
}
