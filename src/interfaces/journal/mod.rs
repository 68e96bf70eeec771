use crate::domain::command::JournalEntry;
use crate::error::{LedgerError, Result};
use std::io::BufRead;

/// Reads journal entries from a JSON Lines source.
///
/// Each non-blank line is one entry. A line that fails to parse yields an
/// error for that line only; later lines are still read.
pub struct JournalReader<R: BufRead> {
    source: R,
}

impl<R: BufRead> JournalReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Returns an iterator that lazily reads and deserializes entries, paired
    /// with their 1-based line number.
    pub fn entries(self) -> impl Iterator<Item = (usize, Result<JournalEntry>)> {
        self.source
            .lines()
            .enumerate()
            .filter(|(_, line)| !matches!(line, Ok(text) if text.trim().is_empty()))
            .map(|(index, line)| {
                let entry = line
                    .map_err(LedgerError::from)
                    .and_then(|text| serde_json::from_str(&text).map_err(LedgerError::from));
                (index + 1, entry)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::command::Command;

    #[test]
    fn test_reader_valid_stream() {
        let data = concat!(
            r#"{"caller":{"id":"u1","email":"a@b.c","name":"Desk"},"op":"create_member","id":"m1","name":"Ada"}"#,
            "\n\n",
            r#"{"op":"earn_points","member":"m1","points":10}"#,
            "\n",
        );
        let reader = JournalReader::new(data.as_bytes());
        let results: Vec<_> = reader.entries().collect();

        assert_eq!(results.len(), 2);
        let (line, first) = &results[0];
        assert_eq!(*line, 1);
        assert!(matches!(
            first.as_ref().unwrap().command,
            Command::CreateMember { .. }
        ));
        assert_eq!(results[1].0, 3);
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "{not json}\n{\"op\":\"delete_bill\",\"id\":\"b1\"}\n";
        let reader = JournalReader::new(data.as_bytes());
        let results: Vec<_> = reader.entries().collect();

        assert!(matches!(results[0].1, Err(LedgerError::Journal(_))));
        assert!(results[1].1.is_ok());
    }
}
