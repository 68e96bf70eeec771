#![allow(dead_code)]

use hotel_ledger::application::engine::LedgerEngine;
use hotel_ledger::domain::command::{Command, JournalEntry};
use hotel_ledger::domain::identity::Caller;
use hotel_ledger::infrastructure::in_memory::in_memory_stores;
use serde_json::{Value, json};
use std::io::Write;
use tempfile::NamedTempFile;

pub fn desk() -> Caller {
    Caller {
        id: "u1".into(),
        email: "desk@hotel.test".into(),
        name: "Front Desk".into(),
    }
}

pub fn as_desk(command: Command) -> JournalEntry {
    JournalEntry {
        caller: Some(desk()),
        command,
    }
}

pub fn engine() -> LedgerEngine {
    LedgerEngine::new(in_memory_stores(), 5)
}

/// A journal line issued by the front desk.
pub fn line(op: &str, fields: Value) -> String {
    let mut object = fields;
    object["op"] = json!(op);
    object["caller"] = json!({"id": "u1", "email": "desk@hotel.test", "name": "Front Desk"});
    object.to_string()
}

pub fn write_journal(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}
