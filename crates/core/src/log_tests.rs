// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn info_constructor_sets_info_level() {
    let record = LogRecord::info(1, "hello", "sys.Print");
    assert_eq!(record.level, LogLevel::Info);
    assert_eq!(record.message, "hello");
    assert_eq!(record.source, "sys.Print");
}

#[test]
fn serde_round_trip_preserves_fields() {
    let record = LogRecord::info(42, "msg", "step1.Printf");
    let json = serde_json::to_string(&record).unwrap();
    let back: LogRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}
