// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn nobody_on_call_message_names_schedule_and_group() {
    let outcome =
        SyncOutcome::NobodyOnCall { schedule: "ops_schedule".into(), group: "oncall-pager".into() };
    let msg = outcome.to_string();
    assert!(msg.contains("[ops_schedule]"), "{msg}");
    assert!(msg.contains("[oncall-pager]"), "{msg}");
}

#[test]
fn updated_message_names_everything() {
    let outcome = SyncOutcome::Updated {
        group: "oncall-pager".into(),
        group_id: "G987".into(),
        user_id: "U123".into(),
        email: "alice@example.com".into(),
    };
    let msg = outcome.to_string();
    for part in ["oncall-pager", "G987", "U123", "alice@example.com"] {
        assert!(msg.contains(part), "missing {part} in {msg}");
    }
}
