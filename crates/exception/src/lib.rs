//! Display messages for numeric rejection codes returned by the server.
//!
//! Codes only mean something relative to the operation that produced them,
//! so lookups are keyed by `(Operation, code)`. Anything not in the table
//! renders as [`UNKNOWN`].

use serde::{Deserialize, Serialize};

/// Message returned when no mapping exists.
pub const UNKNOWN: &str = "unknown";

/// Client operations that can be rejected with a numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    KickMember,
    SetAdmin,
    SetTitle,
    SetCard,
    AddFriend,
    SendMessage,
    Recall,
}

const INSUFFICIENT_PERMISSION: &str = "insufficient permission";

static EXCEPTIONS: &[(Operation, &[(i32, &str)])] = &[
    (Operation::KickMember, &[(2, INSUFFICIENT_PERMISSION)]),
    (
        Operation::SetAdmin,
        &[
            (2, INSUFFICIENT_PERMISSION),
            (3, "member does not exist"),
            (7, INSUFFICIENT_PERMISSION),
        ],
    ),
    (Operation::SetTitle, &[(1013, INSUFFICIENT_PERMISSION)]),
    (Operation::SetCard, &[(1, INSUFFICIENT_PERMISSION)]),
    (
        Operation::AddFriend,
        &[
            (2, "the other side refused the request"),
            (3, "a correct answer to the verification question is required (unsupported)"),
            (101, "already friends"),
        ],
    ),
];

/// Returns the display message for `code` returned by `operation`.
///
/// Never fails: unmapped operations and unmapped codes both yield [`UNKNOWN`].
pub fn error_message(operation: Operation, code: i32) -> &'static str {
    EXCEPTIONS
        .iter()
        .find(|(op, _)| *op == operation)
        .and_then(|(_, codes)| codes.iter().find(|(c, _)| *c == code))
        .map_or(UNKNOWN, |&(_, message)| message)
}
