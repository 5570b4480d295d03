//! Store layout.
//!
//! ```text
//! board/<row>-<col>            cell record (or legacy bare name)
//! axes/top, axes/left          ten digits each
//! locks/<name>                 true once the participant has locked in (name percent-encoded)
//! settings/maxSelections       integer 1..=100
//! settings/boardLocked         bool
//! settings/winners/<quarter>   string
//! settings/scores/<quarter>    string
//! ```

use squares_core::{CellKey, Quarter};
use squares_store::StorePath;

fn top(segment: &str) -> StorePath {
    StorePath::root().child(segment)
}

pub fn board() -> StorePath {
    top("board")
}

pub fn cell(key: &CellKey) -> StorePath {
    board().child(key.to_string())
}

pub fn axes() -> StorePath {
    top("axes")
}

pub fn locks() -> StorePath {
    top("locks")
}

/// Lock flag for `name`. Names may contain `/`, so the segment is encoded.
pub fn lock(name: &str) -> StorePath {
    locks().child(urlencoding::encode(name).into_owned())
}

/// Participant name behind a `locks` segment.
pub fn lock_owner(segment: &str) -> Option<String> {
    urlencoding::decode(segment).ok().map(|name| name.into_owned())
}

pub fn settings() -> StorePath {
    top("settings")
}

pub fn max_selections() -> StorePath {
    settings().child("maxSelections")
}

pub fn board_locked() -> StorePath {
    settings().child("boardLocked")
}

pub fn winners() -> StorePath {
    settings().child("winners")
}

pub fn winner(quarter: Quarter) -> StorePath {
    winners().child(quarter.as_str())
}

pub fn scores() -> StorePath {
    settings().child("scores")
}

pub fn score(quarter: Quarter) -> StorePath {
    scores().child(quarter.as_str())
}
