// File: `crates/squares-core/src/lib.rs`
//! # squares-core
//!
//! Plain values shared by every layer of the squares board:
//! - [`CellKey`] and [`Cell`], with normalization of legacy payloads
//! - [`Board`], a read-only snapshot of the claimed cells
//! - [`Axis`] / [`Axes`] and the [`AxisGenerator`] that shuffles them
//! - [`Settings`] and [`Quarter`]
//! - [`Participant`] identity and name formatting
//!
//! Nothing in this crate performs I/O. Values are decoded from the JSON
//! subtrees pushed by the shared store and encoded back when written.

pub mod axis;
pub mod board;
pub mod cell;
pub mod error;
pub mod participant;
pub mod settings;

pub use axis::{Axes, Axis, AxisGenerator, AXIS_PLACEHOLDER};
pub use board::Board;
pub use cell::{Cell, CellKey, BOARD_SIZE, CELL_COUNT, DEFAULT_COLOR, DEFAULT_TEXT_COLOR};
pub use error::{CoreError, Result};
pub use participant::{format_name, random_color, Participant, MAX_NAME_LENGTH};
pub use settings::{
    validate_max_selections, Quarter, QuarterValues, Settings, DEFAULT_MAX_SELECTIONS,
    MAX_SELECTIONS_LIMIT,
};
