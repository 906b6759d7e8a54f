//! Belt ranks in progression order.

use serde::{Deserialize, Serialize};

/// A rank a student holds. Gates which lessons and questions they see.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Belt {
    #[default]
    White,
    Yellow,
    #[serde(rename = "Yellow 2")]
    Yellow2,
    Blue,
    Green,
    Purple,
    #[serde(rename = "Purple 2")]
    Purple2,
    Brown,
    #[serde(rename = "Brown 2(White)")]
    Brown2White,
    #[serde(rename = "Brown 3(Black)")]
    Brown3Black,
}

impl Belt {
    /// Every belt, in the order selection lists show them.
    pub const ALL: [Belt; 10] = [
        Belt::White,
        Belt::Yellow,
        Belt::Yellow2,
        Belt::Blue,
        Belt::Green,
        Belt::Purple,
        Belt::Purple2,
        Belt::Brown,
        Belt::Brown2White,
        Belt::Brown3Black,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Belt::White => "White",
            Belt::Yellow => "Yellow",
            Belt::Yellow2 => "Yellow 2",
            Belt::Blue => "Blue",
            Belt::Green => "Green",
            Belt::Purple => "Purple",
            Belt::Purple2 => "Purple 2",
            Belt::Brown => "Brown",
            Belt::Brown2White => "Brown 2(White)",
            Belt::Brown3Black => "Brown 3(Black)",
        }
    }
}
