/// Shared data structures for the rating session
///
/// These structs represent the data model that flows between
/// the scoring client and the UI layer.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A preference recorded by the rater
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Choice {
    A,
    B,
    /// The reference image
    C,
}

impl Choice {
    /// File name of the image for this choice inside a sample folder
    pub fn file_name(self) -> &'static str {
        match self {
            Choice::A => "A.png",
            Choice::B => "B.png",
            Choice::C => "C.png",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Choice::A => "A",
            Choice::B => "B",
            Choice::C => "C",
        };
        f.write_str(label)
    }
}

/// Which candidate sits in the top-left slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOrder {
    /// A on the left, B on the right
    Normal,
    /// B on the left, A on the right
    Inverted,
}

impl SlotOrder {
    /// Parse the service's `top_order` flag.
    /// Only `N` means normal; every other value is inverted.
    pub fn from_flag(flag: &str) -> Self {
        if flag == "N" {
            SlotOrder::Normal
        } else {
            SlotOrder::Inverted
        }
    }
}

/// A clickable position in the comparison grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    TopLeft,
    TopRight,
    /// Bottom slot, always the reference image
    Reference,
}

/// Which candidate each top slot displays
///
/// Built only from a `SlotOrder`, so the two top slots always show
/// different candidates and neither shows the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLayout {
    top_left: Choice,
    top_right: Choice,
}

impl SlotLayout {
    pub fn new(order: SlotOrder) -> Self {
        match order {
            SlotOrder::Normal => Self { top_left: Choice::A, top_right: Choice::B },
            SlotOrder::Inverted => Self { top_left: Choice::B, top_right: Choice::A },
        }
    }

    /// The choice a click on `slot` records
    pub fn choice_for(&self, slot: Slot) -> Choice {
        match slot {
            Slot::TopLeft => self.top_left,
            Slot::TopRight => self.top_right,
            Slot::Reference => Choice::C,
        }
    }
}

/// One comparison unit as reported by the scoring service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Asset directory key (e.g. "user-repo-commit-abc123")
    pub folder: String,
    /// 1-based position in the survey
    pub number: u32,
    pub order: SlotOrder,
}

impl Sample {
    pub fn layout(&self) -> SlotLayout {
        SlotLayout::new(self.order)
    }

    /// Label shown above the grid
    pub fn label(&self) -> String {
        format!("Sample {}", self.number)
    }

    /// Path of the image rendered in `slot`:
    /// `<root>/<folder>/coders/<A|B|C>.png`
    pub fn image_path(&self, root: &Path, slot: Slot) -> PathBuf {
        root.join(&self.folder)
            .join("coders")
            .join(self.layout().choice_for(slot).file_name())
    }
}
