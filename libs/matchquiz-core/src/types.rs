//! Core types shared across the quiz modules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a draggable item for the lifetime of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

/// Identity of a topic box for the lifetime of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoxId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "box-{}", self.0)
    }
}

/// Hands out item and box ids. Never rewinds, so ids from an earlier
/// render can't alias anything on the current board.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_item(&mut self) -> ItemId {
        ItemId(self.bump())
    }

    pub fn next_box(&mut self) -> BoxId {
        BoxId(self.bump())
    }

    fn bump(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Outcome of evaluating a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
}

/// Where a pointer release landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "box_id")]
pub enum DropTarget {
    Box(BoxId),
    Outside,
}

impl From<Option<BoxId>> for DropTarget {
    fn from(target: Option<BoxId>) -> Self {
        match target {
            Some(id) => Self::Box(id),
            None => Self::Outside,
        }
    }
}

/// Running score for the current quiz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub correct: u32,
    pub wrong: u32,
}

impl ScoreState {
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Correct => self.correct += 1,
            Verdict::Incorrect => self.wrong += 1,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Tunables for a quiz session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Rows per error log page.
    pub page_size: usize,
    /// How long the surface should show the drop pulse.
    pub pulse_ms: u64,
    /// Language active before any switch completes.
    pub default_language: String,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            page_size: crate::error_log::DEFAULT_PAGE_SIZE,
            pulse_ms: 500,
            default_language: crate::i18n::BUILTIN_LANGUAGE.to_string(),
        }
    }
}
