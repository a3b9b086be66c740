//! Commands sent to whatever draws the quiz.
//!
//! The session never touches a UI directly. It pushes `SurfaceOp`s into a
//! `Surface`; the desktop shell forwards them to the webview, and tests
//! collect them in a `Vec`.

use crate::types::{BoxId, ItemId, Verdict};
use serde::Serialize;

/// Independently updatable areas of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Subject,
    SubtopicsLabel,
    TopicsLabel,
    CorrectCount,
    WrongCount,
    DragSource,
    DropTargets,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub id: ItemId,
    pub name: String,
}

/// Info button contents for a topic with a key or comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoView {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoxView {
    pub id: BoxId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<InfoView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedView {
    pub id: ItemId,
    pub name: String,
    /// Whether clicking it opens a detail overlay.
    pub has_detail: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRowView {
    pub label: usize,
    pub subtopic: String,
    pub dropped_into: String,
    pub correct_topic: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LogView {
    Empty {
        title: String,
        message: String,
    },
    Table {
        title: String,
        headers: Vec<String>,
        rows: Vec<LogRowView>,
        page: usize,
        total_pages: usize,
        page_label: String,
        previous: String,
        next: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum SurfaceOp {
    SetText { region: Region, text: String },
    /// Text of an element tagged with a translation key.
    SetLabel { key: String, text: String },
    Clear { region: Region },
    AppendItem { item: ItemView },
    RemoveItem { item: ItemId },
    AppendBox { topic_box: BoxView },
    /// Insert a matched item as child `index` of the box's placed list.
    PlaceItem { box_id: BoxId, index: usize, item: PlacedView },
    Highlight { box_id: BoxId, active: bool },
    /// Transient feedback; the surface clears it after `duration_ms`.
    Pulse { box_id: BoxId, verdict: Verdict, duration_ms: u64 },
    ShowOverlay { title: String, body: String },
    ShowLog { view: LogView },
    ShowHelp { title: String, body: String },
    Alert { message: String },
}

/// Sink for rendering commands.
pub trait Surface {
    fn apply(&mut self, op: SurfaceOp);
}

impl Surface for Vec<SurfaceOp> {
    fn apply(&mut self, op: SurfaceOp) {
        self.push(op);
    }
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn apply(&mut self, op: SurfaceOp) {
        (**self).apply(op);
    }
}
