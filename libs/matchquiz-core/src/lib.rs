//! Core matching-quiz library used by the desktop shell.
//!
//! Provides:
//! - Taxonomy loading with minimal shape checks
//! - Drag item flattening and shuffling, topic box construction
//! - Drag/drop state machine with scoring
//! - Wrong-answer log with newest-first pagination
//! - Translation lookup with a built-in fallback
//! - The `QuizSession` controller and its rendering-surface protocol

pub mod engine;
pub mod error;
pub mod error_log;
pub mod i18n;
pub mod session;
pub mod shuffle;
pub mod surface;
pub mod taxonomy;
pub mod types;

pub use engine::{evaluate_drop, DragMatchEngine, DragState, DropResolution};
pub use error::{LocaleError, TaxonomyError};
pub use error_log::{ErrorLog, LogPage, LogPager, LogRow, WrongLogEntry, DEFAULT_PAGE_SIZE};
pub use i18n::{is_valid_code, LocaleOrigin, LocaleRequest, Localizer, Translations, CHROME_KEYS};
pub use session::{QuizSession, SessionState};
pub use shuffle::{build_drag_items, build_topic_boxes, Board, DragItem, PlacedItem, TopicBox};
pub use surface::{
    BoxView, InfoView, ItemView, LogRowView, LogView, PlacedView, Region, Surface, SurfaceOp,
};
pub use taxonomy::{display_title, Subtopic, Taxonomy, Topic, TopicGroup};
pub use types::{BoxId, DropTarget, IdAllocator, ItemId, QuizConfig, ScoreState, Verdict};
