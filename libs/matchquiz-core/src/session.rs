//! Quiz controller.
//!
//! `QuizSession` owns everything one page load needs and turns UI events
//! into engine calls and `SurfaceOp`s. Handlers run one at a time; the host
//! is responsible for serializing them.

use crate::engine::{DragMatchEngine, DropResolution};
use crate::error::{LocaleError, TaxonomyError};
use crate::error_log::{ErrorLog, LogPager};
use crate::i18n::{LocaleOrigin, LocaleRequest, Localizer, Translations, CHROME_KEYS};
use crate::shuffle::{DragItem, PlacedItem, TopicBox};
use crate::surface::{
    BoxView, InfoView, ItemView, LogRowView, LogView, PlacedView, Region, Surface, SurfaceOp,
};
use crate::taxonomy::Taxonomy;
use crate::types::{BoxId, DropTarget, ItemId, QuizConfig, ScoreState, Verdict};
use chrono::{Local, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;

/// Score and wrong-answer history for the current round.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub score: ScoreState,
    pub log: ErrorLog,
}

impl SessionState {
    pub fn reset(&mut self) {
        self.score.reset();
        self.log.clear();
    }
}

pub struct QuizSession {
    config: QuizConfig,
    taxonomy: Option<Taxonomy>,
    engine: DragMatchEngine,
    state: SessionState,
    pager: LogPager,
    /// The error log is on screen and follows page and language changes.
    log_open: bool,
    localizer: Localizer,
    rng: StdRng,
}

impl QuizSession {
    pub fn new(config: QuizConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Deterministic shuffles, for tests and replays.
    pub fn with_seed(config: QuizConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: QuizConfig, rng: StdRng) -> Self {
        Self {
            pager: LogPager::new(config.page_size),
            log_open: false,
            localizer: Localizer::new(config.default_language.clone()),
            config,
            taxonomy: None,
            engine: DragMatchEngine::new(),
            state: SessionState::default(),
            rng,
        }
    }

    pub fn taxonomy(&self) -> Option<&Taxonomy> {
        self.taxonomy.as_ref()
    }

    pub fn engine(&self) -> &DragMatchEngine {
        &self.engine
    }

    pub fn score(&self) -> ScoreState {
        self.state.score
    }

    pub fn log(&self) -> &ErrorLog {
        &self.state.log
    }

    pub fn language(&self) -> &str {
        self.localizer.language()
    }

    pub fn translate(&self, key: &str) -> String {
        self.localizer.translate(key)
    }

    /// Repaint everything from current state.
    pub fn render(&self, surface: &mut impl Surface) {
        self.render_labels(surface);
        self.render_headers(surface);
        self.render_score(surface);
        self.render_board(surface);
    }

    /// Load taxonomy file contents. On failure the user is alerted and
    /// nothing else changes.
    pub fn load_taxonomy(
        &mut self,
        content: &str,
        surface: &mut impl Surface,
    ) -> Result<(), TaxonomyError> {
        let taxonomy = Taxonomy::from_json_str(content);
        self.accept(taxonomy, surface)
    }

    pub fn load_value(
        &mut self,
        raw: &Value,
        surface: &mut impl Surface,
    ) -> Result<(), TaxonomyError> {
        let taxonomy = Taxonomy::load(raw);
        self.accept(taxonomy, surface)
    }

    pub fn load_sample(&mut self, surface: &mut impl Surface) {
        self.install(Taxonomy::sample(), surface);
    }

    fn accept(
        &mut self,
        taxonomy: Result<Taxonomy, TaxonomyError>,
        surface: &mut impl Surface,
    ) -> Result<(), TaxonomyError> {
        match taxonomy {
            Ok(taxonomy) => {
                self.install(taxonomy, surface);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "rejected taxonomy file");
                surface.apply(SurfaceOp::Alert {
                    message: self.translate("invalid_file"),
                });
                Err(e)
            }
        }
    }

    fn install(&mut self, taxonomy: Taxonomy, surface: &mut impl Surface) {
        tracing::info!(
            subject = %taxonomy.subject,
            topics = taxonomy.topics.values.len(),
            subtopics = taxonomy.subtopic_count(),
            "taxonomy loaded"
        );
        self.taxonomy = Some(taxonomy);
        self.restart(surface);
    }

    /// Zero the score, clear the log and deal a fresh board.
    pub fn restart(&mut self, surface: &mut impl Surface) {
        self.state.reset();
        self.log_open = false;
        self.pager.reset();
        match &self.taxonomy {
            Some(taxonomy) => {
                self.engine.deal(taxonomy, &mut self.rng);
            }
            None => self.engine.clear(),
        }
        self.render(surface);
    }

    pub fn begin_drag(&mut self, item: ItemId) -> bool {
        self.engine.begin_drag(item)
    }

    pub fn end_drag(&mut self) {
        self.engine.end_drag();
    }

    /// Pointer entered a box while dragging.
    pub fn hover_box(&self, box_id: BoxId, surface: &mut impl Surface) {
        if self.engine.board().topic_box(box_id).is_some() {
            surface.apply(SurfaceOp::Highlight { box_id, active: true });
        }
    }

    /// Pointer left a box.
    pub fn leave_box(&self, box_id: BoxId, surface: &mut impl Surface) {
        if self.engine.board().topic_box(box_id).is_some() {
            surface.apply(SurfaceOp::Highlight { box_id, active: false });
        }
    }

    /// Resolve a complete gesture: `item` released at `target`. The drag
    /// state is not consulted, so a late or missing `begin_drag` from the
    /// host cannot lose the drop.
    pub fn drop_item(
        &mut self,
        item: ItemId,
        target: DropTarget,
        surface: &mut impl Surface,
    ) -> Option<Verdict> {
        if self.engine.begin_drag(item) {
            return self.drop_on(target, surface);
        }
        self.engine.end_drag();
        if let DropTarget::Box(box_id) = target {
            self.leave_box(box_id, surface);
        }
        None
    }

    /// Resolve a pointer release at `target`.
    pub fn drop_on(&mut self, target: DropTarget, surface: &mut impl Surface) -> Option<Verdict> {
        if let DropTarget::Box(box_id) = target {
            self.leave_box(box_id, surface);
        }

        let resolution = self.engine.drop_on(target, &mut self.state, Utc::now())?;
        match resolution {
            DropResolution::Correct { item, box_id, index } => {
                surface.apply(SurfaceOp::RemoveItem { item });
                if let Some(placed) = self.engine.board().placed_item(item) {
                    surface.apply(SurfaceOp::PlaceItem {
                        box_id,
                        index,
                        item: placed_view(placed),
                    });
                }
                surface.apply(SurfaceOp::SetText {
                    region: Region::CorrectCount,
                    text: self.state.score.correct.to_string(),
                });
            }
            DropResolution::Incorrect { .. } => {
                surface.apply(SurfaceOp::SetText {
                    region: Region::WrongCount,
                    text: self.state.score.wrong.to_string(),
                });
            }
        }
        surface.apply(SurfaceOp::Pulse {
            box_id: resolution.box_id(),
            verdict: resolution.verdict(),
            duration_ms: self.config.pulse_ms,
        });

        if self.engine.board().is_complete() {
            tracing::info!(score = ?self.state.score, "all items placed");
        }
        Some(resolution.verdict())
    }

    /// Show the detail overlay for a placed item. Items without a comment
    /// have nothing to show.
    pub fn open_detail(&mut self, item: ItemId, surface: &mut impl Surface) -> bool {
        match self.engine.placed_detail(item) {
            Some((title, body)) => {
                self.log_open = false;
                surface.apply(SurfaceOp::ShowOverlay { title, body });
                true
            }
            None => false,
        }
    }

    /// The overlay (log, detail or help) was dismissed.
    pub fn close_overlay(&mut self) {
        self.log_open = false;
    }

    /// Show the current page of the wrong-answer log.
    pub fn show_error_log(&mut self, surface: &mut impl Surface) {
        self.log_open = true;
        surface.apply(SurfaceOp::ShowLog {
            view: self.log_view(),
        });
    }

    /// Switch log page; out-of-range pages leave everything as it was.
    pub fn change_log_page(&mut self, page: usize, surface: &mut impl Surface) -> bool {
        if !self.pager.change_page(page, &self.state.log) {
            return false;
        }
        self.show_error_log(surface);
        true
    }

    pub fn log_page(&self) -> usize {
        self.pager.current()
    }

    /// Start a language switch. Fetch the map for `request.code` and pass
    /// the result to `complete_language_switch`.
    pub fn begin_language_switch(&mut self, code: impl Into<String>) -> LocaleRequest {
        self.localizer.begin_switch(code)
    }

    /// Install fetched (or failed) translations and repaint text. Score and
    /// log are untouched. Stale requests are ignored.
    pub fn complete_language_switch(
        &mut self,
        request: LocaleRequest,
        fetched: Result<Translations, LocaleError>,
        surface: &mut impl Surface,
    ) -> Option<LocaleOrigin> {
        let origin = self.localizer.complete_switch(request, fetched)?;
        self.render_labels(surface);
        self.render_headers(surface);
        // Box info falls back to translated text.
        self.render_drop_targets(surface);
        if self.log_open {
            surface.apply(SurfaceOp::ShowLog {
                view: self.log_view(),
            });
        }
        Some(origin)
    }

    fn render_labels(&self, surface: &mut impl Surface) {
        for key in CHROME_KEYS {
            surface.apply(SurfaceOp::SetLabel {
                key: key.to_string(),
                text: self.translate(key),
            });
        }
    }

    fn render_headers(&self, surface: &mut impl Surface) {
        match &self.taxonomy {
            Some(taxonomy) => {
                surface.apply(SurfaceOp::SetText {
                    region: Region::Subject,
                    text: taxonomy.subject.clone(),
                });
                surface.apply(SurfaceOp::SetText {
                    region: Region::SubtopicsLabel,
                    text: taxonomy.subtopics_label.clone(),
                });
                surface.apply(SurfaceOp::SetText {
                    region: Region::TopicsLabel,
                    text: taxonomy.topics.name.clone(),
                });
            }
            None => surface.apply(SurfaceOp::ShowHelp {
                title: self.translate("help_title"),
                body: self.translate("help_body"),
            }),
        }
    }

    fn render_score(&self, surface: &mut impl Surface) {
        surface.apply(SurfaceOp::SetText {
            region: Region::CorrectCount,
            text: self.state.score.correct.to_string(),
        });
        surface.apply(SurfaceOp::SetText {
            region: Region::WrongCount,
            text: self.state.score.wrong.to_string(),
        });
    }

    fn render_board(&self, surface: &mut impl Surface) {
        surface.apply(SurfaceOp::Clear {
            region: Region::DragSource,
        });
        for item in self.engine.board().pool_items() {
            surface.apply(SurfaceOp::AppendItem {
                item: item_view(item),
            });
        }
        self.render_drop_targets(surface);
    }

    fn render_drop_targets(&self, surface: &mut impl Surface) {
        surface.apply(SurfaceOp::Clear {
            region: Region::DropTargets,
        });
        for topic_box in self.engine.board().boxes() {
            surface.apply(SurfaceOp::AppendBox {
                topic_box: self.box_view(topic_box),
            });
            for (index, placed) in topic_box.placed.iter().enumerate() {
                surface.apply(SurfaceOp::PlaceItem {
                    box_id: topic_box.id,
                    index,
                    item: placed_view(placed),
                });
            }
        }
    }

    fn box_view(&self, topic_box: &TopicBox) -> BoxView {
        let info = if topic_box.key.is_some() || topic_box.comment.is_some() {
            Some(InfoView {
                title: topic_box.title(),
                body: topic_box
                    .comment
                    .clone()
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| self.translate("no_description")),
            })
        } else {
            None
        };

        BoxView {
            id: topic_box.id,
            title: topic_box.topic_name.clone(),
            info,
        }
    }

    fn log_view(&self) -> LogView {
        let title = self.translate("error_log_title");
        if self.state.log.is_empty() {
            return LogView::Empty {
                title,
                message: self.translate("no_errors"),
            };
        }

        let page = self.pager.page(&self.state.log);
        let rows = page
            .rows
            .iter()
            .map(|row| LogRowView {
                label: row.label,
                subtopic: row.entry.subtopic_name.clone(),
                dropped_into: row.entry.dropped_into.clone(),
                correct_topic: row.entry.correct_topic.clone(),
                time: row
                    .entry
                    .timestamp
                    .with_timezone(&Local)
                    .format("%H:%M:%S")
                    .to_string(),
            })
            .collect();

        LogView::Table {
            title,
            headers: [
                "col_index",
                "col_subtopic",
                "col_dropped_into",
                "col_correct_topic",
                "col_time",
            ]
            .iter()
                .map(|key| self.translate(key))
                .collect(),
            rows,
            page: page.page,
            total_pages: page.total_pages,
            page_label: self.localizer.translate_with(
                "page_of",
                &[
                    ("page", page.page.to_string()),
                    ("total", page.total_pages.to_string()),
                ],
            ),
            previous: self.translate("previous"),
            next: self.translate("next"),
        }
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new(QuizConfig::default())
    }
}

fn item_view(item: &DragItem) -> ItemView {
    ItemView {
        id: item.id,
        name: item.display_name.clone(),
    }
}

fn placed_view(placed: &PlacedItem) -> PlacedView {
    PlacedView {
        id: placed.id,
        name: placed.display_name.clone(),
        has_detail: placed.comment.as_deref().is_some_and(|c| !c.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> QuizSession {
        QuizSession::with_seed(QuizConfig::default(), 42)
    }

    #[test]
    fn empty_session_shows_help() {
        let session = session();
        let mut ops: Vec<SurfaceOp> = Vec::new();
        session.render(&mut ops);

        assert!(ops.iter().any(|op| matches!(
            op,
            SurfaceOp::ShowHelp { title, .. } if title == "Como jogar"
        )));
        assert!(!ops.iter().any(|op| matches!(op, SurfaceOp::AppendItem { .. })));
    }

    #[test]
    fn labels_cover_every_chrome_key() {
        let session = session();
        let mut ops: Vec<SurfaceOp> = Vec::new();
        session.render(&mut ops);
        let labels = ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::SetLabel { .. }))
            .count();
        assert_eq!(labels, CHROME_KEYS.len());
    }

    #[test]
    fn sample_renders_headers_items_and_boxes() {
        let mut session = session();
        let mut ops: Vec<SurfaceOp> = Vec::new();
        session.load_sample(&mut ops);

        assert!(ops.contains(&SurfaceOp::SetText {
            region: Region::Subject,
            text: "Basic Learning".into(),
        }));
        assert!(ops.contains(&SurfaceOp::SetText {
            region: Region::TopicsLabel,
            text: "Categories".into(),
        }));
        let items = ops.iter().filter(|op| matches!(op, SurfaceOp::AppendItem { .. })).count();
        let boxes = ops.iter().filter(|op| matches!(op, SurfaceOp::AppendBox { .. })).count();
        assert_eq!(items, 5);
        assert_eq!(boxes, 2);
    }

    #[test]
    fn box_info_carries_key() {
        let mut session = session();
        let mut ops: Vec<SurfaceOp> = Vec::new();
        session.load_sample(&mut ops);

        let info = ops
            .iter()
            .find_map(|op| match op {
                SurfaceOp::AppendBox { topic_box } if topic_box.title == "Programming" => {
                    topic_box.info.clone()
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(info.title, "PROG - Programming");
        assert_eq!(info.body, "Nenhuma descrição disponível.");
    }

    #[test]
    fn empty_log_shows_message() {
        let mut session = session();
        let mut ops: Vec<SurfaceOp> = Vec::new();
        session.show_error_log(&mut ops);
        assert_eq!(
            ops,
            vec![SurfaceOp::ShowLog {
                view: LogView::Empty {
                    title: "Histórico de Erros".into(),
                    message: "Nenhum erro registrado ainda.".into(),
                }
            }]
        );
    }

    #[test]
    fn hover_on_unknown_box_emits_nothing() {
        let session = session();
        let mut ops: Vec<SurfaceOp> = Vec::new();
        session.hover_box(BoxId(77), &mut ops);
        session.leave_box(BoxId(77), &mut ops);
        assert!(ops.is_empty());
    }
}
