//! The annotation engine
//!
//! [`AnnotationEngine`] owns every piece of mutable state: activation, the
//! selected tool, the drawing session, the two layers and their history.
//! The host feeds it events one at a time; each handler runs to completion.
//!
//! Layers and history are created lazily the first time the overlay is
//! switched on, sized to the document at that moment.

use glam::Vec2;
use scrawl_config::AnnotatorConfig;
use scrawl_ipc::{HostMessage, KeyOutcome, KeyboardEvent, PointerEvent};
use tracing::{debug, info, warn};

use crate::damage::TileCoord;
use crate::history::History;
use crate::keymap::{KeyAction, action_for_key};
use crate::raster::Region;
use crate::renderer::Renderer;
use crate::session::{ActiveStroke, Session};
use crate::surfaces::{DocumentLayout, Layer, SurfaceSet};
use crate::tool::{Tool, status_text};

/// Layers plus their history, created on first activation
pub struct Overlay {
    pub surfaces: SurfaceSet,
    pub history: History,
}

pub struct AnnotationEngine {
    config: AnnotatorConfig,
    renderer: Renderer,
    active: bool,
    tool: Tool,
    session: Session,
    overlay: Option<Overlay>,
}

impl Default for AnnotationEngine {
    fn default() -> Self {
        Self::new(AnnotatorConfig::default())
    }
}

impl AnnotationEngine {
    pub fn new(config: AnnotatorConfig) -> Self {
        Self {
            renderer: Renderer::new(config.arrow),
            config,
            active: false,
            tool: Tool::default(),
            session: Session::Idle,
            overlay: None,
        }
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    /// Whether the overlay is on (visible and accepting input)
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_active()
    }

    /// Layers and history, None until first activation
    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn surfaces(&self) -> Option<&SurfaceSet> {
        self.overlay.as_ref().map(|o| &o.surfaces)
    }

    pub fn history(&self) -> Option<&History> {
        self.overlay.as_ref().map(|o| &o.history)
    }

    /// Status line for the host to display while active
    pub fn status_text(&self) -> String {
        status_text(self.tool)
    }

    /// Flip the overlay on or off. Returns the new activation state.
    pub fn toggle(&mut self, layout: &mut dyn DocumentLayout) -> bool {
        if self.active {
            self.deactivate();
        } else {
            self.activate(layout);
        }
        self.active
    }

    fn activate(&mut self, layout: &mut dyn DocumentLayout) {
        if self.overlay.is_none() {
            let mut surfaces = SurfaceSet::new(&self.config);
            if let Err(e) = surfaces.fit_to_document(layout) {
                warn!("Initial surface sizing failed: {}", e);
            }
            self.overlay = Some(Overlay {
                surfaces,
                history: History::new(self.config.effective_history_capacity()),
            });
            info!("Annotation overlay created");
        }
        self.active = true;
        self.session = Session::Idle;
        info!("Annotation overlay on ({})", self.status_text());
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.session = Session::Idle;
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.history.clear(&mut overlay.surfaces);
        }
        info!("Annotation overlay off");
    }

    /// Window resized or scrolled: refit the layers to the document.
    ///
    /// Layers follow the document even while the overlay is off.
    pub fn layout_changed(&mut self, layout: &mut dyn DocumentLayout) {
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };
        match overlay.surfaces.fit_to_document(layout) {
            Ok(true) => debug!(
                "Layers refitted to {}x{}",
                overlay.surfaces.width(),
                overlay.surfaces.height()
            ),
            Ok(false) => {}
            Err(e) => warn!("Ignoring layout change: {}", e),
        }
    }

    /// Pointer pressed at a page position
    pub fn pointer_down(&mut self, position: Vec2) {
        if !self.active || self.session.is_active() {
            return;
        }
        let Some(overlay) = self.overlay.as_ref() else {
            return;
        };
        let stroke = ActiveStroke::begin(self.tool, position, &overlay.surfaces);
        debug!(
            "Stroke started: {:?} at ({:.1}, {:.1})",
            stroke.tool, position.x, position.y
        );
        self.session = Session::Active(stroke);
    }

    /// Pointer moved to a page position.
    ///
    /// Returns the region the move painted, for hosts that repaint
    /// eagerly instead of draining damage.
    pub fn pointer_move(&mut self, position: Vec2) -> Option<Region> {
        if !self.active {
            return None;
        }
        let (Session::Active(stroke), Some(overlay)) = (&mut self.session, self.overlay.as_mut())
        else {
            return None;
        };
        self.renderer.on_move(stroke, &mut overlay.surfaces, position)
    }

    /// Pointer released: commit the stroke
    pub fn pointer_up(&mut self) {
        self.finish_stroke();
    }

    /// Pointer left the overlay: commits the stroke as drawn so far
    pub fn pointer_leave(&mut self) {
        self.finish_stroke();
    }

    fn finish_stroke(&mut self) {
        let Some(stroke) = self.session.finish() else {
            return;
        };
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };
        overlay.surfaces.reassert_styles();
        let checkpoint = overlay.surfaces.checkpoint();
        overlay.history.push(checkpoint);
        debug!(
            "Stroke committed: {:?}, history at {:?} of {}",
            stroke.tool,
            overlay.history.index(),
            overlay.history.len()
        );
    }

    /// Handle a key press. Ignored (passed through) while off.
    pub fn key_down(&mut self, key: &str) -> KeyOutcome {
        if !self.active {
            return KeyOutcome::PassThrough;
        }
        let Some(action) = action_for_key(key) else {
            return KeyOutcome::PassThrough;
        };
        debug!("Key {:?} -> {:?}", key, action);

        match action {
            KeyAction::SelectTool(tool) => self.select_tool(tool),
            KeyAction::Clear => self.clear(),
            KeyAction::Undo => {
                self.undo();
            }
            KeyAction::Redo => {
                self.redo();
            }
            KeyAction::Deactivate => self.deactivate(),
        }
        KeyOutcome::Handled
    }

    /// Select the tool for the next stroke; a stroke in progress keeps its own.
    /// Ignored while off.
    pub fn select_tool(&mut self, tool: Tool) {
        if !self.active {
            return;
        }
        self.tool = tool;
        debug!("Tool selected: {}", self.status_text());
    }

    /// Step back one checkpoint. Ignored while off.
    pub fn undo(&mut self) -> bool {
        match self.active_overlay() {
            Some(overlay) => overlay.history.undo(&mut overlay.surfaces),
            None => false,
        }
    }

    /// Step forward one checkpoint. Ignored while off.
    pub fn redo(&mut self) -> bool {
        match self.active_overlay() {
            Some(overlay) => overlay.history.redo(&mut overlay.surfaces),
            None => false,
        }
    }

    /// Erase everything and forget the history. Ignored while off.
    pub fn clear(&mut self) {
        if let Some(overlay) = self.active_overlay() {
            overlay.history.clear(&mut overlay.surfaces);
            info!("Annotations cleared");
        }
    }

    /// Drain the tiles of one layer changed since the last call, in
    /// row-major order
    pub fn take_damage(&mut self, layer: Layer) -> Vec<TileCoord> {
        match self.overlay.as_mut() {
            Some(overlay) => overlay.surfaces.layer_mut(layer).take_damage(),
            None => Vec::new(),
        }
    }

    fn active_overlay(&mut self) -> Option<&mut Overlay> {
        if self.active {
            self.overlay.as_mut()
        } else {
            None
        }
    }

    /// Dispatch a host message. Returns what the host should do with the
    /// underlying DOM event (only key events are ever `Handled`).
    pub fn handle_message(
        &mut self,
        message: &HostMessage,
        layout: &mut dyn DocumentLayout,
    ) -> KeyOutcome {
        match message {
            HostMessage::Toggle => {
                self.toggle(layout);
                KeyOutcome::PassThrough
            }
            HostMessage::Pointer { event } => {
                self.handle_pointer(event);
                KeyOutcome::PassThrough
            }
            HostMessage::Key { event } => self.handle_key(event),
            HostMessage::LayoutChanged => {
                self.layout_changed(layout);
                KeyOutcome::PassThrough
            }
        }
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        let (x, y) = event.position();
        let position = Vec2::new(x, y);
        match event {
            PointerEvent::Down { .. } => self.pointer_down(position),
            PointerEvent::Move { .. } => {
                self.pointer_move(position);
            }
            PointerEvent::Up { .. } => self.pointer_up(),
            PointerEvent::Leave { .. } => self.pointer_leave(),
        }
    }

    pub fn handle_key(&mut self, event: &KeyboardEvent) -> KeyOutcome {
        self.key_down(&event.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surfaces::tests::FakeLayout;
    use scrawl_ipc::{DocumentMetrics, parse_host_message};

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLANK: [u8; 4] = [0, 0, 0, 0];

    fn active_engine(layout: &mut FakeLayout) -> AnnotationEngine {
        let mut engine = AnnotationEngine::default();
        assert!(engine.toggle(layout));
        engine
    }

    fn stroke(engine: &mut AnnotationEngine, from: Vec2, to: Vec2) {
        engine.pointer_down(from);
        engine.pointer_move(to);
        engine.pointer_up();
    }

    /// Horizontal freehand line number `n`
    fn numbered_stroke(engine: &mut AnnotationEngine, n: usize) {
        let y = 2.5 + 3.0 * n as f32;
        stroke(engine, Vec2::new(5.0, y), Vec2::new(190.0, y));
    }

    fn surfaces(engine: &AnnotationEngine) -> &SurfaceSet {
        engine.surfaces().unwrap()
    }

    fn history(engine: &AnnotationEngine) -> &History {
        engine.history().unwrap()
    }

    #[test]
    fn test_starts_inactive_and_ignores_input() {
        let mut engine = AnnotationEngine::default();
        assert!(!engine.is_active());
        assert!(engine.overlay().is_none());

        engine.pointer_down(Vec2::new(10.0, 10.0));
        assert!(!engine.is_drawing());
        assert_eq!(engine.key_down("s"), KeyOutcome::PassThrough);
        assert_eq!(engine.tool(), Tool::Freehand);
    }

    #[test]
    fn test_first_toggle_creates_sized_overlay() {
        let mut layout = FakeLayout::new(320, 1200);
        let engine = active_engine(&mut layout);

        assert!(engine.is_active());
        assert_eq!((surfaces(&engine).width(), surfaces(&engine).height()), (320, 1200));
        assert_eq!(layout.calls, vec!["hide", "measure", "show"]);
        assert_eq!(
            engine.status_text(),
            "Tool: Pencil (d) | u: undo | r: redo | c: clear | Esc: exit"
        );
    }

    #[test]
    fn test_toggle_off_clears_and_reuses_overlay() {
        let mut layout = FakeLayout::new(200, 200);
        let mut engine = active_engine(&mut layout);
        numbered_stroke(&mut engine, 0);
        assert!(!surfaces(&engine).is_blank());

        assert!(!engine.toggle(&mut layout));
        assert!(surfaces(&engine).is_blank());
        assert!(history(&engine).is_empty());
        assert_eq!(history(&engine).index(), None);

        let calls_before = layout.calls.len();
        assert!(engine.toggle(&mut layout));
        assert_eq!(layout.calls.len(), calls_before);
        assert_eq!(surfaces(&engine).width(), 200);
    }

    #[test]
    fn test_undo_redo_bit_exact() {
        for n in [0usize, 1, 7, 50] {
            let mut layout = FakeLayout::new(200, 200);
            let mut engine = active_engine(&mut layout);
            for i in 0..n {
                numbered_stroke(&mut engine, i);
            }
            assert_eq!(history(&engine).len(), n);
            let final_state = surfaces(&engine).checkpoint();

            for _ in 0..n {
                assert_eq!(engine.key_down("u"), KeyOutcome::Handled);
            }
            assert!(surfaces(&engine).is_blank(), "not blank after {n} undos");
            assert_eq!(history(&engine).index(), None);

            for _ in 0..n {
                assert_eq!(engine.key_down("r"), KeyOutcome::Handled);
            }
            assert_eq!(surfaces(&engine).checkpoint(), final_state);
        }
    }

    #[test]
    fn test_stroke_after_undo_prunes_redo() {
        let mut layout = FakeLayout::new(200, 200);
        let mut engine = active_engine(&mut layout);
        for i in 0..3 {
            numbered_stroke(&mut engine, i);
        }
        let c0 = history(&engine).get(0).cloned().unwrap();
        let c1 = history(&engine).get(1).cloned().unwrap();

        engine.undo();
        numbered_stroke(&mut engine, 20);
        let c1_prime = surfaces(&engine).checkpoint();

        // c2 is gone; the new stroke lands after the applied c1
        assert_eq!(history(&engine).len(), 3);
        assert_eq!(history(&engine).index(), Some(2));
        assert_eq!(history(&engine).get(0), Some(&c0));
        assert_eq!(history(&engine).get(1), Some(&c1));
        assert_eq!(history(&engine).get(2), Some(&c1_prime));
        assert!(!engine.redo());
        assert_eq!(surfaces(&engine).checkpoint(), c1_prime);
    }

    #[test]
    fn test_51st_stroke_evicts_oldest() {
        let mut layout = FakeLayout::new(200, 200);
        let mut engine = active_engine(&mut layout);
        for i in 0..50 {
            numbered_stroke(&mut engine, i);
        }
        let former_c1 = history(&engine).get(1).cloned().unwrap();

        numbered_stroke(&mut engine, 55);
        assert_eq!(history(&engine).len(), 50);
        assert_eq!(history(&engine).index(), Some(49));
        assert_eq!(history(&engine).get(0), Some(&former_c1));

        for _ in 0..49 {
            assert!(engine.undo());
        }
        assert_eq!(surfaces(&engine).checkpoint(), former_c1);

        assert!(engine.undo());
        assert!(surfaces(&engine).is_blank());
        assert!(!engine.undo());
    }

    #[test]
    fn test_clear_is_not_undoable() {
        let mut layout = FakeLayout::new(200, 200);
        let mut engine = active_engine(&mut layout);
        for i in 0..3 {
            numbered_stroke(&mut engine, i);
        }
        engine.undo();

        assert_eq!(engine.key_down("c"), KeyOutcome::Handled);
        assert_eq!(history(&engine).index(), None);
        assert!(history(&engine).is_empty());
        assert!(!engine.undo());
        assert!(!engine.redo());
        assert!(surfaces(&engine).is_blank());
    }

    #[test]
    fn test_pointer_leave_commits_stroke() {
        let mut layout = FakeLayout::new(200, 200);
        let mut engine = active_engine(&mut layout);
        engine.select_tool(Tool::Line);

        engine.pointer_down(Vec2::new(10.0, 10.5));
        engine.pointer_move(Vec2::new(100.0, 10.5));
        engine.pointer_leave();

        assert!(!engine.is_drawing());
        assert_eq!(history(&engine).len(), 1);
        assert_eq!(surfaces(&engine).ink().get_pixel(50, 10), Some(RED));
    }

    #[test]
    fn test_press_without_move_still_checkpoints() {
        let mut layout = FakeLayout::new(50, 50);
        let mut engine = active_engine(&mut layout);
        engine.pointer_down(Vec2::new(10.0, 10.0));
        engine.pointer_up();
        assert_eq!(history(&engine).len(), 1);
        assert!(surfaces(&engine).is_blank());
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut layout = FakeLayout::new(50, 50);
        let mut engine = active_engine(&mut layout);
        engine.pointer_up();
        engine.pointer_leave();
        engine.pointer_move(Vec2::new(20.0, 20.0));
        assert!(history(&engine).is_empty());
        assert!(surfaces(&engine).is_blank());
    }

    #[test]
    fn test_second_press_keeps_first_session() {
        let mut layout = FakeLayout::new(200, 200);
        let mut engine = active_engine(&mut layout);
        engine.select_tool(Tool::Line);
        engine.pointer_down(Vec2::new(10.0, 10.0));
        engine.pointer_down(Vec2::new(150.0, 150.0));

        let start = engine.session().stroke().map(|s| s.start);
        assert_eq!(start, Some(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn test_tool_switch_mid_stroke_applies_to_next() {
        let mut layout = FakeLayout::new(200, 200);
        let mut engine = active_engine(&mut layout);
        engine.select_tool(Tool::Line);

        engine.pointer_down(Vec2::new(10.0, 10.5));
        assert_eq!(engine.key_down("h"), KeyOutcome::Handled);
        engine.pointer_move(Vec2::new(100.0, 10.5));
        engine.pointer_up();

        assert_eq!(engine.tool(), Tool::Highlighter);
        assert_eq!(surfaces(&engine).ink().get_pixel(50, 10), Some(RED));
        assert!(surfaces(&engine).highlight().is_blank());

        stroke(&mut engine, Vec2::new(10.0, 100.0), Vec2::new(100.0, 100.0));
        assert!(!surfaces(&engine).highlight().is_blank());
    }

    #[test]
    fn test_key_bindings() {
        let mut layout = FakeLayout::new(50, 50);
        let mut engine = active_engine(&mut layout);

        let expected = [
            ("d", Tool::Freehand),
            ("f", Tool::Line),
            ("a", Tool::Arrow),
            ("s", Tool::Rectangle),
            ("h", Tool::Highlighter),
        ];
        for (key, tool) in expected {
            assert_eq!(engine.key_down(key), KeyOutcome::Handled);
            assert_eq!(engine.tool(), tool);
        }

        assert_eq!(engine.key_down("x"), KeyOutcome::PassThrough);
        assert_eq!(engine.key_down("Enter"), KeyOutcome::PassThrough);
        assert_eq!(engine.tool(), Tool::Highlighter);
        assert!(engine.status_text().contains("Highlighter (h)"));

        assert_eq!(engine.key_down("Escape"), KeyOutcome::Handled);
        assert!(!engine.is_active());
        assert_eq!(engine.key_down("d"), KeyOutcome::PassThrough);
    }

    #[test]
    fn test_layout_change_grows_and_preserves() {
        let mut layout = FakeLayout::new(100, 100);
        let mut engine = active_engine(&mut layout);
        stroke(&mut engine, Vec2::new(10.0, 50.5), Vec2::new(90.0, 50.5));
        let before = surfaces(&engine).ink().snapshot();

        layout.metrics = DocumentMetrics::uniform(100, 400);
        engine.layout_changed(&mut layout);

        let ink = surfaces(&engine).ink();
        assert_eq!(ink.height(), 400);
        assert_eq!(&ink.pixels()[..100 * 100], before.pixels());
        assert_eq!(ink.get_pixel(50, 300), Some(BLANK));
        assert_eq!(ink.pen(), ink.style());
    }

    #[test]
    fn test_direct_actions_ignored_while_off() {
        let mut engine = AnnotationEngine::default();
        engine.select_tool(Tool::Arrow);
        assert_eq!(engine.tool(), Tool::Freehand);
        assert!(!engine.undo());
        assert!(!engine.redo());

        let mut layout = FakeLayout::new(200, 200);
        engine.toggle(&mut layout);
        numbered_stroke(&mut engine, 0);
        engine.undo();
        engine.toggle(&mut layout);

        engine.select_tool(Tool::Rectangle);
        assert_eq!(engine.tool(), Tool::Freehand);
        assert!(!engine.redo());
        assert!(surfaces(&engine).is_blank());
    }

    #[test]
    fn test_take_damage_drains_stroke_tiles() {
        let mut layout = FakeLayout::new(300, 300);
        let mut engine = active_engine(&mut layout);
        // Initial sizing damages the whole layer
        assert_eq!(engine.take_damage(Layer::Ink).len(), 9);
        assert_eq!(engine.take_damage(Layer::Highlight).len(), 9);

        stroke(&mut engine, Vec2::new(10.0, 10.5), Vec2::new(200.0, 10.5));
        let tiles = engine.take_damage(Layer::Ink);
        assert_eq!(tiles, vec![TileCoord { x: 0, y: 0 }, TileCoord { x: 1, y: 0 }]);
        assert!(engine.take_damage(Layer::Ink).is_empty());
        assert!(engine.take_damage(Layer::Highlight).is_empty());
    }

    #[test]
    fn test_take_damage_before_first_activation() {
        let mut engine = AnnotationEngine::default();
        assert!(engine.take_damage(Layer::Ink).is_empty());
    }

    #[test]
    fn test_pointer_move_reports_region() {
        let mut layout = FakeLayout::new(200, 200);
        let mut engine = active_engine(&mut layout);
        assert_eq!(engine.pointer_move(Vec2::new(50.0, 50.0)), None);

        engine.pointer_down(Vec2::new(20.0, 40.5));
        let region = engine.pointer_move(Vec2::new(60.0, 40.5));
        let (x, y, w, h) = region.unwrap();
        assert!(x <= 20 && x + w >= 60);
        assert!(y <= 40 && y + h >= 41);
        engine.pointer_up();
    }

    #[test]
    fn test_oversized_layout_ignored() {
        let mut layout = FakeLayout::new(100, 100);
        let mut engine = active_engine(&mut layout);
        layout.metrics = DocumentMetrics::uniform(100, 1_000_000);
        engine.layout_changed(&mut layout);
        assert_eq!(surfaces(&engine).height(), 100);
    }

    #[test]
    fn test_undo_restores_highlight_layer_too() {
        let mut layout = FakeLayout::new(200, 200);
        let mut engine = active_engine(&mut layout);
        engine.select_tool(Tool::Highlighter);
        stroke(&mut engine, Vec2::new(20.0, 20.0), Vec2::new(150.0, 20.0));
        engine.select_tool(Tool::Rectangle);
        stroke(&mut engine, Vec2::new(30.0, 60.0), Vec2::new(120.0, 160.0));

        engine.undo();
        assert!(surfaces(&engine).ink().is_blank());
        assert!(!surfaces(&engine).highlight().is_blank());

        engine.undo();
        assert!(surfaces(&engine).is_blank());
        assert!(surfaces(&engine).layer(Layer::Highlight).is_blank());
    }

    #[test]
    fn test_handle_messages_from_json() {
        let mut layout = FakeLayout::new(200, 200);
        let mut engine = AnnotationEngine::default();
        let script = [
            r#"{"action": "toggle"}"#,
            r#"{"action": "key", "event": {"key": "f"}}"#,
            r#"{"action": "pointer", "event": {"type": "down", "x": 10, "y": 20.5}}"#,
            r#"{"action": "pointer", "event": {"type": "move", "x": 120, "y": 20.5}}"#,
            r#"{"action": "pointer", "event": {"type": "up", "x": 120, "y": 20.5}}"#,
            r#"{"action": "layout_changed"}"#,
        ];
        let mut outcomes = Vec::new();
        for json in script {
            let message = parse_host_message(json).unwrap();
            outcomes.push(engine.handle_message(&message, &mut layout));
        }

        assert_eq!(outcomes[1], KeyOutcome::Handled);
        assert_eq!(outcomes[2], KeyOutcome::PassThrough);
        assert_eq!(engine.tool(), Tool::Line);
        assert_eq!(history(&engine).len(), 1);
        assert_eq!(surfaces(&engine).ink().get_pixel(60, 20), Some(RED));

        let escape = parse_host_message(r#"{"action": "key", "event": {"key": "Escape"}}"#).unwrap();
        assert!(engine.handle_message(&escape, &mut layout).is_handled());
        assert!(!engine.is_active());
    }
}
