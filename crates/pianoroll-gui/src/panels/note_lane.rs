//! Note lane panel: draws the roll and feeds pointer input to the gesture engine

use egui::{Color32, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, Vec2};
use pianoroll_core::config::{KEY_HEIGHT, TICKS_PER_BAR, TICKS_PER_BEAT};
use pianoroll_core::conversion::{note_rect, pixel_from_pitch, pixel_from_tick, tick_from_pixel};
use pianoroll_core::grid::ticks_per_grid_line;
use pianoroll_core::{
    GestureEngine, LanePoint, LaneRect, Note, NoteEditContext, PointerEvent, actions, clear_selection, select_all,
};

/// Actions returned from the note lane
#[derive(Clone, Debug, PartialEq)]
pub enum NoteLaneAction {
    None,
    /// Zoom changed
    Zoomed,
    /// Notes changed through a keyboard action
    NotesEdited(&'static str),
}

/// Piano keys plus the editable note lane
pub struct NoteLanePanel {
    /// Horizontal scroll in lane pixels
    scroll_x: f32,
    /// Vertical scroll in lane pixels
    scroll_y: f32,
    piano_width: f32,
    /// Primary button went down inside the lane and has not been released
    tracking: bool,
}

impl Default for NoteLanePanel {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteLanePanel {
    pub fn new() -> Self {
        Self {
            scroll_x: 0.0,
            // Start around middle C
            scroll_y: pixel_from_pitch(128, 84),
            piano_width: 40.0,
            tracking: false,
        }
    }

    pub fn ui(
        &mut self,
        ui: &mut Ui,
        engine: &mut GestureEngine,
        edit: &mut NoteEditContext,
        selection_tick: u64,
    ) -> NoteLaneAction {
        let available = ui.available_rect_before_wrap();
        let grid_rect = Rect::from_min_size(
            Pos2::new(available.left() + self.piano_width, available.top()),
            Vec2::new(available.width() - self.piano_width, available.height()),
        );
        let piano_rect = Rect::from_min_size(available.min, Vec2::new(self.piano_width, available.height()));

        let (response, painter) = ui.allocate_painter(available.size(), Sense::click_and_drag());

        painter.rect_filled(grid_rect, 0.0, Color32::from_gray(25));
        painter.rect_filled(piano_rect, 0.0, Color32::from_gray(40));

        let painter = painter.with_clip_rect(available);
        self.draw_piano_keys(&painter.with_clip_rect(piano_rect), piano_rect, edit);
        let lane_painter = painter.with_clip_rect(grid_rect);
        self.draw_grid(&lane_painter, grid_rect, edit);
        self.draw_notes(&lane_painter, grid_rect, edit);
        self.draw_selection_tick(&lane_painter, grid_rect, edit, selection_tick);
        if let Some(marquee) = engine.marquee_rect() {
            self.draw_marquee(&lane_painter, grid_rect, marquee);
        }

        self.handle_pointer(ui, grid_rect, engine, edit);

        let mut action = self.handle_scroll_zoom(ui, &response, grid_rect, edit);
        if response.hovered() {
            if let Some(edited) = self.handle_shortcuts(ui, edit) {
                action = edited;
            }
        }
        action
    }

    fn to_lane(&self, pos: Pos2, grid_rect: Rect) -> LanePoint {
        LanePoint::new(
            pos.x - grid_rect.left() + self.scroll_x,
            pos.y - grid_rect.top() + self.scroll_y,
        )
    }

    fn to_screen(&self, rect: LaneRect, grid_rect: Rect) -> Rect {
        Rect::from_min_max(
            Pos2::new(grid_rect.left() + rect.left - self.scroll_x, grid_rect.top() + rect.top - self.scroll_y),
            Pos2::new(grid_rect.left() + rect.right - self.scroll_x, grid_rect.top() + rect.bottom - self.scroll_y),
        )
    }

    /// Forward primary-button input to the engine as down/move/up events
    fn handle_pointer(&mut self, ui: &Ui, grid_rect: Rect, engine: &mut GestureEngine, edit: &mut NoteEditContext) {
        let (pressed, released, moved, pos, modifiers) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.delta() != Vec2::ZERO,
                i.pointer.interact_pos(),
                i.modifiers,
            )
        });
        let Some(pos) = pos else { return };
        let point = self.to_lane(pos, grid_rect);

        if pressed && grid_rect.contains(pos) {
            let mut event = PointerEvent::down(point.x, point.y);
            event.alt = modifiers.alt;
            event.meta = modifiers.command;
            engine.handle(edit, event);
            self.tracking = true;
        } else if self.tracking && released {
            engine.handle(edit, PointerEvent::up(point.x, point.y));
            self.tracking = false;
        } else if self.tracking && moved {
            engine.handle(edit, PointerEvent::moved(point.x, point.y));
        }
    }

    /// Wheel scrolls, Ctrl/Cmd + wheel zooms horizontally.
    fn handle_scroll_zoom(
        &mut self,
        ui: &Ui,
        response: &egui::Response,
        grid_rect: Rect,
        edit: &mut NoteEditContext,
    ) -> NoteLaneAction {
        if !response.hovered() {
            return NoteLaneAction::None;
        }

        let (scroll_delta, modifiers) = ui.input(|i| (i.smooth_scroll_delta + i.raw_scroll_delta, i.modifiers));

        if modifiers.ctrl || modifiers.command {
            if scroll_delta.y.abs() > 0.1 {
                // Keep the tick under the left edge fixed while zooming
                let left_tick = tick_from_pixel(edit.view.scale_x, self.scroll_x);
                let zoom_factor = 1.0 + scroll_delta.y * 0.008;
                edit.view.scale_x = (edit.view.scale_x * zoom_factor).clamp(0.1, 8.0);
                self.scroll_x = pixel_from_tick(edit.view.scale_x, left_tick);
                return NoteLaneAction::Zoomed;
            }
            return NoteLaneAction::None;
        }

        if scroll_delta.x.abs() > 0.0 || scroll_delta.y.abs() > 0.0 {
            self.scroll_x = (self.scroll_x - scroll_delta.x).max(0.0);
            let max_scroll_y = (edit.view.canvas_height() - grid_rect.height()).max(0.0);
            self.scroll_y = (self.scroll_y - scroll_delta.y).clamp(0.0, max_scroll_y);
        }
        NoteLaneAction::None
    }

    fn handle_shortcuts(&mut self, ui: &mut Ui, edit: &mut NoteEditContext) -> Option<NoteLaneAction> {
        use egui::{Key, Modifiers};

        type Edit = fn(&mut [Note]);
        let bindings: [(Modifiers, Key, &'static str, Edit); 6] = [
            (Modifiers::COMMAND, Key::A, "select all", select_all),
            (Modifiers::NONE, Key::Escape, "clear selection", clear_selection),
            (Modifiers::COMMAND, Key::ArrowUp, "octave up", actions::up_octave),
            (Modifiers::COMMAND, Key::ArrowDown, "octave down", actions::down_octave),
            (Modifiers::COMMAND | Modifiers::SHIFT, Key::H, "half time", actions::half_time),
            (Modifiers::COMMAND | Modifiers::SHIFT, Key::D, "double time", actions::double_time),
        ];

        let (name, apply) = ui.input_mut(|i| {
            bindings
                .iter()
                .find(|(modifiers, key, _, _)| i.consume_key(*modifiers, *key))
                .map(|(_, _, name, apply)| (*name, *apply))
        })?;

        apply(&mut edit.notes);
        Some(NoteLaneAction::NotesEdited(name))
    }

    fn draw_piano_keys(&self, painter: &egui::Painter, rect: Rect, edit: &NoteEditContext) {
        let num_keys = edit.view.num_keys;
        for pitch in 0..num_keys as i32 {
            let y = rect.top() + pixel_from_pitch(num_keys, pitch) - self.scroll_y;
            if y + KEY_HEIGHT < rect.top() || y > rect.bottom() {
                continue;
            }
            let key_rect = Rect::from_min_size(Pos2::new(rect.left(), y), Vec2::new(rect.width(), KEY_HEIGHT));

            let is_black = matches!(pitch % 12, 1 | 3 | 6 | 8 | 10);
            let color = if is_black { Color32::from_gray(30) } else { Color32::from_gray(60) };

            painter.rect_filled(key_rect, 0.0, color);
            painter.rect_stroke(key_rect, 0.0, Stroke::new(0.5, Color32::from_gray(20)), StrokeKind::Inside);

            if pitch % 12 == 0 {
                painter.text(
                    Pos2::new(rect.left() + 2.0, y + 2.0),
                    egui::Align2::LEFT_TOP,
                    format!("C{}", pitch / 12 - 1),
                    egui::FontId::proportional(9.0),
                    Color32::WHITE,
                );
            }
        }
    }

    fn draw_grid(&self, painter: &egui::Painter, rect: Rect, edit: &NoteEditContext) {
        let scale = edit.view.scale_x;
        let grid = ticks_per_grid_line(scale);
        let first_tick = tick_from_pixel(scale, self.scroll_x).div_euclid(grid) * grid;
        let last_tick = tick_from_pixel(scale, self.scroll_x + rect.width());

        let mut tick = first_tick;
        while tick <= last_tick {
            let x = rect.left() + pixel_from_tick(scale, tick) - self.scroll_x;
            let stroke = if tick % TICKS_PER_BAR == 0 {
                Stroke::new(1.0, Color32::from_gray(90))
            } else if tick % TICKS_PER_BEAT == 0 {
                Stroke::new(0.5, Color32::from_gray(65))
            } else {
                Stroke::new(0.5, Color32::from_gray(45))
            };
            painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
            tick += grid;
        }

        let num_keys = edit.view.num_keys;
        for pitch in 0..num_keys as i32 {
            let y = rect.top() + pixel_from_pitch(num_keys, pitch) + KEY_HEIGHT - self.scroll_y;
            if y < rect.top() || y > rect.bottom() {
                continue;
            }
            let stroke = if pitch % 12 == 0 {
                Stroke::new(1.0, Color32::from_gray(60))
            } else {
                Stroke::new(0.5, Color32::from_gray(40))
            };
            painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        }
    }

    fn draw_notes(&self, painter: &egui::Painter, rect: Rect, edit: &NoteEditContext) {
        for note in &edit.notes {
            let note_rect = self.to_screen(note_rect(edit.view.scale_x, edit.view.num_keys, note), rect);
            let note_rect = Rect::from_min_size(
                note_rect.min,
                Vec2::new(note_rect.width().max(2.0), KEY_HEIGHT - 1.0),
            );
            let visible_rect = note_rect.intersect(rect);
            if visible_rect.width() <= 0.0 || visible_rect.height() <= 0.0 {
                continue;
            }

            // Brighter for louder notes
            let shade = 120 + (note.velocity as u32 * 135 / 127) as u8;
            let color = if note.is_selected {
                Color32::from_rgb(100, 200, shade)
            } else {
                Color32::from_rgb(60, 130, shade.saturating_sub(40))
            };

            painter.rect_filled(visible_rect, 2.0, color);
            let outline = Stroke::new(1.0, Color32::from_rgb(40, 80, 120));
            painter.rect_stroke(visible_rect, 2.0, outline, StrokeKind::Inside);

            if let Some(lyric) = &note.lyric {
                painter.text(
                    Pos2::new(note_rect.left() + 3.0, note_rect.top() + 1.0),
                    egui::Align2::LEFT_TOP,
                    lyric,
                    egui::FontId::proportional(10.0),
                    Color32::BLACK,
                );
            }
        }
    }

    fn draw_selection_tick(&self, painter: &egui::Painter, rect: Rect, edit: &NoteEditContext, selection_tick: u64) {
        let x = rect.left() + pixel_from_tick(edit.view.scale_x, selection_tick as i64) - self.scroll_x;
        if x < rect.left() || x > rect.right() {
            return;
        }
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_white_alpha(34)),
        );
    }

    fn draw_marquee(&self, painter: &egui::Painter, rect: Rect, marquee: LaneRect) {
        let marquee = self.to_screen(marquee, rect);
        painter.rect_filled(marquee, 0.0, Color32::from_rgba_unmultiplied(100, 200, 255, 30));
        painter.rect_stroke(marquee, 0.0, Stroke::new(1.0, Color32::from_rgb(100, 200, 255)), StrokeKind::Inside);
    }
}
