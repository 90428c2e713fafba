//! Main application state

use crossbeam_channel::Receiver;
use eframe::CreationContext;
use egui::Context;
use pianoroll_core::config::{TICKS_PER_BAR, TICKS_PER_BEAT};
use pianoroll_core::{GestureEngine, GestureEvent, GestureMode, Note, NoteEditContext, NoteId};

use crate::config::{AppConfig, load_config, save_config};
use crate::panels::{NoteLaneAction, NoteLanePanel};

pub struct PianoRollApp {
    config: AppConfig,
    edit: NoteEditContext,
    engine: GestureEngine,
    events: Receiver<GestureEvent>,
    note_lane: NoteLanePanel,

    // Latest values published by the engine
    mode: GestureMode,
    selection_tick: u64,
    last_modified_duration: Option<u64>,
}

impl PianoRollApp {
    pub fn new(_cc: &CreationContext<'_>) -> Self {
        let config = load_config();
        let mut engine = GestureEngine::new(config.gesture);
        let events = engine.attach();

        let notes = demo_notes();
        tracing::info!("Loaded {} notes", notes.len());

        Self {
            config,
            edit: NoteEditContext::new(notes, config.view),
            engine,
            events,
            note_lane: NoteLanePanel::new(),
            mode: GestureMode::None,
            selection_tick: 0,
            last_modified_duration: None,
        }
    }

    fn drain_events(&mut self) {
        for event in self.events.try_iter() {
            match event {
                GestureEvent::ModeChanged(mode) => {
                    tracing::debug!("Gesture mode: {:?}", mode);
                    self.mode = mode;
                }
                GestureEvent::NotesModified(notes) => {
                    tracing::trace!("{} notes modified", notes.len());
                }
                GestureEvent::SelectionTick(tick) => self.selection_tick = tick,
                GestureEvent::LastModifiedDuration(duration) => self.last_modified_duration = Some(duration),
                GestureEvent::MarqueeResolved(ids) => {
                    tracing::debug!("Marquee selected {} notes", ids.len());
                }
            }
        }
    }

    fn status_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("-").on_hover_text("Zoom out").clicked() {
                self.edit.view.scale_x = (self.edit.view.scale_x / 1.25).clamp(0.1, 8.0);
            }
            ui.label(format!("{:.0}%", self.edit.view.scale_x * 100.0));
            if ui.button("+").on_hover_text("Zoom in").clicked() {
                self.edit.view.scale_x = (self.edit.view.scale_x * 1.25).clamp(0.1, 8.0);
            }

            ui.separator();
            ui.label(format!("Mode: {:?}", self.mode));
            ui.separator();
            ui.label(format!("Position: {}", format_tick(self.selection_tick)));
            if let Some(duration) = self.last_modified_duration {
                ui.separator();
                ui.label(format!("Length: {} ticks", duration));
            }

            let selected = self.edit.notes.iter().filter(|n| n.is_selected).count();
            ui.separator();
            ui.label(format!("{} / {} selected", selected, self.edit.notes.len()));
        });
    }
}

impl eframe::App for PianoRollApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.drain_events();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.status_ui(ui));

        let action = egui::CentralPanel::default()
            .show(ctx, |ui| self.note_lane.ui(ui, &mut self.engine, &mut self.edit, self.selection_tick))
            .inner;

        match action {
            NoteLaneAction::Zoomed => tracing::trace!("Zoom {:.2}", self.edit.view.scale_x),
            NoteLaneAction::NotesEdited(name) => tracing::debug!("Applied {}", name),
            NoteLaneAction::None => {}
        }

        // Events published during this frame
        self.drain_events();
        if self.engine.mode() != GestureMode::None {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.config.view = self.edit.view;
        save_config(&self.config);
        self.engine.detach();
    }
}

/// 1-based bar.beat.tick
fn format_tick(tick: u64) -> String {
    let tick = tick as i64;
    let bar = tick / TICKS_PER_BAR + 1;
    let beat = tick % TICKS_PER_BAR / TICKS_PER_BEAT + 1;
    format!("{}.{}.{:03}", bar, beat, tick % TICKS_PER_BEAT)
}

fn demo_notes() -> Vec<Note> {
    let phrase: [(u8, u64, u64, &str); 8] = [
        (60, 0, 480, "do"),
        (62, 480, 480, "re"),
        (64, 960, 480, "mi"),
        (65, 1440, 240, "fa"),
        (67, 1680, 720, "sol"),
        (69, 2400, 480, "la"),
        (71, 2880, 480, "ti"),
        (72, 3360, 960, "do"),
    ];
    phrase
        .iter()
        .enumerate()
        .filter_map(|(i, &(pitch, tick, duration, lyric))| {
            match Note::new(NoteId(i as u64 + 1), pitch, 100, tick, duration) {
                Ok(note) => Some(note.with_lyric(lyric)),
                Err(e) => {
                    tracing::warn!("Skipping demo note: {}", e);
                    None
                }
            }
        })
        .collect()
}
