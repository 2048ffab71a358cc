use crate::clipboard::{self, ClipboardError, SystemClipboard};
use crate::diff::DiffResult;
use crate::overlay::{
    InputEvent, Modifiers, Overlay, Point, PointerEvent, PIN_BUTTON_SIZE, RESIZE_HANDLE_PX,
};
use crate::session::Session;
use crate::settings::Settings;
use eframe::egui;
use egui::text::{LayoutJob, TextFormat};
use std::sync::mpsc::{Receiver, TryRecvError};

const CASCADE_ORIGIN: (f32, f32) = (40.0, 120.0);
const CASCADE_STEP: f32 = 24.0;

pub struct FilmOverlayApp {
    session: Session,
    pending: Option<Receiver<Result<String, ClipboardError>>>,
    status: Option<String>,
    attempt: String,
    field_diff: Option<DiffResult>,
    last_screen: Option<egui::Rect>,
}

impl FilmOverlayApp {
    pub fn new(settings: Settings) -> Self {
        Self {
            session: Session::new(settings),
            pending: None,
            status: None,
            attempt: String::new(),
            field_diff: None,
            last_screen: None,
        }
    }

    fn next_position(&self) -> Point {
        let n = self.session.controller().len() % 10;
        Point::new(
            CASCADE_ORIGIN.0 + n as f32 * CASCADE_STEP,
            CASCADE_ORIGIN.1 + n as f32 * CASCADE_STEP,
        )
    }

    fn poll_capture(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                if let Err(err) = &result {
                    self.status = Some(format!("Failed to read clipboard: {err}"));
                }
                let position = self.next_position();
                if self.session.accept_capture(result, position).is_some() {
                    self.status = None;
                }
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.status = Some("Clipboard read was interrupted".into());
            }
        }
    }

    fn start_capture(&mut self) {
        if self.pending.is_some() {
            return;
        }
        match clipboard::request_text(SystemClipboard) {
            Ok(rx) => self.pending = Some(rx),
            Err(e) => {
                tracing::warn!(error = %e, "clipboard capture could not start");
                self.status = Some(format!("Failed: {e}"));
            }
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Capture clipboard").clicked() {
                self.start_capture();
            }
            if self.pending.is_some() {
                ui.spinner();
            }
            ui.separator();
            ui.label("Attempt:");
            ui.text_edit_singleline(&mut self.attempt);
            if ui.button("Check overlays").clicked() {
                let ids: Vec<_> = self.session.controller().overlays().map(|o| o.id()).collect();
                for id in ids {
                    if let Err(e) = self.session.compare_overlay(id, &self.attempt) {
                        tracing::warn!(error = %e, "compare failed");
                    }
                }
            }
        });
        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Practice:");
            ui.text_edit_multiline(self.session.field_mut().value_mut());
            ui.vertical(|ui| {
                if ui.button("Mask").clicked() {
                    self.session.field_mut().mask();
                    self.field_diff = None;
                }
                if ui.button("Unmask").clicked() {
                    self.session.field_mut().unmask();
                }
                if ui.button("Compare").clicked() {
                    self.field_diff = self.session.compare_field();
                }
            });
        });
        if let Some(diff) = &self.field_diff {
            ui.label(diff_job(diff, 14.0))
                .on_hover_text(self.session.render_diff(diff));
        }
        if let Some(status) = &self.status {
            ui.colored_label(egui::Color32::RED, status);
        }
    }

    /// Returns whether the overlays claimed this frame's pointer and scroll
    /// input.
    fn dispatch_input(&mut self, ctx: &egui::Context) -> bool {
        let screen = ctx.screen_rect();
        if self.last_screen.is_some_and(|last| last != screen) {
            self.session.handle(InputEvent::WindowResize);
        }
        self.last_screen = Some(screen);

        let (pos, pressed, released, mods, scroll, pastes) = ctx.input(|i| {
            let pastes: Vec<String> = i
                .events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Paste(text) => Some(text.clone()),
                    _ => None,
                })
                .collect();
            (
                i.pointer.interact_pos().or(i.pointer.hover_pos()),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.modifiers,
                i.raw_scroll_delta,
                pastes,
            )
        });

        if !ctx.wants_keyboard_input() {
            for text in pastes {
                let report = self.session.paste(&text);
                tracing::debug!(
                    replaced = report.replaced.len(),
                    unmatched = report.unmatched.len(),
                    "paste applied"
                );
            }
        }

        let Some(pos) = pos else {
            return self.session.controller().active().is_some();
        };
        let point = Point::new(pos.x, pos.y);
        let pointer = PointerEvent {
            position: point,
            modifiers: Modifiers {
                shift: mods.shift,
                ctrl: mods.ctrl,
                alt: mods.alt,
            },
        };
        let hit = self.session.controller().hit_test(point);

        let mut events = Vec::with_capacity(4);
        if pressed {
            if let Some((target, part)) = hit {
                events.push(InputEvent::PointerDown {
                    target,
                    part,
                    pointer,
                });
            }
        }
        events.push(InputEvent::PointerMove(pointer));
        if released {
            events.push(InputEvent::PointerUp);
        }
        if scroll.y != 0.0 {
            if let Some((target, _)) = hit {
                // egui reports scrolling up as positive, wheel deltas the other way round.
                events.push(InputEvent::Wheel {
                    target,
                    delta_y: -scroll.y,
                });
            }
        }
        self.session.dispatch(events)
    }

    fn paint_overlays(&self, ctx: &egui::Context) {
        let line_height = self.session.settings().line_height;
        for overlay in self.session.controller().overlays() {
            let (origin, size) = overlay.screen_rect();
            egui::Area::new(egui::Id::new(("film_overlay", overlay.id().0)))
                .order(egui::Order::Foreground)
                .fixed_pos(egui::pos2(origin.x, origin.y))
                .constrain(false)
                .interactable(!overlay.is_pinned())
                .show(ctx, |ui| {
                    // Claims the overlay's rect so widgets underneath get no
                    // hover or clicks while it is live.
                    let (rect, _) = ui.allocate_exact_size(
                        egui::vec2(size.width, size.height),
                        egui::Sense::click_and_drag(),
                    );
                    paint_overlay(&ui.painter_at(rect), rect, overlay, line_height);
                });
        }
    }
}

fn paint_overlay(painter: &egui::Painter, rect: egui::Rect, overlay: &Overlay, line_height: f32) {
    let border = if overlay.is_pinned() {
        egui::Color32::GRAY
    } else {
        egui::Color32::LIGHT_BLUE
    };
    painter.rect_filled(rect, 4.0, egui::Color32::from_rgba_unmultiplied(20, 20, 20, 210));
    painter.rect_stroke(rect, 4.0, egui::Stroke::new(1.0, border));

    let font_size = (line_height * overlay.content_scale() * overlay.scale()).max(1.0);
    let mut job = LayoutJob::default();
    for run in overlay.content() {
        job.append(&run.text, 0.0, run_format(run.highlighted, font_size));
    }
    let galley = painter.layout_job(job);
    painter
        .with_clip_rect(rect.shrink(1.0))
        .galley(rect.min, galley, egui::Color32::WHITE);

    if overlay.has_pin_control() {
        let pin = egui::Rect::from_min_size(
            egui::pos2(rect.max.x - PIN_BUTTON_SIZE.width, rect.min.y),
            egui::vec2(PIN_BUTTON_SIZE.width, PIN_BUTTON_SIZE.height),
        );
        painter.rect_filled(pin, 2.0, egui::Color32::DARK_BLUE);
        painter.text(
            pin.center(),
            egui::Align2::CENTER_CENTER,
            "Pin",
            egui::FontId::proportional(12.0),
            egui::Color32::WHITE,
        );
    }
    if !overlay.is_pinned() {
        let handle = egui::Rect::from_min_max(
            rect.max - egui::vec2(RESIZE_HANDLE_PX, RESIZE_HANDLE_PX),
            rect.max,
        );
        painter.rect_filled(handle, 0.0, border);
    }
}

fn run_format(highlighted: bool, font_size: f32) -> TextFormat {
    TextFormat {
        font_id: egui::FontId::monospace(font_size),
        color: egui::Color32::WHITE,
        background: if highlighted {
            egui::Color32::from_rgb(190, 50, 50)
        } else {
            egui::Color32::TRANSPARENT
        },
        ..Default::default()
    }
}

fn diff_job(diff: &DiffResult, font_size: f32) -> LayoutJob {
    let mut job = LayoutJob::default();
    for run in diff.runs() {
        job.append(&run.text, 0.0, run_format(run.highlighted, font_size));
    }
    job
}

impl eframe::App for FilmOverlayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_capture();

        let captured = self.dispatch_input(ctx);
        if captured {
            ctx.input_mut(|i| {
                i.raw_scroll_delta = egui::Vec2::ZERO;
                i.smooth_scroll_delta = egui::Vec2::ZERO;
            });
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.set_enabled(!captured);
            self.controls(ui);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.set_enabled(!captured);
            let modifier = self.session.settings().drag_modifier;
            ui.weak(format!(
                "{modifier}+drag to move, drag the corner to resize, scroll to zoom, paste to check"
            ));
        });

        self.paint_overlays(ctx);

        if self.pending.is_some() || self.session.controller().active().is_some() {
            ctx.request_repaint();
        }
    }
}

pub fn run(settings: Settings) -> anyhow::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Film Overlay",
        native_options,
        Box::new(move |_cc| Box::new(FilmOverlayApp::new(settings))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start GUI: {e}"))
}
