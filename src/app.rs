use eframe::{egui, App, Frame};
use egui::{Color32, RichText};

use crate::{
    controller::{Controller, Tone},
    downloader::YtDlp,
};

/// The downloader window
pub struct GrabberApp {
    controller: Controller<YtDlp>,
    credit: &'static str,
}

impl GrabberApp {
    pub fn new(controller: Controller<YtDlp>, credit: &'static str) -> Self {
        Self { controller, credit }
    }
}

fn tone_color(tone: Tone) -> Option<Color32> {
    match tone {
        Tone::Neutral => None,
        Tone::Busy => Some(Color32::BLUE),
        Tone::Success => Some(Color32::DARK_GREEN),
        Tone::Failure => Some(Color32::RED),
    }
}

/// GUI update loop: drains worker messages, then redraws
impl App for GrabberApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // Progress and status posted by download threads
        self.controller.pump_events();

        egui::TopBottomPanel::bottom("credit")
            .show_separator_line(false)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(self.credit).italics().small().color(Color32::GRAY));
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(10.0);
                ui.heading("Insert YouTube Link");
                ui.add_space(10.0);

                ui.add(
                    egui::TextEdit::singleline(self.controller.link_mut())
                        .hint_text("https://www.youtube.com/watch?v=...")
                        .desired_width(550.0),
                );
                ui.add_space(5.0);

                let status = &self.controller.display().status;
                let mut text = RichText::new(&status.text);
                if let Some(color) = tone_color(status.tone) {
                    text = text.color(color);
                }
                ui.label(text);
                ui.add_space(10.0);

                // Runs on this thread; the window freezes until yt-dlp answers
                if ui.button("Fetch Available Formats").clicked() {
                    self.controller.fetch_formats();
                }
                ui.add_space(10.0);

                let selected = self.controller.selected().to_owned();
                let nothing_fetched = self.controller.catalog().is_empty();
                let (labels, choice) = self.controller.format_picker();
                egui::ComboBox::from_id_source("format")
                    .selected_text(selected)
                    .width(300.0)
                    .show_ui(ui, |ui| {
                        if nothing_fetched {
                            ui.weak("Fetch formats first");
                        }
                        for label in labels {
                            ui.selectable_value(choice, label.clone(), label);
                        }
                    });
                ui.add_space(10.0);

                let display = self.controller.display();
                ui.label(&display.percentage);
                ui.add(egui::ProgressBar::new(display.bar).desired_width(600.0));
                ui.add_space(10.0);

                if ui.button("Download Selected Format").clicked() {
                    // Detached; the thread reports back through the controller's channel
                    let _ = self.controller.start_download();
                }
            });
        });

        // Request periodic repaint for progress updates
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
