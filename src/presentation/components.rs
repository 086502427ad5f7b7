use crate::domain::models::{MessageSeverity, StatusMessage};
use eframe::egui;

pub struct Components;

impl Components {
    pub fn heading(ui: &mut egui::Ui, text: &str) {
        ui.label(egui::RichText::new(text).strong().size(24.0));
    }

    pub fn card<R>(
        ui: &mut egui::Ui,
        title: &str,
        add_contents: impl FnOnce(&mut egui::Ui) -> R,
    ) -> R {
        let stroke = ui.style().visuals.widgets.noninteractive.bg_stroke;
        let bg = ui.style().visuals.widgets.noninteractive.bg_fill;

        egui::Frame::none()
            .inner_margin(egui::Margin::same(12.0))
            .stroke(stroke)
            .fill(bg)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(title).strong().size(16.0));
                    ui.add_space(6.0);
                    add_contents(ui)
                })
                .inner
            })
            .inner
    }

    pub fn status_banner(
        ui: &mut egui::Ui,
        text: &str,
        bg_color: egui::Color32,
        text_color: egui::Color32,
    ) {
        ui.add_sized(
            [ui.available_width(), 32.0],
            egui::Label::new(
                egui::RichText::new(text)
                    .color(text_color)
                    .background_color(bg_color)
                    .size(15.0)
                    .strong(),
            )
            .wrap_mode(egui::TextWrapMode::Extend),
        );
    }

    pub fn notice_banner(ui: &mut egui::Ui, message: &StatusMessage) {
        let (bg_color, text_color) = match message.severity {
            MessageSeverity::Info => (egui::Color32::from_gray(230), egui::Color32::BLACK),
            MessageSeverity::Success => (
                egui::Color32::from_rgb(0, 200, 100),
                egui::Color32::BLACK,
            ),
            MessageSeverity::Warning => (
                egui::Color32::from_rgb(255, 210, 0),
                egui::Color32::BLACK,
            ),
            MessageSeverity::Error => (
                egui::Color32::from_rgb(220, 50, 50),
                egui::Color32::WHITE,
            ),
        };
        Self::status_banner(ui, &message.message, bg_color, text_color);
    }
}
