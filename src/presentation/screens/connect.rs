use crate::domain::models::{LinkCommand, LinkState, MessageSeverity, Screen};
use crate::presentation::app::PositionerApp;
use crate::presentation::components::Components;
use eframe::egui;

pub fn render(app: &mut PositionerApp, ui: &mut egui::Ui) {
    Components::heading(ui, "Antenna Positioner");
    ui.add_space(16.0);

    Components::card(ui, "Bluetooth Link", |ui| {
        let (status_text, bg_color, text_color) = match &app.link_state {
            LinkState::Connected => (
                "CONNECTED",
                egui::Color32::from_rgb(0, 200, 100),
                egui::Color32::BLACK,
            ),
            LinkState::Searching => (
                "SEARCHING...",
                egui::Color32::from_rgb(255, 210, 0),
                egui::Color32::BLACK,
            ),
            LinkState::Connecting => (
                "CONNECTING...",
                egui::Color32::from_rgb(255, 210, 0),
                egui::Color32::BLACK,
            ),
            LinkState::Lost => (
                "CONNECTION LOST",
                egui::Color32::from_rgb(220, 50, 50),
                egui::Color32::WHITE,
            ),
            LinkState::Error(_) => (
                "ERROR",
                egui::Color32::from_rgb(220, 50, 50),
                egui::Color32::WHITE,
            ),
            LinkState::Disconnected => (
                "DISCONNECTED",
                egui::Color32::from_gray(100),
                egui::Color32::WHITE,
            ),
        };
        Components::status_banner(ui, status_text, bg_color, text_color);
        ui.add_space(8.0);

        ui.label(format!(
            "Paired device: {}",
            app.settings.get().device_name
        ));

        ui.horizontal(|ui| {
            if app.link_state.is_connected() {
                if ui.button("Disconnect").clicked() {
                    let _ = app.link_tx.send(LinkCommand::Disconnect);
                }
            } else {
                let busy = matches!(
                    app.link_state,
                    LinkState::Searching | LinkState::Connecting
                );
                if ui
                    .add_enabled(!busy, egui::Button::new("Connect"))
                    .clicked()
                {
                    let _ = app.link_tx.send(LinkCommand::Connect);
                }
                if busy {
                    ui.spinner();
                }
            }
        });

        if let Some(frame) = &app.last_frame {
            ui.add_space(4.0);
            ui.label(format!("Last response: {frame}"));
        }
    });

    ui.add_space(12.0);
    if let Some(message) = &app.status_message {
        Components::notice_banner(ui, message);
        ui.add_space(12.0);
    }

    if ui.button("Open motor control").clicked() {
        if app.link_state.is_connected() {
            app.screen = Screen::Control;
        } else {
            app.notice(MessageSeverity::Warning, "Connect to the positioner first.");
        }
    }
}
