use crate::domain::models::{Direction, MessageSeverity, Screen};
use crate::domain::position::MAX_POSITION_DEG;
use crate::presentation::app::PositionerApp;
use crate::presentation::components::Components;
use eframe::egui;

pub fn render(app: &mut PositionerApp, ui: &mut egui::Ui) {
    Components::heading(ui, "Motor Control");
    ui.add_space(16.0);

    let connected = app.link_state.is_connected();

    Components::card(ui, "Position", |ui| {
        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new(format!("{}°", app.controller.position()))
                    .size(36.0)
                    .strong(),
            );
        });

        ui.horizontal(|ui| {
            if ui
                .add_enabled(connected, egui::Button::new("− Step"))
                .clicked()
            {
                if let Some(command) = app.controller.step_by(Direction::Left) {
                    app.send_motor(command);
                }
            }
            if ui
                .add_enabled(connected, egui::Button::new("+ Step"))
                .clicked()
            {
                if let Some(command) = app.controller.step_by(Direction::Right) {
                    app.send_motor(command);
                }
            }
        });

        // The slider only tracks while dragging; one command for the whole
        // delta goes out on release.
        let mut position = app.controller.position();
        let response = ui.add_enabled(
            connected,
            egui::Slider::new(&mut position, 0..=MAX_POSITION_DEG).suffix("°"),
        );
        if response.changed() {
            app.controller.slider_moved(position);
        }
        if response.drag_stopped() {
            if let Some(command) = app.controller.slider_released() {
                app.send_motor(command);
            }
        }
    });

    ui.add_space(12.0);
    Components::card(ui, "Step Size", |ui| {
        ui.horizontal(|ui| {
            ui.label("Degrees per command:");
            let response = ui.add(
                egui::TextEdit::singleline(&mut app.step_input).desired_width(60.0),
            );
            if app.step_needs_focus {
                response.request_focus();
                app.step_needs_focus = false;
            }
            if ui.button("Apply").clicked() {
                match app.controller.set_step(&app.step_input) {
                    Ok(()) => app.notice(
                        MessageSeverity::Info,
                        format!("Step set to {}°", app.controller.step()),
                    ),
                    Err(e) => {
                        app.notice(MessageSeverity::Warning, e.to_string());
                        app.step_needs_focus = true;
                    }
                }
            }
        });
    });

    ui.add_space(12.0);
    Components::card(ui, "Power Reading", |ui| {
        ui.horizontal(|ui| {
            ui.label("Power (dBm):");
            let response = ui.add(
                egui::TextEdit::singleline(&mut app.power_input).desired_width(80.0),
            );
            if app.power_needs_focus {
                response.request_focus();
                app.power_needs_focus = false;
            }

            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let clicked = ui
                .add_enabled(connected, egui::Button::new("Register"))
                .clicked();
            let register = connected && (clicked || submitted);
            if register {
                let input = app.power_input.clone();
                match app.controller.register_measurement(&input, &mut app.store) {
                    Ok(registration) => {
                        if registration.limit_reached {
                            app.notice(
                                MessageSeverity::Warning,
                                "Maximum position reached (360°).",
                            );
                        } else {
                            app.notice(
                                MessageSeverity::Info,
                                format!("Measurement stored at {}°", registration.angle_deg),
                            );
                        }
                        if let Some(command) = registration.command {
                            app.send_motor(command);
                        }
                        app.power_input.clear();
                        app.power_needs_focus = true;
                    }
                    Err(e) => {
                        app.notice(MessageSeverity::Warning, e.to_string());
                        app.power_needs_focus = true;
                    }
                }
            }
        });
        ui.label(format!("Collected measurements: {}", app.store.len()));
    });

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        if ui.button("New diagram").clicked() {
            if let Some(command) = app.controller.reset_session(&mut app.store) {
                app.send_motor(command);
            }
            app.prepared = None;
            app.step_input = app.controller.step().to_string();
            app.notice(
                MessageSeverity::Info,
                "New diagram started; measurements cleared.",
            );
        }
        if ui.button("Finalize diagram").clicked() {
            match crate::domain::diagram::prepare(&app.store.snapshot()) {
                Ok(series) => {
                    app.prepared = Some(series);
                    app.screen = Screen::Session;
                }
                Err(e) => app.notice(MessageSeverity::Warning, e.to_string()),
            }
        }
    });

    ui.add_space(12.0);
    if let Some(message) = &app.status_message {
        Components::notice_banner(ui, message);
    }
}
