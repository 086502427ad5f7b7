use crate::domain::models::{MessageSeverity, Screen};
use crate::domain::session::SessionRecord;
use crate::presentation::app::PositionerApp;
use crate::presentation::components::Components;
use eframe::egui;
use std::path::PathBuf;

pub fn render(app: &mut PositionerApp, ui: &mut egui::Ui) {
    Components::heading(ui, "Session");
    ui.add_space(16.0);

    Components::card(ui, "Radiation Diagram", |ui| match &app.prepared {
        Some(series) => {
            ui.label(format!(
                "Reference power: {:.2} dBm",
                series.reference_power
            ));
            ui.label(format!("Points (loop closed): {}", series.points.len()));
            ui.label(format!("Radial floor: {} dB", series.min_gain_floor()));
            ui.add_space(8.0);

            egui::Grid::new("diagram_points").striped(true).show(ui, |ui| {
                ui.label(egui::RichText::new("Angle").strong());
                ui.label(egui::RichText::new("Gain").strong());
                ui.end_row();
                for point in &series.points {
                    ui.label(format!("{:.0}°", point.angle_rad.to_degrees()));
                    ui.label(format!("{:+.2} dB", point.gain_db));
                    ui.end_row();
                }
            });
        }
        None => {
            ui.label("No diagram prepared yet. Finalize a measurement run first.");
        }
    });

    ui.add_space(12.0);
    Components::card(ui, "Session File", |ui| {
        ui.horizontal(|ui| {
            ui.label("File name:");
            ui.text_edit_singleline(&mut app.file_name_input);
        });
        ui.label(format!("Folder: {}", session_dir().display()));

        ui.horizontal(|ui| {
            if ui.button("Save session").clicked() {
                let name = app.file_name_input.trim().to_string();
                if name.is_empty() {
                    app.notice(MessageSeverity::Warning, "File name cannot be empty.");
                } else {
                    let record = SessionRecord::from_measurements(&app.store.snapshot());
                    match record.save(&session_dir().join(name)) {
                        Ok(saved) => app.notice(
                            MessageSeverity::Success,
                            format!("Session saved to {}", saved.display()),
                        ),
                        Err(e) => app.notice(MessageSeverity::Error, e.to_string()),
                    }
                }
            }
            if ui.button("Load session").clicked() {
                let path = session_dir().join(app.file_name_input.trim());
                match SessionRecord::load(&path) {
                    Ok(record) => {
                        app.store.clear();
                        for measurement in record.to_measurements() {
                            app.store.upsert(measurement.angle_deg, measurement.power_dbm);
                        }
                        app.prepared =
                            crate::domain::diagram::prepare(&app.store.snapshot()).ok();
                        app.notice(
                            MessageSeverity::Success,
                            format!("Loaded {} measurements", app.store.len()),
                        );
                    }
                    Err(e) => app.notice(MessageSeverity::Error, e.to_string()),
                }
            }
        });
    });

    ui.add_space(12.0);
    if let Some(message) = &app.status_message {
        Components::notice_banner(ui, message);
        ui.add_space(12.0);
    }

    if ui.button("Back to motor control").clicked() {
        app.screen = Screen::Control;
    }
}

fn session_dir() -> PathBuf {
    dirs::document_dir().unwrap_or_else(|| PathBuf::from("."))
}
