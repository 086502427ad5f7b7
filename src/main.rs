mod domain;
mod infrastructure;
mod presentation;

use eframe::egui;

fn main() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 760.0])
            .with_title("Antenna Positioner"),
        ..Default::default()
    };

    eframe::run_native(
        "Antenna Positioner",
        options,
        Box::new(|cc| Ok(Box::new(presentation::app::PositionerApp::new(cc)))),
    )
}
