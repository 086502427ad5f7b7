use crate::domain::diagram::DiagramSeries;
use crate::domain::measurements::MeasurementStore;
use crate::domain::models::{
    AppEvent, LinkCommand, LinkState, MessageSeverity, MotorCommand, Screen, StatusMessage,
};
use crate::domain::position::PositionController;
use crate::domain::settings::SettingsService;
use crate::infrastructure::link::bluez::BluezConnector;
use crate::infrastructure::link::{LinkConfig, LinkManager};
use eframe::egui;
use std::time::Duration;
use tokio::sync::mpsc;

pub struct PositionerApp {
    // Services
    pub(crate) settings: SettingsService,

    // Link actor channels
    pub(crate) link_tx: mpsc::UnboundedSender<LinkCommand>,
    pub(crate) events_rx: mpsc::UnboundedReceiver<AppEvent>,

    // Session state
    pub(crate) controller: PositionController,
    pub(crate) store: MeasurementStore,
    pub(crate) prepared: Option<DiagramSeries>,

    // Published link state
    pub(crate) link_state: LinkState,
    pub(crate) status_message: Option<StatusMessage>,
    pub(crate) last_frame: Option<String>,

    // UI state
    pub(crate) screen: Screen,
    pub(crate) step_input: String,
    pub(crate) step_needs_focus: bool,
    pub(crate) power_input: String,
    pub(crate) power_needs_focus: bool,
    pub(crate) file_name_input: String,

    // Logging guard
    pub(crate) _logging_guard: Option<crate::infrastructure::logging::LoggingGuard>,
}

impl PositionerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        crate::presentation::theme::apply(&cc.egui_ctx);

        let settings = SettingsService::new().expect("Failed to load settings");

        let logging_guard =
            crate::infrastructure::logging::init_logger(&settings.get().log_settings)
                .map_err(|e| eprintln!("Failed to initialize logging: {}", e))
                .ok();

        tracing::info!("Starting Antenna Positioner");
        crate::infrastructure::permissions::request_radio_access();

        let (event_tx, events_rx) = mpsc::unbounded_channel();
        let (link_tx, link_rx) = mpsc::unbounded_channel();

        let link_settings = settings.get();
        let config = LinkConfig {
            device_name: link_settings.device_name.clone(),
            connect_timeout: Duration::from_millis(link_settings.connect_timeout_ms),
            send_timeout: Duration::from_millis(link_settings.send_timeout_ms),
        };
        let connector =
            BluezConnector::new(link_settings.rfcomm_channel, &link_settings.service_uuid);
        let actor_command_tx = link_tx.clone();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to create tokio runtime for the link actor");

            rt.block_on(async move {
                let manager =
                    LinkManager::new(Box::new(connector), config, event_tx, actor_command_tx);
                manager.run(link_rx).await;
            });
        });

        Self {
            settings,
            link_tx,
            events_rx,
            controller: PositionController::new(),
            store: MeasurementStore::new(),
            prepared: None,
            link_state: LinkState::Disconnected,
            status_message: None,
            last_frame: None,
            screen: Screen::Connection,
            step_input: "1".to_string(),
            step_needs_focus: false,
            power_input: String::new(),
            power_needs_focus: false,
            file_name_input: "radiation_diagram.json".to_string(),
            _logging_guard: logging_guard,
        }
    }

    pub(crate) fn send_motor(&self, command: MotorCommand) {
        let _ = self.link_tx.send(LinkCommand::Send(command));
    }

    pub(crate) fn notice(&mut self, severity: MessageSeverity, message: impl Into<String>) {
        self.status_message = Some(StatusMessage {
            message: message.into(),
            severity,
        });
    }
}

impl eframe::App for PositionerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                AppEvent::LinkState(state) => self.link_state = state,
                AppEvent::Notice(message) => self.status_message = Some(message),
                AppEvent::FrameReceived(frame) => self.last_frame = Some(frame),
            }
        }

        ctx.request_repaint_after(Duration::from_millis(100));

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.selectable_value(&mut self.screen, Screen::Connection, "Connection");
                ui.selectable_value(&mut self.screen, Screen::Control, "Motor Control");
                ui.selectable_value(&mut self.screen, Screen::Session, "Session");
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.set_max_width(480.0);
                    ui.add_space(16.0);

                    use crate::presentation::screens;
                    match self.screen {
                        Screen::Connection => screens::connect::render(self, ui),
                        Screen::Control => screens::control::render(self, ui),
                        Screen::Session => screens::session::render(self, ui),
                    }

                    ui.add_space(40.0);
                });
            });
        });
    }
}
