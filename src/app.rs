use crate::config::{self, Power};
use crate::display::RetroDisplay;
use crate::ipc;
use crate::live::{self, LiveEvent};
use crate::marquee::TICK_MS;
use crate::surface::*;
use crate::theme::{self, ThemeColors, ThemeMode};

use iced::{Color, Element, Subscription, Task};
use iced_layershell::build_pattern::daemon;
use iced_layershell::settings::{LayerShellSettings, StartMode};
use iced_layershell::to_layer_message;

pub(crate) type IcedId = iced_layershell::reexport::IcedId;

// --- Host State ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SurfaceMode {
    Hidden,
    Visible,
}

pub(crate) struct App {
    pub(crate) mode: SurfaceMode,
    pub(crate) surface_id: Option<IcedId>,
    pub(crate) theme_mode: ThemeMode,
    pub(crate) colors: ThemeColors,
    pub(crate) target_output: Option<String>,
    pub(crate) display: RetroDisplay,
}

#[to_layer_message(multi)]
#[derive(Debug, Clone)]
pub(crate) enum Message {
    ToggleVisibility,
    Show,
    Hide,
    PowerSet(Power),
    PowerToggle,
    Attach,
    Detach,
    /// Manual reopen requested over the control socket.
    ReconnectNow,
    /// The scheduled reconnect delay elapsed.
    ReconnectDue,
    Live(LiveEvent),
    MarqueeActivate,
    MarqueeTick,
    ThemeToggle,
    ScreenSet(String),
}

pub(crate) fn run() -> Result<(), iced_layershell::Error> {
    tracing::info!(
        "retro-display v{} ({}) starting in background mode",
        env!("RETRO_DISPLAY_VERSION"),
        env!("RETRO_DISPLAY_COMMIT")
    );

    let settings = LayerShellSettings {
        start_mode: StartMode::Background,
        ..Default::default()
    };

    daemon(App::new, App::namespace, App::update, App::view)
        .style(App::style)
        .subscription(App::subscription)
        .layer_settings(settings)
        .run()
}

impl App {
    fn new() -> (Self, Task<Message>) {
        let config = config::load();
        let theme_mode = ThemeMode::Dark;
        let colors = theme::resolve(theme_mode);

        let target_output = config.screen.clone();
        if let Some(ref name) = target_output {
            tracing::info!("target screen: {name}");
        }

        let mut display = RetroDisplay::initialize(&config);
        let start_task = display.start();

        let (id, open_task) = Message::layershell_open(display_settings(target_output.as_deref()));
        tracing::info!("booting -> Visible (surface {id})");
        (
            Self {
                mode: SurfaceMode::Visible,
                surface_id: Some(id),
                theme_mode,
                colors,
                target_output,
                display,
            },
            Task::batch([open_task, start_task]),
        )
    }

    fn namespace() -> String {
        String::from("retro-display")
    }

    fn show(&mut self) -> Task<Message> {
        if self.mode == SurfaceMode::Visible {
            return Task::none();
        }
        let (id, task) = Message::layershell_open(display_settings(self.target_output.as_deref()));
        self.surface_id = Some(id);
        self.mode = SurfaceMode::Visible;
        tracing::info!("Hidden -> Visible");
        self.display.on_visibility(true);
        task
    }

    fn hide(&mut self) -> Task<Message> {
        if self.mode == SurfaceMode::Hidden {
            return Task::none();
        }
        let task = if let Some(id) = self.surface_id.take() {
            Task::done(Message::RemoveWindow(id))
        } else {
            Task::none()
        };
        self.mode = SurfaceMode::Hidden;
        tracing::info!("Visible -> Hidden");
        self.display.on_visibility(false);
        task
    }

    /// Recreate the surface on the current target output.
    fn recreate_surface(&mut self) -> Task<Message> {
        if self.mode == SurfaceMode::Hidden {
            return Task::none();
        }
        let remove_task = if let Some(id) = self.surface_id.take() {
            Task::done(Message::RemoveWindow(id))
        } else {
            Task::none()
        };
        let (id, open_task) = Message::layershell_open(display_settings(self.target_output.as_deref()));
        self.surface_id = Some(id);
        Task::batch([remove_task, open_task])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ToggleVisibility => match self.mode {
                SurfaceMode::Hidden => self.show(),
                SurfaceMode::Visible => self.hide(),
            },
            Message::Show => self.show(),
            Message::Hide => self.hide(),
            Message::PowerSet(power) => self.display.set_power(power),
            Message::PowerToggle => {
                let power = self.display.power().toggled();
                self.display.set_power(power)
            }
            Message::Attach => self.display.start(),
            Message::Detach => {
                self.display.stop();
                Task::none()
            }
            Message::ReconnectNow => {
                if self.display.is_attached() {
                    self.display.open_live_channel();
                } else {
                    tracing::warn!("reconnect: display is detached");
                }
                Task::none()
            }
            Message::ReconnectDue => {
                self.display.on_reconnect_due();
                Task::none()
            }
            Message::Live(event) => self.display.on_live(event),
            Message::MarqueeActivate => {
                self.display.on_activation();
                Task::none()
            }
            Message::MarqueeTick => {
                self.display.on_marquee_tick();
                Task::none()
            }
            Message::ThemeToggle => {
                self.theme_mode = self.theme_mode.toggled();
                self.colors = theme::resolve(self.theme_mode);
                tracing::info!(
                    "theme -> {}",
                    if self.colors.is_dark { "dark" } else { "light" }
                );
                Task::none()
            }
            Message::ScreenSet(ref name) => {
                self.target_output = Some(name.clone());
                tracing::info!("screen -> {name}");
                self.recreate_surface()
            }
            _ => Task::none(),
        }
    }

    fn view(&self, _window_id: IcedId) -> Element<'_, Message> {
        self.view_display()
    }

    fn subscription(state: &Self) -> Subscription<Message> {
        let mut subs = vec![Subscription::run(ipc::socket_listener)];

        if let Some(key) = state.display.live_key() {
            subs.push(Subscription::run_with(key, live::live_stream).map(Message::Live));
        }

        // The marquee keeps its own clock, independent of surface visibility.
        if state.display.marquee_running() {
            subs.push(Subscription::run_with(TICK_MS, ipc::tick_stream));
        }

        Subscription::batch(subs)
    }

    fn style(&self, _theme: &iced::Theme) -> iced::theme::Style {
        iced::theme::Style {
            background_color: Color::TRANSPARENT,
            text_color: self.colors.phosphor,
        }
    }
}
