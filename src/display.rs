//! The retro display engine: rolling visitor history, sparkline, title
//! marquee and the live telemetry channel, with an explicit lifecycle.
//!
//! Call order: [`RetroDisplay::initialize`] once, then any alternation of
//! [`RetroDisplay::start`] and [`RetroDisplay::stop`]. All handlers run on
//! the UI update loop, one message at a time.

use std::time::Duration;

use iced::task;
use iced::widget::svg;
use iced::Task;

use crate::airing::{self, AiringWindow, ClockReading};
use crate::app::Message;
use crate::config::{DisplayConfig, Power};
use crate::history::RollingHistory;
use crate::live::{LiveChannel, LiveEvent, LiveKey, RECONNECT_DELAY_MS};
use crate::marquee::{self, Marquee, ACTIVATION_DELAY_MS};
use crate::snapshot::{self, VisitorSnapshot};
use crate::sparkline::{self, Scale, Sparkline};

/// Bars are drawn white and recolored by the view.
const SPARKLINE_FILL: &str = "#ffffff";

/// A rendered sparkline ready for the view.
pub(crate) struct SparklineView {
    pub(crate) sparkline: Sparkline,
    pub(crate) handle: svg::Handle,
}

pub(crate) struct RetroDisplay {
    program: AiringWindow,
    power: Power,
    history: RollingHistory,
    total: u64,
    active: bool,
    /// First paint uses the soft-minimum scale; the first live event
    /// switches to linear for good.
    scale: Scale,
    sparkline: Option<SparklineView>,
    start_clock: ClockReading,
    end_clock: ClockReading,
    marquee: Option<Marquee>,
    channel: LiveChannel,
    attached: bool,
    visibility_subscribed: bool,
    activation: Option<task::Handle>,
    reconnect: Option<task::Handle>,
}

fn delay(ms: u64) -> futures_timer::Delay {
    futures_timer::Delay::new(Duration::from_millis(ms))
}

impl RetroDisplay {
    /// Build the display from the host's one-time payload, seed the history
    /// and paint the first sparkline.
    pub(crate) fn initialize(config: &DisplayConfig) -> Self {
        let initial = snapshot::parse_initial(config.snapshot.as_deref(), config.capacity);
        let history = RollingHistory::seeded(config.capacity, &initial.history);
        let program = config.program.clone();
        let start_clock = airing::format_local(program.start_time.as_deref());
        let end_clock = airing::format_local(program.end_time.as_deref());

        let mut display = Self {
            program,
            power: config.power,
            history,
            total: initial.total,
            active: initial.is_active(),
            scale: Scale::SoftMinimum,
            sparkline: None,
            start_clock,
            end_clock,
            marquee: None,
            channel: LiveChannel::new(config.endpoint.clone()),
            attached: false,
            visibility_subscribed: false,
            activation: None,
            reconnect: None,
        };
        display.render_sparkline();
        tracing::info!(
            total = display.total,
            capacity = display.history.capacity(),
            power = display.power.label(),
            "display initialized"
        );
        display
    }

    /// Attach: subscribe to visibility changes, refresh the end time, arm the
    /// marquee activation delay and open the live channel.
    pub(crate) fn start(&mut self) -> Task<Message> {
        if self.attached {
            return Task::none();
        }
        self.attached = true;
        self.visibility_subscribed = true;
        self.end_clock = airing::format_local(self.program.end_time.as_deref());
        tracing::info!("display attached");

        let activation = self.arm_activation();
        self.open_live_channel();
        activation
    }

    /// Detach: cancel every timer, close the live channel and drop the
    /// visibility subscription.
    pub(crate) fn stop(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.marquee = None;
        if let Some(handle) = self.activation.take() {
            handle.abort();
        }
        if let Some(handle) = self.reconnect.take() {
            handle.abort();
        }
        self.channel.close();
        self.visibility_subscribed = false;
        tracing::info!("display detached");
    }

    /// (Re)open the live channel. An open connection is closed first and a
    /// pending reconnect is cancelled, so at most one connection exists.
    pub(crate) fn open_live_channel(&mut self) {
        if let Some(handle) = self.reconnect.take() {
            handle.abort();
        }
        self.channel.open();
    }

    pub(crate) fn on_live(&mut self, event: LiveEvent) -> Task<Message> {
        if !self.attached || !self.channel.is_current(event.generation()) {
            tracing::debug!(
                generation = event.generation(),
                "live: dropping event from a closed connection"
            );
            return Task::none();
        }
        match event {
            LiveEvent::Connected { generation } => {
                tracing::info!(generation, "live: connected");
                Task::none()
            }
            LiveEvent::Data { payload, .. } => {
                match snapshot::parse(&payload) {
                    Ok(update) => self.apply_snapshot(&update),
                    Err(e) => tracing::warn!("live: ignoring malformed message: {e}"),
                }
                Task::none()
            }
            LiveEvent::Failed { generation, reason } => {
                tracing::warn!(
                    generation,
                    "live: connection failed ({reason}), retrying in {RECONNECT_DELAY_MS}ms"
                );
                self.channel.close();
                self.schedule_reconnect()
            }
        }
    }

    /// Scheduled reconnect fired.
    pub(crate) fn on_reconnect_due(&mut self) {
        self.reconnect = None;
        if !self.attached {
            tracing::debug!("live: reconnect ignored, display detached");
            return;
        }
        self.open_live_channel();
    }

    /// Visibility listener. Becoming visible reopens the live channel,
    /// since a backgrounded connection may have died silently.
    pub(crate) fn on_visibility(&mut self, visible: bool) {
        if !self.visibility_subscribed || !visible {
            return;
        }
        tracing::debug!("visible again, reopening live channel");
        self.open_live_channel();
    }

    pub(crate) fn on_activation(&mut self) {
        self.activation = None;
        if !self.attached || self.power != Power::On || !marquee::overflows(&self.program.title) {
            return;
        }
        self.marquee = Some(Marquee::new(&self.program.title));
        tracing::debug!("marquee running");
    }

    pub(crate) fn on_marquee_tick(&mut self) {
        if let Some(marquee) = &mut self.marquee {
            marquee.tick();
        }
    }

    pub(crate) fn set_power(&mut self, power: Power) -> Task<Message> {
        if power == self.power {
            return Task::none();
        }
        self.power = power;
        tracing::info!("power -> {}", power.label());
        match power {
            Power::Off => {
                self.marquee = None;
                if let Some(handle) = self.activation.take() {
                    handle.abort();
                }
                self.sparkline = None;
                Task::none()
            }
            Power::On => {
                self.render_sparkline();
                if self.attached {
                    self.arm_activation()
                } else {
                    Task::none()
                }
            }
        }
    }

    fn apply_snapshot(&mut self, update: &VisitorSnapshot) {
        self.history.apply(update);
        self.scale = Scale::Linear;
        self.render_sparkline();
        self.total = update.total;
        self.active = update.is_active();
        tracing::debug!(total = self.total, "live: visitors updated");
    }

    /// Replace the rendered bars. Skipped while the screen is off, since
    /// there is nothing to draw into.
    fn render_sparkline(&mut self) {
        if self.power != Power::On {
            tracing::debug!("sparkline: screen off, render skipped");
            return;
        }
        let sparkline = sparkline::render(&self.history.to_vec(), self.scale);
        let handle = svg::Handle::from_memory(sparkline.to_svg(SPARKLINE_FILL).into_bytes());
        self.sparkline = Some(SparklineView { sparkline, handle });
    }

    fn arm_activation(&mut self) -> Task<Message> {
        if let Some(handle) = self.activation.take() {
            handle.abort();
        }
        self.marquee = None;
        if self.power != Power::On || !marquee::overflows(&self.program.title) {
            return Task::none();
        }
        let (task, handle) =
            Task::perform(delay(ACTIVATION_DELAY_MS), |()| Message::MarqueeActivate).abortable();
        self.activation = Some(handle);
        task
    }

    fn schedule_reconnect(&mut self) -> Task<Message> {
        if let Some(handle) = self.reconnect.take() {
            handle.abort();
        }
        let (task, handle) =
            Task::perform(delay(RECONNECT_DELAY_MS), |()| Message::ReconnectDue).abortable();
        self.reconnect = Some(handle);
        task
    }

    // --- Read access for the view and subscriptions ---

    pub(crate) fn program(&self) -> &AiringWindow {
        &self.program
    }

    pub(crate) fn power(&self) -> Power {
        self.power
    }

    pub(crate) fn total(&self) -> u64 {
        self.total
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.attached
    }

    #[cfg(test)]
    pub(crate) fn history(&self) -> Vec<u64> {
        self.history.to_vec()
    }

    pub(crate) fn sparkline(&self) -> Option<&SparklineView> {
        self.sparkline.as_ref()
    }

    pub(crate) fn start_clock(&self) -> &ClockReading {
        &self.start_clock
    }

    pub(crate) fn end_clock(&self) -> &ClockReading {
        &self.end_clock
    }

    /// Title as shown: the marquee window while scrolling, otherwise the
    /// title cut to the window width.
    pub(crate) fn title_text(&self) -> String {
        match &self.marquee {
            Some(m) => m.visible().to_string(),
            None => self
                .program
                .title
                .chars()
                .take(marquee::WINDOW_CHARS)
                .collect(),
        }
    }

    pub(crate) fn marquee_running(&self) -> bool {
        self.marquee.is_some()
    }

    pub(crate) fn live_key(&self) -> Option<LiveKey> {
        if self.attached {
            self.channel.key()
        } else {
            None
        }
    }

    #[cfg(test)]
    pub(crate) fn reconnect_pending(&self) -> bool {
        self.reconnect.is_some()
    }
}
