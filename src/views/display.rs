use iced::widget::text::Shaping;
use iced::widget::{column, container, row, space, svg, text};
use iced::{Element, Font, Length};

use crate::airing::ClockReading;
use crate::app::{App, Message};
use crate::config::Power;
use crate::util::{odometer, truncate_str};

const COUNTER_DIGITS: usize = 4;
const URL_MAX_CHARS: usize = 34;

fn clock_label(clock: &ClockReading) -> String {
    format!("{} {}", clock.display, clock.suffix())
}

impl App {
    pub(crate) fn view_display(&self) -> Element<'_, Message> {
        let mono = Font::MONOSPACE;
        let shaped = Shaping::Advanced;
        let colors = &self.colors;
        let display = &self.display;
        let powered = display.power() == Power::On;

        // Powered off: dark glass only
        if !powered {
            let glass = container(space::Space::new().width(Length::Fill).height(Length::Fill))
                .style(colors.glass_style(false));
            return container(glass)
                .padding(10)
                .style(colors.bezel_style())
                .width(Length::Fill)
                .height(Length::Fill)
                .into();
        }

        let program = display.program();

        // Top row: ON AIR badge while the program has a full airing window
        let badge: Element<'_, Message> = if program.is_airing() {
            text("● ON AIR")
                .size(colors.info_text)
                .color(colors.on_air)
                .font(mono)
                .shaping(shaped)
                .into()
        } else {
            text("OFF AIR")
                .size(colors.info_text)
                .color(colors.dim)
                .font(mono)
                .into()
        };
        let times = text(format!(
            "{} - {}",
            clock_label(display.start_clock()),
            clock_label(display.end_clock())
        ))
        .size(colors.info_text)
        .color(colors.dim)
        .font(mono);
        let top_row = row![badge, space::horizontal(), times];

        let title = text(display.title_text())
            .size(colors.title_text)
            .color(colors.phosphor)
            .font(mono)
            .shaping(shaped);

        let mut body = column![top_row, title].spacing(4);

        if let Some(url) = &program.url {
            body = body.push(
                text(truncate_str(url, URL_MAX_CHARS))
                    .size(colors.info_text)
                    .color(colors.dim)
                    .font(mono)
                    .shaping(shaped),
            );
        }

        // Bottom row: visitor counter and trend
        let counter_color = if display.is_active() {
            colors.live
        } else {
            colors.idle
        };
        let counter = column![
            text("VISITORS")
                .size(colors.info_text)
                .color(colors.dim)
                .font(mono),
            text(odometer(display.total(), COUNTER_DIGITS))
                .size(colors.counter_text)
                .color(counter_color)
                .font(mono),
        ];

        let trend: Element<'_, Message> = match display.sparkline() {
            Some(view) => {
                let bars = colors.bars;
                svg(view.handle.clone())
                    .width(view.sparkline.width * colors.sparkline_scale)
                    .height(view.sparkline.height * colors.sparkline_scale)
                    .style(move |_theme, _status| svg::Style { color: Some(bars) })
                    .into()
            }
            None => space::Space::new().width(0).height(0).into(),
        };

        let bottom_row =
            row![counter, space::horizontal(), trend].align_y(iced::alignment::Vertical::Bottom);

        body = body.push(space::vertical()).push(bottom_row);

        let glass = container(body)
            .padding(12)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(colors.glass_style(true));

        container(glass)
            .padding(10)
            .style(colors.bezel_style())
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_label_carries_the_suffix() {
        let clock = ClockReading {
            display: "01:05".into(),
            am: false,
            pm: true,
        };
        assert_eq!(clock_label(&clock), "01:05 PM");
        assert_eq!(clock_label(&ClockReading::placeholder()), "00:00 --");
    }
}
