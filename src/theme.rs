use iced::{Background, Border, Color};

/// How the palette is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    /// Green phosphor on a dark glass.
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }
}

/// All colors and font sizes of the display, derived from the active theme.
pub struct ThemeColors {
    pub is_dark: bool,
    // Text
    pub phosphor: Color,
    pub dim: Color,
    /// Counter color while visitors are present.
    pub live: Color,
    /// Counter color when nobody is watching.
    pub idle: Color,
    pub on_air: Color,
    pub bars: Color,
    // Backgrounds
    pub glass: Color,
    pub glass_off: Color,
    pub bezel: Color,
    // Font sizes (logical pixels)
    pub title_text: f32,
    pub info_text: f32,
    pub counter_text: f32,
    /// Sparkline pixels per viewport unit.
    pub sparkline_scale: f32,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            is_dark: true,
            phosphor: Color::from_rgb(0.2, 1.0, 0.4),
            dim: Color {
                r: 0.2,
                g: 1.0,
                b: 0.4,
                a: 0.45,
            },
            live: Color::from_rgb(1.0, 0.72, 0.1),
            idle: Color {
                r: 0.2,
                g: 1.0,
                b: 0.4,
                a: 0.35,
            },
            on_air: Color::from_rgb(1.0, 0.25, 0.2),
            bars: Color::from_rgb(0.2, 1.0, 0.4),
            glass: Color {
                r: 0.02,
                g: 0.06,
                b: 0.03,
                a: 0.92,
            },
            glass_off: Color {
                r: 0.01,
                g: 0.01,
                b: 0.01,
                a: 0.95,
            },
            bezel: Color {
                r: 0.16,
                g: 0.15,
                b: 0.13,
                a: 0.95,
            },
            title_text: 14.0,
            info_text: 9.0,
            counter_text: 22.0,
            sparkline_scale: 3.0,
        }
    }

    pub fn light() -> Self {
        Self {
            is_dark: false,
            phosphor: Color::from_rgb(0.08, 0.2, 0.1),
            dim: Color {
                r: 0.08,
                g: 0.2,
                b: 0.1,
                a: 0.55,
            },
            live: Color::from_rgb(0.75, 0.35, 0.0),
            idle: Color {
                r: 0.35,
                g: 0.35,
                b: 0.35,
                a: 0.8,
            },
            on_air: Color::from_rgb(0.8, 0.1, 0.1),
            bars: Color::from_rgb(0.1, 0.45, 0.2),
            glass: Color {
                r: 0.86,
                g: 0.9,
                b: 0.84,
                a: 0.93,
            },
            glass_off: Color {
                r: 0.55,
                g: 0.57,
                b: 0.55,
                a: 0.93,
            },
            bezel: Color {
                r: 0.78,
                g: 0.74,
                b: 0.66,
                a: 0.95,
            },
            title_text: 14.0,
            info_text: 9.0,
            counter_text: 22.0,
            sparkline_scale: 3.0,
        }
    }

    pub fn glass_style(
        &self,
        powered: bool,
    ) -> impl Fn(&iced::Theme) -> iced::widget::container::Style {
        let color = if powered { self.glass } else { self.glass_off };
        move |_theme: &iced::Theme| iced::widget::container::Style {
            background: Some(Background::Color(color)),
            border: Border {
                radius: 10.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn bezel_style(&self) -> impl Fn(&iced::Theme) -> iced::widget::container::Style {
        let color = self.bezel;
        move |_theme: &iced::Theme| iced::widget::container::Style {
            background: Some(Background::Color(color)),
            border: Border {
                radius: 14.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

pub fn resolve(mode: ThemeMode) -> ThemeColors {
    match mode {
        ThemeMode::Dark => ThemeColors::dark(),
        ThemeMode::Light => ThemeColors::light(),
    }
}
