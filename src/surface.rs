use iced_layershell::reexport::{Anchor, KeyboardInteractivity, Layer, NewLayerShellSettings};

/// Overlay footprint of the display, in logical pixels.
pub(crate) const SURFACE_SIZE: (u32, u32) = (300, 170);
const CORNER_MARGIN: i32 = 24;

fn make_output_option(output: Option<&str>) -> iced_layershell::reexport::OutputOption {
    match output {
        Some(name) => iced_layershell::reexport::OutputOption::OutputName(name.to_string()),
        None => iced_layershell::reexport::OutputOption::None,
    }
}

/// Click-through overlay pinned to the bottom-right corner of `output`.
pub(crate) fn display_settings(output: Option<&str>) -> NewLayerShellSettings {
    NewLayerShellSettings {
        layer: Layer::Overlay,
        anchor: Anchor::Bottom | Anchor::Right,
        keyboard_interactivity: KeyboardInteractivity::None,
        exclusive_zone: Some(-1),
        size: Some(SURFACE_SIZE),
        margin: Some((0, CORNER_MARGIN, CORNER_MARGIN, 0)),
        events_transparent: true,
        output_option: make_output_option(output),
        ..Default::default()
    }
}
