//! Field widget - pins on the lattice and the waves sweeping over them

use ratatui::{
    layout::Rect,
    style::Color,
    symbols,
    widgets::{
        canvas::{Canvas, Circle, Points},
        Block, Borders,
    },
    Frame,
};

use pulsefield::{
    geometry::Point,
    grid::NodeColor,
    io::render::{NodeView, Snapshot},
    scale::Hsl,
    SimConfig,
};

/// Strength above which a pin draws as flashing
const FLASH_LEVEL: f64 = 0.1;

/// Render the field and return the inner area the world is mapped onto.
pub fn render_field(frame: &mut Frame, area: Rect, snapshot: &Snapshot, config: &SimConfig) -> Rect {
    let block = Block::default().title(" Field ").borders(Borders::ALL);
    let inner = block.inner(area);

    let (width, height) = (config.width, config.height);
    let center = Point::new(width / 2.0, height / 2.0);
    let world_min = width.min(height);

    // Canvas y grows upward, world y grows downward
    let flip = |p: Point| (p.x, height - p.y);

    let canvas = Canvas::default()
        .block(block)
        .marker(symbols::Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for beat in snapshot.beats.iter().filter(|b| b.active) {
                let (x, y) = flip(beat.center);
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: beat.radius,
                    color: hsl_color(beat.color),
                });
            }

            ctx.layer();

            for node in &snapshot.nodes {
                let head = flip(node.pin_head(center, world_min));
                ctx.draw(&Points {
                    coords: &[head],
                    color: pin_color(node),
                });
            }
        });

    frame.render_widget(canvas, area);
    inner
}

fn pin_color(node: &NodeView) -> Color {
    if node.strength > FLASH_LEVEL {
        return Color::LightYellow;
    }
    match node.color {
        NodeColor::Active => Color::White,
        NodeColor::Idle => Color::DarkGray,
    }
}

/// Convert an HSL colour to terminal RGB.
fn hsl_color(hsl: Hsl) -> Color {
    let h = f64::from(hsl.hue % 360) / 60.0;
    let s = f64::from(hsl.saturation) / 100.0;
    let l = f64::from(hsl.lightness) / 100.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color::Rgb(to_u8(r), to_u8(g), to_u8(b))
}
