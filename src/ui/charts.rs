use std::f32::consts::TAU;

use eframe::egui::{Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::{generate_palette, sequential_blue};
use crate::data::aggregate::FrequencyTable;
use crate::data::model::{Column, SpeedLimit};
use crate::state::AppState;

/// Largest arc drawn as a single convex wedge.
const MAX_WEDGE: f32 = TAU / 16.0;

fn missing_field(ui: &mut Ui, state: &AppState, column: Column) {
    let name = state
        .dataset
        .as_ref()
        .map(|ds| ds.label(column).to_string())
        .unwrap_or_default();
    ui.label(RichText::new(format!("⚠ field not found: {name}")).color(Color32::YELLOW));
}

// ---------------------------------------------------------------------------
// Speed-limit bar chart
// ---------------------------------------------------------------------------

/// Bar chart of devices per speed limit, shaded by count.
pub fn speed_limit_chart(ui: &mut Ui, state: &AppState) {
    ui.strong("Devices per speed limit");
    let Some(table) = &state.report.speed_limits else {
        missing_field(ui, state, Column::SpeedLimit);
        return;
    };

    let chart = BarChart::new(speed_limit_bars(table))
        .name("Devices")
        .element_formatter(Box::new(|bar: &Bar, _: &BarChart| {
            format!("{} km/h: {}", bar.argument, bar.value)
        }));

    Plot::new("speed_limit_chart")
        .height(280.0)
        .x_axis_label("Speed limit (km/h)")
        .y_axis_label("Devices")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}

/// One bar per speed limit, positioned at the limit itself.
pub fn speed_limit_bars(table: &FrequencyTable<SpeedLimit>) -> Vec<Bar> {
    let max = table.max_count();
    // Bars sit on their numeric key, so width follows the tightest gap.
    let width = table
        .entries()
        .windows(2)
        .map(|w| w[1].value.value() - w[0].value.value())
        .fold(10.0_f64, f64::min)
        * 0.8;

    table
        .iter()
        .map(|(limit, count)| {
            Bar::new(limit.value(), count as f64)
                .name(limit.to_string())
                .width(width)
                .fill(sequential_blue(count, max))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Camera-direction pie chart
// ---------------------------------------------------------------------------

/// Pie chart of devices per camera direction with a legend.
pub fn direction_chart(ui: &mut Ui, state: &AppState) {
    ui.strong("Camera direction share");
    let Some(table) = &state.report.directions else {
        missing_field(ui, state, Column::CameraDirection);
        return;
    };

    let total = table.total();
    if total == 0 {
        ui.label(RichText::new("No devices match the current filter").weak());
        return;
    }

    let colours = generate_palette(table.len());
    let side = ui.available_width().min(280.0);

    ui.horizontal(|ui: &mut Ui| {
        let (rect, _response) = ui.allocate_exact_size(Vec2::splat(side), Sense::hover());
        let painter = ui.painter_at(rect);
        let centre = rect.center();
        let radius = side * 0.45;

        for (slice, colour) in pie_slices(table).into_iter().zip(&colours) {
            for points in wedge_polygons(centre, radius, slice.start, slice.end) {
                painter.add(Shape::convex_polygon(points, *colour, Stroke::NONE));
            }
            if slice.share >= 0.05 {
                let mid = (slice.start + slice.end) / 2.0;
                let pos = centre + Vec2::angled(mid) * radius * 0.65;
                painter.text(
                    pos,
                    Align2::CENTER_CENTER,
                    format!("{:.1}%", slice.share * 100.0),
                    FontId::proportional(12.0),
                    Color32::WHITE,
                );
            }
        }

        ui.vertical(|ui: &mut Ui| {
            for ((direction, count), colour) in table.iter().zip(&colours) {
                ui.horizontal(|ui: &mut Ui| {
                    let (swatch, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
                    ui.painter().rect_filled(swatch, 2.0, *colour);
                    ui.label(format!("{direction}  ({count})"));
                });
            }
        });
    });
}

/// Angular extent of one pie slice, in radians clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
    pub start: f32,
    pub end: f32,
    pub share: f32,
}

/// Split the full circle proportionally to the table counts.
pub fn pie_slices<K>(table: &FrequencyTable<K>) -> Vec<Slice> {
    let total = table.total();
    if total == 0 {
        return Vec::new();
    }
    let mut start = -TAU / 4.0;
    table
        .iter()
        .map(|(_, count)| {
            let share = count as f32 / total as f32;
            let end = start + share * TAU;
            let slice = Slice { start, end, share };
            start = end;
            slice
        })
        .collect()
}

/// Triangulate an arc into convex polygons no wider than [`MAX_WEDGE`].
fn wedge_polygons(centre: Pos2, radius: f32, start: f32, end: f32) -> Vec<Vec<Pos2>> {
    let steps = ((end - start) / MAX_WEDGE).ceil().max(1.0) as usize;
    let step = (end - start) / steps as f32;
    (0..steps)
        .map(|i| {
            let a0 = start + step * i as f32;
            let a1 = a0 + step;
            let mut points = vec![centre];
            // A few points along the arc keep the outline round.
            for k in 0..=4 {
                let a = a0 + (a1 - a0) * k as f32 / 4.0;
                points.push(centre + Vec2::angled(a) * radius);
            }
            points
        })
        .collect()
}

/// Placeholder shown in the central panel before any data is loaded.
pub fn empty_hint(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading("Open a device table to begin  (File → Open…)");
    });
}
