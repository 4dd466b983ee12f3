use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoints, PlotUi, Points};

use bus_eda::color::{contrast_text, generate_palette, heat_color};
use bus_eda::data::summary::{fare_scatter, format_count, format_money, Heatmap, Summary};
use bus_eda::state::AppState;

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render KPIs, charts, heatmap and insights for the current selection.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(summary) = &state.summary else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No dataset loaded.");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("🚌 Bus Travel Data — EDA Dashboard");
            ui.label("Routes, ticket categories and fare trends for the current selection");
            ui.add_space(8.0);

            ui.strong("📊 Key Metrics");
            kpi_cards(ui, summary);
            ui.separator();

            if summary.kpis.total_tickets == 0 {
                ui.label(
                    RichText::new("No data matches the selected filters. Please adjust your criteria.")
                        .color(Color32::from_rgb(200, 140, 0)),
                );
                return;
            }

            ui.columns(2, |cols| {
                cols[0].strong("💺 Category: Seat Fare vs Total Amount");
                category_means_chart(&mut cols[0], summary);
                cols[1].strong("🛣️ Top 10 Routes by Revenue");
                route_revenue_chart(&mut cols[1], summary);
            });
            ui.separator();

            ui.columns(2, |cols| {
                cols[0].strong("👥 Age Group Revenue by Gender");
                age_gender_chart(&mut cols[0], summary);
                cols[0].strong("Gender Distribution");
                gender_chart(&mut cols[0], summary);
                cols[1].strong("🎯 Seat Fare vs Transaction Total");
                fare_scatter_chart(&mut cols[1], state);
            });
            ui.separator();

            ui.strong("🔥 Route × Time Volume Heatmap");
            match &summary.route_time_heatmap {
                Some(map) => heatmap_table(ui, map),
                None => {
                    ui.label("Filter selection is too narrow for a heatmap.");
                }
            }
            ui.separator();

            ui.strong("🧠 Strategic Insights");
            for line in summary.narrative() {
                markdown_line(ui, &line);
            }
        });
}

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

fn kpi_cards(ui: &mut Ui, summary: &Summary) {
    let k = &summary.kpis;
    ui.columns(4, |cols| {
        kpi_card(&mut cols[0], "Total Tickets", format_count(k.total_tickets));
        kpi_card(&mut cols[1], "Avg Seat Fare", format_money(k.avg_fare));
        kpi_card(&mut cols[2], "Total Revenue", format_money(k.total_revenue));
        kpi_card(&mut cols[3], "Max Booking", format_money(k.max_booking));
    });
}

fn kpi_card(ui: &mut Ui, label: &str, value: String) {
    egui::Frame::group(ui.style())
        .fill(Color32::from_gray(173))
        .inner_margin(12.0)
        .rounding(10.0)
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(label).color(Color32::BLACK));
            ui.label(RichText::new(value).color(Color32::BLACK).size(24.0).strong());
        });
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// X-axis labels for bars placed at 0, 1, 2, …
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

fn show_bar_plot(ui: &mut Ui, id: &str, labels: Vec<String>, add_contents: impl FnOnce(&mut PlotUi)) {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_formatter(category_axis(labels))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, add_contents);
}

fn category_means_chart(ui: &mut Ui, summary: &Summary) {
    let labels: Vec<String> = summary
        .category_means
        .iter()
        .map(|c| c.category.clone())
        .collect();
    let palette = generate_palette(2);

    let fares = BarChart::new(
        summary
            .category_means
            .iter()
            .enumerate()
            .map(|(i, c)| Bar::new(i as f64 - 0.2, c.mean_seat_fare).width(0.4))
            .collect(),
    )
    .name("Seat Fare")
    .color(palette[0]);
    let totals = BarChart::new(
        summary
            .category_means
            .iter()
            .enumerate()
            .map(|(i, c)| Bar::new(i as f64 + 0.2, c.mean_total_amount).width(0.4))
            .collect(),
    )
    .name("Total_Amount")
    .color(palette[1]);

    show_bar_plot(ui, "category_means", labels, |plot_ui| {
        plot_ui.bar_chart(fares);
        plot_ui.bar_chart(totals);
    });
}

fn route_revenue_chart(ui: &mut Ui, summary: &Summary) {
    let top = &summary.route_revenue_top10;
    let labels: Vec<String> = top.iter().map(|r| r.route.clone()).collect();
    let max = top.first().map_or(0.0, |r| r.revenue).max(f64::EPSILON);

    let bars = top
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new(i as f64, r.revenue)
                .name(&r.route)
                .fill(heat_color((r.revenue / max) as f32))
                .width(0.7)
        })
        .collect();

    show_bar_plot(ui, "route_revenue", labels, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars).name("Total_Amount"));
    });
}

fn age_gender_chart(ui: &mut Ui, summary: &Summary) {
    let rows = &summary.age_gender_revenue;
    let mut ages: Vec<&str> = rows.iter().map(|r| r.age_group.as_str()).collect();
    ages.dedup();
    let mut genders: Vec<&str> = rows.iter().map(|r| r.gender.as_str()).collect();
    genders.sort_unstable();
    genders.dedup();

    let palette = generate_palette(genders.len());
    let width = 0.8 / genders.len().max(1) as f64;

    let charts: Vec<BarChart> = genders
        .iter()
        .zip(palette)
        .enumerate()
        .map(|(j, (gender, color))| {
            let offset = -0.4 + width * (j as f64 + 0.5);
            let bars = rows
                .iter()
                .filter(|r| r.gender == *gender)
                .filter_map(|r| {
                    let x = ages.iter().position(|a| *a == r.age_group)?;
                    Some(Bar::new(x as f64 + offset, r.revenue).width(width))
                })
                .collect();
            BarChart::new(bars).name(*gender).color(color)
        })
        .collect();

    let labels = ages.iter().map(|s| s.to_string()).collect();
    show_bar_plot(ui, "age_gender_revenue", labels, |plot_ui| {
        for chart in charts {
            plot_ui.bar_chart(chart);
        }
    });
}

/// Share of tickets per gender. egui_plot has no pie chart, so this is a bar
/// per gender labelled with its percentage.
fn gender_chart(ui: &mut Ui, summary: &Summary) {
    let counts = &summary.gender_counts;
    let total = summary.kpis.total_tickets.max(1) as f64;
    let labels: Vec<String> = counts
        .iter()
        .map(|g| format!("{} ({:.1}%)", g.gender, g.count as f64 / total * 100.0))
        .collect();
    let palette = generate_palette(counts.len());

    let bars = counts
        .iter()
        .zip(palette)
        .enumerate()
        .map(|(i, (g, color))| {
            Bar::new(i as f64, g.count as f64)
                .name(&g.gender)
                .fill(color)
                .width(0.6)
        })
        .collect();

    show_bar_plot(ui, "gender_counts", labels, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars).name("Count"));
    });
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

fn fare_scatter_chart(ui: &mut Ui, state: &AppState) {
    let groups = fare_scatter(state.visible_records());

    Plot::new("fare_scatter")
        .height(CHART_HEIGHT * 2.0)
        .legend(Legend::default())
        .x_axis_label("Seat Fare")
        .y_axis_label("Total_Amount")
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            for (category, points) in groups {
                let color = state
                    .category_colors
                    .as_ref()
                    .map_or(Color32::LIGHT_BLUE, |cm| cm.color_for(category))
                    .gamma_multiply(0.6);
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(category)
                        .color(color)
                        .radius(3.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Heatmap table
// ---------------------------------------------------------------------------

fn heatmap_table(ui: &mut Ui, map: &Heatmap) {
    let max = map.max_count().max(1) as f32;

    TableBuilder::new(ui)
        .vscroll(false)
        .column(Column::auto().at_least(140.0))
        .columns(Column::initial(90.0).at_least(50.0), map.times.len())
        .header(24.0, |mut header| {
            header.col(|ui| {
                ui.strong("Route");
            });
            for time in &map.times {
                header.col(|ui| {
                    ui.strong(time);
                });
            }
        })
        .body(|mut body| {
            for (route, counts) in map.routes.iter().zip(&map.counts) {
                body.row(22.0, |mut row| {
                    row.col(|ui| {
                        ui.label(route);
                    });
                    for &count in counts {
                        row.col(|ui| {
                            let bg = heat_color(count as f32 / max);
                            ui.painter().rect_filled(ui.max_rect(), 0.0, bg);
                            ui.label(RichText::new(count.to_string()).color(contrast_text(bg)));
                        });
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

/// A bullet with `**bold**` spans.
fn markdown_line(ui: &mut Ui, line: &str) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        ui.label("•  ");
        for (i, part) in line.split("**").enumerate() {
            if part.is_empty() {
                continue;
            }
            if i % 2 == 1 {
                ui.label(RichText::new(part).strong());
            } else {
                ui.label(part);
            }
        }
    });
}
