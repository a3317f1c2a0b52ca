/*!
 * Desktop viewer for the RWA / liquidity dashboard
 *
 * Loads the dashboard's CSV sources from a folder and shows every chart as an
 * interactive panel:
 * - Scroll over a chart to zoom the time axis, drag to pan, double-click to reset
 * - Click legend entries to hide or focus series
 * - Hover to see the nearest data point
 *
 * Usage: `rwa-dash-gui [DATA_DIR]`
 */

use eframe::egui;
use rwa_dash::interact::{ChartEvent, wheel_zoom_factor};
use rwa_dash::style::Rgba;
use rwa_dash::viz::scene::dash_segments;
use rwa_dash::viz::{Anchor, Chart, ChartKind, Scene, Shape};
use rwa_dash::{DashboardConfig, DataDir, build_all};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let data_dir = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 800.0])
            .with_min_inner_size([600.0, 400.0])
            .with_title("RWA Liquidity Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "RWA Liquidity Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashApp::new(data_dir)))),
    )
}

/// Result of a background load.
struct Loaded {
    charts: Vec<Box<dyn Chart>>,
    errors: Vec<String>,
}

struct DashApp {
    data_dir: String,
    charts: Vec<Box<dyn Chart>>,

    // UI state
    is_loading: bool,
    status_message: String,
    error_messages: Vec<String>,

    // Background operation
    load_receiver: Option<mpsc::Receiver<Loaded>>,
}

impl DashApp {
    fn new(data_dir: Option<PathBuf>) -> Self {
        let autoload = data_dir.is_some();
        // Default to the user's home directory
        let dir = data_dir
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .to_string_lossy()
            .to_string();

        let mut app = Self {
            data_dir: dir,
            charts: Vec::new(),
            is_loading: false,
            status_message: String::new(),
            error_messages: Vec::new(),
            load_receiver: None,
        };
        if autoload {
            app.start_load();
        }
        app
    }

    fn start_load(&mut self) {
        if self.data_dir.trim().is_empty() {
            self.error_messages = vec!["Please choose a data directory".to_string()];
            return;
        }

        self.is_loading = true;
        self.error_messages.clear();
        self.status_message = format!("Loading charts from {}...", self.data_dir);

        let (sender, receiver) = mpsc::channel();
        self.load_receiver = Some(receiver);
        let dir = PathBuf::from(self.data_dir.trim());

        thread::spawn(move || {
            let data = DataDir::new(&dir);
            let config = DashboardConfig::default();
            let mut charts = Vec::new();
            let mut errors = Vec::new();
            for (kind, result) in build_all(&ChartKind::ALL, &data, &config) {
                match result {
                    Ok(chart) => charts.push(chart),
                    Err(err) => errors.push(format!("{}: {err}", kind.title())),
                }
            }
            let _ = sender.send(Loaded { charts, errors });
        });
    }

    fn check_load_result(&mut self) {
        if let Some(receiver) = &self.load_receiver
            && let Ok(loaded) = receiver.try_recv()
        {
            self.is_loading = false;
            self.load_receiver = None;
            self.status_message = format!("Loaded {} chart(s)", loaded.charts.len());
            self.charts = loaded.charts;
            self.error_messages = loaded.errors;
        }
    }
}

impl eframe::App for DashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_result();

        // Keep polling the loader while it runs
        if self.is_loading {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label("Data directory:");
                ui.text_edit_singleline(&mut self.data_dir);
                if ui.button("Browse").clicked()
                    && let Some(path) = rfd::FileDialog::new().pick_folder()
                {
                    self.data_dir = path.to_string_lossy().to_string();
                }
                if ui.add_enabled(!self.is_loading, egui::Button::new("Load")).clicked() {
                    self.start_load();
                }
                if self.is_loading {
                    ui.spinner();
                }
            });
            if !self.status_message.is_empty() {
                ui.colored_label(egui::Color32::LIGHT_GREEN, &self.status_message);
            }
            for err in &self.error_messages {
                ui.colored_label(egui::Color32::RED, err);
            }
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                for chart in &mut self.charts {
                    ui.heading(chart.kind().title());
                    if chart.controller().is_some() {
                        ui.label("Scroll to zoom, drag to pan, double-click to reset, click the legend to filter.");
                    }
                    chart_panel(ui, chart.as_mut());
                    ui.add_space(16.0);
                }
            });
        });
    }
}

/// Feed this frame's pointer input to `chart`, then paint it.
fn chart_panel(ui: &mut egui::Ui, chart: &mut dyn Chart) {
    let (w, h) = chart.size();
    let (response, painter) =
        ui.allocate_painter(egui::vec2(w as f32, h as f32), egui::Sense::click_and_drag());
    let origin = response.rect.min;
    let local = |p: egui::Pos2| (p.x - origin.x, p.y - origin.y);

    match response.hover_pos() {
        Some(pos) => {
            let (x, y) = local(pos);
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 && chart.controller().is_some() {
                chart.handle(&ChartEvent::Zoom {
                    factor: wheel_zoom_factor(scroll),
                    x,
                });
                // the chart took the scroll; keep the page from moving too
                ui.input_mut(|i| i.smooth_scroll_delta = egui::Vec2::ZERO);
            }
            chart.handle(&ChartEvent::PointerMove { x, y });
        }
        None => {
            chart.handle(&ChartEvent::PointerLeave);
        }
    }

    if response.dragged() {
        let dx = response.drag_delta().x;
        if dx != 0.0 {
            chart.handle(&ChartEvent::Pan { dx });
        }
    }
    if response.double_clicked() {
        chart.handle(&ChartEvent::Reset);
    } else if response.clicked()
        && let Some(pos) = response.interact_pointer_pos()
    {
        let (x, y) = local(pos);
        if let Some(id) = chart.scene().legend_hit_at(x, y).cloned() {
            chart.handle(&ChartEvent::LegendClick(id));
        }
    }

    paint_scene(&painter, origin, &chart.scene());
}

fn color(c: Rgba, opacity: f32) -> egui::Color32 {
    let a = (c.alpha_with(opacity) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, a)
}

fn paint_scene(painter: &egui::Painter, origin: egui::Pos2, scene: &Scene) {
    let at = |p: (f32, f32)| egui::pos2(origin.x + p.0, origin.y + p.1);
    let bounds = egui::Rect::from_min_size(
        origin,
        egui::vec2(scene.width as f32, scene.height as f32),
    );
    painter.rect_filled(bounds, 0.0, color(scene.background, 1.0));

    for shape in &scene.shapes {
        match shape {
            Shape::Line {
                from,
                to,
                stroke,
                opacity,
            } => {
                let s = egui::Stroke::new(stroke.width, color(stroke.color, *opacity));
                match stroke.dash {
                    Some((on, off)) => {
                        for (a, b) in dash_segments(&[*from, *to], on, off) {
                            painter.line_segment([at(a), at(b)], s);
                        }
                    }
                    None => {
                        painter.line_segment([at(*from), at(*to)], s);
                    }
                }
            }
            Shape::Polyline {
                points,
                stroke,
                opacity,
            } => {
                if points.len() >= 2 {
                    let s = egui::Stroke::new(stroke.width, color(stroke.color, *opacity));
                    painter.add(egui::Shape::line(points.iter().copied().map(at).collect(), s));
                }
            }
            Shape::Area {
                upper,
                lower,
                fill,
                opacity,
            } => {
                // one quad per segment; the outline as a whole need not be convex
                let c = color(*fill, *opacity);
                let mut mesh = egui::Mesh::default();
                for (u, l) in upper.iter().zip(lower) {
                    mesh.colored_vertex(at(*u), c);
                    mesh.colored_vertex(at(*l), c);
                }
                let n = upper.len().min(lower.len()) as u32;
                for i in 1..n {
                    let (u0, l0, u1, l1) = (2 * (i - 1), 2 * (i - 1) + 1, 2 * i, 2 * i + 1);
                    mesh.add_triangle(u0, l0, u1);
                    mesh.add_triangle(u1, l0, l1);
                }
                painter.add(egui::Shape::mesh(mesh));
            }
            Shape::Rect {
                min,
                max,
                fill,
                opacity,
                stroke,
            } => {
                let rect = egui::Rect::from_min_max(at(*min), at(*max));
                painter.rect_filled(rect, 0.0, color(*fill, *opacity));
                if let Some(s) = stroke {
                    painter.rect_stroke(rect, 0.0, egui::Stroke::new(s.width, color(s.color, 1.0)));
                }
            }
            Shape::Circle {
                center,
                radius,
                fill,
                opacity,
                stroke,
            } => {
                let s = stroke
                    .map(|s| egui::Stroke::new(s.width, color(s.color, 1.0)))
                    .unwrap_or(egui::Stroke::NONE);
                painter.circle(at(*center), *radius, color(*fill, *opacity), s);
            }
            Shape::Text {
                pos,
                text,
                size,
                color: c,
                anchor,
                ..
            } => {
                let align = match anchor {
                    Anchor::Start => egui::Align2::LEFT_CENTER,
                    Anchor::Middle => egui::Align2::CENTER_CENTER,
                    Anchor::End => egui::Align2::RIGHT_CENTER,
                };
                painter.text(at(*pos), align, text, egui::FontId::proportional(*size), color(*c, 1.0));
            }
        }
    }
}
