//! Interactive network-growth viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns one growth run plus
//! everything recorded from it (timeline, layout) and implements
//! [`eframe::App`] to render and control it through an egui UI.

use std::collections::BTreeMap;

use eframe::App;
use glam::Vec2;
use netgrowth_core::{
    Attachment, GrowthConfig, GrowthError, GrowthSimulator, SaturationPolicy,
    metrics::NetworkMetrics, types::NodeId,
};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::{layout::Layout, timeline::Timeline};

/// Relaxation rounds applied to the layout per frame while animating.
const RELAX_PER_FRAME: usize = 2;

/// Layout relaxation is quadratic in the node count; past this it stops.
const RELAX_NODE_LIMIT: usize = 2_000;

/// Largest graph whose betweenness is computed for the shown timestep.
const BETWEENNESS_NODE_LIMIT: usize = 1_500;

/// Buckets in the betweenness distribution plot.
const BETWEENNESS_BINS: usize = 20;

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: a [`GrowthSimulator`] built from [`GrowthConfig`].
/// - The recorded [`Timeline`], so any earlier timestep can be shown again.
/// - UI state (pan/zoom, timeline cursor, timing, config being edited).
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If `running` is `true` and enough time has passed, call [`Viewer::advance`].
/// 3. Render the graph at the `shown` timestep and the metrics panel.
///
/// ### Fields
/// - `draft` - Config being edited in the side panel; applied on reset.
/// - `draft_p` - Uniform probability being edited.
/// - `draft_preferential` - Whether the draft uses preferential attachment.
///
/// - `sim` - The current growth run.
/// - `timeline` - Everything recorded from `sim` so far.
/// - `detail` - Full metrics of one timestep, computed while paused.
/// - `layout` - World-space node positions.
///
/// - `shown` - Timestep currently drawn.
/// - `status` - Last error to show in the status bar.
///
/// - `running` - Whether the view is auto-advancing.
/// - `zoom` / `pan` - World-to-screen mapping.
/// - `step_interval` / `last_step_time` / `last_step_dt` - Auto-advance timing.
pub struct Viewer {
    draft: GrowthConfig,
    draft_p: f64,
    draft_preferential: bool,

    sim: GrowthSimulator,
    timeline: Timeline,
    detail: Option<(usize, NetworkMetrics)>,
    layout: Layout,

    shown: usize,
    status: Option<String>,

    running: bool,
    zoom: f32,
    pan: egui::Vec2,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Creates a viewer with a fresh run built from `cfg`.
    ///
    /// ### Errors
    /// Returns [`GrowthError::InvalidConfiguration`] if `cfg` is rejected.
    pub fn new(cfg: GrowthConfig) -> Result<Self, GrowthError> {
        let sim = GrowthSimulator::new(cfg.clone())?;
        let (draft_p, draft_preferential) = match cfg.attachment {
            Attachment::Uniform(rule) => (rule.p(), false),
            Attachment::Preferential(_) => (0.5, true),
        };
        let timeline = Timeline::start(&sim.view());
        let mut layout = Layout::new();
        layout.sync(sim.graph());

        Ok(Self {
            draft: cfg,
            draft_p,
            draft_preferential,
            sim,
            timeline,
            detail: None,
            layout,
            shown: 0,
            status: None,
            running: false,
            zoom: 3.0,
            pan: egui::vec2(0.0, 0.0),
            step_interval: 0.1,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        })
    }

    /// Rebuilds the run from the edited config.
    ///
    /// If the draft is invalid the current run is kept and the error is
    /// shown in the status bar instead.
    fn reset(&mut self) {
        match self.draft_config().and_then(GrowthSimulator::new) {
            Ok(sim) => {
                info!(
                    seed = sim.seed(),
                    nodes = sim.config().target_node_count,
                    rule = sim.config().attachment.name(),
                    "viewer reset"
                );
                self.timeline = Timeline::start(&sim.view());
                self.layout.clear();
                self.layout.sync(sim.graph());
                self.sim = sim;
                self.detail = None;
                self.shown = 0;
                self.status = None;
                self.running = false;
            }
            Err(err) => {
                warn!(error = %err, code = err.code(), "rejected viewer config");
                self.status = Some(err.to_string());
                self.running = false;
            }
        }
    }

    /// Builds a [`GrowthConfig`] from the side panel state.
    fn draft_config(&self) -> Result<GrowthConfig, GrowthError> {
        let attachment = if self.draft_preferential {
            Attachment::preferential()
        } else {
            Attachment::uniform(self.draft_p)?
        };
        let cfg = GrowthConfig {
            attachment,
            ..self.draft.clone()
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Performs one growth step, records it and shows it.
    ///
    /// Returns `false` if the run is already complete or the step failed;
    /// failures stop auto-running and are shown in the status bar.
    fn step_once(&mut self) -> bool {
        match self.sim.step() {
            Ok(Some(outcome)) => {
                self.timeline.record(&self.sim.view(), &outcome);
                self.layout.sync(self.sim.graph());
                self.shown = self.timeline.latest();
                true
            }
            Ok(None) => false,
            Err(err) => {
                self.status = Some(err.to_string());
                self.running = false;
                false
            }
        }
    }

    /// Runs the remaining steps at once.
    fn finish(&mut self) {
        let from = self.sim.steps_taken();
        while self.step_once() {}
        debug!(steps = self.sim.steps_taken() - from, "finished run from viewer");
    }

    /// Moves the view forward by one timestep.
    ///
    /// Replays recorded timesteps first; once the latest is shown, grows the
    /// network by one step. Stops auto-running at the end of the run.
    fn advance(&mut self) {
        if self.shown < self.timeline.latest() {
            self.shown += 1;
        } else if !self.step_once() {
            self.running = false;
        }
    }

    /// Nodes touched by the step that produced the shown timestep: the
    /// newcomer and every node it linked with.
    fn touched(&self) -> Vec<NodeId> {
        if self.shown == 0 {
            return Vec::new();
        }
        let newcomer = self.shown + 1;
        let mut touched = vec![newcomer];
        touched.extend(
            self.timeline
                .edges_added(self.shown)
                .iter()
                .map(|&(from, to)| if from == newcomer { to } else { from }),
        );
        touched
    }

    /// Computes full metrics for the shown timestep if they are missing.
    ///
    /// Skipped while running and for graphs above
    /// [`BETWEENNESS_NODE_LIMIT`] nodes.
    fn refresh_detail(&mut self) {
        if self.running || self.detail.as_ref().is_some_and(|(t, _)| *t == self.shown) {
            return;
        }
        if self.timeline.node_count(self.shown) > BETWEENNESS_NODE_LIMIT {
            self.detail = None;
            return;
        }
        self.detail = self
            .timeline
            .graph(self.shown)
            .map(|graph| (self.shown, NetworkMetrics::compute(&graph)));
    }

    /// Full metrics of the shown timestep, if they have been computed.
    fn shown_detail(&self) -> Option<&NetworkMetrics> {
        self.detail
            .as_ref()
            .filter(|(t, _)| *t == self.shown)
            .map(|(_, m)| m)
    }

    /// Converts a world-space position to screen-space.
    ///
    /// World coordinates are scaled by `zoom`, offset by `pan`, and then
    /// centered inside the given `rect`. The y-axis is flipped so that
    /// positive y goes up in world space.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + p.x * self.zoom + self.pan.x,
            center.y - p.y * self.zoom + self.pan.y,
        )
    }

    /// Converts a screen-space position back to world-space.
    ///
    /// This is the inverse of [`Viewer::world_to_screen`] (up to floating
    /// point rounding).
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        Vec2::new(x, y)
    }

    /// Picks a zoom that fits the current layout into `rect` and recenters.
    fn fit_to(&mut self, rect: egui::Rect) {
        let Some((lo, hi)) = self.layout.bounds() else {
            return;
        };
        let extent = (hi - lo).max(Vec2::splat(1.0));
        let zoom_x = rect.width() * 0.9 / extent.x;
        let zoom_y = rect.height() * 0.9 / extent.y;
        self.zoom = zoom_x.min(zoom_y).clamp(0.1, 10.0);
        let mid = (lo + hi) * 0.5;
        self.pan = egui::vec2(-mid.x * self.zoom, mid.y * self.zoom);
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `u32` [`egui::DragValue`].
    fn labeled_drag_u32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut u32,
        range: std::ops::RangeInclusive<u32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, timeline, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.01..=1.0)
                        .speed(0.01),
                );

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.advance();
                    self.last_step_time = now;
                }

                if ui.button("Finish").clicked() {
                    self.finish();
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();
                let latest = self.timeline.latest();
                ui.add(egui::Slider::new(&mut self.shown, 0..=latest).text("timestep"));

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=10.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (timestep, counts, seed, errors).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.step_interval));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("seed = {}", self.sim.seed()));
                ui.label(format!("rule = {}", self.sim.config().attachment.name()));
                ui.label(format!(
                    "saturated = {}",
                    self.timeline.saturated(self.shown).len()
                ));
                ui.label(format!("edges = {}", self.timeline.edges(self.shown).len()));
                ui.label(format!("nodes = {}", self.timeline.node_count(self.shown)));
                ui.label(format!(
                    "timestep = {} / {}",
                    self.shown,
                    self.sim.total_steps()
                ));
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.colored_label(egui::Color32::LIGHT_RED, status);
                }
            });
        });
    }

    /// Builds the right-hand configuration panel for the next run.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Size");
                Self::labeled_drag_usize(
                    ui,
                    "target nodes:",
                    &mut self.draft.target_node_count,
                    2..=5000,
                    1.0,
                );
                Self::labeled_drag_u32(
                    ui,
                    "threshold:",
                    &mut self.draft.saturation_threshold,
                    1..=10_000,
                    1.0,
                );
                ui.checkbox(&mut self.draft.directed, "directed");

                ui.separator();
                ui.label("Attachment rule");
                ui.radio_value(&mut self.draft_preferential, false, "uniform");
                ui.radio_value(&mut self.draft_preferential, true, "preferential");
                ui.add_enabled(
                    !self.draft_preferential,
                    egui::Slider::new(&mut self.draft_p, 0.0..=1.0).text("p"),
                );

                ui.separator();
                ui.label("Saturation");
                ui.radio_value(
                    &mut self.draft.saturation_policy,
                    SaturationPolicy::Checkpoint,
                    "checkpoint",
                );
                ui.radio_value(
                    &mut self.draft.saturation_policy,
                    SaturationPolicy::StrictCap,
                    "strict cap",
                );

                ui.separator();
                ui.label("Seed");
                let mut fixed = self.draft.seed.is_some();
                if ui.checkbox(&mut fixed, "fixed seed").changed() {
                    self.draft.seed = fixed.then(|| self.sim.seed());
                }
                if let Some(seed) = &mut self.draft.seed {
                    ui.add(egui::DragValue::new(seed));
                    if ui.button("🎲 Reseed").clicked() {
                        *seed = rand::rng().random();
                    }
                }

                ui.separator();
                if ui.button("Apply & reset").clicked() {
                    self.reset();
                }
                if ui.button("Reset cfg to default").clicked() {
                    self.draft = GrowthConfig::default();
                    self.draft_p = 0.5;
                    self.draft_preferential = false;
                }
            });
    }

    /// Builds the left-hand panel with metric plots for the shown timestep.
    fn ui_metrics_panel(&self, ctx: &egui::Context) {
        egui::SidePanel::left("metrics_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Metrics");
                let Some(stats) = self.timeline.stats(self.shown) else {
                    return;
                };
                let detail = self.shown_detail();

                ui.separator();
                ui.label("Degree distribution");
                let degrees = degree_bars(&stats.degree_distribution);
                plot_bars(
                    ui,
                    &degrees,
                    &format!("degree 0..{}", degrees.len().saturating_sub(1)),
                );

                ui.separator();
                ui.label(format!("Density = {}", fmt_opt(stats.density)));
                plot_series(ui, &self.timeline.series(|s| s.density), self.shown);

                ui.separator();
                let apl = stats
                    .average_path_length
                    .or_else(|| detail.and_then(|m| m.average_path_length));
                ui.label(format!("Average path length = {}", fmt_opt(apl)));
                plot_series(
                    ui,
                    &self.timeline.series(|s| s.average_path_length),
                    self.shown,
                );

                ui.separator();
                match (detail, detail.and_then(NetworkMetrics::betweenness_range)) {
                    (Some(m), Some((lo, hi))) => {
                        ui.label(format!("Betweenness: min {lo:.4}, max {hi:.4}"));
                        plot_bars(
                            ui,
                            &m.betweenness_distribution(BETWEENNESS_BINS),
                            &format!("{lo:.4}..{hi:.4}"),
                        );
                    }
                    _ if self.running => {
                        ui.label("Betweenness: pause to compute");
                    }
                    _ if self.timeline.node_count(self.shown) > BETWEENNESS_NODE_LIMIT => {
                        ui.label(format!(
                            "Betweenness: n/a above {BETWEENNESS_NODE_LIMIT} nodes"
                        ));
                    }
                    _ => {
                        ui.label("Betweenness: n/a");
                    }
                }
            });
    }

    /// Builds the central panel where the graph is drawn and navigated.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                self.pan += response.drag_delta();
            }

            if response.double_clicked() {
                self.fit_to(rect);
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.1, 10.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            self.draw_timestep(&painter, rect);

            // Auto-advance if requested.
            if self.running {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.step_interval {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.advance();
                    self.last_step_time = now;
                }
                if self.sim.graph().node_count() <= RELAX_NODE_LIMIT {
                    self.layout.relax(self.sim.graph(), RELAX_PER_FRAME);
                }
                ctx.request_repaint();
            }
        });
    }

    /// Draws edges and nodes of the shown timestep.
    ///
    /// Saturated nodes are grey, nodes touched by the step that produced
    /// the timestep are red, the rest light blue.
    fn draw_timestep(&self, painter: &egui::Painter, rect: egui::Rect) {
        let node_r = (1.5 * self.zoom).max(2.0);
        let edge_stroke = egui::Stroke::new(1.0, egui::Color32::from_gray(140));
        let directed = self.timeline.is_directed();

        for &(from, to) in self.timeline.edges(self.shown) {
            let (Some(a), Some(b)) = (self.layout.position(from), self.layout.position(to)) else {
                continue;
            };
            let a = self.world_to_screen(a, rect);
            let b = self.world_to_screen(b, rect);
            if directed {
                let dir = b - a;
                let len = dir.length();
                if len > node_r {
                    painter.arrow(a, dir * ((len - node_r) / len), edge_stroke);
                }
            } else {
                painter.line_segment([a, b], edge_stroke);
            }
        }

        let node_count = self.timeline.node_count(self.shown);
        let mut saturated = vec![false; node_count];
        for &id in self.timeline.saturated(self.shown) {
            if let Some(s) = saturated.get_mut(id) {
                *s = true;
            }
        }
        let touched = self.touched();

        for (id, &pos) in self.layout.positions().iter().enumerate().take(node_count) {
            let color = if saturated[id] {
                egui::Color32::GRAY
            } else if touched.contains(&id) {
                egui::Color32::RED
            } else {
                egui::Color32::LIGHT_BLUE
            };
            painter.circle_filled(self.world_to_screen(pos, rect), node_r, color);
        }
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.refresh_detail();
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_metrics_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_owned(), |v| format!("{v:.4}"))
}

/// Dense `count per degree`, from degree 0 to the largest degree present.
fn degree_bars(distribution: &BTreeMap<usize, usize>) -> Vec<usize> {
    let Some((&max_degree, _)) = distribution.last_key_value() else {
        return Vec::new();
    };
    let mut bars = vec![0; max_degree + 1];
    for (&degree, &count) in distribution {
        bars[degree] = count;
    }
    bars
}

/// Draws a bar chart with one bar per entry of `counts`.
fn plot_bars(ui: &mut egui::Ui, counts: &[usize], caption: &str) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(ui.available_width(), 100.0), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, egui::Color32::from_gray(24));

    let Some(&max_count) = counts.iter().max().filter(|&&c| c > 0) else {
        return;
    };
    let bar_w = rect.width() / counts.len() as f32;
    for (slot, &count) in counts.iter().enumerate() {
        let h = rect.height() * count as f32 / max_count as f32;
        let x = rect.left() + slot as f32 * bar_w;
        let bar = egui::Rect::from_min_max(
            egui::pos2(x, rect.bottom() - h),
            egui::pos2(x + bar_w.max(1.0), rect.bottom()),
        );
        painter.rect_filled(bar, 0.0, egui::Color32::LIGHT_BLUE);
    }
    painter.text(
        rect.right_top() + egui::vec2(-4.0, 4.0),
        egui::Align2::RIGHT_TOP,
        format!("{caption}, max count {max_count}"),
        egui::FontId::monospace(10.0),
        egui::Color32::LIGHT_GRAY,
    );
}

/// Draws a line plot of a per-timestep series with a marker at `cursor`.
fn plot_series(ui: &mut egui::Ui, values: &[Option<f64>], cursor: usize) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(ui.available_width(), 80.0), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, egui::Color32::from_gray(24));

    let max = values.iter().flatten().copied().fold(0.0_f64, f64::max);
    if values.len() < 2 || max <= 0.0 {
        return;
    }
    let dx = rect.width() / (values.len() - 1) as f32;
    let to_screen = |i: usize, v: f64| {
        egui::pos2(
            rect.left() + i as f32 * dx,
            rect.bottom() - rect.height() * (v / max) as f32,
        )
    };

    let points: Vec<egui::Pos2> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| to_screen(i, v)))
        .collect();
    painter.line(points, egui::Stroke::new(1.5, egui::Color32::LIGHT_GREEN));

    let x = rect.left() + cursor as f32 * dx;
    painter.line_segment(
        [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
        egui::Stroke::new(1.0, egui::Color32::YELLOW),
    );
}
