mod data;
mod logging;
mod model;
mod models;
mod ui;

use crate::models::{AppState, Page};
use dotenv::dotenv;
use eframe::egui;
use eframe::egui::Visuals;
use std::error::Error;

pub struct DashboardApp {
    state: AppState,
}

impl DashboardApp {
    fn new() -> Self {
        Self {
            state: AppState::load(),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(Visuals::dark());

        egui::SidePanel::left("sidebar").show(ctx, |ui| {
            ui.set_width(240.0);
            ui.heading("Iris Classification");
            ui.separator();
            ui::sidebar(ui, &mut self.state);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                match self.state.selected_page {
                    Page::About => ui::about_page(ctx, ui, &mut self.state),
                    Page::Dataset => ui::dataset_page(ui, &mut self.state),
                    Page::Eda => ui::eda_page(ui, &mut self.state),
                    Page::DataCleaning => ui::data_cleaning_page(ui),
                    Page::MachineLearning => ui::machine_learning_page(ui),
                    Page::Prediction => ui::prediction_page(ui, &mut self.state),
                    Page::Conclusion => ui::conclusion_page(ui),
                }
            });
        });
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let mut viewport = egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]);
    match ui::load_window_icon(&ui::icon_path()) {
        Some(icon) => viewport = viewport.with_icon(icon),
        None => tracing::warn!("window icon unavailable; using the default"),
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "Iris Classification",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new()))),
    )?;

    Ok(())
}
