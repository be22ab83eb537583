// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module hosts the interaction engine, runs image decoding and
//! template store calls on background threads, and dispatches the actions
//! returned by the UI panels.

use crate::config::EngineConfig;
use crate::engine::{Engine, Tool};
use crate::io::media::{self, LoadedImage};
use crate::io::serialization::{self, ExportData};
use crate::io::templates::TemplateGateway;
use crate::models::template::{Template, TemplateLibrary};
use crate::ui::{canvas, properties, toolbar};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Result of a background operation.
enum JobResult {
    ImageLoaded(Result<LoadedImage, String>),
    TemplatesListed(Result<Vec<Template>, String>),
    TemplateSaved(Result<Template, String>),
    TemplateDeleted(Result<String, String>),
}

/// Add a template confirmed by the store and clear the unsaved flag.
fn record_saved_template(engine: &mut Engine, library: &mut TemplateLibrary, template: Template) {
    log::info!("Saved template '{}'", template.name);
    library.push(template);
    engine.mark_saved();
}

/// Main application state.
pub struct AnnotatorApp {
    engine: Engine,

    /// Templates known to be persisted
    library: TemplateLibrary,

    gateway: Arc<dyn TemplateGateway>,

    /// Loaded image texture for display
    image_texture: Option<egui::TextureHandle>,

    jobs_tx: Sender<JobResult>,
    jobs_rx: Receiver<JobResult>,

    /// Store calls still in flight
    pending_store_jobs: usize,

    /// Loading state message
    loading_message: Option<String>,

    /// Last error or notice shown in the status bar
    status: Option<String>,

    panel: properties::PanelState,
}

impl AnnotatorApp {
    /// Create the application and fetch the stored templates.
    pub fn new(config: EngineConfig, gateway: Arc<dyn TemplateGateway>) -> Self {
        let (jobs_tx, jobs_rx) = channel();
        let mut app = Self {
            engine: Engine::new(config),
            library: TemplateLibrary::new(),
            gateway,
            image_texture: None,
            jobs_tx,
            jobs_rx,
            pending_store_jobs: 0,
            loading_message: None,
            status: None,
            panel: properties::PanelState::default(),
        };
        app.refresh_templates();
        app
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() -> JobResult + Send + 'static,
    {
        let sender = self.jobs_tx.clone();
        std::thread::spawn(move || {
            let _ = sender.send(job());
        });
    }

    fn refresh_templates(&mut self) {
        let gateway = Arc::clone(&self.gateway);
        self.pending_store_jobs += 1;
        self.spawn(move || {
            JobResult::TemplatesListed(gateway.list_templates().map_err(|e| format!("{:#}", e)))
        });
    }

    /// Load an image file and create a texture for display (asynchronously).
    fn load_image_file(&mut self, path: PathBuf) {
        self.loading_message = Some("Loading image...".to_string());
        self.spawn(move || {
            let result = media::load_image(&path).map_err(|e| format!("{:#}", e));
            if let Ok(ref img) = result {
                log::info!("Loaded image: {} ({}x{})", path.display(), img.width, img.height);
            }
            JobResult::ImageLoaded(result)
        });
    }

    fn pick_image(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", media::IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.load_image_file(path);
        }
    }

    fn save_template(&mut self, name: &str) {
        // No-op without an image; the panel disables the button anyway.
        let Some(template) = self.engine.capture_template(name) else {
            return;
        };
        let gateway = Arc::clone(&self.gateway);
        self.pending_store_jobs += 1;
        self.spawn(move || {
            let result = gateway
                .save_template(&template)
                .map(|_| template)
                .map_err(|e| format!("{:#}", e));
            JobResult::TemplateSaved(result)
        });
    }

    fn load_template(&mut self, id: &str) {
        if let Some(template) = self.library.find(id).cloned() {
            self.engine.apply_template(&template);
        }
    }

    fn delete_template(&mut self, id: String) {
        let gateway = Arc::clone(&self.gateway);
        self.pending_store_jobs += 1;
        self.spawn(move || {
            let result = gateway
                .delete_template(&id)
                .map(|_| id)
                .map_err(|e| format!("{:#}", e));
            JobResult::TemplateDeleted(result)
        });
    }

    /// Export the working rectangles to a file.
    fn export_rectangles(&mut self, path: PathBuf) {
        let Some(size) = self.engine.image() else {
            return;
        };
        let data = ExportData::new(
            size.width as u32,
            size.height as u32,
            self.engine.rectangles(),
        );
        match serialization::export_by_extension(&data, &path) {
            Ok(_) => log::info!("Exported rectangles to {}", path.display()),
            Err(e) => {
                log::error!("Failed to export rectangles: {:#}", e);
                self.status = Some(format!("Export failed: {}", e));
            }
        }
    }

    fn poll_jobs(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.jobs_rx.try_recv() {
            match result {
                JobResult::ImageLoaded(Ok(loaded)) => {
                    self.loading_message = None;
                    let size = [loaded.width as usize, loaded.height as usize];
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
                    let texture =
                        ctx.load_texture("loaded_image", color_image, egui::TextureOptions::LINEAR);
                    self.image_texture = Some(texture);
                    self.engine.set_image(loaded.size());
                    self.engine.set_tool(Tool::Select);
                    self.status = None;
                    log::info!("Image loaded successfully");
                }
                JobResult::ImageLoaded(Err(e)) => {
                    self.loading_message = None;
                    log::error!("Failed to load image: {}", e);
                    self.status = Some(format!("Failed to load image: {}", e));
                }
                JobResult::TemplatesListed(result) => {
                    self.pending_store_jobs = self.pending_store_jobs.saturating_sub(1);
                    match result {
                        Ok(templates) => {
                            log::info!("Fetched {} templates", templates.len());
                            self.library.replace_all(templates);
                        }
                        Err(e) => {
                            log::error!("Failed to fetch templates: {}", e);
                            self.status = Some(format!("Failed to fetch templates: {}", e));
                        }
                    }
                }
                JobResult::TemplateSaved(result) => {
                    self.pending_store_jobs = self.pending_store_jobs.saturating_sub(1);
                    match result {
                        Ok(template) => {
                            record_saved_template(&mut self.engine, &mut self.library, template);
                        }
                        Err(e) => {
                            log::error!("Failed to save template: {}", e);
                            self.status = Some(format!("Failed to save template: {}", e));
                        }
                    }
                }
                JobResult::TemplateDeleted(result) => {
                    self.pending_store_jobs = self.pending_store_jobs.saturating_sub(1);
                    match result {
                        Ok(id) => {
                            self.library.remove(&id);
                        }
                        Err(e) => {
                            log::error!("Failed to delete template: {}", e);
                            self.status = Some(format!("Failed to delete template: {}", e));
                        }
                    }
                }
            }
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open Image...").clicked() {
                    self.engine.set_tool(Tool::Image);
                    self.pick_image();
                    ui.close_menu();
                }
                ui.separator();
                let has_image = self.engine.has_image();
                ui.add_enabled_ui(has_image, |ui| {
                    ui.menu_button("Export Rectangles", |ui| {
                        if ui.button("Export as YAML...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("YAML", &["yaml", "yml"])
                                .set_file_name("rectangles.yaml")
                                .save_file()
                            {
                                self.export_rectangles(path);
                            }
                            ui.close_menu();
                        }
                        if ui.button("Export as JSON...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("JSON", &["json"])
                                .set_file_name("rectangles.json")
                                .save_file()
                            {
                                self.export_rectangles(path);
                            }
                            ui.close_menu();
                        }
                    });
                });
                ui.separator();
                if ui.button("Reload Templates").clicked() {
                    self.refresh_templates();
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                let selected = self.engine.selected();
                if ui
                    .add_enabled(selected.is_some(), egui::Button::new("Delete Selected"))
                    .clicked()
                {
                    if let Some(index) = selected {
                        self.engine.delete(index);
                    }
                    ui.close_menu();
                }
                if ui
                    .add_enabled(selected.is_some(), egui::Button::new("Deselect"))
                    .clicked()
                {
                    self.engine.clear_selection();
                    ui.close_menu();
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Zoom In").clicked() {
                    self.engine.zoom_in();
                    ui.close_menu();
                }
                if ui.button("Zoom Out").clicked() {
                    self.engine.zoom_out();
                    ui.close_menu();
                }
                if ui.button("Reset Zoom").clicked() {
                    self.engine.reset_zoom();
                    ui.close_menu();
                }
            });
        });
    }
}

impl eframe::App for AnnotatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_jobs(ctx);

        // Keep polling while background work is outstanding
        if self.loading_message.is_some() || self.pending_store_jobs > 0 {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.menu_bar(ctx, ui);
        });

        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, &mut self.engine))
            .inner;
        if toolbar_action == toolbar::ToolbarAction::PickImage {
            self.pick_image();
        }

        if let Some(status) = self.status.clone() {
            egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(status).color(egui::Color32::LIGHT_RED));
                    if ui.small_button("✕").clicked() {
                        self.status = None;
                    }
                });
            });
        }

        let busy = self.pending_store_jobs > 0;
        let properties_action = egui::SidePanel::right("properties")
            .default_width(280.0)
            .show(ctx, |ui| {
                properties::show(ui, &self.engine, &self.library, &mut self.panel, busy)
            })
            .inner;

        match properties_action {
            properties::PropertiesAction::SelectRectangle(index) => {
                self.engine.select(index);
            }
            properties::PropertiesAction::DeleteRectangle(index) => {
                self.engine.delete(index);
            }
            properties::PropertiesAction::RenameRectangle(index, name) => {
                self.engine.rename(index, Some(name));
            }
            properties::PropertiesAction::SaveTemplate(name) => self.save_template(&name),
            properties::PropertiesAction::LoadTemplate(id) => self.load_template(&id),
            properties::PropertiesAction::DeleteTemplate(id) => self.delete_template(id),
            properties::PropertiesAction::None => {}
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(ref message) = self.loading_message {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.spinner();
                        ui.add_space(10.0);
                        ui.label(
                            egui::RichText::new(message)
                                .size(16.0)
                                .color(egui::Color32::from_gray(200)),
                        );
                    });
                });
            } else {
                canvas::show(ui, &mut self.engine, &self.image_texture);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PointerTarget;
    use crate::io::store::MemoryStore;
    use crate::io::templates::StoreTemplateGateway;
    use crate::models::rectangle::{ImageSize, Point};
    use std::time::Duration;

    #[test]
    fn test_saved_template_clears_unsaved_flag() {
        let mut engine = Engine::new(EngineConfig::default());
        engine.set_image(ImageSize::new(200, 100));
        engine.set_tool(Tool::Rectangle);
        assert!(engine.pointer_down(Point::new(10.0, 10.0), PointerTarget::Canvas));
        engine.pointer_move(Point::new(110.0, 60.0));
        engine.pointer_up();
        assert!(engine.has_unsaved_changes());

        let gateway = StoreTemplateGateway::new(MemoryStore::new(), Duration::ZERO);
        let template = engine.capture_template("doors").unwrap();
        gateway.save_template(&template).unwrap();

        let mut library = TemplateLibrary::new();
        record_saved_template(&mut engine, &mut library, template.clone());

        assert!(!engine.has_unsaved_changes());
        assert_eq!(library.find(&template.id), Some(&template));
        assert_eq!(gateway.list_templates().unwrap(), vec![template]);
    }
}
