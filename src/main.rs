// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! ROIMARK - rotated region annotation
//!
//! A desktop application for drawing, moving, resizing and rotating
//! rectangular regions over an image, and saving them as templates that
//! can be reapplied to images of any size.

mod app;
mod config;
mod engine;
mod io;
mod models;
mod ui;
mod util;

use anyhow::Result;
use app::AnnotatorApp;
use config::{AppConfig, StoreConfig};
use io::store::{FileStore, MemoryStore};
use io::templates::{StoreTemplateGateway, TemplateGateway};
use std::sync::Arc;
use std::time::Duration;

/// Template gateway over the durable store, or an in-memory one when no
/// storage directory can be resolved.
fn template_gateway(config: &StoreConfig) -> Arc<dyn TemplateGateway> {
    let latency = Duration::from_millis(config.latency_ms);
    match config.resolve_directory() {
        Ok(dir) => {
            log::info!("Template store: {}", dir.display());
            Arc::new(StoreTemplateGateway::new(FileStore::new(dir), latency))
        }
        Err(e) => {
            log::warn!("{:#}; templates will not persist across runs", e);
            Arc::new(StoreTemplateGateway::new(MemoryStore::new(), latency))
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = AppConfig::load();
    let gateway = template_gateway(&config.store);

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("ROIMARK - Rotated Region Annotation"),
        ..Default::default()
    };

    // Run the application
    let engine_config = config.engine;
    eframe::run_native(
        "ROIMARK",
        options,
        Box::new(move |_cc| Ok(Box::new(AnnotatorApp::new(engine_config, gateway)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
