// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Template persistence gateway.
//!
//! All templates live as one JSON array under a single key. Every mutation
//! reads the whole array, modifies it and writes it back. Calls block for a
//! configurable latency standing in for a network round trip, so the app
//! runs them off the UI thread.

use super::store::KeyValueStore;
use crate::models::template::Template;
use anyhow::{Context, Result};
use std::time::Duration;

/// Key holding the serialized template array.
pub const TEMPLATES_KEY: &str = "annotationTemplates";

pub trait TemplateGateway: Send + Sync {
    fn list_templates(&self) -> Result<Vec<Template>>;

    /// Append a template. Names and ids are not checked for duplicates.
    fn save_template(&self, template: &Template) -> Result<()>;

    /// Remove the template with `id`; absent ids are a no-op.
    fn delete_template(&self, id: &str) -> Result<()>;
}

pub struct StoreTemplateGateway<S: KeyValueStore> {
    store: S,
    latency: Duration,
}

impl<S: KeyValueStore> StoreTemplateGateway<S> {
    pub fn new(store: S, latency: Duration) -> Self {
        Self { store, latency }
    }

    fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
    }

    /// Stored array for a read-modify-write. Unlike listing, a corrupt
    /// payload is an error here so it is never overwritten.
    fn read_for_update(&self) -> Result<Vec<Template>> {
        match self.store.get(TEMPLATES_KEY)? {
            Some(raw) => serde_json::from_str(&raw).context("stored templates are corrupt"),
            None => Ok(Vec::new()),
        }
    }

    fn write(&self, templates: &[Template]) -> Result<()> {
        let raw = serde_json::to_string(templates)?;
        self.store.set(TEMPLATES_KEY, &raw)
    }
}

impl<S: KeyValueStore> TemplateGateway for StoreTemplateGateway<S> {
    fn list_templates(&self) -> Result<Vec<Template>> {
        self.simulate_latency();
        let Some(raw) = self.store.get(TEMPLATES_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(templates) => Ok(templates),
            Err(e) => {
                log::warn!("Stored templates are unreadable, treating as empty: {}", e);
                Ok(Vec::new())
            }
        }
    }

    fn save_template(&self, template: &Template) -> Result<()> {
        self.simulate_latency();
        let mut templates = self.read_for_update()?;
        templates.push(template.clone());
        self.write(&templates)?;
        log::info!("Saved template '{}', total: {}", template.name, templates.len());
        Ok(())
    }

    fn delete_template(&self, id: &str) -> Result<()> {
        self.simulate_latency();
        if self.store.get(TEMPLATES_KEY)?.is_none() {
            return Ok(());
        }
        let mut templates = self.read_for_update()?;
        templates.retain(|t| t.id != id);
        self.write(&templates)?;
        log::info!("Deleted template {}, total: {}", id, templates.len());
        Ok(())
    }
}
