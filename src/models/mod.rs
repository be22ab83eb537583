// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Rectangle and template data model.

pub mod rectangle;
pub mod template;
