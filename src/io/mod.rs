// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: image loading, rectangle export and template storage.

pub mod media;
pub mod serialization;
pub mod store;
pub mod templates;
