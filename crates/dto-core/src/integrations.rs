// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Pluggable host-framework seams.
//!
//! The engine itself is framework-free; these traits are what a host wires
//! up: a request reader for [`crate::dto::RequestDto`], a response envelope
//! for [`crate::dto::ResponseDto`], and the validator consulted during
//! construction.

pub mod request;
pub mod response;
pub mod validator;
