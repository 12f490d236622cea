// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Google Shopping APIs helpers.
//!
//! This crate contains the types and functions shared by the Google Shopping
//! API samples for Rust: walking the pages of a list method, and interpreting
//! the errors a service returns. The samples provide their own transport (an
//! authenticated HTTP client); this crate never sends a request itself.
//!
//! Paging through a list method is always the same loop: send a request,
//! consume the items, and repeat with the returned page token until the
//! service stops returning one. [paginator::Paginator] packages that loop as
//! a lazy sequence. Service errors arrive as a JSON payload with a numeric
//! code and a list of details; [error::rpc::Status] models the payload and
//! [error::rpc::Status::classify] sorts it into the cases the samples handle.

/// An alias of [std::result::Result] where the error is always [crate::error::Error].
///
/// This is the result type used by all functions wrapping RPCs.
pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// The error types returned and consumed by the samples.
pub mod error;

/// Defines some types and traits to consume list RPCs as a lazy sequence.
pub mod paginator;
