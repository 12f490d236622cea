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

use crate::error::Error;

/// The error payload reported by the Shopping services.
///
/// Failed requests return a JSON envelope wrapping this payload, as described
/// in the [error handling] guide. The `code` field repeats the HTTP status
/// code of the response, `message` summarizes the problem, and `errors`
/// carries one entry per detected problem.
///
/// [error handling]: https://developers.google.com/shopping-content/guides/error-handling
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct Status {
    /// The numeric status code, matching the HTTP status of the response.
    pub code: i32,

    /// A developer-facing description of the problem.
    pub message: String,

    /// The individual problems detected by the service, in the order it
    /// reported them.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorInfo>,
}

impl Status {
    /// Sets the value of [code][Status::code].
    pub fn set_code<T: Into<i32>>(mut self, v: T) -> Self {
        self.code = v.into();
        self
    }

    /// Sets the value of [message][Status::message].
    pub fn set_message<T: Into<String>>(mut self, v: T) -> Self {
        self.message = v.into();
        self
    }

    /// Sets the value of [errors][Status::errors].
    pub fn set_errors<T, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = V>,
        V: Into<ErrorInfo>,
    {
        self.errors = v.into_iter().map(|i| i.into()).collect();
        self
    }

    /// Maps this status to the handling category used by the samples.
    ///
    /// The mapping depends only on [code][Status::code]. A `404` means the
    /// resource does not exist, which several samples treat as a normal
    /// outcome. The remaining `4xx` codes indicate a problem with the request
    /// itself, so the category keeps the reported details for display.
    /// Everything else, including `5xx` codes and values outside the HTTP
    /// range, falls in [ErrorClass::ServerOrUnknown].
    ///
    /// # Example
    /// ```
    /// use google_shopping_gax::error::rpc::{ErrorClass, Status};
    /// let status = Status::default().set_code(404);
    /// assert_eq!(status.classify(), ErrorClass::NotFound);
    /// ```
    pub fn classify(&self) -> ErrorClass {
        match self.code {
            404 => ErrorClass::NotFound,
            c if (400..500).contains(&c) => ErrorClass::Client(self.errors.clone()),
            _ => ErrorClass::ServerOrUnknown,
        }
    }
}

/// A single problem reported by the service.
///
/// The `reason` field holds a stable identifier for the problem, such as
/// `invalid` or `duplicate`. For problems tied to a specific request field,
/// `location` and `location_type` say which one.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct ErrorInfo {
    /// The scope of the problem, typically `global` or `content`.
    pub domain: String,

    /// A stable identifier for the type of problem.
    pub reason: String,

    /// A developer-facing description of this problem.
    pub message: String,

    /// The request element the problem applies to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// How to interpret [location][ErrorInfo::location], e.g. `parameter`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_type: Option<String>,
}

impl ErrorInfo {
    /// Sets the value of [domain][ErrorInfo::domain].
    pub fn set_domain<T: Into<String>>(mut self, v: T) -> Self {
        self.domain = v.into();
        self
    }

    /// Sets the value of [reason][ErrorInfo::reason].
    pub fn set_reason<T: Into<String>>(mut self, v: T) -> Self {
        self.reason = v.into();
        self
    }

    /// Sets the value of [message][ErrorInfo::message].
    pub fn set_message<T: Into<String>>(mut self, v: T) -> Self {
        self.message = v.into();
        self
    }

    /// Sets the value of [location][ErrorInfo::location].
    pub fn set_location<T: Into<String>>(mut self, v: T) -> Self {
        self.location = Some(v.into());
        self
    }

    /// Sets the value of [location_type][ErrorInfo::location_type].
    pub fn set_location_type<T: Into<String>>(mut self, v: T) -> Self {
        self.location_type = Some(v.into());
        self
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.reason, self.message)
    }
}

/// The handling category of a service [Status].
///
/// The samples handle errors in three ways. A missing resource is often part
/// of the normal flow, an invalid request needs its details shown to the
/// developer, and anything else must propagate to the caller unswallowed.
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorClass {
    /// The resource named in the request does not exist.
    NotFound,
    /// The request was rejected by the service, with the reported details.
    Client(Vec<ErrorInfo>),
    /// A server-side or unrecognized error. Do not handle, propagate.
    ServerOrUnknown,
}

/// The format of the error responses.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
struct ErrorWrapper {
    error: Status,
}

impl TryFrom<&bytes::Bytes> for Status {
    type Error = Error;

    fn try_from(value: &bytes::Bytes) -> std::result::Result<Self, Self::Error> {
        serde_json::from_slice::<ErrorWrapper>(value)
            .map(|w| w.error)
            .map_err(Error::deser)
    }
}
