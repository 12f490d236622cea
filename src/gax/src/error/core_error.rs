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

use super::rpc::{ErrorClass, Status};
use http::HeaderMap;
use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The core error returned by the samples' RPC wrappers.
///
/// A request can fail in several places: the transport may be unable to
/// deliver it, the response body may not decode, or the service may process
/// the request and report an error of its own. Most samples just print the
/// error and stop. The ones that recover interrogate it: this type offers
/// predicates to determine the failure kind, accessors for the common
/// details, and [classify][Error::classify] for the standard handling split.
/// Applications can query the error [source][std::error::Error::source] for
/// deeper information.
///
/// # Example
/// ```
/// use google_shopping_gax::error::Error;
/// use google_shopping_gax::error::rpc::ErrorClass;
/// match example_function() {
///     Err(e) if matches!(e.classify(), Some(ErrorClass::NotFound)) => {
///         println!("the item does not exist, insert it first: {e}");
///     },
///     Err(e) => { println!("some other error {e}"); },
///     Ok(_) => { println!("success, how boring"); },
/// }
///
/// fn example_function() -> Result<String, Error> {
///     // ... details omitted ...
///     # use google_shopping_gax::error::rpc::Status;
///     # Err(Error::service(Status::default().set_code(404).set_message("item not found")))
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

impl Error {
    /// Creates an error with the information returned by the service.
    ///
    /// # Example
    /// ```
    /// use google_shopping_gax::error::Error;
    /// use google_shopping_gax::error::rpc::Status;
    /// let status = Status::default().set_code(404).set_message("item not found");
    /// let error = Error::service(status.clone());
    /// assert_eq!(error.status(), Some(&status));
    /// ```
    pub fn service(status: Status) -> Self {
        let details = ServiceDetails {
            status,
            status_code: None,
            headers: None,
        };
        Self {
            kind: ErrorKind::Service(Box::new(details)),
            source: None,
        }
    }

    /// Creates a service error, retaining the HTTP response metadata.
    ///
    /// # Example
    /// ```
    /// use google_shopping_gax::error::Error;
    /// use google_shopping_gax::error::rpc::Status;
    /// let status = Status::default().set_code(404).set_message("item not found");
    /// let error = Error::service_with_http_metadata(
    ///     status, Some(404), Some(http::HeaderMap::new()));
    /// assert_eq!(error.http_status_code(), Some(404));
    /// ```
    pub fn service_with_http_metadata(
        status: Status,
        status_code: Option<u16>,
        headers: Option<http::HeaderMap>,
    ) -> Self {
        let details = ServiceDetails {
            status_code,
            headers,
            status,
        };
        let kind = ErrorKind::Service(Box::new(details));
        Self { kind, source: None }
    }

    /// Creates an error from an HTTP response that carries no decodable
    /// service error payload.
    ///
    /// Proxies and load balancers can generate errors before the request
    /// reaches the service, without the structured payload described in the
    /// [error format] documentation. In such cases the samples keep the
    /// status code, headers, and raw body.
    ///
    /// [error format]: https://developers.google.com/shopping-content/guides/error-handling
    ///
    /// # Example
    /// ```
    /// use google_shopping_gax::error::Error;
    /// let error = Error::http(
    ///     502, http::HeaderMap::new(), bytes::Bytes::from_static(b"BAD GATEWAY"));
    /// assert!(error.is_transport());
    /// assert_eq!(error.http_status_code(), Some(502));
    /// ```
    pub fn http(status_code: u16, headers: HeaderMap, payload: bytes::Bytes) -> Self {
        let details = TransportDetails {
            status_code: Some(status_code),
            headers: Some(headers),
            payload: Some(payload),
        };
        let kind = ErrorKind::Transport(Box::new(details));
        Self { kind, source: None }
    }

    /// Creates an error representing a transport problem without a full HTTP
    /// response.
    ///
    /// Examples include a connection that could not be opened, or one that
    /// broke after the request was sent.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use google_shopping_gax::error::Error;
    /// let error = Error::io("simulated connection reset");
    /// assert!(error.is_io());
    /// assert!(error.source().is_some());
    /// ```
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        let details = TransportDetails {
            status_code: None,
            headers: None,
            payload: None,
        };
        Self {
            kind: ErrorKind::Transport(Box::new(details)),
            source: Some(source.into()),
        }
    }

    /// Creates an error representing a deserialization problem.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use google_shopping_gax::error::Error;
    /// let error = Error::deser("simulated problem");
    /// assert!(error.is_deserialization());
    /// assert!(error.source().is_some());
    /// ```
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Deserialization,
            source: Some(source.into()),
        }
    }

    /// The response could not be deserialized.
    ///
    /// This is always a client-side generated error. The request may or may
    /// not have completed in the service.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Deserialization)
    }

    /// A problem in the transport layer without a full HTTP response.
    ///
    /// Examples include read or write problems, and broken connections. Such
    /// failures say nothing about whether the service processed the request,
    /// and they carry no status code to classify.
    pub fn is_io(&self) -> bool {
        matches!(
        &self.kind,
        ErrorKind::Transport(d) if matches!(**d, TransportDetails {
            status_code: None,
            headers: None,
            payload: None,
            ..
        }))
    }

    /// A problem reported by the transport layer.
    ///
    /// This covers both [io][Error::io] failures and HTTP responses whose
    /// body did not decode as a service error payload.
    pub fn is_transport(&self) -> bool {
        matches!(&self.kind, ErrorKind::Transport { .. })
    }

    /// The [Status] payload associated with this error.
    ///
    /// The Shopping services return a detailed payload including a numeric
    /// code for the error type, a human-readable message, and a sequence of
    /// details about what caused the failure.
    ///
    /// # Example
    /// ```
    /// use google_shopping_gax::error::Error;
    /// use google_shopping_gax::error::rpc::Status;
    /// let error = Error::service(Status::default().set_code(404));
    /// if let Some(status) = error.status() {
    ///     if status.code == 404 {
    ///         println!("cannot find the thing, more details in {:?}", status.errors);
    ///     }
    /// }
    /// ```
    pub fn status(&self) -> Option<&Status> {
        match &self.kind {
            ErrorKind::Service(d) => Some(&d.as_ref().status),
            _ => None,
        }
    }

    /// The HTTP status code, if any, associated with this error.
    ///
    /// # Example
    /// ```
    /// use google_shopping_gax::error::Error;
    /// let e = search_for_thing("the thing");
    /// if let Some(code) = e.http_status_code() {
    ///     if code == 404 {
    ///         println!("cannot find the thing, more details in {e}");
    ///     }
    /// }
    ///
    /// fn search_for_thing(name: &str) -> Error {
    ///     # Error::http(404, http::HeaderMap::new(), bytes::Bytes::from_static(b"NOT FOUND"))
    /// }
    /// ```
    ///
    /// Note that `http_status_code()`, `http_headers()`, `http_payload()`,
    /// and `status()` are represented as different fields, because they may
    /// be set in some errors but not others.
    pub fn http_status_code(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Transport(d) => d.as_ref().status_code,
            ErrorKind::Service(d) => d.as_ref().status_code,
            _ => None,
        }
    }

    /// The headers, if any, associated with this error.
    pub fn http_headers(&self) -> Option<&http::HeaderMap> {
        match &self.kind {
            ErrorKind::Transport(d) => d.as_ref().headers.as_ref(),
            ErrorKind::Service(d) => d.as_ref().headers.as_ref(),
            _ => None,
        }
    }

    /// The payload, if any, associated with this error.
    pub fn http_payload(&self) -> Option<&bytes::Bytes> {
        match &self.kind {
            ErrorKind::Transport(d) => d.payload.as_ref(),
            _ => None,
        }
    }

    /// Classifies this error for handling at the call site.
    ///
    /// Only errors that carry a service [Status] are classified. Transport
    /// and deserialization failures return `None`: they say nothing about
    /// the request's outcome and should propagate the same way as
    /// [ErrorClass::ServerOrUnknown].
    ///
    /// # Example
    /// ```
    /// use google_shopping_gax::error::Error;
    /// use google_shopping_gax::error::rpc::{ErrorClass, Status};
    /// let error = Error::service(Status::default().set_code(404));
    /// assert_eq!(error.classify(), Some(ErrorClass::NotFound));
    ///
    /// let error = Error::io("simulated connection reset");
    /// assert_eq!(error.classify(), None);
    /// ```
    pub fn classify(&self) -> Option<ErrorClass> {
        self.status().map(Status::classify)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, &self.source) {
            (ErrorKind::Deserialization, Some(e)) => {
                write!(f, "cannot deserialize the response {e}")
            }
            (ErrorKind::Transport(details), _) => details.display(self.source(), f),
            (ErrorKind::Service(d), _) => {
                write!(
                    f,
                    "the service reports an error with code {} described as: {}",
                    d.status.code, d.status.message
                )
            }
            (_, None) => unreachable!("no constructor allows this"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error))
    }
}

/// The type of error held by an [Error] instance.
#[derive(Debug)]
enum ErrorKind {
    Deserialization,
    Transport(Box<TransportDetails>),
    Service(Box<ServiceDetails>),
}

#[derive(Debug)]
struct TransportDetails {
    status_code: Option<u16>,
    headers: Option<HeaderMap>,
    payload: Option<bytes::Bytes>,
}

impl TransportDetails {
    fn display(
        &self,
        source: Option<&(dyn StdError + 'static)>,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match (source, &self) {
            (
                _,
                TransportDetails {
                    status_code: Some(code),
                    payload: Some(p),
                    ..
                },
            ) => {
                if let Ok(message) = std::str::from_utf8(p.as_ref()) {
                    write!(f, "the HTTP transport reports a [{code}] error: {message}")
                } else {
                    write!(f, "the HTTP transport reports a [{code}] error: {p:?}")
                }
            }
            (Some(source), _) => {
                write!(f, "the transport reports an error: {source}")
            }
            (None, _) => unreachable!("no Error constructor allows this"),
        }
    }
}

#[derive(Debug)]
struct ServiceDetails {
    status_code: Option<u16>,
    headers: Option<HeaderMap>,
    status: Status,
}
