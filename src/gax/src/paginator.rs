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

//! Lazy consumption of list RPCs.
//!
//! The Shopping APIs return list results in pages: each response carries a
//! bounded slice of items and, when more results remain, an opaque
//! `nextPageToken` to send verbatim on the following request. [Paginator]
//! drives that exchange as a lazy sequence: nothing is sent until the
//! sequence is polled, each page costs exactly one request, and iteration
//! ends when the service omits the token. [ItemPaginator] flattens the pages
//! into their items.
//!
//! # Example
//! ```
//! use google_shopping_gax::paginator::{PageableResponse, Paginator};
//! # use google_shopping_gax::error::Error;
//!
//! #[derive(Clone, Default)]
//! struct ListAccountsResponse {
//!     accounts: Vec<String>,
//!     next_page_token: String,
//! }
//!
//! impl PageableResponse for ListAccountsResponse {
//!     type PageItem = String;
//!     fn items(self) -> Vec<String> {
//!         self.accounts
//!     }
//!     fn next_page_token(&self) -> String {
//!         self.next_page_token.clone()
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let execute = |page_token: String| async move {
//!     // One request per page goes out here; the samples use their
//!     // authenticated HTTP client. This stub returns a single page.
//!     let accounts = if page_token.is_empty() {
//!         vec!["accounts/100".to_string(), "accounts/101".to_string()]
//!     } else {
//!         Vec::new()
//!     };
//!     Ok::<_, Error>(ListAccountsResponse {
//!         accounts,
//!         next_page_token: String::new(),
//!     })
//! };
//!
//! let mut accounts = Paginator::new(String::new(), execute).items();
//! while let Some(account) = accounts.next().await {
//!     match account {
//!         Ok(account) => println!("{account}"),
//!         Err(e) => eprintln!("listing failed: {e}"),
//!     }
//! }
//! # });
//! ```

use futures::stream::unfold;
use futures::{Stream, StreamExt};
use std::future::Future;
use std::pin::Pin;

/// Describes a type that can be iterated over asyncly when used with [Paginator].
pub trait PageableResponse {
    /// The type of the items in the response.
    type PageItem;

    /// Consumes the response, returning its items in service order.
    fn items(self) -> Vec<Self::PageItem>;

    /// The continuation token for the next page.
    ///
    /// An empty string indicates the last page. List responses omit the
    /// field when no results remain, and the default deserialization maps
    /// the missing field to `""`.
    fn next_page_token(&self) -> String;
}

/// An adapter that converts list RPCs as defined by [AIP-4233](https://google.aip.dev/client-libraries/4233)
/// into a lazy sequence of pages.
///
/// The paginator issues at most one request at a time and never retries: a
/// failed page fetch is handed to the caller once and the sequence ends.
/// Callers that want a retry policy wrap their `execute` function with one.
pub struct Paginator<T, E> {
    stream: Pin<Box<dyn Stream<Item = Result<T, E>>>>,
}

type ControlFlow = std::ops::ControlFlow<(), String>;

impl<T, E> Paginator<T, E>
where
    T: PageableResponse,
{
    /// Creates a new [Paginator] given the initial page token and a function
    /// to fetch the next [PageableResponse].
    ///
    /// `execute` receives the continuation token to send, unmodified, with
    /// the next request. Pass an empty `seed_token` to start a listing from
    /// the beginning; pass a token previously returned by the service to
    /// resume from that point. Each call to `new` starts a fresh enumeration
    /// and the service makes no consistency promises between enumerations.
    pub fn new<F>(seed_token: String, execute: impl Fn(String) -> F + Clone + 'static) -> Self
    where
        F: Future<Output = Result<T, E>> + 'static,
    {
        let stream = unfold(ControlFlow::Continue(seed_token), move |state| {
            let execute = execute.clone();
            async move {
                let token = match state {
                    ControlFlow::Continue(token) => token,
                    ControlFlow::Break(_) => return None,
                };
                match execute(token).await {
                    Ok(page) => {
                        let token = page.next_page_token();
                        tracing::debug!(last_page = token.is_empty(), "received list page");
                        let next_state = if token.is_empty() {
                            ControlFlow::Break(())
                        } else {
                            ControlFlow::Continue(token)
                        };
                        Some((Ok(page), next_state))
                    }
                    Err(e) => {
                        tracing::debug!("list page request failed");
                        Some((Err(e), ControlFlow::Break(())))
                    }
                }
            }
        });
        Self {
            stream: Box::pin(stream),
        }
    }

    /// Returns the next page in the sequence.
    ///
    /// Returns `None` after the last page, and after an error has been
    /// delivered.
    pub async fn next(&mut self) -> Option<Result<T, E>> {
        self.stream.next().await
    }

    /// Converts the sequence of pages into a sequence of their items.
    ///
    /// Items are yielded in service order across pages, with no reordering
    /// and no deduplication.
    pub fn items(self) -> ItemPaginator<T, E> {
        ItemPaginator::new(self)
    }

    /// Converts the paginator into a [futures::Stream] of pages.
    #[cfg(feature = "unstable-stream")]
    pub fn into_stream(self) -> impl Stream<Item = Result<T, E>> {
        self.stream
    }
}

/// An adapter that flattens the pages produced by a [Paginator] into their
/// items.
pub struct ItemPaginator<T, E>
where
    T: PageableResponse,
{
    stream: Paginator<T, E>,
    current: Option<std::vec::IntoIter<T::PageItem>>,
}

impl<T, E> ItemPaginator<T, E>
where
    T: PageableResponse,
{
    fn new(parent: Paginator<T, E>) -> Self {
        Self {
            stream: parent,
            current: None,
        }
    }

    /// Returns the next item in the sequence.
    ///
    /// Each page is drained before the next request goes out. Returns `None`
    /// after the last page's items, and after an error has been delivered.
    pub async fn next(&mut self) -> Option<Result<T::PageItem, E>> {
        loop {
            if let Some(iter) = self.current.as_mut() {
                if let Some(item) = iter.next() {
                    return Some(Ok(item));
                }
            }
            match self.stream.next().await {
                Some(Ok(page)) => self.current = Some(page.items().into_iter()),
                Some(Err(e)) => return Some(Err(e)),
                None => return None,
            }
        }
    }

    /// Converts the paginator into a [futures::Stream] of items.
    #[cfg(feature = "unstable-stream")]
    pub fn into_stream(self) -> impl Stream<Item = Result<T::PageItem, E>> {
        unfold(Some(self), |state| async move {
            if let Some(mut paginator) = state {
                if let Some(item) = paginator.next().await {
                    return Some((item, Some(paginator)));
                }
            }
            None
        })
    }
}
