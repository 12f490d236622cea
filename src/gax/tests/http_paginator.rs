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

//! These tests run the paging loop against a local HTTP server. They verify
//! the full path used by the samples: the page token travels as a query
//! parameter, each response decodes into the next page, and error responses
//! convert into [Error] values with the right classification.
//!
//! The server keys each canned response on the `pageToken` it expects, and
//! records the tokens it receives so the tests can verify the request
//! sequence.

#[cfg(test)]
mod tests {
    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use gax::error::Error;
    use gax::error::rpc::{ErrorClass, Status};
    use gax::paginator::{PageableResponse, Paginator};
    use google_shopping_gax as gax;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tokio::task::JoinHandle;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn paginate_all_products() -> anyhow::Result<()> {
        let pages = HashMap::from([
            (String::new(), page_body(&["p1", "p2"], "t1")),
            ("t1".to_string(), page_body(&[], "t2")),
            ("t2".to_string(), page_body(&["p3"], "")),
        ]);
        let (endpoint, state, _server) = start(pages).await?;
        let client = Client::new(endpoint);

        let mut products = client.list_products().items();
        let mut got = Vec::new();
        while let Some(product) = products.next().await {
            got.push(product?.id);
        }
        assert_eq!(got, vec!["p1", "p2", "p3"]);

        let tokens = state.lock().expect("pagination state is poisoned").tokens_seen.clone();
        assert_eq!(tokens, vec!["", "t1", "t2"]);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn paginate_a_single_page() -> anyhow::Result<()> {
        let pages = HashMap::from([(String::new(), page_body(&["p1"], ""))]);
        let (endpoint, state, _server) = start(pages).await?;
        let client = Client::new(endpoint);

        let mut products = client.list_products().items();
        let mut got = Vec::new();
        while let Some(product) = products.next().await {
            got.push(product?.id);
        }
        assert_eq!(got, vec!["p1"]);

        let tokens = state.lock().expect("pagination state is poisoned").tokens_seen.clone();
        assert_eq!(tokens, vec![""]);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn invalid_page_token_stops_pagination() -> anyhow::Result<()> {
        let pages = HashMap::from([
            (String::new(), page_body(&["p1"], "t1")),
            ("t1".to_string(), invalid_request()),
        ]);
        let (endpoint, _state, _server) = start(pages).await?;
        let client = Client::new(endpoint);

        let mut pages = client.list_products();
        let page = pages.next().await.unwrap()?;
        assert_eq!(page.next_page_token, "t1");
        let error = pages.next().await.unwrap().unwrap_err();
        assert_eq!(error.http_status_code(), Some(400), "{error:?}");
        match error.classify() {
            Some(ErrorClass::Client(details)) => {
                let got = details.iter().map(|e| e.to_string()).collect::<Vec<_>>();
                assert_eq!(got, vec!["[invalid] bad field"]);
            }
            c => panic!("expected a client error class, got {c:?}: {error}"),
        }
        assert!(pages.next().await.is_none());
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn missing_account_is_not_found() -> anyhow::Result<()> {
        let pages = HashMap::from([(String::new(), not_found())]);
        let (endpoint, _state, _server) = start(pages).await?;
        let client = Client::new(endpoint);

        let mut pages = client.list_products();
        let error = pages.next().await.unwrap().unwrap_err();
        assert_eq!(error.classify(), Some(ErrorClass::NotFound), "{error:?}");
        assert_eq!(error.http_status_code(), Some(404));
        assert!(error.to_string().contains("account not found"), "{error}");
        assert!(pages.next().await.is_none());
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn plain_text_error_is_a_transport_error() -> anyhow::Result<()> {
        let pages = HashMap::from([(
            String::new(),
            (StatusCode::BAD_GATEWAY, "BAD GATEWAY".to_string()),
        )]);
        let (endpoint, _state, _server) = start(pages).await?;
        let client = Client::new(endpoint);

        let mut pages = client.list_products();
        let error = pages.next().await.unwrap().unwrap_err();
        assert!(error.is_transport(), "{error:?}");
        assert_eq!(error.http_status_code(), Some(502), "{error:?}");
        assert_eq!(error.classify(), None, "{error:?}");
        assert!(error.to_string().contains("BAD GATEWAY"), "{error}");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn connection_error_is_io() -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let endpoint = format!("http://{}", listener.local_addr()?);
        drop(listener);
        let client = Client::new(endpoint);

        let mut pages = client.list_products();
        let error = pages.next().await.unwrap().unwrap_err();
        assert!(error.is_io(), "{error:?}");
        assert_eq!(error.classify(), None, "{error:?}");
        assert!(pages.next().await.is_none());
        Ok(())
    }

    #[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
    #[serde(default, rename_all = "camelCase")]
    struct ListProductsResponse {
        resources: Vec<Product>,
        next_page_token: String,
    }

    #[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
    #[serde(default)]
    struct Product {
        id: String,
    }

    impl PageableResponse for ListProductsResponse {
        type PageItem = Product;
        fn items(self) -> Vec<Product> {
            self.resources
        }
        fn next_page_token(&self) -> String {
            self.next_page_token.clone()
        }
    }

    #[derive(Clone)]
    struct Client {
        inner: reqwest::Client,
        endpoint: String,
    }

    impl Client {
        fn new(endpoint: String) -> Self {
            Self {
                inner: reqwest::Client::new(),
                endpoint,
            }
        }

        fn list_products(&self) -> Paginator<ListProductsResponse, Error> {
            let client = self.clone();
            Paginator::new(String::new(), move |token| {
                let client = client.clone();
                async move { client.list_page(token).await }
            })
        }

        async fn list_page(&self, page_token: String) -> gax::Result<ListProductsResponse> {
            let builder = self.inner.get(format!("{}/products", self.endpoint));
            let builder = if page_token.is_empty() {
                builder
            } else {
                builder.query(&[("pageToken", page_token)])
            };
            let response = builder.send().await.map_err(Error::io)?;
            if !response.status().is_success() {
                return Err(to_http_error(response).await);
            }
            let payload = response.bytes().await.map_err(Error::io)?;
            serde_json::from_slice(&payload).map_err(Error::deser)
        }
    }

    async fn to_http_error(response: reqwest::Response) -> Error {
        let status_code = response.status().as_u16();
        let headers = response.headers().clone();
        let payload = match response.bytes().await {
            Ok(payload) => payload,
            Err(e) => return Error::io(e),
        };
        match Status::try_from(&payload) {
            Ok(status) => {
                Error::service_with_http_metadata(status, Some(status_code), Some(headers))
            }
            Err(_) => Error::http(status_code, headers, payload),
        }
    }

    fn page_body(ids: &[&str], next_page_token: &str) -> (StatusCode, String) {
        let response = json!({
            "resources": ids.iter().map(|id| json!({"id": id})).collect::<Vec<_>>(),
            "nextPageToken": next_page_token,
        });
        (StatusCode::OK, response.to_string())
    }

    fn invalid_request() -> (StatusCode, String) {
        let status = json!({"error": {
            "code": 400,
            "message": "[pageToken] is not valid",
            "errors": [{"domain": "global", "reason": "invalid", "message": "bad field"}],
        }});
        (StatusCode::BAD_REQUEST, status.to_string())
    }

    fn not_found() -> (StatusCode, String) {
        let status = json!({"error": {
            "code": 404,
            "message": "account not found",
        }});
        (StatusCode::NOT_FOUND, status.to_string())
    }

    struct PageSharedState {
        pages: HashMap<String, (StatusCode, String)>,
        tokens_seen: Vec<String>,
    }

    type PageState = Arc<Mutex<PageSharedState>>;

    async fn start(
        pages: HashMap<String, (StatusCode, String)>,
    ) -> anyhow::Result<(String, PageState, JoinHandle<()>)> {
        let state = Arc::new(Mutex::new(PageSharedState {
            pages,
            tokens_seen: Vec::new(),
        }));
        let app = axum::Router::new()
            .route("/products", axum::routing::get(products))
            .with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async {
            axum::serve(listener, app).await.unwrap();
        });

        Ok((format!("http://{}:{}", addr.ip(), addr.port()), state, server))
    }

    async fn products(
        State(state): State<PageState>,
        Query(query): Query<HashMap<String, String>>,
    ) -> (StatusCode, String) {
        let token = query.get("pageToken").cloned().unwrap_or_default();
        let mut state = state.lock().expect("pagination state is poisoned");
        state.tokens_seen.push(token.clone());
        state
            .pages
            .get(&token)
            .cloned()
            .unwrap_or_else(|| (StatusCode::BAD_REQUEST, format!("unexpected page token {token}")))
    }
}
