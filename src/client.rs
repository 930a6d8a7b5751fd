//! HTTP client for the ERP financial ledger API.
//!
//! Provides both async and blocking client variants behind feature flags.

/// Base URL of a locally running ledger backend.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Account category listing endpoint path.
const CATEGORIES_PATH: &str = "/api/v1/financial/account-categories";

/// Bulk transaction import endpoint path.
const BULK_IMPORT_PATH: &str = "/api/v1/financial/transactions/bulk-import";

/// Generates a ledger client (async or blocking) with builder, methods, and tests.
macro_rules! define_client {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_type: $http_type:ty,
        response_type: $resp_type:ty,
        request_type: $req_type:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
        $(send_bound: $send_bound:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder {
            /// Optional bearer token.
            token: Option<SecretString>,
            /// Base URL override.
            base_url: Option<String>,
        }

        impl $builder {
            /// Sets a bearer token sent with every request.
            #[inline]
            #[must_use]
            pub fn token<T: Into<String>>(mut self, token: T) -> Self {
                self.token = Some(SecretString::from(token.into()));
                self
            }

            /// Overrides the base URL (useful for testing with a mock server).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Builds the client.
            ///
            /// # Errors
            ///
            /// Returns [`ImportError::Http`] if the HTTP client fails to build.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub fn build(self) -> Result<$client> {
                let base_url = self
                    .base_url
                    .as_deref()
                    .unwrap_or(DEFAULT_BASE_URL)
                    .trim_end_matches('/')
                    .to_owned();
                tracing::debug!(base_url = %base_url, authenticated = self.token.is_some(), "building client");
                let http = <$http_type>::builder().build()?;

                Ok($client {
                    http,
                    token: self.token,
                    base_url,
                })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug)]
        pub struct $client {
            /// Underlying HTTP client.
            http: $http_type,
            /// Bearer token, if configured.
            token: Option<SecretString>,
            /// API base URL without a trailing slash.
            base_url: String,
        }

        impl $client {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder {
                $builder {
                    token: None,
                    base_url: None,
                }
            }

            /// API base URL this client talks to.
            #[inline]
            #[must_use]
            pub fn base_url(&self) -> &str {
                &self.base_url
            }

            /// Fetches the reference account categories.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn account_categories(&self) -> Result<Vec<AccountCategory>> {
                tracing::debug!("fetching account categories");
                let request = self.http.get(format!("{}{CATEGORIES_PATH}", self.base_url));
                self.send_json(request) $( .$await_ext )?
            }

            /// Submits validated transactions in one bulk-import call.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(transactions = request.transactions.len()))]
            pub $($async_kw)? fn bulk_import(
                &self,
                request: &BulkImportRequest,
            ) -> Result<ImportOutcome> {
                tracing::debug!("calling bulk-import endpoint");
                let builder = self
                    .http
                    .post(format!("{}{BULK_IMPORT_PATH}", self.base_url))
                    .header(CONTENT_TYPE, "application/json")
                    .json(request);
                self.send_json(builder) $( .$await_ext )?
            }

            /// Attaches the bearer token, sends the request and deserializes
            /// a successful JSON response.
            $($async_kw)? fn send_json<Resp: serde::de::DeserializeOwned $(+ $send_bound)?>(
                &self,
                request: $req_type,
            ) -> Result<Resp> {
                let request = match self.token.as_ref() {
                    Some(token) => request.bearer_auth(token.expose_secret()),
                    None => request,
                };
                let response: $resp_type = request.send() $( .$await_ext )? ?;

                let status = response.status();
                tracing::debug!(status = %status, "received response");
                if status.is_success() {
                    let body = response.text() $( .$await_ext )? ?;
                    tracing::trace!(body_len = body.len(), "parsing response body");
                    serde_json::from_str(&body).map_err(ImportError::from)
                } else {
                    let message = response
                        .text()
                        $( .$await_ext )?
                        .unwrap_or_else(|_| "unknown error".to_owned());
                    tracing::debug!(status = status.as_u16(), message = %message, "API error");
                    Err(ImportError::Api {
                        status: status.as_u16(),
                        message,
                    })
                }
            }
        }

        #[cfg(test)]
        mod tests {
            use super::*;

            #[test]
            fn builder_defaults_to_local_backend() {
                let client = $client::builder().build().unwrap();
                assert_eq!(client.base_url(), DEFAULT_BASE_URL);
                assert!(client.token.is_none());
            }

            #[test]
            fn builder_custom_base_url_drops_trailing_slash() {
                let client = $client::builder()
                    .token("test-token")
                    .base_url("http://localhost:8080/")
                    .build()
                    .unwrap();
                assert_eq!(client.base_url(), "http://localhost:8080");
                assert!(client.token.is_some());
            }

            #[test]
            fn debug_output_hides_token() {
                let client = $client::builder().token("super-secret").build().unwrap();
                assert!(!format!("{client:?}").contains("super-secret"));
            }
        }
    };
}

#[cfg(feature = "async")]
mod async_client {
    //! Async HTTP client for the ledger API.

    use reqwest::header::CONTENT_TYPE;
    use secrecy::{ExposeSecret as _, SecretString};

    use super::{BULK_IMPORT_PATH, CATEGORIES_PATH, DEFAULT_BASE_URL};
    use crate::error::{ImportError, Result};
    use crate::models::{AccountCategory, BulkImportRequest, ImportOutcome};

    define_client! {
        client_name: LedgerClient,
        builder_name: LedgerClientBuilder,
        http_type: reqwest::Client,
        response_type: reqwest::Response,
        request_type: reqwest::RequestBuilder,
        client_doc: "Async client for the ledger API.\n\nUse [`LedgerClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`LedgerClient`].",
        async_kw: async,
        await_kw: await,
        send_bound: Send,
    }
}

#[cfg(feature = "blocking")]
mod blocking_client {
    //! Blocking (synchronous) HTTP client for the ledger API.

    use reqwest::header::CONTENT_TYPE;
    use secrecy::{ExposeSecret as _, SecretString};

    use super::{BULK_IMPORT_PATH, CATEGORIES_PATH, DEFAULT_BASE_URL};
    use crate::error::{ImportError, Result};
    use crate::models::{AccountCategory, BulkImportRequest, ImportOutcome};

    define_client! {
        client_name: LedgerBlockingClient,
        builder_name: LedgerBlockingClientBuilder,
        http_type: reqwest::blocking::Client,
        response_type: reqwest::blocking::Response,
        request_type: reqwest::blocking::RequestBuilder,
        client_doc: "Blocking (synchronous) client for the ledger API.\n\nUse [`LedgerBlockingClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`LedgerBlockingClient`].",
    }
}

#[cfg(feature = "async")]
pub use async_client::{LedgerClient, LedgerClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{LedgerBlockingClient, LedgerBlockingClientBuilder};
