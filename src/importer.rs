//! High-level importer tying the ledger client to an [`ImportSession`].
//!
//! The importer fetches the reference categories, validates uploaded rows
//! against them and submits the clean ones in a single bulk request. A
//! failed submission is not an error: it completes the session with every
//! row counted as failed.

/// Generates a high-level importer (async or blocking) with builder and methods.
macro_rules! define_importer {
    (
        importer_name: $importer:ident,
        builder_name: $builder:ident,
        http_client: $http_client:ty,
        importer_doc: $importer_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug, Default)]
        pub struct $builder {
            /// Optional bearer token.
            token: Option<SecretString>,
            /// Base URL override.
            base_url: Option<String>,
            /// Validation switches applied to every load.
            options: ValidationOptions,
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

            /// Sets the validation switches.
            #[inline]
            #[must_use]
            pub const fn validation_options(mut self, options: ValidationOptions) -> Self {
                self.options = options;
                self
            }

            /// Builds the importer.
            ///
            /// # Errors
            ///
            /// Returns [`ImportError::Http`](crate::error::ImportError::Http) if
            /// the HTTP client fails to build.
            #[inline]
            pub fn build(self) -> Result<$importer> {
                let mut http_builder = <$http_client>::builder();
                if let Some(token) = self.token.as_ref() {
                    http_builder = http_builder.token(token.expose_secret());
                }
                if let Some(url) = self.base_url {
                    http_builder = http_builder.base_url(url);
                }
                let client = http_builder.build()?;

                Ok($importer {
                    client,
                    options: self.options,
                })
            }
        }

        #[doc = $importer_doc]
        #[derive(Debug)]
        pub struct $importer {
            /// Low-level HTTP client.
            client: $http_client,
            /// Validation switches applied to every load.
            options: ValidationOptions,
        }

        impl $importer {
            /// Creates a new builder for configuring the importer.
            #[inline]
            #[must_use]
            pub fn builder() -> $builder {
                $builder::default()
            }

            /// Returns a reference to the underlying HTTP client.
            #[inline]
            #[must_use]
            pub const fn inner_client(&self) -> &$http_client {
                &self.client
            }

            /// Validation switches in effect.
            #[inline]
            #[must_use]
            pub const fn validation_options(&self) -> ValidationOptions {
                self.options
            }

            /// Fetches the reference categories into a lookup index.
            ///
            /// # Errors
            ///
            /// Returns an error if the categories cannot be fetched.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn categories(&self) -> Result<CategoryIndex> {
                let categories = self.client.account_categories() $( .$await_ext )? ?;
                tracing::debug!(categories = categories.len(), "fetched reference categories");
                Ok(CategoryIndex::new(categories))
            }

            /// Validates rows against freshly fetched reference categories
            /// without touching any session.
            ///
            /// # Errors
            ///
            /// Returns an error if the categories cannot be fetched.
            #[inline]
            #[tracing::instrument(skip_all, fields(rows = rows.len()))]
            pub $($async_kw)? fn validate(&self, rows: &[ImportRow]) -> Result<ValidationReport> {
                let categories = self.categories() $( .$await_ext )? ?;
                Ok(validate_rows(rows, &categories, self.options))
            }

            /// Loads rows into the session, validating them against the
            /// reference categories.
            ///
            /// # Errors
            ///
            /// Returns an error if the categories cannot be fetched or the
            /// session is not at the upload step.
            #[inline]
            #[tracing::instrument(skip_all, fields(rows = rows.len()))]
            pub $($async_kw)? fn load<'s>(
                &self,
                session: &'s mut ImportSession,
                rows: Vec<ImportRow>,
            ) -> Result<&'s ValidationReport> {
                let categories = self.categories() $( .$await_ext )? ?;
                let report = session.load(rows, &categories, self.options)?;
                tracing::info!(
                    rows = report.total_rows(),
                    errors = report.errors().len(),
                    importable = report.importable_count(),
                    "validated import file"
                );
                Ok(report)
            }

            /// Submits the session's rows in one bulk request and completes
            /// the session.
            ///
            /// A transport or API failure does not return an error: the
            /// session completes with every row counted as failed and the
            /// failure message attached to the outcome.
            ///
            /// # Errors
            ///
            /// Returns [`ImportError::ValidationFailed`](crate::error::ImportError::ValidationFailed)
            /// if the loaded file has validation errors and
            /// [`ImportError::InvalidStage`](crate::error::ImportError::InvalidStage)
            /// if the session is not at the validate step.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn submit(&self, session: &mut ImportSession) -> Result<ImportOutcome> {
                let request = session.begin_import()?;
                tracing::info!(transactions = request.transactions.len(), "submitting bulk import");
                let outcome = match self.client.bulk_import(&request) $( .$await_ext )? {
                    Ok(outcome) => session.complete(outcome)?,
                    Err(err) => {
                        tracing::warn!(error = %err, "bulk import failed; counting every row as failed");
                        session.fail(err.to_string())?
                    }
                };
                tracing::info!(
                    success = outcome.success_count,
                    failed = outcome.failed_count,
                    "bulk import finished"
                );
                Ok(outcome.clone())
            }

            /// Loads, validates and submits rows in one go using a fresh
            /// session.
            ///
            /// # Errors
            ///
            /// Returns an error if the categories cannot be fetched or any
            /// row has validation errors.
            #[inline]
            pub $($async_kw)? fn import_rows(&self, rows: Vec<ImportRow>) -> Result<ImportOutcome> {
                let mut session = ImportSession::new();
                let _report = self.load(&mut session, rows) $( .$await_ext )? ?;
                self.submit(&mut session) $( .$await_ext )?
            }
        }

    };
}

// ── Async variant ───────────────────────────────────────────────────────

#[cfg(feature = "async")]
mod async_importer {
    //! Async high-level importer.

    use crate::client::LedgerClient;
    use secrecy::{ExposeSecret as _, SecretString};

    use crate::error::Result;
    use crate::import::{ImportRow, ImportSession, ValidationOptions, ValidationReport, validate_rows};
    use crate::models::{CategoryIndex, ImportOutcome};

    define_importer! {
        importer_name: Importer,
        builder_name: ImporterBuilder,
        http_client: LedgerClient,
        importer_doc: "High-level async importer.\n\nUse [`Importer::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing an [`Importer`].",
        async_kw: async,
        await_kw: await,
    }
}

// ── Blocking variant ────────────────────────────────────────────────────

#[cfg(feature = "blocking")]
mod blocking_importer {
    //! Blocking high-level importer.

    use crate::client::LedgerBlockingClient;
    use secrecy::{ExposeSecret as _, SecretString};

    use crate::error::Result;
    use crate::import::{ImportRow, ImportSession, ValidationOptions, ValidationReport, validate_rows};
    use crate::models::{CategoryIndex, ImportOutcome};

    define_importer! {
        importer_name: BlockingImporter,
        builder_name: BlockingImporterBuilder,
        http_client: LedgerBlockingClient,
        importer_doc: "High-level blocking importer.\n\nUse [`BlockingImporter::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`BlockingImporter`].",
    }
}

#[cfg(feature = "async")]
pub use async_importer::{Importer, ImporterBuilder};
#[cfg(feature = "blocking")]
pub use blocking_importer::{BlockingImporter, BlockingImporterBuilder};

#[cfg(all(test, feature = "async"))]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::ImportError;
    use crate::import::{ImportSession, Stage, ValidationOptions, parse_csv_str};

    const CATEGORIES_PATH: &str = "/api/v1/financial/account-categories";
    const BULK_IMPORT_PATH: &str = "/api/v1/financial/transactions/bulk-import";

    const VALID_FILE: &str = "\
amount,transaction_type,description,category,transaction_date,notes,region,account_category_id
1000000,INCOME,Sales Revenue,Product Sales,2024-01-15,Monthly sales,Jakarta Pusat,54
500000,EXPENSE,Office Rent,Rent Expense,2024-01-01,,Jakarta Pusat,66
2000000,ASSET,Cash,Cash,2024-01-10,Initial cash deposit,Bali,27
";

    async fn mount_categories(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path(CATEGORIES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 27, "name": "Cash", "code": "1110", "type": "ASSET", "parent_id": 26},
                {"id": 54, "name": "Sales Revenue", "code": "4100", "type": "INCOME", "parent_id": 53},
                {"id": 66, "name": "Rent Expense", "code": "5220", "type": "EXPENSE", "parent_id": 64}
            ])))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn reports_backend_counts_as_is() {
        let server = MockServer::start().await;
        mount_categories(&server).await;
        Mock::given(method("POST"))
            .and(path(BULK_IMPORT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success_count": 2,
                "failed_count": 1,
                "errors": [{"row": 3, "error": "duplicate transaction"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let importer = Importer::builder().base_url(server.uri()).build().unwrap();
        let mut session = ImportSession::new();
        let report = importer
            .load(&mut session, parse_csv_str(VALID_FILE).unwrap())
            .await
            .unwrap();
        assert!(report.is_clean());

        let outcome = importer.submit(&mut session).await.unwrap();
        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.failed_count, 1);
        assert_eq!(outcome.errors[0].error, "duplicate transaction");
        assert_eq!(session.stage(), Stage::Complete);

        let requests = server.received_requests().await.unwrap();
        let post = requests.iter().find(|req| req.method.as_str() == "POST").unwrap();
        let body: serde_json::Value = serde_json::from_slice(&post.body).unwrap();
        assert_eq!(body["transactions"].as_array().map(Vec::len), Some(3));
        assert_eq!(body["transactions"][1]["notes"], "");
    }

    #[tokio::test]
    async fn api_failure_counts_every_row_as_failed() {
        let server = MockServer::start().await;
        mount_categories(&server).await;
        Mock::given(method("POST"))
            .and(path(BULK_IMPORT_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
            .mount(&server)
            .await;

        let importer = Importer::builder().base_url(server.uri()).build().unwrap();
        let outcome = importer
            .import_rows(parse_csv_str(VALID_FILE).unwrap())
            .await
            .unwrap();
        assert_eq!(outcome.success_count, 0);
        assert_eq!(outcome.failed_count, 3);
        assert!(outcome.errors.is_empty());
        assert!(outcome.failure.unwrap().contains("database unavailable"));
    }

    #[tokio::test]
    async fn unreachable_backend_on_submit_degrades_to_outcome() {
        let server = MockServer::start().await;
        mount_categories(&server).await;

        let importer = Importer::builder().base_url(server.uri()).build().unwrap();
        let mut session = ImportSession::new();
        let _report = importer
            .load(&mut session, parse_csv_str(VALID_FILE).unwrap())
            .await
            .unwrap();

        let offline = Importer::builder()
            .base_url("http://127.0.0.1:1")
            .build()
            .unwrap();
        let outcome = offline.submit(&mut session).await.unwrap();
        assert_eq!(outcome.success_count, 0);
        assert_eq!(outcome.failed_count, 3);
        assert!(outcome.failure.is_some());
    }

    #[tokio::test]
    async fn refuses_to_submit_with_validation_errors() {
        let server = MockServer::start().await;
        mount_categories(&server).await;

        let file = "\
amount,transaction_type,description,category,transaction_date,region,account_category_id
-5,INCOME,Sales,Product Sales,2024-01-15,Bali,54
10,INCOME,Sales,Product Sales,2024-01-15,Bali,9999
";
        let importer = Importer::builder().base_url(server.uri()).build().unwrap();
        let err = importer
            .import_rows(parse_csv_str(file).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::ValidationFailed { errors: 2 }));

        let requests = server.received_requests().await.unwrap();
        assert!(requests.iter().all(|req| req.method.as_str() == "GET"));
    }

    #[tokio::test]
    async fn validate_applies_configured_options() {
        let server = MockServer::start().await;
        mount_categories(&server).await;

        let file = "\
amount,transaction_type,description,category,transaction_date,region,account_category_id
10,EXPENSE,Sales,Product Sales,2024-01-15,Bali,54
";
        let rows = parse_csv_str(file).unwrap();

        let lenient = Importer::builder().base_url(server.uri()).build().unwrap();
        assert!(lenient.validate(&rows).await.unwrap().is_clean());

        let strict = Importer::builder()
            .base_url(server.uri())
            .validation_options(ValidationOptions {
                check_category_type: true,
            })
            .build()
            .unwrap();
        let report = strict.validate(&rows).await.unwrap();
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].row, 1);
    }

    #[tokio::test]
    async fn category_fetch_failure_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CATEGORIES_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let importer = Importer::builder().base_url(server.uri()).build().unwrap();
        let mut session = ImportSession::new();
        let err = importer
            .load(&mut session, parse_csv_str(VALID_FILE).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Api { status: 503, .. }));
        assert_eq!(session.stage(), Stage::Upload);
    }

    #[cfg(feature = "blocking")]
    #[tokio::test(flavor = "multi_thread")]
    async fn blocking_importer_submits_against_live_server() {
        let server = MockServer::start().await;
        mount_categories(&server).await;
        Mock::given(method("POST"))
            .and(path(BULK_IMPORT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success_count": 2,
                "failed_count": 1,
                "errors": [{"row": 2, "error": "duplicate transaction"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let uri = server.uri();
        let outcome = tokio::task::spawn_blocking(move || {
            let importer = BlockingImporter::builder().base_url(uri).build().unwrap();
            importer
                .import_rows(parse_csv_str(VALID_FILE).unwrap())
                .unwrap()
        })
        .await
        .unwrap();

        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.failed_count, 1);
        assert_eq!(outcome.errors[0].row, 2);
    }
}
