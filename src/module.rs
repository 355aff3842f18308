//! Module entry point: parameter parsing, validation, token fetch, and header injection.
//!
//! [`AccessTokenModule`] replaces the host's bean lifecycle with a constructor (wiring the
//! transport and audit sink) plus [`AccessTokenModule::process`]. The instance holds only
//! immutable shared state, so the host may route any number of concurrent messages through
//! one instance; everything about the current message lives inside a single `process` call.

pub use crate::obs::ProcessStage;

// self
use crate::{
	_prelude::*,
	audit::{AuditSink, Diagnostics},
	client::TokenClient,
	config::{ModuleContext, TokenRequestConfigBuilder},
	http::TokenHttpClient,
	inject,
	message::ModuleMessage,
	obs::{self, ProcessOutcome, ProcessSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Module specialized for the crate's default reqwest transport.
pub type ReqwestAccessTokenModule = AccessTokenModule<ReqwestHttpClient>;

/// Fetches an access token and attaches it to each message passed to [`Self::process`].
pub struct AccessTokenModule<C>
where
	C: ?Sized + TokenHttpClient,
{
	client: TokenClient<C>,
	audit: Arc<dyn AuditSink>,
}
impl<C> AccessTokenModule<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates a module that reuses the caller-provided transport.
	pub fn with_http_client(http_client: impl Into<Arc<C>>, audit: Arc<dyn AuditSink>) -> Self {
		Self { client: TokenClient::new(http_client), audit }
	}

	/// Runs the module for one message.
	///
	/// Stages run strictly in order: parameters are read from `context`, validated, used
	/// to fetch a token, and the token is written into `message`. The first failure is
	/// logged as an error entry and returned; the host must treat it as fatal for the
	/// message. On success the same message is returned carrying the new property.
	pub async fn process<M, X>(&self, context: &X, mut message: M) -> Result<M>
	where
		M: ModuleMessage,
		X: ?Sized + ModuleContext,
	{
		let builder = TokenRequestConfigBuilder::from_context(context);
		let key = message.message_key().clone();
		let diagnostics = Diagnostics::new(self.audit.as_ref(), &key, builder.debug);

		obs::record_process_outcome(ProcessStage::ParseConfig, ProcessOutcome::Attempt);
		diagnostics.debug("Access token module start.");
		diagnostics.debug(format_args!("Debug mode set to: {}", builder.debug));

		let result = self.run(builder, &mut message, &diagnostics).await;

		match &result {
			Ok(()) => obs::record_process_outcome(ProcessStage::Done, ProcessOutcome::Success),
			Err(e) => {
				diagnostics.error(e);
				obs::record_process_outcome(e.stage(), ProcessOutcome::Failure);
			},
		}

		diagnostics.debug("Access token module end.");

		result.map(|()| message)
	}

	async fn run<M>(
		&self,
		builder: TokenRequestConfigBuilder,
		message: &mut M,
		diagnostics: &Diagnostics<'_>,
	) -> Result<()>
	where
		M: ?Sized + ModuleMessage,
	{
		let message_id = message.message_key().message_id.clone();
		let config = {
			let _guard = ProcessSpan::new(&message_id, ProcessStage::ValidateConfig).entered();

			builder.build()?
		};
		let token = ProcessSpan::new(&message_id, ProcessStage::FetchToken)
			.instrument(self.client.fetch_token(&config, diagnostics))
			.await?;

		{
			let _guard = ProcessSpan::new(&message_id, ProcessStage::InjectHeader).entered();

			inject::set_property(message, config.header_key(), &token.access_token, diagnostics)?;
		}

		Ok(())
	}
}
#[cfg(feature = "reqwest")]
impl AccessTokenModule<ReqwestHttpClient> {
	/// Creates a module backed by a default reqwest transport.
	pub fn new(audit: Arc<dyn AuditSink>) -> Self {
		Self::with_http_client(ReqwestHttpClient::default(), audit)
	}
}
impl<C> Debug for AccessTokenModule<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessTokenModule").field("client", &self.client).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::{
		AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse, http::StatusCode,
	};
	// self
	use super::*;
	use crate::{
		audit::{AuditStatus, MemoryAuditLog},
		config::keys,
		error::Error,
		message::{MessageDirection, MessageKey, PipelineMessage},
	};

	#[derive(Debug)]
	struct NeverFails;
	impl Display for NeverFails {
		fn fmt(&self, f: &mut Formatter) -> FmtResult {
			f.write_str("Never fails.")
		}
	}
	impl StdError for NeverFails {}

	// Always answers `200 {"access_token":"abc123"}` and counts calls.
	#[derive(Default)]
	struct CountingHttpClient {
		calls: Arc<Mutex<usize>>,
	}
	impl TokenHttpClient for CountingHttpClient {
		type Handle = CountingHttpHandle;
		type TransportError = NeverFails;

		fn handle(&self) -> Self::Handle {
			CountingHttpHandle { calls: self.calls.clone() }
		}
	}

	struct CountingHttpHandle {
		calls: Arc<Mutex<usize>>,
	}
	impl<'c> AsyncHttpClient<'c> for CountingHttpHandle {
		type Error = HttpClientError<NeverFails>;
		type Future =
			Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

		fn call(&'c self, _request: HttpRequest) -> Self::Future {
			*self.calls.lock() += 1;

			Box::pin(async move {
				let mut response = HttpResponse::new(br#"{"access_token":"abc123"}"#.to_vec());

				*response.status_mut() = StatusCode::OK;

				Ok(response)
			})
		}
	}

	fn context(header_name: &str, debug: bool) -> HashMap<String, String> {
		[
			(keys::AUTHENTICATION_URL, "https://auth.example.com/token"),
			(keys::CLIENT_ID, "client"),
			(keys::CLIENT_SECRET, "secret"),
			(keys::GRANT_TYPE, "client_credentials"),
			(keys::API_VERSION, "v3"),
			(keys::ACCESS_TOKEN_HEADER_NAME, header_name),
			(keys::ADAPTER_TYPE, "SOAP"),
			(keys::DEBUG_ENABLED, if debug { "true" } else { "false" }),
		]
		.into_iter()
		.map(|(key, value)| (key.to_owned(), value.to_owned()))
		.collect()
	}

	fn module() -> (AccessTokenModule<CountingHttpClient>, Arc<CountingHttpClient>, Arc<MemoryAuditLog>)
	{
		let http_client = Arc::new(CountingHttpClient::default());
		let log = Arc::new(MemoryAuditLog::default());
		let module = AccessTokenModule::with_http_client(http_client.clone(), log.clone());

		(module, http_client, log)
	}

	fn message(id: &str) -> PipelineMessage {
		PipelineMessage::new(MessageKey::new(id, MessageDirection::Outbound))
	}

	#[tokio::test]
	async fn injects_token_under_adapter_namespace() {
		let (module, http_client, log) = module();
		let message = module
			.process(&context("accessTokenHeader", false), message("ok"))
			.await
			.expect("Module should succeed.");
		let key = crate::message::MessagePropertyKey::new(
			"accessTokenHeader",
			"http://sap.com/xi/XI/System/SOAP",
		);

		assert_eq!(message.message_property(&key), Some("abc123"));
		assert_eq!(*http_client.calls.lock(), 1);
		assert!(log.entries().is_empty());
	}

	#[tokio::test]
	async fn validation_failure_skips_network_and_logs_once() {
		let (module, http_client, log) = module();
		let mut context = context("accessTokenHeader", false);

		context.remove(keys::CLIENT_ID);

		let err = module
			.process(&context, message("invalid"))
			.await
			.expect_err("Missing client id should fail.");

		assert!(matches!(err, Error::Validation(_)));
		assert_eq!(err.stage(), ProcessStage::ValidateConfig);
		assert_eq!(*http_client.calls.lock(), 0);

		let entries = log.entries();

		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].status, AuditStatus::Error);
		assert_eq!(entries[0].text, err.to_string());
	}

	#[tokio::test]
	async fn rejected_property_write_is_terminal() {
		let (module, http_client, log) = module();
		let err = module
			.process(&context("access token", true), message("bad-header"))
			.await
			.expect_err("Property names with spaces should be rejected by the message.");

		assert!(matches!(err, Error::PropertyInjection(_)));
		assert_eq!(err.stage(), ProcessStage::InjectHeader);
		assert_eq!(*http_client.calls.lock(), 1);

		let entries = log.entries();
		let texts = entries.iter().map(|entry| entry.text.as_str()).collect::<Vec<_>>();

		assert_eq!(texts.first(), Some(&"Access token module start."));
		assert_eq!(texts.last(), Some(&"Access token module end."));
		assert_eq!(
			entries.iter().filter(|entry| entry.status == AuditStatus::Error).count(),
			1
		);
	}
}
