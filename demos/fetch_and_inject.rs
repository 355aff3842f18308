//! Runs the access token module against a mock authentication server with debug mode on
//! and prints the injected header plus the audit trail.

// std
use std::{collections::HashMap, sync::Arc};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use access_token_module::{
	audit::MemoryAuditLog,
	config::keys,
	http::ReqwestHttpClient,
	message::{MessageDirection, MessageKey, PipelineMessage},
	module::AccessTokenModule,
	reqwest::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/token")
				.header("client-id", "demo-client")
				.header("grant-type", "client_credentials");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-access\",\"expires_in\":900}");
		})
		.await;
	let context = [
		(keys::AUTHENTICATION_URL, server.url("/token")),
		(keys::CLIENT_ID, "demo-client".into()),
		(keys::CLIENT_SECRET, "super-secret".into()),
		(keys::GRANT_TYPE, "client_credentials".into()),
		(keys::API_VERSION, "v1".into()),
		(keys::ACCESS_TOKEN_HEADER_NAME, "Authorization".into()),
		(keys::ADAPTER_TYPE, "REST".into()),
		(keys::DEBUG_ENABLED, "true".into()),
	]
	.into_iter()
	.map(|(key, value)| (key.to_owned(), value))
	.collect::<HashMap<String, String>>();
	let log = Arc::new(MemoryAuditLog::default());
	let http_client = ReqwestHttpClient::with_client(Client::builder().build()?);
	let module = <AccessTokenModule<ReqwestHttpClient>>::with_http_client(http_client, log.clone());
	let key = MessageKey::new("demo-message", MessageDirection::Outbound);
	let message = module.process(&context, PipelineMessage::new(key.clone())).await?;

	for (property, value) in message.properties() {
		println!("Injected {property} = {value}.");
	}
	for entry in log.entries_for(&key) {
		println!("[{}] {}: {}", entry.status, entry.key, entry.text);
	}

	token_mock.assert_async().await;

	Ok(())
}
