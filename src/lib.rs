//! Adapter module that fetches an access token from an authentication endpoint and hands it
//! to downstream pipeline stages as a dynamic message header.
//!
//! The crate is organized around a single operation, [`module::AccessTokenModule::process`],
//! which reads module parameters from the host, validates them, calls the token endpoint,
//! and writes the token into the message's property bag. Host collaborators (configuration
//! lookup, message envelope, audit log) are expressed as traits so any runtime can plug in.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod audit;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod inject;
pub mod message;
pub mod module;
pub mod obs;
pub mod token;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::Result;
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
