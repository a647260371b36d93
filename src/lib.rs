//! Async jw.org content client: CDN discovery, self-refreshing bearer tokens, and a TTL response
//! cache behind one explicitly constructed session.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod obs;
pub mod session;
pub mod store;

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

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, tokio as _};
