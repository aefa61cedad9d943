//! browserkit - In-process browser simulation for application dispatch pipelines.
//!
//! This crate drives a web application's dispatch pipeline directly, without a
//! network socket. Abstract browser requests are translated into the native
//! request shape the application expects, the pipeline runs in-process, and the
//! native response is translated back into a plain browser response.
//!
//! # Features
//!
//! - **Request Translation**: Abstract requests become native requests with a
//!   PHP-style environment map, parameter tree, and upload descriptors
//! - **Session Continuity**: One session is resolved per connector and reused
//!   across requests until reset
//! - **Pipeline Spies**: Hooks registered at a late priority capture the
//!   controller, auth component, and view that handled each request
//! - **Cookie Replay**: `Set-Cookie` headers are decoded into structured
//!   records and replayed into a caller-owned jar
//! - **Error Rendering**: Pipeline failures render an error response instead of
//!   tearing down the test, while assertion failures propagate unmodified
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use browserkit::{BrowserRequest, Connector, CookieJar, StaticConfig};
//!
//! let config = Arc::new(StaticConfig::new());
//! let mut connector = Connector::new(config, Arc::new(MyAppFactory));
//! let mut jar = CookieJar::new();
//!
//! let response = connector
//!     .request(BrowserRequest::get("https://localhost/articles"), &mut jar)
//!     .await?;
//! assert_eq!(response.status(), 200);
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod browser;
pub mod config;
pub mod connector;
pub mod cookie;
pub mod error;
pub mod native;
pub mod params;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod uploads;

mod invoker;
mod spy;
mod translate;

// Re-exports for convenience
pub use browser::{BrowserRequest, BrowserResponse, FileTree, FileUpload};
pub use config::{ConfigProvider, StaticConfig};
pub use connector::{CapturedState, Connector};
pub use cookie::{CookieError, CookieJar, CookieRecord};
pub use error::ConnectorError;
pub use native::{NativeRequest, NativeResponse, PipelineResponse, StreamBody, StreamResponse};
pub use params::{ParamMap, ParamValue};
pub use pipeline::{
    Application, ApplicationFactory, AuthComponent, Controller, DispatchError, DispatchEvent,
    DispatchHooks, RenderEvent, StartupEvent, View,
};
pub use render::{DefaultErrorRenderer, ErrorRenderer, RenderError};
pub use session::Session;
pub use translate::request::RequestError;
pub use uploads::{UploadTree, UploadedFile, UPLOAD_ERR_OK};
