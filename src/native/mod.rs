//! Framework-native request and response types.
//!
//! These are the shapes the application under test actually sees:
//!
//! - [`NativeRequest`] - request with PHP-style environment map, parameter
//!   tree, normalized uploads, and the shared session
//! - [`NativeResponse`] - framework response with structured cookies and an
//!   optional streamed file path
//! - [`StreamResponse`] - lightweight server-layer response that needs
//!   conversion before translation
//! - [`PipelineResponse`] - what one dispatch run produces

mod request;
mod response;

pub use request::NativeRequest;
pub use response::{NativeResponse, PipelineResponse, StreamBody, StreamResponse};
