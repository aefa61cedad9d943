//! Translation between abstract browser shapes and native framework shapes.
//!
//! [`request`] turns a composed [`crate::browser::BrowserRequest`] into the
//! native request the pipeline dispatches; [`response`] turns the pipeline's
//! response back into a [`crate::browser::BrowserResponse`] and replays its
//! cookies into the caller's jar.

pub(crate) mod request;
pub(crate) mod response;
