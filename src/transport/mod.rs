//! HTTP transport: connection pool, timeouts and proxy for the inference endpoint.

mod http;

pub use http::{HttpTransport, TransportResponse, REQUEST_ID_HEADER};
