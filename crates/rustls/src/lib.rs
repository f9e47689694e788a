#![forbid(unsafe_code)]
#![deny(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    unused_qualifications
)]

/*!
This crate provides rustls-backed trait implementations for the plover
client ([`RustlsConnector`]) and server ([`RustlsAcceptor`]), plus the
plain-or-tls [`RustlsTransport`] they produce.
*/

mod client;
pub use client::RustlsConnector;

mod server;
pub use server::RustlsAcceptor;

mod transport;
pub use transport::RustlsTransport;

pub use futures_rustls::rustls;
