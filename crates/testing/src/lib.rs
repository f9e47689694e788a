#![forbid(unsafe_code)]
#![deny(missing_docs, nonstandard_style, unused_qualifications)]

/*!
Testing utilities for plover: an in-memory [`TestTransport`] pair that
stands in for a tcp connection, and small executor helpers for driving
async code from synchronous tests.
*/

use std::{future::Future, time::Duration};

mod test_transport;
pub use test_transport::TestTransport;

/// blocks the current thread on a future, driving the global executor
pub fn block_on<Fut: Future>(future: Fut) -> Fut::Output {
    async_global_executor::block_on(future)
}

/// spawns and detaches a future onto the global executor
pub fn spawn<Fut: Future<Output = ()> + Send + 'static>(future: Fut) {
    async_global_executor::spawn(future).detach();
}

/// sleeps asynchronously for `duration`
pub async fn delay(duration: Duration) {
    async_io::Timer::after(duration).await;
}
