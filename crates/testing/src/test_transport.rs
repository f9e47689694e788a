use futures_lite::{AsyncRead, AsyncWrite, future};
use std::{
    collections::VecDeque,
    fmt::{self, Debug, Formatter},
    io,
    pin::Pin,
    sync::{Arc, Mutex},
    task::{Context, Poll, Waker},
};

/// A readable and writable transport for testing.
///
/// [`TestTransport::new`] returns the two ends of an in-memory
/// connection. Each direction is a byte queue: writes enqueue and wake
/// the peer, reads drain, and closing an end is observed by the peer
/// as eof once it has drained everything sent before the close.
#[derive(Clone, Debug)]
pub struct TestTransport {
    incoming: Arc<Pipe>,
    outgoing: Arc<Pipe>,
}

impl plover_http::Transport for TestTransport {}

impl TestTransport {
    /// constructs a connected pair of test transports
    pub fn new() -> (TestTransport, TestTransport) {
        let up = Arc::new(Pipe::default());
        let down = Arc::new(Pipe::default());

        (
            TestTransport {
                incoming: Arc::clone(&down),
                outgoing: Arc::clone(&up),
            },
            TestTransport {
                incoming: up,
                outgoing: down,
            },
        )
    }

    /// close this transport's write direction, which the peer observes
    /// as a disconnect
    pub fn close(&self) {
        self.outgoing.shut();
    }

    /// synchronously queues bytes for the peer, waking it if it is
    /// mid-read
    pub fn write_all(&self, bytes: impl AsRef<[u8]>) {
        self.outgoing.send(bytes.as_ref());
    }

    /// waits until the peer has sent something (or closed), then takes
    /// everything queued so far
    pub async fn read_available(&self) -> Vec<u8> {
        future::poll_fn(|cx| self.incoming.poll_take_all(cx)).await
    }

    /// [`TestTransport::read_available`], decoded as utf-8
    pub async fn read_available_string(&self) -> String {
        String::from_utf8(self.read_available().await).unwrap()
    }
}

impl AsyncRead for TestTransport {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        self.incoming.poll_take(cx, buf)
    }
}

impl AsyncWrite for TestTransport {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.outgoing.send(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.outgoing.shut();
        Poll::Ready(Ok(()))
    }
}

/// One direction of a test connection.
#[derive(Default)]
struct Pipe(Mutex<PipeState>);

#[derive(Default)]
struct PipeState {
    queued: VecDeque<u8>,
    reader: Option<Waker>,
    shut: bool,
}

impl PipeState {
    fn wake(&mut self) {
        if let Some(waker) = self.reader.take() {
            waker.wake();
        }
    }
}

impl Pipe {
    fn send(&self, bytes: &[u8]) {
        let mut state = self.0.lock().unwrap();
        if !state.shut {
            state.queued.extend(bytes);
            state.wake();
        }
    }

    fn shut(&self) {
        let mut state = self.0.lock().unwrap();
        state.shut = true;
        state.wake();
    }

    fn poll_take(&self, cx: &mut Context<'_>, buf: &mut [u8]) -> Poll<io::Result<usize>> {
        let mut state = self.0.lock().unwrap();
        if state.queued.is_empty() {
            return if state.shut {
                Poll::Ready(Ok(0))
            } else {
                state.reader = Some(cx.waker().clone());
                Poll::Pending
            };
        }

        let n = buf.len().min(state.queued.len());
        for (slot, byte) in buf.iter_mut().zip(state.queued.drain(..n)) {
            *slot = byte;
        }
        Poll::Ready(Ok(n))
    }

    fn poll_take_all(&self, cx: &mut Context<'_>) -> Poll<Vec<u8>> {
        let mut state = self.0.lock().unwrap();
        if state.queued.is_empty() && !state.shut {
            state.reader = Some(cx.waker().clone());
            return Poll::Pending;
        }
        Poll::Ready(state.queued.drain(..).collect())
    }
}

impl Debug for Pipe {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let state = self.0.lock().unwrap();
        f.debug_struct("Pipe")
            .field("queued", &state.queued.len())
            .field("shut", &state.shut)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::TestTransport;
    use futures_lite::AsyncReadExt;

    #[test]
    fn round_trip_and_close() {
        crate::block_on(async {
            let (mut client, server) = TestTransport::new();
            client.write_all("ping");
            assert_eq!(server.read_available_string().await, "ping");

            server.write_all("pong");
            server.close();

            let mut received = String::new();
            client.read_to_string(&mut received).await.unwrap();
            assert_eq!(received, "pong");
        });
    }

    #[test]
    fn reads_cap_at_the_buffer_size() {
        crate::block_on(async {
            let (client, mut server) = TestTransport::new();
            client.write_all("abcdef");

            let mut buf = [0u8; 4];
            let n = server.read(&mut buf).await.unwrap();
            assert_eq!(&buf[..n], b"abcd");
            let n = server.read(&mut buf).await.unwrap();
            assert_eq!(&buf[..n], b"ef");
        });
    }
}
