//! WebSocket transport
//!
//! `WebSocketAdapter` wraps a `WebSocketStream` and implements `AsyncRead`
//! and `AsyncWrite`, so browser clients go through the same line framing and
//! connection loop as plain TCP clients.
//!
//! Each incoming text or binary message is one frame; a terminating newline
//! is appended when the client left it off. Outgoing bytes are buffered and
//! sent as one text message per flush, without the trailing newline.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::sink::Sink;
use futures_util::stream::Stream;
use parlor_common::framing::{MAX_FRAME_LENGTH, TERMINATOR};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::Message;

use crate::connection::{ConnectionParams, handle_connection};

/// Largest accepted WebSocket message: one frame plus its terminator
const MAX_WS_MESSAGE_SIZE: usize = MAX_FRAME_LENGTH + 1;

type WsResult<T> = Result<T, tokio_tungstenite::tungstenite::Error>;

/// Adapter that makes a WebSocket stream behave like a line-oriented byte stream
pub struct WebSocketAdapter<S> {
    inner: S,
    /// Bytes of the current incoming message not yet handed to the reader
    read_buffer: Vec<u8>,
    read_pos: usize,
    /// Outgoing bytes accumulated until flush
    write_buffer: Vec<u8>,
    closed: bool,
}

impl<S> WebSocketAdapter<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            read_buffer: Vec::new(),
            read_pos: 0,
            write_buffer: Vec::new(),
            closed: false,
        }
    }

    fn copy_buffered(&mut self, buf: &mut ReadBuf<'_>) {
        let remaining = &self.read_buffer[self.read_pos..];
        let to_copy = remaining.len().min(buf.remaining());
        buf.put_slice(&remaining[..to_copy]);
        self.read_pos += to_copy;

        if self.read_pos >= self.read_buffer.len() {
            self.read_buffer.clear();
            self.read_pos = 0;
        }
    }

    /// Buffer one incoming message as a terminated line
    ///
    /// Returns false for an empty message, which carries no frame.
    fn load_message(&mut self, mut data: Vec<u8>) -> io::Result<bool> {
        if data.len() > MAX_WS_MESSAGE_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "WebSocket message too large: {} bytes (max {})",
                    data.len(),
                    MAX_WS_MESSAGE_SIZE
                ),
            ));
        }
        if data.is_empty() {
            return Ok(false);
        }
        if data.last() != Some(&TERMINATOR) {
            data.push(TERMINATOR);
        }

        self.read_buffer = data;
        self.read_pos = 0;
        Ok(true)
    }
}

impl<S> AsyncRead for WebSocketAdapter<S>
where
    S: Stream<Item = WsResult<Message>> + Unpin,
{
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        loop {
            if self.read_pos < self.read_buffer.len() {
                self.copy_buffered(buf);
                return Poll::Ready(Ok(()));
            }

            // EOF
            if self.closed {
                return Poll::Ready(Ok(()));
            }

            let data = match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(Message::Text(text)))) => text.as_bytes().to_vec(),
                Poll::Ready(Some(Ok(Message::Binary(data)))) => data.to_vec(),
                Poll::Ready(Some(Ok(Message::Close(_)))) | Poll::Ready(None) => {
                    self.closed = true;
                    continue;
                }
                // Control frames are answered by tungstenite itself
                Poll::Ready(Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)))) => {
                    continue;
                }
                Poll::Ready(Some(Err(e))) => {
                    return Poll::Ready(Err(io::Error::other(format!("WebSocket error: {e}"))));
                }
                Poll::Pending => return Poll::Pending,
            };

            if let Err(e) = self.load_message(data) {
                return Poll::Ready(Err(e));
            }
        }
    }
}

impl<S> AsyncWrite for WebSocketAdapter<S>
where
    S: Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
{
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.write_buffer.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        if !self.write_buffer.is_empty() {
            match Pin::new(&mut self.inner).poll_ready(cx) {
                Poll::Ready(Ok(())) => {}
                Poll::Ready(Err(e)) => {
                    return Poll::Ready(Err(io::Error::other(format!(
                        "WebSocket ready error: {e}"
                    ))));
                }
                Poll::Pending => return Poll::Pending,
            }

            let mut data = std::mem::take(&mut self.write_buffer);
            if data.last() == Some(&TERMINATOR) {
                data.pop();
            }
            let text = match String::from_utf8(data) {
                Ok(text) => text,
                Err(e) => return Poll::Ready(Err(io::Error::new(io::ErrorKind::InvalidData, e))),
            };

            if let Err(e) = Pin::new(&mut self.inner).start_send(Message::Text(text.into())) {
                return Poll::Ready(Err(io::Error::other(format!("WebSocket send error: {e}"))));
            }
        }

        match Pin::new(&mut self.inner).poll_flush(cx) {
            Poll::Ready(Ok(())) => Poll::Ready(Ok(())),
            Poll::Ready(Err(e)) => {
                Poll::Ready(Err(io::Error::other(format!("WebSocket flush error: {e}"))))
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match Pin::new(&mut self.inner).poll_ready(cx) {
            Poll::Ready(Ok(())) => {}
            Poll::Ready(Err(e)) => {
                return Poll::Ready(Err(io::Error::other(format!("WebSocket ready error: {e}"))));
            }
            Poll::Pending => return Poll::Pending,
        }

        if let Err(e) = Pin::new(&mut self.inner).start_send(Message::Close(None)) {
            return Poll::Ready(Err(io::Error::other(format!("WebSocket close error: {e}"))));
        }

        match Pin::new(&mut self.inner).poll_close(cx) {
            Poll::Ready(Ok(())) => Poll::Ready(Ok(())),
            Poll::Ready(Err(e)) => {
                Poll::Ready(Err(io::Error::other(format!("WebSocket close error: {e}"))))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Handle a WebSocket chat connection
///
/// Performs the WebSocket handshake, wraps the stream in the adapter and
/// delegates to the standard connection handler.
pub async fn handle_websocket_connection(
    socket: TcpStream,
    params: ConnectionParams,
) -> io::Result<()> {
    let ws_stream = tokio_tungstenite::accept_async(socket)
        .await
        .map_err(|e| io::Error::other(format!("WebSocket handshake failed: {e}")))?;

    handle_connection(WebSocketAdapter::new(ws_stream), params).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};

    use parlor_common::framing::{FrameReader, FrameWriter, RawFrame};

    /// Mock WebSocket stream for testing
    struct MockWebSocket {
        incoming: VecDeque<WsResult<Message>>,
        outgoing: Vec<Message>,
        closed: bool,
    }

    impl MockWebSocket {
        fn new(messages: Vec<Message>) -> Self {
            Self {
                incoming: messages.into_iter().map(Ok).collect(),
                outgoing: Vec::new(),
                closed: false,
            }
        }
    }

    impl Stream for MockWebSocket {
        type Item = WsResult<Message>;

        fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
            Poll::Ready(self.incoming.pop_front())
        }
    }

    impl Sink<Message> for MockWebSocket {
        type Error = tokio_tungstenite::tungstenite::Error;

        fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<WsResult<()>> {
            Poll::Ready(Ok(()))
        }

        fn start_send(mut self: Pin<&mut Self>, item: Message) -> WsResult<()> {
            self.outgoing.push(item);
            Ok(())
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<WsResult<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_close(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<WsResult<()>> {
            self.closed = true;
            Poll::Ready(Ok(()))
        }
    }

    fn text(s: &str) -> Message {
        Message::Text(s.to_string().into())
    }

    #[tokio::test]
    async fn test_text_message_becomes_line() {
        let mock = MockWebSocket::new(vec![text("{\"type\":\"LivenessProbe\"}")]);
        let mut adapter = WebSocketAdapter::new(mock);

        let mut buf = Vec::new();
        adapter.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"{\"type\":\"LivenessProbe\"}\n");
    }

    #[tokio::test]
    async fn test_binary_message_accepted() {
        let mock = MockWebSocket::new(vec![Message::Binary(b"{}\n".to_vec().into())]);
        let mut adapter = WebSocketAdapter::new(mock);

        let mut buf = Vec::new();
        adapter.read_to_end(&mut buf).await.unwrap();
        // Already terminated, no second newline
        assert_eq!(buf, b"{}\n");
    }

    #[tokio::test]
    async fn test_messages_read_as_frames() {
        let mock = MockWebSocket::new(vec![
            text("{\"a\":1}"),
            Message::Ping(vec![].into()),
            text(""),
            text("{\"b\":2}"),
            Message::Close(None),
        ]);
        let mut reader = FrameReader::new(BufReader::new(WebSocketAdapter::new(mock)));

        assert_eq!(reader.read_frame().await.unwrap().unwrap().payload, b"{\"a\":1}");
        assert_eq!(reader.read_frame().await.unwrap().unwrap().payload, b"{\"b\":2}");
        assert!(reader.read_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_partial_buffer() {
        let mock = MockWebSocket::new(vec![text("hello world")]);
        let mut adapter = WebSocketAdapter::new(mock);

        let mut buf = [0u8; 5];
        let n = adapter.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"hello");
        let n = adapter.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b" worl");
        let n = adapter.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"d\n");
    }

    #[tokio::test]
    async fn test_stream_end_returns_eof() {
        let mock = MockWebSocket::new(vec![]);
        let mut adapter = WebSocketAdapter::new(mock);

        let mut buf = [0u8; 10];
        assert_eq!(adapter.read(&mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_oversized_message_rejected() {
        let oversized = "a".repeat(MAX_WS_MESSAGE_SIZE + 1);
        let mock = MockWebSocket::new(vec![text(&oversized)]);
        let mut adapter = WebSocketAdapter::new(mock);

        let mut buf = [0u8; 10];
        let err = adapter.read(&mut buf).await.unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[tokio::test]
    async fn test_one_text_message_per_frame() {
        let mock = MockWebSocket::new(vec![]);
        let mut writer = FrameWriter::new(WebSocketAdapter::new(mock));

        writer.write_frame(&RawFrame::new(b"{\"a\":1}".to_vec())).await.unwrap();
        writer.write_frame(&RawFrame::new(b"{\"b\":2}".to_vec())).await.unwrap();

        let outgoing = &writer.get_ref().inner.outgoing;
        assert_eq!(outgoing.len(), 2);
        assert!(matches!(&outgoing[0], Message::Text(t) if t.as_str() == "{\"a\":1}"));
        assert!(matches!(&outgoing[1], Message::Text(t) if t.as_str() == "{\"b\":2}"));
    }

    #[tokio::test]
    async fn test_shutdown_sends_close() {
        let mock = MockWebSocket::new(vec![]);
        let mut adapter = WebSocketAdapter::new(mock);

        adapter.shutdown().await.unwrap();

        assert!(adapter.inner.closed);
        assert!(
            adapter
                .inner
                .outgoing
                .iter()
                .any(|m| matches!(m, Message::Close(_)))
        );
    }
}
