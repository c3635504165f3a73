//! Draining text streams.

use futures::StreamExt;

use crate::error::RelayError;
use crate::types::{StreamTextResult, TextStream, TextStreamDelta};

/// Collect a stream into its final text.
pub async fn collect_stream(stream: TextStream) -> Result<StreamTextResult, RelayError> {
    collect_stream_with(stream, |_| {}).await
}

/// Collect a stream, handing every delta to `on_delta` in arrival order.
///
/// The returned value is the completion: it is produced once, after the last
/// delta. A transport error stops collection and is returned as-is.
pub async fn collect_stream_with<F>(
    mut stream: TextStream,
    mut on_delta: F,
) -> Result<StreamTextResult, RelayError>
where
    F: FnMut(&TextStreamDelta),
{
    let mut text = String::new();
    let mut fragments = 0;

    while let Some(delta) = stream.next().await {
        let delta = delta?;
        on_delta(&delta);
        text.push_str(&delta.text);
        fragments += 1;
    }

    Ok(StreamTextResult { text, fragments })
}
