//! Chunked delivery of a complete chat response
//!
//! The answer is split into roughly ten groups of words which are handed to
//! the client one by one, as newline-delimited JSON, with a pause in between.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

use crate::models::StreamChunk;

/// Pause between successive chunks
pub const DEFAULT_CHUNK_DELAY: Duration = Duration::from_millis(100);

const TARGET_CHUNKS: usize = 10;

/// Split `text` on whitespace into ordered chunks
///
/// Chunks hold `max(1, words / 10)` words each, the last one possibly fewer.
/// Only the last chunk is marked `done`. Empty text yields a single empty
/// `done` chunk so the stream always terminates explicitly.
pub fn split_into_chunks(text: &str) -> Vec<StreamChunk> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return vec![StreamChunk {
            text: String::new(),
            done: true,
        }];
    }

    let chunk_size = (words.len() / TARGET_CHUNKS).max(1);
    let total = words.len().div_ceil(chunk_size);

    words
        .chunks(chunk_size)
        .enumerate()
        .map(|(i, group)| StreamChunk {
            text: group.join(" "),
            done: i + 1 == total,
        })
        .collect()
}

/// Emit `chunks` in order with `delay` between them
///
/// A spawned task produces into a bounded channel; it stops early when the
/// receiving side is dropped.
pub fn emit(chunks: Vec<StreamChunk>, delay: Duration) -> ReceiverStream<StreamChunk> {
    let (tx, rx) = mpsc::channel(1);

    tokio::spawn(async move {
        for (i, chunk) in chunks.into_iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if tx.send(chunk).await.is_err() {
                debug!("Chat stream receiver dropped after {} chunks", i);
                break;
            }
        }
    });

    ReceiverStream::new(rx)
}

/// Serialise a chunk as one NDJSON line
pub fn to_line(chunk: &StreamChunk) -> Result<String, serde_json::Error> {
    let mut line = serde_json::to_string(chunk)?;
    line.push('\n');
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_stream::StreamExt;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_chunk_counts_follow_grouping_rule() {
        for w in [1usize, 5, 9, 10, 11, 19, 20, 25, 99, 100, 101, 250] {
            let chunks = split_into_chunks(&words(w));
            let size = (w / 10).max(1);
            assert_eq!(chunks.len(), w.div_ceil(size), "w = {w}");
        }
    }

    #[test]
    fn test_only_last_chunk_is_done() {
        let chunks = split_into_chunks(&words(37));
        let done: Vec<usize> = chunks
            .iter()
            .enumerate()
            .filter(|(_, c)| c.done)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(done, vec![chunks.len() - 1]);
    }

    #[test]
    fn test_rejoin_reconstructs_normalised_text() {
        let text = "  The quick\tbrown fox\n\njumps over   the lazy dog, again and again and again.  ";
        let chunks = split_into_chunks(text);
        let rejoined = chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(rejoined, text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_empty_text_yields_single_done_chunk() {
        assert_eq!(
            split_into_chunks(" \n\t "),
            vec![StreamChunk {
                text: String::new(),
                done: true
            }]
        );
    }

    #[test]
    fn test_line_is_newline_terminated_json() {
        let line = to_line(&StreamChunk {
            text: "hi there".into(),
            done: false,
        })
        .unwrap();
        assert_eq!(line, "{\"text\":\"hi there\",\"done\":false}\n");
    }

    #[tokio::test]
    async fn test_emit_preserves_order() {
        let chunks = split_into_chunks(&words(30));
        let emitted: Vec<StreamChunk> = emit(chunks.clone(), Duration::ZERO).collect().await;
        assert_eq!(emitted, chunks);
    }

    #[tokio::test(start_paused = true)]
    async fn test_emit_pauses_only_between_chunks() {
        let chunks = split_into_chunks("one two three");
        assert_eq!(chunks.len(), 3);

        let start = tokio::time::Instant::now();
        let mut stream = emit(chunks, DEFAULT_CHUNK_DELAY);

        assert_eq!(stream.next().await.unwrap().text, "one");
        assert_eq!(start.elapsed(), Duration::ZERO);

        stream.next().await.unwrap();
        let last = stream.next().await.unwrap();
        assert!(last.done);
        assert_eq!(start.elapsed(), DEFAULT_CHUNK_DELAY * 2);

        assert!(stream.next().await.is_none());
        assert_eq!(start.elapsed(), DEFAULT_CHUNK_DELAY * 2);
    }
}
