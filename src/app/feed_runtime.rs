//! Background training-feed replay, keeping the UI thread responsive.
//!
//! The training backend lives outside this program; a recorded JSON-lines
//! session (or the built-in demo) is replayed at a steady pace instead.
//! Every message is tagged with the session it was started for so the
//! board can drop replies to a session that was since reset.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::training::{demo_feed, load_feed, TrainingMessage, TrainingRequest};

/// Where replayed messages come from.
#[derive(Debug, Clone)]
pub enum FeedSource {
    Demo,
    File(PathBuf),
}

pub struct FeedUpdate {
    pub session: u64,
    pub message: TrainingMessage,
}

/// Default gap between replayed messages.
pub const REPLAY_PACE: Duration = Duration::from_millis(350);

/// Replay the session for `request` on a background task.  Aborting the
/// returned handle stops the replay and closes the sender.
pub fn spawn_replay(
    tx: mpsc::UnboundedSender<FeedUpdate>,
    session: u64,
    request: TrainingRequest,
    source: FeedSource,
    pace: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match request.to_json() {
            Ok(handshake) => tracing::debug!("training handshake: {handshake}"),
            Err(e) => tracing::warn!("cannot encode training request: {e}"),
        }

        let messages = match source {
            FeedSource::Demo => demo_feed(&request),
            FeedSource::File(path) => {
                let loaded = tokio::task::spawn_blocking(move || load_feed(&path)).await;
                match loaded {
                    Ok(Ok(messages)) => messages,
                    Ok(Err(e)) => vec![TrainingMessage::Error {
                        message: e.to_string(),
                    }],
                    Err(e) => vec![TrainingMessage::Error {
                        message: format!("feed loader failed: {e}"),
                    }],
                }
            }
        };

        for message in messages {
            if !pace.is_zero() {
                tokio::time::sleep(pace).await;
            }
            if tx.send(FeedUpdate { session, message }).is_err() {
                break; // receiver dropped
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TrainingRequest {
        TrainingRequest::new("line_sensors.csv", vec!["KNN".into(), "SVM".into()])
    }

    async fn collect(source: FeedSource) -> Vec<FeedUpdate> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_replay(tx, 7, request(), source, Duration::ZERO);
        let mut out = Vec::new();
        while let Some(update) = rx.recv().await {
            out.push(update);
        }
        out
    }

    #[tokio::test]
    async fn test_demo_replay_is_tagged_and_complete() {
        let updates = collect(FeedSource::Demo).await;
        assert!(updates.iter().all(|u| u.session == 7));
        assert!(matches!(
            updates.last().map(|u| &u.message),
            Some(TrainingMessage::AllCompleted { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_file_becomes_session_error() {
        let updates = collect(FeedSource::File("/nonexistent/scrolldeck.jsonl".into())).await;
        assert_eq!(updates.len(), 1);
        assert!(matches!(updates[0].message, TrainingMessage::Error { .. }));
    }

    #[tokio::test]
    async fn test_aborted_replay_closes_the_channel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_replay(tx, 3, request(), FeedSource::Demo, Duration::from_secs(60));
        handle.abort();
        assert!(rx.recv().await.is_none());
        let err = handle.await.expect_err("aborted");
        assert!(err.is_cancelled());
    }
}
