//! Model-training feed for the digital-twin workflow.
//!
//! The training backend streams status messages; here they are parsed,
//! folded into a [`TrainingBoard`], and can be replayed from a JSON-lines
//! file.  A failing model only fails its own row; the session keeps going
//! until `all_completed` or a session-level `error`.

use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Handshake sent when a training session starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRequest {
    pub dataset: String,
    pub models: Vec<String>,
    #[serde(default = "default_test_size")]
    pub test_size: f64,
    #[serde(default = "default_random_state")]
    pub random_state: u64,
    #[serde(default)]
    pub selected_features: Vec<String>,
}

fn default_test_size() -> f64 {
    0.2
}

fn default_random_state() -> u64 {
    42
}

impl TrainingRequest {
    pub fn new(dataset: impl Into<String>, models: Vec<String>) -> Self {
        Self {
            dataset: dataset.into(),
            models,
            test_size: default_test_size(),
            random_state: default_random_state(),
            selected_features: Vec::new(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// One status message from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrainingMessage {
    Preparing {
        #[serde(default)]
        message: Option<String>,
    },
    Training {
        model: String,
        #[serde(default)]
        progress: f64,
        #[serde(default)]
        message: Option<String>,
    },
    Completed {
        model: String,
        #[serde(default)]
        metrics: Map<String, Value>,
    },
    ModelError {
        model: String,
        #[serde(default)]
        message: Option<String>,
    },
    AllCompleted {
        #[serde(default)]
        message: Option<String>,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("cannot read training feed: {0}")]
    Io(#[from] std::io::Error),
    #[error("training feed line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse JSON-lines text.  Blank lines and `#` comments are skipped;
/// `line` in errors is 1-based.
pub fn parse_feed(text: &str) -> Result<Vec<TrainingMessage>, FeedError> {
    text.lines()
        .enumerate()
        .filter(|(_, l)| {
            let t = l.trim();
            !t.is_empty() && !t.starts_with('#')
        })
        .map(|(i, l)| {
            serde_json::from_str(l.trim())
                .map_err(|source| FeedError::Parse { line: i + 1, source })
        })
        .collect()
}

pub fn load_feed(path: &Path) -> Result<Vec<TrainingMessage>, FeedError> {
    let text = std::fs::read_to_string(path)?;
    parse_feed(&text)
}

/// Built-in session replayed when no feed file is given.
pub fn demo_feed(request: &TrainingRequest) -> Vec<TrainingMessage> {
    let mut feed = vec![TrainingMessage::Preparing {
        message: Some(format!("Loading dataset {}", request.dataset)),
    }];
    for (i, model) in request.models.iter().enumerate() {
        for progress in [10.0, 35.0, 60.0, 85.0] {
            feed.push(TrainingMessage::Training {
                model: model.clone(),
                progress,
                message: Some(format!("Training {model}")),
            });
        }
        // The third model fails to show a partial failure.
        if i == 2 {
            feed.push(TrainingMessage::ModelError {
                model: model.clone(),
                message: Some("did not converge".to_string()),
            });
            continue;
        }
        let accuracy = 0.91 - 0.04 * i as f64;
        let mut metrics = Map::new();
        metrics.insert("accuracy".into(), Value::from(accuracy));
        metrics.insert("f1_score".into(), Value::from(accuracy - 0.02));
        feed.push(TrainingMessage::Completed {
            model: model.clone(),
            metrics,
        });
    }
    feed.push(TrainingMessage::AllCompleted {
        message: Some("All models trained".to_string()),
    });
    feed
}

// ───────────────────────────────────────── board ─────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Pending,
    Training,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRun {
    pub model: String,
    pub status: RunStatus,
    /// Percent, `0..=100`.
    pub progress: f64,
    pub metrics: Map<String, Value>,
    pub error: Option<String>,
}

impl ModelRun {
    fn new(model: String) -> Self {
        Self {
            model,
            status: RunStatus::Pending,
            progress: 0.0,
            metrics: Map::new(),
            error: None,
        }
    }

    /// Numeric metrics in key order.
    pub fn numeric_metrics(&self) -> impl Iterator<Item = (&str, f64)> {
        self.metrics
            .iter()
            .filter_map(|(k, v)| v.as_f64().map(|n| (k.as_str(), n)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Preparing,
    Running,
    Finished,
    Aborted(String),
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Finished | SessionState::Aborted(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub at: DateTime<Local>,
    pub text: String,
}

/// Maximum log lines kept on the board.
const LOG_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct TrainingBoard {
    /// Incremented on every `begin`/`clear`; feed messages carry the id
    /// of the session they belong to.
    session: u64,
    state: SessionState,
    runs: Vec<ModelRun>,
    log: Vec<FeedEntry>,
}

impl Default for TrainingBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingBoard {
    pub fn new() -> Self {
        Self {
            session: 0,
            state: SessionState::Idle,
            runs: Vec::new(),
            log: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn runs(&self) -> &[ModelRun] {
        &self.runs
    }

    pub fn log(&self) -> &[FeedEntry] {
        &self.log
    }

    /// Overall progress in percent across all models.
    pub fn overall_progress(&self) -> f64 {
        if self.state == SessionState::Finished {
            return 100.0;
        }
        if self.runs.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .runs
            .iter()
            .map(|r| match r.status {
                RunStatus::Completed | RunStatus::Failed => 100.0,
                _ => r.progress,
            })
            .sum();
        sum / self.runs.len() as f64
    }

    /// Start a session for `request` and return its id.  Previous results
    /// are discarded.
    pub fn begin(&mut self, request: &TrainingRequest, at: DateTime<Local>) -> u64 {
        self.session += 1;
        self.runs = request.models.iter().cloned().map(ModelRun::new).collect();
        self.log.clear();
        self.state = SessionState::Preparing;
        self.push_log(at, format!("session started on {}", request.dataset));
        self.session
    }

    /// Drop all results.  Messages from the previous session become stale.
    pub fn clear(&mut self) {
        let session = self.session + 1;
        *self = Self::new();
        self.session = session;
    }

    /// Apply a message only if it belongs to the current session.
    pub fn apply_for(&mut self, session: u64, msg: TrainingMessage, at: DateTime<Local>) -> bool {
        if session != self.session {
            tracing::debug!("dropping stale training message for session {session}");
            return false;
        }
        self.apply(msg, at);
        true
    }

    fn run_mut(&mut self, model: &str) -> &mut ModelRun {
        let idx = match self.runs.iter().position(|r| r.model == model) {
            Some(i) => i,
            None => {
                self.runs.push(ModelRun::new(model.to_string()));
                self.runs.len() - 1
            }
        };
        &mut self.runs[idx]
    }

    fn push_log(&mut self, at: DateTime<Local>, text: String) {
        if self.log.len() == LOG_CAPACITY {
            self.log.remove(0);
        }
        self.log.push(FeedEntry { at, text });
    }

    /// Fold one message into the board.  Messages after the session ended
    /// are ignored.
    pub fn apply(&mut self, msg: TrainingMessage, at: DateTime<Local>) {
        if self.state.is_terminal() {
            tracing::debug!("ignoring training message after session end: {msg:?}");
            return;
        }
        match msg {
            TrainingMessage::Preparing { message } => {
                self.state = SessionState::Preparing;
                self.push_log(at, message.unwrap_or_else(|| "preparing".into()));
            }
            TrainingMessage::Training {
                model,
                progress,
                message,
            } => {
                self.state = SessionState::Running;
                let run = self.run_mut(&model);
                run.status = RunStatus::Training;
                run.progress = progress.clamp(0.0, 100.0);
                if let Some(text) = message {
                    self.push_log(at, text);
                }
            }
            TrainingMessage::Completed { model, metrics } => {
                self.state = SessionState::Running;
                let run = self.run_mut(&model);
                run.status = RunStatus::Completed;
                run.progress = 100.0;
                run.metrics = metrics;
                self.push_log(at, format!("{model} completed"));
            }
            TrainingMessage::ModelError { model, message } => {
                let text = message.unwrap_or_else(|| "training failed".into());
                tracing::warn!("model {model} failed: {text}");
                let run = self.run_mut(&model);
                run.status = RunStatus::Failed;
                run.progress = 0.0;
                run.error = Some(text.clone());
                self.push_log(at, format!("{model}: {text}"));
            }
            TrainingMessage::AllCompleted { message } => {
                self.state = SessionState::Finished;
                self.push_log(at, message.unwrap_or_else(|| "all models trained".into()));
            }
            TrainingMessage::Error { message } => {
                tracing::warn!("training session aborted: {message}");
                self.push_log(at, message.clone());
                self.state = SessionState::Aborted(message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TrainingRequest {
        TrainingRequest::new(
            "turbofan",
            vec!["random_forest".into(), "xgboost".into(), "svm".into()],
        )
    }

    #[test]
    fn test_request_defaults_and_wire_shape() {
        let req = request();
        let json: Value = serde_json::from_str(&req.to_json().expect("json")).expect("parse");
        assert_eq!(json["dataset"], "turbofan");
        assert_eq!(json["test_size"], 0.2);
        assert_eq!(json["random_state"], 42);
        assert_eq!(json["selected_features"], Value::Array(vec![]));

        let parsed: TrainingRequest =
            serde_json::from_str(r#"{"dataset":"d","models":["m"]}"#).expect("parse");
        assert_eq!(parsed.test_size, 0.2);
        assert_eq!(parsed.random_state, 42);
    }

    #[test]
    fn test_messages_are_tagged_by_status() {
        let msgs = parse_feed(
            r#"
# replay
{"status":"preparing","message":"Loading"}
{"status":"training","model":"svm","progress":40,"metrics":null,"message":"Training svm"}
{"status":"completed","model":"svm","progress":100,"metrics":{"accuracy":0.9}}
{"status":"model_error","model":"knn","progress":0,"message":"boom"}
{"status":"all_completed","progress":100,"message":"done"}
{"status":"error","message":"socket closed"}
"#,
        )
        .expect("feed");
        assert_eq!(msgs.len(), 6);
        assert!(matches!(msgs[1], TrainingMessage::Training { progress, .. } if progress == 40.0));
        assert!(matches!(&msgs[3], TrainingMessage::ModelError { model, .. } if model == "knn"));
        assert!(matches!(msgs[5], TrainingMessage::Error { .. }));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = parse_feed("{\"status\":\"preparing\"}\n\n{\"status\":\"bogus\"}").unwrap_err();
        match err {
            FeedError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_feed_missing_file_is_io_error() {
        let err = load_feed(Path::new("/nonexistent/scrolldeck/feed.jsonl")).unwrap_err();
        assert!(matches!(err, FeedError::Io(_)));
    }

    #[test]
    fn test_model_error_fails_only_that_model() {
        let at = Local::now();
        let mut board = TrainingBoard::new();
        let req = request();
        board.begin(&req, at);
        for msg in demo_feed(&req) {
            board.apply(msg, at);
        }
        assert_eq!(board.state(), &SessionState::Finished);
        let statuses: Vec<RunStatus> = board.runs().iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![RunStatus::Completed, RunStatus::Completed, RunStatus::Failed]
        );
        assert_eq!(board.overall_progress(), 100.0);
        let metrics: Vec<(&str, f64)> = board.runs()[0].numeric_metrics().collect();
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].0, "accuracy");
    }

    #[test]
    fn test_error_aborts_and_freezes_board() {
        let at = Local::now();
        let mut board = TrainingBoard::new();
        board.begin(&request(), at);
        board.apply(
            TrainingMessage::Training {
                model: "svm".into(),
                progress: 150.0,
                message: None,
            },
            at,
        );
        assert_eq!(board.runs()[2].progress, 100.0);
        board.apply(TrainingMessage::Error { message: "lost".into() }, at);
        assert_eq!(board.state(), &SessionState::Aborted("lost".into()));
        board.apply(TrainingMessage::AllCompleted { message: None }, at);
        assert_eq!(board.state(), &SessionState::Aborted("lost".into()));
    }

    #[test]
    fn test_unknown_model_gets_a_row() {
        let at = Local::now();
        let mut board = TrainingBoard::new();
        board.apply(
            TrainingMessage::Training {
                model: "extra".into(),
                progress: 20.0,
                message: None,
            },
            at,
        );
        assert_eq!(board.runs().len(), 1);
        assert_eq!(board.state(), &SessionState::Running);
        assert_eq!(board.overall_progress(), 20.0);
    }

    #[test]
    fn test_stale_session_messages_are_dropped() {
        let at = Local::now();
        let mut board = TrainingBoard::new();
        let first = board.begin(&request(), at);
        board.clear();
        let msg = TrainingMessage::AllCompleted { message: None };
        assert!(!board.apply_for(first, msg.clone(), at));
        assert_eq!(board.state(), &SessionState::Idle);

        let second = board.begin(&request(), at);
        assert_ne!(first, second);
        assert!(board.apply_for(second, msg, at));
        assert_eq!(board.state(), &SessionState::Finished);
    }
}
