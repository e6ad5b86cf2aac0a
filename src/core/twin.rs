//! Digital-twin lab: dataset and model choice, the training board, and the
//! feature-importance view of the trained models.
//!
//! One [`TwinLab`] spans all four sections of the workflow, so choices made
//! on the dataset section are still there on the training section.  Leaving
//! the workflow's sections resets everything.

use chrono::{DateTime, Local};
use thiserror::Error;

use super::panel::SectionPanel;
use super::training::{RunStatus, SessionState, TrainingBoard, TrainingRequest};

// ───────────────────────────────────────── catalogue ─────────

/// A tabular dataset the backend can train on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dataset {
    pub name: &'static str,
    pub target: &'static str,
    pub features: &'static [&'static str],
    pub rows: u32,
    pub classes: u32,
}

pub static DATASETS: &[Dataset] = &[
    Dataset {
        name: "line_sensors.csv",
        target: "fault",
        features: &[
            "temperature",
            "pressure",
            "vibration",
            "motor_current",
            "flow_rate",
            "humidity",
        ],
        rows: 12_480,
        classes: 2,
    },
    Dataset {
        name: "turbofan_engines.csv",
        target: "health_state",
        features: &[
            "fan_speed",
            "core_speed",
            "hpc_outlet_temp",
            "lpt_outlet_temp",
            "bypass_ratio",
            "fuel_flow",
            "static_pressure",
        ],
        rows: 20_631,
        classes: 3,
    },
    Dataset {
        name: "hvac_units.csv",
        target: "failure_mode",
        features: &[
            "supply_air_temp",
            "return_air_temp",
            "compressor_load",
            "fan_power",
            "filter_dp",
        ],
        rows: 8_760,
        classes: 4,
    },
];

/// Classifiers the backend knows how to train, in display order.
pub const MODEL_CATALOG: &[&str] = &[
    "AdaBoost",
    "Gradient Boosting",
    "Random Forest",
    "Decision Tree",
    "SGD",
    "KNN",
    "Naive Bayes",
    "SVM",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TwinError {
    #[error("select at least one model first")]
    NoModels,
    #[error("keep at least one feature")]
    NoFeatures,
    #[error("training already in progress")]
    Busy,
    #[error("train a model first")]
    NotTrained,
}

/// Share of one feature in a model's predictions.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureImportance {
    pub feature: String,
    /// Fraction in `[0, 1]`; a model's importances sum to 1.
    pub importance: f64,
}

// ───────────────────────────────────────── lab ───────────────

#[derive(Debug, Clone)]
pub struct TwinLab {
    dataset: usize,
    excluded: Vec<bool>,
    feature_cursor: usize,
    models: Vec<bool>,
    model_cursor: usize,
    board: TrainingBoard,
    /// Features of the session on the board.
    trained_features: Vec<String>,
    inspected: usize,
}

impl Default for TwinLab {
    fn default() -> Self {
        Self::new()
    }
}

impl TwinLab {
    pub fn new() -> Self {
        Self {
            dataset: 0,
            excluded: vec![false; DATASETS[0].features.len()],
            feature_cursor: 0,
            models: vec![false; MODEL_CATALOG.len()],
            model_cursor: 0,
            board: TrainingBoard::new(),
            trained_features: Vec::new(),
            inspected: 0,
        }
    }

    pub fn dataset(&self) -> &'static Dataset {
        &DATASETS[self.dataset]
    }

    /// Switch to a neighbouring dataset.  Feature choices and any results
    /// on the board belong to the old one and are dropped.
    pub fn select_dataset(&mut self, delta: isize) {
        let last = DATASETS.len() as isize - 1;
        let next = (self.dataset as isize + delta).clamp(0, last) as usize;
        if next == self.dataset {
            return;
        }
        tracing::debug!("dataset -> {}", DATASETS[next].name);
        self.dataset = next;
        self.excluded = vec![false; DATASETS[next].features.len()];
        self.feature_cursor = 0;
        self.clear_results();
    }

    /// Cycle through the datasets, wrapping at the end.
    pub fn next_dataset(&mut self) {
        if self.dataset + 1 == DATASETS.len() {
            self.select_dataset(-(self.dataset as isize));
        } else {
            self.select_dataset(1);
        }
    }

    pub fn feature_cursor(&self) -> usize {
        self.feature_cursor
    }

    pub fn is_excluded(&self, feature: usize) -> bool {
        self.excluded.get(feature).copied().unwrap_or(false)
    }

    pub fn move_feature_cursor(&mut self, delta: isize) {
        let last = self.excluded.len() as isize - 1;
        self.feature_cursor = (self.feature_cursor as isize + delta).clamp(0, last) as usize;
    }

    /// Include or exclude the feature under the cursor.  The last included
    /// feature cannot be excluded.
    pub fn toggle_feature(&mut self) -> Result<(), TwinError> {
        let i = self.feature_cursor;
        let included = self.excluded.iter().filter(|&&x| !x).count();
        if !self.excluded[i] && included == 1 {
            return Err(TwinError::NoFeatures);
        }
        self.excluded[i] = !self.excluded[i];
        Ok(())
    }

    pub fn selected_features(&self) -> Vec<String> {
        self.dataset()
            .features
            .iter()
            .zip(&self.excluded)
            .filter(|&(_, &excluded)| !excluded)
            .map(|(f, _)| f.to_string())
            .collect()
    }

    pub fn model_cursor(&self) -> usize {
        self.model_cursor
    }

    pub fn is_model_selected(&self, model: usize) -> bool {
        self.models.get(model).copied().unwrap_or(false)
    }

    pub fn move_model_cursor(&mut self, delta: isize) {
        let last = self.models.len() as isize - 1;
        self.model_cursor = (self.model_cursor as isize + delta).clamp(0, last) as usize;
    }

    pub fn toggle_model(&mut self) {
        let selected = &mut self.models[self.model_cursor];
        *selected = !*selected;
    }

    /// Selected models in catalogue order.
    pub fn selected_models(&self) -> Vec<String> {
        MODEL_CATALOG
            .iter()
            .zip(&self.models)
            .filter(|&(_, &on)| on)
            .map(|(m, _)| m.to_string())
            .collect()
    }

    pub fn is_training(&self) -> bool {
        matches!(
            self.board.state(),
            SessionState::Preparing | SessionState::Running
        )
    }

    /// The request the current choices would send.
    pub fn request(&self) -> Result<TrainingRequest, TwinError> {
        let models = self.selected_models();
        if models.is_empty() {
            return Err(TwinError::NoModels);
        }
        let mut request = TrainingRequest::new(self.dataset().name, models);
        request.selected_features = self.selected_features();
        Ok(request)
    }

    /// Begin a training session on the board.  Returns the session id the
    /// feed must carry and the request to replay.
    pub fn start(&mut self, at: DateTime<Local>) -> Result<(u64, TrainingRequest), TwinError> {
        if self.is_training() {
            return Err(TwinError::Busy);
        }
        let request = self.request()?;
        let session = self.board.begin(&request, at);
        self.trained_features = request.selected_features.clone();
        self.inspected = 0;
        Ok((session, request))
    }

    pub fn board(&self) -> &TrainingBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut TrainingBoard {
        &mut self.board
    }

    /// Models of the current session that finished training.
    pub fn trained_models(&self) -> Vec<&str> {
        self.board
            .runs()
            .iter()
            .filter(|r| r.status == RunStatus::Completed)
            .map(|r| r.model.as_str())
            .collect()
    }

    /// Step through the trained models, wrapping around.
    pub fn inspect(&mut self, delta: isize) {
        let n = self.trained_models().len() as isize;
        if n == 0 {
            return;
        }
        self.inspected = (self.inspected as isize + delta).rem_euclid(n) as usize;
    }

    pub fn inspected_model(&self) -> Option<&str> {
        let trained = self.trained_models();
        trained.get(self.inspected.min(trained.len().saturating_sub(1))).copied()
    }

    /// Importances of the inspected model, most important first.
    pub fn importances(&self) -> Result<Vec<FeatureImportance>, TwinError> {
        let model = self.inspected_model().ok_or(TwinError::NotTrained)?;
        Ok(feature_importances(
            self.dataset().name,
            model,
            &self.trained_features,
        ))
    }

    fn clear_results(&mut self) {
        self.board.clear();
        self.trained_features.clear();
        self.inspected = 0;
    }
}

impl SectionPanel for TwinLab {
    fn on_leave(&mut self) {
        let board = std::mem::take(&mut self.board);
        *self = Self::new();
        // Keep the session counter moving so late feed messages stay stale.
        self.board = board;
        self.board.clear();
    }
}

/// Stand-in for the backend's per-model importances: a fixed weight per
/// (dataset, model, feature), normalised and sorted descending.
pub fn feature_importances(
    dataset: &str,
    model: &str,
    features: &[String],
) -> Vec<FeatureImportance> {
    let weights: Vec<f64> = features
        .iter()
        .map(|f| {
            let w = weight(&[dataset, model, f]);
            w * w
        })
        .collect();
    let total: f64 = weights.iter().sum();
    let mut out: Vec<FeatureImportance> = features
        .iter()
        .zip(weights)
        .map(|(f, w)| FeatureImportance {
            feature: f.clone(),
            importance: if total > 0.0 { w / total } else { 0.0 },
        })
        .collect();
    out.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    out
}

/// FNV-1a over the parts, folded into `1..=1000`.
fn weight(parts: &[&str]) -> f64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for part in parts {
        for b in part.bytes().chain(std::iter::once(0)) {
            h ^= u64::from(b);
            h = h.wrapping_mul(0x0100_0000_01b3);
        }
    }
    ((h >> 11) % 1000 + 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::training::{demo_feed, TrainingMessage};

    fn lab_with_models(models: &[usize]) -> TwinLab {
        let mut lab = TwinLab::new();
        for &m in models {
            lab.move_model_cursor(m as isize - lab.model_cursor() as isize);
            lab.toggle_model();
        }
        lab
    }

    fn finish(lab: &mut TwinLab, request: &TrainingRequest) {
        let at = Local::now();
        for msg in demo_feed(request) {
            lab.board_mut().apply(msg, at);
        }
    }

    #[test]
    fn test_start_requires_a_model() {
        let mut lab = TwinLab::new();
        assert_eq!(lab.start(Local::now()).unwrap_err(), TwinError::NoModels);
        assert_eq!(lab.board().state(), &SessionState::Idle);
    }

    #[test]
    fn test_request_carries_choices() {
        let mut lab = lab_with_models(&[2, 0]);
        lab.move_feature_cursor(1);
        lab.toggle_feature().expect("toggle");
        let request = lab.request().expect("request");
        assert_eq!(request.dataset, "line_sensors.csv");
        // Catalogue order, not selection order.
        assert_eq!(request.models, vec!["AdaBoost", "Random Forest"]);
        assert_eq!(request.selected_features.len(), 5);
        assert!(!request.selected_features.contains(&"pressure".to_string()));
    }

    #[test]
    fn test_last_feature_cannot_be_excluded() {
        let mut lab = TwinLab::new();
        let n = lab.dataset().features.len();
        for i in 0..n - 1 {
            lab.move_feature_cursor(i as isize - lab.feature_cursor() as isize);
            lab.toggle_feature().expect("toggle");
        }
        lab.move_feature_cursor(n as isize);
        assert_eq!(lab.toggle_feature().unwrap_err(), TwinError::NoFeatures);
        assert_eq!(lab.selected_features().len(), 1);
    }

    #[test]
    fn test_second_start_while_training_is_refused() {
        let mut lab = lab_with_models(&[0]);
        lab.start(Local::now()).expect("start");
        assert!(lab.is_training());
        assert_eq!(lab.start(Local::now()).unwrap_err(), TwinError::Busy);
    }

    #[test]
    fn test_switching_dataset_clears_results() {
        let mut lab = lab_with_models(&[0, 1]);
        let (session, request) = lab.start(Local::now()).expect("start");
        finish(&mut lab, &request);
        assert!(!lab.trained_models().is_empty());

        lab.next_dataset();
        assert_eq!(lab.dataset().name, "turbofan_engines.csv");
        assert!(lab.board().runs().is_empty());
        assert!(!lab.board_mut().apply_for(
            session,
            TrainingMessage::AllCompleted { message: None },
            Local::now()
        ));
        // Model choices survive the switch.
        assert_eq!(lab.selected_models().len(), 2);

        lab.next_dataset();
        lab.next_dataset();
        assert_eq!(lab.dataset().name, "line_sensors.csv");
    }

    #[test]
    fn test_importances_follow_the_inspected_model() {
        // The demo feed fails the third model.
        let mut lab = lab_with_models(&[0, 1, 2, 3]);
        assert_eq!(lab.importances().unwrap_err(), TwinError::NotTrained);
        let (_, request) = lab.start(Local::now()).expect("start");
        finish(&mut lab, &request);
        assert_eq!(
            lab.trained_models(),
            vec!["AdaBoost", "Gradient Boosting", "Decision Tree"]
        );

        let first = lab.importances().expect("importances");
        assert_eq!(first.len(), 6);
        let total: f64 = first.iter().map(|i| i.importance).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(first.windows(2).all(|w| w[0].importance >= w[1].importance));

        lab.inspect(1);
        assert_eq!(lab.inspected_model(), Some("Gradient Boosting"));
        lab.inspect(-2);
        assert_eq!(lab.inspected_model(), Some("Decision Tree"));
        assert_eq!(lab.importances().expect("importances"), lab.importances().expect("again"));
    }

    #[test]
    fn test_leaving_resets_choices_and_staleness() {
        let mut lab = lab_with_models(&[0]);
        lab.select_dataset(2);
        let (session, _) = lab.start(Local::now()).expect("start");
        lab.on_leave();
        assert_eq!(lab.dataset().name, "line_sensors.csv");
        assert!(lab.selected_models().is_empty());
        assert_eq!(lab.board().state(), &SessionState::Idle);
        assert!(!lab.board_mut().apply_for(
            session,
            TrainingMessage::AllCompleted { message: None },
            Local::now()
        ));
    }
}
