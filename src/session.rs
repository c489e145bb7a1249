//! Session state owned by a presentation layer.
//!
//! A [`Session`] holds what a UI needs between user actions: the loaded file name, its dataset and
//! the latest cleaned dataset. The processing functions stay pure; the session only sequences
//! them, gates cleaning with a busy flag and reports events to a [`SessionObserver`].
//!
//! Cleaning is split in three steps so a UI can run the work off its event handler:
//!
//! 1. [`Session::prepare_clean`] takes the busy flag and deep-copies the dataset into a
//!    [`CleanJob`].
//! 2. [`CleanJob::run`] computes the cleaned dataset and releases the flag.
//! 3. [`Session::apply`] stores the result.
//!
//! [`Session::clean`] does all three in one call.
//!
//! ```rust
//! use missing_data_cleaner::processing::{CleaningOptions, Strategy};
//! use missing_data_cleaner::session::{Session, SessionOptions};
//!
//! # fn main() -> Result<(), missing_data_cleaner::CleanerError> {
//! let mut session = Session::new(SessionOptions::default());
//! session.load_text("people.csv", "name,age\nAnn,30\nBob,\n")?;
//! session.clean(&CleaningOptions::new(Strategy::Median))?;
//!
//! let download = session.download()?;
//! assert_eq!(download.file_name, "people_cleaned.csv");
//! assert_eq!(download.bytes, b"name,age\nAnn,30\nBob,30\n".to_vec());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::error::{CleanerError, CleanerResult};
use crate::export::{Download, DEFAULT_SUFFIX};
use crate::ingestion::{display_name, load_from_path, parse_table, validate_selection};
use crate::observability::{CleanStats, EventContext, LoadStats, SessionObserver, Severity};
use crate::processing::{
    analyze, clean, profile, recommend_knn, CleaningOptions, ColumnProfile, KnnRecommendation,
    MissingSummary,
};
use crate::types::{DataSet, Value};

/// Rows shown in the source preview.
pub const PREVIEW_ROWS: usize = 5;

/// Rows shown in the cleaned results view.
pub const RESULT_ROWS: usize = 10;

/// Options controlling session behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct SessionOptions {
    /// Optional observer for load/clean/reset/failure events.
    pub observer: Option<Arc<dyn SessionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
    /// Suffix for download file names.
    pub download_suffix: String,
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .field("download_suffix", &self.download_suffix)
            .finish()
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: Severity::Critical,
            download_suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

/// Holds the busy flag for as long as it lives.
#[derive(Debug)]
struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> CleanerResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CleanerError::Busy)?;
        Ok(Self {
            flag: Arc::clone(flag),
        })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// A queued clean: an independent snapshot of the source dataset plus the options to apply.
///
/// The session stays busy until the job is run or dropped.
#[derive(Debug)]
pub struct CleanJob {
    snapshot: DataSet,
    options: CleaningOptions,
    generation: u64,
    _guard: BusyGuard,
}

impl CleanJob {
    /// Options this job will clean with.
    pub fn options(&self) -> &CleaningOptions {
        &self.options
    }

    /// Run the imputation engine on the snapshot.
    pub fn run(self) -> CleanOutcome {
        let cleaned = clean(&self.snapshot, &self.options);
        let stats = CleanStats {
            strategy: self.options.strategy,
            rows_before: self.snapshot.row_count(),
            rows_after: cleaned.row_count(),
            missing_before: self.snapshot.total_missing(),
            missing_after: cleaned.total_missing(),
        };
        CleanOutcome {
            cleaned,
            stats,
            generation: self.generation,
        }
    }
}

/// Result of [`CleanJob::run`], to be stored with [`Session::apply`].
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub cleaned: DataSet,
    pub stats: CleanStats,
    generation: u64,
}

/// Explicit context object replacing global UI state.
pub struct Session {
    options: SessionOptions,
    file_name: Option<String>,
    dataset: Option<DataSet>,
    cleaned: Option<DataSet>,
    /// Bumped on every successful load so stale clean outcomes can be rejected.
    generation: u64,
    busy: Arc<AtomicBool>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("options", &self.options)
            .field("file_name", &self.file_name)
            .field("rows", &self.dataset.as_ref().map(DataSet::row_count))
            .field("cleaned_rows", &self.cleaned.as_ref().map(DataSet::row_count))
            .field("busy", &self.is_busy())
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            file_name: None,
            dataset: None,
            cleaned: None,
            generation: 0,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Name of the loaded file, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// The loaded dataset, if any.
    pub fn dataset(&self) -> Option<&DataSet> {
        self.dataset.as_ref()
    }

    /// The latest cleaned dataset, if any.
    pub fn cleaned(&self) -> Option<&DataSet> {
        self.cleaned.as_ref()
    }

    /// Whether a clean job currently holds the busy flag.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Validate a file selection and load the single selected file.
    pub fn load_selection<P: AsRef<Path>>(&mut self, paths: &[P]) -> CleanerResult<&DataSet> {
        let path = match validate_selection(paths) {
            Ok(p) => p.to_path_buf(),
            Err(e) => return Err(self.report(&self.context(), e)),
        };
        self.load_path(path)
    }

    /// Load a `.csv`/`.txt` file, replacing the current dataset.
    ///
    /// On failure the previous state is kept.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> CleanerResult<&DataSet> {
        let path = path.as_ref();
        let file_name = display_name(path);
        match load_from_path(path) {
            Ok(ds) => Ok(self.install(file_name, ds)),
            Err(e) => {
                let ctx = EventContext {
                    file_name: Some(file_name),
                };
                Err(self.report(&ctx, e))
            }
        }
    }

    /// Parse already-read text, replacing the current dataset.
    ///
    /// On failure the previous state is kept.
    pub fn load_text(&mut self, file_name: &str, content: &str) -> CleanerResult<&DataSet> {
        match parse_table(content) {
            Ok(ds) => Ok(self.install(file_name.to_owned(), ds)),
            Err(e) => {
                let ctx = EventContext {
                    file_name: Some(file_name.to_owned()),
                };
                Err(self.report(&ctx, e))
            }
        }
    }

    /// Missing-value summary of the loaded dataset.
    pub fn summary(&self) -> Option<MissingSummary> {
        self.dataset.as_ref().map(analyze)
    }

    /// Missing-value summary of the cleaned dataset.
    pub fn cleaned_summary(&self) -> Option<MissingSummary> {
        self.cleaned.as_ref().map(analyze)
    }

    /// Column profiles of the loaded dataset.
    pub fn profile(&self) -> Option<Vec<ColumnProfile>> {
        self.dataset.as_ref().map(profile)
    }

    /// KNN recommendation for the loaded dataset.
    pub fn knn_recommendation(&self) -> Option<KnnRecommendation> {
        self.dataset.as_ref().map(recommend_knn)
    }

    /// First [`PREVIEW_ROWS`] rows of the loaded dataset (empty when nothing is loaded).
    pub fn preview(&self) -> &[Vec<Value>] {
        self.dataset
            .as_ref()
            .map(|ds| ds.head(PREVIEW_ROWS))
            .unwrap_or_default()
    }

    /// First [`RESULT_ROWS`] rows of the cleaned dataset (empty before the first clean).
    pub fn results(&self) -> &[Vec<Value>] {
        self.cleaned
            .as_ref()
            .map(|ds| ds.head(RESULT_ROWS))
            .unwrap_or_default()
    }

    /// Take the busy flag and snapshot the loaded dataset for cleaning.
    ///
    /// Fails with [`CleanerError::Busy`] while another job is outstanding, or with
    /// [`CleanerError::UserInput`] when nothing is loaded.
    pub fn prepare_clean(&self, options: &CleaningOptions) -> CleanerResult<CleanJob> {
        let Some(dataset) = self.dataset.as_ref() else {
            return Err(self.report(&self.context(), CleanerError::user_input("no dataset loaded")));
        };
        let guard = match BusyGuard::acquire(&self.busy) {
            Ok(g) => g,
            Err(e) => return Err(self.report(&self.context(), e)),
        };

        debug!(strategy = %options.strategy, rows = dataset.row_count(), "clean queued");
        Ok(CleanJob {
            snapshot: dataset.clone(),
            options: options.clone(),
            generation: self.generation,
            _guard: guard,
        })
    }

    /// Store a finished clean as the current cleaned dataset.
    ///
    /// Outcomes computed for a dataset that has since been replaced are rejected and the current
    /// cleaned dataset is left as it was.
    pub fn apply(&mut self, outcome: CleanOutcome) -> CleanerResult<&DataSet> {
        if outcome.generation != self.generation {
            let err = CleanerError::user_input("the dataset changed while cleaning; clean again");
            return Err(self.report(&self.context(), err));
        }

        if let Some(obs) = self.options.observer.as_ref() {
            obs.on_cleaned(&self.context(), outcome.stats);
        }
        Ok(&*self.cleaned.insert(outcome.cleaned))
    }

    /// Prepare, run and apply a clean in one call.
    pub fn clean(&mut self, options: &CleaningOptions) -> CleanerResult<&DataSet> {
        let outcome = self.prepare_clean(options)?.run();
        self.apply(outcome)
    }

    /// Discard the cleaned dataset (the loaded dataset is kept).
    pub fn reset(&mut self) {
        self.cleaned = None;
        if let Some(obs) = self.options.observer.as_ref() {
            obs.on_reset(&self.context());
        }
    }

    /// Package the cleaned dataset for download.
    pub fn download(&self) -> CleanerResult<Download> {
        let Some(cleaned) = self.cleaned.as_ref() else {
            return Err(self.report(
                &self.context(),
                CleanerError::user_input("nothing to download; clean the dataset first"),
            ));
        };
        let original = self.file_name.as_deref().unwrap_or("dataset");
        Download::new(cleaned, original, &self.options.download_suffix)
            .map_err(|e| self.report(&self.context(), e))
    }

    fn install(&mut self, file_name: String, dataset: DataSet) -> &DataSet {
        self.generation += 1;
        self.cleaned = None;
        self.file_name = Some(file_name);

        if let Some(obs) = self.options.observer.as_ref() {
            let stats = LoadStats {
                rows: dataset.row_count(),
                columns: dataset.column_count(),
                missing: dataset.total_missing(),
            };
            obs.on_loaded(&self.context(), stats);
        }
        self.dataset.insert(dataset)
    }

    fn context(&self) -> EventContext {
        EventContext {
            file_name: self.file_name.clone(),
        }
    }

    /// Notify the observer about `error` and hand it back.
    fn report(&self, ctx: &EventContext, error: CleanerError) -> CleanerError {
        if let Some(obs) = self.options.observer.as_ref() {
            let severity = Severity::for_error(&error);
            obs.on_failure(ctx, severity, &error);
            if severity >= self.options.alert_at_or_above {
                obs.on_alert(ctx, severity, &error);
            }
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;

    use super::{Session, SessionOptions, PREVIEW_ROWS};
    use crate::error::CleanerError;
    use crate::observability::{CleanStats, EventContext, LoadStats, SessionObserver, Severity};
    use crate::processing::{CleaningOptions, Strategy};
    use crate::types::Value;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl SessionObserver for Recorder {
        fn on_loaded(&self, _ctx: &EventContext, stats: LoadStats) {
            self.events.lock().unwrap().push(format!("loaded:{}", stats.rows));
        }
        fn on_cleaned(&self, _ctx: &EventContext, stats: CleanStats) {
            self.events
                .lock()
                .unwrap()
                .push(format!("cleaned:{}", stats.strategy));
        }
        fn on_reset(&self, _ctx: &EventContext) {
            self.events.lock().unwrap().push("reset".to_string());
        }
        fn on_failure(&self, _ctx: &EventContext, severity: Severity, _error: &CleanerError) {
            self.events.lock().unwrap().push(format!("failed:{severity:?}"));
        }
    }

    fn session_with(recorder: &Arc<Recorder>) -> Session {
        Session::new(SessionOptions {
            observer: Some(recorder.clone()),
            ..Default::default()
        })
    }

    #[test]
    fn load_clean_reset_notify_observer() {
        let rec = Arc::new(Recorder::default());
        let mut session = session_with(&rec);

        session.load_text("p.csv", "name,age\nAnn,30\nBob,\n,25\n").unwrap();
        session.clean(&CleaningOptions::new(Strategy::Mean)).unwrap();
        session.reset();

        assert_eq!(
            *rec.events.lock().unwrap(),
            vec!["loaded:3", "cleaned:mean", "reset"]
        );
        assert!(session.cleaned().is_none());
        assert!(session.dataset().is_some());
    }

    #[test]
    fn failed_load_keeps_previous_state() {
        let rec = Arc::new(Recorder::default());
        let mut session = session_with(&rec);
        session.load_text("a.csv", "x\n1\n").unwrap();

        let err = session.load_text("b.csv", "\n\n").unwrap_err();
        assert!(matches!(err, CleanerError::Parse { .. }));
        assert_eq!(session.file_name(), Some("a.csv"));
        assert_eq!(session.dataset().unwrap().row_count(), 1);
        assert_eq!(rec.events.lock().unwrap().last().unwrap(), "failed:Error");
    }

    #[test]
    fn second_prepare_while_busy_is_rejected() {
        let mut session = Session::default();
        session.load_text("a.csv", "x\n1\n\"\"\n").unwrap();

        let job = session
            .prepare_clean(&CleaningOptions::new(Strategy::Mode))
            .unwrap();
        assert!(session.is_busy());
        assert!(matches!(
            session.prepare_clean(&CleaningOptions::default()),
            Err(CleanerError::Busy)
        ));

        let outcome = job.run();
        assert!(!session.is_busy());
        let cleaned = session.apply(outcome).unwrap();
        assert_eq!(cleaned.rows[1][0], Value::Number(1.0));
    }

    #[test]
    fn dropped_job_releases_busy_flag() {
        let mut session = Session::default();
        session.load_text("a.csv", "x\n1\n").unwrap();
        drop(session.prepare_clean(&CleaningOptions::default()).unwrap());
        assert!(!session.is_busy());
        assert!(session.clean(&CleaningOptions::default()).is_ok());
    }

    #[test]
    fn stale_outcome_is_rejected() {
        let mut session = Session::default();
        session.load_text("a.csv", "x\n1\n\"\"\n").unwrap();
        let outcome = session
            .prepare_clean(&CleaningOptions::default())
            .unwrap()
            .run();

        session.load_text("b.csv", "y\n2\n").unwrap();
        assert!(session.apply(outcome).is_err());
        assert!(session.cleaned().is_none());
    }

    #[test]
    fn clean_does_not_touch_source_dataset() {
        let mut session = Session::default();
        session.load_text("a.csv", "x,y\n1,a\n,b\n").unwrap();
        session.clean(&CleaningOptions::new(Strategy::Drop)).unwrap();
        assert_eq!(session.dataset().unwrap().row_count(), 2);
        assert_eq!(session.cleaned().unwrap().row_count(), 1);
    }

    #[test]
    fn preview_and_results_are_capped() {
        let mut session = Session::default();
        assert!(session.preview().is_empty());
        assert!(session.results().is_empty());

        let mut content = String::from("n\n");
        for i in 0..20 {
            content.push_str(&format!("{i}\n"));
        }
        session.load_text("n.csv", &content).unwrap();
        assert_eq!(session.preview().len(), PREVIEW_ROWS);
        session.clean(&CleaningOptions::default()).unwrap();
        assert_eq!(session.results().len(), 10);
    }

    #[test]
    fn clean_and_download_require_prior_steps() {
        let mut session = Session::default();
        assert!(matches!(
            session.clean(&CleaningOptions::default()),
            Err(CleanerError::UserInput { .. })
        ));
        session.load_text("a.csv", "x\n1\n").unwrap();
        assert!(session.download().is_err());
    }

    #[test]
    fn selection_errors_are_user_input() {
        let rec = Arc::new(Recorder::default());
        let mut session = session_with(&rec);
        let err = session.load_selection(&["a.csv", "b.csv"]).unwrap_err();
        assert!(matches!(err, CleanerError::UserInput { .. }));
        let err = session.load_selection(&["a.xlsx"]).unwrap_err();
        assert!(matches!(err, CleanerError::UserInput { .. }));
        assert_eq!(rec.events.lock().unwrap().len(), 2);
        assert!(session.dataset().is_none());
    }
}
