//! Form actor, builder and handle
//!
//! Every form is a single tokio task that owns the values/metadata pairs,
//! the [`Pipeline`] and the debounce timer. Changes reach it through an
//! unbounded channel and are reduced one at a time, in acceptance order.
//! Logic runs are spawned separately and report back to the actor, which
//! merges or discards their results. Observers read the published
//! [`Store`]s and never touch the actor's state directly.

use crate::{
    pipeline::{Completion, FormStatus, Generation, Phase, Pipeline},
    Error, FormConfig, FormRegistry, Init, Logic, LogicError, Result, Store,
};
use formwork_core::{Change, CurPrev, FieldPath, FormState, Helpers, Metas, Value, Values};
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinSet};
use tokio::time::{self, Instant};
use tracing::{debug, warn};

/// Entry point for building forms
pub struct Form;

impl Form {
    /// Start building a form called `name`
    pub fn builder(name: impl Into<String>) -> FormBuilder {
        FormBuilder::new(name)
    }
}

/// Builder for a form's configuration and routines
#[derive(Debug)]
pub struct FormBuilder {
    name: String,
    config: FormConfig,
    init: Option<Init>,
    logic: Logic,
}

impl FormBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: FormConfig::default(),
            init: None,
            logic: Logic::identity(),
        }
    }

    pub fn config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    /// Routine spawned once, right after the form starts
    ///
    /// It is expected to submit a `Change::Reset` with the form's initial
    /// values and metadata.
    pub fn init<F, Fut>(mut self, f: F) -> Self
    where
        F: FnOnce(FormHandle) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.init = Some(Init::new(f));
        self
    }

    /// Routine run after each debounce window
    pub fn logic<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Helpers) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Helpers, LogicError>> + Send + 'static,
    {
        self.logic = Logic::new(f);
        self
    }

    /// Start the form's actor and init routine
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(self) -> FormHandle {
        let FormBuilder {
            name,
            config,
            init,
            logic,
        } = self;
        let name: Arc<str> = Arc::from(name);
        let state = FormState::new();
        let pipeline = Pipeline::new();

        let (changes, inbox) = mpsc::unbounded_channel();
        let (values_tx, values) = watch::channel(state.values.clone());
        let (metas_tx, metas) = watch::channel(state.metas.clone());
        let (status_tx, status) = watch::channel(pipeline.status());

        let handle = FormHandle {
            name: name.clone(),
            changes,
            submitted: Arc::new(AtomicU64::new(0)),
            values,
            metas,
            status,
        };

        let actor = FormActor {
            name,
            config,
            logic,
            state,
            pipeline,
            inbox,
            values_tx,
            metas_tx,
            status_tx,
        };
        debug!(form = %actor.name, debounce_ms = actor.config.debounce_ms(), "form spawned");
        tokio::spawn(actor.run());

        if let Some(init) = init {
            tokio::spawn(init.run(handle.clone()));
        }
        handle
    }

    /// Start the form and register it under its name
    pub fn spawn_in(self, registry: &FormRegistry) -> FormHandle {
        let handle = self.spawn();
        registry.register(handle.name(), handle.clone());
        handle
    }
}

/// Cloneable handle to a running form
///
/// The form keeps running while at least one handle exists.
#[derive(Clone)]
pub struct FormHandle {
    name: Arc<str>,
    changes: mpsc::UnboundedSender<Change>,
    submitted: Arc<AtomicU64>,
    values: watch::Receiver<CurPrev<Values>>,
    metas: watch::Receiver<CurPrev<Metas>>,
    status: watch::Receiver<FormStatus>,
}

impl FormHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Submit a change event
    pub fn submit(&self, change: Change) -> Result<()> {
        // Counted before sending so `settled` never waits on less than
        // what the actor may already have accepted.
        self.submitted.fetch_add(1, Ordering::SeqCst);
        self.changes.send(change).map_err(|_| {
            self.submitted.fetch_sub(1, Ordering::SeqCst);
            self.closed()
        })
    }

    /// Submit a single-field value change, parsing `name` as a path
    pub fn set_value(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let name = FieldPath::parse(name)?;
        self.submit(Change::value(name, value))
    }

    /// Values store
    pub fn values(&self) -> Store<CurPrev<Values>> {
        Store::new(self.name.clone(), self.values.clone())
    }

    /// Metadata store
    pub fn metas(&self) -> Store<CurPrev<Metas>> {
        Store::new(self.name.clone(), self.metas.clone())
    }

    /// Pipeline status store
    pub fn status(&self) -> Store<FormStatus> {
        Store::new(self.name.clone(), self.status.clone())
    }

    /// Latest published state
    pub fn state(&self) -> FormState {
        FormState {
            values: self.values.borrow().clone(),
            metas: self.metas.borrow().clone(),
        }
    }

    /// Wait until every change submitted so far has been accepted and no
    /// debounce window or logic run is outstanding
    pub async fn settled(&self) -> Result<FormStatus> {
        let target = self.submitted.load(Ordering::SeqCst);
        self.status()
            .wait_for(|status| status.generation.get() >= target && status.phase == Phase::Idle)
            .await
    }

    fn closed(&self) -> Error {
        Error::FormClosed(self.name.to_string())
    }
}

impl fmt::Debug for FormHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

type RunOutput = (Generation, std::result::Result<Helpers, LogicError>);

/// The task owning one form's state
struct FormActor {
    name: Arc<str>,
    config: FormConfig,
    logic: Logic,
    state: FormState,
    pipeline: Pipeline,
    inbox: mpsc::UnboundedReceiver<Change>,
    values_tx: watch::Sender<CurPrev<Values>>,
    metas_tx: watch::Sender<CurPrev<Metas>>,
    status_tx: watch::Sender<FormStatus>,
}

impl FormActor {
    async fn run(mut self) {
        let debounce = self.config.debounce();
        let timer = time::sleep(debounce);
        tokio::pin!(timer);
        let mut runs: JoinSet<RunOutput> = JoinSet::new();

        loop {
            tokio::select! {
                biased;
                change = self.inbox.recv() => match change {
                    Some(change) => {
                        self.accept(change);
                        timer.as_mut().reset(Instant::now() + debounce);
                    }
                    None => break,
                },
                () = &mut timer, if self.pipeline.is_pending() => self.start_run(&mut runs),
                Some(joined) = runs.join_next(), if !runs.is_empty() => self.finish_run(joined),
            }
            self.publish_status();
        }
        debug!(form = %self.name, in_flight = runs.len(), "all handles dropped, form stopped");
    }

    fn accept(&mut self, change: Change) {
        let touched = self.state.apply(&change);
        let generation = self.pipeline.accept_change();
        debug!(
            form = %self.name,
            %generation,
            change = change.label(),
            field = change.field().map(tracing::field::display),
            "change accepted"
        );
        if touched.values {
            self.values_tx.send_replace(self.state.values.clone());
        }
        if touched.metas {
            self.metas_tx.send_replace(self.state.metas.clone());
        }
    }

    fn start_run(&mut self, runs: &mut JoinSet<RunOutput>) {
        let Some(generation) = self.pipeline.start_run() else {
            return;
        };
        // Clones share structure with the live state but are never written
        // back: logic only produces new trees.
        let helpers = Helpers::new(self.state.clone());
        let logic = self.logic.clone();
        runs.spawn(async move { (generation, logic.run(helpers).await) });
        debug!(form = %self.name, %generation, "logic run started");
    }

    fn finish_run(&mut self, joined: std::result::Result<RunOutput, JoinError>) {
        match joined {
            Ok((generation, Ok(helpers))) => match self.pipeline.complete(generation) {
                Completion::Merge => {
                    let FormState { values, metas } = helpers.into_state();
                    self.state.merge(values.current, metas.current);
                    self.values_tx.send_replace(self.state.values.clone());
                    self.metas_tx.send_replace(self.state.metas.clone());
                    debug!(form = %self.name, %generation, "logic result merged");
                }
                Completion::Stale => {
                    debug!(
                        form = %self.name,
                        %generation,
                        live = %self.pipeline.generation(),
                        "discarding stale logic result"
                    );
                }
            },
            Ok((generation, Err(err))) => {
                self.pipeline.fail();
                warn!(form = %self.name, %generation, error = %err, "logic run failed, keeping last committed state");
            }
            Err(err) => {
                self.pipeline.fail();
                warn!(form = %self.name, error = %err, "logic run panicked, keeping last committed state");
            }
        }
    }

    fn publish_status(&self) {
        let next = self.pipeline.status();
        self.status_tx.send_if_modified(|status| {
            if *status == next {
                return false;
            }
            *status = next;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_core::{min_length, required, Meta, MetaPatch, Modify};
    use std::sync::Mutex;
    use std::time::Duration;

    fn p(raw: &str) -> FieldPath {
        FieldPath::parse(raw).unwrap()
    }

    async fn sleep_ms(ms: u64) {
        time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_triggers_single_run_with_latest_state() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let form = Form::builder("burst")
            .logic(move |helpers: Helpers| {
                let log = log.clone();
                async move {
                    log.lock().unwrap().push(helpers.value(&p("user.name")));
                    Ok(helpers)
                }
            })
            .spawn();

        form.set_value("user.name", "iv").unwrap();
        sleep_ms(10).await;
        form.set_value("user.name", "ivan").unwrap();
        let status = form.settled().await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![Value::from("ivan")]);
        assert_eq!(status.generation.get(), 2);
        assert_eq!(status.runs_started, 1);
        assert_eq!(status.merged, Some(Generation::new(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_window_restarts_on_each_change() {
        let form = Form::builder("debounce")
            .config(FormConfig::with_debounce(Duration::from_millis(200)))
            .spawn();
        let status = form.status();

        form.set_value("a", 1).unwrap();
        sleep_ms(150).await;
        form.set_value("a", 2).unwrap();
        sleep_ms(150).await;
        assert_eq!(status.get().runs_started, 0, "window restarted by second change");
        assert_eq!(status.get().phase, Phase::PendingDebounce);

        sleep_ms(100).await;
        assert_eq!(status.get().runs_started, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_required_scenario() {
        let form = Form::builder("login")
            .logic(|mut helpers: Helpers| async move {
                helpers.check(&p("user.name"), &[&required()])?;
                let disabled = helpers.has_errors();
                let submit = MetaPatch::new().disabled(disabled);
                helpers.modify(Modify::field(p("submit")).meta(submit))?;
                Ok::<_, LogicError>(helpers)
            })
            .spawn();

        form.submit(Change::value(p("user.name"), "")).unwrap();
        form.settled().await.unwrap();

        let state = form.state();
        assert_eq!(state.meta(&p("user.name")).error.as_deref(), Some("Required"));
        assert!(state.has_errors());
        assert!(state.meta(&p("submit")).disabled);

        form.submit(Change::value(p("user.name"), "ivan")).unwrap();
        sleep_ms(100).await;
        assert!(form.state().has_errors(), "error stays until the window elapses");

        form.settled().await.unwrap();
        let state = form.state();
        assert_eq!(state.meta(&p("user.name")).error, None);
        assert!(!state.has_errors());
        assert!(!state.meta(&p("submit")).disabled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_accepted_change_wins_out_of_order() {
        let form = Form::builder("race")
            .logic(|mut helpers: Helpers| async move {
                let name = helpers.value(&p("name"));
                let delay = if name == Value::from("slow") { 1_000 } else { 10 };
                time::sleep(Duration::from_millis(delay)).await;
                helpers.modify(Modify::field(p("echo")).value(name))?;
                Ok::<_, LogicError>(helpers)
            })
            .spawn();

        form.set_value("name", "slow").unwrap();
        sleep_ms(250).await;
        assert_eq!(form.status().get().phase, Phase::Running);

        form.set_value("name", "fast").unwrap();
        let status = form.settled().await.unwrap();

        assert_eq!(form.state().value(&p("echo")), Value::from("fast"));
        assert_eq!(status.runs_started, 2);
        assert_eq!(status.runs_merged, 1);
        assert_eq!(status.runs_discarded, 1);
        assert_eq!(status.merged, Some(Generation::new(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_merge_moves_current_to_previous() {
        let form = Form::builder("merge")
            .logic(|mut helpers: Helpers| async move {
                helpers.modify(Modify::field(p("computed")).value(true))?;
                Ok::<_, LogicError>(helpers)
            })
            .spawn();

        form.set_value("name", "ivan").unwrap();
        form.settled().await.unwrap();

        let values = form.values().get();
        assert_eq!(values.current.value_at(&p("computed")), Value::Bool(true));
        assert_eq!(values.previous.value_at(&p("computed")), Value::Null);
        assert_eq!(values.previous.value_at(&p("name")), Value::from("ivan"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_logic_keeps_state() {
        let form = Form::builder("failing")
            .logic(|mut helpers: Helpers| async move {
                if helpers.value(&p("mode")) == Value::from("fail") {
                    return Err(LogicError::msg("backend unavailable"));
                }
                helpers.modify(Modify::field(p("ok")).value(true))?;
                Ok::<_, LogicError>(helpers)
            })
            .spawn();

        form.set_value("mode", "fail").unwrap();
        let status = form.settled().await.unwrap();
        assert_eq!(status.runs_failed, 1);
        assert_eq!(form.state().value(&p("mode")), Value::from("fail"));
        assert_eq!(form.state().value(&p("ok")), Value::Null);

        form.set_value("mode", "work").unwrap();
        let status = form.settled().await.unwrap();
        assert_eq!(status.runs_merged, 1);
        assert_eq!(form.state().value(&p("ok")), Value::Bool(true));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_helper_call_fails_run() {
        let form = Form::builder("grouped")
            .logic(|mut helpers: Helpers| async move {
                helpers.check(&p("user.name"), &[&required()])?;
                helpers.check(&p("user"), &[&required()])?;
                Ok::<_, LogicError>(helpers)
            })
            .spawn();

        form.set_value("user.name", "").unwrap();
        let status = form.settled().await.unwrap();

        assert_eq!(status.runs_failed, 1);
        assert_eq!(status.runs_merged, 0);
        assert_eq!(form.state().meta(&p("user.name")).error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_logic_does_not_stop_form() {
        let form = Form::builder("panicking")
            .logic(|helpers: Helpers| async move {
                if helpers.value(&p("mode")) == Value::from("panic") {
                    panic!("logic bug");
                }
                Ok(helpers)
            })
            .spawn();

        form.set_value("mode", "panic").unwrap();
        let status = form.settled().await.unwrap();
        assert_eq!(status.runs_failed, 1);

        form.set_value("mode", "calm").unwrap();
        let status = form.settled().await.unwrap();
        assert_eq!(status.runs_merged, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_init_seeds_form() {
        let form = Form::builder("seeded")
            .init(|handle| async move {
                sleep_ms(100).await;
                let values = Values::new().set_value(&p("user.name"), "ivan");
                let metas = Metas::new().set_leaf(&p("submit"), Meta::new().with_disabled(true));
                handle.submit(Change::reset(values, metas)).unwrap();
            })
            .logic(|mut helpers: Helpers| async move {
                helpers.check(&p("user.name"), &[&required()])?;
                helpers.check(&p("user.password"), &[&required(), &min_length(6)])?;
                let disabled = helpers.has_errors();
                let submit = MetaPatch::new().disabled(disabled);
                helpers.modify(Modify::field(p("submit")).meta(submit))?;
                Ok::<_, LogicError>(helpers)
            })
            .spawn();

        form.status().wait_for(|s| s.generation.get() == 1).await.unwrap();
        let status = form.settled().await.unwrap();
        assert_eq!(status.runs_merged, 1);

        let state = form.state();
        assert_eq!(state.value(&p("user.name")), Value::from("ivan"));
        assert_eq!(state.meta(&p("user.name")).error, None);
        assert_eq!(state.meta(&p("user.password")).error.as_deref(), Some("Required"));
        assert!(state.meta(&p("submit")).disabled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_meta_only_change_keeps_values_store_quiet() {
        let form = Form::builder("quiet").spawn();
        let mut values = form.values();
        values.mark_seen();

        form.submit(Change::meta(p("submit"), Meta::new().with_disabled(true)))
            .unwrap();
        form.status().wait_for(|s| s.generation.get() == 1).await.unwrap();

        assert!(!values.has_changed());
        assert!(form.state().meta(&p("submit")).disabled);
    }

    #[tokio::test]
    async fn test_submit_to_stopped_form() {
        let (changes, inbox) = mpsc::unbounded_channel();
        drop(inbox);
        let (_, values) = watch::channel(CurPrev::default());
        let (_, metas) = watch::channel(CurPrev::default());
        let (_, status) = watch::channel(FormStatus::default());
        let handle = FormHandle {
            name: Arc::from("gone"),
            changes,
            submitted: Arc::new(AtomicU64::new(0)),
            values,
            metas,
            status,
        };

        let err = handle.set_value("a", 1).unwrap_err();
        assert!(matches!(err, Error::FormClosed(name) if name == "gone"));
        assert!(matches!(handle.set_value("a..b", 1), Err(Error::Core(_))));
    }
}
