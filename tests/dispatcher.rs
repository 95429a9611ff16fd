use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Barrier};

use eventvisor::{
    Activity, ActivityKind, Dispatcher, EventMap, FailureReport, FireContext, Listener,
    ListenerError, ListenerFactory, ListenerFn, ListenerRef, OutputError, Report, RollbackFn,
    RollbackRef, RoutineException, Subscribe,
};

type Undo = (Arc<String>, Vec<RoutineException>);

struct ChannelReport(mpsc::UnboundedSender<FailureReport>);

#[async_trait]
impl Report for ChannelReport {
    async fn report(&self, report: &FailureReport) {
        let _ = self.0.send(report.clone());
    }

    fn name(&self) -> &'static str {
        "channel"
    }
}

fn reporter() -> (Arc<ChannelReport>, mpsc::UnboundedReceiver<FailureReport>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(ChannelReport(tx)), rx)
}

fn recording_rollback() -> (RollbackRef<String>, mpsc::UnboundedReceiver<Undo>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let undo = RollbackFn::arc(move |payload: Arc<String>, critical: Vec<RoutineException>| {
        let _ = tx.send((payload, critical));
        async {}
    });
    (undo, rx)
}

fn succeed(name: &'static str) -> ListenerRef<String> {
    ListenerFn::arc(name, |_ctx: FireContext<String>, _p: Arc<String>| async move {
        Ok::<_, ListenerError>(())
    })
}

fn record(name: &'static str, key: &'static str, value: u64) -> ListenerRef<String> {
    ListenerFn::arc(name, move |ctx: FireContext<String>, _p: Arc<String>| async move {
        ctx.add_output(key, value)?;
        Ok::<_, ListenerError>(())
    })
}

fn fail(name: &'static str, message: &'static str) -> ListenerRef<String> {
    ListenerFn::arc(name, move |_ctx: FireContext<String>, _p: Arc<String>| async move {
        Err::<(), _>(ListenerError::fail(message))
    })
}

fn routines<'a>(failures: impl IntoIterator<Item = &'a RoutineException>) -> BTreeSet<String> {
    failures.into_iter().map(|ex| ex.routine.clone()).collect()
}

async fn recv_within<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> T {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out")
        .expect("channel closed")
}

#[tokio::test]
async fn test_no_faults_returns_exactly_recorded_output() {
    let registry = EventMap::<String>::builder()
        .critical("order", record("reserve", "reserve", 1))
        .non_critical("order", record("notify", "notify", 2))
        .critical("order", succeed("audit"))
        .build()
        .unwrap();
    let dispatcher = Dispatcher::builder(registry).build();

    let fired = dispatcher.fire("order", "o-1".to_string()).await;

    assert!(fired.is_success());
    assert!(fired.failures.is_empty());
    assert_eq!(fired.output.keys(), vec!["notify", "reserve"]);
    assert_eq!(fired.output.get::<u64>("reserve"), Some(&1));
    assert_eq!(fired.output.get::<u64>("notify"), Some(&2));
}

#[tokio::test]
async fn test_single_critical_fault_rolls_back_once() {
    let (undo, mut undone) = recording_rollback();
    let (sink, mut reports) = reporter();
    let registry = EventMap::<String>::builder()
        .non_critical("signup", record("sendEmail", "sendEmail", 7))
        .critical("signup", fail("createAccount", "db down"))
        .rollback("signup", undo)
        .build()
        .unwrap();
    let dispatcher = Dispatcher::builder(registry).with_reporter(sink).build();

    let (success, output) = dispatcher
        .fire("signup", "ada@example.com".to_string())
        .await
        .into_parts();

    assert!(!success);
    assert_eq!(output.get::<u64>("sendEmail"), Some(&7));

    let (payload, critical) = recv_within(&mut undone).await;
    assert_eq!(payload.as_str(), "ada@example.com");
    assert_eq!(
        critical,
        vec![RoutineException {
            message: "db down".into(),
            routine: "createAccount".into(),
            critical: true,
        }]
    );
    assert!(undone.try_recv().is_err());

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(reports.try_recv().is_err());
}

#[tokio::test]
async fn test_non_critical_faults_are_reported_without_rollback() {
    let (undo, mut undone) = recording_rollback();
    let (sink, mut reports) = reporter();
    let registry = EventMap::<String>::builder()
        .non_critical("signup", fail("sendEmail", "smtp down"))
        .non_critical("signup", fail("track", "analytics down"))
        .critical("signup", record("createAccount", "createAccount", 42))
        .rollback("signup", undo)
        .build()
        .unwrap();
    let dispatcher = Dispatcher::builder(registry).with_reporter(sink).build();

    let fired = dispatcher.fire("signup", "p".to_string()).await;

    assert!(fired.success);
    assert_eq!(fired.output.get::<u64>("createAccount"), Some(&42));
    assert_eq!(fired.critical().count(), 0);

    let report = recv_within(&mut reports).await;
    assert_eq!(&*report.event, "signup");
    assert!(report.failures.iter().all(|ex| !ex.critical));
    assert_eq!(
        routines(&report.failures),
        BTreeSet::from(["sendEmail".to_string(), "track".to_string()])
    );
    assert_eq!(report.failures, fired.failures);
    assert!(undone.try_recv().is_err());
}

#[tokio::test]
async fn test_unknown_and_empty_events_succeed_immediately() {
    let (undo, mut undone) = recording_rollback();
    let registry = EventMap::<String>::builder()
        .rollback("refund", undo)
        .build()
        .unwrap();
    let dispatcher = Dispatcher::builder(registry).build();
    let mut activity = dispatcher.subscribe();

    for event in ["missing", "refund"] {
        let fired = dispatcher.fire(event, "p".to_string()).await;
        assert!(fired.success);
        assert!(fired.output.is_empty());
        assert!(fired.failures.is_empty());
    }

    assert!(undone.try_recv().is_err());
    // nothing was spawned, nothing was published
    assert!(activity.try_recv().is_err());
}

#[tokio::test]
async fn test_concurrent_writes_lose_nothing() {
    const M: usize = 64;

    let mut builder = EventMap::<String>::builder();
    for i in 0..M {
        let listener: ListenerRef<String> = ListenerFn::arc(
            format!("writer-{i}"),
            move |ctx: FireContext<String>, _p: Arc<String>| async move {
                tokio::task::yield_now().await;
                ctx.add_output(format!("k{i:02}"), i)?;
                Ok::<_, ListenerError>(())
            },
        );
        builder = builder.non_critical("bulk", listener);
    }
    let dispatcher = Dispatcher::builder(builder.build().unwrap()).build();

    let fired = dispatcher.fire("bulk", String::new()).await;

    assert!(fired.success);
    assert_eq!(fired.output.len(), M);
    for i in 0..M {
        assert_eq!(fired.output.get::<usize>(&format!("k{i:02}")), Some(&i));
    }
}

#[tokio::test]
async fn test_signup_scenario() {
    let (undo, mut undone) = recording_rollback();
    let (sink, mut reports) = reporter();
    let registry = EventMap::<String>::builder()
        .non_critical("signup", fail("sendEmail", "smtp down"))
        .critical("signup", record("createAccount", "createAccount", 42))
        .rollback("signup", undo)
        .build()
        .unwrap();
    let dispatcher = Dispatcher::builder(registry).with_reporter(sink).build();

    let fired = dispatcher.fire("signup", "ada@example.com".to_string()).await;

    assert!(fired.success);
    assert_eq!(fired.output.keys(), vec!["createAccount"]);
    assert_eq!(fired.output.get::<u64>("createAccount"), Some(&42));

    let report = recv_within(&mut reports).await;
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].routine, "sendEmail");
    assert_eq!(report.failures[0].message, "smtp down");

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(undone.try_recv().is_err());
}

#[tokio::test]
#[allow(unreachable_code)]
async fn test_panics_are_recovered_with_their_message() {
    let structured: ListenerRef<String> =
        ListenerFn::arc("structured", |_ctx: FireContext<String>, _p: Arc<String>| async move {
            std::panic::panic_any(ListenerError::fail("quota exceeded"));
            Ok::<_, ListenerError>(())
        });
    let literal: ListenerRef<String> =
        ListenerFn::arc("literal", |_ctx: FireContext<String>, _p: Arc<String>| async move {
            panic!("static boom");
            Ok::<_, ListenerError>(())
        });
    let formatted: ListenerRef<String> =
        ListenerFn::arc("formatted", |_ctx: FireContext<String>, p: Arc<String>| async move {
            panic!("bad payload {p}");
            Ok::<_, ListenerError>(())
        });
    let opaque: ListenerRef<String> =
        ListenerFn::arc("opaque", |_ctx: FireContext<String>, _p: Arc<String>| async move {
            std::panic::panic_any(42_i32);
            Ok::<_, ListenerError>(())
        });

    let registry = EventMap::<String>::builder()
        .non_critical("risky", structured)
        .non_critical("risky", literal)
        .non_critical("risky", formatted)
        .non_critical("risky", opaque)
        .build()
        .unwrap();
    let (sink, _reports) = reporter();
    let dispatcher = Dispatcher::builder(registry).with_reporter(sink).build();

    let fired = dispatcher.fire("risky", "x".to_string()).await;

    assert!(fired.success);
    let mut got: Vec<(String, String)> = fired
        .failures
        .iter()
        .map(|ex| (ex.routine.clone(), ex.message.clone()))
        .collect();
    got.sort();
    assert_eq!(
        got,
        vec![
            ("formatted".to_string(), "bad payload x".to_string()),
            ("literal".to_string(), "static boom".to_string()),
            ("opaque".to_string(), "unknown panic".to_string()),
            ("structured".to_string(), "quota exceeded".to_string()),
        ]
    );
}

struct Session {
    handled: AtomicUsize,
}

#[async_trait]
impl Listener<String> for Session {
    fn name(&self) -> &str {
        "session"
    }

    async fn handle(&self, ctx: &FireContext<String>, _p: Arc<String>) -> Result<(), ListenerError> {
        let before = self.handled.fetch_add(1, Ordering::SeqCst);
        ctx.add_output("handled_before", before)?;
        Ok(())
    }
}

#[tokio::test]
async fn test_factory_builds_fresh_instance_per_fire() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&built);
    let factory: ListenerRef<String> = ListenerFactory::arc("session", move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Session {
            handled: AtomicUsize::new(0),
        }
    });
    let registry = EventMap::<String>::builder()
        .critical("login", factory)
        .build()
        .unwrap();
    let dispatcher = Dispatcher::builder(registry).build();

    for _ in 0..3 {
        let fired = dispatcher.fire("login", "u".to_string()).await;
        assert!(fired.success);
        assert_eq!(fired.output.get::<usize>("handled_before"), Some(&0));
    }
    assert_eq!(built.load(Ordering::SeqCst), 3);
}

struct NeedsPool {
    handled: Arc<AtomicBool>,
}

#[async_trait]
impl Listener<String> for NeedsPool {
    fn name(&self) -> &str {
        "needsPool"
    }

    fn construct(&self) -> Result<Option<ListenerRef<String>>, ListenerError> {
        Err(ListenerError::construct("no pool"))
    }

    async fn handle(&self, _ctx: &FireContext<String>, _p: Arc<String>) -> Result<(), ListenerError> {
        self.handled.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn test_construct_failure_is_captured_and_skips_handle() {
    let handled = Arc::new(AtomicBool::new(false));
    let (undo, mut undone) = recording_rollback();
    let registry = EventMap::<String>::builder()
        .critical(
            "report",
            Arc::new(NeedsPool {
                handled: Arc::clone(&handled),
            }),
        )
        .rollback("report", undo)
        .build()
        .unwrap();
    let dispatcher = Dispatcher::builder(registry).build();

    let fired = dispatcher.fire("report", "q".to_string()).await;

    assert!(!fired.success);
    assert!(!handled.load(Ordering::SeqCst));
    let (_, critical) = recv_within(&mut undone).await;
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].routine, "needsPool");
    assert_eq!(critical[0].message, "construct: no pool");
}

#[tokio::test]
async fn test_rollback_receives_every_critical_exception() {
    let (undo, mut undone) = recording_rollback();
    let registry = EventMap::<String>::builder()
        .critical("checkout", fail("reserve", "out of stock"))
        .critical("checkout", fail("charge", "card declined"))
        .non_critical("checkout", fail("notify", "smtp down"))
        .critical("checkout", succeed("audit"))
        .rollback("checkout", undo)
        .build()
        .unwrap();
    let dispatcher = Dispatcher::builder(registry).build();

    let fired = dispatcher.fire("checkout", "cart-9".to_string()).await;

    assert!(!fired.success);
    assert_eq!(fired.failures.len(), 3);
    assert_eq!(
        routines(fired.critical()),
        BTreeSet::from(["charge".to_string(), "reserve".to_string()])
    );

    let (payload, critical) = recv_within(&mut undone).await;
    assert_eq!(payload.as_str(), "cart-9");
    assert!(critical.iter().all(|ex| ex.critical));
    assert_eq!(
        routines(&critical),
        BTreeSet::from(["charge".to_string(), "reserve".to_string()])
    );
    assert!(undone.try_recv().is_err());
}

#[tokio::test]
async fn test_critical_fault_without_rollback_still_fails() {
    let registry = EventMap::<String>::builder()
        .critical("sync", fail("push", "remote down"))
        .build()
        .unwrap();
    let dispatcher = Dispatcher::builder(registry).build();

    let fired = dispatcher.fire("sync", "s".to_string()).await;
    assert!(!fired.success);
    assert_eq!(fired.failures.len(), 1);
}

#[tokio::test]
async fn test_rollback_panic_is_contained() {
    let undo: RollbackRef<String> =
        RollbackFn::arc(|_p: Arc<String>, _c: Vec<RoutineException>| async move {
            panic!("compensation failed");
        });
    let registry = EventMap::<String>::builder()
        .critical("transfer", fail("debit", "insufficient funds"))
        .rollback("transfer", undo)
        .build()
        .unwrap();
    let dispatcher = Dispatcher::builder(registry).build();
    let mut activity = dispatcher.subscribe();

    let fired = dispatcher.fire("transfer", "t-1".to_string()).await;
    assert!(!fired.success);

    let mut panicked = None;
    while let Ok(a) = activity.try_recv() {
        if a.kind == ActivityKind::RollbackPanicked {
            panicked = a.reason.as_deref().map(str::to_string);
        }
        assert_ne!(a.kind, ActivityKind::RollbackCompleted);
    }
    assert_eq!(panicked.as_deref(), Some("compensation failed"));

    // the dispatcher stays usable
    let again = dispatcher.fire("transfer", "t-2".to_string()).await;
    assert!(!again.success);
}

#[tokio::test]
async fn test_listener_can_fire_nested_event() {
    let outer: ListenerRef<String> =
        ListenerFn::arc("cascade", |ctx: FireContext<String>, p: Arc<String>| async move {
            let inner = ctx.dispatcher().fire("welcome", p).await;
            ctx.add_output("welcome_success", inner.success)?;
            ctx.add_output("welcome_keys", inner.output.len())?;
            Ok::<_, ListenerError>(())
        });
    let registry = EventMap::<String>::builder()
        .critical("signup", outer)
        .critical("welcome", record("greet", "greet", 1))
        .build()
        .unwrap();
    let dispatcher = Dispatcher::builder(registry).build();

    let fired = dispatcher.fire("signup", "ada".to_string()).await;

    assert!(fired.success);
    assert_eq!(fired.output.get::<bool>("welcome_success"), Some(&true));
    assert_eq!(fired.output.get::<usize>("welcome_keys"), Some(&1));
    assert!(!fired.output.contains_key("greet"));
}

#[tokio::test]
async fn test_output_after_return_is_rejected() {
    let (tx, mut rx) = mpsc::unbounded_channel::<Result<(), OutputError>>();
    let straggler: ListenerRef<String> =
        ListenerFn::arc("straggler", move |ctx: FireContext<String>, _p: Arc<String>| {
            let tx = tx.clone();
            async move {
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    let _ = tx.send(ctx.add_output("late", 1_u8));
                });
                Ok::<_, ListenerError>(())
            }
        });
    let registry = EventMap::<String>::builder()
        .non_critical("job", straggler)
        .build()
        .unwrap();
    let dispatcher = Dispatcher::builder(registry).build();

    let fired = dispatcher.fire("job", "j".to_string()).await;
    assert!(fired.success);
    assert!(fired.output.is_empty());

    let late = recv_within(&mut rx).await;
    assert_eq!(
        late,
        Err(OutputError::Sealed {
            event: "job".into(),
            key: "late".into(),
        })
    );
}

#[tokio::test]
async fn test_activity_describes_the_fire() {
    let registry = EventMap::<String>::builder()
        .critical("signup", fail("createAccount", "db down"))
        .non_critical("signup", succeed("sendEmail"))
        .build()
        .unwrap();
    let dispatcher = Dispatcher::builder(registry).build();
    let mut rx = dispatcher.subscribe();

    dispatcher.fire("signup", "p".to_string()).await;

    let mut records: Vec<Activity> = Vec::new();
    while let Ok(a) = rx.try_recv() {
        records.push(a);
    }
    let kinds: Vec<ActivityKind> = records.iter().map(|a| a.kind).collect();

    assert_eq!(kinds.first(), Some(&ActivityKind::FireStarted));
    assert_eq!(kinds.last(), Some(&ActivityKind::FireCompleted));
    assert_eq!(records[0].count, Some(2));
    assert_eq!(records.last().and_then(|a| a.success), Some(false));
    assert_eq!(
        kinds
            .iter()
            .filter(|k| **k == ActivityKind::ListenerStarting)
            .count(),
        2
    );

    let failed: Vec<&Activity> = records
        .iter()
        .filter(|a| a.kind == ActivityKind::ListenerFailed)
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].listener.as_deref(), Some("createAccount"));
    assert_eq!(failed[0].critical, Some(true));
    assert_eq!(failed[0].reason.as_deref(), Some("db down"));
    assert!(records.windows(2).all(|w| w[0].seq < w[1].seq));
}

struct Forwarded(mpsc::UnboundedSender<ActivityKind>);

#[async_trait]
impl Subscribe for Forwarded {
    async fn on_activity(&self, activity: &Activity) {
        let _ = self.0.send(activity.kind);
    }

    fn name(&self) -> &'static str {
        "forwarded"
    }
}

#[tokio::test]
async fn test_subscribers_receive_activity() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Forwarded(tx))];
    let registry = EventMap::<String>::builder()
        .critical("ping", succeed("pong"))
        .build()
        .unwrap();
    let dispatcher = Dispatcher::builder(registry)
        .with_subscribers(subs)
        .build();

    dispatcher.fire("ping", "p".to_string()).await;

    let mut seen = Vec::new();
    while seen.last() != Some(&ActivityKind::FireCompleted) {
        seen.push(recv_within(&mut rx).await);
    }
    assert_eq!(
        seen,
        vec![
            ActivityKind::FireStarted,
            ActivityKind::ListenerStarting,
            ActivityKind::ListenerCompleted,
            ActivityKind::FireCompleted,
        ]
    );
}

#[tokio::test]
async fn test_listeners_run_concurrently() {
    const N: usize = 4;
    let barrier = Arc::new(Barrier::new(N));

    let mut builder = EventMap::<String>::builder();
    for i in 0..N {
        let barrier = Arc::clone(&barrier);
        let listener: ListenerRef<String> = ListenerFn::arc(
            format!("meet-{i}"),
            move |_ctx: FireContext<String>, _p: Arc<String>| {
                let barrier = Arc::clone(&barrier);
                async move {
                    barrier.wait().await;
                    Ok::<_, ListenerError>(())
                }
            },
        );
        builder = builder.critical("rendezvous", listener);
    }
    let dispatcher = Dispatcher::builder(builder.build().unwrap()).build();

    let fired = tokio::time::timeout(
        Duration::from_secs(2),
        dispatcher.fire("rendezvous", String::new()),
    )
    .await
    .expect("listeners did not run concurrently");
    assert!(fired.success);
}

#[tokio::test]
async fn test_concurrent_fires_keep_separate_state() {
    let registry = EventMap::<String>::builder()
        .critical(
            "echo",
            ListenerFn::arc("echo", |ctx: FireContext<String>, p: Arc<String>| async move {
                tokio::task::yield_now().await;
                ctx.add_output("echo", p.to_string())?;
                Ok::<_, ListenerError>(())
            }),
        )
        .non_critical("echo", fail("flaky", "nope"))
        .build()
        .unwrap();
    let (sink, _reports) = reporter();
    let dispatcher = Dispatcher::builder(registry).with_reporter(sink).build();

    let (a, b) = tokio::join!(
        dispatcher.fire("echo", "a".to_string()),
        dispatcher.fire("echo", "b".to_string()),
    );

    assert_eq!(a.output.get::<String>("echo").map(String::as_str), Some("a"));
    assert_eq!(b.output.get::<String>("echo").map(String::as_str), Some("b"));
    assert_eq!(a.failures.len(), 1);
    assert_eq!(b.failures.len(), 1);
}

#[tokio::test]
async fn test_arc_payload_is_shared_not_cloned() {
    let payload = Arc::new("shared".to_string());
    let seen = Arc::clone(&payload);
    let registry = EventMap::<String>::builder()
        .critical(
            "share",
            ListenerFn::arc("check", move |_ctx: FireContext<String>, p: Arc<String>| {
                let same = Arc::ptr_eq(&p, &seen);
                async move {
                    if same {
                        Ok(())
                    } else {
                        Err(ListenerError::fail("payload was copied"))
                    }
                }
            }),
        )
        .build()
        .unwrap();
    let dispatcher = Dispatcher::builder(registry).build();

    let fired = dispatcher.fire("share", Arc::clone(&payload)).await;
    assert!(fired.success, "{:?}", fired.failures);
}

struct SlowReport(mpsc::UnboundedSender<FailureReport>);

#[async_trait]
impl Report for SlowReport {
    async fn report(&self, report: &FailureReport) {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let _ = self.0.send(report.clone());
    }
}

#[tokio::test]
async fn test_slow_sink_receives_report_of_every_fire() {
    let (tx, mut reports) = mpsc::unbounded_channel();
    let registry = EventMap::<String>::builder()
        .critical("import", succeed("parse"))
        .non_critical("import", fail("thumbnail", "decoder busy"))
        .build()
        .unwrap();
    let dispatcher = Dispatcher::builder(registry)
        .with_reporter(Arc::new(SlowReport(tx)))
        .build();

    for i in 0..5 {
        let fired = dispatcher.fire("import", format!("file-{i}")).await;
        assert!(fired.success);
    }

    for _ in 0..5 {
        let report = recv_within(&mut reports).await;
        assert_eq!(&*report.event, "import");
        assert_eq!(routines(&report.failures), BTreeSet::from(["thumbnail".to_string()]));
    }
}

#[tokio::test]
async fn test_dropped_fire_lets_listeners_finish() {
    let finished = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&finished);
    let slow: ListenerRef<String> = ListenerFn::arc("charge", move |_ctx: FireContext<String>, _p: Arc<String>| {
        let flag = Arc::clone(&flag);
        async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            flag.store(true, Ordering::SeqCst);
            Ok::<_, ListenerError>(())
        }
    });
    let registry = EventMap::<String>::builder()
        .critical("checkout", slow)
        .build()
        .unwrap();
    let dispatcher = Dispatcher::builder(registry).build();

    let abandoned = tokio::time::timeout(
        Duration::from_millis(10),
        dispatcher.fire("checkout", "cart-1".to_string()),
    )
    .await;
    assert!(abandoned.is_err());
    assert!(!finished.load(Ordering::SeqCst));

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(finished.load(Ordering::SeqCst));
}
