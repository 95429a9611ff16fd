//! # Example: Activity logging
//!
//! Attaches the built-in `LogWriter` and a custom counting subscriber, then
//! fires an event whose listeners fail in different ways.
//!
//! ```text
//! cargo run --example log_subscriber --features logging
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use eventvisor::{
    Activity, ActivityKind, Dispatcher, EventMap, FireContext, ListenerError, ListenerFn,
    LogWriter, NoopReport, Subscribe,
};
use tracing_subscriber::EnvFilter;

#[derive(Default)]
struct FailureCounter {
    failed: AtomicUsize,
}

#[async_trait]
impl Subscribe for FailureCounter {
    async fn on_activity(&self, a: &Activity) {
        if a.kind == ActivityKind::ListenerFailed {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn name(&self) -> &'static str {
        "failure-counter"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let counter = Arc::new(FailureCounter::default());
    let mut subs: Vec<Arc<dyn Subscribe>> = Vec::new();
    subs.push(Arc::new(LogWriter::new()));
    subs.push(counter.clone());

    let registry = EventMap::<u32>::builder()
        .critical("import", ListenerFn::arc("parse", |ctx: FireContext<u32>, rows: Arc<u32>| async move {
            ctx.add_output("rows", *rows)?;
            Ok::<_, ListenerError>(())
        }))
        .non_critical("import", ListenerFn::arc("thumbnail", |_ctx: FireContext<u32>, _rows: Arc<u32>| async move {
            Err::<(), _>(ListenerError::fail("image service unavailable"))
        }))
        .non_critical("import", ListenerFn::arc("index", |_ctx: FireContext<u32>, rows: Arc<u32>| async move {
            if *rows > 100 {
                panic!("index shard full at {rows} rows");
            }
            Ok::<_, ListenerError>(())
        }))
        .build()?;

    let dispatcher = Dispatcher::builder(registry)
        .with_subscribers(subs)
        .with_reporter(Arc::new(NoopReport))
        .build();

    for rows in [10_u32, 500] {
        let fired = dispatcher.fire("import", rows).await;
        println!("import({rows}) -> success={} failures={}", fired.success, fired.failures.len());
    }

    tokio::time::sleep(Duration::from_millis(50)).await;
    println!("listener failures observed: {}", counter.failed.load(Ordering::Relaxed));
    Ok(())
}
