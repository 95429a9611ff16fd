//! # Example: Signup fan-out
//!
//! Fires `signup` three times:
//! 1. every listener succeeds;
//! 2. the non-critical email fails: reported, no rollback;
//! 3. the critical account creation fails: rollback runs, fire fails.
//!
//! Run with `RUST_LOG=debug` to see the reporting sink output.

use std::sync::Arc;
use std::time::Duration;

use eventvisor::{
    Dispatcher, EventMap, FireContext, ListenerError, ListenerFn, ListenerRef, RollbackFn,
    RoutineException,
};
use tracing_subscriber::EnvFilter;

fn send_email() -> ListenerRef<String> {
    ListenerFn::arc("sendEmail", |_ctx: FireContext<String>, email: Arc<String>| async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        if email.ends_with("@bounce.test") {
            return Err(ListenerError::fail("smtp rejected recipient"));
        }
        println!("[sendEmail] welcome mail sent to {email}");
        Ok(())
    })
}

fn create_account() -> ListenerRef<String> {
    ListenerFn::arc("createAccount", |ctx: FireContext<String>, email: Arc<String>| async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        if email.starts_with("taken") {
            return Err(ListenerError::fail(format!("{email} already registered")));
        }
        let id = email.len() as u64 * 1000;
        ctx.add_output("createAccount", id)?;
        println!("[createAccount] account {id} created");
        Ok::<_, ListenerError>(())
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let registry = EventMap::<String>::builder()
        .non_critical("signup", send_email())
        .critical("signup", create_account())
        .rollback(
            "signup",
            RollbackFn::arc(|email: Arc<String>, critical: Vec<RoutineException>| async move {
                println!("[undoSignup] {email}: {} critical failure(s)", critical.len());
                for ex in critical {
                    println!("[undoSignup]   {ex}");
                }
            }),
        )
        .build()?;

    let dispatcher = Dispatcher::builder(registry).build();

    for email in ["ada@example.com", "bob@bounce.test", "taken@example.com"] {
        let fired = dispatcher.fire("signup", email.to_string()).await;
        println!(
            "signup({email}) -> success={} output={:?} failures={}\n",
            fired.success,
            fired.output.keys(),
            fired.failures.len()
        );
    }

    // let the reporting sink flush before exit
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
