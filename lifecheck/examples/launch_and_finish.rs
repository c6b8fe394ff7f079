//! Launch one activity over another, finish it, and verify both lifecycles.
//!
//! A `Script` plays the system under test: it posts callbacks onto a
//! `CallbackSource` with realistic pacing while the main thread waits on the
//! session's tracker and then verifies what was recorded.
//!
//! Run with `RUST_LOG=debug` to see every callback through the `Tracer`.

use std::time::Duration;

use lifecheck::{
    CallbackKind::*, CallbackSource, Config, Result, Scenario, Script, Session, Tracking,
    listeners::{StateMonitor, Tracer},
    transition,
};
use tracing_subscriber::EnvFilter;

const FIRST: &str = "FirstActivity";
const SECOND: &str = "SecondActivity";

fn main() -> Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = Config::default().with_default_timeout(Duration::from_secs(5));
    let source = CallbackSource::new(&config)?;
    source.register(Tracer)?;
    let states = StateMonitor::new();
    source.register(states.clone())?;

    let session = Session::attach(&source, config)?;

    // Launch the first activity.
    let ui = Script::new()
        .emit_all(FIRST, &[PreCreate, Created, Started, Resumed])
        .spawn(source.poster());
    session.wait_and_assert_states([(FIRST, Resumed)]);
    join(ui)?;
    session
        .verifier()
        .assert_scenario(FIRST, &Scenario::LAUNCH, Tracking::Lifecycle);
    session.clear();

    // Launch an opaque activity on top of it.
    let ui = Script::new()
        .emit(FIRST, Paused)
        .pause(Duration::from_millis(20))
        .emit_all(SECOND, &[PreCreate, Created, Started, Resumed])
        .pause(Duration::from_millis(50))
        .emit(FIRST, Stopped)
        .spawn(source.poster());
    session.wait_and_assert_states([(FIRST, Stopped), (SECOND, Resumed)]);
    join(ui)?;
    session
        .verifier()
        .assert_launch_over(SECOND, FIRST, false, Tracking::Lifecycle);
    tracing::info!(state = ?states.state_of(&SECOND.into()), "second activity launched");
    session.clear();

    // Finish the top activity; the first one comes back.
    let ui = Script::new()
        .emit(SECOND, Paused)
        .emit_all(FIRST, &[Restarted, Started, Resumed])
        .pause(Duration::from_millis(50))
        .emit_all(SECOND, &[Stopped, Destroyed])
        .spawn(source.poster());
    session.wait_and_assert_states([(FIRST, Resumed), (SECOND, Destroyed)]);
    join(ui)?;

    let verify = session.verifier();
    verify.assert_scenario(FIRST, &Scenario::STOP_TO_RESUME, Tracking::Lifecycle);
    verify.assert_actor_sequence(SECOND, &[Paused, Stopped, Destroyed], "finish");
    verify.assert_partial_order(
        &[(transition(SECOND, Paused), transition(FIRST, Resumed))],
        "finish",
    );

    tracing::info!(alive = ?states.actors(), "all lifecycle checks passed");
    Ok(())
}

fn join(handle: std::thread::JoinHandle<Result>) -> Result {
    handle.join().unwrap_or_else(|e| std::panic::resume_unwind(e))
}
