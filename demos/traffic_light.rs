//! Traffic Light
//!
//! A cyclic machine stopped from the outside.
//!
//! Key concepts:
//! - Cyclic transitions (no terminal state of its own)
//! - The cancellation decorator as the caller-side stop signal
//! - The logging decorator writing through tracing
//!
//! Run with: cargo run --example traffic_light

use statewalk::decorators::{cancellation, logging};
use statewalk::{state_enum, MachineBuilder};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

state_enum! {
    enum Light {
        Red,
        Green,
        Yellow,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let flag = Arc::new(AtomicBool::new(false));
    let ticks = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&ticks);
    let stopper = Arc::clone(&flag);

    let mut machine = MachineBuilder::default()
        .with_emitter(Light::Red, |_: &Light| Ok(Light::Green))
        .with_emitter(Light::Green, |_: &Light| Ok(Light::Yellow))
        .with_emitter(Light::Yellow, move |_: &Light| {
            if counter.fetch_add(1, Ordering::SeqCst) + 1 == 5 {
                stopper.store(true, Ordering::Relaxed);
            }
            Ok(Light::Red)
        })
        .with_decorator(logging())
        .with_decorator(cancellation(Arc::clone(&flag)))
        .with_error_handler(|_: &Light, err| Err(err))
        .build();

    println!("Running the light for five full cycles...");
    machine.start(Light::Red);

    println!(
        "Stopped after {} cycles at {:?}",
        ticks.load(Ordering::SeqCst),
        machine.current()
    );
}
