//! Order Processing
//!
//! A linear flow with a flaky step, bounded retries, and a recorded trace.
//!
//! Key concepts:
//! - Emitters closing over mutable domain context
//! - RetryLimiter as the error handler
//! - The recording decorator producing an exportable history
//!
//! Run with: cargo run --example order_processing

use statewalk::builder::to;
use statewalk::core::{StateHistory, TransitionError};
use statewalk::decorators::recording;
use statewalk::handlers::RetryLimiter;
use statewalk::{state_enum, MachineBuilder};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

state_enum! {
    enum Order {
        Received,
        Validated,
        Charged,
        Shipped,
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let history = Arc::new(Mutex::new(StateHistory::new()));
    let attempts = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&attempts);
    let mut limiter = RetryLimiter::new(5);

    let mut machine = MachineBuilder::default()
        .with_emitter(Order::Received, to(Order::Validated))
        .with_emitter(Order::Validated, move |state: &Order| {
            // The gateway needs a couple of tries before it answers.
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(TransitionError::failed(state, "payment gateway timeout"))
            } else {
                Ok(Order::Charged)
            }
        })
        .with_emitter(Order::Charged, to(Order::Shipped))
        .with_decorator(recording(Arc::clone(&history)))
        .with_error_handler(move |state: &Order, err| limiter.handle(state, err))
        .build();

    machine.start(Order::Received);

    println!("Final state: {:?}", machine.current());

    let trace = history.lock().unwrap();
    println!(
        "Walked {} transitions in {:?}",
        trace.records().len(),
        trace.duration()
    );
    match trace.to_json() {
        Ok(json) => println!("Trace: {json}"),
        Err(err) => eprintln!("Could not export the trace: {err}"),
    }
}
