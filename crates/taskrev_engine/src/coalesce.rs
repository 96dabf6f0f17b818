//! Single-flight coalescing.
//!
//! At most one closure runs at a time; callers that arrive while one is
//! in flight block until it completes and receive a clone of its
//! result instead of starting their own run.

use parking_lot::{Condvar, Mutex};

#[derive(Debug)]
struct FlightState<T> {
    in_progress: bool,
    // Completed-run counter; waiters watch it advance.
    generation: u64,
    last: Option<T>,
}

#[derive(Debug)]
pub(crate) struct SingleFlight<T: Clone> {
    state: Mutex<FlightState<T>>,
    done: Condvar,
}

impl<T: Clone> SingleFlight<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(FlightState {
                in_progress: false,
                generation: 0,
                last: None,
            }),
            done: Condvar::new(),
        }
    }

    /// Runs `f` as the flight leader, or waits for the in-flight run
    /// and returns its result. The boolean is true when the caller
    /// joined an existing flight.
    pub(crate) fn run<F>(&self, f: F) -> (T, bool)
    where
        F: FnOnce() -> T,
    {
        let mut state = self.state.lock();
        if state.in_progress {
            let target = state.generation + 1;
            while state.generation < target {
                self.done.wait(&mut state);
            }
            let result = state
                .last
                .clone()
                .expect("a completed flight always stores its result");
            return (result, true);
        }

        state.in_progress = true;
        drop(state);

        let result = f();

        let mut state = self.state.lock();
        state.in_progress = false;
        state.generation += 1;
        state.last = Some(result.clone());
        self.done.notify_all();
        (result, false)
    }
}
