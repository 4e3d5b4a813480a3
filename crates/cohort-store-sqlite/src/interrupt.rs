//! Interrupting an in-flight search when its caller goes away.
//!
//! Statements run on the connection's own thread, so dropping the future that
//! awaits them does not stop them. A [`QueryGuard`] lives in the awaiting
//! future and a [`QueryTicket`] travels with the closure. If the guard is
//! dropped while the closure is running, the statement is interrupted; if it
//! is dropped while the closure is still queued, the closure skips its work.
//!
//! The connection is shared, so the interrupt is only ever issued while this
//! search's own closure holds it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rusqlite::InterruptHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
  Queued,
  Running,
  Finished,
  Cancelled,
}

struct Shared {
  phase:     Mutex<Phase>,
  interrupt: Arc<InterruptHandle>,
}

impl Shared {
  fn phase(&self) -> MutexGuard<'_, Phase> {
    self.phase.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

/// Held by the awaiting side. Interrupts the statement on drop unless
/// [`disarm`](Self::disarm)ed.
pub struct QueryGuard {
  shared: Arc<Shared>,
  armed:  bool,
}

/// Moved into the connection closure.
pub struct QueryTicket {
  shared: Arc<Shared>,
}

/// Marks the closure finished when dropped, on every exit path.
pub struct Running<'a> {
  shared: &'a Shared,
}

impl QueryGuard {
  pub fn new(interrupt: Arc<InterruptHandle>) -> (Self, QueryTicket) {
    let shared = Arc::new(Shared { phase: Mutex::new(Phase::Queued), interrupt });
    let ticket = QueryTicket { shared: Arc::clone(&shared) };
    (Self { shared, armed: true }, ticket)
  }

  /// The search completed normally; nothing to interrupt.
  pub fn disarm(mut self) { self.armed = false; }
}

impl Drop for QueryGuard {
  fn drop(&mut self) {
    if !self.armed {
      return;
    }
    let mut phase = self.shared.phase();
    match *phase {
      Phase::Running => {
        tracing::debug!("search dropped mid-flight, interrupting statement");
        self.shared.interrupt.interrupt();
        *phase = Phase::Cancelled;
      }
      Phase::Queued => *phase = Phase::Cancelled,
      Phase::Finished | Phase::Cancelled => {}
    }
  }
}

impl QueryTicket {
  /// Enter the running phase. Returns `None` if the search was cancelled
  /// before the closure was scheduled.
  pub fn start(&self) -> Option<Running<'_>> {
    let mut phase = self.shared.phase();
    if *phase == Phase::Cancelled {
      return None;
    }
    *phase = Phase::Running;
    Some(Running { shared: &self.shared })
  }
}

impl Running<'_> {
  /// `true` once the awaiting side has gone away. Checked between statements,
  /// since an interrupt only reaches statements already running.
  pub fn cancelled(&self) -> bool { *self.shared.phase() == Phase::Cancelled }
}

impl Drop for Running<'_> {
  fn drop(&mut self) {
    let mut phase = self.shared.phase();
    if *phase == Phase::Running {
      *phase = Phase::Finished;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn handle() -> Arc<InterruptHandle> {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    Arc::new(conn.get_interrupt_handle())
  }

  #[test]
  fn queued_search_is_skipped_after_drop() {
    let (guard, ticket) = QueryGuard::new(handle());
    drop(guard);
    assert!(ticket.start().is_none());
  }

  #[test]
  fn finished_search_is_not_interrupted() {
    let (guard, ticket) = QueryGuard::new(handle());
    {
      let _running = ticket.start().unwrap();
    }
    assert_eq!(*ticket.shared.phase(), Phase::Finished);
    drop(guard);
    assert_eq!(*ticket.shared.phase(), Phase::Finished);
  }

  #[test]
  fn running_search_is_cancelled_on_drop() {
    let (guard, ticket) = QueryGuard::new(handle());
    let running = ticket.start().unwrap();
    drop(guard);
    assert!(running.cancelled());
    drop(running);
    assert_eq!(*ticket.shared.phase(), Phase::Cancelled);
  }

  #[test]
  fn disarmed_guard_leaves_phase_alone() {
    let (guard, ticket) = QueryGuard::new(handle());
    let running = ticket.start().unwrap();
    guard.disarm();
    assert_eq!(*ticket.shared.phase(), Phase::Running);
    drop(running);
    assert_eq!(*ticket.shared.phase(), Phase::Finished);
  }
}
