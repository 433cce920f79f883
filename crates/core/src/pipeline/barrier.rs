//! Ticket barrier that releases requests strictly in submission order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use super::error::BarrierError;
use super::types::Ticket;

/// Hands out tickets and lets each one run only after all earlier tickets
/// have completed.
///
/// `completed_through` lives in a watch channel: `advance` publishes the new
/// value and every waiter re-checks its own condition, so no waiter polls.
/// There is no timeout; a ticket that never completes blocks all later ones.
#[derive(Debug)]
pub struct TicketBarrier {
    next_ticket: AtomicU64,
    completed: watch::Sender<Ticket>,
}

impl Default for TicketBarrier {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketBarrier {
    /// Creates a barrier whose first ticket is 1.
    pub fn new() -> Self {
        let (completed, _) = watch::channel(0);
        Self {
            next_ticket: AtomicU64::new(1),
            completed,
        }
    }

    /// Hands out the next ticket. Never blocks.
    pub fn submit(&self) -> Ticket {
        self.next_ticket.fetch_add(1, Ordering::SeqCst)
    }

    /// Number of tickets handed out so far.
    pub fn issued(&self) -> u64 {
        self.next_ticket.load(Ordering::SeqCst) - 1
    }

    /// Highest ticket whose execution has fully finished.
    pub fn completed_through(&self) -> Ticket {
        *self.completed.borrow()
    }

    /// Waits until every ticket before `ticket` has completed.
    ///
    /// The returned `Turn` advances the barrier when it is completed or
    /// dropped, so the caller cannot forget to release it.
    pub async fn await_turn(self: &Arc<Self>, ticket: Ticket) -> Result<Turn, BarrierError> {
        if ticket == 0 || ticket > self.issued() {
            return Err(BarrierError::UnknownTicket { ticket });
        }

        let mut rx = self.completed.subscribe();
        let completed_through = {
            let done = rx
                .wait_for(|done| *done + 1 >= ticket)
                .await
                .map_err(|_| BarrierError::Closed)?;
            *done
        };

        if completed_through >= ticket {
            return Err(BarrierError::AlreadyCompleted {
                ticket,
                completed_through,
            });
        }

        Ok(Turn {
            barrier: Arc::clone(self),
            ticket,
            released: false,
        })
    }

    /// Marks `ticket` complete. Only `completed_through + 1` may advance.
    pub fn advance(&self, ticket: Ticket) -> Result<(), BarrierError> {
        let mut result = Ok(());
        self.completed.send_if_modified(|done| {
            if *done + 1 == ticket {
                *done = ticket;
                true
            } else {
                let completed_through = *done;
                result = Err(if ticket <= completed_through {
                    BarrierError::AlreadyCompleted {
                        ticket,
                        completed_through,
                    }
                } else {
                    BarrierError::OutOfTurn {
                        ticket,
                        completed_through,
                    }
                });
                false
            }
        });
        result
    }
}

/// Exclusive right to execute one ticket.
///
/// Dropping the turn advances the barrier, including on early returns and
/// panics.
#[derive(Debug)]
#[must_use = "dropping a Turn releases it immediately"]
pub struct Turn {
    barrier: Arc<TicketBarrier>,
    ticket: Ticket,
    released: bool,
}

impl Turn {
    /// The ticket this turn belongs to.
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// Releases the turn, letting the next ticket run.
    pub fn complete(mut self) -> Result<(), BarrierError> {
        self.released = true;
        self.barrier.advance(self.ticket)
    }
}

impl Drop for Turn {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = self.barrier.advance(self.ticket) {
            tracing::warn!(ticket = self.ticket, error = %e, "Failed to release turn");
        }
    }
}
