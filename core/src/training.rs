//! Training center queue.
//!
//! Ticket lifecycle: queued (turns_left > 0) → ready (turns_left == 0)
//! → consumed. Every queued ticket counts down once per turn; tickets
//! that reach zero leave the queue in FIFO order and become robots.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::{
    city::City,
    robot::RobotKind,
    types::{Cost, Turn},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainingTicket {
    pub kind:       RobotKind,
    pub turns_left: Turn,
}

impl TrainingTicket {
    pub fn new(kind: RobotKind) -> Self {
        Self {
            kind,
            turns_left: kind.profile().training_turns,
        }
    }
}

/// State owned by the training center building.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingCenter {
    /// Per-ticket price, whatever the robot kind.
    pub cost:  Cost,
    queue:     VecDeque<TrainingTicket>,
}

impl TrainingCenter {
    pub fn new(cost: Cost) -> Self {
        Self {
            cost,
            queue: VecDeque::new(),
        }
    }

    /// Enqueue a ticket. Payment is the caller's job.
    pub fn enqueue(&mut self, kind: RobotKind) {
        self.queue.push_back(TrainingTicket::new(kind));
    }

    pub fn queue(&self) -> impl Iterator<Item = &TrainingTicket> {
        self.queue.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Count every ticket down by one turn and pop the finished ones.
    /// Returned kinds keep queue order.
    pub fn advance(&mut self) -> Vec<RobotKind> {
        let mut ready = Vec::new();
        for ticket in self.queue.iter_mut() {
            ticket.turns_left = ticket.turns_left.saturating_sub(1);
            if ticket.turns_left == 0 {
                ready.push(ticket.kind);
            }
        }
        self.queue.retain(|t| t.turns_left > 0);
        ready
    }
}

/// Pay the center's fee and queue a ticket. False if the city has no
/// training center or cannot afford the fee; nothing is charged then.
pub fn start_training(city: &mut City, kind: RobotKind) -> bool {
    let Some(cost) = city.training_center().map(|c| c.cost) else {
        log::warn!("no training center; cannot train {}", kind.label());
        return false;
    };
    if !city.spend(cost) {
        log::warn!(
            "cannot afford {} training: need {:.2} money and {} parts",
            kind.label(),
            cost.money,
            cost.parts
        );
        return false;
    }
    if let Some(center) = city.training_center_mut() {
        center.enqueue(kind);
    }
    true
}
