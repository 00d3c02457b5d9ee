// Scripted input for running both peers unattended.

use crate::domain::Position;
use crate::domain::tuning::Tuning;
use crate::use_cases::{CharacterCommand, Role};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// A command and the delay before it is issued.
pub type Step = (Duration, CharacterCommand);

/// Plays an opening once, then repeats a cycle until the match stops listening.
#[derive(Debug, Clone)]
pub struct Autopilot {
    opening: Vec<Step>,
    cycle: Vec<Step>,
}

impl Autopilot {
    pub fn new(opening: Vec<Step>, cycle: Vec<Step>) -> Self {
        Self { opening, cycle }
    }

    /// Backs into the nearest wall, drops to the floor, then fires along the floor
    /// at the opponent's spawn side. The host fires faster so local duels finish.
    pub fn duelist(role: Role, tuning: &Tuning) -> Self {
        let canvas = tuning.map.canvas;
        let character = tuning.character.size;
        let floor_line = canvas.height
            - tuning.map.bottom_visible_boundary_offset
            - character.height / 2.0;

        let (retreat, stop, target_x, fire_every) = match role {
            Role::Host => (
                CharacterCommand::StartMoveLeft,
                CharacterCommand::StopMoveLeft,
                canvas.width - character.width / 2.0,
                Duration::from_millis(250),
            ),
            Role::Guest => (
                CharacterCommand::StartMoveRight,
                CharacterCommand::StopMoveRight,
                character.width / 2.0,
                Duration::from_millis(600),
            ),
        };

        Self::new(
            vec![
                (Duration::from_millis(300), retreat),
                (Duration::from_millis(300), stop),
            ],
            vec![(
                fire_every,
                CharacterCommand::ShootAt(Position::new(target_x, floor_line)),
            )],
        )
        .with_delay(Duration::from_millis(900))
    }

    /// Extra wait before the first opening step.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        if let Some(first) = self.opening.first_mut() {
            first.0 += delay;
        }
        self
    }

    /// Runs until the receiving side is dropped.
    pub async fn run(self, tx: mpsc::Sender<CharacterCommand>) {
        for (delay, command) in self.opening {
            tokio::time::sleep(delay).await;
            if tx.send(command).await.is_err() {
                return;
            }
        }

        if self.cycle.is_empty() {
            return;
        }

        loop {
            for &(delay, command) in &self.cycle {
                tokio::time::sleep(delay).await;
                if tx.send(command).await.is_err() {
                    debug!("match stopped listening; autopilot done");
                    return;
                }
            }
        }
    }
}
