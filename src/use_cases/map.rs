// Host-side arena generation.

use crate::domain::tuning::{CharacterTuning, MapTuning, Tuning};
use crate::domain::{Authority, Entity, EntityKind, ObstacleVariant, Position, Size};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generates the starting roster. The same seed always yields the same layout.
pub struct GameMap {
    map: MapTuning,
    character: CharacterTuning,
    rng: ChaCha8Rng,
}

impl GameMap {
    pub fn new(tuning: &Tuning, seed: u64) -> Self {
        Self {
            map: tuning.map,
            character: tuning.character,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Background, walls, both characters, random obstacles, then the light.
    /// Host-owned entities are local; the opponent's character is remote.
    pub fn generate(&mut self) -> Vec<Entity> {
        let canvas = self.map.canvas;
        let mut entities = vec![Entity::new(
            EntityKind::Background,
            Position::new(0.0, 0.0),
            Authority::Local,
        )];

        entities.extend(self.boundaries());

        entities.push(Entity::new(
            EntityKind::Character,
            Position::new(20.0, 20.0),
            Authority::Local,
        ));
        entities.push(Entity::new(
            EntityKind::Character,
            Position::new(canvas.width - self.character.size.width, 0.0),
            Authority::Remote,
        ));

        entities.extend(self.obstacles());

        entities.push(Entity::new(
            EntityKind::PointLight,
            Position::new(canvas.width / 2.0, 0.0),
            Authority::Local,
        ));

        entities
    }

    fn boundaries(&self) -> Vec<Entity> {
        let canvas = self.map.canvas;
        let thickness = self.map.boundary_size;
        let hidden = self.map.hidden_boundary_offset;
        let wall = |x: f32, y: f32, width: f32, height: f32| {
            Entity::new(
                EntityKind::Boundary {
                    size: Size::new(width, height),
                },
                Position::new(x, y),
                Authority::Local,
            )
        };

        vec![
            // ceiling
            wall(0.0, -hidden, canvas.width, thickness),
            // floor
            wall(
                0.0,
                canvas.height - self.map.bottom_visible_boundary_offset,
                canvas.width,
                thickness,
            ),
            wall(-hidden, 0.0, thickness, canvas.height),
            wall(canvas.width, 0.0, thickness, canvas.height),
        ]
    }

    fn obstacles(&mut self) -> Vec<Entity> {
        let canvas = self.map.canvas;
        let (min_count, max_count) = self.map.obstacle_count;
        let count = self.rng.random_range(min_count..=max_count);

        (0..count)
            .map(|counter| {
                let (min_width, max_width) = self.map.obstacle_width;
                let (min_height, max_height) = self.map.obstacle_height;
                let width = self.rng.random_range(min_width..=max_width);
                let height = self.rng.random_range(min_height..=max_height);

                let x_bound = self.map.obstacle_spawn_x_bound;
                let x = self
                    .rng
                    .random_range(x_bound..=canvas.width - x_bound - width);

                // Spread obstacles top to bottom, away from ceiling and floor.
                let y_bound = self.map.obstacle_spawn_y_bound;
                let y = (counter as f32 / count as f32 * canvas.height)
                    .max(y_bound)
                    .min(canvas.height - y_bound - height);

                let variant = if self.rng.random_bool(self.map.unstable_obstacle_chance) {
                    ObstacleVariant::Unstable
                } else {
                    ObstacleVariant::Default
                };

                Entity::new(
                    EntityKind::Obstacle {
                        variant,
                        size: Size::new(width, height),
                    },
                    Position::new(x, y),
                    Authority::Local,
                )
            })
            .collect()
    }
}
