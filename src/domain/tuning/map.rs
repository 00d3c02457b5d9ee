use crate::domain::geometry::Size;

/// Arena layout tuning used by the map generator and the world limits.

#[derive(Debug, Clone, Copy)]
pub struct MapTuning {
    /// Visible arena size in pixels.
    pub canvas: Size,

    /// Thickness of the arena walls.
    pub boundary_size: f32,

    /// How far the hidden walls sit outside the canvas.
    pub hidden_boundary_offset: f32,

    /// How much of the floor stays visible above the bottom edge.
    pub bottom_visible_boundary_offset: f32,

    /// Inclusive range for the number of generated obstacles.
    pub obstacle_count: (u32, u32),

    /// Inclusive range for generated obstacle widths.
    pub obstacle_width: (f32, f32),

    /// Inclusive range for generated obstacle heights.
    pub obstacle_height: (f32, f32),

    /// Obstacle size when a create packet carries none.
    pub default_obstacle_size: Size,

    /// Keep generated obstacles this far from the side walls.
    pub obstacle_spawn_x_bound: f32,

    /// Keep generated obstacles this far from the top and bottom.
    pub obstacle_spawn_y_bound: f32,

    /// Probability that a generated obstacle is the unstable variant.
    pub unstable_obstacle_chance: f64,

    /// Extra room around the canvas before a move counts as leaving the world.
    pub world_margin: f32,
}

impl Default for MapTuning {
    fn default() -> Self {
        Self {
            canvas: Size::new(1900.0, 950.0),
            boundary_size: 80.0,
            hidden_boundary_offset: 80.0,
            bottom_visible_boundary_offset: 15.0,
            obstacle_count: (4, 6),
            obstacle_width: (300.0, 430.0),
            obstacle_height: (28.0, 46.0),
            default_obstacle_size: Size::new(300.0, 32.0),
            obstacle_spawn_x_bound: 130.0,
            obstacle_spawn_y_bound: 100.0,
            unstable_obstacle_chance: 0.2,
            world_margin: 200.0,
        }
    }
}
