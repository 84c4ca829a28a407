use bevy_ecs::prelude::Resource;

/// Anything that can report elapsed seconds.
pub trait Clock {
    fn elapsed(&self) -> f32;
}

#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl Clock for WorldTime {
    fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
