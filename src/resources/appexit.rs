use bevy_ecs::prelude::Resource;

/// Set by demo systems to leave the main loop at the end of the frame.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AppExit(pub bool);

impl AppExit {
    pub fn request(&mut self) {
        if !self.0 {
            log::info!("Exit requested");
        }
        self.0 = true;
    }

    pub fn is_requested(&self) -> bool {
        self.0
    }
}
