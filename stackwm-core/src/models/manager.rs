use crate::config::Config;
use crate::errors::{Result, StackError};
use crate::focus_control::FocusControl;
use crate::models::{FocusRegistry, Screen, WindowStore};
use crate::placement::ScreenPlacement;

/// Owns the whole core state: the entity arena, the focus registry and
/// the per-screen focus and placement engines.
pub struct Manager<C> {
    pub config: C,
    pub store: WindowStore,
    pub registry: FocusRegistry,
    pub screens: Vec<Screen>,
    pub controls: Vec<FocusControl>,
    pub placements: Vec<ScreenPlacement>,
}

impl<C> Manager<C>
where
    C: Config,
{
    pub fn new(config: C) -> Self {
        Self {
            config,
            store: WindowStore::new(),
            registry: FocusRegistry::new(),
            screens: Vec::new(),
            controls: Vec::new(),
            placements: Vec::new(),
        }
    }

    pub fn screen(&self, id: usize) -> Result<&Screen> {
        self.screens
            .iter()
            .find(|s| s.id == id)
            .ok_or(StackError::UnknownScreen(id))
    }
}

#[cfg(test)]
impl Manager<crate::config::TestConfig> {
    pub fn new_test() -> Self {
        let mut manager = Self::new(crate::config::TestConfig::default());
        manager.screen_create_handler(Screen::default());
        manager
    }
}
