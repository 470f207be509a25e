use crate::engine::Engine;
use crate::error::ConfigurationError;
use crate::geometry::{CellSizing, GridDimensions, Shape};

/// Drawn cell size in px.
pub const CELL_SIZE: f64 = 15.0;
/// Tiling pitch in px; one pixel of gap is left for the grid outline.
pub const FULL_CELL_SIZE: f64 = 16.0;

pub const DEFAULT_TARGET_FPS: u32 = 24;
pub const MIN_TARGET_FPS: u32 = 1;
pub const MAX_TARGET_FPS: u32 = 60;

pub const DEFAULT_BORN_RULE: &str = "2";
pub const DEFAULT_SURVIVE_RULE: &str = "34";
pub const DEFAULT_WIDTH: u32 = 64;
pub const DEFAULT_HEIGHT: u32 = 64;
pub const DEFAULT_SHAPE: Shape = Shape::Hexagon;

/// Birth and survival digit sets. Never interpreted here; handed to the
/// engine as typed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleSpec {
    pub born: String,
    pub survive: String,
}

impl RuleSpec {
    pub fn new(born: impl Into<String>, survive: impl Into<String>) -> Self {
        Self {
            born: born.into(),
            survive: survive.into(),
        }
    }
}

impl Default for RuleSpec {
    fn default() -> Self {
        Self::new(DEFAULT_BORN_RULE, DEFAULT_SURVIVE_RULE)
    }
}

/// The user-editable view state.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewConfig {
    pub dimensions: GridDimensions,
    pub rules: RuleSpec,
    pub shape: Shape,
    pub target_fps: u32,
    pub running: bool,
}

impl ViewConfig {
    /// Reads dimensions, rules and shape from the engine as it is at mount.
    pub fn from_engine<E: Engine + ?Sized>(
        engine: &E,
        target_fps: u32,
        running: bool,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            dimensions: GridDimensions::new(engine.width(), engine.height())?,
            rules: RuleSpec::new(engine.born_rules(), engine.survive_rules()),
            shape: engine.cell_form_factor()?,
            target_fps: validate_target_fps(target_fps)?,
            running,
        })
    }

    pub fn loop_params(&self, sizing: CellSizing) -> LoopParams {
        LoopParams {
            dimensions: self.dimensions,
            shape: self.shape,
            sizing,
            target_fps: self.target_fps,
        }
    }
}

/// The subset of the view state the animation loop reads each cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopParams {
    pub dimensions: GridDimensions,
    pub shape: Shape,
    pub sizing: CellSizing,
    pub target_fps: u32,
}

impl LoopParams {
    /// Delay between the end of one cycle and the start of the next.
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.target_fps.max(MIN_TARGET_FPS) as f64)
    }
}

pub fn validate_target_fps(fps: u32) -> Result<u32, ConfigurationError> {
    if !(MIN_TARGET_FPS..=MAX_TARGET_FPS).contains(&fps) {
        return Err(ConfigurationError::InvalidTargetFps(fps));
    }
    Ok(fps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::FakeEngine;

    #[test]
    fn view_config_reads_engine_state() {
        let engine = FakeEngine::new(12, 7, Shape::Triangle);
        let config = ViewConfig::from_engine(&engine, DEFAULT_TARGET_FPS, true).unwrap();
        assert_eq!(config.dimensions.width(), 12);
        assert_eq!(config.dimensions.height(), 7);
        assert_eq!(config.shape, Shape::Triangle);
        assert_eq!(config.rules, RuleSpec::default());
        assert!(config.running);
    }

    #[test]
    fn zero_fps_is_rejected() {
        let engine = FakeEngine::new(4, 4, Shape::Square);
        assert_eq!(
            ViewConfig::from_engine(&engine, 0, true),
            Err(ConfigurationError::InvalidTargetFps(0))
        );
    }

    #[test]
    fn fps_above_sixty_is_rejected() {
        assert_eq!(validate_target_fps(MAX_TARGET_FPS), Ok(MAX_TARGET_FPS));
        assert_eq!(
            validate_target_fps(MAX_TARGET_FPS + 1),
            Err(ConfigurationError::InvalidTargetFps(61))
        );
    }

    #[test]
    fn frame_interval_follows_target_fps() {
        let engine = FakeEngine::new(4, 4, Shape::Square);
        let config = ViewConfig::from_engine(&engine, 25, true).unwrap();
        let params = config.loop_params(CellSizing::default());
        assert_eq!(params.frame_interval().as_millis(), 40);
    }
}
