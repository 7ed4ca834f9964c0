use lottie_data::model::LottieJson;

use crate::animation::Animation;
use crate::assets::Providers;
use crate::config::EngineConfig;
use crate::error::LottieResult;
use crate::render::RenderTree;

/// Playback clock around an [`Animation`]: advances in seconds and loops
/// between the in and out points.
#[derive(Debug, Default)]
pub struct LottiePlayer {
    animation: Option<Animation>,
    current_frame: f32,
    config: EngineConfig,
}

impl LottiePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Builds `document` and rewinds to its in point. The previous
    /// animation, if any, is kept when the build fails.
    pub fn load(&mut self, document: &LottieJson, providers: Providers) -> LottieResult<()> {
        let animation = Animation::new(document, self.config.clone(), providers)?;
        self.current_frame = animation.in_point();
        self.animation = Some(animation);
        Ok(())
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    pub fn animation_mut(&mut self) -> Option<&mut Animation> {
        self.animation.as_mut()
    }

    pub fn current_frame(&self) -> f32 {
        self.current_frame
    }

    /// Moves the clock by `dt` seconds. The clock wraps around `[ip, op)` in
    /// both directions.
    pub fn advance(&mut self, dt: f32) {
        let Some(animation) = &self.animation else {
            return;
        };
        let (ip, op) = (animation.in_point(), animation.out_point());
        let frame = self.current_frame + dt * animation.frame_rate();
        self.current_frame = ip + (frame - ip).rem_euclid(op - ip);
    }

    /// Jumps to `frame`, clamped to the playable range.
    pub fn seek(&mut self, frame: f32) {
        if let Some(animation) = &self.animation {
            self.current_frame = frame.clamp(animation.in_point(), animation.out_point());
        }
    }

    /// Render tree at the current frame; `None` before a document is loaded.
    pub fn render_tree(&mut self) -> Option<RenderTree> {
        let frame = self.current_frame;
        self.animation.as_mut().map(|animation| animation.render(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> LottieJson {
        serde_json::from_str(r#"{"v":"5.7.0","ip":10,"op":70,"fr":30,"w":100,"h":100,"layers":[]}"#).unwrap()
    }

    #[test]
    fn advance_loops_between_in_and_out_points() {
        let mut player = LottiePlayer::new();
        player.load(&document(), Providers::default()).unwrap();
        assert_eq!(player.current_frame(), 10.0);

        player.advance(1.0);
        assert_eq!(player.current_frame(), 40.0);
        player.advance(1.5);
        assert_eq!(player.current_frame(), 25.0);
    }

    #[test]
    fn rewinding_wraps_below_the_in_point() {
        let mut player = LottiePlayer::new();
        player.load(&document(), Providers::default()).unwrap();
        player.advance(-0.5);
        assert_eq!(player.current_frame(), 55.0);
        player.advance(-3.0);
        assert_eq!(player.current_frame(), 25.0);
    }

    #[test]
    fn empty_player_renders_nothing() {
        let mut player = LottiePlayer::new();
        player.advance(1.0);
        assert_eq!(player.current_frame(), 0.0);
        assert!(player.render_tree().is_none());
    }

    #[test]
    fn seek_clamps() {
        let mut player = LottiePlayer::new();
        player.load(&document(), Providers::default()).unwrap();
        player.seek(500.0);
        assert_eq!(player.current_frame(), 70.0);
        let tree = player.render_tree().unwrap();
        assert_eq!(tree.width, 100.0);
    }
}
