use ratatui::Frame;

use crate::{ui::stats::render_stats, App, AppState};

/// A UI Screen boundary
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Guided routine, drawn by the App widget
pub struct GuidedScreen;

impl Screen for GuidedScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

/// Recall drill, drawn by the App widget
pub struct DrillScreen;

impl Screen for DrillScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

pub struct StatsScreen;

impl Screen for StatsScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_stats(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Guided => Box::new(GuidedScreen),
        AppState::Drill => Box::new(DrillScreen),
        AppState::Stats => Box::new(StatsScreen),
    }
}
