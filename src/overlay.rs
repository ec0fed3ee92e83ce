/// Which detail chart, if any, is enlarged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FullscreenState {
    #[default]
    Normal,
    DeathsFullscreen,
    VaccinationFullscreen,
}

impl FullscreenState {
    /// Enlarge `target`, or return to normal when it is already enlarged.
    /// Any other enlarged panel is restored first.
    pub fn toggle(self, target: FullscreenState) -> FullscreenState {
        if target == FullscreenState::Normal || self == target {
            FullscreenState::Normal
        } else {
            target
        }
    }

    pub fn escape(self) -> FullscreenState {
        FullscreenState::Normal
    }
}
