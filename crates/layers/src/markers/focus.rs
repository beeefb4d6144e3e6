use scene::PinId;
use tracing::debug;

/// Two-step pin interaction: the first click focuses, a second click on the
/// same pin selects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FocusState {
    #[default]
    Idle,
    Focused(PinId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Move the camera to the pin; the pin is now focused.
    FlyTo(PinId),
    /// Report the pin to the hosting view.
    Select(PinId),
}

impl FocusState {
    pub fn focused(&self) -> Option<&PinId> {
        match self {
            FocusState::Idle => None,
            FocusState::Focused(id) => Some(id),
        }
    }

    pub fn click(&mut self, pin: &PinId) -> ClickOutcome {
        if self.focused() == Some(pin) {
            debug!(%pin, "focused pin clicked again; selecting");
            return ClickOutcome::Select(pin.clone());
        }
        debug!(%pin, "focusing pin");
        *self = FocusState::Focused(pin.clone());
        ClickOutcome::FlyTo(pin.clone())
    }

    /// The user took over the camera (pan or zoom gesture).
    pub fn disengage(&mut self) {
        if let FocusState::Focused(pin) = std::mem::take(self) {
            debug!(%pin, "focus cleared by map gesture");
        }
    }
}
