//! Input events dispatched to the host.
//!
//! touchbridge reports touch activity as small, device-agnostic deltas:
//! absolute axis positions while a contact is down, and button edges when a
//! contact lands or lifts. Every event is tagged with the multi-touch slot
//! (finger index) it belongs to.
//!
//! ## Value conventions
//! - **Axes:** raw absolute device coordinates, as reported by the panel.
//!   No scaling or calibration is applied at this layer.
//! - **Buttons:** a touch panel exposes a single logical button
//!   ([`Button::Left`]); press/release edges follow contact down/up.
//! - **`buttons` on motion events:** the mask of buttons held while the
//!   axis moved. For a touch panel this is always [`Buttons::LEFT`], since
//!   motion is only reported while a contact is down.

use bitflags::bitflags;

/// An absolute axis reported by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
}

/// A logical button reported by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Button {
    Left,
}

bitflags! {
    /// Mask of buttons currently held.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Buttons: u32 {
        const LEFT = 1 << 0;
    }
}

/// Per-slot input change dispatched to the host sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// An absolute axis changed while at least one button was held.
    AxisMoved {
        axis: Axis,
        /// New absolute position on `axis`.
        value: i32,
        /// Buttons held at the time of the motion.
        buttons: Buttons,
        /// Multi-touch slot the contact is tracked in.
        slot: usize,
    },

    /// A contact landed in `slot`.
    ButtonPressed { button: Button, slot: usize },

    /// A contact lifted from `slot`.
    ButtonReleased { button: Button, slot: usize },
}

impl InputEvent {
    /// The multi-touch slot this event is tagged with.
    pub fn slot(&self) -> usize {
        match *self {
            InputEvent::AxisMoved { slot, .. }
            | InputEvent::ButtonPressed { slot, .. }
            | InputEvent::ButtonReleased { slot, .. } => slot,
        }
    }

    /// `true` for press/release edges, `false` for motion.
    pub fn is_button_edge(&self) -> bool {
        matches!(
            self,
            InputEvent::ButtonPressed { .. } | InputEvent::ButtonReleased { .. }
        )
    }
}
