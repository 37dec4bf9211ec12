//! Renderers: pure projections from a simulation's state and counters to
//! a per-widget view.
//!
//! Views implement `Display` for terminal output and `Serialize` for JSON
//! frames. Rendering never mutates the simulation, so rendering the same
//! instance twice yields equal views.

use crate::core::State;
use crate::machine::{Simulation, StateOf, Widget};
use serde::Serialize;
use std::fmt::{self, Debug, Display};

/// A widget that can draw itself.
pub trait Render: Widget {
    type View: Clone + Debug + PartialEq + Serialize + Display;

    /// Project `(state, counters)` to a view (pure).
    fn render(&self, state: &StateOf<Self>, counters: &Self::Counters) -> Self::View;
}

/// One rendered step, ready to print or serialize.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame<V> {
    pub tick: u64,
    pub state: String,
    pub running: bool,
    pub view: V,
}

impl<V: Display> Display for Frame<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>4}] {:<12} {}", self.tick, self.state, self.view)
    }
}

impl<W: Render> Simulation<W> {
    /// Render the current state and counters.
    pub fn render(&self) -> W::View {
        self.widget().render(self.current_state(), self.counters())
    }

    /// Render with the tick count and state name attached.
    pub fn frame(&self) -> Frame<W::View> {
        Frame {
            tick: self.ticks(),
            state: self.current_state().name().to_string(),
            running: self.is_running(),
            view: self.render(),
        }
    }
}

/// Lamp glyph for a boolean level.
pub(crate) fn lamp(on: bool) -> char {
    if on {
        '●'
    } else {
        '○'
    }
}

/// Bits as a `0`/`1` string, most significant first.
pub(crate) fn bit_string(bits: &[bool]) -> String {
    bits.iter().map(|b| if *b { '1' } else { '0' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lamp_glyphs() {
        assert_eq!(lamp(true), '●');
        assert_eq!(lamp(false), '○');
    }

    #[test]
    fn bits_render_in_order() {
        assert_eq!(bit_string(&[true, false, true, true]), "1011");
        assert_eq!(bit_string(&[]), "");
    }

    #[test]
    fn frame_display_includes_tick_and_state() {
        let frame = Frame {
            tick: 7,
            state: "Got10".to_string(),
            running: true,
            view: "tape",
        };

        let text = frame.to_string();
        assert!(text.contains("7"));
        assert!(text.contains("Got10"));
        assert!(text.ends_with("tape"));
    }
}
