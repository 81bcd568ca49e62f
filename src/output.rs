//! Console decoration for status lines
//!
//! Status lines are decorated (emoji markers, colored labels) only when the
//! console can show it. `--color=always|never` overrides the detection;
//! otherwise `NO_COLOR` turns decoration off and `console` decides from the
//! terminal, `CLICOLOR` and `CLICOLOR_FORCE`.

use console::Style;

/// Whether status lines are decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    decorated: bool,
}

impl OutputConfig {
    /// `when` is the value of `--color`; unknown values behave like `auto`.
    pub fn from_env_and_flag(when: &str) -> Self {
        let decorated = if when.eq_ignore_ascii_case("always") {
            true
        } else if when.eq_ignore_ascii_case("never") {
            false
        } else {
            std::env::var_os("NO_COLOR").is_none() && console::colors_enabled()
        };
        Self { decorated }
    }

    pub fn plain() -> Self {
        Self { decorated: false }
    }

    #[cfg(test)]
    pub fn decorated() -> Self {
        Self { decorated: true }
    }

    /// Emoji marker when decorated, bracketed text otherwise.
    pub fn marker<'a>(&self, emoji: &'a str, text: &'a str) -> &'a str {
        if self.decorated {
            emoji
        } else {
            text
        }
    }

    /// `style` with its colors pinned on or off, regardless of what
    /// `console` would pick for stdout.
    pub fn style(&self, style: Style) -> Style {
        style.force_styling(self.decorated)
    }
}
