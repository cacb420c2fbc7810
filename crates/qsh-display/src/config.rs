//! Display configuration.
//!
//! Terminal capabilities that change which control codes the display may
//! emit. They are resolved once and passed to [`Display`](crate::terminal::Display),
//! never queried per cell.

/// Terminal families whose terminfo entries lack ECH (erase characters).
const TERMS_WITHOUT_ECH: &[&str] = &["dumb", "vt52", "vt100", "vt102", "screen"];

/// Capabilities of the terminal receiving the rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Whether `ESC [ n X` (erase N characters) may be used.
    pub has_ech: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { has_ech: true }
    }
}

impl DisplayConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set ECH support.
    pub fn with_ech(mut self, has_ech: bool) -> Self {
        self.has_ech = has_ech;
        self
    }

    /// Resolve capabilities from a terminal name such as `xterm-256color`.
    ///
    /// Variants share their family's capabilities, so `screen.xterm-256color`
    /// and `vt100-am` are both treated as lacking ECH.
    pub fn for_term(term: &str) -> Self {
        let family = term
            .split(['-', '.'])
            .next()
            .unwrap_or(term)
            .to_ascii_lowercase();
        let has_ech = !family.is_empty() && !TERMS_WITHOUT_ECH.contains(&family.as_str());
        Self { has_ech }
    }

    /// Resolve capabilities from `$TERM`, defaulting when it is unset.
    pub fn from_env() -> Self {
        match std::env::var("TERM") {
            Ok(term) => Self::for_term(&term),
            Err(_) => Self::default(),
        }
    }
}
