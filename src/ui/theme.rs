use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Styles for the kinds of lines the CLI prints about records
#[derive(Debug, Clone)]
pub struct Theme {
    /// Search banners
    pub banner: Style,
    /// Saved records and a freshly initialized store
    pub saved: Style,
    /// Failure events from the engine
    pub failure: Style,
    /// Empty results
    pub notice: Style,
    /// Connection lifecycle lines
    pub lifecycle: Style,
    pub label: Style,
}

impl Theme {
    /// Colors only when stdout is a terminal and `NO_COLOR` is unset
    pub fn detect() -> Self {
        if std::env::var_os("NO_COLOR").is_some() || !console::Term::stdout().is_term() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            banner: Style::new().cyan().bold(),
            saved: Style::new().green().bold(),
            failure: Style::new().red().bold(),
            notice: Style::new().yellow(),
            lifecycle: Style::new().blue(),
            label: Style::new().white().dimmed(),
        }
    }

    pub fn plain() -> Self {
        let none = Style::new();
        Self {
            banner: none.clone(),
            saved: none.clone(),
            failure: none.clone(),
            notice: none.clone(),
            lifecycle: none.clone(),
            label: none,
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
