use ratatui::style::Color;

/// Editor palette. Names follow the code editor's built-in schemes, so a
/// config written for the web editor (`vs-light`, `vs-dark`, `hc-black`)
/// still picks the matching colors.
#[derive(Clone)]
pub struct Theme {
    pub name: &'static str,
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub muted: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub border: Color,
    /// Background of the active file tab.
    pub tab_active: Color,
    /// Background of the line under the cursor.
    pub cursor_line: Color,
    pub console_fg: Color,
}

const THEMES: &[(&str, &[&str], fn() -> Theme)] = &[
    ("dark", &["vs-dark"], Theme::dark),
    ("light", &["vs-light", "vs"], Theme::light),
    ("high-contrast", &["hc-black", "hc"], Theme::high_contrast),
];

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            bg: Color::Rgb(30, 30, 30),
            fg: Color::Rgb(212, 212, 212),
            accent: Color::Rgb(86, 156, 214),
            muted: Color::Rgb(128, 128, 128),
            success: Color::Rgb(106, 153, 85),
            error: Color::Rgb(244, 71, 71),
            warning: Color::Rgb(220, 220, 170),
            border: Color::Rgb(64, 64, 64),
            tab_active: Color::Rgb(45, 45, 45),
            cursor_line: Color::Rgb(40, 40, 40),
            console_fg: Color::Rgb(190, 190, 190),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            bg: Color::Rgb(255, 255, 255),
            fg: Color::Rgb(0, 0, 0),
            accent: Color::Rgb(0, 0, 255),
            muted: Color::Rgb(110, 118, 129),
            success: Color::Rgb(0, 128, 0),
            error: Color::Rgb(205, 49, 49),
            warning: Color::Rgb(121, 94, 38),
            border: Color::Rgb(212, 212, 212),
            tab_active: Color::Rgb(236, 236, 236),
            cursor_line: Color::Rgb(245, 245, 245),
            console_fg: Color::Rgb(51, 51, 51),
        }
    }

    pub fn high_contrast() -> Self {
        Self {
            name: "high-contrast",
            bg: Color::Black,
            fg: Color::White,
            accent: Color::Rgb(156, 220, 254),
            muted: Color::Rgb(200, 200, 200),
            success: Color::Rgb(137, 209, 133),
            error: Color::Rgb(255, 80, 80),
            warning: Color::Rgb(255, 215, 0),
            border: Color::Rgb(111, 195, 223),
            tab_active: Color::Rgb(0, 0, 0),
            cursor_line: Color::Rgb(20, 20, 20),
            console_fg: Color::White,
        }
    }

    /// Look up by name or alias. Unknown names fall back to `dark`.
    pub fn by_name(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        THEMES
            .iter()
            .find(|(n, aliases, _)| *n == name || aliases.contains(&name.as_str()))
            .map(|(_, _, build)| build())
            .unwrap_or_else(Self::dark)
    }

    pub fn all_names() -> Vec<&'static str> {
        THEMES.iter().map(|(name, _, _)| *name).collect()
    }
}
