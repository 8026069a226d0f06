use supports_color::Stream;

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const LIGHT_BLUE: Self = Self::new(173, 216, 230);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Nearest entry of the xterm 6x6x6 color cube.
    pub fn to_ansi256(self) -> u8 {
        let level = |c: u8| -> u8 {
            if c < 48 {
                0
            } else if c < 115 {
                1
            } else {
                (c - 35) / 40
            }
        };
        16 + 36 * level(self.red) + 6 * level(self.green) + level(self.blue)
    }

    /// Nearest of the sixteen basic terminal colors.
    pub fn to_ansi16(self) -> crossterm::style::Color {
        use crossterm::style::Color as Term;

        let bright = u16::from(self.red.max(self.green).max(self.blue)) > 170;
        let threshold = |c: u8| c > 85;
        match (threshold(self.red), threshold(self.green), threshold(self.blue), bright) {
            (false, false, false, _) => Term::Black,
            (true, false, false, false) => Term::DarkRed,
            (true, false, false, true) => Term::Red,
            (false, true, false, false) => Term::DarkGreen,
            (false, true, false, true) => Term::Green,
            (false, false, true, false) => Term::DarkBlue,
            (false, false, true, true) => Term::Blue,
            (true, true, false, false) => Term::DarkYellow,
            (true, true, false, true) => Term::Yellow,
            (true, false, true, false) => Term::DarkMagenta,
            (true, false, true, true) => Term::Magenta,
            (false, true, true, false) => Term::DarkCyan,
            (false, true, true, true) => Term::Cyan,
            (true, true, true, false) => Term::Grey,
            (true, true, true, true) => Term::White,
        }
    }

    /// Converts for output at the given color level; `None` when the
    /// terminal has no color support.
    pub fn to_terminal(self, level: ColorLevel) -> Option<crossterm::style::Color> {
        match level {
            ColorLevel::None => None,
            ColorLevel::Color16 => Some(self.to_ansi16()),
            ColorLevel::Color256 => Some(crossterm::style::Color::AnsiValue(self.to_ansi256())),
            ColorLevel::TrueColor => Some(crossterm::style::Color::Rgb {
                r: self.red,
                g: self.green,
                b: self.blue,
            }),
        }
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

/// Detect the level of color support
pub fn color_level() -> ColorLevel {
    match supports_color::on(Stream::Stdout) {
        Some(level) => match level.has_16m {
            true => ColorLevel::TrueColor,
            false => match level.has_256 {
                true => ColorLevel::Color256,
                false => ColorLevel::Color16,
            },
        },
        None => ColorLevel::None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorLevel {
    /// No color support
    None,
    /// 16 basic colors
    Color16,
    /// 256 ANSI colors
    Color256,
    /// True color (24-bit RGB)
    TrueColor,
}
