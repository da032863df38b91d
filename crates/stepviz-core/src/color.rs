//! Color handling for stepviz drawings.
//!
//! [`Color`] wraps the `DynamicColor` type from the color crate so that any
//! CSS color string accepted in configuration (status palettes, backgrounds,
//! stroke colors) can be parsed once and rendered back into SVG attributes.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;

/// A parsed CSS color.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Parses a CSS color string such as `"#ff0000"`, `"rgb(255, 0, 0)"` or `"red"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepviz_core::color::Color;
    ///
    /// let green = Color::new("#2bd62e").unwrap();
    /// let grey = Color::new("lightgrey").unwrap();
    /// assert_ne!(green, grey);
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        DynamicColor::from_str(color_str)
            .map(|color| Self { color })
            .map_err(|err| format!("invalid color `{color_str}`: {err}"))
    }

    /// Returns a string usable inside an SVG `id` attribute.
    ///
    /// The result only contains ASCII alphanumerics and underscores and never
    /// starts with a digit.
    ///
    /// ```
    /// use stepviz_core::color::Color;
    ///
    /// let id = Color::new("#ff8000").unwrap().to_id_safe_string();
    /// assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    /// ```
    pub fn to_id_safe_string(self) -> String {
        let sanitized: String = self
            .to_string()
            .replace('#', "hex")
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();

        if sanitized.starts_with(|c: char| c.is_ascii_digit()) {
            format!("c_{sanitized}")
        } else {
            sanitized
        }
    }

    /// Returns a copy of this color with the given alpha in `0.0..=1.0`.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha component, `0.0` being fully transparent.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_color_parse() {
        assert!(Color::new("#00ff00").is_ok());
        assert!(Color::new("rgb(10, 20, 30)").is_ok());
        assert!(Color::new("definitely-not-a-color").is_err());
        assert!("steelblue".parse::<Color>().is_ok());
    }

    #[test]
    fn test_color_default_is_black() {
        assert_eq!(Color::default().to_string(), "black");
    }

    #[test]
    fn test_color_alpha() {
        let color = Color::new("orange").unwrap();
        assert!((color.alpha() - 1.0).abs() < 0.001);
        assert!((color.with_alpha(0.25).alpha() - 0.25).abs() < 0.001);
    }

    #[test]
    fn test_color_id_safe_string() {
        let id = Color::new("rgb(255, 0, 0)").unwrap().to_id_safe_string();
        assert!(!id.is_empty());
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        assert!(!id.starts_with(|c: char| c.is_ascii_digit()));
    }

    #[test]
    fn test_color_hash_matches_eq() {
        let mut set = HashSet::new();
        set.insert(Color::new("red").unwrap());
        assert!(set.contains(&Color::new("red").unwrap()));
        assert!(!set.contains(&Color::new("blue").unwrap()));
    }
}
