// Inline style declarations, as found in a `style="..."` attribute

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleMap {
    declarations: Vec<(String, String)>,
}

impl StyleMap {
    pub fn parse(text: &str) -> Self {
        let declarations = text
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
            .filter(|(name, value)| !name.is_empty() && !value.is_empty())
            .collect();
        Self { declarations }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        let property = property.to_ascii_lowercase();
        self.declarations
            .iter()
            .rev()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Replaces the property in place, appends it if new, removes it when `value` is empty
    pub fn set(&mut self, property: &str, value: &str) {
        let property = property.to_ascii_lowercase();
        let value = value.trim();
        if value.is_empty() {
            self.declarations.retain(|(name, _)| *name != property);
            return;
        }
        match self.declarations.iter_mut().find(|(name, _)| *name == property) {
            Some(existing) => existing.1 = value.to_string(),
            None => self.declarations.push((property, value.to_string())),
        }
    }

    /// Pixel length of a property such as `height: 120px`
    pub fn pixels(&self, property: &str) -> Option<f64> {
        let value = self.get(property)?;
        let number = value.strip_suffix("px").unwrap_or(value).trim();
        number.parse::<f64>().ok().filter(|px| px.is_finite() && *px >= 0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl fmt::Display for StyleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.declarations {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}: {};", name, value)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_get() {
        let style = StyleMap::parse("height: 120px; Background-Color: rgb(255, 255, 255)");
        assert_eq!(style.get("height"), Some("120px"));
        assert_eq!(style.get("background-color"), Some("rgb(255, 255, 255)"));
        assert_eq!(style.pixels("height"), Some(120.0));
    }

    #[test]
    fn test_parse_ignores_garbage() {
        let style = StyleMap::parse(";;color;: red; width:");
        assert!(style.is_empty());
    }

    #[test]
    fn test_set_replaces_and_removes() {
        let mut style = StyleMap::parse("color: red; height: 10px");
        style.set("color", "blue");
        assert_eq!(style.to_string(), "color: blue; height: 10px;");

        style.set("color", "");
        assert_eq!(style.get("color"), None);
        assert_eq!(style.to_string(), "height: 10px;");
    }

    #[test]
    fn test_pixels_rejects_non_lengths() {
        let style = StyleMap::parse("height: auto; width: -5px");
        assert_eq!(style.pixels("height"), None);
        assert_eq!(style.pixels("width"), None);
    }
}
