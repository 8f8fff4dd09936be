use anyhow::Result;
use serde::Serialize;
use std::io::Write;

/// A recommended design tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tool {
    pub category: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Empty when the tool is free
    pub price: &'static str,
    pub url: &'static str,
}

const TOOLS: &[(&str, &str, &str, &str, &str)] = &[
    ("Design", "Figma", "Best overall tool for UI/UX design. Browser-based, collaborative, and perfect for beginners.", "Free tier available", "https://figma.com"),
    ("Design", "Canva", "Great for quick designs and social media graphics. Very beginner-friendly.", "Free with premium options", "https://canva.com"),
    ("Design", "Adobe XD", "Professional prototyping tool with great design capabilities.", "Free starter plan", "https://adobe.com/products/xd.html"),
    ("Design", "Sketch", "Mac-only design tool, popular among professionals.", "$99/year", "https://sketch.com"),
    ("Design", "Framer", "Advanced prototyping with real code components.", "Free tier available", "https://framer.com"),
    ("Color Palette", "Coolors.co", "Generate beautiful color palettes instantly.", "", "https://coolors.co"),
    ("Typography", "Google Fonts", "Free web fonts for your projects.", "", "https://fonts.google.com"),
    ("Stock Images", "Unsplash", "High-quality free stock photos.", "", "https://unsplash.com"),
];

pub fn recommended_tools() -> Vec<Tool> {
    TOOLS
        .iter()
        .map(|&(category, name, description, price, url)| Tool {
            category,
            name,
            description,
            price,
            url,
        })
        .collect()
}

/// Categories in display order
pub fn categories(tools: &[Tool]) -> Vec<&'static str> {
    let mut categories = Vec::new();
    for tool in tools {
        if !categories.contains(&tool.category) {
            categories.push(tool.category);
        }
    }
    categories
}

/// Write the list as CSV with a header row
pub fn write_tools_csv<W: Write>(tools: &[Tool], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for tool in tools {
        wtr.serialize(tool)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_keep_order() {
        let tools = recommended_tools();
        assert_eq!(tools.len(), 8);
        assert_eq!(
            categories(&tools),
            vec!["Design", "Color Palette", "Typography", "Stock Images"]
        );
    }

    #[test]
    fn test_csv_export() {
        let tools = recommended_tools();
        let mut out = Vec::new();
        write_tools_csv(&tools[..2], &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("category,name,description,price,url"));
        assert_eq!(
            lines.next(),
            Some("Design,Figma,\"Best overall tool for UI/UX design. Browser-based, collaborative, and perfect for beginners.\",Free tier available,https://figma.com")
        );
        assert_eq!(lines.count(), 1);
    }
}
