pub mod tools;

pub use tools::{categories, recommended_tools, write_tools_csv, Tool};

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

const TEMPLATES_TEXT: &str = "UI Design Templates Package
=====================================

This package includes:
1. Mobile App Wireframes (iOS & Android)
2. Website Landing Page Templates
3. Dashboard UI Components
4. E-commerce Product Cards
5. Social Media Post Templates

File formats: Figma, Sketch, Adobe XD
License: Free for personal and commercial use

Instructions:
- Import files into your design tool
- Customize colors, fonts, and content
- Use as starting point for your projects

Happy designing!
";

const GUIDE_TEXT: &str = "UI Design Guide for Beginners
===================================

Table of Contents:
1. Introduction to UI Design
2. Color Theory Fundamentals
3. Typography Best Practices
4. Layout and Spacing Principles
5. Design Systems and Components
6. Responsive Design Guidelines
7. Accessibility in UI Design
8. Popular Design Tools
9. Design Process and Workflow
10. Resources and Further Learning

Chapter 1: Introduction to UI Design
------------------------------------
User Interface (UI) design is the process of making interfaces in software or computerized devices with a focus on looks or style...

Chapter 2: Color Theory Fundamentals
------------------------------------
Color is one of the most powerful tools in a designer's toolkit. Understanding how colors work together...

[Content continues...]

For the complete guide with images and examples, visit our website or contact us for the full version.
";

/// Downloadable course material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Templates,
    Guide,
    /// Opens the tool list instead of downloading
    Tools,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Templates, Resource::Guide, Resource::Tools];

    pub fn title(&self) -> &'static str {
        match self {
            Resource::Templates => "Design Templates",
            Resource::Guide => "Design Guide",
            Resource::Tools => "Tool Recommendations",
        }
    }

    pub fn blurb(&self) -> &'static str {
        match self {
            Resource::Templates => "Wireframes, landing pages and dashboard components",
            Resource::Guide => "A beginner's reference for every chapter",
            Resource::Tools => "Design, color, typography and stock image tools",
        }
    }

    /// Suggested file name, `None` for resources that are not files
    pub fn file_name(&self) -> Option<&'static str> {
        match self {
            Resource::Templates => Some("ui-templates.txt"),
            Resource::Guide => Some("ui-design-guide.txt"),
            Resource::Tools => None,
        }
    }

    pub fn contents(&self) -> Option<&'static str> {
        match self {
            Resource::Templates => Some(TEMPLATES_TEXT),
            Resource::Guide => Some(GUIDE_TEXT),
            Resource::Tools => None,
        }
    }
}

/// Write a downloadable resource to `path`
pub fn write_download(resource: Resource, path: &Path) -> Result<()> {
    let contents = resource
        .contents()
        .with_context(|| format!("{} is not a downloadable file", resource.title()))?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved {} to {}", resource.title(), path.display());
    Ok(())
}

/// Toast shown after a download
pub fn download_message(resource: Resource) -> String {
    format!("{} downloaded successfully!", resource.file_name().unwrap_or(resource.title()))
}
