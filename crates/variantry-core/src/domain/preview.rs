//! Preview document compilation.
//!
//! Turns a resolved version into a single self-contained HTML page: the
//! preview markup inside a container, a stylesheet include for the CSS
//! framework and runtime includes for the UI framework. Frameworks that need
//! an ahead-of-time build get an explanatory comment instead of scripts.
//!
//! Compilation is pure. Writing the document anywhere is the job of a
//! `PreviewStorage` adapter.

use std::fmt::Write as _;

use crate::domain::{
    entities::{common::RelativePath, component::Component, version::ComponentVersion},
    error::DomainError,
    value_objects::{CssFramework, Framework},
};

const TAILWIND_V3_CDN: &str = "https://cdn.tailwindcss.com";
const TAILWIND_V4_CDN: &str = "https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4";
const REACT_CDN: &str = "https://unpkg.com/react@18/umd/react.development.js";
const REACT_DOM_CDN: &str = "https://unpkg.com/react-dom@18/umd/react-dom.development.js";
const BABEL_CDN: &str = "https://unpkg.com/@babel/standalone/babel.min.js";
const VUE_CDN: &str = "https://unpkg.com/vue@3/dist/vue.global.js";

/// Knobs for a single compilation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviewOptions {
    /// Render the dark-mode code (when the version has it) under `class="dark"`.
    pub dark_mode: bool,
}

/// A compiled preview page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    pub html: String,
    pub framework: Framework,
    pub css_framework: CssFramework,
    pub dark_mode: bool,
}

impl PreviewDocument {
    /// Conventional storage location:
    /// `previews/<component>/<framework>-<css>-<version>[-dark].html`.
    pub fn storage_path(&self, version: &ComponentVersion) -> Result<RelativePath, DomainError> {
        let suffix = if self.dark_mode { "-dark" } else { "" };
        let file = format!(
            "{}-{}-{}{}.html",
            version.framework, version.css_framework, version.version_number, suffix
        );
        RelativePath::try_new("previews")?
            .join(sanitize_segment(version.component_id.as_str()))?
            .join(sanitize_segment(&file))
    }
}

/// Compile a preview page for `version` of `component`.
pub fn compile(
    version: &ComponentVersion,
    component: &Component,
    options: PreviewOptions,
) -> PreviewDocument {
    let dark = options.dark_mode && version.supports_dark_mode;
    let body_code = match (&version.dark_mode_code, dark) {
        (Some(code), true) => code.as_str(),
        _ => version.code_preview.as_str(),
    };

    let mut html = String::with_capacity(body_code.len() + 1024);
    html.push_str("<!DOCTYPE html>\n");
    if dark {
        html.push_str("<html lang=\"en\" class=\"dark\">\n");
    } else {
        html.push_str("<html lang=\"en\">\n");
    }
    html.push_str("<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(
        html,
        "<title>{} · {} / {} · v{}</title>",
        escape_html(&component.name),
        version.framework.display_name(),
        version.css_framework.display_name(),
        escape_html(&version.version_number),
    );
    if let Some(include) = css_include(version.css_framework) {
        html.push_str(&include);
        html.push('\n');
    }
    html.push_str(&runtime_includes(version.framework));
    html.push_str("</head>\n");

    html.push_str("<body>\n<div id=\"preview-root\">\n");
    html.push_str(body_code);
    if !body_code.ends_with('\n') {
        html.push('\n');
    }
    html.push_str("</div>\n</body>\n</html>\n");

    PreviewDocument {
        html,
        framework: version.framework,
        css_framework: version.css_framework,
        dark_mode: dark,
    }
}

/// Stylesheet include for a CSS framework, if it needs one.
pub fn css_include(css: CssFramework) -> Option<String> {
    match css {
        CssFramework::TailwindV3 => Some(format!("<script src=\"{TAILWIND_V3_CDN}\"></script>")),
        CssFramework::TailwindV4 => Some(format!("<script src=\"{TAILWIND_V4_CDN}\"></script>")),
        CssFramework::Vanilla => None,
    }
}

/// Script includes needed to run the framework in the browser.
pub fn runtime_includes(framework: Framework) -> String {
    if framework.requires_build_step() {
        return format!(
            "<!-- {} components need a build step; this preview shows static markup only -->\n",
            framework.display_name()
        );
    }
    match framework {
        Framework::React => format!(
            "<script crossorigin src=\"{REACT_CDN}\"></script>\n\
             <script crossorigin src=\"{REACT_DOM_CDN}\"></script>\n\
             <script src=\"{BABEL_CDN}\"></script>\n"
        ),
        Framework::Vue => format!("<script src=\"{VUE_CDN}\"></script>\n"),
        _ => String::new(),
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn sanitize_segment(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}
