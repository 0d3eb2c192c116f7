//! Control markdown body: heading-delimited sections
//!
//! ```text
//! # ac-1 - Policy and Procedures
//!
//! ## Implementation
//!
//! ### This System
//!
//! prose
//! ```
//!
//! `##` opens a section, `###` a subsection of the current section, `#` lines
//! are titles and carry no data. A `###` before the first `##` belongs to no
//! section and is ignored along with its prose. Fenced code blocks are opaque
//! and HTML comments never reach the parsed prose, so rendered placeholders
//! read back as empty.
//!
//! Prose lines starting with `#` are written with a leading backslash
//! (`\## Note`) so they stay prose; parsing removes one backslash from such
//! lines.

/// A `###` block inside a section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsection {
    pub heading: String,
    pub prose: String,
}

/// A `##` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub prose: String,
    pub subsections: Vec<Subsection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlBody {
    pub sections: Vec<Section>,
}

impl Section {
    pub fn new(heading: impl Into<String>, prose: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            prose: prose.into(),
            subsections: Vec::new(),
        }
    }

    pub fn with_subsection(mut self, heading: impl Into<String>, prose: impl Into<String>) -> Self {
        self.subsections.push(Subsection {
            heading: heading.into(),
            prose: prose.into(),
        });
        self
    }
}

#[derive(Default)]
struct Builder {
    sections: Vec<Section>,
    lines: Vec<String>,
}

impl Builder {
    fn flush(&mut self) {
        let prose = clean_prose(&self.lines.join("\n"));
        self.lines.clear();
        let Some(section) = self.sections.last_mut() else {
            return;
        };
        match section.subsections.last_mut() {
            Some(sub) => sub.prose = prose,
            None => section.prose = prose,
        }
    }
}

impl ControlBody {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn parse(body: &str) -> Self {
        let mut builder = Builder::default();
        let mut in_fence = false;

        for line in body.lines() {
            if is_fence(line) {
                in_fence = !in_fence;
                builder.lines.push(line.to_string());
                continue;
            }
            if in_fence {
                builder.lines.push(line.to_string());
                continue;
            }

            if let Some(heading) = line.strip_prefix("### ") {
                builder.flush();
                if let Some(section) = builder.sections.last_mut() {
                    section.subsections.push(Subsection {
                        heading: heading.trim().to_string(),
                        prose: String::new(),
                    });
                }
            } else if let Some(heading) = line.strip_prefix("## ") {
                builder.flush();
                builder.sections.push(Section::new(heading.trim(), ""));
            } else if line.starts_with("# ") {
                builder.flush();
            } else {
                builder.lines.push(unescape_heading(line).unwrap_or(line).to_string());
            }
        }
        builder.flush();

        Self {
            sections: builder.sections,
        }
    }

    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }

    /// Prose of a section, empty when the section is absent
    pub fn section_prose(&self, heading: &str) -> &str {
        self.section(heading).map(|s| s.prose.as_str()).unwrap_or("")
    }

    pub fn subsections(&self, heading: &str) -> &[Subsection] {
        self.section(heading)
            .map(|s| s.subsections.as_slice())
            .unwrap_or(&[])
    }

    /// Render as markdown under a `# <id> - <title>` heading
    pub fn render(&self, control_id: &str, title: &str) -> String {
        let mut out = if title.is_empty() {
            format!("# {}\n", control_id)
        } else {
            format!("# {} - {}\n", control_id, title)
        };

        for section in &self.sections {
            out.push_str(&format!("\n## {}\n", section.heading));
            if !section.prose.is_empty() || section.subsections.is_empty() {
                out.push('\n');
                out.push_str(&prose_or_placeholder(&escape_headings(&section.prose), &section.heading));
                out.push('\n');
            }
            for sub in &section.subsections {
                out.push_str(&format!("\n### {}\n\n", sub.heading));
                out.push_str(&prose_or_placeholder(&escape_headings(&sub.prose), &sub.heading));
                out.push('\n');
            }
        }

        out
    }
}

fn prose_or_placeholder(prose: &str, heading: &str) -> String {
    if prose.is_empty() {
        format!("<!-- Add prose for {} -->", heading)
    } else {
        prose.to_string()
    }
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// Prefix a backslash to every line outside fences that starts with `#` after any backslashes
fn escape_headings(prose: &str) -> String {
    let mut in_fence = false;
    prose
        .lines()
        .map(|line| {
            if is_fence(line) {
                in_fence = !in_fence;
            }
            if !in_fence && line.trim_start_matches('\\').starts_with('#') {
                format!("\\{}", line)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn unescape_heading(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('\\')?;
    rest.trim_start_matches('\\').starts_with('#').then_some(rest)
}

fn clean_prose(raw: &str) -> String {
    strip_html_comments(raw).trim().to_string()
}

fn strip_html_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("<!--") {
        out.push_str(&rest[..start]);
        match rest[start + 4..].find("-->") {
            Some(end) => rest = &rest[start + 4 + end + 3..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}
