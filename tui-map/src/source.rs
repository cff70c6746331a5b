use std::fmt;

use crate::core::{TileCoord, MAX_ZOOM};

pub const OSM_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Subdomain,
    Zoom,
    X,
    Y,
}

/// A raster tile provider described by a `{s}/{z}/{x}/{y}` URL template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileSource {
    template: String,
    segments: Vec<Segment>,
    subdomains: Vec<String>,
    attribution: String,
    max_zoom: u8,
}

impl TileSource {
    pub fn builder(template: impl Into<String>) -> TileSourceBuilder {
        TileSourceBuilder {
            template: template.into(),
            subdomains: Vec::new(),
            attribution: String::new(),
            max_zoom: MAX_ZOOM,
        }
    }

    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        Self::builder(template).build()
    }

    pub fn openstreetmap() -> Self {
        Self::builder(OSM_TEMPLATE)
            .subdomains(OSM_SUBDOMAINS)
            .attribution(OSM_ATTRIBUTION)
            .build()
            .expect("built-in OpenStreetMap template is valid")
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn attribution(&self) -> &str {
        &self.attribution
    }

    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    /// Subdomains rotate on `(x + y) % len` so neighboring tiles spread
    /// across servers.
    pub fn url_for(&self, tile: TileCoord) -> String {
        let mut url = String::with_capacity(self.template.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => url.push_str(text),
                Segment::Subdomain => {
                    let idx = (tile.x as usize + tile.y as usize) % self.subdomains.len().max(1);
                    if let Some(sub) = self.subdomains.get(idx) {
                        url.push_str(sub);
                    }
                }
                Segment::Zoom => url.push_str(&tile.z.to_string()),
                Segment::X => url.push_str(&tile.x.to_string()),
                Segment::Y => url.push_str(&tile.y.to_string()),
            }
        }
        url
    }
}

#[derive(Clone, Debug)]
pub struct TileSourceBuilder {
    template: String,
    subdomains: Vec<String>,
    attribution: String,
    max_zoom: u8,
}

impl TileSourceBuilder {
    pub fn subdomains<I, S>(mut self, subdomains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subdomains = subdomains.into_iter().map(Into::into).collect();
        self
    }

    pub fn attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = attribution.into();
        self
    }

    pub fn max_zoom(mut self, max_zoom: u8) -> Self {
        self.max_zoom = max_zoom.min(MAX_ZOOM);
        self
    }

    pub fn build(self) -> Result<TileSource, TemplateError> {
        let segments = parse_template(&self.template)?;

        for (placeholder, segment) in [("{z}", Segment::Zoom), ("{x}", Segment::X), ("{y}", Segment::Y)] {
            if !segments.contains(&segment) {
                return Err(TemplateError::MissingPlaceholder(placeholder));
            }
        }
        if segments.contains(&Segment::Subdomain) && self.subdomains.is_empty() {
            return Err(TemplateError::MissingSubdomains);
        }

        Ok(TileSource {
            template: self.template,
            segments,
            subdomains: self.subdomains,
            attribution: self.attribution,
            max_zoom: self.max_zoom,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateError {
    Empty,
    UnclosedPlaceholder,
    UnknownPlaceholder(String),
    MissingPlaceholder(&'static str),
    MissingSubdomains,
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::Empty => write!(f, "tile url template is empty"),
            TemplateError::UnclosedPlaceholder => {
                write!(f, "tile url template has an unclosed '{{'")
            }
            TemplateError::UnknownPlaceholder(name) => {
                write!(f, "tile url template uses unknown placeholder {{{}}}", name)
            }
            TemplateError::MissingPlaceholder(name) => {
                write!(f, "tile url template must contain {}", name)
            }
            TemplateError::MissingSubdomains => {
                write!(f, "tile url template uses {{s}} but no subdomains were given")
            }
        }
    }
}

impl std::error::Error for TemplateError {}

fn parse_template(template: &str) -> Result<Vec<Segment>, TemplateError> {
    if template.trim().is_empty() {
        return Err(TemplateError::Empty);
    }

    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars();
    while let Some(ch) = chars.next() {
        if ch != '{' {
            literal.push(ch);
            continue;
        }

        let mut name = String::new();
        let mut closed = false;
        for inner in chars.by_ref() {
            if inner == '}' {
                closed = true;
                break;
            }
            name.push(inner);
        }
        if !closed {
            return Err(TemplateError::UnclosedPlaceholder);
        }

        let segment = match name.as_str() {
            "s" => Segment::Subdomain,
            "z" => Segment::Zoom,
            "x" => Segment::X,
            "y" => Segment::Y,
            _ => return Err(TemplateError::UnknownPlaceholder(name)),
        };
        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(segment);
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}
