//! Render engine for pagoda pages.
//!
//! `Engine::new` validates the configuration and writes the generated
//! TypeScript declarations as a construction side effect; the returned
//! engine is read-only and can be shared across request tasks. Rendering
//! produces the full HTML document for a page (title, meta tags, props
//! payload and bundle script); `load_asset` hands out frontend static
//! files for the asset route. The `RenderEngine` trait is the seam the
//! server codes against, so tests can swap in a stub.
//!
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path};

use anyhow::{Context, Result, bail};

use crate::config::EngineConfig;
use crate::typegen;

/// What the engine needs to render one page. Built fresh per request and
/// discarded once the response is written.
pub struct RenderRequest {
    /// Page file relative to the frontend dir, e.g. `pages/_document.tsx`
    pub file: String,
    /// Document title
    pub title: String,
    /// Meta tags to embed in the document head, unordered
    pub meta_tags: HashMap<String, String>,
    /// Props payload handed to the page on hydration
    pub props: serde_json::Value,
}

/// A frontend static file plus its content type
pub struct Asset {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// The surface the server codes against
pub trait RenderEngine: Send + Sync {
    /// Render one page to a byte-serialized HTML document
    fn render_route(&self, request: &RenderRequest) -> Result<Vec<u8>>;
    /// Load a frontend asset by its path relative to the asset dir
    fn load_asset(&self, rel_path: &str) -> Result<Asset>;
}

/// Render engine bound to one frontend directory
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Validate the configuration and write the generated type
    /// declarations. Fails without touching the output file if the
    /// configuration or the props schema is broken.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let declarations = typegen::generate(&config.props_schema_path)?;
        if let Some(parent) = config.generated_types_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&config.generated_types_path, declarations)
            .with_context(|| format!("writing {}", config.generated_types_path.display()))?;

        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// URL of the hydration bundle for a page file
    fn bundle_url(&self, file: &str) -> String {
        let bundle = Path::new(file).with_extension("js");
        format!("{}/{}", self.config.asset_route, bundle.display())
    }
}

impl RenderEngine for Engine {
    fn render_route(&self, request: &RenderRequest) -> Result<Vec<u8>> {
        let page_path = self.config.frontend_dir.join(&request.file);
        if !page_path.is_file() {
            bail!(
                "page {} not found under {}",
                request.file,
                self.config.frontend_dir.display()
            );
        }

        let mut meta = String::new();
        let mut keys: Vec<&String> = request.meta_tags.keys().collect();
        keys.sort();
        for key in keys {
            push_meta(&mut meta, key, &request.meta_tags[key]);
        }

        // `<` must not appear raw inside the inline script
        let props = serde_json::to_string(&request.props)?.replace('<', "\\u003c");

        let document = format!(
            "<!DOCTYPE html>\n\
             <html>\n\
             <head>\n\
             <meta charset=\"UTF-8\">\n\
             <title>{title}</title>\n\
             {meta}\
             </head>\n\
             <body>\n\
             <div id=\"root\"></div>\n\
             <script>window.__PAGODA_PROPS__ = {props};</script>\n\
             <script type=\"module\" src=\"{bundle}\"></script>\n\
             </body>\n\
             </html>\n",
            title = escape_html(&request.title),
            meta = meta,
            props = props,
            bundle = self.bundle_url(&request.file),
        );

        Ok(document.into_bytes())
    }

    fn load_asset(&self, rel_path: &str) -> Result<Asset> {
        let rel = Path::new(rel_path);
        if rel.is_absolute()
            || rel
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            bail!("asset path {:?} escapes the asset dir", rel_path);
        }

        let full = self.config.frontend_dir.join("assets").join(rel);
        let bytes =
            fs::read(&full).with_context(|| format!("reading asset {}", full.display()))?;
        Ok(Asset {
            bytes,
            content_type: content_type_for(rel_path),
        })
    }
}

/// Append one meta tag. Namespaced keys (`og:title`) use the `property`
/// attribute, plain keys (`description`) use `name`.
fn push_meta(buf: &mut String, key: &str, value: &str) {
    let attr = if key.contains(':') { "property" } else { "name" };
    buf.push_str(&format!(
        "<meta {}=\"{}\" content=\"{}\">\n",
        attr,
        escape_html(key),
        escape_html(value),
    ));
}

/// Escape a string for embedding in HTML text or attribute values
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Content type by file extension, octet-stream for anything unknown
fn content_type_for(path: &str) -> &'static str {
    match path.rsplit('.').next().unwrap_or("") {
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "html" => "text/html; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
