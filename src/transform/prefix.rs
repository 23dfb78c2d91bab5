// src/transform/prefix.rs

//! Vendor prefixing with `lightningcss`.

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};

use crate::errors::TransformError;

use super::{Asset, BoxFuture, Transform};

/// Adds vendor prefixes for a browserslist query and prints compressed CSS.
#[derive(Debug, Clone)]
pub struct Autoprefixer {
    targets: Targets,
}

impl Autoprefixer {
    /// Resolve the browserslist queries once, up front.
    pub fn new<S: AsRef<str>>(queries: &[S]) -> anyhow::Result<Self> {
        let queries: Vec<String> = queries.iter().map(|q| q.as_ref().to_string()).collect();
        let browsers = Browsers::from_browserslist(queries.iter().map(String::as_str))
            .map_err(|e| anyhow::anyhow!("invalid browserslist query {queries:?}: {e}"))?;

        let targets = Targets {
            browsers,
            ..Targets::default()
        };
        Ok(Self { targets })
    }

    fn process(&self, asset: &Asset) -> Result<String, String> {
        let filename = asset.source.to_string_lossy().into_owned();
        let mut sheet = StyleSheet::parse(
            &asset.contents,
            ParserOptions {
                filename,
                ..ParserOptions::default()
            },
        )
        .map_err(|e| e.to_string())?;

        sheet
            .minify(MinifyOptions {
                targets: self.targets,
                ..MinifyOptions::default()
            })
            .map_err(|e| e.to_string())?;

        let printed = sheet
            .to_css(PrinterOptions {
                minify: true,
                targets: self.targets,
                ..PrinterOptions::default()
            })
            .map_err(|e| e.to_string())?;

        Ok(printed.code)
    }
}

impl Transform for Autoprefixer {
    fn name(&self) -> &str {
        "autoprefixer"
    }

    fn apply<'a>(&'a self, mut asset: Asset) -> BoxFuture<'a, Result<Asset, TransformError>> {
        Box::pin(async move {
            match self.process(&asset) {
                Ok(css) => {
                    asset.replace_contents(css);
                    Ok(asset)
                }
                Err(message) => Err(TransformError::new(self.name(), &asset.source, message)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixer() -> Autoprefixer {
        Autoprefixer::new(&["last 3 versions"]).unwrap()
    }

    #[tokio::test]
    async fn output_is_compressed() {
        let asset = Asset::new("main.sass", "main.css", "a {\n  color: red;\n}\n");
        let out = prefixer().apply(asset).await.unwrap();
        assert_eq!(out.contents, "a{color:red}");
    }

    #[tokio::test]
    async fn adds_vendor_prefix_and_keeps_standard_declaration() {
        let asset = Asset::new("main.sass", "main.css", ".box { user-select: none }");
        let out = prefixer().apply(asset).await.unwrap();
        assert!(out.contents.contains("-webkit-user-select:none"), "{}", out.contents);
        assert!(out.contents.contains(";user-select:none"), "{}", out.contents);
    }

    #[tokio::test]
    async fn parse_error_is_a_transform_error() {
        let asset = Asset::new("bad.sass", "bad.css", "..box { color: red }");
        let err = prefixer().apply(asset).await.unwrap_err();
        assert_eq!(err.tool, "autoprefixer");
    }

    #[test]
    fn rejects_unknown_query() {
        assert!(Autoprefixer::new(&["definitely not a browser"]).is_err());
    }
}
