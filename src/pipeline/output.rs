// src/pipeline/output.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::transform::Asset;

/// Final step of every pipeline: write the asset (and its source map) under
/// the destination directory.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    fs: Arc<dyn FileSystem>,
    dest: PathBuf,
    mode: Option<u32>,
}

impl OutputWriter {
    pub fn new(fs: Arc<dyn FileSystem>, dest: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            dest: dest.into(),
            mode: None,
        }
    }

    /// Force these permission bits on every file written.
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Write `asset` to `dest/<logical>`.
    ///
    /// With a source map, `<name>.map` is written beside the output and a
    /// `sourceMappingURL` trailer is appended to the output. Returns every
    /// path written, output first.
    pub fn write(&self, mut asset: Asset) -> Result<Vec<PathBuf>> {
        let target = self.dest.join(&asset.logical);
        let mut written = vec![target.clone()];

        if let Some(map) = asset.map.as_mut() {
            map.set_file(&asset.logical);
            let map_name = format!("{}.map", file_name(&asset.logical));
            let map_path = target.with_file_name(&map_name);

            asset
                .contents
                .push_str(&mapping_url_trailer(&asset.logical, &map_name));

            let json = map.to_json().map_err(anyhow::Error::from)?;
            self.fs.write(&map_path, json.as_bytes(), self.mode)?;
            written.push(map_path);
        }

        self.fs.write(&target, asset.contents.as_bytes(), self.mode)?;
        Ok(written)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn mapping_url_trailer(output: &Path, map_name: &str) -> String {
    let is_css = output.extension().is_some_and(|ext| ext == "css");
    if is_css {
        format!("\n/*# sourceMappingURL={map_name} */\n")
    } else {
        format!("\n//# sourceMappingURL={map_name}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn writes_under_destination() {
        let fs = MockFileSystem::new();
        let writer = OutputWriter::new(Arc::new(fs.clone()), "./out");

        let written = writer
            .write(Asset::new("./src/pages/a.pug", "pages/a.html", "<p>a</p>"))
            .unwrap();

        assert_eq!(written, vec![PathBuf::from("./out/pages/a.html")]);
        assert_eq!(fs.contents("./out/pages/a.html").as_deref(), Some("<p>a</p>"));
    }

    #[test]
    fn source_map_written_beside_output() {
        let fs = MockFileSystem::new();
        let writer = OutputWriter::new(Arc::new(fs.clone()), "./css").with_mode(0o644);

        let mut asset = Asset::new("./styles/main.sass", "main.sass", "a\n  color: red");
        asset.init_source_map(Path::new("styles/main.sass"));
        asset.set_extension("css");
        asset.replace_contents("a{color:red}".to_string());

        let written = writer.write(asset).unwrap();
        assert_eq!(
            written,
            vec![PathBuf::from("./css/main.css"), PathBuf::from("./css/main.css.map")]
        );

        let css = fs.contents("./css/main.css").unwrap();
        assert!(css.starts_with("a{color:red}"));
        assert!(css.contains("/*# sourceMappingURL=main.css.map */"));

        let map: serde_json::Value =
            serde_json::from_str(&fs.contents("./css/main.css.map").unwrap()).unwrap();
        assert_eq!(map["file"], "main.css");
        assert_eq!(map["sources"][0], "styles/main.sass");
        assert_eq!(fs.mode(Path::new("./css/main.css.map")), Some(0o644));
    }

    #[test]
    fn js_trailer_uses_line_comment() {
        assert_eq!(
            mapping_url_trailer(Path::new("app.min.js"), "app.min.js.map"),
            "\n//# sourceMappingURL=app.min.js.map\n"
        );
    }
}
