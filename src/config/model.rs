// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [paths]
/// templates = ["webstatic/assets_shared/templates/**/*.pug", "websrc/templates/**/*.pug"]
/// css_dest = "webstatic/assets/css"
///
/// [tools]
/// uglify = "npx --no-install uglifyjs --compress --mangle"
///
/// [shared]
/// dir = "webstatic/assets_shared"
///
/// [livereload]
/// port = 35729
/// ```
///
/// All sections are optional; missing keys fall back to the layout of the
/// web project this tool was written for.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub paths: PathsSection,

    #[serde(default)]
    pub tools: ToolsSection,

    #[serde(default)]
    pub shared: SharedSection,

    #[serde(default)]
    pub livereload: LiveReloadSection,
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`),
/// so every glob in here is known to compile and every command is non-empty.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    paths: PathsSection,
    tools: ToolsSection,
    shared: SharedSection,
    livereload: LiveReloadSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            paths: raw.paths,
            tools: raw.tools,
            shared: raw.shared,
            livereload: raw.livereload,
        }
    }

    pub fn paths(&self) -> &PathsSection {
        &self.paths
    }

    pub fn tools(&self) -> &ToolsSection {
        &self.tools
    }

    pub fn shared(&self) -> &SharedSection {
        &self.shared
    }

    pub fn livereload(&self) -> &LiveReloadSection {
        &self.livereload
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        // The built-in defaults are covered by a unit test in `validate.rs`.
        Self::new_unchecked(RawConfigFile::default())
    }
}

/// `[paths]` section: source sets and destinations, relative to the
/// project root.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    /// Template source set. Order matters: later patterns override earlier
    /// ones when two files share a logical name.
    #[serde(default = "default_templates")]
    pub templates: Vec<String>,

    /// Stylesheet source set, same override rule as `templates`.
    #[serde(default = "default_styles")]
    pub styles: Vec<String>,

    /// Individually minified scripts (top level of one directory).
    #[serde(default = "default_scripts")]
    pub scripts: String,

    /// Scripts concatenated into the site-wide aggregate.
    #[serde(default = "default_scripts_tutti")]
    pub scripts_tutti: String,

    #[serde(default = "default_css_dest")]
    pub css_dest: String,

    #[serde(default = "default_templates_dest")]
    pub templates_dest: String,

    #[serde(default = "default_scripts_dest")]
    pub scripts_dest: String,
}

fn default_templates() -> Vec<String> {
    vec![
        "webstatic/assets_shared/templates/**/*.pug".to_string(),
        "websrc/templates/**/*.pug".to_string(),
    ]
}

fn default_styles() -> Vec<String> {
    vec![
        "webstatic/assets_shared/styles/**/*.sass".to_string(),
        "websrc/styles/**/*.sass".to_string(),
    ]
}

fn default_scripts() -> String {
    "websrc/scripts/*.js".to_string()
}

fn default_scripts_tutti() -> String {
    "websrc/scripts/tutti/**/*.js".to_string()
}

fn default_css_dest() -> String {
    "webstatic/assets/css".to_string()
}

fn default_templates_dest() -> String {
    "templates".to_string()
}

fn default_scripts_dest() -> String {
    "webstatic/assets/js".to_string()
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            templates: default_templates(),
            styles: default_styles(),
            scripts: default_scripts(),
            scripts_tutti: default_scripts_tutti(),
            css_dest: default_css_dest(),
            templates_dest: default_templates_dest(),
            scripts_dest: default_scripts_dest(),
        }
    }
}

/// `[tools]` section: shell commands for the external collaborators.
///
/// Each command reads the asset on stdin and writes the result to stdout.
/// `ASSETWATCH_SOURCE` / `ASSETWATCH_SOURCE_DIR` hold the input file path and
/// its directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolsSection {
    /// Style compiler. Expected to emit compressed CSS.
    #[serde(default = "default_sass")]
    pub sass: String,

    /// Template renderer used for production builds.
    #[serde(default = "default_pug")]
    pub pug: String,

    /// Template renderer used for development builds (indented output).
    #[serde(default = "default_pug_pretty")]
    pub pug_pretty: String,

    /// Script minifier.
    #[serde(default = "default_uglify")]
    pub uglify: String,

    /// Browserslist queries for vendor prefixing.
    #[serde(default = "default_browsers")]
    pub browsers: Vec<String>,
}

fn default_sass() -> String {
    "npx --no-install sass --stdin --indented --style=compressed --no-source-map --load-path \"$ASSETWATCH_SOURCE_DIR\"".to_string()
}

fn default_pug() -> String {
    "npx --no-install pug --path \"$ASSETWATCH_SOURCE\"".to_string()
}

fn default_pug_pretty() -> String {
    "npx --no-install pug --pretty --path \"$ASSETWATCH_SOURCE\"".to_string()
}

fn default_uglify() -> String {
    "npx --no-install uglifyjs --compress --mangle".to_string()
}

fn default_browsers() -> Vec<String> {
    vec!["last 3 versions".to_string()]
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            sass: default_sass(),
            pug: default_pug(),
            pug_pretty: default_pug_pretty(),
            uglify: default_uglify(),
            browsers: default_browsers(),
        }
    }
}

/// `[shared]` section: the nested project built by the `shared` task.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SharedSection {
    #[serde(default = "default_shared_dir")]
    pub dir: String,

    /// Build command run inside `dir`. `None` re-runs this executable
    /// without arguments.
    #[serde(default)]
    pub command: Option<String>,
}

fn default_shared_dir() -> String {
    "webstatic/assets_shared".to_string()
}

impl Default for SharedSection {
    fn default() -> Self {
        Self {
            dir: default_shared_dir(),
            command: None,
        }
    }
}

/// `[livereload]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LiveReloadSection {
    #[serde(default = "default_livereload_host")]
    pub host: String,

    #[serde(default = "default_livereload_port")]
    pub port: u16,
}

fn default_livereload_host() -> String {
    "127.0.0.1".to_string()
}

fn default_livereload_port() -> u16 {
    crate::livereload::DEFAULT_PORT
}

impl Default for LiveReloadSection {
    fn default() -> Self {
        Self {
            host: default_livereload_host(),
            port: default_livereload_port(),
        }
    }
}
