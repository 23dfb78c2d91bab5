// src/transform/sourcemap.rs

//! Source map v3 record carried alongside an [`Asset`](super::Asset).
//!
//! Mappings are tracked at line granularity: a freshly read file maps every
//! output line to the same line of its source, and concatenation shifts those
//! lines. External tools do not report their mappings back, so once one of
//! them rewrites the contents the segments are dropped and only `sources` /
//! `sourcesContent` remain.

use std::path::Path;

use serde::Serialize;

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Where one generated line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineOrigin {
    pub source: u32,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceMap {
    pub file: String,
    pub sources: Vec<String>,
    pub sources_content: Vec<String>,
    /// One entry per generated line.
    pub mappings: Vec<Option<LineOrigin>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireMap<'a> {
    version: u8,
    file: &'a str,
    sources: &'a [String],
    sources_content: &'a [String],
    names: [&'a str; 0],
    mappings: String,
}

impl SourceMap {
    /// Identity map for `contents` read from `source`.
    pub fn for_source(output: &Path, source: &Path, contents: &str) -> Self {
        let lines = line_count(contents);
        Self {
            file: file_name(output),
            sources: vec![source.to_string_lossy().replace('\\', "/")],
            sources_content: vec![contents.to_string()],
            mappings: (0..lines)
                .map(|line| {
                    Some(LineOrigin {
                        source: 0,
                        line: line as u32,
                    })
                })
                .collect(),
        }
    }

    /// Map for the concatenation of several parts joined with `\n`.
    ///
    /// `parts` pairs each part's map with the number of lines the part
    /// occupies in the output.
    pub fn concat(output: &Path, parts: &[(&SourceMap, usize)]) -> Self {
        let mut merged = Self {
            file: file_name(output),
            sources: Vec::new(),
            sources_content: Vec::new(),
            mappings: Vec::new(),
        };

        for (map, lines) in parts {
            let offset = merged.sources.len() as u32;
            merged.sources.extend(map.sources.iter().cloned());
            merged.sources_content.extend(map.sources_content.iter().cloned());

            for i in 0..*lines {
                let origin = map.mappings.get(i).copied().flatten().map(|o| LineOrigin {
                    source: o.source + offset,
                    line: o.line,
                });
                merged.mappings.push(origin);
            }
        }

        merged
    }

    pub fn clear_mappings(&mut self) {
        self.mappings.clear();
    }

    pub fn set_file(&mut self, output: &Path) {
        self.file = file_name(output);
    }

    /// Encode the `mappings` field (base64 VLQ, one segment per line).
    pub fn encoded_mappings(&self) -> String {
        let mut out = String::new();
        let mut prev_source: i64 = 0;
        let mut prev_line: i64 = 0;

        for (i, origin) in self.mappings.iter().enumerate() {
            if i > 0 {
                out.push(';');
            }
            if let Some(o) = origin {
                let source = i64::from(o.source);
                let line = i64::from(o.line);
                encode_vlq(0, &mut out);
                encode_vlq(source - prev_source, &mut out);
                encode_vlq(line - prev_line, &mut out);
                encode_vlq(0, &mut out);
                prev_source = source;
                prev_line = line;
            }
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&WireMap {
            version: 3,
            file: &self.file,
            sources: &self.sources,
            sources_content: &self.sources_content,
            names: [],
            mappings: self.encoded_mappings(),
        })
    }
}

/// Number of `\n`-separated lines in `contents`.
pub fn line_count(contents: &str) -> usize {
    contents.split('\n').count()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn encode_vlq(value: i64, out: &mut String) {
    let mut vlq = if value < 0 {
        ((-value) << 1) | 1
    } else {
        value << 1
    };

    loop {
        let mut digit = (vlq & 0b11111) as usize;
        vlq >>= 5;
        if vlq > 0 {
            digit |= 0b100000;
        }
        out.push(BASE64[digit] as char);
        if vlq == 0 {
            break;
        }
    }
}
