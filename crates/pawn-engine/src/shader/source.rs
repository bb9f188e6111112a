use std::path::{Path, PathBuf};

use crate::error::ShaderError;

use super::Stage;

/// Directory, next to the executable, that holds shader files.
pub const SHADER_DIR: &str = "shaders";

/// Marker token that opens a section.
const SECTION_MARKER: &str = "#shader";

/// Vertex and fragment source text split out of a shader file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    #[inline]
    pub fn stage(&self, stage: Stage) -> &str {
        match stage {
            Stage::Vertex => &self.vertex,
            Stage::Fragment => &self.fragment,
        }
    }
}

/// Splits a dual-section shader file.
///
/// A line containing `#shader` switches the current section to `vertex` or
/// `fragment` depending on which word it contains; a marker naming neither
/// leaves the current section unchanged. All other lines are appended, with a
/// trailing newline, to the current section. Lines before the first marker are
/// dropped.
///
/// Both sections must end up non-blank.
pub fn parse_shader(text: &str) -> Result<ShaderSource, ShaderError> {
    let mut source = ShaderSource::default();
    let mut current: Option<Stage> = None;

    for line in text.lines() {
        if line.contains(SECTION_MARKER) {
            if line.contains("vertex") {
                current = Some(Stage::Vertex);
            }
            if line.contains("fragment") {
                current = Some(Stage::Fragment);
            }
            continue;
        }

        let Some(stage) = current else { continue };
        let buf = match stage {
            Stage::Vertex => &mut source.vertex,
            Stage::Fragment => &mut source.fragment,
        };
        buf.push_str(line);
        buf.push('\n');
    }

    for stage in [Stage::Vertex, Stage::Fragment] {
        if source.stage(stage).trim().is_empty() {
            return Err(ShaderError::MissingSection(stage));
        }
    }

    Ok(source)
}

/// Reads and splits a shader file.
pub fn load_shader_source(path: &Path) -> Result<ShaderSource, ShaderError> {
    let text = std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("read shader file {} ({} bytes)", path.display(), text.len());
    parse_shader(&text)
}

/// Resolves `name` inside [`SHADER_DIR`] next to the executable at `exe`.
pub fn shader_path(exe: &Path, name: &str) -> PathBuf {
    exe.parent()
        .unwrap_or_else(|| Path::new("."))
        .join(SHADER_DIR)
        .join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_sections_by_marker() {
        let text = "#shader vertex\nvs line 1\nvs line 2\n#shader fragment\nfs line\n";
        let src = parse_shader(text).unwrap();
        assert_eq!(src.vertex, "vs line 1\nvs line 2\n");
        assert_eq!(src.fragment, "fs line\n");
    }

    #[test]
    fn fragment_may_come_first() {
        let src = parse_shader("#shader fragment\nf\n#shader vertex\nv\n").unwrap();
        assert_eq!(src.vertex, "v\n");
        assert_eq!(src.fragment, "f\n");
    }

    #[test]
    fn lines_before_first_marker_are_dropped() {
        let src = parse_shader("preamble\n#shader vertex\nv\n#shader fragment\nf").unwrap();
        assert_eq!(src.vertex, "v\n");
        assert_eq!(src.fragment, "f\n");
    }

    #[test]
    fn unnamed_marker_keeps_current_section() {
        let src = parse_shader("#shader vertex\na\n#shader\nb\n#shader fragment\nc\n").unwrap();
        assert_eq!(src.vertex, "a\nb\n");
    }

    #[test]
    fn repeated_sections_accumulate() {
        let text = "#shader vertex\na\n#shader fragment\nb\n#shader vertex\nc\n";
        let src = parse_shader(text).unwrap();
        assert_eq!(src.vertex, "a\nc\n");
    }

    #[test]
    fn missing_section_is_an_error() {
        let err = parse_shader("#shader vertex\nv\n").unwrap_err();
        assert!(matches!(err, ShaderError::MissingSection(Stage::Fragment)));

        let err = parse_shader("#shader vertex\n\n  \n#shader fragment\nf\n").unwrap_err();
        assert!(matches!(err, ShaderError::MissingSection(Stage::Vertex)));
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("/definitely/not/here/pawn.shader");
        let err = load_shader_source(path).unwrap_err();
        match err {
            ShaderError::Io { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn shader_path_is_beside_executable() {
        let p = shader_path(Path::new("/opt/pawn/bin/pawn-viewer"), "pawn.shader");
        assert_eq!(p, Path::new("/opt/pawn/bin/shaders/pawn.shader"));
    }
}
