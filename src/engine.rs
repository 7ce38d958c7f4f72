use std::io::{self, Write};
use std::process::{Command, Stdio};

use log::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

/// An external engine that rasterizes DOT text.
pub trait RenderEngine {
    fn render(&self, dot: &str, format: ImageFormat) -> Result<Vec<u8>>;
}

/// Runs the Graphviz `dot` executable, feeding the description on stdin.
#[derive(Debug, Clone)]
pub struct Graphviz {
    program: String,
}

impl Graphviz {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Graphviz {
    fn default() -> Self {
        Self::new("dot")
    }
}

impl RenderEngine for Graphviz {
    fn render(&self, dot: &str, format: ImageFormat) -> Result<Vec<u8>> {
        debug!(program = self.program.as_str(), format = format.extension(); "Invoking Graphviz");
        let mut child = Command::new(&self.program)
            .arg(format!("-T{}", format.extension()))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| Error::Generation(format!("failed to run `{}`: {err}", self.program)))?;

        // stdin is fed from its own thread so a chatty stderr cannot fill its
        // pipe while we are still writing.
        let stdin = child.stdin.take();
        let (written, output) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(dot.as_bytes()),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, output)
        });
        let output = output.map_err(Error::generation)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Generation(format!(
                "`{}` exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        // An early exit shows up as a broken pipe; the exit status above
        // already covers the failing case.
        match written {
            Err(err) if err.kind() != io::ErrorKind::BrokenPipe => Err(Error::generation(err)),
            _ => Ok(output.stdout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_a_generation_error() {
        let engine = Graphviz::new("crmviz-definitely-not-a-program");
        let err = engine.render("digraph G {}", ImageFormat::Svg).unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
        assert!(err.to_string().starts_with("generation failed"));
    }

    #[cfg(unix)]
    #[test]
    fn early_exit_reports_status_not_broken_pipe() {
        // `sh` rejects `-Tsvg` and exits without reading its input.
        let engine = Graphviz::new("sh");
        let big = format!("digraph G {{ {} }}", "a -> b; ".repeat(200_000));
        let err = engine.render(&big, ImageFormat::Svg).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("`sh` exited with"), "{message}");
        assert!(!message.to_lowercase().contains("broken pipe"), "{message}");
    }

    #[test]
    fn format_extensions() {
        assert_eq!(ImageFormat::Svg.extension(), "svg");
        assert_eq!(ImageFormat::Png.extension(), "png");
    }
}
