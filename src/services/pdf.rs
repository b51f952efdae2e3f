use async_trait::async_trait;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF command is empty")]
    EmptyCommand,

    #[error("Failed to run PDF command: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF command exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

/// Rasterizes an HTML document into PDF bytes
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str) -> Result<Vec<u8>, PdfError>;
}

/// Pipes HTML through an external program (HTML on stdin, PDF on stdout)
#[derive(Debug, Clone)]
pub struct CommandPdfRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandPdfRenderer {
    pub fn new(command: &[String]) -> Result<Self, PdfError> {
        let (program, args) = command.split_first().ok_or(PdfError::EmptyCommand)?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl PdfRenderer for CommandPdfRenderer {
    async fn render(&self, html: &str) -> Result<Vec<u8>, PdfError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdin not captured")
        })?;

        // Feed stdin while collecting stdout so a large document cannot fill both pipes
        let feed = async move {
            let written = stdin.write_all(html.as_bytes()).await;
            drop(stdin);
            written
        };
        let (written, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            return Err(PdfError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;

        tracing::debug!("Rendered {} bytes of PDF via {}", output.stdout.len(), self.program);
        Ok(output.stdout)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn empty_command_is_rejected() {
        assert!(matches!(CommandPdfRenderer::new(&[]), Err(PdfError::EmptyCommand)));
    }

    #[tokio::test]
    async fn pipes_html_through_command() {
        let renderer = CommandPdfRenderer::new(&["cat".to_string()]).unwrap();
        let bytes = renderer.render("<p>hello</p>").await.unwrap();
        assert_eq!(bytes, b"<p>hello</p>");
    }

    #[tokio::test]
    async fn non_zero_exit_is_an_error() {
        let renderer = CommandPdfRenderer::new(&["false".to_string()]).unwrap();
        assert!(matches!(renderer.render("x").await, Err(PdfError::Failed { .. })));
    }
}
