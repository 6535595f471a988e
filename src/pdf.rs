use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use log::{debug, info};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("unable to start `{}`", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to pass the html to `{}`", program.display())]
    WriteInput {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to wait for `{}`", program.display())]
    Wait {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("`{}` failed to create `{}` ({status})", program.display(), output.display())]
    Failed {
        program: PathBuf,
        output: PathBuf,
        status: ExitStatus,
    },
}

/// Converts html to pdf by piping it into an external program
/// (`wkhtmltopdf` by default).
#[derive(Debug, Clone)]
pub struct PdfConverter {
    program: PathBuf,
    /// Passed before the input and output arguments.
    args: Vec<OsString>,
}

impl Default for PdfConverter {
    fn default() -> Self {
        Self::new("wkhtmltopdf")
    }
}

impl PdfConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs `<program> [args] - <output>` with the html on stdin.
    ///
    /// The output of the program is forwarded to stdout. This returns once
    /// the program exited, also when passing the html failed.
    pub fn convert(&self, html: &str, output: impl AsRef<Path>) -> Result<(), ConversionError> {
        let output = output.as_ref();
        info!("converting html to `{}`", output.display());

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg("-")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .spawn()
            .map_err(|source| ConversionError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // stdin has to be closed before waiting, otherwise the child never sees EOF
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(html.as_bytes()),
            None => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "stdin of the child is not available",
            )),
        };

        let status = child.wait().map_err(|source| ConversionError::Wait {
            program: self.program.clone(),
            source,
        })?;
        debug!("`{}` exited with {}", self.program.display(), status);

        if !status.success() {
            return Err(ConversionError::Failed {
                program: self.program.clone(),
                output: output.to_path_buf(),
                status,
            });
        }

        written.map_err(|source| ConversionError::WriteInput {
            program: self.program.clone(),
            source,
        })
    }
}
