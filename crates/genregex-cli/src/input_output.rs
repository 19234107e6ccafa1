use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

/// A stream argument; absent or `-` means the standard stream.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Stream {
    Standard,
    Path(PathBuf),
}

impl Stream {
    fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("-") => Self::Standard,
            Some(path) => Self::Path(PathBuf::from(path)),
        }
    }
}

fn annotate(
    what: &str,
    path: &Path,
    err: io::Error,
) -> io::Error {
    io::Error::new(
        err.kind(),
        format!("cannot open {what} \"{}\": {err}", path.display()),
    )
}

/// Subject lines to match.
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// File of subject lines, one per line; "-" or absent reads stdin.
    #[clap(long, default_value = None)]
    pub input: Option<String>,
}

impl InputArgs {
    /// Open the subject line reader.
    pub fn open_reader(&self) -> io::Result<Box<dyn BufRead>> {
        Ok(match Stream::from_arg(self.input.as_deref()) {
            Stream::Standard => Box::new(io::stdin().lock()),
            Stream::Path(path) => Box::new(BufReader::new(
                File::open(&path).map_err(|err| annotate("input", &path, err))?,
            )),
        })
    }
}

/// Where reports go.
#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Report file; "-" or absent writes stdout.
    #[clap(long, default_value = None)]
    pub output: Option<String>,
}

impl OutputArgs {
    /// Open the report writer.
    pub fn open_writer(&self) -> io::Result<Box<dyn Write>> {
        Ok(match Stream::from_arg(self.output.as_deref()) {
            Stream::Standard => Box::new(BufWriter::new(io::stdout().lock())),
            Stream::Path(path) => Box::new(BufWriter::new(
                File::create(&path).map_err(|err| annotate("output", &path, err))?,
            )),
        })
    }
}
