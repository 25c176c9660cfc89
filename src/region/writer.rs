use std::fmt;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::color::MarkerColor;
use crate::error::ExportError;

/// First header line; the annotation viewer expects it verbatim.
pub const GLOBAL_STYLE: &str = "global color=green dashlist=8 3 width=1 \
font=\"helvetica 10 normal roman\" select=1 highlite=1 dash=0 fixed=0 edit=1 \
move=1 delete=1 include=1 source=1";

/// Circle radius for every marker. The same literal is used in image
/// frames, where the arcsecond mark has no pixel meaning.
pub const MARKER_RADIUS: &str = "0.1\"";

/// Coordinate-frame directive on the second header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Fk5,
    Image,
}

impl Frame {
    pub fn directive(self) -> &'static str {
        match self {
            Frame::Fk5 => "fk5",
            Frame::Image => "image",
        }
    }
}

/// One `circle(...)` line, formatted on demand and never retained.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMarker {
    pub first: String,
    pub second: String,
    pub color: MarkerColor,
}

impl fmt::Display for RegionMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "circle({},{},{MARKER_RADIUS}){}",
            self.first,
            self.second,
            self.color.suffix()
        )
    }
}

/// Streams a region file: header on construction, one line per marker.
pub struct RegionWriter<W: Write> {
    inner: W,
    markers: usize,
    highlighted: usize,
}

impl<W: Write> RegionWriter<W> {
    pub fn new(mut inner: W, frame: Frame) -> io::Result<Self> {
        writeln!(inner, "{GLOBAL_STYLE}")?;
        writeln!(inner, "{}", frame.directive())?;
        Ok(RegionWriter {
            inner,
            markers: 0,
            highlighted: 0,
        })
    }

    pub fn write_marker(&mut self, marker: &RegionMarker) -> io::Result<()> {
        writeln!(self.inner, "{marker}")?;
        self.markers += 1;
        if marker.color != MarkerColor::Default {
            self.highlighted += 1;
        }
        Ok(())
    }

    /// Flush and hand back the sink with (markers, highlighted) counts.
    pub fn finish(mut self) -> io::Result<(W, usize, usize)> {
        self.inner.flush()?;
        Ok((self.inner, self.markers, self.highlighted))
    }
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub output_path: PathBuf,
    pub markers: usize,
    pub highlighted: usize,
}

/// Write a complete region file to `path`.
///
/// Lines go to a temporary file next to `path`, which replaces `path` only
/// after the last marker is flushed. Any error, including one yielded by
/// `markers`, leaves an existing file at `path` untouched.
pub fn write_region_file<I>(path: &Path, frame: Frame, markers: I) -> Result<ExportSummary, ExportError>
where
    I: IntoIterator<Item = Result<RegionMarker, ExportError>>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let tmp = NamedTempFile::new_in(dir).map_err(|e| ExportError::io(dir, e))?;

    let io_err = |e| ExportError::io(path, e);
    let mut writer = RegionWriter::new(BufWriter::new(tmp), frame).map_err(io_err)?;
    for marker in markers {
        writer.write_marker(&marker?).map_err(io_err)?;
    }
    let (buffered, markers, highlighted) = writer.finish().map_err(io_err)?;
    let tmp = buffered
        .into_inner()
        .map_err(|e| ExportError::io(path, e.into_error()))?;

    tmp.as_file().sync_all().map_err(io_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(io_err)?;
    }

    tmp.persist(path).map_err(|e| ExportError::io(path, e.error))?;

    Ok(ExportSummary {
        output_path: path.to_path_buf(),
        markers,
        highlighted,
    })
}
