//! Output sinks for generated source units
//!
//! A sink hands out one writable unit per generated class. A unit name can
//! be created only once per sink.

use parcelgen_model::DeclId;
use rustc_hash::FxHashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// A writable generated unit
pub trait SourceUnit: Write {
    /// Flush and finish the unit
    fn close(self: Box<Self>) -> io::Result<()>;
}

/// Destination for generated units
pub trait OutputSink {
    /// Open a unit for the fully qualified generated class `name`
    ///
    /// `origin` is the declaration the unit was generated for.
    fn create_unit(&mut self, name: &str, origin: DeclId) -> io::Result<Box<dyn SourceUnit + '_>>;
}

fn already_created(name: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("Attempt to recreate a file for type {name}"),
    )
}

/// A unit written to a [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Fully qualified generated class name
    pub name: String,
    /// Originating declaration
    pub origin: DeclId,
    /// Unit contents
    pub text: String,
}

/// Keeps generated units in memory
///
/// A unit is recorded when it is closed; a unit dropped without closing is
/// discarded.
#[derive(Debug, Default)]
pub struct MemorySink {
    units: Vec<GeneratedUnit>,
    created: FxHashSet<String>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Units closed so far, in order
    pub fn units(&self) -> &[GeneratedUnit] {
        &self.units
    }

    /// Unit by fully qualified name
    pub fn unit(&self, name: &str) -> Option<&GeneratedUnit> {
        self.units.iter().find(|unit| unit.name == name)
    }

    /// Take the closed units
    pub fn into_units(self) -> Vec<GeneratedUnit> {
        self.units
    }
}

struct MemoryUnit<'a> {
    sink: &'a mut Vec<GeneratedUnit>,
    name: String,
    origin: DeclId,
    buffer: Vec<u8>,
}

impl Write for MemoryUnit<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SourceUnit for MemoryUnit<'_> {
    fn close(self: Box<Self>) -> io::Result<()> {
        let unit = *self;
        let text = String::from_utf8(unit.buffer)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        unit.sink.push(GeneratedUnit {
            name: unit.name,
            origin: unit.origin,
            text,
        });
        Ok(())
    }
}

impl OutputSink for MemorySink {
    fn create_unit(&mut self, name: &str, origin: DeclId) -> io::Result<Box<dyn SourceUnit + '_>> {
        if !self.created.insert(name.to_string()) {
            return Err(already_created(name));
        }
        Ok(Box::new(MemoryUnit {
            sink: &mut self.units,
            name: name.to_string(),
            origin,
            buffer: Vec::new(),
        }))
    }
}

/// Writes each unit to `<root>/<package path>/<Class>.java`
#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
    created: FxHashSet<String>,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Create a sink rooted at `root`; directories are created on demand
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectorySink {
            root: root.into(),
            created: FxHashSet::default(),
            written: Vec::new(),
        }
    }

    /// Output root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths of the units opened so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// File path for a fully qualified class name
    pub fn path_for(&self, name: &str) -> PathBuf {
        let mut path = self.root.clone();
        let (package, class) = name.rsplit_once('.').unwrap_or(("", name));
        for segment in package.split('.').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(format!("{class}.java"));
        path
    }
}

struct FileUnit {
    writer: BufWriter<File>,
}

impl Write for FileUnit {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl SourceUnit for FileUnit {
    fn close(self: Box<Self>) -> io::Result<()> {
        let file = self.writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()
    }
}

impl OutputSink for DirectorySink {
    fn create_unit(&mut self, name: &str, _origin: DeclId) -> io::Result<Box<dyn SourceUnit + '_>> {
        if self.created.contains(name) {
            return Err(already_created(name));
        }
        let path = self.path_for(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)?;
        self.created.insert(name.to_string());
        self.written.push(path);
        Ok(Box::new(FileUnit {
            writer: BufWriter::new(file),
        }))
    }
}
