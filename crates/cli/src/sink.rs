//! Directory page sink

use layout::ledger::PageId;
use layout::{LayoutError, PageSink};
use page_canvas::{OutputFormat, PageCanvas};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes every page as an image file into one directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    format: OutputFormat,
}

impl DirectorySink {
    /// Create the directory if needed
    pub fn create<P: AsRef<Path>>(dir: P, format: OutputFormat) -> layout::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, format })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PageSink for DirectorySink {
    fn format(&self) -> OutputFormat {
        self.format
    }

    fn file_name(&self, page_id: PageId) -> String {
        format!("page_{:06}.{}", page_id, self.format.extension())
    }

    fn write_page(&self, file_ref: &str, canvas: &PageCanvas) -> layout::Result<()> {
        let path = self.dir.join(file_ref);
        canvas.save(&path, self.format).map_err(LayoutError::from)?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }
}
