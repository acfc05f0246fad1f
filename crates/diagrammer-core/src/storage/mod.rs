//! Export artifacts and file persistence for diagrams.

mod file;

pub use file::{read_diagram_file, write_artifact};

use crate::error::EditorResult;
use crate::scene::Scene;

/// Default file name offered for exports.
pub const EXPORT_FILE_NAME: &str = "diagram.json";

/// MIME type of exported diagrams.
pub const EXPORT_MIME_TYPE: &str = "application/json";

/// An encoded diagram ready to hand to a save/download collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Encode `scene` under the default name.
    pub fn from_scene(scene: &Scene) -> EditorResult<Self> {
        Ok(Self {
            file_name: EXPORT_FILE_NAME.to_string(),
            mime_type: EXPORT_MIME_TYPE.to_string(),
            bytes: scene.serialize()?,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
