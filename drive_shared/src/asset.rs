//! Vehicle asset loading.
//!
//! The model is loaded once at startup, off the frame loop. Loaders only check
//! that the file is a binary glTF container; decoding meshes is the renderer's
//! business.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

/// Binary glTF magic (`glTF`, little endian).
pub const GLB_MAGIC: [u8; 4] = *b"glTF";
/// The only container version accepted.
pub const GLB_VERSION: u32 = 2;
const GLB_HEADER_LEN: usize = 12;

/// A loaded vehicle model.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleModel {
    pub name: String,
    /// Raw container bytes, trimmed to the declared length.
    pub bytes: Bytes,
}

/// Parsed GLB file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlbHeader {
    pub version: u32,
    pub length: u32,
}

/// Validates the 12-byte GLB header at the start of `bytes`.
pub fn parse_glb_header(bytes: &[u8]) -> anyhow::Result<GlbHeader> {
    if bytes.len() < GLB_HEADER_LEN {
        bail!("file too short for a GLB header ({} bytes)", bytes.len());
    }
    if bytes[0..4] != GLB_MAGIC {
        bail!("missing glTF magic");
    }
    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version != GLB_VERSION {
        bail!("unsupported GLB version {version}");
    }
    let length = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
    if (length as usize) < GLB_HEADER_LEN || length as usize > bytes.len() {
        bail!(
            "GLB declares {length} bytes but file has {}",
            bytes.len()
        );
    }
    Ok(GlbHeader { version, length })
}

/// Source of vehicle models.
#[async_trait]
pub trait AssetLoader: Send + Sync {
    async fn load(&self, path: &str) -> anyhow::Result<VehicleModel>;
}

/// Loads models from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsAssetLoader {
    root: PathBuf,
}

impl FsAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl AssetLoader for FsAssetLoader {
    async fn load(&self, path: &str) -> anyhow::Result<VehicleModel> {
        let full = self.root.join(path);
        let raw = tokio::fs::read(&full)
            .await
            .with_context(|| format!("read model {}", full.display()))?;
        let header =
            parse_glb_header(&raw).with_context(|| format!("parse model {}", full.display()))?;
        debug!(path = %full.display(), version = header.version, length = header.length, "Model read");

        let mut bytes = Bytes::from(raw);
        bytes.truncate(header.length as usize);
        let name = full
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        Ok(VehicleModel { name, bytes })
    }
}

/// Builds a minimal valid GLB container with an empty JSON chunk.
pub fn minimal_glb() -> Vec<u8> {
    let json = br#"{"asset":{"version":"2.0"}} "#;
    let total = (GLB_HEADER_LEN + 8 + json.len()) as u32;
    let mut out = Vec::with_capacity(total as usize);
    out.extend_from_slice(&GLB_MAGIC);
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&total.to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(json);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_container_parses() {
        let glb = minimal_glb();
        let header = parse_glb_header(&glb).unwrap();
        assert_eq!(header.version, 2);
        assert_eq!(header.length as usize, glb.len());
        // JSON chunk payloads are padded to four bytes.
        assert_eq!(glb.len() % 4, 0);
    }

    #[test]
    fn rejects_bad_headers() {
        assert!(parse_glb_header(b"glTF").is_err());

        let mut wrong_magic = minimal_glb();
        wrong_magic[0] = b'x';
        assert!(parse_glb_header(&wrong_magic).is_err());

        let mut v1 = minimal_glb();
        v1[4] = 1;
        assert!(parse_glb_header(&v1).is_err());

        let mut truncated = minimal_glb();
        truncated.truncate(16);
        assert!(parse_glb_header(&truncated).is_err());
    }

    #[tokio::test]
    async fn fs_loader_reports_missing_file() {
        let loader = FsAssetLoader::new(std::env::temp_dir());
        let err = loader
            .load("drive_shared_no_such_model.glb")
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("read model"));
    }

    #[tokio::test]
    async fn fs_loader_reads_valid_model() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("drive_shared_asset_{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await?;
        let mut glb = minimal_glb();
        glb.extend_from_slice(&[0u8; 4]);
        tokio::fs::write(dir.join("car.glb"), &glb).await?;

        let model = FsAssetLoader::new(&dir).load("car.glb").await?;
        assert_eq!(model.name, "car");
        assert_eq!(model.bytes.len(), glb.len() - 4);

        tokio::fs::remove_dir_all(&dir).await?;
        Ok(())
    }
}
