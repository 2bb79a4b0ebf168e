use crate::error::Result;
use crate::models::{CreativeItem, CreativePackage, RunMetadata};
use image::RgbaImage;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writes one run's files into a caller-owned working directory and bundles
/// them into a single deflate-compressed archive. The caller controls the
/// directory's lifetime (the demo binary hands in a `tempfile::TempDir`
/// path so everything is released on every exit path).
pub struct PackageAssembler {
    out_dir: PathBuf,
}

impl PackageAssembler {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Keeps copies of the uploaded inputs alongside the outputs. The
    /// product image is persisted only; it is never composited.
    pub fn persist_inputs(&self, logo: &RgbaImage, product: &RgbaImage) -> Result<()> {
        logo.save(self.out_dir.join("logo.png"))?;
        product.save(self.out_dir.join("product.png"))?;
        Ok(())
    }

    /// Writes `creative_<i>.png` and `caption_<i>.txt` per item plus
    /// `metadata.json`, then archives them under their bare names. The
    /// archive name carries a short random suffix so packages from separate
    /// runs never collide.
    pub fn assemble(
        &self,
        items: &[CreativeItem],
        metadata: &RunMetadata,
    ) -> Result<CreativePackage> {
        let mut entries: Vec<(PathBuf, String)> = Vec::new();

        for item in items {
            let image_name = item.image_filename();
            let image_path = self.out_dir.join(&image_name);
            item.image.save(&image_path)?;
            entries.push((image_path, image_name));

            let caption_name = item.caption_filename();
            let caption_path = self.out_dir.join(&caption_name);
            fs::write(&caption_path, &item.caption)?;
            entries.push((caption_path, caption_name));
        }

        let metadata_path = self.out_dir.join("metadata.json");
        fs::write(&metadata_path, serde_json::to_string_pretty(metadata)?)?;
        entries.push((metadata_path, "metadata.json".to_string()));

        let suffix = Uuid::new_v4().simple().to_string();
        let archive_name = format!("{}_creatives_{}.zip", metadata.brand, &suffix[..6]);
        let archive_path = self.out_dir.join(&archive_name);
        write_archive(&archive_path, &entries)?;

        log::info!(
            "Packaged {} creative(s) into {}",
            items.len(),
            archive_path.display()
        );

        Ok(CreativePackage {
            archive_path,
            archive_name,
            item_count: items.len(),
        })
    }
}

fn write_archive(archive_path: &Path, entries: &[(PathBuf, String)]) -> Result<()> {
    let mut writer = ZipWriter::new(File::create(archive_path)?);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, name) in entries {
        writer.start_file(name.clone(), options)?;
        writer.write_all(&fs::read(path)?)?;
    }

    writer.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn item(index: usize) -> CreativeItem {
        CreativeItem {
            prompt_index: index,
            image: RgbaImage::from_pixel(8, 8, Rgba([0, 128, 255, 255])),
            caption: format!("Caption {}...", index),
            source_prompt: format!("Prompt {}", index),
        }
    }

    fn metadata_for(items: &[CreativeItem]) -> RunMetadata {
        let mut metadata = RunMetadata::new("Acme", "wireless earbuds");
        for item in items {
            metadata.record(item);
        }
        metadata
    }

    fn archive_names(package: &CreativePackage) -> BTreeSet<String> {
        let file = File::open(&package.archive_path).unwrap();
        let archive = zip::ZipArchive::new(file).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn archive_holds_every_item_plus_metadata() {
        let dir = TempDir::new().unwrap();
        let assembler = PackageAssembler::new(dir.path());
        let items = vec![item(1), item(2)];
        let package = assembler.assemble(&items, &metadata_for(&items)).unwrap();

        assert_eq!(package.item_count, 2);
        assert!(package.archive_name.starts_with("Acme_creatives_"));
        assert!(package.archive_name.ends_with(".zip"));

        let names = archive_names(&package);
        let expected: BTreeSet<String> = [
            "creative_1.png",
            "caption_1.txt",
            "creative_2.png",
            "caption_2.txt",
            "metadata.json",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn partial_run_packages_only_surviving_indices() {
        let dir = TempDir::new().unwrap();
        let assembler = PackageAssembler::new(dir.path());
        // Index 2 survived, index 1 was skipped upstream.
        let items = vec![item(2)];
        let package = assembler.assemble(&items, &metadata_for(&items)).unwrap();

        let names = archive_names(&package);
        assert_eq!(names.len(), 3);
        assert!(names.contains("creative_2.png"));
        assert!(names.contains("caption_2.txt"));
        assert!(!names.contains("creative_1.png"));
    }

    #[test]
    fn metadata_file_round_trips() {
        let dir = TempDir::new().unwrap();
        let assembler = PackageAssembler::new(dir.path());
        let items = vec![item(1)];
        assembler.assemble(&items, &metadata_for(&items)).unwrap();

        let raw = fs::read_to_string(dir.path().join("metadata.json")).unwrap();
        let parsed: RunMetadata = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.brand, "Acme");
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].image, "creative_1.png");
    }

    #[test]
    fn archive_names_differ_across_runs() {
        let dir = TempDir::new().unwrap();
        let assembler = PackageAssembler::new(dir.path());
        let items = vec![item(1)];
        let metadata = metadata_for(&items);
        let first = assembler.assemble(&items, &metadata).unwrap();
        let second = assembler.assemble(&items, &metadata).unwrap();
        assert_ne!(first.archive_name, second.archive_name);
    }

    #[test]
    fn inputs_are_persisted_beside_outputs() {
        let dir = TempDir::new().unwrap();
        let assembler = PackageAssembler::new(dir.path());
        let logo = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        let product = RgbaImage::from_pixel(4, 4, Rgba([0, 255, 0, 255]));
        assembler.persist_inputs(&logo, &product).unwrap();

        assert!(dir.path().join("logo.png").exists());
        assert!(dir.path().join("product.png").exists());
    }
}
