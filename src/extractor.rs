// Icon extraction chain

use crate::extractors::utils::encode_png_base64;
use anyhow::{anyhow, bail};
use image::RgbaImage;
use std::time::Instant;

pub const DEFAULT_ICON_SIZE: u32 = crate::config::DEFAULT_ICON_SIZE;

/// Shell icon size classes for the file-type lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociatedSize {
    Large,
    Small,
}

/// An icon owned by the caller. Dropping it releases the native resource.
pub trait IconHandle {
    /// Draws the icon onto a transparent 32bpp canvas.
    fn rasterize(&self) -> anyhow::Result<RgbaImage>;
}

/// Native icon lookups, one per fallback step. `None` means no handle was produced.
pub trait IconSource {
    type Handle: IconHandle;

    fn fixed_size(&self, path: &str, index: i32, size: u32) -> Option<Self::Handle>;

    fn indexed(&self, path: &str, index: i32) -> Option<Self::Handle>;

    fn associated(&self, path: &str, size: AssociatedSize) -> Option<Self::Handle>;
}

/// Object-safe view of an extractor, shared by the scanners.
pub trait IconProvider {
    fn icon_base64(&self, path: &str, index: i32) -> anyhow::Result<String>;
}

pub struct IconExtractor<S> {
    source: S,
    size: u32,
}

impl<S: IconSource> IconExtractor<S> {
    pub fn new(source: S) -> Self {
        Self::with_size(source, DEFAULT_ICON_SIZE)
    }

    pub fn with_size(source: S, size: u32) -> Self {
        IconExtractor { source, size }
    }

    /// Base64 PNG of the icon at `path,index`. All or nothing.
    pub fn extract(&self, path: &str, index: i32) -> anyhow::Result<String> {
        if path.is_empty() {
            bail!("icon path is empty");
        }
        if index < 0 {
            bail!("icon index {index} is negative");
        }

        let start = Instant::now();
        let handle = self
            .acquire(path, index)
            .ok_or_else(|| anyhow!("no icon handle for {path},{index}"))?;
        let canvas = handle.rasterize()?;
        drop(handle);
        let encoded = encode_png_base64(&canvas)?;

        tracing::trace!(
            event = "icon_extracted",
            component = "icon_extractor",
            path,
            index,
            width = canvas.width(),
            height = canvas.height(),
            elapsed_ms = start.elapsed().as_millis() as u64
        );
        Ok(encoded)
    }

    fn acquire(&self, path: &str, index: i32) -> Option<S::Handle> {
        if let Some(handle) = self.source.fixed_size(path, index, self.size) {
            return Some(handle);
        }
        if let Some(handle) = self.source.indexed(path, index) {
            return Some(handle);
        }
        if index != 0 {
            if let Some(handle) = self.source.indexed(path, 0) {
                return Some(handle);
            }
        }
        self.source
            .associated(path, AssociatedSize::Large)
            .or_else(|| self.source.associated(path, AssociatedSize::Small))
    }
}

impl<S: IconSource> IconProvider for IconExtractor<S> {
    fn icon_base64(&self, path: &str, index: i32) -> anyhow::Result<String> {
        self.extract(path, index)
    }
}

/// Provider that never yields an icon, for builds with icon extraction turned off.
pub struct NoIcons;

impl IconProvider for NoIcons {
    fn icon_base64(&self, path: &str, _index: i32) -> anyhow::Result<String> {
        bail!("icon extraction disabled for {path}")
    }
}

/// Extracts and logs; icon failures never fail the owning entry.
pub fn icon_or_none(icons: &dyn IconProvider, path: &str, index: i32) -> Option<String> {
    match icons.icon_base64(path, index) {
        Ok(data) if !data.is_empty() => Some(data),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(
                event = "icon_extract_failed",
                component = "icon_extractor",
                path,
                index,
                error = %e
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeIconSource, Step};
    use base64::prelude::*;

    #[test]
    fn rejects_empty_path_and_negative_index() {
        let extractor = IconExtractor::new(FakeIconSource::default());
        assert!(extractor.extract("", 0).is_err());
        assert!(extractor.extract(r"C:\Prog\app.exe", -1).is_err());
        assert!(extractor.source.calls().is_empty());
    }

    #[test]
    fn first_step_wins() {
        let source = FakeIconSource::default().succeed_at(Step::FixedSize);
        let extractor = IconExtractor::new(source);
        let encoded = extractor.extract(r"C:\Prog\app.exe", 3).unwrap();
        let png = BASE64_STANDARD.decode(encoded).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        assert_eq!(extractor.source.calls(), vec![Step::FixedSize]);
        assert_eq!(extractor.source.released(), 1);
    }

    #[test]
    fn chain_order_retries_index_zero() {
        let source = FakeIconSource::default().succeed_at(Step::AssociatedSmall);
        let extractor = IconExtractor::with_size(source, 64);
        extractor.extract(r"C:\Prog\app.exe", 2).unwrap();
        assert_eq!(
            extractor.source.calls(),
            vec![
                Step::FixedSize,
                Step::Indexed(2),
                Step::Indexed(0),
                Step::AssociatedLarge,
                Step::AssociatedSmall,
            ]
        );
    }

    #[test]
    fn index_zero_is_not_retried() {
        let source = FakeIconSource::default();
        let extractor = IconExtractor::new(source);
        assert!(extractor.extract(r"C:\Prog\app.exe", 0).is_err());
        assert_eq!(
            extractor.source.calls(),
            vec![
                Step::FixedSize,
                Step::Indexed(0),
                Step::AssociatedLarge,
                Step::AssociatedSmall,
            ]
        );
    }

    #[test]
    fn zero_sized_canvas_fails_whole_extraction() {
        let source = FakeIconSource::default()
            .succeed_at(Step::Indexed(1))
            .with_canvas(0, 0);
        let extractor = IconExtractor::new(source);
        assert!(extractor.extract(r"C:\Prog\app.exe", 1).is_err());
        assert_eq!(extractor.source.released(), 1);
    }

    #[test]
    fn disabled_provider_yields_none() {
        assert_eq!(icon_or_none(&NoIcons, r"C:\a.exe", 0), None);
    }
}
