// In-memory stand-ins for host capabilities

use crate::extractor::{AssociatedSize, IconHandle, IconProvider, IconSource};
use crate::path::{extension, file_name, has_separator, HostPaths};
use crate::shell::ShellLauncher;
use crate::shortcut::{RawShortcut, ShortcutReader};
use crate::sources::installed_programs::{Hive, RegistryView, UninstallEntry, UninstallRegistry};
use crate::sources::search_index::{IndexBackend, IndexRow};
use crate::sources::uwp::{packaged_program, PackagedAppSource};
use crate::types::Program;
use anyhow::{anyhow, bail};
use image::RgbaImage;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

pub const TINY_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR4nGNgYGD4DwABBAEAwS2OUAAAAABJRU5ErkJggg==";

/// Host with a fixed set of existing files, matched case-insensitively.
pub struct FakeHost {
    files: Vec<String>,
    env: Vec<(String, String)>,
    full_path: bool,
}

impl Default for FakeHost {
    fn default() -> Self {
        FakeHost {
            files: Vec::new(),
            env: Vec::new(),
            full_path: true,
        }
    }
}

impl FakeHost {
    pub fn with_file(mut self, path: &str) -> Self {
        self.files.push(path.to_string());
        self
    }

    pub fn with_env(mut self, name: &str, value: &str) -> Self {
        self.env.push((name.to_string(), value.to_string()));
        self
    }

    pub fn without_full_path(mut self) -> Self {
        self.full_path = false;
        self
    }

    fn known(&self, path: &str) -> Option<&String> {
        self.files.iter().find(|f| f.eq_ignore_ascii_case(path))
    }
}

impl HostPaths for FakeHost {
    fn exists(&self, path: &str) -> bool {
        self.known(path).is_some()
    }

    fn search_path(&self, file: &str, default_ext: Option<&str>) -> Option<String> {
        let mut candidates = vec![file.to_string()];
        if let Some(ext) = default_ext {
            if extension(file).is_empty() {
                candidates.push(format!("{file}{ext}"));
            }
        }
        candidates.iter().find_map(|candidate| {
            if has_separator(candidate) {
                self.known(candidate).cloned()
            } else {
                self.files
                    .iter()
                    .find(|f| file_name(f).eq_ignore_ascii_case(candidate))
                    .cloned()
            }
        })
    }

    fn expand_env(&self, text: &str) -> String {
        self.env.iter().fold(text.to_string(), |acc, (name, value)| {
            acc.replace(&format!("%{name}%"), value)
        })
    }

    fn full_path(&self, path: &str) -> Option<String> {
        if !self.full_path {
            return None;
        }
        if !path.contains('\\') {
            return Some(path.to_string());
        }
        let mut parts: Vec<&str> = Vec::new();
        for segment in path.split('\\') {
            match segment {
                "." => {}
                ".." => {
                    if parts.len() > 1 {
                        parts.pop();
                    }
                }
                other => parts.push(other),
            }
        }
        Some(parts.join("\\"))
    }
}

#[derive(Default)]
pub struct FakeShortcuts {
    links: HashMap<String, RawShortcut>,
}

impl FakeShortcuts {
    pub fn with(mut self, lnk_path: &str, raw: RawShortcut) -> Self {
        self.links.insert(lnk_path.to_string(), raw);
        self
    }
}

impl ShortcutReader for FakeShortcuts {
    fn load(&self, lnk_path: &str) -> anyhow::Result<RawShortcut> {
        self.links
            .get(lnk_path)
            .cloned()
            .ok_or_else(|| anyhow!("not a shortcut: {lnk_path}"))
    }
}

/// Every path has an icon.
pub struct FakeIcons;

impl IconProvider for FakeIcons {
    fn icon_base64(&self, _path: &str, _index: i32) -> anyhow::Result<String> {
        Ok(TINY_PNG.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    FixedSize,
    Indexed(i32),
    AssociatedLarge,
    AssociatedSmall,
}

pub struct FakeHandle {
    width: u32,
    height: u32,
    released: Rc<Cell<usize>>,
}

impl IconHandle for FakeHandle {
    fn rasterize(&self) -> anyhow::Result<RgbaImage> {
        Ok(RgbaImage::from_pixel(self.width, self.height, image::Rgba([10, 20, 30, 255])))
    }
}

impl Drop for FakeHandle {
    fn drop(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

/// Icon source that succeeds at one step of the chain and records every attempt.
pub struct FakeIconSource {
    success: Option<Step>,
    canvas: (u32, u32),
    calls: RefCell<Vec<Step>>,
    released: Rc<Cell<usize>>,
}

impl Default for FakeIconSource {
    fn default() -> Self {
        FakeIconSource {
            success: None,
            canvas: (4, 4),
            calls: RefCell::new(Vec::new()),
            released: Rc::new(Cell::new(0)),
        }
    }
}

impl FakeIconSource {
    pub fn succeed_at(mut self, step: Step) -> Self {
        self.success = Some(step);
        self
    }

    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.canvas = (width, height);
        self
    }

    pub fn calls(&self) -> Vec<Step> {
        self.calls.borrow().clone()
    }

    pub fn released(&self) -> usize {
        self.released.get()
    }

    fn attempt(&self, step: Step) -> Option<FakeHandle> {
        self.calls.borrow_mut().push(step);
        (self.success == Some(step)).then(|| FakeHandle {
            width: self.canvas.0,
            height: self.canvas.1,
            released: Rc::clone(&self.released),
        })
    }
}

impl IconSource for FakeIconSource {
    type Handle = FakeHandle;

    fn fixed_size(&self, _path: &str, _index: i32, _size: u32) -> Option<FakeHandle> {
        self.attempt(Step::FixedSize)
    }

    fn indexed(&self, _path: &str, index: i32) -> Option<FakeHandle> {
        self.attempt(Step::Indexed(index))
    }

    fn associated(&self, _path: &str, size: AssociatedSize) -> Option<FakeHandle> {
        match size {
            AssociatedSize::Large => self.attempt(Step::AssociatedLarge),
            AssociatedSize::Small => self.attempt(Step::AssociatedSmall),
        }
    }
}

#[derive(Default)]
pub struct FakeRegistry {
    entries: Vec<(Hive, RegistryView, UninstallEntry)>,
    failing: Vec<(Hive, RegistryView)>,
}

impl FakeRegistry {
    pub fn with(mut self, hive: Hive, view: RegistryView, entry: UninstallEntry) -> Self {
        self.entries.push((hive, view, entry));
        self
    }

    pub fn failing(mut self, hive: Hive, view: RegistryView) -> Self {
        self.failing.push((hive, view));
        self
    }
}

impl UninstallRegistry for FakeRegistry {
    fn entries(&self, hive: Hive, view: RegistryView) -> anyhow::Result<Vec<UninstallEntry>> {
        if self.failing.contains(&(hive, view)) {
            bail!("access denied");
        }
        Ok(self
            .entries
            .iter()
            .filter(|(h, v, _)| *h == hive && *v == view)
            .map(|(_, _, entry)| entry.clone())
            .collect())
    }
}

pub struct FakeIndex {
    rows: Option<Vec<IndexRow>>,
    last_sql: RefCell<Option<String>>,
}

impl FakeIndex {
    pub fn with_rows(rows: Vec<IndexRow>) -> Self {
        FakeIndex {
            rows: Some(rows),
            last_sql: RefCell::new(None),
        }
    }

    pub fn failing() -> Self {
        FakeIndex {
            rows: None,
            last_sql: RefCell::new(None),
        }
    }

    pub fn last_sql(&self) -> Option<String> {
        self.last_sql.borrow().clone()
    }
}

impl IndexBackend for FakeIndex {
    fn run(&self, sql: &str) -> anyhow::Result<Vec<IndexRow>> {
        *self.last_sql.borrow_mut() = Some(sql.to_string());
        match &self.rows {
            Some(rows) => Ok(rows.clone()),
            None => bail!("provider not registered"),
        }
    }
}

#[derive(Default)]
pub struct FakeLauncher {
    fail: bool,
    launches: RefCell<Vec<(String, String)>>,
}

impl FakeLauncher {
    pub fn failing() -> Self {
        FakeLauncher {
            fail: true,
            ..Default::default()
        }
    }

    pub fn launches(&self) -> Vec<(String, String)> {
        self.launches.borrow().clone()
    }
}

impl ShellLauncher for FakeLauncher {
    fn launch(&self, path: &str, arguments: &str) -> anyhow::Result<()> {
        if self.fail {
            bail!("file not found");
        }
        self.launches
            .borrow_mut()
            .push((path.to_string(), arguments.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakePackagedApps {
    fail: bool,
}

impl FakePackagedApps {
    pub fn failing() -> Self {
        FakePackagedApps { fail: true }
    }
}

impl PackagedAppSource for FakePackagedApps {
    fn packaged_apps(&self, _logo_size: u32) -> anyhow::Result<Vec<Program>> {
        if self.fail {
            bail!("AppsFolder unavailable");
        }
        Ok(vec![packaged_program(
            "Calculator",
            "Microsoft.WindowsCalculator_8wekyb3d8bbwe!App",
            Some(TINY_PNG.to_string()),
        )])
    }
}

/// Log sink that keeps everything written to it.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(mut bytes) = self.0.lock() {
            bytes.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
