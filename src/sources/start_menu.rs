// Start menu shortcuts

use crate::extractor::{icon_or_none, IconProvider};
use crate::path::{normalize_path, HostPaths};
use crate::shortcut::ShortcutResolver;
use crate::sources::scanner::ProgramScanner;
use crate::types::{Kind, Program, Source};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

const COMPONENT: &str = "start_menu_scanner";
const UNNAMED: &str = "Unnamed Shortcut Program";

pub struct StartMenuScanner<'a> {
    roots: Vec<(PathBuf, Source)>,
    resolver: ShortcutResolver<'a>,
    host: &'a dyn HostPaths,
    icons: &'a dyn IconProvider,
}

impl<'a> StartMenuScanner<'a> {
    pub fn new(
        roots: Vec<(PathBuf, Source)>,
        resolver: ShortcutResolver<'a>,
        host: &'a dyn HostPaths,
        icons: &'a dyn IconProvider,
    ) -> Self {
        StartMenuScanner { roots, resolver, host, icons }
    }

    /// Common programs folder first, then the user's.
    #[cfg(target_os = "windows")]
    pub fn system_roots() -> Vec<(PathBuf, Source)> {
        let mut roots = Vec::new();
        match crate::path::common_start_menu_programs_path() {
            Ok(path) => roots.push((path, Source::StartMenuCommon)),
            Err(e) => tracing::warn!(event = "start_menu_root_unavailable", component = COMPONENT, source = %Source::StartMenuCommon, error = %e),
        }
        match crate::path::start_menu_programs_path() {
            Ok(path) => roots.push((path, Source::StartMenuUser)),
            Err(e) => tracing::warn!(event = "start_menu_root_unavailable", component = COMPONENT, source = %Source::StartMenuUser, error = %e),
        }
        roots
    }

    fn scan_root(&self, root: &Path, source: Source, programs: &mut Vec<Program>) {
        if !root.is_dir() {
            tracing::debug!(event = "start_menu_root_missing", component = COMPONENT, root = %root.display());
            return;
        }

        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(event = "start_menu_entry_unreadable", component = COMPONENT, error = %e);
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_shortcut(entry.path()) {
                continue;
            }
            if let Some(program) = self.program_from_shortcut(entry.path(), source) {
                programs.push(program);
            }
        }
    }

    fn program_from_shortcut(&self, lnk: &Path, source: Source) -> Option<Program> {
        let lnk_path = lnk.to_string_lossy().to_string();
        let info = match self.resolver.resolve(&lnk_path) {
            Ok(info) => info,
            Err(e) => {
                tracing::debug!(event = "shortcut_skipped", component = COMPONENT, path = %lnk_path, error = %e);
                return None;
            }
        };

        let name = lnk
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| UNNAMED.to_string());

        let executable_path = if info.is_fallback_path {
            normalize_path(self.host, &lnk_path)
        } else {
            info.resolved_target_path
        };
        if executable_path.is_empty() {
            return None;
        }

        let (icon_path, icon_index) = if info.icon_path.is_empty() {
            (executable_path.clone(), 0)
        } else {
            (info.icon_path, info.icon_index.max(0))
        };
        let icon_data = info
            .icon_data
            .filter(|data| !data.is_empty())
            .or_else(|| icon_or_none(self.icons, &icon_path, icon_index));

        let mut program = Program::new(name, executable_path, source, Kind::Link);
        program.arguments = info.arguments;
        program.icon_path = icon_path;
        program.icon_index = icon_index;
        program.icon_data = icon_data;
        if !info.description.is_empty() {
            program.description = Some(info.description);
        }
        Some(program)
    }
}

impl ProgramScanner for StartMenuScanner<'_> {
    fn id(&self) -> &'static str {
        "start_menu"
    }

    fn scan(&self) -> anyhow::Result<Vec<Program>> {
        let start = Instant::now();
        let mut programs = Vec::new();
        for (root, source) in &self.roots {
            let before = programs.len();
            self.scan_root(root, *source, &mut programs);
            tracing::debug!(
                event = "start_menu_root_scanned",
                component = COMPONENT,
                root = %root.display(),
                found = programs.len() - before
            );
        }
        tracing::info!(
            event = "start_menu_scan_finished",
            component = COMPONENT,
            kept = programs.len(),
            elapsed_ms = start.elapsed().as_millis() as u64
        );
        Ok(programs)
    }
}

fn is_shortcut(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("lnk"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcut::RawShortcut;
    use crate::testing::{FakeHost, FakeIcons, FakeShortcuts};
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    fn lossy(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    #[test]
    fn resolves_shortcuts_recursively_and_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("Vendor").join("Tool.LNK");
        let readme = dir.path().join("Vendor").join("readme.txt");
        touch(&tool);
        touch(&readme);

        let host = FakeHost::default().with_file(r"C:\Tools\tool.exe");
        let shortcuts = FakeShortcuts::default().with(
            &lossy(&tool),
            RawShortcut {
                target: r"C:\Tools\tool.exe".into(),
                arguments: "--fast".into(),
                description: "A tool".into(),
                ..Default::default()
            },
        );
        let resolver = ShortcutResolver::new(&shortcuts, &host, &FakeIcons);
        let scanner = StartMenuScanner::new(
            vec![(dir.path().to_path_buf(), Source::StartMenuUser)],
            resolver,
            &host,
            &FakeIcons,
        );

        let programs = scanner.scan().unwrap();
        assert_eq!(programs.len(), 1);
        let tool = &programs[0];
        assert_eq!(tool.name, "Tool");
        assert_eq!(tool.executable_path, r"C:\Tools\tool.exe");
        assert_eq!(tool.arguments, "--fast");
        assert_eq!(tool.kind, Kind::Link);
        assert_eq!(tool.source, Source::StartMenuUser);
        assert_eq!(tool.description.as_deref(), Some("A tool"));
        assert_eq!(tool.icon_path, r"C:\Tools\tool.exe");
        assert!(tool.has_icon());
    }

    #[test]
    fn document_target_launches_the_shortcut_itself() {
        let dir = tempfile::tempdir().unwrap();
        let lnk = dir.path().join("Manual.lnk");
        touch(&lnk);
        let lnk_path = lossy(&lnk);

        let host = FakeHost::default()
            .with_file(r"C:\Docs\manual.pdf")
            .with_file(&lnk_path);
        let shortcuts = FakeShortcuts::default().with(
            &lnk_path,
            RawShortcut {
                target: r"C:\Docs\manual.pdf".into(),
                ..Default::default()
            },
        );
        let resolver = ShortcutResolver::new(&shortcuts, &host, &FakeIcons);
        let scanner = StartMenuScanner::new(
            vec![(dir.path().to_path_buf(), Source::StartMenuCommon)],
            resolver,
            &host,
            &FakeIcons,
        );

        let programs = scanner.scan().unwrap();
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].executable_path, lnk_path);
        assert_eq!(programs[0].source, Source::StartMenuCommon);
        assert!(programs[0].description.is_none());
    }

    #[test]
    fn broken_shortcuts_and_missing_roots_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("Broken.lnk"));

        let host = FakeHost::default();
        let shortcuts = FakeShortcuts::default();
        let resolver = ShortcutResolver::new(&shortcuts, &host, &FakeIcons);
        let scanner = StartMenuScanner::new(
            vec![
                (dir.path().to_path_buf(), Source::StartMenuUser),
                (dir.path().join("missing"), Source::StartMenuCommon),
            ],
            resolver,
            &host,
            &FakeIcons,
        );
        assert!(scanner.scan().unwrap().is_empty());
    }
}
