// Catalog entry points

use crate::config::CatalogConfig;
use crate::dedup::dedupe;
use crate::extractor::IconProvider;
use crate::path::HostPaths;
use crate::shortcut::{ShortcutReader, ShortcutResolver};
use crate::sources::installed_programs::{RegistryScanner, UninstallRegistry};
use crate::sources::run_isolated;
use crate::sources::search_index::{IndexBackend, SearchIndexQuerier};
use crate::sources::settings::SettingsSource;
use crate::sources::start_menu::StartMenuScanner;
use crate::sources::uwp::PackagedAppSource;
use crate::types::{Program, Source};
use std::path::PathBuf;
use std::time::Instant;
use tracing::Dispatch;

const COMPONENT: &str = "catalog";

/// Host capabilities a catalog pass runs against.
pub struct Backends<'a> {
    pub host: &'a dyn HostPaths,
    pub shortcuts: &'a dyn ShortcutReader,
    pub icons: &'a dyn IconProvider,
    pub registry: &'a dyn UninstallRegistry,
    pub index: &'a dyn IndexBackend,
    pub settings: &'a dyn SettingsSource,
    pub packaged: &'a dyn PackagedAppSource,
    pub start_menu_roots: Vec<(PathBuf, Source)>,
}

impl<'a> Backends<'a> {
    fn resolver(&self) -> ShortcutResolver<'a> {
        ShortcutResolver::new(self.shortcuts, self.host, self.icons)
    }
}

/// Full catalog: registry and start menu deduplicated, then settings and
/// packaged apps appended, sorted by name ignoring case.
pub fn collect_programs(backends: &Backends<'_>, config: &CatalogConfig) -> Vec<Program> {
    let start = Instant::now();
    let mut found = Vec::new();

    if config.include_registry {
        let scanner = RegistryScanner::new(backends.registry, backends.host, backends.icons);
        found.extend(run_isolated(&scanner));
    }
    if config.include_start_menu {
        let scanner = StartMenuScanner::new(
            backends.start_menu_roots.clone(),
            backends.resolver(),
            backends.host,
            backends.icons,
        );
        found.extend(run_isolated(&scanner));
    }

    let scanned = found.len();
    let mut programs = dedupe(found);
    let unique = programs.len();

    if config.include_settings {
        programs.extend(backends.settings.settings_pages());
    }
    if config.include_packaged_apps {
        match backends.packaged.packaged_apps(config.packaged_logo_size) {
            Ok(apps) => programs.extend(apps),
            Err(e) => tracing::error!(event = "packaged_apps_failed", component = COMPONENT, error = %e),
        }
    }
    sort_by_name(&mut programs);

    tracing::info!(
        event = "catalog_built",
        component = COMPONENT,
        scanned,
        unique,
        total = programs.len(),
        elapsed_ms = start.elapsed().as_millis() as u64
    );
    programs
}

/// Live index query. Failures are logged and yield nothing.
pub fn search_index(backends: &Backends<'_>, term: &str) -> Vec<Program> {
    let querier = SearchIndexQuerier::new(backends.index, backends.resolver(), backends.host, backends.icons);
    match querier.query(term) {
        Ok(programs) => programs,
        Err(e) => {
            tracing::error!(event = "index_query_failed", component = COMPONENT, term, error = %e);
            Vec::new()
        }
    }
}

pub fn sort_by_name(programs: &mut [Program]) {
    programs.sort_by_cached_key(|p| p.name.to_lowercase());
}

/// Entry points for the host application, each run under the catalog's logger.
pub struct Catalog {
    config: CatalogConfig,
    dispatch: Option<Dispatch>,
}

impl Catalog {
    pub fn new(config: CatalogConfig) -> Self {
        Catalog { config, dispatch: None }
    }

    /// Routes every event raised by this catalog to `dispatch` instead of the global subscriber.
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    fn scoped<R>(&self, work: impl FnOnce() -> R) -> R {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, work),
            None => work(),
        }
    }

    /// Full catalog built against caller-supplied backends.
    pub fn get_all_programs_with(&self, backends: &Backends<'_>) -> Vec<Program> {
        self.scoped(|| collect_programs(backends, &self.config))
    }

    /// Index query against caller-supplied backends.
    pub fn search_windows_index_with(&self, backends: &Backends<'_>, term: &str) -> Vec<Program> {
        self.scoped(|| search_index(backends, term))
    }

    pub fn get_all_programs(&self) -> Vec<Program> {
        self.scoped(|| {
            #[cfg(target_os = "windows")]
            {
                native::get_all_programs(&self.config)
            }
            #[cfg(not(target_os = "windows"))]
            {
                unsupported("get_all_programs");
                Vec::new()
            }
        })
    }

    pub fn search_windows_index(&self, term: &str) -> Vec<Program> {
        self.scoped(|| {
            #[cfg(target_os = "windows")]
            {
                native::search_windows_index(&self.config, term)
            }
            #[cfg(not(target_os = "windows"))]
            {
                let _ = term;
                unsupported("search_windows_index");
                Vec::new()
            }
        })
    }

    pub fn open_item(&self, path: &str, arguments: &str) -> bool {
        self.scoped(|| {
            #[cfg(target_os = "windows")]
            {
                native::open_item(path, arguments)
            }
            #[cfg(not(target_os = "windows"))]
            {
                let _ = (path, arguments);
                unsupported("open_item");
                false
            }
        })
    }
}

#[cfg(not(target_os = "windows"))]
fn unsupported(operation: &str) {
    tracing::warn!(event = "platform_unsupported", component = COMPONENT, operation, os = std::env::consts::OS);
}

#[cfg(target_os = "windows")]
mod native {
    use super::{collect_programs, search_index, Backends, COMPONENT};
    use crate::com::ComApartment;
    use crate::config::CatalogConfig;
    use crate::extractor::{IconExtractor, IconProvider, NoIcons};
    use crate::extractors::NativeIconSource;
    use crate::path::NativeHost;
    use crate::shell::{open_item as shell_open, ShellExecuteLauncher};
    use crate::shortcut::ShellLinkReader;
    use crate::sources::installed_programs::NativeRegistry;
    use crate::sources::search_index::PowerShellIndex;
    use crate::sources::settings::StaticSettingsPages;
    use crate::sources::start_menu::StartMenuScanner;
    use crate::sources::uwp::AppsFolderSource;
    use crate::types::Program;

    fn with_backends<R>(config: &CatalogConfig, roots: bool, work: impl FnOnce(&Backends<'_>) -> R) -> R {
        let extractor = IconExtractor::with_size(NativeIconSource, config.icon_size);
        let icons: &dyn IconProvider = if config.extract_icons { &extractor } else { &NoIcons };
        let backends = Backends {
            host: &NativeHost,
            shortcuts: &ShellLinkReader,
            icons,
            registry: &NativeRegistry,
            index: &PowerShellIndex,
            settings: &StaticSettingsPages,
            packaged: &AppsFolderSource,
            start_menu_roots: if roots { StartMenuScanner::system_roots() } else { Vec::new() },
        };
        work(&backends)
    }

    fn enter_apartment(operation: &str) -> Option<ComApartment> {
        match ComApartment::enter() {
            Ok(apartment) => Some(apartment),
            Err(e) => {
                tracing::error!(event = "com_init_failed", component = COMPONENT, operation, error = %e);
                None
            }
        }
    }

    pub fn get_all_programs(config: &CatalogConfig) -> Vec<Program> {
        let Some(_apartment) = enter_apartment("get_all_programs") else {
            return Vec::new();
        };
        with_backends(config, true, |backends| collect_programs(backends, config))
    }

    pub fn search_windows_index(config: &CatalogConfig, term: &str) -> Vec<Program> {
        let Some(_apartment) = enter_apartment("search_windows_index") else {
            return Vec::new();
        };
        with_backends(config, false, |backends| search_index(backends, term))
    }

    pub fn open_item(path: &str, arguments: &str) -> bool {
        let _apartment = enter_apartment("open_item");
        shell_open(&ShellExecuteLauncher, path, arguments)
    }
}
